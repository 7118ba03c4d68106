//! Catalog command handler

use crate::cli::error::CliError;
use crate::factory::{CATALOG, ElementCategory, ElementKind};

/// Format catalog entries as aligned text lines
pub fn format_catalog(category: Option<ElementCategory>) -> Vec<String> {
    CATALOG
        .into_iter()
        .filter(|kind| category.is_none_or(|c| kind.category() == c))
        .map(format_entry)
        .collect()
}

fn format_entry(kind: ElementKind) -> String {
    let mut line = format!(
        "{:<22} {:<8} required: [{}]",
        kind.tag_name(),
        kind.category().to_string(),
        kind.required_attributes().join(", ")
    );
    if !kind.optional_attributes().is_empty() {
        line.push_str(&format!(
            " optional: [{}]",
            kind.optional_attributes().join(", ")
        ));
    }
    line
}

/// Handle the catalog command
pub fn handle_catalog(category: Option<&str>, json: bool) -> Result<(), CliError> {
    let category = category
        .map(str::parse::<ElementCategory>)
        .transpose()
        .map_err(CliError::InvalidArgument)?;

    if json {
        let entries: Vec<_> = CATALOG
            .into_iter()
            .filter(|kind| category.is_none_or(|c| kind.category() == c))
            .map(ElementKind::describe)
            .collect();
        let output = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::IoError(format!("Failed to serialize catalog: {}", e)))?;
        println!("{}", output);
    } else {
        for line in format_catalog(category) {
            println!("{}", line);
        }
    }

    Ok(())
}
