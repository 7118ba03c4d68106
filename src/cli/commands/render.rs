//! Render command handler

use crate::cli::error::CliError;
use crate::config::TagConfig;
use crate::render::{EmptyElementStyle, RenderOptions};
use crate::tree::Tag;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Descriptor format of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Json,
    Yaml,
    /// Decide from the file extension, or from the content for stdin
    Auto,
}

/// Where the descriptor is read from
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(input))
        }
    }
}

/// Arguments for the render command
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub input: InputSource,
    pub output: Option<PathBuf>,
    pub format: DescriptorFormat,
    pub force: bool,
    /// Write `<a></a>` instead of `<a/>`, overriding configuration
    pub expand_empty: bool,
    /// Emit the XML declaration, overriding configuration
    pub xml_declaration: bool,
    /// Directory holding `.bpmn-tag.toml` (default: current directory)
    pub config_dir: Option<PathBuf>,
}

/// Load input content from file or stdin
fn load_input(input: &InputSource) -> Result<String, CliError> {
    match input {
        InputSource::Stdin => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| CliError::IoError(format!("Failed to read stdin: {}", e)))?;
            Ok(content)
        }
        InputSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.clone(), e.to_string())),
    }
}

/// Resolve `Auto` into a concrete format
pub fn resolve_format(format: DescriptorFormat, input: &InputSource, content: &str) -> DescriptorFormat {
    if format != DescriptorFormat::Auto {
        return format;
    }

    if let InputSource::File(path) = input {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => return DescriptorFormat::Json,
            Some("yaml") | Some("yml") => return DescriptorFormat::Yaml,
            _ => {}
        }
    }

    if content.trim_start().starts_with('{') {
        DescriptorFormat::Json
    } else {
        DescriptorFormat::Yaml
    }
}

/// Build a tag tree from descriptor text and serialize it.
pub fn render_descriptor(
    content: &str,
    format: DescriptorFormat,
    options: &RenderOptions,
) -> Result<String, CliError> {
    let tag = match format {
        DescriptorFormat::Yaml => Tag::from_yaml(content)?,
        DescriptorFormat::Json | DescriptorFormat::Auto => Tag::from_json(content)?,
    };
    Ok(tag.to_xml_string_with(options)?)
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Write render output to file
pub fn write_output(output_path: &PathBuf, content: &str) -> Result<(), CliError> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.clone(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.clone(), e.to_string()))
}

/// Command-line flags win over configured options
fn apply_flags(mut options: RenderOptions, args: &RenderArgs) -> RenderOptions {
    if args.expand_empty {
        options.empty_elements = EmptyElementStyle::Expanded;
    }
    if args.xml_declaration {
        options.xml_declaration = true;
    }
    options
}

/// Merge configuration (file and environment) with command-line flags
fn effective_options(args: &RenderArgs) -> Result<RenderOptions, CliError> {
    let config_dir = args
        .config_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = TagConfig::load(&config_dir)?;
    Ok(apply_flags(config.render, args))
}

/// Handle the render command
pub fn handle_render(args: &RenderArgs) -> Result<(), CliError> {
    let options = effective_options(args)?;
    render_with_options(args, &options)
}

/// Render with already-resolved options
pub fn render_with_options(args: &RenderArgs, options: &RenderOptions) -> Result<(), CliError> {
    if let Some(output) = &args.output {
        check_file_overwrite(output, args.force)?;
    }

    let content = load_input(&args.input)?;
    let format = resolve_format(args.format, &args.input, &content);
    let xml = render_descriptor(&content, format, options)?;

    match &args.output {
        Some(output) => {
            write_output(output, &xml)?;
            info!("Rendered {} bytes to {}", xml.len(), output.display());
            println!("Wrote {}", output.display());
        }
        None => println!("{}", xml),
    }

    Ok(())
}
