//! CLI binary entry point for bpmn-tag

#[cfg(feature = "cli")]
use bpmn_tag_tree::cli::commands::catalog::handle_catalog;
#[cfg(feature = "cli")]
use bpmn_tag_tree::cli::commands::render::{
    DescriptorFormat, InputSource, RenderArgs, handle_render,
};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bpmn-tag")]
#[command(about = "Render BPMN tag tree descriptors to XML")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Render a JSON or YAML tag descriptor to XML
    Render {
        /// Input file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Descriptor format
        #[arg(long, value_enum, default_value = "auto")]
        format: DescriptorFormatArg,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
        /// Write empty elements as <a></a> instead of <a/>
        #[arg(long)]
        expand_empty: bool,
        /// Prefix output with an XML declaration
        #[arg(long)]
        xml_declaration: bool,
        /// Directory containing .bpmn-tag.toml (default: current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the BPMN element catalog
    Catalog {
        /// Only list one category (event, gateway, task, flow)
        #[arg(short, long)]
        category: Option<String>,
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Debug)]
enum DescriptorFormatArg {
    Json,
    Yaml,
    Auto,
}

#[cfg(feature = "cli")]
fn convert_format(format: DescriptorFormatArg) -> DescriptorFormat {
    match format {
        DescriptorFormatArg::Json => DescriptorFormat::Json,
        DescriptorFormatArg::Yaml => DescriptorFormat::Yaml,
        DescriptorFormatArg::Auto => DescriptorFormat::Auto,
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            format,
            force,
            expand_empty,
            xml_declaration,
            config,
        } => {
            let args = RenderArgs {
                input: InputSource::parse(&input),
                output,
                format: convert_format(format),
                force,
                expand_empty,
                xml_declaration,
                config_dir: config,
            };
            handle_render(&args)
        }
        Commands::Catalog { category, json } => handle_catalog(category.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
