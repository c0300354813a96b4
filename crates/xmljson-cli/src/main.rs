use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xmljson::fs::{json_to_root, read_json, read_xml, xml_document_string, xml_string};
use xmljson::{export, json, xml_to_json_with_config, Config, Options, ScalarPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "xmljson",
    version,
    about = "Convert XML documents to JSON and back"
)]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an XML file to JSON
    XmlToJson {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        depth: DepthArgs,
    },
    /// Convert a JSON file to an XML document
    JsonToXml {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        #[command(flatten)]
        scalars: ScalarArgs,
        #[command(flatten)]
        depth: DepthArgs,
    },
    /// Print the XML elements for a JSON file, without declaration
    JsonToXmlString {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[command(flatten)]
        scalars: ScalarArgs,
        #[command(flatten)]
        depth: DepthArgs,
    },
}

#[derive(Debug, Args)]
struct DepthArgs {
    /// Maximum nesting depth, 0 for unlimited
    #[arg(long, value_name = "N", default_value_t = Config::default().max_depth)]
    max_depth: u16,
}

#[derive(Debug, Args)]
struct ScalarArgs {
    /// Write numbers, booleans and null as text instead of failing
    #[arg(long)]
    stringify_scalars: bool,
}

fn config(depth: &DepthArgs, scalars: Option<&ScalarArgs>) -> Config {
    let policy = match scalars {
        Some(args) if args.stringify_scalars => ScalarPolicy::Text,
        _ => ScalarPolicy::Reject,
    };
    Config::new(depth.max_depth, policy)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::XmlToJson {
            input,
            output,
            pretty,
            depth,
        } => {
            let options = Options::new(config(&depth, None), pretty);
            match output {
                Some(output) => xmljson::xml_file_to_json_file(&input, &output, &options)
                    .with_context(|| format!("failed to convert {}", input.display()))?,
                None => {
                    let doc = read_xml(&input, &options.config).with_context(|| read_context(&input))?;
                    let value = xml_to_json_with_config(&doc, &options.config)
                        .with_context(|| format!("failed to convert {}", input.display()))?;
                    let text = if pretty {
                        json::to_string_pretty(&value)?
                    } else {
                        json::to_string(&value)?
                    };
                    write_stdout(&text)?;
                }
            }
        }
        Command::JsonToXml {
            input,
            output,
            scalars,
            depth,
        } => {
            let options = Options::new(config(&depth, Some(&scalars)), false);
            match output {
                Some(output) => xmljson::json_file_to_xml_file(&input, &output, &options)
                    .with_context(|| format!("failed to convert {}", input.display()))?,
                None => {
                    let value = read_json(&input).with_context(|| read_context(&input))?;
                    let root = json_to_root(&value, &options.config)
                        .with_context(|| format!("failed to convert {}", input.display()))?;
                    write_stdout(&xml_document_string(&root, export::now())?)?;
                }
            }
        }
        Command::JsonToXmlString {
            input,
            scalars,
            depth,
        } => {
            let options = Options::new(config(&depth, Some(&scalars)), false);
            let value = read_json(&input).with_context(|| read_context(&input))?;
            let root = json_to_root(&value, &options.config)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            write_stdout(&xml_string(&root)?)?;
        }
    }

    info!("done");
    Ok(())
}

fn read_context(path: &Path) -> String {
    format!("failed to read input file {}", path.display())
}

fn write_stdout(data: &str) -> Result<()> {
    debug!(bytes = data.len(), "writing to stdout");
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(data.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .context("failed to write stdout")
}
