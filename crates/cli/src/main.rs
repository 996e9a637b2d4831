//! Sacagawea CLI
//!
//! Command-line interface for generating Go client libraries from Google
//! API Discovery documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sacagawea_common::{Artifact, DirectoryItem};
use sacagawea_generator::plugin::{self, PluginRunner, DEFAULT_PLUGIN};
use sacagawea_generator::{get_files, load_model, ServiceRenderer};
use sacagawea_parser::{list_services, Fetch, HttpFetcher};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sacagawea")]
#[command(version, about = "Generate Go client libraries from Google API Discovery documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go client library from a Discovery document
    #[command(after_help = "EXAMPLES:\n  \
        # Generate the Cloud Functions client\n  \
        sacagawea generate \\\n    \
        --url 'https://cloudfunctions.googleapis.com/$discovery/rest?version=v1' \\\n    \
        --package cloudfunctions \\\n    \
        --output ./cloudfunctions\n\n  \
        # Only render types and constants from a local document\n  \
        sacagawea generate --url storage-v1.json --package storage --only types,constants")]
    Generate {
        /// Discovery document URL or local path
        #[arg(short, long)]
        url: String,

        /// Go package name of the generated files
        #[arg(short, long)]
        package: String,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Comma-separated list of artifacts to render (default: all)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<Artifact>>,
    },

    /// List the APIs published by the Discovery service
    List {
        /// Only show preferred API versions
        #[arg(long)]
        preferred: bool,

        /// Print the directory list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hand a Discovery document to an external generator plugin
    Plugin {
        /// Discovery document URL or local path
        #[arg(short, long)]
        url: String,

        /// Output directory for plugin files ("-" writes them to stdout)
        #[arg(short, long, default_value = "./output")]
        output: String,

        /// Plugin binary, invoked with -plugin
        #[arg(long, default_value = DEFAULT_PLUGIN)]
        plugin: String,
    },

    /// Print the rendered types.go of a Discovery document
    Types {
        /// Discovery document URL or local path
        #[arg(short, long)]
        url: String,
    },

    /// Print the surface model of a Discovery document as JSON
    Model {
        /// Discovery document URL or local path
        #[arg(short, long)]
        url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            url,
            package,
            output,
            only,
        } => {
            generate_command(&url, &package, output.as_path(), only.as_deref(), cli.verbose)?;
        }

        Commands::List { preferred, json } => {
            list_command(preferred, json, cli.verbose)?;
        }

        Commands::Plugin {
            url,
            output,
            plugin,
        } => {
            plugin_command(&url, &output, &plugin)?;
        }

        Commands::Types { url } => {
            let bytes = fetch(&url)?;
            let types = get_files(&bytes).context("Failed to render types")?;
            std::io::stdout().write_all(&types)?;
        }

        Commands::Model { url } => {
            let bytes = fetch(&url)?;
            let (_, model) = load_model(&bytes).context("Failed to derive surface model")?;
            std::io::stdout().write_all(&model.to_json_pretty()?)?;
            println!();
        }
    }

    Ok(())
}

/// Send library diagnostics to stderr; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    HttpFetcher::new()
        .fetch(url)
        .with_context(|| format!("Failed to fetch {}", url))
}

fn generate_command(
    url: &str,
    package: &str,
    output: &Path,
    only: Option<&[Artifact]>,
    verbose: bool,
) -> Result<()> {
    println!("{} Generating client from: {}", "→".cyan(), url);

    let service =
        ServiceRenderer::new(url, package, output).context("Failed to load Discovery document")?;

    if verbose {
        println!("  Package: {}", package);
        println!("  Output: {}", service.output().display());
    }

    let model = service.model();
    println!(
        "{} Derived {} types and {} methods for {}",
        "✓".green(),
        model.types.len(),
        model.methods.len(),
        model.name.yellow()
    );

    let artifacts = only.unwrap_or(&Artifact::ALL);
    debug!(?artifacts, output = %output.display(), "rendering artifacts");
    println!("{} Rendering files...", "→".cyan());
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = service
            .render_artifact(*artifact, None)
            .with_context(|| format!("Failed to render {}", artifact))?;
        written.push(path);
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }

    Ok(())
}

fn list_command(preferred: bool, json: bool, verbose: bool) -> Result<()> {
    let mut list = list_services(&HttpFetcher::new()).context("Failed to list APIs")?;
    if preferred {
        let items: Vec<DirectoryItem> = list.preferred().cloned().collect();
        list.items = items;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", format!("{} APIs:", list.items.len()).bold());
    for item in &list.items {
        let mut line = format!("  • {}", item.id.cyan());
        if !item.title.is_empty() {
            line.push_str(&format!(" - {}", item.title));
        }
        if item.preferred {
            line.push_str(&format!(" {}", "(preferred)".green()));
        }
        println!("{}", line);
        if verbose {
            println!("    {}", item.discovery_rest_url.dimmed());
        }
    }

    Ok(())
}

fn plugin_command(url: &str, output: &str, binary: &str) -> Result<()> {
    let to_stdout = writes_to_stdout(output);

    // Plugin files written to stdout must not be mixed with progress lines
    let progress = format!("{} Running plugin {} on: {}", "→".cyan(), binary.yellow(), url);
    if to_stdout {
        eprintln!("{}", progress);
    } else {
        println!("{}", progress);
    }

    let runner = PluginRunner::new(binary).with_args(["-plugin"]);
    debug!(?runner, output, "invoking plugin");
    let files = plugin::gen_service_client(&HttpFetcher::new(), url, output, &runner)
        .context("Plugin generation failed")?;

    if !to_stdout {
        println!("\n{}", "✓ Plugin complete!".green().bold());
        println!("\n{}", "Generated files:".bold());
        for name in &files {
            println!("  📄 {}/{}", output, name);
        }
    }

    Ok(())
}

fn writes_to_stdout(output: &str) -> bool {
    output == plugin::STDOUT_PATH
}
