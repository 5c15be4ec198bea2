mod build;
mod config;

use clap::{Parser, Subcommand};
use cssx_codegen::CompileOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ProjectConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "cssx")]
#[command(about = "CSSX compiler: one source, an HTML fragment and a stylesheet")]
#[command(version)]
struct Cli {
    /// Log compiler activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override a variable before the file's own declarations (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var, global = true)]
    vars: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a .cssx file and print the result
    Compile {
        /// Input .cssx file
        path: String,

        /// Print only the HTML fragment
        #[arg(long, conflicts_with = "css")]
        html: bool,

        /// Print only the stylesheet
        #[arg(long)]
        css: bool,
    },

    /// Check a .cssx file for errors without printing output
    Check {
        /// Input .cssx file
        path: String,
    },

    /// Build every route of a project into static pages
    Build {
        /// Project file
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli
        .vars
        .iter()
        .fold(CompileOptions::default(), |options, (name, value)| {
            options.variable(name, value.as_str())
        });

    match cli.command {
        Command::Compile { path, html, css } => cmd_compile(&path, html, css, &options),
        Command::Check { path } => cmd_check(&path, &options),
        Command::Build { config } => cmd_build(&config, &options),
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` when set, `warn` otherwise. `--verbose` raises the floor to `debug`.
fn log_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

fn parse_var(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{arg}`")),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn base_dir(path: &str) -> &Path {
    Path::new(path).parent().unwrap_or(Path::new("."))
}

fn cmd_compile(path: &str, html_only: bool, css_only: bool, options: &CompileOptions) {
    let source = read_source(path);

    let output = match cssx_codegen::compile(&source, base_dir(path), options) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if css_only {
        println!("{}", output.css);
    } else if html_only {
        println!("{}", output.html);
    } else {
        println!("{}\n\n{}", output.html, output.css);
    }
}

fn cmd_check(path: &str, options: &CompileOptions) {
    let source = read_source(path);

    if let Err(e) = cssx_codegen::compile(&source, base_dir(path), options) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}

fn cmd_build(config_path: &Path, options: &CompileOptions) {
    let config = match ProjectConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let root = config_path.parent().unwrap_or(Path::new("."));

    match build::build_project(root, &config, options) {
        Ok(pages) => {
            for page in pages {
                eprintln!("Built: {}", page.display());
            }
        }
        Err(e) => {
            eprintln!("Build error: {e}");
            std::process::exit(1);
        }
    }
}
