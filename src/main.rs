use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error};

use pbts::{CompileOptions, compile_workspace};

#[derive(Parser)]
#[command(name = "pbts", version, about = "Generate TypeScript declarations from .proto files")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory scanned for .proto files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the generated .ts files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep field names as written instead of camel-casing them
    #[arg(long)]
    keep_case: bool,

    /// Make every interface field optional
    #[arg(long)]
    optional: bool,

    /// Lint rule to disable in generated files (repeatable; replaces the defaults)
    #[arg(long = "eslint-ignore", value_name = "RULE")]
    eslint_ignore: Vec<String>,

    /// Message name suffix whose fields become optional
    #[arg(long)]
    request_suffix: Option<String>,

    /// Log per-file progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_options(self) -> pbts::Result<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => CompileOptions::from_json_file(path)?,
            None => CompileOptions::default(),
        };
        if let Some(input) = self.input {
            options.input = input;
        }
        if let Some(output) = self.output {
            options.output = output;
        }
        if self.keep_case {
            options.is_hump = false;
        }
        if self.optional {
            options.is_optional = true;
        }
        if !self.eslint_ignore.is_empty() {
            options.eslint_ignore_list = self.eslint_ignore;
        }
        if let Some(suffix) = self.request_suffix {
            options.request_suffix = suffix;
        }
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let result = cli.into_options().and_then(|options| compile_workspace(&options));
    match result {
        Ok(report) => {
            for path in &report.written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
