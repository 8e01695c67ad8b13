//! `bashfn` command-line interface.
//!
//! Two modes:
//!
//! - compile: `bashfn -i script.bfn [-o out.sh]` — writes the compiled
//!   script to a file, or to stdout when the output is `-` (the default)
//! - run: `bashfn -r script.bfn [-- args...]` — compiles to a temporary
//!   file, executes it with bash and exits with bash's status

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[derive(Parser)]
#[command(name = "bashfn", version, about = "Compiles @fn directives to plain bash")]
#[command(group = ArgGroup::new("mode").required(true).args(["input", "run"]))]
struct Cli {
    /// Input file to compile
    #[arg(short = 'i', long = "in", conflicts_with = "run")]
    input: Option<String>,

    /// Output file; '-' writes to stdout
    #[arg(short = 'o', long = "out", default_value = "-", conflicts_with = "run")]
    output: String,

    /// Compile and run directly with bash
    #[arg(short = 'r', long = "run")]
    run: Option<String>,

    /// Arguments forwarded to the script in run mode
    #[arg(last = true)]
    args: Vec<String>,
}

fn compile_path(path: &str) -> Result<String> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let compiled = bashfn::compile(&source).with_context(|| format!("Failed to compile {path}"))?;
    Ok(compiled)
}

fn run(cli: &Cli, path: &str) -> Result<i32> {
    let compiled = compile_path(path)?;

    let mut script = NamedTempFile::new().context("Failed to create temporary script")?;
    script
        .write_all(compiled.as_bytes())
        .context("Failed to write temporary script")?;

    let status = Command::new("bash")
        .arg(script.path())
        .args(&cli.args)
        .status()
        .context("Failed to execute bash")?;
    Ok(status.code().unwrap_or(1))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.run {
        let code = run(&cli, path)?;
        std::process::exit(code);
    }

    // The mode group guarantees --in is present when --run is not.
    if let Some(input) = &cli.input {
        let compiled = compile_path(input)?;
        if cli.output == "-" {
            print!("{compiled}");
        } else {
            fs::write(&cli.output, &compiled)
                .with_context(|| format!("Failed to write {}", cli.output))?;
        }
    }

    Ok(())
}
