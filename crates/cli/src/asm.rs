//! Assembler front-end.
//!
//! Reads an assembly source file, assembles it, and writes the
//! machine-code artifact. Every diagnostic of a failed batch is printed
//! with its source line; no artifact is written on failure.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rvpipe_core::asm::program;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(
    name = "asm",
    author,
    version,
    about = "RV32IM assembler",
    long_about = "Assemble a RISC-V source file into a machine-code artifact.\n\n\
                  The artifact lists one text word per line with its disassembly,\n\
                  an <END_OF_TEXT> sentinel, then one data byte per line."
)]
struct Cli {
    /// Input assembly file.
    input: PathBuf,

    /// Output artifact file (defaults to `<input stem>.mc`).
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("mc"));

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{RED}Error: could not read {}: {e}{RESET}", cli.input.display());
            process::exit(1);
        }
    };
    if source.trim().is_empty() {
        eprintln!("{RED}Error: input file is empty{RESET}");
        process::exit(1);
    }

    match program::assemble(&source) {
        Ok(machine) => {
            if let Err(e) = write_artifact(&output, &machine.render()) {
                eprintln!("{RED}Error: could not write {}: {e}{RESET}", output.display());
                process::exit(1);
            }
            println!(
                "{GREEN}Machine code written to {} ({} instructions, {} data bytes){RESET}",
                output.display(),
                machine.text.len(),
                machine.data.len()
            );
        }
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{RED}{error}{RESET}");
            }
            eprintln!("{RED}Error: assembly failed with {} error(s){RESET}", errors.len());
            process::exit(1);
        }
    }
}

fn write_artifact(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
