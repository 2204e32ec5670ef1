//! Simulator front-end.
//!
//! Loads a program (assembly source or pre-assembled `.mc` artifact),
//! drives the pipeline interactively or to completion, and always writes
//! the statistics file — also after a fatal runtime error.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rvpipe_core::config::{FollowTarget, SimConfig};
use rvpipe_core::sim::Simulator;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Name of the statistics file written at the end of every run.
const STATS_FILE: &str = "stats.txt";

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "RV32IM cycle-accurate pipeline simulator",
    long_about = "Simulate a RISC-V program through a five-stage in-order pipeline.\n\n\
                  The input is an assembly source (assembled in-process) or a .mc\n\
                  machine-code artifact. Statistics are always written to stats.txt."
)]
struct Cli {
    /// Enable the five-stage pipelined mode.
    #[arg(short = 'p', long = "pipeline")]
    pipeline: bool,

    /// Enable data forwarding.
    #[arg(short = 'd', long = "data-forwarding")]
    data_forwarding: bool,

    /// Enable branch prediction.
    #[arg(short = 'b', long = "branch-predict")]
    branch_predict: bool,

    /// Print register values after the run.
    #[arg(short = 'r', long = "registers")]
    registers: bool,

    /// Run automatically (non-interactive).
    #[arg(short = 'a', long = "auto")]
    auto: bool,

    /// Input file: assembly source or .mc artifact.
    #[arg(short = 'i', long = "input", default_value = "input.asm")]
    input: PathBuf,

    /// Track one instruction: n=NUM (instruction number) or p=PC
    /// (decimal or 0x hex).
    #[arg(short = 'f', long = "follow", value_parser = parse_follow)]
    follow: Option<FollowTarget>,
}

/// Parses the `n=NUM` / `p=PC` follow argument.
fn parse_follow(arg: &str) -> Result<FollowTarget, String> {
    let (kind, number) = arg
        .split_once('=')
        .ok_or_else(|| "invalid follow format, use n=NUM or p=PC".to_string())?;
    let value = parse_number(number)
        .ok_or_else(|| format!("invalid instruction number or PC '{number}'"))?;
    match kind {
        "n" => Ok(FollowTarget::Instruction(value)),
        "p" => Ok(FollowTarget::Pc(value)),
        other => Err(format!(
            "invalid follow type '{other}', use n=NUM or p=PC"
        )),
    }
}

/// Accepts decimal or 0x-prefixed hex.
fn parse_number(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    announce(&cli);

    let config = SimConfig {
        pipelined: cli.pipeline,
        data_forwarding: cli.data_forwarding,
        branch_prediction: cli.branch_predict,
        follow: cli.follow,
        ..SimConfig::default()
    };
    let mut sim = Simulator::new(config);

    let contents = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{RED}Error: could not read {}: {e}{RESET}", cli.input.display());
            process::exit(1);
        }
    };

    let load_result = if cli.input.extension().is_some_and(|ext| ext == "mc") {
        sim.load_artifact(&contents)
    } else {
        sim.load_program(&contents)
    };
    if let Err(e) = load_result {
        eprintln!("{RED}Error: failed to load program: {e}{RESET}");
        process::exit(1);
    }
    if sim.text_len() == 0 {
        eprintln!("{RED}Error: no text segment found in the program{RESET}");
        process::exit(1);
    }
    println!("{GREEN}Program loaded successfully{RESET}");

    let failed = if cli.auto {
        println!("{YELLOW}Running simulation in automatic mode...{RESET}");
        run_auto(&mut sim)
    } else {
        println!(
            "{YELLOW}Press Enter to step through execution. Press 'q' then Enter to quit.{RESET}"
        );
        run_interactive(&mut sim)
    };

    println!("Total cycles: {}", sim.stats().cycles);
    if cli.registers {
        print_registers(&sim);
    }
    if let Some(followed) = sim.followed() {
        print_followed(followed);
    }

    write_stats(&sim, Path::new(STATS_FILE));
    if failed {
        process::exit(1);
    }
}

/// Echoes the enabled options, original front-end style.
fn announce(cli: &Cli) {
    if cli.pipeline {
        println!("Pipeline mode: ENABLED");
    }
    if cli.data_forwarding {
        println!("Data forwarding: ENABLED");
    }
    if cli.branch_predict {
        println!("Branch prediction: ENABLED");
    }
    if cli.auto {
        println!("Auto run: ENABLED");
    }
    println!("Input file: {}", cli.input.display());
}

/// Runs to completion; true on fatal error.
fn run_auto(sim: &mut Simulator) -> bool {
    if let Err(e) = sim.run() {
        eprintln!("{RED}Runtime error: {e}{RESET}");
        return true;
    }
    println!("{GREEN}Program execution completed{RESET}");
    false
}

/// Steps on Enter, quits on `q`; true on fatal error.
fn run_interactive(sim: &mut Simulator) -> bool {
    let stdin = std::io::stdin();
    loop {
        match sim.step() {
            Ok(true) => {}
            Ok(false) => {
                println!("{GREEN}Program execution completed{RESET}");
                return false;
            }
            Err(e) => {
                eprintln!("{RED}Runtime error: {e}{RESET}");
                return true;
            }
        }

        let mut choice = String::new();
        if stdin.lock().read_line(&mut choice).is_err() || choice.trim() == "q" {
            println!("Simulation stopped.");
            return false;
        }
    }
}

fn print_registers(sim: &Simulator) {
    println!("Registers:");
    let regs = sim.registers();
    for (i, value) in regs.iter().enumerate() {
        println!("x{i}: {value:#010x}");
    }
}

fn print_followed(followed: &rvpipe_core::core::cpu::FollowedInstruction) {
    println!("Followed instruction at PC {:#010x}:", followed.pc);
    println!("RA : {:#010x}", followed.latch.ra);
    println!("RB : {:#010x}", followed.latch.rb);
    println!("RM : {:#010x}", followed.latch.rm);
    println!("RY : {:#010x}", followed.latch.ry);
    println!("RZ : {:#010x}", followed.latch.rz);
}

fn write_stats(sim: &Simulator, path: &Path) {
    match sim.stats().write_to_file(path) {
        Ok(()) => println!("Simulation stats written to {}", path.display()),
        Err(e) => eprintln!("{RED}Error writing {}: {e}{RESET}", path.display()),
    }
}
