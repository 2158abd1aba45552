use std::{
    io::{self, BufWriter, IsTerminal, Write},
    process::ExitCode,
};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use ratsolve::{
    parser::read_system,
    printer::{MatrixPrinter, PrintOptions, VectorPrinter},
    tensors::matrix::{Matrix, Solution},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ratsolve")]
#[command(version, about = "Solve linear systems exactly by Gaussian elimination over the rationals")]
struct Cli {
    /// Do not print prompts while reading the system
    #[arg(short, long, conflicts_with = "prompt")]
    quiet: bool,

    /// Print prompts even when the input is not a terminal
    #[arg(long)]
    prompt: bool,

    /// Append floating point approximations with this many decimals
    #[arg(long, value_name = "N")]
    decimals: Option<usize>,

    /// Only print the solution, not the reduced matrix
    #[arg(long)]
    no_matrix: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    let show_prompts = cli.prompt || (!cli.quiet && stdin.is_terminal());

    let mut matrix = {
        let mut stdout = io::stdout().lock();
        let prompts = if show_prompts {
            Some(&mut stdout as &mut dyn Write)
        } else {
            None
        };
        read_system(stdin.lock(), prompts)?
    };

    let solution = matrix.solve()?;

    let opts = PrintOptions {
        decimals: cli.decimals,
    };
    let mut out = BufWriter::new(io::stdout().lock());
    write_result(&mut out, &matrix, &solution, opts, show_prompts, !cli.no_matrix)?;
    out.flush()?;

    if !solution.is_determined() {
        eprintln!(
            "{} equation {} reduced to zero; only {} of {} variables are determined",
            "warning:".yellow().bold(),
            solution.degenerate_row().unwrap_or_default(),
            solution.rank(),
            solution.values().len()
        );
    }

    Ok(())
}

/// Write the reduced matrix and the solution. After prompts, a newline first ends the
/// last prompt line.
fn write_result<W: Write>(
    out: &mut W,
    matrix: &Matrix,
    solution: &Solution,
    opts: PrintOptions,
    after_prompts: bool,
    show_matrix: bool,
) -> io::Result<()> {
    if after_prompts {
        writeln!(out)?;
    }
    if show_matrix {
        writeln!(out, "{}", MatrixPrinter::new(matrix, opts))?;
    }
    writeln!(out, "{}", VectorPrinter::new(solution.values(), opts))
}
