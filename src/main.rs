//! Six-Piece Burr Solver
//!
//! Reads burr puzzles from a JSON catalog, searches for an assembly of the six
//! pieces that can also be taken apart, and prints the disassembly moves.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

use burr_solver::catalog::{self, Catalog, DEFAULT_CATALOG};
use burr_solver::{Disassembler, Puzzle, PuzzleState, Slot, SolveOutcome};

/// Solves six-piece burr puzzles.
#[derive(Parser)]
#[command(name = "burr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle catalog (JSON).
    #[arg(long, short, global = true, default_value = DEFAULT_CATALOG)]
    catalog: PathBuf,

    /// Log search progress at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find an assembly and its disassembly.
    Solve {
        /// Puzzle number in the catalog.
        #[arg(default_value_t = 0)]
        puzzle: usize,
        /// Also write the report to this file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Take apart a known assembly, e.g. "A1a B2c C3a D4b E5a F6c".
    Disassemble {
        puzzle: usize,
        assembly: String,
    },
    /// Print the shapes and their valid orientations per slot.
    Shapes {
        #[arg(default_value_t = 0)]
        puzzle: usize,
    },
    /// Solve every catalog puzzle and compare with the expected answers.
    Verify,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let result = match cli.command {
        Command::Solve { puzzle, output } => run_solve(&cli.catalog, puzzle, output),
        Command::Disassemble { puzzle, assembly } => {
            run_disassemble(&cli.catalog, puzzle, &assembly)
        }
        Command::Shapes { puzzle } => run_shapes(&cli.catalog, puzzle),
        Command::Verify => run_verify(&cli.catalog),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads puzzle `index` from the catalog and prints its shapes.
fn load_puzzle(catalog_path: &Path, index: usize) -> burr_solver::Result<Puzzle> {
    let catalog = Catalog::load(catalog_path)?;
    let entry = catalog.entry(index)?;
    println!("Solving puzzle {index}");
    println!("Shapes:");
    for line in &entry.shapes {
        println!("{line}");
    }
    println!();

    let puzzle = entry.puzzle()?;
    if puzzle.level() > 1 {
        println!(
            "Puzzle is level {} (higher levels can take longer to solve)",
            puzzle.level()
        );
    }
    Ok(puzzle)
}

/// Solves one puzzle and prints (and optionally saves) the report.
fn run_solve(
    catalog_path: &Path,
    index: usize,
    output: Option<PathBuf>,
) -> burr_solver::Result<bool> {
    let puzzle = load_puzzle(catalog_path, index)?;
    match burr_solver::solve(&puzzle) {
        SolveOutcome::Solved(solution) => {
            print!("{}", catalog::format_solution(&solution));
            if let Some(path) = output {
                catalog::save_report(&path, &solution)?;
                println!("Wrote {}", path.display());
            }
            Ok(true)
        }
        SolveOutcome::Unsolvable {
            num_iterations,
            num_checked,
        } => {
            println!(
                "No solution found after checking {num_checked} assemblies over {num_iterations} iterations"
            );
            Ok(false)
        }
    }
}

/// Disassembles a given assembly of one puzzle.
fn run_disassemble(catalog_path: &Path, index: usize, assembly: &str) -> burr_solver::Result<bool> {
    let puzzle = load_puzzle(catalog_path, index)?;
    let state: PuzzleState = assembly.parse()?;
    println!("Using known assembly {state}");

    match Disassembler::new().disassemble(&puzzle.to_state(&state)) {
        Some(moves) => {
            println!("Disassembly takes {} steps:", moves.len() - 1);
            for (i, step) in moves.iter().skip(1).enumerate() {
                if let Some(mv) = &step.edge {
                    println!("{i}: {mv}");
                }
            }
            Ok(true)
        }
        None => {
            println!("No disassembly found");
            Ok(false)
        }
    }
}

/// Prints each shape's voxel count and valid orientations per slot.
fn run_shapes(catalog_path: &Path, index: usize) -> burr_solver::Result<bool> {
    let puzzle = load_puzzle(catalog_path, index)?;
    for (i, shape) in puzzle.shapes().iter().enumerate() {
        print!("Shape {} ({} voxels):", i + 1, shape.len());
        for slot in Slot::ALL {
            let letters: String = shape
                .orientations_at(slot)
                .iter()
                .map(|o| o.letter())
                .collect();
            print!(" {slot}={}", if letters.is_empty() { "-" } else { letters.as_str() });
        }
        println!();
    }
    Ok(true)
}

/// Solves the whole catalog, checking each solution.
fn run_verify(catalog_path: &Path) -> burr_solver::Result<bool> {
    let catalog = Catalog::load(catalog_path)?;
    let mut all_passed = true;
    for (index, entry) in catalog.puzzles.iter().enumerate() {
        let puzzle = entry.puzzle()?;
        let verdict = match burr_solver::solve(&puzzle) {
            SolveOutcome::Solved(solution) => match entry.check(&solution) {
                Ok(()) => format!("ok ({} moves)", solution.num_moves()),
                Err(e) => {
                    all_passed = false;
                    format!("FAILED: {e}")
                }
            },
            SolveOutcome::Unsolvable { .. } => {
                all_passed = false;
                "FAILED: no solution".to_string()
            }
        };
        println!("Puzzle {index}: {verdict}");
    }
    Ok(all_passed)
}
