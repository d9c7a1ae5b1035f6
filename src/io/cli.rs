//! Command-line interface for browsing the catalog and generating puzzles

use crate::algorithm::generator::{Generator, SizeRange};
use crate::algorithm::puzzle::Difficulty;
use crate::algorithm::solver::{SolveOptions, solve};
use crate::io::configuration::{
    DEFAULT_MAX_TILES, DEFAULT_MIN_TILES, DEFAULT_SEED, DEFAULT_TIMEOUT_MS,
};
use crate::io::error::{PuzzleError, Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::render::{render_catalog, render_puzzle, render_solution};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "pipeloop")]
#[command(
    author,
    version,
    about = "Generate and verify closed-loop connector tile puzzles"
)]
/// Command-line arguments for the puzzle tool
pub struct Cli {
    /// What to do
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output and non-error logs
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Print every canonical tile shape
    Catalog,
    /// Generate solved networks and derive puzzles from them
    Generate(GenerateArgs),
}

/// Options for the `generate` subcommand
#[derive(Args, Clone)]
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateArgs {
    /// Fewest tiles in a network
    #[arg(long, default_value_t = DEFAULT_MIN_TILES)]
    pub min: usize,

    /// Most tiles in a network
    #[arg(long, default_value_t = DEFAULT_MAX_TILES)]
    pub max: usize,

    /// Allow wall tiles and a second level
    #[arg(long)]
    pub allow_3d: bool,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of puzzles to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Difficulty of derived puzzles
    #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Solve each derived puzzle and report whether its solution is unique
    #[arg(long)]
    pub verify: bool,

    /// Time budget per verification in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Write the report to a file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Validated size range
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are inverted or too small
    pub fn size_range(&self) -> Result<SizeRange> {
        SizeRange::new(self.min, self.max)
    }
}

/// Runs one parsed command and writes its report
pub struct CommandProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            progress_manager: None,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if arguments are invalid or the report cannot be written
    pub fn process(&mut self) -> Result<()> {
        match &self.cli.command {
            Command::Catalog => Self::emit(None, &render_catalog()),
            Command::Generate(args) => {
                let args = args.clone();
                if !self.cli.quiet && args.output.is_some() {
                    self.progress_manager = Some(ProgressManager::new());
                }
                let report = self.generate(&args)?;
                Self::emit(args.output.as_ref(), &report)
            }
        }
    }

    fn generate(&mut self, args: &GenerateArgs) -> Result<String> {
        let size = args.size_range()?;
        if args.count == 0 {
            return Err(invalid_parameter("count", &0, &"must be at least 1"));
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(args.count);
        }

        let mut report = String::new();
        for index in 0..args.count {
            let seed = args.seed.wrapping_add(index as u64);
            let started = Instant::now();
            if let Some(ref pm) = self.progress_manager {
                pm.start_puzzle(index, &format!("seed {seed}"));
            }

            let mut generator = Generator::new(seed);
            let Some((solution, puzzle)) =
                generator.generate_puzzle(&size, args.allow_3d, args.difficulty)
            else {
                log::warn!("Puzzle {} (seed {seed}) could not be generated", index + 1);
                let _ = writeln!(report, "== puzzle {} (seed {seed}): generation failed\n", index + 1);
                if let Some(ref mut pm) = self.progress_manager {
                    pm.fail_puzzle();
                }
                continue;
            };

            let _ = writeln!(
                report,
                "== puzzle {} (seed {seed}, {})",
                index + 1,
                args.difficulty
            );
            report.push_str(&render_puzzle(&puzzle));

            if args.verify {
                if let Some(ref pm) = self.progress_manager {
                    pm.set_status("verifying");
                }
                let options = SolveOptions::count(2)
                    .with_timeout(Some(Duration::from_millis(args.timeout_ms)));
                let outcome = solve(&puzzle, &options)?;
                let verdict = match (outcome.solution_count, outcome.timed_out) {
                    (0, false) => "unsolvable",
                    (0, true) => "undecided (timed out)",
                    (1, false) => "unique solution",
                    (1, true) => "at least one solution (timed out)",
                    _ => "multiple solutions",
                };
                log::info!(
                    "Puzzle {} verified in {:.2?}: {verdict}",
                    index + 1,
                    outcome.elapsed
                );
                let _ = writeln!(report, "verification: {verdict}");
            }

            let _ = writeln!(report, "solution:");
            report.push_str(&render_solution(&solution));
            report.push('\n');

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_puzzle(solution.len(), started.elapsed());
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }
        Ok(report)
    }

    // Allow print for the report itself when no output file is given
    #[allow(clippy::print_stdout)]
    fn emit(output: Option<&PathBuf>, report: &str) -> Result<()> {
        match output {
            Some(path) => std::fs::write(path, report).map_err(|source| PuzzleError::Io {
                path: Some(path.clone()),
                action: "write report",
                source,
            }),
            None => {
                print!("{report}");
                Ok(())
            }
        }
    }
}
