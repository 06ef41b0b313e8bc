mod play;

use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};

use fifteen_puzzle::{Grid, Solver, SolverConfig};

#[derive(Debug, Parser)]
#[command(name = "fifteen-puzzle", about = "Play and solve the 4x4 sliding-tile puzzle")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a scrambled (or given) grid and print every step
    Solve {
        #[command(flatten)]
        start: StartArgs,

        /// Stop after expanding this many nodes
        #[arg(long)]
        max_expanded: Option<usize>,

        /// Stop after this many milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,
    },
    /// Play interactively in the terminal
    Play {
        /// Seed for the scramble (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Delay between replayed solver moves
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,
    },
    /// Report whether an arrangement is solved and solvable
    Check {
        /// Tiles in row-major order, comma separated, 16 for the blank
        #[arg(long)]
        tiles: String,
    },
}

#[derive(Debug, Args)]
struct StartArgs {
    /// Tiles in row-major order, comma separated, 16 for the blank
    #[arg(long, conflicts_with = "seed")]
    tiles: Option<String>,

    /// Seed for the scramble (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_tiles(s: &str) -> anyhow::Result<Grid> {
    let numbers = s
        .split(',')
        .map(|x| x.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid tile list '{s}'"))?;
    Grid::from_numbers(&numbers).with_context(|| format!("invalid grid '{s}'"))
}

fn scrambled(seed: Option<u64>) -> Grid {
    let mut grid = Grid::new();
    match seed {
        Some(seed) => grid.scramble_with(&mut StdRng::seed_from_u64(seed)),
        None => grid.scramble(),
    }
    grid
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            start,
            max_expanded,
            time_budget_ms,
        } => {
            let mut puzzle = match start.tiles {
                Some(tiles) => parse_tiles(&tiles)?,
                None => scrambled(start.seed),
            };
            if !puzzle.is_solvable() {
                bail!("puzzle is not solvable:\n{puzzle}");
            }

            let config = SolverConfig {
                max_expanded,
                time_budget: time_budget_ms.map(Duration::from_millis),
            };

            println!("Shuffled Puzzle:\n{}", puzzle);
            let output = Solver::new(config)
                .search(&puzzle)
                .context("solver failed")?;
            println!(
                "Found solution with {} moves after expanding {} nodes",
                output.moves.len(),
                output.expanded
            );

            for item in output.moves {
                puzzle.apply_move(item);
                println!("{} ({})\n{}", item, item.arrow_key(), puzzle);
            }
        }
        Command::Play { seed, delay_ms } => {
            play::run(scrambled(seed), Duration::from_millis(delay_ms))
                .context("terminal session failed")?;
        }
        Command::Check { tiles } => {
            let grid = parse_tiles(&tiles)?;
            println!("{grid}");
            println!("solved:   {}", grid.is_solved());
            println!("solvable: {}", grid.is_solvable());
        }
    }

    Ok(())
}
