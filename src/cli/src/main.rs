#![warn(clippy::pedantic)]

mod export;
mod progress;
mod render;
mod settings;
mod table;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{OptionExt, eyre};
use cube_core::{CubeState, Face};
use env_logger::TimestampPrecision;
use export::RunSummary;
use log::{LevelFilter, info};
use search::{Goal, LayerSolved, ProgressSink, SearchOutcome, Searcher, Solved, UniformFaces};
use settings::Settings;
use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};
use table::ScrambleTable;

/// Exhaustively searches for the algorithms that solve cube scrambles
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file in TOML format. `algodb.toml` in the working directory
    /// is used when present.
    #[arg(long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every sequence from a move set that solves a scramble of a table
    Search {
        /// The scramble table, a CSV file named after the cube size such as
        /// `3-oll.csv`
        table: PathBuf,
        /// The id of the scramble in the table
        id: String,
        /// The longest sequence to try
        max_depth: usize,
        /// Whitespace separated moves to search with, e.g. "R R' R2 U U' U2"
        moves: String,
        /// What counts as solved
        #[arg(long, value_enum, default_value_t = GoalKind::Solved)]
        goal: GoalKind,
        /// The face whose layer must be solved for `--goal layer`
        #[arg(long, default_value = "D", value_parser = parse_face)]
        layer: Face,
        /// Search on a single thread
        #[arg(long)]
        sequential: bool,
        /// Do not report progress while searching
        #[arg(long)]
        no_progress: bool,
        /// Where the algorithm table is written, overriding the settings
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Give up after this many seconds, overriding the settings
        #[arg(long)]
        time_limit: Option<u64>,
    },
    /// Print a cube, optionally after a scramble
    Show {
        /// The number of layers
        size: usize,
        /// Moves to apply first, e.g. "R U R' U'"
        scramble: Option<String>,
        /// Print colour initials instead of coloured stickers
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GoalKind {
    /// Every sticker on its home face
    Solved,
    /// Every face a single colour, in any orientation
    Uniform,
    /// The outer layer of `--layer` solved
    Layer,
}

fn parse_face(s: &str) -> Result<Face, String> {
    s.parse::<Face>()
        .map_err(|()| format!("`{s}` is not a face, expected one of U R F D L B"))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let settings = Settings::load(cli.settings.as_deref())?;
    let color = settings.color && io::stdout().is_terminal();

    match cli.command {
        Commands::Search {
            table,
            id,
            max_depth,
            moves,
            goal,
            layer,
            sequential,
            no_progress,
            out_dir,
            time_limit,
        } => {
            let mut settings = settings;
            if let Some(out_dir) = out_dir {
                settings.out_dir = out_dir;
            }
            if let Some(time_limit) = time_limit {
                settings.time_limit_secs = Some(time_limit);
            }
            let goal: Box<dyn Goal> = match goal {
                GoalKind::Solved => Box::new(Solved),
                GoalKind::Uniform => Box::new(UniformFaces),
                GoalKind::Layer => Box::new(LayerSolved(layer)),
            };
            let request = SearchRequest {
                table,
                id,
                max_depth,
                moves: moves.split_whitespace().map(str::to_owned).collect(),
                sequential,
                progress: !no_progress,
                color,
            };
            run_search(&request, goal.as_ref(), &settings)?;
        }
        Commands::Show {
            size,
            scramble,
            plain,
        } => {
            let mut cube = CubeState::new(size)?;
            if let Some(scramble) = &scramble {
                cube.apply_sequence(scramble)?;
            }
            print!("{}", render::render_net(&cube, color && !plain));
        }
    }

    Ok(())
}

struct SearchRequest {
    table: PathBuf,
    id: String,
    max_depth: usize,
    moves: Vec<String>,
    sequential: bool,
    progress: bool,
    color: bool,
}

fn run_search(
    request: &SearchRequest,
    goal: &dyn Goal,
    settings: &Settings,
) -> color_eyre::Result<()> {
    let table = ScrambleTable::load(&request.table)?;
    let scramble = table
        .scramble(&request.id)
        .ok_or_else(|| eyre!("ID {} not found in {}", request.id, request.table.display()))?;
    info!("Loaded {} scrambles from {}", table.len(), table.name());

    let mut cube = CubeState::new(table.size())?;
    cube.apply_sequence(scramble)?;

    let n = table.size();
    println!("ID: {}", request.id);
    println!("MaxDepth: {}", request.max_depth);
    println!("MoveSet: {}", request.moves.join(" "));
    println!("\n{n}x{n}x{n} Cube - {scramble}\n");
    print!("{}", render::render_net(&cube, request.color));
    println!("\nUp Face\n");
    print!("{}", render::render_face(&cube, Face::U, request.color));
    println!();

    let mut searcher = Searcher::new(cube, &request.moves[..])?.with_max_depth(request.max_depth);
    if let Some(time_limit) = settings.time_limit() {
        searcher = searcher.with_time_limit(time_limit);
    }
    let total = searcher.node_count();
    println!("Total nodes to explore: {total}");

    let reporter = if request.progress {
        let (sink, rx) = ProgressSink::bounded(settings.progress_capacity);
        searcher = searcher.with_progress(sink);
        let bar = progress::progress_bar(total)?;
        Some(progress::spawn_reporter(rx, bar, settings.progress_interval()))
    } else {
        None
    };

    let outcome = if request.sequential {
        searcher.solve_sequential(goal)
    } else {
        searcher.solve(goal)
    };
    // The reporter stops once the last progress sender is gone
    drop(searcher);
    if let Some(reporter) = reporter {
        reporter
            .join()
            .ok()
            .ok_or_eyre("The progress reporter panicked")?;
    }
    let SearchOutcome {
        solutions,
        nodes_visited,
        elapsed,
    } = outcome?;

    #[allow(clippy::cast_precision_loss)]
    let throughput = nodes_visited as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    println!("Elapsed time: {elapsed:?}");
    println!("Nodes per second: {throughput:.2}");

    let rows = export::canonicalize(&solutions, table.size());
    println!("Found {} solution(s):\n", rows.len());
    for (i, row) in rows.iter().enumerate() {
        let prefix = if row.prefix.is_empty() {
            String::new()
        } else {
            format!("({}) ", row.prefix)
        };
        println!("{:2} [{}]: {prefix}{}", i + 1, row.len(), row.algorithm());
    }
    println!();

    let summary = RunSummary {
        table: table.name().to_owned(),
        id: request.id.clone(),
        scramble: scramble.to_owned(),
        max_depth: request.max_depth,
        move_set: request.moves.clone(),
        total_nodes: nodes_visited,
        elapsed_ns: elapsed.as_nanos(),
        elapsed: format!("{elapsed:?}"),
        throughput,
        solutions: rows
            .iter()
            .map(|row| {
                if row.prefix.is_empty() {
                    row.algorithm()
                } else {
                    format!("{} {}", row.prefix, row.algorithm())
                }
            })
            .collect(),
    };
    let (csv, json) = export::save(&settings.out_dir, &rows, &summary)?;
    println!("Saved results to {} and {}", csv.display(), json.display());

    Ok(())
}
