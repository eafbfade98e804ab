//! Turning raw search results into a sorted algorithm table on disk.

use color_eyre::eyre::WrapErr;
use cube_core::{Direction, Face, MoveDescriptor, MoveKind, Repeat, parse_move};
use itertools::Itertools;
use search::Solution;
use serde::Serialize;
use std::{
    cmp::Ordering,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// One line of an algorithm table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmRow {
    /// The whole-cube rotation performed before the algorithm, if any.
    pub prefix: String,
    /// The algorithm without any rotation.
    pub moves: Vec<String>,
}

impl AlgorithmRow {
    /// Fold a leading single-layer `U` turn into the `y` rotation turning the
    /// same way, then split off a leading rotation as the prefix and drop
    /// every rotation from the algorithm. `size` is the cube the solution was
    /// found on.
    #[must_use]
    pub fn from_solution(solution: &Solution, size: usize) -> AlgorithmRow {
        let mut moves = solution.moves().to_vec();
        if let Some(first) = moves.first_mut()
            && let Some(rotation) = up_turn_as_rotation(first, size)
        {
            *first = rotation;
        }

        let prefix = moves
            .first()
            .filter(|token| is_rotation(token))
            .cloned()
            .unwrap_or_default();
        moves.retain(|token| !is_rotation(token));
        AlgorithmRow { prefix, moves }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn algorithm(&self) -> String {
        self.moves.join(" ")
    }

    /// Shorter algorithms first, then by prefix, then by the algorithm text.
    fn table_order(&self, other: &AlgorithmRow) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.prefix.cmp(&other.prefix))
            .then_with(|| self.algorithm().cmp(&other.algorithm()))
    }
}

/// The `y` rotation for a token turning only the U layer, in any spelling.
fn up_turn_as_rotation(token: &str, size: usize) -> Option<String> {
    let descriptor = parse_move(token, size).ok()?;
    if descriptor.kind != MoveKind::Turn || descriptor.face != Face::U || descriptor.width != 1 {
        return None;
    }
    let direction = match descriptor.repeat {
        Repeat::Single => descriptor.direction,
        Repeat::Double => Direction::Clockwise,
    };
    let rotation = MoveDescriptor {
        kind: MoveKind::Rotation,
        width: size,
        direction,
        ..descriptor
    };
    Some(rotation.to_string())
}

fn is_rotation(token: &str) -> bool {
    token.starts_with(['x', 'y', 'z'])
}

/// Canonical rows for every solution found on a cube of `size` layers, in
/// table order.
#[must_use]
pub fn canonicalize(solutions: &[Solution], size: usize) -> Vec<AlgorithmRow> {
    solutions
        .iter()
        .map(|solution| AlgorithmRow::from_solution(solution, size))
        .sorted_by(AlgorithmRow::table_order)
        .collect()
}

/// Everything about a search run worth keeping next to its algorithm table.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub table: String,
    pub id: String,
    pub scramble: String,
    pub max_depth: usize,
    pub move_set: Vec<String>,
    pub total_nodes: u64,
    pub elapsed_ns: u128,
    pub elapsed: String,
    pub throughput: f64,
    pub solutions: Vec<String>,
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

pub fn write_csv(rows: &[AlgorithmRow], out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "length,prefix,algorithm")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{}",
            row.len(),
            csv_field(&row.prefix),
            csv_field(&row.algorithm())
        )?;
    }
    Ok(())
}

/// Write `<out_dir>/<table>/<id>.csv` and `<out_dir>/<table>/<id>.json`,
/// returning both paths.
pub fn save(
    out_dir: &Path,
    rows: &[AlgorithmRow],
    summary: &RunSummary,
) -> color_eyre::Result<(PathBuf, PathBuf)> {
    let dir = out_dir.join(&summary.table);
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create the directory {}", dir.display()))?;

    let csv_path = dir.join(format!("{}.csv", summary.id));
    let mut csv = BufWriter::new(
        fs::File::create(&csv_path)
            .wrap_err_with(|| format!("Failed to create {}", csv_path.display()))?,
    );
    write_csv(rows, &mut csv)?;
    csv.flush()?;

    let json_path = dir.join(format!("{}.json", summary.id));
    fs::write(&json_path, serde_json::to_string_pretty(summary)?)
        .wrap_err_with(|| format!("Failed to write {}", json_path.display()))?;

    Ok((csv_path, json_path))
}
