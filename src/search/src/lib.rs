#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Exhaustive bounded-depth search for move sequences that bring a cube into
//! a goal state.

pub mod cancel;
pub mod estimate;
pub mod goal;
pub mod progress;
pub mod solver;
pub mod strategy;

pub use cancel::CancellationToken;
pub use estimate::count_nodes;
pub use goal::{Goal, LayerSolved, Solved, UniformFaces};
pub use progress::{ProgressSink, Tick};
pub use solver::{SearchError, SearchOutcome, Searcher, Solution};
pub use strategy::{Backtracking, Branch, BranchReport, BranchSearch, Interrupted, Monitor};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}
