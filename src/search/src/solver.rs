use crate::{
    cancel::{CancellationToken, StopSignal},
    estimate::count_nodes,
    goal::Goal,
    progress::ProgressSink,
    start,
    strategy::{Backtracking, Branch, BranchReport, BranchSearch, Interrupted, Monitor},
    success, working,
};
use cube_core::{CubeState, NotationError, Op, compile_move_set};
use itertools::Itertools;
use log::{debug, info};
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Mutex, PoisonError},
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("The move set is empty")]
    EmptyMoveSet,
    #[error("The move `{0}` appears more than once in the move set")]
    DuplicateMove(String),
    #[error("The maximum depth must be at least 1")]
    InvalidDepth,
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("The worker searching from `{root}` panicked: {message}")]
    WorkerPanicked { root: String, message: String },
    #[error("The search was cancelled")]
    Cancelled,
    #[error("Time limit exceeded")]
    TimeLimitExceeded,
}

impl From<Interrupted> for SearchError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            // A worker only aborts because a sibling failed, and that failure
            // is what gets reported
            Interrupted::Aborted | Interrupted::Cancelled => SearchError::Cancelled,
            Interrupted::TimedOut => SearchError::TimeLimitExceeded,
        }
    }
}

/// A goal-satisfying move sequence, in the tokens of the move set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Solution(Vec<String>);

impl Solution {
    #[must_use]
    pub fn moves(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply the sequence to `cube`.
    ///
    /// # Errors
    ///
    /// If a token does not fit the size of `cube`.
    pub fn apply_to(&self, cube: &mut CubeState) -> Result<(), NotationError> {
        cube.apply_sequence(&self.to_string())
    }
}

impl From<Vec<String>> for Solution {
    fn from(moves: Vec<String>) -> Self {
        Solution(moves)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Every solution found, in no particular order.
    pub solutions: Vec<Solution>,
    pub nodes_visited: u64,
    pub elapsed: Duration,
}

/// Exhaustive search for every move sequence of bounded length that takes a
/// cube into a goal state.
///
/// Every path starting with a given move of the move set is one branch. The
/// parallel search explores each branch on its own scoped thread with its own
/// copy of the cube and merges what the branch found into the shared result
/// once, when the branch is done.
pub struct Searcher<S: BranchSearch = Backtracking> {
    cube: CubeState,
    ops: Vec<Op>,
    max_depth: usize,
    progress: Option<ProgressSink>,
    cancellation: Option<CancellationToken>,
    time_limit: Option<Duration>,
    strategy: S,
}

impl Searcher {
    /// Prepare a search from `cube` over a move set.
    ///
    /// # Errors
    ///
    /// If the move set is empty, contains a token twice, or contains a token
    /// that is not valid notation for the size of `cube`.
    pub fn new<T: AsRef<str>>(cube: CubeState, tokens: &[T]) -> Result<Self, SearchError> {
        if tokens.is_empty() {
            return Err(SearchError::EmptyMoveSet);
        }
        if let Some(duplicate) = tokens.iter().map(|token| token.as_ref()).duplicates().next() {
            return Err(SearchError::DuplicateMove(duplicate.to_owned()));
        }
        let ops = compile_move_set(tokens, cube.size())?;
        Ok(Searcher {
            cube,
            ops,
            max_depth: DEFAULT_MAX_DEPTH,
            progress: None,
            cancellation: None,
            time_limit: None,
            strategy: Backtracking,
        })
    }
}

impl<S: BranchSearch> Searcher<S> {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Send a tick for every visited node.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Explore branches with another strategy.
    #[must_use]
    pub fn with_strategy<T: BranchSearch>(self, strategy: T) -> Searcher<T> {
        Searcher {
            cube: self.cube,
            ops: self.ops,
            max_depth: self.max_depth,
            progress: self.progress,
            cancellation: self.cancellation,
            time_limit: self.time_limit,
            strategy,
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The exact number of nodes a complete search visits.
    #[must_use]
    pub fn node_count(&self) -> u128 {
        count_nodes(&self.ops, self.max_depth)
    }

    fn branch(&self, root: usize) -> Branch<'_> {
        Branch {
            cube: self.cube.clone(),
            ops: &self.ops,
            root,
            max_depth: self.max_depth,
        }
    }

    fn solution_from_path(&self, path: &[usize]) -> Solution {
        Solution(
            path.iter()
                .map(|&i| self.ops[i].token().to_owned())
                .collect(),
        )
    }

    fn check_depth(&self) -> Result<(), SearchError> {
        if self.max_depth == 0 {
            Err(SearchError::InvalidDepth)
        } else {
            Ok(())
        }
    }

    fn stop_signal(&self, start: Instant) -> StopSignal {
        StopSignal::new(
            self.cancellation.clone(),
            self.time_limit.map(|limit| start + limit),
        )
    }

    fn finish(&self, paths: &[Vec<usize>], nodes_visited: u64, start: Instant) -> SearchOutcome {
        let elapsed = start.elapsed();
        let solutions = paths
            .iter()
            .map(|path| self.solution_from_path(path))
            .collect_vec();
        info!(
            success!("Found {} solutions in {:.3}s after visiting {} nodes"),
            solutions.len(),
            elapsed.as_secs_f64(),
            nodes_visited
        );
        SearchOutcome {
            solutions,
            nodes_visited,
            elapsed,
        }
    }

    /// Search every branch in parallel, one scoped thread per move of the
    /// move set.
    ///
    /// # Errors
    ///
    /// If the maximum depth is zero, the search is cancelled or runs out of
    /// time, or a worker panics. A panicking worker stops its siblings.
    pub fn solve<G: Goal + ?Sized>(&self, goal: &G) -> Result<SearchOutcome, SearchError> {
        self.check_depth()?;
        info!(
            start!("Searching {} branches in parallel up to depth {}"),
            self.ops.len(),
            self.max_depth
        );
        let start = Instant::now();
        let stop = self.stop_signal(start);
        let monitor = Monitor::new(self.progress.as_ref(), &stop);
        let merged: Mutex<(Vec<Vec<usize>>, u64)> = Mutex::new((vec![], 0));

        let results = thread::scope(|s| {
            let handles = (0..self.ops.len())
                .map(|root| {
                    let branch = self.branch(root);
                    let (stop, monitor, merged) = (&stop, &monitor, &merged);
                    s.spawn(move || {
                        let branch_start = Instant::now();
                        let explored = panic::catch_unwind(AssertUnwindSafe(|| {
                            self.strategy.explore(branch, goal, monitor)
                        }));
                        match explored {
                            Ok(Ok(BranchReport {
                                solutions,
                                nodes_visited,
                            })) => {
                                debug!(
                                    working!("Branch {} traversed {} nodes in {:.3}s"),
                                    self.ops[root],
                                    nodes_visited,
                                    branch_start.elapsed().as_secs_f64()
                                );
                                let mut merged =
                                    merged.lock().unwrap_or_else(PoisonError::into_inner);
                                merged.0.extend(solutions);
                                merged.1 += nodes_visited;
                                Ok(())
                            }
                            Ok(Err(interrupted)) => Err(SearchError::from(interrupted)),
                            Err(payload) => {
                                stop.abort();
                                Err(SearchError::WorkerPanicked {
                                    root: self.ops[root].token().to_owned(),
                                    message: panic_message(payload.as_ref()),
                                })
                            }
                        }
                    })
                })
                .collect_vec();

            handles
                .into_iter()
                .enumerate()
                .map(|(root, handle)| {
                    handle.join().unwrap_or_else(|payload| {
                        stop.abort();
                        Err(SearchError::WorkerPanicked {
                            root: self.ops[root].token().to_owned(),
                            message: panic_message(payload.as_ref()),
                        })
                    })
                })
                .collect_vec()
        });

        if let Some(error) = first_failure(results) {
            return Err(error);
        }

        let (paths, nodes_visited) = merged.into_inner().unwrap_or_else(PoisonError::into_inner);
        Ok(self.finish(&paths, nodes_visited, start))
    }

    /// Search every branch one after the other on the calling thread. Finds
    /// the same solutions as [`Searcher::solve`].
    ///
    /// # Errors
    ///
    /// If the maximum depth is zero, or the search is cancelled or runs out of
    /// time.
    pub fn solve_sequential<G: Goal + ?Sized>(
        &self,
        goal: &G,
    ) -> Result<SearchOutcome, SearchError> {
        self.check_depth()?;
        info!(
            start!("Searching {} branches sequentially up to depth {}"),
            self.ops.len(),
            self.max_depth
        );
        let start = Instant::now();
        let stop = self.stop_signal(start);
        let monitor = Monitor::new(self.progress.as_ref(), &stop);

        let mut paths = vec![];
        let mut nodes_visited = 0;
        for root in 0..self.ops.len() {
            let branch_start = Instant::now();
            let report = self.strategy.explore(self.branch(root), goal, &monitor)?;
            debug!(
                working!("Branch {} traversed {} nodes in {:.3}s"),
                self.ops[root],
                report.nodes_visited,
                branch_start.elapsed().as_secs_f64()
            );
            paths.extend(report.solutions);
            nodes_visited += report.nodes_visited;
        }
        Ok(self.finish(&paths, nodes_visited, start))
    }
}

/// The most significant error among the workers' results: a panic beats an
/// interruption, which in turn only happens when nothing panicked.
fn first_failure(results: Vec<Result<(), SearchError>>) -> Option<SearchError> {
    let mut failure = None;
    for error in results.into_iter().filter_map(Result::err) {
        let panicked = matches!(error, SearchError::WorkerPanicked { .. });
        if failure.is_none()
            || (panicked && !matches!(failure, Some(SearchError::WorkerPanicked { .. })))
        {
            failure = Some(error);
        }
    }
    failure
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_sets_are_validated() {
        let cube = CubeState::new(3).unwrap();
        let empty: [&str; 0] = [];
        assert!(matches!(
            Searcher::new(cube.clone(), &empty),
            Err(SearchError::EmptyMoveSet)
        ));
        assert!(matches!(
            Searcher::new(cube.clone(), &["R", "U", "R"]),
            Err(SearchError::DuplicateMove(token)) if token == "R"
        ));
        assert!(matches!(
            Searcher::new(cube.clone(), &["R", "4Rw"]),
            Err(SearchError::Notation(NotationError::WidthTooLarge { .. }))
        ));
        let searcher = Searcher::new(cube, &["R", "R'"]).unwrap();
        assert_eq!(searcher.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(searcher.ops().len(), 2);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let searcher = Searcher::new(CubeState::new(2).unwrap(), &["R"])
            .unwrap()
            .with_max_depth(0);
        assert!(matches!(
            searcher.solve(&crate::Solved),
            Err(SearchError::InvalidDepth)
        ));
        assert!(matches!(
            searcher.solve_sequential(&crate::Solved),
            Err(SearchError::InvalidDepth)
        ));
    }

    #[test]
    fn panics_take_precedence() {
        let panicked = || SearchError::WorkerPanicked {
            root: "R".to_owned(),
            message: "boom".to_owned(),
        };
        assert!(first_failure(vec![Ok(()), Ok(())]).is_none());
        assert!(matches!(
            first_failure(vec![Err(SearchError::Cancelled), Err(panicked()), Ok(())]),
            Some(SearchError::WorkerPanicked { .. })
        ));
        assert!(matches!(
            first_failure(vec![Err(panicked()), Err(SearchError::TimeLimitExceeded)]),
            Some(SearchError::WorkerPanicked { .. })
        ));
        assert!(matches!(
            first_failure(vec![Ok(()), Err(SearchError::TimeLimitExceeded)]),
            Some(SearchError::TimeLimitExceeded)
        ));
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&3), "unknown panic payload");
    }

    #[test]
    fn solutions_display_as_sequences() {
        let solution = Solution::from(vec!["R".to_owned(), "U'".to_owned()]);
        assert_eq!(solution.to_string(), "R U'");
        assert_eq!(solution.len(), 2);
        let mut cube = CubeState::new(3).unwrap();
        solution.apply_to(&mut cube).unwrap();
        cube.apply_sequence("U R'").unwrap();
        assert!(cube.is_solved());
    }
}
