use crate::{cancel::StopSignal, goal::Goal, progress::ProgressSink};
use cube_core::{CubeState, Op};
use std::ops::ControlFlow;

/// Why a branch stopped before exploring everything.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupted {
    /// A sibling worker failed.
    Aborted,
    Cancelled,
    TimedOut,
}

/// Everything a worker owns while exploring the paths that start with one
/// root move.
#[derive(Debug)]
pub struct Branch<'a> {
    /// The worker's private copy of the initial state.
    pub cube: CubeState,
    pub ops: &'a [Op],
    /// Index into `ops` of the first move of every path in this branch.
    pub root: usize,
    pub max_depth: usize,
}

/// The paths a branch found, as indices into its ops.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BranchReport {
    pub solutions: Vec<Vec<usize>>,
    pub nodes_visited: u64,
}

/// Per-node bookkeeping shared by every worker of a search: progress ticks and
/// stop conditions.
#[derive(Debug)]
pub struct Monitor<'a> {
    progress: Option<&'a ProgressSink>,
    stop: &'a StopSignal,
}

impl<'a> Monitor<'a> {
    pub(crate) fn new(progress: Option<&'a ProgressSink>, stop: &'a StopSignal) -> Self {
        Monitor { progress, stop }
    }

    /// Record a visited node. `nodes_visited` is the worker's running count
    /// including this node.
    #[inline]
    pub fn visit(&self, nodes_visited: u64) -> ControlFlow<Interrupted> {
        if let Some(progress) = self.progress {
            progress.tick();
        }
        match self.stop.check(nodes_visited) {
            Some(interrupted) => ControlFlow::Break(interrupted),
            None => ControlFlow::Continue(()),
        }
    }
}

/// A way of enumerating every goal-satisfying path of a branch.
pub trait BranchSearch: Sync {
    /// Find every path of length `1..=branch.max_depth` that starts with the
    /// root move and ends in a state satisfying `goal`.
    ///
    /// # Errors
    ///
    /// If the monitor asks to stop before the branch is exhausted.
    fn explore<G: Goal + ?Sized>(
        &self,
        branch: Branch<'_>,
        goal: &G,
        monitor: &Monitor<'_>,
    ) -> Result<BranchReport, Interrupted>;
}

/// Depth-first search that turns one cube in place and undoes every move on
/// the way back up, so memory stays proportional to the depth.
///
/// A move is never tried directly after a move about the same face.
#[derive(Debug, Copy, Clone, Default)]
pub struct Backtracking;

struct BacktrackingMutable {
    cube: CubeState,
    path: Vec<usize>,
    solutions: Vec<Vec<usize>>,
    nodes_visited: u64,
}

impl Backtracking {
    fn descend<G: Goal + ?Sized>(
        mutable: &mut BacktrackingMutable,
        ops: &[Op],
        max_depth: usize,
        goal: &G,
        monitor: &Monitor<'_>,
    ) -> ControlFlow<Interrupted> {
        mutable.nodes_visited += 1;
        if let ControlFlow::Break(interrupted) = monitor.visit(mutable.nodes_visited) {
            return ControlFlow::Break(interrupted);
        }

        if goal.is_satisfied(&mutable.cube) {
            mutable.solutions.push(mutable.path.clone());
        }
        if mutable.path.len() >= max_depth {
            return ControlFlow::Continue(());
        }

        let Some(&last) = mutable.path.last() else {
            return ControlFlow::Continue(());
        };
        let last_face = ops[last].face();
        for (i, op) in ops.iter().enumerate() {
            if op.face() == last_face {
                continue;
            }
            op.apply(&mut mutable.cube);
            mutable.path.push(i);
            let flow = Self::descend(mutable, ops, max_depth, goal, monitor);
            mutable.path.pop();
            op.undo(&mut mutable.cube);
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    }
}

impl BranchSearch for Backtracking {
    fn explore<G: Goal + ?Sized>(
        &self,
        branch: Branch<'_>,
        goal: &G,
        monitor: &Monitor<'_>,
    ) -> Result<BranchReport, Interrupted> {
        let Branch {
            mut cube,
            ops,
            root,
            max_depth,
        } = branch;
        if max_depth == 0 {
            return Ok(BranchReport::default());
        }

        ops[root].apply(&mut cube);
        let mut path = Vec::with_capacity(max_depth);
        path.push(root);
        let mut mutable = BacktrackingMutable {
            cube,
            path,
            solutions: vec![],
            nodes_visited: 0,
        };
        match Self::descend(&mut mutable, ops, max_depth, goal, monitor) {
            ControlFlow::Continue(()) => Ok(BranchReport {
                solutions: mutable.solutions,
                nodes_visited: mutable.nodes_visited,
            }),
            ControlFlow::Break(interrupted) => Err(interrupted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CancellationToken, goal::Solved};
    use cube_core::compile_move_set;

    fn explore(scramble: &str, tokens: &[&str], root: usize, max_depth: usize) -> BranchReport {
        let mut cube = CubeState::new(3).unwrap();
        cube.apply_sequence(scramble).unwrap();
        let ops = compile_move_set(tokens, 3).unwrap();
        let stop = StopSignal::default();
        let branch = Branch {
            cube,
            ops: &ops,
            root,
            max_depth,
        };
        Backtracking
            .explore(branch, &Solved, &Monitor::new(None, &stop))
            .unwrap()
    }

    #[test]
    fn root_is_checked_at_depth_one() {
        let report = explore("R", &["R'", "U"], 0, 1);
        assert_eq!(report.solutions, vec![vec![0]]);
        assert_eq!(report.nodes_visited, 1);
    }

    #[test]
    fn search_continues_below_a_solution() {
        // R' solves the scramble, the paths below it are still visited
        let report = explore("R", &["R'", "U", "U'"], 0, 3);
        assert_eq!(report.solutions, vec![vec![0]]);
        assert_eq!(report.nodes_visited, 1 + 2 + 2);
    }

    #[test]
    fn same_face_is_never_repeated() {
        let report = explore("R2", &["R", "R'"], 0, 5);
        assert!(report.solutions.is_empty());
        assert_eq!(report.nodes_visited, 1);
    }

    #[test]
    fn zero_depth_explores_nothing() {
        let report = explore("", &["R"], 0, 0);
        assert_eq!(report, BranchReport::default());
    }

    #[test]
    fn cancellation_stops_the_branch() {
        let token = CancellationToken::new();
        token.cancel();
        let stop = StopSignal::new(Some(token), None);
        let ops = compile_move_set(&["R", "U"], 3).unwrap();
        let branch = Branch {
            cube: CubeState::new(3).unwrap(),
            ops: &ops,
            root: 0,
            max_depth: 4,
        };
        assert_eq!(
            Backtracking.explore(branch, &Solved, &Monitor::new(None, &stop)),
            Err(Interrupted::Cancelled)
        );
    }
}
