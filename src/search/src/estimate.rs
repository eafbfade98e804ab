use cube_core::{Face, Op};

/// The exact number of nodes a search over `ops` visits up to `max_depth`,
/// where a node is any path of length 1..=`max_depth` with no two
/// consecutive ops about the same face.
///
/// Saturates at `u128::MAX`.
#[must_use]
pub fn count_nodes(ops: &[Op], max_depth: usize) -> u128 {
    let mut per_face = [0u128; Face::ALL.len()];
    for op in ops {
        per_face[op.face().index()] += 1;
    }

    // Paths of the current length, by the face of their last op
    let mut ending = per_face;
    let mut total = 0u128;
    for depth in 1..=max_depth {
        let paths = ending.iter().fold(0u128, |acc, &n| acc.saturating_add(n));
        total = total.saturating_add(paths);
        if depth == max_depth {
            break;
        }
        for (end, &choices) in ending.iter_mut().zip(&per_face) {
            *end = choices.saturating_mul(paths.saturating_sub(*end));
        }
    }
    total
}
