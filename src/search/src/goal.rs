use cube_core::{CubeState, Face};

/// A predicate over cube states that marks the end of a search path.
///
/// Goals are evaluated concurrently by every search worker, hence `Sync`.
/// Any `Fn(&CubeState) -> bool + Sync` closure is a goal.
pub trait Goal: Sync {
    fn is_satisfied(&self, cube: &CubeState) -> bool;
}

impl<F: Fn(&CubeState) -> bool + Sync> Goal for F {
    fn is_satisfied(&self, cube: &CubeState) -> bool {
        self(cube)
    }
}

/// Every sticker is on its home face.
#[derive(Debug, Copy, Clone, Default)]
pub struct Solved;

impl Goal for Solved {
    fn is_satisfied(&self, cube: &CubeState) -> bool {
        cube.is_solved()
    }
}

/// Every face shows one colour, in any orientation of the cube.
#[derive(Debug, Copy, Clone, Default)]
pub struct UniformFaces;

impl Goal for UniformFaces {
    fn is_satisfied(&self, cube: &CubeState) -> bool {
        cube.faces_uniform()
    }
}

/// The outer layer of the given face is solved, whatever the rest of the cube
/// looks like.
#[derive(Debug, Copy, Clone)]
pub struct LayerSolved(pub Face);

impl Goal for LayerSolved {
    fn is_satisfied(&self, cube: &CubeState) -> bool {
        cube.layer_solved(self.0)
    }
}
