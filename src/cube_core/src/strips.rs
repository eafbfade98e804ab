//! Adjacency between a face and the four neighbouring faces whose edge strips
//! travel with it when it turns.
//!
//! Every face is stored row-major as seen from outside the cube, with the
//! usual unfolded-net orientation: U's bottom row touches F, D's top row
//! touches F, L/F/R/B rows run left to right around the equator, and B's
//! column 0 touches R.

use crate::face::Face;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Line {
    Row,
    Col,
}

/// Which row or column of the neighbour belongs to turned layer `layer`.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Depth {
    /// Index `layer`.
    Near,
    /// Index `n - 1 - layer`.
    Far,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Strip {
    pub(crate) face: Face,
    line: Line,
    depth: Depth,
    reversed: bool,
}

impl Strip {
    const fn new(face: Face, line: Line, depth: Depth, reversed: bool) -> Self {
        Strip {
            face,
            line,
            depth,
            reversed,
        }
    }

    /// Buffer offset of the `j`th sticker of this strip for the given layer.
    #[inline]
    pub(crate) fn offset(self, size: usize, layer: usize, j: usize) -> usize {
        let k = match self.depth {
            Depth::Near => layer,
            Depth::Far => size - 1 - layer,
        };
        let j = if self.reversed { size - 1 - j } else { j };
        let (row, col) = match self.line {
            Line::Row => (k, j),
            Line::Col => (j, k),
        };
        self.face.index() * size * size + row * size + col
    }
}

use Depth::{Far, Near};
use Line::{Col, Row};

/// For each face (indexed by `Face::index`), the strips a clockwise turn
/// carries, in cycle order: sticker `j` of strip `i` moves to sticker `j` of
/// strip `i + 1`, and strip 3 wraps around to strip 0.
pub(crate) const CYCLES: [[Strip; 4]; 6] = [
    // U: F -> L -> B -> R
    [
        Strip::new(Face::F, Row, Near, false),
        Strip::new(Face::L, Row, Near, false),
        Strip::new(Face::B, Row, Near, false),
        Strip::new(Face::R, Row, Near, false),
    ],
    // R: U -> B -> D -> F
    [
        Strip::new(Face::U, Col, Far, false),
        Strip::new(Face::B, Col, Near, true),
        Strip::new(Face::D, Col, Far, false),
        Strip::new(Face::F, Col, Far, false),
    ],
    // F: U -> R -> D -> L
    [
        Strip::new(Face::U, Row, Far, false),
        Strip::new(Face::R, Col, Near, false),
        Strip::new(Face::D, Row, Near, true),
        Strip::new(Face::L, Col, Far, true),
    ],
    // D: F -> R -> B -> L
    [
        Strip::new(Face::F, Row, Far, false),
        Strip::new(Face::R, Row, Far, false),
        Strip::new(Face::B, Row, Far, false),
        Strip::new(Face::L, Row, Far, false),
    ],
    // L: U -> F -> D -> B
    [
        Strip::new(Face::U, Col, Near, false),
        Strip::new(Face::F, Col, Near, false),
        Strip::new(Face::D, Col, Near, false),
        Strip::new(Face::B, Col, Far, true),
    ],
    // B: U -> L -> D -> R
    [
        Strip::new(Face::U, Row, Near, false),
        Strip::new(Face::L, Col, Near, true),
        Strip::new(Face::D, Row, Far, true),
        Strip::new(Face::R, Col, Far, false),
    ],
];
