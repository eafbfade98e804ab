use crate::{
    face::{Direction, Face},
    notation::{NotationError, parse_move},
    ops::Transition,
    strips::CYCLES,
};
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("A cube must have at least one layer")]
    InvalidSize,
    #[error("Expected {expected} stickers for a cube of size {size}, got {actual}")]
    InvalidStickerCount {
        size: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Turn width {width} is outside of [1, {size}]")]
    PreconditionViolation { width: usize, size: usize },
    #[error("A move may only repeat a quarter turn one to three times, got {0}")]
    InvalidQuarterTurns(u8),
    #[error("The move was compiled for a cube of size {expected}, not {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// The sticker state of an n×n×n cube.
///
/// All six faces live in one buffer of `6·n²` stickers, face-major in
/// `Face::ALL` order and row-major within a face. A sticker holds the identity
/// of the face it belongs to when the cube is solved.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CubeState {
    size: usize,
    stickers: Box<[Face]>,
}

impl CubeState {
    /// Create a solved cube.
    ///
    /// # Errors
    ///
    /// If `size` is zero.
    pub fn new(size: usize) -> Result<Self, CubeError> {
        if size == 0 {
            return Err(CubeError::InvalidSize);
        }
        let stickers = Face::ALL
            .into_iter()
            .flat_map(|face| std::iter::repeat_n(face, size * size))
            .collect();
        Ok(CubeState { size, stickers })
    }

    /// Create a cube from a raw sticker buffer laid out like
    /// [`CubeState::stickers`]. Whether the state is reachable by turning is
    /// not checked.
    ///
    /// # Errors
    ///
    /// If `size` is zero or `stickers` does not hold exactly `6·size²` values.
    pub fn from_stickers(size: usize, stickers: Vec<Face>) -> Result<Self, CubeError> {
        if size == 0 {
            return Err(CubeError::InvalidSize);
        }
        let expected = 6 * size * size;
        if stickers.len() != expected {
            return Err(CubeError::InvalidStickerCount {
                size,
                expected,
                actual: stickers.len(),
            });
        }
        Ok(CubeState {
            size,
            stickers: stickers.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn stickers(&self) -> &[Face] {
        &self.stickers
    }

    /// The n² stickers of one face, row-major.
    #[must_use]
    pub fn face(&self, face: Face) -> &[Face] {
        let area = self.size * self.size;
        &self.stickers[face.index() * area..(face.index() + 1) * area]
    }

    /// # Panics
    ///
    /// If `row` or `col` is not less than the cube size.
    #[must_use]
    pub fn sticker(&self, face: Face, row: usize, col: usize) -> Face {
        assert!(row < self.size && col < self.size);
        self.face(face)[row * self.size + col]
    }

    /// Every sticker sits on the face it belongs to.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL
            .into_iter()
            .all(|face| self.face(face).iter().all(|&sticker| sticker == face))
    }

    /// Every face shows a single colour, whichever it is. Unlike
    /// [`CubeState::is_solved`] this accepts a solved cube that has been
    /// reoriented by whole-cube rotations.
    #[must_use]
    pub fn faces_uniform(&self) -> bool {
        Face::ALL
            .into_iter()
            .all(|face| self.face(face).iter().all_equal())
    }

    /// `face` is solved and so is the strip of each neighbour that turns with
    /// it, i.e. the outer layer of `face` is in its solved position.
    #[must_use]
    pub fn layer_solved(&self, face: Face) -> bool {
        let n = self.size;
        self.face(face).iter().all(|&sticker| sticker == face)
            && CYCLES[face.index()].iter().all(|strip| {
                (0..n).all(|j| self.stickers[strip.offset(n, 0, j)] == strip.face)
            })
    }

    /// Rotate the n×n block of a single face by a quarter turn, leaving every
    /// other sticker in place. Clockwise sends (row, col) to (col, n-1-row).
    pub fn rotate_face_block(&mut self, face: Face, direction: Direction) {
        let n = self.size;
        let area = n * n;
        let block = &mut self.stickers[face.index() * area..(face.index() + 1) * area];
        for r in 0..n / 2 {
            for c in r..n - 1 - r {
                let ring = [
                    r * n + c,
                    c * n + (n - 1 - r),
                    (n - 1 - r) * n + (n - 1 - c),
                    (n - 1 - c) * n + r,
                ];
                cycle(block, ring, direction);
            }
        }
    }

    /// Turn the `width` layers nearest to `face` by a quarter turn. A turn of
    /// the full width also turns the opposite face block, which makes it a
    /// whole-cube rotation.
    ///
    /// # Errors
    ///
    /// If `width` is outside of `[1, size]`.
    pub fn turn(
        &mut self,
        face: Face,
        width: usize,
        direction: Direction,
    ) -> Result<(), CubeError> {
        if width == 0 || width > self.size {
            return Err(CubeError::PreconditionViolation {
                width,
                size: self.size,
            });
        }
        self.turn_unchecked(face, width, direction);
        Ok(())
    }

    /// [`CubeState::turn`] without the width check. Callers establish the
    /// width when compiling a move.
    #[inline]
    pub(crate) fn turn_unchecked(&mut self, face: Face, width: usize, direction: Direction) {
        debug_assert!((1..=self.size).contains(&width));
        let n = self.size;
        self.rotate_face_block(face, direction);
        if width == n {
            self.rotate_face_block(face.opposite(), direction.inverse());
        }
        let strips = CYCLES[face.index()];
        for layer in 0..width {
            for j in 0..n {
                let ring = strips.map(|strip| strip.offset(n, layer, j));
                cycle(&mut self.stickers, ring, direction);
            }
        }
    }

    /// Apply a single notated move such as `"R'"` or `"3Rw2"`.
    ///
    /// # Errors
    ///
    /// If the token is not valid notation for this cube size.
    pub fn apply_move(&mut self, token: &str) -> Result<(), NotationError> {
        let descriptor = parse_move(token, self.size)?;
        Transition::from(descriptor).run(self);
        Ok(())
    }

    /// Apply a whitespace separated move sequence. Parentheses are ignored, so
    /// `"(U) R U2 R'"` is accepted. Nothing is applied if any token is invalid.
    ///
    /// # Errors
    ///
    /// If any token is not valid notation for this cube size.
    pub fn apply_sequence(&mut self, sequence: &str) -> Result<(), NotationError> {
        let transitions = crate::notation::parse_sequence(sequence, self.size)?
            .into_iter()
            .map(Transition::from)
            .collect_vec();
        for transition in transitions {
            transition.run(self);
        }
        Ok(())
    }
}

/// Move the stickers at `ring[0] -> ring[1] -> ring[2] -> ring[3] -> ring[0]`
/// for a clockwise cycle, the other way around for counter-clockwise.
#[inline]
fn cycle(buf: &mut [Face], ring: [usize; 4], direction: Direction) {
    let [a, b, c, d] = match direction {
        Direction::Clockwise => ring,
        Direction::CounterClockwise => [ring[3], ring[2], ring[1], ring[0]],
    };
    let tmp = buf[d];
    buf[d] = buf[c];
    buf[c] = buf[b];
    buf[b] = buf[a];
    buf[a] = tmp;
}

impl fmt::Display for CubeState {
    /// The unfolded net: U on top, L F R B across the middle, D below.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size;
        let indent = " ".repeat(n * 2);
        let row = |face: Face, r: usize| self.face(face)[r * n..(r + 1) * n].iter().join(" ");
        for r in 0..n {
            writeln!(f, "{indent}{}", row(Face::U, r))?;
        }
        for r in 0..n {
            let line = [Face::L, Face::F, Face::R, Face::B]
                .into_iter()
                .map(|face| row(face, r))
                .join(" ");
            writeln!(f, "{line}")?;
        }
        for r in 0..n {
            writeln!(f, "{indent}{}", row(Face::D, r))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CubeState {{ size: {} }}", self.size)?;
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_cube(size: usize, rng: &mut fastrand::Rng) -> CubeState {
        let stickers = (0..6 * size * size)
            .map(|_| Face::ALL[rng.usize(..6)])
            .collect();
        CubeState::from_stickers(size, stickers).unwrap()
    }

    #[test]
    fn new_cube_is_solved() {
        for size in 1..=7 {
            let cube = CubeState::new(size).unwrap();
            assert!(cube.is_solved());
            assert!(cube.faces_uniform());
            assert_eq!(cube.stickers().len(), 6 * size * size);
            for face in Face::ALL {
                assert!(cube.layer_solved(face));
            }
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(CubeState::new(0), Err(CubeError::InvalidSize));
        assert_eq!(
            CubeState::from_stickers(0, vec![]),
            Err(CubeError::InvalidSize)
        );
    }

    #[test]
    fn sticker_count_is_checked() {
        assert_eq!(
            CubeState::from_stickers(2, vec![Face::U; 23]),
            Err(CubeError::InvalidStickerCount {
                size: 2,
                expected: 24,
                actual: 23
            })
        );
    }

    #[test]
    fn face_block_rotation_has_order_four() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for size in 1..=7 {
            for face in Face::ALL {
                let original = random_cube(size, &mut rng);

                let mut four = original.clone();
                for _ in 0..4 {
                    four.rotate_face_block(face, Direction::Clockwise);
                }
                assert_eq!(four, original);

                let mut twice_cw = original.clone();
                let mut twice_ccw = original.clone();
                for _ in 0..2 {
                    twice_cw.rotate_face_block(face, Direction::Clockwise);
                    twice_ccw.rotate_face_block(face, Direction::CounterClockwise);
                }
                assert_eq!(twice_cw, twice_ccw);

                let mut thrice = original.clone();
                for _ in 0..3 {
                    thrice.rotate_face_block(face, Direction::Clockwise);
                }
                let mut once_ccw = original.clone();
                once_ccw.rotate_face_block(face, Direction::CounterClockwise);
                assert_eq!(thrice, once_ccw);
            }
        }
    }

    #[test]
    fn clockwise_block_rotation_maps_row_to_column() {
        let size = 3;
        let mut rng = fastrand::Rng::with_seed(7);
        let original = random_cube(size, &mut rng);
        let mut rotated = original.clone();
        rotated.rotate_face_block(Face::F, Direction::Clockwise);
        for row in 0..size {
            for col in 0..size {
                assert_eq!(
                    rotated.sticker(Face::F, col, size - 1 - row),
                    original.sticker(Face::F, row, col)
                );
            }
        }
        for face in [Face::U, Face::R, Face::D, Face::L, Face::B] {
            assert_eq!(rotated.face(face), original.face(face));
        }
    }

    #[test]
    fn turn_width_is_checked() {
        let mut cube = CubeState::new(3).unwrap();
        assert_eq!(
            cube.turn(Face::R, 0, Direction::Clockwise),
            Err(CubeError::PreconditionViolation { width: 0, size: 3 })
        );
        assert_eq!(
            cube.turn(Face::R, 4, Direction::Clockwise),
            Err(CubeError::PreconditionViolation { width: 4, size: 3 })
        );
        assert!(cube.is_solved());
        assert!(cube.turn(Face::R, 3, Direction::Clockwise).is_ok());
    }

    #[test]
    fn right_turn_lifts_front_column_onto_up() {
        let mut cube = CubeState::new(3).unwrap();
        cube.turn(Face::R, 1, Direction::Clockwise).unwrap();
        for row in 0..3 {
            assert_eq!(cube.sticker(Face::U, row, 2), Face::F);
            assert_eq!(cube.sticker(Face::U, row, 0), Face::U);
            assert_eq!(cube.sticker(Face::B, row, 0), Face::U);
            assert_eq!(cube.sticker(Face::D, row, 2), Face::B);
            assert_eq!(cube.sticker(Face::F, row, 2), Face::D);
        }
        assert!(cube.layer_solved(Face::L));
        assert!(!cube.layer_solved(Face::R));
    }

    #[test]
    fn display_shows_the_net() {
        let cube = CubeState::new(2).unwrap();
        let expected = "    U U\n    U U\nL L F F R R B B\nL L F F R R B B\n    D D\n    D D\n";
        assert_eq!(cube.to_string(), expected);
    }
}
