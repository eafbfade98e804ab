//! Move notation.
//!
//! A token is `[width] letter [w] [suffix]` where the suffix is any of ``,
//! `'`, `2`, `2'` or `'2`:
//!
//! - `U D R L F B` turn the outer layer, or `width` layers when a width
//!   prefix or a `w` is given (`w` alone means two layers).
//! - `u d r l f b` are two-layer wide turns unless a width prefix says
//!   otherwise.
//! - `M E S` turn the middle layers in the sense of `L D F`.
//! - `x y z` rotate the whole cube in the sense of `R U F`; a width prefix is
//!   ignored.

use crate::{cube::CubeError, face::{Direction, Face}};
use std::{collections::HashMap, fmt, sync::LazyLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("Empty move")]
    Empty,
    #[error("Unknown move letter `{letter}` in `{token}`")]
    UnknownLetter { token: String, letter: char },
    #[error("Invalid width in `{0}`, a width must be a number of at least 2")]
    MalformedWidth(String),
    #[error("The move `{token}` turns {width} layers but the cube only has {size}")]
    WidthTooLarge {
        token: String,
        width: usize,
        size: usize,
    },
    #[error("Malformed move `{0}`")]
    Malformed(String),
    #[error("The slice move `{token}` needs a cube with at least two layers")]
    SliceTooSmall { token: String },
    #[error(transparent)]
    Cube(#[from] CubeError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// `width` layers from `face`, including full-width turns written as
    /// wide moves.
    Turn,
    /// The inner layers between `face` and its opposite, turning in the sense
    /// of `face`.
    Slice,
    /// The whole cube, turning in the sense of `face`.
    Rotation,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Repeat {
    Single,
    Double,
}

impl Repeat {
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Repeat::Single => 1,
            Repeat::Double => 2,
        }
    }
}

/// A parsed move, resolved against a cube size.
///
/// `width` is 1 for slices and the cube size for rotations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveDescriptor {
    pub kind: MoveKind,
    pub face: Face,
    pub width: usize,
    pub direction: Direction,
    pub repeat: Repeat,
}

impl MoveDescriptor {
    /// Build a descriptor directly. Three quarter turns are normalised to one
    /// quarter turn in the opposite direction. The width of slices and
    /// rotations is derived from `size` and `width` is ignored for them.
    ///
    /// # Errors
    ///
    /// If `quarter_turns` is not in 1..=3, or the move does not fit a cube of
    /// `size` layers.
    pub fn new(
        kind: MoveKind,
        face: Face,
        width: usize,
        direction: Direction,
        quarter_turns: u8,
        size: usize,
    ) -> Result<Self, CubeError> {
        let (direction, repeat) = match quarter_turns {
            1 => (direction, Repeat::Single),
            2 => (direction, Repeat::Double),
            3 => (direction.inverse(), Repeat::Single),
            _ => return Err(CubeError::InvalidQuarterTurns(quarter_turns)),
        };
        let width = match kind {
            MoveKind::Turn => width,
            MoveKind::Slice => 1,
            MoveKind::Rotation => size,
        };
        let descriptor = MoveDescriptor {
            kind,
            face,
            width,
            direction,
            repeat,
        };
        descriptor.validate(size)?;
        Ok(descriptor)
    }

    #[must_use]
    pub fn is_slice(&self) -> bool {
        self.kind == MoveKind::Slice
    }

    /// The same move turning the other way.
    #[must_use]
    pub fn inverse(self) -> Self {
        MoveDescriptor {
            direction: self.direction.inverse(),
            ..self
        }
    }

    /// Check that the move can be performed on a cube of `size` layers.
    ///
    /// # Errors
    ///
    /// If the width falls outside of `[1, size]`, a slice is used on a cube
    /// without inner layers, or a rotation does not span the whole cube.
    pub fn validate(&self, size: usize) -> Result<(), CubeError> {
        let valid = match self.kind {
            MoveKind::Turn => (1..=size).contains(&self.width),
            // A slice is composed of a width 1 and a width `size - 1` turn
            MoveKind::Slice => self.width == 1 && size >= 2,
            MoveKind::Rotation => self.width == size && size >= 1,
        };
        if valid {
            Ok(())
        } else {
            Err(CubeError::PreconditionViolation {
                width: match self.kind {
                    MoveKind::Slice => size.saturating_sub(1),
                    MoveKind::Turn | MoveKind::Rotation => self.width,
                },
                size,
            })
        }
    }
}

impl fmt::Display for MoveDescriptor {
    /// The canonical token, e.g. `R`, `Rw'`, `3Rw2`, `M2'` or `x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Slices and rotations about B, R and U have no letter of their own;
        // they are the lettered move about the opposite face turned the other
        // way.
        let (face, direction) = match self.kind {
            MoveKind::Slice if !matches!(self.face, Face::L | Face::D | Face::F) => {
                (self.face.opposite(), self.direction.inverse())
            }
            MoveKind::Rotation if !matches!(self.face, Face::R | Face::U | Face::F) => {
                (self.face.opposite(), self.direction.inverse())
            }
            _ => (self.face, self.direction),
        };
        match self.kind {
            MoveKind::Turn => match self.width {
                1 => write!(f, "{face}")?,
                2 => write!(f, "{face}w")?,
                width => write!(f, "{width}{face}w")?,
            },
            MoveKind::Slice => {
                let letter = match face {
                    Face::L => 'M',
                    Face::D => 'E',
                    _ => 'S',
                };
                write!(f, "{letter}")?;
            }
            MoveKind::Rotation => {
                let letter = match face {
                    Face::R => 'x',
                    Face::U => 'y',
                    _ => 'z',
                };
                write!(f, "{letter}")?;
            }
        }
        if self.repeat == Repeat::Double {
            write!(f, "2")?;
        }
        if direction == Direction::CounterClockwise {
            write!(f, "'")?;
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
enum Letter {
    Face(Face),
    WideFace(Face),
    Slice(Face),
    Rotation(Face),
}

static LETTERS: LazyLock<HashMap<char, Letter>> = LazyLock::new(|| {
    let mut v = HashMap::new();

    for face in Face::ALL {
        v.insert(face.letter(), Letter::Face(face));
        v.insert(face.letter().to_ascii_lowercase(), Letter::WideFace(face));
    }
    v.insert('M', Letter::Slice(Face::L));
    v.insert('E', Letter::Slice(Face::D));
    v.insert('S', Letter::Slice(Face::F));
    v.insert('x', Letter::Rotation(Face::R));
    v.insert('y', Letter::Rotation(Face::U));
    v.insert('z', Letter::Rotation(Face::F));

    v
});

fn parse_suffix(suffix: &str) -> Option<(Direction, Repeat)> {
    match suffix {
        "" => Some((Direction::Clockwise, Repeat::Single)),
        "'" => Some((Direction::CounterClockwise, Repeat::Single)),
        "2" => Some((Direction::Clockwise, Repeat::Double)),
        "2'" | "'2" => Some((Direction::CounterClockwise, Repeat::Double)),
        _ => None,
    }
}

fn parse_width(digits: &str, token: &str) -> Result<usize, NotationError> {
    let malformed = || NotationError::MalformedWidth(token.to_owned());
    if digits.starts_with('0') {
        return Err(malformed());
    }
    match digits.parse::<usize>() {
        Ok(width) if width >= 2 => Ok(width),
        _ => Err(malformed()),
    }
}

/// Parse one move token for a cube of `size` layers.
///
/// # Errors
///
/// If the token does not follow the grammar described in the module
/// documentation or turns more layers than the cube has.
pub fn parse_move(token: &str, size: usize) -> Result<MoveDescriptor, NotationError> {
    if token.is_empty() {
        return Err(NotationError::Empty);
    }
    let malformed = || NotationError::Malformed(token.to_owned());

    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, rest) = token.split_at(digits_end);
    let mut chars = rest.chars();
    let letter_char = chars.next().ok_or_else(malformed)?;
    let letter = *LETTERS
        .get(&letter_char)
        .ok_or_else(|| NotationError::UnknownLetter {
            token: token.to_owned(),
            letter: letter_char,
        })?;

    let mut rest = chars.as_str();
    let wide_marker = match rest.strip_prefix(['w', 'W']) {
        Some(stripped) => {
            rest = stripped;
            true
        }
        None => false,
    };
    let (direction, repeat) = parse_suffix(rest).ok_or_else(malformed)?;
    let explicit_width = if digits.is_empty() {
        None
    } else {
        Some(parse_width(digits, token)?)
    };

    let (kind, face, width) = match letter {
        Letter::Face(face) => {
            let width = match (explicit_width, wide_marker) {
                (Some(width), _) => width,
                (None, true) => 2,
                (None, false) => 1,
            };
            (MoveKind::Turn, face, width)
        }
        Letter::WideFace(face) => {
            if wide_marker {
                return Err(malformed());
            }
            (MoveKind::Turn, face, explicit_width.unwrap_or(2))
        }
        Letter::Slice(face) => {
            if wide_marker || explicit_width.is_some() {
                return Err(malformed());
            }
            if size < 2 {
                return Err(NotationError::SliceTooSmall {
                    token: token.to_owned(),
                });
            }
            (MoveKind::Slice, face, 1)
        }
        Letter::Rotation(face) => {
            if wide_marker {
                return Err(malformed());
            }
            (MoveKind::Rotation, face, size)
        }
    };

    if width > size {
        return Err(NotationError::WidthTooLarge {
            token: token.to_owned(),
            width,
            size,
        });
    }

    Ok(MoveDescriptor {
        kind,
        face,
        width,
        direction,
        repeat,
    })
}

/// Parse a whitespace separated sequence of moves. Parentheses are dropped
/// before splitting, so grouping like `"(U) R U2"` is accepted.
///
/// # Errors
///
/// On the first invalid token.
pub fn parse_sequence(sequence: &str, size: usize) -> Result<Vec<MoveDescriptor>, NotationError> {
    let cleaned: String = sequence.chars().filter(|c| !matches!(c, '(' | ')')).collect();
    cleaned
        .split_whitespace()
        .map(|token| parse_move(token, size))
        .collect()
}

/// The sequence that undoes `sequence`: every move inverted, in reverse order,
/// written in canonical notation.
///
/// # Errors
///
/// On the first invalid token.
pub fn invert_sequence(sequence: &str, size: usize) -> Result<String, NotationError> {
    let descriptors = parse_sequence(sequence, size)?;
    let inverted: Vec<String> = descriptors
        .into_iter()
        .rev()
        .map(|descriptor| descriptor.inverse().to_string())
        .collect();
    Ok(inverted.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Clockwise as Cw, CounterClockwise as Ccw};

    fn desc(
        kind: MoveKind,
        face: Face,
        width: usize,
        direction: Direction,
        repeat: Repeat,
    ) -> MoveDescriptor {
        MoveDescriptor {
            kind,
            face,
            width,
            direction,
            repeat,
        }
    }

    #[test]
    fn face_turns() {
        use MoveKind::Turn;
        use Repeat::{Double, Single};
        let cases = [
            ("R", desc(Turn, Face::R, 1, Cw, Single)),
            ("U'", desc(Turn, Face::U, 1, Ccw, Single)),
            ("F2", desc(Turn, Face::F, 1, Cw, Double)),
            ("D2'", desc(Turn, Face::D, 1, Ccw, Double)),
            ("L'2", desc(Turn, Face::L, 1, Ccw, Double)),
            ("Bw", desc(Turn, Face::B, 2, Cw, Single)),
            ("RW'", desc(Turn, Face::R, 2, Ccw, Single)),
            ("3Rw", desc(Turn, Face::R, 3, Cw, Single)),
            ("3R", desc(Turn, Face::R, 3, Cw, Single)),
            ("4Uw2", desc(Turn, Face::U, 4, Cw, Double)),
            ("r", desc(Turn, Face::R, 2, Cw, Single)),
            ("3f'", desc(Turn, Face::F, 3, Ccw, Single)),
        ];
        for (token, expected) in cases {
            assert_eq!(parse_move(token, 5), Ok(expected), "{token}");
        }
    }

    #[test]
    fn slices_and_rotations() {
        use MoveKind::{Rotation, Slice};
        use Repeat::{Double, Single};
        let cases = [
            ("M", desc(Slice, Face::L, 1, Cw, Single)),
            ("E'", desc(Slice, Face::D, 1, Ccw, Single)),
            ("S2", desc(Slice, Face::F, 1, Cw, Double)),
            ("x", desc(Rotation, Face::R, 4, Cw, Single)),
            ("y'", desc(Rotation, Face::U, 4, Ccw, Single)),
            ("z2", desc(Rotation, Face::F, 4, Cw, Double)),
            ("3x", desc(Rotation, Face::R, 4, Cw, Single)),
            ("9y", desc(Rotation, Face::U, 4, Cw, Single)),
        ];
        for (token, expected) in cases {
            assert_eq!(parse_move(token, 4), Ok(expected), "{token}");
            assert_eq!(expected.is_slice(), expected.kind == Slice);
        }
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "R3", "R''", "R22", "R2'2", "Rw'x", "rw", "Mw", "3M", "xw", "3", "R ", "R'w",
        ] {
            assert!(
                matches!(parse_move(token, 5), Err(NotationError::Malformed(_))),
                "{token}"
            );
        }
        assert_eq!(parse_move("", 3), Err(NotationError::Empty));
        for token in ["0R", "1R", "03Rw", "99999999999999999999999R"] {
            assert!(
                matches!(parse_move(token, 5), Err(NotationError::MalformedWidth(_))),
                "{token}"
            );
        }
        for token in ["Q", "'", "2", "X", "m"] {
            assert!(
                matches!(
                    parse_move(token, 3),
                    Err(NotationError::UnknownLetter { .. } | NotationError::Malformed(_))
                ),
                "{token}"
            );
        }
        assert_eq!(
            parse_move("Q2", 3),
            Err(NotationError::UnknownLetter {
                token: "Q2".to_owned(),
                letter: 'Q'
            })
        );
    }

    #[test]
    fn width_is_bounded_by_size() {
        assert_eq!(
            parse_move("5Rw", 4),
            Err(NotationError::WidthTooLarge {
                token: "5Rw".to_owned(),
                width: 5,
                size: 4
            })
        );
        assert!(matches!(
            parse_move("Rw", 1),
            Err(NotationError::WidthTooLarge { .. })
        ));
        assert!(parse_move("4Rw", 4).is_ok());
        assert_eq!(
            parse_move("M", 1),
            Err(NotationError::SliceTooSmall {
                token: "M".to_owned()
            })
        );
        assert!(parse_move("M", 2).is_ok());
    }

    #[test]
    fn display_is_canonical() {
        let cases = [
            ("R", "R"),
            ("R'", "R'"),
            ("R2", "R2"),
            ("R'2", "R2'"),
            ("r", "Rw"),
            ("Rw", "Rw"),
            ("3Rw'", "3Rw'"),
            ("3R", "3Rw"),
            ("M'", "M'"),
            ("E2", "E2"),
            ("S", "S"),
            ("x'", "x'"),
            ("3y2", "y2"),
            ("z", "z"),
        ];
        for (token, expected) in cases {
            assert_eq!(parse_move(token, 5).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn unlettered_axes_display_through_the_opposite_face() {
        let slice = MoveDescriptor::new(MoveKind::Slice, Face::R, 0, Cw, 1, 3).unwrap();
        assert_eq!(slice.to_string(), "M'");
        let rotation = MoveDescriptor::new(MoveKind::Rotation, Face::D, 0, Ccw, 1, 3).unwrap();
        assert_eq!(rotation.to_string(), "y");
    }

    #[test]
    fn constructor_normalises_triple_turns() {
        let triple = MoveDescriptor::new(MoveKind::Turn, Face::U, 1, Cw, 3, 3).unwrap();
        assert_eq!(triple, parse_move("U'", 3).unwrap());
        assert_eq!(
            MoveDescriptor::new(MoveKind::Turn, Face::U, 1, Cw, 4, 3),
            Err(CubeError::InvalidQuarterTurns(4))
        );
        assert_eq!(
            MoveDescriptor::new(MoveKind::Turn, Face::U, 4, Cw, 1, 3),
            Err(CubeError::PreconditionViolation { width: 4, size: 3 })
        );
        assert_eq!(
            MoveDescriptor::new(MoveKind::Turn, Face::U, 0, Cw, 1, 3),
            Err(CubeError::PreconditionViolation { width: 0, size: 3 })
        );
        let rotation = MoveDescriptor::new(MoveKind::Rotation, Face::R, 1, Cw, 1, 6).unwrap();
        assert_eq!(rotation.width, 6);
    }

    #[test]
    fn inverse_flips_direction_only() {
        let descriptor = parse_move("3Rw2", 5).unwrap();
        let inverse = descriptor.inverse();
        assert_eq!(inverse.direction, Ccw);
        assert_eq!(inverse.width, 3);
        assert_eq!(inverse.repeat, Repeat::Double);
        assert_eq!(inverse.inverse(), descriptor);
    }

    #[test]
    fn sequences() {
        assert_eq!(parse_sequence("(U) R  U2\tR'", 3).unwrap().len(), 4);
        assert_eq!(parse_sequence("", 3).unwrap(), vec![]);
        assert!(parse_sequence("R U Q", 3).is_err());
        assert_eq!(invert_sequence("R U2 F' x", 3).unwrap(), "x' F U2' R'");
    }
}
