use crate::{
    cube::{CubeError, CubeState},
    face::{Direction, Face},
    notation::{MoveDescriptor, MoveKind, NotationError, parse_move},
};
use log::debug;
use std::fmt;

/// A move resolved to the engine primitives that perform it, as plain data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub(crate) kind: MoveKind,
    pub(crate) face: Face,
    pub(crate) width: usize,
    pub(crate) direction: Direction,
    pub(crate) turns: u8,
}

impl From<MoveDescriptor> for Transition {
    fn from(descriptor: MoveDescriptor) -> Self {
        Transition {
            kind: descriptor.kind,
            face: descriptor.face,
            width: descriptor.width,
            direction: descriptor.direction,
            turns: descriptor.repeat.quarter_turns(),
        }
    }
}

impl Transition {
    #[must_use]
    pub fn inverse(self) -> Self {
        Transition {
            direction: self.direction.inverse(),
            ..self
        }
    }

    /// Perform the transition on `cube`, which must be the size the move was
    /// resolved against.
    #[inline]
    pub(crate) fn run(self, cube: &mut CubeState) {
        let n = cube.size();
        for _ in 0..self.turns {
            match self.kind {
                MoveKind::Turn => cube.turn_unchecked(self.face, self.width, self.direction),
                MoveKind::Slice => {
                    cube.turn_unchecked(self.face, 1, self.direction.inverse());
                    cube.turn_unchecked(self.face, n - 1, self.direction);
                }
                MoveKind::Rotation => cube.turn_unchecked(self.face, n, self.direction),
            }
        }
    }
}

/// A move compiled once for a given cube size, with its exact inverse
/// resolved ahead of time.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Op {
    token: Box<str>,
    descriptor: MoveDescriptor,
    size: usize,
    apply: Transition,
    undo: Transition,
}

impl Op {
    /// Parse `token` and compile it for a cube of `size` layers. The token is
    /// kept verbatim for reporting.
    ///
    /// # Errors
    ///
    /// If `token` is not valid notation for the size.
    pub fn compile(token: &str, size: usize) -> Result<Op, NotationError> {
        let descriptor = parse_move(token, size)?;
        Ok(Op::from_descriptor(token, descriptor, size)?)
    }

    /// Compile a descriptor built by hand.
    ///
    /// # Errors
    ///
    /// If the descriptor does not fit a cube of `size` layers.
    pub fn from_descriptor(
        token: &str,
        descriptor: MoveDescriptor,
        size: usize,
    ) -> Result<Op, CubeError> {
        descriptor.validate(size)?;
        let apply = Transition::from(descriptor);
        Ok(Op {
            token: token.into(),
            descriptor,
            size,
            apply,
            undo: apply.inverse(),
        })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn descriptor(&self) -> MoveDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The axis face, which is what same-face pruning compares.
    #[must_use]
    pub fn face(&self) -> Face {
        self.descriptor.face
    }

    /// # Panics
    ///
    /// If `cube` is not the size the op was compiled for.
    #[inline]
    pub fn apply(&self, cube: &mut CubeState) {
        assert_eq!(cube.size(), self.size, "{self} applied to the wrong cube");
        self.apply.run(cube);
    }

    /// # Panics
    ///
    /// If `cube` is not the size the op was compiled for.
    #[inline]
    pub fn undo(&self, cube: &mut CubeState) {
        assert_eq!(cube.size(), self.size, "{self} undone on the wrong cube");
        self.undo.run(cube);
    }

    /// Like [`Op::apply`], leaving `cube` untouched if it has the wrong size.
    ///
    /// # Errors
    ///
    /// If `cube` is not the size the op was compiled for.
    pub fn try_apply(&self, cube: &mut CubeState) -> Result<(), CubeError> {
        self.check_size(cube)?;
        self.apply.run(cube);
        Ok(())
    }

    /// Like [`Op::undo`], leaving `cube` untouched if it has the wrong size.
    ///
    /// # Errors
    ///
    /// If `cube` is not the size the op was compiled for.
    pub fn try_undo(&self, cube: &mut CubeState) -> Result<(), CubeError> {
        self.check_size(cube)?;
        self.undo.run(cube);
        Ok(())
    }

    fn check_size(&self, cube: &CubeState) -> Result<(), CubeError> {
        if cube.size() == self.size {
            Ok(())
        } else {
            Err(CubeError::SizeMismatch {
                expected: self.size,
                actual: cube.size(),
            })
        }
    }

    /// The op performing `undo` as its move, named by its canonical token.
    #[must_use]
    pub fn inverse(&self) -> Op {
        let descriptor = self.descriptor.inverse();
        Op {
            token: descriptor.to_string().into(),
            descriptor,
            size: self.size,
            apply: self.undo,
            undo: self.apply,
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op")
            .field("token", &self.token)
            .field("size", &self.size)
            .field("apply", &self.apply)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Compile every token of a move set, in order.
///
/// # Errors
///
/// On the first token that is not valid notation for `size`.
pub fn compile_move_set<S: AsRef<str>>(
    tokens: &[S],
    size: usize,
) -> Result<Vec<Op>, NotationError> {
    let ops = tokens
        .iter()
        .map(|token| Op::compile(token.as_ref(), size))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Compiled {} moves for a cube of size {size}", ops.len());
    Ok(ops)
}
