#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

//! Sticker-level model of an n×n×n cube: the state buffer and its in-place
//! turn primitives, move notation, and moves compiled into directly
//! executable operations.

pub mod cube;
pub mod face;
pub mod notation;
pub mod ops;
mod strips;

pub use cube::{CubeError, CubeState};
pub use face::{Direction, Face};
pub use notation::{
    MoveDescriptor, MoveKind, NotationError, Repeat, invert_sequence, parse_move, parse_sequence,
};
pub use ops::{Op, Transition, compile_move_set};
