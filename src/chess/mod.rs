//! Implementation of the antichess environment, its rules and specifics.

pub mod board;
pub mod core;
pub mod movegen;
pub mod outcome;
pub mod piece;
pub mod position;
pub mod zobrist;
