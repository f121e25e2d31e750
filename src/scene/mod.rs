//! Concrete game scenes.
//!
//! The orchestrator only knows the `Scene` trait; everything below it
//! (ships, dice, turn order) is scene-private.

pub mod dice;

pub use dice::DiceScene;
