//! Elysian Grove: a single-threaded arcade simulation.
//!
//! The library holds the whole game core (entities, timed effects, combat,
//! spawning, persistence) and knows nothing about the terminal. The binary
//! in `main.rs` feeds it input and renders the resulting `World`.

pub mod combat;
pub mod compute;
pub mod config;
pub mod effects;
pub mod entities;
pub mod error;
pub mod persistence;
pub mod spawner;

pub use error::GameError;
