//! Lance Sim - the player's sub-unit inside a lord's warband
//!
//! A lance is the 8-12 soldiers the player serves alongside while enlisted.
//! Members get hurt, recover, ask for favors, fight and die; when the player
//! is ready to lead, something eventually happens to the sitting leader.
//!
//! The surrounding campaign is reached only through the traits in [`host`].

pub mod core;
pub mod host;
pub mod lance;
pub mod schedule;
pub mod simulation;
