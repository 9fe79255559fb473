//! Application glue
//!
//! The controller thread and the state it shares with the frontends.

pub mod controller;
pub mod state;
