//! Command line front end: argument parsing, terminal rendering and
//! notice printing.

pub mod args;
pub mod commands;
pub mod error;
pub mod events;
pub mod state;
pub mod terminal;
