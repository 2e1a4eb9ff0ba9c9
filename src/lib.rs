//! Terminal to-do list: an in-memory task manager and its ratatui front end.

pub mod cli;
pub mod logging;
pub mod tasks;
pub mod tui;
