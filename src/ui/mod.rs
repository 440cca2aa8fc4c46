// UI module - text front-end standing in for the desktop window
//
// The console controller turns typed lines into word-bank operations and
// renders results plus a status line.

pub mod console;

pub use console::{Command, ConsoleController, Response};
