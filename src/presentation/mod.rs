//! Presentation layer: command execution and terminal output.

mod app;

pub use app::App;
