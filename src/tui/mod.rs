//! Terminal chat screen
//!
//! Full-screen conversation with a driver, built on Ratatui.

mod app;
mod compose;
mod log_capture;
mod messages;
mod ui;

pub use app::run;
pub use log_capture::LogBuffer;
