//! Terminal shell around the timer core

pub mod app;
pub mod ui;

pub use app::App;
