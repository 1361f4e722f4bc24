//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the subscription box client views:
//! - Wallet connect screen
//! - Box list with stats, search and category filter
//! - Box details with decrypt & verify
//! - Creation form and FAQ

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::BoxTheme;
pub use worker::{ActionProgress, ActionWorker, ActionWorkerHandle};
