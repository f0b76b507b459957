pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ui;

pub use app::{build_router, AppState};
