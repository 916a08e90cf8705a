pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod package;
pub mod plan;
pub mod resolver;
pub mod ui;
pub mod warning;

pub use error::{MultiReleaseError, Result};
