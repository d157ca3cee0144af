//! Core library functions for the collaboration network analyzer

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod cluster;
pub mod viz;

pub use anyhow::{Result, anyhow};
pub use error::AnalysisError;
