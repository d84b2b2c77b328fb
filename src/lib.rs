// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod data;
pub mod equipment;
pub mod error;
pub mod file;
pub mod progress;
pub mod scrape;

pub use data::{Acquisition, Municipality, RegionFailure, SourceKind};
pub use error::HarvestError;
