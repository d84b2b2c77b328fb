// src/config/mod.rs

pub mod consts;
pub mod country;
pub mod options;

pub use country::CountryConfig;
pub use options::{AppOptions, HarvestOptions, SourceStrategy};
