pub mod config;
pub mod error;
pub mod fetch;
pub mod pages;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod table;

#[cfg(test)]
mod testutil;

pub use error::{Result, ScrapeError};
