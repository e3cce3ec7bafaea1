pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logger;
pub mod scrapers;

pub use error::{GraphError, GraphResult};

#[cfg(test)]
mod test_utilities;

#[cfg(test)]
mod tests;
