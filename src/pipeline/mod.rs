// src/pipeline/mod.rs

//! Pipeline entry points for extractor operations.
//!
//! - `run_scrape`: Fetch and extract one or more URLs
//! - `run_extract_file`: Extract a local HTML file

pub mod extract;
pub mod scrape;

pub use extract::run_extract_file;
pub use scrape::{run_scrape, scrape_all};
