//! Page rendering and batch orchestration for coursemigrate.
//!
//! This crate ties the mapping table, the extractor and the page template
//! together into the end-to-end migration run (`run_batch`).

pub mod batch;
pub mod render;
