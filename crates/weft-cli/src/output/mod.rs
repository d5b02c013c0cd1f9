//! Output formatters

pub mod json;
