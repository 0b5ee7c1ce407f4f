//! Catalogue documents authored outside the binary.
//!
//! The built-in catalogue needs none of this. It exists so that procedure
//! sets can be written, exported and integrity-checked as TOML files.

mod document;

pub use document::{load, parse, to_toml, LoadError};
