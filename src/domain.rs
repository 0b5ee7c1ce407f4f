//! Domain models for the procedure catalogue.
//!
//! This module contains the core domain types including procedures, their
//! identifiers and categories, the immutable catalogue, and configuration.

/// Procedure identifier types and parsing.
pub mod procedure_id;
pub use procedure_id::{InvalidIdError, ProcedureId};

/// Procedure categories and their visual configuration.
pub mod category;
pub use category::{Category, CategoryStyle, Icon, Tone, UnknownCategoryError};

/// Procedure records.
pub mod procedure;
pub use procedure::{
    BuildError, Procedure, ProcedureAction, ProcedureBuilder, ProcedureConditional, Role, Step,
};

mod catalogue;
pub use catalogue::{Catalogue, CatalogueError, IntegrityIssue, Reference};

mod builtin;
pub use builtin::catalogue;

mod config;
pub use config::Config;
