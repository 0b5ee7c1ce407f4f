//! Operating Procedures for Remotely Piloted Aircraft
//!
//! A fixed catalogue of normal, contingency, emergency and emergency response
//! procedures, plus the navigation state that lets an operator jump from one
//! procedure's conditional cross-reference straight to the referenced one.

pub mod domain;
pub use domain::{
    catalogue, Catalogue, Category, Config, IntegrityIssue, Procedure, ProcedureAction,
    ProcedureConditional, ProcedureId, Role, Step,
};

pub mod navigation;
pub use navigation::{CardDeck, NavigationController, Surface};

pub mod storage;
