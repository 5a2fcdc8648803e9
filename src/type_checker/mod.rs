//! Type checking and semantic analysis module.
//!
//! This module resolves names and types over a parsed [`File`](crate::ast::ast::File):
//!
//! - Structural types with per-checker interning (`types`)
//! - A stack of scopes chained to a predeclared universe (`scope`, `universe`)
//! - Expression checking into `{mode, type}` results (`type_checker`)
//! - Declarations, statements and return analysis (`stmt`)
//!
//! Checking stops at the first semantic error.

pub mod scope;
pub mod stmt;
pub mod type_checker;
pub mod types;
pub mod universe;
