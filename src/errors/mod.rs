//! Error types and error handling for the Xi front end.
//!
//! This module defines the single error value that leaves the pipeline. It
//! includes:
//!
//! - Error structures with source position information
//! - Specific error variants for the lexical, syntax and semantic phases
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
