/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Files, declarations and the shared identifier/spec nodes
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes, lvalues and assignables
/// - types: Type annotations as written in the source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
