//! Polang Compiler
//!
//! The bootstrap compiler front end for the Polang programming language: a
//! small procedural language with Polish-vocabulary keywords, compiled
//! through a typed AST into an SSA-form intermediate representation.
//!
//! # Architecture
//!
//! ```text
//! Source Code (.polang)
//!       │
//!       ▼
//! ┌─────────────┐
//! │    Lexer    │  → Tokens
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │   Parser    │  → AST (arena-owned)
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  IR Lowering│  → Polang IR
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Verify/Emit│  → Textual IR file
//! └─────────────┘
//! ```

pub mod lexer;
pub mod token;
pub mod span;
pub mod ast;
pub mod parser;
pub mod ir;
pub mod dump;

// Re-exports for convenience
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::Span;
pub use token::{Token, TokenKind};

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension for Polang source files
pub const FILE_EXTENSION: &str = "polang";

/// Source file compiled when no path is given on the command line
pub const DEFAULT_SOURCE_PATH: &str = "główny.polang";

/// Fixed path the textual IR artifact is written to
pub const IR_OUTPUT_PATH: &str = "program_IR.txt";
