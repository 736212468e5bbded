//! Polang Intermediate Representation
//!
//! A small SSA-form IR standing in as the native code-generation backend.
//! The lowering pass emits into a module through an explicit builder; the
//! finished module is verified as a whole and serialized human-readably.

// Note: instr must come before types to avoid circular deps
mod instr;
mod types;
mod builder;
mod lower;

// Re-export in logical order
pub use instr::*;
pub use types::*;
pub use builder::*;
pub use lower::*;
