//! tsxcheck_core: Core types shared by the tsxcheck crates.
//!
//! Provides source positions and byte spans used by the scanner to locate
//! tags and by diagnostics to report where a structural defect was found.

pub mod text;

// Re-export commonly used types
pub use text::{Position, TextSpan};
