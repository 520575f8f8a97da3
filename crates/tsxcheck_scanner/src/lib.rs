//! tsxcheck_scanner: Single-pass structural scanner for JSX/TSX markup.
//!
//! The scanner walks source bytes once, left to right, and provides:
//! - String, comment and template-literal tracking so markup-looking text
//!   inside them is ignored
//! - A rule-table classifier telling JSX tags apart from TypeScript
//!   generics and type expressions
//! - A bounded tag stack that matches closing tags against open ones

mod char_codes;
pub mod classifier;
mod options;
pub mod scanner;
pub mod tag_stack;

pub use classifier::{
    classify_angle_bracket, explain_angle_bracket, is_self_closing_tag, is_tag_name_char,
    is_tag_start_char, AngleContext, Classification, SELF_CLOSING_TAGS,
};
pub use options::ScanOptions;
pub use scanner::{Mode, Resume, ScanOutcome, Scanner};
pub use tag_stack::{OpenTag, OverflowPolicy, TagStack};
