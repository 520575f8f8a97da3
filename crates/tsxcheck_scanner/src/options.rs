use crate::tag_stack::{OverflowPolicy, TagStack};

/// Knobs for a single scan. Under `Default`, nesting deeper than
/// `max_depth` is reported as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Maximum number of simultaneously open tags.
    pub max_depth: usize,
    /// What to do when `max_depth` would be exceeded.
    pub overflow: OverflowPolicy,
    /// Tag names longer than this many bytes are truncated.
    pub max_tag_name_len: usize,
    /// Whether `//` and `/*` start comments inside template-literal text
    /// (outside `${...}`). Interpolations always recognize comments.
    pub comments_in_template_text: bool,
}

impl ScanOptions {
    pub const DEFAULT_MAX_TAG_NAME_LEN: usize = 127;
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: TagStack::DEFAULT_LIMIT,
            overflow: OverflowPolicy::Error,
            max_tag_name_len: Self::DEFAULT_MAX_TAG_NAME_LEN,
            comments_in_template_text: true,
        }
    }
}
