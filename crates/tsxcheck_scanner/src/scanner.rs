//! The structural scanner.
//!
//! One left-to-right pass over the source bytes. At every byte exactly one
//! [`Mode`] is active; only `Normal` mode looks at `<`. A `<` that starts a
//! tag is handed to the classifier (opening tags only) and then to the tag
//! stack. The first defect stops the scan.

use crate::char_codes::*;
use crate::classifier::{
    explain_angle_bracket, is_self_closing_tag, is_tag_name_char, is_tag_start_char,
    AngleContext,
};
use crate::options::ScanOptions;
use crate::tag_stack::TagStack;
use memchr::{memchr, memchr2};
use tsxcheck_core::Position;
use tsxcheck_diagnostics::ValidationError;

/// The lexical context at the current byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// `// ...` up to the end of the line.
    LineComment { resume: Resume },
    /// `/* ... */`.
    BlockComment { resume: Resume },
    /// `"..."` or `'...'`.
    StringLiteral { quote: u8 },
    /// `` `...` ``; `brace_depth > 0` inside `${...}`.
    TemplateLiteral { brace_depth: u32 },
}

/// The mode a comment returns to when it ends.
///
/// Comments can open inside template-literal text, in which case the
/// template is still open once the comment is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Normal,
    Template { brace_depth: u32 },
}

impl Resume {
    fn mode(self) -> Mode {
        match self {
            Resume::Normal => Mode::Normal,
            Resume::Template { brace_depth } => Mode::TemplateLiteral { brace_depth },
        }
    }
}

/// What a finished scan found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Self-closing elements plus elements closed by a matching tag.
    pub tags_checked: u32,
    /// The first defect, if any.
    pub error: Option<ValidationError>,
}

/// Scanner state for one buffer. Not reusable: [`Scanner::run`] consumes it.
pub struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    mode: Mode,
    stack: TagStack,
    options: ScanOptions,
    tags_checked: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a [u8], options: ScanOptions) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            mode: Mode::Normal,
            stack: TagStack::with_limit(options.max_depth, options.overflow),
            options,
            tags_checked: 0,
        }
    }

    /// Scan `text` with `options` in one call.
    pub fn scan(text: &'a [u8], options: ScanOptions) -> ScanOutcome {
        Scanner::new(text, options).run()
    }

    /// Scan to the end of input (or the first defect) and report.
    pub fn run(mut self) -> ScanOutcome {
        let error = match self.scan_all() {
            Err(err) => Some(err),
            Ok(()) => self.stack.finish().err(),
        };
        ScanOutcome {
            tags_checked: self.tags_checked,
            error,
        }
    }

    /// The current position.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    /// The current lexical mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn scan_all(&mut self) -> Result<(), ValidationError> {
        while self.pos < self.text.len() {
            self.step()?;
        }
        Ok(())
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.get(pos).copied()
    }

    /// Move past one byte, keeping line and column current.
    #[inline]
    fn advance(&mut self) {
        let ch = self.text[self.pos];
        self.pos += 1;
        if ch == LINE_FEED {
            self.line += 1;
            self.column = 1;
        } else if !is_utf8_continuation(ch) {
            self.column += 1;
        }
    }

    /// Move past a two-byte ASCII delimiter such as `//` or `${`.
    #[inline]
    fn advance_pair(&mut self) {
        self.pos += 2;
        self.column += 2;
    }

    /// Jump to `target`. The skipped bytes must not contain a newline.
    fn skip_to(&mut self, target: usize) {
        let skipped = &self.text[self.pos..target];
        debug_assert!(!skipped.contains(&LINE_FEED));
        self.column += skipped
            .iter()
            .filter(|&&b| !is_utf8_continuation(b))
            .count() as u32;
        self.pos = target;
    }

    // ========================================================================
    // Mode transitions
    // ========================================================================

    fn step(&mut self) -> Result<(), ValidationError> {
        let ch = self.text[self.pos];

        if ch == LINE_FEED {
            if let Mode::LineComment { resume } = self.mode {
                self.mode = resume.mode();
            }
            self.advance();
            return Ok(());
        }

        if let Some(comment) = self.comment_start(ch) {
            self.mode = comment;
            self.advance_pair();
            return Ok(());
        }

        match self.mode {
            Mode::LineComment { .. } => self.skip_line_comment(),
            Mode::BlockComment { resume } => self.scan_block_comment(ch, resume),
            Mode::StringLiteral { quote } => self.scan_string(ch, quote),
            Mode::TemplateLiteral { brace_depth } => self.scan_template(ch, brace_depth),
            Mode::Normal => return self.scan_normal(ch),
        }
        Ok(())
    }

    /// The comment mode `ch` opens, if it is the `/` of `//` or `/*` in a
    /// mode where comments can start.
    fn comment_start(&self, ch: u8) -> Option<Mode> {
        if ch != SLASH {
            return None;
        }
        let resume = match self.mode {
            Mode::Normal => Resume::Normal,
            Mode::TemplateLiteral { brace_depth } => {
                if brace_depth == 0 && !self.options.comments_in_template_text {
                    return None;
                }
                Resume::Template { brace_depth }
            }
            _ => return None,
        };
        match self.byte_at(self.pos + 1)? {
            SLASH => Some(Mode::LineComment { resume }),
            ASTERISK => Some(Mode::BlockComment { resume }),
            _ => None,
        }
    }

    fn skip_line_comment(&mut self) {
        let end = memchr(LINE_FEED, &self.text[self.pos..])
            .map_or(self.text.len(), |i| self.pos + i);
        self.skip_to(end);
    }

    fn scan_block_comment(&mut self, ch: u8, resume: Resume) {
        if ch == ASTERISK && self.byte_at(self.pos + 1) == Some(SLASH) {
            self.mode = resume.mode();
            self.advance_pair();
            return;
        }
        let from = self.pos + 1;
        let next = memchr2(ASTERISK, LINE_FEED, &self.text[from..])
            .map_or(self.text.len(), |i| from + i);
        self.skip_to(next);
    }

    fn scan_string(&mut self, ch: u8, quote: u8) {
        if ch == quote && self.text[self.pos - 1] != BACKSLASH {
            self.mode = Mode::Normal;
        }
        self.advance();
    }

    fn scan_template(&mut self, ch: u8, brace_depth: u32) {
        match ch {
            BACKTICK if brace_depth == 0 => self.mode = Mode::Normal,
            DOLLAR_SIGN if self.byte_at(self.pos + 1) == Some(OPEN_BRACE) => {
                self.mode = Mode::TemplateLiteral {
                    brace_depth: brace_depth + 1,
                };
                self.advance_pair();
                return;
            }
            OPEN_BRACE if brace_depth > 0 => {
                self.mode = Mode::TemplateLiteral {
                    brace_depth: brace_depth + 1,
                }
            }
            CLOSE_BRACE if brace_depth > 0 => {
                self.mode = Mode::TemplateLiteral {
                    brace_depth: brace_depth - 1,
                }
            }
            _ => {}
        }
        self.advance();
    }

    fn scan_normal(&mut self, ch: u8) -> Result<(), ValidationError> {
        match ch {
            DOUBLE_QUOTE | SINGLE_QUOTE => self.mode = Mode::StringLiteral { quote: ch },
            BACKTICK => self.mode = Mode::TemplateLiteral { brace_depth: 0 },
            LESS_THAN => return self.scan_tag(),
            _ => {}
        }
        self.advance();
        Ok(())
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Handle a `<` in normal mode. Returns with the cursor after whatever
    /// was consumed; a `<` that turns out not to be a tag consumes only itself.
    fn scan_tag(&mut self) -> Result<(), ValidationError> {
        let origin = self.position();
        self.advance();

        let Some(next) = self.peek() else {
            return Ok(());
        };
        // `a < b`, `x <= y`
        if matches!(next, SPACE | TAB | LINE_FEED | EQUALS) {
            return Ok(());
        }

        let closing = next == SLASH;
        if closing {
            self.advance();
        }

        let Some(next) = self.peek() else {
            return Ok(());
        };
        if !is_tag_start_char(next) {
            if next == GREATER_THAN {
                self.advance();
                return if closing {
                    self.close_tag("", origin)
                } else {
                    self.stack.push("", origin)
                };
            }
            return Ok(());
        }

        if !closing {
            let verdict = explain_angle_bracket(self.text, origin.offset);
            if verdict.context == AngleContext::TypeContext {
                tracing::trace!(
                    line = origin.line,
                    column = origin.column,
                    rule = verdict.rule,
                    "skipping type-level angle brackets"
                );
                self.skip_type_arguments();
                return Ok(());
            }
        }

        let name = self.read_tag_name();
        if name.is_empty() {
            return Ok(());
        }

        if closing {
            self.skip_past(GREATER_THAN);
            return self.close_tag(&name, origin);
        }

        let explicit = self.scan_attributes();
        if explicit || is_self_closing_tag(&name) {
            self.tags_checked += 1;
            Ok(())
        } else {
            self.stack.push(&name, origin)
        }
    }

    /// Pop `name` for the closing tag that started at `origin`.
    fn close_tag(&mut self, name: &str, origin: Position) -> Result<(), ValidationError> {
        let span = origin.span_to(self.pos);
        self.stack.pop(name, origin, span)?;
        if !name.is_empty() {
            self.tags_checked += 1;
        }
        Ok(())
    }

    /// Read tag-name bytes, keeping at most `max_tag_name_len` of them.
    /// Any excess is left for the attribute or closing-tag scan to consume.
    fn read_tag_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if !is_tag_name_char(ch) || name.len() >= self.options.max_tag_name_len {
                break;
            }
            name.push(char::from(ch));
            self.advance();
        }
        name
    }

    /// Skip a type-level `<...>` span by bracket counting. The cursor is just
    /// past the opening `<`.
    fn skip_type_arguments(&mut self) {
        let mut depth = 1usize;
        while let Some(ch) = self.peek() {
            match ch {
                LESS_THAN => depth += 1,
                GREATER_THAN => depth -= 1,
                _ => {}
            }
            self.advance();
            if depth == 0 {
                break;
            }
        }
    }

    /// Advance past the next `target` byte, or to end of input.
    fn skip_past(&mut self, target: u8) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == target {
                break;
            }
        }
    }

    /// Consume the rest of an opening tag up to and including `>` or `/>`.
    ///
    /// Quoted attribute values and `{...}` expressions are stepped over so a
    /// `>` inside them does not end the tag. Returns whether the tag ended
    /// with `/>`.
    fn scan_attributes(&mut self) -> bool {
        let mut brace_depth = 0usize;
        let mut quote: Option<u8> = None;

        while let Some(ch) = self.peek() {
            if let Some(q) = quote {
                if ch == q && self.text[self.pos - 1] != BACKSLASH {
                    quote = None;
                }
                self.advance();
                continue;
            }

            match ch {
                DOUBLE_QUOTE | SINGLE_QUOTE => quote = Some(ch),
                OPEN_BRACE => brace_depth += 1,
                CLOSE_BRACE => brace_depth = brace_depth.saturating_sub(1),
                _ if brace_depth > 0 => {}
                SLASH if self.byte_at(self.pos + 1) == Some(GREATER_THAN) => {
                    self.advance_pair();
                    return true;
                }
                GREATER_THAN => {
                    self.advance();
                    return false;
                }
                _ => {}
            }
            self.advance();
        }
        false
    }
}
