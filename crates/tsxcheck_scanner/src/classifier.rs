//! Lexical classification of tag characters and of `<` itself.
//!
//! In TSX a `<` followed by a letter is either a JSX opening tag or a
//! TypeScript type-level bracket (`useState<T>`, `x as Foo<T>`,
//! `Array<string>`). Telling them apart exactly needs a type checker; this
//! module instead looks at the text right before the `<` and applies an
//! ordered table of rules, first match wins. Each rule is a named pure
//! function so it can be tested on its own.

use crate::char_codes::*;
use std::ops::Range;

/// HTML void elements. They never take a closing tag.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Words after which a `<` opens type arguments or a type expression.
const TYPE_KEYWORDS: &[&str] = &[
    "satisfies",
    "extends",
    "implements",
    "as",
    "type",
    "new",
    "typeof",
    "keyof",
    "infer",
];

/// Lowercase callees that commonly take explicit type arguments.
const GENERIC_CALLEES: &[&str] = &[
    "string",
    "number",
    "forwardRef",
    "memo",
    "lazy",
    "createContext",
    "useState",
    "useRef",
    "useReducer",
    "useContext",
    "useCallback",
    "useMemo",
];

/// Bytes that, right before a `<`, mean the `<` is type-level.
const TYPE_PUNCTUATION: &[u8] = &[COLON, SEMICOLON, COMMA, EQUALS, BAR, QUESTION];

/// Whether `ch` may appear in a tag name (`my-el`, `Foo.Bar`, `svg:rect`).
#[inline]
pub fn is_tag_name_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, MINUS | UNDERSCORE | DOT | COLON)
}

/// Whether `ch` may start a tag name. Digits are excluded so `<1` is never a tag.
#[inline]
pub fn is_tag_start_char(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE
}

/// Whether `name` is an HTML void element (ASCII case-insensitive).
pub fn is_self_closing_tag(name: &str) -> bool {
    SELF_CLOSING_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

/// What a `<` followed by a tag-start character opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleContext {
    /// A JSX element.
    Jsx,
    /// Type arguments, a cast, or another type-level construct.
    TypeContext,
}

/// A classification together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub context: AngleContext,
    /// Name of the matching rule; `None` when no rule matched (JSX).
    pub rule: Option<&'static str>,
}

/// The text immediately before a `<`, pre-split into the pieces the rules
/// inspect.
#[derive(Debug, Clone)]
pub struct Lookbehind<'a> {
    text: &'a [u8],
    lt: usize,
    /// Nearest byte before `<` that is not whitespace (newlines included).
    prev: Option<usize>,
    /// Word ending at `prev`; empty (at `prev + 1`) when `prev` is punctuation.
    word: Range<usize>,
    /// Nearest byte before the word, skipping spaces and tabs only.
    before_word: Option<usize>,
}

impl<'a> Lookbehind<'a> {
    /// Analyze the text before the `<` at byte offset `lt`.
    pub fn new(text: &'a [u8], lt: usize) -> Self {
        let prev = text[..lt].iter().rposition(|&b| !is_white_space(b));

        let word = match prev {
            Some(end) => {
                let start = text[..=end]
                    .iter()
                    .rposition(|&b| !is_word_part(b))
                    .map_or(0, |i| i + 1);
                start..end + 1
            }
            None => 0..0,
        };

        let before_word = match prev {
            Some(_) => text[..word.start]
                .iter()
                .rposition(|&b| !is_white_space_single_line(b)),
            None => None,
        };

        Self {
            text,
            lt,
            prev,
            word,
            before_word,
        }
    }

    /// The nearest non-whitespace byte before `<`.
    pub fn prev_byte(&self) -> Option<u8> {
        self.prev.map(|i| self.text[i])
    }

    /// The word (ASCII letters, digits, `_`) immediately before `<`, possibly empty.
    pub fn word(&self) -> &'a [u8] {
        &self.text[self.word.clone()]
    }

    /// Whether a word touches the `<` with no space in between.
    pub fn word_abuts(&self) -> bool {
        !self.word.is_empty() && self.word.end == self.lt
    }

    /// The byte right before the word, or before `<` when there is no word.
    pub fn before_word_byte(&self) -> Option<u8> {
        self.before_word.map(|i| self.text[i])
    }

    /// Whether the word is directly preceded by `.` (`obj.method<T>`).
    fn word_follows_dot(&self) -> bool {
        self.word.start > 0 && self.text[self.word.start - 1] == DOT
    }

    /// Whether the byte before the word is the second half of `&&`.
    fn before_word_is_logical_and(&self) -> bool {
        match self.before_word {
            Some(i) => i > 0 && self.text[i - 1] == AMPERSAND,
            None => false,
        }
    }
}

/// One entry of the type-context rule table.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Lookbehind<'_>) -> bool,
}

/// Type-context rules in priority order. A `<` no rule claims is JSX.
pub static TYPE_CONTEXT_RULES: &[Rule] = &[
    Rule {
        name: "annotation",
        applies: annotation,
    },
    Rule {
        name: "type_keyword",
        applies: type_keyword,
    },
    Rule {
        name: "abutting_generic",
        applies: abutting_generic,
    },
    Rule {
        name: "type_punctuation",
        applies: type_punctuation,
    },
    Rule {
        name: "intersection",
        applies: intersection,
    },
];

/// `x: <T>` or `T[]<...>`: a type annotation or indexed-access type.
pub fn annotation(lb: &Lookbehind<'_>) -> bool {
    matches!(lb.prev_byte(), Some(COLON | CLOSE_BRACKET))
}

/// `x as Foo<T>`, `extends Base<T>`, `new Map<K, V>` and friends.
pub fn type_keyword(lb: &Lookbehind<'_>) -> bool {
    let word = lb.word();
    !word.is_empty() && TYPE_KEYWORDS.iter().any(|kw| kw.as_bytes() == word)
}

/// `Array<string>`, `useState<number>`, `api.get<User>`.
pub fn abutting_generic(lb: &Lookbehind<'_>) -> bool {
    if !lb.word_abuts() {
        return false;
    }
    let word = lb.word();
    word[0].is_ascii_uppercase()
        || GENERIC_CALLEES.iter().any(|name| name.as_bytes() == word)
        || lb.word_follows_dot()
}

/// A `<` (or the word before it) right after one of `: ; , = | ?`.
///
/// This also claims `const el = <div />`; wrap such markup in parentheses.
pub fn type_punctuation(lb: &Lookbehind<'_>) -> bool {
    matches!(lb.before_word_byte(), Some(b) if TYPE_PUNCTUATION.contains(&b))
}

/// A single `&` is an intersection type; `&&` is a logical operator in
/// front of JSX.
pub fn intersection(lb: &Lookbehind<'_>) -> bool {
    lb.before_word_byte() == Some(AMPERSAND) && !lb.before_word_is_logical_and()
}

/// Classify the `<` at byte offset `lt`, reporting which rule decided.
///
/// Only meaningful for an opening `<` followed by a tag-start character;
/// closing tags are always JSX and are never passed here.
pub fn explain_angle_bracket(text: &[u8], lt: usize) -> Classification {
    let lookbehind = Lookbehind::new(text, lt);
    for rule in TYPE_CONTEXT_RULES {
        if (rule.applies)(&lookbehind) {
            return Classification {
                context: AngleContext::TypeContext,
                rule: Some(rule.name),
            };
        }
    }
    Classification {
        context: AngleContext::Jsx,
        rule: None,
    }
}

/// Classify the `<` at byte offset `lt`.
#[inline]
pub fn classify_angle_bracket(text: &[u8], lt: usize) -> AngleContext {
    explain_angle_bracket(text, lt).context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookbehind(src: &str) -> Lookbehind<'_> {
        let lt = src.rfind('<').unwrap();
        Lookbehind::new(src.as_bytes(), lt)
    }

    #[test]
    fn test_lookbehind_pieces() {
        let lb = lookbehind("return foo.bar<T>");
        assert_eq!(lb.word(), b"bar");
        assert!(lb.word_abuts());
        assert_eq!(lb.prev_byte(), Some(b'r'));
        assert_eq!(lb.before_word_byte(), Some(b'.'));
    }

    #[test]
    fn test_lookbehind_without_word() {
        let lb = lookbehind("x =\n  <div>");
        assert_eq!(lb.word(), b"");
        assert!(!lb.word_abuts());
        assert_eq!(lb.prev_byte(), Some(b'='));
        assert_eq!(lb.before_word_byte(), Some(b'='));
    }

    #[test]
    fn test_lookbehind_at_start_of_text() {
        let lb = lookbehind("  <div>");
        assert_eq!(lb.prev_byte(), None);
        assert_eq!(lb.before_word_byte(), None);
        assert!(!TYPE_CONTEXT_RULES.iter().any(|r| (r.applies)(&lb)));
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = TYPE_CONTEXT_RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TYPE_CONTEXT_RULES.len());
    }
}
