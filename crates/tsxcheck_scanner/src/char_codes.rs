//! Byte constants for the ASCII delimiters the scanner reacts to.

pub const TAB: u8 = b'\t';
pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const SPACE: u8 = b' ';

pub const DOUBLE_QUOTE: u8 = b'"';
pub const DOLLAR_SIGN: u8 = b'$';
pub const AMPERSAND: u8 = b'&';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const ASTERISK: u8 = b'*';
pub const COMMA: u8 = b',';
pub const MINUS: u8 = b'-';
pub const DOT: u8 = b'.';
pub const SLASH: u8 = b'/';
pub const COLON: u8 = b':';
pub const SEMICOLON: u8 = b';';
pub const LESS_THAN: u8 = b'<';
pub const EQUALS: u8 = b'=';
pub const GREATER_THAN: u8 = b'>';
pub const QUESTION: u8 = b'?';
pub const CLOSE_BRACKET: u8 = b']';
pub const BACKSLASH: u8 = b'\\';
pub const UNDERSCORE: u8 = b'_';
pub const BACKTICK: u8 = b'`';
pub const OPEN_BRACE: u8 = b'{';
pub const BAR: u8 = b'|';
pub const CLOSE_BRACE: u8 = b'}';

/// Whitespace skipped when looking back from a `<`.
#[inline]
pub fn is_white_space(ch: u8) -> bool {
    matches!(ch, SPACE | TAB | LINE_FEED | CARRIAGE_RETURN)
}

/// Whitespace that stays on the same line.
#[inline]
pub fn is_white_space_single_line(ch: u8) -> bool {
    matches!(ch, SPACE | TAB)
}

/// Identifier bytes as far as the lookback cares: ASCII word characters.
#[inline]
pub fn is_word_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == UNDERSCORE
}

/// UTF-8 continuation bytes do not start a new character.
#[inline]
pub fn is_utf8_continuation(ch: u8) -> bool {
    ch & 0xC0 == 0x80
}
