//! The scanner: converts source text into a stream of tokens.
//!
//! Positions are byte offsets into the UTF-8 text. Token values are cooked:
//! escapes in strings, templates and identifiers are resolved, numeric
//! separators are removed and non-decimal integers are converted to decimal.
//!
//! Lexical errors are queued and handed to the parser through
//! [`Scanner::take_errors`].

use crate::char_codes::*;
use crate::trivia::{is_conflict_marker_trivia, is_shebang_trivia, scan_conflict_marker_trivia, scan_shebang_trivia};
use rsparse_ast::{JSDocParsingMode, LanguageVariant, ScriptKind, SyntaxKind, TokenFlags};
use rsparse_diagnostics::{messages, DiagnosticMessage};

/// A lexical error reported while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub pos: u32,
    pub length: u32,
    pub message: &'static DiagnosticMessage,
    pub arg: Option<String>,
}

/// Saved scanner state for speculative scanning.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    end: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    skip_jsdoc_leading_asterisks: u32,
    errors_len: usize,
}

/// The scanner.
pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    /// Current position (end of the current token).
    pos: usize,
    /// Scanning stops here.
    end: usize,
    /// Start of the current token including leading trivia.
    full_start: usize,
    /// Start of the current token excluding trivia.
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    language_variant: LanguageVariant,
    script_kind: ScriptKind,
    jsdoc_parsing_mode: JSDocParsingMode,
    skip_jsdoc_leading_asterisks: u32,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            end: text.len(),
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            language_variant: LanguageVariant::Standard,
            script_kind: ScriptKind::Ts,
            jsdoc_parsing_mode: JSDocParsingMode::ParseAll,
            skip_jsdoc_leading_asterisks: 0,
            errors: Vec::new(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_language_variant(&mut self, variant: LanguageVariant) {
        self.language_variant = variant;
    }

    pub fn set_script_kind(&mut self, kind: ScriptKind) {
        self.script_kind = kind;
    }

    pub fn set_jsdoc_parsing_mode(&mut self, mode: JSDocParsingMode) {
        self.jsdoc_parsing_mode = mode;
    }

    /// Restrict scanning to `[start, end)` and reset the token.
    pub fn set_text_range(&mut self, start: usize, end: usize) {
        debug_assert!(end <= self.text.len());
        self.end = end;
        self.reset_token_state(start);
    }

    /// Move to `pos` and forget the current token.
    pub fn reset_token_state(&mut self, pos: usize) {
        debug_assert!(pos <= self.end);
        self.pos = pos;
        self.full_start = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_flags = TokenFlags::NONE;
    }

    /// Treat a `*` at the start of a line as trivia. Nested calls stack.
    pub fn set_skip_jsdoc_leading_asterisks(&mut self, skip: bool) {
        if skip {
            self.skip_jsdoc_leading_asterisks += 1;
        } else {
            self.skip_jsdoc_leading_asterisks = self.skip_jsdoc_leading_asterisks.saturating_sub(1);
        }
    }

    // ========================================================================
    // Token accessors
    // ========================================================================

    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    #[inline]
    pub fn token_text(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn token_full_start(&self) -> u32 {
        self.full_start as u32
    }

    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    #[inline]
    pub fn has_preceding_jsdoc_comment(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_JSDOC_COMMENT)
    }

    #[inline]
    pub fn has_unicode_escape(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNICODE_ESCAPE)
    }

    #[inline]
    pub fn has_extended_unicode_escape(&self) -> bool {
        self.token_flags.contains(TokenFlags::EXTENDED_UNICODE_ESCAPE)
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    /// Identifiers and contextual keywords.
    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.token == SyntaxKind::Identifier || self.token > SyntaxKind::LAST_RESERVED_WORD && self.token.is_keyword()
    }

    #[inline]
    pub fn is_reserved_word(&self) -> bool {
        self.token.is_reserved_word()
    }

    // ========================================================================
    // Errors
    // ========================================================================

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drain the queued lexical errors.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    fn error(&mut self, message: &'static DiagnosticMessage) {
        self.error_at(message, self.pos, 0);
    }

    fn error_at(&mut self, message: &'static DiagnosticMessage, pos: usize, length: usize) {
        self.errors.push(ScanError {
            pos: pos as u32,
            length: length as u32,
            message,
            arg: None,
        });
    }

    fn error_with_arg(&mut self, message: &'static DiagnosticMessage, pos: usize, length: usize, arg: String) {
        self.errors.push(ScanError {
            pos: pos as u32,
            length: length as u32,
            message,
            arg: Some(arg),
        });
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            end: self.end,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            skip_jsdoc_leading_asterisks: self.skip_jsdoc_leading_asterisks,
            errors_len: self.errors.len(),
        }
    }

    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.end = state.end;
        self.full_start = state.full_start;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.skip_jsdoc_leading_asterisks = state.skip_jsdoc_leading_asterisks;
        self.errors.truncate(state.errors_len);
    }

    /// Run `f` and always restore the scanner afterwards.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Run `f`, keeping its effects only when it returns `Some`.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    /// Run `f` over `[start, start + length)`, then restore the full state.
    pub fn scan_range<T>(&mut self, start: usize, length: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        self.set_text_range(start, start + length);
        let result = f(self);
        self.restore_state(state);
        result
    }

    // ========================================================================
    // Character access
    // ========================================================================

    /// Byte at `pos`, or 0 past the end of the scan range.
    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        if pos < self.end {
            self.bytes[pos]
        } else {
            0
        }
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.end {
            return None;
        }
        let b = self.bytes[pos];
        if b < 0x80 {
            Some(b as char)
        } else {
            self.text.get(pos..self.end).and_then(|rest| rest.chars().next())
        }
    }

    #[inline]
    fn set_token(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        self.token = kind;
        kind
    }

    // ========================================================================
    // Main scan
    // ========================================================================

    /// Scan the next token, skipping trivia.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            if self.pos >= self.end {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            }

            let b = self.bytes[self.pos];
            if self.pos == 0 && b == b'#' && is_shebang_trivia(self.text, 0) {
                self.pos = scan_shebang_trivia(&self.text[..self.end], 0);
                continue;
            }

            match b {
                b'\n' | b'\r' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                b'\t' | 0x0B | 0x0C | b' ' => self.pos += 1,
                b'!' => {
                    return if self.byte_at(self.pos + 1) == b'=' {
                        if self.byte_at(self.pos + 2) == b'=' {
                            self.set_token(3, SyntaxKind::ExclamationEqualsEqualsToken)
                        } else {
                            self.set_token(2, SyntaxKind::ExclamationEqualsToken)
                        }
                    } else {
                        self.set_token(1, SyntaxKind::ExclamationToken)
                    };
                }
                b'"' | b'\'' => {
                    let value = self.scan_string(false);
                    self.token_value = value;
                    self.token = SyntaxKind::StringLiteral;
                    return self.token;
                }
                b'`' => {
                    self.token = self.scan_template_and_set_token_value(false);
                    return self.token;
                }
                b'%' => {
                    return if self.byte_at(self.pos + 1) == b'=' {
                        self.set_token(2, SyntaxKind::PercentEqualsToken)
                    } else {
                        self.set_token(1, SyntaxKind::PercentToken)
                    };
                }
                b'&' => {
                    return match self.byte_at(self.pos + 1) {
                        b'&' if self.byte_at(self.pos + 2) == b'=' => {
                            self.set_token(3, SyntaxKind::AmpersandAmpersandEqualsToken)
                        }
                        b'&' => self.set_token(2, SyntaxKind::AmpersandAmpersandToken),
                        b'=' => self.set_token(2, SyntaxKind::AmpersandEqualsToken),
                        _ => self.set_token(1, SyntaxKind::AmpersandToken),
                    };
                }
                b'(' => return self.set_token(1, SyntaxKind::OpenParenToken),
                b')' => return self.set_token(1, SyntaxKind::CloseParenToken),
                b'*' => {
                    match self.byte_at(self.pos + 1) {
                        b'=' => return self.set_token(2, SyntaxKind::AsteriskEqualsToken),
                        b'*' if self.byte_at(self.pos + 2) == b'=' => {
                            return self.set_token(3, SyntaxKind::AsteriskAsteriskEqualsToken)
                        }
                        b'*' => return self.set_token(2, SyntaxKind::AsteriskAsteriskToken),
                        _ => {}
                    }
                    self.pos += 1;
                    if self.skip_jsdoc_leading_asterisks > 0
                        && !self.token_flags.contains(TokenFlags::PRECEDING_JSDOC_LEADING_ASTERISKS)
                        && self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
                    {
                        // Decoration at the start of a doc comment line.
                        self.token_flags |= TokenFlags::PRECEDING_JSDOC_LEADING_ASTERISKS;
                        continue;
                    }
                    self.token = SyntaxKind::AsteriskToken;
                    return self.token;
                }
                b'+' => {
                    return match self.byte_at(self.pos + 1) {
                        b'+' => self.set_token(2, SyntaxKind::PlusPlusToken),
                        b'=' => self.set_token(2, SyntaxKind::PlusEqualsToken),
                        _ => self.set_token(1, SyntaxKind::PlusToken),
                    };
                }
                b',' => return self.set_token(1, SyntaxKind::CommaToken),
                b'-' => {
                    return match self.byte_at(self.pos + 1) {
                        b'-' => self.set_token(2, SyntaxKind::MinusMinusToken),
                        b'=' => self.set_token(2, SyntaxKind::MinusEqualsToken),
                        _ => self.set_token(1, SyntaxKind::MinusToken),
                    };
                }
                b'.' => {
                    if self.byte_at(self.pos + 1).is_ascii_digit() {
                        self.token = self.scan_number();
                        return self.token;
                    }
                    return if self.byte_at(self.pos + 1) == b'.' && self.byte_at(self.pos + 2) == b'.' {
                        self.set_token(3, SyntaxKind::DotDotDotToken)
                    } else {
                        self.set_token(1, SyntaxKind::DotToken)
                    };
                }
                b'/' => {
                    match self.byte_at(self.pos + 1) {
                        b'/' => {
                            self.pos = self.find_line_end(self.pos + 2);
                            continue;
                        }
                        b'*' => {
                            self.skip_multi_line_comment();
                            continue;
                        }
                        b'=' => return self.set_token(2, SyntaxKind::SlashEqualsToken),
                        _ => return self.set_token(1, SyntaxKind::SlashToken),
                    }
                }
                b'0' if matches!(self.byte_at(self.pos + 1), b'x' | b'X') && self.pos + 2 < self.end => {
                    self.pos += 2;
                    let mut digits = self.scan_hex_digits(1, true, true);
                    if digits.is_empty() {
                        self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED);
                        digits.push('0');
                    }
                    self.token_flags |= TokenFlags::HEX_SPECIFIER;
                    self.token = self.check_big_int_suffix(&digits, 16);
                    return self.token;
                }
                b'0' if matches!(self.byte_at(self.pos + 1), b'b' | b'B') && self.pos + 2 < self.end => {
                    self.pos += 2;
                    let mut digits = self.scan_binary_or_octal_digits(2);
                    if digits.is_empty() {
                        self.error(&messages::BINARY_DIGIT_EXPECTED);
                        digits.push('0');
                    }
                    self.token_flags |= TokenFlags::BINARY_SPECIFIER;
                    self.token = self.check_big_int_suffix(&digits, 2);
                    return self.token;
                }
                b'0' if matches!(self.byte_at(self.pos + 1), b'o' | b'O') && self.pos + 2 < self.end => {
                    self.pos += 2;
                    let mut digits = self.scan_binary_or_octal_digits(8);
                    if digits.is_empty() {
                        self.error(&messages::OCTAL_DIGIT_EXPECTED);
                        digits.push('0');
                    }
                    self.token_flags |= TokenFlags::OCTAL_SPECIFIER;
                    self.token = self.check_big_int_suffix(&digits, 8);
                    return self.token;
                }
                b'0'..=b'9' => {
                    self.token = self.scan_number();
                    return self.token;
                }
                b':' => return self.set_token(1, SyntaxKind::ColonToken),
                b';' => return self.set_token(1, SyntaxKind::SemicolonToken),
                b'<' => {
                    if is_conflict_marker_trivia(self.text, self.pos) {
                        self.skip_conflict_marker();
                        continue;
                    }
                    return match self.byte_at(self.pos + 1) {
                        b'<' if self.byte_at(self.pos + 2) == b'=' => {
                            self.set_token(3, SyntaxKind::LessThanLessThanEqualsToken)
                        }
                        b'<' => self.set_token(2, SyntaxKind::LessThanLessThanToken),
                        b'=' => self.set_token(2, SyntaxKind::LessThanEqualsToken),
                        b'/' if self.language_variant == LanguageVariant::Jsx
                            && self.byte_at(self.pos + 2) != b'*' =>
                        {
                            self.set_token(2, SyntaxKind::LessThanSlashToken)
                        }
                        _ => self.set_token(1, SyntaxKind::LessThanToken),
                    };
                }
                b'=' => {
                    if is_conflict_marker_trivia(self.text, self.pos) {
                        self.skip_conflict_marker();
                        continue;
                    }
                    return match self.byte_at(self.pos + 1) {
                        b'=' if self.byte_at(self.pos + 2) == b'=' => {
                            self.set_token(3, SyntaxKind::EqualsEqualsEqualsToken)
                        }
                        b'=' => self.set_token(2, SyntaxKind::EqualsEqualsToken),
                        b'>' => self.set_token(2, SyntaxKind::EqualsGreaterThanToken),
                        _ => self.set_token(1, SyntaxKind::EqualsToken),
                    };
                }
                b'>' => {
                    if is_conflict_marker_trivia(self.text, self.pos) {
                        self.skip_conflict_marker();
                        continue;
                    }
                    // `>>`, `>=` and friends are produced by rescan_greater_than_token.
                    return self.set_token(1, SyntaxKind::GreaterThanToken);
                }
                b'?' => {
                    if self.byte_at(self.pos + 1) == b'.' && !self.byte_at(self.pos + 2).is_ascii_digit() {
                        return self.set_token(2, SyntaxKind::QuestionDotToken);
                    }
                    return match self.byte_at(self.pos + 1) {
                        b'?' if self.byte_at(self.pos + 2) == b'=' => {
                            self.set_token(3, SyntaxKind::QuestionQuestionEqualsToken)
                        }
                        b'?' => self.set_token(2, SyntaxKind::QuestionQuestionToken),
                        _ => self.set_token(1, SyntaxKind::QuestionToken),
                    };
                }
                b'[' => return self.set_token(1, SyntaxKind::OpenBracketToken),
                b']' => return self.set_token(1, SyntaxKind::CloseBracketToken),
                b'^' => {
                    return if self.byte_at(self.pos + 1) == b'=' {
                        self.set_token(2, SyntaxKind::CaretEqualsToken)
                    } else {
                        self.set_token(1, SyntaxKind::CaretToken)
                    };
                }
                b'{' => return self.set_token(1, SyntaxKind::OpenBraceToken),
                b'|' => {
                    if is_conflict_marker_trivia(self.text, self.pos) {
                        self.skip_conflict_marker();
                        continue;
                    }
                    return match self.byte_at(self.pos + 1) {
                        b'|' if self.byte_at(self.pos + 2) == b'=' => self.set_token(3, SyntaxKind::BarBarEqualsToken),
                        b'|' => self.set_token(2, SyntaxKind::BarBarToken),
                        b'=' => self.set_token(2, SyntaxKind::BarEqualsToken),
                        _ => self.set_token(1, SyntaxKind::BarToken),
                    };
                }
                b'}' => return self.set_token(1, SyntaxKind::CloseBraceToken),
                b'~' => return self.set_token(1, SyntaxKind::TildeToken),
                b'@' => return self.set_token(1, SyntaxKind::AtToken),
                b'\\' => {
                    if let Some(kind) = self.scan_escaped_identifier_start(self.pos, false) {
                        self.token = kind;
                        return kind;
                    }
                    self.error_at(&messages::INVALID_CHARACTER, self.pos, 1);
                    return self.set_token(1, SyntaxKind::Unknown);
                }
                b'#' => {
                    self.token = self.scan_private_identifier();
                    return self.token;
                }
                _ => {
                    let Some(ch) = self.char_at(self.pos) else {
                        self.token = SyntaxKind::EndOfFileToken;
                        return self.token;
                    };
                    if is_identifier_start(ch) {
                        self.token = self.scan_identifier(ch);
                        return self.token;
                    }
                    if is_white_space_single_line(ch) {
                        self.pos += ch.len_utf8();
                        continue;
                    }
                    if is_line_break(ch) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        self.pos += ch.len_utf8();
                        continue;
                    }
                    let size = ch.len_utf8();
                    self.error_at(&messages::INVALID_CHARACTER, self.pos, size);
                    return self.set_token(size, SyntaxKind::Unknown);
                }
            }
        }
    }

    /// Position of the first line break at or after `pos`.
    fn find_line_end(&self, mut pos: usize) -> usize {
        loop {
            match memchr::memchr3(b'\n', b'\r', 0xE2, &self.bytes[pos..self.end]) {
                None => return self.end,
                Some(offset) => {
                    pos += offset;
                    if self.bytes[pos] != 0xE2 || self.char_at(pos).is_some_and(is_line_break) {
                        return pos;
                    }
                    pos += 1;
                }
            }
        }
    }

    fn skip_multi_line_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let is_jsdoc = self.byte_at(self.pos) == b'*' && self.byte_at(self.pos + 1) != b'/';
        let body_start = self.pos;
        let closed = match memchr::memmem::find(&self.bytes[self.pos..self.end], b"*/") {
            Some(offset) => {
                self.pos += offset + 2;
                true
            }
            None => {
                self.pos = self.end;
                false
            }
        };
        let body = &self.text[body_start..self.pos];
        if memchr::memchr2(b'\n', b'\r', body.as_bytes()).is_some()
            || (!body.is_ascii() && body.chars().any(is_line_break))
        {
            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        if is_jsdoc && self.should_parse_jsdoc(start) {
            self.token_flags |= TokenFlags::PRECEDING_JSDOC_COMMENT;
        }
        if !closed {
            self.error(&messages::ASTERISK_SLASH_EXPECTED);
        }
    }

    fn should_parse_jsdoc(&self, comment_start: usize) -> bool {
        match self.jsdoc_parsing_mode {
            JSDocParsingMode::ParseAll => true,
            JSDocParsingMode::ParseNone => false,
            JSDocParsingMode::ParseForTypeErrors => {
                // Outside typed files documentation carries type information.
                if !matches!(self.script_kind, ScriptKind::Ts | ScriptKind::Tsx) {
                    return true;
                }
                contains_see_or_link(&self.bytes[comment_start..self.pos])
            }
        }
    }

    fn skip_conflict_marker(&mut self) {
        self.error_at(&messages::MERGE_CONFLICT_MARKER_ENCOUNTERED, self.pos, MERGE_CONFLICT_MARKER_LENGTH);
        self.pos = scan_conflict_marker_trivia(&self.text[..self.end], self.pos);
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn identifier_kind(&self) -> SyntaxKind {
        SyntaxKind::from_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_identifier(&mut self, first: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += first.len_utf8();
        while self.pos < self.end {
            let b = self.bytes[self.pos];
            if b < 0x80 {
                if b.is_ascii_alphanumeric() || b == b'$' || b == b'_' {
                    self.pos += 1;
                    continue;
                }
                break;
            }
            match self.char_at(self.pos) {
                Some(ch) if is_identifier_part(ch) => self.pos += ch.len_utf8(),
                _ => break,
            }
        }
        self.token_value.clear();
        self.token_value.push_str(&self.text[start..self.pos]);
        if self.byte_at(self.pos) == b'\\' {
            let rest = self.scan_identifier_parts();
            self.token_value.push_str(&rest);
        }
        self.identifier_kind()
    }

    /// Identifier parts, resolving unicode escapes.
    fn scan_identifier_parts(&mut self) -> String {
        let mut result = String::new();
        let mut start = self.pos;
        while let Some(ch) = self.char_at(self.pos) {
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '\\' {
                if self.peek_extended_unicode_escape().is_some_and(is_identifier_part) {
                    result.push_str(&self.text[start..self.pos]);
                    let escaped = self.scan_extended_unicode_escape(true);
                    result.push_str(&escaped);
                    start = self.pos;
                    continue;
                }
                match self.peek_unicode_escape().filter(|c| is_identifier_part(*c)) {
                    Some(cooked) => {
                        self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                        result.push_str(&self.text[start..self.pos]);
                        result.push(cooked);
                        self.pos += 6;
                        start = self.pos;
                    }
                    None => break,
                }
            } else {
                break;
            }
        }
        result.push_str(&self.text[start..self.pos]);
        result
    }

    /// An identifier starting with a unicode escape at `pos`.
    fn scan_escaped_identifier_start(&mut self, pos: usize, private: bool) -> Option<SyntaxKind> {
        debug_assert_eq!(self.byte_at(pos), b'\\');
        let saved = self.pos;
        self.pos = pos;
        let prefix = if private { "#" } else { "" };
        if self.peek_extended_unicode_escape().is_some_and(is_identifier_start) {
            let head = self.scan_extended_unicode_escape(true);
            let rest = self.scan_identifier_parts();
            self.token_value = format!("{prefix}{head}{rest}");
            return Some(if private {
                SyntaxKind::PrivateIdentifier
            } else {
                self.identifier_kind()
            });
        }
        if let Some(cooked) = self.peek_unicode_escape().filter(|c| is_identifier_start(*c)) {
            self.pos += 6;
            self.token_flags |= TokenFlags::UNICODE_ESCAPE;
            let rest = self.scan_identifier_parts();
            self.token_value = format!("{prefix}{cooked}{rest}");
            return Some(if private {
                SyntaxKind::PrivateIdentifier
            } else {
                self.identifier_kind()
            });
        }
        self.pos = saved;
        None
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        if self.pos != 0 && self.byte_at(self.pos + 1) == b'!' {
            self.error_at(&messages::HASH_BANG_CAN_ONLY_BE_USED_AT_THE_START_OF_A_FILE, self.pos, 2);
            self.pos += 1;
            return SyntaxKind::Unknown;
        }
        if self.byte_at(self.pos + 1) == b'\\' {
            if let Some(kind) = self.scan_escaped_identifier_start(self.pos + 1, true) {
                return kind;
            }
        }
        match self.char_at(self.pos + 1) {
            Some(ch) if is_identifier_start(ch) => {
                self.pos += 1;
                self.scan_identifier(ch);
                self.token_value.insert(0, '#');
            }
            _ => {
                self.token_value.clear();
                self.token_value.push('#');
                self.error_at(&messages::INVALID_CHARACTER, self.pos, 1);
                self.pos += 1;
            }
        }
        SyntaxKind::PrivateIdentifier
    }

    // ========================================================================
    // Escapes
    // ========================================================================

    /// The code point of a `\uXXXX` escape at the current position.
    fn peek_unicode_escape(&self) -> Option<char> {
        if self.pos + 5 < self.end && self.byte_at(self.pos + 1) == b'u' {
            let digits = self.text.get(self.pos + 2..self.pos + 6)?;
            if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                let value = u32::from_str_radix(digits, 16).ok()?;
                return char::from_u32(value);
            }
        }
        None
    }

    /// The code point of a `\u{...}` escape at the current position.
    fn peek_extended_unicode_escape(&mut self) -> Option<char> {
        if self.byte_at(self.pos + 1) == b'u' && self.byte_at(self.pos + 2) == b'{' {
            let start = self.pos;
            self.pos += 3;
            let digits = self.scan_hex_digits(1, true, false);
            self.pos = start;
            return u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
        }
        None
    }

    /// Scan `\u{...}` starting at the backslash.
    fn scan_extended_unicode_escape(&mut self, report_errors: bool) -> String {
        let start = self.pos;
        self.pos += 3;
        let escaped_start = self.pos;
        let digits = self.scan_hex_digits(1, true, false);
        let value = if digits.is_empty() {
            None
        } else {
            u32::from_str_radix(&digits, 16).ok().or(Some(u32::MAX))
        };
        let mut invalid = false;
        match value {
            None => {
                if report_errors {
                    self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED);
                }
                invalid = true;
            }
            Some(value) if value > 0x10FFFF => {
                if report_errors {
                    self.error_at(
                        &messages::AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF,
                        escaped_start,
                        self.pos - escaped_start,
                    );
                }
                invalid = true;
            }
            Some(_) => {}
        }
        if self.pos >= self.end {
            if report_errors {
                self.error(&messages::UNEXPECTED_END_OF_TEXT);
            }
            invalid = true;
        } else if self.bytes[self.pos] == b'}' {
            self.pos += 1;
        } else {
            if report_errors {
                self.error(&messages::UNTERMINATED_UNICODE_ESCAPE_SEQUENCE);
            }
            invalid = true;
        }
        if invalid {
            self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
            return self.text[start..self.pos].to_string();
        }
        self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
        value
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string()
    }

    /// Scan an escape sequence starting at the backslash, appending its cooked
    /// value to `out`.
    fn scan_escape_sequence(&mut self, out: &mut String, report_errors: bool) {
        let start = self.pos;
        self.pos += 1;
        let Some(ch) = self.char_at(self.pos) else {
            self.error(&messages::UNEXPECTED_END_OF_TEXT);
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            '0' if !self.byte_at(self.pos).is_ascii_digit() => out.push('\0'),
            '0'..='7' => {
                // `\1`, `\17`, `\177` but not `\477`.
                if ch <= '3' && is_octal_digit(self.byte_at(self.pos) as char) {
                    self.pos += 1;
                }
                if is_octal_digit(self.byte_at(self.pos) as char) {
                    self.pos += 1;
                }
                self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                let raw = &self.text[start..self.pos];
                if report_errors {
                    let code = u32::from_str_radix(&raw[1..], 8).unwrap_or(0);
                    self.error_with_arg(
                        &messages::OCTAL_ESCAPE_SEQUENCES_ARE_NOT_ALLOWED_USE_THE_SYNTAX_0,
                        start,
                        self.pos - start,
                        format!("\\x{:02x}", code),
                    );
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                } else {
                    out.push_str(raw);
                }
            }
            '8' | '9' => {
                self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                if report_errors {
                    let raw = self.text[start..self.pos].to_string();
                    self.error_with_arg(&messages::INVALID_ESCAPE_SEQUENCE, start, self.pos - start, raw);
                    out.push(ch);
                } else {
                    out.push_str(&self.text[start..self.pos]);
                }
            }
            'b' => out.push('\u{0008}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'v' => out.push('\u{000B}'),
            'f' => out.push('\u{000C}'),
            'r' => out.push('\r'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'u' if self.byte_at(self.pos) == b'{' => {
                self.pos = start;
                let escaped = self.scan_extended_unicode_escape(report_errors);
                out.push_str(&escaped);
            }
            'u' => {
                for _ in 0..4 {
                    if !self.byte_at(self.pos).is_ascii_hexdigit() {
                        self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                        if report_errors {
                            self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED);
                        }
                        out.push_str(&self.text[start..self.pos]);
                        return;
                    }
                    self.pos += 1;
                }
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                let value = u32::from_str_radix(&self.text[start + 2..self.pos], 16).unwrap_or(0);
                out.push(self.cook_utf16_unit(value));
            }
            'x' => {
                for _ in 0..2 {
                    if !self.byte_at(self.pos).is_ascii_hexdigit() {
                        self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                        if report_errors {
                            self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED);
                        }
                        out.push_str(&self.text[start..self.pos]);
                        return;
                    }
                    self.pos += 1;
                }
                self.token_flags |= TokenFlags::HEX_ESCAPE;
                let value = u32::from_str_radix(&self.text[start + 2..self.pos], 16).unwrap_or(0);
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            // Line continuation.
            '\r' => {
                if self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {}
            _ => out.push(ch),
        }
    }

    /// Cook one UTF-16 code unit from a `\uXXXX` escape. A high surrogate
    /// directly followed by an escaped low surrogate forms one character;
    /// lone surrogates become U+FFFD.
    fn cook_utf16_unit(&mut self, value: u32) -> char {
        if (0xD800..0xDC00).contains(&value) && self.byte_at(self.pos) == b'\\' {
            if let Some(low) = self.peek_surrogate_escape() {
                self.pos += 6;
                let combined = 0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
        }
        char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn peek_surrogate_escape(&self) -> Option<u32> {
        if self.byte_at(self.pos + 1) != b'u' {
            return None;
        }
        let digits = self.text.get(self.pos + 2..(self.pos + 6).min(self.end))?;
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        (0xDC00..0xE000).contains(&value).then_some(value)
    }

    // ========================================================================
    // Strings and templates
    // ========================================================================

    /// Scan a quoted string. JSX attribute strings keep backslashes and may
    /// span lines.
    fn scan_string(&mut self, jsx_attribute_string: bool) -> String {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let mut result = String::new();
        let mut start = self.pos;
        loop {
            if self.pos >= self.end {
                result.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            let b = self.bytes[self.pos];
            if b == quote {
                result.push_str(&self.text[start..self.pos]);
                self.pos += 1;
                break;
            }
            if b == b'\\' && !jsx_attribute_string {
                result.push_str(&self.text[start..self.pos]);
                self.scan_escape_sequence(&mut result, true);
                start = self.pos;
                continue;
            }
            if (b == b'\n' || b == b'\r') && !jsx_attribute_string {
                result.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            self.pos += 1;
        }
        result
    }

    /// Scan a template chunk starting at a backtick or at the `}` closing a
    /// substitution.
    fn scan_template_and_set_token_value(&mut self, report_invalid_escapes: bool) -> SyntaxKind {
        let started_with_backtick = self.bytes[self.pos] == b'`';
        self.pos += 1;
        let mut start = self.pos;
        let mut contents = String::new();
        let kind = loop {
            if self.pos >= self.end {
                contents.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL);
                break if started_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            let b = self.bytes[self.pos];
            if b == b'`' {
                contents.push_str(&self.text[start..self.pos]);
                self.pos += 1;
                break if started_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            if b == b'$' && self.byte_at(self.pos + 1) == b'{' {
                contents.push_str(&self.text[start..self.pos]);
                self.pos += 2;
                break if started_with_backtick {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
            }
            if b == b'\\' {
                contents.push_str(&self.text[start..self.pos]);
                self.scan_escape_sequence(&mut contents, report_invalid_escapes);
                start = self.pos;
                continue;
            }
            // `\r\n` and `\r` are normalized to `\n` in template values.
            if b == b'\r' {
                contents.push_str(&self.text[start..self.pos]);
                self.pos += 1;
                if self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
                contents.push('\n');
                start = self.pos;
                continue;
            }
            self.pos += 1;
        };
        self.token_value = contents;
        kind
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Decimal digits with numeric separators removed.
    fn scan_number_fragment(&mut self) -> String {
        let mut start = self.pos;
        let mut allow_separator = false;
        let mut previous_was_separator = false;
        let mut result = String::new();
        loop {
            let b = self.byte_at(self.pos);
            if b == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if allow_separator {
                    allow_separator = false;
                    previous_was_separator = true;
                    result.push_str(&self.text[start..self.pos]);
                } else {
                    self.token_flags |= TokenFlags::CONTAINS_INVALID_SEPARATOR;
                    let message = if previous_was_separator {
                        &messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED
                    } else {
                        &messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE
                    };
                    self.error_at(message, self.pos, 1);
                }
                self.pos += 1;
                start = self.pos;
                continue;
            }
            if b.is_ascii_digit() {
                allow_separator = true;
                previous_was_separator = false;
                self.pos += 1;
                continue;
            }
            break;
        }
        if self.pos > 0 && self.bytes[self.pos - 1] == b'_' {
            self.token_flags |= TokenFlags::CONTAINS_INVALID_SEPARATOR;
            self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, 1);
        }
        result.push_str(&self.text[start..self.pos]);
        result
    }

    /// Digits after a leading zero: returns the digits and whether they are
    /// all octal.
    fn scan_digits(&mut self) -> (String, bool) {
        let start = self.pos;
        let mut is_octal = true;
        while self.byte_at(self.pos).is_ascii_digit() {
            if !is_octal_digit(self.bytes[self.pos] as char) {
                is_octal = false;
            }
            self.pos += 1;
        }
        (self.text[start..self.pos].to_string(), is_octal)
    }

    fn scan_binary_or_octal_digits(&mut self, base: u32) -> String {
        let mut value = String::new();
        let mut separator_allowed = false;
        let mut previous_was_separator = false;
        loop {
            let b = self.byte_at(self.pos);
            if b == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if separator_allowed {
                    separator_allowed = false;
                    previous_was_separator = true;
                } else if previous_was_separator {
                    self.error_at(&messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED, self.pos, 1);
                } else {
                    self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, 1);
                }
                self.pos += 1;
                continue;
            }
            separator_allowed = true;
            if !(b as char).is_digit(base) {
                break;
            }
            value.push(b as char);
            self.pos += 1;
            previous_was_separator = false;
        }
        if self.pos > 0 && self.bytes[self.pos - 1] == b'_' {
            self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, 1);
        }
        value
    }

    fn scan_hex_digits(&mut self, min_count: usize, scan_as_many_as_possible: bool, can_have_separators: bool) -> String {
        let mut value = String::new();
        let mut allow_separator = false;
        let mut previous_was_separator = false;
        while value.len() < min_count || scan_as_many_as_possible {
            let b = self.byte_at(self.pos);
            if can_have_separators && b == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if allow_separator {
                    allow_separator = false;
                    previous_was_separator = true;
                } else if previous_was_separator {
                    self.error_at(&messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED, self.pos, 1);
                } else {
                    self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, 1);
                }
                self.pos += 1;
                continue;
            }
            allow_separator = can_have_separators;
            if !b.is_ascii_hexdigit() {
                break;
            }
            value.push(b.to_ascii_lowercase() as char);
            self.pos += 1;
            previous_was_separator = false;
        }
        if value.len() < min_count {
            value.clear();
        }
        if can_have_separators && self.pos > 0 && self.bytes[self.pos - 1] == b'_' {
            self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, 1);
        }
        value
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let main_fragment;
        if self.bytes[self.pos] == b'0' {
            self.pos += 1;
            if self.byte_at(self.pos) == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR | TokenFlags::CONTAINS_INVALID_SEPARATOR;
                self.error_at(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, 1);
                self.pos -= 1;
                main_fragment = self.scan_number_fragment();
            } else {
                let (digits, is_octal) = self.scan_digits();
                if digits.is_empty() {
                    main_fragment = "0".to_string();
                } else if !is_octal {
                    // `09`: a decimal with a leading zero.
                    self.token_flags |= TokenFlags::CONTAINS_LEADING_ZERO;
                    main_fragment = digits;
                } else {
                    // Legacy octal such as `017`.
                    let value = radix_to_decimal(&digits, 8);
                    self.token_flags |= TokenFlags::OCTAL;
                    let suggestion = format!("0o{}", digits.trim_start_matches('0'));
                    self.error_with_arg(
                        &messages::OCTAL_LITERALS_ARE_NOT_ALLOWED_USE_THE_SYNTAX_0,
                        start,
                        self.pos - start,
                        if suggestion == "0o" { "0o0".to_string() } else { suggestion },
                    );
                    self.token_value = value;
                    return SyntaxKind::NumericLiteral;
                }
            }
        } else {
            main_fragment = self.scan_number_fragment();
        }

        let mut decimal_fragment = None;
        let mut scientific_fragment = None;
        if self.byte_at(self.pos) == b'.' {
            self.pos += 1;
            decimal_fragment = Some(self.scan_number_fragment());
        }
        let mut end = self.pos;
        if matches!(self.byte_at(self.pos), b'e' | b'E') {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            if matches!(self.byte_at(self.pos), b'+' | b'-') {
                self.pos += 1;
            }
            let pre_numeric = self.pos;
            let final_fragment = self.scan_number_fragment();
            if final_fragment.is_empty() {
                self.error(&messages::DIGIT_EXPECTED);
            } else {
                scientific_fragment = Some(format!("{}{}", &self.text[end..pre_numeric], final_fragment));
                end = self.pos;
            }
        }

        let result = if self.token_flags.contains(TokenFlags::CONTAINS_SEPARATOR) {
            let mut result = main_fragment;
            if let Some(decimal) = &decimal_fragment {
                result.push('.');
                result.push_str(decimal);
            }
            if let Some(scientific) = &scientific_fragment {
                result.push_str(scientific);
            }
            result
        } else if self.token_flags.contains(TokenFlags::CONTAINS_LEADING_ZERO) {
            self.text[start..end].trim_start_matches('0').to_string()
        } else {
            self.text[start..end].to_string()
        };

        if self.token_flags.contains(TokenFlags::CONTAINS_LEADING_ZERO) {
            self.error_at(&messages::DECIMALS_WITH_LEADING_ZEROS_ARE_NOT_ALLOWED, start, end - start);
            self.token_value = result;
            return SyntaxKind::NumericLiteral;
        }

        if decimal_fragment.is_some() || self.token_flags.contains(TokenFlags::SCIENTIFIC) {
            self.check_for_identifier_start_after_numeric_literal(
                start,
                decimal_fragment.is_none() && self.token_flags.contains(TokenFlags::SCIENTIFIC),
            );
            self.token_value = result;
            SyntaxKind::NumericLiteral
        } else {
            self.check_big_int_suffix(&result, 10)
        }
    }

    /// Finish an integer literal: a trailing `n` makes it a bigint. The token
    /// value is the decimal form of `digits`.
    fn check_big_int_suffix(&mut self, digits: &str, radix: u32) -> SyntaxKind {
        let decimal = if radix == 10 {
            digits.to_string()
        } else {
            radix_to_decimal(digits, radix)
        };
        if self.byte_at(self.pos) == b'n' {
            self.token_value = decimal;
            self.token_value.push('n');
            self.pos += 1;
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = decimal;
        if radix == 10 {
            let start = self.token_start;
            self.check_for_identifier_start_after_numeric_literal(start, false);
        }
        SyntaxKind::NumericLiteral
    }

    fn check_for_identifier_start_after_numeric_literal(&mut self, numeric_start: usize, is_scientific: bool) {
        match self.char_at(self.pos) {
            Some(ch) if is_identifier_start(ch) => {}
            _ => return,
        }
        let identifier_start = self.pos;
        let saved_value = std::mem::take(&mut self.token_value);
        let saved_flags = self.token_flags;
        let parts = self.scan_identifier_parts();
        self.token_value = saved_value;
        self.token_flags = saved_flags;
        if parts == "n" {
            let message = if is_scientific {
                &messages::A_BIGINT_LITERAL_CANNOT_USE_EXPONENTIAL_NOTATION
            } else {
                &messages::A_BIGINT_LITERAL_MUST_BE_AN_INTEGER
            };
            self.error_at(message, numeric_start, identifier_start - numeric_start + 1);
        } else {
            self.error_at(
                &messages::AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL,
                identifier_start,
                self.pos - identifier_start,
            );
            self.pos = identifier_start;
        }
    }

    // ========================================================================
    // Rescans
    // ========================================================================

    /// Combine `>` with following `>`/`=` characters.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::GreaterThanToken {
            let kind = match (self.byte_at(self.pos), self.byte_at(self.pos + 1), self.byte_at(self.pos + 2)) {
                (b'>', b'>', b'=') => Some((3, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)),
                (b'>', b'>', _) => Some((2, SyntaxKind::GreaterThanGreaterThanGreaterThanToken)),
                (b'>', b'=', _) => Some((2, SyntaxKind::GreaterThanGreaterThanEqualsToken)),
                (b'>', _, _) => Some((1, SyntaxKind::GreaterThanGreaterThanToken)),
                (b'=', _, _) => Some((1, SyntaxKind::GreaterThanEqualsToken)),
                _ => None,
            };
            if let Some((len, kind)) = kind {
                return self.set_token(len, kind);
            }
        }
        self.token
    }

    /// Reinterpret `/` or `/=` as the start of a regular expression.
    pub fn rescan_slash_token(&mut self, report_errors: bool) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let body_start = self.token_start + 1;
        self.pos = body_start;
        let mut in_escape = false;
        let mut in_character_class = false;
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            if in_escape {
                in_escape = false;
            } else if ch == '/' && !in_character_class {
                break;
            } else if ch == '[' {
                in_character_class = true;
            } else if ch == '\\' {
                in_escape = true;
            } else if ch == ']' {
                in_character_class = false;
            }
            self.pos += ch.len_utf8();
        }

        if self.token_flags.contains(TokenFlags::UNTERMINATED) {
            // Stop at the nearest unbalanced bracket for better recovery.
            let body_end = self.pos;
            self.pos = body_start;
            let mut in_escape = false;
            let mut class_depth = 0u32;
            let mut in_quantifier = false;
            let mut group_depth = 0u32;
            while self.pos < body_end {
                let b = self.bytes[self.pos];
                if in_escape {
                    in_escape = false;
                } else if b == b'\\' {
                    in_escape = true;
                } else if b == b'[' {
                    class_depth += 1;
                } else if b == b']' && class_depth > 0 {
                    class_depth -= 1;
                } else if class_depth == 0 {
                    if b == b'{' {
                        in_quantifier = true;
                    } else if b == b'}' && in_quantifier {
                        in_quantifier = false;
                    } else if !in_quantifier {
                        if b == b'(' {
                            group_depth += 1;
                        } else if b == b')' && group_depth > 0 {
                            group_depth -= 1;
                        } else if matches!(b, b')' | b']' | b'}') {
                            break;
                        }
                    }
                }
                self.pos += 1;
            }
            // Trailing whitespace and semicolons are unlikely to belong to the regex.
            let trimmed = self.text[body_start..self.pos].trim_end_matches(|c: char| is_white_space_like(c) || c == ';');
            self.pos = body_start + trimmed.len();
            self.error_at(
                &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                self.token_start,
                self.pos - self.token_start,
            );
        } else {
            self.pos += 1;
            let mut seen = String::new();
            while let Some(ch) = self.char_at(self.pos) {
                if !is_identifier_part(ch) {
                    break;
                }
                if report_errors {
                    if !"dgimsuvy".contains(ch) {
                        self.error_at(&messages::UNKNOWN_REGULAR_EXPRESSION_FLAG, self.pos, ch.len_utf8());
                    } else if seen.contains(ch) {
                        self.error_at(&messages::DUPLICATE_REGULAR_EXPRESSION_FLAG, self.pos, 1);
                    }
                }
                seen.push(ch);
                self.pos += ch.len_utf8();
            }
        }
        self.token_value.clear();
        self.token_value.push_str(&self.text[self.token_start..self.pos]);
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Rescan from the `}` that closes a template substitution.
    pub fn rescan_template_token(&mut self, is_tagged_template: bool) -> SyntaxKind {
        self.pos = self.token_start;
        self.token_flags.remove(TokenFlags::TEMPLATE_LITERAL_LIKE_FLAGS);
        self.token = self.scan_template_and_set_token_value(!is_tagged_template);
        self.token
    }

    /// Rescan a template head or no-substitution template, reporting invalid
    /// escapes.
    pub fn rescan_template_head_or_no_substitution_template(&mut self) -> SyntaxKind {
        self.pos = self.token_start;
        self.token_flags.remove(TokenFlags::TEMPLATE_LITERAL_LIKE_FLAGS);
        self.token = self.scan_template_and_set_token_value(true);
        self.token
    }

    /// Split `<<` into `<`.
    pub fn rescan_less_than_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::LessThanLessThanToken {
            self.pos = self.token_start + 1;
            self.token = SyntaxKind::LessThanToken;
        }
        self.token
    }

    /// Split `??` into `?`.
    pub fn rescan_question_token(&mut self) -> SyntaxKind {
        debug_assert_eq!(self.token, SyntaxKind::QuestionQuestionToken);
        self.pos = self.token_start + 1;
        self.token = SyntaxKind::QuestionToken;
        self.token
    }

    /// Treat `*=` as `*` followed by `=`: the next scan starts at the `=`.
    pub fn rescan_asterisk_equals_token(&mut self) -> SyntaxKind {
        debug_assert_eq!(self.token, SyntaxKind::AsteriskEqualsToken);
        self.pos = self.token_start + 1;
        self.token = SyntaxKind::EqualsToken;
        self.token
    }

    /// Split a private identifier into `#` and the name.
    pub fn rescan_hash_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::PrivateIdentifier {
            self.pos = self.token_start + 1;
            self.token = SyntaxKind::HashToken;
        }
        self.token
    }

    // ========================================================================
    // JSX
    // ========================================================================

    /// Scan JSX children: text, `<`, `</` or `{`.
    pub fn scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        if self.pos >= self.end {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }
        match self.bytes[self.pos] {
            b'<' if self.byte_at(self.pos + 1) == b'/' => return self.set_token(2, SyntaxKind::LessThanSlashToken),
            b'<' => return self.set_token(1, SyntaxKind::LessThanToken),
            b'{' => return self.set_token(1, SyntaxKind::OpenBraceToken),
            _ => {}
        }

        // 0: only whitespace seen; -1: whitespace then a line break.
        let mut first_non_whitespace: isize = 0;
        while let Some(ch) = self.char_at(self.pos) {
            if ch == '{' {
                break;
            }
            if ch == '<' {
                if is_conflict_marker_trivia(self.text, self.pos) {
                    self.skip_conflict_marker();
                    self.token = SyntaxKind::ConflictMarkerTrivia;
                    return self.token;
                }
                break;
            }
            if ch == '>' {
                self.error_at(&messages::UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_GT, self.pos, 1);
            }
            if ch == '}' {
                self.error_at(&messages::UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_RBRACE, self.pos, 1);
            }
            if is_line_break(ch) && first_non_whitespace == 0 {
                first_non_whitespace = -1;
            } else if !allow_multiline_jsx_text && is_line_break(ch) && first_non_whitespace > 0 {
                break;
            } else if !is_white_space_like(ch) {
                first_non_whitespace = self.pos as isize;
            }
            self.pos += ch.len_utf8();
        }
        self.token_value.push_str(&self.text[self.full_start..self.pos]);
        self.token = if first_non_whitespace == -1 {
            SyntaxKind::JsxTextAllWhiteSpaces
        } else {
            SyntaxKind::JsxText
        };
        self.token
    }

    pub fn rescan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        self.pos = self.full_start;
        self.token_start = self.full_start;
        self.scan_jsx_token(allow_multiline_jsx_text)
    }

    /// Extend an identifier or keyword with `-` and further identifier parts.
    pub fn scan_jsx_identifier(&mut self) -> SyntaxKind {
        if self.token.is_identifier_or_keyword() {
            while self.pos < self.end {
                if self.bytes[self.pos] == b'-' {
                    self.token_value.push('-');
                    self.pos += 1;
                    continue;
                }
                let before = self.pos;
                let parts = self.scan_identifier_parts();
                self.token_value.push_str(&parts);
                if self.pos == before {
                    break;
                }
            }
            self.token = self.identifier_kind();
        }
        self.token
    }

    /// Scan an attribute initializer: a raw string or any ordinary token.
    pub fn scan_jsx_attribute_value(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        match self.byte_at(self.pos) {
            b'"' | b'\'' => {
                self.token_start = self.pos;
                self.token_flags = TokenFlags::NONE;
                let value = self.scan_string(true);
                self.token_value = value;
                self.token = SyntaxKind::StringLiteral;
                self.token
            }
            _ => self.scan(),
        }
    }

    // ========================================================================
    // Documentation comments
    // ========================================================================

    /// Scan one token of documentation comment structure. Whitespace and line
    /// breaks are returned as tokens.
    pub fn scan_jsdoc_token(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        let Some(ch) = self.char_at(self.pos) else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };
        self.pos += ch.len_utf8();
        let kind = match ch {
            '\t' | '\u{000B}' | '\u{000C}' | ' ' => {
                while self.char_at(self.pos).is_some_and(is_white_space_single_line) {
                    self.pos += 1;
                }
                SyntaxKind::WhitespaceTrivia
            }
            '@' => SyntaxKind::AtToken,
            '\r' | '\n' => {
                if ch == '\r' && self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                SyntaxKind::NewLineTrivia
            }
            '*' => SyntaxKind::AsteriskToken,
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '<' => SyntaxKind::LessThanToken,
            '>' => SyntaxKind::GreaterThanToken,
            '=' => SyntaxKind::EqualsToken,
            ',' => SyntaxKind::CommaToken,
            '.' => SyntaxKind::DotToken,
            '`' => SyntaxKind::BacktickToken,
            '#' => SyntaxKind::HashToken,
            '\\' => {
                self.pos -= 1;
                match self.scan_escaped_identifier_start(self.pos, false) {
                    Some(kind) => kind,
                    None => {
                        self.pos += 1;
                        SyntaxKind::Unknown
                    }
                }
            }
            _ if is_identifier_start(ch) => {
                while let Some(next) = self.char_at(self.pos) {
                    if is_identifier_part(next) || next == '-' {
                        self.pos += next.len_utf8();
                    } else {
                        break;
                    }
                }
                self.token_value.push_str(&self.text[self.token_start..self.pos]);
                if self.byte_at(self.pos) == b'\\' {
                    let rest = self.scan_identifier_parts();
                    self.token_value.push_str(&rest);
                }
                self.identifier_kind()
            }
            _ => SyntaxKind::Unknown,
        };
        self.token = kind;
        kind
    }

    /// Scan comment text up to a line break, a backtick, an inline tag `{` or
    /// a tag-starting `@`.
    pub fn scan_jsdoc_comment_text_token(&mut self, in_backticks: bool) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        if self.pos >= self.end {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }
        while let Some(ch) = self.char_at(self.pos) {
            if is_line_break(ch) || ch == '`' {
                break;
            }
            if !in_backticks {
                if ch == '{' {
                    break;
                }
                // `@` starts a tag only after whitespace and before non-whitespace.
                if ch == '@'
                    && self.text[..self.pos].chars().next_back().is_some_and(is_white_space_single_line)
                    && !self.char_at(self.pos + 1).is_some_and(is_white_space_like)
                {
                    break;
                }
            }
            self.pos += ch.len_utf8();
        }
        if self.pos == self.token_start {
            return self.scan_jsdoc_token();
        }
        self.token_value.push_str(&self.text[self.token_start..self.pos]);
        self.token = SyntaxKind::JSDocCommentTextToken;
        self.token
    }
}

/// Case-insensitive search for `@see` or `@link`.
fn contains_see_or_link(bytes: &[u8]) -> bool {
    memchr::memchr_iter(b'@', bytes).any(|at| {
        let rest = &bytes[at + 1..];
        rest.get(..3).is_some_and(|w| w.eq_ignore_ascii_case(b"see"))
            || rest.get(..4).is_some_and(|w| w.eq_ignore_ascii_case(b"link"))
    })
}

/// Convert digits in `radix` to a decimal string of arbitrary size.
fn radix_to_decimal(digits: &str, radix: u32) -> String {
    // Little-endian base-10 digits.
    let mut out: Vec<u8> = vec![0];
    for value in digits.chars().filter_map(|c| c.to_digit(radix)) {
        let mut carry = value;
        for slot in out.iter_mut() {
            let next = *slot as u32 * radix + carry;
            *slot = (next % 10) as u8;
            carry = next / 10;
        }
        while carry > 0 {
            out.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    out.iter().rev().map(|d| (b'0' + d) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(text);
        let mut result = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            result.push(kind);
        }
        result
    }

    #[test]
    fn test_scan_punctuation() {
        assert_eq!(
            kinds("{ } ( ) ; , ?. ?? ??= ... => === !== **="),
            vec![
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::CommaToken,
                SyntaxKind::QuestionDotToken,
                SyntaxKind::QuestionQuestionToken,
                SyntaxKind::QuestionQuestionEqualsToken,
                SyntaxKind::DotDotDotToken,
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::EqualsEqualsEqualsToken,
                SyntaxKind::ExclamationEqualsEqualsToken,
                SyntaxKind::AsteriskAsteriskEqualsToken,
            ]
        );
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::ColonToken,
                SyntaxKind::NumericLiteral,
            ]
        );
    }

    #[test]
    fn test_scan_keywords_and_identifiers() {
        let mut scanner = Scanner::new("const foo = await bar");
        assert_eq!(scanner.scan(), SyntaxKind::ConstKeyword);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "foo");
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::AwaitKeyword);
        assert!(scanner.is_identifier());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_unicode_escaped_identifier() {
        let mut scanner = Scanner::new("\\u0061bc x\\u{62}");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "abc");
        assert!(scanner.has_unicode_escape());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "xb");
        assert!(scanner.has_extended_unicode_escape());
    }

    #[test]
    fn test_escaped_keyword_keeps_keyword_kind() {
        let mut scanner = Scanner::new("\\u0076ar");
        assert_eq!(scanner.scan(), SyntaxKind::VarKeyword);
        assert!(scanner.has_unicode_escape());
    }

    #[test]
    fn test_scan_string_escapes() {
        let mut scanner = Scanner::new(r#""a\tb\x41\u0042\u{1F600}\
c""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\tbAB\u{1F600}c");
        assert!(!scanner.has_errors());
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let mut scanner = Scanner::new(r#"'\uD83D\uDE00'"#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "\u{1F600}");
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = Scanner::new("'abc\nx");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.token_value(), "abc");
        let errors = scanner.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message.code, 1002);
        assert_eq!(errors[0].pos, 4);
    }

    #[test]
    fn test_octal_escape_in_string() {
        let mut scanner = Scanner::new(r#""\01""#);
        scanner.scan();
        let errors = scanner.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message.code, 1487);
        assert_eq!(errors[0].arg.as_deref(), Some("\\x01"));
        assert_eq!(scanner.token_value(), "\u{1}");
    }

    #[test]
    fn test_scan_numbers() {
        let mut scanner = Scanner::new("1_000 0xFF 0b101 0o17 1.5e3 123n 0x10n .5");
        let expected = [
            (SyntaxKind::NumericLiteral, "1000"),
            (SyntaxKind::NumericLiteral, "255"),
            (SyntaxKind::NumericLiteral, "5"),
            (SyntaxKind::NumericLiteral, "15"),
            (SyntaxKind::NumericLiteral, "1.5e3"),
            (SyntaxKind::BigIntLiteral, "123n"),
            (SyntaxKind::BigIntLiteral, "16n"),
            (SyntaxKind::NumericLiteral, ".5"),
        ];
        for (kind, value) in expected {
            assert_eq!(scanner.scan(), kind);
            assert_eq!(scanner.token_value(), value);
        }
        assert!(!scanner.has_errors());
    }

    #[test]
    fn test_numeric_errors() {
        let mut scanner = Scanner::new("017");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), "15");
        let errors = scanner.take_errors();
        assert_eq!(errors[0].message.code, 1121);
        assert_eq!(errors[0].arg.as_deref(), Some("0o17"));

        let mut scanner = Scanner::new("09");
        scanner.scan();
        assert_eq!(scanner.token_value(), "9");
        assert_eq!(scanner.take_errors()[0].message.code, 1489);

        let mut scanner = Scanner::new("1__0");
        scanner.scan();
        assert_eq!(scanner.take_errors()[0].message.code, 6189);

        let mut scanner = Scanner::new("3in");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.take_errors()[0].message.code, 1351);
        assert_eq!(scanner.scan(), SyntaxKind::InKeyword);

        let mut scanner = Scanner::new("1.5n");
        scanner.scan();
        assert_eq!(scanner.take_errors()[0].message.code, 1353);
    }

    #[test]
    fn test_big_hex_literal_is_exact() {
        let mut scanner = Scanner::new("0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFn");
        assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
        assert_eq!(scanner.token_value(), "340282366920938463463374607431768211455n");
    }

    #[test]
    fn test_template_tokens() {
        let mut scanner = Scanner::new("`a${x}b${y}c`");
        assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.rescan_template_token(false), SyntaxKind::TemplateMiddle);
        assert_eq!(scanner.token_value(), "b");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        scanner.scan();
        assert_eq!(scanner.rescan_template_token(false), SyntaxKind::TemplateTail);
        assert_eq!(scanner.token_value(), "c");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_template_invalid_escape_is_deferred() {
        let mut scanner = Scanner::new(r"`\unicode`");
        assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE));
        assert!(!scanner.has_errors());
        scanner.rescan_template_head_or_no_substitution_template();
        assert_eq!(scanner.take_errors()[0].message.code, 1125);
    }

    #[test]
    fn test_template_normalizes_carriage_returns() {
        let mut scanner = Scanner::new("`a\r\nb\rc`");
        scanner.scan();
        assert_eq!(scanner.token_value(), "a\nb\nc");
    }

    #[test]
    fn test_rescan_greater_than() {
        let mut scanner = Scanner::new("a >>>= b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(
            scanner.rescan_greater_than_token(),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        );
        assert_eq!(scanner.token_end(), 6);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_rescan_regex() {
        let mut scanner = Scanner::new("/ab[/]c/gi;");
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(scanner.rescan_slash_token(true), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_value(), "/ab[/]c/gi");
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
    }

    #[test]
    fn test_unterminated_regex_recovers_at_bracket() {
        let mut scanner = Scanner::new("f(/abc);");
        scanner.scan();
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.rescan_slash_token(true), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_text(), "/abc");
        assert_eq!(scanner.take_errors()[0].message.code, 1161);
        assert_eq!(scanner.scan(), SyntaxKind::CloseParenToken);
    }

    #[test]
    fn test_regex_flag_errors() {
        let mut scanner = Scanner::new("/a/gg");
        scanner.scan();
        scanner.rescan_slash_token(true);
        assert_eq!(scanner.take_errors()[0].message.code, 1500);
    }

    #[test]
    fn test_comments_and_line_breaks() {
        let mut scanner = Scanner::new("a // c\n/* d\n */ b");
        scanner.scan();
        assert!(!scanner.has_preceding_line_break());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.token_full_start(), 1);
        assert_eq!(scanner.token_start(), 16);
    }

    #[test]
    fn test_line_separator_ends_line_comment() {
        let mut scanner = Scanner::new("// c\u{2028}x");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
    }

    #[test]
    fn test_jsdoc_comment_flag_depends_on_mode() {
        let text = "/** doc */ x";
        let mut scanner = Scanner::new(text);
        scanner.scan();
        assert!(scanner.has_preceding_jsdoc_comment());

        let mut scanner = Scanner::new(text);
        scanner.set_jsdoc_parsing_mode(JSDocParsingMode::ParseNone);
        scanner.scan();
        assert!(!scanner.has_preceding_jsdoc_comment());

        let mut scanner = Scanner::new(text);
        scanner.set_jsdoc_parsing_mode(JSDocParsingMode::ParseForTypeErrors);
        scanner.scan();
        assert!(!scanner.has_preceding_jsdoc_comment());

        let mut scanner = Scanner::new("/** {@link X} */ x");
        scanner.set_jsdoc_parsing_mode(JSDocParsingMode::ParseForTypeErrors);
        scanner.scan();
        assert!(scanner.has_preceding_jsdoc_comment());

        let mut scanner = Scanner::new("/**/ x");
        scanner.scan();
        assert!(!scanner.has_preceding_jsdoc_comment());
    }

    #[test]
    fn test_unterminated_comment() {
        let mut scanner = Scanner::new("/* open");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
        let errors = scanner.take_errors();
        assert_eq!(errors[0].message.code, 1010);
        assert_eq!(errors[0].pos, 7);
    }

    #[test]
    fn test_shebang_and_invalid_hash_bang() {
        let mut scanner = Scanner::new("#!/bin/node\nx #!");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.take_errors()[0].message.code, 18026);
    }

    #[test]
    fn test_private_identifier() {
        let mut scanner = Scanner::new("#foo #");
        assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
        assert_eq!(scanner.token_value(), "#foo");
        assert_eq!(scanner.rescan_hash_token(), SyntaxKind::HashToken);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
        assert_eq!(scanner.take_errors()[0].message.code, 1127);
    }

    #[test]
    fn test_invalid_character() {
        let mut scanner = Scanner::new("a ¬ b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.token_text(), "¬");
        let errors = scanner.take_errors();
        assert_eq!((errors[0].pos, errors[0].length), (2, 2));
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_conflict_marker_is_trivia() {
        let mut scanner = Scanner::new("<<<<<<< HEAD\nx\n=======\ny\n>>>>>>> b\n");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
        assert_eq!(scanner.take_errors().len(), 3);
    }

    #[test]
    fn test_look_ahead_restores_state() {
        let mut scanner = Scanner::new("a b c");
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.token_end(), 1);
    }

    #[test]
    fn test_try_scan_commits_on_some() {
        let mut scanner = Scanner::new("a ;");
        scanner.scan();
        let none: Option<()> = scanner.try_scan(|s| {
            s.scan();
            None
        });
        assert!(none.is_none());
        assert_eq!(scanner.token(), SyntaxKind::Identifier);
        let some = scanner.try_scan(|s| (s.scan() == SyntaxKind::SemicolonToken).then_some(()));
        assert!(some.is_some());
        assert_eq!(scanner.token(), SyntaxKind::SemicolonToken);
    }

    #[test]
    fn test_restore_state_drops_speculative_errors() {
        let mut scanner = Scanner::new("a 'open");
        scanner.scan();
        let state = scanner.save_state();
        scanner.scan();
        assert!(scanner.has_errors());
        scanner.restore_state(state);
        assert!(!scanner.has_errors());
    }

    #[test]
    fn test_scan_range() {
        let mut scanner = Scanner::new("aaa bbb ccc");
        scanner.scan();
        let inner = scanner.scan_range(4, 3, |s| {
            let kind = s.scan();
            (kind, s.token_value().to_string(), s.scan())
        });
        assert_eq!(inner, (SyntaxKind::Identifier, "bbb".to_string(), SyntaxKind::EndOfFileToken));
        assert_eq!(scanner.token_value(), "aaa");
    }

    #[test]
    fn test_jsx_tokens() {
        let mut scanner = Scanner::new("<div>hello {x}</div>");
        scanner.set_language_variant(LanguageVariant::Jsx);
        assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxText);
        assert_eq!(scanner.token_value(), "hello ");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::OpenBraceToken);
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::LessThanSlashToken);
    }

    #[test]
    fn test_jsx_whitespace_text() {
        let mut scanner = Scanner::new("  \n  <");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxTextAllWhiteSpaces);
        let mut scanner = Scanner::new("  x\n  <");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxText);
    }

    #[test]
    fn test_jsx_text_reports_stray_brace() {
        let mut scanner = Scanner::new("a } b<");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxText);
        assert_eq!(scanner.take_errors()[0].message.code, 1381);
    }

    #[test]
    fn test_jsx_identifier_with_dashes() {
        let mut scanner = Scanner::new("data-foo-bar=");
        scanner.scan();
        assert_eq!(scanner.scan_jsx_identifier(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "data-foo-bar");
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
    }

    #[test]
    fn test_jsx_attribute_string_keeps_backslashes() {
        let mut scanner = Scanner::new(r#""a\nb""#);
        assert_eq!(scanner.scan_jsx_attribute_value(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), r"a\nb");
    }

    #[test]
    fn test_jsdoc_tokens() {
        let mut scanner = Scanner::new("@param {string} my-name");
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::AtToken);
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::WhitespaceTrivia);
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::StringKeyword);
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::CloseBraceToken);
        scanner.scan_jsdoc_token();
        assert_eq!(scanner.scan_jsdoc_token(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "my-name");
    }

    #[test]
    fn test_jsdoc_comment_text() {
        let mut scanner = Scanner::new("some text {@link x} and a@b @tag");
        assert_eq!(scanner.scan_jsdoc_comment_text_token(false), SyntaxKind::JSDocCommentTextToken);
        assert_eq!(scanner.token_value(), "some text ");
        assert_eq!(scanner.scan_jsdoc_comment_text_token(false), SyntaxKind::OpenBraceToken);
        let mut scanner = Scanner::new("and a@b @tag");
        scanner.scan_jsdoc_comment_text_token(false);
        assert_eq!(scanner.token_value(), "and a@b ");
        assert_eq!(scanner.scan_jsdoc_comment_text_token(false), SyntaxKind::AtToken);
    }

    #[test]
    fn test_skip_jsdoc_leading_asterisks() {
        let mut scanner = Scanner::new("{a:\n * b}");
        scanner.set_skip_jsdoc_leading_asterisks(true);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "b");
    }

    #[test]
    fn test_split_tokens() {
        let mut scanner = Scanner::new("<<");
        scanner.scan();
        assert_eq!(scanner.rescan_less_than_token(), SyntaxKind::LessThanToken);
        assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);

        let mut scanner = Scanner::new("??");
        scanner.scan();
        assert_eq!(scanner.rescan_question_token(), SyntaxKind::QuestionToken);
        assert_eq!(scanner.scan(), SyntaxKind::QuestionToken);

        let mut scanner = Scanner::new("*=");
        scanner.scan();
        assert_eq!(scanner.rescan_asterisk_equals_token(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.token_end(), 1);
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.token_start(), 1);
    }

    #[test]
    fn test_radix_to_decimal() {
        assert_eq!(radix_to_decimal("ff", 16), "255");
        assert_eq!(radix_to_decimal("0", 2), "0");
        assert_eq!(radix_to_decimal("777", 8), "511");
    }
}
