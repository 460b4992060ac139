//! Documentation comments.
//!
//! A `/** ... */` comment in front of a declaration is parsed into a `JSDoc`
//! node and hung off the declaration's [`NodeData::js_doc`]. The comment is
//! scanned with the JSDoc scanner modes over `[start + 3, end - 2)`; the
//! outer scanner state, the current token and the pending error marker are
//! put back afterwards, and every diagnostic raised inside the comment moves
//! to the separate JSDoc diagnostics list.
//!
//! [`NodeData::js_doc`]: rsparse_ast::NodeData

use crate::fragment::ParsedFragment;
use crate::list::ParsingContext;
use crate::options::ParseOptions;
use crate::parser::{token_to_string, Parser};
use rsparse_ast::{ListId, NodeFlags, NodeId, NodePayload, SyntaxKind, TokenFlags};
use rsparse_diagnostics::{messages, DiagnosticMessage};
use rsparse_scanner::{get_leading_comment_ranges, get_trailing_comment_ranges, CommentRange};
use tracing::trace;

/// Where the comment scanner is relative to the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    BeginningOfLine,
    SawAsterisk,
    SavingComments,
    SavingBackticks,
}

/// What a `@param`/`@property` list is being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyLikeParse {
    Property,
    Parameter,
    CallbackParameter,
}

/// Tag names the parser gives structure to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagName {
    Author,
    Implements,
    Augments,
    Simple(SyntaxKind),
    This,
    Enum,
    Param,
    Return,
    Template,
    Type,
    Typedef,
    Callback,
    Overload,
    Satisfies,
    See,
    Throws,
    Unknown,
}

impl TagName {
    fn from_name(name: &str) -> Self {
        match name {
            "author" => TagName::Author,
            "implements" => TagName::Implements,
            "augments" | "extends" => TagName::Augments,
            "class" | "constructor" => TagName::Simple(SyntaxKind::JSDocClassTag),
            "public" => TagName::Simple(SyntaxKind::JSDocPublicTag),
            "private" => TagName::Simple(SyntaxKind::JSDocPrivateTag),
            "protected" => TagName::Simple(SyntaxKind::JSDocProtectedTag),
            "readonly" => TagName::Simple(SyntaxKind::JSDocReadonlyTag),
            "override" => TagName::Simple(SyntaxKind::JSDocOverrideTag),
            "deprecated" => TagName::Simple(SyntaxKind::JSDocDeprecatedTag),
            "this" => TagName::This,
            "enum" => TagName::Enum,
            "arg" | "argument" | "param" => TagName::Param,
            "return" | "returns" => TagName::Return,
            "template" => TagName::Template,
            "type" => TagName::Type,
            "typedef" => TagName::Typedef,
            "callback" => TagName::Callback,
            "overload" => TagName::Overload,
            "satisfies" => TagName::Satisfies,
            "see" => TagName::See,
            "exception" | "throws" => TagName::Throws,
            _ => TagName::Unknown,
        }
    }
}

/// Tags accepted as children of `@typedef`, `@callback` and object-typed
/// `@param`/`@property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildTag {
    Type,
    Property,
    Parameter,
    Template,
    This,
}

fn child_tag_for_name(name: &str) -> Option<ChildTag> {
    match name {
        "type" => Some(ChildTag::Type),
        "prop" | "property" => Some(ChildTag::Property),
        "arg" | "argument" | "param" => Some(ChildTag::Parameter),
        "template" => Some(ChildTag::Template),
        "this" => Some(ChildTag::This),
        _ => None,
    }
}

fn jsdoc_link_kind(name: &str) -> Option<SyntaxKind> {
    match name {
        "link" => Some(SyntaxKind::JSDocLink),
        "linkcode" => Some(SyntaxKind::JSDocLinkCode),
        "linkplain" => Some(SyntaxKind::JSDocLinkPlain),
        _ => None,
    }
}

/// `/**` not followed by `/`.
fn is_jsdoc_like_text(text: &str, start: usize) -> bool {
    let bytes = text.as_bytes();
    bytes.get(start..start + 3) == Some(b"/**") && bytes.get(start + 3) != Some(&b'/')
}

/// Comment text collected as slices of the source, with the column
/// bookkeeping used to strip the common margin.
struct CommentText<'a> {
    parts: Vec<&'a str>,
    indent: usize,
    margin: Option<usize>,
}

impl<'a> CommentText<'a> {
    fn new(indent: usize) -> Self {
        Self {
            parts: Vec::new(),
            indent,
            margin: None,
        }
    }

    fn push(&mut self, text: &'a str) {
        if self.margin.unwrap_or(0) == 0 {
            self.margin = Some(self.indent);
        }
        self.parts.push(text);
        self.indent += text.len();
    }

    /// Line breaks keep the margin.
    fn push_line_break(&mut self, text: &'a str) {
        self.parts.push(text);
        self.indent = 0;
    }

    /// Keep only the part of `whitespace` past the margin. Returns whether
    /// anything was kept.
    fn push_past_margin(&mut self, whitespace: &'a str) -> bool {
        let mut kept = false;
        if let Some(margin) = self.margin {
            if self.indent + whitespace.len() > margin {
                let from = margin.saturating_sub(self.indent);
                self.parts.push(whitespace.get(from..).unwrap_or(whitespace));
                kept = true;
            }
        }
        self.indent += whitespace.len();
        kept
    }

    fn remove_trailing_whitespace(&mut self) {
        while let Some(last) = self.parts.last_mut() {
            let trimmed = last.trim_end();
            if trimmed.is_empty() {
                self.parts.pop();
            } else {
                *last = trimmed;
                break;
            }
        }
    }

    fn remove_leading_newlines(&mut self) {
        let leading = self.parts.iter().take_while(|&&part| part == "\n" || part == "\r").count();
        self.parts.drain(..leading);
    }

    fn take(&mut self) -> String {
        let text = self.parts.concat();
        self.parts.clear();
        text
    }

    fn trimmed(&self) -> String {
        self.parts.concat().trim_end().to_string()
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Attachment
    // ========================================================================

    /// Parse the documentation comments in front of `node` and attach them.
    pub(crate) fn with_jsdoc(&mut self, node: NodeId, has_jsdoc: bool) -> NodeId {
        if !has_jsdoc || self.arena.data(node).js_doc.is_some() {
            return node;
        }
        let docs: Vec<NodeId> = self
            .jsdoc_comment_ranges(node)
            .into_iter()
            .filter_map(|comment| self.parse_jsdoc_comment(comment.pos, comment.end))
            .collect();
        if let (Some(&first), Some(&last)) = (docs.first(), docs.last()) {
            let pos = self.arena.data(first).pos();
            let end = self.arena.data(last).end();
            let list = self.create_node_list(docs, pos, Some(end));
            self.arena.data_mut(node).js_doc = Some(list);
        }
        node
    }

    /// Documentation comments belonging to `node`. Parameters, type
    /// parameters and a few expressions also take a comment trailing on the
    /// previous token.
    fn jsdoc_comment_ranges(&self, node: NodeId) -> Vec<CommentRange> {
        let data = self.arena.data(node);
        let (pos, end) = (data.pos() as usize, data.end());
        let mut ranges = match data.kind {
            SyntaxKind::Parameter
            | SyntaxKind::TypeParameter
            | SyntaxKind::FunctionExpression
            | SyntaxKind::ArrowFunction
            | SyntaxKind::ParenthesizedExpression
            | SyntaxKind::VariableDeclaration
            | SyntaxKind::ExportSpecifier => {
                let mut ranges = get_trailing_comment_ranges(self.text, pos);
                ranges.extend(get_leading_comment_ranges(self.text, pos));
                ranges
            }
            _ => get_leading_comment_ranges(self.text, pos),
        };
        // After a parse error an empty node can sit in front of a comment
        // that is not its own.
        ranges.retain(|comment| comment.end <= end && comment.is_jsdoc(self.text));
        ranges
    }

    /// Parse the comment at `[start, end)`, leaving the outer parse exactly
    /// as it was.
    pub(crate) fn parse_jsdoc_comment(&mut self, start: u32, end: u32) -> Option<NodeId> {
        let saved_token = self.current_token;
        let saved_scanner = self.scanner.save_state();
        let saved_parsing_context = self.parsing_context;
        let saved_error = self.parse_error_before_next_finished_node;
        let diagnostics_len = self.diagnostics.len();

        self.parsing_context.insert(ParsingContext::JSDocComment);
        let doc = self.do_inside_of_context(NodeFlags::JSDOC, |p| p.parse_jsdoc_comment_worker(start, end));

        self.scanner.restore_state(saved_scanner);
        self.current_token = saved_token;
        self.parsing_context = saved_parsing_context;
        self.parse_error_before_next_finished_node = saved_error;
        if self.diagnostics.len() > diagnostics_len {
            let moved = self.diagnostics.split_off(diagnostics_len);
            for diagnostic in &moved {
                self.diagnostic_starts.remove(&diagnostic.start());
            }
            trace!(start, count = moved.len(), "jsdoc diagnostics");
            self.js_doc_diagnostics.extend(moved);
        }
        doc
    }

    // ========================================================================
    // Comment body
    // ========================================================================

    fn parse_jsdoc_comment_worker(&mut self, start: u32, end: u32) -> Option<NodeId> {
        let text = self.text;
        let (start_index, end_index) = (start as usize, end as usize);
        if end_index < start_index + 5
            || end_index > text.len()
            || !is_jsdoc_like_text(text, start_index)
            || !text.is_char_boundary(end_index - 2)
        {
            return None;
        }
        self.scanner.set_text_range(start_index + 3, end_index - 2);

        let line_start = text[..start_index].rfind('\n').map_or(0, |i| i + 1);
        let mut comments = CommentText::new(start_index - line_start + 4);
        let mut tags: Vec<NodeId> = Vec::new();
        let mut parts: Vec<NodeId> = Vec::new();
        let mut comments_pos: Option<u32> = None;
        let mut link_end: Option<u32> = None;
        let mut state = CommentState::SawAsterisk;

        self.next_token_jsdoc();
        while self.parse_optional_jsdoc(SyntaxKind::WhitespaceTrivia) {}
        if self.parse_optional_jsdoc(SyntaxKind::NewLineTrivia) {
            state = CommentState::BeginningOfLine;
            comments.indent = 0;
        }

        loop {
            match self.current_token() {
                SyntaxKind::AtToken => {
                    comments.remove_trailing_whitespace();
                    if comments_pos.is_none() {
                        comments_pos = Some(self.node_pos());
                    }
                    let tag = self.parse_tag(comments.indent, &tags);
                    tags.push(tag);
                    state = CommentState::BeginningOfLine;
                    comments.margin = None;
                }
                SyntaxKind::NewLineTrivia => {
                    comments.push_line_break(self.token_text());
                    state = CommentState::BeginningOfLine;
                }
                SyntaxKind::AsteriskToken => {
                    let asterisk = self.token_text();
                    if state == CommentState::SawAsterisk {
                        // A second asterisk on the line is text.
                        state = CommentState::SavingComments;
                        comments.push(asterisk);
                    } else {
                        state = CommentState::SawAsterisk;
                        comments.indent += asterisk.len();
                    }
                }
                SyntaxKind::WhitespaceTrivia => {
                    comments.push_past_margin(self.token_text());
                }
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenBraceToken => {
                    state = CommentState::SavingComments;
                    let comment_end = self.node_pos();
                    let link_start = self.token_end() - 1;
                    match self.parse_jsdoc_link(link_start) {
                        Some(link) => {
                            let text = comments.take();
                            let text_node = self.finish_jsdoc_text(&text, link_end.unwrap_or(start), comment_end);
                            parts.push(text_node);
                            parts.push(link);
                            link_end = Some(self.token_end());
                        }
                        None => comments.push(self.token_text()),
                    }
                }
                _ => {
                    state = CommentState::SavingComments;
                    comments.push(self.token_text());
                }
            }
            if state == CommentState::SavingComments {
                self.next_jsdoc_comment_text_token(false);
            } else {
                self.next_token_jsdoc();
            }
        }

        let trimmed = comments.trimmed();
        let comments_end = comments_pos.unwrap_or_else(|| self.node_pos());
        if !parts.is_empty() && !trimmed.is_empty() {
            let text_node = self.finish_jsdoc_text(&trimmed, link_end.unwrap_or(start), comments_end);
            parts.push(text_node);
        }
        let comment = if !parts.is_empty() {
            Some(self.create_node_list(parts, start, Some(comments_end)))
        } else if !trimmed.is_empty() {
            let text_node = self.finish_jsdoc_text(&trimmed, start, comments_end);
            Some(self.create_node_list(vec![text_node], start, Some(comments_end)))
        } else {
            None
        };
        let tags = self.create_tag_list(tags);
        Some(self.finish_node_at(
            SyntaxKind::JSDoc,
            start,
            end,
            NodePayload::JSDoc { comment, tags },
            NodeFlags::NONE,
        ))
    }

    fn create_tag_list(&mut self, tags: Vec<NodeId>) -> Option<ListId> {
        let (&first, &last) = (tags.first()?, tags.last()?);
        let pos = self.arena.data(first).pos();
        let end = self.arena.data(last).end();
        Some(self.create_node_list(tags, pos, Some(end)))
    }

    fn finish_jsdoc_text(&mut self, text: &str, pos: u32, end: u32) -> NodeId {
        let text = self.intern(text);
        self.finish_node_at(
            SyntaxKind::JSDocText,
            pos,
            end.max(pos),
            NodePayload::Literal {
                text,
                token_flags: TokenFlags::NONE,
            },
            NodeFlags::NONE,
        )
    }

    /// Free text after a tag, up to the next tag or the end of the comment.
    fn parse_tag_comments(&mut self, indent: usize, initial_margin: Option<&'a str>) -> Option<ListId> {
        let comments_pos = self.node_pos();
        let mut comments = CommentText::new(indent);
        let mut parts: Vec<NodeId> = Vec::new();
        let mut link_end: Option<u32> = None;
        let mut state = CommentState::BeginningOfLine;

        if let Some(initial_margin) = initial_margin {
            // Text on the tag's own line is recorded straight away.
            if !initial_margin.is_empty() {
                comments.push(initial_margin);
            }
            state = CommentState::SawAsterisk;
        }

        let mut token = self.current_token();
        loop {
            match token {
                SyntaxKind::NewLineTrivia => {
                    state = CommentState::BeginningOfLine;
                    comments.push_line_break(self.token_text());
                }
                SyntaxKind::AtToken => {
                    // Leave the `@` for the caller to scan again.
                    self.scanner.reset_token_state(self.token_start() as usize);
                    break;
                }
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::WhitespaceTrivia => {
                    if comments.push_past_margin(self.token_text()) {
                        state = CommentState::SavingComments;
                    }
                }
                SyntaxKind::OpenBraceToken => {
                    state = CommentState::SavingComments;
                    let comment_end = self.node_pos();
                    let link_start = self.token_end() - 1;
                    match self.parse_jsdoc_link(link_start) {
                        Some(link) => {
                            let text = comments.take();
                            let text_node =
                                self.finish_jsdoc_text(&text, link_end.unwrap_or(comments_pos), comment_end);
                            parts.push(text_node);
                            parts.push(link);
                            link_end = Some(self.token_end());
                        }
                        None => comments.push(self.token_text()),
                    }
                }
                SyntaxKind::BacktickToken => {
                    state = if state == CommentState::SavingBackticks {
                        CommentState::SavingComments
                    } else {
                        CommentState::SavingBackticks
                    };
                    comments.push(self.token_text());
                }
                SyntaxKind::AsteriskToken if state == CommentState::BeginningOfLine => {
                    // Recording starts on the next non-whitespace token.
                    state = CommentState::SawAsterisk;
                    comments.indent += 1;
                }
                _ => {
                    if state != CommentState::SavingBackticks {
                        state = CommentState::SavingComments;
                    }
                    comments.push(self.token_text());
                }
            }
            token = match state {
                CommentState::SavingComments | CommentState::SavingBackticks => {
                    self.next_jsdoc_comment_text_token(state == CommentState::SavingBackticks)
                }
                _ => self.next_token_jsdoc(),
            };
        }

        comments.remove_leading_newlines();
        let trimmed = comments.trimmed();
        if !parts.is_empty() {
            if !trimmed.is_empty() {
                let end = self.node_pos();
                let text_node = self.finish_jsdoc_text(&trimmed, link_end.unwrap_or(comments_pos), end);
                parts.push(text_node);
            }
            let end = self.token_end();
            return Some(self.create_node_list(parts, comments_pos, Some(end)));
        }
        if trimmed.is_empty() {
            return None;
        }
        let end = self.node_pos();
        let text_node = self.finish_jsdoc_text(&trimmed, comments_pos, end);
        Some(self.create_node_list(vec![text_node], comments_pos, Some(end)))
    }

    fn parse_trailing_tag_comments(
        &mut self,
        pos: u32,
        end: u32,
        margin: usize,
        indent_text: &'a str,
    ) -> Option<ListId> {
        let mut margin = margin;
        if indent_text.is_empty() {
            margin += (end - pos) as usize;
        }
        self.parse_tag_comments(margin, Some(indent_text.get(margin..).unwrap_or("")))
    }

    // ========================================================================
    // Inline links
    // ========================================================================

    /// `{@link name text}`, `{@linkcode ...}` or `{@linkplain ...}`.
    fn parse_jsdoc_link(&mut self, start: u32) -> Option<NodeId> {
        let kind = self.try_parse(Self::parse_jsdoc_link_prefix)?;
        // Past the tag name and the whitespace after it.
        self.next_token_jsdoc();
        self.skip_whitespace();
        let name = self.parse_jsdoc_link_name();
        let mut text: Vec<&'a str> = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::NewLineTrivia | SyntaxKind::EndOfFileToken
        ) {
            text.push(self.token_text());
            self.next_token_jsdoc();
        }
        let text = self.intern(&text.concat());
        let end = self.token_end();
        Some(self.finish_node_at(kind, start, end, NodePayload::JSDocLink { name, text }, NodeFlags::NONE))
    }

    fn parse_jsdoc_link_prefix(&mut self) -> Option<SyntaxKind> {
        self.skip_whitespace_or_asterisk();
        if self.current_token() == SyntaxKind::OpenBraceToken
            && self.next_token_jsdoc() == SyntaxKind::AtToken
            && self.next_token_jsdoc().is_identifier_or_keyword()
        {
            return jsdoc_link_kind(self.token_value());
        }
        None
    }

    fn parse_jsdoc_link_name(&mut self) -> Option<NodeId> {
        if !self.current_token().is_identifier_or_keyword() {
            return None;
        }
        let pos = self.node_pos();
        let mut name = self.parse_identifier_name(None);
        while self.parse_optional(SyntaxKind::DotToken) {
            let right = if self.current_token() == SyntaxKind::PrivateIdentifier {
                self.create_missing_node(SyntaxKind::Identifier, false, None, &[])
            } else {
                self.parse_identifier_name(None)
            };
            name = self.finish_node(SyntaxKind::QualifiedName, pos, NodePayload::QualifiedName { left: name, right });
        }
        while self.current_token() == SyntaxKind::PrivateIdentifier {
            // `#member`: scan the `#` alone, then skip it.
            self.re_scan_hash_token();
            self.next_token_jsdoc();
            let right = self.parse_identifier(None);
            name = self.finish_node(SyntaxKind::JSDocMemberName, pos, NodePayload::QualifiedName { left: name, right });
        }
        Some(name)
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn parse_optional_jsdoc(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token_jsdoc();
            true
        } else {
            false
        }
    }

    fn parse_expected_jsdoc(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional_jsdoc(kind) {
            return true;
        }
        self.parse_error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(kind)]);
        false
    }

    fn is_whitespace_token(&self) -> bool {
        matches!(self.current_token(), SyntaxKind::WhitespaceTrivia | SyntaxKind::NewLineTrivia)
    }

    fn is_next_non_whitespace_token_end_of_file(&mut self) -> bool {
        loop {
            self.next_token_jsdoc();
            match self.current_token() {
                SyntaxKind::EndOfFileToken => return true,
                SyntaxKind::WhitespaceTrivia | SyntaxKind::NewLineTrivia => {}
                _ => return false,
            }
        }
    }

    /// Whitespace before the end of the comment belongs to no node.
    fn skip_whitespace(&mut self) {
        if self.is_whitespace_token() && self.look_ahead(Self::is_next_non_whitespace_token_end_of_file) {
            return;
        }
        while self.is_whitespace_token() {
            self.next_token_jsdoc();
        }
    }

    /// Skip whitespace and leading asterisks. Returns the indentation of
    /// the last line skipped into, or `""` if no line break was crossed.
    fn skip_whitespace_or_asterisk(&mut self) -> &'a str {
        if self.is_whitespace_token() && self.look_ahead(Self::is_next_non_whitespace_token_end_of_file) {
            return "";
        }
        let mut preceding_line_break = self.has_preceding_line_break();
        let mut seen_line_break = false;
        let mut indent_start = self.token_start() as usize;
        while (preceding_line_break && self.current_token() == SyntaxKind::AsteriskToken) || self.is_whitespace_token() {
            match self.current_token() {
                SyntaxKind::NewLineTrivia => {
                    preceding_line_break = true;
                    seen_line_break = true;
                    indent_start = self.token_end() as usize;
                }
                SyntaxKind::AsteriskToken => preceding_line_break = false,
                _ => {}
            }
            self.next_token_jsdoc();
        }
        if !seen_line_break {
            return "";
        }
        let indent_end = (self.node_pos() as usize).max(indent_start);
        self.text.get(indent_start..indent_end).unwrap_or("")
    }

    fn parse_jsdoc_identifier_name(&mut self, message: Option<&DiagnosticMessage>) -> NodeId {
        if !self.current_token().is_identifier_or_keyword() {
            return self.create_missing_node(
                SyntaxKind::Identifier,
                message.is_none(),
                Some(message.unwrap_or(&messages::IDENTIFIER_EXPECTED)),
                &[],
            );
        }
        let (start, end) = (self.token_start(), self.token_end());
        let token = self.current_token();
        let original_keyword_kind = (token != SyntaxKind::Identifier).then_some(token);
        let text = self.intern(self.token_value());
        let node = self.finish_node_at(
            SyntaxKind::Identifier,
            start,
            end,
            NodePayload::Identifier {
                text,
                original_keyword_kind,
            },
            NodeFlags::NONE,
        );
        self.next_token_jsdoc();
        node
    }

    /// `a.b[].c` as nested qualified names; `[]` suffixes are accepted and
    /// dropped.
    fn parse_jsdoc_entity_name(&mut self) -> NodeId {
        let mut entity = self.parse_jsdoc_identifier_name(None);
        if self.parse_optional(SyntaxKind::OpenBracketToken) {
            self.parse_expected(SyntaxKind::CloseBracketToken, None);
        }
        while self.parse_optional(SyntaxKind::DotToken) {
            let right = self.parse_jsdoc_identifier_name(None);
            if self.parse_optional(SyntaxKind::OpenBracketToken) {
                self.parse_expected(SyntaxKind::CloseBracketToken, None);
            }
            let pos = self.arena.data(entity).pos();
            entity = self.finish_node(SyntaxKind::QualifiedName, pos, NodePayload::QualifiedName { left: entity, right });
        }
        entity
    }

    // ========================================================================
    // Type expressions and name references
    // ========================================================================

    /// `{T}`. Braces are optional where `may_omit_braces` is set.
    pub(crate) fn parse_jsdoc_type_expression(&mut self, may_omit_braces: bool) -> NodeId {
        let pos = self.node_pos();
        let has_brace = if may_omit_braces {
            self.parse_optional(SyntaxKind::OpenBraceToken)
        } else {
            self.parse_expected(SyntaxKind::OpenBraceToken, None)
        };
        let type_node = self.do_inside_of_context(NodeFlags::JSDOC, Self::parse_jsdoc_type);
        if !may_omit_braces || has_brace {
            self.parse_expected_jsdoc(SyntaxKind::CloseBraceToken);
        }
        self.finish_node(
            SyntaxKind::JSDocTypeExpression,
            pos,
            NodePayload::WrappedType {
                type_node,
                postfix: false,
            },
        )
    }

    fn try_parse_type_expression(&mut self) -> Option<NodeId> {
        self.skip_whitespace_or_asterisk();
        (self.current_token() == SyntaxKind::OpenBraceToken).then(|| self.parse_jsdoc_type_expression(false))
    }

    /// `{a.b#c}` for `@see`.
    fn parse_jsdoc_name_reference(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_brace = self.parse_optional(SyntaxKind::OpenBraceToken);
        let name_pos = self.node_pos();
        let mut entity = self.parse_entity_name(false, None);
        while self.current_token() == SyntaxKind::PrivateIdentifier {
            self.re_scan_hash_token();
            self.next_token_jsdoc();
            let right = self.parse_identifier(None);
            entity = self.finish_node(
                SyntaxKind::JSDocMemberName,
                name_pos,
                NodePayload::QualifiedName { left: entity, right },
            );
        }
        if has_brace {
            self.parse_expected_jsdoc(SyntaxKind::CloseBraceToken);
        }
        self.finish_node(
            SyntaxKind::JSDocNameReference,
            pos,
            NodePayload::WrappedType {
                type_node: entity,
                postfix: false,
            },
        )
    }

    /// The type inside a `JSDocTypeExpression`.
    fn type_of_type_expression(&self, node: NodeId) -> Option<NodeId> {
        match self.arena.get(node).payload {
            NodePayload::WrappedType { type_node, .. } if self.arena.kind(node) == SyntaxKind::JSDocTypeExpression => {
                Some(type_node)
            }
            _ => None,
        }
    }

    /// `Object`, `object` or an array of either: a type whose members may
    /// follow as child tags.
    fn is_object_or_object_array_type_reference(&self, node: NodeId) -> bool {
        match self.arena.get(node).payload {
            _ if self.arena.kind(node) == SyntaxKind::ObjectKeyword => true,
            NodePayload::ArrayType { element_type } => self.is_object_or_object_array_type_reference(element_type),
            NodePayload::TypeReference {
                type_name,
                type_arguments: None,
            } if self.arena.kind(node) == SyntaxKind::TypeReference => {
                self.arena.kind(type_name) == SyntaxKind::Identifier && self.node_text_value(type_name) == "Object"
            }
            _ => false,
        }
    }

    fn is_object_type_expression(&self, type_expression: NodeId) -> bool {
        self.type_of_type_expression(type_expression)
            .is_some_and(|type_node| self.is_object_or_object_array_type_reference(type_node))
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// One `@tag` and its comment. `tags` are the tags already parsed in
    /// this comment.
    fn parse_tag(&mut self, margin: usize, tags: &[NodeId]) -> NodeId {
        debug_assert_eq!(self.current_token(), SyntaxKind::AtToken);
        let start = self.token_start();
        self.next_token_jsdoc();
        let tag_name = self.parse_jsdoc_identifier_name(None);
        let indent_text = self.skip_whitespace_or_asterisk();
        let tag = TagName::from_name(self.node_text_value(tag_name));
        trace!(?tag, start, "jsdoc tag");

        match tag {
            TagName::Author => self.parse_author_tag(start, tag_name, margin, indent_text),
            TagName::Implements => {
                self.parse_heritage_tag(SyntaxKind::JSDocImplementsTag, start, tag_name, margin, indent_text)
            }
            TagName::Augments => {
                self.parse_heritage_tag(SyntaxKind::JSDocAugmentsTag, start, tag_name, margin, indent_text)
            }
            TagName::Simple(kind) => self.parse_simple_tag(kind, start, tag_name, margin, indent_text),
            TagName::This => self.parse_this_or_enum_tag(SyntaxKind::JSDocThisTag, start, tag_name, margin, indent_text),
            TagName::Enum => self.parse_this_or_enum_tag(SyntaxKind::JSDocEnumTag, start, tag_name, margin, indent_text),
            TagName::Param => self.parse_parameter_or_property_tag(start, tag_name, PropertyLikeParse::Parameter, margin),
            TagName::Return => self.parse_return_tag(start, tag_name, margin, indent_text, tags),
            TagName::Template => self.parse_template_tag(start, tag_name, margin, indent_text),
            TagName::Type => self.parse_type_tag(start, tag_name, tags, Some((margin, indent_text))),
            TagName::Typedef => self.parse_typedef_tag(start, tag_name, margin, indent_text),
            TagName::Callback => self.parse_callback_tag(start, tag_name, margin, indent_text, tags),
            TagName::Overload => self.parse_overload_tag(start, tag_name, margin, indent_text, tags),
            TagName::Satisfies => self.parse_satisfies_tag(start, tag_name, margin, indent_text),
            TagName::See => self.parse_see_tag(start, tag_name, margin, indent_text),
            TagName::Throws => self.parse_throws_tag(start, tag_name, margin, indent_text),
            TagName::Unknown => self.parse_simple_tag(SyntaxKind::JSDocTag, start, tag_name, margin, indent_text),
        }
    }

    fn parse_simple_tag(
        &mut self,
        kind: SyntaxKind,
        start: u32,
        tag_name: NodeId,
        margin: usize,
        indent_text: &'a str,
    ) -> NodeId {
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_node(kind, start, NodePayload::JSDocTag { tag_name, comment })
    }

    fn finish_typed_tag(
        &mut self,
        kind: SyntaxKind,
        start: u32,
        tag_name: NodeId,
        type_expression: Option<NodeId>,
        comment: Option<ListId>,
    ) -> NodeId {
        self.finish_node(
            kind,
            start,
            NodePayload::JSDocTypedTag {
                tag_name,
                type_expression,
                comment,
            },
        )
    }

    /// Report a tag that may appear once per comment.
    fn check_tag_not_repeated(&mut self, kind: SyntaxKind, tag_name: NodeId, tags: &[NodeId]) {
        if tags.iter().any(|&tag| self.arena.kind(tag) == kind) {
            let name = self.node_text_value(tag_name).to_string();
            let pos = self.arena.data(tag_name).pos();
            let end = self.token_start();
            self.parse_error_at(pos, end, &messages::_0_TAG_ALREADY_SPECIFIED, &[&name]);
        }
    }

    fn parse_author_tag(&mut self, start: u32, tag_name: NodeId, margin: usize, indent_text: &'a str) -> NodeId {
        let comment_start = self.node_pos();
        let author = self.parse_author_name_and_email();
        let mut comment_end = self.node_pos();
        let comments = self.parse_trailing_tag_comments(start, comment_end, margin, indent_text);
        if comments.is_none() {
            comment_end = self.node_pos();
        }
        let author = self.finish_jsdoc_text(&author, comment_start, comment_end);
        let mut parts = vec![author];
        if let Some(comments) = comments {
            parts.extend(self.arena.list(comments).iter());
        }
        let comment = self.create_node_list(parts, comment_start, None);
        self.finish_node(
            SyntaxKind::JSDocAuthorTag,
            start,
            NodePayload::JSDocTag {
                tag_name,
                comment: Some(comment),
            },
        )
    }

    /// `Name <mail@host>`: an `@` outside the brackets starts the next tag.
    fn parse_author_name_and_email(&mut self) -> String {
        let mut parts: Vec<&'a str> = Vec::new();
        let mut in_email = false;
        let mut token = self.current_token();
        while !matches!(token, SyntaxKind::EndOfFileToken | SyntaxKind::NewLineTrivia) {
            match token {
                SyntaxKind::LessThanToken => in_email = true,
                SyntaxKind::AtToken if !in_email => break,
                SyntaxKind::GreaterThanToken if in_email => {
                    parts.push(self.token_text());
                    self.next_token_jsdoc();
                    break;
                }
                _ => {}
            }
            parts.push(self.token_text());
            token = self.next_token_jsdoc();
        }
        parts.concat()
    }

    fn parse_heritage_tag(
        &mut self,
        kind: SyntaxKind,
        start: u32,
        tag_name: NodeId,
        margin: usize,
        indent_text: &'a str,
    ) -> NodeId {
        let class = self.parse_expression_with_type_arguments_for_augments();
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_node(
            kind,
            start,
            NodePayload::JSDocHeritageTag {
                tag_name,
                class,
                comment,
            },
        )
    }

    /// `Base<T>` or `{Base<T>}` after `@augments`/`@implements`.
    fn parse_expression_with_type_arguments_for_augments(&mut self) -> NodeId {
        let used_brace = self.parse_optional(SyntaxKind::OpenBraceToken);
        let pos = self.node_pos();
        let expression = self.parse_property_access_entity_name_expression();
        self.scanner.set_skip_jsdoc_leading_asterisks(true);
        let type_arguments = self.try_parse_type_arguments();
        self.scanner.set_skip_jsdoc_leading_asterisks(false);
        let node = self.finish_node(
            SyntaxKind::ExpressionWithTypeArguments,
            pos,
            NodePayload::TypeReference {
                type_name: expression,
                type_arguments,
            },
        );
        if used_brace {
            self.skip_whitespace();
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
        }
        node
    }

    fn parse_property_access_entity_name_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut node = self.parse_jsdoc_identifier_name(None);
        while self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_jsdoc_identifier_name(None);
            node = self.finish_node(
                SyntaxKind::PropertyAccessExpression,
                pos,
                NodePayload::PropertyAccess {
                    expression: node,
                    question_dot_token: None,
                    name,
                },
            );
        }
        node
    }

    fn parse_this_or_enum_tag(
        &mut self,
        kind: SyntaxKind,
        start: u32,
        tag_name: NodeId,
        margin: usize,
        indent_text: &'a str,
    ) -> NodeId {
        let type_expression = self.parse_jsdoc_type_expression(true);
        self.skip_whitespace();
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_typed_tag(kind, start, tag_name, Some(type_expression), comment)
    }

    fn parse_return_tag(
        &mut self,
        start: u32,
        tag_name: NodeId,
        margin: usize,
        indent_text: &'a str,
        tags: &[NodeId],
    ) -> NodeId {
        self.check_tag_not_repeated(SyntaxKind::JSDocReturnTag, tag_name, tags);
        let type_expression = self.try_parse_type_expression();
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_typed_tag(SyntaxKind::JSDocReturnTag, start, tag_name, type_expression, comment)
    }

    /// `@type {T}`. As a child of `@typedef` it takes no comment.
    fn parse_type_tag(
        &mut self,
        start: u32,
        tag_name: NodeId,
        tags: &[NodeId],
        comments_at: Option<(usize, &'a str)>,
    ) -> NodeId {
        self.check_tag_not_repeated(SyntaxKind::JSDocTypeTag, tag_name, tags);
        let type_expression = self.parse_jsdoc_type_expression(true);
        let comment = match comments_at {
            Some((margin, indent_text)) => {
                let end = self.node_pos();
                self.parse_trailing_tag_comments(start, end, margin, indent_text)
            }
            None => None,
        };
        self.finish_typed_tag(SyntaxKind::JSDocTypeTag, start, tag_name, Some(type_expression), comment)
    }

    fn parse_satisfies_tag(&mut self, start: u32, tag_name: NodeId, margin: usize, indent_text: &'a str) -> NodeId {
        let type_expression = self.parse_jsdoc_type_expression(false);
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_typed_tag(SyntaxKind::JSDocSatisfiesTag, start, tag_name, Some(type_expression), comment)
    }

    fn parse_throws_tag(&mut self, start: u32, tag_name: NodeId, margin: usize, indent_text: &'a str) -> NodeId {
        let type_expression = self.try_parse_type_expression();
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_typed_tag(SyntaxKind::JSDocThrowsTag, start, tag_name, type_expression, comment)
    }

    fn parse_see_tag(&mut self, start: u32, tag_name: NodeId, margin: usize, indent_text: &'a str) -> NodeId {
        let is_markdown_or_jsdoc_link = self.current_token() == SyntaxKind::OpenBracketToken
            || self.look_ahead(|p| {
                p.next_token_jsdoc() == SyntaxKind::AtToken
                    && p.next_token_jsdoc().is_identifier_or_keyword()
                    && jsdoc_link_kind(p.token_value()).is_some()
            });
        let name = (!is_markdown_or_jsdoc_link).then(|| self.parse_jsdoc_name_reference());
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, margin, indent_text);
        self.finish_node(
            SyntaxKind::JSDocSeeTag,
            start,
            NodePayload::JSDocSeeTag {
                tag_name,
                name,
                comment,
            },
        )
    }

    // ---- @param / @property ----------------------------------------------

    fn parse_parameter_or_property_tag(
        &mut self,
        start: u32,
        tag_name: NodeId,
        target: PropertyLikeParse,
        indent: usize,
    ) -> NodeId {
        let mut type_expression = self.try_parse_type_expression();
        let mut is_name_first = type_expression.is_none();
        self.skip_whitespace_or_asterisk();

        let (name, is_bracketed) = self.parse_bracket_name_in_property_and_param_tag();
        let indent_text = self.skip_whitespace_or_asterisk();

        if is_name_first && !self.look_ahead(|p| p.parse_jsdoc_link_prefix().is_some()) {
            type_expression = self.try_parse_type_expression();
        }

        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, indent, indent_text);

        if let Some(nested) = self.parse_nested_type_literal(type_expression, name, target, indent) {
            type_expression = Some(nested);
            is_name_first = true;
        }
        let kind = if target == PropertyLikeParse::Property {
            SyntaxKind::JSDocPropertyTag
        } else {
            SyntaxKind::JSDocParameterTag
        };
        self.finish_node(
            kind,
            start,
            NodePayload::JSDocPropertyLikeTag {
                tag_name,
                name,
                is_name_first,
                is_bracketed,
                type_expression,
                comment,
            },
        )
    }

    /// `name`, `[name]`, `[name=default]` or a backquoted name. The default
    /// value is parsed and dropped.
    fn parse_bracket_name_in_property_and_param_tag(&mut self) -> (NodeId, bool) {
        let is_bracketed = self.parse_optional_jsdoc(SyntaxKind::OpenBracketToken);
        if is_bracketed {
            self.skip_whitespace();
        }
        let is_backquoted = self.parse_optional_jsdoc(SyntaxKind::BacktickToken);
        let name = self.parse_jsdoc_entity_name();
        if is_backquoted {
            self.parse_expected_jsdoc(SyntaxKind::BacktickToken);
        }
        if is_bracketed {
            self.skip_whitespace();
            if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_expression();
            }
            self.parse_expected(SyntaxKind::CloseBracketToken, None);
        }
        (name, is_bracketed)
    }

    /// Child tags of an `Object`-typed `@param`/`@property`, as a type
    /// literal.
    fn parse_nested_type_literal(
        &mut self,
        type_expression: Option<NodeId>,
        name: NodeId,
        target: PropertyLikeParse,
        indent: usize,
    ) -> Option<NodeId> {
        let type_node = self.type_of_type_expression(type_expression?)?;
        if !self.is_object_or_object_array_type_reference(type_node) {
            return None;
        }
        let pos = self.node_pos();
        let mut children = Vec::new();
        while let Some(child) = self.try_parse(|p| p.parse_child_parameter_or_property_tag(target, indent, Some(name))) {
            match self.arena.kind(child) {
                SyntaxKind::JSDocParameterTag | SyntaxKind::JSDocPropertyTag => children.push(child),
                SyntaxKind::JSDocTemplateTag => {
                    if let Some(tag_name) = self.tag_name_of(child) {
                        self.parse_error_at_range(
                            tag_name,
                            &messages::A_JSDOC_TEMPLATE_TAG_MAY_NOT_FOLLOW_A_TYPEDEF_CALLBACK_OR_OVERLOAD_TAG,
                            &[],
                        );
                    }
                }
                _ => {}
            }
        }
        let property_tags = self.create_tag_list(children)?;
        let is_array_type = self.arena.kind(type_node) == SyntaxKind::ArrayType;
        let literal = self.finish_node(
            SyntaxKind::JSDocTypeLiteral,
            pos,
            NodePayload::JSDocTypeLiteral {
                property_tags: Some(property_tags),
                is_array_type,
            },
        );
        Some(self.finish_node(
            SyntaxKind::JSDocTypeExpression,
            pos,
            NodePayload::WrappedType {
                type_node: literal,
                postfix: false,
            },
        ))
    }

    /// Scan ahead for the next child tag. A tag only counts at the start of
    /// a line, after at most one asterisk. With `name`, only members of
    /// `name` (`name.member`) are taken.
    fn parse_child_parameter_or_property_tag(
        &mut self,
        target: PropertyLikeParse,
        indent: usize,
        name: Option<NodeId>,
    ) -> Option<NodeId> {
        let mut can_parse_tag = true;
        let mut seen_asterisk = false;
        loop {
            match self.next_token_jsdoc() {
                SyntaxKind::AtToken => {
                    if can_parse_tag {
                        let child = self.try_parse_child_tag(target, indent)?;
                        if let (Some(name), Some(child_name)) = (name, self.property_like_name_of(child)) {
                            match self.arena.get(child_name).payload {
                                NodePayload::QualifiedName { left, .. }
                                    if self.arena.kind(child_name) == SyntaxKind::QualifiedName
                                        && self.escaped_texts_equal(name, left) => {}
                                _ => return None,
                            }
                        }
                        return Some(child);
                    }
                    seen_asterisk = false;
                }
                SyntaxKind::NewLineTrivia => {
                    can_parse_tag = true;
                    seen_asterisk = false;
                }
                SyntaxKind::AsteriskToken => {
                    if seen_asterisk {
                        can_parse_tag = false;
                    }
                    seen_asterisk = true;
                }
                SyntaxKind::Identifier => can_parse_tag = false,
                SyntaxKind::EndOfFileToken => return None,
                _ => {}
            }
        }
    }

    fn try_parse_child_tag(&mut self, target: PropertyLikeParse, indent: usize) -> Option<NodeId> {
        debug_assert_eq!(self.current_token(), SyntaxKind::AtToken);
        let start = self.node_pos();
        self.next_token_jsdoc();
        let tag_name = self.parse_jsdoc_identifier_name(None);
        let indent_text = self.skip_whitespace_or_asterisk();
        let accepted = match child_tag_for_name(self.node_text_value(tag_name))? {
            ChildTag::Type => {
                return (target == PropertyLikeParse::Property).then(|| self.parse_type_tag(start, tag_name, &[], None));
            }
            ChildTag::Template => return Some(self.parse_template_tag(start, tag_name, indent, indent_text)),
            ChildTag::This => {
                return Some(self.parse_this_or_enum_tag(SyntaxKind::JSDocThisTag, start, tag_name, indent, indent_text));
            }
            ChildTag::Property => target == PropertyLikeParse::Property,
            ChildTag::Parameter => target != PropertyLikeParse::Property,
        };
        accepted.then(|| self.parse_parameter_or_property_tag(start, tag_name, target, indent))
    }

    fn tag_name_of(&self, tag: NodeId) -> Option<NodeId> {
        match self.arena.get(tag).payload {
            NodePayload::JSDocTag { tag_name, .. }
            | NodePayload::JSDocTypedTag { tag_name, .. }
            | NodePayload::JSDocHeritageTag { tag_name, .. }
            | NodePayload::JSDocPropertyLikeTag { tag_name, .. }
            | NodePayload::JSDocTemplateTag { tag_name, .. }
            | NodePayload::JSDocTypedefTag { tag_name, .. }
            | NodePayload::JSDocSeeTag { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    fn property_like_name_of(&self, tag: NodeId) -> Option<NodeId> {
        match self.arena.get(tag).payload {
            NodePayload::JSDocPropertyLikeTag { name, .. } => Some(name),
            _ => None,
        }
    }

    fn escaped_texts_equal(&self, mut a: NodeId, mut b: NodeId) -> bool {
        loop {
            match (&self.arena.get(a).payload, &self.arena.get(b).payload) {
                (NodePayload::Identifier { text: x, .. }, NodePayload::Identifier { text: y, .. }) => return x == y,
                (
                    NodePayload::QualifiedName { left: left_a, right: right_a },
                    NodePayload::QualifiedName { left: left_b, right: right_b },
                ) if self.node_text_value(*right_a) == self.node_text_value(*right_b) => {
                    a = *left_a;
                    b = *left_b;
                }
                _ => return false,
            }
        }
    }

    // ---- @template --------------------------------------------------------

    /// `@template T, U` or `@template {Constraint} T`.
    fn parse_template_tag(&mut self, start: u32, tag_name: NodeId, indent: usize, indent_text: &'a str) -> NodeId {
        let constraint =
            (self.current_token() == SyntaxKind::OpenBraceToken).then(|| self.parse_jsdoc_type_expression(false));
        let type_parameters = self.parse_template_tag_type_parameters();
        let end = self.node_pos();
        let comment = self.parse_trailing_tag_comments(start, end, indent, indent_text);
        self.finish_node(
            SyntaxKind::JSDocTemplateTag,
            start,
            NodePayload::JSDocTemplateTag {
                tag_name,
                constraint,
                type_parameters,
                comment,
            },
        )
    }

    fn parse_template_tag_type_parameters(&mut self) -> ListId {
        let pos = self.node_pos();
        let mut type_parameters = Vec::new();
        loop {
            self.skip_whitespace();
            if let Some(type_parameter) = self.parse_template_tag_type_parameter() {
                type_parameters.push(type_parameter);
            }
            self.skip_whitespace_or_asterisk();
            if !self.parse_optional_jsdoc(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.create_node_list(type_parameters, pos, None)
    }

    /// `T`, `const T` or `[T=Default]`.
    fn parse_template_tag_type_parameter(&mut self) -> Option<NodeId> {
        let pos = self.node_pos();
        let is_bracketed = self.parse_optional_jsdoc(SyntaxKind::OpenBracketToken);
        if is_bracketed {
            self.skip_whitespace();
        }
        let modifiers = self.parse_modifiers(false, true, false);
        let name =
            self.parse_jsdoc_identifier_name(Some(&messages::UNEXPECTED_TOKEN_A_TYPE_PARAMETER_NAME_WAS_EXPECTED_WITHOUT_CURLY_BRACES));
        let mut default = None;
        if is_bracketed {
            self.skip_whitespace();
            self.parse_expected(SyntaxKind::EqualsToken, None);
            default = Some(self.do_inside_of_context(NodeFlags::JSDOC, Self::parse_jsdoc_type));
            self.parse_expected(SyntaxKind::CloseBracketToken, None);
        }
        if self.node_is_missing(name) {
            return None;
        }
        Some(self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodePayload::TypeParameter {
                modifiers,
                name,
                constraint: None,
                default,
                expression: None,
            },
        ))
    }

    // ---- @typedef / @callback / @overload -----------------------------------

    fn parse_typedef_tag(&mut self, start: u32, tag_name: NodeId, indent: usize, indent_text: &'a str) -> NodeId {
        let mut type_expression = self.try_parse_type_expression();
        self.skip_whitespace_or_asterisk();

        let full_name = self.parse_jsdoc_type_name_with_namespace();
        self.skip_whitespace();
        let mut comment = self.parse_tag_comments(indent, None);

        let mut children_end = None;
        if type_expression.map_or(true, |t| self.is_object_type_expression(t)) {
            let mut child_type_tag = None;
            let mut property_tags = Vec::new();
            let mut has_children = false;
            // A `@template` ends the members and is left for the comment.
            while let Some(child) = self.try_parse(|p| {
                p.parse_child_parameter_or_property_tag(PropertyLikeParse::Property, indent, None)
                    .filter(|&child| p.arena.kind(child) != SyntaxKind::JSDocTemplateTag)
            }) {
                has_children = true;
                if self.arena.kind(child) == SyntaxKind::JSDocTypeTag {
                    if child_type_tag.is_some() {
                        self.parse_error_at_current_token(
                            &messages::A_JSDOC_TYPEDEF_COMMENT_MAY_NOT_CONTAIN_MULTIPLE_TYPE_TAGS,
                            &[],
                        );
                        break;
                    }
                    child_type_tag = Some(child);
                } else {
                    property_tags.push(child);
                }
            }
            if has_children {
                let is_array_type = type_expression
                    .and_then(|t| self.type_of_type_expression(t))
                    .is_some_and(|t| self.arena.kind(t) == SyntaxKind::ArrayType);
                let child_type = child_type_tag
                    .and_then(|tag| match self.arena.get(tag).payload {
                        NodePayload::JSDocTypedTag { type_expression, .. } => type_expression,
                        _ => None,
                    })
                    .filter(|&t| !self.is_object_type_expression(t));
                let typed = match child_type {
                    Some(child_type) => child_type,
                    None => {
                        let property_tags = self.create_tag_list(property_tags);
                        self.finish_node(
                            SyntaxKind::JSDocTypeLiteral,
                            start,
                            NodePayload::JSDocTypeLiteral {
                                property_tags,
                                is_array_type,
                            },
                        )
                    }
                };
                type_expression = Some(typed);
                children_end = Some(self.arena.data(typed).end());
            }
        }

        // The typedef ends with its last member, not with trailing text.
        let mut end = if children_end.is_some() || comment.is_some() {
            self.node_pos()
        } else {
            let last = full_name.or(type_expression).unwrap_or(tag_name);
            self.arena.data(last).end()
        };
        if comment.is_none() {
            comment = self.parse_trailing_tag_comments(start, end, indent, indent_text);
            if let Some(comment) = comment {
                end = end.max(self.arena.list(comment).range.end);
            }
        }
        self.finish_node_at(
            SyntaxKind::JSDocTypedefTag,
            start,
            end,
            NodePayload::JSDocTypedefTag {
                tag_name,
                type_expression,
                full_name,
                comment,
            },
            NodeFlags::NONE,
        )
    }

    /// `Name` or `ns.inner.Name`; dotted names nest as namespaces.
    fn parse_jsdoc_type_name_with_namespace(&mut self) -> Option<NodeId> {
        if !self.current_token().is_identifier_or_keyword() {
            return None;
        }
        let mut names = vec![self.parse_jsdoc_identifier_name(None)];
        let mut trailing_dot = false;
        while self.parse_optional(SyntaxKind::DotToken) {
            if !self.current_token().is_identifier_or_keyword() {
                trailing_dot = true;
                break;
            }
            names.push(self.parse_jsdoc_identifier_name(None));
        }
        let end = self.node_pos();
        let mut body = if trailing_dot { None } else { names.pop() };
        while let Some(name) = names.pop() {
            let flags = if names.is_empty() {
                NodeFlags::NONE
            } else {
                NodeFlags::NESTED_NAMESPACE
            };
            let pos = self.arena.data(name).pos();
            body = Some(self.finish_node_at(
                SyntaxKind::ModuleDeclaration,
                pos,
                end,
                NodePayload::Module {
                    modifiers: None,
                    name,
                    body,
                },
                flags,
            ));
        }
        body
    }

    fn parse_callback_tag(
        &mut self,
        start: u32,
        tag_name: NodeId,
        indent: usize,
        indent_text: &'a str,
        tags: &[NodeId],
    ) -> NodeId {
        let full_name = self.parse_jsdoc_type_name_with_namespace();
        self.skip_whitespace();
        let mut comment = self.parse_tag_comments(indent, None);
        let signature = self.parse_jsdoc_signature(start, indent, tags);
        if comment.is_none() {
            let pos = self.node_pos();
            comment = self.parse_trailing_tag_comments(start, pos, indent, indent_text);
        }
        let end = if comment.is_some() {
            self.node_pos()
        } else {
            self.arena.data(signature).end()
        };
        self.finish_node_at(
            SyntaxKind::JSDocCallbackTag,
            start,
            end,
            NodePayload::JSDocTypedefTag {
                tag_name,
                type_expression: Some(signature),
                full_name,
                comment,
            },
            NodeFlags::NONE,
        )
    }

    fn parse_overload_tag(
        &mut self,
        start: u32,
        tag_name: NodeId,
        indent: usize,
        indent_text: &'a str,
        tags: &[NodeId],
    ) -> NodeId {
        self.skip_whitespace();
        let mut comment = self.parse_tag_comments(indent, None);
        let signature = self.parse_jsdoc_signature(start, indent, tags);
        if comment.is_none() {
            let pos = self.node_pos();
            comment = self.parse_trailing_tag_comments(start, pos, indent, indent_text);
        }
        let end = if comment.is_some() {
            self.node_pos()
        } else {
            self.arena.data(signature).end()
        };
        self.finish_node_at(
            SyntaxKind::JSDocOverloadTag,
            start,
            end,
            NodePayload::JSDocTypedTag {
                tag_name,
                type_expression: Some(signature),
                comment,
            },
            NodeFlags::NONE,
        )
    }

    /// `@param` children and an optional `@returns` of a callback or
    /// overload.
    fn parse_jsdoc_signature(&mut self, start: u32, indent: usize, tags: &[NodeId]) -> NodeId {
        let parameters = self.parse_callback_tag_parameters(indent);
        let type_tag = self.try_parse(|p| {
            // The `@` left behind by the comment scan is scanned again here.
            if !p.parse_optional_jsdoc(SyntaxKind::AtToken) || p.current_token() != SyntaxKind::AtToken {
                return None;
            }
            let tag = p.parse_tag(indent, tags);
            (p.arena.kind(tag) == SyntaxKind::JSDocReturnTag).then_some(tag)
        });
        self.finish_node(
            SyntaxKind::JSDocSignature,
            start,
            NodePayload::JSDocSignature {
                type_parameters: None,
                parameters,
                type_tag,
            },
        )
    }

    fn parse_callback_tag_parameters(&mut self, indent: usize) -> ListId {
        let pos = self.node_pos();
        let mut parameters = Vec::new();
        while let Some(child) =
            self.try_parse(|p| p.parse_child_parameter_or_property_tag(PropertyLikeParse::CallbackParameter, indent, None))
        {
            if self.arena.kind(child) == SyntaxKind::JSDocTemplateTag {
                if let Some(tag_name) = self.tag_name_of(child) {
                    self.parse_error_at_range(
                        tag_name,
                        &messages::A_JSDOC_TEMPLATE_TAG_MAY_NOT_FOLLOW_A_TYPEDEF_CALLBACK_OR_OVERLOAD_TAG,
                        &[],
                    );
                }
                break;
            }
            parameters.push(child);
        }
        self.create_node_list(parameters, pos, None)
    }

    // ========================================================================
    // Isolated entry points
    // ========================================================================

    /// A `{type}` expression at `[start, start + length)` of `text`, parsed
    /// on its own.
    pub fn parse_jsdoc_type_expression_for_tests(text: &str, start: usize, length: usize) -> Option<ParsedFragment> {
        let end = start.checked_add(length)?;
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return None;
        }
        let mut parser = Parser::new("file.js", text, ParseOptions::for_file_name("file.js"));
        parser.scanner.set_text_range(start, end);
        parser.next_token();
        let node = parser.parse_jsdoc_type_expression(false);
        Some(parser.into_fragment(node))
    }

    /// The documentation comment at `[start, start + length)` of `text`,
    /// parsed on its own. `None` unless the range starts with `/**`.
    pub fn parse_isolated_jsdoc_comment(text: &str, start: usize, length: usize) -> Option<ParsedFragment> {
        let end = start.checked_add(length)?;
        if end > text.len() {
            return None;
        }
        let mut parser = Parser::new("", text, ParseOptions::for_file_name("file.js"));
        parser.parsing_context.insert(ParsingContext::JSDocComment);
        let node = parser.do_inside_of_context(NodeFlags::JSDOC, |p| {
            p.parse_jsdoc_comment_worker(start as u32, end as u32)
        })?;
        Some(parser.into_fragment(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsparse_ast::SourceFile;

    fn parse_js(text: &str) -> SourceFile {
        Parser::new("test.js", text, ParseOptions::for_file_name("test.js")).parse_source_file()
    }

    fn first_statement_doc(file: &SourceFile) -> NodeId {
        let docs = file.js_doc(file.statements()[0]);
        assert!(!docs.is_empty(), "statement has no documentation");
        docs[0]
    }

    fn doc_tags(file: &SourceFile, doc: NodeId) -> Vec<NodeId> {
        match file.arena.get(doc).payload {
            NodePayload::JSDoc { tags, .. } => file.arena.list_nodes(tags).to_vec(),
            _ => panic!("not a JSDoc node"),
        }
    }

    fn text_of(file: &SourceFile, node: NodeId) -> &str {
        match &file.arena.get(node).payload {
            NodePayload::Identifier { text, .. } | NodePayload::Literal { text, .. } => file.interner.resolve(*text),
            _ => "",
        }
    }

    #[test]
    fn test_description_and_param_tags() {
        let text = "/**\n * Adds two numbers.\n * @param {number} a first\n * @param {number} b\n */\nfunction add(a, b) {}";
        let file = parse_js(text);
        let doc = first_statement_doc(&file);
        let NodePayload::JSDoc { comment, .. } = file.arena.get(doc).payload else {
            panic!("not a JSDoc node");
        };
        let description = file.arena.list_nodes(comment)[0];
        assert_eq!(text_of(&file, description), "Adds two numbers.");

        let tags = doc_tags(&file, doc);
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|&t| file.arena.kind(t) == SyntaxKind::JSDocParameterTag));
        let NodePayload::JSDocPropertyLikeTag {
            name,
            is_name_first,
            type_expression,
            ..
        } = file.arena.get(tags[0]).payload
        else {
            panic!("not a parameter tag");
        };
        assert_eq!(text_of(&file, name), "a");
        assert!(!is_name_first);
        assert!(type_expression.is_some());
        assert!(file.js_doc_diagnostics.is_empty());
    }

    #[test]
    fn test_outer_parse_is_unaffected() {
        let text = "/** @type {string} */\nconst a = 1;\nlet b = 2;";
        let file = parse_js(text);
        assert_eq!(file.statements().len(), 2);
        assert!(file.parse_diagnostics.is_empty());
        let doc = first_statement_doc(&file);
        let tags = doc_tags(&file, doc);
        assert_eq!(file.arena.kind(tags[0]), SyntaxKind::JSDocTypeTag);
    }

    #[test]
    fn test_errors_go_to_jsdoc_diagnostics() {
        let file = parse_js("/** @type {string */\nvar x;");
        assert!(file.parse_diagnostics.is_empty());
        assert_eq!(file.js_doc_diagnostics.len(), 1);
        assert!(!file.arena.data(file.statements()[0]).has_error());
    }

    #[test]
    fn test_inline_link() {
        let text = "/** See {@link Foo.bar the bar} for details. */\nvar x;";
        let file = parse_js(text);
        let doc = first_statement_doc(&file);
        let NodePayload::JSDoc { comment, .. } = file.arena.get(doc).payload else {
            panic!("not a JSDoc node");
        };
        let kinds: Vec<SyntaxKind> = file.arena.list_nodes(comment).iter().map(|&n| file.arena.kind(n)).collect();
        assert_eq!(kinds, vec![SyntaxKind::JSDocText, SyntaxKind::JSDocLink, SyntaxKind::JSDocText]);
        let link = file.arena.list_nodes(comment)[1];
        let NodePayload::JSDocLink { name, text } = file.arena.get(link).payload else {
            panic!("not a link");
        };
        assert_eq!(file.arena.kind(name.expect("link has a name")), SyntaxKind::QualifiedName);
        assert_eq!(file.interner.resolve(text).trim(), "the bar");
    }

    #[test]
    fn test_typedef_with_properties() {
        let text = "/**\n * @typedef {Object} Point\n * @property {number} x\n * @property {number} y\n */\nvar p;";
        let file = parse_js(text);
        let doc = first_statement_doc(&file);
        let tags = doc_tags(&file, doc);
        assert_eq!(tags.len(), 1);
        let NodePayload::JSDocTypedefTag {
            type_expression,
            full_name,
            ..
        } = file.arena.get(tags[0]).payload
        else {
            panic!("not a typedef");
        };
        assert_eq!(text_of(&file, full_name.expect("typedef is named")), "Point");
        let literal = type_expression.expect("typedef has a type");
        assert_eq!(file.arena.kind(literal), SyntaxKind::JSDocTypeLiteral);
        let NodePayload::JSDocTypeLiteral { property_tags, .. } = file.arena.get(literal).payload else {
            panic!("not a type literal");
        };
        assert_eq!(file.arena.list_nodes(property_tags).len(), 2);
    }

    #[test]
    fn test_unknown_tag_and_author() {
        let text = "/**\n * @custom something\n * @author Jane Doe <jane@example.com>\n */\nvar v;";
        let file = parse_js(text);
        let tags = doc_tags(&file, first_statement_doc(&file));
        let kinds: Vec<SyntaxKind> = tags.iter().map(|&t| file.arena.kind(t)).collect();
        assert_eq!(kinds, vec![SyntaxKind::JSDocTag, SyntaxKind::JSDocAuthorTag]);
        let NodePayload::JSDocTag { comment, .. } = file.arena.get(tags[1]).payload else {
            panic!("not a tag");
        };
        let author = file.arena.list_nodes(comment)[0];
        assert_eq!(text_of(&file, author), "Jane Doe <jane@example.com>");
    }

    #[test]
    fn test_repeated_returns_is_reported() {
        let file = parse_js("/**\n * @returns {number}\n * @returns {string}\n */\nfunction f() {}");
        assert_eq!(file.js_doc_diagnostics.len(), 1);
        assert_eq!(file.js_doc_diagnostics[0].code, 1223);
    }

    #[test]
    fn test_template_tag() {
        let file = parse_js("/** @template {string} K, V */\nfunction f() {}");
        let tags = doc_tags(&file, first_statement_doc(&file));
        let NodePayload::JSDocTemplateTag {
            constraint,
            type_parameters,
            ..
        } = file.arena.get(tags[0]).payload
        else {
            panic!("not a template tag");
        };
        assert!(constraint.is_some());
        assert_eq!(file.arena.list(type_parameters).len(), 2);
    }

    #[test]
    fn test_parse_none_skips_comments() {
        let mut options = ParseOptions::for_file_name("test.js");
        options.jsdoc_parsing_mode = rsparse_ast::JSDocParsingMode::ParseNone;
        let file = Parser::new("test.js", "/** @type {number} */ var x;", options).parse_source_file();
        assert!(file.js_doc(file.statements()[0]).is_empty());
    }

    #[test]
    fn test_isolated_type_expression() {
        let fragment = Parser::parse_jsdoc_type_expression_for_tests("{?number=}", 0, 10).expect("in range");
        assert_eq!(fragment.arena.kind(fragment.node), SyntaxKind::JSDocTypeExpression);
        assert!(fragment.diagnostics.is_empty());
        assert!(Parser::parse_jsdoc_type_expression_for_tests("{x}", 2, 5).is_none());
    }

    #[test]
    fn test_isolated_comment_requires_doc_start() {
        assert!(Parser::parse_isolated_jsdoc_comment("/* plain */", 0, 11).is_none());
        let fragment = Parser::parse_isolated_jsdoc_comment("/** @see Foo */", 0, 15).expect("doc comment");
        assert_eq!(fragment.arena.kind(fragment.node), SyntaxKind::JSDoc);
    }
}
