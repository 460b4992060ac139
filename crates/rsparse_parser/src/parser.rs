//! The parser state: token cursor, context flags, diagnostics and node
//! construction, plus the source-file driver.
//!
//! Grammar productions live in `grammar/`, documentation comments in
//! `jsdoc.rs`; all of them are methods on [`Parser`].

use crate::incremental::SyntaxCursor;
use crate::list::{ParsingContext, ParsingContexts};
use crate::options::{is_declaration_file_name, ParseOptions};
use crate::pragmas::collect_pragmas;
use crate::stack::ensure_sufficient_stack;
use rsparse_ast::{
    for_each_child_node, walk_preorder, IncrementalStats, ModifierFlags, NodeArena, NodeData, NodeFlags, NodeId,
    NodeListData, NodePayload, ScriptKind, SourceFile, SyntaxKind, TokenFlags,
};
use rsparse_ast::ListId;
use rsparse_core::{InternedString, StringInterner};
use rsparse_core::TextSpan;
use rsparse_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use rsparse_scanner::Scanner;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Guarded productions nest at most this deep. Past it the parser reports
/// one diagnostic and returns missing nodes instead of recursing.
pub const MAX_NESTING_DEPTH: u32 = 1000;

/// Recursive descent parser for one file.
///
/// A `Parser` is built for a single parse and consumed by
/// [`Parser::parse_source_file`].
pub struct Parser<'a> {
    pub(crate) scanner: Scanner<'a>,
    pub(crate) text: &'a str,
    pub(crate) file_name: String,
    pub(crate) options: ParseOptions,
    pub(crate) arena: NodeArena,
    pub(crate) interner: StringInterner,

    pub(crate) diagnostics: DiagnosticCollection,
    /// Starts of every diagnostic in `diagnostics`.
    pub(crate) diagnostic_starts: FxHashSet<u32>,
    pub(crate) js_doc_diagnostics: Vec<Diagnostic>,

    pub(crate) current_token: SyntaxKind,
    pub(crate) context_flags: NodeFlags,
    /// Flags recorded on the source file node.
    pub(crate) source_flags: NodeFlags,
    pub(crate) parsing_context: ParsingContexts,
    /// Set by every reported error and consumed by the next finished node.
    pub(crate) parse_error_before_next_finished_node: bool,

    pub(crate) nesting_depth: u32,
    pub(crate) nesting_error_reported: bool,

    /// Start positions already known not to begin a parenthesized arrow.
    pub(crate) not_parenthesized_arrow: FxHashSet<u32>,

    pub(crate) syntax_cursor: Option<SyntaxCursor>,
    pub(crate) stats: IncrementalStats,
}

impl<'a> Parser<'a> {
    pub fn new(file_name: &str, text: &'a str, options: ParseOptions) -> Self {
        Self::with_arena(
            file_name,
            text,
            options,
            NodeArena::with_capacity_for_text(text.len()),
            StringInterner::new(),
            None,
        )
    }

    /// A parser that appends to an existing arena, for incremental updates.
    pub(crate) fn with_arena(
        file_name: &str,
        text: &'a str,
        options: ParseOptions,
        arena: NodeArena,
        interner: StringInterner,
        syntax_cursor: Option<SyntaxCursor>,
    ) -> Self {
        debug_assert!(u32::try_from(text.len()).is_ok(), "source text exceeds u32 positions");
        let mut scanner = Scanner::new(text);
        scanner.set_language_variant(options.language_variant);
        scanner.set_script_kind(options.script_kind);
        scanner.set_jsdoc_parsing_mode(options.jsdoc_parsing_mode);

        let context_flags = match options.script_kind {
            ScriptKind::Js | ScriptKind::Jsx => NodeFlags::JAVASCRIPT_FILE,
            ScriptKind::Json => NodeFlags::JAVASCRIPT_FILE | NodeFlags::JSON_FILE,
            ScriptKind::Ts | ScriptKind::Tsx => NodeFlags::NONE,
        };

        Self {
            scanner,
            text,
            file_name: file_name.to_string(),
            options,
            arena,
            interner,
            diagnostics: DiagnosticCollection::new(),
            diagnostic_starts: FxHashSet::default(),
            js_doc_diagnostics: Vec::new(),
            current_token: SyntaxKind::Unknown,
            context_flags,
            source_flags: NodeFlags::NONE,
            parsing_context: ParsingContexts::default(),
            parse_error_before_next_finished_node: false,
            nesting_depth: 0,
            nesting_error_reported: false,
            not_parenthesized_arrow: FxHashSet::default(),
            syntax_cursor,
            stats: IncrementalStats::default(),
        }
    }

    // ========================================================================
    // Driver
    // ========================================================================

    /// Parse the whole text into a [`SourceFile`].
    pub fn parse_source_file(mut self) -> SourceFile {
        debug!(file = %self.file_name, len = self.text.len(), kind = ?self.options.script_kind, "parse start");
        let is_declaration_file = is_declaration_file_name(&self.file_name);
        let (root, external_module_indicator) = if self.options.script_kind == ScriptKind::Json {
            (self.parse_json_text(), None)
        } else {
            self.parse_source_file_worker(is_declaration_file)
        };
        self.into_source_file(root, is_declaration_file, external_module_indicator)
    }

    fn parse_source_file_worker(&mut self, is_declaration_file: bool) -> (NodeId, Option<NodeId>) {
        if is_declaration_file {
            self.context_flags |= NodeFlags::AMBIENT;
        }
        self.source_flags = self.context_flags;

        self.next_token();
        let mut statements = self.parse_list(ParsingContext::SourceElements, Self::parse_statement);
        debug_assert_eq!(self.current_token(), SyntaxKind::EndOfFileToken);
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let eof = self.parse_token_node();
        let end_of_file_token = self.with_jsdoc(eof, has_jsdoc);

        let mut indicator = self.external_module_indicator(statements);
        if !is_declaration_file && indicator.is_some() && self.contains_possible_top_level_await(statements) {
            statements = self.reparse_top_level_await(statements);
            indicator = self.external_module_indicator(statements);
        }

        let root = self.finish_source_file_node(statements, end_of_file_token);
        (root, indicator)
    }

    /// JSON text: a single expression, or several wrapped in an array for
    /// recovery.
    fn parse_json_text(&mut self) -> NodeId {
        self.source_flags = self.context_flags;
        self.next_token();
        let pos = self.node_pos();

        let (statements, end_of_file_token) = if self.current_token() == SyntaxKind::EndOfFileToken {
            let statements = self.create_node_list(Vec::new(), pos, Some(pos));
            (statements, self.parse_token_node())
        } else {
            let mut expressions: Vec<NodeId> = Vec::new();
            while self.current_token() != SyntaxKind::EndOfFileToken {
                let expression = match self.current_token() {
                    SyntaxKind::OpenBracketToken => self.parse_array_literal_expression(),
                    SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword => {
                        self.parse_token_node()
                    }
                    SyntaxKind::MinusToken => {
                        if self.look_ahead(|p| {
                            p.next_token() == SyntaxKind::NumericLiteral && p.next_token() != SyntaxKind::ColonToken
                        }) {
                            self.parse_prefix_unary_expression()
                        } else {
                            self.parse_object_literal_expression()
                        }
                    }
                    SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral
                        if self.look_ahead(|p| p.next_token() != SyntaxKind::ColonToken) =>
                    {
                        self.parse_literal_node()
                    }
                    _ => self.parse_object_literal_expression(),
                };
                expressions.push(expression);
                // Only the token after the first value is reported.
                if expressions.len() == 1 && self.current_token() != SyntaxKind::EndOfFileToken {
                    self.parse_error_at_current_token(&messages::UNEXPECTED_TOKEN, &[]);
                }
            }

            let expression = if expressions.len() > 1 {
                let elements = self.create_node_list(expressions, pos, None);
                self.finish_node(
                    SyntaxKind::ArrayLiteralExpression,
                    pos,
                    NodePayload::ArrayLiteral {
                        elements,
                        multi_line: false,
                    },
                )
            } else {
                expressions[0]
            };
            let statement = self.finish_node(
                SyntaxKind::ExpressionStatement,
                pos,
                NodePayload::ExpressionWrapper { expression },
            );
            let statements = self.create_node_list(vec![statement], pos, None);
            let eof = self.parse_expected_token(SyntaxKind::EndOfFileToken, Some(&messages::UNEXPECTED_TOKEN));
            (statements, eof)
        };

        self.finish_source_file_node(statements, end_of_file_token)
    }

    pub(crate) fn finish_source_file_node(&mut self, statements: ListId, end_of_file_token: NodeId) -> NodeId {
        let mut data = NodeData::new(SyntaxKind::SourceFile, 0, self.text.len() as u32);
        data.flags = self.source_flags;
        let root = self.arena.alloc(
            data,
            NodePayload::SourceFile {
                statements,
                end_of_file_token,
            },
        );
        self.aggregate_child_data(root);
        root
    }

    /// Package the tree and everything collected into a [`SourceFile`].
    pub(crate) fn into_source_file(
        self,
        root: NodeId,
        is_declaration_file: bool,
        external_module_indicator: Option<NodeId>,
    ) -> SourceFile {
        let mut node_count = 0;
        let mut identifier_count = 0;
        walk_preorder(&self.arena, root, &mut |node| {
            node_count += 1;
            if self.arena.kind(node) == SyntaxKind::Identifier {
                identifier_count += 1;
            }
        });
        let pragmas = collect_pragmas(self.text);
        let parse_diagnostics = self.diagnostics.into_diagnostics();
        debug!(
            file = %self.file_name,
            nodes = node_count,
            diagnostics = parse_diagnostics.len(),
            "parse end"
        );

        let has_been_incrementally_parsed = self.syntax_cursor.is_some();
        SourceFile {
            file_name: self.file_name,
            text: self.text.to_string(),
            arena: self.arena,
            root,
            interner: self.interner,
            parse_diagnostics,
            js_doc_diagnostics: self.js_doc_diagnostics,
            language_version: self.options.language_version,
            language_variant: self.options.language_variant,
            script_kind: self.options.script_kind,
            jsdoc_parsing_mode: self.options.jsdoc_parsing_mode,
            set_external_module_indicator: self.options.set_external_module_indicator,
            is_declaration_file,
            external_module_indicator,
            pragmas,
            node_count,
            identifier_count,
            has_been_incrementally_parsed,
            incremental_stats: has_been_incrementally_parsed.then_some(self.stats),
        }
    }

    // ========================================================================
    // External module detection
    // ========================================================================

    fn external_module_indicator(&self, statements: ListId) -> Option<NodeId> {
        if !self.options.set_external_module_indicator {
            return None;
        }
        self.arena
            .list(statements)
            .iter()
            .find(|&statement| self.is_external_module_indicator_node(statement))
            .or_else(|| self.find_import_meta(statements))
    }

    fn is_external_module_indicator_node(&self, node: NodeId) -> bool {
        let n = self.arena.get(node);
        let has_export_modifier = self
            .arena
            .list_nodes(n.modifiers())
            .iter()
            .any(|&m| self.arena.kind(m) == SyntaxKind::ExportKeyword);
        match &n.payload {
            _ if has_export_modifier => true,
            NodePayload::ImportEquals { module_reference, .. } => {
                self.arena.kind(*module_reference) == SyntaxKind::ExternalModuleReference
            }
            _ => matches!(
                n.kind(),
                SyntaxKind::ImportDeclaration | SyntaxKind::ExportAssignment | SyntaxKind::ExportDeclaration
            ),
        }
    }

    fn find_import_meta(&self, statements: ListId) -> Option<NodeId> {
        if !self.source_flags.contains(NodeFlags::POSSIBLY_CONTAINS_IMPORT_META) {
            return None;
        }
        let mut found = None;
        for &statement in &self.arena.list(statements).nodes {
            walk_preorder(&self.arena, statement, &mut |node| {
                if found.is_none() {
                    if let NodePayload::MetaProperty {
                        keyword_token: SyntaxKind::ImportKeyword,
                        ..
                    } = self.arena.get(node).payload
                    {
                        found = Some(node);
                    }
                }
            });
            if found.is_some() {
                break;
            }
        }
        found
    }

    // ========================================================================
    // Top-level await
    // ========================================================================

    fn statement_contains_possible_top_level_await(&self, statement: NodeId) -> bool {
        let flags = self.arena.data(statement).flags;
        !flags.contains(NodeFlags::AWAIT_CONTEXT) && flags.contains(NodeFlags::CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT)
    }

    fn contains_possible_top_level_await(&self, statements: ListId) -> bool {
        self.arena
            .list(statements)
            .iter()
            .any(|s| self.statement_contains_possible_top_level_await(s))
    }

    /// Reparse, in await context, the statements of a module that used
    /// `await` as an identifier. Statements in between are kept along with
    /// their diagnostics.
    fn reparse_top_level_await(&mut self, statements: ListId) -> ListId {
        let old: Vec<NodeId> = self.arena.list(statements).nodes.clone();
        let list_range = self.arena.list(statements).range;
        let saved_diagnostics = std::mem::take(&mut self.diagnostics).into_diagnostics();
        self.diagnostic_starts.clear();

        let find_with_await = |p: &Self, from: usize| {
            (from..old.len()).find(|&i| p.statement_contains_possible_top_level_await(old[i]))
        };
        let find_without_await = |p: &Self, from: usize| {
            (from..old.len()).find(|&i| !p.statement_contains_possible_top_level_await(old[i]))
        };

        let mut result: Vec<NodeId> = Vec::with_capacity(old.len());
        let mut pos = Some(0);
        let mut start = find_with_await(self, 0);
        while let (Some(start_index), Some(copy_from)) = (start, pos) {
            let prev_pos = self.arena.data(old[copy_from]).pos();
            let next_pos = self.arena.data(old[start_index]).pos();
            result.extend_from_slice(&old[copy_from..start_index]);
            pos = find_without_await(self, start_index);

            for diagnostic in &saved_diagnostics {
                if diagnostic.start() >= prev_pos && diagnostic.start() < next_pos {
                    self.push_diagnostic(diagnostic.clone());
                }
            }

            let mut next_pos_index = pos;
            self.reparse(|p| {
                let saved_context = p.parsing_context;
                p.parsing_context.insert(ParsingContext::SourceElements);
                p.do_inside_of_context(NodeFlags::AWAIT_CONTEXT, |p| {
                    p.scanner.reset_token_state(next_pos as usize);
                    p.next_token();
                    while p.current_token() != SyntaxKind::EndOfFileToken {
                        let start_pos = p.scanner.token_full_start();
                        let statement = p.parse_statement();
                        result.push(statement);
                        if start_pos == p.scanner.token_full_start() {
                            p.next_token();
                        }
                        if let Some(index) = next_pos_index {
                            let non_await_pos = p.arena.data(old[index]).pos();
                            let end = p.arena.data(statement).end();
                            if end == non_await_pos {
                                break;
                            }
                            if end > non_await_pos {
                                next_pos_index = find_without_await(p, index + 1);
                            }
                        }
                    }
                });
                p.parsing_context = saved_context;
            });
            pos = next_pos_index;
            start = pos.and_then(|index| find_with_await(self, index));
        }

        if let Some(copy_from) = pos {
            let prev_pos = self.arena.data(old[copy_from]).pos();
            result.extend_from_slice(&old[copy_from..]);
            for diagnostic in &saved_diagnostics {
                if diagnostic.start() >= prev_pos {
                    self.push_diagnostic(diagnostic.clone());
                }
            }
        }

        debug!(statements = result.len(), "reparsed top-level await");
        self.create_node_list(result, list_range.pos, Some(list_range.end))
    }

    // ========================================================================
    // Token cursor
    // ========================================================================

    #[inline]
    pub(crate) fn current_token(&self) -> SyntaxKind {
        self.current_token
    }

    /// Full start of the current token: where the next node begins.
    #[inline]
    pub(crate) fn node_pos(&self) -> u32 {
        self.scanner.token_full_start()
    }

    #[inline]
    pub(crate) fn token_start(&self) -> u32 {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    #[inline]
    pub(crate) fn has_preceding_jsdoc_comment(&self) -> bool {
        self.scanner.has_preceding_jsdoc_comment()
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    /// Raw text of the current token.
    #[inline]
    pub(crate) fn token_text(&self) -> &'a str {
        self.scanner.token_text()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        if self.current_token.is_keyword()
            && (self.scanner.has_unicode_escape() || self.scanner.has_extended_unicode_escape())
        {
            self.parse_error_at_current_token(&messages::KEYWORDS_CANNOT_CONTAIN_ESCAPE_CHARACTERS, &[]);
        }
        self.next_token_without_check()
    }

    pub(crate) fn next_token_without_check(&mut self) -> SyntaxKind {
        let token = self.scanner.scan();
        self.set_token(token)
    }

    pub(crate) fn next_token_jsdoc(&mut self) -> SyntaxKind {
        let token = self.scanner.scan_jsdoc_token();
        self.set_token(token)
    }

    pub(crate) fn next_jsdoc_comment_text_token(&mut self, in_backticks: bool) -> SyntaxKind {
        let token = self.scanner.scan_jsdoc_comment_text_token(in_backticks);
        self.set_token(token)
    }

    pub(crate) fn re_scan_greater_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_greater_than_token();
        self.set_token(token)
    }

    pub(crate) fn re_scan_slash_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_slash_token(true);
        self.set_token(token)
    }

    pub(crate) fn re_scan_template_token(&mut self, is_tagged_template: bool) -> SyntaxKind {
        let token = self.scanner.rescan_template_token(is_tagged_template);
        self.set_token(token)
    }

    pub(crate) fn re_scan_template_head_or_no_substitution_template(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_template_head_or_no_substitution_template();
        self.set_token(token)
    }

    pub(crate) fn re_scan_less_than_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_less_than_token();
        self.set_token(token)
    }

    pub(crate) fn re_scan_question_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_question_token();
        self.set_token(token)
    }

    pub(crate) fn re_scan_asterisk_equals_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_asterisk_equals_token();
        self.set_token(token)
    }

    pub(crate) fn re_scan_hash_token(&mut self) -> SyntaxKind {
        let token = self.scanner.rescan_hash_token();
        self.set_token(token)
    }

    pub(crate) fn scan_jsx_text(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        let token = self.scanner.scan_jsx_token(allow_multiline_jsx_text);
        self.set_token(token)
    }

    pub(crate) fn re_scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        let token = self.scanner.rescan_jsx_token(allow_multiline_jsx_text);
        self.set_token(token)
    }

    pub(crate) fn scan_jsx_identifier(&mut self) -> SyntaxKind {
        let token = self.scanner.scan_jsx_identifier();
        self.set_token(token)
    }

    pub(crate) fn scan_jsx_attribute_value(&mut self) -> SyntaxKind {
        let token = self.scanner.scan_jsx_attribute_value();
        self.set_token(token)
    }

    /// Record the scanner's new token and report any lexical errors it
    /// queued while producing it.
    #[inline]
    fn set_token(&mut self, token: SyntaxKind) -> SyntaxKind {
        self.current_token = token;
        if self.scanner.has_errors() {
            for error in self.scanner.take_errors() {
                let arg = error.arg.as_deref();
                let args: &[&str] = match &arg {
                    Some(arg) => std::slice::from_ref(arg),
                    None => &[],
                };
                self.parse_error_at_position(error.pos, error.length, error.message, args);
            }
        }
        token
    }

    // ========================================================================
    // Context flags
    // ========================================================================

    #[inline]
    fn set_context_flag(&mut self, value: bool, flag: NodeFlags) {
        self.context_flags.set(flag, value);
    }

    pub(crate) fn do_inside_of_context<T>(&mut self, context: NodeFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        // Only the bits that are not already set get cleared afterwards.
        let set = context & !self.context_flags;
        if set.is_empty() {
            return f(self);
        }
        self.set_context_flag(true, set);
        let result = f(self);
        self.set_context_flag(false, set);
        result
    }

    pub(crate) fn do_outside_of_context<T>(&mut self, context: NodeFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        let clear = context & self.context_flags;
        if clear.is_empty() {
            return f(self);
        }
        self.set_context_flag(false, clear);
        let result = f(self);
        self.set_context_flag(true, clear);
        result
    }

    pub(crate) fn allow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::DISALLOW_IN_CONTEXT, f)
    }

    pub(crate) fn disallow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DISALLOW_IN_CONTEXT, f)
    }

    pub(crate) fn allow_conditional_types_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT, f)
    }

    pub(crate) fn disallow_conditional_types_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT, f)
    }

    pub(crate) fn do_in_yield_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::YIELD_CONTEXT, f)
    }

    pub(crate) fn do_in_decorator_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DECORATOR_CONTEXT, f)
    }

    pub(crate) fn do_in_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::AWAIT_CONTEXT, f)
    }

    pub(crate) fn do_outside_of_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::AWAIT_CONTEXT, f)
    }

    pub(crate) fn do_in_yield_and_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT, f)
    }

    pub(crate) fn do_outside_of_yield_and_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT, f)
    }

    #[inline]
    pub(crate) fn in_context(&self, flags: NodeFlags) -> bool {
        self.context_flags.intersects(flags)
    }

    #[inline]
    pub(crate) fn in_yield_context(&self) -> bool {
        self.in_context(NodeFlags::YIELD_CONTEXT)
    }

    #[inline]
    pub(crate) fn in_disallow_in_context(&self) -> bool {
        self.in_context(NodeFlags::DISALLOW_IN_CONTEXT)
    }

    #[inline]
    pub(crate) fn in_disallow_conditional_types_context(&self) -> bool {
        self.in_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT)
    }

    #[inline]
    pub(crate) fn in_decorator_context(&self) -> bool {
        self.in_context(NodeFlags::DECORATOR_CONTEXT)
    }

    #[inline]
    pub(crate) fn in_await_context(&self) -> bool {
        self.in_context(NodeFlags::AWAIT_CONTEXT)
    }

    #[inline]
    pub(crate) fn in_ambient_context(&self) -> bool {
        self.in_context(NodeFlags::AMBIENT)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Report an error unless one already starts at `start`. Marks the next
    /// finished node as erroneous either way. Returns whether it was kept.
    pub(crate) fn parse_error_at_position(
        &mut self,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> bool {
        self.parse_error_before_next_finished_node = true;
        if !self.diagnostic_starts.insert(start) {
            return false;
        }
        self.diagnostics.add(Diagnostic::with_location(
            self.file_name.as_str(),
            TextSpan::new(start, length),
            message,
            args,
        ));
        true
    }

    pub(crate) fn parse_error_at(&mut self, start: u32, end: u32, message: &DiagnosticMessage, args: &[&str]) -> bool {
        self.parse_error_at_position(start, end.saturating_sub(start), message, args)
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &DiagnosticMessage, args: &[&str]) -> bool {
        let (start, end) = (self.token_start(), self.token_end());
        self.parse_error_at(start, end, message, args)
    }

    /// Report over a node's text, trivia excluded.
    pub(crate) fn parse_error_at_range(&mut self, node: NodeId, message: &DiagnosticMessage, args: &[&str]) -> bool {
        let range = self.arena.range(node);
        let start = rsparse_ast::source_file::skip_trivia(self.text, range.pos as usize).min(range.end as usize) as u32;
        self.parse_error_at(start, range.end, message, args)
    }

    /// Append a diagnostic produced elsewhere, keeping starts unique.
    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if self.diagnostic_starts.insert(diagnostic.start()) {
            self.diagnostics.add(diagnostic);
        }
    }

    /// Drop diagnostics past `len`, forgetting their starts.
    pub(crate) fn truncate_diagnostics(&mut self, len: usize) {
        if self.diagnostics.len() > len {
            for removed in self.diagnostics.split_off(len) {
                self.diagnostic_starts.remove(&removed.start());
            }
        }
    }

    // ========================================================================
    // Expected tokens
    // ========================================================================

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind, message: Option<&DiagnosticMessage>) -> bool {
        self.parse_expected_with(kind, message, true)
    }

    pub(crate) fn parse_expected_with(
        &mut self,
        kind: SyntaxKind,
        message: Option<&DiagnosticMessage>,
        should_advance: bool,
    ) -> bool {
        if self.current_token() == kind {
            if should_advance {
                self.next_token();
            }
            return true;
        }
        match message {
            Some(message) => self.parse_error_at_current_token(message, &[]),
            None => self.parse_error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(kind)]),
        };
        false
    }

    /// Expect a closing bracket, pointing back at the opening one when it
    /// is missing.
    pub(crate) fn parse_expected_matching_brackets(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
        open_parsed: bool,
        open_position: u32,
    ) {
        if self.current_token() == close {
            self.next_token();
            return;
        }
        let reported = self.parse_error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(close)]);
        if !open_parsed || !reported {
            return;
        }
        let related = Diagnostic::with_location(
            self.file_name.as_str(),
            TextSpan::new(open_position, 1),
            &messages::THE_PARSER_EXPECTED_TO_FIND_A_0_TO_MATCH_THE_1_TOKEN_HERE,
            &[token_to_string(close), token_to_string(open)],
        );
        if let Some(last) = self.diagnostics.last_mut() {
            last.related_information.push(related);
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_optional_token(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        (self.current_token() == kind).then(|| self.parse_token_node())
    }

    pub(crate) fn parse_expected_token(&mut self, kind: SyntaxKind, message: Option<&DiagnosticMessage>) -> NodeId {
        if let Some(token) = self.parse_optional_token(kind) {
            return token;
        }
        match message {
            Some(message) => self.create_missing_node(kind, false, Some(message), &[]),
            None => self.create_missing_node(kind, false, Some(&messages::_0_EXPECTED), &[token_to_string(kind)]),
        }
    }

    pub(crate) fn parse_token_node(&mut self) -> NodeId {
        let pos = self.node_pos();
        let kind = self.current_token();
        self.next_token();
        self.finish_node(kind, pos, NodePayload::Token)
    }

    // ========================================================================
    // Automatic semicolon insertion
    // ========================================================================

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        if self.current_token() == SyntaxKind::SemicolonToken {
            return true;
        }
        matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn try_parse_semicolon(&mut self) -> bool {
        if !self.can_parse_semicolon() {
            return false;
        }
        if self.current_token() == SyntaxKind::SemicolonToken {
            self.next_token();
        }
        true
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        self.try_parse_semicolon() || self.parse_expected(SyntaxKind::SemicolonToken, None)
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    pub(crate) fn create_node_list(&mut self, nodes: Vec<NodeId>, pos: u32, end: Option<u32>) -> ListId {
        let end = end.unwrap_or_else(|| self.node_pos());
        self.arena.alloc_list(NodeListData::new(nodes, pos, end))
    }

    /// Finish a node ending where the current token's trivia begins.
    #[inline]
    pub(crate) fn finish_node(&mut self, kind: SyntaxKind, pos: u32, payload: NodePayload) -> NodeId {
        let end = self.node_pos();
        self.finish_node_at(kind, pos, end, payload, NodeFlags::NONE)
    }

    #[inline]
    pub(crate) fn finish_node_with_flags(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        payload: NodePayload,
        flags: NodeFlags,
    ) -> NodeId {
        let end = self.node_pos();
        self.finish_node_at(kind, pos, end, payload, flags)
    }

    /// Allocate a node: stamp the context flags, take the pending error
    /// marker, and fold in what its children carry.
    pub(crate) fn finish_node_at(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        payload: NodePayload,
        flags: NodeFlags,
    ) -> NodeId {
        debug_assert!(pos <= end, "{kind:?} finished with pos {pos} > end {end}");
        let mut data = NodeData::new(kind, pos, end);
        data.flags = flags | self.context_flags;
        if self.parse_error_before_next_finished_node {
            self.parse_error_before_next_finished_node = false;
            data.flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        let id = self.arena.alloc(data, payload);
        self.aggregate_child_data(id);
        id
    }

    fn aggregate_child_data(&mut self, id: NodeId) {
        let arena = &self.arena;
        let node = arena.get(id);
        let blocks_await = matches!(
            node.payload,
            NodePayload::FunctionLike { .. } | NodePayload::ClassStaticBlock { .. }
        );
        let mut aggregated = NodeFlags::NONE;
        for_each_child_node::<()>(arena, id, |child| {
            let child_flags = arena.data(child).flags;
            if child_flags.intersects(NodeFlags::THIS_NODE_HAS_ERROR | NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR)
            {
                aggregated |= NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR;
            }
            if !blocks_await {
                aggregated |= child_flags & NodeFlags::CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT;
            }
            None
        });
        let modifier_flags = arena
            .list_nodes(node.modifiers())
            .iter()
            .fold(ModifierFlags::NONE, |acc, &m| {
                acc | ModifierFlags::from_modifier_kind(arena.kind(m))
            });
        let data = self.arena.data_mut(id);
        data.flags |= aggregated;
        data.modifier_flags = modifier_flags;
    }

    /// A zero-width placeholder for a required child that is not there.
    pub(crate) fn create_missing_node(
        &mut self,
        kind: SyntaxKind,
        report_at_current_position: bool,
        message: Option<&DiagnosticMessage>,
        args: &[&str],
    ) -> NodeId {
        if let Some(message) = message {
            if report_at_current_position {
                self.parse_error_at_position(self.node_pos(), 0, message, args);
            } else {
                self.parse_error_at_current_token(message, args);
            }
        }
        let pos = self.node_pos();
        let payload = match kind {
            SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier => NodePayload::Identifier {
                text: self.interner.intern(""),
                original_keyword_kind: None,
            },
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::TemplateMiddle
            | SyntaxKind::TemplateTail => NodePayload::Literal {
                text: self.interner.intern(""),
                token_flags: TokenFlags::NONE,
            },
            SyntaxKind::MissingDeclaration => NodePayload::MissingDeclaration { modifiers: None },
            _ => NodePayload::Token,
        };
        self.finish_node_at(kind, pos, pos, payload, NodeFlags::NONE)
    }

    #[inline]
    pub(crate) fn intern(&self, text: &str) -> InternedString {
        self.interner.intern(text)
    }

    /// Whether `node` is a zero-width placeholder.
    pub(crate) fn node_is_missing(&self, node: NodeId) -> bool {
        let data = self.arena.data(node);
        data.pos() == data.end() && data.kind != SyntaxKind::EndOfFileToken
    }

    // ========================================================================
    // Nesting limit
    // ========================================================================

    /// Run a recursive production, or return a missing `kind` node once the
    /// nesting limit is reached. The production runs with at least the red
    /// zone of stack available, growing the stack when needed.
    pub(crate) fn with_nesting_guard(&mut self, kind: SyntaxKind, f: impl FnOnce(&mut Self) -> NodeId) -> NodeId {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            if !self.nesting_error_reported {
                self.nesting_error_reported = true;
                self.parse_error_at_current_token(&messages::EXPRESSION_OR_TYPE_NESTING_IS_TOO_DEEP, &[]);
            }
            return self.create_missing_node(kind, false, None, &[]);
        }
        self.nesting_depth += 1;
        let node = ensure_sufficient_stack(|| f(self));
        self.nesting_depth -= 1;
        node
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Whether the current token can be an identifier in this context.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.current_token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::YieldKeyword if self.in_yield_context() => false,
            SyntaxKind::AwaitKeyword if self.in_await_context() => false,
            token => token > SyntaxKind::LAST_RESERVED_WORD && token.is_keyword(),
        }
    }

    /// `let await` and `let yield` are left for later checks to reject.
    pub(crate) fn is_binding_identifier(&self) -> bool {
        let token = self.current_token();
        token == SyntaxKind::Identifier || (token > SyntaxKind::LAST_RESERVED_WORD && token.is_keyword())
    }

    pub(crate) fn create_identifier(
        &mut self,
        is_identifier: bool,
        message: Option<&DiagnosticMessage>,
        private_identifier_message: Option<&DiagnosticMessage>,
    ) -> NodeId {
        if is_identifier {
            let pos = self.node_pos();
            let token = self.current_token();
            let original_keyword_kind = (token != SyntaxKind::Identifier).then_some(token);
            let text = self.intern(self.scanner.token_value());
            self.next_token_without_check();
            let flags = if original_keyword_kind == Some(SyntaxKind::AwaitKeyword) {
                NodeFlags::CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT
            } else {
                NodeFlags::NONE
            };
            return self.finish_node_with_flags(
                SyntaxKind::Identifier,
                pos,
                NodePayload::Identifier {
                    text,
                    original_keyword_kind,
                },
                flags,
            );
        }

        if self.current_token() == SyntaxKind::PrivateIdentifier {
            let message = private_identifier_message.unwrap_or(&messages::PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_OUTSIDE_CLASS_BODIES);
            self.parse_error_at_current_token(message, &[]);
            return self.create_identifier(true, None, None);
        }

        if let Some(message) = message {
            return self.create_missing_node(SyntaxKind::Identifier, false, Some(message), &[]);
        }

        // At EOF the error goes at the end of the text rather than over the
        // previous token.
        let report_at_current_position = self.current_token() == SyntaxKind::EndOfFileToken;
        if self.scanner.is_reserved_word() {
            let text = self.token_text();
            return self.create_missing_node(
                SyntaxKind::Identifier,
                report_at_current_position,
                Some(&messages::IDENTIFIER_EXPECTED_0_IS_A_RESERVED_WORD_THAT_CANNOT_BE_USED_HERE),
                &[text],
            );
        }
        self.create_missing_node(
            SyntaxKind::Identifier,
            report_at_current_position,
            Some(&messages::IDENTIFIER_EXPECTED),
            &[],
        )
    }

    pub(crate) fn parse_identifier(&mut self, message: Option<&DiagnosticMessage>) -> NodeId {
        let is_identifier = self.is_identifier();
        self.create_identifier(is_identifier, message, None)
    }

    pub(crate) fn parse_binding_identifier(&mut self, private_identifier_message: Option<&DiagnosticMessage>) -> NodeId {
        let is_identifier = self.is_binding_identifier();
        self.create_identifier(is_identifier, None, private_identifier_message)
    }

    pub(crate) fn parse_identifier_name(&mut self, message: Option<&DiagnosticMessage>) -> NodeId {
        let is_identifier = self.current_token().is_identifier_or_keyword();
        self.create_identifier(is_identifier, message, None)
    }

    pub(crate) fn parse_identifier_name_error_on_unicode_escape_sequence(&mut self) -> NodeId {
        if self.scanner.has_unicode_escape() || self.scanner.has_extended_unicode_escape() {
            self.parse_error_at_current_token(&messages::UNICODE_ESCAPE_SEQUENCE_CANNOT_APPEAR_HERE, &[]);
        }
        let is_identifier = self.current_token().is_identifier_or_keyword();
        self.create_identifier(is_identifier, None, None)
    }

    /// Text of an identifier or literal node.
    pub(crate) fn node_text_value(&self, node: NodeId) -> &str {
        match &self.arena.get(node).payload {
            NodePayload::Identifier { text, .. } | NodePayload::Literal { text, .. } => self.interner.resolve(*text),
            _ => "",
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub(crate) fn parse_literal_node(&mut self) -> NodeId {
        let kind = self.current_token();
        self.parse_literal_like_node(kind)
    }

    pub(crate) fn parse_literal_like_node(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let text = self.intern(self.scanner.token_value());
        let token_flags = self.scanner.token_flags()
            & (TokenFlags::NUMERIC_LITERAL_FLAGS | TokenFlags::STRING_LITERAL_FLAGS | TokenFlags::TEMPLATE_LITERAL_LIKE_FLAGS);
        self.next_token();
        self.finish_node(kind, pos, NodePayload::Literal { text, token_flags })
    }
}

/// The source text of a token kind, for "'x' expected" messages.
pub(crate) fn token_to_string(kind: SyntaxKind) -> &'static str {
    kind.token_text().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(text: &str) -> Parser<'_> {
        let mut parser = Parser::new("test.ts", text, ParseOptions::default());
        parser.next_token();
        parser
    }

    #[test]
    fn test_context_helpers_restore_only_changed_bits() {
        let mut p = parser("x");
        p.context_flags |= NodeFlags::YIELD_CONTEXT;
        p.do_inside_of_context(NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT, |p| {
            assert!(p.in_yield_context());
            assert!(p.in_await_context());
        });
        assert!(p.in_yield_context());
        assert!(!p.in_await_context());

        p.do_outside_of_yield_and_await_context(|p| assert!(!p.in_yield_context()));
        assert!(p.in_yield_context());

        p.do_inside_of_context(NodeFlags::AMBIENT, |p| assert!(p.in_ambient_context()));
        assert!(!p.in_ambient_context());
    }

    #[test]
    fn test_errors_at_same_start_are_dropped() {
        let mut p = parser("x");
        assert!(p.parse_error_at_position(3, 1, &messages::UNEXPECTED_TOKEN, &[]));
        assert!(!p.parse_error_at_position(3, 2, &messages::EXPRESSION_EXPECTED, &[]));
        assert!(p.parse_error_at_position(5, 1, &messages::UNEXPECTED_TOKEN, &[]));
        assert!(!p.parse_error_at_position(3, 1, &messages::UNEXPECTED_TOKEN, &[]));
        assert_eq!(p.diagnostics.len(), 2);

        p.truncate_diagnostics(1);
        assert!(p.parse_error_at_position(5, 1, &messages::UNEXPECTED_TOKEN, &[]));
    }

    #[test]
    fn test_pending_error_marks_next_node() {
        let mut p = parser("a b");
        p.parse_error_at_current_token(&messages::UNEXPECTED_TOKEN, &[]);
        let first = p.parse_identifier(None);
        let second = p.parse_identifier(None);
        assert!(p.arena.data(first).has_error());
        assert!(!p.arena.data(second).has_error());
    }

    #[test]
    fn test_missing_identifier_is_zero_width() {
        let mut p = parser("   ");
        let id = p.parse_identifier(None);
        assert!(p.node_is_missing(id));
        assert_eq!(p.node_text_value(id), "");
        assert_eq!(p.diagnostics.diagnostics()[0].start(), 3);
    }

    #[test]
    fn test_keyword_identifier_keeps_original_kind() {
        let mut p = parser("type");
        let id = p.parse_identifier(None);
        match p.arena.get(id).payload {
            NodePayload::Identifier {
                original_keyword_kind, ..
            } => assert_eq!(original_keyword_kind, Some(SyntaxKind::TypeKeyword)),
            ref other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_nesting_guard_reports_once() {
        let mut p = parser("x");
        p.nesting_depth = MAX_NESTING_DEPTH;
        let a = p.with_nesting_guard(SyntaxKind::Identifier, |p| p.parse_identifier(None));
        let b = p.with_nesting_guard(SyntaxKind::Identifier, |p| p.parse_identifier(None));
        assert!(p.node_is_missing(a));
        assert!(p.node_is_missing(b));
        assert_eq!(p.diagnostics.len(), 1);
        assert_eq!(p.diagnostics.diagnostics()[0].code, 1999);
    }
}
