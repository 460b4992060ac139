//! Statements, blocks, variable declarations and binding patterns.

use crate::grammar::SignatureFlags;
use crate::list::ParsingContext;
use crate::parser::{token_to_string, Parser};
use crate::utilities::{keyword_space_suggestion, keyword_spelling_suggestion};
use rsparse_ast::source_file::skip_trivia;
use rsparse_ast::{ListId, NodeFlags, NodeId, NodePayload, SyntaxKind};
use rsparse_diagnostics::{messages, DiagnosticMessage};
use rsparse_scanner::char_codes::is_identifier_text;

impl<'a> Parser<'a> {
    // ========================================================================
    // Statement dispatch
    // ========================================================================

    pub(crate) fn is_start_of_statement(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::AtToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::DebuggerKeyword
            // Not statement starts, but parsed as a `try` to recover.
            | SyntaxKind::CatchKeyword
            | SyntaxKind::FinallyKeyword => true,
            SyntaxKind::ImportKeyword => {
                self.is_start_of_declaration()
                    || self.look_ahead(|p| {
                        matches!(
                            p.next_token(),
                            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::DotToken
                        )
                    })
            }
            SyntaxKind::ConstKeyword | SyntaxKind::ExportKeyword => self.is_start_of_declaration(),
            SyntaxKind::AsyncKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::GlobalKeyword => true,
            SyntaxKind::AccessorKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::ReadonlyKeyword => {
                self.is_start_of_declaration()
                    || !self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line)
            }
            _ => self.is_start_of_expression(),
        }
    }

    pub(crate) fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(Self::is_declaration)
    }

    /// Skips leading modifiers and decides whether a declaration follows.
    /// Only called inside a lookahead.
    fn is_declaration(&mut self) -> bool {
        loop {
            match self.current_token() {
                SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::EnumKeyword => return true,
                SyntaxKind::UsingKeyword => return self.is_using_declaration(),
                SyntaxKind::AwaitKeyword => return self.is_await_using_declaration(),
                SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                    return self.next_token_is_identifier_on_same_line()
                }
                SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                    return self.next_token_is_identifier_or_string_literal_on_same_line()
                }
                SyntaxKind::AbstractKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword => {
                    let previous = self.current_token();
                    self.next_token();
                    // ASI applies after these when a line break follows.
                    if self.has_preceding_line_break() {
                        return false;
                    }
                    if previous == SyntaxKind::DeclareKeyword && self.current_token() == SyntaxKind::TypeKeyword {
                        return true;
                    }
                }
                SyntaxKind::GlobalKeyword => {
                    self.next_token();
                    return matches!(
                        self.current_token(),
                        SyntaxKind::OpenBraceToken | SyntaxKind::Identifier | SyntaxKind::ExportKeyword
                    );
                }
                SyntaxKind::ImportKeyword => {
                    self.next_token();
                    let token = self.current_token();
                    return matches!(
                        token,
                        SyntaxKind::StringLiteral | SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                    ) || token.is_identifier_or_keyword();
                }
                SyntaxKind::ExportKeyword => {
                    let mut token = self.next_token();
                    if token == SyntaxKind::TypeKeyword {
                        token = self.look_ahead(|p| p.next_token());
                    }
                    if matches!(
                        token,
                        SyntaxKind::EqualsToken
                            | SyntaxKind::AsteriskToken
                            | SyntaxKind::OpenBraceToken
                            | SyntaxKind::DefaultKeyword
                            | SyntaxKind::AsKeyword
                            | SyntaxKind::AtToken
                    ) {
                        return true;
                    }
                }
                SyntaxKind::StaticKeyword => {
                    self.next_token();
                }
                _ => return false,
            }
        }
    }

    fn next_token_is_identifier_or_string_literal_on_same_line(&mut self) -> bool {
        self.next_token();
        !self.has_preceding_line_break()
            && (self.is_identifier() || self.current_token() == SyntaxKind::StringLiteral)
    }

    fn next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(&mut self, disallow_of: bool) -> bool {
        self.next_token();
        if disallow_of && self.current_token() == SyntaxKind::OfKeyword {
            return false;
        }
        (self.is_binding_identifier() || self.current_token() == SyntaxKind::OpenBraceToken)
            && !self.has_preceding_line_break()
    }

    fn next_token_is_using_keyword_then_binding_identifier_on_same_line(&mut self, disallow_of: bool) -> bool {
        self.next_token() == SyntaxKind::UsingKeyword
            && self.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(disallow_of)
    }

    fn is_using_declaration(&mut self) -> bool {
        self.look_ahead(|p| p.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(false))
    }

    pub(crate) fn is_await_using_declaration(&mut self) -> bool {
        self.look_ahead(|p| p.next_token_is_using_keyword_then_binding_identifier_on_same_line(false))
    }

    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_binding_identifier()
                || matches!(p.current_token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken)
        })
    }

    pub(crate) fn parse_statement(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::EmptyStatement, Self::parse_statement_worker)
    }

    fn parse_statement_worker(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::SemicolonToken => return self.parse_empty_statement(),
            SyntaxKind::OpenBraceToken => return self.parse_block(false, None),
            SyntaxKind::VarKeyword => return self.parse_variable_statement_here(None),
            SyntaxKind::LetKeyword if self.is_let_declaration() => return self.parse_variable_statement_here(None),
            SyntaxKind::AwaitKeyword if self.is_await_using_declaration() => {
                return self.parse_variable_statement_here(None)
            }
            SyntaxKind::UsingKeyword if self.is_using_declaration() => return self.parse_variable_statement_here(None),
            SyntaxKind::FunctionKeyword => {
                let (pos, has_jsdoc) = (self.node_pos(), self.has_preceding_jsdoc_comment());
                return self.parse_function_declaration(pos, has_jsdoc, None);
            }
            SyntaxKind::ClassKeyword => {
                let (pos, has_jsdoc) = (self.node_pos(), self.has_preceding_jsdoc_comment());
                return self.parse_class_declaration(pos, has_jsdoc, None);
            }
            SyntaxKind::IfKeyword => return self.parse_if_statement(),
            SyntaxKind::DoKeyword => return self.parse_do_statement(),
            SyntaxKind::WhileKeyword => return self.parse_while_statement(),
            SyntaxKind::ForKeyword => return self.parse_for_or_for_in_or_for_of_statement(),
            SyntaxKind::ContinueKeyword => return self.parse_break_or_continue_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::BreakKeyword => return self.parse_break_or_continue_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ReturnKeyword => return self.parse_return_statement(),
            SyntaxKind::WithKeyword => return self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => return self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => return self.parse_throw_statement(),
            SyntaxKind::TryKeyword | SyntaxKind::CatchKeyword | SyntaxKind::FinallyKeyword => {
                return self.parse_try_statement()
            }
            SyntaxKind::DebuggerKeyword => return self.parse_debugger_statement(),
            SyntaxKind::AtToken => return self.parse_declaration(),
            SyntaxKind::AsyncKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::AccessorKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::GlobalKeyword
                if self.is_start_of_declaration() =>
            {
                return self.parse_declaration()
            }
            _ => {}
        }
        self.parse_expression_or_labeled_statement()
    }

    fn parse_variable_statement_here(&mut self, modifiers: Option<ListId>) -> NodeId {
        let (pos, has_jsdoc) = (self.node_pos(), self.has_preceding_jsdoc_comment());
        self.parse_variable_statement(pos, has_jsdoc, modifiers)
    }

    fn parse_declaration(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers(true, false, false);
        let is_ambient = self
            .arena
            .list_nodes(modifiers)
            .iter()
            .any(|&m| self.arena.kind(m) == SyntaxKind::DeclareKeyword);

        // Inside `declare namespace` or a `.d.ts` file the modifiers already
        // carry the ambient flag.
        if is_ambient && !self.in_ambient_context() {
            for &modifier in &self.arena.list_nodes(modifiers).to_vec() {
                self.arena.data_mut(modifier).flags |= NodeFlags::AMBIENT;
            }
            self.do_inside_of_context(NodeFlags::AMBIENT, |p| p.parse_declaration_worker(pos, has_jsdoc, modifiers))
        } else {
            self.parse_declaration_worker(pos, has_jsdoc, modifiers)
        }
    }

    fn parse_declaration_worker(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        match self.current_token() {
            SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::UsingKeyword
            | SyntaxKind::AwaitKeyword => self.parse_variable_statement(pos, has_jsdoc, modifiers),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, has_jsdoc, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, has_jsdoc, modifiers),
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(pos, has_jsdoc, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(pos, has_jsdoc, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(pos, has_jsdoc, modifiers),
            SyntaxKind::GlobalKeyword | SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                self.parse_module_declaration(pos, has_jsdoc, modifiers)
            }
            SyntaxKind::ImportKeyword => {
                self.parse_import_declaration_or_import_equals_declaration(pos, has_jsdoc, modifiers)
            }
            SyntaxKind::ExportKeyword => {
                self.next_token();
                match self.current_token() {
                    SyntaxKind::DefaultKeyword | SyntaxKind::EqualsToken => {
                        self.parse_export_assignment(pos, has_jsdoc, modifiers)
                    }
                    SyntaxKind::AsKeyword => self.parse_namespace_export_declaration(pos, has_jsdoc, modifiers),
                    _ => self.parse_export_declaration(pos, has_jsdoc, modifiers),
                }
            }
            _ => {
                // Modifiers or decorators with nothing to apply to.
                self.parse_error_at_position(self.node_pos(), 0, &messages::DECLARATION_EXPECTED, &[]);
                let end = self.node_pos();
                self.finish_node_at(
                    SyntaxKind::MissingDeclaration,
                    pos,
                    end,
                    NodePayload::MissingDeclaration { modifiers },
                    NodeFlags::NONE,
                )
            }
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    pub(crate) fn parse_block(
        &mut self,
        ignore_missing_open_brace: bool,
        message: Option<&DiagnosticMessage>,
    ) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let open_brace_position = self.token_start();
        let open_brace_parsed = self.parse_expected(SyntaxKind::OpenBraceToken, message);

        if open_brace_parsed || ignore_missing_open_brace {
            let multi_line = self.has_preceding_line_break();
            let statements = self.parse_list(ParsingContext::BlockStatements, Self::parse_statement);
            self.parse_expected_matching_brackets(
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                open_brace_parsed,
                open_brace_position,
            );
            let block = self.finish_node(SyntaxKind::Block, pos, NodePayload::Block { statements, multi_line });
            let block = self.with_jsdoc(block, has_jsdoc);
            if self.current_token() == SyntaxKind::EqualsToken {
                self.parse_error_at_current_token(
                    &messages::DECLARATION_OR_STATEMENT_EXPECTED_THIS_FOLLOWS_A_BLOCK_OF_STATEMENTS,
                    &[],
                );
                self.next_token();
            }
            return block;
        }

        let statements = self.create_missing_list();
        let block = self.finish_node(
            SyntaxKind::Block,
            pos,
            NodePayload::Block {
                statements,
                multi_line: false,
            },
        );
        self.with_jsdoc(block, has_jsdoc)
    }

    /// A function body, parsed in the yield and await context of its
    /// signature.
    pub(crate) fn parse_function_block(&mut self, flags: SignatureFlags, message: Option<&DiagnosticMessage>) -> NodeId {
        let saved = self.context_flags;
        self.context_flags.set(NodeFlags::YIELD_CONTEXT, flags.contains(SignatureFlags::YIELD));
        self.context_flags.set(NodeFlags::AWAIT_CONTEXT, flags.contains(SignatureFlags::AWAIT));
        // Decorators inside the body are not part of the outer decorator.
        self.context_flags.remove(NodeFlags::DECORATOR_CONTEXT);

        let block = self.parse_block(flags.contains(SignatureFlags::IGNORE_MISSING_OPEN_BRACE), message);

        self.context_flags = saved;
        block
    }

    /// A body, or the `;` ending a signature without one.
    pub(crate) fn parse_function_block_or_semicolon(
        &mut self,
        flags: SignatureFlags,
        message: Option<&DiagnosticMessage>,
    ) -> Option<NodeId> {
        if self.current_token() != SyntaxKind::OpenBraceToken {
            if flags.contains(SignatureFlags::TYPE) {
                self.parse_type_member_semicolon();
                return None;
            }
            if self.can_parse_semicolon() {
                self.parse_semicolon();
                return None;
            }
        }
        Some(self.parse_function_block(flags, message))
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn parse_empty_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::SemicolonToken, None);
        let node = self.finish_node(SyntaxKind::EmptyStatement, pos, NodePayload::Token);
        self.with_jsdoc(node, has_jsdoc)
    }

    /// `(expression)` after `if`, `while` and `with`, pointing at the `(`
    /// when the `)` is missing.
    fn parse_parenthesized_condition(&mut self) -> NodeId {
        let open_paren_position = self.token_start();
        let open_paren_parsed = self.parse_expected(SyntaxKind::OpenParenToken, None);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected_matching_brackets(
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            open_paren_parsed,
            open_paren_position,
        );
        expression
    }

    fn parse_if_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::IfKeyword, None);
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = self
            .parse_optional(SyntaxKind::ElseKeyword)
            .then(|| self.parse_statement());
        let node = self.finish_node(
            SyntaxKind::IfStatement,
            pos,
            NodePayload::If {
                expression,
                then_statement,
                else_statement,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_do_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::DoKeyword, None);
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword, None);
        let expression = self.parse_parenthesized_condition();

        // `do;while(0)x` is accepted: the `;` after the condition is
        // optional even without a line break.
        self.parse_optional(SyntaxKind::SemicolonToken);
        let node = self.finish_node(SyntaxKind::DoStatement, pos, NodePayload::Do { statement, expression });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_while_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::WhileKeyword, None);
        let expression = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        let node = self.finish_node(SyntaxKind::WhileStatement, pos, NodePayload::WhileLike { expression, statement });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_for_or_for_in_or_for_of_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::ForKeyword, None);
        let await_token = self.parse_optional_token(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken, None);

        let mut initializer = None;
        if self.current_token() != SyntaxKind::SemicolonToken {
            let token = self.current_token();
            let is_declaration_list = matches!(
                token,
                SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword
            ) || (token == SyntaxKind::UsingKeyword
                && self.look_ahead(|p| p.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(true)))
                || (token == SyntaxKind::AwaitKeyword
                    && self.look_ahead(|p| p.next_token_is_using_keyword_then_binding_identifier_on_same_line(true)));
            initializer = Some(if is_declaration_list {
                self.parse_variable_declaration_list(true)
            } else {
                self.disallow_in_and(Self::parse_expression)
            });
        }

        let is_for_of = if await_token.is_some() {
            self.parse_expected(SyntaxKind::OfKeyword, None)
        } else {
            self.parse_optional(SyntaxKind::OfKeyword)
        };

        let (kind, payload) = if is_for_of || (await_token.is_none() && self.parse_optional(SyntaxKind::InKeyword)) {
            let expression = if is_for_of {
                self.allow_in_and(|p| p.parse_assignment_expression_or_higher(true))
            } else {
                self.allow_in_and(Self::parse_expression)
            };
            self.parse_expected(SyntaxKind::CloseParenToken, None);
            let statement = self.parse_statement();
            let initializer = match initializer {
                Some(initializer) => initializer,
                None => self.create_missing_node(SyntaxKind::Identifier, true, None, &[]),
            };
            let kind = if is_for_of {
                SyntaxKind::ForOfStatement
            } else {
                SyntaxKind::ForInStatement
            };
            (
                kind,
                NodePayload::ForInOf {
                    await_modifier: await_token,
                    initializer,
                    expression,
                    statement,
                },
            )
        } else {
            self.parse_expected(SyntaxKind::SemicolonToken, None);
            let condition = (!matches!(
                self.current_token(),
                SyntaxKind::SemicolonToken | SyntaxKind::CloseParenToken
            ))
            .then(|| self.allow_in_and(Self::parse_expression));
            self.parse_expected(SyntaxKind::SemicolonToken, None);
            let incrementor =
                (self.current_token() != SyntaxKind::CloseParenToken).then(|| self.allow_in_and(Self::parse_expression));
            self.parse_expected(SyntaxKind::CloseParenToken, None);
            let statement = self.parse_statement();
            (
                SyntaxKind::ForStatement,
                NodePayload::For {
                    initializer,
                    condition,
                    incrementor,
                    statement,
                },
            )
        };

        let node = self.finish_node(kind, pos, payload);
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_break_or_continue_statement(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let keyword = if kind == SyntaxKind::BreakStatement {
            SyntaxKind::BreakKeyword
        } else {
            SyntaxKind::ContinueKeyword
        };
        self.parse_expected(keyword, None);
        let label = (!self.can_parse_semicolon()).then(|| self.parse_identifier(None));
        self.parse_semicolon();
        let node = self.finish_node(kind, pos, NodePayload::Jump { label });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_return_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::ReturnKeyword, None);
        let expression = (!self.can_parse_semicolon()).then(|| self.allow_in_and(Self::parse_expression));
        self.parse_semicolon();
        let node = self.finish_node(SyntaxKind::ReturnStatement, pos, NodePayload::Return { expression });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_with_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::WithKeyword, None);
        let expression = self.parse_parenthesized_condition();
        let statement = self.do_inside_of_context(NodeFlags::IN_WITH_STATEMENT, Self::parse_statement);
        let node = self.finish_node(SyntaxKind::WithStatement, pos, NodePayload::WhileLike { expression, statement });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_case_or_default_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let (kind, expression) = if self.current_token() == SyntaxKind::CaseKeyword {
            self.next_token();
            (SyntaxKind::CaseClause, Some(self.allow_in_and(Self::parse_expression)))
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword, None);
            (SyntaxKind::DefaultClause, None)
        };
        self.parse_expected(SyntaxKind::ColonToken, None);
        let statements = self.parse_list(ParsingContext::SwitchClauseStatements, Self::parse_statement);
        let node = self.finish_node(kind, pos, NodePayload::CaseOrDefaultClause { expression, statements });
        if kind == SyntaxKind::CaseClause {
            self.with_jsdoc(node, has_jsdoc)
        } else {
            node
        }
    }

    fn parse_case_block(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken, None);
        let statements = self.parse_list(ParsingContext::SwitchClauses, Self::parse_case_or_default_clause);
        self.parse_expected(SyntaxKind::CloseBraceToken, None);
        self.finish_node(
            SyntaxKind::CaseBlock,
            pos,
            NodePayload::Block {
                statements,
                multi_line: false,
            },
        )
    }

    fn parse_switch_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::SwitchKeyword, None);
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        let case_block = self.parse_case_block();
        let node = self.finish_node(SyntaxKind::SwitchStatement, pos, NodePayload::Switch { expression, case_block });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_throw_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::ThrowKeyword, None);

        // A line break after `throw` is an error reported elsewhere; the
        // expression is an empty name so the tree stays complete.
        let expression = if self.has_preceding_line_break() {
            self.create_missing_node(SyntaxKind::Identifier, false, None, &[])
        } else {
            self.allow_in_and(Self::parse_expression)
        };
        if !self.try_parse_semicolon() {
            self.parse_error_for_missing_semicolon_after(expression);
        }
        let node = self.finish_node(SyntaxKind::ThrowStatement, pos, NodePayload::ExpressionWrapper { expression });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_try_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::TryKeyword, None);
        let try_block = self.parse_block(false, None);
        let catch_clause = (self.current_token() == SyntaxKind::CatchKeyword).then(|| self.parse_catch_clause());

        // Without a catch, a finally is required.
        let finally_block = if catch_clause.is_none() || self.current_token() == SyntaxKind::FinallyKeyword {
            self.parse_expected(SyntaxKind::FinallyKeyword, Some(&messages::CATCH_OR_FINALLY_EXPECTED));
            Some(self.parse_block(false, None))
        } else {
            None
        };

        let node = self.finish_node(
            SyntaxKind::TryStatement,
            pos,
            NodePayload::Try {
                try_block,
                catch_clause,
                finally_block,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_catch_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::CatchKeyword, None);
        let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
            let declaration = self.parse_variable_declaration(false);
            self.parse_expected(SyntaxKind::CloseParenToken, None);
            Some(declaration)
        } else {
            // `catch { }` binds nothing.
            None
        };
        let block = self.parse_block(false, None);
        self.finish_node(
            SyntaxKind::CatchClause,
            pos,
            NodePayload::CatchClause {
                variable_declaration,
                block,
            },
        )
    }

    fn parse_debugger_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::DebuggerKeyword, None);
        self.parse_semicolon();
        let node = self.finish_node(SyntaxKind::DebuggerStatement, pos, NodePayload::Token);
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_expression_or_labeled_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut has_jsdoc = self.has_preceding_jsdoc_comment();
        let has_paren = self.current_token() == SyntaxKind::OpenParenToken;
        let expression = self.allow_in_and(Self::parse_expression);

        let node = if self.arena.kind(expression) == SyntaxKind::Identifier && self.parse_optional(SyntaxKind::ColonToken) {
            let statement = self.parse_statement();
            self.finish_node(
                SyntaxKind::LabeledStatement,
                pos,
                NodePayload::Labeled {
                    label: expression,
                    statement,
                },
            )
        } else {
            if !self.try_parse_semicolon() {
                self.parse_error_for_missing_semicolon_after(expression);
            }
            // A JSDoc before `(` belongs to the parenthesized expression.
            if has_paren {
                has_jsdoc = false;
            }
            self.finish_node(SyntaxKind::ExpressionStatement, pos, NodePayload::ExpressionWrapper { expression })
        };
        self.with_jsdoc(node, has_jsdoc)
    }

    // ========================================================================
    // Missing semicolons
    // ========================================================================

    /// Explain a missing `;` after `node`, guessing at what was meant when
    /// it is a lone identifier.
    pub(crate) fn parse_error_for_missing_semicolon_after(&mut self, node: NodeId) {
        // `module "x"` written as a tagged template: module`x`.
        if let NodePayload::TaggedTemplate { template, .. } = self.arena.get(node).payload {
            self.parse_error_at_range(template, &messages::MODULE_DECLARATION_NAMES_MAY_ONLY_USE_OR_QUOTED_STRINGS, &[]);
            return;
        }

        let expression_text = match self.arena.get(node).payload {
            NodePayload::Identifier { text, .. } if self.arena.kind(node) == SyntaxKind::Identifier => {
                Some(self.interner.resolve(text).to_string())
            }
            _ => None,
        };
        let Some(expression_text) = expression_text.filter(|text| is_identifier_text(text)) else {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(SyntaxKind::SemicolonToken)]);
            return;
        };

        let range = self.arena.range(node);
        let pos = skip_trivia(self.text, range.pos as usize).min(range.end as usize) as u32;

        match expression_text.as_str() {
            "const" | "let" | "var" => {
                self.parse_error_at(pos, range.end, &messages::VARIABLE_DECLARATION_NOT_ALLOWED_AT_THIS_LOCATION, &[]);
                return;
            }
            "declare" => return,
            "interface" => {
                self.parse_error_for_invalid_name(
                    &messages::INTERFACE_NAME_CANNOT_BE_0,
                    &messages::INTERFACE_MUST_BE_GIVEN_A_NAME,
                    SyntaxKind::OpenBraceToken,
                );
                return;
            }
            "is" => {
                let end = self.token_start();
                self.parse_error_at(
                    pos,
                    end,
                    &messages::A_TYPE_PREDICATE_IS_ONLY_ALLOWED_IN_RETURN_TYPE_POSITION,
                    &[],
                );
                return;
            }
            "module" | "namespace" => {
                self.parse_error_for_invalid_name(
                    &messages::NAMESPACE_NAME_CANNOT_BE_0,
                    &messages::NAMESPACE_MUST_BE_GIVEN_A_NAME,
                    SyntaxKind::OpenBraceToken,
                );
                return;
            }
            "type" => {
                self.parse_error_for_invalid_name(
                    &messages::TYPE_ALIAS_NAME_CANNOT_BE_0,
                    &messages::TYPE_ALIAS_MUST_BE_GIVEN_A_NAME,
                    SyntaxKind::EqualsToken,
                );
                return;
            }
            _ => {}
        }

        let suggestion = keyword_spelling_suggestion(&expression_text)
            .map(str::to_string)
            .or_else(|| keyword_space_suggestion(&expression_text));
        if let Some(suggestion) = suggestion {
            self.parse_error_at(
                pos,
                range.end,
                &messages::UNKNOWN_KEYWORD_OR_IDENTIFIER_DID_YOU_MEAN_0,
                &[&suggestion],
            );
            return;
        }

        // An unknown token was already reported by the scanner.
        if self.current_token() == SyntaxKind::Unknown {
            return;
        }
        self.parse_error_at(pos, range.end, &messages::UNEXPECTED_KEYWORD_OR_IDENTIFIER, &[]);
    }

    fn parse_error_for_invalid_name(
        &mut self,
        name_message: &DiagnosticMessage,
        blank_message: &DiagnosticMessage,
        token_if_blank_name: SyntaxKind,
    ) {
        if self.current_token() == token_if_blank_name {
            self.parse_error_at_current_token(blank_message, &[]);
        } else {
            let name = self.token_value().to_string();
            self.parse_error_at_current_token(name_message, &[&name]);
        }
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    pub(crate) fn parse_variable_statement(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let declaration_list = self.parse_variable_declaration_list(false);
        self.parse_semicolon();
        let node = self.finish_node(
            SyntaxKind::VariableStatement,
            pos,
            NodePayload::VariableStatement {
                modifiers,
                declaration_list,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_variable_declaration_list(&mut self, in_for_statement_initializer: bool) -> NodeId {
        let pos = self.node_pos();
        let flags = match self.current_token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            SyntaxKind::UsingKeyword => NodeFlags::USING,
            SyntaxKind::AwaitKeyword => {
                debug_assert!(self.is_await_using_declaration());
                self.next_token();
                NodeFlags::AWAIT_USING
            }
            _ => NodeFlags::NONE,
        };
        self.next_token();

        // `for (let of x)` declares nothing: `of` is the keyword here.
        let declarations = if self.current_token() == SyntaxKind::OfKeyword
            && self.look_ahead(|p| p.next_token_is_identifier() && p.next_token() == SyntaxKind::CloseParenToken)
        {
            self.create_missing_list()
        } else {
            let saved = self.context_flags;
            self.context_flags
                .set(NodeFlags::DISALLOW_IN_CONTEXT, in_for_statement_initializer);
            let declarations = self.parse_delimited_list(ParsingContext::VariableDeclarations, |p| {
                p.parse_variable_declaration(!in_for_statement_initializer)
            });
            self.context_flags = saved;
            declarations
        };

        self.finish_node_with_flags(
            SyntaxKind::VariableDeclarationList,
            pos,
            NodePayload::VariableDeclarationList { declarations },
            flags,
        )
    }

    pub(crate) fn parse_variable_declaration(&mut self, allow_exclamation: bool) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let name = self.parse_identifier_or_pattern(Some(
            &messages::PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_IN_VARIABLE_DECLARATIONS,
        ));
        let exclamation_token = if allow_exclamation
            && self.arena.kind(name) == SyntaxKind::Identifier
            && self.current_token() == SyntaxKind::ExclamationToken
            && !self.has_preceding_line_break()
        {
            Some(self.parse_token_node())
        } else {
            None
        };
        let type_annotation = self.parse_type_annotation();
        let initializer = if matches!(self.current_token(), SyntaxKind::InKeyword | SyntaxKind::OfKeyword) {
            None
        } else {
            self.parse_initializer()
        };
        let node = self.finish_node(
            SyntaxKind::VariableDeclaration,
            pos,
            NodePayload::VariableDeclaration {
                name,
                exclamation_token,
                type_annotation,
                initializer,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_initializer(&mut self) -> Option<NodeId> {
        self.parse_optional(SyntaxKind::EqualsToken)
            .then(|| self.parse_assignment_expression_or_higher(true))
    }

    pub(crate) fn parse_type_annotation(&mut self) -> Option<NodeId> {
        self.parse_optional(SyntaxKind::ColonToken).then(|| self.parse_type())
    }

    // ========================================================================
    // Binding patterns
    // ========================================================================

    pub(crate) fn is_binding_identifier_or_private_identifier_or_pattern(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken | SyntaxKind::PrivateIdentifier
        ) || self.is_binding_identifier()
    }

    pub(crate) fn parse_identifier_or_pattern(&mut self, private_identifier_message: Option<&DiagnosticMessage>) -> NodeId {
        match self.current_token() {
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            _ => self.parse_binding_identifier(private_identifier_message),
        }
    }

    fn parse_array_binding_pattern(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::ArrayBindingPattern, |p| {
            let pos = p.node_pos();
            p.parse_expected(SyntaxKind::OpenBracketToken, None);
            let elements = p.allow_in_and(|p| {
                p.parse_delimited_list(ParsingContext::ArrayBindingElements, Self::parse_array_binding_element)
            });
            p.parse_expected(SyntaxKind::CloseBracketToken, None);
            p.finish_node(SyntaxKind::ArrayBindingPattern, pos, NodePayload::BindingPattern { elements })
        })
    }

    fn parse_array_binding_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.current_token() == SyntaxKind::CommaToken {
            return self.finish_node(SyntaxKind::OmittedExpression, pos, NodePayload::Token);
        }
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_or_pattern(None);
        let initializer = self.parse_initializer();
        self.finish_node(
            SyntaxKind::BindingElement,
            pos,
            NodePayload::BindingElement {
                dot_dot_dot_token,
                property_name: None,
                name,
                initializer,
            },
        )
    }

    fn parse_object_binding_pattern(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::ObjectBindingPattern, |p| {
            let pos = p.node_pos();
            p.parse_expected(SyntaxKind::OpenBraceToken, None);
            let elements = p.allow_in_and(|p| {
                p.parse_delimited_list(ParsingContext::ObjectBindingElements, Self::parse_object_binding_element)
            });
            p.parse_expected(SyntaxKind::CloseBraceToken, None);
            p.finish_node(SyntaxKind::ObjectBindingPattern, pos, NodePayload::BindingPattern { elements })
        })
    }

    fn parse_object_binding_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let token_is_identifier = self.is_binding_identifier();
        let property_name = self.parse_property_name();
        let (property_name, name) = if token_is_identifier && self.current_token() != SyntaxKind::ColonToken {
            (None, property_name)
        } else {
            self.parse_expected(SyntaxKind::ColonToken, None);
            (Some(property_name), self.parse_identifier_or_pattern(None))
        };
        let initializer = self.parse_initializer();
        self.finish_node(
            SyntaxKind::BindingElement,
            pos,
            NodePayload::BindingElement {
                dot_dot_dot_token,
                property_name,
                name,
                initializer,
            },
        )
    }
}
