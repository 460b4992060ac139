//! The list engine: parsing contexts, list termination and error recovery,
//! and node reuse from the previous tree.

use crate::parser::{token_to_string, Parser};
use rsparse_ast::{ListId, NodeFlags, NodeId, NodeListData, NodePayload, SyntaxKind};
use rsparse_diagnostics::{messages, DiagnosticMessage};

/// The kind of list being parsed. Each has its own element start,
/// terminator and error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParsingContext {
    SourceElements,
    BlockStatements,
    SwitchClauses,
    SwitchClauseStatements,
    TypeMembers,
    ClassMembers,
    EnumMembers,
    HeritageClauseElement,
    VariableDeclarations,
    ObjectBindingElements,
    ArrayBindingElements,
    ArgumentExpressions,
    ObjectLiteralMembers,
    JsxAttributes,
    JsxChildren,
    ArrayLiteralMembers,
    Parameters,
    JSDocParameters,
    RestProperties,
    TypeParameters,
    TypeArguments,
    TupleElementTypes,
    HeritageClauses,
    ImportOrExportSpecifiers,
    ImportAttributes,
    JSDocComment,
}

impl ParsingContext {
    pub const COUNT: usize = 26;

    pub const ALL: [ParsingContext; Self::COUNT] = [
        ParsingContext::SourceElements,
        ParsingContext::BlockStatements,
        ParsingContext::SwitchClauses,
        ParsingContext::SwitchClauseStatements,
        ParsingContext::TypeMembers,
        ParsingContext::ClassMembers,
        ParsingContext::EnumMembers,
        ParsingContext::HeritageClauseElement,
        ParsingContext::VariableDeclarations,
        ParsingContext::ObjectBindingElements,
        ParsingContext::ArrayBindingElements,
        ParsingContext::ArgumentExpressions,
        ParsingContext::ObjectLiteralMembers,
        ParsingContext::JsxAttributes,
        ParsingContext::JsxChildren,
        ParsingContext::ArrayLiteralMembers,
        ParsingContext::Parameters,
        ParsingContext::JSDocParameters,
        ParsingContext::RestProperties,
        ParsingContext::TypeParameters,
        ParsingContext::TypeArguments,
        ParsingContext::TupleElementTypes,
        ParsingContext::HeritageClauses,
        ParsingContext::ImportOrExportSpecifiers,
        ParsingContext::ImportAttributes,
        ParsingContext::JSDocComment,
    ];

    #[inline]
    fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Lists whose elements may be taken over from a previous tree.
    pub fn is_reusable(self) -> bool {
        matches!(
            self,
            ParsingContext::SourceElements
                | ParsingContext::BlockStatements
                | ParsingContext::SwitchClauses
                | ParsingContext::SwitchClauseStatements
                | ParsingContext::TypeMembers
                | ParsingContext::ClassMembers
                | ParsingContext::EnumMembers
                | ParsingContext::VariableDeclarations
                | ParsingContext::Parameters
                | ParsingContext::JSDocParameters
        )
    }
}

/// The set of lists currently open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsingContexts(u32);

impl ParsingContexts {
    #[inline]
    pub fn contains(self, context: ParsingContext) -> bool {
        self.0 & context.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, context: ParsingContext) {
        self.0 |= context.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = ParsingContext> {
        ParsingContext::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // List elements and terminators
    // ========================================================================

    pub(crate) fn is_list_element(&mut self, context: ParsingContext, in_error_recovery: bool) -> bool {
        if self.current_node(context).is_some() {
            return true;
        }
        let token = self.current_token();
        match context {
            ParsingContext::SourceElements
            | ParsingContext::BlockStatements
            | ParsingContext::SwitchClauseStatements => {
                // A stray `;` during recovery belongs to whatever list is
                // being recovered, not to a statement list.
                !(token == SyntaxKind::SemicolonToken && in_error_recovery) && self.is_start_of_statement()
            }
            ParsingContext::SwitchClauses => {
                matches!(token, SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword)
            }
            ParsingContext::TypeMembers => self.look_ahead(Self::is_type_member_start),
            ParsingContext::ClassMembers => {
                self.look_ahead(Self::is_class_member_start)
                    || (token == SyntaxKind::SemicolonToken && !in_error_recovery)
            }
            ParsingContext::EnumMembers => token == SyntaxKind::OpenBracketToken || self.is_literal_property_name(),
            ParsingContext::ObjectLiteralMembers => match token {
                SyntaxKind::OpenBracketToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::DotDotDotToken
                | SyntaxKind::DotToken => true,
                _ => self.is_literal_property_name(),
            },
            ParsingContext::RestProperties => self.is_literal_property_name(),
            ParsingContext::ObjectBindingElements => {
                matches!(token, SyntaxKind::OpenBracketToken | SyntaxKind::DotDotDotToken)
                    || self.is_literal_property_name()
            }
            ParsingContext::ImportAttributes => self.is_import_attribute_name(),
            ParsingContext::HeritageClauseElement => {
                if token == SyntaxKind::OpenBraceToken {
                    return self.look_ahead(Self::is_valid_heritage_clause_object_literal);
                }
                if !in_error_recovery {
                    self.is_start_of_left_hand_side_expression() && !self.is_heritage_clause_extends_or_implements_keyword()
                } else {
                    // An identifier is the only thing that reliably starts a
                    // heritage element when recovering.
                    self.is_identifier() && !self.is_heritage_clause_extends_or_implements_keyword()
                }
            }
            ParsingContext::VariableDeclarations => self.is_binding_identifier_or_private_identifier_or_pattern(),
            ParsingContext::ArrayBindingElements => {
                matches!(token, SyntaxKind::CommaToken | SyntaxKind::DotDotDotToken)
                    || self.is_binding_identifier_or_private_identifier_or_pattern()
            }
            ParsingContext::TypeParameters => {
                matches!(token, SyntaxKind::InKeyword | SyntaxKind::ConstKeyword) || self.is_identifier()
            }
            ParsingContext::ArrayLiteralMembers => {
                matches!(token, SyntaxKind::CommaToken | SyntaxKind::DotToken)
                    || token == SyntaxKind::DotDotDotToken
                    || self.is_start_of_expression()
            }
            ParsingContext::ArgumentExpressions => token == SyntaxKind::DotDotDotToken || self.is_start_of_expression(),
            ParsingContext::Parameters => self.is_start_of_parameter(false),
            ParsingContext::JSDocParameters => self.is_start_of_parameter(true),
            ParsingContext::TypeArguments | ParsingContext::TupleElementTypes => {
                token == SyntaxKind::CommaToken || self.is_start_of_type(false)
            }
            ParsingContext::HeritageClauses => self.is_heritage_clause(),
            ParsingContext::ImportOrExportSpecifiers => {
                // `from "x"` ends an export clause that lost its `}`.
                if token == SyntaxKind::FromKeyword && self.next_token_is(|p| p.current_token() == SyntaxKind::StringLiteral) {
                    return false;
                }
                token == SyntaxKind::StringLiteral || token.is_identifier_or_keyword()
            }
            ParsingContext::JsxAttributes => token.is_identifier_or_keyword() || token == SyntaxKind::OpenBraceToken,
            ParsingContext::JsxChildren | ParsingContext::JSDocComment => true,
        }
    }

    fn is_valid_heritage_clause_object_literal(&mut self) -> bool {
        debug_assert_eq!(self.current_token(), SyntaxKind::OpenBraceToken);
        if self.next_token() == SyntaxKind::CloseBraceToken {
            // `extends {}` followed by a body or another clause is an empty
            // object literal, not the class body.
            let next = self.next_token();
            return matches!(
                next,
                SyntaxKind::CommaToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::ExtendsKeyword
                    | SyntaxKind::ImplementsKeyword
            );
        }
        true
    }

    pub(crate) fn is_list_terminator(&mut self, context: ParsingContext) -> bool {
        let token = self.current_token();
        if token == SyntaxKind::EndOfFileToken {
            return true;
        }
        match context {
            ParsingContext::BlockStatements
            | ParsingContext::SwitchClauses
            | ParsingContext::TypeMembers
            | ParsingContext::ClassMembers
            | ParsingContext::EnumMembers
            | ParsingContext::ObjectLiteralMembers
            | ParsingContext::ObjectBindingElements
            | ParsingContext::ImportOrExportSpecifiers
            | ParsingContext::ImportAttributes => token == SyntaxKind::CloseBraceToken,
            ParsingContext::SwitchClauseStatements => matches!(
                token,
                SyntaxKind::CloseBraceToken | SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
            ),
            ParsingContext::HeritageClauseElement => matches!(
                token,
                SyntaxKind::OpenBraceToken | SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
            ),
            ParsingContext::VariableDeclarations => self.is_variable_declarator_list_terminator(),
            ParsingContext::TypeParameters => matches!(
                token,
                SyntaxKind::GreaterThanToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::ExtendsKeyword
                    | SyntaxKind::ImplementsKeyword
            ),
            // `;` ends an argument list that lost its `)`.
            ParsingContext::ArgumentExpressions => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::SemicolonToken)
            }
            ParsingContext::ArrayLiteralMembers
            | ParsingContext::TupleElementTypes
            | ParsingContext::ArrayBindingElements => token == SyntaxKind::CloseBracketToken,
            ParsingContext::JSDocParameters | ParsingContext::Parameters | ParsingContext::RestProperties => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken)
            }
            ParsingContext::TypeArguments => token != SyntaxKind::CommaToken,
            ParsingContext::HeritageClauses => {
                matches!(token, SyntaxKind::OpenBraceToken | SyntaxKind::CloseBraceToken)
            }
            ParsingContext::JsxAttributes => {
                matches!(token, SyntaxKind::GreaterThanToken | SyntaxKind::SlashToken)
            }
            ParsingContext::JsxChildren => {
                token == SyntaxKind::LessThanSlashToken
                    || (token == SyntaxKind::LessThanToken
                        && self.next_token_is(|p| p.current_token() == SyntaxKind::SlashToken))
            }
            ParsingContext::SourceElements | ParsingContext::JSDocComment => false,
        }
    }

    fn is_variable_declarator_list_terminator(&self) -> bool {
        // ASI ends the list; `in`/`of` and `=>` end the declarations of a
        // `for` head and of a misplaced arrow.
        self.can_parse_semicolon()
            || matches!(
                self.current_token(),
                SyntaxKind::InKeyword | SyntaxKind::OfKeyword | SyntaxKind::EqualsGreaterThanToken
            )
    }

    /// Whether the current token could continue or close any open list.
    fn is_in_some_parsing_context(&mut self) -> bool {
        for context in self.parsing_context.iter() {
            if self.is_list_element(context, true) || self.is_list_terminator(context) {
                return true;
            }
        }
        false
    }

    /// Report the unexpected token and either stop the list, when an
    /// enclosing list can use the token, or skip it.
    pub(crate) fn abort_parsing_list_or_move_to_next_token(&mut self, context: ParsingContext) -> bool {
        self.parsing_context_errors(context);
        if self.is_in_some_parsing_context() {
            return true;
        }
        self.next_token();
        false
    }

    fn parsing_context_errors(&mut self, context: ParsingContext) {
        let token = self.current_token();
        let message: &DiagnosticMessage = match context {
            ParsingContext::SourceElements if token == SyntaxKind::DefaultKeyword => {
                self.parse_error_at_current_token(
                    &messages::_0_EXPECTED,
                    &[token_to_string(SyntaxKind::ExportKeyword)],
                );
                return;
            }
            ParsingContext::SourceElements | ParsingContext::BlockStatements => {
                &messages::DECLARATION_OR_STATEMENT_EXPECTED
            }
            ParsingContext::SwitchClauses => &messages::CASE_OR_DEFAULT_EXPECTED,
            ParsingContext::SwitchClauseStatements => &messages::STATEMENT_EXPECTED,
            ParsingContext::RestProperties | ParsingContext::TypeMembers => &messages::PROPERTY_OR_SIGNATURE_EXPECTED,
            ParsingContext::ClassMembers => {
                &messages::UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED
            }
            ParsingContext::EnumMembers => &messages::ENUM_MEMBER_EXPECTED,
            ParsingContext::HeritageClauseElement => &messages::EXPRESSION_EXPECTED,
            ParsingContext::VariableDeclarations if token.is_keyword() => {
                self.parse_error_at_current_token(
                    &messages::_0_IS_NOT_ALLOWED_AS_A_VARIABLE_DECLARATION_NAME,
                    &[token_to_string(token)],
                );
                return;
            }
            ParsingContext::VariableDeclarations => &messages::VARIABLE_DECLARATION_EXPECTED,
            ParsingContext::ObjectBindingElements => &messages::PROPERTY_DESTRUCTURING_PATTERN_EXPECTED,
            ParsingContext::ArrayBindingElements => &messages::ARRAY_ELEMENT_DESTRUCTURING_PATTERN_EXPECTED,
            ParsingContext::ArgumentExpressions => &messages::ARGUMENT_EXPRESSION_EXPECTED,
            ParsingContext::ObjectLiteralMembers => &messages::PROPERTY_ASSIGNMENT_EXPECTED,
            ParsingContext::ArrayLiteralMembers => &messages::EXPRESSION_OR_COMMA_EXPECTED,
            ParsingContext::JSDocParameters => &messages::PARAMETER_DECLARATION_EXPECTED,
            ParsingContext::Parameters if token.is_keyword() => {
                self.parse_error_at_current_token(
                    &messages::_0_IS_NOT_ALLOWED_AS_A_PARAMETER_NAME,
                    &[token_to_string(token)],
                );
                return;
            }
            ParsingContext::Parameters => &messages::PARAMETER_DECLARATION_EXPECTED,
            ParsingContext::TypeParameters => &messages::TYPE_PARAMETER_DECLARATION_EXPECTED,
            ParsingContext::TypeArguments => &messages::TYPE_ARGUMENT_EXPECTED,
            ParsingContext::TupleElementTypes => &messages::TYPE_EXPECTED,
            ParsingContext::HeritageClauses => &messages::UNEXPECTED_TOKEN_EXPECTED,
            ParsingContext::ImportOrExportSpecifiers if token == SyntaxKind::FromKeyword => {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &["}"]);
                return;
            }
            ParsingContext::ImportOrExportSpecifiers
            | ParsingContext::JsxAttributes
            | ParsingContext::JsxChildren
            | ParsingContext::JSDocComment => &messages::IDENTIFIER_EXPECTED,
            ParsingContext::ImportAttributes => &messages::IDENTIFIER_OR_STRING_LITERAL_EXPECTED,
        };
        self.parse_error_at_current_token(message, &[]);
    }

    // ========================================================================
    // List parsing
    // ========================================================================

    /// Parse elements until the list's terminator.
    pub(crate) fn parse_list(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> NodeId,
    ) -> ListId {
        let saved = self.parsing_context;
        self.parsing_context.insert(context);
        let mut list = Vec::new();
        let list_pos = self.node_pos();

        while !self.is_list_terminator(context) {
            if self.is_list_element(context, false) {
                let start_pos = self.node_pos();
                let element = self.parse_list_element(context, &mut parse_element);
                list.push(element);
                // A nesting-limited element consumes nothing.
                if start_pos == self.node_pos() && !self.is_list_terminator(context) {
                    self.next_token();
                }
                continue;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }

        self.parsing_context = saved;
        self.create_node_list(list, list_pos, None)
    }

    pub(crate) fn parse_list_element(
        &mut self,
        context: ParsingContext,
        parse_element: &mut impl FnMut(&mut Self) -> NodeId,
    ) -> NodeId {
        if let Some(node) = self.current_node(context) {
            return self.consume_node(node);
        }
        if self.syntax_cursor.is_some() {
            self.stats.reparsed_elements += 1;
        }
        parse_element(self)
    }

    /// Parse a comma separated list.
    pub(crate) fn parse_delimited_list(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> NodeId,
    ) -> ListId {
        self.parse_delimited_list_with(context, |p| Some(parse_element(p)), false)
            .unwrap_or_else(|| self.create_missing_list())
    }

    /// Like [`Parser::parse_delimited_list`], with `;` accepted in place of
    /// a comma.
    pub(crate) fn parse_delimited_list_allowing_semicolons(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> NodeId,
    ) -> ListId {
        self.parse_delimited_list_with(context, |p| Some(parse_element(p)), true)
            .unwrap_or_else(|| self.create_missing_list())
    }

    /// A delimited list that is abandoned as soon as one element fails.
    pub(crate) fn try_parse_delimited_list(
        &mut self,
        context: ParsingContext,
        parse_element: impl FnMut(&mut Self) -> Option<NodeId>,
    ) -> Option<ListId> {
        self.parse_delimited_list_with(context, parse_element, false)
    }

    fn parse_delimited_list_with(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> Option<NodeId>,
        consider_semicolon_as_delimiter: bool,
    ) -> Option<ListId> {
        let saved = self.parsing_context;
        self.parsing_context.insert(context);
        let mut list = Vec::new();
        let list_pos = self.node_pos();
        let mut comma_start: Option<u32> = None;

        loop {
            if self.is_list_element(context, false) {
                let start_pos = self.node_pos();
                let element = match self.current_node(context) {
                    Some(node) => Some(self.consume_node(node)),
                    None => {
                        if self.syntax_cursor.is_some() {
                            self.stats.reparsed_elements += 1;
                        }
                        parse_element(self)
                    }
                };
                let Some(element) = element else {
                    self.parsing_context = saved;
                    return None;
                };
                list.push(element);
                comma_start = Some(self.token_start());

                if self.parse_optional(SyntaxKind::CommaToken) {
                    continue;
                }
                comma_start = None;
                if self.is_list_terminator(context) {
                    break;
                }

                let message = (context == ParsingContext::EnumMembers)
                    .then_some(&messages::AN_ENUM_MEMBER_NAME_MUST_BE_FOLLOWED_BY_A_COMMA_EQUALS_OR_CLOSE_BRACE);
                self.parse_expected(SyntaxKind::CommaToken, message);

                // `;` between object members is a common slip; skip it
                // unless a line break suggests a missing `}`.
                if consider_semicolon_as_delimiter
                    && self.current_token() == SyntaxKind::SemicolonToken
                    && !self.has_preceding_line_break()
                {
                    self.next_token();
                }
                if start_pos == self.node_pos() {
                    // Nothing was consumed; skip the token to make progress.
                    self.next_token();
                }
                continue;
            }

            if self.is_list_terminator(context) {
                break;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }

        self.parsing_context = saved;
        let list = self.create_node_list(list, list_pos, None);
        self.arena.list_mut(list).has_trailing_comma = comma_start.is_some();
        Some(list)
    }

    /// `open` list `close`, or a missing list when `open` is absent.
    pub(crate) fn parse_bracketed_list(
        &mut self,
        context: ParsingContext,
        parse_element: impl FnMut(&mut Self) -> NodeId,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> ListId {
        if self.parse_expected(open, None) {
            let list = self.parse_delimited_list(context, parse_element);
            self.parse_expected(close, None);
            return list;
        }
        self.create_missing_list()
    }

    pub(crate) fn create_missing_list(&mut self) -> ListId {
        let pos = self.node_pos();
        let mut list = NodeListData::new(Vec::new(), pos, pos);
        list.is_missing_list = true;
        self.arena.alloc_list(list)
    }

    // ========================================================================
    // Node reuse
    // ========================================================================

    /// The old node at the current position, if it may stand in for what
    /// would be parsed here.
    pub(crate) fn current_node(&mut self, context: ParsingContext) -> Option<NodeId> {
        if self.parse_error_before_next_finished_node || !context.is_reusable() {
            return None;
        }
        let pos = self.node_pos();
        let node = self.syntax_cursor.as_mut()?.current_node(&self.arena, pos)?;

        let data = self.arena.data(node);
        if self.node_is_missing(node) || data.intersects_change || data.subtree_has_error() {
            return None;
        }
        if data.flags & NodeFlags::CONTEXT_FLAGS != self.context_flags & NodeFlags::CONTEXT_FLAGS {
            return None;
        }
        if !self.can_reuse_node(node, context) {
            return None;
        }
        Some(node)
    }

    pub(crate) fn consume_node(&mut self, node: NodeId) -> NodeId {
        let end = self.arena.data(node).end();
        self.scanner.reset_token_state(end as usize);
        self.next_token();
        self.stats.reused_nodes += 1;
        node
    }

    fn can_reuse_node(&self, node: NodeId, context: ParsingContext) -> bool {
        let n = self.arena.get(node);
        match context {
            ParsingContext::ClassMembers => match n.kind() {
                SyntaxKind::Constructor
                | SyntaxKind::IndexSignature
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::SemicolonClassElement => true,
                // A method named `constructor` may need to become a
                // constructor in its new context.
                SyntaxKind::MethodDeclaration => !n.name().is_some_and(|name| {
                    self.arena.kind(name) == SyntaxKind::Identifier && self.node_text_value(name) == "constructor"
                }),
                _ => false,
            },
            ParsingContext::SwitchClauses => {
                matches!(n.kind(), SyntaxKind::CaseClause | SyntaxKind::DefaultClause)
            }
            ParsingContext::SourceElements
            | ParsingContext::BlockStatements
            | ParsingContext::SwitchClauseStatements => matches!(
                n.kind(),
                SyntaxKind::FunctionDeclaration
                    | SyntaxKind::VariableStatement
                    | SyntaxKind::Block
                    | SyntaxKind::IfStatement
                    | SyntaxKind::ExpressionStatement
                    | SyntaxKind::ThrowStatement
                    | SyntaxKind::ReturnStatement
                    | SyntaxKind::SwitchStatement
                    | SyntaxKind::BreakStatement
                    | SyntaxKind::ContinueStatement
                    | SyntaxKind::ForInStatement
                    | SyntaxKind::ForOfStatement
                    | SyntaxKind::ForStatement
                    | SyntaxKind::WhileStatement
                    | SyntaxKind::WithStatement
                    | SyntaxKind::EmptyStatement
                    | SyntaxKind::TryStatement
                    | SyntaxKind::LabeledStatement
                    | SyntaxKind::DoStatement
                    | SyntaxKind::DebuggerStatement
                    | SyntaxKind::ImportDeclaration
                    | SyntaxKind::ImportEqualsDeclaration
                    | SyntaxKind::ExportDeclaration
                    | SyntaxKind::ExportAssignment
                    | SyntaxKind::ModuleDeclaration
                    | SyntaxKind::ClassDeclaration
                    | SyntaxKind::InterfaceDeclaration
                    | SyntaxKind::EnumDeclaration
                    | SyntaxKind::TypeAliasDeclaration
            ),
            ParsingContext::EnumMembers => n.kind() == SyntaxKind::EnumMember,
            ParsingContext::TypeMembers => matches!(
                n.kind(),
                SyntaxKind::ConstructSignature
                    | SyntaxKind::MethodSignature
                    | SyntaxKind::IndexSignature
                    | SyntaxKind::PropertySignature
                    | SyntaxKind::CallSignature
            ),
            // With an initializer, a change after the node could extend the
            // initializer expression.
            ParsingContext::VariableDeclarations => matches!(
                n.payload,
                NodePayload::VariableDeclaration { initializer: None, .. }
            ),
            ParsingContext::Parameters | ParsingContext::JSDocParameters => {
                matches!(n.payload, NodePayload::Parameter { initializer: None, .. })
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    #[test]
    fn test_context_set() {
        let mut set = ParsingContexts::default();
        set.insert(ParsingContext::ClassMembers);
        set.insert(ParsingContext::JSDocComment);
        assert!(set.contains(ParsingContext::ClassMembers));
        assert!(!set.contains(ParsingContext::Parameters));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![ParsingContext::ClassMembers, ParsingContext::JSDocComment]
        );
        assert_eq!(ParsingContext::ALL.len(), ParsingContext::COUNT);
        assert_eq!(ParsingContext::JSDocComment as usize, ParsingContext::COUNT - 1);
    }

    #[test]
    fn test_trailing_comma_recorded() {
        let mut p = Parser::new("test.ts", "a, b,)", ParseOptions::default());
        p.next_token();
        let list = p.parse_delimited_list(ParsingContext::ArgumentExpressions, |p| p.parse_identifier(None));
        assert_eq!(p.arena.list(list).len(), 2);
        assert!(p.arena.list(list).has_trailing_comma);
        assert_eq!(p.current_token(), SyntaxKind::CloseParenToken);
    }

    #[test]
    fn test_bracketed_list_missing_open() {
        let mut p = Parser::new("test.ts", "x", ParseOptions::default());
        p.next_token();
        let list = p.parse_bracketed_list(
            ParsingContext::Parameters,
            |p| p.parse_identifier(None),
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
        );
        assert!(p.arena.list(list).is_missing_list);
        assert_eq!(p.diagnostics.len(), 1);
    }
}
