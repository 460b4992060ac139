//! Grammar productions, split by syntactic category. Pieces shared by
//! several categories live here: modifiers, decorators, property names and
//! entity names.

mod declarations;
mod expressions;
mod jsx;
mod statements;
mod types;

use crate::parser::Parser;
use crate::utilities::can_follow_modifier;
use bitflags::bitflags;
use rsparse_ast::{ListId, NodeId, NodePayload, SyntaxKind};
use rsparse_diagnostics::{messages, DiagnosticMessage};

bitflags! {
    /// How a signature and its body are parsed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct SignatureFlags: u8 {
        const NONE = 0;
        const YIELD = 1 << 0;
        const AWAIT = 1 << 1;
        /// A type member or function type: no body, `,` or `;` may end it.
        const TYPE = 1 << 2;
        const IGNORE_MISSING_OPEN_BRACE = 1 << 4;
        const JSDOC = 1 << 5;
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Modifiers and decorators
    // ========================================================================

    /// Decorators and modifiers in any interleaving the grammar allows:
    /// decorators, modifiers, then more decorators and modifiers.
    pub(crate) fn parse_modifiers(
        &mut self,
        allow_decorators: bool,
        permit_const_as_modifier: bool,
        stop_on_start_of_class_static_block: bool,
    ) -> Option<ListId> {
        let pos = self.node_pos();
        let mut list = Vec::new();
        let mut has_seen_static = false;
        let mut has_leading_modifier = false;
        let mut has_trailing_decorator = false;

        if allow_decorators && self.current_token() == SyntaxKind::AtToken {
            while let Some(decorator) = self.try_parse_decorator() {
                list.push(decorator);
            }
        }
        while let Some(modifier) =
            self.try_parse_modifier(has_seen_static, permit_const_as_modifier, stop_on_start_of_class_static_block)
        {
            has_seen_static |= self.arena.kind(modifier) == SyntaxKind::StaticKeyword;
            list.push(modifier);
            has_leading_modifier = true;
        }
        if has_leading_modifier && allow_decorators && self.current_token() == SyntaxKind::AtToken {
            while let Some(decorator) = self.try_parse_decorator() {
                list.push(decorator);
                has_trailing_decorator = true;
            }
        }
        if has_trailing_decorator {
            while let Some(modifier) =
                self.try_parse_modifier(has_seen_static, permit_const_as_modifier, stop_on_start_of_class_static_block)
            {
                has_seen_static |= self.arena.kind(modifier) == SyntaxKind::StaticKeyword;
                list.push(modifier);
            }
        }

        (!list.is_empty()).then(|| self.create_node_list(list, pos, None))
    }

    fn try_parse_modifier(
        &mut self,
        has_seen_static: bool,
        permit_const_as_modifier: bool,
        stop_on_start_of_class_static_block: bool,
    ) -> Option<NodeId> {
        let pos = self.node_pos();
        let kind = self.current_token();
        if kind == SyntaxKind::ConstKeyword && permit_const_as_modifier {
            // `const` before a type parameter name.
            self.try_parse(|p| p.next_token_is_on_same_line_and_can_follow_modifier().then_some(()))?;
        } else if stop_on_start_of_class_static_block
            && kind == SyntaxKind::StaticKeyword
            && self.next_token_is(|p| p.current_token() == SyntaxKind::OpenBraceToken)
        {
            return None;
        } else if has_seen_static && kind == SyntaxKind::StaticKeyword {
            return None;
        } else if !self.parse_any_contextual_modifier() {
            return None;
        }
        Some(self.finish_node(kind, pos, NodePayload::Token))
    }

    /// Consume the current token if it is a modifier keyword used as one.
    fn parse_any_contextual_modifier(&mut self) -> bool {
        self.current_token().is_modifier_kind()
            && self
                .try_parse(|p| p.next_token_can_follow_modifier().then_some(()))
                .is_some()
    }

    /// Consume `kind` if it is used as a modifier here, e.g. `get` before
    /// an accessor name.
    pub(crate) fn parse_contextual_modifier(&mut self, kind: SyntaxKind) -> bool {
        self.current_token() == kind
            && self
                .try_parse(|p| p.next_token_can_follow_modifier().then_some(()))
                .is_some()
    }

    fn next_token_can_follow_modifier(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::ConstKeyword => self.next_token() == SyntaxKind::EnumKeyword,
            SyntaxKind::ExportKeyword => {
                self.next_token();
                match self.current_token() {
                    SyntaxKind::DefaultKeyword => self.look_ahead(Self::next_token_can_follow_default_keyword),
                    SyntaxKind::TypeKeyword => self.look_ahead(|p| {
                        p.next_token();
                        p.can_follow_export_modifier()
                    }),
                    _ => self.can_follow_export_modifier(),
                }
            }
            SyntaxKind::DefaultKeyword => self.next_token_can_follow_default_keyword(),
            SyntaxKind::StaticKeyword => {
                self.next_token();
                can_follow_modifier(self.current_token())
            }
            SyntaxKind::GetKeyword | SyntaxKind::SetKeyword => {
                self.next_token();
                self.can_follow_get_or_set_keyword()
            }
            _ => self.next_token_is_on_same_line_and_can_follow_modifier(),
        }
    }

    fn can_follow_export_modifier(&self) -> bool {
        let token = self.current_token();
        token == SyntaxKind::AtToken
            || (!matches!(
                token,
                SyntaxKind::AsteriskToken | SyntaxKind::AsKeyword | SyntaxKind::OpenBraceToken
            ) && can_follow_modifier(token))
    }

    fn can_follow_get_or_set_keyword(&self) -> bool {
        self.current_token() == SyntaxKind::OpenBracketToken || self.is_literal_property_name()
    }

    fn next_token_is_on_same_line_and_can_follow_modifier(&mut self) -> bool {
        self.next_token();
        !self.has_preceding_line_break() && can_follow_modifier(self.current_token())
    }

    fn next_token_can_follow_default_keyword(&mut self) -> bool {
        self.next_token();
        match self.current_token() {
            SyntaxKind::ClassKeyword | SyntaxKind::FunctionKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::AtToken => {
                true
            }
            SyntaxKind::AbstractKeyword => self.look_ahead(|p| {
                p.next_token() == SyntaxKind::ClassKeyword && !p.has_preceding_line_break()
            }),
            SyntaxKind::AsyncKeyword => self.look_ahead(|p| {
                p.next_token() == SyntaxKind::FunctionKeyword && !p.has_preceding_line_break()
            }),
            _ => false,
        }
    }

    pub(crate) fn try_parse_decorator(&mut self) -> Option<NodeId> {
        let pos = self.node_pos();
        if !self.parse_optional(SyntaxKind::AtToken) {
            return None;
        }
        let expression = self.do_in_decorator_context(Self::parse_decorator_expression);
        Some(self.finish_node(SyntaxKind::Decorator, pos, NodePayload::ExpressionWrapper { expression }))
    }

    fn parse_decorator_expression(&mut self) -> NodeId {
        if self.in_await_context() && self.current_token() == SyntaxKind::AwaitKeyword {
            // `@await` inside an async body: keep going as a member
            // expression on a placeholder name.
            let pos = self.node_pos();
            let await_expression = self.parse_identifier(Some(&messages::EXPRESSION_EXPECTED));
            self.next_token();
            let member = self.parse_member_expression_rest(pos, await_expression, true);
            return self.parse_call_expression_rest(pos, member);
        }
        self.parse_left_hand_side_expression_or_higher()
    }

    /// `abstract` in `abstract new () => T`.
    pub(crate) fn parse_modifiers_for_constructor_type(&mut self) -> Option<ListId> {
        if self.current_token() != SyntaxKind::AbstractKeyword {
            return None;
        }
        let pos = self.node_pos();
        let modifier = self.parse_token_node();
        Some(self.create_node_list(vec![modifier], pos, None))
    }

    // ========================================================================
    // Property names
    // ========================================================================

    pub(crate) fn is_literal_property_name(&self) -> bool {
        let token = self.current_token();
        token.is_identifier_or_keyword()
            || matches!(
                token,
                SyntaxKind::PrivateIdentifier
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
            )
    }

    pub(crate) fn parse_property_name(&mut self) -> NodeId {
        self.parse_property_name_worker(true)
    }

    pub(crate) fn parse_property_name_worker(&mut self, allow_computed_property_names: bool) -> NodeId {
        match self.current_token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => self.parse_literal_node(),
            SyntaxKind::OpenBracketToken if allow_computed_property_names => self.parse_computed_property_name(),
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            _ => self.parse_identifier_name(None),
        }
    }

    fn parse_computed_property_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken, None);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseBracketToken, None);
        self.finish_node(SyntaxKind::ComputedPropertyName, pos, NodePayload::ExpressionWrapper { expression })
    }

    pub(crate) fn parse_private_identifier(&mut self) -> NodeId {
        let pos = self.node_pos();
        let text = self.intern(self.scanner.token_value());
        self.next_token();
        self.finish_node(
            SyntaxKind::PrivateIdentifier,
            pos,
            NodePayload::Identifier {
                text,
                original_keyword_kind: None,
            },
        )
    }

    // ========================================================================
    // Entity names
    // ========================================================================

    /// `a.b.c` as nested qualified names.
    pub(crate) fn parse_entity_name(
        &mut self,
        allow_reserved_words: bool,
        message: Option<&DiagnosticMessage>,
    ) -> NodeId {
        let pos = self.node_pos();
        let mut entity = if allow_reserved_words {
            self.parse_identifier_name(message)
        } else {
            self.parse_identifier(message)
        };
        while self.parse_optional(SyntaxKind::DotToken) {
            // `A.<T>` is a JSDoc-style generic; the dot is left as a gap.
            if self.current_token() == SyntaxKind::LessThanToken {
                break;
            }
            let right = self.parse_right_side_of_dot(allow_reserved_words, false, true);
            entity = self.finish_node(SyntaxKind::QualifiedName, pos, NodePayload::QualifiedName { left: entity, right });
        }
        entity
    }

    pub(crate) fn parse_right_side_of_dot(
        &mut self,
        allow_identifier_names: bool,
        allow_private_identifiers: bool,
        allow_unicode_escape_sequence_in_identifier_name: bool,
    ) -> NodeId {
        // `a.` at the end of a line followed by `b c` on the next is far
        // more likely an unfinished member access than `a.b`.
        if self.has_preceding_line_break()
            && self.current_token().is_identifier_or_keyword()
            && self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line)
        {
            return self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::IDENTIFIER_EXPECTED), &[]);
        }

        if self.current_token() == SyntaxKind::PrivateIdentifier {
            let node = self.parse_private_identifier();
            return if allow_private_identifiers {
                node
            } else {
                self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::IDENTIFIER_EXPECTED), &[])
            };
        }

        if allow_identifier_names {
            return if allow_unicode_escape_sequence_in_identifier_name {
                self.parse_identifier_name(None)
            } else {
                self.parse_identifier_name_error_on_unicode_escape_sequence()
            };
        }
        self.parse_identifier(None)
    }

    // ========================================================================
    // Small lookahead predicates
    // ========================================================================

    pub(crate) fn next_token_is_identifier_or_keyword_on_same_line(&mut self) -> bool {
        self.next_token();
        self.current_token().is_identifier_or_keyword() && !self.has_preceding_line_break()
    }

    pub(crate) fn next_token_is_identifier_on_same_line(&mut self) -> bool {
        self.next_token();
        !self.has_preceding_line_break() && self.is_identifier()
    }

    pub(crate) fn next_token_is_identifier(&mut self) -> bool {
        self.next_token();
        self.is_identifier()
    }

    pub(crate) fn next_token_is_open_paren(&mut self) -> bool {
        self.next_token() == SyntaxKind::OpenParenToken
    }

    pub(crate) fn next_token_is_open_brace(&mut self) -> bool {
        self.next_token() == SyntaxKind::OpenBraceToken
    }

    pub(crate) fn next_token_is_function_keyword_on_same_line(&mut self) -> bool {
        self.next_token();
        self.current_token() == SyntaxKind::FunctionKeyword && !self.has_preceding_line_break()
    }

    pub(crate) fn next_token_is_identifier_or_keyword_or_literal_on_same_line(&mut self) -> bool {
        self.next_token();
        (self.current_token().is_identifier_or_keyword()
            || matches!(
                self.current_token(),
                SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral | SyntaxKind::StringLiteral
            ))
            && !self.has_preceding_line_break()
    }
}
