//! Expressions: assignment and arrow functions, binary operators by
//! precedence climbing, unary and postfix forms, member and call chains,
//! and primary expressions.

use super::SignatureFlags;
use crate::list::ParsingContext;
use crate::parser::{token_to_string, Parser};
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::is_left_hand_side_expression_start;
use rsparse_ast::{LanguageVariant, ListId, NodeFlags, NodeId, NodePayload, SyntaxKind};
use rsparse_diagnostics::messages;

/// Answer of the parenthesized-arrow lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tristate {
    False,
    True,
    Unknown,
}

/// Expression kinds that may appear on the left of an assignment.
fn is_left_hand_side_expression_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PropertyAccessExpression
            | SyntaxKind::ElementAccessExpression
            | SyntaxKind::NewExpression
            | SyntaxKind::CallExpression
            | SyntaxKind::JsxElement
            | SyntaxKind::JsxSelfClosingElement
            | SyntaxKind::JsxFragment
            | SyntaxKind::TaggedTemplateExpression
            | SyntaxKind::ArrayLiteralExpression
            | SyntaxKind::ParenthesizedExpression
            | SyntaxKind::ObjectLiteralExpression
            | SyntaxKind::ClassExpression
            | SyntaxKind::FunctionExpression
            | SyntaxKind::Identifier
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateExpression
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NonNullExpression
            | SyntaxKind::ExpressionWithTypeArguments
            | SyntaxKind::MetaProperty
            | SyntaxKind::ImportKeyword
            | SyntaxKind::MissingDeclaration
    )
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Start predicates
    // ========================================================================

    pub(crate) fn is_start_of_left_hand_side_expression(&mut self) -> bool {
        let token = self.current_token();
        if is_left_hand_side_expression_start(token) {
            return true;
        }
        if token == SyntaxKind::ImportKeyword {
            return self.look_ahead(Self::next_token_is_open_paren_or_less_than_or_dot);
        }
        self.is_identifier()
    }

    pub(crate) fn is_start_of_expression(&mut self) -> bool {
        if self.is_start_of_left_hand_side_expression() {
            return true;
        }
        match self.current_token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::AwaitKeyword
            | SyntaxKind::YieldKeyword
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::AtToken => true,
            // Binary operators are accepted for better recovery.
            _ => self.is_binary_operator() || self.is_identifier(),
        }
    }

    pub(crate) fn is_start_of_expression_statement(&mut self) -> bool {
        !matches!(
            self.current_token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword | SyntaxKind::AtToken
        ) && self.is_start_of_expression()
    }

    fn is_binary_operator(&self) -> bool {
        if self.in_disallow_in_context() && self.current_token() == SyntaxKind::InKeyword {
            return false;
        }
        get_binary_operator_precedence(self.current_token()).is_binary()
    }

    fn next_token_is_open_paren_or_less_than_or_dot(&mut self) -> bool {
        matches!(
            self.next_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::DotToken
        )
    }

    fn is_template_start_of_tagged_template(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
        )
    }

    // ========================================================================
    // Comma and assignment
    // ========================================================================

    /// `a, b, c`: assignment expressions joined by commas.
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        self.do_outside_of_context(NodeFlags::DECORATOR_CONTEXT, |p| {
            let pos = p.node_pos();
            let mut expression = p.parse_assignment_expression_or_higher(true);
            while let Some(operator_token) = p.parse_optional_token(SyntaxKind::CommaToken) {
                let right = p.parse_assignment_expression_or_higher(true);
                expression = p.make_binary_expression(expression, operator_token, right, pos);
            }
            expression
        })
    }

    pub(crate) fn parse_assignment_expression_or_higher(&mut self, allow_return_type_in_arrow_function: bool) -> NodeId {
        self.with_nesting_guard(SyntaxKind::Identifier, |p| {
            p.parse_assignment_expression_worker(allow_return_type_in_arrow_function)
        })
    }

    fn parse_assignment_expression_worker(&mut self, allow_return_type_in_arrow_function: bool) -> NodeId {
        if self.is_yield_expression() {
            return self.parse_yield_expression();
        }

        if let Some(arrow) = self
            .try_parse_parenthesized_arrow_function_expression(allow_return_type_in_arrow_function)
            .or_else(|| self.try_parse_async_simple_arrow_function_expression(allow_return_type_in_arrow_function))
        {
            return arrow;
        }

        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);

        // `x => ...` is only known once the identifier has been parsed.
        if self.arena.kind(expression) == SyntaxKind::Identifier
            && self.current_token() == SyntaxKind::EqualsGreaterThanToken
        {
            return self.parse_simple_arrow_function_expression(
                pos,
                expression,
                allow_return_type_in_arrow_function,
                has_jsdoc,
                None,
            );
        }

        if is_left_hand_side_expression_kind(self.arena.kind(expression))
            && self.re_scan_greater_token().is_assignment_operator()
        {
            let operator_token = self.parse_token_node();
            let right = self.parse_assignment_expression_or_higher(allow_return_type_in_arrow_function);
            return self.make_binary_expression(expression, operator_token, right, pos);
        }

        self.parse_conditional_expression_rest(expression, pos, allow_return_type_in_arrow_function)
    }

    fn is_yield_expression(&mut self) -> bool {
        if self.current_token() != SyntaxKind::YieldKeyword {
            return false;
        }
        // Outside a generator `yield` is an identifier unless something
        // that can only be its operand follows on the same line.
        self.in_yield_context() || self.look_ahead(Self::next_token_is_identifier_or_keyword_or_literal_on_same_line)
    }

    fn parse_yield_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        let (asterisk_token, expression) = if !self.has_preceding_line_break()
            && (self.current_token() == SyntaxKind::AsteriskToken || self.is_start_of_expression())
        {
            let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
            (asterisk_token, Some(self.parse_assignment_expression_or_higher(true)))
        } else {
            (None, None)
        };
        self.finish_node(
            SyntaxKind::YieldExpression,
            pos,
            NodePayload::Yield {
                asterisk_token,
                expression,
            },
        )
    }

    fn parse_conditional_expression_rest(
        &mut self,
        condition: NodeId,
        pos: u32,
        allow_return_type_in_arrow_function: bool,
    ) -> NodeId {
        let Some(question_token) = self.parse_optional_token(SyntaxKind::QuestionToken) else {
            return condition;
        };
        let when_true = self.do_outside_of_context(NodeFlags::DISALLOW_IN_CONTEXT | NodeFlags::DECORATOR_CONTEXT, |p| {
            p.parse_assignment_expression_or_higher(false)
        });
        let colon_token = self.parse_expected_token(SyntaxKind::ColonToken, None);
        let when_false = if self.node_is_missing(colon_token) {
            self.create_missing_node(
                SyntaxKind::Identifier,
                false,
                Some(&messages::_0_EXPECTED),
                &[token_to_string(SyntaxKind::ColonToken)],
            )
        } else {
            self.parse_assignment_expression_or_higher(allow_return_type_in_arrow_function)
        };
        self.finish_node(
            SyntaxKind::ConditionalExpression,
            pos,
            NodePayload::Conditional {
                condition,
                question_token,
                when_true,
                colon_token,
                when_false,
            },
        )
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    fn parse_simple_arrow_function_expression(
        &mut self,
        pos: u32,
        identifier: NodeId,
        allow_return_type_in_arrow_function: bool,
        has_jsdoc: bool,
        async_modifier: Option<ListId>,
    ) -> NodeId {
        debug_assert_eq!(self.current_token(), SyntaxKind::EqualsGreaterThanToken);
        let range = self.arena.range(identifier);
        let parameter = self.finish_node_at(
            SyntaxKind::Parameter,
            range.pos,
            range.end,
            NodePayload::Parameter {
                modifiers: None,
                dot_dot_dot_token: None,
                name: identifier,
                question_token: None,
                type_annotation: None,
                initializer: None,
            },
            NodeFlags::NONE,
        );
        let parameters = self.create_node_list(vec![parameter], range.pos, Some(range.end));
        let equals_greater_than_token = self.parse_expected_token(SyntaxKind::EqualsGreaterThanToken, None);
        let body = self.parse_arrow_function_expression_body(async_modifier.is_some(), allow_return_type_in_arrow_function);
        let node = self.finish_node(
            SyntaxKind::ArrowFunction,
            pos,
            NodePayload::FunctionLike {
                modifiers: async_modifier,
                asterisk_token: None,
                name: None,
                question_token: None,
                exclamation_token: None,
                type_parameters: None,
                parameters,
                type_annotation: None,
                equals_greater_than_token: Some(equals_greater_than_token),
                body: Some(body),
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn try_parse_parenthesized_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        match self.is_parenthesized_arrow_function_expression() {
            Tristate::False => None,
            Tristate::True => self.parse_parenthesized_arrow_function_expression(true, true),
            Tristate::Unknown => {
                self.try_parse(|p| p.parse_possible_parenthesized_arrow_function_expression(allow_return_type_in_arrow_function))
            }
        }
    }

    /// Whether the tokens ahead start a parenthesized arrow function.
    /// `Unknown` means only a full speculative parse can tell.
    pub(crate) fn is_parenthesized_arrow_function_expression(&mut self) -> Tristate {
        match self.current_token() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::AsyncKeyword => {
                self.look_ahead(Self::is_parenthesized_arrow_function_expression_worker)
            }
            // A stray `=>` is parsed as an arrow with missing parameters.
            SyntaxKind::EqualsGreaterThanToken => Tristate::True,
            _ => Tristate::False,
        }
    }

    fn is_parenthesized_arrow_function_expression_worker(&mut self) -> Tristate {
        if self.current_token() == SyntaxKind::AsyncKeyword {
            self.next_token();
            if self.has_preceding_line_break() {
                return Tristate::False;
            }
            if !matches!(self.current_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
                return Tristate::False;
            }
        }

        let first = self.current_token();
        let second = self.next_token();

        if first == SyntaxKind::OpenParenToken {
            match second {
                SyntaxKind::CloseParenToken => {
                    // `() =>`, `(): T` and `() {` can only be arrow heads.
                    return match self.next_token() {
                        SyntaxKind::EqualsGreaterThanToken | SyntaxKind::ColonToken | SyntaxKind::OpenBraceToken => {
                            Tristate::True
                        }
                        _ => Tristate::False,
                    };
                }
                // A destructuring parameter or an array/object literal.
                SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken => return Tristate::Unknown,
                SyntaxKind::DotDotDotToken => return Tristate::True,
                _ => {}
            }

            // `(public x` and friends: a parameter modifier, unless it is
            // `(x as T)`.
            if second.is_modifier_kind()
                && second != SyntaxKind::AsyncKeyword
                && self.look_ahead(Self::next_token_is_identifier)
            {
                if self.next_token() == SyntaxKind::AsKeyword {
                    return Tristate::False;
                }
                return Tristate::True;
            }

            if !self.is_identifier() && second != SyntaxKind::ThisKeyword {
                return Tristate::False;
            }

            return match self.next_token() {
                SyntaxKind::ColonToken => Tristate::True,
                SyntaxKind::QuestionToken => {
                    self.next_token();
                    // `(x?:`, `(x?,`, `(x?=` and `(x?)` are optional
                    // parameters; anything else is a conditional.
                    if matches!(
                        self.current_token(),
                        SyntaxKind::ColonToken
                            | SyntaxKind::CommaToken
                            | SyntaxKind::EqualsToken
                            | SyntaxKind::CloseParenToken
                    ) {
                        Tristate::True
                    } else {
                        Tristate::False
                    }
                }
                SyntaxKind::CommaToken | SyntaxKind::EqualsToken | SyntaxKind::CloseParenToken => Tristate::Unknown,
                _ => Tristate::False,
            };
        }

        debug_assert_eq!(first, SyntaxKind::LessThanToken);
        if !self.is_identifier() && self.current_token() != SyntaxKind::ConstKeyword {
            return Tristate::False;
        }

        if self.options.language_variant == LanguageVariant::Jsx {
            // In JSX `<T>` opens an element unless it clearly reads as a
            // type parameter list.
            let is_arrow_function_in_jsx = self.look_ahead(|p| {
                p.parse_optional(SyntaxKind::ConstKeyword);
                match p.next_token() {
                    SyntaxKind::ExtendsKeyword => !matches!(
                        p.next_token(),
                        SyntaxKind::EqualsToken | SyntaxKind::GreaterThanToken | SyntaxKind::SlashToken
                    ),
                    SyntaxKind::CommaToken | SyntaxKind::EqualsToken => true,
                    _ => false,
                }
            });
            return if is_arrow_function_in_jsx {
                Tristate::True
            } else {
                Tristate::False
            };
        }

        Tristate::Unknown
    }

    fn parse_possible_parenthesized_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        let token_pos = self.token_start();
        if self.not_parenthesized_arrow.contains(&token_pos) {
            return None;
        }
        let result = self.parse_parenthesized_arrow_function_expression(false, allow_return_type_in_arrow_function);
        if result.is_none() {
            self.not_parenthesized_arrow.insert(token_pos);
        }
        result
    }

    fn try_parse_async_simple_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        if self.current_token() != SyntaxKind::AsyncKeyword
            || self.look_ahead(Self::is_unparenthesized_async_arrow_function_worker) != Tristate::True
        {
            return None;
        }
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let async_modifier = self.parse_modifiers_for_arrow_function();
        let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);
        Some(self.parse_simple_arrow_function_expression(
            pos,
            expression,
            allow_return_type_in_arrow_function,
            has_jsdoc,
            async_modifier,
        ))
    }

    /// `async x =>` on one line.
    fn is_unparenthesized_async_arrow_function_worker(&mut self) -> Tristate {
        if self.current_token() == SyntaxKind::AsyncKeyword {
            self.next_token();
            if self.has_preceding_line_break() || self.current_token() == SyntaxKind::EqualsGreaterThanToken {
                return Tristate::False;
            }
            let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);
            if !self.has_preceding_line_break()
                && self.arena.kind(expression) == SyntaxKind::Identifier
                && self.current_token() == SyntaxKind::EqualsGreaterThanToken
            {
                return Tristate::True;
            }
        }
        Tristate::False
    }

    fn parse_modifiers_for_arrow_function(&mut self) -> Option<ListId> {
        if self.current_token() != SyntaxKind::AsyncKeyword {
            return None;
        }
        let pos = self.node_pos();
        let modifier = self.parse_token_node();
        Some(self.create_node_list(vec![modifier], pos, None))
    }

    /// With `allow_ambiguity` unset, gives up on anything that does not
    /// look like an arrow so the caller can reparse as an expression.
    fn parse_parenthesized_arrow_function_expression(
        &mut self,
        allow_ambiguity: bool,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers_for_arrow_function();
        let is_async = self.has_modifier(modifiers, SyntaxKind::AsyncKeyword);
        let flags = if is_async {
            SignatureFlags::AWAIT
        } else {
            SignatureFlags::NONE
        };
        let type_parameters = self.parse_type_parameters();

        let parameters = if !self.parse_expected(SyntaxKind::OpenParenToken, None) {
            if !allow_ambiguity {
                return None;
            }
            self.create_missing_list()
        } else {
            let parameters = match self.parse_parameters_worker(flags, allow_ambiguity) {
                Some(parameters) => parameters,
                None if allow_ambiguity => self.create_missing_list(),
                None => return None,
            };
            if !self.parse_expected(SyntaxKind::CloseParenToken, None) && !allow_ambiguity {
                return None;
            }
            parameters
        };

        let has_return_colon = self.current_token() == SyntaxKind::ColonToken;
        let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, false);
        if let Some(type_node) = type_annotation {
            if !allow_ambiguity && self.type_has_arrow_function_blocking_parse_error(type_node) {
                return None;
            }
        }

        // `(x): (y) => z` where the annotation swallowed the arrow.
        let mut unwrapped = type_annotation;
        while let Some(node) = unwrapped {
            match self.arena.get(node).payload {
                NodePayload::WrappedType {
                    type_node,
                    postfix: false,
                } if self.arena.kind(node) == SyntaxKind::ParenthesizedType => unwrapped = Some(type_node),
                _ => break,
            }
        }
        let has_jsdoc_function_type =
            unwrapped.is_some_and(|node| self.arena.kind(node) == SyntaxKind::JSDocFunctionType);
        if !allow_ambiguity
            && self.current_token() != SyntaxKind::EqualsGreaterThanToken
            && (has_jsdoc_function_type || self.current_token() != SyntaxKind::OpenBraceToken)
        {
            return None;
        }

        let last_token = self.current_token();
        let equals_greater_than_token = self.parse_expected_token(SyntaxKind::EqualsGreaterThanToken, None);
        let body = if matches!(
            last_token,
            SyntaxKind::EqualsGreaterThanToken | SyntaxKind::OpenBraceToken
        ) {
            self.parse_arrow_function_expression_body(is_async, allow_return_type_in_arrow_function)
        } else {
            self.parse_identifier(None)
        };

        // In `a ? (x): y => z : w` the colon belongs to the conditional.
        if !allow_return_type_in_arrow_function && has_return_colon && self.current_token() != SyntaxKind::ColonToken {
            return None;
        }

        let node = self.finish_node(
            SyntaxKind::ArrowFunction,
            pos,
            NodePayload::FunctionLike {
                modifiers,
                asterisk_token: None,
                name: None,
                question_token: None,
                exclamation_token: None,
                type_parameters,
                parameters,
                type_annotation,
                equals_greater_than_token: Some(equals_greater_than_token),
                body: Some(body),
            },
        );
        Some(self.with_jsdoc(node, has_jsdoc))
    }

    fn type_has_arrow_function_blocking_parse_error(&self, node: NodeId) -> bool {
        match (self.arena.kind(node), &self.arena.get(node).payload) {
            (SyntaxKind::TypeReference, NodePayload::TypeReference { type_name, .. }) => self.node_is_missing(*type_name),
            (
                SyntaxKind::FunctionType | SyntaxKind::ConstructorType,
                NodePayload::FunctionLike {
                    parameters,
                    type_annotation,
                    ..
                },
            ) => {
                self.arena.list(*parameters).is_missing_list
                    || type_annotation.is_some_and(|t| self.type_has_arrow_function_blocking_parse_error(t))
            }
            (SyntaxKind::ParenthesizedType, NodePayload::WrappedType { type_node, .. }) => {
                self.type_has_arrow_function_blocking_parse_error(*type_node)
            }
            _ => false,
        }
    }

    fn parse_arrow_function_expression_body(
        &mut self,
        is_async: bool,
        allow_return_type_in_arrow_function: bool,
    ) -> NodeId {
        let await_flag = if is_async {
            SignatureFlags::AWAIT
        } else {
            SignatureFlags::NONE
        };
        if self.current_token() == SyntaxKind::OpenBraceToken {
            return self.parse_function_block(await_flag, None);
        }

        // `() => return x`: a statement where an expression belongs. Parse
        // it as a block body with the brace missing.
        if !matches!(
            self.current_token(),
            SyntaxKind::SemicolonToken | SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword
        ) && self.is_start_of_statement()
            && !self.is_start_of_expression_statement()
        {
            return self.parse_function_block(SignatureFlags::IGNORE_MISSING_OPEN_BRACE | await_flag, None);
        }

        if is_async {
            self.do_in_await_context(|p| p.parse_assignment_expression_or_higher(allow_return_type_in_arrow_function))
        } else {
            self.do_outside_of_await_context(|p| {
                p.parse_assignment_expression_or_higher(allow_return_type_in_arrow_function)
            })
        }
    }

    // ========================================================================
    // Binary operators
    // ========================================================================

    pub(crate) fn parse_binary_expression_or_higher(&mut self, precedence: OperatorPrecedence) -> NodeId {
        // Right operands of `**` recurse once per operator.
        if precedence > OperatorPrecedence::LOWEST {
            return self.with_nesting_guard(SyntaxKind::Identifier, |p| {
                let pos = p.node_pos();
                let left = p.parse_unary_expression_or_higher();
                p.parse_binary_expression_rest(precedence, left, pos)
            });
        }
        let pos = self.node_pos();
        let left = self.parse_unary_expression_or_higher();
        self.parse_binary_expression_rest(precedence, left, pos)
    }

    fn parse_binary_expression_rest(&mut self, precedence: OperatorPrecedence, mut left: NodeId, pos: u32) -> NodeId {
        loop {
            // `>` is scanned alone so type arguments can close; rejoin
            // `>=`, `>>` and friends here.
            self.re_scan_greater_token();
            let new_precedence = get_binary_operator_precedence(self.current_token());

            // `**` is right associative; everything else is left
            // associative.
            let consume_current_operator = new_precedence.is_binary()
                && if self.current_token() == SyntaxKind::AsteriskAsteriskToken {
                    new_precedence >= precedence
                } else {
                    new_precedence > precedence
                };
            if !consume_current_operator {
                break;
            }
            if self.current_token() == SyntaxKind::InKeyword && self.in_disallow_in_context() {
                break;
            }

            if matches!(self.current_token(), SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                // `x\nas T` is two statements.
                if self.has_preceding_line_break() {
                    break;
                }
                let keyword = self.current_token();
                self.next_token();
                let type_node = self.parse_type();
                let kind = if keyword == SyntaxKind::SatisfiesKeyword {
                    SyntaxKind::SatisfiesExpression
                } else {
                    SyntaxKind::AsExpression
                };
                let left_pos = self.arena.range(left).pos;
                left = self.finish_node(
                    kind,
                    left_pos,
                    NodePayload::AsExpression {
                        expression: left,
                        type_node,
                    },
                );
            } else {
                let operator_token = self.parse_token_node();
                let right = self.parse_binary_expression_or_higher(new_precedence);
                left = self.make_binary_expression(left, operator_token, right, pos);
            }
        }
        left
    }

    fn make_binary_expression(&mut self, left: NodeId, operator_token: NodeId, right: NodeId, pos: u32) -> NodeId {
        self.finish_node(
            SyntaxKind::BinaryExpression,
            pos,
            NodePayload::Binary {
                left,
                operator_token,
                right,
            },
        )
    }

    // ========================================================================
    // Unary operators
    // ========================================================================

    pub(crate) fn parse_unary_expression_or_higher(&mut self) -> NodeId {
        if self.is_update_expression() {
            let pos = self.node_pos();
            let update_expression = self.parse_update_expression();
            return if self.current_token() == SyntaxKind::AsteriskAsteriskToken {
                let precedence = get_binary_operator_precedence(self.current_token());
                self.parse_binary_expression_rest(precedence, update_expression, pos)
            } else {
                update_expression
            };
        }

        let unary_operator = self.current_token();
        let simple_unary_expression = self.parse_simple_unary_expression();
        if self.current_token() == SyntaxKind::AsteriskAsteriskToken {
            // `-x ** y` is ambiguous and rejected.
            let range = self.arena.range(simple_unary_expression);
            let start = rsparse_ast::source_file::skip_trivia(self.text, range.pos as usize) as u32;
            if self.arena.kind(simple_unary_expression) == SyntaxKind::TypeAssertionExpression {
                self.parse_error_at(
                    start,
                    range.end,
                    &messages::A_TYPE_ASSERTION_EXPRESSION_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION,
                    &[],
                );
            } else {
                self.parse_error_at(
                    start,
                    range.end,
                    &messages::AN_UNARY_EXPRESSION_WITH_THE_0_OPERATOR_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION,
                    &[token_to_string(unary_operator)],
                );
            }
        }
        simple_unary_expression
    }

    fn is_update_expression(&self) -> bool {
        match self.current_token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::AwaitKeyword => false,
            // `<` is a type assertion outside JSX.
            SyntaxKind::LessThanToken => self.options.language_variant == LanguageVariant::Jsx,
            _ => true,
        }
    }

    fn parse_simple_unary_expression(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::Identifier, |p| match p.current_token() {
            SyntaxKind::PlusToken | SyntaxKind::MinusToken | SyntaxKind::TildeToken | SyntaxKind::ExclamationToken => {
                p.parse_prefix_unary_expression()
            }
            SyntaxKind::DeleteKeyword => p.parse_keyword_unary_expression(SyntaxKind::DeleteExpression),
            SyntaxKind::TypeOfKeyword => p.parse_keyword_unary_expression(SyntaxKind::TypeOfExpression),
            SyntaxKind::VoidKeyword => p.parse_keyword_unary_expression(SyntaxKind::VoidExpression),
            SyntaxKind::LessThanToken => {
                if p.options.language_variant == LanguageVariant::Jsx {
                    p.parse_jsx_element_or_self_closing_element_or_fragment(true, None, None, true)
                } else {
                    p.parse_type_assertion()
                }
            }
            SyntaxKind::AwaitKeyword if p.is_await_expression() => {
                p.parse_keyword_unary_expression(SyntaxKind::AwaitExpression)
            }
            _ => p.parse_update_expression(),
        })
    }

    pub(crate) fn parse_prefix_unary_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let operator = self.current_token();
        self.next_token();
        let operand = self.parse_simple_unary_expression();
        self.finish_node(SyntaxKind::PrefixUnaryExpression, pos, NodePayload::Unary { operator, operand })
    }

    /// `delete x`, `typeof x`, `void x` and `await x`.
    fn parse_keyword_unary_expression(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        let expression = self.parse_simple_unary_expression();
        self.finish_node(kind, pos, NodePayload::ExpressionWrapper { expression })
    }

    fn is_await_expression(&mut self) -> bool {
        if self.current_token() != SyntaxKind::AwaitKeyword {
            return false;
        }
        self.in_await_context() || self.look_ahead(Self::next_token_is_identifier_or_keyword_or_literal_on_same_line)
    }

    fn parse_type_assertion(&mut self) -> NodeId {
        debug_assert_ne!(self.options.language_variant, LanguageVariant::Jsx);
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanToken, None);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::GreaterThanToken, None);
        let expression = self.parse_simple_unary_expression();
        self.finish_node(
            SyntaxKind::TypeAssertionExpression,
            pos,
            NodePayload::TypeAssertion { type_node, expression },
        )
    }

    fn parse_update_expression(&mut self) -> NodeId {
        if matches!(self.current_token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) {
            let pos = self.node_pos();
            let operator = self.current_token();
            self.next_token();
            let operand = self.parse_left_hand_side_expression_or_higher();
            return self.finish_node(SyntaxKind::PrefixUnaryExpression, pos, NodePayload::Unary { operator, operand });
        }
        if self.options.language_variant == LanguageVariant::Jsx
            && self.current_token() == SyntaxKind::LessThanToken
            && self.look_ahead(Self::next_token_is_identifier_or_keyword_or_greater_than)
        {
            return self.parse_jsx_element_or_self_closing_element_or_fragment(true, None, None, false);
        }

        let expression = self.parse_left_hand_side_expression_or_higher();
        if matches!(self.current_token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            let operator = self.current_token();
            self.next_token();
            let pos = self.arena.range(expression).pos;
            return self.finish_node(
                SyntaxKind::PostfixUnaryExpression,
                pos,
                NodePayload::Unary {
                    operator,
                    operand: expression,
                },
            );
        }
        expression
    }

    fn next_token_is_identifier_or_keyword_or_greater_than(&mut self) -> bool {
        let token = self.next_token();
        token.is_identifier_or_keyword() || token == SyntaxKind::GreaterThanToken
    }

    // ========================================================================
    // Left-hand-side expressions
    // ========================================================================

    pub(crate) fn parse_left_hand_side_expression_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = match self.current_token() {
            SyntaxKind::ImportKeyword if self.look_ahead(Self::next_token_is_open_paren_or_less_than) => {
                // `import(...)`: the keyword is the callee.
                self.source_flags |= NodeFlags::POSSIBLY_CONTAINS_DYNAMIC_IMPORT;
                self.parse_token_node()
            }
            SyntaxKind::ImportKeyword if self.look_ahead(Self::next_token_is_dot) => {
                self.next_token();
                self.next_token();
                let name = self.parse_identifier_name(None);
                let node = self.finish_node(
                    SyntaxKind::MetaProperty,
                    pos,
                    NodePayload::MetaProperty {
                        keyword_token: SyntaxKind::ImportKeyword,
                        name,
                    },
                );
                if self.node_text_value(name) == "meta" {
                    self.source_flags |= NodeFlags::POSSIBLY_CONTAINS_IMPORT_META;
                } else {
                    let text = self.node_text_value(name).to_string();
                    self.parse_error_at_range(
                        name,
                        &messages::_0_IS_NOT_A_VALID_META_PROPERTY_FOR_KEYWORD_1_DID_YOU_MEAN_2,
                        &[&text, "import", "meta"],
                    );
                }
                node
            }
            SyntaxKind::SuperKeyword => self.parse_super_expression(),
            _ => self.parse_member_expression_or_higher(),
        };
        self.parse_call_expression_rest(pos, expression)
    }

    fn next_token_is_open_paren_or_less_than(&mut self) -> bool {
        matches!(self.next_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
    }

    fn next_token_is_dot(&mut self) -> bool {
        self.next_token() == SyntaxKind::DotToken
    }

    fn parse_member_expression_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = self.parse_primary_expression();
        self.parse_member_expression_rest(pos, expression, true)
    }

    fn parse_super_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut expression = self.parse_token_node();
        if self.current_token() == SyntaxKind::LessThanToken {
            let start = self.node_pos();
            if let Some(type_arguments) = self.try_parse(Self::parse_type_arguments_in_expression) {
                let end = self.node_pos();
                self.parse_error_at(start, end, &messages::SUPER_MAY_NOT_USE_TYPE_ARGUMENTS, &[]);
                if !self.is_template_start_of_tagged_template() {
                    expression = self.finish_node(
                        SyntaxKind::ExpressionWithTypeArguments,
                        pos,
                        NodePayload::TypeReference {
                            type_name: expression,
                            type_arguments: Some(type_arguments),
                        },
                    );
                }
            }
        }

        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::DotToken | SyntaxKind::OpenBracketToken
        ) {
            return expression;
        }

        // `super` alone: report and continue as `super.<missing>`.
        self.parse_expected_token(
            SyntaxKind::DotToken,
            Some(&messages::SUPER_MUST_BE_FOLLOWED_BY_AN_ARGUMENT_LIST_OR_MEMBER_ACCESS),
        );
        let name = self.parse_right_side_of_dot(true, true, true);
        self.finish_node(
            SyntaxKind::PropertyAccessExpression,
            pos,
            NodePayload::PropertyAccess {
                expression,
                question_dot_token: None,
                name,
            },
        )
    }

    // ========================================================================
    // Member access, calls and optional chains
    // ========================================================================

    fn is_start_of_optional_property_or_element_access_chain(&mut self) -> bool {
        self.current_token() == SyntaxKind::QuestionDotToken
            && self.look_ahead(|p| {
                let token = p.next_token();
                token.is_identifier_or_keyword()
                    || matches!(token, SyntaxKind::PrivateIdentifier | SyntaxKind::OpenBracketToken)
                    || p.is_template_start_of_tagged_template()
            })
    }

    /// Mark `a?.b!` chains: a non-null assertion continues the optional
    /// chain it wraps.
    fn try_reparse_optional_chain(&mut self, node: NodeId) -> bool {
        if self.arena.data(node).flags.contains(NodeFlags::OPTIONAL_CHAIN) {
            return true;
        }
        if self.arena.kind(node) != SyntaxKind::NonNullExpression {
            return false;
        }
        let mut expression = node;
        while self.arena.kind(expression) == SyntaxKind::NonNullExpression
            && !self.arena.data(expression).flags.contains(NodeFlags::OPTIONAL_CHAIN)
        {
            let NodePayload::ExpressionWrapper { expression: inner } = self.arena.get(expression).payload else {
                break;
            };
            expression = inner;
        }
        if !self.arena.data(expression).flags.contains(NodeFlags::OPTIONAL_CHAIN) {
            return false;
        }
        let mut current = node;
        while self.arena.kind(current) == SyntaxKind::NonNullExpression {
            self.arena.data_mut(current).flags |= NodeFlags::OPTIONAL_CHAIN;
            let NodePayload::ExpressionWrapper { expression: inner } = self.arena.get(current).payload else {
                break;
            };
            current = inner;
        }
        true
    }

    pub(crate) fn parse_member_expression_rest(
        &mut self,
        pos: u32,
        mut expression: NodeId,
        allow_optional_chain: bool,
    ) -> NodeId {
        loop {
            let mut question_dot_token = None;
            let is_property_access = if allow_optional_chain && self.is_start_of_optional_property_or_element_access_chain()
            {
                question_dot_token = Some(self.parse_expected_token(SyntaxKind::QuestionDotToken, None));
                self.current_token().is_identifier_or_keyword() || self.current_token() == SyntaxKind::PrivateIdentifier
            } else {
                self.parse_optional(SyntaxKind::DotToken)
            };

            if is_property_access {
                expression = self.parse_property_access_expression_rest(pos, expression, question_dot_token);
                continue;
            }

            // `@dec[x]` is a computed member name, not an element access.
            if (question_dot_token.is_some() || !self.in_decorator_context())
                && self.parse_optional(SyntaxKind::OpenBracketToken)
            {
                expression = self.parse_element_access_expression_rest(pos, expression, question_dot_token);
                continue;
            }

            if self.is_template_start_of_tagged_template() {
                expression = match self.arena.get(expression).payload {
                    NodePayload::TypeReference {
                        type_name,
                        type_arguments,
                    } if question_dot_token.is_none()
                        && self.arena.kind(expression) == SyntaxKind::ExpressionWithTypeArguments =>
                    {
                        self.parse_tagged_template_rest(pos, type_name, None, type_arguments)
                    }
                    _ => self.parse_tagged_template_rest(pos, expression, question_dot_token, None),
                };
                continue;
            }

            if question_dot_token.is_none() {
                if self.current_token() == SyntaxKind::ExclamationToken && !self.has_preceding_line_break() {
                    self.next_token();
                    expression = self.finish_node(
                        SyntaxKind::NonNullExpression,
                        pos,
                        NodePayload::ExpressionWrapper { expression },
                    );
                    continue;
                }
                if let Some(type_arguments) = self.try_parse(Self::parse_type_arguments_in_expression) {
                    expression = self.finish_node(
                        SyntaxKind::ExpressionWithTypeArguments,
                        pos,
                        NodePayload::TypeReference {
                            type_name: expression,
                            type_arguments: Some(type_arguments),
                        },
                    );
                    continue;
                }
            }

            return expression;
        }
    }

    fn parse_property_access_expression_rest(
        &mut self,
        pos: u32,
        expression: NodeId,
        question_dot_token: Option<NodeId>,
    ) -> NodeId {
        let name = self.parse_right_side_of_dot(true, true, true);
        let is_optional_chain = question_dot_token.is_some() || self.try_reparse_optional_chain(expression);
        if is_optional_chain && self.arena.kind(name) == SyntaxKind::PrivateIdentifier {
            self.parse_error_at_range(name, &messages::AN_OPTIONAL_CHAIN_CANNOT_CONTAIN_PRIVATE_IDENTIFIERS, &[]);
        }
        if let NodePayload::TypeReference {
            type_arguments: Some(type_arguments),
            ..
        } = self.arena.get(expression).payload
        {
            if self.arena.kind(expression) == SyntaxKind::ExpressionWithTypeArguments {
                let range = self.arena.list(type_arguments).range;
                let start = range.pos.saturating_sub(1);
                let end = rsparse_ast::source_file::skip_trivia(self.text, range.end as usize) as u32 + 1;
                self.parse_error_at(
                    start,
                    end,
                    &messages::AN_INSTANTIATION_EXPRESSION_CANNOT_BE_FOLLOWED_BY_A_PROPERTY_ACCESS,
                    &[],
                );
            }
        }
        let flags = if is_optional_chain {
            NodeFlags::OPTIONAL_CHAIN
        } else {
            NodeFlags::NONE
        };
        self.finish_node_with_flags(
            SyntaxKind::PropertyAccessExpression,
            pos,
            NodePayload::PropertyAccess {
                expression,
                question_dot_token,
                name,
            },
            flags,
        )
    }

    fn parse_element_access_expression_rest(
        &mut self,
        pos: u32,
        expression: NodeId,
        question_dot_token: Option<NodeId>,
    ) -> NodeId {
        let argument_expression = if self.current_token() == SyntaxKind::CloseBracketToken {
            self.create_missing_node(
                SyntaxKind::Identifier,
                true,
                Some(&messages::AN_ELEMENT_ACCESS_EXPRESSION_SHOULD_TAKE_AN_ARGUMENT),
                &[],
            )
        } else {
            self.allow_in_and(Self::parse_expression)
        };
        self.parse_expected(SyntaxKind::CloseBracketToken, None);
        let flags = if question_dot_token.is_some() || self.try_reparse_optional_chain(expression) {
            NodeFlags::OPTIONAL_CHAIN
        } else {
            NodeFlags::NONE
        };
        self.finish_node_with_flags(
            SyntaxKind::ElementAccessExpression,
            pos,
            NodePayload::ElementAccess {
                expression,
                question_dot_token,
                argument_expression,
            },
            flags,
        )
    }

    fn parse_tagged_template_rest(
        &mut self,
        pos: u32,
        tag: NodeId,
        question_dot_token: Option<NodeId>,
        type_arguments: Option<ListId>,
    ) -> NodeId {
        let template = if self.current_token() == SyntaxKind::NoSubstitutionTemplateLiteral {
            self.re_scan_template_token(true);
            self.parse_literal_node()
        } else {
            self.parse_template_expression(true)
        };
        let in_chain = question_dot_token.is_some() || self.arena.data(tag).flags.contains(NodeFlags::OPTIONAL_CHAIN);
        if in_chain {
            self.parse_error_at_range(
                template,
                &messages::TAGGED_TEMPLATE_EXPRESSIONS_ARE_NOT_PERMITTED_IN_AN_OPTIONAL_CHAIN,
                &[],
            );
        }
        let flags = if in_chain {
            NodeFlags::OPTIONAL_CHAIN
        } else {
            NodeFlags::NONE
        };
        self.finish_node_with_flags(
            SyntaxKind::TaggedTemplateExpression,
            pos,
            NodePayload::TaggedTemplate {
                tag,
                question_dot_token,
                type_arguments,
                template,
            },
            flags,
        )
    }

    pub(crate) fn parse_call_expression_rest(&mut self, pos: u32, mut expression: NodeId) -> NodeId {
        loop {
            expression = self.parse_member_expression_rest(pos, expression, true);
            let mut type_arguments = None;
            let question_dot_token = self.parse_optional_token(SyntaxKind::QuestionDotToken);
            if question_dot_token.is_some() {
                type_arguments = self.try_parse(Self::parse_type_arguments_in_expression);
                if self.is_template_start_of_tagged_template() {
                    expression = self.parse_tagged_template_rest(pos, expression, question_dot_token, type_arguments);
                    continue;
                }
            }

            if type_arguments.is_some() || self.current_token() == SyntaxKind::OpenParenToken {
                // `f<T>(x)`: lift the instantiation's type arguments onto
                // the call.
                if question_dot_token.is_none() && self.arena.kind(expression) == SyntaxKind::ExpressionWithTypeArguments {
                    if let NodePayload::TypeReference {
                        type_name,
                        type_arguments: lifted,
                    } = self.arena.get(expression).payload
                    {
                        type_arguments = lifted;
                        expression = type_name;
                    }
                }
                let arguments = self.parse_argument_list();
                let flags = if question_dot_token.is_some() || self.try_reparse_optional_chain(expression) {
                    NodeFlags::OPTIONAL_CHAIN
                } else {
                    NodeFlags::NONE
                };
                expression = self.finish_node_with_flags(
                    SyntaxKind::CallExpression,
                    pos,
                    NodePayload::Call {
                        expression,
                        question_dot_token,
                        type_arguments,
                        arguments: Some(arguments),
                    },
                    flags,
                );
                continue;
            }

            if question_dot_token.is_some() {
                // `a?.` followed by nothing usable.
                let name = self.create_missing_node(SyntaxKind::Identifier, false, Some(&messages::IDENTIFIER_EXPECTED), &[]);
                expression = self.finish_node_with_flags(
                    SyntaxKind::PropertyAccessExpression,
                    pos,
                    NodePayload::PropertyAccess {
                        expression,
                        question_dot_token,
                        name,
                    },
                    NodeFlags::OPTIONAL_CHAIN,
                );
            }
            return expression;
        }
    }

    fn parse_argument_list(&mut self) -> ListId {
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let arguments = self.parse_delimited_list(ParsingContext::ArgumentExpressions, Self::parse_argument_expression);
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        arguments
    }

    fn parse_argument_expression(&mut self) -> NodeId {
        self.do_outside_of_context(
            NodeFlags::DISALLOW_IN_CONTEXT | NodeFlags::DECORATOR_CONTEXT,
            Self::parse_argument_or_array_literal_element,
        )
    }

    fn parse_argument_or_array_literal_element(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::DotDotDotToken => self.parse_spread_element(),
            SyntaxKind::CommaToken => {
                let pos = self.node_pos();
                self.finish_node(SyntaxKind::OmittedExpression, pos, NodePayload::Token)
            }
            _ => self.parse_assignment_expression_or_higher(true),
        }
    }

    fn parse_spread_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::DotDotDotToken, None);
        let expression = self.parse_assignment_expression_or_higher(true);
        self.finish_node(SyntaxKind::SpreadElement, pos, NodePayload::ExpressionWrapper { expression })
    }

    /// `<T>` directly after an expression, kept only when what follows
    /// cannot continue a comparison.
    fn parse_type_arguments_in_expression(&mut self) -> Option<ListId> {
        if self.context_flags.contains(NodeFlags::JAVASCRIPT_FILE) {
            return None;
        }
        if self.re_scan_less_than_token() != SyntaxKind::LessThanToken {
            return None;
        }
        self.next_token();
        let type_arguments = self.parse_delimited_list(ParsingContext::TypeArguments, Self::parse_type);
        if self.re_scan_greater_token() != SyntaxKind::GreaterThanToken {
            return None;
        }
        self.next_token();
        self.can_follow_type_arguments_in_expression().then_some(type_arguments)
    }

    fn can_follow_type_arguments_in_expression(&mut self) -> bool {
        match self.current_token() {
            // `f<T>(x)` and f<T>`...`.
            SyntaxKind::OpenParenToken | SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => true,
            // `a < b > c` and `a<b>+c` stay comparisons.
            SyntaxKind::LessThanToken | SyntaxKind::GreaterThanToken | SyntaxKind::PlusToken | SyntaxKind::MinusToken => {
                false
            }
            _ => self.has_preceding_line_break() || self.is_binary_operator() || !self.is_start_of_expression(),
        }
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    /// `new new x` and `class extends class extends C {} {}` recurse here
    /// without passing through an assignment expression.
    fn parse_primary_expression(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::Identifier, Self::parse_primary_expression_worker)
    }

    fn parse_primary_expression_worker(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral => return self.parse_literal_node(),
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => return self.parse_token_node(),
            SyntaxKind::OpenParenToken => return self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => return self.parse_array_literal_expression(),
            SyntaxKind::OpenBraceToken => return self.parse_object_literal_expression(),
            SyntaxKind::AsyncKeyword if self.look_ahead(Self::next_token_is_function_keyword_on_same_line) => {
                return self.parse_function_expression()
            }
            SyntaxKind::AtToken => return self.parse_decorated_expression(),
            SyntaxKind::ClassKeyword => {
                let (pos, has_jsdoc) = (self.node_pos(), self.has_preceding_jsdoc_comment());
                return self.parse_class_declaration_or_expression(pos, has_jsdoc, None, SyntaxKind::ClassExpression);
            }
            SyntaxKind::FunctionKeyword => return self.parse_function_expression(),
            SyntaxKind::NewKeyword => return self.parse_new_expression_or_new_dot_target(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                if self.re_scan_slash_token() == SyntaxKind::RegularExpressionLiteral {
                    return self.parse_literal_node();
                }
            }
            SyntaxKind::TemplateHead => return self.parse_template_expression(false),
            SyntaxKind::PrivateIdentifier => return self.parse_private_identifier(),
            _ => {}
        }
        self.parse_identifier(Some(&messages::EXPRESSION_EXPECTED))
    }

    fn parse_parenthesized_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        let node = self.finish_node(
            SyntaxKind::ParenthesizedExpression,
            pos,
            NodePayload::ExpressionWrapper { expression },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_array_literal_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let open_bracket_position = self.token_start();
        let open_bracket_parsed = self.parse_expected(SyntaxKind::OpenBracketToken, None);
        let multi_line = self.has_preceding_line_break();
        let elements = self.parse_delimited_list(
            ParsingContext::ArrayLiteralMembers,
            Self::parse_argument_or_array_literal_element,
        );
        self.parse_expected_matching_brackets(
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            open_bracket_parsed,
            open_bracket_position,
        );
        self.finish_node(
            SyntaxKind::ArrayLiteralExpression,
            pos,
            NodePayload::ArrayLiteral { elements, multi_line },
        )
    }

    pub(crate) fn parse_object_literal_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let open_brace_position = self.token_start();
        let open_brace_parsed = self.parse_expected(SyntaxKind::OpenBraceToken, None);
        let multi_line = self.has_preceding_line_break();
        let properties = self.parse_delimited_list_allowing_semicolons(
            ParsingContext::ObjectLiteralMembers,
            Self::parse_object_literal_element,
        );
        self.parse_expected_matching_brackets(
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            open_brace_parsed,
            open_brace_position,
        );
        self.finish_node(
            SyntaxKind::ObjectLiteralExpression,
            pos,
            NodePayload::ObjectLiteral { properties, multi_line },
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();

        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression_or_higher(true);
            let node = self.finish_node(
                SyntaxKind::SpreadAssignment,
                pos,
                NodePayload::ExpressionWrapper { expression },
            );
            return self.with_jsdoc(node, has_jsdoc);
        }

        let modifiers = self.parse_modifiers(true, false, false);
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::GetAccessor, SignatureFlags::NONE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::SetAccessor, SignatureFlags::NONE);
        }

        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
        let token_is_identifier = self.is_identifier();
        let name = self.parse_property_name();

        // Disallowed, but parsed for better errors later.
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        let exclamation_token = self.parse_optional_token(SyntaxKind::ExclamationToken);

        if asterisk_token.is_some()
            || matches!(self.current_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
        {
            return self.parse_method_declaration(
                pos,
                has_jsdoc,
                modifiers,
                asterisk_token,
                name,
                question_token,
                exclamation_token,
                None,
            );
        }

        // `{ a }` and `{ a = 1 }` (the latter only valid as a pattern).
        let node = if token_is_identifier && self.current_token() != SyntaxKind::ColonToken {
            let equals_token = self.parse_optional_token(SyntaxKind::EqualsToken);
            let object_assignment_initializer = equals_token
                .is_some()
                .then(|| self.allow_in_and(|p| p.parse_assignment_expression_or_higher(true)));
            self.finish_node(
                SyntaxKind::ShorthandPropertyAssignment,
                pos,
                NodePayload::ShorthandPropertyAssignment {
                    modifiers,
                    name,
                    question_token,
                    exclamation_token,
                    equals_token,
                    object_assignment_initializer,
                },
            )
        } else {
            self.parse_expected(SyntaxKind::ColonToken, None);
            let initializer = self.allow_in_and(|p| p.parse_assignment_expression_or_higher(true));
            self.finish_node(
                SyntaxKind::PropertyAssignment,
                pos,
                NodePayload::PropertyAssignment {
                    modifiers,
                    name,
                    question_token,
                    exclamation_token,
                    initializer,
                },
            )
        };
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_function_expression(&mut self) -> NodeId {
        self.do_outside_of_context(NodeFlags::DECORATOR_CONTEXT, |p| {
            let pos = p.node_pos();
            let has_jsdoc = p.has_preceding_jsdoc_comment();
            let modifiers = p.parse_modifiers(false, false, false);
            p.parse_expected(SyntaxKind::FunctionKeyword, None);
            let asterisk_token = p.parse_optional_token(SyntaxKind::AsteriskToken);

            let mut flags = SignatureFlags::NONE;
            if asterisk_token.is_some() {
                flags |= SignatureFlags::YIELD;
            }
            if p.has_modifier(modifiers, SyntaxKind::AsyncKeyword) {
                flags |= SignatureFlags::AWAIT;
            }

            // The name of a generator or async function expression is in
            // its own body's context.
            let name = match (flags.contains(SignatureFlags::YIELD), flags.contains(SignatureFlags::AWAIT)) {
                (true, true) => p.do_in_yield_and_await_context(Self::parse_optional_binding_identifier),
                (true, false) => p.do_in_yield_context(Self::parse_optional_binding_identifier),
                (false, true) => p.do_in_await_context(Self::parse_optional_binding_identifier),
                (false, false) => p.parse_optional_binding_identifier(),
            };

            let type_parameters = p.parse_type_parameters();
            let parameters = p.parse_parameters(flags);
            let type_annotation = p.parse_return_type(SyntaxKind::ColonToken, false);
            let body = p.parse_function_block(flags, None);
            let node = p.finish_node(
                SyntaxKind::FunctionExpression,
                pos,
                NodePayload::FunctionLike {
                    modifiers,
                    asterisk_token,
                    name,
                    question_token: None,
                    exclamation_token: None,
                    type_parameters,
                    parameters,
                    type_annotation,
                    equals_greater_than_token: None,
                    body: Some(body),
                },
            );
            p.with_jsdoc(node, has_jsdoc)
        })
    }

    /// Decorators in expression position must decorate a class expression.
    fn parse_decorated_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers(true, false, false);
        if self.current_token() == SyntaxKind::ClassKeyword {
            return self.parse_class_declaration_or_expression(pos, has_jsdoc, modifiers, SyntaxKind::ClassExpression);
        }
        let end = self.node_pos();
        self.parse_error_at_position(end, 0, &messages::EXPRESSION_EXPECTED, &[]);
        self.finish_node_at(
            SyntaxKind::MissingDeclaration,
            pos,
            end,
            NodePayload::MissingDeclaration { modifiers },
            NodeFlags::NONE,
        )
    }

    fn parse_new_expression_or_new_dot_target(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::NewKeyword, None);
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name(None);
            return self.finish_node(
                SyntaxKind::MetaProperty,
                pos,
                NodePayload::MetaProperty {
                    keyword_token: SyntaxKind::NewKeyword,
                    name,
                },
            );
        }

        let expression_pos = self.node_pos();
        let primary = self.parse_primary_expression();
        let mut expression = self.parse_member_expression_rest(expression_pos, primary, false);
        let mut type_arguments = None;
        if self.arena.kind(expression) == SyntaxKind::ExpressionWithTypeArguments {
            if let NodePayload::TypeReference {
                type_name,
                type_arguments: lifted,
            } = self.arena.get(expression).payload
            {
                type_arguments = lifted;
                expression = type_name;
            }
        }
        if self.current_token() == SyntaxKind::QuestionDotToken {
            let range = self.arena.range(expression);
            let start = rsparse_ast::source_file::skip_trivia(self.text, range.pos as usize).min(range.end as usize);
            let text = &self.text[start..range.end as usize];
            self.parse_error_at_current_token(
                &messages::INVALID_OPTIONAL_CHAIN_FROM_NEW_EXPRESSION_DID_YOU_MEAN_TO_CALL_0,
                &[text],
            );
        }
        let arguments = (self.current_token() == SyntaxKind::OpenParenToken).then(|| self.parse_argument_list());
        self.finish_node(
            SyntaxKind::NewExpression,
            pos,
            NodePayload::Call {
                expression,
                question_dot_token: None,
                type_arguments,
                arguments,
            },
        )
    }

    // ========================================================================
    // Template expressions
    // ========================================================================

    fn parse_template_expression(&mut self, is_tagged_template: bool) -> NodeId {
        let pos = self.node_pos();
        let head = self.parse_template_head(is_tagged_template);
        let spans = self.parse_template_spans(is_tagged_template);
        self.finish_node(SyntaxKind::TemplateExpression, pos, NodePayload::Template { head, spans })
    }

    pub(crate) fn parse_template_head(&mut self, is_tagged_template: bool) -> NodeId {
        if !is_tagged_template
            && self
                .scanner
                .token_flags()
                .contains(rsparse_ast::TokenFlags::CONTAINS_INVALID_ESCAPE)
        {
            self.re_scan_template_head_or_no_substitution_template();
        }
        let head = self.parse_literal_like_node(self.current_token());
        debug_assert_eq!(self.arena.kind(head), SyntaxKind::TemplateHead);
        head
    }

    fn parse_template_spans(&mut self, is_tagged_template: bool) -> ListId {
        let pos = self.node_pos();
        let mut spans = Vec::new();
        loop {
            let span_pos = self.node_pos();
            let expression = self.allow_in_and(Self::parse_expression);
            let literal = self.parse_literal_of_template_span(is_tagged_template);
            spans.push(self.finish_node(
                SyntaxKind::TemplateSpan,
                span_pos,
                NodePayload::TemplateSpan { expression, literal },
            ));
            if self.arena.kind(literal) != SyntaxKind::TemplateMiddle {
                break;
            }
        }
        self.create_node_list(spans, pos, None)
    }

    /// The `}...${` or `}...`` after a template hole. Shared with
    /// template literal types.
    pub(crate) fn parse_literal_of_template_span(&mut self, is_tagged_template: bool) -> NodeId {
        if self.current_token() == SyntaxKind::CloseBraceToken {
            self.re_scan_template_token(is_tagged_template);
            return self.parse_literal_like_node(self.current_token());
        }
        self.create_missing_node(
            SyntaxKind::TemplateTail,
            false,
            Some(&messages::_0_EXPECTED),
            &[token_to_string(SyntaxKind::CloseBraceToken)],
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::Parser;
    use rsparse_ast::{NodeFlags, NodePayload, SyntaxKind};

    fn parse(text: &str) -> rsparse_ast::SourceFile {
        Parser::new("test.ts", text, ParseOptions::default()).parse_source_file()
    }

    fn first_expression(file: &rsparse_ast::SourceFile) -> rsparse_ast::NodeId {
        let statement = file.statements()[0];
        match file.arena.get(statement).payload {
            NodePayload::ExpressionWrapper { expression } => expression,
            _ => panic!("expected an expression statement"),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let file = parse("1+2*3");
        assert!(file.diagnostics().is_empty());
        let expression = first_expression(&file);
        let NodePayload::Binary { left, right, .. } = file.arena.get(expression).payload else {
            panic!("expected a binary expression");
        };
        assert_eq!(file.node_text(left), "1");
        assert_eq!(file.arena.kind(right), SyntaxKind::BinaryExpression);
        assert_eq!(file.node_text(right), "2*3");
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let file = parse("a ** b ** c");
        let expression = first_expression(&file);
        let NodePayload::Binary { left, right, .. } = file.arena.get(expression).payload else {
            panic!("expected a binary expression");
        };
        assert_eq!(file.node_text(left), "a");
        assert_eq!(file.node_text(right), "b ** c");
    }

    #[test]
    fn test_parenthesized_arrow() {
        let file = parse("(x) => x");
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::ArrowFunction);
        let NodePayload::FunctionLike { parameters, .. } = file.arena.get(expression).payload else {
            panic!("expected a function");
        };
        assert_eq!(file.arena.list(parameters).len(), 1);
    }

    #[test]
    fn test_parenthesized_comma_is_not_arrow() {
        let file = parse("(x, y)");
        assert!(file.diagnostics().is_empty());
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::ParenthesizedExpression);
    }

    #[test]
    fn test_async_simple_arrow() {
        let file = parse("async x => x");
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::ArrowFunction);
        assert!(file.diagnostics().is_empty());
    }

    #[test]
    fn test_optional_chain_flags() {
        let file = parse("a?.b.c");
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::PropertyAccessExpression);
        assert!(file.arena.data(expression).flags.contains(NodeFlags::OPTIONAL_CHAIN));
    }

    #[test]
    fn test_instantiation_call_lifts_type_arguments() {
        let file = parse("f<string>(x)");
        let expression = first_expression(&file);
        let NodePayload::Call {
            expression: callee,
            type_arguments,
            ..
        } = file.arena.get(expression).payload
        else {
            panic!("expected a call");
        };
        assert_eq!(file.arena.kind(callee), SyntaxKind::Identifier);
        assert!(type_arguments.is_some());
    }

    #[test]
    fn test_less_than_comparison_stays_binary() {
        let file = parse("a < b > c");
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn test_as_expression() {
        let file = parse("x as string");
        let expression = first_expression(&file);
        assert_eq!(file.arena.kind(expression), SyntaxKind::AsExpression);
    }

    #[test]
    fn test_import_meta_sets_flag() {
        let file = parse("import.meta.url");
        assert!(file.diagnostics().is_empty());
        let root = file.arena.data(file.root);
        assert!(root.flags.contains(NodeFlags::POSSIBLY_CONTAINS_IMPORT_META));
    }

    #[test]
    fn test_template_expression_spans() {
        let file = parse("`a${b}c${d}e`");
        let expression = first_expression(&file);
        let NodePayload::Template { spans, .. } = file.arena.get(expression).payload else {
            panic!("expected a template");
        };
        assert_eq!(file.arena.list(spans).len(), 2);
    }

    #[test]
    fn test_unary_before_exponent_is_error() {
        let file = parse("-x ** 2");
        assert_eq!(file.diagnostics().len(), 1);
    }

    #[test]
    fn test_object_literal_members() {
        let file = parse("({ a, b: 1, c() {}, get d() { return 1 }, ...e })");
        assert!(file.diagnostics().is_empty());
    }
}
