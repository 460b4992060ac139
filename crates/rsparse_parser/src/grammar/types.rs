//! Type syntax: function and constructor types, conditional, union and
//! intersection types, type operators, postfix and primary types. The
//! JSDoc-only forms (`*`, `?T`, `T=`, `function(...)`) live here too since
//! ordinary type positions accept them for recovery.

use super::SignatureFlags;
use crate::list::ParsingContext;
use crate::parser::Parser;
use rsparse_ast::{ListId, NodeFlags, NodeId, NodePayload, SyntaxKind};
use rsparse_diagnostics::{messages, DiagnosticMessage};

impl<'a> Parser<'a> {
    // ========================================================================
    // Start predicates
    // ========================================================================

    pub(crate) fn is_start_of_type(&mut self, in_start_of_parameter: bool) -> bool {
        match self.current_token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::UniqueKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::BarToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::NewKeyword
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::AsteriskToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DotDotDotToken
            | SyntaxKind::InferKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::AssertsKeyword
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead => true,
            SyntaxKind::FunctionKeyword => !in_start_of_parameter,
            SyntaxKind::MinusToken => {
                !in_start_of_parameter && self.look_ahead(Self::next_token_is_numeric_or_big_int_literal)
            }
            SyntaxKind::OpenParenToken => {
                // Only `(` that opens a parenthesized or function type; a
                // parameter start never does.
                !in_start_of_parameter && self.look_ahead(Self::is_start_of_parenthesized_or_function_type)
            }
            _ => self.is_identifier(),
        }
    }

    fn is_start_of_parenthesized_or_function_type(&mut self) -> bool {
        self.next_token();
        self.current_token() == SyntaxKind::CloseParenToken || self.is_start_of_parameter(false) || self.is_start_of_type(false)
    }

    fn next_token_is_numeric_or_big_int_literal(&mut self) -> bool {
        matches!(self.next_token(), SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral)
    }

    fn next_token_is_start_of_type(&mut self) -> bool {
        self.next_token();
        self.is_start_of_type(false)
    }

    fn is_start_of_function_type_or_constructor_type(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::OpenParenToken => self.look_ahead(Self::is_unambiguously_start_of_function_type),
            SyntaxKind::AbstractKeyword => self.look_ahead(|p| p.next_token() == SyntaxKind::NewKeyword),
            _ => false,
        }
    }

    /// After `(`: a parameter list followed by `=>`, as opposed to a
    /// parenthesized type.
    fn is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next_token();
        if matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken
        ) {
            // `( )` or `( ...`
            return true;
        }
        if self.skip_parameter_start() {
            // `(x:`, `(x,`, `(x?` and `(x=` only start parameters.
            if matches!(
                self.current_token(),
                SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::QuestionToken | SyntaxKind::EqualsToken
            ) {
                return true;
            }
            if self.current_token() == SyntaxKind::CloseParenToken
                && self.next_token() == SyntaxKind::EqualsGreaterThanToken
            {
                // `(x) =>`
                return true;
            }
        }
        false
    }

    fn skip_parameter_start(&mut self) -> bool {
        if self.current_token().is_modifier_kind() {
            self.parse_modifiers(false, false, false);
        }
        if self.is_identifier() || self.current_token() == SyntaxKind::ThisKeyword {
            self.next_token();
            return true;
        }
        if matches!(
            self.current_token(),
            SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
        ) {
            // A destructuring pattern counts only if it parsed cleanly.
            let error_count = self.diagnostics.len();
            self.parse_identifier_or_pattern(None);
            return error_count == self.diagnostics.len();
        }
        false
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn parse_type(&mut self) -> NodeId {
        self.with_nesting_guard(SyntaxKind::TypeReference, |p| {
            // Types never see the yield or await context of the code around
            // them.
            p.do_outside_of_context(NodeFlags::TYPE_EXCLUDES_FLAGS, Self::parse_type_worker)
        })
    }

    fn parse_type_worker(&mut self) -> NodeId {
        if self.is_start_of_function_type_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let pos = self.node_pos();
        let check_type = self.parse_union_type_or_higher();
        if !self.in_disallow_conditional_types_context()
            && !self.has_preceding_line_break()
            && self.parse_optional(SyntaxKind::ExtendsKeyword)
        {
            // The extends clause is parsed with conditional types disallowed
            // so that `infer U extends X ? ...` binds the constraint.
            let extends_type = self.disallow_conditional_types_and(Self::parse_type);
            self.parse_expected(SyntaxKind::QuestionToken, None);
            let true_type = self.allow_conditional_types_and(Self::parse_type);
            self.parse_expected(SyntaxKind::ColonToken, None);
            let false_type = self.allow_conditional_types_and(Self::parse_type);
            return self.finish_node(
                SyntaxKind::ConditionalType,
                pos,
                NodePayload::ConditionalType {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            );
        }
        check_type
    }

    /// A return type that may be a `x is T` predicate.
    pub(crate) fn parse_type_or_type_predicate(&mut self) -> NodeId {
        let pos = self.node_pos();
        let parameter_name = if self.is_identifier() {
            self.try_parse(Self::parse_type_predicate_prefix)
        } else {
            None
        };
        let type_node = self.parse_type();
        match parameter_name {
            Some(parameter_name) => self.finish_node(
                SyntaxKind::TypePredicate,
                pos,
                NodePayload::TypePredicate {
                    asserts_modifier: None,
                    parameter_name,
                    type_node: Some(type_node),
                },
            ),
            None => type_node,
        }
    }

    fn parse_type_predicate_prefix(&mut self) -> Option<NodeId> {
        let id = self.parse_identifier(None);
        if self.current_token() == SyntaxKind::IsKeyword && !self.has_preceding_line_break() {
            self.next_token();
            return Some(id);
        }
        None
    }

    fn parse_function_or_constructor_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers_for_constructor_type();
        let is_constructor_type = self.parse_optional(SyntaxKind::NewKeyword);
        debug_assert!(
            modifiers.is_none() || is_constructor_type,
            "only constructor types may carry modifiers"
        );
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::TYPE);
        let type_annotation = self.parse_return_type(SyntaxKind::EqualsGreaterThanToken, false);
        let kind = if is_constructor_type {
            SyntaxKind::ConstructorType
        } else {
            SyntaxKind::FunctionType
        };
        let node = self.finish_node(
            kind,
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
                equals_greater_than_token: None,
                body: None,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    // ========================================================================
    // Unions and intersections
    // ========================================================================

    fn parse_union_type_or_higher(&mut self) -> NodeId {
        self.parse_union_or_intersection_type(SyntaxKind::BarToken, SyntaxKind::UnionType, Self::parse_intersection_type_or_higher)
    }

    fn parse_intersection_type_or_higher(&mut self) -> NodeId {
        self.parse_union_or_intersection_type(
            SyntaxKind::AmpersandToken,
            SyntaxKind::IntersectionType,
            Self::parse_type_operator_or_higher,
        )
    }

    fn parse_union_or_intersection_type(
        &mut self,
        operator: SyntaxKind,
        kind: SyntaxKind,
        parse_constituent_type: fn(&mut Self) -> NodeId,
    ) -> NodeId {
        let pos = self.node_pos();
        let is_union_type = operator == SyntaxKind::BarToken;
        let has_leading_operator = self.parse_optional(operator);
        let first = if has_leading_operator {
            self.parse_function_or_constructor_type_to_error(is_union_type)
        } else {
            None
        };
        let first = match first {
            Some(first) => first,
            None => parse_constituent_type(self),
        };

        if self.current_token() != operator && !has_leading_operator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            let constituent = match self.parse_function_or_constructor_type_to_error(is_union_type) {
                Some(constituent) => constituent,
                None => parse_constituent_type(self),
            };
            types.push(constituent);
        }
        let types = self.create_node_list(types, pos, None);
        self.finish_node(kind, pos, NodePayload::UnionOrIntersection { types })
    }

    /// `A | () => B`: parsed, but it needs parentheses.
    fn parse_function_or_constructor_type_to_error(&mut self, is_in_union_type: bool) -> Option<NodeId> {
        if !self.is_start_of_function_type_or_constructor_type() {
            return None;
        }
        let type_node = self.parse_function_or_constructor_type();
        let message: &DiagnosticMessage = match (self.arena.kind(type_node), is_in_union_type) {
            (SyntaxKind::FunctionType, true) => &messages::FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE,
            (SyntaxKind::FunctionType, false) => {
                &messages::FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE
            }
            (_, true) => &messages::CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE,
            (_, false) => &messages::CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE,
        };
        self.parse_error_at_range(type_node, message, &[]);
        Some(type_node)
    }

    // ========================================================================
    // Type operators
    // ========================================================================

    fn parse_type_operator_or_higher(&mut self) -> NodeId {
        match self.current_token() {
            operator @ (SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword) => {
                self.with_nesting_guard(SyntaxKind::TypeReference, |p| p.parse_type_operator(operator))
            }
            SyntaxKind::InferKeyword => self.parse_infer_type(),
            _ => self.allow_conditional_types_and(Self::parse_postfix_type_or_higher),
        }
    }

    fn parse_type_operator(&mut self, operator: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(operator, None);
        let type_node = self.parse_type_operator_or_higher();
        self.finish_node(SyntaxKind::TypeOperator, pos, NodePayload::TypeOperator { operator, type_node })
    }

    fn parse_infer_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::InferKeyword, None);
        let type_parameter = self.parse_type_parameter_of_infer_type();
        self.finish_node(SyntaxKind::InferType, pos, NodePayload::InferType { type_parameter })
    }

    fn parse_type_parameter_of_infer_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = self.parse_identifier(None);
        let constraint = self.try_parse(Self::try_parse_constraint_of_infer_type);
        self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodePayload::TypeParameter {
                modifiers: None,
                name,
                constraint,
                default: None,
                expression: None,
            },
        )
    }

    /// `infer U extends X`, unless the `extends` actually starts a
    /// conditional type: `infer U extends X ? A : B`.
    fn try_parse_constraint_of_infer_type(&mut self) -> Option<NodeId> {
        if !self.parse_optional(SyntaxKind::ExtendsKeyword) {
            return None;
        }
        let constraint = self.disallow_conditional_types_and(Self::parse_type);
        (self.in_disallow_conditional_types_context() || self.current_token() != SyntaxKind::QuestionToken)
            .then_some(constraint)
    }

    // ========================================================================
    // Postfix types
    // ========================================================================

    fn parse_postfix_type_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut type_node = self.parse_non_array_type();
        while !self.has_preceding_line_break() {
            match self.current_token() {
                SyntaxKind::ExclamationToken => {
                    self.next_token();
                    type_node = self.finish_node(
                        SyntaxKind::JSDocNonNullableType,
                        pos,
                        NodePayload::WrappedType { type_node, postfix: true },
                    );
                }
                SyntaxKind::QuestionToken => {
                    // `T ? A : B` in a conditional is not a nullable type.
                    if self.look_ahead(Self::next_token_is_start_of_type) {
                        return type_node;
                    }
                    self.next_token();
                    type_node = self.finish_node(
                        SyntaxKind::JSDocNullableType,
                        pos,
                        NodePayload::WrappedType { type_node, postfix: true },
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.parse_expected(SyntaxKind::OpenBracketToken, None);
                    if self.is_start_of_type(false) {
                        let index_type = self.parse_type();
                        self.parse_expected(SyntaxKind::CloseBracketToken, None);
                        type_node = self.finish_node(
                            SyntaxKind::IndexedAccessType,
                            pos,
                            NodePayload::IndexedAccessType {
                                object_type: type_node,
                                index_type,
                            },
                        );
                    } else {
                        self.parse_expected(SyntaxKind::CloseBracketToken, None);
                        type_node = self.finish_node(
                            SyntaxKind::ArrayType,
                            pos,
                            NodePayload::ArrayType { element_type: type_node },
                        );
                    }
                }
                _ => return type_node,
            }
        }
        type_node
    }

    // ========================================================================
    // Primary types
    // ========================================================================

    fn parse_non_array_type(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::ObjectKeyword => {
                // `string.x` is a qualified name that happens to start with
                // a keyword.
                match self.try_parse(Self::parse_keyword_and_no_dot) {
                    Some(keyword) => keyword,
                    None => self.parse_type_reference(),
                }
            }
            SyntaxKind::AsteriskEqualsToken | SyntaxKind::AsteriskToken => {
                // `*=` in `{*=}` is an optional all-type.
                if self.current_token() == SyntaxKind::AsteriskEqualsToken {
                    self.re_scan_asterisk_equals_token();
                }
                let pos = self.node_pos();
                self.next_token();
                self.finish_node(SyntaxKind::JSDocAllType, pos, NodePayload::Token)
            }
            SyntaxKind::QuestionQuestionToken | SyntaxKind::QuestionToken => {
                if self.current_token() == SyntaxKind::QuestionQuestionToken {
                    self.re_scan_question_token();
                }
                self.parse_jsdoc_unknown_or_nullable_type()
            }
            SyntaxKind::FunctionKeyword => self.parse_jsdoc_function_type(),
            SyntaxKind::ExclamationToken => {
                let pos = self.node_pos();
                self.next_token();
                let type_node = self.parse_non_array_type();
                self.finish_node(
                    SyntaxKind::JSDocNonNullableType,
                    pos,
                    NodePayload::WrappedType {
                        type_node,
                        postfix: false,
                    },
                )
            }
            SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.parse_literal_type_node(false),
            SyntaxKind::MinusToken => {
                if self.look_ahead(Self::next_token_is_numeric_or_big_int_literal) {
                    self.parse_literal_type_node(true)
                } else {
                    self.parse_type_reference()
                }
            }
            SyntaxKind::VoidKeyword => self.parse_token_node(),
            SyntaxKind::ThisKeyword => {
                let this_type = self.parse_this_type_node();
                if self.current_token() == SyntaxKind::IsKeyword && !self.has_preceding_line_break() {
                    self.parse_this_type_predicate(this_type)
                } else {
                    this_type
                }
            }
            SyntaxKind::TypeOfKeyword => {
                if self.look_ahead(|p| p.next_token() == SyntaxKind::ImportKeyword) {
                    self.parse_import_type()
                } else {
                    self.parse_type_query()
                }
            }
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(Self::is_start_of_mapped_type) {
                    self.parse_mapped_type()
                } else {
                    self.parse_type_literal()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_type(),
            SyntaxKind::ImportKeyword => self.parse_import_type(),
            SyntaxKind::AssertsKeyword => {
                if self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line) {
                    self.parse_asserts_type_predicate()
                } else {
                    self.parse_type_reference()
                }
            }
            SyntaxKind::TemplateHead => self.parse_template_type(),
            _ => self.parse_type_reference(),
        }
    }

    fn parse_keyword_and_no_dot(&mut self) -> Option<NodeId> {
        let node = self.parse_token_node();
        (self.current_token() != SyntaxKind::DotToken).then_some(node)
    }

    fn parse_jsdoc_unknown_or_nullable_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        // Skip the `?`.
        self.next_token();

        // A lone `?` means an unknown type; otherwise it prefixes a
        // nullable one: `?number`.
        if matches!(
            self.current_token(),
            SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::BarToken
        ) {
            return self.finish_node(SyntaxKind::JSDocUnknownType, pos, NodePayload::Token);
        }
        let type_node = self.parse_type();
        self.finish_node(
            SyntaxKind::JSDocNullableType,
            pos,
            NodePayload::WrappedType {
                type_node,
                postfix: false,
            },
        )
    }

    /// Closure-style `function(string, number): boolean`.
    fn parse_jsdoc_function_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        if self.try_parse(|p| p.next_token_is_open_paren().then_some(())).is_some() {
            let parameters = self.parse_parameters(SignatureFlags::TYPE | SignatureFlags::JSDOC);
            let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, false);
            let node = self.finish_node(
                SyntaxKind::JSDocFunctionType,
                pos,
                NodePayload::FunctionLike {
                    modifiers: None,
                    asterisk_token: None,
                    name: None,
                    question_token: None,
                    exclamation_token: None,
                    type_parameters: None,
                    parameters,
                    type_annotation,
                    equals_greater_than_token: None,
                    body: None,
                },
            );
            return self.with_jsdoc(node, has_jsdoc);
        }
        let type_name = self.parse_identifier_name(None);
        self.finish_node(
            SyntaxKind::TypeReference,
            pos,
            NodePayload::TypeReference {
                type_name,
                type_arguments: None,
            },
        )
    }

    /// A parameter of a JSDoc function type: a bare type, or `this: T` and
    /// `new: T`.
    pub(crate) fn parse_jsdoc_parameter(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = if matches!(self.current_token(), SyntaxKind::ThisKeyword | SyntaxKind::NewKeyword) {
            let name = self.parse_identifier_name(None);
            self.parse_expected(SyntaxKind::ColonToken, None);
            name
        } else {
            // Unnamed: the name is a zero-width placeholder.
            self.create_missing_node(SyntaxKind::Identifier, false, None, &[])
        };
        let type_annotation = Some(self.parse_jsdoc_type());
        self.finish_node(
            SyntaxKind::Parameter,
            pos,
            NodePayload::Parameter {
                modifiers: None,
                dot_dot_dot_token: None,
                name,
                question_token: None,
                type_annotation,
                initializer: None,
            },
        )
    }

    /// A type inside a JSDoc `{...}`: `module:path`, `...T` and `T=` on
    /// top of the ordinary grammar.
    pub(crate) fn parse_jsdoc_type(&mut self) -> NodeId {
        self.scanner.set_skip_jsdoc_leading_asterisks(true);
        let pos = self.node_pos();
        if self.parse_optional(SyntaxKind::ModuleKeyword) {
            // `module:foo/bar` is kept as an opaque name path.
            while !matches!(
                self.current_token(),
                SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::WhitespaceTrivia
            ) {
                self.next_token_jsdoc();
            }
            self.scanner.set_skip_jsdoc_leading_asterisks(false);
            return self.finish_node(SyntaxKind::JSDocNamepathType, pos, NodePayload::Token);
        }

        let has_dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
        let mut type_node = self.parse_type_or_type_predicate();
        self.scanner.set_skip_jsdoc_leading_asterisks(false);
        if has_dot_dot_dot {
            type_node = self.finish_node(
                SyntaxKind::JSDocVariadicType,
                pos,
                NodePayload::WrappedType {
                    type_node,
                    postfix: false,
                },
            );
        }
        if self.current_token() == SyntaxKind::EqualsToken {
            self.next_token();
            return self.finish_node(
                SyntaxKind::JSDocOptionalType,
                pos,
                NodePayload::WrappedType { type_node, postfix: true },
            );
        }
        type_node
    }

    fn parse_literal_type_node(&mut self, negative: bool) -> NodeId {
        let pos = self.node_pos();
        if negative {
            self.next_token();
        }
        let mut literal = match self.current_token() {
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword => self.parse_token_node(),
            token => self.parse_literal_like_node(token),
        };
        if negative {
            literal = self.finish_node(
                SyntaxKind::PrefixUnaryExpression,
                pos,
                NodePayload::Unary {
                    operator: SyntaxKind::MinusToken,
                    operand: literal,
                },
            );
        }
        self.finish_node(SyntaxKind::LiteralType, pos, NodePayload::LiteralType { literal })
    }

    fn parse_this_type_node(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        self.finish_node(SyntaxKind::ThisType, pos, NodePayload::Token)
    }

    fn parse_this_type_predicate(&mut self, parameter_name: NodeId) -> NodeId {
        self.next_token();
        let type_node = self.parse_type();
        let pos = self.arena.range(parameter_name).pos;
        self.finish_node(
            SyntaxKind::TypePredicate,
            pos,
            NodePayload::TypePredicate {
                asserts_modifier: None,
                parameter_name,
                type_node: Some(type_node),
            },
        )
    }

    fn parse_asserts_type_predicate(&mut self) -> NodeId {
        let pos = self.node_pos();
        let asserts_modifier = Some(self.parse_expected_token(SyntaxKind::AssertsKeyword, None));
        let parameter_name = if self.current_token() == SyntaxKind::ThisKeyword {
            self.parse_this_type_node()
        } else {
            self.parse_identifier(None)
        };
        let type_node = self.parse_optional(SyntaxKind::IsKeyword).then(|| self.parse_type());
        self.finish_node(
            SyntaxKind::TypePredicate,
            pos,
            NodePayload::TypePredicate {
                asserts_modifier,
                parameter_name,
                type_node,
            },
        )
    }

    // ========================================================================
    // References and queries
    // ========================================================================

    fn parse_entity_name_of_type_reference(&mut self) -> NodeId {
        self.parse_entity_name(true, Some(&messages::TYPE_EXPECTED))
    }

    fn parse_type_arguments_of_type_reference(&mut self) -> Option<ListId> {
        if !self.has_preceding_line_break() && self.re_scan_less_than_token() == SyntaxKind::LessThanToken {
            return Some(self.parse_bracketed_list(
                ParsingContext::TypeArguments,
                Self::parse_type,
                SyntaxKind::LessThanToken,
                SyntaxKind::GreaterThanToken,
            ));
        }
        None
    }

    fn parse_type_reference(&mut self) -> NodeId {
        let pos = self.node_pos();
        let type_name = self.parse_entity_name_of_type_reference();
        let type_arguments = self.parse_type_arguments_of_type_reference();
        self.finish_node(
            SyntaxKind::TypeReference,
            pos,
            NodePayload::TypeReference {
                type_name,
                type_arguments,
            },
        )
    }

    fn parse_type_query(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword, None);
        let type_name = self.parse_entity_name(true, None);
        // `typeof x\n<T>() => {}` must not take the type arguments.
        let type_arguments = if self.has_preceding_line_break() {
            None
        } else {
            self.try_parse_type_arguments()
        };
        self.finish_node(
            SyntaxKind::TypeQuery,
            pos,
            NodePayload::TypeReference {
                type_name,
                type_arguments,
            },
        )
    }

    fn parse_import_type(&mut self) -> NodeId {
        self.source_flags |= NodeFlags::POSSIBLY_CONTAINS_DYNAMIC_IMPORT;
        let pos = self.node_pos();
        let is_type_of = self.parse_optional(SyntaxKind::TypeOfKeyword);
        self.parse_expected(SyntaxKind::ImportKeyword, None);
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let argument = self.parse_type();

        let mut attributes = None;
        if self.parse_optional(SyntaxKind::CommaToken) {
            // `import("m", { with: { ... } })`
            let open_brace_position = self.token_start();
            let open_brace_parsed = self.parse_expected(SyntaxKind::OpenBraceToken, None);
            let token = self.current_token();
            let token = if matches!(token, SyntaxKind::WithKeyword | SyntaxKind::AssertKeyword) {
                self.next_token();
                token
            } else {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &["with"]);
                SyntaxKind::WithKeyword
            };
            self.parse_expected(SyntaxKind::ColonToken, None);
            attributes = Some(self.parse_import_attributes(token, true));
            self.parse_expected_matching_brackets(
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                open_brace_parsed,
                open_brace_position,
            );
        }
        self.parse_expected(SyntaxKind::CloseParenToken, None);

        let qualifier = self
            .parse_optional(SyntaxKind::DotToken)
            .then(|| self.parse_entity_name_of_type_reference());
        let type_arguments = self.parse_type_arguments_of_type_reference();
        self.finish_node(
            SyntaxKind::ImportType,
            pos,
            NodePayload::ImportType {
                is_type_of,
                argument,
                attributes,
                qualifier,
                type_arguments,
            },
        )
    }

    // ========================================================================
    // Object-like types
    // ========================================================================

    fn parse_type_literal(&mut self) -> NodeId {
        let pos = self.node_pos();
        let members = self.parse_object_type_members();
        self.finish_node(SyntaxKind::TypeLiteral, pos, NodePayload::TypeLiteral { members })
    }

    /// `{ [K in ...` or `{ readonly [K in ...`, with `+`/`-` modifiers.
    fn is_start_of_mapped_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.current_token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            return self.next_token() == SyntaxKind::ReadonlyKeyword;
        }
        if self.current_token() == SyntaxKind::ReadonlyKeyword {
            self.next_token();
        }
        self.current_token() == SyntaxKind::OpenBracketToken
            && self.next_token_is_identifier()
            && self.next_token() == SyntaxKind::InKeyword
    }

    fn parse_mapped_type_parameter(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = self.parse_identifier_name(None);
        self.parse_expected(SyntaxKind::InKeyword, None);
        let constraint = Some(self.parse_type());
        self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodePayload::TypeParameter {
                modifiers: None,
                name,
                constraint,
                default: None,
                expression: None,
            },
        )
    }

    fn parse_mapped_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken, None);

        let mut readonly_token = None;
        if matches!(
            self.current_token(),
            SyntaxKind::ReadonlyKeyword | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            let token = self.parse_token_node();
            if self.arena.kind(token) != SyntaxKind::ReadonlyKeyword {
                self.parse_expected(SyntaxKind::ReadonlyKeyword, None);
            }
            readonly_token = Some(token);
        }

        self.parse_expected(SyntaxKind::OpenBracketToken, None);
        let type_parameter = self.parse_mapped_type_parameter();
        let name_type = self.parse_optional(SyntaxKind::AsKeyword).then(|| self.parse_type());
        self.parse_expected(SyntaxKind::CloseBracketToken, None);

        let mut question_token = None;
        if matches!(
            self.current_token(),
            SyntaxKind::QuestionToken | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            let token = self.parse_token_node();
            if self.arena.kind(token) != SyntaxKind::QuestionToken {
                self.parse_expected(SyntaxKind::QuestionToken, None);
            }
            question_token = Some(token);
        }

        let type_node = self.parse_type_annotation();
        self.parse_semicolon();
        // Members after the mapping are an error, kept for recovery.
        let members = self.parse_list(ParsingContext::TypeMembers, Self::parse_type_member);
        self.parse_expected(SyntaxKind::CloseBraceToken, None);
        self.finish_node(
            SyntaxKind::MappedType,
            pos,
            NodePayload::MappedType {
                readonly_token,
                type_parameter,
                name_type,
                question_token,
                type_node,
                members: Some(members),
            },
        )
    }

    fn parse_tuple_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let elements = self.parse_bracketed_list(
            ParsingContext::TupleElementTypes,
            Self::parse_tuple_element_name_or_tuple_element_type,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        );
        self.finish_node(SyntaxKind::TupleType, pos, NodePayload::TupleType { elements })
    }

    fn is_next_token_colon_or_question_colon(&mut self) -> bool {
        self.next_token() == SyntaxKind::ColonToken
            || (self.current_token() == SyntaxKind::QuestionToken && self.next_token() == SyntaxKind::ColonToken)
    }

    fn is_tuple_element_name(&mut self) -> bool {
        if self.current_token() == SyntaxKind::DotDotDotToken {
            return self.next_token().is_identifier_or_keyword() && self.is_next_token_colon_or_question_colon();
        }
        self.current_token().is_identifier_or_keyword() && self.is_next_token_colon_or_question_colon()
    }

    fn parse_tuple_element_name_or_tuple_element_type(&mut self) -> NodeId {
        if !self.look_ahead(Self::is_tuple_element_name) {
            return self.parse_tuple_element_type();
        }
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name(None);
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        self.parse_expected(SyntaxKind::ColonToken, None);
        let type_node = self.parse_tuple_element_type();
        let node = self.finish_node(
            SyntaxKind::NamedTupleMember,
            pos,
            NodePayload::NamedTupleMember {
                dot_dot_dot_token,
                name,
                question_token,
                type_node,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_tuple_element_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return self.finish_node(
                SyntaxKind::RestType,
                pos,
                NodePayload::WrappedType {
                    type_node,
                    postfix: false,
                },
            );
        }
        let type_node = self.parse_type();
        // `[T?]`: the postfix nullable form means an optional element.
        if self.arena.kind(type_node) == SyntaxKind::JSDocNullableType {
            if let NodePayload::WrappedType {
                type_node: inner,
                postfix: true,
            } = self.arena.get(type_node).payload
            {
                if self.arena.range(type_node).pos == self.arena.range(inner).pos {
                    self.arena.data_mut(type_node).kind = SyntaxKind::OptionalType;
                }
            }
        }
        type_node
    }

    fn parse_parenthesized_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        self.finish_node(
            SyntaxKind::ParenthesizedType,
            pos,
            NodePayload::WrappedType {
                type_node,
                postfix: false,
            },
        )
    }

    // ========================================================================
    // Template literal types
    // ========================================================================

    fn parse_template_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let head = self.parse_template_head(false);
        let spans_pos = self.node_pos();
        let mut spans = Vec::new();
        loop {
            let span_pos = self.node_pos();
            let type_node = self.parse_type();
            let literal = self.parse_literal_of_template_span(false);
            spans.push(self.finish_node(
                SyntaxKind::TemplateLiteralTypeSpan,
                span_pos,
                NodePayload::TemplateSpan {
                    expression: type_node,
                    literal,
                },
            ));
            if self.arena.kind(literal) != SyntaxKind::TemplateMiddle {
                break;
            }
        }
        let spans = self.create_node_list(spans, spans_pos, None);
        self.finish_node(SyntaxKind::TemplateLiteralType, pos, NodePayload::Template { head, spans })
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::Parser;
    use rsparse_ast::{NodeId, NodePayload, SourceFile, SyntaxKind};

    /// Parse `type T = <text>;` and return the aliased type.
    fn parse_alias(text: &str) -> (SourceFile, NodeId) {
        let source = format!("type T = {text};");
        let file = Parser::new("test.ts", &source, ParseOptions::default()).parse_source_file();
        let statement = file.statements()[0];
        let NodePayload::TypeAlias { type_node, .. } = file.arena.get(statement).payload else {
            panic!("expected a type alias");
        };
        (file, type_node)
    }

    #[test]
    fn test_union_of_keywords() {
        let (file, type_node) = parse_alias("string | number");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::UnionType);
    }

    #[test]
    fn test_conditional_with_infer() {
        let (file, type_node) = parse_alias("T extends Array<infer U> ? U : never");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::ConditionalType);
    }

    #[test]
    fn test_function_type() {
        let (file, type_node) = parse_alias("(a: string, b?: number) => void");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::FunctionType);
    }

    #[test]
    fn test_parenthesized_type_is_not_function() {
        let (file, type_node) = parse_alias("(string)[]");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::ArrayType);
    }

    #[test]
    fn test_mapped_type() {
        let (file, type_node) = parse_alias("{ readonly [K in keyof T]?: T[K] }");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::MappedType);
    }

    #[test]
    fn test_named_tuple_with_optional_and_rest() {
        let (file, type_node) = parse_alias("[a: string, b?: number, ...rest: boolean[]]");
        assert!(file.diagnostics().is_empty());
        let NodePayload::TupleType { elements } = file.arena.get(type_node).payload else {
            panic!("expected a tuple");
        };
        assert_eq!(file.arena.list(elements).len(), 3);
    }

    #[test]
    fn test_optional_tuple_element() {
        let (file, type_node) = parse_alias("[string?]");
        let NodePayload::TupleType { elements } = file.arena.get(type_node).payload else {
            panic!("expected a tuple");
        };
        let first = file.arena.list(elements).nodes[0];
        assert_eq!(file.arena.kind(first), SyntaxKind::OptionalType);
    }

    #[test]
    fn test_template_literal_type() {
        let (file, type_node) = parse_alias("`a${string}b`");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::TemplateLiteralType);
    }

    #[test]
    fn test_function_type_in_union_needs_parens() {
        let (file, _) = parse_alias("string | () => void");
        assert_eq!(file.diagnostics().len(), 1);
    }

    #[test]
    fn test_import_type_with_qualifier() {
        let (file, type_node) = parse_alias("import('./m').Foo<string>");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(type_node), SyntaxKind::ImportType);
    }
}
