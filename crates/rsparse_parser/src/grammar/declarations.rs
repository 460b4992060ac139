//! Declarations: functions, classes and their members, interfaces, type
//! aliases, enums, namespaces, imports and exports, plus the signature
//! pieces they share (parameters, type parameters, return types).

use crate::grammar::SignatureFlags;
use crate::list::ParsingContext;
use crate::parser::Parser;
use rsparse_ast::{ListId, NodeFlags, NodeId, NodePayload, SyntaxKind};
use rsparse_diagnostics::{messages, DiagnosticMessage};

impl<'a> Parser<'a> {
    pub(crate) fn has_modifier(&self, modifiers: Option<ListId>, kind: SyntaxKind) -> bool {
        self.arena
            .list_nodes(modifiers)
            .iter()
            .any(|&modifier| self.arena.kind(modifier) == kind)
    }

    fn set_await_context(&mut self, value: bool) {
        self.context_flags.set(NodeFlags::AWAIT_CONTEXT, value);
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub(crate) fn parse_function_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let saved_await_context = self.in_await_context();
        self.parse_expected(SyntaxKind::FunctionKeyword, None);
        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);

        // `export default function () {}` may be anonymous.
        let name = if self.has_modifier(modifiers, SyntaxKind::DefaultKeyword) {
            self.parse_optional_binding_identifier()
        } else {
            Some(self.parse_binding_identifier(None))
        };
        let mut flags = SignatureFlags::NONE;
        if asterisk_token.is_some() {
            flags |= SignatureFlags::YIELD;
        }
        if self.has_modifier(modifiers, SyntaxKind::AsyncKeyword) {
            flags |= SignatureFlags::AWAIT;
        }
        let type_parameters = self.parse_type_parameters();
        if self.has_modifier(modifiers, SyntaxKind::ExportKeyword) {
            self.set_await_context(true);
        }
        let parameters = self.parse_parameters(flags);
        let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, Some(&messages::OR_EXPECTED));
        self.set_await_context(saved_await_context);

        let node = self.finish_node(
            SyntaxKind::FunctionDeclaration,
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
                body,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_optional_binding_identifier(&mut self) -> Option<NodeId> {
        self.is_binding_identifier().then(|| self.parse_binding_identifier(None))
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    pub(crate) fn parse_type_parameters(&mut self) -> Option<ListId> {
        (self.current_token() == SyntaxKind::LessThanToken).then(|| {
            self.parse_bracketed_list(
                ParsingContext::TypeParameters,
                Self::parse_type_parameter,
                SyntaxKind::LessThanToken,
                SyntaxKind::GreaterThanToken,
            )
        })
    }

    fn parse_type_parameter(&mut self) -> NodeId {
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers(false, true, false);
        let name = self.parse_identifier(None);
        let mut constraint = None;
        let mut expression = None;

        if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            // `<T extends>` with an expression after it is JSDoc-style
            // recovery: keep the expression so the checker can report it.
            if self.is_start_of_type(false) || !self.is_start_of_expression() {
                constraint = Some(self.parse_type());
            } else {
                expression = Some(self.parse_unary_expression_or_higher());
            }
        }
        let default = self.parse_optional(SyntaxKind::EqualsToken).then(|| self.parse_type());

        self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodePayload::TypeParameter {
                modifiers,
                name,
                constraint,
                default,
                expression,
            },
        )
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    pub(crate) fn is_start_of_parameter(&mut self, is_jsdoc_parameter: bool) -> bool {
        let token = self.current_token();
        token == SyntaxKind::DotDotDotToken
            || self.is_binding_identifier_or_private_identifier_or_pattern()
            || token.is_modifier_kind()
            || token == SyntaxKind::AtToken
            || self.is_start_of_type(!is_jsdoc_parameter)
    }

    fn is_parameter_name_start(&self) -> bool {
        self.is_binding_identifier()
            || matches!(
                self.current_token(),
                SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
            )
    }

    /// `( parameters )`, or a missing list when the `(` is absent.
    pub(crate) fn parse_parameters(&mut self, flags: SignatureFlags) -> ListId {
        if !self.parse_expected(SyntaxKind::OpenParenToken, None) {
            return self.create_missing_list();
        }
        let parameters = match self.parse_parameters_worker(flags, true) {
            Some(parameters) => parameters,
            None => self.create_missing_list(),
        };
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        parameters
    }

    /// The parameter list between the parentheses. Without
    /// `allow_ambiguity`, gives up on the first element that cannot start
    /// a parameter, for arrow function speculation.
    pub(crate) fn parse_parameters_worker(&mut self, flags: SignatureFlags, allow_ambiguity: bool) -> Option<ListId> {
        let saved_yield_context = self.in_yield_context();
        let saved_await_context = self.in_await_context();
        self.context_flags.set(NodeFlags::YIELD_CONTEXT, flags.contains(SignatureFlags::YIELD));
        self.set_await_context(flags.contains(SignatureFlags::AWAIT));

        let parameters = if flags.contains(SignatureFlags::JSDOC) {
            Some(self.parse_delimited_list(ParsingContext::JSDocParameters, Self::parse_jsdoc_parameter))
        } else if allow_ambiguity {
            Some(self.parse_delimited_list(ParsingContext::Parameters, |p| p.parse_parameter(saved_await_context)))
        } else {
            self.try_parse_delimited_list(ParsingContext::Parameters, |p| {
                p.parse_parameter_worker(saved_await_context, false)
            })
        };

        self.context_flags.set(NodeFlags::YIELD_CONTEXT, saved_yield_context);
        self.set_await_context(saved_await_context);
        parameters
    }

    pub(crate) fn parse_parameter(&mut self, in_outer_await_context: bool) -> NodeId {
        match self.parse_parameter_worker(in_outer_await_context, true) {
            Some(parameter) => parameter,
            None => unreachable!("ambiguous parameters are always parsed"),
        }
    }

    fn parse_parameter_worker(&mut self, in_outer_await_context: bool, allow_ambiguity: bool) -> Option<NodeId> {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();

        // Decorators on parameters are parsed in the context outside the
        // signature.
        let modifiers = if in_outer_await_context {
            self.do_in_await_context(|p| p.parse_modifiers(true, false, false))
        } else {
            self.do_outside_of_await_context(|p| p.parse_modifiers(true, false, false))
        };

        if self.current_token() == SyntaxKind::ThisKeyword {
            let name = self.create_identifier(true, None, None);
            let type_annotation = self.parse_type_annotation();
            if let Some(&first) = self.arena.list_nodes(modifiers).first() {
                self.parse_error_at_range(first, &messages::DECORATORS_ARE_NOT_VALID_HERE, &[]);
            }
            let node = self.finish_node(
                SyntaxKind::Parameter,
                pos,
                NodePayload::Parameter {
                    modifiers,
                    dot_dot_dot_token: None,
                    name,
                    question_token: None,
                    type_annotation,
                    initializer: None,
                },
            );
            return Some(self.with_jsdoc(node, has_jsdoc));
        }

        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        if !allow_ambiguity && !self.is_parameter_name_start() {
            return None;
        }
        let name = self.parse_name_of_parameter(modifiers);
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        let node = self.finish_node(
            SyntaxKind::Parameter,
            pos,
            NodePayload::Parameter {
                modifiers,
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
                initializer,
            },
        );
        Some(self.with_jsdoc(node, has_jsdoc))
    }

    fn parse_name_of_parameter(&mut self, modifiers: Option<ListId>) -> NodeId {
        let name = self.parse_identifier_or_pattern(Some(&messages::PRIVATE_IDENTIFIERS_CANNOT_BE_USED_AS_PARAMETERS));
        // `(public)` in a JS file or a misplaced modifier: skip it so the
        // list keeps going.
        let range = self.arena.range(name);
        if range.is_empty() && modifiers.is_none() && self.current_token().is_modifier_kind() {
            self.next_token();
        }
        name
    }

    // ========================================================================
    // Return types
    // ========================================================================

    pub(crate) fn parse_return_type(&mut self, return_token: SyntaxKind, is_type: bool) -> Option<NodeId> {
        self.should_parse_return_type(return_token, is_type)
            .then(|| self.allow_conditional_types_and(Self::parse_type_or_type_predicate))
    }

    fn should_parse_return_type(&mut self, return_token: SyntaxKind, is_type: bool) -> bool {
        if return_token == SyntaxKind::EqualsGreaterThanToken {
            self.parse_expected(return_token, None);
            return true;
        }
        if self.parse_optional(SyntaxKind::ColonToken) {
            return true;
        }
        // `(a: T) => U` written where `: U` belongs.
        if is_type && self.current_token() == SyntaxKind::EqualsGreaterThanToken {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[":"]);
            self.next_token();
            return true;
        }
        false
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub(crate) fn parse_class_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        self.parse_class_declaration_or_expression(pos, has_jsdoc, modifiers, SyntaxKind::ClassDeclaration)
    }

    pub(crate) fn parse_class_declaration_or_expression(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        kind: SyntaxKind,
    ) -> NodeId {
        let saved_await_context = self.in_await_context();
        self.parse_expected(SyntaxKind::ClassKeyword, None);

        // `class implements I {}` has no name.
        let name = (self.is_binding_identifier() && !self.is_implements_clause())
            .then(|| self.create_identifier(true, None, None));
        let type_parameters = self.parse_type_parameters();
        if self.has_modifier(modifiers, SyntaxKind::ExportKeyword) {
            self.set_await_context(true);
        }
        let heritage_clauses = self.parse_heritage_clauses();
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            let members = self.parse_list(ParsingContext::ClassMembers, Self::parse_class_element);
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
            members
        } else {
            self.create_missing_list()
        };
        self.set_await_context(saved_await_context);

        let node = self.finish_node(
            kind,
            pos,
            NodePayload::ClassLike {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn is_implements_clause(&mut self) -> bool {
        self.current_token() == SyntaxKind::ImplementsKeyword
            && self.look_ahead(|p| {
                p.next_token();
                p.current_token().is_identifier_or_keyword()
            })
    }

    pub(crate) fn is_heritage_clause(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        )
    }

    /// `extends` or `implements` that begins a new clause rather than
    /// naming a base type.
    pub(crate) fn is_heritage_clause_extends_or_implements_keyword(&mut self) -> bool {
        self.is_heritage_clause()
            && self.look_ahead(|p| {
                p.next_token();
                p.is_start_of_expression()
            })
    }

    fn parse_heritage_clauses(&mut self) -> Option<ListId> {
        self.is_heritage_clause()
            .then(|| self.parse_list(ParsingContext::HeritageClauses, Self::parse_heritage_clause))
    }

    fn parse_heritage_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        let token = self.current_token();
        debug_assert!(matches!(
            token,
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ));
        self.next_token();
        let types = self.parse_delimited_list(
            ParsingContext::HeritageClauseElement,
            Self::parse_expression_with_type_arguments,
        );
        self.finish_node(SyntaxKind::HeritageClause, pos, NodePayload::HeritageClause { token, types })
    }

    fn parse_expression_with_type_arguments(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = self.parse_left_hand_side_expression_or_higher();
        if self.arena.kind(expression) == SyntaxKind::ExpressionWithTypeArguments {
            return expression;
        }
        let type_arguments = self.try_parse_type_arguments();
        self.finish_node(
            SyntaxKind::ExpressionWithTypeArguments,
            pos,
            NodePayload::TypeReference {
                type_name: expression,
                type_arguments,
            },
        )
    }

    pub(crate) fn try_parse_type_arguments(&mut self) -> Option<ListId> {
        (self.current_token() == SyntaxKind::LessThanToken).then(|| {
            self.parse_bracketed_list(
                ParsingContext::TypeArguments,
                Self::parse_type,
                SyntaxKind::LessThanToken,
                SyntaxKind::GreaterThanToken,
            )
        })
    }

    // ========================================================================
    // Class members
    // ========================================================================

    /// Only called inside a lookahead.
    pub(crate) fn is_class_member_start(&mut self) -> bool {
        if self.current_token() == SyntaxKind::AtToken {
            return true;
        }
        let mut id_token = None;

        // Skip modifiers; a class member modifier settles it.
        while self.current_token().is_modifier_kind() {
            let token = self.current_token();
            if matches!(
                token,
                SyntaxKind::PublicKeyword
                    | SyntaxKind::PrivateKeyword
                    | SyntaxKind::ProtectedKeyword
                    | SyntaxKind::ReadonlyKeyword
                    | SyntaxKind::StaticKeyword
                    | SyntaxKind::OverrideKeyword
                    | SyntaxKind::AccessorKeyword
            ) {
                return true;
            }
            id_token = Some(token);
            self.next_token();
        }

        if self.current_token() == SyntaxKind::AsteriskToken {
            return true;
        }
        if self.is_literal_property_name() {
            id_token = Some(self.current_token());
            self.next_token();
        }
        if self.current_token() == SyntaxKind::OpenBracketToken {
            return true;
        }

        match id_token {
            Some(token) => {
                if !token.is_keyword() || matches!(token, SyntaxKind::SetKeyword | SyntaxKind::GetKeyword) {
                    return true;
                }
                match self.current_token() {
                    SyntaxKind::OpenParenToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::ExclamationToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::QuestionToken => true,
                    _ => self.can_parse_semicolon(),
                }
            }
            None => false,
        }
    }

    fn parse_class_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.current_token() == SyntaxKind::SemicolonToken {
            self.next_token();
            return self.finish_node(SyntaxKind::SemicolonClassElement, pos, NodePayload::Token);
        }

        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers(true, true, true);
        if self.current_token() == SyntaxKind::StaticKeyword && self.look_ahead(Self::next_token_is_open_brace) {
            return self.parse_class_static_block_declaration(pos, has_jsdoc, modifiers);
        }
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::GetAccessor, SignatureFlags::NONE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::SetAccessor, SignatureFlags::NONE);
        }
        if matches!(
            self.current_token(),
            SyntaxKind::ConstructorKeyword | SyntaxKind::StringLiteral
        ) {
            if let Some(constructor) = self.try_parse_constructor_declaration(pos, has_jsdoc, modifiers) {
                return constructor;
            }
        }
        if self.is_index_signature() {
            return self.parse_index_signature_declaration(pos, has_jsdoc, modifiers);
        }

        let token = self.current_token();
        if token.is_identifier_or_keyword()
            || matches!(
                token,
                SyntaxKind::PrivateIdentifier
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::OpenBracketToken
            )
        {
            if self.has_modifier(modifiers, SyntaxKind::DeclareKeyword) && !self.in_ambient_context() {
                for &modifier in &self.arena.list_nodes(modifiers).to_vec() {
                    self.arena.data_mut(modifier).flags |= NodeFlags::AMBIENT;
                }
                return self.do_inside_of_context(NodeFlags::AMBIENT, |p| {
                    p.parse_property_or_method_declaration(pos, has_jsdoc, modifiers)
                });
            }
            return self.parse_property_or_method_declaration(pos, has_jsdoc, modifiers);
        }

        // Modifiers or decorators with no member after them: a property
        // with a missing name.
        let name = self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::DECLARATION_EXPECTED), &[]);
        self.parse_property_declaration(pos, has_jsdoc, modifiers, name, None)
    }

    fn parse_class_static_block_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        self.parse_expected_token(SyntaxKind::StaticKeyword, None);
        let saved_yield_context = self.in_yield_context();
        let saved_await_context = self.in_await_context();
        self.context_flags.remove(NodeFlags::YIELD_CONTEXT);
        self.set_await_context(true);
        let body = self.parse_block(false, None);
        self.context_flags.set(NodeFlags::YIELD_CONTEXT, saved_yield_context);
        self.set_await_context(saved_await_context);

        let node = self.finish_node(
            SyntaxKind::ClassStaticBlockDeclaration,
            pos,
            NodePayload::ClassStaticBlock { modifiers, body },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_accessor_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        kind: SyntaxKind,
        flags: SignatureFlags,
    ) -> NodeId {
        let name = self.parse_property_name();
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::NONE);
        let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, None);
        let node = self.finish_node(
            kind,
            pos,
            NodePayload::FunctionLike {
                modifiers,
                asterisk_token: None,
                name: Some(name),
                question_token: None,
                exclamation_token: None,
                type_parameters,
                parameters,
                type_annotation,
                equals_greater_than_token: None,
                body,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    /// `constructor` or `"constructor"` followed by `(`.
    fn parse_constructor_name(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::ConstructorKeyword => self.parse_expected(SyntaxKind::ConstructorKeyword, None),
            SyntaxKind::StringLiteral if self.look_ahead(Self::next_token_is_open_paren) => self
                .try_parse(|p| {
                    let literal = p.parse_literal_node();
                    (p.node_text_value(literal) == "constructor").then_some(())
                })
                .is_some(),
            _ => false,
        }
    }

    fn try_parse_constructor_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
    ) -> Option<NodeId> {
        self.try_parse(|p| {
            if !p.parse_constructor_name() {
                return None;
            }
            let type_parameters = p.parse_type_parameters();
            let parameters = p.parse_parameters(SignatureFlags::NONE);
            let type_annotation = p.parse_return_type(SyntaxKind::ColonToken, false);
            let body = p.parse_function_block_or_semicolon(SignatureFlags::NONE, Some(&messages::OR_EXPECTED));
            let node = p.finish_node(
                SyntaxKind::Constructor,
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
                    body,
                },
            );
            Some(p.with_jsdoc(node, has_jsdoc))
        })
    }

    fn parse_property_or_method_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        // `?` after a name is an optional member in a class.
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        if asterisk_token.is_some()
            || matches!(
                self.current_token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            return self.parse_method_declaration(
                pos,
                has_jsdoc,
                modifiers,
                asterisk_token,
                name,
                question_token,
                None,
                None,
            );
        }
        self.parse_property_declaration(pos, has_jsdoc, modifiers, name, question_token)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn parse_method_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        asterisk_token: Option<NodeId>,
        name: NodeId,
        question_token: Option<NodeId>,
        exclamation_token: Option<NodeId>,
        message: Option<&DiagnosticMessage>,
    ) -> NodeId {
        let mut flags = SignatureFlags::NONE;
        if asterisk_token.is_some() {
            flags |= SignatureFlags::YIELD;
        }
        if self.has_modifier(modifiers, SyntaxKind::AsyncKeyword) {
            flags |= SignatureFlags::AWAIT;
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(flags);
        let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, message);
        let node = self.finish_node(
            SyntaxKind::MethodDeclaration,
            pos,
            NodePayload::FunctionLike {
                modifiers,
                asterisk_token,
                name: Some(name),
                question_token,
                exclamation_token,
                type_parameters,
                parameters,
                type_annotation,
                equals_greater_than_token: None,
                body,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_property_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        name: NodeId,
        question_token: Option<NodeId>,
    ) -> NodeId {
        let exclamation_token = if question_token.is_none() && !self.has_preceding_line_break() {
            self.parse_optional_token(SyntaxKind::ExclamationToken)
        } else {
            None
        };
        let type_annotation = self.parse_type_annotation();
        let initializer = self.do_outside_of_context(
            NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT | NodeFlags::DISALLOW_IN_CONTEXT,
            Self::parse_initializer,
        );
        self.parse_semicolon_after_property_name(name, type_annotation, initializer);
        let node = self.finish_node(
            SyntaxKind::PropertyDeclaration,
            pos,
            NodePayload::PropertyDeclaration {
                modifiers,
                name,
                question_token,
                exclamation_token,
                type_annotation,
                initializer,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_semicolon_after_property_name(
        &mut self,
        name: NodeId,
        type_annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    ) {
        if self.current_token() == SyntaxKind::AtToken && !self.has_preceding_line_break() {
            self.parse_error_at_current_token(
                &messages::DECORATORS_MUST_PRECEDE_THE_NAME_AND_ALL_KEYWORDS_OF_PROPERTY_DECLARATIONS,
                &[],
            );
            return;
        }
        if self.current_token() == SyntaxKind::OpenParenToken {
            self.parse_error_at_current_token(&messages::CANNOT_START_A_FUNCTION_CALL_IN_A_TYPE_ANNOTATION, &[]);
            self.next_token();
            return;
        }
        if type_annotation.is_some() && !self.can_parse_semicolon() {
            if initializer.is_some() {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            } else {
                self.parse_error_at_current_token(&messages::EXPECTED_FOR_PROPERTY_INITIALIZER, &[]);
            }
            return;
        }
        if self.try_parse_semicolon() {
            return;
        }
        if initializer.is_some() {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            return;
        }
        self.parse_error_for_missing_semicolon_after(name);
    }

    // ========================================================================
    // Index signatures
    // ========================================================================

    pub(crate) fn is_index_signature(&mut self) -> bool {
        self.current_token() == SyntaxKind::OpenBracketToken && self.look_ahead(Self::is_unambiguously_index_signature)
    }

    fn is_unambiguously_index_signature(&mut self) -> bool {
        // `[...`, `[]`, `[a:`, `[a,`, `[a?:`, `[a?,`, `[a?]`, and a
        // modifier before the name.
        self.next_token();
        if matches!(
            self.current_token(),
            SyntaxKind::DotDotDotToken | SyntaxKind::CloseBracketToken
        ) {
            return true;
        }
        if self.current_token().is_modifier_kind() {
            self.next_token();
            if self.is_identifier() {
                return true;
            }
        } else if !self.is_identifier() {
            return false;
        } else {
            self.next_token();
        }
        if matches!(self.current_token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken) {
            return true;
        }
        if self.current_token() != SyntaxKind::QuestionToken {
            return false;
        }
        self.next_token();
        matches!(
            self.current_token(),
            SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::CloseBracketToken
        )
    }

    pub(crate) fn parse_index_signature_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
    ) -> NodeId {
        let parameters = self.parse_bracketed_list(
            ParsingContext::Parameters,
            |p| p.parse_parameter(false),
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        );
        let type_annotation = self.parse_type_annotation();
        self.parse_type_member_semicolon();
        let node = self.finish_node(
            SyntaxKind::IndexSignature,
            pos,
            NodePayload::FunctionLike {
                modifiers,
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
        self.with_jsdoc(node, has_jsdoc)
    }

    // ========================================================================
    // Interfaces and type members
    // ========================================================================

    pub(crate) fn parse_interface_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        self.parse_expected(SyntaxKind::InterfaceKeyword, None);
        let name = self.parse_identifier(None);
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_object_type_members();
        let node = self.finish_node(
            SyntaxKind::InterfaceDeclaration,
            pos,
            NodePayload::ClassLike {
                modifiers,
                name: Some(name),
                type_parameters,
                heritage_clauses,
                members,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    /// `{ members }` of an interface or type literal.
    pub(crate) fn parse_object_type_members(&mut self) -> ListId {
        if self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            let members = self.parse_list(ParsingContext::TypeMembers, Self::parse_type_member);
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
            members
        } else {
            self.create_missing_list()
        }
    }

    /// Only called inside a lookahead.
    pub(crate) fn is_type_member_start(&mut self) -> bool {
        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::GetKeyword | SyntaxKind::SetKeyword
        ) {
            return true;
        }
        let mut id_token = false;
        while self.current_token().is_modifier_kind() {
            id_token = true;
            self.next_token();
        }
        if self.current_token() == SyntaxKind::OpenBracketToken {
            return true;
        }
        if self.is_literal_property_name() {
            id_token = true;
            self.next_token();
        }
        // `a(`, `a<`, `a?`, `a:`, `a,` or a member ended by ASI.
        id_token
            && (matches!(
                self.current_token(),
                SyntaxKind::OpenParenToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
            ) || self.can_parse_semicolon())
    }

    pub(crate) fn parse_type_member(&mut self) -> NodeId {
        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            return self.parse_signature_member(SyntaxKind::CallSignature);
        }
        if self.current_token() == SyntaxKind::NewKeyword
            && self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                )
            })
        {
            return self.parse_signature_member(SyntaxKind::ConstructSignature);
        }

        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let modifiers = self.parse_modifiers(false, false, false);
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::GetAccessor, SignatureFlags::TYPE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, has_jsdoc, modifiers, SyntaxKind::SetAccessor, SignatureFlags::TYPE);
        }
        if self.is_index_signature() {
            return self.parse_index_signature_declaration(pos, has_jsdoc, modifiers);
        }
        self.parse_property_or_method_signature(pos, has_jsdoc, modifiers)
    }

    fn parse_signature_member(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        if kind == SyntaxKind::ConstructSignature {
            self.parse_expected(SyntaxKind::NewKeyword, None);
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::TYPE);
        let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, true);
        self.parse_type_member_semicolon();
        let node = self.finish_node(
            kind,
            pos,
            NodePayload::FunctionLike {
                modifiers: None,
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

    fn parse_property_or_method_signature(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let name = self.parse_property_name();
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);

        let node = if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameters(SignatureFlags::TYPE);
            let type_annotation = self.parse_return_type(SyntaxKind::ColonToken, true);
            self.parse_type_member_semicolon();
            self.finish_node(
                SyntaxKind::MethodSignature,
                pos,
                NodePayload::FunctionLike {
                    modifiers,
                    asterisk_token: None,
                    name: Some(name),
                    question_token,
                    exclamation_token: None,
                    type_parameters,
                    parameters,
                    type_annotation,
                    equals_greater_than_token: None,
                    body: None,
                },
            )
        } else {
            let type_annotation = self.parse_type_annotation();
            // An initializer is not allowed on a signature. It is parsed so
            // that recovery continues after it, and reported here.
            if self.current_token() == SyntaxKind::EqualsToken {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
                self.parse_initializer();
            }
            self.parse_type_member_semicolon();
            self.finish_node(
                SyntaxKind::PropertySignature,
                pos,
                NodePayload::PropertySignature {
                    modifiers,
                    name,
                    question_token,
                    type_annotation,
                },
            )
        };
        self.with_jsdoc(node, has_jsdoc)
    }

    /// Type members may be separated by `,` as well as `;`.
    pub(crate) fn parse_type_member_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::CommaToken) {
            return;
        }
        self.parse_semicolon();
    }

    // ========================================================================
    // Type aliases and enums
    // ========================================================================

    pub(crate) fn parse_type_alias_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        self.parse_expected(SyntaxKind::TypeKeyword, None);
        if self.has_preceding_line_break() {
            self.parse_error_at_current_token(&messages::LINE_BREAK_NOT_PERMITTED_HERE, &[]);
        }
        let name = self.parse_identifier(None);
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken, None);

        // `type T = intrinsic` unless `intrinsic` is a namespace name.
        let intrinsic = if self.current_token() == SyntaxKind::IntrinsicKeyword {
            self.try_parse(|p| {
                let keyword = p.parse_token_node();
                (p.current_token() != SyntaxKind::DotToken).then_some(keyword)
            })
        } else {
            None
        };
        let type_node = match intrinsic {
            Some(keyword) => keyword,
            None => self.parse_type(),
        };
        self.parse_semicolon();

        let node = self.finish_node(
            SyntaxKind::TypeAliasDeclaration,
            pos,
            NodePayload::TypeAlias {
                modifiers,
                name,
                type_parameters,
                type_node,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_enum_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        self.parse_expected(SyntaxKind::EnumKeyword, None);
        let name = self.parse_identifier(None);
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            let members = self.do_outside_of_yield_and_await_context(|p| {
                p.parse_delimited_list(ParsingContext::EnumMembers, Self::parse_enum_member)
            });
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
            members
        } else {
            self.create_missing_list()
        };
        let node = self.finish_node(SyntaxKind::EnumDeclaration, pos, NodePayload::Enum { modifiers, name, members });
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_enum_member(&mut self) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();
        let name = self.parse_property_name();
        let initializer = self.allow_in_and(Self::parse_initializer);
        let node = self.finish_node(SyntaxKind::EnumMember, pos, NodePayload::EnumMember { name, initializer });
        self.with_jsdoc(node, has_jsdoc)
    }

    // ========================================================================
    // Modules and namespaces
    // ========================================================================

    pub(crate) fn parse_module_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        if self.current_token() == SyntaxKind::GlobalKeyword {
            return self.parse_ambient_external_module_declaration(pos, has_jsdoc, modifiers);
        }
        let mut flags = NodeFlags::NONE;
        if self.parse_optional(SyntaxKind::NamespaceKeyword) {
            flags |= NodeFlags::NAMESPACE;
        } else {
            self.parse_expected(SyntaxKind::ModuleKeyword, None);
            if self.current_token() == SyntaxKind::StringLiteral {
                return self.parse_ambient_external_module_declaration(pos, has_jsdoc, modifiers);
            }
        }
        self.parse_module_or_namespace_declaration(pos, has_jsdoc, modifiers, flags)
    }

    /// `a.b.c { }` nests one declaration per name.
    fn parse_module_or_namespace_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        flags: NodeFlags,
    ) -> NodeId {
        let namespace_flag = flags & NodeFlags::NAMESPACE;
        let name = if flags.contains(NodeFlags::NESTED_NAMESPACE) {
            self.parse_identifier_name(None)
        } else {
            self.parse_identifier(None)
        };
        let body = if self.parse_optional(SyntaxKind::DotToken) {
            let inner_pos = self.node_pos();
            self.parse_module_or_namespace_declaration(
                inner_pos,
                false,
                None,
                NodeFlags::NESTED_NAMESPACE | namespace_flag,
            )
        } else {
            self.parse_module_block()
        };
        let node = self.finish_node_with_flags(
            SyntaxKind::ModuleDeclaration,
            pos,
            NodePayload::Module {
                modifiers,
                name,
                body: Some(body),
            },
            flags,
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    /// `declare module "x" { }` and `declare global { }`.
    fn parse_ambient_external_module_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
    ) -> NodeId {
        let mut flags = NodeFlags::NONE;
        let name = if self.current_token() == SyntaxKind::GlobalKeyword {
            flags |= NodeFlags::GLOBAL_AUGMENTATION;
            self.parse_identifier(None)
        } else {
            self.parse_literal_node()
        };
        let body = if self.current_token() == SyntaxKind::OpenBraceToken {
            Some(self.parse_module_block())
        } else {
            self.parse_semicolon();
            None
        };
        let node = self.finish_node_with_flags(
            SyntaxKind::ModuleDeclaration,
            pos,
            NodePayload::Module { modifiers, name, body },
            flags,
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_module_block(&mut self) -> NodeId {
        let pos = self.node_pos();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            let statements = self.parse_list(ParsingContext::BlockStatements, Self::parse_statement);
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
            statements
        } else {
            self.create_missing_list()
        };
        self.finish_node(
            SyntaxKind::ModuleBlock,
            pos,
            NodePayload::Block {
                statements,
                multi_line: false,
            },
        )
    }

    // ========================================================================
    // Imports
    // ========================================================================

    pub(crate) fn parse_import_declaration_or_import_equals_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::ImportKeyword, None);
        let after_import_pos = self.node_pos();

        let mut identifier = self.is_identifier().then(|| self.parse_identifier(None));
        let mut is_type_only = false;

        // `import type X from`, `import type { X }`, `import type X = ` but
        // not `import type from "m"` or `import type = require(...)`.
        if identifier.is_some_and(|id| self.node_text_value(id) == "type")
            && (self.current_token() != SyntaxKind::FromKeyword
                || (self.is_identifier()
                    && self.look_ahead(|p| {
                        matches!(
                            p.next_token(),
                            SyntaxKind::FromKeyword | SyntaxKind::EqualsToken
                        )
                    })))
            && (self.is_identifier()
                || matches!(
                    self.current_token(),
                    SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                ))
        {
            is_type_only = true;
            identifier = self.is_identifier().then(|| self.parse_identifier(None));
        }

        if let Some(identifier) = identifier {
            if !matches!(
                self.current_token(),
                SyntaxKind::CommaToken | SyntaxKind::FromKeyword
            ) {
                return self.parse_import_equals_declaration(pos, has_jsdoc, modifiers, identifier, is_type_only);
            }
        }

        let import_clause = if identifier.is_some()
            || matches!(
                self.current_token(),
                SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
            ) {
            let clause = self.parse_import_clause(identifier, after_import_pos, is_type_only);
            self.parse_expected(SyntaxKind::FromKeyword, None);
            Some(clause)
        } else {
            None
        };
        let module_specifier = self.parse_module_specifier();
        let attributes = self.try_parse_import_attributes();
        self.parse_semicolon();

        let node = self.finish_node(
            SyntaxKind::ImportDeclaration,
            pos,
            NodePayload::ImportDeclaration {
                modifiers,
                import_clause,
                module_specifier,
                attributes,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_import_equals_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
        name: NodeId,
        is_type_only: bool,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::EqualsToken, None);
        let module_reference = if self.current_token() == SyntaxKind::RequireKeyword
            && self.look_ahead(Self::next_token_is_open_paren)
        {
            self.parse_external_module_reference()
        } else {
            self.parse_entity_name(false, None)
        };
        self.parse_semicolon();
        let node = self.finish_node(
            SyntaxKind::ImportEqualsDeclaration,
            pos,
            NodePayload::ImportEquals {
                modifiers,
                is_type_only,
                name,
                module_reference,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    fn parse_external_module_reference(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::RequireKeyword, None);
        self.parse_expected(SyntaxKind::OpenParenToken, None);
        let expression = self.parse_module_specifier();
        self.parse_expected(SyntaxKind::CloseParenToken, None);
        self.finish_node(
            SyntaxKind::ExternalModuleReference,
            pos,
            NodePayload::ExpressionWrapper { expression },
        )
    }

    fn parse_module_specifier(&mut self) -> NodeId {
        if self.current_token() == SyntaxKind::StringLiteral {
            self.parse_literal_node()
        } else {
            // Anything else is an error the checker reports, but parsing
            // an expression keeps the tree well formed.
            self.parse_expression()
        }
    }

    fn parse_import_clause(&mut self, name: Option<NodeId>, pos: u32, is_type_only: bool) -> NodeId {
        // `import d, * as ns` and `import d, { a }` need the comma.
        let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            Some(if self.current_token() == SyntaxKind::AsteriskToken {
                self.parse_namespace_import()
            } else {
                self.parse_named_imports_or_exports(SyntaxKind::NamedImports)
            })
        } else {
            None
        };
        self.finish_node(
            SyntaxKind::ImportClause,
            pos,
            NodePayload::ImportClause {
                is_type_only,
                name,
                named_bindings,
            },
        )
    }

    fn parse_namespace_import(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::AsteriskToken, None);
        self.parse_expected(SyntaxKind::AsKeyword, None);
        let name = self.parse_identifier(None);
        self.finish_node(SyntaxKind::NamespaceImport, pos, NodePayload::NamespaceBinding { name })
    }

    fn parse_named_imports_or_exports(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let specifier_kind = if kind == SyntaxKind::NamedImports {
            SyntaxKind::ImportSpecifier
        } else {
            SyntaxKind::ExportSpecifier
        };
        let elements = self.parse_bracketed_list(
            ParsingContext::ImportOrExportSpecifiers,
            |p| p.parse_import_or_export_specifier(specifier_kind),
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        );
        self.finish_node(kind, pos, NodePayload::NamedBindings { elements })
    }

    fn can_parse_module_export_name(&self) -> bool {
        self.current_token().is_identifier_or_keyword() || self.current_token() == SyntaxKind::StringLiteral
    }

    fn parse_module_export_name(&mut self) -> NodeId {
        if self.current_token() == SyntaxKind::StringLiteral {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name(None)
        }
    }

    /// A specifier name, with the span of the token when it is a keyword
    /// that cannot be an identifier.
    fn parse_name_with_keyword_check(&mut self) -> (Option<(u32, u32)>, NodeId) {
        let keyword_span = (self.current_token().is_keyword() && !self.is_identifier())
            .then(|| (self.token_start(), self.token_end()));
        (keyword_span, self.parse_module_export_name())
    }

    fn parse_import_or_export_specifier(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let has_jsdoc = self.has_preceding_jsdoc_comment();

        // A reserved word is only an error as the local name of an import.
        let (mut keyword_check, mut name) = self.parse_name_with_keyword_check();
        let mut is_type_only = false;
        let mut property_name = None;
        let mut can_parse_as_keyword = true;

        if self.arena.kind(name) == SyntaxKind::Identifier && self.node_text_value(name) == "type" {
            // import { type } from "mod";          - is_type_only false, name "type"
            // import { type as } from "mod";       - is_type_only true, name "as"
            // import { type as as } from "mod";    - is_type_only false, name "as", property "type"
            // import { type as as as } from "mod"; - is_type_only true, name "as", property "as"
            if self.current_token() == SyntaxKind::AsKeyword {
                let first_as = self.parse_identifier_name(None);
                if self.current_token() == SyntaxKind::AsKeyword {
                    let second_as = self.parse_identifier_name(None);
                    if self.can_parse_module_export_name() {
                        is_type_only = true;
                        property_name = Some(first_as);
                        (keyword_check, name) = self.parse_name_with_keyword_check();
                    } else {
                        property_name = Some(name);
                        name = second_as;
                    }
                    can_parse_as_keyword = false;
                } else if self.can_parse_module_export_name() {
                    property_name = Some(name);
                    can_parse_as_keyword = false;
                    (keyword_check, name) = self.parse_name_with_keyword_check();
                } else {
                    is_type_only = true;
                    name = first_as;
                }
            } else if self.can_parse_module_export_name() {
                is_type_only = true;
                (keyword_check, name) = self.parse_name_with_keyword_check();
            }
        }

        if can_parse_as_keyword && self.current_token() == SyntaxKind::AsKeyword {
            property_name = Some(name);
            self.parse_expected(SyntaxKind::AsKeyword, None);
            (keyword_check, name) = self.parse_name_with_keyword_check();
        }

        if kind == SyntaxKind::ImportSpecifier {
            if self.arena.kind(name) != SyntaxKind::Identifier {
                // A string cannot be a local binding.
                let range = self.arena.range(name);
                self.parse_error_at_range(name, &messages::IDENTIFIER_EXPECTED, &[]);
                let text = self.intern("");
                name = self.finish_node_at(
                    SyntaxKind::Identifier,
                    range.pos,
                    range.pos,
                    NodePayload::Identifier {
                        text,
                        original_keyword_kind: None,
                    },
                    NodeFlags::NONE,
                );
            } else if let Some((start, end)) = keyword_check {
                self.parse_error_at(start, end, &messages::IDENTIFIER_EXPECTED, &[]);
            }
        }

        let node = self.finish_node(
            kind,
            pos,
            NodePayload::ImportOrExportSpecifier {
                is_type_only,
                property_name,
                name,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn is_import_attribute_name(&self) -> bool {
        self.current_token().is_identifier_or_keyword() || self.current_token() == SyntaxKind::StringLiteral
    }

    fn try_parse_import_attributes(&mut self) -> Option<NodeId> {
        let token = self.current_token();
        (matches!(token, SyntaxKind::WithKeyword | SyntaxKind::AssertKeyword) && !self.has_preceding_line_break())
            .then(|| self.parse_import_attributes(token, false))
    }

    /// `with { type: "json" }`, or the older `assert { ... }`.
    pub(crate) fn parse_import_attributes(&mut self, token: SyntaxKind, skip_keyword: bool) -> NodeId {
        let pos = self.node_pos();
        if !skip_keyword {
            self.parse_expected(token, None);
        }
        let open_brace_position = self.token_start();
        if self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            let multi_line = self.has_preceding_line_break();
            let elements = self.parse_delimited_list_allowing_semicolons(
                ParsingContext::ImportAttributes,
                Self::parse_import_attribute,
            );
            self.parse_expected_matching_brackets(
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                true,
                open_brace_position,
            );
            return self.finish_node(
                SyntaxKind::ImportAttributes,
                pos,
                NodePayload::ImportAttributes {
                    token,
                    elements,
                    multi_line,
                },
            );
        }
        let elements_pos = self.node_pos();
        let elements = self.create_node_list(Vec::new(), elements_pos, None);
        self.finish_node(
            SyntaxKind::ImportAttributes,
            pos,
            NodePayload::ImportAttributes {
                token,
                elements,
                multi_line: false,
            },
        )
    }

    fn parse_import_attribute(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = if self.current_token().is_identifier_or_keyword() {
            self.parse_identifier_name(None)
        } else {
            self.parse_literal_like_node(SyntaxKind::StringLiteral)
        };
        self.parse_expected(SyntaxKind::ColonToken, None);
        let value = self.parse_assignment_expression_or_higher(true);
        self.finish_node(SyntaxKind::ImportAttribute, pos, NodePayload::ImportAttribute { name, value })
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub(crate) fn parse_export_assignment(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let saved_await_context = self.in_await_context();
        self.set_await_context(true);
        let is_export_equals = if self.parse_optional(SyntaxKind::EqualsToken) {
            true
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword, None);
            false
        };
        let expression = self.parse_assignment_expression_or_higher(true);
        self.parse_semicolon();
        self.set_await_context(saved_await_context);

        let node = self.finish_node(
            SyntaxKind::ExportAssignment,
            pos,
            NodePayload::ExportAssignment {
                modifiers,
                is_export_equals,
                expression,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    /// `export as namespace N;` in a declaration file.
    pub(crate) fn parse_namespace_export_declaration(
        &mut self,
        pos: u32,
        has_jsdoc: bool,
        modifiers: Option<ListId>,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::AsKeyword, None);
        self.parse_expected(SyntaxKind::NamespaceKeyword, None);
        let name = self.parse_identifier(None);
        self.parse_semicolon();
        // There is no slot for modifiers; any stay outside the tree.
        let _ = modifiers;
        let node = self.finish_node(
            SyntaxKind::NamespaceExportDeclaration,
            pos,
            NodePayload::NamespaceBinding { name },
        );
        self.with_jsdoc(node, has_jsdoc)
    }

    pub(crate) fn parse_export_declaration(&mut self, pos: u32, has_jsdoc: bool, modifiers: Option<ListId>) -> NodeId {
        let saved_await_context = self.in_await_context();
        self.set_await_context(true);

        let is_type_only = self.parse_optional(SyntaxKind::TypeKeyword);
        let namespace_export_pos = self.node_pos();
        let mut module_specifier = None;
        let export_clause = if self.parse_optional(SyntaxKind::AsteriskToken) {
            let clause = self.parse_optional(SyntaxKind::AsKeyword).then(|| {
                let name = self.parse_module_export_name();
                self.finish_node(
                    SyntaxKind::NamespaceExport,
                    namespace_export_pos,
                    NodePayload::NamespaceBinding { name },
                )
            });
            self.parse_expected(SyntaxKind::FromKeyword, None);
            module_specifier = Some(self.parse_module_specifier());
            clause
        } else {
            let clause = self.parse_named_imports_or_exports(SyntaxKind::NamedExports);
            // `export { a } "m"` is treated as a missing `from`.
            if self.current_token() == SyntaxKind::FromKeyword
                || (self.current_token() == SyntaxKind::StringLiteral && !self.has_preceding_line_break())
            {
                self.parse_expected(SyntaxKind::FromKeyword, None);
                module_specifier = Some(self.parse_module_specifier());
            }
            Some(clause)
        };

        let token = self.current_token();
        let attributes = (module_specifier.is_some()
            && matches!(token, SyntaxKind::WithKeyword | SyntaxKind::AssertKeyword)
            && !self.has_preceding_line_break())
        .then(|| self.parse_import_attributes(token, false));
        self.parse_semicolon();
        self.set_await_context(saved_await_context);

        let node = self.finish_node(
            SyntaxKind::ExportDeclaration,
            pos,
            NodePayload::ExportDeclaration {
                modifiers,
                is_type_only,
                export_clause,
                module_specifier,
                attributes,
            },
        );
        self.with_jsdoc(node, has_jsdoc)
    }
}
