//! Markup expressions: elements, fragments, attributes and children.
//!
//! The scanner has no markup mode of its own; after each `>` or `}` the
//! parser asks it for a markup text token explicitly.

use crate::list::ParsingContext;
use crate::parser::Parser;
use rsparse_ast::source_file::skip_trivia;
use rsparse_ast::{ListId, NodeFlags, NodeId, NodePayload, SyntaxKind, TokenFlags};
use rsparse_core::TextRange;
use rsparse_diagnostics::messages;

impl<'a> Parser<'a> {
    /// Parse `<a ...>...</a>`, `<a />` or `<>...</>`.
    ///
    /// `opening_tag` is the enclosing element's opening tag when parsing a
    /// child. In an expression context a second adjacent element is parsed
    /// and joined to the first with a missing comma.
    pub(crate) fn parse_jsx_element_or_self_closing_element_or_fragment(
        &mut self,
        in_expression_context: bool,
        top_invalid_node_position: Option<u32>,
        opening_tag: Option<NodeId>,
        must_be_unary: bool,
    ) -> NodeId {
        self.with_nesting_guard(SyntaxKind::JsxSelfClosingElement, |p| {
            p.parse_jsx_element_worker(in_expression_context, top_invalid_node_position, opening_tag, must_be_unary)
        })
    }

    fn parse_jsx_element_worker(
        &mut self,
        in_expression_context: bool,
        top_invalid_node_position: Option<u32>,
        opening_tag: Option<NodeId>,
        must_be_unary: bool,
    ) -> NodeId {
        let pos = self.node_pos();
        let opening = self.parse_jsx_opening_or_self_closing_element_or_opening_fragment(in_expression_context);
        let result = match self.arena.kind(opening) {
            SyntaxKind::JsxOpeningElement => {
                let mut children = self.parse_jsx_children(opening);
                let closing;
                match self.mismatched_last_child(opening, children) {
                    Some((last, last_closing)) => {
                        // `<div><span></div>`: the child took our closing tag.
                        // Give the child an empty closing tag and keep ours.
                        let end = self.arena.list(children_of(self, last)).range.end;
                        let last_opening = opening_of(self, last);
                        let last_children = children_of(self, last);
                        let text = self.intern("");
                        let tag_name = self.finish_node_at(
                            SyntaxKind::Identifier,
                            end,
                            end,
                            NodePayload::Identifier {
                                text,
                                original_keyword_kind: None,
                            },
                            NodeFlags::NONE,
                        );
                        let empty_closing = self.finish_node_at(
                            SyntaxKind::JsxClosingElement,
                            end,
                            end,
                            NodePayload::JsxClosingElement { tag_name },
                            NodeFlags::NONE,
                        );
                        let last_pos = self.arena.range(last_opening).pos;
                        let new_last = self.finish_node_at(
                            SyntaxKind::JsxElement,
                            last_pos,
                            end,
                            NodePayload::JsxElement {
                                opening: last_opening,
                                children: last_children,
                                closing: empty_closing,
                            },
                            NodeFlags::NONE,
                        );
                        let list = self.arena.list(children);
                        let list_pos = list.range.pos;
                        let mut nodes = list.nodes.clone();
                        if let Some(slot) = nodes.last_mut() {
                            *slot = new_last;
                        }
                        children = self.create_node_list(nodes, list_pos, Some(end));
                        closing = last_closing;
                    }
                    None => {
                        closing = self.parse_jsx_closing_element(opening, in_expression_context);
                        let opening_name = jsx_tag_name(self, opening);
                        let closing_name = jsx_tag_name(self, closing);
                        if !self.tag_names_are_equivalent(opening_name, closing_name) {
                            let parent_name = opening_tag
                                .filter(|&tag| self.arena.kind(tag) == SyntaxKind::JsxOpeningElement)
                                .map(|tag| jsx_tag_name(self, tag));
                            let opening_text = self.source_text_of(opening_name).to_string();
                            match parent_name {
                                Some(parent_name) if self.tag_names_are_equivalent(closing_name, parent_name) => {
                                    self.parse_error_at_range(
                                        opening_name,
                                        &messages::JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG,
                                        &[&opening_text],
                                    );
                                }
                                _ => {
                                    self.parse_error_at_range(
                                        closing_name,
                                        &messages::EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0,
                                        &[&opening_text],
                                    );
                                }
                            }
                        }
                    }
                }
                self.finish_node(
                    SyntaxKind::JsxElement,
                    pos,
                    NodePayload::JsxElement {
                        opening,
                        children,
                        closing,
                    },
                )
            }
            SyntaxKind::JsxOpeningFragment => {
                let children = self.parse_jsx_children(opening);
                let closing = self.parse_jsx_closing_fragment(in_expression_context);
                self.finish_node(
                    SyntaxKind::JsxFragment,
                    pos,
                    NodePayload::JsxElement {
                        opening,
                        children,
                        closing,
                    },
                )
            }
            _ => opening,
        };

        // `<a></a><b></b>` is two roots. Parse the second and report it.
        if !must_be_unary && in_expression_context && self.current_token() == SyntaxKind::LessThanToken {
            let top_bad_pos = top_invalid_node_position.unwrap_or_else(|| self.arena.range(result).pos);
            let invalid_element = self.try_parse(|p| {
                Some(p.parse_jsx_element_or_self_closing_element_or_fragment(true, Some(top_bad_pos), None, false))
            });
            if let Some(invalid_element) = invalid_element {
                let invalid_range = self.arena.range(invalid_element);
                let operator_token = self.create_missing_node(SyntaxKind::CommaToken, false, None, &[]);
                self.arena.data_mut(operator_token).range = TextRange::new(invalid_range.pos, invalid_range.pos);
                let start = skip_trivia(self.text, top_bad_pos as usize) as u32;
                self.parse_error_at(
                    start,
                    invalid_range.end,
                    &messages::JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT,
                    &[],
                );
                return self.finish_node(
                    SyntaxKind::BinaryExpression,
                    pos,
                    NodePayload::Binary {
                        left: result,
                        operator_token,
                        right: invalid_element,
                    },
                );
            }
        }
        result
    }

    /// The last child, if it is an element whose closing tag belongs to
    /// `opening` rather than to itself, with that closing tag.
    fn mismatched_last_child(&self, opening: NodeId, children: ListId) -> Option<(NodeId, NodeId)> {
        let last = *self.arena.list(children).nodes.last()?;
        self.closing_tag_taken_from(opening, last).map(|closing| (last, closing))
    }

    fn closing_tag_taken_from(&self, opening: NodeId, child: NodeId) -> Option<NodeId> {
        if self.arena.kind(child) != SyntaxKind::JsxElement {
            return None;
        }
        let NodePayload::JsxElement {
            opening: child_opening,
            closing: child_closing,
            ..
        } = self.arena.get(child).payload
        else {
            return None;
        };
        let child_opening_name = jsx_tag_name(self, child_opening);
        let child_closing_name = jsx_tag_name(self, child_closing);
        let parent_name = jsx_tag_name(self, opening);
        (!self.tag_names_are_equivalent(child_opening_name, child_closing_name)
            && self.tag_names_are_equivalent(parent_name, child_closing_name))
        .then_some(child_closing)
    }

    fn parse_jsx_text(&mut self) -> NodeId {
        let pos = self.node_pos();
        // Whitespace-only text keeps its own kind.
        let kind = self.current_token();
        let text = self.intern(self.scanner.token_value());
        self.scan_jsx_text(true);
        self.finish_node(
            kind,
            pos,
            NodePayload::Literal {
                text,
                token_flags: TokenFlags::NONE,
            },
        )
    }

    fn parse_jsx_child(&mut self, opening_tag: NodeId, token: SyntaxKind) -> Option<NodeId> {
        match token {
            SyntaxKind::EndOfFileToken => {
                // Point at the unclosed tag rather than the end of the file.
                if self.arena.kind(opening_tag) == SyntaxKind::JsxOpeningFragment {
                    self.parse_error_at_range(opening_tag, &messages::JSX_FRAGMENT_HAS_NO_CORRESPONDING_CLOSING_TAG, &[]);
                } else {
                    let tag = jsx_tag_name(self, opening_tag);
                    let range = self.arena.range(tag);
                    let start = (skip_trivia(self.text, range.pos as usize) as u32).min(range.end);
                    let tag_text = self.source_text_of(tag).to_string();
                    self.parse_error_at(
                        start,
                        range.end,
                        &messages::JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG,
                        &[&tag_text],
                    );
                }
                None
            }
            SyntaxKind::LessThanSlashToken | SyntaxKind::ConflictMarkerTrivia => None,
            SyntaxKind::JsxText | SyntaxKind::JsxTextAllWhiteSpaces => Some(self.parse_jsx_text()),
            SyntaxKind::OpenBraceToken => self.parse_jsx_expression(false),
            SyntaxKind::LessThanToken => Some(self.parse_jsx_element_or_self_closing_element_or_fragment(
                false,
                None,
                Some(opening_tag),
                false,
            )),
            _ => unreachable!("markup scanner produced {token:?}"),
        }
    }

    fn parse_jsx_children(&mut self, opening_tag: NodeId) -> ListId {
        let list_pos = self.node_pos();
        let saved = self.parsing_context;
        self.parsing_context.insert(ParsingContext::JsxChildren);

        let mut list = Vec::new();
        loop {
            let child_start = self.node_pos();
            let token = self.re_scan_jsx_token(true);
            let Some(child) = self.parse_jsx_child(opening_tag, token) else {
                break;
            };
            list.push(child);
            // A nesting-limited child consumes nothing.
            if self.node_pos() == child_start {
                break;
            }
            // `<div>(<span></div>)`: stop so the `</div>` can be reattached
            // one level up.
            if self.arena.kind(opening_tag) == SyntaxKind::JsxOpeningElement
                && self.closing_tag_taken_from(opening_tag, child).is_some()
            {
                break;
            }
        }

        self.parsing_context = saved;
        self.create_node_list(list, list_pos, None)
    }

    fn parse_jsx_attributes(&mut self) -> NodeId {
        let pos = self.node_pos();
        let properties = self.parse_list(ParsingContext::JsxAttributes, Self::parse_jsx_attribute);
        self.finish_node(SyntaxKind::JsxAttributes, pos, NodePayload::JsxAttributes { properties })
    }

    fn parse_jsx_opening_or_self_closing_element_or_opening_fragment(&mut self, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanToken, None);
        if self.current_token() == SyntaxKind::GreaterThanToken {
            // Text after `>` is markup text, not ordinary tokens.
            self.scan_jsx_text(true);
            return self.finish_node(SyntaxKind::JsxOpeningFragment, pos, NodePayload::Token);
        }

        let tag_name = self.parse_jsx_element_name();
        let type_arguments = if self.in_context(NodeFlags::JAVASCRIPT_FILE) {
            None
        } else {
            self.try_parse_type_arguments()
        };
        let attributes = self.parse_jsx_attributes();
        let payload = NodePayload::JsxOpeningLike {
            tag_name,
            type_arguments,
            attributes,
        };

        if self.current_token() == SyntaxKind::GreaterThanToken {
            self.scan_jsx_text(true);
            return self.finish_node(SyntaxKind::JsxOpeningElement, pos, payload);
        }
        self.parse_expected(SyntaxKind::SlashToken, None);
        if self.parse_expected_with(SyntaxKind::GreaterThanToken, None, false) {
            if in_expression_context {
                self.next_token();
            } else {
                self.scan_jsx_text(true);
            }
        }
        self.finish_node(SyntaxKind::JsxSelfClosingElement, pos, payload)
    }

    /// `a`, `this`, `a.b.c` or `ns:a`.
    fn parse_jsx_element_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        let initial = self.parse_jsx_tag_name();
        if self.arena.kind(initial) == SyntaxKind::JsxNamespacedName {
            // `a:b.c` is left for the attribute parser to reject.
            return initial;
        }
        let mut expression = initial;
        while self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_right_side_of_dot(true, false, false);
            expression = self.finish_node(
                SyntaxKind::PropertyAccessExpression,
                pos,
                NodePayload::PropertyAccess {
                    expression,
                    question_dot_token: None,
                    name,
                },
            );
        }
        expression
    }

    fn parse_jsx_tag_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.scan_jsx_identifier();
        let is_this = self.current_token() == SyntaxKind::ThisKeyword;
        let tag_name = self.parse_identifier_name_error_on_unicode_escape_sequence();
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.scan_jsx_identifier();
            let name = self.parse_identifier_name_error_on_unicode_escape_sequence();
            return self.finish_node(
                SyntaxKind::JsxNamespacedName,
                pos,
                NodePayload::JsxNamespacedName {
                    namespace: tag_name,
                    name,
                },
            );
        }
        if is_this {
            return self.finish_node(SyntaxKind::ThisKeyword, pos, NodePayload::Token);
        }
        tag_name
    }

    /// `{expr}` as a child or attribute value; `{...expr}` only as a child.
    fn parse_jsx_expression(&mut self, in_expression_context: bool) -> Option<NodeId> {
        let pos = self.node_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken, None) {
            return None;
        }
        let mut dot_dot_dot_token = None;
        let mut expression = None;
        if self.current_token() != SyntaxKind::CloseBraceToken {
            if !in_expression_context {
                dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
            }
            // Only an assignment expression is valid, but a comma
            // expression parses unambiguously.
            expression = Some(self.parse_expression());
        }
        if in_expression_context {
            self.parse_expected(SyntaxKind::CloseBraceToken, None);
        } else if self.parse_expected_with(SyntaxKind::CloseBraceToken, None, false) {
            self.scan_jsx_text(true);
        }
        Some(self.finish_node(
            SyntaxKind::JsxExpression,
            pos,
            NodePayload::JsxExpression {
                dot_dot_dot_token,
                expression,
            },
        ))
    }

    fn parse_jsx_attribute(&mut self) -> NodeId {
        if self.current_token() == SyntaxKind::OpenBraceToken {
            return self.parse_jsx_spread_attribute();
        }
        let pos = self.node_pos();
        let name = self.parse_jsx_attribute_name();
        let initializer = self.parse_jsx_attribute_value();
        self.finish_node(SyntaxKind::JsxAttribute, pos, NodePayload::JsxAttribute { name, initializer })
    }

    fn parse_jsx_attribute_value(&mut self) -> Option<NodeId> {
        if self.current_token() != SyntaxKind::EqualsToken {
            return None;
        }
        match self.scan_jsx_attribute_value() {
            SyntaxKind::StringLiteral => Some(self.parse_literal_node()),
            SyntaxKind::OpenBraceToken => self.parse_jsx_expression(true),
            SyntaxKind::LessThanToken => Some(self.parse_jsx_element_or_self_closing_element_or_fragment(
                true, None, None, false,
            )),
            _ => {
                self.parse_error_at_current_token(&messages::OR_JSX_ELEMENT_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_jsx_attribute_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.scan_jsx_identifier();
        let name = self.parse_identifier_name_error_on_unicode_escape_sequence();
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.scan_jsx_identifier();
            let local = self.parse_identifier_name_error_on_unicode_escape_sequence();
            return self.finish_node(
                SyntaxKind::JsxNamespacedName,
                pos,
                NodePayload::JsxNamespacedName {
                    namespace: name,
                    name: local,
                },
            );
        }
        name
    }

    fn parse_jsx_spread_attribute(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken, None);
        self.parse_expected(SyntaxKind::DotDotDotToken, None);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseBraceToken, None);
        self.finish_node(SyntaxKind::JsxSpreadAttribute, pos, NodePayload::ExpressionWrapper { expression })
    }

    fn parse_jsx_closing_element(&mut self, opening: NodeId, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanSlashToken, None);
        let tag_name = self.parse_jsx_element_name();
        if self.parse_expected_with(SyntaxKind::GreaterThanToken, None, false) {
            let opening_name = jsx_tag_name(self, opening);
            // A mismatched closing tag probably belongs to an outer element,
            // whose text scanning is not ours to start.
            if in_expression_context || !self.tag_names_are_equivalent(opening_name, tag_name) {
                self.next_token();
            } else {
                self.scan_jsx_text(true);
            }
        }
        self.finish_node(SyntaxKind::JsxClosingElement, pos, NodePayload::JsxClosingElement { tag_name })
    }

    fn parse_jsx_closing_fragment(&mut self, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanSlashToken, None);
        if self.parse_expected_with(
            SyntaxKind::GreaterThanToken,
            Some(&messages::EXPECTED_CORRESPONDING_CLOSING_TAG_FOR_JSX_FRAGMENT),
            false,
        ) {
            if in_expression_context {
                self.next_token();
            } else {
                self.scan_jsx_text(true);
            }
        }
        self.finish_node(SyntaxKind::JsxClosingFragment, pos, NodePayload::Token)
    }

    /// Structural equality of two tag names.
    fn tag_names_are_equivalent(&self, lhs: NodeId, rhs: NodeId) -> bool {
        let kind = self.arena.kind(lhs);
        if kind != self.arena.kind(rhs) {
            return false;
        }
        match (&self.arena.get(lhs).payload, &self.arena.get(rhs).payload) {
            (NodePayload::Identifier { text: a, .. }, NodePayload::Identifier { text: b, .. }) => a == b,
            (
                NodePayload::JsxNamespacedName {
                    namespace: ns_a,
                    name: name_a,
                },
                NodePayload::JsxNamespacedName {
                    namespace: ns_b,
                    name: name_b,
                },
            ) => self.tag_names_are_equivalent(*ns_a, *ns_b) && self.tag_names_are_equivalent(*name_a, *name_b),
            (
                NodePayload::PropertyAccess {
                    expression: expr_a,
                    name: name_a,
                    ..
                },
                NodePayload::PropertyAccess {
                    expression: expr_b,
                    name: name_b,
                    ..
                },
            ) => self.tag_names_are_equivalent(*name_a, *name_b) && self.tag_names_are_equivalent(*expr_a, *expr_b),
            _ => kind == SyntaxKind::ThisKeyword,
        }
    }

    /// Source text of a node without its leading trivia.
    pub(crate) fn source_text_of(&self, node: NodeId) -> &'a str {
        let range = self.arena.range(node);
        let start = skip_trivia(self.text, range.pos as usize).min(range.end as usize);
        &self.text[start..range.end as usize]
    }
}

/// Tag name of an opening or closing element; a fragment is its own tag.
fn jsx_tag_name(parser: &Parser<'_>, tag: NodeId) -> NodeId {
    match parser.arena.get(tag).payload {
        NodePayload::JsxOpeningLike { tag_name, .. } | NodePayload::JsxClosingElement { tag_name } => tag_name,
        _ => tag,
    }
}

fn opening_of(parser: &Parser<'_>, element: NodeId) -> NodeId {
    match parser.arena.get(element).payload {
        NodePayload::JsxElement { opening, .. } => opening,
        _ => element,
    }
}

fn children_of(parser: &Parser<'_>, element: NodeId) -> ListId {
    match parser.arena.get(element).payload {
        NodePayload::JsxElement { children, .. } => children,
        _ => unreachable!("children of a non-element"),
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::Parser;
    use rsparse_ast::{NodePayload, SourceFile, SyntaxKind};

    fn parse_tsx(text: &str) -> SourceFile {
        Parser::new("test.tsx", text, ParseOptions::for_file_name("test.tsx")).parse_source_file()
    }

    fn expression_of(file: &SourceFile) -> rsparse_ast::NodeId {
        let statement = file.statements()[0];
        let NodePayload::ExpressionWrapper { expression } = file.arena.get(statement).payload else {
            panic!("expected an expression statement");
        };
        expression
    }

    #[test]
    fn test_element_with_children() {
        let file = parse_tsx("<div className=\"a\">hello {name}</div>;");
        assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
        let element = expression_of(&file);
        assert_eq!(file.arena.kind(element), SyntaxKind::JsxElement);
        let NodePayload::JsxElement { children, .. } = file.arena.get(element).payload else {
            panic!("expected an element");
        };
        let kinds: Vec<SyntaxKind> = file.arena.list(children).iter().map(|c| file.arena.kind(c)).collect();
        assert_eq!(kinds, vec![SyntaxKind::JsxText, SyntaxKind::JsxExpression]);
    }

    #[test]
    fn test_self_closing_with_spread() {
        let file = parse_tsx("<Foo {...props} x={1} />;");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(expression_of(&file)), SyntaxKind::JsxSelfClosingElement);
    }

    #[test]
    fn test_fragment() {
        let file = parse_tsx("<><a /></>;");
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.arena.kind(expression_of(&file)), SyntaxKind::JsxFragment);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let file = parse_tsx("<a></b>;");
        assert_eq!(file.diagnostics().len(), 1);
        assert_eq!(file.diagnostics()[0].code, 17002);
    }

    #[test]
    fn test_adjacent_roots() {
        let file = parse_tsx("<a /><b />;");
        assert_eq!(file.diagnostics()[0].code, 2657);
        assert_eq!(file.arena.kind(expression_of(&file)), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn test_namespaced_and_member_tags() {
        let file = parse_tsx("<svg:rect />; <a.b.c></a.b.c>;");
        assert!(file.diagnostics().is_empty());
    }
}
