//! Child enumeration for syntax nodes.
//!
//! Children are produced in source order. A node's attached documentation
//! comments are not children: they precede the node's first token and are
//! reached through [`NodeData::js_doc`](crate::NodeData::js_doc).

use crate::arena::NodeArena;
use crate::node::{ListId, NodeId, NodePayload};
use crate::syntax_kind::SyntaxKind;

/// A direct child of a node: a single node or a whole list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Child {
    Node(NodeId),
    List(ListId),
}

/// Visit each direct child of `node` in source order.
///
/// Single children go to `visit_node`, lists go to `visit_list`. Stops at
/// the first callback returning `Some` and returns that value.
pub fn for_each_child<R>(
    arena: &NodeArena,
    node: NodeId,
    mut visit_node: impl FnMut(NodeId) -> Option<R>,
    mut visit_list: impl FnMut(ListId) -> Option<R>,
) -> Option<R> {
    visit_payload(arena, node, &mut |child| match child {
        Child::Node(id) => visit_node(id),
        Child::List(id) => visit_list(id),
    })
}

/// Like [`for_each_child`], but list elements are visited one by one with
/// the node callback.
pub fn for_each_child_node<R>(
    arena: &NodeArena,
    node: NodeId,
    mut visit_node: impl FnMut(NodeId) -> Option<R>,
) -> Option<R> {
    visit_payload(arena, node, &mut |child| match child {
        Child::Node(id) => visit_node(id),
        Child::List(id) => arena.list(id).iter().find_map(&mut visit_node),
    })
}

/// Collect the direct children of `node` in source order.
pub fn children(arena: &NodeArena, node: NodeId) -> Vec<Child> {
    let mut out = Vec::new();
    visit_payload::<()>(arena, node, &mut |child| {
        out.push(child);
        None
    });
    out
}

/// Depth-first pre-order walk over `root` and all its descendants.
///
/// Uses an explicit stack: left-deep chains such as `a + b + c + ...` are
/// as deep as they are long.
pub fn walk_preorder(arena: &NodeArena, root: NodeId, f: &mut impl FnMut(NodeId)) {
    let mut stack = vec![root];
    let mut scratch = Vec::new();
    while let Some(node) = stack.pop() {
        f(node);
        for_each_child_node::<()>(arena, node, |child| {
            scratch.push(child);
            None
        });
        stack.extend(scratch.drain(..).rev());
    }
}

fn visit_payload<R>(
    arena: &NodeArena,
    node: NodeId,
    f: &mut impl FnMut(Child) -> Option<R>,
) -> Option<R> {
    macro_rules! node {
        ($e:expr) => {
            if let r @ Some(_) = f(Child::Node($e)) {
                return r;
            }
        };
    }
    macro_rules! opt {
        ($e:expr) => {
            if let Some(id) = $e {
                node!(id);
            }
        };
    }
    macro_rules! list {
        ($e:expr) => {
            if let r @ Some(_) = f(Child::List($e)) {
                return r;
            }
        };
    }
    macro_rules! opt_list {
        ($e:expr) => {
            if let Some(id) = $e {
                list!(id);
            }
        };
    }

    use NodePayload::*;
    match &arena.get(node).payload {
        Token | Identifier { .. } | Literal { .. } => {}
        QualifiedName { left, right } => {
            node!(*left);
            node!(*right);
        }
        ExpressionWrapper { expression } => node!(*expression),

        TypeParameter {
            modifiers,
            name,
            constraint,
            default,
            expression,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*constraint);
            opt!(*default);
            opt!(*expression);
        }
        Parameter {
            modifiers,
            dot_dot_dot_token,
            name,
            question_token,
            type_annotation,
            initializer,
        } => {
            opt_list!(*modifiers);
            opt!(*dot_dot_dot_token);
            node!(*name);
            opt!(*question_token);
            opt!(*type_annotation);
            opt!(*initializer);
        }
        PropertySignature {
            modifiers,
            name,
            question_token,
            type_annotation,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*question_token);
            opt!(*type_annotation);
        }
        PropertyDeclaration {
            modifiers,
            name,
            question_token,
            exclamation_token,
            type_annotation,
            initializer,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*question_token);
            opt!(*exclamation_token);
            opt!(*type_annotation);
            opt!(*initializer);
        }
        FunctionLike {
            modifiers,
            asterisk_token,
            name,
            question_token,
            exclamation_token,
            type_parameters,
            parameters,
            type_annotation,
            equals_greater_than_token,
            body,
        } => {
            opt_list!(*modifiers);
            opt!(*asterisk_token);
            opt!(*name);
            opt!(*question_token);
            opt!(*exclamation_token);
            opt_list!(*type_parameters);
            list!(*parameters);
            opt!(*type_annotation);
            opt!(*equals_greater_than_token);
            opt!(*body);
        }
        ClassStaticBlock { modifiers, body } => {
            opt_list!(*modifiers);
            node!(*body);
        }

        TypePredicate {
            asserts_modifier,
            parameter_name,
            type_node,
        } => {
            opt!(*asserts_modifier);
            node!(*parameter_name);
            opt!(*type_node);
        }
        TypeReference {
            type_name,
            type_arguments,
        } => {
            node!(*type_name);
            opt_list!(*type_arguments);
        }
        TypeLiteral { members } => list!(*members),
        TupleType { elements } => list!(*elements),
        UnionOrIntersection { types } => list!(*types),
        ArrayType { element_type } => node!(*element_type),
        WrappedType { type_node, .. } => node!(*type_node),
        ConditionalType {
            check_type,
            extends_type,
            true_type,
            false_type,
        } => {
            node!(*check_type);
            node!(*extends_type);
            node!(*true_type);
            node!(*false_type);
        }
        InferType { type_parameter } => node!(*type_parameter),
        TypeOperator { type_node, .. } => node!(*type_node),
        IndexedAccessType {
            object_type,
            index_type,
        } => {
            node!(*object_type);
            node!(*index_type);
        }
        MappedType {
            readonly_token,
            type_parameter,
            name_type,
            question_token,
            type_node,
            members,
        } => {
            opt!(*readonly_token);
            node!(*type_parameter);
            opt!(*name_type);
            opt!(*question_token);
            opt!(*type_node);
            opt_list!(*members);
        }
        LiteralType { literal } => node!(*literal),
        NamedTupleMember {
            dot_dot_dot_token,
            name,
            question_token,
            type_node,
        } => {
            opt!(*dot_dot_dot_token);
            node!(*name);
            opt!(*question_token);
            node!(*type_node);
        }
        Template { head, spans } => {
            node!(*head);
            list!(*spans);
        }
        TemplateSpan {
            expression,
            literal,
        } => {
            node!(*expression);
            node!(*literal);
        }
        ImportType {
            argument,
            attributes,
            qualifier,
            type_arguments,
            ..
        } => {
            node!(*argument);
            opt!(*attributes);
            opt!(*qualifier);
            opt_list!(*type_arguments);
        }

        BindingPattern { elements } => list!(*elements),
        BindingElement {
            dot_dot_dot_token,
            property_name,
            name,
            initializer,
        } => {
            opt!(*dot_dot_dot_token);
            opt!(*property_name);
            node!(*name);
            opt!(*initializer);
        }

        ArrayLiteral { elements, .. } => list!(*elements),
        ObjectLiteral { properties, .. } => list!(*properties),
        PropertyAccess {
            expression,
            question_dot_token,
            name,
        } => {
            node!(*expression);
            opt!(*question_dot_token);
            node!(*name);
        }
        ElementAccess {
            expression,
            question_dot_token,
            argument_expression,
        } => {
            node!(*expression);
            opt!(*question_dot_token);
            node!(*argument_expression);
        }
        Call {
            expression,
            question_dot_token,
            type_arguments,
            arguments,
        } => {
            node!(*expression);
            opt!(*question_dot_token);
            opt_list!(*type_arguments);
            opt_list!(*arguments);
        }
        TaggedTemplate {
            tag,
            question_dot_token,
            type_arguments,
            template,
        } => {
            node!(*tag);
            opt!(*question_dot_token);
            opt_list!(*type_arguments);
            node!(*template);
        }
        TypeAssertion {
            type_node,
            expression,
        } => {
            node!(*type_node);
            node!(*expression);
        }
        AsExpression {
            expression,
            type_node,
        } => {
            node!(*expression);
            node!(*type_node);
        }
        Return { expression } => opt!(*expression),
        Unary { operand, .. } => node!(*operand),
        Binary {
            left,
            operator_token,
            right,
        } => {
            node!(*left);
            node!(*operator_token);
            node!(*right);
        }
        Conditional {
            condition,
            question_token,
            when_true,
            colon_token,
            when_false,
        } => {
            node!(*condition);
            node!(*question_token);
            node!(*when_true);
            node!(*colon_token);
            node!(*when_false);
        }
        Yield {
            asterisk_token,
            expression,
        } => {
            opt!(*asterisk_token);
            opt!(*expression);
        }
        ClassLike {
            modifiers,
            name,
            type_parameters,
            heritage_clauses,
            members,
        } => {
            opt_list!(*modifiers);
            opt!(*name);
            opt_list!(*type_parameters);
            opt_list!(*heritage_clauses);
            list!(*members);
        }
        MetaProperty { name, .. } => node!(*name),

        Block { statements, .. } => list!(*statements),
        VariableStatement {
            modifiers,
            declaration_list,
        } => {
            opt_list!(*modifiers);
            node!(*declaration_list);
        }
        VariableDeclarationList { declarations } => list!(*declarations),
        VariableDeclaration {
            name,
            exclamation_token,
            type_annotation,
            initializer,
        } => {
            node!(*name);
            opt!(*exclamation_token);
            opt!(*type_annotation);
            opt!(*initializer);
        }
        If {
            expression,
            then_statement,
            else_statement,
        } => {
            node!(*expression);
            node!(*then_statement);
            opt!(*else_statement);
        }
        Do {
            statement,
            expression,
        } => {
            node!(*statement);
            node!(*expression);
        }
        WhileLike {
            expression,
            statement,
        } => {
            node!(*expression);
            node!(*statement);
        }
        For {
            initializer,
            condition,
            incrementor,
            statement,
        } => {
            opt!(*initializer);
            opt!(*condition);
            opt!(*incrementor);
            node!(*statement);
        }
        ForInOf {
            await_modifier,
            initializer,
            expression,
            statement,
        } => {
            opt!(*await_modifier);
            node!(*initializer);
            node!(*expression);
            node!(*statement);
        }
        Jump { label } => opt!(*label),
        Switch {
            expression,
            case_block,
        } => {
            node!(*expression);
            node!(*case_block);
        }
        Labeled { label, statement } => {
            node!(*label);
            node!(*statement);
        }
        Try {
            try_block,
            catch_clause,
            finally_block,
        } => {
            node!(*try_block);
            opt!(*catch_clause);
            opt!(*finally_block);
        }
        CatchClause {
            variable_declaration,
            block,
        } => {
            opt!(*variable_declaration);
            node!(*block);
        }
        CaseOrDefaultClause {
            expression,
            statements,
        } => {
            opt!(*expression);
            list!(*statements);
        }

        TypeAlias {
            modifiers,
            name,
            type_parameters,
            type_node,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt_list!(*type_parameters);
            node!(*type_node);
        }
        Enum {
            modifiers,
            name,
            members,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            list!(*members);
        }
        EnumMember { name, initializer } => {
            node!(*name);
            opt!(*initializer);
        }
        Module {
            modifiers,
            name,
            body,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*body);
        }
        ImportEquals {
            modifiers,
            name,
            module_reference,
            ..
        } => {
            opt_list!(*modifiers);
            node!(*name);
            node!(*module_reference);
        }
        ImportDeclaration {
            modifiers,
            import_clause,
            module_specifier,
            attributes,
        } => {
            opt_list!(*modifiers);
            opt!(*import_clause);
            node!(*module_specifier);
            opt!(*attributes);
        }
        ImportClause {
            name,
            named_bindings,
            ..
        } => {
            opt!(*name);
            opt!(*named_bindings);
        }
        NamespaceBinding { name } => node!(*name),
        NamedBindings { elements } => list!(*elements),
        ImportOrExportSpecifier {
            property_name,
            name,
            ..
        } => {
            opt!(*property_name);
            node!(*name);
        }
        ExportAssignment {
            modifiers,
            expression,
            ..
        } => {
            opt_list!(*modifiers);
            node!(*expression);
        }
        ExportDeclaration {
            modifiers,
            export_clause,
            module_specifier,
            attributes,
            ..
        } => {
            opt_list!(*modifiers);
            opt!(*export_clause);
            opt!(*module_specifier);
            opt!(*attributes);
        }
        ImportAttributes { elements, .. } => list!(*elements),
        ImportAttribute { name, value } => {
            node!(*name);
            node!(*value);
        }
        HeritageClause { types, .. } => list!(*types),
        PropertyAssignment {
            modifiers,
            name,
            question_token,
            exclamation_token,
            initializer,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*question_token);
            opt!(*exclamation_token);
            node!(*initializer);
        }
        ShorthandPropertyAssignment {
            modifiers,
            name,
            question_token,
            exclamation_token,
            equals_token,
            object_assignment_initializer,
        } => {
            opt_list!(*modifiers);
            node!(*name);
            opt!(*question_token);
            opt!(*exclamation_token);
            opt!(*equals_token);
            opt!(*object_assignment_initializer);
        }
        MissingDeclaration { modifiers } => opt_list!(*modifiers),

        JsxElement {
            opening,
            children,
            closing,
        } => {
            node!(*opening);
            list!(*children);
            node!(*closing);
        }
        JsxOpeningLike {
            tag_name,
            type_arguments,
            attributes,
        } => {
            node!(*tag_name);
            opt_list!(*type_arguments);
            node!(*attributes);
        }
        JsxClosingElement { tag_name } => node!(*tag_name),
        JsxAttributes { properties } => list!(*properties),
        JsxAttribute { name, initializer } => {
            node!(*name);
            opt!(*initializer);
        }
        JsxExpression {
            dot_dot_dot_token,
            expression,
        } => {
            opt!(*dot_dot_dot_token);
            opt!(*expression);
        }
        JsxNamespacedName { namespace, name } => {
            node!(*namespace);
            node!(*name);
        }

        JSDoc { comment, tags } => {
            opt_list!(*comment);
            opt_list!(*tags);
        }
        JSDocLink { name, .. } => opt!(*name),
        JSDocTag { tag_name, comment } => {
            node!(*tag_name);
            opt_list!(*comment);
        }
        JSDocTypedTag {
            tag_name,
            type_expression,
            comment,
        } => {
            node!(*tag_name);
            opt!(*type_expression);
            opt_list!(*comment);
        }
        JSDocHeritageTag {
            tag_name,
            class,
            comment,
        } => {
            node!(*tag_name);
            node!(*class);
            opt_list!(*comment);
        }
        JSDocPropertyLikeTag {
            tag_name,
            name,
            is_name_first,
            type_expression,
            comment,
            ..
        } => {
            node!(*tag_name);
            if *is_name_first {
                node!(*name);
                opt!(*type_expression);
            } else {
                opt!(*type_expression);
                node!(*name);
            }
            opt_list!(*comment);
        }
        JSDocTemplateTag {
            tag_name,
            constraint,
            type_parameters,
            comment,
        } => {
            node!(*tag_name);
            opt!(*constraint);
            list!(*type_parameters);
            opt_list!(*comment);
        }
        JSDocTypedefTag {
            tag_name,
            type_expression,
            full_name,
            comment,
        } => {
            node!(*tag_name);
            // A typedef written with a `{type}` names the type first.
            let type_first = arena.kind(node) == SyntaxKind::JSDocTypedefTag
                && type_expression
                    .is_some_and(|t| arena.kind(t) == SyntaxKind::JSDocTypeExpression);
            if type_first {
                opt!(*type_expression);
                opt!(*full_name);
            } else {
                opt!(*full_name);
                opt!(*type_expression);
            }
            opt_list!(*comment);
        }
        JSDocSeeTag {
            tag_name,
            name,
            comment,
        } => {
            node!(*tag_name);
            opt!(*name);
            opt_list!(*comment);
        }
        JSDocTypeLiteral { property_tags, .. } => opt_list!(*property_tags),
        JSDocSignature {
            type_parameters,
            parameters,
            type_tag,
        } => {
            opt_list!(*type_parameters);
            list!(*parameters);
            opt!(*type_tag);
        }

        SourceFile {
            statements,
            end_of_file_token,
        } => {
            list!(*statements);
            node!(*end_of_file_token);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, NodeListData};

    fn token(arena: &mut NodeArena, kind: SyntaxKind, pos: u32, end: u32) -> NodeId {
        arena.alloc(NodeData::new(kind, pos, end), NodePayload::Token)
    }

    /// `a ? b : c` built by hand.
    fn conditional(arena: &mut NodeArena) -> NodeId {
        let cond = token(arena, SyntaxKind::TrueKeyword, 0, 4);
        let q = token(arena, SyntaxKind::QuestionToken, 4, 6);
        let t = token(arena, SyntaxKind::NullKeyword, 6, 11);
        let colon = token(arena, SyntaxKind::ColonToken, 11, 13);
        let f = token(arena, SyntaxKind::ThisKeyword, 13, 18);
        arena.alloc(
            NodeData::new(SyntaxKind::ConditionalExpression, 0, 18),
            NodePayload::Conditional {
                condition: cond,
                question_token: q,
                when_true: t,
                colon_token: colon,
                when_false: f,
            },
        )
    }

    #[test]
    fn test_children_in_source_order() {
        let mut arena = NodeArena::new();
        let node = conditional(&mut arena);
        let kinds: Vec<SyntaxKind> = children(&arena, node)
            .into_iter()
            .map(|c| match c {
                Child::Node(id) => arena.kind(id),
                Child::List(_) => unreachable!(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::TrueKeyword,
                SyntaxKind::QuestionToken,
                SyntaxKind::NullKeyword,
                SyntaxKind::ColonToken,
                SyntaxKind::ThisKeyword,
            ]
        );
    }

    #[test]
    fn test_early_exit() {
        let mut arena = NodeArena::new();
        let node = conditional(&mut arena);
        let mut seen = 0;
        let found = for_each_child_node(&arena, node, |id| {
            seen += 1;
            (arena.kind(id) == SyntaxKind::NullKeyword).then_some(id)
        });
        assert_eq!(found.map(|id| arena.kind(id)), Some(SyntaxKind::NullKeyword));
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_lists_flattened_or_whole() {
        let mut arena = NodeArena::new();
        let a = token(&mut arena, SyntaxKind::NullKeyword, 1, 5);
        let b = token(&mut arena, SyntaxKind::TrueKeyword, 6, 10);
        let list = arena.alloc_list(NodeListData::new(vec![a, b], 1, 10));
        let array = arena.alloc(
            NodeData::new(SyntaxKind::ArrayLiteralExpression, 0, 11),
            NodePayload::ArrayLiteral {
                elements: list,
                multi_line: false,
            },
        );

        assert_eq!(children(&arena, array), vec![Child::List(list)]);

        let mut flat = Vec::new();
        for_each_child_node::<()>(&arena, array, |id| {
            flat.push(id);
            None
        });
        assert_eq!(flat, vec![a, b]);

        let mut all = Vec::new();
        walk_preorder(&arena, array, &mut |id| all.push(id));
        assert_eq!(all, vec![array, a, b]);
    }
}
