//! Syntax node definitions.
//!
//! Nodes live in a [`NodeArena`](crate::NodeArena) and refer to each other by
//! [`NodeId`] and [`ListId`] handles. One payload shape serves every kind
//! with the same children; the `kind` on [`NodeData`] tells them apart.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use rsparse_core::intern::InternedString;
use rsparse_core::text::TextRange;
use std::fmt;

/// Handle to a node in a [`NodeArena`](crate::NodeArena).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Handle to a node list in a [`NodeArena`](crate::NodeArena).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListId(pub u32);

impl ListId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    /// `pos` includes leading trivia, `end` is exclusive.
    pub range: TextRange,
    pub flags: NodeFlags,
    pub modifier_flags: ModifierFlags,
    /// Documentation comments preceding this node.
    pub js_doc: Option<ListId>,
    /// Set by incremental parsing on nodes overlapping an edit. Such nodes
    /// are never reused.
    pub intersects_change: bool,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
            modifier_flags: ModifierFlags::NONE,
            js_doc: None,
            intersects_change: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.range.pos
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.range.end
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.flags.contains(NodeFlags::THIS_NODE_HAS_ERROR)
    }

    #[inline]
    pub fn subtree_has_error(&self) -> bool {
        self.flags
            .intersects(NodeFlags::THIS_NODE_HAS_ERROR | NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR)
    }
}

/// An ordered list of child nodes with its own text range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeListData {
    pub range: TextRange,
    pub nodes: Vec<NodeId>,
    pub has_trailing_comma: bool,
    /// The list was required but its opening token was missing.
    pub is_missing_list: bool,
    pub intersects_change: bool,
}

impl NodeListData {
    pub fn new(nodes: Vec<NodeId>, pos: u32, end: u32) -> Self {
        Self {
            range: TextRange::new(pos, end),
            nodes,
            has_trailing_comma: false,
            is_missing_list: false,
            intersects_change: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }
}

/// A node: common data plus the kind-specific children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub data: NodeData,
    pub payload: NodePayload,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data.range
    }

    /// The modifier list of a declaration, if it has one.
    pub fn modifiers(&self) -> Option<ListId> {
        use NodePayload::*;
        match &self.payload {
            TypeParameter { modifiers, .. }
            | Parameter { modifiers, .. }
            | PropertySignature { modifiers, .. }
            | PropertyDeclaration { modifiers, .. }
            | FunctionLike { modifiers, .. }
            | ClassStaticBlock { modifiers, .. }
            | ClassLike { modifiers, .. }
            | VariableStatement { modifiers, .. }
            | TypeAlias { modifiers, .. }
            | Enum { modifiers, .. }
            | Module { modifiers, .. }
            | ImportEquals { modifiers, .. }
            | ImportDeclaration { modifiers, .. }
            | ExportAssignment { modifiers, .. }
            | ExportDeclaration { modifiers, .. }
            | PropertyAssignment { modifiers, .. }
            | ShorthandPropertyAssignment { modifiers, .. }
            | MissingDeclaration { modifiers } => *modifiers,
            _ => None,
        }
    }

    /// The declared name, for kinds that have one.
    pub fn name(&self) -> Option<NodeId> {
        use NodePayload::*;
        match &self.payload {
            TypeParameter { name, .. }
            | Parameter { name, .. }
            | PropertySignature { name, .. }
            | PropertyDeclaration { name, .. }
            | BindingElement { name, .. }
            | VariableDeclaration { name, .. }
            | TypeAlias { name, .. }
            | Enum { name, .. }
            | EnumMember { name, .. }
            | Module { name, .. }
            | ImportEquals { name, .. }
            | ImportOrExportSpecifier { name, .. }
            | PropertyAssignment { name, .. }
            | ShorthandPropertyAssignment { name, .. }
            | NamespaceBinding { name }
            | PropertyAccess { name, .. }
            | NamedTupleMember { name, .. }
            | JsxAttribute { name, .. } => Some(*name),
            FunctionLike { name, .. } | ClassLike { name, .. } | ImportClause { name, .. } => *name,
            _ => None,
        }
    }
}

/// Kind-specific children of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePayload {
    /// Punctuation, keywords, keyword types, `this` type, omitted
    /// expressions and statements without children.
    Token,
    /// `Identifier` and `PrivateIdentifier`.
    Identifier {
        text: InternedString,
        original_keyword_kind: Option<SyntaxKind>,
    },
    /// Numeric, bigint, string, regex and template literals, JSX text and
    /// JSDoc text. `text` holds the cooked value.
    Literal {
        text: InternedString,
        token_flags: TokenFlags,
    },
    /// `QualifiedName` and `JSDocMemberName`.
    QualifiedName { left: NodeId, right: NodeId },
    /// Every node whose only child is one expression.
    ExpressionWrapper { expression: NodeId },

    // ---- Signature elements --------------------------------------------
    TypeParameter {
        modifiers: Option<ListId>,
        name: NodeId,
        constraint: Option<NodeId>,
        default: Option<NodeId>,
        /// Set for JSDoc-style `@template` parameters written as expressions.
        expression: Option<NodeId>,
    },
    Parameter {
        modifiers: Option<ListId>,
        dot_dot_dot_token: Option<NodeId>,
        name: NodeId,
        question_token: Option<NodeId>,
        type_annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    PropertySignature {
        modifiers: Option<ListId>,
        name: NodeId,
        question_token: Option<NodeId>,
        type_annotation: Option<NodeId>,
    },
    PropertyDeclaration {
        modifiers: Option<ListId>,
        name: NodeId,
        question_token: Option<NodeId>,
        exclamation_token: Option<NodeId>,
        type_annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    /// Methods, constructors, accessors, signatures, function types,
    /// function declarations and expressions, arrows.
    FunctionLike {
        modifiers: Option<ListId>,
        asterisk_token: Option<NodeId>,
        name: Option<NodeId>,
        question_token: Option<NodeId>,
        exclamation_token: Option<NodeId>,
        type_parameters: Option<ListId>,
        parameters: ListId,
        type_annotation: Option<NodeId>,
        equals_greater_than_token: Option<NodeId>,
        body: Option<NodeId>,
    },
    ClassStaticBlock {
        modifiers: Option<ListId>,
        body: NodeId,
    },

    // ---- Types ---------------------------------------------------------
    TypePredicate {
        asserts_modifier: Option<NodeId>,
        parameter_name: NodeId,
        type_node: Option<NodeId>,
    },
    /// `TypeReference`, `TypeQuery` and `ExpressionWithTypeArguments`.
    TypeReference {
        type_name: NodeId,
        type_arguments: Option<ListId>,
    },
    TypeLiteral { members: ListId },
    TupleType { elements: ListId },
    UnionOrIntersection { types: ListId },
    ArrayType { element_type: NodeId },
    /// A single type child: optional, rest and parenthesized types, the
    /// JSDoc postfix types, type expressions and name references.
    WrappedType {
        type_node: NodeId,
        /// For the JSDoc `?`/`!`/`=` types: the operator followed the type.
        postfix: bool,
    },
    ConditionalType {
        check_type: NodeId,
        extends_type: NodeId,
        true_type: NodeId,
        false_type: NodeId,
    },
    InferType { type_parameter: NodeId },
    TypeOperator {
        operator: SyntaxKind,
        type_node: NodeId,
    },
    IndexedAccessType {
        object_type: NodeId,
        index_type: NodeId,
    },
    MappedType {
        readonly_token: Option<NodeId>,
        type_parameter: NodeId,
        name_type: Option<NodeId>,
        question_token: Option<NodeId>,
        type_node: Option<NodeId>,
        members: Option<ListId>,
    },
    LiteralType { literal: NodeId },
    NamedTupleMember {
        dot_dot_dot_token: Option<NodeId>,
        name: NodeId,
        question_token: Option<NodeId>,
        type_node: NodeId,
    },
    /// `TemplateExpression` and `TemplateLiteralType`.
    Template { head: NodeId, spans: ListId },
    /// `TemplateSpan` and `TemplateLiteralTypeSpan`.
    TemplateSpan { expression: NodeId, literal: NodeId },
    ImportType {
        is_type_of: bool,
        argument: NodeId,
        attributes: Option<NodeId>,
        qualifier: Option<NodeId>,
        type_arguments: Option<ListId>,
    },

    // ---- Binding patterns ----------------------------------------------
    BindingPattern { elements: ListId },
    BindingElement {
        dot_dot_dot_token: Option<NodeId>,
        property_name: Option<NodeId>,
        name: NodeId,
        initializer: Option<NodeId>,
    },

    // ---- Expressions ---------------------------------------------------
    ArrayLiteral { elements: ListId, multi_line: bool },
    ObjectLiteral { properties: ListId, multi_line: bool },
    PropertyAccess {
        expression: NodeId,
        question_dot_token: Option<NodeId>,
        name: NodeId,
    },
    ElementAccess {
        expression: NodeId,
        question_dot_token: Option<NodeId>,
        argument_expression: NodeId,
    },
    /// `CallExpression` and `NewExpression`. `new X` has no argument list.
    Call {
        expression: NodeId,
        question_dot_token: Option<NodeId>,
        type_arguments: Option<ListId>,
        arguments: Option<ListId>,
    },
    TaggedTemplate {
        tag: NodeId,
        question_dot_token: Option<NodeId>,
        type_arguments: Option<ListId>,
        template: NodeId,
    },
    TypeAssertion { type_node: NodeId, expression: NodeId },
    /// `AsExpression` and `SatisfiesExpression`.
    AsExpression { expression: NodeId, type_node: NodeId },
    /// `ReturnStatement`.
    Return { expression: Option<NodeId> },
    /// Prefix and postfix unary expressions.
    Unary { operator: SyntaxKind, operand: NodeId },
    Binary {
        left: NodeId,
        operator_token: NodeId,
        right: NodeId,
    },
    Conditional {
        condition: NodeId,
        question_token: NodeId,
        when_true: NodeId,
        colon_token: NodeId,
        when_false: NodeId,
    },
    Yield {
        asterisk_token: Option<NodeId>,
        expression: Option<NodeId>,
    },
    /// Class declarations and expressions, interfaces.
    ClassLike {
        modifiers: Option<ListId>,
        name: Option<NodeId>,
        type_parameters: Option<ListId>,
        heritage_clauses: Option<ListId>,
        members: ListId,
    },
    MetaProperty { keyword_token: SyntaxKind, name: NodeId },

    // ---- Statements ----------------------------------------------------
    /// `Block`, `ModuleBlock` and `CaseBlock`.
    Block { statements: ListId, multi_line: bool },
    VariableStatement {
        modifiers: Option<ListId>,
        declaration_list: NodeId,
    },
    VariableDeclarationList { declarations: ListId },
    VariableDeclaration {
        name: NodeId,
        exclamation_token: Option<NodeId>,
        type_annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    If {
        expression: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    },
    Do { statement: NodeId, expression: NodeId },
    /// `WhileStatement` and `WithStatement`.
    WhileLike { expression: NodeId, statement: NodeId },
    For {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        statement: NodeId,
    },
    ForInOf {
        await_modifier: Option<NodeId>,
        initializer: NodeId,
        expression: NodeId,
        statement: NodeId,
    },
    /// `BreakStatement` and `ContinueStatement`.
    Jump { label: Option<NodeId> },
    Switch { expression: NodeId, case_block: NodeId },
    Labeled { label: NodeId, statement: NodeId },
    Try {
        try_block: NodeId,
        catch_clause: Option<NodeId>,
        finally_block: Option<NodeId>,
    },
    CatchClause {
        variable_declaration: Option<NodeId>,
        block: NodeId,
    },
    CaseOrDefaultClause {
        expression: Option<NodeId>,
        statements: ListId,
    },

    // ---- Declarations --------------------------------------------------
    TypeAlias {
        modifiers: Option<ListId>,
        name: NodeId,
        type_parameters: Option<ListId>,
        type_node: NodeId,
    },
    Enum {
        modifiers: Option<ListId>,
        name: NodeId,
        members: ListId,
    },
    EnumMember { name: NodeId, initializer: Option<NodeId> },
    Module {
        modifiers: Option<ListId>,
        name: NodeId,
        body: Option<NodeId>,
    },
    ImportEquals {
        modifiers: Option<ListId>,
        is_type_only: bool,
        name: NodeId,
        module_reference: NodeId,
    },
    ImportDeclaration {
        modifiers: Option<ListId>,
        import_clause: Option<NodeId>,
        module_specifier: NodeId,
        attributes: Option<NodeId>,
    },
    ImportClause {
        is_type_only: bool,
        name: Option<NodeId>,
        named_bindings: Option<NodeId>,
    },
    /// `NamespaceImport`, `NamespaceExport` and `NamespaceExportDeclaration`.
    NamespaceBinding { name: NodeId },
    /// `NamedImports` and `NamedExports`.
    NamedBindings { elements: ListId },
    ImportOrExportSpecifier {
        is_type_only: bool,
        property_name: Option<NodeId>,
        name: NodeId,
    },
    ExportAssignment {
        modifiers: Option<ListId>,
        is_export_equals: bool,
        expression: NodeId,
    },
    ExportDeclaration {
        modifiers: Option<ListId>,
        is_type_only: bool,
        export_clause: Option<NodeId>,
        module_specifier: Option<NodeId>,
        attributes: Option<NodeId>,
    },
    ImportAttributes {
        /// `WithKeyword` or `AssertKeyword`.
        token: SyntaxKind,
        elements: ListId,
        multi_line: bool,
    },
    ImportAttribute { name: NodeId, value: NodeId },
    HeritageClause { token: SyntaxKind, types: ListId },
    PropertyAssignment {
        modifiers: Option<ListId>,
        name: NodeId,
        question_token: Option<NodeId>,
        exclamation_token: Option<NodeId>,
        initializer: NodeId,
    },
    ShorthandPropertyAssignment {
        modifiers: Option<ListId>,
        name: NodeId,
        question_token: Option<NodeId>,
        exclamation_token: Option<NodeId>,
        equals_token: Option<NodeId>,
        object_assignment_initializer: Option<NodeId>,
    },
    MissingDeclaration { modifiers: Option<ListId> },

    // ---- JSX -----------------------------------------------------------
    /// `JsxElement` and `JsxFragment`.
    JsxElement {
        opening: NodeId,
        children: ListId,
        closing: NodeId,
    },
    /// `JsxOpeningElement` and `JsxSelfClosingElement`.
    JsxOpeningLike {
        tag_name: NodeId,
        type_arguments: Option<ListId>,
        attributes: NodeId,
    },
    JsxClosingElement { tag_name: NodeId },
    JsxAttributes { properties: ListId },
    JsxAttribute { name: NodeId, initializer: Option<NodeId> },
    JsxExpression {
        dot_dot_dot_token: Option<NodeId>,
        expression: Option<NodeId>,
    },
    JsxNamespacedName { namespace: NodeId, name: NodeId },

    // ---- JSDoc ---------------------------------------------------------
    JSDoc {
        /// `JSDocText` and `JSDocLink*` nodes making up the main description.
        comment: Option<ListId>,
        tags: Option<ListId>,
    },
    /// `JSDocLink`, `JSDocLinkCode` and `JSDocLinkPlain`.
    JSDocLink { name: Option<NodeId>, text: InternedString },
    /// Tags with no structure beyond their comment.
    JSDocTag { tag_name: NodeId, comment: Option<ListId> },
    /// `@returns`, `@type`, `@this`, `@enum`, `@throws`, `@satisfies`, `@overload`.
    JSDocTypedTag {
        tag_name: NodeId,
        type_expression: Option<NodeId>,
        comment: Option<ListId>,
    },
    /// `@augments` and `@implements`.
    JSDocHeritageTag {
        tag_name: NodeId,
        class: NodeId,
        comment: Option<ListId>,
    },
    /// `@param` and `@property`.
    JSDocPropertyLikeTag {
        tag_name: NodeId,
        name: NodeId,
        is_name_first: bool,
        is_bracketed: bool,
        type_expression: Option<NodeId>,
        comment: Option<ListId>,
    },
    JSDocTemplateTag {
        tag_name: NodeId,
        constraint: Option<NodeId>,
        type_parameters: ListId,
        comment: Option<ListId>,
    },
    /// `@typedef` and `@callback`.
    JSDocTypedefTag {
        tag_name: NodeId,
        type_expression: Option<NodeId>,
        full_name: Option<NodeId>,
        comment: Option<ListId>,
    },
    JSDocSeeTag {
        tag_name: NodeId,
        name: Option<NodeId>,
        comment: Option<ListId>,
    },
    JSDocTypeLiteral {
        property_tags: Option<ListId>,
        is_array_type: bool,
    },
    JSDocSignature {
        type_parameters: Option<ListId>,
        parameters: ListId,
        type_tag: Option<NodeId>,
    },

    SourceFile {
        statements: ListId,
        end_of_file_token: NodeId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsparse_core::StringInterner;

    #[test]
    fn test_node_data_defaults() {
        let data = NodeData::new(SyntaxKind::Identifier, 3, 7);
        assert_eq!(data.pos(), 3);
        assert_eq!(data.end(), 7);
        assert!(!data.has_error());
        assert!(data.js_doc.is_none());
    }

    #[test]
    fn test_name_accessor() {
        let interner = StringInterner::new();
        let node = Node {
            data: NodeData::new(SyntaxKind::EnumMember, 0, 1),
            payload: NodePayload::EnumMember {
                name: NodeId(4),
                initializer: None,
            },
        };
        assert_eq!(node.name(), Some(NodeId(4)));
        assert_eq!(node.modifiers(), None);

        let ident = Node {
            data: NodeData::new(SyntaxKind::Identifier, 0, 1),
            payload: NodePayload::Identifier {
                text: interner.intern("x"),
                original_keyword_kind: None,
            },
        };
        assert_eq!(ident.name(), None);
    }
}
