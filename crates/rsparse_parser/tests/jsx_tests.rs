//! JSX parsing through the public entry points.

use pretty_assertions::assert_eq;
use rsparse_ast::{walk_preorder, NodeId, NodePayload, SourceFile, SyntaxKind};
use rsparse_parser::{parse_source_file, ParseOptions};

fn parse(name: &str, text: &str) -> SourceFile {
    parse_source_file(name, text, ParseOptions::for_file_name(name))
}

fn kinds(file: &SourceFile) -> Vec<SyntaxKind> {
    let mut kinds = Vec::new();
    walk_preorder(&file.arena, file.root, &mut |node| kinds.push(file.kind(node)));
    kinds
}

fn initializer_of_first_declaration(file: &SourceFile) -> NodeId {
    let NodePayload::VariableStatement { declaration_list, .. } = file.arena.get(file.statements()[0]).payload else {
        panic!("expected a variable statement");
    };
    let NodePayload::VariableDeclarationList { declarations } = file.arena.get(declaration_list).payload else {
        panic!("expected a declaration list");
    };
    let declaration = file.arena.list(declarations).nodes[0];
    let NodePayload::VariableDeclaration { initializer, .. } = file.arena.get(declaration).payload else {
        panic!("expected a declaration");
    };
    initializer.expect("declaration has an initializer")
}

#[test]
fn test_nested_elements_and_attributes() {
    let text = "const app = (\n  <Layout title=\"Home\" {...rest} disabled>\n    <Header />\n    {items.map(item => <Item key={item.id} {...item} />)}\n    text &amp; more\n  </Layout>\n);";
    let file = parse("app.tsx", text);
    assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
    let kinds = kinds(&file);
    for expected in [
        SyntaxKind::JsxElement,
        SyntaxKind::JsxSelfClosingElement,
        SyntaxKind::JsxAttribute,
        SyntaxKind::JsxSpreadAttribute,
        SyntaxKind::JsxExpression,
        SyntaxKind::JsxText,
        SyntaxKind::ArrowFunction,
    ] {
        assert!(kinds.contains(&expected), "missing {expected:?}");
    }
}

#[test]
fn test_element_children_in_order() {
    let file = parse("view.jsx", "const v = <ul><li>a</li>{b}<li>c</li></ul>;");
    assert!(file.diagnostics().is_empty());
    let element = initializer_of_first_declaration(&file);
    let NodePayload::JsxElement { children, .. } = file.arena.get(element).payload else {
        panic!("expected an element");
    };
    let child_kinds: Vec<SyntaxKind> = file.arena.list(children).iter().map(|c| file.kind(c)).collect();
    assert_eq!(
        child_kinds,
        vec![SyntaxKind::JsxElement, SyntaxKind::JsxExpression, SyntaxKind::JsxElement]
    );
}

#[test]
fn test_fragments_and_namespaced_attributes() {
    let file = parse("frag.tsx", "const f = <><svg xlink:href=\"#a\" /></>;");
    assert!(file.diagnostics().is_empty());
    let element = initializer_of_first_declaration(&file);
    assert_eq!(file.kind(element), SyntaxKind::JsxFragment);
    assert!(kinds(&file).contains(&SyntaxKind::JsxNamespacedName));
}

#[test]
fn test_generic_element_type_arguments() {
    let file = parse("gen.tsx", "const g = <Select<string> value=\"a\" />;");
    assert!(file.diagnostics().is_empty());
    let element = initializer_of_first_declaration(&file);
    let NodePayload::JsxOpeningLike { type_arguments, .. } = file.arena.get(element).payload else {
        panic!("expected a self-closing element");
    };
    assert_eq!(file.arena.list_nodes(type_arguments).len(), 1);
}

#[test]
fn test_generic_arrow_in_tsx_needs_a_constraint_or_comma() {
    let file = parse("arrow.tsx", "const id = <T,>(x: T) => x;");
    assert!(file.diagnostics().is_empty());
    assert_eq!(
        file.kind(initializer_of_first_declaration(&file)),
        SyntaxKind::ArrowFunction
    );
}

#[test]
fn test_angle_bracket_assertion_only_outside_jsx() {
    let file = parse("cast.ts", "const n = <number>value;");
    assert!(file.diagnostics().is_empty());
    assert_eq!(
        file.kind(initializer_of_first_declaration(&file)),
        SyntaxKind::TypeAssertionExpression
    );
}

#[test]
fn test_unclosed_element_reports() {
    let file = parse("bad.tsx", "const b = <div><span></div>;");
    assert!(!file.diagnostics().is_empty());
    assert_eq!(file.statements().len(), 1);
}

#[test]
fn test_closing_tag_mismatch_code() {
    let file = parse("bad.tsx", "const b = <a.b></a.c>;");
    assert_eq!(file.diagnostics().len(), 1);
    assert_eq!(file.diagnostics()[0].code, 17002);
}

#[test]
fn test_jsx_entities_stay_raw_in_text() {
    let file = parse("text.jsx", "const t = <p>1 &lt; 2</p>;");
    let mut text = None;
    walk_preorder(&file.arena, file.root, &mut |node| {
        if file.kind(node) == SyntaxKind::JsxText {
            text = Some(file.node_text(node).to_string());
        }
    });
    assert_eq!(text.as_deref(), Some("1 &lt; 2"));
}
