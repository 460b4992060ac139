//! Documentation comment tests: attachment to declarations, tag structure,
//! embedded types and the standalone entry points.

use pretty_assertions::assert_eq;
use rsparse_ast::{JSDocParsingMode, NodeId, NodePayload, SourceFile, SyntaxKind};
use rsparse_parser::{parse_jsdoc_comment, parse_jsdoc_type_expression_for_tests, parse_source_file, ParseOptions};

fn parse_js(text: &str) -> SourceFile {
    parse_source_file("test.js", text, ParseOptions::for_file_name("test.js"))
}

fn tags_of(file: &SourceFile, host: NodeId) -> Vec<NodeId> {
    let docs = file.js_doc(host);
    let doc = *docs.last().expect("host is documented");
    match file.arena.get(doc).payload {
        NodePayload::JSDoc { tags, .. } => file.arena.list_nodes(tags).to_vec(),
        ref other => panic!("not a JSDoc node: {other:?}"),
    }
}

fn tag_kinds(file: &SourceFile, host: NodeId) -> Vec<SyntaxKind> {
    tags_of(file, host).iter().map(|&tag| file.kind(tag)).collect()
}

fn type_of(file: &SourceFile, type_expression: NodeId) -> NodeId {
    match file.arena.get(type_expression).payload {
        NodePayload::WrappedType { type_node, .. } => type_node,
        ref other => panic!("not a type expression: {other:?}"),
    }
}

#[test]
fn test_every_preceding_doc_comment_attaches() {
    let file = parse_js("/** first */\n/** second */\nfunction f() {}");
    assert_eq!(file.js_doc(file.statements()[0]).len(), 2);
}

#[test]
fn test_plain_comments_are_not_documentation() {
    let file = parse_js("/* plain */\n// line\nfunction f() {}\n/***/\nvar x;");
    assert!(file.js_doc(file.statements()[0]).is_empty());
}

#[test]
fn test_class_members_and_variables_are_documented() {
    let text = "class C {\n  /** @private */\n  x = 1;\n  /** @returns {number} */\n  m() { return 1; }\n}\n/** @type {string} */\nconst s = '';";
    let file = parse_js(text);
    let NodePayload::ClassLike { members, .. } = file.arena.get(file.statements()[0]).payload else {
        panic!("expected a class");
    };
    let members = file.arena.list(members).nodes.clone();
    assert_eq!(tag_kinds(&file, members[0]), vec![SyntaxKind::JSDocPrivateTag]);
    assert_eq!(tag_kinds(&file, members[1]), vec![SyntaxKind::JSDocReturnTag]);
    assert_eq!(tag_kinds(&file, file.statements()[1]), vec![SyntaxKind::JSDocTypeTag]);
}

#[test]
fn test_modifier_and_heritage_tags() {
    let text = "/**\n * @class\n * @extends {Base}\n * @implements {Shape}\n * @deprecated use other\n * @readonly\n * @override\n */\nfunction Square() {}";
    let file = parse_js(text);
    assert_eq!(
        tag_kinds(&file, file.statements()[0]),
        vec![
            SyntaxKind::JSDocClassTag,
            SyntaxKind::JSDocAugmentsTag,
            SyntaxKind::JSDocImplementsTag,
            SyntaxKind::JSDocDeprecatedTag,
            SyntaxKind::JSDocReadonlyTag,
            SyntaxKind::JSDocOverrideTag,
        ]
    );
    assert!(file.js_doc_diagnostics.is_empty());
}

#[test]
fn test_optional_bracketed_parameter() {
    let file = parse_js("/** @param {string} [name='x'] the name */\nfunction f(name) {}");
    let tags = tags_of(&file, file.statements()[0]);
    let NodePayload::JSDocPropertyLikeTag {
        name,
        is_bracketed,
        is_name_first,
        ..
    } = file.arena.get(tags[0]).payload
    else {
        panic!("expected a parameter tag");
    };
    assert!(is_bracketed);
    assert!(!is_name_first);
    assert_eq!(file.identifier_text(name), Some("name"));
}

#[test]
fn test_name_first_parameter() {
    let file = parse_js("/** @param value {number} */\nfunction f(value) {}");
    let tags = tags_of(&file, file.statements()[0]);
    let NodePayload::JSDocPropertyLikeTag {
        is_name_first,
        type_expression,
        ..
    } = file.arena.get(tags[0]).payload
    else {
        panic!("expected a parameter tag");
    };
    assert!(is_name_first);
    assert!(type_expression.is_some());
}

#[test]
fn test_nested_parameter_properties() {
    let text = "/**\n * @param {Object} opts\n * @param {string} opts.name\n * @param {number} [opts.size]\n */\nfunction f(opts) {}";
    let file = parse_js(text);
    let tags = tags_of(&file, file.statements()[0]);
    assert_eq!(tags.len(), 1);
    let NodePayload::JSDocPropertyLikeTag {
        type_expression: Some(type_expression),
        is_name_first,
        ..
    } = file.arena.get(tags[0]).payload
    else {
        panic!("expected a typed parameter tag");
    };
    assert!(is_name_first);
    let literal = type_of(&file, type_expression);
    assert_eq!(file.kind(literal), SyntaxKind::JSDocTypeLiteral);
    let NodePayload::JSDocTypeLiteral { property_tags, .. } = file.arena.get(literal).payload else {
        panic!("expected a type literal");
    };
    let nested = file.arena.list_nodes(property_tags);
    assert_eq!(nested.len(), 2);
    let NodePayload::JSDocPropertyLikeTag { name, .. } = file.arena.get(nested[0]).payload else {
        panic!("expected a nested parameter");
    };
    assert_eq!(file.kind(name), SyntaxKind::QualifiedName);
}

#[test]
fn test_callback_tag() {
    let text = "/**\n * @callback Handler\n * @param {Event} event\n * @returns {boolean}\n */\nvar h;";
    let file = parse_js(text);
    let tags = tags_of(&file, file.statements()[0]);
    assert_eq!(file.kind(tags[0]), SyntaxKind::JSDocCallbackTag);
    let NodePayload::JSDocTypedefTag {
        type_expression: Some(signature),
        full_name,
        ..
    } = file.arena.get(tags[0]).payload
    else {
        panic!("expected a callback with a signature");
    };
    assert_eq!(file.identifier_text(full_name.expect("named callback")), Some("Handler"));
    let NodePayload::JSDocSignature {
        parameters, type_tag, ..
    } = file.arena.get(signature).payload
    else {
        panic!("expected a signature");
    };
    assert_eq!(file.arena.list(parameters).len(), 1);
    assert_eq!(file.kind(type_tag.expect("return tag")), SyntaxKind::JSDocReturnTag);
}

#[test]
fn test_namespaced_typedef() {
    let file = parse_js("/** @typedef {string} ns.sub.Name */\nvar n;");
    let tags = tags_of(&file, file.statements()[0]);
    let NodePayload::JSDocTypedefTag { full_name, .. } = file.arena.get(tags[0]).payload else {
        panic!("expected a typedef");
    };
    assert_eq!(file.kind(full_name.expect("named typedef")), SyntaxKind::ModuleDeclaration);
}

#[test]
fn test_see_tag_and_links() {
    let text = "/**\n * Uses {@linkcode Foo} and {@linkplain bar.baz}.\n * @see {@link Other}\n */\nvar v;";
    let file = parse_js(text);
    let docs = file.js_doc(file.statements()[0]);
    let NodePayload::JSDoc { comment, tags } = file.arena.get(docs[0]).payload else {
        panic!("not a JSDoc node");
    };
    let kinds: Vec<SyntaxKind> = file.arena.list_nodes(comment).iter().map(|&n| file.kind(n)).collect();
    assert!(kinds.contains(&SyntaxKind::JSDocLinkCode));
    assert!(kinds.contains(&SyntaxKind::JSDocLinkPlain));
    let tags = file.arena.list_nodes(tags);
    assert_eq!(file.kind(tags[0]), SyntaxKind::JSDocSeeTag);
}

#[test]
fn test_jsdoc_in_typescript_files() {
    let file = parse_source_file(
        "test.ts",
        "/**\n * Docs.\n * @param x the value\n */\nfunction f(x: number) {}",
        ParseOptions::for_file_name("test.ts"),
    );
    assert_eq!(tag_kinds(&file, file.statements()[0]), vec![SyntaxKind::JSDocParameterTag]);
}

#[test]
fn test_parse_none_mode() {
    let mut options = ParseOptions::for_file_name("test.js");
    options.jsdoc_parsing_mode = JSDocParsingMode::ParseNone;
    let file = parse_source_file("test.js", "/** @type {number} */\nvar x;", options);
    assert!(file.js_doc(file.statements()[0]).is_empty());
    assert!(file.js_doc_diagnostics.is_empty());
}

#[test]
fn test_malformed_tags_report_separately() {
    let file = parse_js("/**\n * @param {number\n * @template {string}\n */\nfunction f(a) {}\nlet ok = 1;");
    assert!(file.parse_diagnostics.is_empty());
    assert!(!file.js_doc_diagnostics.is_empty());
    assert_eq!(file.statements().len(), 2);
}

// ============================================================================
// Standalone entry points
// ============================================================================

#[test]
fn test_type_expression_forms() {
    for (text, expected) in [
        ("{*}", SyntaxKind::JSDocAllType),
        ("{?}", SyntaxKind::JSDocUnknownType),
        ("{?number}", SyntaxKind::JSDocNullableType),
        ("{!Object}", SyntaxKind::JSDocNonNullableType),
        ("{...number}", SyntaxKind::JSDocVariadicType),
        ("{function(string, number): void}", SyntaxKind::JSDocFunctionType),
        ("{string|number}", SyntaxKind::UnionType),
    ] {
        let fragment =
            parse_jsdoc_type_expression_for_tests(text, 0, text.len()).expect("range inside the text");
        assert!(fragment.diagnostics.is_empty(), "{text}: {:?}", fragment.diagnostics);
        let NodePayload::WrappedType { type_node, .. } = fragment.arena.get(fragment.node).payload else {
            panic!("{text}: not a type expression");
        };
        assert_eq!(fragment.arena.kind(type_node), expected, "{text}");
    }
}

#[test]
fn test_type_expression_needs_braces() {
    let fragment = parse_jsdoc_type_expression_for_tests("number", 0, 6).expect("range inside the text");
    assert!(fragment.has_errors());
}

#[test]
fn test_standalone_comment() {
    let text = "let before;\n/** Summary.\n * @returns {void}\n */";
    let start = text.find("/**").expect("comment");
    let fragment = parse_jsdoc_comment(text, start, text.len() - start).expect("doc comment");
    assert_eq!(fragment.kind(), SyntaxKind::JSDoc);
    assert_eq!(fragment.arena.range(fragment.node).pos as usize, start);
    let NodePayload::JSDoc { tags, .. } = fragment.arena.get(fragment.node).payload else {
        panic!("not a JSDoc node");
    };
    assert_eq!(fragment.arena.list_nodes(tags).len(), 1);
    assert!(parse_jsdoc_comment(text, 0, 11).is_none());
}
