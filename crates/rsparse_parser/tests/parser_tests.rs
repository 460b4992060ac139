//! Parser integration tests.
//!
//! Exercises the public entry points on whole files: tree shape, error
//! recovery, diagnostics and the position guarantees every tree keeps.

use pretty_assertions::assert_eq;
use rsparse_ast::{children, walk_preorder, Child, NodeFlags, NodeId, NodePayload, PragmaKind, SourceFile, SyntaxKind};
use rsparse_parser::{is_external_module, parse_isolated_entity_name, parse_source_file, ParseOptions};

/// Helper: parse `source` as a TypeScript file.
fn parse(source: &str) -> SourceFile {
    parse_source_file("test.ts", source, ParseOptions::for_file_name("test.ts"))
}

/// Helper: assert that `source` parses cleanly into `expected` statements.
fn assert_statement_count(source: &str, expected: usize) {
    let file = parse(source);
    assert!(file.diagnostics().is_empty(), "source: {source}\n{:?}", file.diagnostics());
    assert_eq!(file.statements().len(), expected, "source: {source}");
}

fn expression_of_statement(file: &SourceFile, index: usize) -> NodeId {
    let statement = file.statements()[index];
    match file.arena.get(statement).payload {
        NodePayload::ExpressionWrapper { expression } => expression,
        ref other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Binary expressions as `(op left right)`, everything else as its text.
fn sexpr(file: &SourceFile, node: NodeId) -> String {
    match file.arena.get(node).payload {
        NodePayload::Binary {
            left,
            operator_token,
            right,
        } => format!(
            "({} {} {})",
            file.node_text(operator_token),
            sexpr(file, left),
            sexpr(file, right)
        ),
        _ => file.node_text(node).to_string(),
    }
}

fn messages(file: &SourceFile) -> Vec<&str> {
    file.diagnostics().iter().map(|d| d.message_text.as_str()).collect()
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence_climbing() {
    let file = parse("1+2*3");
    assert!(file.diagnostics().is_empty());
    assert_eq!(sexpr(&file, expression_of_statement(&file, 0)), "(+ 1 (* 2 3))");
}

#[test]
fn test_left_associative_operators() {
    let file = parse("a - b - c;");
    assert_eq!(sexpr(&file, expression_of_statement(&file, 0)), "(- (- a b) c)");
}

#[test]
fn test_assignment_is_right_associative() {
    let file = parse("a = b = c;");
    assert_eq!(sexpr(&file, expression_of_statement(&file, 0)), "(= a (= b c))");
}

#[test]
fn test_logical_operators_precedence() {
    let file = parse("a || b && c ?? d;");
    // `??` cannot be mixed with `||` without parentheses; the tree is still built.
    let expression = expression_of_statement(&file, 0);
    assert_eq!(file.arena.kind(expression), SyntaxKind::BinaryExpression);
    let file = parse("a || b && c;");
    assert_eq!(sexpr(&file, expression_of_statement(&file, 0)), "(|| a (&& b c))");
}

#[test]
fn test_parenthesized_arrow_function() {
    let file = parse("(x) => x");
    assert!(file.diagnostics().is_empty());
    let arrow = expression_of_statement(&file, 0);
    assert_eq!(file.arena.kind(arrow), SyntaxKind::ArrowFunction);
    let NodePayload::FunctionLike { parameters, body, .. } = file.arena.get(arrow).payload else {
        panic!("expected a function");
    };
    assert_eq!(file.arena.list(parameters).len(), 1);
    assert_eq!(file.arena.kind(body.expect("arrow has a body")), SyntaxKind::Identifier);
}

#[test]
fn test_parenthesized_comma_expression() {
    let file = parse("(x, y)");
    assert!(file.diagnostics().is_empty());
    let expression = expression_of_statement(&file, 0);
    assert_eq!(file.arena.kind(expression), SyntaxKind::ParenthesizedExpression);
    let NodePayload::ExpressionWrapper { expression: inner } = file.arena.get(expression).payload else {
        panic!("expected a parenthesized expression");
    };
    assert_eq!(sexpr(&file, inner), "(, x y)");
}

#[test]
fn test_typed_and_generic_arrows() {
    for source in [
        "(a: number, b?: string): void => {};",
        "<T>(x: T) => x;",
        "async (x) => await x;",
        "({ a, b }) => a + b;",
        "([first, ...rest]) => rest;",
    ] {
        let file = parse(source);
        assert!(file.diagnostics().is_empty(), "source: {source}\n{:?}", file.diagnostics());
        assert_eq!(
            file.arena.kind(expression_of_statement(&file, 0)),
            SyntaxKind::ArrowFunction,
            "source: {source}"
        );
    }
}

#[test]
fn test_conditional_is_not_an_arrow() {
    let file = parse("a ? (b) : c;");
    assert!(file.diagnostics().is_empty());
    assert_eq!(
        file.arena.kind(expression_of_statement(&file, 0)),
        SyntaxKind::ConditionalExpression
    );
}

#[test]
fn test_regex_versus_division() {
    let file = parse("x = a / b / c;\ny = /ab+c/gi.test(s);");
    assert!(file.diagnostics().is_empty());
    let mut found_regex = false;
    walk_preorder(&file.arena, file.root, &mut |node| {
        if file.arena.kind(node) == SyntaxKind::RegularExpressionLiteral {
            found_regex = true;
            assert_eq!(file.node_text(node), "/ab+c/gi");
        }
    });
    assert!(found_regex);
}

#[test]
fn test_template_literals() {
    let file = parse("const s = `a${b}c${d + 1}e`;\nconst t = tag`x${y}`;");
    assert!(file.diagnostics().is_empty());
    let mut kinds = Vec::new();
    walk_preorder(&file.arena, file.root, &mut |node| kinds.push(file.arena.kind(node)));
    assert!(kinds.contains(&SyntaxKind::TemplateExpression));
    assert!(kinds.contains(&SyntaxKind::TaggedTemplateExpression));
}

// ============================================================================
// Statements and declarations
// ============================================================================

#[test]
fn test_parse_variable_declarations() {
    assert_statement_count("const x = 42;", 1);
    assert_statement_count("let y = 'hello', z: number;", 1);
    assert_statement_count("var a = 1; let b = 2; const c = 3;", 3);
    assert_statement_count("const { a, b: [c, d = 1], ...rest } = obj;", 1);
}

#[test]
fn test_parse_functions_and_classes() {
    assert_statement_count("function add(a: number, b: number): number { return a + b; }", 1);
    assert_statement_count("async function* gen() { yield* other(); await x; }", 1);
    assert_statement_count(
        "abstract class Base<T> extends Parent implements I, J {\n  private readonly x: T;\n  static #count = 0;\n  constructor(public y: string) { super(); }\n  get value() { return this.x; }\n  abstract run(): void;\n}",
        1,
    );
    assert_statement_count("@decorator class C { @field() prop = 1; }", 1);
}

#[test]
fn test_parse_type_declarations() {
    assert_statement_count("interface Point { x: number; y?: number; readonly [key: string]: unknown; }", 1);
    assert_statement_count("type Pair<A, B = A> = [first: A, second: B];", 1);
    assert_statement_count("type Keys<T> = { [K in keyof T]-?: T[K] extends Function ? K : never };", 1);
    assert_statement_count("enum Color { Red, Green = 'g', Blue = 1 << 2 }", 1);
    assert_statement_count("declare namespace A.B.C { export const x: number; }", 1);
    assert_statement_count("declare module 'mod' { export default function f(): void; }", 1);
}

#[test]
fn test_parse_control_flow() {
    assert_statement_count(
        "if (a) { b(); } else if (c) d(); else { e(); }\nfor (let i = 0; i < 10; i++) {}\nfor (const k in o) {}\nfor await (const v of it) {}\nwhile (x) break;\ndo { continue; } while (y);\nswitch (z) { case 1: case 2: f(); break; default: g(); }\ntry { h(); } catch { } finally { }\nouter: for (;;) { break outer; }\nthrow new Error('x');",
        10,
    );
}

#[test]
fn test_parse_modules() {
    let source = "import a, { b as c, type D } from './m';\nimport * as ns from 'ns';\nimport e = require('e');\nexport { c };\nexport * from './all';\nexport default a;\nexport type { D };";
    assert_statement_count(source, 7);
    assert!(is_external_module(&parse(source)));
}

#[test]
fn test_script_is_not_a_module() {
    let file = parse("const x = 1;\nfunction f() {}");
    assert!(!is_external_module(&file));
    assert!(file.external_module_indicator.is_none());
}

#[test]
fn test_import_meta_makes_a_module() {
    let file = parse("console.log(import.meta.url);");
    assert!(is_external_module(&file));
}

#[test]
fn test_automatic_semicolon_insertion() {
    assert_statement_count("let a = 1\nlet b = 2\na\n++b", 4);
    let file = parse("return\nx");
    // A line break after `return` ends the statement.
    assert_eq!(file.statements().len(), 2);
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_missing_expression_at_end_of_input() {
    let file = parse("let x = ");
    assert_eq!(messages(&file), vec!["Expression expected."]);
    assert_eq!(file.diagnostics()[0].start(), 8);
    assert_eq!(file.diagnostics()[0].code, 1109);
}

#[test]
fn test_unterminated_array_literal() {
    let file = parse("[1, 2");
    assert_eq!(messages(&file), vec!["']' expected."]);
    let array = expression_of_statement(&file, 0);
    assert_eq!(file.arena.kind(array), SyntaxKind::ArrayLiteralExpression);
    let NodePayload::ArrayLiteral { elements, .. } = file.arena.get(array).payload else {
        panic!("expected an array literal");
    };
    assert_eq!(file.arena.list(elements).len(), 2);
}

#[test]
fn test_missing_close_brace_keeps_statements() {
    let file = parse("function f() {\n  let a = 1;\n");
    assert_eq!(file.statements().len(), 1);
    assert_eq!(messages(&file), vec!["'}' expected."]);
}

#[test]
fn test_garbage_in_class_body_recovers() {
    let file = parse("class C {\n  %%%\n  m() {}\n}\nlet after = 1;");
    assert!(!file.diagnostics().is_empty());
    assert_eq!(file.statements().len(), 2);
    assert_eq!(file.kind(file.statements()[1]), SyntaxKind::VariableStatement);
}

#[test]
fn test_diagnostics_have_distinct_starts() {
    let file = parse("let = ; function ( { class ] if");
    let mut starts: Vec<u32> = file.diagnostics().iter().map(|d| d.start()).collect();
    let count = starts.len();
    assert!(count > 0);
    starts.dedup();
    assert_eq!(starts.len(), count, "{:?}", file.diagnostics());
}

#[test]
fn test_unterminated_string_and_comment() {
    let file = parse("let s = 'abc\nlet t = 1;");
    assert!(messages(&file).contains(&"Unterminated string literal."));
    let file = parse("let u = 1; /* never closed");
    assert!(messages(&file).contains(&"'*/' expected."));
}

/// Run `f` on a thread with a small stack, as an editor's worker pool would.
fn on_small_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .expect("spawn parser thread")
        .join()
        .expect("parse finished without overflowing");
}

fn has_nesting_error(file: &SourceFile) -> bool {
    file.diagnostics().iter().any(|d| d.code == 1999)
}

#[test]
fn test_deep_nesting_is_reported_not_overflowed() {
    on_small_stack(|| {
        let n = 5000;
        let shapes = [
            ("parens", format!("{}x{};", "(".repeat(n), ")".repeat(n))),
            ("arrays", format!("{}1{};", "[".repeat(n), "]".repeat(n))),
            ("objects", format!("x = {}1{};", "{a:".repeat(n), "}".repeat(n))),
            ("types", format!("let x: {}T{};", "A<".repeat(n), ">".repeat(n))),
            ("templates", format!("{}x{};", "`${".repeat(n), "}`".repeat(n))),
            ("parameters", format!("{}1{};", "function f(a = ".repeat(n), ") {}".repeat(n))),
            ("unary", format!("{}x;", "!".repeat(n))),
            ("blocks", format!("{}{}", "{".repeat(n), "}".repeat(n))),
        ];
        for (name, text) in shapes {
            assert!(has_nesting_error(&parse(&text)), "{name}");
        }

        let shallow = format!("{}x{};", "(".repeat(200), ")".repeat(200));
        assert!(parse(&shallow).diagnostics().is_empty());
    });
}

#[test]
fn test_nested_new_expressions_hit_the_nesting_limit() {
    on_small_stack(|| {
        let file = parse(&format!("{}x;", "new ".repeat(20_000)));
        assert!(has_nesting_error(&file));

        let file = parse(&format!("{}x;", "new ".repeat(50)));
        assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
    });
}

#[test]
fn test_nested_class_heritage_hits_the_nesting_limit() {
    on_small_stack(|| {
        let file = parse(&format!("x = {}C {};", "class extends ".repeat(20_000), "{}".repeat(20_000)));
        assert!(has_nesting_error(&file));

        let file = parse("x = class extends class extends C {} {};");
        assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
    });
}

#[test]
fn test_long_left_deep_chain_is_not_limited() {
    on_small_stack(|| {
        let text = format!("x{};", " + x".repeat(50_000));
        let file = parse(&text);
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.identifier_count, 50_001);
    });
}

// ============================================================================
// File kinds and metadata
// ============================================================================

#[test]
fn test_declaration_file() {
    let file = parse_source_file(
        "lib.d.ts",
        "declare function f(): void;",
        ParseOptions::for_file_name("lib.d.ts"),
    );
    assert!(file.is_declaration_file);
    assert!(file.diagnostics().is_empty());
}

#[test]
fn test_json_file() {
    let file = parse_source_file(
        "package.json",
        "{ \"name\": \"x\", \"list\": [1, true, null] }",
        ParseOptions::for_file_name("package.json"),
    );
    assert!(file.diagnostics().is_empty());
    assert_eq!(file.statements().len(), 1);
    let expression = expression_of_statement(&file, 0);
    assert_eq!(file.arena.kind(expression), SyntaxKind::ObjectLiteralExpression);
}

#[test]
fn test_pragmas_are_collected() {
    let file = parse("/// <reference types=\"node\" />\n// @ts-check\nlet x = 1;");
    assert_eq!(file.pragmas.len(), 2);
    assert_eq!(file.pragmas[0].kind, PragmaKind::TripleSlashXml);
    assert_eq!(file.pragmas[0].argument("types"), Some("node"));
    assert_eq!(file.pragmas[1].name, "ts-check");
}

#[test]
fn test_node_and_identifier_counts() {
    let file = parse("let a = b + c;");
    assert_eq!(file.identifier_count, 3);
    let mut reachable = 0;
    walk_preorder(&file.arena, file.root, &mut |_| reachable += 1);
    assert_eq!(file.node_count, reachable);
}

#[test]
fn test_end_of_file_token_covers_trailing_trivia() {
    let text = "a;\n// trailing\n";
    let file = parse(text);
    let eof = file.end_of_file_token().expect("source file has an end token");
    assert_eq!(file.arena.range(eof).end as usize, text.len());
    assert_eq!(file.arena.range(file.root).end as usize, text.len());
}

#[test]
fn test_isolated_entity_name() {
    let fragment = parse_isolated_entity_name("a.b.c", ParseOptions::default()).expect("a name");
    assert_eq!(fragment.kind(), SyntaxKind::QualifiedName);
    assert!(parse_isolated_entity_name("a.b c", ParseOptions::default()).is_none());
}

// ============================================================================
// Positions
// ============================================================================

const CORPUS: &[&str] = &[
    "let a = 1, b = [1, 2, 3], c = { d, e: f, ...g, [h]: i, j() {} };",
    "function f<T extends object = {}>(this: Window, a?: T, ...rest: number[]): asserts a is T { return; }",
    "class C<T> extends B<T> implements I { #p = 1; static { init(); } constructor(private x = 2) { super(); } }",
    "type T = A | B & C | (() => void) | [a: string, b?: number, ...c: boolean[]] | `x${string}`;",
    "for (const [k, v] of Object.entries(o)) { if (!v) continue; else { k?.toString(); } }",
    "x = a ? b : c ?? d as unknown satisfies object; y = <any>z; w = f<string>(1)!;",
    "import type { A } from 'a'; export const enum E { X = 1 } export = foo;",
    "label: while (true) { try { throw e; } catch ({ message }) { break label; } finally {} }",
    "let broken = (1 + ; class { ] } function",
];

fn assert_child_ranges_nested(file: &SourceFile) {
    walk_preorder(&file.arena, file.root, &mut |node| {
        let parent = file.arena.range(node);
        let mut previous_end = parent.pos;
        let mut check = |pos: u32, end: u32| {
            assert!(pos <= end, "inverted range {pos}..{end} in {:?}", file.kind(node));
            assert!(
                parent.pos <= pos && end <= parent.end,
                "child {pos}..{end} escapes {:?} {}..{}",
                file.kind(node),
                parent.pos,
                parent.end
            );
            assert!(
                previous_end <= pos,
                "child {pos}..{end} overlaps its previous sibling in {:?}",
                file.kind(node)
            );
            previous_end = end;
        };
        for child in children(&file.arena, node) {
            match child {
                Child::Node(child) => {
                    let range = file.arena.range(child);
                    check(range.pos, range.end);
                }
                Child::List(list) => {
                    let data = file.arena.list(list);
                    for &element in &data.nodes {
                        let range = file.arena.range(element);
                        assert!(data.range.pos <= range.pos && range.end <= data.range.end);
                    }
                    if let (Some(&first), Some(&last)) = (data.nodes.first(), data.nodes.last()) {
                        check(file.arena.range(first).pos, file.arena.range(last).end);
                    }
                }
            }
        }
    });
}

#[test]
fn test_children_nest_within_parents() {
    for source in CORPUS {
        let file = parse(source);
        assert_child_ranges_nested(&file);
    }
}

#[test]
fn test_statements_tile_the_file() {
    for source in CORPUS {
        let file = parse(source);
        if !file.diagnostics().is_empty() {
            // Recovery may skip tokens between statements.
            continue;
        }
        let mut pos = 0;
        for &statement in file.statements() {
            assert_eq!(file.arena.range(statement).pos, pos, "source: {source}");
            pos = file.arena.range(statement).end;
        }
        let eof = file.end_of_file_token().expect("end token");
        assert_eq!(file.arena.range(eof).pos, pos, "source: {source}");
    }
}

#[test]
fn test_diagnostics_are_within_text() {
    for source in CORPUS {
        let file = parse(source);
        for diagnostic in file.diagnostics() {
            let span = diagnostic.span.expect("parse diagnostics have a span");
            assert!(span.end() as usize <= source.len(), "{diagnostic:?}");
        }
    }
}

fn assert_declarations_are_ambient(file: &SourceFile) {
    assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
    let mut seen = 0;
    walk_preorder(&file.arena, file.root, &mut |node| {
        if matches!(
            file.arena.kind(node),
            SyntaxKind::DeclareKeyword | SyntaxKind::VariableStatement | SyntaxKind::FunctionDeclaration
        ) {
            seen += 1;
            assert!(
                file.arena.data(node).flags.contains(NodeFlags::AMBIENT),
                "{:?} at {:?} is not ambient",
                file.arena.kind(node),
                file.arena.range(node)
            );
        }
    });
    assert!(seen > 0);
}

#[test]
fn test_nested_declare_keeps_the_ambient_flag() {
    assert_declarations_are_ambient(&parse("declare namespace N { declare const x: number; declare function f(): void; }"));
    assert_declarations_are_ambient(&parse_source_file(
        "lib.d.ts",
        "declare const x: number;\ndeclare function f(): void;\nconst y: string;",
        ParseOptions::for_file_name("lib.d.ts"),
    ));

    let file = parse("declare const a: number;\nconst b = 1;");
    let second = file.statements()[1];
    assert!(!file.arena.data(second).flags.contains(NodeFlags::AMBIENT));
}
