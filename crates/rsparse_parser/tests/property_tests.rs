//! Property-based tests for the parser.
//!
//! Parsing must be total and deterministic on any input, keep every node
//! inside the text, and agree with itself across incremental edits.

use proptest::prelude::*;
use rsparse_ast::dump::dump_tree;
use rsparse_ast::{for_each_child_node, walk_preorder, SourceFile};
use std::collections::HashSet;
use rsparse_core::TextChangeRange;
use rsparse_parser::{parse_source_file, update_source_file, ParseOptions};

fn parse(name: &str, text: &str) -> SourceFile {
    parse_source_file(name, text, ParseOptions::for_file_name(name))
}

fn dump(file: &SourceFile) -> String {
    dump_tree(&file.arena, &file.interner, file.root)
}

fn assert_well_formed(file: &SourceFile) {
    let len = file.text.len() as u32;
    let root = file.arena.range(file.root);
    assert_eq!((root.pos, root.end), (0, len));
    walk_preorder(&file.arena, file.root, &mut |node| {
        let range = file.arena.range(node);
        assert!(range.pos <= range.end && range.end <= len, "{:?} {range:?}", file.kind(node));
        let mut previous_pos = range.pos;
        for_each_child_node::<()>(&file.arena, node, |child| {
            let child_range = file.arena.range(child);
            assert!(
                range.pos <= child_range.pos && child_range.end <= range.end,
                "{:?} {child_range:?} escapes {:?} {range:?}",
                file.kind(child),
                file.kind(node)
            );
            assert!(
                previous_pos <= child_range.pos,
                "{:?} {child_range:?} starts before its previous sibling in {:?}",
                file.kind(child),
                file.kind(node)
            );
            previous_pos = child_range.pos;
            None
        });
    });
    let mut starts = HashSet::new();
    for diagnostic in &file.parse_diagnostics {
        assert!(starts.insert(diagnostic.start()), "two diagnostics start at {}", diagnostic.start());
    }
    for diagnostic in file.diagnostics().iter().chain(&file.js_doc_diagnostics) {
        assert!(diagnostic.start() <= len, "{diagnostic:?}");
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("not a reserved word", |s| {
        !matches!(
            s.as_str(),
            "do" | "if" | "in" | "for" | "let" | "new" | "try" | "var" | "case" | "else" | "enum" | "null" | "await"
                | "this" | "true" | "void" | "with" | "break" | "catch" | "class" | "const" | "false"
                | "super" | "throw" | "while" | "yield" | "delete" | "export" | "import" | "return"
                | "switch" | "typeof" | "default" | "extends" | "finally" | "continue" | "debugger"
                | "function" | "instanceof"
        )
    })
}

fn arb_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| n.to_string()),
        arb_ident(),
        "[a-z ]{0,8}".prop_map(|s| format!("'{s}'")),
    ]
}

fn arb_binop() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("**"),
        Just("=="),
        Just("!=="),
        Just("<"),
        Just(">="),
        Just("&&"),
        Just("||"),
        Just("??"),
        Just("<<"),
        Just("&"),
    ]
}

fn arb_expression() -> impl Strategy<Value = String> {
    (arb_operand(), prop::collection::vec((arb_binop(), arb_operand()), 0..6)).prop_map(|(first, rest)| {
        let mut text = first;
        for (op, operand) in rest {
            text.push_str(&format!(" {op} {operand}"));
        }
        text
    })
}

fn arb_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_ident(), arb_expression()).prop_map(|(name, e)| format!("let {name} = {e};")),
        arb_expression().prop_map(|e| format!("if ({e}) {{ {e}; }}")),
        (arb_ident(), arb_expression()).prop_map(|(name, e)| format!("function {name}(a, b) {{ return {e}; }}")),
        (arb_ident(), arb_ident()).prop_map(|(name, field)| format!("class {name} {{ {field} = 1; m() {{}} }}")),
        arb_expression().prop_map(|e| format!("while ({e}) break;")),
    ]
}

fn arb_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_statement(), 1..8).prop_map(|statements| statements.join("\n"))
}

/// Statements from the rest of the language: JSX, documentation comments,
/// generics, arrows and module syntax. Parsed as `.tsx`.
fn arb_rich_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_statement(),
        (arb_ident(), arb_ident()).prop_map(|(name, attr)| {
            format!("const {name} = <div {attr}=\"v\">{{{attr}}}<span /></div>;")
        }),
        (arb_ident(), arb_ident()).prop_map(|(name, param)| {
            format!("/**\n * Does things.\n * @param {{number}} {param} the input\n * @returns {{string}}\n */\nfunction {name}({param}) {{ return {param}; }}")
        }),
        (arb_ident(), arb_ident()).prop_map(|(name, field)| {
            format!("interface {name}<T extends object = {{}}> {{ {field}: Map<string, T[]>; }}")
        }),
        (arb_ident(), arb_expression()).prop_map(|(name, e)| format!("const {name} = async (a: number, b?: string) => ({e});")),
        (arb_ident(), arb_ident()).prop_map(|(name, from)| format!("import {{ {name} as {from}_ }} from './{from}';")),
        arb_ident().prop_map(|name| format!("export default function {name}() {{}}")),
        (arb_ident(), arb_expression()).prop_map(|(name, e)| format!("export const {name}: Array<number> = [{e}];")),
    ]
}

fn arb_rich_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_rich_statement(), 1..8).prop_map(|statements| statements.join("\n"))
}

fn arb_insertion() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just(" "),
        Just("x"),
        Just("1"),
        Just(";"),
        Just("("),
        Just("}"),
        Just("+ 2"),
        Just("<"),
        Just("/>"),
        Just("*/"),
        Just("/**"),
        Just("=>"),
        Just("@"),
        Just("`"),
    ]
}

fn arb_token_soup() -> impl Strategy<Value = String> {
    let tokens = prop_oneof![
        Just("("),
        Just(")"),
        Just("{"),
        Just("}"),
        Just("["),
        Just("]"),
        Just("<"),
        Just(">"),
        Just("=>"),
        Just(","),
        Just(";"),
        Just(":"),
        Just("?"),
        Just("."),
        Just("..."),
        Just("="),
        Just("/"),
        Just("`"),
        Just("${"),
        Just("'"),
        Just("/**"),
        Just("*/"),
        Just("@"),
        Just("x"),
        Just("1"),
        Just("class"),
        Just("function"),
        Just("async"),
        Just("await"),
        Just("yield"),
        Just("type"),
        Just("import"),
        Just("export"),
        Just("let"),
        Just("new"),
        Just("\n"),
    ];
    prop::collection::vec(tokens, 0..40).prop_map(|tokens| tokens.join(" "))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any text parses, in any file kind, into a tree inside the text.
    #[test]
    fn parse_is_total(input in ".{0,100}") {
        for name in ["t.ts", "t.tsx", "t.js", "t.json"] {
            assert_well_formed(&parse(name, &input));
        }
    }

    #[test]
    fn token_soup_is_total(input in arb_token_soup()) {
        for name in ["t.ts", "t.tsx"] {
            assert_well_formed(&parse(name, &input));
        }
    }

    #[test]
    fn parse_is_deterministic(input in arb_token_soup()) {
        let first = parse("t.ts", &input);
        let second = parse("t.ts", &input);
        prop_assert_eq!(dump(&first), dump(&second));
        prop_assert_eq!(first.parse_diagnostics, second.parse_diagnostics);
    }

    #[test]
    fn generated_programs_parse_cleanly(program in arb_program()) {
        let file = parse("t.ts", &program);
        prop_assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
        prop_assert_eq!(file.statements().len(), program.lines().count());
    }

    #[test]
    fn generated_rich_programs_parse_cleanly(program in arb_rich_program()) {
        let file = parse("t.tsx", &program);
        prop_assert!(file.diagnostics().is_empty(), "{:?}", file.diagnostics());
        assert_well_formed(&file);
    }

    #[test]
    fn incremental_edit_matches_fresh_parse(
        program in arb_rich_program(),
        at in any::<prop::sample::Index>(),
        removed in 0usize..4,
        inserted in arb_insertion(),
    ) {
        let start = at.index(program.len() + 1);
        let old_length = removed.min(program.len() - start);
        let change = TextChangeRange::replacement(start as u32, old_length as u32, inserted);
        let new_text = change.apply(&program, inserted).expect("edit in bounds");

        let updated = update_source_file(parse("t.tsx", &program), &new_text, change).expect("valid change");
        let fresh = parse("t.tsx", &new_text);
        assert_well_formed(&updated);
        prop_assert_eq!(dump(&updated), dump(&fresh));
        prop_assert_eq!(updated.parse_diagnostics, fresh.parse_diagnostics);
        prop_assert_eq!(updated.js_doc_diagnostics, fresh.js_doc_diagnostics);
    }
}
