//! Incremental reparse integration tests.
//!
//! Every edit is checked against a fresh parse of the edited text: same
//! tree, same diagnostics.

use pretty_assertions::assert_eq;
use rsparse_ast::dump::dump_tree_pretty;
use rsparse_ast::{IncrementalStats, SourceFile};
use rsparse_core::{Error, TextChangeRange};
use rsparse_parser::{parse_source_file, update_source_file, ParseOptions, MAX_ARENA_GROWTH};

fn parse(name: &str, text: &str) -> SourceFile {
    parse_source_file(name, text, ParseOptions::for_file_name(name))
}

fn dump(file: &SourceFile) -> String {
    dump_tree_pretty(&file.arena, &file.interner, file.root)
}

/// Apply one edit to `file` and compare with a fresh parse.
fn edit(file: SourceFile, start: u32, old_length: u32, insert: &str) -> SourceFile {
    let change = TextChangeRange::replacement(start, old_length, insert);
    let new_text = change.apply(&file.text, insert).expect("edit in bounds");
    let name = file.file_name.clone();
    let updated = update_source_file(file, &new_text, change).expect("valid change");
    let fresh = parse(&name, &new_text);
    assert_eq!(updated.text, new_text);
    assert_eq!(dump(&updated), dump(&fresh), "after editing to {new_text:?}");
    assert_eq!(updated.parse_diagnostics, fresh.parse_diagnostics, "after editing to {new_text:?}");
    assert_eq!(updated.is_external_module(), fresh.is_external_module());
    updated
}

const SAMPLE: &str = "import { helper } from './helper';

interface Options {
    verbose: boolean;
    level?: number;
}

export function run(options: Options): number {
    let total = 0;
    for (const item of items) {
        total += helper(item, options.level ?? 1);
    }
    return total;
}

export class Runner {
    private count = 0;
    step(): void {
        this.count++;
    }
}

const items = [1, 2, 3];
";

#[test]
fn test_literal_edit_inside_function() {
    // The function contains the edit, so it is rebuilt rather than reused.
    let file = parse("test.ts", "function f(){ return 1; }");
    let function = file.statements()[0];
    let updated = edit(file, 21, 1, "2");
    assert!(updated.has_been_incrementally_parsed);
    assert_eq!(
        updated.incremental_stats,
        Some(IncrementalStats {
            reused_nodes: 0,
            reparsed_elements: 2,
        })
    );
    assert_ne!(updated.statements()[0], function);
}

#[test]
fn test_literal_edit_keeps_the_statement_after_it() {
    let file = parse("test.ts", "function f(){ return 1; }\nlet after = f();\n");
    let after = file.statements()[1];
    let updated = edit(file, 21, 1, "2");
    let stats = updated.incremental_stats.expect("incremental parse");
    assert!(stats.reused_nodes >= 1, "{stats:?}");
    assert_eq!(updated.statements()[1], after);
}

#[test]
fn test_edit_in_class_method_reuses_other_declarations() {
    let start = SAMPLE.find("this.count++").expect("sample has the statement") as u32;
    let updated = edit(parse("test.ts", SAMPLE), start + 10, 2, " += 2");
    let stats = updated.incremental_stats.expect("incremental parse");
    assert!(stats.reused_nodes >= 3, "{stats:?}");
    assert!(stats.reuse_rate() > 0.0);
}

#[test]
fn test_adding_and_removing_statements() {
    let at = SAMPLE.find("const items").expect("sample has items") as u32;
    let file = edit(parse("test.ts", SAMPLE), at, 0, "let extra = run({ verbose: true });\n");
    let inserted = "let extra = run({ verbose: true });\n".len() as u32;
    edit(file, at, inserted, "");
}

#[test]
fn test_structural_edits() {
    let open = SAMPLE.find("for (const").expect("sample has a loop") as u32;
    // Drop a brace, then put it back.
    let brace = open + SAMPLE[open as usize..].find('{').expect("loop body") as u32;
    let file = edit(parse("test.ts", SAMPLE), brace, 1, "");
    let file = edit(file, brace, 0, "{");
    assert_eq!(file.text, SAMPLE);
    // Comment out the interface.
    let interface = SAMPLE.find("interface").expect("sample has an interface") as u32;
    edit(file, interface, 0, "/* ");
}

#[test]
fn test_typing_character_by_character() {
    let text = "function g() {\n}\nlet z = 1;\n";
    let mut file = parse("test.ts", text);
    let mut at = text.find('\n').expect("two lines") as u32 + 1;
    for ch in "return a + b;\n".chars() {
        file = edit(file, at, 0, &ch.to_string());
        at += ch.len_utf8() as u32;
    }
    assert!(file.parse_diagnostics.is_empty());
}

#[test]
fn test_deleting_character_by_character() {
    let text = "let a = foo(bar, baz);\nlet b = 2;\n";
    let mut file = parse("test.ts", text);
    let start = text.find("bar").expect("argument") as u32;
    for _ in 0.."bar, ".len() {
        file = edit(file, start, 1, "");
    }
    assert!(file.text.starts_with("let a = foo(baz);"));
}

#[test]
fn test_edits_inside_strings_templates_and_comments() {
    let text = "const s = 'abc';\nconst t = `x${y}z`;\n// note\nlet n = 1;\n";
    let file = parse("test.ts", text);
    let file = edit(file, 12, 1, "q");
    let template = text.find("${").expect("template hole") as u32;
    let file = edit(file, template + 2, 1, "w + 1");
    let comment = file.text.find("note").expect("comment") as u32;
    let file = edit(file, comment, 0, "*/ ");
    // Unterminated string across the rest of the line.
    edit(file, 10, 1, "");
}

#[test]
fn test_edit_joining_and_splitting_tokens() {
    let file = parse("test.ts", "let x = a b;\nfoo();");
    let file = edit(file, 9, 1, "");
    edit(file, 9, 0, " ");
}

#[test]
fn test_jsx_edit() {
    let text = "const el = <div className=\"a\">hello {name}</div>;\nconst other = 1;\n";
    let file = parse("test.tsx", text);
    let at = text.find("hello").expect("text child") as u32;
    let file = edit(file, at, 5, "goodbye");
    let close = file.text.find("</div>").expect("closing tag") as u32;
    edit(file, close + 2, 3, "span");
}

#[test]
fn test_jsdoc_follows_its_host() {
    let text = "let a = 1;\n/** @param {number} x */\nfunction f(x) {}\n";
    let file = parse("test.js", text);
    let updated = edit(file, 8, 1, "12345");
    let function = updated.statements()[1];
    assert_eq!(updated.js_doc(function).len(), 1);
    assert!(updated.js_doc_diagnostics.is_empty());
}

#[test]
fn test_module_indicator_appears_and_disappears() {
    let file = parse("test.ts", "const a = 1;\n");
    assert!(!file.is_external_module());
    let file = edit(file, 0, 0, "export ");
    assert!(file.is_external_module());
    let file = edit(file, 0, 7, "");
    assert!(!file.is_external_module());
}

#[test]
fn test_top_level_await_edit() {
    let file = parse("test.ts", "export {};\nawait (x);\nlet y = 1;\n");
    let at = "export {};\n".len() as u32;
    edit(file, at + 7, 1, "yy");
}

#[test]
fn test_whole_text_replacement_falls_back() {
    let file = parse("test.ts", "let a = 1;");
    let updated = update_source_file(file, "class B {}", TextChangeRange::replacement(0, 10, "class B {}"))
        .expect("valid change");
    assert!(!updated.has_been_incrementally_parsed);
    assert_eq!(dump(&updated), dump(&parse("test.ts", "class B {}")));
}

#[test]
fn test_json_edit_is_a_full_parse() {
    let file = parse("data.json", "{ \"a\": 1 }");
    let updated = edit(file, 7, 1, "2");
    assert!(!updated.has_been_incrementally_parsed);
}

#[test]
fn test_invalid_changes_are_rejected() {
    let file = parse("test.ts", "let a = 1;");
    let result = update_source_file(file, "let a = 1;", TextChangeRange::replacement(8, 10, "x"));
    assert!(matches!(result, Err(Error::InvalidChangeRange { .. })));

    let file = parse("test.ts", "let a = 1;");
    let result = update_source_file(file, "let a = 12;", TextChangeRange::replacement(8, 1, "2"));
    assert!(matches!(result, Err(Error::TextLengthMismatch { .. })));
}

#[test]
fn test_unchanged_range_keeps_the_file() {
    let file = parse("test.ts", SAMPLE);
    let before = dump(&file);
    let same = update_source_file(file, SAMPLE, TextChangeRange::unchanged()).expect("valid change");
    assert_eq!(dump(&same), before);
    assert!(same.incremental_stats.is_none());
}

#[test]
fn test_arena_stays_bounded_over_many_edits() {
    let at = SAMPLE.find("[1, 2, 3]").expect("sample has items") as u32 + 1;
    let mut file = parse("test.ts", SAMPLE);
    let fresh_len = file.arena.len();
    for round in 0..300 {
        let digit = if round % 2 == 0 { "7" } else { "1" };
        file = edit(file, at, 1, digit);
        assert!(
            file.arena.len() <= (MAX_ARENA_GROWTH + 2) * fresh_len + 512,
            "arena holds {} nodes after {round} edits",
            file.arena.len()
        );
    }
    assert_eq!(file.text, SAMPLE);
}
