//! Conformance suite: a catalogue of TypeScript and JavaScript snippets grouped
//! by category. Each case must parse without panicking, cover its whole text,
//! and either be clean or report errors as recorded.

use rsparse_ast::SourceFile;
use rsparse_parser::{parse_source_file, ParseOptions};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Clean,
    Errors,
}

#[derive(Debug)]
struct CaseResult {
    name: &'static str,
    category: &'static str,
    passed: bool,
    failure: Option<String>,
}

fn check(file: &SourceFile, expect: Expect) -> Result<(), String> {
    let root = file.arena.range(file.root);
    if (root.pos, root.end) != (0, file.text.len() as u32) {
        return Err(format!("root spans {}..{}", root.pos, root.end));
    }
    let has_errors = file.diagnostics().iter().any(|d| d.is_error());
    match (expect, has_errors) {
        (Expect::Clean, true) => Err(format!("unexpected diagnostics: {:?}", file.diagnostics())),
        (Expect::Errors, false) => Err("expected at least one diagnostic".to_string()),
        _ => Ok(()),
    }
}

fn run_case(name: &'static str, category: &'static str, file_name: &str, source: &str, expect: Expect) -> CaseResult {
    let outcome = std::panic::catch_unwind(|| {
        let file = parse_source_file(file_name, source, ParseOptions::for_file_name(file_name));
        check(&file, expect)
    });
    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(reason)) => Some(reason),
        Err(panic) => Some(
            panic
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_else(|| "panic".to_string()),
        ),
    };
    CaseResult {
        name,
        category,
        passed: failure.is_none(),
        failure,
    }
}

struct ConformanceSuite {
    results: Vec<CaseResult>,
}

impl ConformanceSuite {
    fn new() -> Self {
        Self { results: Vec::new() }
    }

    fn clean(&mut self, name: &'static str, category: &'static str, source: &str) {
        self.results.push(run_case(name, category, "case.ts", source, Expect::Clean));
    }

    fn clean_as(&mut self, name: &'static str, category: &'static str, file_name: &str, source: &str) {
        self.results.push(run_case(name, category, file_name, source, Expect::Clean));
    }

    fn errors(&mut self, name: &'static str, category: &'static str, source: &str) {
        self.results.push(run_case(name, category, "case.ts", source, Expect::Errors));
    }

    fn print_summary(&self) {
        let mut by_category: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for result in &self.results {
            let entry = by_category.entry(result.category).or_default();
            entry.1 += 1;
            if result.passed {
                entry.0 += 1;
            }
        }
        println!("\n=== Conformance summary ===");
        for (category, (passed, total)) in &by_category {
            println!("  {category}: {passed}/{total}");
        }
        for failure in self.results.iter().filter(|r| !r.passed) {
            println!(
                "  FAILED [{}] {}: {}",
                failure.category,
                failure.name,
                failure.failure.as_deref().unwrap_or("unknown")
            );
        }
    }

    fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }
}

#[test]
fn test_conformance_suite() {
    let mut suite = ConformanceSuite::new();

    // Declarations
    suite.clean("var_with_type", "declarations", "var x: number = 42;");
    suite.clean("const_array", "declarations", "const arr: number[] = [1, 2, 3];");
    suite.clean("destructuring", "declarations", "const { a, b: [c, ...d], ...rest } = obj;");
    suite.clean("function_with_params", "declarations", "function add(a: number, b = 1, ...c: number[]): number { return a + b; }");
    suite.clean("async_generator", "declarations", "async function* gen() { yield* other(); await x; }");
    suite.clean("interface_members", "declarations", "interface P { readonly name: string; age?: number; [key: string]: unknown; m(a: number): void; new (x: string): P; }");
    suite.clean("class_members", "declarations", "abstract class A<T> extends B implements C, D { private x = 1; static #y?: T; constructor(public z: number) { super(); } get v() { return 1; } set v(n) {} abstract m(): void; static { init(); } }");
    suite.clean("enum_declaration", "declarations", "const enum Color { Red = 1, Green, Blue = Red << 2 }");
    suite.clean("namespace_declaration", "declarations", "namespace A.B { export const c = 1; }");
    suite.clean("declare_module", "declarations", "declare module 'm' { export function f(): void; }");
    suite.clean("declare_global", "declarations", "export {}; declare global { interface Window { x: number } }");
    suite.clean("overloads", "declarations", "function f(a: string): void;\nfunction f(a: number): void;\nfunction f(a: any) {}");
    suite.clean("decorators", "declarations", "@sealed class C { @prop() x = 1; m(@inject p: number) {} }");

    // Expressions
    suite.clean("precedence", "expressions", "a = b + c * d ** e - f / g % h;");
    suite.clean("logical_assignment", "expressions", "a ||= b; c &&= d; e ??= f;");
    suite.clean("optional_chain", "expressions", "a?.b?.[c]?.(d);");
    suite.clean("conditional", "expressions", "const v = a ? b : c ? d : e;");
    suite.clean("arrow_forms", "expressions", "const f = async (a, { b }, [c]) => ({ a, b, c }); const g = x => y => x + y;");
    suite.clean("template_literal", "expressions", "const s = `a${b}c${`nested ${d}`}e`;");
    suite.clean("tagged_template", "expressions", "const q = sql`select ${x}`;");
    suite.clean("regex_literal", "expressions", "const r = /ab+c/gi.test(s) ? 1 / 2 : 3;");
    suite.clean("new_and_call", "expressions", "new Foo<string>(1).bar<number>()[0];");
    suite.clean("object_literal", "expressions", "const o = { a, b: 1, [c]: 2, d() {}, get e() { return 1; }, ...f };");
    suite.clean("class_expression", "expressions", "const K = class extends Base {};");
    suite.clean("satisfies_and_as", "expressions", "const v = x as const; const w = y satisfies T; const z = q!;");
    suite.clean("import_meta_and_dynamic", "expressions", "const u = import.meta.url; import('./m');");
    suite.clean("bigint_and_separators", "expressions", "const n = 1_000_000n + 0xFF_FFn;");

    // Types
    suite.clean("union_intersection", "types", "type T = A | B & C;");
    suite.clean("conditional_infer", "types", "type U<T> = T extends Promise<infer R> ? R : never;");
    suite.clean("mapped_type", "types", "type M<T> = { readonly [K in keyof T as `get${K & string}`]-?: T[K] };");
    suite.clean("tuple_types", "types", "type Tu = [a: string, b?: number, ...rest: boolean[]];");
    suite.clean("function_types", "types", "type F = (a: number) => void; type C = new () => object; type G = <T>(x: T) => T;");
    suite.clean("type_predicates", "types", "function isS(x: unknown): x is string { return true; } function assertS(x: unknown): asserts x is string {}");
    suite.clean("typeof_keyof_indexed", "types", "type K = keyof typeof obj; type I = T['a'][number];");
    suite.clean("template_literal_type", "types", "type E = `on${Capitalize<string>}`;");
    suite.clean("import_type", "types", "type X = import('./m').Y<string>;");
    suite.clean("generic_defaults", "types", "interface Box<T extends object = {}, const U = T> { v: T; u: U }");

    // Statements
    suite.clean("control_flow", "statements", "if (a) b(); else { c(); }\nfor (let i = 0; i < 3; i++) continue;\nfor (const k in o) {}\nfor await (const v of it) {}\nwhile (x) break;\ndo x--; while (x);");
    suite.clean("switch", "statements", "switch (x) { case 1: case 2: y(); break; default: z(); }");
    suite.clean("try_catch", "statements", "try { a(); } catch { b(); } finally { c(); }\ntry {} catch (e: unknown) {}");
    suite.clean("labels", "statements", "outer: for (;;) { inner: while (1) { break outer; } }");
    suite.clean("using", "statements", "{ using r = get(); }");

    // Modules
    suite.clean("imports", "modules", "import d, { a as b, type C } from 'm'; import * as ns from 'n'; import 'side';");
    suite.clean("exports", "modules", "export { a, b as c } from 'm'; export * as ns from 'n'; export default function () {}");
    suite.clean("import_equals", "modules", "import fs = require('fs'); export = fs;");
    suite.clean("import_attributes", "modules", "import data from './d.json' with { type: 'json' };");

    // Other file kinds
    suite.clean_as("jsx_component", "file-kinds", "c.tsx", "export const C = () => <div className=\"x\">{items.map(i => <span key={i}>{i}</span>)}</div>;");
    suite.clean_as("plain_js", "file-kinds", "c.js", "module.exports = function () { return this; };");
    suite.clean_as("json_document", "file-kinds", "c.json", "{ \"a\": [1, true, null, { \"b\": \"c\" }], \"d\": -1.5 }");
    suite.clean_as("declaration_file", "file-kinds", "c.d.ts", "declare function f(): void;\nexport declare const x: number;");

    // Recovery
    suite.errors("missing_initializer", "recovery", "let x = ;");
    suite.errors("unclosed_array", "recovery", "[1, 2");
    suite.errors("unclosed_block", "recovery", "function f() { if (a) {");
    suite.errors("stray_tokens_in_class", "recovery", "class C { ) x = 1; }");
    suite.errors("bad_parameter_list", "recovery", "function f(a b, , c) {}");
    suite.errors("unterminated_template", "recovery", "const t = `abc${x");
    suite.errors("invalid_character", "recovery", "let a = 1 # 2;");
    suite.errors("keyword_as_name", "recovery", "let class = 1;");

    suite.print_summary();
    assert_eq!(suite.failures(), 0, "conformance failures, see output above");
}
