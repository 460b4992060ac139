//! Incremental reparsing.
//!
//! An edit is applied to the previous tree in three steps:
//!
//! 1. The change is widened to start before the token it touches, so a
//!    token that grew or shrank across the edit is never reused.
//! 2. Every node and list of the previous tree is repositioned: elements
//!    after the change move by the length delta, elements overlapping it are
//!    clipped to the new text and flagged `intersects_change`.
//! 3. The new text is parsed from scratch into the same arena, with a
//!    [`SyntaxCursor`] over the previous tree. In reusable list contexts the
//!    list engine takes an old element that starts at the current position
//!    instead of parsing one.
//!
//! Nodes replaced by a reparse stay in the arena as garbage. Once the arena
//! holds [`MAX_ARENA_GROWTH`] times the live tree, the next edit is a full
//! parse into a fresh arena.

mod cursor;

pub use cursor::{CursorStats, SyntaxCursor};

use crate::options::ParseOptions;
use crate::parser::Parser;
use rsparse_ast::{children, for_each_child_node, Child, NodeArena, NodeId, ScriptKind, SourceFile, SyntaxKind};
use rsparse_core::{Error, Result, TextChangeRange, TextRange, TextSpan};
use tracing::debug;

/// How many nodes the change start is moved back over.
const MAX_LOOKAHEAD: usize = 1;

/// Arena size, as a multiple of the live node count, past which an edit
/// starts over with a fresh arena.
pub const MAX_ARENA_GROWTH: usize = 4;

/// Headroom for small files, whose arenas carry a few nodes outside the tree.
const ARENA_SLACK: usize = 256;

/// Parse `new_text` as an edit of `prior`, reusing what the edit left
/// intact.
///
/// `change` describes the edit in terms of `prior.text`. The previous file is
/// consumed: its arena is repositioned and becomes the new file's arena.
pub fn update_source_file(prior: SourceFile, new_text: &str, change: TextChangeRange) -> Result<SourceFile> {
    validate_change(&prior.text, new_text, change)?;
    if change.is_unchanged() {
        return Ok(prior);
    }

    let options = options_of(&prior);
    let covers_whole_text = change.span.start == 0 && change.span.length as usize == prior.text.len();
    if prior.statements().is_empty() || covers_whole_text || prior.script_kind == ScriptKind::Json {
        debug!(file = %prior.file_name, "incremental parse falls back to a full parse");
        return Ok(Parser::new(&prior.file_name, new_text, options).parse_source_file());
    }
    if arena_is_mostly_garbage(&prior) {
        debug!(
            file = %prior.file_name,
            arena = prior.arena.len(),
            live = prior.node_count,
            "compacting arena with a full parse"
        );
        return Ok(Parser::new(&prior.file_name, new_text, options).parse_source_file());
    }

    let SourceFile {
        file_name,
        mut arena,
        root,
        interner,
        ..
    } = prior;

    let change = extend_to_affected_range(&arena, root, change);
    let delta = change.delta();
    debug!(
        file = %file_name,
        start = change.span.start,
        old_end = change.span.end(),
        new_end = change.new_span().end(),
        delta,
        "incremental parse start"
    );
    update_token_positions_and_mark_elements(
        &mut arena,
        root,
        change.span.start,
        change.span.end(),
        change.new_span().end(),
        delta,
    );

    let cursor = SyntaxCursor::new(root);
    let file = Parser::with_arena(&file_name, new_text, options, arena, interner, Some(cursor)).parse_source_file();
    if let Some(stats) = file.incremental_stats {
        debug!(
            file = %file.file_name,
            reused = stats.reused_nodes,
            reparsed = stats.reparsed_elements,
            reuse_rate = stats.reuse_rate(),
            "incremental parse end"
        );
    }
    Ok(file)
}

fn validate_change(old_text: &str, new_text: &str, change: TextChangeRange) -> Result<()> {
    let old_len = old_text.len();
    let end = change.span.end() as usize;
    if end > old_len || !old_text.is_char_boundary(change.span.start as usize) || !old_text.is_char_boundary(end) {
        return Err(Error::InvalidChangeRange {
            start: change.span.start,
            end: change.span.end(),
            text_len: old_len as u32,
        });
    }
    let expected = (old_len as i64 + change.delta()).max(0) as u32;
    if new_text.len() != expected as usize {
        return Err(Error::TextLengthMismatch {
            expected,
            actual: new_text.len() as u32,
        });
    }
    Ok(())
}

fn options_of(file: &SourceFile) -> ParseOptions {
    ParseOptions {
        language_version: file.language_version,
        language_variant: file.language_variant,
        script_kind: file.script_kind,
        jsdoc_parsing_mode: file.jsdoc_parsing_mode,
        set_external_module_indicator: file.set_external_module_indicator,
    }
}

fn arena_is_mostly_garbage(file: &SourceFile) -> bool {
    file.arena.len() > MAX_ARENA_GROWTH * file.node_count + ARENA_SLACK
}

fn node_is_missing(arena: &NodeArena, node: NodeId) -> bool {
    let data = arena.data(node);
    data.pos() == data.end() && data.kind != SyntaxKind::EndOfFileToken
}

// ============================================================================
// Affected range
// ============================================================================

/// Move the start of `change` back over the nodes in front of it.
///
/// A token can be affected by an edit past its end: appending to an
/// identifier, or closing a comment. Restarting before the nearest node
/// rescans such tokens.
pub(crate) fn extend_to_affected_range(arena: &NodeArena, root: NodeId, change: TextChangeRange) -> TextChangeRange {
    let mut start = change.span.start;
    for _ in 0..=MAX_LOOKAHEAD {
        if start == 0 {
            break;
        }
        let nearest = find_nearest_node_starting_before_or_at(arena, root, start);
        start = arena.data(nearest).pos().saturating_sub(1);
    }
    let span = TextSpan::from_bounds(start, change.span.end());
    TextChangeRange::new(span, change.new_length + (change.span.start - start))
}

fn find_nearest_node_starting_before_or_at(arena: &NodeArena, root: NodeId, position: u32) -> NodeId {
    let mut best = root;
    let mut last_entirely_before = None;
    let mut node = root;
    loop {
        let mut next = None;
        for_each_child_node(arena, node, |child| {
            if node_is_missing(arena, child) {
                return None;
            }
            let range = arena.range(child);
            if range.pos > position {
                return Some(());
            }
            if range.pos >= arena.data(best).pos() {
                best = child;
            }
            if position < range.end {
                next = Some(child);
                return Some(());
            }
            last_entirely_before = Some(child);
            None
        });
        match next {
            Some(child) => node = child,
            None => break,
        }
    }
    if let Some(before) = last_entirely_before {
        let last = last_descendant(arena, before);
        if arena.data(last).pos() > arena.data(best).pos() {
            best = last;
        }
    }
    best
}

fn last_descendant(arena: &NodeArena, mut node: NodeId) -> NodeId {
    loop {
        let mut last = None;
        for_each_child_node::<()>(arena, node, |child| {
            if !node_is_missing(arena, child) {
                last = Some(child);
            }
            None
        });
        match last {
            Some(child) => node = child,
            None => return node,
        }
    }
}

// ============================================================================
// Repositioning
// ============================================================================

/// Shift everything after the change by `delta`, and clip and flag
/// everything overlapping it. Attached documentation comments are
/// repositioned with their host.
pub(crate) fn update_token_positions_and_mark_elements(
    arena: &mut NodeArena,
    root: NodeId,
    change_start: u32,
    change_old_end: u32,
    change_new_end: u32,
    delta: i64,
) {
    let mut pending = vec![Child::Node(root)];
    while let Some(element) = pending.pop() {
        let range = element_range(arena, element);
        if range.pos > change_old_end {
            move_element_entirely_past_change(arena, element, delta);
            continue;
        }
        if range.end < change_start {
            continue;
        }
        let adjusted = adjust_intersecting_range(range, change_old_end, change_new_end, delta);
        match element {
            Child::Node(node) => {
                let data = arena.data_mut(node);
                data.range = adjusted;
                data.intersects_change = true;
                if let Some(js_doc) = data.js_doc {
                    pending.push(Child::List(js_doc));
                }
                pending.extend(children(arena, node));
            }
            Child::List(list) => {
                let data = arena.list_mut(list);
                data.range = adjusted;
                data.intersects_change = true;
                pending.extend(data.nodes.iter().copied().map(Child::Node));
            }
        }
    }
}

fn element_range(arena: &NodeArena, element: Child) -> TextRange {
    match element {
        Child::Node(node) => arena.range(node),
        Child::List(list) => arena.list(list).range,
    }
}

fn adjust_intersecting_range(range: TextRange, change_old_end: u32, change_new_end: u32, delta: i64) -> TextRange {
    let pos = range.pos.min(change_new_end);
    let end = if range.end >= change_old_end {
        (range.end as i64 + delta).max(0) as u32
    } else {
        range.end.min(change_new_end)
    };
    TextRange::new(pos, end.max(pos))
}

fn move_element_entirely_past_change(arena: &mut NodeArena, element: Child, delta: i64) {
    let mut pending = vec![element];
    while let Some(element) = pending.pop() {
        match element {
            Child::Node(node) => {
                let data = arena.data_mut(node);
                data.range = data.range.shifted(delta);
                if let Some(js_doc) = data.js_doc {
                    pending.push(Child::List(js_doc));
                }
                pending.extend(children(arena, node));
            }
            Child::List(list) => {
                let data = arena.list_mut(list);
                data.range = data.range.shifted(delta);
                pending.extend(data.nodes.iter().copied().map(Child::Node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use rsparse_ast::dump::dump_tree;

    fn parse(text: &str) -> SourceFile {
        Parser::new("test.ts", text, ParseOptions::for_file_name("test.ts")).parse_source_file()
    }

    fn dump(file: &SourceFile) -> String {
        dump_tree(&file.arena, &file.interner, file.root)
    }

    fn edit(text: &str, start: u32, old_length: u32, insert: &str) -> (SourceFile, SourceFile) {
        let change = TextChangeRange::replacement(start, old_length, insert);
        let new_text = change.apply(text, insert).expect("edit in bounds");
        let updated = update_source_file(parse(text), &new_text, change).expect("valid change");
        (updated, parse(&new_text))
    }

    #[test]
    fn test_unchanged_returns_prior() {
        let file = parse("let a = 1;");
        let root = file.root;
        let same = update_source_file(file, "let a = 1;", TextChangeRange::unchanged()).expect("valid change");
        assert_eq!(same.root, root);
        assert!(!same.has_been_incrementally_parsed);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let result = update_source_file(parse("abc"), "abc", TextChangeRange::replacement(2, 5, "xxxxx"));
        assert!(matches!(result, Err(Error::InvalidChangeRange { .. })));

        let result = update_source_file(parse("abc"), "abcd", TextChangeRange::replacement(1, 1, "y"));
        assert!(matches!(result, Err(Error::TextLengthMismatch { expected: 3, actual: 4 })));
    }

    #[test]
    fn test_edit_matches_fresh_parse() {
        let (updated, fresh) = edit("function f(){ return 1; }", 21, 1, "2");
        assert_eq!(dump(&updated), dump(&fresh));
        assert!(updated.has_been_incrementally_parsed);
    }

    #[test]
    fn test_statements_after_edit_are_reused() {
        let text = "let a = 1;\nfunction g() { return a; }\nclass C { m() {} }\n";
        let (updated, fresh) = edit(text, 8, 1, "100");
        assert_eq!(dump(&updated), dump(&fresh));
        let stats = updated.incremental_stats.expect("incremental parse");
        assert!(stats.reused_nodes >= 2, "{stats:?}");
    }

    #[test]
    fn test_insertion_and_deletion() {
        let text = "a;\nb;\nc;\n";
        let (updated, fresh) = edit(text, 3, 0, "x = 1;\n");
        assert_eq!(dump(&updated), dump(&fresh));
        let (updated, fresh) = edit(text, 3, 3, "");
        assert_eq!(dump(&updated), dump(&fresh));
    }

    #[test]
    fn test_edit_that_joins_tokens() {
        // `ab` becomes one identifier once the space goes.
        let (updated, fresh) = edit("let x = a b;\nfoo();", 9, 1, "");
        assert_eq!(dump(&updated), dump(&fresh));
        assert_eq!(updated.parse_diagnostics, fresh.parse_diagnostics);
    }

    #[test]
    fn test_grown_arena_is_replaced() {
        let text = "let a = 1;\nlet b = 2;\n";
        let mut file = parse(text);
        assert!(!arena_is_mostly_garbage(&file));
        let mut fell_back = false;
        for round in 0..200 {
            let digit = if round % 2 == 0 { "3" } else { "1" };
            let change = TextChangeRange::replacement(8, 1, digit);
            let new_text = change.apply(&file.text, digit).expect("edit in bounds");
            file = update_source_file(file, &new_text, change).expect("valid change");
            fell_back |= !file.has_been_incrementally_parsed;
            assert!(file.arena.len() <= 2 * MAX_ARENA_GROWTH * file.node_count + 2 * ARENA_SLACK);
        }
        assert!(fell_back);
    }

    #[test]
    fn test_extend_to_affected_range_moves_start_back() {
        let file = parse("let abc = 1;\nlet d = 2;");
        let change = TextChangeRange::replacement(17, 1, "3");
        let extended = extend_to_affected_range(&file.arena, file.root, change);
        assert!(extended.span.start < 17);
        assert_eq!(extended.span.end(), 18);
        assert_eq!(extended.delta(), change.delta());
    }

    #[test]
    fn test_positions_shift_past_change() {
        let mut file = parse("a;\nb;");
        let second = file.statements()[1];
        let before = file.arena.range(second);
        update_token_positions_and_mark_elements(&mut file.arena, file.root, 0, 1, 3, 2);
        assert_eq!(file.arena.range(second), before.shifted(2));
        assert!(!file.arena.data(second).intersects_change);
        assert!(file.arena.data(file.statements()[0]).intersects_change);
    }
}
