//! Comment directives at the top of a file.
//!
//! Only the comments before the first token are looked at, and only the
//! directive names below are recorded. Arguments are collected as written;
//! nothing here acts on them.

use regex::Regex;
use rsparse_ast::{Pragma, PragmaKind, SyntaxKind};
use rsparse_core::TextRange;
use rsparse_scanner::get_leading_comment_ranges;
use std::sync::OnceLock;

struct PragmaDef {
    name: &'static str,
    kind: PragmaKind,
    /// Argument names, and whether each may be left out.
    args: &'static [(&'static str, bool)],
}

const PRAGMAS: &[PragmaDef] = &[
    PragmaDef {
        name: "reference",
        kind: PragmaKind::TripleSlashXml,
        args: &[
            ("types", true),
            ("lib", true),
            ("path", true),
            ("no-default-lib", true),
            ("resolution-mode", true),
            ("preserve", true),
        ],
    },
    PragmaDef {
        name: "amd-dependency",
        kind: PragmaKind::TripleSlashXml,
        args: &[("path", false), ("name", true)],
    },
    PragmaDef {
        name: "amd-module",
        kind: PragmaKind::TripleSlashXml,
        args: &[("name", false)],
    },
    PragmaDef {
        name: "ts-check",
        kind: PragmaKind::SingleLine,
        args: &[],
    },
    PragmaDef {
        name: "ts-nocheck",
        kind: PragmaKind::SingleLine,
        args: &[],
    },
    PragmaDef {
        name: "jsx",
        kind: PragmaKind::MultiLine,
        args: &[("factory", false)],
    },
    PragmaDef {
        name: "jsxfrag",
        kind: PragmaKind::MultiLine,
        args: &[("factory", false)],
    },
    PragmaDef {
        name: "jsximportsource",
        kind: PragmaKind::MultiLine,
        args: &[("factory", false)],
    },
    PragmaDef {
        name: "jsxruntime",
        kind: PragmaKind::MultiLine,
        args: &[("factory", false)],
    },
];

fn triple_slash_xml_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^///\s*<(\S+)\s.*?/>").expect("valid regex"))
}

fn single_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^///?\s*@([^\s:]+)((?:[^\S\r\n]|:).*)?$").expect("valid regex"))
}

fn multi_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)@(\S+)(\s+(?:\S.*)?)?$").expect("valid regex"))
}

fn xml_attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([\w-]+)\s*=\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid regex"))
}

fn definition_for(name: &str, kind: PragmaKind) -> Option<&'static PragmaDef> {
    PRAGMAS.iter().find(|def| def.name == name && def.kind == kind)
}

/// Directives in the comments before the first token of `text`.
pub(crate) fn collect_pragmas(text: &str) -> Vec<Pragma> {
    let mut pragmas = Vec::new();
    for comment in get_leading_comment_ranges(text, 0) {
        let range = TextRange::new(comment.pos, comment.end);
        let Some(comment_text) = text.get(comment.pos as usize..comment.end as usize) else {
            continue;
        };
        if comment.kind == SyntaxKind::MultiLineCommentTrivia {
            for captures in multi_line_re().captures_iter(comment_text) {
                let name = captures[1].to_ascii_lowercase();
                let value = captures.get(2).map_or("", |m| m.as_str());
                pragmas.extend(line_pragma(PragmaKind::MultiLine, name, value, range));
            }
            continue;
        }
        if let Some(captures) = triple_slash_xml_re().captures(comment_text) {
            let name = captures[1].to_ascii_lowercase();
            pragmas.extend(xml_pragma(name, comment_text, range));
            continue;
        }
        if let Some(captures) = single_line_re().captures(comment_text) {
            let name = captures[1].to_ascii_lowercase();
            let value = captures.get(2).map_or("", |m| m.as_str());
            pragmas.extend(line_pragma(PragmaKind::SingleLine, name, value, range));
        }
    }
    pragmas
}

/// `/// <name attr="value" />`. A required attribute that is missing drops
/// the directive.
fn xml_pragma(name: String, comment_text: &str, range: TextRange) -> Option<Pragma> {
    let def = definition_for(&name, PragmaKind::TripleSlashXml)?;
    let written: Vec<(String, String)> = xml_attribute_re()
        .captures_iter(comment_text)
        .map(|captures| {
            let value = captures.get(2).or_else(|| captures.get(3)).map_or("", |m| m.as_str());
            (captures[1].to_ascii_lowercase(), value.to_string())
        })
        .collect();
    let mut arguments = Vec::new();
    for &(arg, optional) in def.args {
        match written.iter().find(|(key, _)| key == arg) {
            Some(pair) => arguments.push(pair.clone()),
            None if optional => {}
            None => return None,
        }
    }
    Some(Pragma {
        kind: PragmaKind::TripleSlashXml,
        name,
        arguments,
        range,
    })
}

/// `// @name value` or `@name value` inside a block comment. Arguments are
/// whitespace separated and taken in declaration order.
fn line_pragma(kind: PragmaKind, name: String, value: &str, range: TextRange) -> Option<Pragma> {
    let def = definition_for(&name, kind)?;
    let value = value.trim_start_matches(':').trim();
    let mut words = value.split_whitespace();
    let mut arguments = Vec::new();
    if !value.is_empty() {
        for &(arg, optional) in def.args {
            match words.next() {
                Some(word) => arguments.push((arg.to_string(), word.to_string())),
                None if optional => {}
                None => return None,
            }
        }
    }
    Some(Pragma {
        kind,
        name,
        arguments,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_directives() {
        let text = "/// <reference path=\"a.d.ts\" />\n/// <reference types='node' />\nlet x;";
        let pragmas = collect_pragmas(text);
        assert_eq!(pragmas.len(), 2);
        assert_eq!(pragmas[0].kind, PragmaKind::TripleSlashXml);
        assert_eq!(pragmas[0].argument("path"), Some("a.d.ts"));
        assert_eq!(pragmas[1].argument("types"), Some("node"));
        assert_eq!(pragmas[1].range, TextRange::new(32, 62));
    }

    #[test]
    fn test_required_attribute_missing() {
        assert!(collect_pragmas("/// <amd-module />\n").is_empty());
        let pragmas = collect_pragmas("/// <amd-module name=\"m\"/>\n");
        assert_eq!(pragmas[0].argument("name"), Some("m"));
    }

    #[test]
    fn test_single_line_and_block_directives() {
        let text = "#!/usr/bin/env node\n// @ts-nocheck\n/** @jsx h */\nfoo();";
        let pragmas = collect_pragmas(text);
        let names: Vec<&str> = pragmas.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ts-nocheck", "jsx"]);
        assert_eq!(pragmas[1].kind, PragmaKind::MultiLine);
        assert_eq!(pragmas[1].argument("factory"), Some("h"));
    }

    #[test]
    fn test_only_leading_comments_and_known_names() {
        let pragmas = collect_pragmas("// @custom thing\nfoo();\n// @ts-check\n");
        assert!(pragmas.is_empty());
    }
}
