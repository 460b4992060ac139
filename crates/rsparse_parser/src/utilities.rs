//! Parser utility functions.

use rsparse_ast::SyntaxKind;

/// Keywords offered as spelling suggestions, in declaration order.
const KEYWORD_SUGGESTIONS: &[&str] = &[
    "abstract", "accessor", "any", "asserts", "assert", "bigint", "boolean", "break", "case", "catch", "class",
    "continue", "const", "constructor", "debugger", "declare", "default", "delete", "else", "enum", "export",
    "extends", "false", "finally", "for", "from", "function", "get", "implements", "import", "infer",
    "instanceof", "interface", "intrinsic", "keyof", "let", "module", "namespace", "never", "new", "null",
    "number", "object", "package", "private", "protected", "public", "override", "out", "readonly", "require",
    "global", "return", "satisfies", "set", "static", "string", "super", "switch", "symbol", "this", "throw",
    "true", "try", "type", "typeof", "undefined", "unique", "unknown", "using", "var", "void", "while", "with",
    "yield", "async", "await",
];

/// Tokens that begin a left-hand-side expression without any lookahead.
pub fn is_left_hand_side_expression_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::Identifier
    )
}

/// Tokens that may follow a modifier keyword for it to act as a modifier
/// rather than an identifier.
pub fn can_follow_modifier(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::DotDotDotToken
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::PrivateIdentifier
    ) || kind.is_identifier_or_keyword()
}

/// The closest keyword to `name`, for "did you mean" messages.
pub fn keyword_spelling_suggestion(name: &str) -> Option<&'static str> {
    get_spelling_suggestion(name, KEYWORD_SUGGESTIONS.iter().copied())
}

/// `functionfoo` is probably `function foo`.
pub fn keyword_space_suggestion(name: &str) -> Option<String> {
    KEYWORD_SUGGESTIONS
        .iter()
        .find(|keyword| name.len() > keyword.len() + 2 && name.starts_with(*keyword))
        .map(|keyword| format!("{} {}", keyword, &name[keyword.len()..]))
}

/// Pick the candidate with the smallest edit distance that is still close
/// enough to be a plausible typo.
pub fn get_spelling_suggestion<'c>(name: &str, candidates: impl IntoIterator<Item = &'c str>) -> Option<&'c str> {
    let name_len = name.chars().count();
    let maximum_length_difference = 2.max(name_len * 34 / 100);
    let mut best_distance = (name_len * 4 / 10) as f64 + 1.0;
    let mut best = None;
    for candidate in candidates {
        let candidate_len = candidate.chars().count();
        if candidate_len.abs_diff(name_len) > maximum_length_difference || candidate == name {
            continue;
        }
        if candidate_len < 3 && !candidate.eq_ignore_ascii_case(name) {
            continue;
        }
        if let Some(distance) = levenshtein_with_max(name, candidate, best_distance - 0.1) {
            best_distance = distance;
            best = Some(candidate);
        }
    }
    best
}

/// Edit distance where a change of letter case costs 0.1 and any other
/// substitution costs 2. `None` when the distance exceeds `max`.
fn levenshtein_with_max(s1: &str, s2: &str, max: f64) -> Option<f64> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let mut previous: Vec<f64> = (0..=b.len()).map(|j| j as f64).collect();
    let mut current = vec![0.0; b.len() + 1];
    for i in 1..=a.len() {
        current[0] = i as f64;
        let mut column_min = current[0];
        for j in 1..=b.len() {
            let distance = if a[i - 1] == b[j - 1] {
                previous[j - 1]
            } else {
                let substitution = if a[i - 1].to_ascii_lowercase() == b[j - 1].to_ascii_lowercase() {
                    previous[j - 1] + 0.1
                } else {
                    previous[j - 1] + 2.0
                };
                (previous[j] + 1.0).min(current[j - 1] + 1.0).min(substitution)
            };
            current[j] = distance;
            column_min = column_min.min(distance);
        }
        if column_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }
    let result = previous[b.len()];
    (result <= max).then_some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_spelling_suggestion() {
        assert_eq!(keyword_spelling_suggestion("cosnt"), Some("const"));
        assert_eq!(keyword_spelling_suggestion("fucntion"), Some("function"));
        assert_eq!(keyword_spelling_suggestion("xyzzy"), None);
    }

    #[test]
    fn test_space_suggestion() {
        assert_eq!(keyword_space_suggestion("functionfoo").as_deref(), Some("function foo"));
        assert_eq!(keyword_space_suggestion("classy"), None);
    }

    #[test]
    fn test_case_only_difference_is_cheap() {
        assert_eq!(levenshtein_with_max("Const", "const", 1.0), Some(0.1));
        assert_eq!(levenshtein_with_max("abc", "xyz", 2.0), None);
    }

    #[test]
    fn test_lhs_starts() {
        assert!(is_left_hand_side_expression_start(SyntaxKind::Identifier));
        assert!(is_left_hand_side_expression_start(SyntaxKind::NewKeyword));
        assert!(!is_left_hand_side_expression_start(SyntaxKind::PlusToken));
    }
}
