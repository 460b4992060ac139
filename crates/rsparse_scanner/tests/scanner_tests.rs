//! Scanner integration tests.
//!
//! Token streams for realistic snippets, plus the error positions the parser
//! relies on.

use pretty_assertions::assert_eq;
use rsparse_ast::{LanguageVariant, SyntaxKind};
use rsparse_scanner::{get_leading_comment_ranges, Scanner};

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(kind, _)| kind).collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  ").is_empty());
}

#[test]
fn test_variable_statement() {
    assert_eq!(
        scan_kinds("let x: number = 1;"),
        vec![
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::NumberKeyword,
            SyntaxKind::EqualsToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_arrow_function_tokens() {
    assert_eq!(
        scan_kinds("(a, b) => a ?? b"),
        vec![
            SyntaxKind::OpenParenToken,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_string_literal_values() {
    let tokens = scan_all(r#"'single' "double" 'it\'s'"#);
    assert_eq!(
        tokens,
        vec![
            (SyntaxKind::StringLiteral, "single".to_string()),
            (SyntaxKind::StringLiteral, "double".to_string()),
            (SyntaxKind::StringLiteral, "it's".to_string()),
        ]
    );
}

#[test]
fn test_non_ascii_identifiers_and_offsets() {
    let mut scanner = Scanner::new("const café = 'ü'; x");
    assert_eq!(scanner.scan(), SyntaxKind::ConstKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "café");
    assert_eq!((scanner.token_start(), scanner.token_end()), (6, 11));
    assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "ü");
    assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_start(), 20);
}

#[test]
fn test_full_start_includes_trivia() {
    let mut scanner = Scanner::new("a  /* c */  b");
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.token_full_start(), 1);
    assert_eq!(scanner.token_start(), 12);
    assert_eq!(scanner.token_text(), "b");
}

#[test]
fn test_generic_closing_angles_are_single_tokens() {
    // `>>` is only combined on request, so `Array<Array<T>>` closes cleanly.
    assert_eq!(
        scan_kinds("A<B<C>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
        ]
    );
}

#[test]
fn test_less_than_slash_only_in_jsx() {
    let mut scanner = Scanner::new("</");
    assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);

    let mut scanner = Scanner::new("</a");
    scanner.set_language_variant(LanguageVariant::Jsx);
    assert_eq!(scanner.scan(), SyntaxKind::LessThanSlashToken);

    let mut scanner = Scanner::new("</* c */");
    scanner.set_language_variant(LanguageVariant::Jsx);
    assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
}

#[test]
fn test_template_with_nested_substitution() {
    let mut scanner = Scanner::new("`x${ {a: 1}.a }y`");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::ColonToken);
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.rescan_template_token(false), SyntaxKind::TemplateTail);
    assert_eq!(scanner.token_value(), "y");
}

#[test]
fn test_unterminated_template() {
    let mut scanner = Scanner::new("`abc");
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert!(scanner.is_unterminated());
    let errors = scanner.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message.code, 1160);
    assert_eq!(errors[0].pos, 4);
}

#[test]
fn test_regex_after_rescan_keeps_following_tokens() {
    let mut scanner = Scanner::new("x = /[a-z]+\\//g.test(s)");
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(scanner.rescan_slash_token(true), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.token_value(), "/[a-z]+\\//g");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    assert!(!scanner.has_errors());
}

#[test]
fn test_take_errors_drains_queue() {
    let mut scanner = Scanner::new("'a\n'b");
    scanner.scan();
    assert_eq!(scanner.take_errors().len(), 1);
    assert!(scanner.take_errors().is_empty());
}

#[test]
fn test_leading_comment_ranges_for_doc_comment() {
    let text = "x;\n/** Adds. */\nfunction add() {}";
    let ranges = get_leading_comment_ranges(text, 2);
    assert_eq!(ranges.len(), 1);
    assert!(ranges[0].is_jsdoc(text));
    assert_eq!(&text[ranges[0].pos as usize..ranges[0].end as usize], "/** Adds. */");
}

#[test]
fn test_every_byte_offset_is_a_char_boundary() {
    let text = "let ß = \"→\" + `✓${a}` // ☃\n/* ü */ y";
    let mut scanner = Scanner::new(text);
    loop {
        let kind = scanner.scan();
        assert!(text.is_char_boundary(scanner.token_start() as usize));
        assert!(text.is_char_boundary(scanner.token_end() as usize));
        if kind == SyntaxKind::CloseBraceToken {
            scanner.rescan_template_token(false);
        }
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
    }
}
