//! rsparse_diagnostics: Diagnostic records and the parser message catalog.
//!
//! A diagnostic is a plain `(start, length, code, args)` record with its
//! message text already formatted. The parser never fails on malformed input;
//! everything it has to say about the text ends up here.

use rsparse_core::text::TextSpan;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A message template with a code and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The template. May contain `{0}`, `{1}`, ... placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The arguments substituted into the message template.
    pub args: Vec<String>,
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            args: args.iter().map(|a| a.to_string()).collect(),
            related_information: Vec::new(),
        }
    }

    /// Create a diagnostic attached to a span of a file.
    pub fn with_location(
        file: impl Into<String>,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file.into()),
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Start offset, or 0 for a global diagnostic.
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.map_or(0, |s| s.start)
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.span.map_or(0, |s| s.length)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} RS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// An ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append unless the last diagnostic already starts at the same offset.
    ///
    /// Returns whether the diagnostic was kept.
    pub fn add_unless_same_start(&mut self, diagnostic: Diagnostic) -> bool {
        let start = diagnostic.start();
        if self.last().is_some_and(|last| last.start() == start) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Diagnostic> {
        self.diagnostics.last_mut()
    }

    /// Remove and return the diagnostics from index `len` on.
    pub fn split_off(&mut self, len: usize) -> Vec<Diagnostic> {
        self.diagnostics.split_off(len.min(self.diagnostics.len()))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Drop every diagnostic added after the collection had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.start().cmp(&b.start())));
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Lexical errors
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1124, Error, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1125, Error, "Hexadecimal digit expected.");
    pub const UNEXPECTED_END_OF_TEXT: DiagnosticMessage = diag!(1126, Error, "Unexpected end of text.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1160, Error, "Unterminated template literal.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1161, Error, "Unterminated regular expression literal.");
    pub const BINARY_DIGIT_EXPECTED: DiagnosticMessage = diag!(1177, Error, "Binary digit expected.");
    pub const OCTAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1178, Error, "Octal digit expected.");
    pub const MERGE_CONFLICT_MARKER_ENCOUNTERED: DiagnosticMessage = diag!(1185, Error, "Merge conflict marker encountered.");
    pub const AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF: DiagnosticMessage = diag!(1198, Error, "An extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive.");
    pub const UNTERMINATED_UNICODE_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1199, Error, "Unterminated Unicode escape sequence.");
    pub const AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL: DiagnosticMessage = diag!(1351, Error, "An identifier or keyword cannot immediately follow a numeric literal.");
    pub const UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_RBRACE: DiagnosticMessage = diag!(1381, Error, "Unexpected token. Did you mean `{'}'}` or `&rbrace;`?");
    pub const UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_GT: DiagnosticMessage = diag!(1382, Error, "Unexpected token. Did you mean `{'>'}` or `&gt;`?");
    pub const NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE: DiagnosticMessage = diag!(6188, Error, "Numeric separators are not allowed here.");
    pub const MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED: DiagnosticMessage = diag!(6189, Error, "Multiple consecutive numeric separators are not permitted.");
    pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1488, Error, "Escape sequence '{0}' is not allowed.");
    pub const OCTAL_LITERALS_ARE_NOT_ALLOWED_USE_THE_SYNTAX_0: DiagnosticMessage = diag!(1121, Error, "Octal literals are not allowed. Use the syntax '{0}'.");
    pub const KEYWORDS_CANNOT_CONTAIN_ESCAPE_CHARACTERS: DiagnosticMessage = diag!(1260, Error, "Keywords cannot contain escape characters.");
    pub const A_BIGINT_LITERAL_CANNOT_USE_EXPONENTIAL_NOTATION: DiagnosticMessage = diag!(1352, Error, "A bigint literal cannot use exponential notation.");
    pub const A_BIGINT_LITERAL_MUST_BE_AN_INTEGER: DiagnosticMessage = diag!(1353, Error, "A bigint literal must be an integer.");
    pub const OCTAL_ESCAPE_SEQUENCES_ARE_NOT_ALLOWED_USE_THE_SYNTAX_0: DiagnosticMessage = diag!(1487, Error, "Octal escape sequences are not allowed. Use the syntax '{0}'.");
    pub const DECIMALS_WITH_LEADING_ZEROS_ARE_NOT_ALLOWED: DiagnosticMessage = diag!(1489, Error, "Decimals with leading zeros are not allowed.");
    pub const UNKNOWN_REGULAR_EXPRESSION_FLAG: DiagnosticMessage = diag!(1499, Error, "Unknown regular expression flag.");
    pub const DUPLICATE_REGULAR_EXPRESSION_FLAG: DiagnosticMessage = diag!(1500, Error, "Duplicate regular expression flag.");
    pub const HASH_BANG_CAN_ONLY_BE_USED_AT_THE_START_OF_A_FILE: DiagnosticMessage = diag!(18026, Error, "'#!' can only be used at the start of a file.");

    // ========================================================================
    // Expected-token errors
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const THE_PARSER_EXPECTED_TO_FIND_A_0_TO_MATCH_THE_1_TOKEN_HERE: DiagnosticMessage = diag!(1007, Error, "The parser expected to find a '{0}' to match the '{1}' token here.");
    pub const TRAILING_COMMA_NOT_ALLOWED: DiagnosticMessage = diag!(1009, Error, "Trailing comma not allowed.");
    pub const AN_ELEMENT_ACCESS_EXPRESSION_SHOULD_TAKE_AN_ARGUMENT: DiagnosticMessage = diag!(1011, Error, "An element access expression should take an argument.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Error, "Unexpected token.");
    pub const A_REST_PARAMETER_OR_BINDING_PATTERN_MAY_NOT_HAVE_A_TRAILING_COMMA: DiagnosticMessage = diag!(1013, Error, "A rest parameter or binding pattern may not have a trailing comma.");
    pub const SUPER_MUST_BE_FOLLOWED_BY_AN_ARGUMENT_LIST_OR_MEMBER_ACCESS: DiagnosticMessage = diag!(1034, Error, "'super' must be followed by an argument list or member access.");
    pub const UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED: DiagnosticMessage = diag!(1068, Error, "Unexpected token. A constructor, method, accessor, or property was expected.");
    pub const _0_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1097, Error, "'{0}' list cannot be empty.");
    pub const TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1098, Error, "Type parameter list cannot be empty.");
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1099, Error, "Type argument list cannot be empty.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, "Type expected.");
    pub const VARIABLE_DECLARATION_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1123, Error, "Variable declaration list cannot be empty.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const STATEMENT_EXPECTED: DiagnosticMessage = diag!(1129, Error, "Statement expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage = diag!(1130, Error, "'case' or 'default' expected.");
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: DiagnosticMessage = diag!(1131, Error, "Property or signature expected.");
    pub const ENUM_MEMBER_EXPECTED: DiagnosticMessage = diag!(1132, Error, "Enum member expected.");
    pub const VARIABLE_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1134, Error, "Variable declaration expected.");
    pub const ARGUMENT_EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1135, Error, "Argument expression expected.");
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = diag!(1136, Error, "Property assignment expected.");
    pub const EXPRESSION_OR_COMMA_EXPECTED: DiagnosticMessage = diag!(1137, Error, "Expression or comma expected.");
    pub const PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1138, Error, "Parameter declaration expected.");
    pub const TYPE_PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1139, Error, "Type parameter declaration expected.");
    pub const TYPE_ARGUMENT_EXPECTED: DiagnosticMessage = diag!(1140, Error, "Type argument expected.");
    pub const STRING_LITERAL_EXPECTED: DiagnosticMessage = diag!(1141, Error, "String literal expected.");
    pub const LINE_BREAK_NOT_PERMITTED_HERE: DiagnosticMessage = diag!(1142, Error, "Line break not permitted here.");
    pub const OR_EXPECTED: DiagnosticMessage = diag!(1144, Error, "'{' or ';' expected.");
    pub const DECLARATION_EXPECTED: DiagnosticMessage = diag!(1146, Error, "Declaration expected.");
    pub const PROPERTY_DESTRUCTURING_PATTERN_EXPECTED: DiagnosticMessage = diag!(1180, Error, "Property destructuring pattern expected.");
    pub const ARRAY_ELEMENT_DESTRUCTURING_PATTERN_EXPECTED: DiagnosticMessage = diag!(1181, Error, "Array element destructuring pattern expected.");
    pub const MODIFIERS_CANNOT_APPEAR_HERE: DiagnosticMessage = diag!(1184, Error, "Modifiers cannot appear here.");
    pub const LINE_TERMINATOR_NOT_PERMITTED_BEFORE_ARROW: DiagnosticMessage = diag!(1200, Error, "Line terminator not permitted before arrow.");
    pub const DECORATORS_ARE_NOT_VALID_HERE: DiagnosticMessage = diag!(1206, Error, "Decorators are not valid here.");
    pub const AN_ENUM_MEMBER_NAME_MUST_BE_FOLLOWED_BY_A_COMMA_EQUALS_OR_CLOSE_BRACE: DiagnosticMessage = diag!(1357, Error, "An enum member name must be followed by a ',', '=', or '}'.");
    pub const IDENTIFIER_EXPECTED_0_IS_A_RESERVED_WORD_THAT_CANNOT_BE_USED_HERE: DiagnosticMessage = diag!(1359, Error, "Identifier expected. '{0}' is a reserved word that cannot be used here.");
    pub const A_TYPE_PREDICATE_IS_ONLY_ALLOWED_IN_RETURN_TYPE_POSITION: DiagnosticMessage = diag!(1228, Error, "A type predicate is only allowed in return type position for functions and methods.");
    pub const _0_IS_NOT_ALLOWED_AS_A_VARIABLE_DECLARATION_NAME: DiagnosticMessage = diag!(1389, Error, "'{0}' is not allowed as a variable declaration name.");
    pub const _0_IS_NOT_ALLOWED_AS_A_PARAMETER_NAME: DiagnosticMessage = diag!(1390, Error, "'{0}' is not allowed as a parameter name.");
    pub const UNEXPECTED_KEYWORD_OR_IDENTIFIER: DiagnosticMessage = diag!(1434, Error, "Unexpected keyword or identifier.");
    pub const UNKNOWN_KEYWORD_OR_IDENTIFIER_DID_YOU_MEAN_0: DiagnosticMessage = diag!(1435, Error, "Unknown keyword or identifier. Did you mean '{0}'?");
    pub const NAMESPACE_MUST_BE_GIVEN_A_NAME: DiagnosticMessage = diag!(1437, Error, "Namespace must be given a name.");
    pub const INTERFACE_MUST_BE_GIVEN_A_NAME: DiagnosticMessage = diag!(1438, Error, "Interface must be given a name.");
    pub const TYPE_ALIAS_MUST_BE_GIVEN_A_NAME: DiagnosticMessage = diag!(1439, Error, "Type alias must be given a name.");
    pub const VARIABLE_DECLARATION_NOT_ALLOWED_AT_THIS_LOCATION: DiagnosticMessage = diag!(1440, Error, "Variable declaration not allowed at this location.");
    pub const MODULE_DECLARATION_NAMES_MAY_ONLY_USE_OR_QUOTED_STRINGS: DiagnosticMessage = diag!(1443, Error, "Module declaration names may only use ' or \" quoted strings.");
    pub const CATCH_OR_FINALLY_EXPECTED: DiagnosticMessage = diag!(1472, Error, "'catch' or 'finally' expected.");
    pub const AN_INSTANTIATION_EXPRESSION_CANNOT_BE_FOLLOWED_BY_A_PROPERTY_ACCESS: DiagnosticMessage = diag!(1477, Error, "An instantiation expression cannot be followed by a property access.");
    pub const IDENTIFIER_OR_STRING_LITERAL_EXPECTED: DiagnosticMessage = diag!(1478, Error, "Identifier or string literal expected.");
    pub const IDENTIFIER_STRING_LITERAL_OR_NUMBER_LITERAL_EXPECTED: DiagnosticMessage = diag!(1496, Error, "Identifier, string literal, or number literal expected.");
    pub const UNEXPECTED_TOKEN_EXPECTED: DiagnosticMessage = diag!(1179, Error, "Unexpected token. '{' expected.");
    pub const _0_IS_NOT_A_VALID_META_PROPERTY_FOR_KEYWORD_1_DID_YOU_MEAN_2: DiagnosticMessage = diag!(17012, Error, "'{0}' is not a valid meta-property for keyword '{1}'. Did you mean '{2}'?");
    pub const DECLARATION_OR_STATEMENT_EXPECTED_THIS_FOLLOWS_A_BLOCK_OF_STATEMENTS: DiagnosticMessage = diag!(2809, Error, "Declaration or statement expected. This '=' follows a block of statements, so if you intended to write a destructuring assignment, you might need to wrap the whole assignment in parentheses.");
    pub const INTERFACE_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2427, Error, "Interface name cannot be '{0}'.");
    pub const TYPE_ALIAS_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2457, Error, "Type alias name cannot be '{0}'.");
    pub const NAMESPACE_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2819, Error, "Namespace name cannot be '{0}'.");
    pub const AN_OPTIONAL_CHAIN_CANNOT_CONTAIN_PRIVATE_IDENTIFIERS: DiagnosticMessage = diag!(18030, Error, "An optional chain cannot contain private identifiers.");
    pub const TAGGED_TEMPLATE_EXPRESSIONS_ARE_NOT_PERMITTED_IN_AN_OPTIONAL_CHAIN: DiagnosticMessage = diag!(1358, Error, "Tagged template expressions are not permitted in an optional chain.");
    pub const PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_IN_VARIABLE_DECLARATIONS: DiagnosticMessage = diag!(18029, Error, "Private identifiers are not allowed in variable declarations.");
    pub const PRIVATE_IDENTIFIERS_CANNOT_BE_USED_AS_PARAMETERS: DiagnosticMessage = diag!(18009, Error, "Private identifiers cannot be used as parameters.");
    pub const DECORATORS_MUST_PRECEDE_THE_NAME_AND_ALL_KEYWORDS_OF_PROPERTY_DECLARATIONS: DiagnosticMessage = diag!(1436, Error, "Decorators must precede the name and all keywords of property declarations.");
    pub const CANNOT_START_A_FUNCTION_CALL_IN_A_TYPE_ANNOTATION: DiagnosticMessage = diag!(1441, Error, "Cannot start a function call in a type annotation.");
    pub const EXPECTED_FOR_PROPERTY_INITIALIZER: DiagnosticMessage = diag!(1442, Error, "Expected '=' for property initializer.");
    pub const UNICODE_ESCAPE_SEQUENCE_CANNOT_APPEAR_HERE: DiagnosticMessage = diag!(17021, Error, "Unicode escape sequence cannot appear here.");
    pub const INVALID_OPTIONAL_CHAIN_FROM_NEW_EXPRESSION_DID_YOU_MEAN_TO_CALL_0: DiagnosticMessage = diag!(1209, Error, "Invalid optional chain from new expression. Did you mean to call '{0}()'?");
    pub const SUPER_MAY_NOT_USE_TYPE_ARGUMENTS: DiagnosticMessage = diag!(2754, Error, "'super' may not use type arguments.");
    pub const AN_UNARY_EXPRESSION_WITH_THE_0_OPERATOR_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION: DiagnosticMessage = diag!(17006, Error, "An unary expression with the '{0}' operator is not allowed in the left-hand side of an exponentiation expression. Consider enclosing the expression in parentheses.");
    pub const A_TYPE_ASSERTION_EXPRESSION_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION: DiagnosticMessage = diag!(17007, Error, "A type assertion expression is not allowed in the left-hand side of an exponentiation expression. Consider enclosing the expression in parentheses.");
    pub const FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE: DiagnosticMessage = diag!(1385, Error, "Function type notation must be parenthesized when used in a union type.");
    pub const FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE: DiagnosticMessage = diag!(1387, Error, "Function type notation must be parenthesized when used in an intersection type.");
    pub const CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE: DiagnosticMessage = diag!(1386, Error, "Constructor type notation must be parenthesized when used in a union type.");
    pub const CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE: DiagnosticMessage = diag!(1388, Error, "Constructor type notation must be parenthesized when used in an intersection type.");
    pub const PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_OUTSIDE_CLASS_BODIES: DiagnosticMessage = diag!(18016, Error, "Private identifiers are not allowed outside class bodies.");

    // ========================================================================
    // Markup (JSX) errors
    // ========================================================================
    pub const JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT: DiagnosticMessage = diag!(2657, Error, "JSX expressions must have one parent element.");
    pub const EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0: DiagnosticMessage = diag!(17002, Error, "Expected corresponding JSX closing tag for '{0}'.");
    pub const JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG: DiagnosticMessage = diag!(17008, Error, "JSX element '{0}' has no corresponding closing tag.");
    pub const JSX_FRAGMENT_HAS_NO_CORRESPONDING_CLOSING_TAG: DiagnosticMessage = diag!(17014, Error, "JSX fragment has no corresponding closing tag.");
    pub const EXPECTED_CORRESPONDING_CLOSING_TAG_FOR_JSX_FRAGMENT: DiagnosticMessage = diag!(17015, Error, "Expected corresponding closing tag for JSX fragment.");
    pub const OR_JSX_ELEMENT_EXPECTED: DiagnosticMessage = diag!(1145, Error, "'{' or JSX element expected.");
    pub const JSX_ATTRIBUTES_MUST_ONLY_BE_ASSIGNED_A_NON_EMPTY_EXPRESSION: DiagnosticMessage = diag!(17000, Error, "JSX attributes must only be assigned a non-empty 'expression'.");

    // ========================================================================
    // Documentation comment errors
    // ========================================================================
    pub const A_JSDOC_TYPEDEF_COMMENT_MAY_NOT_CONTAIN_MULTIPLE_TYPE_TAGS: DiagnosticMessage = diag!(8033, Error, "A JSDoc '@typedef' comment may not contain multiple '@type' tags.");
    pub const A_JSDOC_TEMPLATE_TAG_MAY_NOT_FOLLOW_A_TYPEDEF_CALLBACK_OR_OVERLOAD_TAG: DiagnosticMessage = diag!(8039, Error, "A JSDoc '@template' tag may not follow a '@typedef', '@callback', or '@overload' tag");
    pub const _0_TAG_ALREADY_SPECIFIED: DiagnosticMessage = diag!(1223, Error, "'{0}' tag already specified.");
    pub const UNEXPECTED_TOKEN_A_TYPE_PARAMETER_NAME_WAS_EXPECTED_WITHOUT_CURLY_BRACES: DiagnosticMessage = diag!(1069, Error, "Unexpected token. A type parameter name was expected without curly braces.");

    // ========================================================================
    // Resource limits
    // ========================================================================
    pub const EXPRESSION_OR_TYPE_NESTING_IS_TOO_DEEP: DiagnosticMessage = diag!(1999, Error, "Expression or type nesting is too deep.");
    pub const FILE_APPEARS_TO_BE_BINARY: DiagnosticMessage = diag!(1490, Error, "File appears to be binary.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("'{0}' expected.", &[")"]);
        assert_eq!(msg, "')' expected.");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Unexpected token.", &[]);
        assert_eq!(msg, "Unexpected token.");
    }

    #[test]
    fn test_format_message_repeated_placeholder() {
        let msg = format_message("'{0}' then '{1}' then '{0}'", &["a", "b"]);
        assert_eq!(msg, "'a' then 'b' then 'a'");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            "test.ts",
            TextSpan::new(10, 5),
            &messages::_0_EXPECTED,
            &["]"],
        );
        assert_eq!(diag.to_string(), "test.ts(10): error RS1005: ']' expected.");
        assert_eq!(diag.args, vec!["]".to_string()]);
        assert_eq!(diag.start(), 10);
        assert_eq!(diag.length(), 5);
    }

    #[test]
    fn test_add_unless_same_start() {
        let mut diags = DiagnosticCollection::new();
        let at = |start| {
            Diagnostic::with_location("a.ts", TextSpan::new(start, 1), &messages::EXPRESSION_EXPECTED, &[])
        };
        assert!(diags.add_unless_same_start(at(3)));
        assert!(!diags.add_unless_same_start(at(3)));
        assert!(diags.add_unless_same_start(at(4)));
        assert_eq!(diags.len(), 2);
        diags.truncate(1);
        assert_eq!(diags.last().map(Diagnostic::start), Some(3));
    }

    #[test]
    fn test_sort_by_position() {
        let mut diags = DiagnosticCollection::new();
        for start in [9, 2, 5] {
            diags.add(Diagnostic::with_location("a.ts", TextSpan::new(start, 0), &messages::UNEXPECTED_TOKEN, &[]));
        }
        diags.sort();
        let starts: Vec<u32> = diags.iter().map(Diagnostic::start).collect();
        assert_eq!(starts, vec![2, 5, 9]);
    }
}
