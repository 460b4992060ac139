//! Operator precedence for binary operators.

use rsparse_ast::SyntaxKind;

/// Binding strength of operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[allow(dead_code)]
pub enum OperatorPrecedence {
    Comma = 0,
    Spread = 1,
    Yield = 2,
    Assignment = 3,
    Conditional = 4,
    NullishCoalescing = 5,
    LogicalOr = 6,
    LogicalAnd = 7,
    BitwiseOr = 8,
    BitwiseXor = 9,
    BitwiseAnd = 10,
    Equality = 11,
    Relational = 12,
    Shift = 13,
    Additive = 14,
    Multiplicative = 15,
    Exponentiation = 16,
    Unary = 17,
    Update = 18,
    LeftHandSide = 19,
    Member = 20,
    Primary = 21,
    Highest = 22,
    Invalid = 255,
}

impl OperatorPrecedence {
    /// Entry level of the binary expression loop.
    pub const LOWEST: OperatorPrecedence = OperatorPrecedence::Comma;

    /// Whether a token with this precedence is a binary operator at all.
    #[inline]
    pub fn is_binary(self) -> bool {
        self != OperatorPrecedence::Invalid && self > OperatorPrecedence::Comma
    }
}

/// Precedence of `kind` used as a binary operator, or `Invalid`.
///
/// `as` and `satisfies` share the relational level; `??` binds looser than
/// `||` so that mixing them without parentheses parses left to right.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::NullishCoalescing,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword
        | SyntaxKind::AsKeyword
        | SyntaxKind::SatisfiesKeyword => OperatorPrecedence::Relational,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => OperatorPrecedence::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let plus = get_binary_operator_precedence(SyntaxKind::PlusToken);
        let times = get_binary_operator_precedence(SyntaxKind::AsteriskToken);
        let pow = get_binary_operator_precedence(SyntaxKind::AsteriskAsteriskToken);
        assert!(plus < times);
        assert!(times < pow);
        assert!(
            get_binary_operator_precedence(SyntaxKind::QuestionQuestionToken)
                < get_binary_operator_precedence(SyntaxKind::BarBarToken)
        );
    }

    #[test]
    fn test_non_operators() {
        assert!(!get_binary_operator_precedence(SyntaxKind::EqualsToken).is_binary());
        assert!(!get_binary_operator_precedence(SyntaxKind::CommaToken).is_binary());
        assert!(get_binary_operator_precedence(SyntaxKind::AsKeyword).is_binary());
    }
}
