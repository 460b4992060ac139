//! Flag types and per-file settings for the syntax tree.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Flags for syntax nodes.
    ///
    /// The `*_CONTEXT` bits record the parser context a node was built in.
    /// A node is only reused by incremental parsing when its context bits
    /// match the parser's current context.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const NONE                          = 0;
        const LET                           = 1 << 0;
        const CONST                         = 1 << 1;
        const USING                         = 1 << 2;
        const AWAIT_USING                   = 1 << 3;
        const NESTED_NAMESPACE              = 1 << 4;
        const NAMESPACE                     = 1 << 5;
        const OPTIONAL_CHAIN                = 1 << 6;
        const EXPORT_CONTEXT                = 1 << 7;
        const GLOBAL_AUGMENTATION           = 1 << 8;
        const DISALLOW_IN_CONTEXT           = 1 << 9;
        const YIELD_CONTEXT                 = 1 << 10;
        const DECORATOR_CONTEXT             = 1 << 11;
        const AWAIT_CONTEXT                 = 1 << 12;
        const DISALLOW_CONDITIONAL_TYPES_CONTEXT = 1 << 13;
        const THIS_NODE_HAS_ERROR           = 1 << 14;
        const JAVASCRIPT_FILE               = 1 << 15;
        const THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR = 1 << 16;
        const POSSIBLY_CONTAINS_DYNAMIC_IMPORT = 1 << 17;
        const POSSIBLY_CONTAINS_IMPORT_META = 1 << 18;
        const JSDOC                         = 1 << 19;
        const AMBIENT                       = 1 << 20;
        const IN_WITH_STATEMENT             = 1 << 21;
        const JSON_FILE                     = 1 << 22;
        /// Set on `await` identifiers outside an await context and on every
        /// ancestor of one.
        const CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT = 1 << 23;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits() | Self::USING.bits() | Self::AWAIT_USING.bits();

        const CONTEXT_FLAGS = Self::DISALLOW_IN_CONTEXT.bits()
            | Self::YIELD_CONTEXT.bits()
            | Self::DECORATOR_CONTEXT.bits()
            | Self::AWAIT_CONTEXT.bits()
            | Self::DISALLOW_CONDITIONAL_TYPES_CONTEXT.bits()
            | Self::JAVASCRIPT_FILE.bits()
            | Self::IN_WITH_STATEMENT.bits()
            | Self::AMBIENT.bits()
            | Self::JSDOC.bits();

        /// Context bits cleared while parsing a type.
        const TYPE_EXCLUDES_FLAGS = Self::YIELD_CONTEXT.bits() | Self::AWAIT_CONTEXT.bits();

        /// Bits that propagate from a child to every ancestor.
        const AGGREGATED = Self::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR.bits()
            | Self::CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT.bits();
    }
}

bitflags::bitflags! {
    /// Modifier flags computed from a declaration's modifier list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const NONE              = 0;
        const EXPORT            = 1 << 0;
        const AMBIENT           = 1 << 1;
        const PUBLIC            = 1 << 2;
        const PRIVATE           = 1 << 3;
        const PROTECTED         = 1 << 4;
        const STATIC            = 1 << 5;
        const READONLY          = 1 << 6;
        const ACCESSOR          = 1 << 7;
        const ABSTRACT          = 1 << 8;
        const ASYNC             = 1 << 9;
        const DEFAULT           = 1 << 10;
        const CONST             = 1 << 11;
        const OVERRIDE          = 1 << 12;
        const IN                = 1 << 13;
        const OUT               = 1 << 14;
        const DECORATOR         = 1 << 15;

        const ACCESSIBILITY_MODIFIER = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY_MODIFIER = Self::ACCESSIBILITY_MODIFIER.bits() | Self::READONLY.bits() | Self::OVERRIDE.bits();
        const EXPORT_DEFAULT = Self::EXPORT.bits() | Self::DEFAULT.bits();
    }
}

impl ModifierFlags {
    /// The flag a single modifier keyword contributes.
    pub fn from_modifier_kind(kind: crate::SyntaxKind) -> ModifierFlags {
        use crate::SyntaxKind;
        match kind {
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::AccessorKeyword => ModifierFlags::ACCESSOR,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::ConstKeyword => ModifierFlags::CONST,
            SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
            SyntaxKind::InKeyword => ModifierFlags::IN,
            SyntaxKind::OutKeyword => ModifierFlags::OUT,
            SyntaxKind::Decorator => ModifierFlags::DECORATOR,
            _ => ModifierFlags::NONE,
        }
    }
}

// Token flags from the scanner.
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u32 {
        const NONE                              = 0;
        const PRECEDING_LINE_BREAK              = 1 << 0;
        const PRECEDING_JSDOC_COMMENT           = 1 << 1;
        const UNTERMINATED                      = 1 << 2;
        const EXTENDED_UNICODE_ESCAPE           = 1 << 3;
        const SCIENTIFIC                        = 1 << 4;
        const OCTAL                             = 1 << 5;
        const HEX_SPECIFIER                     = 1 << 6;
        const BINARY_SPECIFIER                  = 1 << 7;
        const OCTAL_SPECIFIER                   = 1 << 8;
        const CONTAINS_SEPARATOR                = 1 << 9;
        const UNICODE_ESCAPE                    = 1 << 10;
        const CONTAINS_INVALID_ESCAPE           = 1 << 11;
        const HEX_ESCAPE                        = 1 << 12;
        const CONTAINS_LEADING_ZERO             = 1 << 13;
        const CONTAINS_INVALID_SEPARATOR        = 1 << 14;
        const PRECEDING_JSDOC_LEADING_ASTERISKS = 1 << 15;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::OCTAL.bits()
            | Self::CONTAINS_LEADING_ZERO.bits()
            | Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits()
            | Self::CONTAINS_SEPARATOR.bits()
            | Self::CONTAINS_INVALID_SEPARATOR.bits();

        const TEMPLATE_LITERAL_LIKE_FLAGS = Self::HEX_ESCAPE.bits()
            | Self::UNICODE_ESCAPE.bits()
            | Self::EXTENDED_UNICODE_ESCAPE.bits()
            | Self::CONTAINS_INVALID_ESCAPE.bits();

        const STRING_LITERAL_FLAGS = Self::HEX_ESCAPE.bits()
            | Self::UNICODE_ESCAPE.bits()
            | Self::EXTENDED_UNICODE_ESCAPE.bits()
            | Self::CONTAINS_INVALID_ESCAPE.bits()
            | Self::UNTERMINATED.bits();
    }
}

/// The ECMAScript edition the source targets. Affects identifier rules only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVersion {
    ES3,
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ES2023,
    #[default]
    ESNext,
}

/// Whether `<` may start markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LanguageVariant {
    #[default]
    Standard,
    Jsx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    Js,
    Jsx,
    #[default]
    Ts,
    Tsx,
    Json,
}

impl ScriptKind {
    /// Guess the script kind from a file name's extension.
    pub fn from_file_name(file_name: &str) -> ScriptKind {
        let lower = file_name.to_ascii_lowercase();
        let ext = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "js" | "cjs" | "mjs" => ScriptKind::Js,
            "jsx" => ScriptKind::Jsx,
            "tsx" => ScriptKind::Tsx,
            "json" => ScriptKind::Json,
            _ => ScriptKind::Ts,
        }
    }

    pub fn language_variant(self) -> LanguageVariant {
        match self {
            ScriptKind::Jsx | ScriptKind::Tsx | ScriptKind::Js | ScriptKind::Json => LanguageVariant::Jsx,
            ScriptKind::Ts => LanguageVariant::Standard,
        }
    }

}

/// How much of each documentation comment the parser reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JSDocParsingMode {
    #[default]
    ParseAll,
    ParseNone,
    /// Only what type checking needs: everything in JS files, and only
    /// comments mentioning `@see` or `@link` in TS files.
    ParseForTypeErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_kind_from_file_name() {
        assert_eq!(ScriptKind::from_file_name("a.ts"), ScriptKind::Ts);
        assert_eq!(ScriptKind::from_file_name("a.d.ts"), ScriptKind::Ts);
        assert_eq!(ScriptKind::from_file_name("App.TSX"), ScriptKind::Tsx);
        assert_eq!(ScriptKind::from_file_name("index.mjs"), ScriptKind::Js);
        assert_eq!(ScriptKind::from_file_name("package.json"), ScriptKind::Json);
        assert_eq!(ScriptKind::from_file_name("noext"), ScriptKind::Ts);
    }

    #[test]
    fn test_context_flags_mask() {
        assert!(NodeFlags::CONTEXT_FLAGS.contains(NodeFlags::AWAIT_CONTEXT));
        assert!(!NodeFlags::CONTEXT_FLAGS.contains(NodeFlags::THIS_NODE_HAS_ERROR));
        assert!(NodeFlags::AGGREGATED.contains(NodeFlags::CONTAINS_POSSIBLE_TOP_LEVEL_AWAIT));
    }

    #[test]
    fn test_modifier_flags() {
        use crate::SyntaxKind;
        assert_eq!(ModifierFlags::from_modifier_kind(SyntaxKind::ExportKeyword), ModifierFlags::EXPORT);
        assert_eq!(ModifierFlags::from_modifier_kind(SyntaxKind::Identifier), ModifierFlags::NONE);
    }
}
