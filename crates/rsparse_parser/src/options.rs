//! Per-parse settings.

use rsparse_ast::{JSDocParsingMode, LanguageVariant, LanguageVersion, ScriptKind};
use serde::{Deserialize, Serialize};

/// Settings for one parse.
///
/// Everything here is recorded on the resulting `SourceFile`; an
/// incremental update reuses the settings of the file it updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    pub language_variant: LanguageVariant,
    pub script_kind: ScriptKind,
    pub jsdoc_parsing_mode: JSDocParsingMode,
    /// Compute `external_module_indicator` from import/export statements
    /// and `import.meta`.
    pub set_external_module_indicator: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            language_version: LanguageVersion::ESNext,
            language_variant: LanguageVariant::Standard,
            script_kind: ScriptKind::Ts,
            jsdoc_parsing_mode: JSDocParsingMode::ParseAll,
            set_external_module_indicator: true,
        }
    }
}

impl ParseOptions {
    /// Options for a file, with the script kind and markup variant taken
    /// from its extension.
    pub fn for_file_name(file_name: &str) -> Self {
        let script_kind = ScriptKind::from_file_name(file_name);
        Self {
            script_kind,
            language_variant: script_kind.language_variant(),
            ..Self::default()
        }
    }
}

/// `.d.ts`, `.d.mts`, `.d.cts` and `.d.<ext>.ts` files hold only declarations.
pub fn is_declaration_file_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    let base = lower.rsplit(['/', '\\']).next().unwrap_or(&lower);
    [".d.ts", ".d.mts", ".d.cts"].iter().any(|ext| base.ends_with(ext))
        || (base.ends_with(".ts") && base.contains(".d."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_file_name() {
        let options = ParseOptions::for_file_name("app.tsx");
        assert_eq!(options.script_kind, ScriptKind::Tsx);
        assert_eq!(options.language_variant, LanguageVariant::Jsx);

        let options = ParseOptions::for_file_name("lib.ts");
        assert_eq!(options.language_variant, LanguageVariant::Standard);
        assert!(options.set_external_module_indicator);
    }

    #[test]
    fn test_declaration_file_names() {
        assert!(is_declaration_file_name("lib.d.ts"));
        assert!(is_declaration_file_name("src/types.d.mts"));
        assert!(is_declaration_file_name("styles.d.css.ts"));
        assert!(!is_declaration_file_name("index.ts"));
        assert!(!is_declaration_file_name("d.ts"));
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"scriptKind":"jsx","jsdocParsingMode":"parse-none"}"#).unwrap();
        assert_eq!(options.script_kind, ScriptKind::Jsx);
        assert_eq!(options.jsdoc_parsing_mode, JSDocParsingMode::ParseNone);
        assert_eq!(options.language_version, LanguageVersion::ESNext);
    }
}
