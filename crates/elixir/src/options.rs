use crate::{Options, Result};

use anyhow::Context;
use std::path::Path;

/// Parses options from a JSON document.
///
/// Keys missing from the document keep their default value; unknown keys are
/// rejected.
pub fn parse_options(json: &str) -> Result<Options> {
    let options: Options = serde_json::from_str(json)?;
    tracing::debug!(?options, "parsed options");
    Ok(options)
}

/// Reads options from a JSON file.
pub fn load_options(path: impl AsRef<Path>) -> Result<Options> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options from {}", path.display()))?;

    let options: Options = serde_json::from_str(&json)
        .with_context(|| format!("invalid options in {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?options, "loaded options");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OnDelete;

    #[test]
    fn missing_keys_keep_defaults() {
        let options = parse_options(r#"{ "table_name_prefix": "app_" }"#).unwrap();

        assert_eq!(options.table_name_prefix.as_deref(), Some("app_"));
        assert_eq!(options.auto_primary_key.as_deref(), Some("id"));
        assert!(options.synthesize_inverses);
        assert_eq!(options.default_on_delete, None);
    }

    #[test]
    fn on_delete_uses_snake_case() {
        let options = parse_options(r#"{ "default_on_delete": "set_null" }"#).unwrap();
        assert_eq!(options.default_on_delete, Some(OnDelete::SetNull));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_options(r#"{ "table_prefix": "app_" }"#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_options("does/not/exist.json").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("failed to read options from does/not/exist.json"),
            "{err}"
        );
    }
}
