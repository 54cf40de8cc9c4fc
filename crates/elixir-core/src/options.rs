use crate::schema::app::OnDelete;

/// Naming conventions and defaults applied while resolving relations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Options {
    /// Prefix for every table name derived from an entity name. Explicit
    /// table names are used as-is.
    pub table_name_prefix: Option<String>,

    /// Column name of the primary key added to entities that declare none.
    /// When `None`, such entities cannot be the target of a relation.
    pub auto_primary_key: Option<String>,

    /// Whether a relation without a matching inverse gets one synthesized on
    /// its target entity.
    pub synthesize_inverses: bool,

    /// Delete policy for relations that do not declare one. When `None`, the
    /// decision is left to the mapping library.
    pub default_on_delete: Option<OnDelete>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            table_name_prefix: None,
            auto_primary_key: Some("id".to_string()),
            synthesize_inverses: true,
            default_on_delete: None,
        }
    }
}
