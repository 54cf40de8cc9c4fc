use crate::{Elixir, OnDelete, Options, Result, Setup};

use std::path::Path;

#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
}

impl Builder {
    /// Set the table name prefix for all derived table names
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.options.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Set the column of the primary key added to entities that declare none
    pub fn auto_primary_key(&mut self, column: &str) -> &mut Self {
        self.options.auto_primary_key = Some(column.to_string());
        self
    }

    /// Entities must declare their own primary key.
    pub fn no_auto_primary_key(&mut self) -> &mut Self {
        self.options.auto_primary_key = None;
        self
    }

    /// Whether relations without a declared inverse get one synthesized.
    pub fn synthesize_inverses(&mut self, enabled: bool) -> &mut Self {
        self.options.synthesize_inverses = enabled;
        self
    }

    pub fn default_on_delete(&mut self, policy: OnDelete) -> &mut Self {
        self.options.default_on_delete = Some(policy);
        self
    }

    /// Replaces every option at once.
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    /// Replaces every option with those parsed from a JSON document. Keys
    /// missing from the document keep their default value.
    pub fn options_from_json(&mut self, json: &str) -> Result<&mut Self> {
        self.options = crate::parse_options(json)?;
        Ok(self)
    }

    pub fn options_from_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.options = crate::load_options(path)?;
        Ok(self)
    }

    pub fn build(&self) -> Elixir {
        Elixir::from(Setup::new(self.options.clone()))
    }
}
