/// A scalar attribute of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The attribute name
    pub name: String,

    /// Column name, when it differs from the attribute name
    pub column: Option<String>,

    /// True if the field is part of the primary key
    pub primary_key: bool,
}

/// Configures a field while it is being declared.
#[derive(Debug)]
pub struct FieldBuilder<'a> {
    pub(super) field: &'a mut Field,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            column: None,
            primary_key: false,
        }
    }

    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

impl FieldBuilder<'_> {
    /// Marks the field as part of the entity's primary key.
    pub fn primary_key(self) -> Self {
        self.field.primary_key = true;
        self
    }

    /// Stores the field in a column with a different name.
    pub fn column(self, name: &str) -> Self {
        self.field.column = Some(name.to_string());
        self
    }
}
