use super::{
    Field, FieldBuilder, Name, Registry, Relation, RelationBuilder, RelationId, RelationKind,
};
use crate::{Error, Options, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Uniquely identifies the entity within the registry
    pub id: EntityId,

    /// Name of the entity, as declared
    pub name: String,

    /// If the entity specifies a table to map to, this is set.
    pub table_name: Option<String>,

    /// Scalar fields in declaration order
    pub fields: Vec<Field>,

    /// Relation statements in declaration order, followed by any synthesized
    /// inverses
    pub relations: Vec<Relation>,
}

#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub usize);

/// Declares fields and relations on one entity.
///
/// Returned by [`Registry::entity`]. Every declaration is checked for name
/// clashes with the entity's existing fields and relations.
#[derive(Debug)]
pub struct EntityBuilder<'a> {
    pub(super) registry: &'a mut Registry,
    pub(super) id: EntityId,
}

impl Entity {
    pub(super) fn new(id: EntityId, name: &str) -> Entity {
        Entity {
            id,
            name: name.to_string(),
            table_name: None,
            fields: vec![],
            relations: vec![],
        }
    }

    pub fn relation(&self, id: impl Into<RelationId>) -> &Relation {
        let id = id.into();
        assert_eq!(self.id, id.entity);
        &self.relations[id.index]
    }

    pub fn relation_by_name(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if a field or relation already uses `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.field_by_name(name).is_some() || self.relation_by_name(name).is_some()
    }

    pub fn snake_name(&self) -> String {
        Name::new(&self.name).snake_case()
    }

    /// The table the entity maps to.
    pub fn table_name(&self, options: &Options) -> String {
        match &self.table_name {
            Some(table_name) => table_name.clone(),
            None => format!(
                "{}{}",
                options.table_name_prefix.as_deref().unwrap_or(""),
                self.snake_name()
            ),
        }
    }

    /// Returns `true` if the entity relies on the auto primary key column.
    pub fn uses_auto_primary_key(&self, options: &Options) -> bool {
        options.auto_primary_key.is_some() && !self.fields.iter().any(|field| field.primary_key)
    }

    /// Primary key column names, in declaration order.
    pub fn primary_key(&self, options: &Options) -> Result<Vec<String>> {
        let columns: Vec<_> = self
            .fields
            .iter()
            .filter(|field| field.primary_key)
            .map(|field| field.column_name().to_string())
            .collect();

        if !columns.is_empty() {
            return Ok(columns);
        }

        match &options.auto_primary_key {
            Some(column) => Ok(vec![column.clone()]),
            None => Err(Error::invalid_schema(format!(
                "entity `{}` has no primary key and no auto primary key is configured",
                self.name
            ))),
        }
    }
}

impl EntityId {
    pub const fn placeholder() -> EntityId {
        EntityId(usize::MAX)
    }

    pub const fn relation(self, index: usize) -> RelationId {
        RelationId {
            entity: self,
            index,
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EntityId({})", self.0)
    }
}

impl EntityBuilder<'_> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Maps the entity to an explicit table name.
    pub fn table(&mut self, name: &str) -> &mut Self {
        self.registry.get_mut(self.id).table_name = Some(name.to_string());
        self
    }

    pub fn field(&mut self, name: &str) -> Result<FieldBuilder<'_>> {
        let index = self.registry.add_field(self.id, Field::new(name))?;
        Ok(FieldBuilder {
            field: &mut self.registry.get_mut(self.id).fields[index],
        })
    }

    pub fn belongs_to(&mut self, name: &str, target: &str) -> Result<RelationBuilder<'_>> {
        self.relation(name, RelationKind::BelongsTo, target)
    }

    pub fn has_one(&mut self, name: &str, target: &str) -> Result<RelationBuilder<'_>> {
        self.relation(name, RelationKind::HasOne, target)
    }

    pub fn has_many(&mut self, name: &str, target: &str) -> Result<RelationBuilder<'_>> {
        self.relation(name, RelationKind::HasMany, target)
    }

    pub fn has_and_belongs_to_many(
        &mut self,
        name: &str,
        target: &str,
    ) -> Result<RelationBuilder<'_>> {
        self.relation(name, RelationKind::ManyToMany, target)
    }

    fn relation(
        &mut self,
        name: &str,
        kind: RelationKind,
        target: &str,
    ) -> Result<RelationBuilder<'_>> {
        let id = self
            .registry
            .register(self.id, Relation::new(name, kind, target))?;

        Ok(RelationBuilder {
            relation: &mut self.registry.get_mut(self.id).relations[id.index],
        })
    }
}
