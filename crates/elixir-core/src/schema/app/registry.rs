use super::{Entity, EntityBuilder, EntityId, Field, Relation, RelationId};
use crate::{Error, Result};
use indexmap::IndexMap;

/// Collects entities and their relation statements until setup runs.
///
/// Registration never resolves anything: targets are kept by name, so a
/// relation may reference an entity that is declared later.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entities: IndexMap<String, Entity>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Declares a new entity and returns a builder for its fields and
    /// relations.
    pub fn entity(&mut self, name: &str) -> Result<EntityBuilder<'_>> {
        let id = self.declare_entity(name)?;
        Ok(EntityBuilder { registry: self, id })
    }

    pub fn declare_entity(&mut self, name: &str) -> Result<EntityId> {
        if name.trim().is_empty() {
            return Err(Error::invalid_schema("entity name cannot be empty"));
        }

        if self.entities.contains_key(name) {
            return Err(Error::duplicate_entity(name));
        }

        let id = EntityId(self.entities.len());
        self.entities.insert(name.to_string(), Entity::new(id, name));
        Ok(id)
    }

    /// Appends a relation statement to an entity.
    pub fn register(&mut self, entity: EntityId, mut relation: Relation) -> Result<RelationId> {
        let owner = self.get_mut(entity);

        if owner.has_attribute(&relation.name) {
            return Err(Error::duplicate_field(&owner.name, &relation.name));
        }

        relation.id = entity.relation(owner.relations.len());
        let id = relation.id;
        owner.relations.push(relation);
        Ok(id)
    }

    /// Appends a scalar field to an entity, returning its index.
    pub fn add_field(&mut self, entity: EntityId, field: Field) -> Result<usize> {
        let owner = self.get_mut(entity);

        if owner.has_attribute(&field.name) {
            return Err(Error::duplicate_field(&owner.name, &field.name));
        }

        owner.fields.push(field);
        Ok(owner.fields.len() - 1)
    }

    /// Inserts a relation produced by resolution. The caller guarantees the
    /// name is free.
    pub(crate) fn insert_synthesized(
        &mut self,
        entity: EntityId,
        mut relation: Relation,
    ) -> RelationId {
        let owner = self.get_mut(entity);
        debug_assert!(!owner.has_attribute(&relation.name));

        relation.id = entity.relation(owner.relations.len());
        let id = relation.id;
        owner.relations.push(relation);
        id
    }

    pub fn all_entities(&self) -> impl ExactSizeIterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get an entity by ID
    pub fn get(&self, id: EntityId) -> &Entity {
        self.entities
            .get_index(id.0)
            .map(|(_, entity)| entity)
            .expect("invalid entity ID")
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        self.entities
            .get_index_mut(id.0)
            .map(|(_, entity)| entity)
            .expect("invalid entity ID")
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Get a relation by ID
    pub fn relation(&self, id: RelationId) -> &Relation {
        self.get(id.entity).relation(id)
    }

    /// All relations, grouped by entity in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.all_entities().flat_map(|entity| entity.relations.iter())
    }

    /// The entity a relation targets, if it has been declared.
    pub fn target_of(&self, id: RelationId) -> Option<EntityId> {
        self.entities
            .get_index_of(&self.relation(id).target)
            .map(EntityId)
    }

    /// Fully qualified name of a relation: `Entity::relation`.
    pub fn full_name(&self, id: RelationId) -> String {
        let entity = self.get(id.entity);
        format!("{}::{}", entity.name, entity.relation(id).name)
    }

    /// Ensures every relation targets a declared entity.
    ///
    /// Reports the first dangling reference in declaration order.
    pub fn check_references(&self) -> Result<()> {
        for relation in self.relations() {
            if !self.entities.contains_key(&relation.target) {
                return Err(Error::unknown_entity(
                    &self.get(relation.id.entity).name,
                    &relation.name,
                    &relation.target,
                ));
            }
        }

        Ok(())
    }
}
