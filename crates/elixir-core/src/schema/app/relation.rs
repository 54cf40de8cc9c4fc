use super::EntityId;
use std::fmt;

/// One declared side of an association between two entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Uniquely identifies the relation within the registry
    pub id: RelationId,

    /// Attribute name on the owning entity
    pub name: String,

    pub kind: RelationKind,

    /// Name of the target entity. It may be declared after this relation.
    pub target: String,

    /// Name of the relation on the target that is the inverse of this one
    pub inverse: Option<String>,

    /// Association table backing a many-to-many relation
    pub association: Option<String>,

    /// Explicit foreign key column names. When empty, the columns are derived
    /// from the referenced primary key.
    pub foreign_key: Vec<String>,

    /// Filter expression, passed through to the mapping library
    pub filter: Option<String>,

    /// Ordering of collection values, e.g. `name` or `-created`
    pub order_by: Vec<String>,

    /// True if the foreign key may not be null
    pub required: bool,

    /// True if no inverse should be synthesized for this relation
    pub one_way: bool,

    /// What happens to related rows when a row is deleted
    pub on_delete: Option<OnDelete>,

    pub origin: Origin,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationId {
    pub entity: EntityId,
    pub index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RelationKind {
    /// To-one relation whose entity holds the foreign key
    BelongsTo,

    /// To-one relation whose target holds the foreign key
    HasOne,

    /// To-many relation whose target holds the foreign key
    HasMany,

    /// To-many relation backed by an association table
    ManyToMany,
}

/// Whether a relation was declared or synthesized during resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    Declared,
    Synthesized,
}

/// Policy applied to related rows, or association rows, when a row is
/// deleted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OnDelete {
    Cascade,
    Restrict,
    SetNull,
}

/// Configures a relation while it is being declared.
#[derive(Debug)]
pub struct RelationBuilder<'a> {
    pub(super) relation: &'a mut Relation,
}

impl Relation {
    /// Creates a declared relation with default options. The id is assigned
    /// when the relation is registered.
    pub fn new(name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Relation {
        Relation {
            id: RelationId::placeholder(),
            name: name.into(),
            kind,
            target: target.into(),
            inverse: None,
            association: None,
            foreign_key: vec![],
            filter: None,
            order_by: vec![],
            required: false,
            one_way: false,
            on_delete: None,
            origin: Origin::Declared,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == Origin::Synthesized
    }
}

impl RelationId {
    pub(crate) const fn placeholder() -> RelationId {
        RelationId {
            entity: EntityId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl fmt::Debug for RelationId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RelationId({}/{})", self.entity.0, self.index)
    }
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::ManyToMany => "has_and_belongs_to_many",
        }
    }

    pub fn is_to_one(self) -> bool {
        matches!(self, RelationKind::BelongsTo | RelationKind::HasOne)
    }

    /// True if the relation evaluates to a collection of targets.
    pub fn is_collection(self) -> bool {
        matches!(self, RelationKind::HasMany | RelationKind::ManyToMany)
    }

    pub fn owns_foreign_key(self) -> bool {
        matches!(self, RelationKind::BelongsTo)
    }

    /// Returns `true` if a relation of this kind can be the inverse of a
    /// relation of `other` kind.
    pub fn pairs_with(self, other: RelationKind) -> bool {
        use RelationKind::*;

        matches!(
            (self, other),
            (BelongsTo, HasOne | HasMany) | (HasOne | HasMany, BelongsTo) | (ManyToMany, ManyToMany)
        )
    }

    /// Kind of the inverse synthesized for a relation of this kind.
    ///
    /// The foreign key owner gets a collection on the other side; collections
    /// default to `HasMany` rather than `HasOne`.
    pub fn inverse(self) -> RelationKind {
        match self {
            RelationKind::BelongsTo => RelationKind::HasMany,
            RelationKind::HasOne | RelationKind::HasMany => RelationKind::BelongsTo,
            RelationKind::ManyToMany => RelationKind::ManyToMany,
        }
    }
}

impl OnDelete {
    pub fn as_str(self) -> &'static str {
        match self {
            OnDelete::Cascade => "cascade",
            OnDelete::Restrict => "restrict",
            OnDelete::SetNull => "set_null",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RelationBuilder<'_> {
    pub fn id(&self) -> RelationId {
        self.relation.id
    }

    /// Names the relation on the target entity that is the inverse of this
    /// one.
    pub fn inverse(self, name: &str) -> Self {
        self.relation.inverse = Some(name.to_string());
        self
    }

    /// Names the association table of a many-to-many relation.
    pub fn table(self, name: &str) -> Self {
        self.relation.association = Some(name.to_string());
        self
    }

    pub fn foreign_key<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation.foreign_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(self, expr: &str) -> Self {
        self.relation.filter = Some(expr.to_string());
        self
    }

    /// Appends an ordering expression. A leading `-` sorts descending.
    pub fn order_by(self, expr: &str) -> Self {
        self.relation.order_by.push(expr.to_string());
        self
    }

    pub fn required(self) -> Self {
        self.relation.required = true;
        self
    }

    /// Keeps the relation unidirectional: no inverse is synthesized on the
    /// target.
    pub fn one_way(self) -> Self {
        self.relation.one_way = true;
        self
    }

    pub fn on_delete(self, policy: OnDelete) -> Self {
        self.relation.on_delete = Some(policy);
        self
    }
}
