use super::app::{EntityId, Origin, Registry, Relation, RelationId, RelationKind};
use super::Name;
use super::verify;
use crate::{Error, Options, Result};

use std::collections::HashSet;

/// Two relation statements describing one association, or a single statement
/// when the association is unidirectional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    /// The declared side. When both sides are declared, the one declared
    /// first.
    pub side_a: RelationId,

    pub side_b: Option<RelationId>,

    /// What backs the association in the database
    pub association: AssociationKey,

    pub provenance: Provenance,
}

/// Identity of the storage shared by both sides of an association.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AssociationKey {
    /// Foreign key columns on `table` referencing the other entity's primary
    /// key
    ForeignKey { table: String, columns: Vec<String> },

    /// Association table of a many-to-many relation
    Table { name: String },
}

/// How the two sides of a pair were matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Provenance {
    /// Both sides declared and linked by an inverse name
    Explicit,

    /// Both sides declared and matched without inverse names
    Inferred,

    /// One side declared, the other synthesized
    Synthesized,

    /// A single declared side with no inverse
    Unidirectional,
}

/// Pairs every relation in the registry with its inverse.
///
/// Inverses that were never declared are synthesized and inserted into the
/// registry. Running resolution again over the same registry reproduces the
/// same pairs: synthesized relations name their source as inverse, so they
/// are matched explicitly the second time around.
pub fn resolve(registry: &mut Registry, options: &Options) -> Result<Vec<ResolvedPair>> {
    registry.check_references()?;

    let mut resolve = Resolve {
        registry,
        options,
        paired: HashSet::new(),
        pairs: vec![],
    };

    resolve.link_explicit()?;
    resolve.link_inferred()?;
    resolve.synthesize_inverses()?;
    resolve.into_pairs()
}

impl ResolvedPair {
    pub fn sides(&self) -> impl Iterator<Item = RelationId> {
        std::iter::once(self.side_a).chain(self.side_b)
    }

    pub fn contains(&self, id: RelationId) -> bool {
        self.sides().any(|side| side == id)
    }

    /// The side paired with `id`, if any.
    pub fn other(&self, id: RelationId) -> Option<RelationId> {
        if self.side_a == id {
            self.side_b
        } else if self.side_b == Some(id) {
            Some(self.side_a)
        } else {
            None
        }
    }
}

impl AssociationKey {
    pub fn table_name(&self) -> &str {
        match self {
            AssociationKey::ForeignKey { table, .. } => table,
            AssociationKey::Table { name } => name,
        }
    }
}

struct Resolve<'a> {
    registry: &'a mut Registry,
    options: &'a Options,

    /// Relations that already belong to a pair
    paired: HashSet<RelationId>,

    pairs: Vec<Pairing>,
}

/// A pair before its association identity is derived.
#[derive(Debug)]
pub(super) struct Pairing {
    pub(super) side_a: RelationId,
    pub(super) side_b: Option<RelationId>,
    pub(super) provenance: Provenance,
}

impl Resolve<'_> {
    fn declared(&self) -> Vec<RelationId> {
        self.registry.relations().map(|relation| relation.id).collect()
    }

    fn target(&self, id: RelationId) -> Result<EntityId> {
        self.registry.target_of(id).ok_or_else(|| {
            let relation = self.registry.relation(id);
            Error::unknown_entity(
                &self.registry.get(id.entity).name,
                &relation.name,
                &relation.target,
            )
        })
    }

    /// Pair relations that name their inverse.
    fn link_explicit(&mut self) -> Result<()> {
        for id in self.declared() {
            if self.paired.contains(&id) {
                continue;
            }

            let relation = self.registry.relation(id);
            let Some(inverse) = relation.inverse.clone() else {
                continue;
            };

            let target = self.target(id)?;
            let target_entity = self.registry.get(target);

            let Some(candidate) = target_entity.relation_by_name(&inverse) else {
                return Err(Error::missing_inverse(
                    self.registry.full_name(id),
                    &target_entity.name,
                    inverse,
                ));
            };

            if candidate.id == id {
                return Err(Error::invalid_inverse(
                    self.registry.full_name(id),
                    &target_entity.name,
                    inverse,
                    "but a relation cannot be its own inverse",
                ));
            }

            if self.registry.target_of(candidate.id) != Some(id.entity) {
                return Err(Error::invalid_inverse(
                    self.registry.full_name(id),
                    &target_entity.name,
                    inverse,
                    format!(
                        "but `{}` targets `{}`",
                        self.registry.full_name(candidate.id),
                        candidate.target
                    ),
                ));
            }

            if let Some(back) = &candidate.inverse {
                if *back != relation.name {
                    return Err(Error::conflicting_association(
                        self.registry.full_name(id),
                        format!("inverse {inverse}"),
                        self.registry.full_name(candidate.id),
                        format!("inverse {back}"),
                    ));
                }
            }

            let candidate = candidate.id;

            if self.paired.contains(&candidate) {
                let claimed_by = self
                    .pairs
                    .iter()
                    .find_map(|pair| pair_partner(pair, candidate))
                    .expect("paired relation has a partner");

                return Err(Error::conflicting_association(
                    self.registry.full_name(id),
                    format!("inverse {inverse}"),
                    self.registry.full_name(claimed_by),
                    format!("inverse {inverse}"),
                ));
            }

            self.pair(id, Some(candidate), Provenance::Explicit);
        }

        Ok(())
    }

    /// Pair relations without inverse names when exactly one candidate exists
    /// on each side.
    fn link_inferred(&mut self) -> Result<()> {
        for id in self.declared() {
            if self.paired.contains(&id) || self.registry.relation(id).inverse.is_some() {
                continue;
            }

            let candidates = self.candidates(id)?;

            match candidates[..] {
                [] => {}
                [candidate] => {
                    // The match must be unique from the other side as well,
                    // otherwise the outcome would depend on declaration order.
                    let reverse = self.candidates(candidate)?;

                    if reverse != [id] {
                        return Err(Error::ambiguous_relation(
                            self.registry.full_name(candidate),
                            self.full_names(&reverse),
                        ));
                    }

                    self.pair(id, Some(candidate), Provenance::Inferred);
                }
                _ => {
                    return Err(Error::ambiguous_relation(
                        self.registry.full_name(id),
                        self.full_names(&candidates),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Relations on the target of `id` that could be its inverse.
    fn candidates(&self, id: RelationId) -> Result<Vec<RelationId>> {
        let relation = self.registry.relation(id);
        let target = self.target(id)?;

        Ok(self
            .registry
            .get(target)
            .relations
            .iter()
            .filter(|candidate| {
                candidate.id != id
                    && candidate.inverse.is_none()
                    && !self.paired.contains(&candidate.id)
                    && relation.kind.pairs_with(candidate.kind)
                    && self.registry.target_of(candidate.id) == Some(id.entity)
            })
            .map(|candidate| candidate.id)
            .collect())
    }

    /// Create the missing inverse of every relation still unpaired.
    fn synthesize_inverses(&mut self) -> Result<()> {
        for id in self.declared() {
            if self.paired.contains(&id) {
                continue;
            }

            let target = self.target(id)?;
            let relation = self.registry.relation(id);

            if relation.one_way || !self.options.synthesize_inverses {
                self.pair(id, None, Provenance::Unidirectional);
                continue;
            }

            let kind = relation.kind.inverse();
            let name = self.synthesized_name(id, target, kind);

            let mut inverse = Relation::new(name, kind, &self.registry.get(id.entity).name);
            inverse.inverse = Some(relation.name.clone());
            inverse.association = relation.association.clone();
            inverse.foreign_key = relation.foreign_key.clone();
            inverse.origin = Origin::Synthesized;

            let inverse = self.registry.insert_synthesized(target, inverse);

            tracing::debug!(
                relation = %self.registry.full_name(id),
                inverse = %self.registry.full_name(inverse),
                kind = %kind,
                "synthesized inverse relation"
            );

            self.pair(id, Some(inverse), Provenance::Synthesized);
        }

        Ok(())
    }

    /// Name for a relation synthesized on `target` as the inverse of `id`.
    ///
    /// Derived from the owning entity's name, pluralized for collections. On
    /// a clash the source relation name is appended, then a counter.
    fn synthesized_name(&self, id: RelationId, target: EntityId, kind: RelationKind) -> String {
        let owner = Name::new(&self.registry.get(id.entity).name);
        let target = self.registry.get(target);

        let base = if kind.is_collection() {
            owner.plural_snake_case()
        } else {
            owner.snake_case()
        };

        if !target.has_attribute(&base) {
            return base;
        }

        let qualified = format!("{base}_{}", self.registry.relation(id).name);
        let mut name = qualified.clone();
        let mut n = 2;

        while target.has_attribute(&name) {
            name = format!("{qualified}_{n}");
            n += 1;
        }

        name
    }

    fn pair(&mut self, a: RelationId, b: Option<RelationId>, provenance: Provenance) {
        let (side_a, side_b, provenance) = match b {
            Some(b) => {
                let a_synthesized = self.registry.relation(a).is_synthesized();
                let b_synthesized = self.registry.relation(b).is_synthesized();

                let provenance = if a_synthesized || b_synthesized {
                    Provenance::Synthesized
                } else {
                    provenance
                };

                // The declared side comes first, otherwise declaration order.
                if a_synthesized || (!b_synthesized && b < a) {
                    (b, Some(a), provenance)
                } else {
                    (a, Some(b), provenance)
                }
            }
            None => (a, None, provenance),
        };

        tracing::debug!(
            side_a = %self.registry.full_name(side_a),
            side_b = ?side_b.map(|id| self.registry.full_name(id)),
            provenance = ?provenance,
            "paired relation"
        );

        self.paired.insert(side_a);
        self.paired.extend(side_b);
        self.pairs.push(Pairing {
            side_a,
            side_b,
            provenance,
        });
    }

    fn full_names(&self, ids: &[RelationId]) -> Vec<String> {
        ids.iter().map(|id| self.registry.full_name(*id)).collect()
    }

    /// Validate each pair, then derive its association identity.
    fn into_pairs(mut self) -> Result<Vec<ResolvedPair>> {
        debug_assert_eq!(self.paired.len(), self.registry.relations().count());

        self.pairs.sort_by_key(|pair| pair.side_a);

        let mut pairs = Vec::with_capacity(self.pairs.len());

        for pairing in &self.pairs {
            verify::verify_pair(self.registry, pairing)?;

            pairs.push(ResolvedPair {
                side_a: pairing.side_a,
                side_b: pairing.side_b,
                association: self.association(pairing)?,
                provenance: pairing.provenance,
            });
        }

        verify::verify_associations_are_unique(self.registry, self.options, &pairs)?;

        Ok(pairs)
    }

    fn association(&self, pairing: &Pairing) -> Result<AssociationKey> {
        let side_a = self.registry.relation(pairing.side_a);
        let side_b = pairing.side_b.map(|id| self.registry.relation(id));

        if side_a.kind == RelationKind::ManyToMany {
            return self.association_table(side_a, side_b);
        }

        let explicit = explicit_foreign_key(side_a, side_b);

        match [Some(side_a), side_b]
            .into_iter()
            .flatten()
            .find(|relation| relation.kind.owns_foreign_key())
        {
            // The owning side's table holds columns referencing its target.
            Some(owner) => {
                let referenced = self.registry.get(self.target(owner.id)?);
                let options = self.options;
                let primary_key = referenced.primary_key(options)?;

                let columns = match explicit {
                    Some(columns) => {
                        check_arity(self.registry, owner, columns, &primary_key)?;
                        columns.to_vec()
                    }
                    None => primary_key
                        .iter()
                        .map(|key| format!("{}_{key}", owner.name))
                        .collect(),
                };

                Ok(AssociationKey::ForeignKey {
                    table: self.registry.get(owner.id.entity).table_name(options),
                    columns,
                })
            }
            // A one-way collection or has-one: the target table references the
            // declaring entity.
            None => {
                let declaring = self.registry.get(side_a.id.entity);
                let primary_key = declaring.primary_key(self.options)?;

                let columns = match explicit {
                    Some(columns) => {
                        check_arity(self.registry, side_a, columns, &primary_key)?;
                        columns.to_vec()
                    }
                    None => primary_key
                        .iter()
                        .map(|key| format!("{}_{key}", declaring.snake_name()))
                        .collect(),
                };

                Ok(AssociationKey::ForeignKey {
                    table: self
                        .registry
                        .get(self.target(side_a.id)?)
                        .table_name(self.options),
                    columns,
                })
            }
        }
    }

    fn association_table(
        &self,
        side_a: &Relation,
        side_b: Option<&Relation>,
    ) -> Result<AssociationKey> {
        if let Some(name) = side_a
            .association
            .as_ref()
            .or_else(|| side_b.and_then(|side_b| side_b.association.as_ref()))
        {
            return Ok(AssociationKey::Table { name: name.clone() });
        }

        // The first side's relation name keeps two associations between the
        // same entities apart; the second side's key keeps one-way relations
        // nameable.
        let source = self.registry.get(side_a.id.entity);
        let target = self.registry.get(self.target(side_a.id)?);

        Ok(AssociationKey::Table {
            name: format!(
                "{}_{}__{}_{}",
                source.table_name(self.options),
                side_a.name,
                target.table_name(self.options),
                target.primary_key(self.options)?.join("_"),
            ),
        })
    }
}

fn pair_partner(pair: &Pairing, id: RelationId) -> Option<RelationId> {
    if pair.side_a == id {
        pair.side_b
    } else if pair.side_b == Some(id) {
        Some(pair.side_a)
    } else {
        None
    }
}

fn explicit_foreign_key<'a>(
    side_a: &'a Relation,
    side_b: Option<&'a Relation>,
) -> Option<&'a [String]> {
    [Some(side_a), side_b]
        .into_iter()
        .flatten()
        .map(|relation| &relation.foreign_key[..])
        .find(|columns| !columns.is_empty())
}

fn check_arity(
    registry: &Registry,
    relation: &Relation,
    columns: &[String],
    primary_key: &[String],
) -> Result<()> {
    if columns.len() == primary_key.len() {
        return Ok(());
    }

    Err(Error::invalid_schema(format!(
        "`{}` declares {} foreign key column(s) but the referenced primary key has {} ({})",
        registry.full_name(relation.id),
        columns.len(),
        primary_key.len(),
        primary_key.join(", "),
    )))
}
