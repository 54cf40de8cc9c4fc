use elixir_core::schema::app::*;
use elixir_core::schema::{resolve, AssociationKey, Provenance, ResolvedPair};
use elixir_core::{Options, Result};

use pretty_assertions::assert_eq;

/// A pair as `(side_a, side_b, provenance)` using qualified relation names.
type Described = (String, Option<String>, Provenance);

fn describe(registry: &Registry, pairs: &[ResolvedPair]) -> Vec<Described> {
    pairs
        .iter()
        .map(|pair| {
            (
                registry.full_name(pair.side_a),
                pair.side_b.map(|id| registry.full_name(id)),
                pair.provenance,
            )
        })
        .collect()
}

fn pair(a: &str, b: Option<&str>, provenance: Provenance) -> Described {
    (a.to_string(), b.map(str::to_string), provenance)
}

fn resolve_with(
    options: &Options,
    declare: impl FnOnce(&mut Registry) -> Result<()>,
) -> (Registry, Vec<ResolvedPair>) {
    let mut registry = Registry::new();
    declare(&mut registry).unwrap();
    let pairs = resolve(&mut registry, options).unwrap();
    (registry, pairs)
}

fn resolve_all(declare: impl FnOnce(&mut Registry) -> Result<()>) -> (Registry, Vec<ResolvedPair>) {
    resolve_with(&Options::default(), declare)
}

#[test]
fn explicit_inverse_on_both_sides() {
    let (registry, pairs) = resolve_all(|registry| {
        registry
            .entity("User")?
            .has_many("posts", "Post")?
            .inverse("author");
        registry
            .entity("Post")?
            .belongs_to("author", "User")?
            .inverse("posts");
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("User::posts", Some("Post::author"), Provenance::Explicit)]
    );
    assert_eq!(
        pairs[0].association,
        AssociationKey::ForeignKey {
            table: "post".to_string(),
            columns: vec!["author_id".to_string()],
        }
    );
}

#[test]
fn explicit_inverse_on_one_side() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("User")?.has_many("posts", "Post")?;
        registry
            .entity("Post")?
            .belongs_to("author", "User")?
            .inverse("posts");
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("User::posts", Some("Post::author"), Provenance::Explicit)]
    );
}

#[test]
fn inferred_inverse() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("User")?.has_many("posts", "Post")?;
        registry.entity("Post")?.belongs_to("author", "User")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("User::posts", Some("Post::author"), Provenance::Inferred)]
    );
}

#[test]
fn inferred_pairing_ignores_declaration_order() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("Post")?.belongs_to("author", "User")?;
        registry.entity("User")?.has_many("posts", "Post")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("Post::author", Some("User::posts"), Provenance::Inferred)]
    );
}

#[test]
fn has_one_pairs_with_belongs_to() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("User")?.has_one("profile", "Profile")?;
        registry.entity("Profile")?.belongs_to("user", "User")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("User::profile", Some("Profile::user"), Provenance::Inferred)]
    );
}

#[test]
fn has_many_synthesizes_belongs_to() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("Director")?.has_many("movies", "Movie")?;
        registry.entity("Movie")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair(
            "Director::movies",
            Some("Movie::director"),
            Provenance::Synthesized
        )]
    );

    let synthesized = registry.relation(pairs[0].side_b.unwrap());
    assert_eq!(synthesized.kind, RelationKind::BelongsTo);
    assert_eq!(synthesized.target, "Director");
    assert_eq!(synthesized.inverse.as_deref(), Some("movies"));
    assert!(synthesized.is_synthesized());

    assert_eq!(
        pairs[0].association,
        AssociationKey::ForeignKey {
            table: "movie".to_string(),
            columns: vec!["director_id".to_string()],
        }
    );
}

#[test]
fn belongs_to_synthesizes_plural_has_many() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("Person")?;
        registry.entity("Address")?.belongs_to("resident", "Person")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair(
            "Address::resident",
            Some("Person::addresses"),
            Provenance::Synthesized
        )]
    );
    assert_eq!(
        registry.relation(pairs[0].side_b.unwrap()).kind,
        RelationKind::HasMany
    );
}

#[test]
fn many_to_many_synthesizes_many_to_many() {
    let (registry, pairs) = resolve_all(|registry| {
        registry
            .entity("Movie")?
            .has_and_belongs_to_many("actors", "Actor")?
            .table("movie_casting");
        registry.entity("Actor")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("Movie::actors", Some("Actor::movies"), Provenance::Synthesized)]
    );

    let synthesized = registry.relation(pairs[0].side_b.unwrap());
    assert_eq!(synthesized.kind, RelationKind::ManyToMany);
    assert_eq!(synthesized.association.as_deref(), Some("movie_casting"));
    assert_eq!(
        pairs[0].association,
        AssociationKey::Table {
            name: "movie_casting".to_string()
        }
    );
}

#[test]
fn synthesized_name_clashes_with_field() {
    let (registry, pairs) = resolve_all(|registry| {
        let mut user = registry.entity("User")?;
        user.field("posts")?;
        user.field("posts_author")?;
        registry.entity("Post")?.belongs_to("author", "User")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair(
            "Post::author",
            Some("User::posts_author_2"),
            Provenance::Synthesized
        )]
    );
}

#[test]
fn synthesized_names_do_not_clash_with_each_other() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("User")?;
        let mut post = registry.entity("Post")?;
        post.belongs_to("author", "User")?;
        post.belongs_to("editor", "User")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [
            pair("Post::author", Some("User::posts"), Provenance::Synthesized),
            pair(
                "Post::editor",
                Some("User::posts_editor"),
                Provenance::Synthesized
            ),
        ]
    );
    assert_eq!(
        pairs[1].association,
        AssociationKey::ForeignKey {
            table: "post".to_string(),
            columns: vec!["editor_id".to_string()],
        }
    );
}

#[test]
fn self_referential_pair_is_inferred() {
    let (registry, pairs) = resolve_all(|registry| {
        let mut person = registry.entity("Person")?;
        person.belongs_to("manager", "Person")?;
        person.has_many("reports", "Person")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair(
            "Person::manager",
            Some("Person::reports"),
            Provenance::Inferred
        )]
    );
}

#[test]
fn self_referential_relation_synthesizes_inverse() {
    let mut registry = Registry::new();
    registry
        .entity("Person")
        .unwrap()
        .belongs_to("parent", "Person")
        .unwrap();

    let options = Options::default();
    let first = resolve(&mut registry, &options).unwrap();

    assert_eq!(
        describe(&registry, &first),
        [pair("Person::parent", Some("Person::people"), Provenance::Synthesized)]
    );

    let person = registry.entity_by_name("Person").unwrap();
    let people = person.relation_by_name("people").unwrap();
    assert_eq!(people.kind, RelationKind::HasMany);
    assert_eq!(people.target, "Person");
    assert_eq!(people.inverse.as_deref(), Some("parent"));
    assert_eq!(
        first[0].association,
        AssociationKey::ForeignKey {
            table: "person".to_string(),
            columns: vec!["parent_id".to_string()],
        }
    );

    // A second run pairs the synthesized inverse explicitly.
    let second = resolve(&mut registry, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.entity_by_name("Person").unwrap().relations.len(), 2);
}

#[test]
fn relation_cannot_be_its_own_inverse() {
    let mut registry = Registry::new();
    registry
        .entity("Person")
        .unwrap()
        .belongs_to("parent", "Person")
        .unwrap()
        .inverse("parent");

    let err = resolve(&mut registry, &Options::default()).unwrap_err();
    assert!(err.is_missing_inverse());
}

#[test]
fn one_way_relation_is_unidirectional() {
    let (registry, pairs) = resolve_all(|registry| {
        registry.entity("User")?.has_many("logs", "Log")?.one_way();
        registry.entity("Log")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("User::logs", None, Provenance::Unidirectional)]
    );
    assert!(registry.entity_by_name("Log").unwrap().relations.is_empty());
    assert_eq!(
        pairs[0].association,
        AssociationKey::ForeignKey {
            table: "log".to_string(),
            columns: vec!["user_id".to_string()],
        }
    );
}

#[test]
fn synthesis_can_be_disabled() {
    let options = Options {
        synthesize_inverses: false,
        ..Options::default()
    };

    let (registry, pairs) = resolve_with(&options, |registry| {
        registry.entity("Director")?.has_many("movies", "Movie")?;
        registry.entity("Movie")?;
        Ok(())
    });

    assert_eq!(
        describe(&registry, &pairs),
        [pair("Director::movies", None, Provenance::Unidirectional)]
    );
}

#[test]
fn every_relation_is_in_exactly_one_pair() {
    let (registry, pairs) = resolve_all(|registry| {
        let mut movie = registry.entity("Movie")?;
        movie.belongs_to("director", "Director")?;
        movie.has_and_belongs_to_many("actors", "Actor")?;
        movie.belongs_to("sequel_of", "Movie")?;
        registry.entity("Director")?;
        registry
            .entity("Actor")?
            .has_and_belongs_to_many("movies", "Movie")?;
        Ok(())
    });

    let relations: Vec<_> = registry.relations().map(|relation| relation.id).collect();

    for id in &relations {
        let count = pairs.iter().filter(|pair| pair.contains(*id)).count();
        assert_eq!(count, 1, "{}", registry.full_name(*id));
    }

    // Director::movies and Movie::movies were synthesized
    assert_eq!(relations.len(), 6);
}

#[test]
fn resolving_again_is_idempotent() {
    let mut registry = Registry::new();
    registry.entity("User").unwrap();
    let mut post = registry.entity("Post").unwrap();
    post.belongs_to("author", "User").unwrap();
    post.belongs_to("editor", "User").unwrap();
    post.has_and_belongs_to_many("tags", "Tag").unwrap();
    registry.entity("Tag").unwrap();

    let options = Options::default();
    let first = resolve(&mut registry, &options).unwrap();
    let snapshot = registry.clone();
    let second = resolve(&mut registry, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        registry.relations().collect::<Vec<_>>(),
        snapshot.relations().collect::<Vec<_>>()
    );
}
