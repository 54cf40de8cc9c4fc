use elixir::{Association, Elixir, OnDelete, Provenance, RelationKind, SetupState};

use pretty_assertions::assert_eq;

fn videostore() -> Elixir {
    let elixir = Elixir::builder()
        .default_on_delete(OnDelete::Cascade)
        .build();

    elixir
        .declare(|registry| {
            registry.entity("Director")?.has_many("movies", "Movie")?;

            let mut movie = registry.entity("Movie")?;
            movie.field("title")?;
            movie.has_and_belongs_to_many("actors", "Actor")?;

            registry.entity("Actor")?;

            let mut user = registry.entity("User")?;
            user.field("name")?;
            user.has_and_belongs_to_many("groups", "Group")?
                .table("user_groups");

            registry
                .entity("Group")?
                .has_and_belongs_to_many("users", "User")?
                .table("user_groups");
            registry
                .entity("Permission")?
                .has_and_belongs_to_many("groups", "Group")?;

            Ok(())
        })
        .unwrap();

    elixir
}

#[test]
fn setup_runs_on_first_use() {
    let elixir = videostore();
    assert_eq!(elixir.state(), SetupState::Collecting);

    let movie = elixir.relation("Movie", "director").unwrap();

    assert_eq!(elixir.state(), SetupState::Resolved);
    assert_eq!(movie.provenance, Provenance::Synthesized);
    assert_eq!(movie.side_a.entity, "Director");

    let director = movie.side_b.unwrap();
    assert_eq!(director.kind, RelationKind::BelongsTo);
    assert_eq!(director.on_delete, Some(OnDelete::Cascade));
    assert!(director.synthesized);
}

#[test]
fn synthesized_many_to_many() {
    let elixir = videostore();
    let actor = elixir.relation("Actor", "movies").unwrap();

    assert_eq!(actor.provenance, Provenance::Synthesized);
    assert_eq!(
        actor.association_table().unwrap().name,
        "movie_actors__actor_id"
    );
}

#[test]
fn groups_and_permissions() {
    let elixir = videostore();
    let mapping = elixir.mapping().unwrap();

    let users = mapping.relation("Group", "users").unwrap();
    assert_eq!(users.provenance, Provenance::Inferred);
    assert!(matches!(
        &users.association,
        Association::Table(table) if table.name == "user_groups"
    ));

    let permissions = mapping.relation("Permission", "groups").unwrap();
    assert_eq!(permissions.provenance, Provenance::Synthesized);
    assert_eq!(
        permissions.side_b.as_ref().unwrap().attribute,
        "permissions"
    );
    assert_eq!(
        permissions.association_table().unwrap().name,
        "permission_groups__group_id"
    );
}

#[test]
fn clones_share_setup() {
    let elixir = videostore();
    let clone = elixir.clone();

    clone.setup_all().unwrap();

    assert_eq!(elixir.state(), SetupState::Resolved);
    assert!(elixir
        .declare(|registry| {
            registry.entity("Studio")?;
            Ok(())
        })
        .unwrap_err()
        .is_invalid_schema());
}

#[test]
fn unknown_attribute() {
    let elixir = videostore();
    let err = elixir.relation("Movie", "title").unwrap_err();

    assert_eq!(err.to_string(), "`Movie::title` is not a relation");
}

#[test]
fn mapping_serializes_to_json() {
    let elixir = videostore();
    let json = elixir.mapping().unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let entities = value["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 6);
    assert_eq!(entities[1]["table"], "movie");

    let relations = value["relations"].as_array().unwrap();
    assert!(relations
        .iter()
        .any(|relation| relation["association"]["table"]["name"] == "user_groups"));
    assert_eq!(relations[0]["provenance"], "synthesized");
    assert_eq!(relations[0]["side_b"]["on_delete"], "cascade");
}
