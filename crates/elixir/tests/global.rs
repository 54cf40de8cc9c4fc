use elixir::{Elixir, SetupState};

#[test]
fn global_instance_is_shared() {
    let global = Elixir::global();
    assert!(std::ptr::eq(global, Elixir::global()));

    global
        .declare(|registry| {
            registry.entity("Studio")?.has_many("movies", "Movie")?;
            registry.entity("Movie")?;
            Ok(())
        })
        .unwrap();

    let movie = Elixir::global().relation("Movie", "studio").unwrap();

    assert_eq!(global.state(), SetupState::Resolved);
    assert_eq!(movie.side_a.attribute, "movies");
}
