use std::collections::BTreeMap;

use clausewitz_save::models::{Meta, Player};
use clausewitz_save::{bind, bind_with_diagnostics, parse, save_model, SaveDate};

save_model! {
    struct Country {
        scalar("name") name: String,
        scalar("capital") capital: i32,
        scalar("military_power") military_power: f64,
        object("ruler") ruler: Option<Leader>,
        array("owned_planets") owned_planets: Vec<i64>,
    }
}

save_model! {
    struct Leader {
        scalar("name") name: String,
        scalar("age") age: i32,
    }
}

save_model! {
    struct Gamestate {
        array("player") players: Vec<Player>,
        dictionary("country") countries: BTreeMap<i64, Country>,
    }
}

#[test]
fn binds_a_nested_gamestate_section() {
    let doc = parse(
        r#"player={
	{
		name="Alice"
		country=0
	}
}
country={
	0={
		name="United Nations of Earth"
		capital=3
		military_power=1520.25
		ruler={
			name="Narena Dir"
			age=42
		}
		owned_planets={
			3
			17
		}
	}
	1=none
}"#,
    )
    .unwrap();

    let state: Gamestate = bind(&doc);

    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].name, "Alice");
    assert_eq!(state.players[0].country, 0);

    let earth = state.countries.get(&0).expect("country 0");
    assert_eq!(earth.name, "United Nations of Earth");
    assert_eq!(earth.capital, 3);
    assert_eq!(earth.military_power, 1520.25);
    assert_eq!(earth.ruler.as_ref().map(|r| r.age), Some(42));
    assert_eq!(earth.owned_planets, vec![3, 17]);
}

#[test]
fn dictionary_value_of_none_is_dropped_with_a_diagnostic() {
    let doc = parse("country={ 0={ name=\"A\" } 1=none }").unwrap();
    let (state, diagnostics) = bind_with_diagnostics::<Gamestate>(&doc);
    // `none` is not an object, so country 1 never materializes.
    assert_eq!(state.countries.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.events()[0].key, "1");
}

#[test]
fn meta_model_round_trips_through_bind() {
    let doc = parse(
        "version=\"Cepheus v3.4.5\"\nname=\"Test Empire\"\ndate=\"2210.11.3\"\nironman=yes",
    )
    .unwrap();
    let meta: Meta = bind(&doc);
    assert_eq!(meta.version, "Cepheus v3.4.5");
    assert_eq!(meta.name, "Test Empire");
    assert_eq!(meta.date, Some(SaveDate::new(2210, 11, 3).unwrap()));
    assert!(meta.ironman);
    // Fields absent from the document keep their defaults.
    assert_eq!(meta.meta_fleets, 0);
    assert!(meta.required_dlcs.is_empty());
}

#[test]
fn wrong_shapes_never_abort_a_bind() {
    // Every field here mismatches its declared capability.
    let doc = parse("name={ a=1 }\ncapital=\"not a number\"\nruler=12\nowned_planets=yes").unwrap();
    let (country, diagnostics) = bind_with_diagnostics::<Country>(&doc);

    assert_eq!(country, {
        let mut expected = Country::default();
        // A lone scalar still splices into a list slot when it converts;
        // `yes` does not, so the list stays empty but assigned.
        expected.owned_planets = Vec::new();
        expected
    });
    assert_eq!(diagnostics.len(), 4);
    let keys: Vec<&str> = diagnostics.events().iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["name", "capital", "ruler", "<item>"]);
}

#[test]
fn single_value_binds_into_a_list_slot() {
    let doc = parse("owned_planets=7").unwrap();
    let country: Country = bind(&doc);
    assert_eq!(country.owned_planets, vec![7]);
}

#[test]
fn duplicate_scalar_keys_gather_for_array_fields() {
    save_model! {
        struct Dlcs {
            array("required_dlcs") required_dlcs: Vec<String>,
        }
    }
    let doc = parse("required_dlcs=\"Utopia\"\nrequired_dlcs=\"Apocalypse\"").unwrap();
    let dlcs: Dlcs = bind(&doc);
    assert_eq!(dlcs.required_dlcs, vec!["Utopia", "Apocalypse"]);
}

#[test]
fn option_scalar_accepts_none_literal() {
    save_model! {
        struct Timestamps {
            scalar("started") started: Option<SaveDate>,
        }
    }
    let doc = parse("started=none").unwrap();
    let (stamps, diagnostics) = bind_with_diagnostics::<Timestamps>(&doc);
    assert_eq!(stamps.started, None);
    assert!(diagnostics.is_empty());
}
