//! Checks on the bundled standard rule book.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

use evolve_rules::RuleBook;
use evolve_types::BuildingKind;

fn standard() -> RuleBook {
    RuleBook::standard().unwrap()
}

#[test]
fn standard_rules_load() {
    let book = standard();
    assert_eq!(book.ages().len(), 3);
    assert_eq!(book.cities().len(), 7);
    assert_eq!(book.variants().len(), 2);
    assert_eq!(book.sciences().len(), 3);
}

#[test]
fn every_age_deals_seven_options_per_player() {
    let book = standard();
    for age in book.ages() {
        for players in 3_u32..=7 {
            let dealt = book.options_for(&age.name, players).count();
            assert!(
                dealt >= usize::try_from(players * 7).unwrap(),
                "age {} with {players} players has only {dealt} options",
                age.name
            );
        }
    }
}

#[test]
fn personalities_only_in_last_age() {
    let book = standard();
    let last = book.ages().last().unwrap().name.clone();
    for option in book.options() {
        let building = book.building(&option.building).unwrap();
        if building.kind == BuildingKind::Personality {
            assert_eq!(option.age, last);
        }
    }
}

#[test]
fn every_city_variant_has_specials() {
    let book = standard();
    for city in book.cities() {
        for variant in book.variants() {
            let specials = book.specials_for(&city.name, variant);
            assert!(!specials.is_empty(), "{} ({variant}) has no specials", city.name);
            assert!(book.special(&city.name, variant, 0).is_some());
        }
    }
}

#[test]
fn age_directions_alternate() {
    let book = standard();
    let directions: Vec<_> = book.ages().iter().map(|a| a.direction).collect();
    for pair in directions.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn rule_book_round_trips_through_file() {
    let path = std::env::temp_dir().join(format!("evolve-rules-{}.yaml", std::process::id()));
    std::fs::write(
        &path,
        "ages: [{name: Only, order: 0, direction: right, victory_score: 2}]\n",
    )
    .unwrap();
    let book = RuleBook::from_file(&path);
    let _ = std::fs::remove_file(&path);
    let book = book.unwrap();
    assert_eq!(book.first_age().map(|a| a.victory_score), Some(2));
    assert!(book.options().is_empty());
}
