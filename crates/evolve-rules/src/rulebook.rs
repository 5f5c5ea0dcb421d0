//! The [`RuleBook`]: every piece of rule data, validated and indexed.
//!
//! Rule data is written in YAML ([`RuleData`]) and loaded once. Loading
//! checks every cross reference, so lookups on a [`RuleBook`] return
//! `Option` only for names supplied by callers, never for names that come
//! from the rule data itself.
//!
//! Build options are declared per building and age with the list of player
//! counts they are dealt at; each count becomes a separate [`BuildOption`]
//! with its own [`BuildOptionId`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use evolve_economy::Cost;
use evolve_types::BuildOptionId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::age::Age;
use crate::building::{BuildOption, Building};
use crate::city::{City, CitySpecial};
use crate::effect::Effect;
use crate::error::RulesError;

/// The rule book bundled with the engine.
const STANDARD_RULES: &str = include_str!("../fixtures/standard.yaml");

// ---------------------------------------------------------------------------
// Raw rule data
// ---------------------------------------------------------------------------

/// A resource that can be produced, traded and paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceDef {
    /// Unique name.
    pub name: String,
    /// Raw (`true`) or manufactured (`false`).
    pub basic: bool,
}

/// Build options of one building in one age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionEntry {
    /// Building dealt.
    pub building: String,
    /// Age it is dealt in.
    pub age: String,
    /// Player counts from which one more copy is in play.
    pub players: Vec<u32>,
}

/// Rule data as written in YAML, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleData {
    /// Resources.
    pub resources: Vec<ResourceDef>,
    /// Science names.
    pub sciences: Vec<String>,
    /// City variant names.
    pub variants: Vec<String>,
    /// Ages, in any order.
    pub ages: Vec<Age>,
    /// Cities.
    pub cities: Vec<City>,
    /// Specials of every city variant.
    pub specials: Vec<CitySpecial>,
    /// Buildings.
    pub buildings: Vec<Building>,
    /// Build options, grouped per building and age.
    pub options: Vec<OptionEntry>,
}

// ---------------------------------------------------------------------------
// RuleBook
// ---------------------------------------------------------------------------

/// Validated, read-only rule data.
#[derive(Debug, Clone)]
pub struct RuleBook {
    resources: Vec<ResourceDef>,
    sciences: Vec<String>,
    variants: Vec<String>,
    /// Sorted by `order`.
    ages: Vec<Age>,
    cities: Vec<City>,
    /// Keyed by `(city, variant)`, each list sorted by `order`.
    specials: BTreeMap<(String, String), Vec<CitySpecial>>,
    buildings: BTreeMap<String, Building>,
    /// `options[i].id == BuildOptionId(i)`.
    options: Vec<BuildOption>,
}

impl RuleBook {
    /// The bundled standard rule book (seven cities, three ages).
    pub fn standard() -> Result<Self, RulesError> {
        Self::from_yaml(STANDARD_RULES)
    }

    /// Load a rule book from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Loading rule book");
        Self::from_yaml(&contents)
    }

    /// Parse and validate YAML rule data.
    pub fn from_yaml(yaml: &str) -> Result<Self, RulesError> {
        let data: RuleData = serde_yml::from_str(yaml)?;
        Self::from_data(data)
    }

    /// Validate rule data and index it.
    pub fn from_data(data: RuleData) -> Result<Self, RulesError> {
        let resources = unique_names("resource", data.resources.iter().map(|r| r.name.as_str()))?;
        let sciences = unique_names("science", data.sciences.iter().map(String::as_str))?;
        let variants = unique_names("variant", data.variants.iter().map(String::as_str))?;
        let age_names = unique_names("age", data.ages.iter().map(|a| a.name.as_str()))?;
        let city_names = unique_names("city", data.cities.iter().map(|c| c.name.as_str()))?;
        let building_names =
            unique_names("building", data.buildings.iter().map(|b| b.name.as_str()))?;

        let refs = References {
            resources: &resources,
            sciences: &sciences,
        };

        let mut ages = data.ages;
        if ages.is_empty() {
            return Err(RulesError::NoAges);
        }
        ages.sort_by_key(|age| age.order);
        unique_names("age order", ages.iter().map(|age| age.order.to_string()))?;

        for city in &data.cities {
            ensure_known(&resources, &city.name, "resource", &city.resource)?;
        }

        for building in &data.buildings {
            refs.check(&building.name, &building.cost, &building.effect)?;
            if let Some(chain) = &building.free_having {
                ensure_known(&building_names, &building.name, "building", chain)?;
            }
        }

        let specials = index_specials(data.specials, &city_names, &variants, refs)?;

        let mut options = Vec::new();
        for entry in data.options {
            ensure_known(&building_names, "build option", "building", &entry.building)?;
            ensure_known(&age_names, &entry.building, "age", &entry.age)?;
            for players_needed in entry.players {
                if players_needed == 0 {
                    return Err(RulesError::InvalidPlayerCount {
                        building: entry.building,
                        age: entry.age,
                    });
                }
                let Ok(id) = u32::try_from(options.len()) else {
                    return Err(RulesError::TooManyOptions);
                };
                options.push(BuildOption {
                    id: BuildOptionId(id),
                    building: entry.building.clone(),
                    age: entry.age.clone(),
                    players_needed,
                });
            }
        }

        let buildings: BTreeMap<String, Building> = data
            .buildings
            .into_iter()
            .map(|building| (building.name.clone(), building))
            .collect();

        info!(
            ages = ages.len(),
            cities = data.cities.len(),
            buildings = buildings.len(),
            options = options.len(),
            "Rule book loaded"
        );

        Ok(Self {
            resources: data.resources,
            sciences: data.sciences,
            variants: data.variants,
            ages,
            cities: data.cities,
            specials,
            buildings,
            options,
        })
    }

    // -----------------------------------------------------------------------
    // Resources, sciences, variants
    // -----------------------------------------------------------------------

    /// Every resource.
    pub fn resources(&self) -> &[ResourceDef] {
        &self.resources
    }

    /// Resource by name.
    pub fn resource(&self, name: &str) -> Option<&ResourceDef> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Every science name.
    pub fn sciences(&self) -> &[String] {
        &self.sciences
    }

    /// Every city variant name.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    // -----------------------------------------------------------------------
    // Ages
    // -----------------------------------------------------------------------

    /// Ages in play order.
    pub fn ages(&self) -> &[Age] {
        &self.ages
    }

    /// Age by name.
    pub fn age(&self, name: &str) -> Option<&Age> {
        self.ages.iter().find(|age| age.name == name)
    }

    /// The first age played.
    pub fn first_age(&self) -> Option<&Age> {
        self.ages.first()
    }

    /// The age after `name`, or `None` if `name` is the last (or unknown).
    pub fn next_age(&self, name: &str) -> Option<&Age> {
        let current = self.age(name)?;
        self.ages.iter().find(|age| age.order > current.order)
    }

    // -----------------------------------------------------------------------
    // Cities and specials
    // -----------------------------------------------------------------------

    /// Every city.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// City by name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.name == name)
    }

    /// Specials of a city variant, in build order (empty if none).
    pub fn specials_for(&self, city: &str, variant: &str) -> &[CitySpecial] {
        self.specials
            .get(&(city.to_owned(), variant.to_owned()))
            .map_or(&[], Vec::as_slice)
    }

    /// The special at position `order` of a city variant.
    pub fn special(&self, city: &str, variant: &str, order: u32) -> Option<&CitySpecial> {
        self.specials_for(city, variant)
            .iter()
            .find(|special| special.order == order)
    }

    // -----------------------------------------------------------------------
    // Buildings and options
    // -----------------------------------------------------------------------

    /// Every building, by name.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    /// Building by name.
    pub fn building(&self, name: &str) -> Option<&Building> {
        self.buildings.get(name)
    }

    /// Every build option.
    pub fn options(&self) -> &[BuildOption] {
        &self.options
    }

    /// Build option by id.
    pub fn option(&self, id: BuildOptionId) -> Option<&BuildOption> {
        let index = usize::try_from(id.into_inner()).ok()?;
        self.options.get(index)
    }

    /// The building an option deals.
    pub fn option_building(&self, id: BuildOptionId) -> Option<&Building> {
        self.option(id)
            .and_then(|option| self.building(&option.building))
    }

    /// Options in play for `age` with `players` seated.
    pub fn options_for<'a>(
        &'a self,
        age: &'a str,
        players: u32,
    ) -> impl Iterator<Item = &'a BuildOption> + 'a {
        self.options
            .iter()
            .filter(move |option| option.is_eligible(age, players))
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Names a cost or effect may refer to.
#[derive(Clone, Copy)]
struct References<'a> {
    resources: &'a BTreeSet<String>,
    sciences: &'a BTreeSet<String>,
}

impl References<'_> {
    fn check(self, owner: &str, cost: &Cost, effect: &Effect) -> Result<(), RulesError> {
        for (resource, _) in cost.resources() {
            ensure_known(self.resources, owner, "resource", resource)?;
        }
        for resource in effect.resources() {
            ensure_known(self.resources, owner, "resource", resource)?;
        }
        for science in &effect.sciences {
            ensure_known(self.sciences, owner, "science", science)?;
        }
        effect.validate(owner)
    }
}

fn unique_names(
    table: &'static str,
    names: impl Iterator<Item = impl AsRef<str>>,
) -> Result<BTreeSet<String>, RulesError> {
    let mut seen = BTreeSet::new();
    for name in names {
        let name = name.as_ref();
        if !seen.insert(name.to_owned()) {
            return Err(RulesError::Duplicate {
                table,
                name: name.to_owned(),
            });
        }
    }
    Ok(seen)
}

fn ensure_known(
    known: &BTreeSet<String>,
    owner: &str,
    table: &'static str,
    name: &str,
) -> Result<(), RulesError> {
    if known.contains(name) {
        Ok(())
    } else {
        Err(RulesError::UnknownReference {
            owner: owner.to_owned(),
            table,
            name: name.to_owned(),
        })
    }
}

fn index_specials(
    specials: Vec<CitySpecial>,
    cities: &BTreeSet<String>,
    variants: &BTreeSet<String>,
    refs: References<'_>,
) -> Result<BTreeMap<(String, String), Vec<CitySpecial>>, RulesError> {
    let mut grouped: BTreeMap<(String, String), Vec<CitySpecial>> = BTreeMap::new();
    for special in specials {
        let owner = special.to_string();
        ensure_known(cities, &owner, "city", &special.city)?;
        ensure_known(variants, &owner, "variant", &special.variant)?;
        refs.check(&owner, &special.cost, &special.effect)?;
        grouped
            .entry((special.city.clone(), special.variant.clone()))
            .or_default()
            .push(special);
    }
    for ((city, variant), list) in &mut grouped {
        list.sort_by_key(|special| special.order);
        for (expected, special) in (0_u32..).zip(list.iter()) {
            if special.order != expected {
                return Err(RulesError::SpecialOrder {
                    city: city.clone(),
                    variant: variant.clone(),
                    expected,
                    found: special.order,
                });
            }
        }
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
resources:
  - {name: wood, basic: true}
  - {name: glass, basic: false}
sciences: [gear]
variants: [day]
ages:
  - {name: II, order: 2, direction: right, victory_score: 3}
  - {name: I, order: 1, direction: left, victory_score: 1}
cities:
  - {name: Olympia, resource: wood}
specials:
  - {city: Olympia, variant: day, order: 1, cost: {resources: {wood: 2}}, effect: {score: 5}}
  - {city: Olympia, variant: day, order: 0, effect: {score: 3}}
buildings:
  - name: Lumber Yard
    kind: basic_resource
    effect: {production: {resources: {wood: 1}}}
  - name: Workshop
    kind: scientific
    cost: {resources: {glass: 1}}
    effect: {sciences: [gear]}
options:
  - {building: Lumber Yard, age: I, players: [3, 4]}
  - {building: Workshop, age: II, players: [3]}
";

    fn load(yaml: &str) -> Result<RuleBook, RulesError> {
        RuleBook::from_yaml(yaml)
    }

    #[test]
    fn minimal_rule_book_loads() {
        let book = load(MINIMAL);
        assert!(book.is_ok());
    }

    #[test]
    fn ages_are_ordered() {
        let Ok(book) = load(MINIMAL) else {
            return;
        };
        assert_eq!(book.first_age().map(|a| a.name.as_str()), Some("I"));
        assert_eq!(book.next_age("I").map(|a| a.name.as_str()), Some("II"));
        assert!(book.next_age("II").is_none());
        assert!(book.next_age("X").is_none());
    }

    #[test]
    fn player_counts_expand_into_options() {
        let Ok(book) = load(MINIMAL) else {
            return;
        };
        assert_eq!(book.options().len(), 3);
        assert_eq!(book.options_for("I", 3).count(), 1);
        assert_eq!(book.options_for("I", 4).count(), 2);
        assert_eq!(book.options_for("II", 7).count(), 1);
        let ids: Vec<u32> = book.options().iter().map(|o| o.id.into_inner()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(
            book.option_building(BuildOptionId(2)).map(|b| b.name.as_str()),
            Some("Workshop")
        );
        assert!(book.option(BuildOptionId(3)).is_none());
    }

    #[test]
    fn marker_flags_load_from_rule_data() {
        let yaml = MINIMAL.replace(
            "effect: {score: 5}",
            "effect: {extra_turn: true, use_discards: true, copy_personality: true}",
        );
        let book = load(&yaml);
        assert!(book.is_ok());
        let Ok(book) = book else {
            return;
        };
        let effect = book.special("Olympia", "day", 1).map(|s| &s.effect);
        assert!(effect.is_some_and(|e| e.extra_turn && e.use_discards && e.copy_personality));
        let plain = book.special("Olympia", "day", 0).map(|s| &s.effect);
        assert!(plain.is_some_and(|e| !e.extra_turn && !e.use_discards && !e.copy_personality));
    }

    #[test]
    fn specials_sorted_by_order() {
        let Ok(book) = load(MINIMAL) else {
            return;
        };
        let orders: Vec<u32> = book
            .specials_for("Olympia", "day")
            .iter()
            .map(|s| s.order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(book.special("Olympia", "day", 1).map(|s| s.effect.score), Some(5));
        assert!(book.specials_for("Olympia", "night").is_empty());
    }

    #[test]
    fn special_gap_rejected() {
        let yaml = MINIMAL.replace("order: 1, cost", "order: 2, cost");
        assert!(matches!(load(&yaml), Err(RulesError::SpecialOrder { expected: 1, found: 2, .. })));
    }

    #[test]
    fn unknown_resource_rejected() {
        let yaml = MINIMAL.replace("{glass: 1}", "{marble: 1}");
        assert!(matches!(
            load(&yaml),
            Err(RulesError::UnknownReference { table: "resource", .. })
        ));
    }

    #[test]
    fn unknown_science_rejected() {
        let yaml = MINIMAL.replace("sciences: [gear]}", "sciences: [tablet]}");
        assert!(matches!(
            load(&yaml),
            Err(RulesError::UnknownReference { table: "science", .. })
        ));
    }

    #[test]
    fn duplicate_building_rejected() {
        let yaml = MINIMAL.replace("name: Workshop", "name: Lumber Yard");
        assert!(matches!(
            load(&yaml),
            Err(RulesError::Duplicate { table: "building", .. })
        ));
    }

    #[test]
    fn option_for_unknown_age_rejected() {
        let yaml = MINIMAL.replace("age: II, players", "age: III, players");
        assert!(matches!(
            load(&yaml),
            Err(RulesError::UnknownReference { table: "age", .. })
        ));
    }

    #[test]
    fn zero_player_option_rejected() {
        let yaml = MINIMAL.replace("players: [3, 4]", "players: [0]");
        assert!(matches!(load(&yaml), Err(RulesError::InvalidPlayerCount { .. })));
    }

    #[test]
    fn no_ages_rejected() {
        let data = RuleData::default();
        assert!(matches!(RuleBook::from_data(data), Err(RulesError::NoAges)));
    }

    #[test]
    fn malformed_yaml_rejected() {
        assert!(matches!(load("ages: [[["), Err(RulesError::Yaml(_))));
    }
}
