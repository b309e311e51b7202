use std::collections::{BTreeSet, HashMap};

use crate::filter::StatFilters;
use crate::group::{get, getf, names, ratio, sort_desc, sum_by, tally};
use crate::tables::MatchData;
use crate::{Scope, StatsError};

/// Grenades that deal damage.
pub const DAMAGE_NADES: [&str; 3] = ["HE Grenade", "Incendiary Grenade", "Molotov"];

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UtilityDamage {
    pub name: String,
    /// Only set by [`utility_damage_breakdown`].
    #[serde(rename = "Nade Type", default, skip_serializing_if = "Option::is_none")]
    pub nade_type: Option<String>,
    #[serde(rename = "Given UD")]
    pub given_ud: f64,
    #[serde(rename = "UD")]
    pub ud: f64,
    #[serde(rename = "Nades Thrown")]
    pub nades_thrown: usize,
    #[serde(rename = "Given UD Per Nade")]
    pub given_ud_per_nade: f64,
    #[serde(rename = "UD Per Nade")]
    pub ud_per_nade: f64,
}

impl UtilityDamage {
    fn new(name: String, nade_type: Option<String>, given: f64, raw: f64, thrown: usize) -> Self {
        Self {
            name,
            nade_type,
            given_ud: given,
            ud: raw,
            nades_thrown: thrown,
            given_ud_per_nade: ratio(given, thrown as f64),
            ud_per_nade: ratio(raw, thrown as f64),
        }
    }
}

/// Damage dealt to opponents with grenades and molotovs, sorted by the capped damage.
pub fn utility_damage(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<UtilityDamage>, StatsError> {
    let damages = filters.damage.apply(&data.damages)?;
    let grenades = filters.grenade.apply(&data.grenades)?;

    let nade_damage: Vec<_> = damages
        .iter()
        .copied()
        .filter(|d| d.is_enemy_damage() && DAMAGE_NADES.contains(&d.weapon.as_str()))
        .collect();

    let given = sum_by(nade_damage.iter().copied(), |d| d.attacker(scope), |d| d.hp_damage_taken as f64);
    let raw = sum_by(nade_damage.iter().copied(), |d| d.attacker(scope), |d| d.hp_damage as f64);
    let thrown = tally(
        grenades
            .iter()
            .copied()
            .filter(|g| DAMAGE_NADES.contains(&g.grenade_type.as_str())),
        |g| g.thrower(scope),
    );

    let mut all = names([&given, &raw]);
    all.extend(thrown.keys().cloned());

    let mut rows: Vec<UtilityDamage> = all
        .into_iter()
        .map(|name| {
            let given = getf(&given, &name);
            let raw = getf(&raw, &name);
            let thrown = get(&thrown, &name);
            UtilityDamage::new(name, None, given, raw, thrown)
        })
        .collect();
    sort_desc(&mut rows, |r| r.given_ud);

    Ok(rows)
}

/// Like [`utility_damage`] but with one row per name and grenade type.
///
/// Rows are ordered by name and within a name by the capped damage.
pub fn utility_damage_breakdown(
    data: &MatchData,
    scope: Scope,
    filters: &StatFilters,
) -> Result<Vec<UtilityDamage>, StatsError> {
    let damages = filters.damage.apply(&data.damages)?;
    let grenades = filters.grenade.apply(&data.grenades)?;

    let mut given: HashMap<(String, String), f64> = HashMap::new();
    let mut raw: HashMap<(String, String), f64> = HashMap::new();
    let mut thrown: HashMap<(String, String), usize> = HashMap::new();

    for damage in damages
        .iter()
        .filter(|d| d.is_enemy_damage() && DAMAGE_NADES.contains(&d.weapon.as_str()))
    {
        let Some(name) = damage.attacker(scope) else {
            continue;
        };
        let key = (name.to_owned(), damage.weapon.clone());
        *given.entry(key.clone()).or_default() += damage.hp_damage_taken as f64;
        *raw.entry(key).or_default() += damage.hp_damage as f64;
    }
    for grenade in grenades
        .iter()
        .filter(|g| DAMAGE_NADES.contains(&g.grenade_type.as_str()))
    {
        let Some(name) = grenade.thrower(scope) else {
            continue;
        };
        *thrown
            .entry((name.to_owned(), grenade.grenade_type.clone()))
            .or_default() += 1;
    }

    let keys: BTreeSet<(String, String)> = given
        .keys()
        .chain(raw.keys())
        .chain(thrown.keys())
        .cloned()
        .collect();

    let mut rows: Vec<UtilityDamage> = keys
        .into_iter()
        .map(|key| {
            let g = given.get(&key).copied().unwrap_or(0.0);
            let r = raw.get(&key).copied().unwrap_or(0.0);
            let t = thrown.get(&key).copied().unwrap_or(0);
            let (name, nade) = key;
            UtilityDamage::new(name, Some(nade), g, r, t)
        })
        .collect();
    rows.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| b.given_ud.total_cmp(&a.given_ud))
    });

    Ok(rows)
}
