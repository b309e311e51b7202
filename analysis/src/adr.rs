use crate::filter::StatFilters;
use crate::group::{get, getf, names, ratio, sort_desc, sum_by};
use crate::players::rounds_played;
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Adr {
    pub name: String,
    /// Damage capped at the victims remaining health.
    #[serde(rename = "Norm ADR")]
    pub norm_adr: f64,
    #[serde(rename = "Raw ADR")]
    pub raw_adr: f64,
    pub rounds: usize,
}

/// Average damage per round dealt to opponents.
pub fn adr(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<Adr>, StatsError> {
    let damages = filters.damage.apply(&data.damages)?;
    let enemy: Vec<_> = damages.iter().copied().filter(|d| d.is_enemy_damage()).collect();

    let taken = sum_by(enemy.iter().copied(), |d| d.attacker(scope), |d| d.hp_damage_taken as f64);
    let dealt = sum_by(enemy.iter().copied(), |d| d.attacker(scope), |d| d.hp_damage as f64);
    let rounds = rounds_played(data, scope, &filters.round)?;

    let mut all = names([&taken, &dealt]);
    all.extend(rounds.keys().cloned());

    let mut rows: Vec<Adr> = all
        .into_iter()
        .map(|name| {
            let played = get(&rounds, &name) as f64;
            Adr {
                norm_adr: ratio(getf(&taken, &name), played),
                raw_adr: ratio(getf(&dealt, &name), played),
                rounds: get(&rounds, &name),
                name,
            }
        })
        .collect();
    sort_desc(&mut rows, |r| r.norm_adr);

    Ok(rows)
}
