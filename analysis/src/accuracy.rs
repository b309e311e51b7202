use crate::filter::StatFilters;
use crate::group::{get, names, percent, sort_desc, tally};
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Accuracy {
    pub name: String,
    #[serde(rename = "Weapon Fires")]
    pub weapon_fires: usize,
    #[serde(rename = "Strafe%")]
    pub strafe_pct: f64,
    #[serde(rename = "ACC%")]
    pub accuracy: f64,
    #[serde(rename = "HS ACC%")]
    pub headshot_accuracy: f64,
}

/// Shots fired and the share of them that hit (or hit the head of) an opponent.
pub fn accuracy(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<Accuracy>, StatsError> {
    let fires = filters.weapon_fire.apply(&data.weapon_fires)?;
    let damages = filters.damage.apply(&data.damages)?;

    let weapon_fires = tally(fires.iter().copied(), |w| w.shooter(scope));
    let strafe_fires = tally(fires.iter().copied().filter(|w| w.player_strafe), |w| w.shooter(scope));

    let enemy_hits: Vec<_> = damages
        .iter()
        .copied()
        .filter(|d| d.is_enemy_damage())
        .collect();
    let hits = tally(enemy_hits.iter().copied(), |d| d.attacker(scope));
    let headshots = tally(
        enemy_hits.iter().copied().filter(|d| d.hit_group == "Head"),
        |d| d.attacker(scope),
    );

    let mut rows: Vec<Accuracy> = names([&weapon_fires, &strafe_fires, &hits, &headshots])
        .into_iter()
        .map(|name| {
            let fired = get(&weapon_fires, &name) as f64;
            Accuracy {
                weapon_fires: get(&weapon_fires, &name),
                strafe_pct: percent(get(&strafe_fires, &name) as f64, fired),
                accuracy: percent(get(&hits, &name) as f64, fired),
                headshot_accuracy: percent(get(&headshots, &name) as f64, fired),
                name,
            }
        })
        .collect();
    sort_desc(&mut rows, |r| r.accuracy);

    Ok(rows)
}
