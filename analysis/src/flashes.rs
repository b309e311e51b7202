use crate::filter::StatFilters;
use crate::group::{get, getf, names, ratio, sort_desc, sum_by, tally};
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlashStats {
    pub name: String,
    #[serde(rename = "EF")]
    pub enemies_flashed: usize,
    #[serde(rename = "FA")]
    pub flash_assists: usize,
    /// Seconds opponents spent blinded.
    #[serde(rename = "EBT")]
    pub enemy_blind_time: f64,
    #[serde(rename = "TF")]
    pub teammates_flashed: usize,
    #[serde(rename = "Flashes Thrown")]
    pub flashes_thrown: usize,
    #[serde(rename = "EF Per Throw")]
    pub ef_per_throw: f64,
    #[serde(rename = "EBT Per Enemy")]
    pub ebt_per_enemy: f64,
}

/// Flashbang effectiveness, sorted by enemies flashed.
pub fn flash_stats(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<FlashStats>, StatsError> {
    let flashes = filters.flash.apply(&data.flashes)?;
    let kills = filters.kill.apply(&data.kills)?;
    let grenades = filters.grenade.apply(&data.grenades)?;

    let enemy: Vec<_> = flashes.iter().copied().filter(|f| f.is_enemy_flash()).collect();

    let flashed = tally(enemy.iter().copied(), |f| f.attacker(scope));
    let blind_time = sum_by(
        enemy.iter().copied(),
        |f| f.attacker(scope),
        |f| f.flash_duration.unwrap_or(0.0),
    );
    let team_flashed = tally(
        flashes.iter().copied().filter(|f| !f.is_enemy_flash()),
        |f| f.attacker(scope),
    );
    let assists = tally(
        kills.iter().copied().filter(|k| k.is_enemy_flash_assist()),
        |k| k.flash_thrower(scope),
    );
    let thrown = tally(
        grenades.iter().copied().filter(|g| g.grenade_type == "Flashbang"),
        |g| g.thrower(scope),
    );

    let mut all = names([&flashed, &team_flashed, &assists, &thrown]);
    all.extend(blind_time.keys().cloned());

    let mut rows: Vec<FlashStats> = all
        .into_iter()
        .map(|name| {
            let ef = get(&flashed, &name);
            let ebt = getf(&blind_time, &name);
            let thrown = get(&thrown, &name);
            FlashStats {
                enemies_flashed: ef,
                flash_assists: get(&assists, &name),
                enemy_blind_time: ebt,
                teammates_flashed: get(&team_flashed, &name),
                flashes_thrown: thrown,
                ef_per_throw: ratio(ef as f64, thrown as f64),
                ebt_per_enemy: ratio(ebt, ef as f64),
                name,
            }
        })
        .collect();
    sort_desc(&mut rows, |r| r.enemies_flashed as f64);

    Ok(rows)
}
