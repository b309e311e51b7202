use std::collections::HashMap;

use crate::accuracy::{accuracy, Accuracy};
use crate::filter::StatFilters;
use crate::group::{get, names, percent, ratio, sort_desc, tally};
use crate::kast::{kast, Kast, KastLetters};
use crate::players::rounds_played;
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KillStats {
    pub name: String,
    #[serde(rename = "K")]
    pub kills: usize,
    #[serde(rename = "D")]
    pub deaths: usize,
    #[serde(rename = "A")]
    pub assists: usize,
    #[serde(rename = "FA")]
    pub flash_assists: usize,
    #[serde(rename = "+/-")]
    pub plus_minus: i64,
    #[serde(rename = "FK")]
    pub first_kills: usize,
    #[serde(rename = "FD")]
    pub first_deaths: usize,
    #[serde(rename = "FK +/-")]
    pub first_kill_plus_minus: i64,
    /// Always 0 for teams.
    #[serde(rename = "T")]
    pub traded: usize,
    /// Always 0 for teams.
    #[serde(rename = "S")]
    pub survived: usize,
    #[serde(rename = "HS")]
    pub headshots: usize,
    #[serde(rename = "HS%")]
    pub headshot_pct: f64,
    #[serde(rename = "Weapon Fires")]
    pub weapon_fires: usize,
    #[serde(rename = "Strafe%")]
    pub strafe_pct: f64,
    #[serde(rename = "ACC%")]
    pub accuracy: f64,
    #[serde(rename = "HS ACC%")]
    pub headshot_accuracy: f64,
    #[serde(rename = "KDR")]
    pub kdr: f64,
    #[serde(rename = "KPR")]
    pub kpr: f64,
    /// Always 0 for teams.
    #[serde(rename = "KAST%")]
    pub kast: f64,
    pub rounds: usize,
}

/// Kills over deaths, a deathless player keeps their kill count.
pub(crate) fn kill_death_ratio(kills: usize, deaths: usize) -> f64 {
    if deaths == 0 {
        kills as f64
    } else {
        kills as f64 / deaths as f64
    }
}

/// The kill related part of the box score, sorted by kills.
pub fn kill_stats(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<KillStats>, StatsError> {
    let kills = filters.kill.apply(&data.kills)?;
    let deaths = filters.death.apply(&data.kills)?;

    let enemy_kills: Vec<_> = kills.iter().copied().filter(|k| k.is_enemy_kill()).collect();

    let kill_counts = tally(enemy_kills.iter().copied(), |k| k.attacker(scope));
    let death_counts = tally(deaths.iter().copied(), |k| k.victim(scope));
    let assists = tally(
        kills.iter().copied().filter(|k| k.is_enemy_assist()),
        |k| k.assister(scope),
    );
    let flash_assists = tally(
        kills.iter().copied().filter(|k| k.is_enemy_flash_assist()),
        |k| k.flash_thrower(scope),
    );
    let first_kills = tally(
        enemy_kills.iter().copied().filter(|k| k.is_first_kill),
        |k| k.attacker(scope),
    );
    let first_deaths = tally(
        enemy_kills.iter().copied().filter(|k| k.is_first_kill),
        |k| k.victim(scope),
    );
    let headshots = tally(
        enemy_kills.iter().copied().filter(|k| k.is_headshot),
        |k| k.attacker(scope),
    );

    let rounds = rounds_played(data, scope, &filters.round)?;

    let accuracies: HashMap<String, Accuracy> = accuracy(data, scope, filters)?
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect();

    let kasts: HashMap<String, Kast> = match scope {
        Scope::Player => kast(data, KastLetters::default(), true, filters)?
            .into_iter()
            .map(|k| (k.name.clone(), k))
            .collect(),
        Scope::Team => HashMap::new(),
    };

    let mut all = names([
        &kill_counts,
        &death_counts,
        &assists,
        &flash_assists,
        &first_kills,
        &first_deaths,
        &headshots,
        &rounds,
    ]);
    all.extend(accuracies.keys().cloned());
    all.extend(kasts.keys().cloned());

    let mut rows: Vec<KillStats> = all
        .into_iter()
        .map(|name| {
            let k = get(&kill_counts, &name);
            let d = get(&death_counts, &name);
            let fk = get(&first_kills, &name);
            let fd = get(&first_deaths, &name);
            let hs = get(&headshots, &name);
            let played = get(&rounds, &name);

            let mut row = KillStats {
                kills: k,
                deaths: d,
                assists: get(&assists, &name),
                flash_assists: get(&flash_assists, &name),
                plus_minus: k as i64 - d as i64,
                first_kills: fk,
                first_deaths: fd,
                first_kill_plus_minus: fk as i64 - fd as i64,
                headshots: hs,
                headshot_pct: percent(hs as f64, k as f64),
                kdr: kill_death_ratio(k, d),
                kpr: ratio(k as f64, played as f64),
                rounds: played,
                ..Default::default()
            };
            if let Some(acc) = accuracies.get(&name) {
                row.weapon_fires = acc.weapon_fires;
                row.strafe_pct = acc.strafe_pct;
                row.accuracy = acc.accuracy;
                row.headshot_accuracy = acc.headshot_accuracy;
            }
            if let Some(kast) = kasts.get(&name) {
                row.kast = kast.kast;
                row.traded = kast.traded;
                row.survived = kast.survived;
            }
            row.name = name;
            row
        })
        .collect();
    sort_desc(&mut rows, |r| r.kills as f64);

    Ok(rows)
}
