use std::collections::{BTreeMap, HashMap};

use crate::adr::{adr, Adr};
use crate::filter::StatFilters;
use crate::flashes::{flash_stats, FlashStats};
use crate::economy::econ_stats;
use crate::kast::KastLetters;
use crate::killstats::{kill_stats, KillStats};
use crate::players::rounds_count;
use crate::rating::{rating, Rating};
use crate::tables::MatchData;
use crate::utility::{utility_damage, UtilityDamage};
use crate::winbreakdown::{win_breakdown, WinBreakdown};
use crate::{Scope, StatsError};

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerBoxScore {
    pub name: String,
    #[serde(rename = "K")]
    pub kills: usize,
    #[serde(rename = "D")]
    pub deaths: usize,
    #[serde(rename = "A")]
    pub assists: usize,
    #[serde(rename = "FA")]
    pub flash_assists: usize,
    #[serde(rename = "HS%")]
    pub headshot_pct: f64,
    #[serde(rename = "ACC%")]
    pub accuracy: f64,
    #[serde(rename = "HS ACC%")]
    pub headshot_accuracy: f64,
    #[serde(rename = "KDR")]
    pub kdr: f64,
    #[serde(rename = "KAST%")]
    pub kast: f64,
    #[serde(rename = "ADR")]
    pub adr: f64,
    #[serde(rename = "UD")]
    pub ud: f64,
    #[serde(rename = "UD Per Nade")]
    pub ud_per_nade: f64,
    #[serde(rename = "EF")]
    pub enemies_flashed: usize,
    #[serde(rename = "EF Per Throw")]
    pub ef_per_throw: f64,
    #[serde(rename = "Impact")]
    pub impact: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

fn by_name<T>(rows: Vec<T>, name: impl Fn(&T) -> &str) -> HashMap<String, T> {
    rows.into_iter().map(|r| (name(&r).to_owned(), r)).collect()
}

/// Names in the order of `first`, followed by the remaining names of `rest` in sorted order.
fn merged_names<'a>(first: impl IntoIterator<Item = &'a str>, rest: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = first.into_iter().map(str::to_owned).collect();
    let mut extra: Vec<&str> = rest.into_iter().filter(|n| !names.iter().any(|k| k.as_str() == *n)).collect();
    extra.sort_unstable();
    extra.dedup();
    names.extend(extra.into_iter().map(str::to_owned));
    names
}

/// The most important statistics of every player, ordered like [`kill_stats`].
#[tracing::instrument(skip_all)]
pub fn player_box_score(data: &MatchData, filters: &StatFilters) -> Result<Vec<PlayerBoxScore>, StatsError> {
    let kills = kill_stats(data, Scope::Player, filters)?;
    let adrs = by_name(adr(data, Scope::Player, filters)?, |r: &Adr| r.name.as_str());
    let uds = by_name(utility_damage(data, Scope::Player, filters)?, |r: &UtilityDamage| r.name.as_str());
    let flashes = by_name(flash_stats(data, Scope::Player, filters)?, |r: &FlashStats| r.name.as_str());
    let ratings = by_name(
        rating(data, KastLetters::default(), true, filters)?,
        |r: &Rating| r.name.as_str(),
    );

    let kills_by_name: HashMap<&str, &KillStats> = kills.iter().map(|k| (k.name.as_str(), k)).collect();
    let names = merged_names(
        kills.iter().map(|k| k.name.as_str()),
        adrs.keys()
            .chain(uds.keys())
            .chain(flashes.keys())
            .chain(ratings.keys())
            .map(String::as_str),
    );

    let rows: Vec<PlayerBoxScore> = names
        .into_iter()
        .map(|name| {
            let mut row = PlayerBoxScore::default();
            if let Some(k) = kills_by_name.get(name.as_str()) {
                row.kills = k.kills;
                row.deaths = k.deaths;
                row.assists = k.assists;
                row.flash_assists = k.flash_assists;
                row.headshot_pct = k.headshot_pct;
                row.accuracy = k.accuracy;
                row.headshot_accuracy = k.headshot_accuracy;
                row.kdr = k.kdr;
                row.kast = k.kast;
            }
            if let Some(a) = adrs.get(&name) {
                row.adr = a.norm_adr;
            }
            if let Some(u) = uds.get(&name) {
                row.ud = u.ud;
                row.ud_per_nade = u.ud_per_nade;
            }
            if let Some(f) = flashes.get(&name) {
                row.enemies_flashed = f.enemies_flashed;
                row.ef_per_throw = f.ef_per_throw;
            }
            if let Some(r) = ratings.get(&name) {
                row.impact = r.impact;
                row.rating = r.rating;
            }
            row.name = name;
            row
        })
        .collect();

    tracing::debug!(players = rows.len(), "Calculated player box score");

    Ok(rows)
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TeamSummary {
    pub team: String,
    #[serde(rename = "Score")]
    pub score: usize,
    #[serde(rename = "CT Wins")]
    pub ct_wins: usize,
    #[serde(rename = "T Wins")]
    pub t_wins: usize,
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
    #[serde(rename = "HS")]
    pub headshots: usize,
    #[serde(rename = "HS%")]
    pub headshot_pct: f64,
    #[serde(rename = "Strafe%")]
    pub strafe_pct: f64,
    #[serde(rename = "ACC%")]
    pub accuracy: f64,
    #[serde(rename = "HS ACC%")]
    pub headshot_accuracy: f64,
    #[serde(rename = "ADR")]
    pub adr: f64,
    #[serde(rename = "UD")]
    pub ud: f64,
    #[serde(rename = "Nades Thrown")]
    pub nades_thrown: usize,
    #[serde(rename = "UD Per Nade")]
    pub ud_per_nade: f64,
    #[serde(rename = "EF")]
    pub enemies_flashed: usize,
    #[serde(rename = "Flashes Thrown")]
    pub flashes_thrown: usize,
    #[serde(rename = "EF Per Throw")]
    pub ef_per_throw: f64,
    #[serde(rename = "EBT Per Enemy")]
    pub ebt_per_enemy: f64,
    #[serde(rename = "Avg EQ Value")]
    pub avg_eq_value: i64,
    #[serde(rename = "Avg Cash")]
    pub avg_cash: i64,
    #[serde(rename = "Avg Spend")]
    pub avg_spend: i64,
    /// Rounds per buy type over both sides.
    pub buy_types: BTreeMap<String, usize>,
    /// Rounds won per labelled end reason.
    pub win_reasons: BTreeMap<String, usize>,
}

/// One line of the transposed team box score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StatRow {
    pub stat: String,
    pub values: Vec<StatValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(i64),
    Ratio(f64),
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(v) => write!(f, "{}", v),
            Self::Ratio(v) => write!(f, "{:.2}", v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TeamBoxScore {
    pub teams: Vec<TeamSummary>,
}

impl TeamBoxScore {
    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.team.as_str()).collect()
    }

    /// The box score with one row per statistic and one column per team.
    ///
    /// Fixed statistics come first, followed by the buy types and the win reasons.
    pub fn stat_rows(&self) -> Vec<StatRow> {
        let fixed: [(&str, fn(&TeamSummary) -> StatValue); 25] = [
            ("Score", |t| StatValue::Count(t.score as i64)),
            ("CT Wins", |t| StatValue::Count(t.ct_wins as i64)),
            ("T Wins", |t| StatValue::Count(t.t_wins as i64)),
            ("K", |t| StatValue::Count(t.kills as i64)),
            ("D", |t| StatValue::Count(t.deaths as i64)),
            ("A", |t| StatValue::Count(t.assists as i64)),
            ("FA", |t| StatValue::Count(t.flash_assists as i64)),
            ("+/-", |t| StatValue::Count(t.plus_minus)),
            ("FK", |t| StatValue::Count(t.first_kills as i64)),
            ("HS", |t| StatValue::Count(t.headshots as i64)),
            ("HS%", |t| StatValue::Ratio(t.headshot_pct)),
            ("Strafe%", |t| StatValue::Ratio(t.strafe_pct)),
            ("ACC%", |t| StatValue::Ratio(t.accuracy)),
            ("HS ACC%", |t| StatValue::Ratio(t.headshot_accuracy)),
            ("ADR", |t| StatValue::Ratio(t.adr)),
            ("UD", |t| StatValue::Ratio(t.ud)),
            ("Nades Thrown", |t| StatValue::Count(t.nades_thrown as i64)),
            ("UD Per Nade", |t| StatValue::Ratio(t.ud_per_nade)),
            ("EF", |t| StatValue::Count(t.enemies_flashed as i64)),
            ("Flashes Thrown", |t| StatValue::Count(t.flashes_thrown as i64)),
            ("EF Per Throw", |t| StatValue::Ratio(t.ef_per_throw)),
            ("EBT Per Enemy", |t| StatValue::Ratio(t.ebt_per_enemy)),
            ("Avg EQ Value", |t| StatValue::Count(t.avg_eq_value)),
            ("Avg Cash", |t| StatValue::Count(t.avg_cash)),
            ("Avg Spend", |t| StatValue::Count(t.avg_spend)),
        ];

        let mut rows: Vec<StatRow> = fixed
            .into_iter()
            .map(|(stat, value)| StatRow {
                stat: stat.to_owned(),
                values: self.teams.iter().map(value).collect(),
            })
            .collect();
        rows.extend(self.count_rows(|t| &t.buy_types));
        rows.extend(self.count_rows(|t| &t.win_reasons));

        rows
    }

    fn count_rows(&self, counts: fn(&TeamSummary) -> &BTreeMap<String, usize>) -> Vec<StatRow> {
        let mut keys: Vec<&String> = self.teams.iter().flat_map(|t| counts(t).keys()).collect();
        keys.sort_unstable();
        keys.dedup();

        keys.into_iter()
            .map(|key| StatRow {
                stat: key.clone(),
                values: self
                    .teams
                    .iter()
                    .map(|t| StatValue::Count(counts(t).get(key).copied().unwrap_or(0) as i64))
                    .collect(),
            })
            .collect()
    }
}

/// Per team summary of the whole match.
///
/// Economy averages are weighted by the rounds a team played on each side and
/// divided by the number of rounds that pass the round filters.
#[tracing::instrument(skip_all)]
pub fn team_box_score(data: &MatchData, filters: &StatFilters) -> Result<TeamBoxScore, StatsError> {
    let kills = kill_stats(data, Scope::Team, filters)?;
    let adrs = by_name(adr(data, Scope::Team, filters)?, |r: &Adr| r.name.as_str());
    let uds = by_name(utility_damage(data, Scope::Team, filters)?, |r: &UtilityDamage| r.name.as_str());
    let flashes = by_name(flash_stats(data, Scope::Team, filters)?, |r: &FlashStats| r.name.as_str());
    let wins = by_name(win_breakdown(data, filters)?, |r: &WinBreakdown| r.team.as_str());
    let econ = econ_stats(data, filters)?;
    let total_rounds = rounds_count(&data.rounds, &filters.round)? as f64;

    let kills_by_name: HashMap<&str, &KillStats> = kills.iter().map(|k| (k.name.as_str(), k)).collect();
    let names = merged_names(
        kills.iter().map(|k| k.name.as_str()),
        adrs.keys()
            .chain(uds.keys())
            .chain(flashes.keys())
            .chain(wins.keys())
            .map(String::as_str)
            .chain(econ.iter().map(|e| e.team.as_str())),
    );

    let teams = names
        .into_iter()
        .map(|name| {
            let mut summary = TeamSummary::default();
            if let Some(k) = kills_by_name.get(name.as_str()) {
                summary.kills = k.kills;
                summary.deaths = k.deaths;
                summary.assists = k.assists;
                summary.flash_assists = k.flash_assists;
                summary.plus_minus = k.plus_minus;
                summary.first_kills = k.first_kills;
                summary.headshots = k.headshots;
                summary.headshot_pct = k.headshot_pct;
                summary.strafe_pct = k.strafe_pct;
                summary.accuracy = k.accuracy;
                summary.headshot_accuracy = k.headshot_accuracy;
            }
            if let Some(a) = adrs.get(&name) {
                summary.adr = a.norm_adr;
            }
            if let Some(u) = uds.get(&name) {
                summary.ud = u.ud;
                summary.nades_thrown = u.nades_thrown;
                summary.ud_per_nade = u.ud_per_nade;
            }
            if let Some(f) = flashes.get(&name) {
                summary.enemies_flashed = f.enemies_flashed;
                summary.flashes_thrown = f.flashes_thrown;
                summary.ef_per_throw = f.ef_per_throw;
                summary.ebt_per_enemy = f.ebt_per_enemy;
            }
            if let Some(w) = wins.get(&name) {
                summary.score = w.total;
                summary.ct_wins = w.ct_wins;
                summary.t_wins = w.t_wins;
                summary.win_reasons = w.reasons.clone();
            }

            let mut weighted = [0i64; 3];
            for side in econ.iter().filter(|e| e.team == name) {
                let played = side.rounds as i64;
                weighted[0] += side.avg_eq_value * played;
                weighted[1] += side.avg_cash * played;
                weighted[2] += side.avg_spend * played;
                for (buy, count) in side.buy_types.iter() {
                    *summary.buy_types.entry(buy.clone()).or_default() += count;
                }
            }
            let [eq, cash, spend] = weighted.map(|w| {
                if total_rounds == 0.0 {
                    0
                } else {
                    (w as f64 / total_rounds) as i64
                }
            });
            summary.avg_eq_value = eq;
            summary.avg_cash = cash;
            summary.avg_spend = spend;

            summary.team = name;
            summary
        })
        .collect();

    Ok(TeamBoxScore { teams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transposed_rows() {
        let score = TeamBoxScore {
            teams: vec![
                TeamSummary {
                    team: "Alpha".into(),
                    score: 16,
                    adr: 81.254,
                    buy_types: [("Full Eco".to_owned(), 3)].into_iter().collect(),
                    win_reasons: [("CT T Elim Wins".to_owned(), 9)].into_iter().collect(),
                    ..Default::default()
                },
                TeamSummary {
                    team: "Bravo".into(),
                    score: 12,
                    buy_types: [("Full Buy".to_owned(), 20)].into_iter().collect(),
                    ..Default::default()
                },
            ],
        };

        let rows = score.stat_rows();
        assert_eq!(vec!["Alpha", "Bravo"], score.team_names());

        assert_eq!("Score", rows[0].stat);
        assert_eq!(vec![StatValue::Count(16), StatValue::Count(12)], rows[0].values);

        let adr = rows.iter().find(|r| r.stat == "ADR").unwrap();
        assert_eq!("81.25", adr.values[0].to_string());

        let stats: Vec<&str> = rows.iter().skip(25).map(|r| r.stat.as_str()).collect();
        assert_eq!(vec!["Full Buy", "Full Eco", "CT T Elim Wins"], stats);

        let eco = rows.iter().find(|r| r.stat == "Full Eco").unwrap();
        assert_eq!(vec![StatValue::Count(3), StatValue::Count(0)], eco.values);
    }
}
