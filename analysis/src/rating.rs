use std::collections::HashMap;

use crate::adr::adr;
use crate::filter::StatFilters;
use crate::group::{ratio, sort_desc};
use crate::kast::{kast, KastLetters};
use crate::killstats::kill_stats;
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rating {
    pub name: String,
    #[serde(rename = "Impact")]
    pub impact: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

/// Inputs of the rating formula, all of them per round except KAST.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingInputs {
    pub kast: f64,
    pub kpr: f64,
    pub dpr: f64,
    pub apr: f64,
    pub adr: f64,
}

impl RatingInputs {
    pub fn impact(&self) -> f64 {
        2.13 * self.kpr + 0.42 * self.apr - 0.41
    }

    /// Approximation of HLTV rating 2.0.
    pub fn rating(&self) -> f64 {
        0.73 * self.kast / 100.0 + 0.3591 * self.kpr - 0.5329 * self.dpr
            + 0.2372 * self.impact()
            + 0.0032 * self.adr
            + 0.1587
    }
}

/// Impact and rating per player, sorted by rating.
///
/// `letters` and `flash_assists` configure the KAST that goes into the rating,
/// assists per round never include flash assists.
pub fn rating(
    data: &MatchData,
    letters: KastLetters,
    flash_assists: bool,
    filters: &StatFilters,
) -> Result<Vec<Rating>, StatsError> {
    let kasts: HashMap<String, f64> = kast(data, letters, flash_assists, filters)?
        .into_iter()
        .map(|k| (k.name, k.kast))
        .collect();
    let adrs: HashMap<String, f64> = adr(data, Scope::Player, filters)?
        .into_iter()
        .map(|a| (a.name, a.norm_adr))
        .collect();

    let mut rows: Vec<Rating> = kill_stats(data, Scope::Player, filters)?
        .into_iter()
        .map(|stats| {
            let rounds = stats.rounds as f64;
            let inputs = RatingInputs {
                kast: kasts.get(&stats.name).copied().unwrap_or(0.0),
                kpr: stats.kpr,
                dpr: ratio(stats.deaths as f64, rounds),
                apr: ratio(stats.assists as f64, rounds),
                adr: adrs.get(&stats.name).copied().unwrap_or(0.0),
            };
            Rating {
                name: stats.name,
                impact: inputs.impact(),
                rating: inputs.rating(),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    sort_desc(&mut rows, |r| r.rating);

    Ok(rows)
}
