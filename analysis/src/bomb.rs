use std::collections::BTreeSet;

use crate::filter::StatFilters;
use crate::group::percent;
use crate::tables::{BombEvent, MatchData};
use crate::StatsError;

/// Label of the row that totals all bombsites.
pub const ALL_SITES: &str = "A and B";

/// Plants of one team and how often the other team defused them, per bombsite.
///
/// "First" and "second" refer to the order in which the teams show up in the bomb events.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BombSiteStats {
    pub site: String,
    pub first_plants: usize,
    pub second_defuses: usize,
    pub second_defuse_pct: f64,
    pub second_plants: usize,
    pub first_defuses: usize,
    pub first_defuse_pct: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BombStats {
    pub first_team: String,
    pub second_team: String,
    /// One row per bombsite followed by the [`ALL_SITES`] total.
    pub sites: Vec<BombSiteStats>,
}

impl BombSiteStats {
    fn new(site: String, first_plants: usize, second_defuses: usize, second_plants: usize, first_defuses: usize) -> Self {
        Self {
            site,
            first_plants,
            second_defuses,
            second_defuse_pct: percent(second_defuses as f64, first_plants as f64),
            second_plants,
            first_defuses,
            first_defuse_pct: percent(first_defuses as f64, second_plants as f64),
        }
    }
}

fn count(events: &[&BombEvent], action: &str, team: &str, site: &str) -> usize {
    events
        .iter()
        .filter(|e| e.bomb_action == action && e.player_team.as_deref() == Some(team) && e.bomb_site == site)
        .count()
}

/// Plants and defuses of both teams per bombsite.
///
/// The teams are taken from the unfiltered events, the counts from the filtered ones.
pub fn bomb_stats(data: &MatchData, filters: &StatFilters) -> Result<BombStats, StatsError> {
    let mut teams: Vec<&str> = Vec::new();
    for team in data.bomb_events.iter().filter_map(|e| e.player_team.as_deref()) {
        if !teams.contains(&team) {
            teams.push(team);
        }
    }
    let (first, second) = match teams.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => return Err(StatsError::NotEnoughTeams { found: teams.len() }),
    };

    let events = filters.bomb.apply(&data.bomb_events)?;

    let sites: BTreeSet<&str> = events
        .iter()
        .filter(|e| matches!(e.bomb_action.as_str(), "plant" | "defuse"))
        .filter(|e| matches!(e.player_team.as_deref(), Some(t) if t == first || t == second))
        .map(|e| e.bomb_site.as_str())
        .collect();

    let mut rows: Vec<BombSiteStats> = sites
        .into_iter()
        .map(|site| {
            BombSiteStats::new(
                site.to_owned(),
                count(&events, "plant", first, site),
                count(&events, "defuse", second, site),
                count(&events, "plant", second, site),
                count(&events, "defuse", first, site),
            )
        })
        .collect();

    let total = BombSiteStats::new(
        ALL_SITES.to_owned(),
        rows.iter().map(|r| r.first_plants).sum(),
        rows.iter().map(|r| r.second_defuses).sum(),
        rows.iter().map(|r| r.second_plants).sum(),
        rows.iter().map(|r| r.first_defuses).sum(),
    );
    rows.push(total);

    Ok(BombStats {
        first_team: first.to_owned(),
        second_team: second.to_owned(),
        sites: rows,
    })
}
