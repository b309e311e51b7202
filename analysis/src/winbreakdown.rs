use std::collections::BTreeMap;

use crate::filter::StatFilters;
use crate::economy::Side;
use crate::tables::MatchData;
use crate::StatsError;

static REASONS: phf::Map<&'static str, (&'static str, Side)> = phf::phf_map! {
    "BombDefused" => ("CT Bomb Defusal Wins", Side::CT),
    "CTWin" => ("CT T Elim Wins", Side::CT),
    "TargetSaved" => ("CT Time Expired Wins", Side::CT),
    "TargetBombed" => ("T Bomb Detonation Wins", Side::T),
    "TerroristsWin" => ("T CT Elim Wins", Side::T),
};

/// Display label of a round end reason, unknown reasons are kept as they are.
pub fn reason_label(reason: &str) -> &str {
    REASONS.get(reason).map(|(label, _)| *label).unwrap_or(reason)
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WinBreakdown {
    pub team: String,
    /// Rounds won per labelled end reason.
    pub reasons: BTreeMap<String, usize>,
    #[serde(rename = "CT Wins")]
    pub ct_wins: usize,
    #[serde(rename = "T Wins")]
    pub t_wins: usize,
    #[serde(rename = "Score")]
    pub total: usize,
}

/// Rounds won per team and end reason, ordered by team name.
pub fn win_breakdown(data: &MatchData, filters: &StatFilters) -> Result<Vec<WinBreakdown>, StatsError> {
    let rounds = filters.round.apply(&data.rounds)?;

    let mut per_team: BTreeMap<&str, WinBreakdown> = BTreeMap::new();
    for round in rounds.iter() {
        let Some(team) = round.winning_team.as_deref() else {
            continue;
        };
        let row = per_team.entry(team).or_insert_with(|| WinBreakdown {
            team: team.to_owned(),
            ..Default::default()
        });

        *row.reasons
            .entry(reason_label(&round.round_end_reason).to_owned())
            .or_default() += 1;
        row.total += 1;

        let side = match REASONS.get(round.round_end_reason.as_str()) {
            Some((_, side)) => Some(*side),
            None => match round.winning_side.as_deref() {
                Some("CT") => Some(Side::CT),
                Some("T") => Some(Side::T),
                _ => None,
            },
        };
        match side {
            Some(Side::CT) => row.ct_wins += 1,
            Some(Side::T) => row.t_wins += 1,
            None => tracing::warn!(reason = %round.round_end_reason, "Round win without a side"),
        }
    }

    Ok(per_team.into_values().collect())
}
