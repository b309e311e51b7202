use std::collections::{BTreeMap, BTreeSet};

use crate::filter::StatFilters;
use crate::tables::{MatchData, Round};
use crate::StatsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Side {
    CT,
    T,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Self::CT => "CT",
            Self::T => "T",
        }
    }

    fn team(self, round: &Round) -> Option<&str> {
        match self {
            Self::CT => round.ct_team.as_deref(),
            Self::T => round.t_team.as_deref(),
        }
    }

    fn buy_type(self, round: &Round) -> &str {
        match self {
            Self::CT => &round.ct_buy_type,
            Self::T => &round.t_buy_type,
        }
    }

    /// Equipment value, start money and spend of this side in `round`.
    fn money(self, round: &Round) -> [f64; 3] {
        match self {
            Self::CT => [round.ct_start_eq_val, round.ct_round_start_money, round.ct_spend],
            Self::T => [round.t_start_eq_val, round.t_round_start_money, round.t_spend],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EconStats {
    pub team: String,
    pub side: Side,
    pub rounds: usize,
    /// Rounds per buy type, every buy type seen on any side is present.
    pub buy_types: BTreeMap<String, usize>,
    #[serde(rename = "Avg EQ Value")]
    pub avg_eq_value: i64,
    #[serde(rename = "Avg Cash")]
    pub avg_cash: i64,
    #[serde(rename = "Avg Spend")]
    pub avg_spend: i64,
}

impl EconStats {
    /// Row label like `Team CT`.
    pub fn label(&self) -> String {
        format!("{} {}", self.team, self.side.label())
    }
}

/// Buy types and average money per team and side, all CT rows before the T rows.
pub fn econ_stats(data: &MatchData, filters: &StatFilters) -> Result<Vec<EconStats>, StatsError> {
    let rounds = filters.round.apply(&data.rounds)?;

    let all_buy_types: BTreeSet<&str> = rounds
        .iter()
        .filter(|r| r.ct_team.is_some())
        .map(|r| r.ct_buy_type.as_str())
        .chain(
            rounds
                .iter()
                .filter(|r| r.t_team.is_some())
                .map(|r| r.t_buy_type.as_str()),
        )
        .collect();

    let mut rows = Vec::new();
    for side in [Side::CT, Side::T] {
        let mut per_team: BTreeMap<&str, (usize, BTreeMap<String, usize>, [f64; 3])> = BTreeMap::new();
        for round in rounds.iter() {
            let Some(team) = side.team(round) else {
                continue;
            };
            let entry = per_team.entry(team).or_insert_with(|| {
                let buys = all_buy_types.iter().map(|b| (b.to_string(), 0)).collect();
                (0, buys, [0.0; 3])
            });
            entry.0 += 1;
            *entry.1.entry(side.buy_type(round).to_owned()).or_default() += 1;
            for (sum, value) in entry.2.iter_mut().zip(side.money(round)) {
                *sum += value;
            }
        }

        rows.extend(per_team.into_iter().map(|(team, (played, buy_types, sums))| {
            let [eq, cash, spend] = sums.map(|s| (s / played as f64) as i64);
            EconStats {
                team: team.to_owned(),
                side,
                rounds: played,
                buy_types,
                avg_eq_value: eq,
                avg_cash: cash,
                avg_spend: spend,
            }
        }));
    }

    Ok(rows)
}
