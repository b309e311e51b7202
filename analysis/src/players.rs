use std::collections::HashMap;

use crate::filter::{FilterError, Filters};
use crate::tables::{Damage, MatchData, Round};
use crate::Scope;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerTeam {
    pub team: String,
    pub player: String,
}

/// Distinct (team, player) pairs of everyone that dealt damage, in order of appearance.
pub fn players_teams(damages: &[Damage]) -> Vec<PlayerTeam> {
    let mut pairs: Vec<PlayerTeam> = Vec::new();
    for damage in damages {
        let (Some(player), Some(team)) = (&damage.attacker_name, &damage.attacker_team) else {
            continue;
        };
        if pairs.iter().any(|p| &p.player == player && &p.team == team) {
            continue;
        }
        pairs.push(PlayerTeam {
            team: team.clone(),
            player: player.clone(),
        });
    }
    pairs
}

/// Rounds each team played on either side.
pub fn rounds_by_team(rounds: &[Round], filters: &Filters) -> Result<HashMap<String, usize>, FilterError> {
    let rounds = filters.apply(rounds)?;

    let mut played: HashMap<String, usize> = HashMap::new();
    for round in rounds {
        for team in [round.ct_team.as_deref(), round.t_team.as_deref()].into_iter().flatten() {
            *played.entry(team.to_owned()).or_default() += 1;
        }
    }
    Ok(played)
}

/// Rounds each player played, taken from the rounds of their team(s).
pub fn rounds_by_player(
    rounds: &[Round],
    teams: &[PlayerTeam],
    filters: &Filters,
) -> Result<HashMap<String, usize>, FilterError> {
    let by_team = rounds_by_team(rounds, filters)?;

    let mut played: HashMap<String, usize> = HashMap::new();
    for pt in teams {
        *played.entry(pt.player.clone()).or_default() += by_team.get(&pt.team).copied().unwrap_or(0);
    }
    Ok(played)
}

pub fn rounds_count(rounds: &[Round], filters: &Filters) -> Result<usize, FilterError> {
    Ok(filters.apply(rounds)?.len())
}

pub(crate) fn rounds_played(
    data: &MatchData,
    scope: Scope,
    filters: &Filters,
) -> Result<HashMap<String, usize>, FilterError> {
    match scope {
        Scope::Player => rounds_by_player(&data.rounds, &players_teams(&data.damages), filters),
        Scope::Team => rounds_by_team(&data.rounds, filters),
    }
}
