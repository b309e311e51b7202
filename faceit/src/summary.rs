use tabled::Tabled;

use crate::api::{ApiError, Client};
use crate::models::{MatchStats, PlayerStats};
use crate::render::float2;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub player_id: String,
    pub nickname: String,
    /// Statistics per played map, labelled with the match id.
    pub maps: Vec<(String, PlayerStats)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChampionshipSummary {
    /// Players in the order they first appeared.
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, Tabled)]
pub struct MeanStats {
    #[tabled(rename = "Player")]
    pub nickname: String,
    #[tabled(rename = "Matches")]
    pub matches: usize,
    #[tabled(rename = "K")]
    pub kills: u32,
    #[tabled(rename = "A")]
    pub assists: u32,
    #[tabled(rename = "D")]
    pub deaths: u32,
    #[tabled(rename = "HS%", display_with = "float2")]
    pub headshots: f64,
    #[tabled(rename = "MVPs")]
    pub mvps: u32,
    #[tabled(rename = "Wins")]
    pub result: u32,
    #[tabled(rename = "3K")]
    pub triple: u32,
    #[tabled(rename = "4K")]
    pub quadro: u32,
    #[tabled(rename = "5K")]
    pub penta: u32,
    #[tabled(rename = "K/D", display_with = "float2")]
    pub kd: f64,
    #[tabled(rename = "K/R", display_with = "float2")]
    pub kr: f64,
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

impl PlayerSummary {
    pub fn mean_stats(&self) -> MeanStats {
        let stats = || self.maps.iter().map(|(_, s)| s);
        let count = self.maps.len();

        MeanStats {
            nickname: self.nickname.clone(),
            matches: count,
            kills: stats().map(|s| s.kills).sum(),
            assists: stats().map(|s| s.assists).sum(),
            deaths: stats().map(|s| s.deaths).sum(),
            headshots: mean(stats().map(|s| s.headshots), count),
            mvps: stats().map(|s| s.mvps).sum(),
            result: stats().map(|s| s.result).sum(),
            triple: stats().map(|s| s.triple).sum(),
            quadro: stats().map(|s| s.quadro).sum(),
            penta: stats().map(|s| s.penta).sum(),
            kd: mean(stats().map(|s| s.kd), count),
            kr: mean(stats().map(|s| s.kr), count),
        }
    }
}

impl ChampionshipSummary {
    /// Records the statistics of every map of the match.
    pub fn add_match(&mut self, match_id: &str, stats: &MatchStats) {
        for map in &stats.rounds {
            for player in map.teams.iter().flat_map(|t| t.players.iter()) {
                let index = match self.players.iter().position(|p| p.player_id == player.player_id) {
                    Some(index) => index,
                    None => {
                        self.players.push(PlayerSummary {
                            player_id: player.player_id.clone(),
                            nickname: player.nickname.clone(),
                            maps: Vec::new(),
                        });
                        self.players.len() - 1
                    }
                };

                self.players[index]
                    .maps
                    .push((match_id.to_owned(), player.player_stats.clone()));
            }
        }
    }

    /// Mean statistics of every player, most matches first.
    pub fn mean_stats(&self) -> Vec<MeanStats> {
        let mut means: Vec<MeanStats> = self.players.iter().map(PlayerSummary::mean_stats).collect();
        means.sort_by(|a, b| b.matches.cmp(&a.matches));
        means
    }
}

#[tracing::instrument(skip(client))]
pub async fn summarize_championship(client: &Client, championship: &str) -> Result<ChampionshipSummary, ApiError> {
    let mut summary = ChampionshipSummary::default();

    for m in client.championship_matches(championship).await? {
        tracing::info!(match_id = %m.match_id, title = %m.title(), url = %m.faceit_url, "Analyzing match");

        match client.match_stats(&m.match_id).await? {
            Some(stats) => summary.add_match(&m.match_id, &stats),
            None => tracing::warn!(match_id = %m.match_id, "Match has no statistics"),
        }
    }

    Ok(summary)
}
