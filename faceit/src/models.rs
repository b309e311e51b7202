//! Domain types built from the Faceit API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{deserialize_number_from_string, deserialize_option_number_from_string};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub nickname: String,
    #[serde(
        default,
        alias = "game_skill_level",
        deserialize_with = "deserialize_option_number_from_string"
    )]
    pub skill_level: Option<u32>,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id
    }
}

impl Eq for Player {}

impl std::hash::Hash for Player {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.player_id.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn contains(&self, player: &Player) -> bool {
        self.players.iter().any(|p| p == player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Faction1,
    Faction2,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    #[serde(alias = "nickname")]
    name: String,
    #[serde(default, alias = "roster")]
    players: Vec<Player>,
}

impl From<RawTeam> for Team {
    fn from(raw: RawTeam) -> Self {
        Self {
            name: raw.name,
            players: raw.players,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTeams {
    faction1: RawTeam,
    faction2: RawTeam,
}

#[derive(Debug, Deserialize)]
struct RawResults {
    #[serde(default)]
    winner: Option<Faction>,
}

fn from_unix(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds.and_then(|s| DateTime::from_timestamp(s, 0))
}

/// A game from the match history of a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawGame")]
pub struct Game {
    pub match_id: String,
    pub team_a: Team,
    pub team_b: Team,
    pub winner: Option<Faction>,
    pub mode: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    match_id: String,
    teams: RawTeams,
    #[serde(default)]
    results: Option<RawResults>,
    #[serde(default)]
    game_mode: String,
    #[serde(default)]
    started_at: Option<i64>,
}

impl From<RawGame> for Game {
    fn from(raw: RawGame) -> Self {
        Self {
            match_id: raw.match_id,
            team_a: raw.teams.faction1.into(),
            team_b: raw.teams.faction2.into(),
            winner: raw.results.and_then(|r| r.winner),
            mode: raw.game_mode,
            date: from_unix(raw.started_at),
        }
    }
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.match_id == other.match_id
    }
}

impl Game {
    pub fn winner_team(&self) -> Option<&Team> {
        match self.winner? {
            Faction::Faction1 => Some(&self.team_a),
            Faction::Faction2 => Some(&self.team_b),
        }
    }

    pub fn is_player_win(&self, player: &Player) -> bool {
        self.winner_team().is_some_and(|team| team.contains(player))
    }
}

/// One entry of the per player statistics of the stats API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    #[serde(rename = "nickname")]
    pub name: String,
    #[serde(rename = "i5", default)]
    pub team: String,
    #[serde(rename = "i1", default)]
    pub map_name: String,
    #[serde(rename = "i12", default, deserialize_with = "deserialize_option_number_from_string")]
    pub rounds: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub elo: Option<i64>,
    #[serde(rename = "gameMode", default)]
    pub mode: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,
}

/// A championship match, played or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawMatch")]
pub struct Match {
    pub match_id: String,
    pub team_a: Team,
    pub team_b: Team,
    pub map: Option<String>,
    pub faceit_url: String,
    pub demo_url: Option<String>,
    pub winner: Option<Faction>,
    pub date: Option<DateTime<Utc>>,
    pub calculate_elo: bool,
    pub is_played: bool,
}

#[derive(Debug, Deserialize)]
struct RawVoting {
    #[serde(default)]
    map: Option<RawPick>,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    #[serde(default)]
    pick: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    match_id: String,
    teams: RawTeams,
    #[serde(default)]
    faceit_url: String,
    #[serde(default)]
    demo_url: Option<Vec<String>>,
    #[serde(default)]
    voting: Option<RawVoting>,
    #[serde(default)]
    results: Option<RawResults>,
    #[serde(default)]
    calculate_elo: bool,
    #[serde(default)]
    started_at: Option<i64>,
}

impl From<RawMatch> for Match {
    fn from(raw: RawMatch) -> Self {
        let demo_url = raw.demo_url.and_then(|urls| urls.into_iter().next());
        let is_played = demo_url.is_some();

        Self {
            match_id: raw.match_id,
            team_a: raw.teams.faction1.into(),
            team_b: raw.teams.faction2.into(),
            map: raw
                .voting
                .and_then(|v| v.map)
                .and_then(|m| m.pick.into_iter().next()),
            faceit_url: raw.faceit_url.replace("{lang}", "en"),
            demo_url,
            winner: raw.results.and_then(|r| r.winner),
            date: if is_played { from_unix(raw.started_at) } else { None },
            calculate_elo: raw.calculate_elo,
            is_played,
        }
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.match_id == other.match_id
    }
}

impl Match {
    /// `Team A vs Team B`
    pub fn title(&self) -> String {
        format!("{} vs {}", self.team_a.name, self.team_b.name)
    }
}

/// The per player numbers of one map, Faceit sends all of them as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(rename = "Kills", deserialize_with = "deserialize_number_from_string")]
    pub kills: u32,
    #[serde(rename = "Assists", deserialize_with = "deserialize_number_from_string")]
    pub assists: u32,
    #[serde(rename = "Deaths", deserialize_with = "deserialize_number_from_string")]
    pub deaths: u32,
    #[serde(rename = "Headshots %", deserialize_with = "deserialize_number_from_string")]
    pub headshots: f64,
    #[serde(rename = "MVPs", deserialize_with = "deserialize_number_from_string")]
    pub mvps: u32,
    #[serde(rename = "Result", deserialize_with = "deserialize_number_from_string")]
    pub result: u32,
    #[serde(rename = "Triple Kills", deserialize_with = "deserialize_number_from_string")]
    pub triple: u32,
    #[serde(rename = "Quadro Kills", deserialize_with = "deserialize_number_from_string")]
    pub quadro: u32,
    #[serde(rename = "Penta Kills", deserialize_with = "deserialize_number_from_string")]
    pub penta: u32,
    #[serde(rename = "K/D Ratio", deserialize_with = "deserialize_number_from_string")]
    pub kd: f64,
    #[serde(rename = "K/R Ratio", deserialize_with = "deserialize_number_from_string")]
    pub kr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub player_id: String,
    pub nickname: String,
    pub player_stats: PlayerStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchStats {
    #[serde(default)]
    pub team_id: String,
    pub players: Vec<PlayerMatchStats>,
}

/// Statistics of one map of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    #[serde(default)]
    pub match_id: String,
    pub teams: Vec<TeamMatchStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub rounds: Vec<MapStats>,
}
