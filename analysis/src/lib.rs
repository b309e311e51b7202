pub mod filter;
pub mod tables;
pub mod cleanup;

mod group;
pub mod players;

pub mod accuracy;
pub mod adr;
pub mod bomb;
pub mod economy;
pub mod flashes;
pub mod kast;
pub mod killstats;
pub mod rating;
pub mod utility;
pub mod weapons;
pub mod winbreakdown;

pub mod boxscore;

pub use filter::{FilterError, Filters, StatFilters};
pub use tables::{LoadError, MatchData};

/// Whether statistics are grouped per player name or per team name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Scope {
    #[default]
    Player,
    Team,
}

impl Scope {
    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Team => "Team",
        }
    }

    pub(crate) fn pick<'a>(self, name: Option<&'a str>, team: Option<&'a str>) -> Option<&'a str> {
        match self {
            Self::Player => name,
            Self::Team => team,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatsError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Bomb statistics need two teams, found {found}")]
    NotEnoughTeams { found: usize },
}
