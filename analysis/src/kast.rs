use std::collections::{BTreeMap, BTreeSet};

use crate::filter::StatFilters;
use crate::group::{percent, sort_desc};
use crate::tables::MatchData;
use crate::StatsError;

/// Which of Kill, Assist, Survived and Traded make a round count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KastLetters {
    pub kills: bool,
    pub assists: bool,
    pub survived: bool,
    pub traded: bool,
}

impl Default for KastLetters {
    fn default() -> Self {
        Self {
            kills: true,
            assists: true,
            survived: true,
            traded: true,
        }
    }
}

impl KastLetters {
    /// Column label, e.g. `KAST` or `KAS`.
    pub fn label(&self) -> String {
        [
            (self.kills, 'K'),
            (self.assists, 'A'),
            (self.survived, 'S'),
            (self.traded, 'T'),
        ]
        .into_iter()
        .filter_map(|(enabled, letter)| enabled.then_some(letter))
        .collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid KAST string \"{0}\", expected a combination of the letters K, A, S and T")]
pub struct InvalidKastString(pub String);

impl std::str::FromStr for KastLetters {
    type Err = InvalidKastString;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut letters = KastLetters {
            kills: false,
            assists: false,
            survived: false,
            traded: false,
        };
        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'K' => letters.kills = true,
                'A' => letters.assists = true,
                'S' => letters.survived = true,
                'T' => letters.traded = true,
                _ => return Err(InvalidKastString(s.to_owned())),
            }
        }
        if letters.label().is_empty() {
            return Err(InvalidKastString(s.to_owned()));
        }
        Ok(letters)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Kast {
    pub name: String,
    #[serde(rename = "KAST%")]
    pub kast: f64,
    #[serde(rename = "K")]
    pub kills: usize,
    #[serde(rename = "A")]
    pub assists: usize,
    #[serde(rename = "S")]
    pub survived: usize,
    #[serde(rename = "T")]
    pub traded: usize,
}

#[derive(Debug, Default)]
struct RoundParticipants<'d> {
    killers: Vec<&'d str>,
    assisters: Vec<&'d str>,
    victims: Vec<&'d str>,
    traded: Vec<&'d str>,
}

fn occurrences(names: &[&str], player: &str) -> usize {
    names.iter().filter(|n| **n == player).count()
}

/// Share of rounds in which a player had a kill, an assist, survived or was traded.
///
/// Only rounds with at least one kill are taken into account. Letters that are
/// not part of `letters` neither count towards the percentage nor are totalled.
pub fn kast(
    data: &MatchData,
    letters: KastLetters,
    flash_assists: bool,
    filters: &StatFilters,
) -> Result<Vec<Kast>, StatsError> {
    let kills = filters.kill.apply(&data.kills)?;

    let mut rounds: BTreeMap<u32, RoundParticipants<'_>> = BTreeMap::new();
    for kill in kills {
        let round = rounds.entry(kill.round_num).or_default();

        round.victims.push(kill.victim_name.as_str());

        if kill.is_enemy_kill() {
            if let Some(attacker) = kill.attacker_name.as_deref() {
                round.killers.push(attacker);
            }
            if kill.is_trade {
                if let Some(traded) = kill.player_traded_name.as_deref() {
                    round.traded.push(traded);
                }
            }
        }
        if kill.is_enemy_assist() {
            if let Some(assister) = kill.assister_name.as_deref() {
                round.assisters.push(assister);
            }
        }
        if flash_assists && kill.is_enemy_flash_assist() {
            if let Some(thrower) = kill.flash_thrower_name.as_deref() {
                round.assisters.push(thrower);
            }
        }
    }

    let players: BTreeSet<&str> = data
        .kills
        .iter()
        .flat_map(|k| [k.attacker_name.as_deref(), Some(k.victim_name.as_str())])
        .flatten()
        .collect();

    let mut rows: Vec<Kast> = players
        .into_iter()
        .map(|player| {
            let mut row = Kast {
                name: player.to_owned(),
                kast: 0.0,
                kills: 0,
                assists: 0,
                survived: 0,
                traded: 0,
            };

            let mut counted = 0;
            for round in rounds.values() {
                let k = occurrences(&round.killers, player);
                let a = occurrences(&round.assisters, player);
                let s = usize::from(!round.victims.contains(&player));
                let t = occurrences(&round.traded, player);

                let mut hit = false;
                if letters.kills {
                    row.kills += k;
                    hit |= k > 0;
                }
                if letters.assists {
                    row.assists += a;
                    hit |= a > 0;
                }
                if letters.survived {
                    row.survived += s;
                    hit |= s > 0;
                }
                if letters.traded {
                    row.traded += t;
                    hit |= t > 0;
                }
                if hit {
                    counted += 1;
                }
            }

            row.kast = percent(counted as f64, rounds.len() as f64);
            row
        })
        .collect();
    sort_desc(&mut rows, |r| r.kast);

    tracing::trace!(rounds = rounds.len(), players = rows.len(), "Calculated KAST");

    Ok(rows)
}
