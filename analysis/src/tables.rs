use serde::{Deserialize, Serialize};

use crate::filter::columns;
use crate::group::opponents;
use crate::Scope;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_num: u32,
    #[serde(default)]
    pub winning_team: Option<String>,
    #[serde(default)]
    pub winning_side: Option<String>,
    #[serde(default)]
    pub round_end_reason: String,
    #[serde(default)]
    pub t_score: u32,
    #[serde(default)]
    pub ct_score: u32,
    #[serde(default)]
    pub ct_team: Option<String>,
    #[serde(default)]
    pub t_team: Option<String>,
    #[serde(default, rename = "ctStartEqVal", alias = "ctRoundStartEqVal")]
    pub ct_start_eq_val: f64,
    #[serde(default)]
    pub ct_round_start_money: f64,
    #[serde(default, rename = "ctSpend", alias = "ctRoundSpendMoney")]
    pub ct_spend: f64,
    #[serde(default, rename = "tStartEqVal", alias = "tRoundStartEqVal")]
    pub t_start_eq_val: f64,
    #[serde(default)]
    pub t_round_start_money: f64,
    #[serde(default, rename = "tSpend", alias = "tRoundSpendMoney")]
    pub t_spend: f64,
    #[serde(default)]
    pub ct_buy_type: String,
    #[serde(default)]
    pub t_buy_type: String,
}

columns!(Round {
    "roundNum" => round_num: u32,
    "winningTeam" => winning_team: Option<String>,
    "winningSide" => winning_side: Option<String>,
    "roundEndReason" => round_end_reason: String,
    "tScore" => t_score: u32,
    "ctScore" => ct_score: u32,
    "ctTeam" => ct_team: Option<String>,
    "tTeam" => t_team: Option<String>,
    "ctStartEqVal" => ct_start_eq_val: f64,
    "ctRoundStartMoney" => ct_round_start_money: f64,
    "ctSpend" => ct_spend: f64,
    "tStartEqVal" => t_start_eq_val: f64,
    "tRoundStartMoney" => t_round_start_money: f64,
    "tSpend" => t_spend: f64,
    "ctBuyType" => ct_buy_type: String,
    "tBuyType" => t_buy_type: String,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    #[serde(default)]
    pub round_num: u32,
    #[serde(default)]
    pub attacker_name: Option<String>,
    #[serde(default)]
    pub attacker_team: Option<String>,
    #[serde(default)]
    pub attacker_side: Option<String>,
    pub victim_name: String,
    #[serde(default)]
    pub victim_team: Option<String>,
    #[serde(default)]
    pub victim_side: Option<String>,
    #[serde(default)]
    pub assister_name: Option<String>,
    #[serde(default)]
    pub assister_team: Option<String>,
    #[serde(default)]
    pub flash_thrower_name: Option<String>,
    #[serde(default)]
    pub flash_thrower_team: Option<String>,
    #[serde(default)]
    pub is_trade: bool,
    #[serde(default)]
    pub player_traded_name: Option<String>,
    #[serde(default)]
    pub is_first_kill: bool,
    #[serde(default)]
    pub is_headshot: bool,
    #[serde(default)]
    pub weapon: String,
}

columns!(Kill {
    "roundNum" => round_num: u32,
    "attackerName" => attacker_name: Option<String>,
    "attackerTeam" => attacker_team: Option<String>,
    "attackerSide" => attacker_side: Option<String>,
    "victimName" => victim_name: String,
    "victimTeam" => victim_team: Option<String>,
    "victimSide" => victim_side: Option<String>,
    "assisterName" => assister_name: Option<String>,
    "assisterTeam" => assister_team: Option<String>,
    "flashThrowerName" => flash_thrower_name: Option<String>,
    "flashThrowerTeam" => flash_thrower_team: Option<String>,
    "isTrade" => is_trade: bool,
    "playerTradedName" => player_traded_name: Option<String>,
    "isFirstKill" => is_first_kill: bool,
    "isHeadshot" => is_headshot: bool,
    "weapon" => weapon: String,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    #[serde(default)]
    pub round_num: u32,
    #[serde(default)]
    pub attacker_name: Option<String>,
    #[serde(default)]
    pub attacker_team: Option<String>,
    #[serde(default)]
    pub attacker_side: Option<String>,
    pub victim_name: String,
    #[serde(default)]
    pub victim_team: Option<String>,
    #[serde(default)]
    pub victim_side: Option<String>,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub hit_group: String,
    #[serde(default)]
    pub hp_damage: i64,
    #[serde(default)]
    pub hp_damage_taken: i64,
}

columns!(Damage {
    "roundNum" => round_num: u32,
    "attackerName" => attacker_name: Option<String>,
    "attackerTeam" => attacker_team: Option<String>,
    "attackerSide" => attacker_side: Option<String>,
    "victimName" => victim_name: String,
    "victimTeam" => victim_team: Option<String>,
    "victimSide" => victim_side: Option<String>,
    "weapon" => weapon: String,
    "hitGroup" => hit_group: String,
    "hpDamage" => hp_damage: i64,
    "hpDamageTaken" => hp_damage_taken: i64,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flash {
    #[serde(default)]
    pub round_num: u32,
    #[serde(default)]
    pub attacker_name: Option<String>,
    #[serde(default)]
    pub attacker_team: Option<String>,
    pub player_name: String,
    #[serde(default)]
    pub player_team: Option<String>,
    #[serde(default)]
    pub flash_duration: Option<f64>,
}

columns!(Flash {
    "roundNum" => round_num: u32,
    "attackerName" => attacker_name: Option<String>,
    "attackerTeam" => attacker_team: Option<String>,
    "playerName" => player_name: String,
    "playerTeam" => player_team: Option<String>,
    "flashDuration" => flash_duration: Option<f64>,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponFire {
    #[serde(default)]
    pub round_num: u32,
    pub player_name: String,
    #[serde(default)]
    pub player_team: Option<String>,
    #[serde(default)]
    pub player_side: Option<String>,
    #[serde(default)]
    pub player_strafe: bool,
    #[serde(default)]
    pub weapon: String,
}

columns!(WeaponFire {
    "roundNum" => round_num: u32,
    "playerName" => player_name: String,
    "playerTeam" => player_team: Option<String>,
    "playerSide" => player_side: Option<String>,
    "playerStrafe" => player_strafe: bool,
    "weapon" => weapon: String,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grenade {
    #[serde(default)]
    pub round_num: u32,
    pub thrower_name: String,
    #[serde(default)]
    pub thrower_team: Option<String>,
    #[serde(default)]
    pub thrower_side: Option<String>,
    #[serde(default)]
    pub grenade_type: String,
}

columns!(Grenade {
    "roundNum" => round_num: u32,
    "throwerName" => thrower_name: String,
    "throwerTeam" => thrower_team: Option<String>,
    "throwerSide" => thrower_side: Option<String>,
    "grenadeType" => grenade_type: String,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombEvent {
    #[serde(default)]
    pub round_num: u32,
    pub player_name: String,
    #[serde(default)]
    pub player_team: Option<String>,
    #[serde(default)]
    pub bomb_action: String,
    #[serde(default)]
    pub bomb_site: String,
}

columns!(BombEvent {
    "roundNum" => round_num: u32,
    "playerName" => player_name: String,
    "playerTeam" => player_team: Option<String>,
    "bombAction" => bomb_action: String,
    "bombSite" => bomb_site: String,
});

impl Kill {
    pub(crate) fn attacker(&self, scope: Scope) -> Option<&str> {
        scope.pick(self.attacker_name.as_deref(), self.attacker_team.as_deref())
    }

    pub(crate) fn victim(&self, scope: Scope) -> Option<&str> {
        scope.pick(Some(self.victim_name.as_str()), self.victim_team.as_deref())
    }

    pub(crate) fn assister(&self, scope: Scope) -> Option<&str> {
        scope.pick(self.assister_name.as_deref(), self.assister_team.as_deref())
    }

    pub(crate) fn flash_thrower(&self, scope: Scope) -> Option<&str> {
        scope.pick(self.flash_thrower_name.as_deref(), self.flash_thrower_team.as_deref())
    }

    /// Killer and victim are on different teams.
    pub(crate) fn is_enemy_kill(&self) -> bool {
        opponents(self.attacker_team.as_deref(), self.victim_team.as_deref())
    }

    pub(crate) fn is_enemy_assist(&self) -> bool {
        opponents(self.assister_team.as_deref(), self.victim_team.as_deref())
    }

    pub(crate) fn is_enemy_flash_assist(&self) -> bool {
        opponents(self.flash_thrower_team.as_deref(), self.victim_team.as_deref())
    }
}

impl Damage {
    pub(crate) fn attacker(&self, scope: Scope) -> Option<&str> {
        scope.pick(self.attacker_name.as_deref(), self.attacker_team.as_deref())
    }

    pub(crate) fn is_enemy_damage(&self) -> bool {
        opponents(self.attacker_team.as_deref(), self.victim_team.as_deref())
    }
}

impl Flash {
    pub(crate) fn attacker(&self, scope: Scope) -> Option<&str> {
        scope.pick(self.attacker_name.as_deref(), self.attacker_team.as_deref())
    }

    pub(crate) fn is_enemy_flash(&self) -> bool {
        opponents(self.attacker_team.as_deref(), self.player_team.as_deref())
    }
}

impl WeaponFire {
    pub(crate) fn shooter(&self, scope: Scope) -> Option<&str> {
        scope.pick(Some(self.player_name.as_str()), self.player_team.as_deref())
    }
}

impl Grenade {
    pub(crate) fn thrower(&self, scope: Scope) -> Option<&str> {
        scope.pick(Some(self.thrower_name.as_str()), self.thrower_team.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Reading parsed demo: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decoding parsed demo: {0}")]
    Json(#[from] serde_json::Error),
}

/// Layout of the JSON document the demo parser writes next to a demo.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedMatch {
    #[serde(default)]
    map_name: Option<String>,
    #[serde(default)]
    game_rounds: Option<Vec<ParsedRound>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedRound {
    #[serde(flatten)]
    round: Round,
    #[serde(default)]
    kills: Option<Vec<Kill>>,
    #[serde(default)]
    damages: Option<Vec<Damage>>,
    #[serde(default)]
    flashes: Option<Vec<Flash>>,
    #[serde(default)]
    weapon_fires: Option<Vec<WeaponFire>>,
    #[serde(default)]
    grenades: Option<Vec<Grenade>>,
    #[serde(default)]
    bomb_events: Option<Vec<BombEvent>>,
}

macro_rules! numbered {
    ($events:expr, $round_num:expr) => {
        $events.unwrap_or_default().into_iter().map(move |mut event| {
            event.round_num = $round_num;
            event
        })
    };
}

/// The tables extracted from one or more parsed demos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
    pub map: Option<String>,
    pub rounds: Vec<Round>,
    pub kills: Vec<Kill>,
    pub damages: Vec<Damage>,
    pub flashes: Vec<Flash>,
    pub weapon_fires: Vec<WeaponFire>,
    pub grenades: Vec<Grenade>,
    pub bomb_events: Vec<BombEvent>,
}

impl MatchData {
    /// Decodes the parser output, attaching each event to the round it was nested in.
    pub fn from_parser_json(buf: &[u8]) -> Result<Self, LoadError> {
        let parsed: ParsedMatch = serde_json::from_slice(buf)?;

        let mut data = MatchData {
            map: parsed.map_name,
            ..Default::default()
        };
        for parsed_round in parsed.game_rounds.unwrap_or_default() {
            let round_num = parsed_round.round.round_num;

            data.kills.extend(numbered!(parsed_round.kills, round_num));
            data.damages.extend(numbered!(parsed_round.damages, round_num));
            data.flashes.extend(numbered!(parsed_round.flashes, round_num));
            data.weapon_fires
                .extend(numbered!(parsed_round.weapon_fires, round_num));
            data.grenades.extend(numbered!(parsed_round.grenades, round_num));
            data.bomb_events
                .extend(numbered!(parsed_round.bomb_events, round_num));
            data.rounds.push(parsed_round.round);
        }

        tracing::debug!(
            rounds = data.rounds.len(),
            kills = data.kills.len(),
            damages = data.damages.len(),
            "Loaded parsed demo"
        );

        Ok(data)
    }

    #[tracing::instrument]
    pub fn load(path: &std::path::Path) -> Result<Self, LoadError> {
        let content = std::fs::read(path)?;
        Self::from_parser_json(&content)
    }

    /// Appends every table of `other`, used to aggregate several demos.
    ///
    /// Round numbers are kept as they are, so statistics that group by round
    /// (KAST) treat round `n` of every demo as one round.
    pub fn concat(mut self, other: MatchData) -> MatchData {
        if self.map != other.map {
            self.map = None;
        }
        self.rounds.extend(other.rounds);
        self.kills.extend(other.kills);
        self.damages.extend(other.damages);
        self.flashes.extend(other.flashes);
        self.weapon_fires.extend(other.weapon_fires);
        self.grenades.extend(other.grenades);
        self.bomb_events.extend(other.bomb_events);
        self
    }

    pub fn player_box_score(&self) -> Result<Vec<crate::boxscore::PlayerBoxScore>, crate::StatsError> {
        crate::boxscore::player_box_score(self, &crate::filter::StatFilters::default())
    }
}
