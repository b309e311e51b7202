use std::collections::BTreeMap;

use crate::filter::StatFilters;
use crate::group::sort_desc;
use crate::tables::MatchData;
use crate::{Scope, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum WeaponClass {
    Melee,
    Pistol,
    Shotgun,
    SMG,
    AssaultRifle,
    MachineGun,
    SniperRifle,
    Utility,
}

static WEAPON_CLASSES: phf::Map<&'static str, WeaponClass> = phf::phf_map! {
    "Knife" => WeaponClass::Melee,
    "CZ-75 Auto" => WeaponClass::Pistol,
    "Desert Eagle" => WeaponClass::Pistol,
    "Dual Berettas" => WeaponClass::Pistol,
    "Five-SeveN" => WeaponClass::Pistol,
    "Glock-18" => WeaponClass::Pistol,
    "P2000" => WeaponClass::Pistol,
    "P250" => WeaponClass::Pistol,
    "R8 Revolver" => WeaponClass::Pistol,
    "Tec-9" => WeaponClass::Pistol,
    "USP-S" => WeaponClass::Pistol,
    "MAG-7" => WeaponClass::Shotgun,
    "Nova" => WeaponClass::Shotgun,
    "Sawed-Off" => WeaponClass::Shotgun,
    "XM1014" => WeaponClass::Shotgun,
    "MAC-10" => WeaponClass::SMG,
    "MP5-SD" => WeaponClass::SMG,
    "MP7" => WeaponClass::SMG,
    "MP9" => WeaponClass::SMG,
    "P90" => WeaponClass::SMG,
    "PP-Bizon" => WeaponClass::SMG,
    "UMP-45" => WeaponClass::SMG,
    "AK-47" => WeaponClass::AssaultRifle,
    "AUG" => WeaponClass::AssaultRifle,
    "FAMAS" => WeaponClass::AssaultRifle,
    "Galil AR" => WeaponClass::AssaultRifle,
    "M4A1-S" => WeaponClass::AssaultRifle,
    "M4A4" => WeaponClass::AssaultRifle,
    "SG 553" => WeaponClass::AssaultRifle,
    "M249" => WeaponClass::MachineGun,
    "Negev" => WeaponClass::MachineGun,
    "AWP" => WeaponClass::SniperRifle,
    "G3SG1" => WeaponClass::SniperRifle,
    "SCAR-20" => WeaponClass::SniperRifle,
    "SSG 08" => WeaponClass::SniperRifle,
};

impl WeaponClass {
    /// Everything that is not a gun or the knife counts as utility.
    pub fn of(weapon: &str) -> Self {
        WEAPON_CLASSES.get(weapon).copied().unwrap_or(Self::Utility)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Melee => "Melee Kills",
            Self::Pistol => "Pistol Kills",
            Self::Shotgun => "Shotgun Kills",
            Self::SMG => "SMG Kills",
            Self::AssaultRifle => "Assault Rifle Kills",
            Self::MachineGun => "Machine Gun Kills",
            Self::SniperRifle => "Sniper Rifle Kills",
            Self::Utility => "Utility Kills",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KillBreakdown {
    pub name: String,
    #[serde(rename = "Melee Kills")]
    pub melee: usize,
    #[serde(rename = "Pistol Kills")]
    pub pistol: usize,
    #[serde(rename = "Shotgun Kills")]
    pub shotgun: usize,
    #[serde(rename = "SMG Kills")]
    pub smg: usize,
    #[serde(rename = "Assault Rifle Kills")]
    pub assault_rifle: usize,
    #[serde(rename = "Machine Gun Kills")]
    pub machine_gun: usize,
    #[serde(rename = "Sniper Rifle Kills")]
    pub sniper_rifle: usize,
    #[serde(rename = "Utility Kills")]
    pub utility: usize,
    #[serde(rename = "Total Kills")]
    pub total: usize,
}

impl KillBreakdown {
    fn count(&mut self, class: WeaponClass) {
        let slot = match class {
            WeaponClass::Melee => &mut self.melee,
            WeaponClass::Pistol => &mut self.pistol,
            WeaponClass::Shotgun => &mut self.shotgun,
            WeaponClass::SMG => &mut self.smg,
            WeaponClass::AssaultRifle => &mut self.assault_rifle,
            WeaponClass::MachineGun => &mut self.machine_gun,
            WeaponClass::SniperRifle => &mut self.sniper_rifle,
            WeaponClass::Utility => &mut self.utility,
        };
        *slot += 1;
        self.total += 1;
    }
}

/// Kills on opponents per weapon class, sorted by total kills.
pub fn kill_breakdown(data: &MatchData, scope: Scope, filters: &StatFilters) -> Result<Vec<KillBreakdown>, StatsError> {
    let kills = filters.kill.apply(&data.kills)?;

    let mut per_name: BTreeMap<&str, KillBreakdown> = BTreeMap::new();
    for kill in kills.iter().filter(|k| k.is_enemy_kill()) {
        let Some(name) = kill.attacker(scope) else {
            continue;
        };
        per_name
            .entry(name)
            .or_insert_with(|| KillBreakdown {
                name: name.to_owned(),
                ..Default::default()
            })
            .count(WeaponClass::of(&kill.weapon));
    }

    let mut rows: Vec<KillBreakdown> = per_name.into_values().collect();
    sort_desc(&mut rows, |r| r.total as f64);

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(WeaponClass::Melee, WeaponClass::of("Knife"));
        assert_eq!(WeaponClass::SniperRifle, WeaponClass::of("SSG 08"));
        assert_eq!(WeaponClass::AssaultRifle, WeaponClass::of("M4A1-S"));
        assert_eq!(WeaponClass::Utility, WeaponClass::of("HE Grenade"));
        assert_eq!(WeaponClass::Utility, WeaponClass::of("Zeus x27"));
    }
}
