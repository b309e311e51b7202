//! Strips warmup, knife and restarted rounds from parser output.

use std::collections::HashSet;

use crate::tables::{Damage, Flash, Kill, MatchData, Round};

/// Keeps the rounds of the actual match and renumbers them starting at 1.
///
/// Rounds without a winning team are dropped. The match is considered to start
/// at the last 0:0 round before the first round that has a score, which skips
/// any restarts at the beginning of the demo. Returns the round number offset
/// that was subtracted together with the kept rounds.
pub fn clear_rounds(rounds: Vec<Round>) -> (u32, Vec<Round>) {
    let finished: Vec<Round> = rounds
        .into_iter()
        .filter(|r| r.winning_team.is_some())
        .collect();
    if finished.is_empty() {
        return (0, finished);
    }

    let first_scored = finished
        .iter()
        .position(|r| !(r.t_score == 0 && r.ct_score == 0));
    let start = match first_scored {
        Some(idx) => idx.saturating_sub(1),
        None => finished.len() - 1,
    };

    let offset = finished[start].round_num.saturating_sub(1);

    let mut kept: Vec<Round> = finished
        .into_iter()
        .skip(start)
        .map(|mut r| {
            r.round_num = r.round_num.saturating_sub(offset);
            r
        })
        .collect();
    kept.sort_by_key(|r| r.round_num);

    tracing::debug!(offset, rounds = kept.len(), "Cleared rounds");

    (offset, kept)
}

/// Shifts events by `offset` and drops the ones outside of `rounds`.
pub fn clear_data<E, F>(events: Vec<E>, offset: u32, rounds: &[Round], mut round_num: F) -> Vec<E>
where
    F: FnMut(&mut E) -> &mut u32,
{
    let kept: HashSet<u32> = rounds.iter().map(|r| r.round_num).collect();

    events
        .into_iter()
        .filter_map(|mut event| {
            let num = round_num(&mut event);
            *num = num.checked_sub(offset)?;
            kept.contains(num).then_some(event)
        })
        .collect()
}

impl MatchData {
    /// Applies [`clear_rounds`] and [`clear_data`] to every table, events
    /// without an attacker are removed from the tables that have one.
    pub fn cleaned(self) -> MatchData {
        let (offset, rounds) = clear_rounds(self.rounds);

        let kills: Vec<Kill> = self
            .kills
            .into_iter()
            .filter(|k| k.attacker_name.is_some())
            .collect();
        let damages: Vec<Damage> = self
            .damages
            .into_iter()
            .filter(|d| d.attacker_name.is_some())
            .collect();
        let flashes: Vec<Flash> = self
            .flashes
            .into_iter()
            .filter(|f| f.attacker_name.is_some())
            .collect();

        MatchData {
            map: self.map,
            kills: clear_data(kills, offset, &rounds, |k| &mut k.round_num),
            damages: clear_data(damages, offset, &rounds, |d| &mut d.round_num),
            flashes: clear_data(flashes, offset, &rounds, |f| &mut f.round_num),
            weapon_fires: clear_data(self.weapon_fires, offset, &rounds, |w| &mut w.round_num),
            grenades: clear_data(self.grenades, offset, &rounds, |g| &mut g.round_num),
            bomb_events: clear_data(self.bomb_events, offset, &rounds, |b| &mut b.round_num),
            rounds,
        }
    }
}
