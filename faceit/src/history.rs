//! Score and Elo progressions of a single player.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::models::{Game, Player, Statistic};

pub const START_SCORE: i64 = 1000;
pub const SCORE_STEP: i64 = 25;
const MATCHMAKING: &str = "5v5";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScorePoint {
    pub index: usize,
    pub date: Option<DateTime<Utc>>,
    pub score: i64,
}

/// Running totals of `deltas`, the first point is `start` itself.
pub fn score_history<I>(start: i64, deltas: I) -> Vec<ScorePoint>
where
    I: IntoIterator<Item = (Option<DateTime<Utc>>, i64)>,
{
    let mut points = vec![ScorePoint {
        index: 0,
        date: None,
        score: start,
    }];

    let mut score = start;
    for (index, (date, delta)) in deltas.into_iter().enumerate() {
        score += delta;
        points.push(ScorePoint {
            index: index + 1,
            date,
            score,
        });
    }

    points
}

/// A fake rating over the matchmaking games of the player, +25 for every win and -25 for every loss.
pub fn win_history(games: &[Game], player: &Player) -> Vec<ScorePoint> {
    let mut played: Vec<&Game> = games.iter().filter(|g| g.mode == MATCHMAKING).collect();
    played.sort_by_key(|g| (g.date.is_none(), g.date));

    score_history(
        START_SCORE,
        played.into_iter().map(|g| {
            let delta = if g.is_player_win(player) {
                SCORE_STEP
            } else {
                -SCORE_STEP
            };
            (g.date, delta)
        }),
    )
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EloPoint {
    pub index: usize,
    pub date: Option<DateTime<Utc>>,
    pub elo: Option<i64>,
}

/// The Elo after every game, oldest first and undated games last.
pub fn elo_history(statistics: &[Statistic]) -> Vec<EloPoint> {
    let mut sorted: Vec<&Statistic> = statistics.iter().collect();
    sorted.sort_by_key(|s| (s.date.is_none(), s.date));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, s)| EloPoint {
            index,
            date: s.date,
            elo: s.elo,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HistoryView {
    Index,
    #[default]
    Date,
    /// Mean Elo per calendar month.
    Month,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ViewPoint {
    pub label: String,
    pub elo: Option<f64>,
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))?.pred_opt()
}

pub fn elo_view(history: &[EloPoint], view: HistoryView) -> Vec<ViewPoint> {
    match view {
        HistoryView::Index => history
            .iter()
            .map(|p| ViewPoint {
                label: p.index.to_string(),
                elo: p.elo.map(|e| e as f64),
            })
            .collect(),
        HistoryView::Date => history
            .iter()
            .map(|p| ViewPoint {
                label: p
                    .date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                elo: p.elo.map(|e| e as f64),
            })
            .collect(),
        HistoryView::Month => {
            let mut months: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
            for p in history {
                let Some(end) = p.date.and_then(|d| month_end(d.date_naive())) else {
                    continue;
                };
                let entry = months.entry(end).or_default();
                if let Some(elo) = p.elo {
                    entry.0 += elo;
                    entry.1 += 1;
                }
            }

            months
                .into_iter()
                .map(|(end, (sum, count))| ViewPoint {
                    label: end.format("%Y-%m-%d").to_string(),
                    elo: (count > 0).then(|| sum as f64 / count as f64),
                })
                .collect()
        }
    }
}
