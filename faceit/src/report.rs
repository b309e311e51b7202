use analysis::kast::KastLetters;
use analysis::{MatchData, Scope, StatFilters, StatsError};
use serde::Serialize;

use crate::render::{records_table, team_table};

/// The statistics that can be reported for parsed demos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Report {
    #[default]
    BoxScore,
    Teams,
    Kills,
    Accuracy,
    Kast,
    Adr,
    Rating,
    Utility,
    UtilityBreakdown,
    Flashes,
    Bomb,
    Economy,
    Weapons,
    Wins,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("Serializing report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub scope: Scope,
    pub letters: KastLetters,
    /// Flash assists count as assists for KAST, like in the box score.
    pub flash_assists: bool,
    pub filters: StatFilters,
    pub json: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            scope: Scope::default(),
            letters: KastLetters::default(),
            flash_assists: true,
            filters: StatFilters::default(),
            json: false,
        }
    }
}

fn emit<T: Serialize>(rows: &[T], json: bool) -> Result<String, ReportError> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)?);
    }
    Ok(records_table(rows)?)
}

pub fn render(data: &MatchData, report: Report, options: &ReportOptions) -> Result<String, ReportError> {
    let ReportOptions {
        scope,
        letters,
        flash_assists,
        filters,
        json,
    } = options;
    let (scope, json) = (*scope, *json);

    match report {
        Report::BoxScore => emit(&analysis::boxscore::player_box_score(data, filters)?, json),
        Report::Teams => {
            let score = analysis::boxscore::team_box_score(data, filters)?;
            if json {
                return Ok(serde_json::to_string_pretty(&score)?);
            }
            Ok(team_table(&score))
        }
        Report::Kills => emit(&analysis::killstats::kill_stats(data, scope, filters)?, json),
        Report::Accuracy => emit(&analysis::accuracy::accuracy(data, scope, filters)?, json),
        Report::Kast => emit(&analysis::kast::kast(data, *letters, *flash_assists, filters)?, json),
        Report::Adr => emit(&analysis::adr::adr(data, scope, filters)?, json),
        Report::Rating => emit(&analysis::rating::rating(data, *letters, *flash_assists, filters)?, json),
        Report::Utility => emit(&analysis::utility::utility_damage(data, scope, filters)?, json),
        Report::UtilityBreakdown => emit(
            &analysis::utility::utility_damage_breakdown(data, scope, filters)?,
            json,
        ),
        Report::Flashes => emit(&analysis::flashes::flash_stats(data, scope, filters)?, json),
        Report::Bomb => {
            let stats = analysis::bomb::bomb_stats(data, filters)?;
            if json {
                return Ok(serde_json::to_string_pretty(&stats)?);
            }
            Ok(format!(
                "first: {}, second: {}\n{}",
                stats.first_team,
                stats.second_team,
                records_table(&stats.sites)?
            ))
        }
        Report::Economy => emit(&analysis::economy::econ_stats(data, filters)?, json),
        Report::Weapons => emit(&analysis::weapons::kill_breakdown(data, scope, filters)?, json),
        Report::Wins => emit(&analysis::winbreakdown::win_breakdown(data, filters)?, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load() -> MatchData {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/match.json");
        MatchData::load(std::path::Path::new(path)).unwrap().cleaned()
    }

    #[test]
    fn box_score_table() {
        let output = render(&load(), Report::BoxScore, &ReportOptions::default()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(6, lines.len());
        assert!(lines[0].contains("Rating"));
        assert!(lines[2].contains("a2"));
    }

    #[test]
    fn bomb_json() {
        let options = ReportOptions {
            json: true,
            ..Default::default()
        };
        let output = render(&load(), Report::Bomb, &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!("Bravo", value["first_team"]);
        assert_eq!(3, value["sites"].as_array().unwrap().len());
    }

    fn by_name(output: &str, column: &str) -> Vec<(String, serde_json::Value)> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(output).unwrap();
        let mut values: Vec<(String, serde_json::Value)> = rows
            .iter()
            .map(|r| (r["name"].as_str().unwrap().to_owned(), r[column].clone()))
            .collect();
        values.sort_by(|a, b| a.0.cmp(&b.0));
        values
    }

    #[test]
    fn kast_matches_box_score() {
        let data = load();
        let options = ReportOptions {
            json: true,
            ..Default::default()
        };

        let kast = render(&data, Report::Kast, &options).unwrap();
        let rating = render(&data, Report::Rating, &options).unwrap();
        let box_score = render(&data, Report::BoxScore, &options).unwrap();

        assert_eq!(by_name(&box_score, "KAST%"), by_name(&kast, "KAST%"));
        assert_eq!(by_name(&box_score, "Rating"), by_name(&rating, "Rating"));
    }

    #[test]
    fn flash_assists_count_by_default() {
        let data = load();
        let letters: KastLetters = "KAS".parse().unwrap();
        let with = ReportOptions {
            letters,
            json: true,
            ..Default::default()
        };
        let without = ReportOptions {
            flash_assists: false,
            ..with.clone()
        };

        let with = by_name(&render(&data, Report::Kast, &with).unwrap(), "A");
        let without = by_name(&render(&data, Report::Kast, &without).unwrap(), "A");

        let a2 = |rows: &[(String, serde_json::Value)]| rows.iter().find(|(n, _)| n == "a2").map(|(_, v)| v.clone());
        assert_eq!(Some(serde_json::json!(1)), a2(&with));
        assert_eq!(Some(serde_json::json!(0)), a2(&without));
    }

    #[test]
    fn team_rows() {
        let output = render(&load(), Report::Teams, &ReportOptions::default()).unwrap();
        assert!(output.lines().next().unwrap().contains("Alpha"));
        assert!(output.contains("Avg EQ Value"));
    }
}
