use std::path::{Path, PathBuf};

use analysis::boxscore::PlayerBoxScore;
use analysis::MatchData;

use crate::api::{ApiError, Client};
use crate::demos::{download_all_demos, parsed_demo_path, DemoError};

#[derive(Debug, Clone, Copy, Default)]
pub struct TournamentOptions {
    pub force_download: bool,
    /// Also report the box score of every single match.
    pub match_stats: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MatchReport {
    pub match_id: String,
    pub map: Option<String>,
    pub players: Vec<PlayerBoxScore>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TournamentReport {
    pub championship: String,
    pub matches: Vec<MatchReport>,
    /// Matches without a parsed demo.
    pub skipped: Vec<String>,
    pub players: Vec<PlayerBoxScore>,
}

#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Demo(#[from] DemoError),
    #[error("Loading {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: analysis::LoadError,
    },
    #[error(transparent)]
    Stats(#[from] analysis::StatsError),
}

/// Box scores over the parsed demos of the given `(match id, demo path)` pairs.
///
/// Demos the parser has not processed yet are skipped.
#[tracing::instrument(skip(demos))]
pub fn aggregate(
    championship: &str,
    demos: &[(String, PathBuf)],
    match_stats: bool,
) -> Result<TournamentReport, TournamentError> {
    let mut report = TournamentReport {
        championship: championship.to_owned(),
        matches: Vec::new(),
        skipped: Vec::new(),
        players: Vec::new(),
    };

    let mut combined: Option<MatchData> = None;
    for (match_id, demo) in demos {
        let path = parsed_demo_path(demo);
        if !path.exists() {
            tracing::warn!(match_id = %match_id, ?path, "Demo has not been parsed, skipping");
            report.skipped.push(match_id.clone());
            continue;
        }

        let data = load_cleaned(&path)?;
        if match_stats {
            report.matches.push(MatchReport {
                match_id: match_id.clone(),
                map: data.map.clone(),
                players: data.player_box_score()?,
            });
        }

        combined = Some(match combined {
            Some(previous) => previous.concat(data),
            None => data,
        });
    }

    if let Some(data) = combined {
        report.players = data.player_box_score()?;
    }

    tracing::info!(
        matches = demos.len() - report.skipped.len(),
        skipped = report.skipped.len(),
        "Analyzed championship"
    );

    Ok(report)
}

fn load_cleaned(path: &Path) -> Result<MatchData, TournamentError> {
    MatchData::load(path)
        .map(MatchData::cleaned)
        .map_err(|source| TournamentError::Load {
            path: path.to_owned(),
            source,
        })
}

/// Downloads the demos of all played matches of the championship and aggregates them.
#[tracing::instrument(skip(client, demos_dir))]
pub async fn analyze_championship(
    client: &Client,
    championship: &str,
    demos_dir: &Path,
    options: TournamentOptions,
) -> Result<TournamentReport, TournamentError> {
    let matches = client.championship_matches(championship).await?;
    tracing::info!(
        matches = matches.len(),
        played = matches.iter().filter(|m| m.is_played).count(),
        "Loaded championship"
    );

    let demos = download_all_demos(client, &matches, demos_dir, options.force_download).await?;

    aggregate(championship, &demos, options.match_stats)
}
