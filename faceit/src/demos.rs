use std::io::Read;
use std::path::{Path, PathBuf};

use crate::api::Client;
use crate::models::Match;

const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Match {0} has no demo")]
    NoDemo(String),
    #[error("Demo url {0} has no file name")]
    InvalidUrl(String),
    #[error("Downloading {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Decompressing {url}: {source}")]
    Decompress {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The demo file name of the url, without the `.gz` suffix.
pub fn demo_file_name(url: &str) -> Option<&str> {
    let name = url.split(['?', '#']).next()?.rsplit('/').next()?;
    let name = name.strip_suffix(".gz").unwrap_or(name);
    (!name.is_empty()).then_some(name)
}

/// Where the external parser stores the tables of the demo.
pub fn parsed_demo_path(demo: &Path) -> PathBuf {
    demo.with_extension("json")
}

/// Downloads and decompresses the demo of the match into `dir`.
///
/// An existing demo is reused unless `force` is set.
#[tracing::instrument(skip(client, m), fields(match_id = %m.match_id))]
pub async fn download_demo(client: &Client, m: &Match, dir: &Path, force: bool) -> Result<PathBuf, DemoError> {
    let url = m
        .demo_url
        .as_deref()
        .ok_or_else(|| DemoError::NoDemo(m.match_id.clone()))?;
    let name = demo_file_name(url).ok_or_else(|| DemoError::InvalidUrl(url.to_owned()))?;
    let path = dir.join(name);

    if !force && tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!(?path, "Demo already downloaded");
        return Ok(path);
    }

    tracing::info!(url, "Downloading demo");

    let response = client
        .http()
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|source| DemoError::Download {
            url: url.to_owned(),
            source,
        })?;
    if !response.status().is_success() {
        return Err(DemoError::Status {
            url: url.to_owned(),
            status: response.status(),
        });
    }
    let compressed = response.bytes().await.map_err(|source| DemoError::Download {
        url: url.to_owned(),
        source,
    })?;

    let mut demo = Vec::new();
    flate2::read::GzDecoder::new(compressed.as_ref())
        .read_to_end(&mut demo)
        .map_err(|source| DemoError::Decompress {
            url: url.to_owned(),
            source,
        })?;

    tokio::fs::create_dir_all(dir).await.map_err(|source| DemoError::Io {
        path: dir.to_owned(),
        source,
    })?;
    tokio::fs::write(&path, &demo).await.map_err(|source| DemoError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(?path, bytes = demo.len(), "Stored demo");
    Ok(path)
}

/// Downloads the demos of all played matches, in the order of `matches`.
pub async fn download_all_demos(
    client: &Client,
    matches: &[Match],
    dir: &Path,
    force: bool,
) -> Result<Vec<(String, PathBuf)>, DemoError> {
    let mut demos = Vec::with_capacity(matches.len());
    for m in matches.iter().filter(|m| m.is_played) {
        let path = download_demo(client, m, dir, force).await?;
        demos.push((m.match_id.clone(), path));
    }
    Ok(demos)
}
