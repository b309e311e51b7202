use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use faceit::history::HistoryView;
use faceit::report::{Report, ReportOptions};
use faceit::tournament::TournamentOptions;
use faceit::{Client, Config};

#[derive(Debug, Parser)]
#[command(name = "faceit-stats", about = "CS:GO statistics from Faceit and parsed demos")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "faceit.json")]
    config: PathBuf,

    /// Also write the logs to this file
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum ScopeArg {
    #[default]
    Player,
    Team,
}

impl From<ScopeArg> for analysis::Scope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Player => Self::Player,
            ScopeArg::Team => Self::Team,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze the demos of championships
    Tournament {
        #[arg(required = true)]
        championships: Vec<String>,
        /// Download demos again even if they exist
        #[arg(long)]
        force_download: bool,
        /// Print the box score of every match
        #[arg(long)]
        match_stats: bool,
    },
    /// Mean player statistics of championships from the Faceit match stats
    Summary {
        #[arg(required = true)]
        championships: Vec<String>,
    },
    /// Win/loss score history of a player
    History {
        nickname: String,
        #[arg(long)]
        count: Option<usize>,
    },
    /// Elo history of a player
    Elo {
        nickname: String,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long, value_enum, default_value_t)]
        view: HistoryView,
    },
    /// Statistics of parsed demos, several demos are aggregated
    Demo {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Filters like `kills:isHeadshot=true` or `rounds:roundNum=>=16`
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, value_enum, default_value_t)]
        report: Report,
        #[arg(long, value_enum, default_value_t)]
        scope: ScopeArg,
        /// Letters counted towards KAST
        #[arg(long, default_value = "KAST")]
        kast: analysis::kast::KastLetters,
        /// Count flash assists as assists for KAST
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        flash_assists: bool,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn client(config_path: &std::path::Path) -> anyhow::Result<(Client, Config)> {
    let config = Config::load(config_path)?;
    Ok((Client::from_config(&config), config))
}

async fn player(client: &Client, nickname: &str) -> anyhow::Result<faceit::models::Player> {
    client
        .player(nickname)
        .await?
        .with_context(|| format!("No player with nickname {}", nickname))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = faceit::telemetry::init(cli.logfile.as_deref())?;

    tracing::debug!(?cli, "Starting");

    match cli.command {
        Command::Tournament {
            championships,
            force_download,
            match_stats,
        } => {
            let (client, config) = client(&cli.config)?;
            let options = TournamentOptions {
                force_download,
                match_stats,
            };

            for championship in championships {
                let report =
                    faceit::tournament::analyze_championship(&client, &championship, &config.demos_dir, options)
                        .await
                        .with_context(|| format!("Analyzing championship {}", championship))?;

                if cli.json {
                    print_json(&report)?;
                    continue;
                }

                for m in &report.matches {
                    println!("Match {} ({})", m.match_id, m.map.as_deref().unwrap_or("unknown map"));
                    println!("{}", faceit::render::records_table(&m.players)?);
                }
                println!("Championship {}", report.championship);
                println!("{}", faceit::render::records_table(&report.players)?);
            }
        }
        Command::Summary { championships } => {
            let (client, _) = client(&cli.config)?;

            for championship in championships {
                let summary = faceit::summary::summarize_championship(&client, &championship)
                    .await
                    .with_context(|| format!("Summarizing championship {}", championship))?;
                let means = summary.mean_stats();

                if cli.json {
                    print_json(&means)?;
                } else {
                    println!("Championship {}", championship);
                    println!("{}", faceit::render::table(&means));
                }
            }
        }
        Command::History { nickname, count } => {
            let (client, _) = client(&cli.config)?;
            let player = player(&client, &nickname).await?;

            let games = client.player_games(&player.player_id, count).await?;
            let history = faceit::history::win_history(&games, &player);

            if cli.json {
                print_json(&history)?;
            } else {
                println!("{}", faceit::render::records_table(&history)?);
            }
        }
        Command::Elo { nickname, count, view } => {
            let (client, _) = client(&cli.config)?;
            let player = player(&client, &nickname).await?;

            let statistics = client.player_statistics(&player.player_id, count).await?;
            let history = faceit::history::elo_history(&statistics);
            let points = faceit::history::elo_view(&history, view);

            if cli.json {
                print_json(&points)?;
            } else {
                println!("{}", faceit::render::records_table(&points)?);
            }
        }
        Command::Demo {
            paths,
            filters,
            report,
            scope,
            kast,
            flash_assists,
        } => {
            let mut options = ReportOptions {
                scope: scope.into(),
                letters: kast,
                flash_assists,
                json: cli.json,
                ..Default::default()
            };
            for filter in &filters {
                options.filters.insert_expr(filter)?;
            }

            let mut data: Option<analysis::MatchData> = None;
            for path in &paths {
                let loaded = analysis::MatchData::load(path)
                    .with_context(|| format!("Loading {:?}", path))?
                    .cleaned();
                data = Some(match data {
                    Some(previous) => previous.concat(loaded),
                    None => loaded,
                });
            }
            let data = data.unwrap_or_default();

            println!("{}", faceit::report::render(&data, report, &options)?);
        }
    }

    Ok(())
}
