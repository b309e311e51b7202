use std::time::Duration;

use faceit::{ApiError, Client};
use pretty_assertions::assert_eq;
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new("secret")
        .with_base_urls(server.uri(), format!("{}/stats/v1", server.uri()))
        .with_retries(2, Duration::from_millis(1))
}

fn championship_match(id: usize, played: bool) -> serde_json::Value {
    let mut m = json!({
        "match_id": format!("1-{}", id),
        "teams": {
            "faction1": {"name": "team_one", "roster": []},
            "faction2": {"name": "team_two", "roster": []}
        },
        "faceit_url": format!("https://www.faceit.com/{{lang}}/csgo/room/1-{}", id),
        "calculate_elo": false,
        "started_at": 1_600_000_000
    });
    if played {
        m["demo_url"] = json!([format!("https://demos.example.com/1-{}.dem.gz", id)]);
    }
    m
}

#[tokio::test]
async fn player_by_nickname() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players"))
        .and(query_param("nickname", "someone"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "player_id": "p-1",
            "nickname": "someone",
            "games": {"csgo": {"skill_level": 7, "faceit_elo": 1500}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/players"))
        .and(query_param("nickname", "nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);

    let player = client.player("someone").await.unwrap().unwrap();
    assert_eq!("p-1", player.player_id);
    assert_eq!(Some(7), player.skill_level);

    assert!(client.player("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn championship_pages() {
    let server = MockServer::start().await;
    let first: Vec<serde_json::Value> = (0..100).map(|i| championship_match(i, i % 2 == 0)).collect();
    let second: Vec<serde_json::Value> = (100..103).map(|i| championship_match(i, true)).collect();

    Mock::given(method("GET"))
        .and(path("/championships/champ/matches"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": first})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/championships/champ/matches"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": second})))
        .expect(1)
        .mount(&server)
        .await;

    let matches = client(&server).championship_matches("champ").await.unwrap();

    assert_eq!(103, matches.len());
    assert_eq!(53, matches.iter().filter(|m| m.is_played).count());
    assert_eq!("https://www.faceit.com/en/csgo/room/1-0", matches[0].faceit_url);
}

#[tokio::test]
#[traced_test]
async fn retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/matches/1-abc"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/matches/1-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(championship_match(7, true)))
        .mount(&server)
        .await;

    let m = client(&server).match_details("1-abc").await.unwrap();
    assert_eq!("1-7", m.match_id);
    assert!(logs_contain("Retrying request"));
}

#[tokio::test]
async fn gives_up_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/matches/1-abc"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).match_details("1-abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status, .. } if status.as_u16() == 429));
}

#[tokio::test]
async fn client_errors_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/matches/1-abc/stats"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/matches/1-def/stats"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.match_stats("1-abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status, .. } if status.as_u16() == 403));

    assert_eq!(None, client.match_stats("1-def").await.unwrap());
}

#[tokio::test]
async fn statistics_payload() {
    let server = MockServer::start().await;
    let stats_path = "/stats/v1/stats/time/users/p-1/games/csgo";

    Mock::given(method("GET"))
        .and(path(stats_path))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payload": [
                {"nickname": "someone", "i1": "de_dust2", "elo": "1500", "gameMode": "5v5", "date": 1_600_000_000_000i64},
                {"nickname": "someone", "i1": "de_inferno", "gameMode": "5v5", "date": 1_600_000_100_000i64}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(stats_path))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let statistics = client(&server).player_statistics("p-1", None).await.unwrap();

    assert_eq!(2, statistics.len());
    assert_eq!(Some(1500), statistics[0].elo);
    assert_eq!(None, statistics[1].elo);
    assert_eq!("de_inferno", statistics[1].map_name);
}

#[tokio::test]
async fn history_count() {
    let server = MockServer::start().await;
    let games: Vec<serde_json::Value> = (0..20)
        .map(|i| {
            json!({
                "match_id": format!("g-{}", i),
                "game_mode": "5v5",
                "started_at": 1_600_000_000 + i,
                "teams": {
                    "faction1": {"nickname": "one", "players": [{"player_id": "p-1", "nickname": "someone"}]},
                    "faction2": {"nickname": "two", "players": []}
                },
                "results": {"winner": "faction1"}
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/players/p-1/history"))
        .and(query_param("game", "csgo"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": games})))
        .expect(1)
        .mount(&server)
        .await;

    let games = client(&server).player_games("p-1", Some(5)).await.unwrap();
    assert_eq!(5, games.len());
    assert_eq!("g-0", games[0].match_id);
}
