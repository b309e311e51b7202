use analysis::boxscore::{team_box_score, StatValue};
use analysis::{MatchData, StatFilters};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn load() -> MatchData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/match.json");
    MatchData::load(std::path::Path::new(path)).unwrap().cleaned()
}

#[track_caller]
fn approx(expected: f64, actual: f64) {
    assert!(
        (expected - actual).abs() < 1e-6,
        "expected {} but got {}",
        expected,
        actual
    );
}

#[test]
#[traced_test]
fn players() {
    let data = load();
    let score = data.player_box_score().unwrap();

    let names: Vec<&str> = score.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(vec!["a2", "a1", "b1", "b2"], names);

    let a2 = &score[0];
    assert_eq!((3, 2, 0, 1, 1), (a2.kills, a2.deaths, a2.assists, a2.flash_assists, a2.enemies_flashed));
    approx(1.5, a2.kdr);
    approx(100.0, a2.kast);
    approx(260.0 / 3.0, a2.adr);
    approx(1.0, a2.ef_per_throw);
    approx(1.72, a2.impact);
    approx(1.5778506666666667, a2.rating);

    let b2 = &score[3];
    approx(100.0, b2.ud);
    approx(100.0, b2.ud_per_nade);
    approx(0.9824053333333334, b2.rating);
    approx(200.0 / 3.0, b2.accuracy);

    assert!(logs_contain("Calculated player box score"));
}

#[test]
fn teams() {
    let data = load();
    let score = team_box_score(&data, &StatFilters::default()).unwrap();

    assert_eq!(vec!["Alpha", "Bravo"], score.team_names());

    let alpha = &score.teams[0];
    assert_eq!((2, 2, 0), (alpha.score, alpha.ct_wins, alpha.t_wins));
    assert_eq!((5, 4, 1), (alpha.kills, alpha.deaths, alpha.plus_minus));
    approx(500.0 / 3.0, alpha.adr);
    assert_eq!((3333, 5000, 2600), (alpha.avg_eq_value, alpha.avg_cash, alpha.avg_spend));
    assert_eq!(Some(&2), alpha.buy_types.get("Full Buy"));

    let bravo = &score.teams[1];
    assert_eq!((1, 0, 1), (bravo.score, bravo.ct_wins, bravo.t_wins));
    approx(100.0, bravo.ud_per_nade);
    approx(3.0, bravo.ebt_per_enemy);
    assert_eq!((2800, 4333, 2233), (bravo.avg_eq_value, bravo.avg_cash, bravo.avg_spend));

    let rows = score.stat_rows();
    let stats: Vec<&str> = rows.iter().map(|r| r.stat.as_str()).collect();
    assert_eq!(
        vec![
            "Score",
            "CT Wins",
            "T Wins",
            "K",
            "D",
            "A",
            "FA",
            "+/-",
            "FK",
            "HS",
            "HS%",
            "Strafe%",
            "ACC%",
            "HS ACC%",
            "ADR",
            "UD",
            "Nades Thrown",
            "UD Per Nade",
            "EF",
            "Flashes Thrown",
            "EF Per Throw",
            "EBT Per Enemy",
            "Avg EQ Value",
            "Avg Cash",
            "Avg Spend",
            "Full Buy",
            "Full Eco",
            "Semi Buy",
            "CT Bomb Defusal Wins",
            "CT T Elim Wins",
            "T Bomb Detonation Wins",
        ],
        stats
    );
    assert_eq!(vec![StatValue::Count(2), StatValue::Count(1)], rows[0].values);
    assert_eq!("166.67", rows[14].values[0].to_string());
}

#[test]
fn economy_follows_round_filters() {
    let data = load();
    let mut filters = StatFilters::default();
    filters.round.insert("ctBuyType", ["Full Buy"]);

    let score = team_box_score(&data, &filters).unwrap();
    let alpha = score.teams.iter().find(|t| t.team == "Alpha").unwrap();
    assert_eq!(4500, alpha.avg_eq_value);
    assert_eq!(1, alpha.score);
    assert_eq!(None, alpha.buy_types.get("Full Eco"));
}
