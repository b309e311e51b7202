use analysis::{
    accuracy::accuracy, adr::adr, bomb::bomb_stats, economy::econ_stats, economy::Side, flashes::flash_stats,
    kast::kast, kast::KastLetters, killstats::kill_stats, players, rating::rating, utility::utility_damage,
    utility::utility_damage_breakdown, weapons::kill_breakdown, winbreakdown::win_breakdown, Filters, MatchData, Scope,
    StatFilters, StatsError,
};
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
fn players_and_rounds() {
    let data = load();

    let pairs: Vec<(String, String)> = players::players_teams(&data.damages)
        .into_iter()
        .map(|p| (p.team, p.player))
        .collect();
    assert_eq!(
        vec![
            ("Alpha".to_owned(), "a1".to_owned()),
            ("Bravo".to_owned(), "b2".to_owned()),
            ("Alpha".to_owned(), "a2".to_owned()),
            ("Bravo".to_owned(), "b1".to_owned()),
        ],
        pairs
    );

    let teams = players::rounds_by_team(&data.rounds, &Filters::new()).unwrap();
    assert_eq!(Some(&3), teams.get("Alpha"));
    assert_eq!(Some(&3), teams.get("Bravo"));

    let filters = Filters::new().with("roundNum", [">=2"]);
    let by_player = players::rounds_by_player(&data.rounds, &players::players_teams(&data.damages), &filters).unwrap();
    assert_eq!(4, by_player.len());
    assert_eq!(Some(&2), by_player.get("b1"));

    assert_eq!(3, players::rounds_count(&data.rounds, &Filters::new()).unwrap());
    assert_eq!(1, players::rounds_count(&data.rounds, &Filters::new().with("winningTeam", ["Bravo"])).unwrap());
}

#[test]
#[traced_test]
fn player_kill_stats() {
    let data = load();
    let stats = kill_stats(&data, Scope::Player, &StatFilters::default()).unwrap();

    let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(vec!["a2", "a1", "b1", "b2"], names);

    let a2 = &stats[0];
    assert_eq!((3, 2, 0, 1), (a2.kills, a2.deaths, a2.assists, a2.flash_assists));
    assert_eq!((1, 1, 0, 1), (a2.plus_minus, a2.first_kills, a2.first_deaths, a2.first_kill_plus_minus));
    assert_eq!((2, 1, 1), (a2.headshots, a2.traded, a2.survived));
    approx(200.0 / 3.0, a2.headshot_pct);
    approx(1.5, a2.kdr);
    approx(1.0, a2.kpr);
    approx(100.0, a2.kast);
    approx(50.0, a2.accuracy);
    approx(100.0 / 3.0, a2.headshot_accuracy);
    approx(100.0 / 6.0, a2.strafe_pct);
    assert_eq!(6, a2.weapon_fires);
    assert_eq!(3, a2.rounds);

    let b1 = &stats[2];
    assert_eq!((2, 3, -1), (b1.kills, b1.deaths, b1.plus_minus));
    assert_eq!((0, 0), (b1.traded, b1.survived));
    approx(2.0 / 3.0, b1.kdr);
    approx(200.0 / 3.0, b1.kast);
    approx(0.0, b1.headshot_pct);
}

#[test]
fn team_kill_stats() {
    let data = load();
    let stats = kill_stats(&data, Scope::Team, &StatFilters::default()).unwrap();

    let alpha = &stats[0];
    assert_eq!("Alpha", alpha.name);
    assert_eq!((5, 4, 1, 1), (alpha.kills, alpha.deaths, alpha.assists, alpha.flash_assists));
    assert_eq!((2, 1, 3), (alpha.first_kills, alpha.first_deaths, alpha.headshots));
    approx(60.0, alpha.headshot_pct);
    approx(0.0, alpha.kast);
    assert_eq!(3, alpha.rounds);

    let bravo = &stats[1];
    assert_eq!((4, 5, -1), (bravo.kills, bravo.deaths, bravo.plus_minus));
}

#[test]
fn deathless_kdr() {
    let data = load();
    let mut filters = StatFilters::default();
    filters.kill.insert("roundNum", ["==1"]);
    filters.death.insert("roundNum", ["==1"]);

    let stats = kill_stats(&data, Scope::Player, &filters).unwrap();
    let a1 = stats.iter().find(|s| s.name == "a1").unwrap();
    assert_eq!((2, 0), (a1.kills, a1.deaths));
    approx(2.0, a1.kdr);
}

#[test]
fn filtered_kills() {
    let data = load();
    let mut filters = StatFilters::default();
    filters.insert_expr("kill:isHeadshot=true").unwrap();

    let stats = kill_stats(&data, Scope::Player, &filters).unwrap();
    let kills: Vec<(&str, usize)> = stats
        .iter()
        .filter(|s| s.kills > 0)
        .map(|s| (s.name.as_str(), s.kills))
        .collect();
    assert_eq!(vec![("a2", 2), ("a1", 1)], kills);

    filters.insert_expr("kill:victimName=true").unwrap();
    assert_eq!(
        Err(StatsError::Filter(analysis::FilterError::ExpectedText {
            column: "victimName".to_owned()
        })),
        kill_stats(&data, Scope::Player, &filters)
    );
}

#[test]
fn accuracy_per_team() {
    let data = load();
    let rows = accuracy(&data, Scope::Team, &StatFilters::default()).unwrap();

    let bravo = rows.iter().find(|r| r.name == "Bravo").unwrap();
    assert_eq!(6, bravo.weapon_fires);
    approx(100.0 * 4.0 / 6.0, bravo.accuracy);
    approx(0.0, bravo.headshot_accuracy);

    let alpha = rows.iter().find(|r| r.name == "Alpha").unwrap();
    assert_eq!(12, alpha.weapon_fires);
    approx(50.0, alpha.accuracy);
    approx(25.0, alpha.headshot_accuracy);
}

#[test]
fn kast_letters() {
    let data = load();

    let full = kast(&data, KastLetters::default(), true, &StatFilters::default()).unwrap();
    let a1 = full.iter().find(|k| k.name == "a1").unwrap();
    assert_eq!((2, 1, 1, 2), (a1.kills, a1.assists, a1.survived, a1.traded));
    approx(100.0, a1.kast);

    // Without trades and assists a1 only counts in the first round
    let ks: KastLetters = "KS".parse().unwrap();
    let partial = kast(&data, ks, true, &StatFilters::default()).unwrap();
    let a1 = partial.iter().find(|k| k.name == "a1").unwrap();
    assert_eq!((2, 0, 1, 0), (a1.kills, a1.assists, a1.survived, a1.traded));
    approx(100.0 / 3.0, a1.kast);

    // The flash assist in the first round is a2's only contribution there
    let kas: KastLetters = "KAS".parse().unwrap();
    let no_flash = kast(&data, kas, false, &StatFilters::default()).unwrap();
    let a2 = no_flash.iter().find(|k| k.name == "a2").unwrap();
    assert_eq!(0, a2.assists);
    approx(200.0 / 3.0, a2.kast);
}

#[test]
fn average_damage() {
    let data = load();
    let rows = adr(&data, Scope::Player, &StatFilters::default()).unwrap();

    let summary: Vec<(&str, f64, f64)> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.norm_adr, r.raw_adr))
        .collect();
    assert_eq!("a2", summary[0].0);
    approx(260.0 / 3.0, summary[0].1);
    assert_eq!("a1", summary[1].0);
    approx(80.0, summary[1].1);
    approx(260.0 / 3.0, summary[1].2);

    let b1 = rows.iter().find(|r| r.name == "b1").unwrap();
    approx(200.0 / 3.0, b1.norm_adr);
    approx(215.0 / 3.0, b1.raw_adr);
    assert_eq!(3, b1.rounds);
}

#[test]
fn ratings() {
    let data = load();
    let rows = rating(&data, KastLetters::default(), true, &StatFilters::default()).unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(vec!["a2", "a1", "b2", "b1"], names);

    approx(1.72, rows[0].impact);
    approx(1.5778506666666667, rows[0].rating);
    approx(1.15, rows[1].impact);
    approx(1.3016133333333333, rows[1].rating);
    approx(0.9824053333333334, rows[2].rating);
    approx(0.804772, rows[3].rating);
}

#[test]
fn grenade_damage() {
    let data = load();
    let rows = utility_damage(&data, Scope::Player, &StatFilters::default()).unwrap();

    assert_eq!(2, rows.len());
    assert_eq!("b2", rows[0].name);
    approx(100.0, rows[0].given_ud);
    approx(100.0, rows[0].ud_per_nade);
    assert_eq!(1, rows[0].nades_thrown);

    // The grenade hit on a teammate does not count
    assert_eq!("a2", rows[1].name);
    approx(0.0, rows[1].ud);
    assert_eq!(1, rows[1].nades_thrown);

    let breakdown = utility_damage_breakdown(&data, Scope::Team, &StatFilters::default()).unwrap();
    let rows: Vec<(&str, Option<&str>, usize)> = breakdown
        .iter()
        .map(|r| (r.name.as_str(), r.nade_type.as_deref(), r.nades_thrown))
        .collect();
    assert_eq!(
        vec![("Alpha", Some("HE Grenade"), 1), ("Bravo", Some("HE Grenade"), 1)],
        rows
    );
}

#[test]
fn flashbangs() {
    let data = load();
    let rows = flash_stats(&data, Scope::Player, &StatFilters::default()).unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(vec!["a2", "b1"], names);

    let a2 = &rows[0];
    assert_eq!((1, 1, 1, 1), (a2.enemies_flashed, a2.flash_assists, a2.teammates_flashed, a2.flashes_thrown));
    approx(2.0, a2.enemy_blind_time);
    approx(1.0, a2.ef_per_throw);
    approx(2.0, a2.ebt_per_enemy);

    let b1 = &rows[1];
    approx(3.0, b1.ebt_per_enemy);
    assert_eq!(0, b1.teammates_flashed);
}

#[test]
fn bombsites() {
    let data = load();
    let stats = bomb_stats(&data, &StatFilters::default()).unwrap();

    assert_eq!("Bravo", stats.first_team);
    assert_eq!("Alpha", stats.second_team);

    let sites: Vec<(&str, usize, usize, usize)> = stats
        .sites
        .iter()
        .map(|s| (s.site.as_str(), s.first_plants, s.second_defuses, s.second_plants))
        .collect();
    assert_eq!(vec![("A", 1, 0, 0), ("B", 1, 1, 0), ("A and B", 2, 1, 0)], sites);
    approx(100.0, stats.sites[1].second_defuse_pct);
    approx(50.0, stats.sites[2].second_defuse_pct);
    approx(0.0, stats.sites[2].first_defuse_pct);

    let mut single = data.clone();
    single.bomb_events.retain(|e| e.player_team.as_deref() == Some("Bravo"));
    assert_eq!(
        Err(StatsError::NotEnoughTeams { found: 1 }),
        bomb_stats(&single, &StatFilters::default())
    );
}

#[test]
fn economy() {
    let data = load();
    let rows = econ_stats(&data, &StatFilters::default()).unwrap();

    let labels: Vec<String> = rows.iter().map(|r| r.label()).collect();
    assert_eq!(vec!["Alpha CT", "Bravo T"], labels);

    let alpha = &rows[0];
    assert_eq!(Side::CT, alpha.side);
    assert_eq!((3333, 5000, 2600), (alpha.avg_eq_value, alpha.avg_cash, alpha.avg_spend));
    let buys: Vec<(&str, usize)> = alpha.buy_types.iter().map(|(b, c)| (b.as_str(), *c)).collect();
    assert_eq!(vec![("Full Buy", 2), ("Full Eco", 1), ("Semi Buy", 0)], buys);

    let bravo = &rows[1];
    assert_eq!((2800, 4333, 2233), (bravo.avg_eq_value, bravo.avg_cash, bravo.avg_spend));
    assert_eq!(3, bravo.rounds);
}

#[test]
fn weapon_classes() {
    let data = load();
    let rows = kill_breakdown(&data, Scope::Player, &StatFilters::default()).unwrap();

    let a2 = &rows[0];
    assert_eq!("a2", a2.name);
    assert_eq!((1, 2, 3), (a2.melee, a2.assault_rifle, a2.total));

    let b2 = rows.iter().find(|r| r.name == "b2").unwrap();
    assert_eq!((1, 1, 2), (b2.pistol, b2.utility, b2.total));
}

#[test]
fn round_wins() {
    let data = load();
    let rows = win_breakdown(&data, &StatFilters::default()).unwrap();

    assert_eq!(2, rows.len());
    let alpha = &rows[0];
    assert_eq!("Alpha", alpha.team);
    assert_eq!((2, 0, 2), (alpha.ct_wins, alpha.t_wins, alpha.total));
    assert_eq!(Some(&1), alpha.reasons.get("CT Bomb Defusal Wins"));
    assert_eq!(Some(&1), alpha.reasons.get("CT T Elim Wins"));

    let bravo = &rows[1];
    assert_eq!((0, 1, 1), (bravo.ct_wins, bravo.t_wins, bravo.total));
    assert_eq!(Some(&1), bravo.reasons.get("T Bomb Detonation Wins"));

    let mut filters = StatFilters::default();
    filters.round.insert("roundNum", ["<=2"]);
    let rows = win_breakdown(&data, &filters).unwrap();
    assert_eq!(1, rows[0].total);
}
