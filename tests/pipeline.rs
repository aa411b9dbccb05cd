//! End-to-end runs of the leaderboard pipeline against mock feed and roster servers

use std::time::Duration;

use rosterboard::acquire::RosterAcquirer;
use rosterboard::cache::CacheManager;
use rosterboard::data::{RosterClient, StatsClient};
use rosterboard::leaderboard::Leaderboard;
use rosterboard::pipeline::{Pipeline, PipelineConfig};
use rosterboard::progress::{NullProgress, RecordingProgress};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EAGLES_PAGE: &str = include_str!("fixtures/eagles_roster.html");
const HAWKS_PAGE: &str = include_str!("fixtures/hawks_roster.html");

fn feed() -> serde_json::Value {
    json!({
        "lastUpdated": "2025-12-01T08:30:00Z",
        "players": [
            {"playerId": "1001", "teamId": "1234", "name": "Ava Stone", "teamName": "Eagles", "gp": 10, "goals": 8, "assists": 6, "points": 14},
            {"playerId": 1002, "teamId": 1234, "name": "Ben Cole", "teamName": "Eagles", "gp": 11, "goals": 9, "assists": 11, "points": 20},
            {"playerId": "1003", "teamId": "1234", "name": "Cal Reed", "teamName": "Eagles", "gp": 11, "goals": 20, "assists": 10, "points": 30},
            {"playerId": "2001", "teamId": "5678", "name": "Eli Grant", "teamName": "Hawks", "gp": 9, "goals": 12, "assists": 8, "points": 20},
            {"playerId": "2002", "teamId": "5678", "name": "Finn Shaw", "teamName": "Hawks", "gp": 9, "goals": 1, "assists": 2, "points": 3},
            {"playerId": "3001", "teamId": "404", "name": "Hal Lane", "teamName": "Lost", "gp": 5, "goals": 30, "assists": 30, "points": 60},
            {"teamId": "1234", "name": "No Id", "teamName": "Eagles", "gp": 1, "goals": 50, "assists": 50, "points": 100}
        ]
    })
}

async fn mount_feed(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/stats.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_roster(server: &MockServer, team_id: &str, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/roster/show/{}", team_id)))
        .and(query_param("subseason", "948428"))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_all_rosters(server: &MockServer, expected: u64) {
    mount_roster(
        server,
        "1234",
        ResponseTemplate::new(200).set_body_string(EAGLES_PAGE),
        expected,
    )
    .await;
    mount_roster(
        server,
        "5678",
        ResponseTemplate::new(200).set_body_string(HAWKS_PAGE),
        expected,
    )
    .await;
    mount_roster(server, "404", ResponseTemplate::new(500), expected).await;
}

fn pipeline(server: &MockServer, cache: Option<CacheManager>) -> Pipeline {
    Pipeline::new(
        StatsClient::with_url(format!("{}/stats.json", server.uri())),
        RosterAcquirer::new(RosterClient::with_base_url(server.uri()), cache)
            .with_delay(Duration::ZERO),
        PipelineConfig::default(),
    )
}

fn names(board: &Leaderboard) -> Vec<&str> {
    board.players.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_grade_nine_leaders_merged_from_feed_and_rosters() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    mount_all_rosters(&server, 1).await;

    let mut progress = RecordingProgress::default();
    let board = pipeline(&server, None).run(&mut progress).await.unwrap();

    assert_eq!(board.title, "Top 100 Freshman Scoring Leaders");
    assert_eq!(names(&board), vec!["Ben Cole", "Eli Grant", "Ava Stone"]);
    assert_eq!(board.eligible, 3);

    let ben = &board.players[0];
    assert_eq!(ben.team, "Northside Eagles");
    assert_eq!(ben.position, "D");
    assert_eq!(ben.grade, "9");
    assert_eq!(ben.points, 20);

    let eli = &board.players[1];
    assert_eq!(eli.team, "Valley Hawks");
    assert_eq!(eli.position, "F");

    assert_eq!(
        board.last_updated.map(|t| t.to_rfc3339()),
        Some("2025-12-01T08:30:00+00:00".to_string())
    );
    assert_eq!(progress.team_counts.last(), Some(&(3, 3)));
}

#[tokio::test]
async fn test_failed_roster_is_reported_and_its_players_left_out() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    mount_all_rosters(&server, 1).await;

    let board = pipeline(&server, None)
        .run(&mut NullProgress)
        .await
        .unwrap();

    assert_eq!(board.failed_teams, vec!["404".to_string()]);
    assert!(board.players.iter().all(|p| p.name != "Hal Lane"));
    assert!(board.players.iter().all(|p| p.name != "No Id"));
}

#[tokio::test]
async fn test_equal_points_keep_feed_order() {
    let server = MockServer::start().await;
    mount_feed(&server, 2).await;
    mount_all_rosters(&server, 2).await;

    let first = pipeline(&server, None)
        .run(&mut NullProgress)
        .await
        .unwrap();
    let second = pipeline(&server, None)
        .run(&mut NullProgress)
        .await
        .unwrap();

    assert_eq!(names(&first)[..2], ["Ben Cole", "Eli Grant"]);
    assert_eq!(names(&first), names(&second));
}

#[tokio::test]
async fn test_second_run_serves_rosters_from_cache() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_feed(&server, 2).await;
    mount_roster(
        &server,
        "1234",
        ResponseTemplate::new(200).set_body_string(EAGLES_PAGE),
        1,
    )
    .await;
    mount_roster(
        &server,
        "5678",
        ResponseTemplate::new(200).set_body_string(HAWKS_PAGE),
        1,
    )
    .await;
    // Failures are never cached, so the broken team is asked for twice
    mount_roster(&server, "404", ResponseTemplate::new(500), 2).await;

    let cache = || Some(CacheManager::with_dir(temp_dir.path().to_path_buf()));

    let first = pipeline(&server, cache())
        .run(&mut NullProgress)
        .await
        .unwrap();
    let second = pipeline(&server, cache())
        .run(&mut NullProgress)
        .await
        .unwrap();

    assert_eq!(names(&first), names(&second));
    assert_eq!(second.players[0].team, "Northside Eagles");
    assert_eq!(second.failed_teams, vec!["404".to_string()]);
}

#[tokio::test]
async fn test_limit_truncates_after_ranking() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    mount_all_rosters(&server, 1).await;

    let mut pipeline = Pipeline::new(
        StatsClient::with_url(format!("{}/stats.json", server.uri())),
        RosterAcquirer::new(RosterClient::with_base_url(server.uri()), None)
            .with_delay(Duration::ZERO),
        PipelineConfig {
            limit: 2,
            ..PipelineConfig::default()
        },
    );
    let board = pipeline.run(&mut NullProgress).await.unwrap();

    assert_eq!(board.title, "Top 2 Freshman Scoring Leaders");
    assert_eq!(names(&board), vec!["Ben Cole", "Eli Grant"]);
    assert_eq!(board.eligible, 3);
}
