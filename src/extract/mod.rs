//! Extract stage: fetch raw stats from the API and persist them untouched.

pub mod client;

pub use client::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ApiConfig;
use crate::error::{EtlError, Result};
use crate::layout::{ensure_parent, team_dir_name, DataLayout};
use crate::model::{StatsDocument, TeamRef};
use crate::ui::{Phase, Ui};

/// A team whose player stats could not be fetched
#[derive(Debug)]
pub struct TeamFailure {
    pub team: TeamRef,
    pub error: EtlError,
}

/// Outcome of a player extraction run
#[derive(Debug, Default)]
pub struct PlayerExtraction {
    pub written: Vec<PathBuf>,
    pub failures: Vec<TeamFailure>,
}

/// Fetch team season stats, persist the raw body and return the parsed document
pub fn extract_team_stats(
    api: &impl ApiTransport,
    config: &ApiConfig,
    layout: &DataLayout,
    ui: &mut impl Ui,
) -> Result<StatsDocument> {
    let response = api.get(
        TEAM_SEASON_STATS,
        &[
            ("league_id", config.league_id.as_str()),
            ("season_id", config.season_id.as_str()),
        ],
    )?;

    if !response.is_success() {
        return Err(response.into_api_error());
    }

    let path = layout.raw_team_stats();
    let document = parse_body(&response, &path)?;
    write_raw(&path, &response.body)?;
    ui.log(format!("Team stats saved to {}", path.display()));

    Ok(document)
}

/// Fetch player season stats for every team, one request per team.
///
/// A failing team is recorded and the remaining teams are still fetched.
pub fn extract_player_stats(
    api: &impl ApiTransport,
    config: &ApiConfig,
    layout: &DataLayout,
    teams: &[TeamRef],
    ui: &mut impl Ui,
) -> Result<PlayerExtraction> {
    let mut outcome = PlayerExtraction::default();
    let mut claimed: HashMap<PathBuf, &TeamRef> = HashMap::new();
    let total = teams.len() as u64;

    for (idx, team) in teams.iter().enumerate() {
        ui.set_progress(idx as u64, total, team.team_name.clone());

        let result = match claimed.get(&layout.raw_player_stats(&team.team_name)) {
            Some(other) => Err(EtlError::TeamDirCollision {
                team: format!("{} ({})", team.team_name, team.team_id),
                other: format!("{} ({})", other.team_name, other.team_id),
                dir: layout.raw_dir().join(team_dir_name(&team.team_name)),
            }),
            None => fetch_team_players(api, config, layout, team),
        };

        match result {
            Ok(path) => {
                claimed.insert(path.clone(), team);
                outcome.written.push(path);
            }
            // Filesystem trouble is not specific to one team
            Err(error @ EtlError::Io { .. }) => return Err(error),
            Err(error) => {
                tracing::warn!(team = %team.team_name, %error, "player stats fetch failed");
                ui.log(format!("{}: {}", team.team_name, error));
                outcome.failures.push(TeamFailure {
                    team: team.clone(),
                    error,
                });
            }
        }
    }

    ui.set_progress(total, total, "players");
    ui.clear_progress();
    ui.log(format!(
        "Player stats saved for {}/{} teams",
        outcome.written.len(),
        teams.len()
    ));

    Ok(outcome)
}

/// Team and player extraction in one pass
pub fn extract_all(
    api: &impl ApiTransport,
    config: &ApiConfig,
    layout: &DataLayout,
    ui: &mut impl Ui,
) -> Result<PlayerExtraction> {
    ui.set_phase(Phase::Extracting);
    let document = extract_team_stats(api, config, layout, ui)?;
    let teams = document.team_refs()?;
    extract_player_stats(api, config, layout, &teams, ui)
}

/// Player extraction alone, for the teams in a previously saved `team_stats.json`
pub fn extract_players_for_saved_teams(
    api: &impl ApiTransport,
    config: &ApiConfig,
    layout: &DataLayout,
    ui: &mut impl Ui,
) -> Result<PlayerExtraction> {
    ui.set_phase(Phase::Extracting);
    let teams = read_team_refs(layout)?;
    ui.log(format!("Fetching players for {} saved teams", teams.len()));
    extract_player_stats(api, config, layout, &teams, ui)
}

/// Team identities from a previously extracted `team_stats.json`
pub fn read_team_refs(layout: &DataLayout) -> Result<Vec<TeamRef>> {
    StatsDocument::read(&layout.raw_team_stats())?.team_refs()
}

fn fetch_team_players(
    api: &impl ApiTransport,
    config: &ApiConfig,
    layout: &DataLayout,
    team: &TeamRef,
) -> Result<PathBuf> {
    let response = api.get(
        PLAYER_SEASON_STATS,
        &[
            ("team_id", team.team_id.as_str()),
            ("league_id", config.league_id.as_str()),
        ],
    )?;

    if !response.is_success() {
        return Err(response.into_api_error());
    }

    let path = layout.raw_player_stats(&team.team_name);
    parse_body(&response, &path)?;
    write_raw(&path, &response.body)?;
    Ok(path)
}

/// A 200 body that is not a stats document is reported against its destination
fn parse_body(response: &ApiResponse, path: &Path) -> Result<StatsDocument> {
    serde_json::from_str(&response.body).map_err(|source| EtlError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn write_raw(path: &Path, body: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, body).map_err(|e| EtlError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentUi;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned responses keyed by endpoint and first query value
    #[derive(Default)]
    struct FakeApi {
        responses: HashMap<(String, String), ApiResponse>,
        requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeApi {
        fn respond(mut self, endpoint: &str, first_param: &str, status: u16, body: String) -> Self {
            self.responses.insert(
                (endpoint.to_string(), first_param.to_string()),
                ApiResponse { status, body },
            );
            self
        }
    }

    impl ApiTransport for FakeApi {
        fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
            self.requests.borrow_mut().push((
                endpoint.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            let key = (endpoint.to_string(), query[0].1.to_string());
            Ok(self.responses.get(&key).cloned().unwrap_or(ApiResponse {
                status: 404,
                body: r#"{"detail":"not found"}"#.to_string(),
            }))
        }
    }

    fn config() -> ApiConfig {
        ApiConfig {
            base_url: Some("https://api.example.com".to_string()),
            api_key: Some("key".to_string()),
            league_id: "9".to_string(),
            season_id: "2024-2025".to_string(),
            timeout: None,
        }
    }

    fn team_body() -> String {
        json!({
            "data": [
                {"meta_data": {"team_id": "a1", "team_name": "Arsenal"}, "stats": {}},
                {"meta_data": {"team_id": "b2", "team_name": "Brentford"}, "stats": {}},
                {"meta_data": {"team_id": "c3", "team_name": "Chelsea"}, "stats": {}}
            ]
        })
        .to_string()
    }

    fn team_refs() -> Vec<TeamRef> {
        serde_json::from_str::<StatsDocument>(&team_body())
            .unwrap()
            .team_refs()
            .unwrap()
    }

    fn player_body(name: &str) -> String {
        json!({"data": [{"meta_data": {"player_id": "p", "player_name": name}, "stats": {}}]})
            .to_string()
    }

    #[test]
    fn test_team_stats_written_and_returned() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let api = FakeApi::default().respond(TEAM_SEASON_STATS, "9", 200, team_body());

        let doc = extract_team_stats(&api, &config(), &layout, &mut SilentUi::new()).unwrap();
        assert_eq!(doc.data.len(), 3);
        assert!(layout.raw_team_stats().exists());

        let requests = api.requests.borrow();
        assert_eq!(
            requests[0].1,
            vec![
                ("league_id".to_string(), "9".to_string()),
                ("season_id".to_string(), "2024-2025".to_string())
            ]
        );
    }

    #[test]
    fn test_team_stats_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let api = FakeApi::default().respond(
            TEAM_SEASON_STATS,
            "9",
            403,
            r#"{"detail":"forbidden"}"#.to_string(),
        );

        let err = extract_team_stats(&api, &config(), &layout, &mut SilentUi::new()).unwrap_err();
        match err {
            EtlError::Api { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body["detail"], "forbidden");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!layout.raw_team_stats().exists());
    }

    #[test]
    fn test_player_failure_does_not_stop_later_teams() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let api = FakeApi::default()
            .respond(TEAM_SEASON_STATS, "9", 200, team_body())
            .respond(PLAYER_SEASON_STATS, "a1", 200, player_body("Saka"))
            .respond(PLAYER_SEASON_STATS, "b2", 500, "oops".to_string())
            .respond(PLAYER_SEASON_STATS, "c3", 200, player_body("Palmer"));

        let outcome = extract_all(&api, &config(), &layout, &mut SilentUi::new()).unwrap();

        assert_eq!(outcome.written.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].team.team_name, "Brentford");
        assert!(matches!(
            outcome.failures[0].error,
            EtlError::Api { status: 500, .. }
        ));
        assert!(layout.raw_player_stats("Arsenal").exists());
        assert!(!layout.raw_player_stats("Brentford").exists());
        assert!(layout.raw_player_stats("Chelsea").exists());
    }

    #[test]
    fn test_unparseable_player_body_does_not_stop_later_teams() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let api = FakeApi::default()
            .respond(PLAYER_SEASON_STATS, "a1", 200, player_body("Saka"))
            .respond(PLAYER_SEASON_STATS, "b2", 200, "<html>maintenance</html>".to_string())
            .respond(PLAYER_SEASON_STATS, "c3", 200, player_body("Palmer"));
        let teams = team_refs();

        let outcome =
            extract_player_stats(&api, &config(), &layout, &teams, &mut SilentUi::new()).unwrap();

        assert_eq!(outcome.written.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(outcome.failures[0].error, EtlError::InvalidJson { .. }));
        assert!(!layout.raw_player_stats("Brentford").exists());
        assert!(layout.raw_player_stats("Chelsea").exists());
    }

    #[test]
    fn test_colliding_team_directories_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let api = FakeApi::default()
            .respond(PLAYER_SEASON_STATS, "x1", 200, player_body("First"))
            .respond(PLAYER_SEASON_STATS, "x2", 200, player_body("Second"));
        let teams = vec![
            TeamRef {
                team_id: "x1".to_string(),
                team_name: "A/B".to_string(),
            },
            TeamRef {
                team_id: "x2".to_string(),
                team_name: "A_B".to_string(),
            },
        ];

        let outcome =
            extract_player_stats(&api, &config(), &layout, &teams, &mut SilentUi::new()).unwrap();

        assert_eq!(outcome.written.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].team.team_id, "x2");
        assert!(matches!(
            outcome.failures[0].error,
            EtlError::TeamDirCollision { .. }
        ));
        let saved = fs::read_to_string(layout.raw_player_stats("A_B")).unwrap();
        assert!(saved.contains("First"));
        // The second team was never requested
        assert_eq!(api.requests.borrow().len(), 1);
    }

    #[test]
    fn test_players_for_saved_teams_skips_team_request() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_raw(&layout.raw_team_stats(), &team_body()).unwrap();
        let api = FakeApi::default()
            .respond(PLAYER_SEASON_STATS, "a1", 200, player_body("Saka"))
            .respond(PLAYER_SEASON_STATS, "b2", 200, player_body("Mbeumo"))
            .respond(PLAYER_SEASON_STATS, "c3", 200, player_body("Palmer"));

        let outcome =
            extract_players_for_saved_teams(&api, &config(), &layout, &mut SilentUi::new())
                .unwrap();

        assert_eq!(outcome.written.len(), 3);
        assert!(outcome.failures.is_empty());
        let requests = api.requests.borrow();
        assert!(requests.iter().all(|(endpoint, _)| endpoint == PLAYER_SEASON_STATS));
    }

    #[test]
    fn test_players_for_saved_teams_needs_team_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let err = extract_players_for_saved_teams(
            &FakeApi::default(),
            &config(),
            &layout,
            &mut SilentUi::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EtlError::NotFound(_)));
    }

    #[test]
    fn test_read_team_refs_from_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_raw(&layout.raw_team_stats(), &team_body()).unwrap();

        let teams = read_team_refs(&layout).unwrap();
        let names: Vec<_> = teams.iter().map(|t| t.team_name.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Brentford", "Chelsea"]);
    }
}
