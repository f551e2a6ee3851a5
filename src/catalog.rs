// HTTP player catalog client and CSV rankings import.
//
// The stats API's player JSON is not uniform across endpoints (list vs
// rankings vs search), so every response goes through `normalize_player`,
// which probes the known field-name variants and produces a canonical
// `Player` record.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::draft::{Player, Position};

/// Query parameters accepted by the catalog endpoints.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub position: Option<String>,
    pub team: Option<String>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

impl CatalogQuery {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(pos) = &self.position {
            params.push(("position".to_string(), pos.clone()));
        }
        if let Some(team) = &self.team {
            params.push(("team".to_string(), team.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}

/// Client for the external player stats API.
pub struct PlayerCatalog {
    http: reqwest::Client,
    base_url: String,
}

impl PlayerCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch players from the list endpoint, filtered by the query.
    pub async fn list_players(&self, query: &CatalogQuery) -> Result<Vec<Player>> {
        self.fetch("players", query).await
    }

    /// Fetch the rankings endpoint (players ordered by ADP, with tiers).
    pub async fn rankings(&self, limit: Option<usize>) -> Result<Vec<Player>> {
        let query = CatalogQuery {
            limit,
            ..Default::default()
        };
        self.fetch("rankings", &query).await
    }

    /// Search players by name fragment.
    pub async fn search(&self, text: &str) -> Result<Vec<Player>> {
        let query = CatalogQuery {
            search: Some(text.to_string()),
            ..Default::default()
        };
        self.fetch("players", &query).await
    }

    async fn fetch(&self, endpoint: &str, query: &CatalogQuery) -> Result<Vec<Player>> {
        let url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));
        let params = query.to_params();

        let value = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("catalog request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("catalog endpoint {endpoint} returned an error status"))?
            .json::<Value>()
            .await
            .context("catalog response was not valid JSON")?;

        Ok(parse_players(&value))
    }
}

/// Extract players from a catalog response. Accepts either a bare array or
/// an object wrapping the array under `players` or `data`.
pub fn parse_players(value: &Value) -> Vec<Player> {
    let arr = value
        .as_array()
        .or_else(|| value.get("players").and_then(|v| v.as_array()))
        .or_else(|| value.get("data").and_then(|v| v.as_array()));

    let Some(arr) = arr else {
        warn!("catalog response had no player array");
        return Vec::new();
    };

    let players: Vec<Player> = arr.iter().filter_map(normalize_player).collect();
    debug!(count = players.len(), "parsed catalog players");
    players
}

/// Normalize one player object into a canonical `Player`, probing the
/// field-name variants the API uses across endpoints. Returns `None` when
/// the id, name, or position cannot be recovered.
pub fn normalize_player(p: &Value) -> Option<Player> {
    let id = p
        .get("id")
        .or_else(|| p.get("playerId"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })?;

    let name = p
        .get("name")
        .or_else(|| p.get("fullName"))
        .or_else(|| p.get("player_name"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())?;

    let position = p
        .get("position")
        .or_else(|| p.get("pos"))
        .or_else(|| p.get("defaultPosition"))
        .and_then(|v| v.as_str())
        .and_then(Position::from_str_pos)?;

    let pro_team = p
        .get("proTeam")
        .or_else(|| p.get("team"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let projected_points = p
        .get("projectedPoints")
        .or_else(|| p.get("projection"))
        .or_else(|| p.get("fpts"))
        .and_then(|v| v.as_f64());

    let adp = p
        .get("adp")
        .or_else(|| p.get("averageDraftPosition"))
        .and_then(|v| v.as_f64());

    let tier = p.get("tier").and_then(|v| v.as_u64()).map(|t| t as u8);

    let bye_week = p
        .get("byeWeek")
        .or_else(|| p.get("bye"))
        .and_then(|v| v.as_u64())
        .map(|w| w as u8);

    Some(Player {
        id,
        name,
        position,
        pro_team,
        projected_points,
        adp,
        tier,
        bye_week,
        drafted: false,
        drafted_info: None,
    })
}

/// Import players from a local rankings CSV with columns
/// `id,name,position,team,projected_points,adp,tier,bye_week`. The last
/// four columns may be empty. Rows with an unparseable position are skipped
/// with a warning.
pub fn import_rankings_csv(path: &Path) -> Result<Vec<Player>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open rankings CSV at {}", path.display()))?;

    let mut players = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {}", i + 2))?;

        let id = record.get(0).unwrap_or("").trim();
        let name = record.get(1).unwrap_or("").trim();
        let pos_str = record.get(2).unwrap_or("").trim();
        if id.is_empty() || name.is_empty() {
            warn!("skipping CSV row {}: missing id or name", i + 2);
            continue;
        }
        let Some(position) = Position::from_str_pos(pos_str) else {
            warn!("skipping CSV row {}: unknown position '{pos_str}'", i + 2);
            continue;
        };

        let mut player = Player::new(id, name, position);
        player.pro_team = record.get(3).unwrap_or("").trim().to_string();
        player.projected_points = record.get(4).and_then(|s| s.trim().parse().ok());
        player.adp = record.get(5).and_then(|s| s.trim().parse().ok());
        player.tier = record.get(6).and_then(|s| s.trim().parse().ok());
        player.bye_week = record.get(7).and_then(|s| s.trim().parse().ok());
        players.push(player);
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ------------------------------------------------------------------
    // normalize_player
    // ------------------------------------------------------------------

    #[test]
    fn normalize_short_field_names() {
        let v = json!({
            "id": "4046",
            "name": "Patrick Mahomes",
            "position": "QB",
            "team": "KC",
            "projectedPoints": 380.5,
            "adp": 25.3,
            "tier": 1,
            "byeWeek": 10
        });
        let p = normalize_player(&v).unwrap();
        assert_eq!(p.id, "4046");
        assert_eq!(p.name, "Patrick Mahomes");
        assert_eq!(p.position, Position::Quarterback);
        assert_eq!(p.pro_team, "KC");
        assert_eq!(p.projected_points, Some(380.5));
        assert_eq!(p.adp, Some(25.3));
        assert_eq!(p.tier, Some(1));
        assert_eq!(p.bye_week, Some(10));
        assert!(!p.drafted);
    }

    #[test]
    fn normalize_long_field_names() {
        let v = json!({
            "playerId": 3294,
            "fullName": "Christian McCaffrey",
            "defaultPosition": "RB",
            "proTeam": "SF",
            "fpts": 320.1,
            "averageDraftPosition": 2.1,
            "bye": 9
        });
        let p = normalize_player(&v).unwrap();
        assert_eq!(p.id, "3294");
        assert_eq!(p.name, "Christian McCaffrey");
        assert_eq!(p.position, Position::RunningBack);
        assert_eq!(p.pro_team, "SF");
        assert_eq!(p.projected_points, Some(320.1));
        assert_eq!(p.adp, Some(2.1));
        assert_eq!(p.bye_week, Some(9));
    }

    #[test]
    fn normalize_minimal_record() {
        let v = json!({ "id": 1, "name": "Some Defense", "pos": "D/ST" });
        let p = normalize_player(&v).unwrap();
        assert_eq!(p.position, Position::Defense);
        assert!(p.pro_team.is_empty());
        assert!(p.projected_points.is_none());
        assert!(p.adp.is_none());
    }

    #[test]
    fn normalize_rejects_missing_required_fields() {
        assert!(normalize_player(&json!({ "name": "No Id", "position": "QB" })).is_none());
        assert!(normalize_player(&json!({ "id": 1, "position": "QB" })).is_none());
        assert!(normalize_player(&json!({ "id": 1, "name": "Bad Pos", "position": "??" })).is_none());
    }

    // ------------------------------------------------------------------
    // parse_players
    // ------------------------------------------------------------------

    #[test]
    fn parse_bare_array() {
        let v = json!([
            { "id": 1, "name": "A", "position": "QB" },
            { "id": 2, "name": "B", "position": "WR" }
        ]);
        assert_eq!(parse_players(&v).len(), 2);
    }

    #[test]
    fn parse_wrapped_players_array() {
        let v = json!({ "players": [{ "id": 1, "name": "A", "position": "TE" }] });
        let players = parse_players(&v);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position, Position::TightEnd);
    }

    #[test]
    fn parse_wrapped_data_array() {
        let v = json!({ "data": [{ "id": 9, "name": "K", "position": "K" }] });
        assert_eq!(parse_players(&v).len(), 1);
    }

    #[test]
    fn parse_skips_malformed_entries() {
        let v = json!([
            { "id": 1, "name": "Good", "position": "RB" },
            { "name": "No Id" },
            "not even an object"
        ]);
        let players = parse_players(&v);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Good");
    }

    #[test]
    fn parse_non_array_response_is_empty() {
        assert!(parse_players(&json!({ "error": "oops" })).is_empty());
        assert!(parse_players(&json!(null)).is_empty());
    }

    // ------------------------------------------------------------------
    // Query params
    // ------------------------------------------------------------------

    #[test]
    fn query_params_only_include_set_fields() {
        let q = CatalogQuery {
            position: Some("RB".to_string()),
            limit: Some(50),
            ..Default::default()
        };
        let params = q.to_params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("position".to_string(), "RB".to_string())));
        assert!(params.contains(&("limit".to_string(), "50".to_string())));
    }

    // ------------------------------------------------------------------
    // CSV import
    // ------------------------------------------------------------------

    #[test]
    fn csv_import_full_and_sparse_rows() {
        let tmp = std::env::temp_dir().join("catalog_test_rankings.csv");
        std::fs::write(
            &tmp,
            "id,name,position,team,projected_points,adp,tier,bye_week\n\
             4046,Patrick Mahomes,QB,KC,380.5,25.3,1,10\n\
             3294,Christian McCaffrey,RB,SF,,,,\n\
             9999,Mystery Man,XX,,,,,\n",
        )
        .unwrap();

        let players = import_rankings_csv(&tmp).unwrap();
        assert_eq!(players.len(), 2);

        assert_eq!(players[0].id, "4046");
        assert_eq!(players[0].projected_points, Some(380.5));
        assert_eq!(players[0].tier, Some(1));

        assert_eq!(players[1].name, "Christian McCaffrey");
        assert!(players[1].projected_points.is_none());
        assert!(players[1].adp.is_none());

        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn csv_import_missing_file_errors() {
        let result = import_rankings_csv(Path::new("/nonexistent/rankings.csv"));
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------
    // HTTP behavior against a mock server
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn list_players_against_mock_server() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut buf = vec![0u8; 4096];
            let n = tokio::io::AsyncReadExt::read(&mut socket, &mut buf)
                .await
                .unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let body = r#"{"players":[{"id":1,"name":"A","position":"QB"},{"id":2,"name":"B","position":"WR"}]}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            request
        });

        let catalog = PlayerCatalog::new(format!("http://{addr}"));
        let query = CatalogQuery {
            position: Some("QB".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let players = catalog.list_players(&query).await.unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "A");

        // The request should have carried the query params.
        let request = server_task.await.unwrap();
        assert!(request.contains("GET /players?"));
        assert!(request.contains("position=QB"));
        assert!(request.contains("limit=10"));
    }

    #[tokio::test]
    async fn list_players_error_status_is_err() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut buf).await;

            let response =
                "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n";
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        });

        let catalog = PlayerCatalog::new(format!("http://{addr}"));
        let result = catalog.list_players(&CatalogQuery::default()).await;
        assert!(result.is_err());
    }
}
