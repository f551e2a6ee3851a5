// Hosted document-store adapter.
//
// The store's record format is flat: nested structures (config, teams,
// board) travel as JSON-encoded text blobs inside the record and are decoded
// on read. Saves are last-writer-wins; the caller decides when to retry
// (it doesn't — failures are logged and surfaced, never retried here).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::LeagueConfig;
use crate::draft::{BoardSlot, DraftState, RosterSlotRule, Team};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned status {status} for {operation}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to encode record field `{field}`: {source}")]
    Encode {
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("failed to decode record field `{field}`: {source}")]
    Decode {
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("draft record `{0}` not found")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Record format
// ---------------------------------------------------------------------------

/// One draft document as the hosted store sees it. `config_json`,
/// `teams_json`, and `board_json` are JSON-encoded text blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft_id: String,
    pub user_id: String,
    pub league_name: String,
    pub config_json: String,
    pub teams_json: String,
    pub board_json: String,
    /// Number of picks applied when this snapshot was taken.
    pub pick_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// The league settings captured inside a record's config blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub num_teams: usize,
    pub user_slot: usize,
    pub format: String,
    pub custom_rules: String,
    pub roster: Vec<RosterSlotRule>,
}

/// A record decoded back into engine shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub config: ConfigSnapshot,
    pub teams: Vec<Team>,
    pub board: Vec<BoardSlot>,
}

/// Encode the live draft state into the store's record format.
pub fn encode_record(
    draft_id: &str,
    user_id: &str,
    league: &LeagueConfig,
    state: &DraftState,
) -> Result<DraftRecord, StoreError> {
    let config = ConfigSnapshot {
        num_teams: league.num_teams,
        user_slot: league.user_slot,
        format: league.format.clone(),
        custom_rules: league.custom_rules.clone(),
        roster: state.roster_rules.slots.clone(),
    };

    let config_json = serde_json::to_string(&config).map_err(|source| StoreError::Encode {
        field: "config_json",
        source,
    })?;
    let teams_json = serde_json::to_string(&state.teams).map_err(|source| StoreError::Encode {
        field: "teams_json",
        source,
    })?;
    let board_json = serde_json::to_string(&state.board).map_err(|source| StoreError::Encode {
        field: "board_json",
        source,
    })?;

    Ok(DraftRecord {
        draft_id: draft_id.to_string(),
        user_id: user_id.to_string(),
        league_name: league.name.clone(),
        config_json,
        teams_json,
        board_json,
        pick_count: state.current_pick - 1,
        updated_at: Utc::now(),
    })
}

/// Decode a record's JSON blobs back into engine shapes.
pub fn decode_record(record: &DraftRecord) -> Result<DraftSnapshot, StoreError> {
    let config: ConfigSnapshot =
        serde_json::from_str(&record.config_json).map_err(|source| StoreError::Decode {
            field: "config_json",
            source,
        })?;
    let teams: Vec<Team> =
        serde_json::from_str(&record.teams_json).map_err(|source| StoreError::Decode {
            field: "teams_json",
            source,
        })?;
    let board: Vec<BoardSlot> =
        serde_json::from_str(&record.board_json).map_err(|source| StoreError::Decode {
            field: "board_json",
            source,
        })?;

    Ok(DraftSnapshot {
        config,
        teams,
        board,
    })
}

// ---------------------------------------------------------------------------
// DocumentStore trait + HTTP implementation
// ---------------------------------------------------------------------------

/// Seam over the hosted store so the orchestrator can be tested against an
/// in-memory fake.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, record: &DraftRecord) -> Result<(), StoreError>;
    async fn get(&self, draft_id: &str) -> Result<DraftRecord, StoreError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<DraftRecord>, StoreError>;
    async fn update(&self, record: &DraftRecord) -> Result<(), StoreError>;
    async fn delete(&self, draft_id: &str) -> Result<(), StoreError>;
}

/// `DocumentStore` backed by the hosted store's HTTP API.
pub struct HttpDocumentStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    fn check_status(
        operation: &'static str,
        response: &reqwest::Response,
    ) -> Result<(), StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!(%status, operation, "store request rejected");
            Err(StoreError::Status { operation, status })
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create(&self, record: &DraftRecord) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("drafts"))
            .json(record)
            .send()
            .await
            .inspect_err(|e| warn!("store create failed: {e}"))?;
        Self::check_status("create", &response)
    }

    async fn get(&self, draft_id: &str) -> Result<DraftRecord, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("drafts/{draft_id}")))
            .send()
            .await
            .inspect_err(|e| warn!("store get failed: {e}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(draft_id.to_string()));
        }
        Self::check_status("get", &response)?;
        Ok(response.json::<DraftRecord>().await?)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<DraftRecord>, StoreError> {
        let response = self
            .http
            .get(self.url("drafts"))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .inspect_err(|e| warn!("store list failed: {e}"))?;
        Self::check_status("list_for_user", &response)?;
        Ok(response.json::<Vec<DraftRecord>>().await?)
    }

    async fn update(&self, record: &DraftRecord) -> Result<(), StoreError> {
        let response = self
            .http
            .put(self.url(&format!("drafts/{}", record.draft_id)))
            .json(record)
            .send()
            .await
            .inspect_err(|e| warn!("store update failed: {e}"))?;
        Self::check_status("update", &response)
    }

    async fn delete(&self, draft_id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("drafts/{draft_id}")))
            .send()
            .await
            .inspect_err(|e| warn!("store delete failed: {e}"))?;
        Self::check_status("delete", &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{Player, Position, RosterRules};
    use std::collections::HashMap;

    fn test_league() -> LeagueConfig {
        LeagueConfig {
            name: "Test League".to_string(),
            num_teams: 10,
            user_slot: 3,
            format: "PPR".to_string(),
            custom_rules: "no trades".to_string(),
            roster: HashMap::new(),
        }
    }

    fn test_state() -> DraftState {
        let teams = Team::build_teams(10, 3);
        let players = (1..=5)
            .map(|i| Player::new(format!("p{i}"), format!("Player {i}"), Position::WideReceiver))
            .collect();
        DraftState::new(teams, RosterRules::default_shape(), players)
    }

    // ------------------------------------------------------------------
    // Record encode/decode
    // ------------------------------------------------------------------

    #[test]
    fn record_round_trips_through_blobs() {
        let mut state = test_state();
        assert!(state.draft_player("p1", None));
        assert!(state.draft_player("p2", Some("team_7")));

        let record = encode_record("draft_x", "user_1", &test_league(), &state).unwrap();
        assert_eq!(record.draft_id, "draft_x");
        assert_eq!(record.user_id, "user_1");
        assert_eq!(record.league_name, "Test League");
        assert_eq!(record.pick_count, 2);

        let snapshot = decode_record(&record).unwrap();
        assert_eq!(snapshot.teams, state.teams);
        assert_eq!(snapshot.board, state.board);
        assert_eq!(snapshot.config.num_teams, 10);
        assert_eq!(snapshot.config.user_slot, 3);
        assert_eq!(snapshot.config.custom_rules, "no trades");
        assert_eq!(snapshot.config.roster, state.roster_rules.slots);
    }

    #[test]
    fn record_survives_json_wire_format() {
        let state = test_state();
        let record = encode_record("draft_y", "user_2", &test_league(), &state).unwrap();

        // Records travel over HTTP as JSON themselves.
        let wire = serde_json::to_string(&record).unwrap();
        let parsed: DraftRecord = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, record);

        let snapshot = decode_record(&parsed).unwrap();
        assert_eq!(snapshot.board.len(), 160);
    }

    #[test]
    fn decode_rejects_corrupt_blob() {
        let state = test_state();
        let mut record = encode_record("draft_z", "user_3", &test_league(), &state).unwrap();
        record.teams_json = "{not json".to_string();

        let err = decode_record(&record).unwrap_err();
        match err {
            StoreError::Decode { field, .. } => assert_eq!(field, "teams_json"),
            other => panic!("expected Decode error, got: {other}"),
        }
    }

    // ------------------------------------------------------------------
    // HTTP behavior against a mock server
    // ------------------------------------------------------------------

    async fn one_shot_server(
        response: String,
    ) -> (std::net::SocketAddr, tokio::task::JoinHandle<String>) {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16384];
            let n = tokio::io::AsyncReadExt::read(&mut socket, &mut buf)
                .await
                .unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            request
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn create_posts_record() {
        let (addr, handle) =
            one_shot_server("HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n".to_string())
                .await;

        let store = HttpDocumentStore::new(format!("http://{addr}"));
        let record = encode_record("draft_a", "user_1", &test_league(), &test_state()).unwrap();
        store.create(&record).await.unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /drafts "));
        assert!(request.contains("\"draft_id\":\"draft_a\""));
    }

    #[tokio::test]
    async fn get_missing_record_is_not_found() {
        let (addr, _handle) =
            one_shot_server("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string())
                .await;

        let store = HttpDocumentStore::new(format!("http://{addr}"));
        let err = store.get("draft_missing").await.unwrap_err();
        match err {
            StoreError::NotFound(id) => assert_eq!(id, "draft_missing"),
            other => panic!("expected NotFound, got: {other}"),
        }
    }

    #[tokio::test]
    async fn update_failure_is_status_error() {
        let (addr, _handle) = one_shot_server(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\n\r\n".to_string(),
        )
        .await;

        let store = HttpDocumentStore::new(format!("http://{addr}"));
        let record = encode_record("draft_b", "user_1", &test_league(), &test_state()).unwrap();
        let err = store.update(&record).await.unwrap_err();
        match err {
            StoreError::Status { operation, status } => {
                assert_eq!(operation, "update");
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
            }
            other => panic!("expected Status error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn list_for_user_sends_query_and_parses() {
        let state = test_state();
        let record = encode_record("draft_c", "user_9", &test_league(), &state).unwrap();
        let body = serde_json::to_string(&vec![record.clone()]).unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let (addr, handle) = one_shot_server(response).await;

        let store = HttpDocumentStore::new(format!("http://{addr}"));
        let records = store.list_for_user("user_9").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].draft_id, "draft_c");

        let request = handle.await.unwrap();
        assert!(request.contains("GET /drafts?user_id=user_9"));
    }

    #[tokio::test]
    async fn delete_uses_delete_method() {
        let (addr, handle) =
            one_shot_server("HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n".to_string())
                .await;

        let store = HttpDocumentStore::new(format!("http://{addr}"));
        store.delete("draft_d").await.unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("DELETE /drafts/draft_d "));
    }
}
