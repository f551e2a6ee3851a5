// SQLite persistence layer: the pick log used for crash recovery.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// One logged pick, as written to and read back from the pick log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedPick {
    /// 1-based overall pick number.
    pub overall_pick: u32,
    pub round: u32,
    /// Id of the team the player was assigned to.
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    pub position: String,
}

/// SQLite-backed persistence for draft picks and key-value draft state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                overall_pick INTEGER NOT NULL,
                round        INTEGER NOT NULL,
                team_id      TEXT NOT NULL,
                player_id    TEXT NOT NULL,
                player_name  TEXT NOT NULL,
                position     TEXT NOT NULL,
                draft_id     TEXT NOT NULL DEFAULT '',
                timestamp    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (overall_pick, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        // Index on draft_id for efficient filtering. The composite PK is
        // ordered (overall_pick, draft_id) so queries filtering by draft_id
        // alone cannot use it efficiently.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_draft_picks_draft_id ON draft_picks(draft_id);",
        )
        .context("failed to create draft_id index")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Record a single draft pick. Uses INSERT OR IGNORE for idempotency —
    /// re-recording the same overall_pick is a no-op. Timestamp is
    /// auto-generated by SQLite.
    ///
    /// The `draft_id` scopes this pick to a specific draft session so picks
    /// from different sessions don't intermingle.
    pub fn record_pick(&self, pick: &LoggedPick, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO draft_picks
                (overall_pick, round, team_id, player_id, player_name, position, draft_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pick.overall_pick,
                pick.round,
                pick.team_id,
                pick.player_id,
                pick.player_name,
                pick.position,
                draft_id,
            ],
        )
        .context("failed to record draft pick")?;
        Ok(())
    }

    /// Delete the highest-numbered pick for the given draft session (the
    /// persistence side of undo). Returns the deleted pick number, or `None`
    /// if the session has no picks.
    pub fn delete_last_pick(&self, draft_id: &str) -> Result<Option<u32>> {
        let conn = self.conn();
        let last: Option<u32> = conn
            .query_row(
                "SELECT MAX(overall_pick) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to find last pick")?;

        if let Some(overall) = last {
            conn.execute(
                "DELETE FROM draft_picks WHERE draft_id = ?1 AND overall_pick = ?2",
                params![draft_id, overall],
            )
            .context("failed to delete last pick")?;
        }
        Ok(last)
    }

    /// Load draft picks for a specific draft session, ordered by pick number.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<LoggedPick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT overall_pick, round, team_id, player_id, player_name, position
                 FROM draft_picks WHERE draft_id = ?1 ORDER BY overall_pick",
            )
            .context("failed to prepare load_picks query")?;

        let picks = stmt
            .query_map(params![draft_id], |row| {
                Ok(LoggedPick {
                    overall_pick: row.get(0)?,
                    round: row.get(1)?,
                    team_id: row.get(2)?,
                    player_id: row.get(3)?,
                    player_name: row.get(4)?,
                    position: row.get(5)?,
                })
            })
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft pick rows")?;

        Ok(picks)
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Returns `true` if at least one draft pick has been recorded for the
    /// given `draft_id`.
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_picks WHERE draft_id = ?1)",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to check draft_picks existence")?;
        Ok(exists)
    }

    /// Return the number of draft picks recorded for the given `draft_id`.
    pub fn pick_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to count draft picks")?;
        Ok(count as usize)
    }

    /// Delete all draft picks and draft state, resetting to a clean slate.
    /// Uses a transaction with automatic rollback on error.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_picks", [])
            .context("failed to delete draft picks")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    /// Key used in the draft_state table to store the current draft ID.
    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    /// Retrieve the stored draft ID from the key-value store.
    /// Returns `None` if no draft ID has been set yet.
    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Persist a draft ID to the key-value store.
    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// Generate a new unique draft ID based on the current UTC timestamp.
    ///
    /// Format: `draft_YYYYMMDD_HHMMSS_SSS`. The millisecond suffix ensures
    /// uniqueness even if two drafts start in the same second.
    pub fn generate_draft_id() -> String {
        let now = chrono::Utc::now();
        now.format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Test draft ID used across all db tests.
    const TEST_DRAFT_ID: &str = "test_draft_001";

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    /// Helper: build a sample LoggedPick.
    fn sample_pick(overall_pick: u32) -> LoggedPick {
        LoggedPick {
            overall_pick,
            round: (overall_pick - 1) / 12 + 1,
            team_id: "team_1".to_string(),
            player_id: format!("p{overall_pick}"),
            player_name: format!("Player {overall_pick}"),
            position: "RB".to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Schema / open
    // ------------------------------------------------------------------

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"draft_picks".to_string()));
        assert!(tables.contains(&"draft_state".to_string()));
    }

    // ------------------------------------------------------------------
    // Draft picks
    // ------------------------------------------------------------------

    #[test]
    fn insert_and_load_picks_round_trip() {
        let db = test_db();

        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        let pick2 = LoggedPick {
            overall_pick: 2,
            round: 1,
            team_id: "team_2".to_string(),
            player_id: "p99".to_string(),
            player_name: "Player 99".to_string(),
            position: "WR".to_string(),
        };
        db.record_pick(&pick2, TEST_DRAFT_ID).unwrap();

        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0], sample_pick(1));
        assert_eq!(picks[1], pick2);
    }

    #[test]
    fn load_picks_returns_empty_vec_when_no_picks() {
        let db = test_db();
        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert!(picks.is_empty());
    }

    #[test]
    fn record_pick_idempotent_on_duplicate() {
        let db = test_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        // Recording the same overall_pick again is a no-op, not an error.
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();

        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn record_pick_auto_generates_timestamp() {
        let db = test_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();

        let conn = db.conn();
        let ts: String = conn
            .query_row(
                "SELECT timestamp FROM draft_picks WHERE overall_pick = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!ts.is_empty());
        assert!(ts.contains('T'));
    }

    // ------------------------------------------------------------------
    // delete_last_pick (undo)
    // ------------------------------------------------------------------

    #[test]
    fn delete_last_pick_removes_highest() {
        let db = test_db();
        for i in 1..=3 {
            db.record_pick(&sample_pick(i), TEST_DRAFT_ID).unwrap();
        }

        let deleted = db.delete_last_pick(TEST_DRAFT_ID).unwrap();
        assert_eq!(deleted, Some(3));

        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks.last().unwrap().overall_pick, 2);
    }

    #[test]
    fn delete_last_pick_on_empty_log_is_none() {
        let db = test_db();
        assert_eq!(db.delete_last_pick(TEST_DRAFT_ID).unwrap(), None);
    }

    #[test]
    fn delete_last_pick_scoped_to_draft_id() {
        let db = test_db();
        db.record_pick(&sample_pick(1), "draft_a").unwrap();
        db.record_pick(&sample_pick(5), "draft_b").unwrap();

        assert_eq!(db.delete_last_pick("draft_a").unwrap(), Some(1));
        // draft_b untouched
        assert_eq!(db.load_picks("draft_b").unwrap().len(), 1);
    }

    #[test]
    fn record_after_undo_reuses_pick_number() {
        let db = test_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        db.delete_last_pick(TEST_DRAFT_ID).unwrap();

        let replacement = LoggedPick {
            player_id: "p42".to_string(),
            player_name: "Player 42".to_string(),
            ..sample_pick(1)
        };
        db.record_pick(&replacement, TEST_DRAFT_ID).unwrap();

        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].player_id, "p42");
    }

    // ------------------------------------------------------------------
    // Draft state (key-value)
    // ------------------------------------------------------------------

    #[test]
    fn save_and_load_state_round_trip() {
        let db = test_db();
        let value = json!({"current_pick": 13, "round": 2});

        db.save_state("cursor", &value).unwrap();

        let loaded = db.load_state("cursor").unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn load_state_returns_none_for_missing_key() {
        let db = test_db();
        let loaded = db.load_state("nonexistent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_state_overwrites_previous_value() {
        let db = test_db();
        db.save_state("key", &json!(1)).unwrap();
        db.save_state("key", &json!(2)).unwrap();

        let loaded = db.load_state("key").unwrap();
        assert_eq!(loaded, Some(json!(2)));
    }

    // ------------------------------------------------------------------
    // has_draft_in_progress / clear_draft
    // ------------------------------------------------------------------

    #[test]
    fn has_draft_in_progress_false_then_true() {
        let db = test_db();
        assert!(!db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());

        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        assert!(db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());
    }

    #[test]
    fn pick_count_tracks_inserts() {
        let db = test_db();
        assert_eq!(db.pick_count(TEST_DRAFT_ID).unwrap(), 0);
        for i in 1..=4 {
            db.record_pick(&sample_pick(i), TEST_DRAFT_ID).unwrap();
        }
        assert_eq!(db.pick_count(TEST_DRAFT_ID).unwrap(), 4);
    }

    #[test]
    fn clear_draft_resets_picks_and_state() {
        let db = test_db();

        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        db.save_state("cursor", &json!(5)).unwrap();
        assert!(db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());

        db.clear_draft().unwrap();

        assert!(!db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());
        assert!(db.load_state("cursor").unwrap().is_none());
    }

    // ------------------------------------------------------------------
    // Draft ID isolation
    // ------------------------------------------------------------------

    #[test]
    fn picks_scoped_to_draft_id() {
        let db = test_db();
        let draft_a = "draft_a";
        let draft_b = "draft_b";

        db.record_pick(&sample_pick(1), draft_a).unwrap();
        db.record_pick(&sample_pick(2), draft_a).unwrap();
        db.record_pick(&sample_pick(3), draft_b).unwrap();

        let picks_a = db.load_picks(draft_a).unwrap();
        assert_eq!(picks_a.len(), 2);
        assert_eq!(picks_a[0].overall_pick, 1);
        assert_eq!(picks_a[1].overall_pick, 2);

        let picks_b = db.load_picks(draft_b).unwrap();
        assert_eq!(picks_b.len(), 1);
        assert_eq!(picks_b[0].overall_pick, 3);

        assert!(db.has_draft_in_progress(draft_a).unwrap());
        assert!(db.has_draft_in_progress(draft_b).unwrap());
        assert!(!db.has_draft_in_progress("draft_nonexistent").unwrap());
    }

    #[test]
    fn draft_id_persists_via_state_store() {
        let db = test_db();

        assert!(db.get_draft_id().unwrap().is_none());

        db.set_draft_id("draft_20260826_143022_123").unwrap();
        assert_eq!(
            db.get_draft_id().unwrap(),
            Some("draft_20260826_143022_123".to_string())
        );

        db.set_draft_id("draft_20260901_090000_456").unwrap();
        assert_eq!(
            db.get_draft_id().unwrap(),
            Some("draft_20260901_090000_456".to_string())
        );
    }

    #[test]
    fn generate_draft_id_format() {
        let id = Database::generate_draft_id();
        assert!(id.starts_with("draft_"), "Draft ID should start with 'draft_': {}", id);
        // Should be ~25 chars: draft_YYYYMMDD_HHMMSS_SSS
        assert!(id.len() >= 24, "Draft ID should be at least 24 chars: {}", id);
    }

    #[test]
    fn old_draft_picks_invisible_to_new_draft() {
        let db = test_db();
        let old_draft = "draft_old";
        let new_draft = "draft_new";

        for i in 1..=10 {
            db.record_pick(&sample_pick(i), old_draft).unwrap();
        }
        assert_eq!(db.load_picks(old_draft).unwrap().len(), 10);

        assert!(!db.has_draft_in_progress(new_draft).unwrap());
        assert!(db.load_picks(new_draft).unwrap().is_empty());

        db.record_pick(&sample_pick(1), new_draft).unwrap();
        assert_eq!(db.load_picks(old_draft).unwrap().len(), 10);
        assert_eq!(db.load_picks(new_draft).unwrap().len(), 1);
    }
}
