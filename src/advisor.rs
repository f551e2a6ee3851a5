// Recommendation endpoint client.
//
// Drafting never waits on advice: any transport error, non-success status,
// or unparseable body degrades to a fixed placeholder string instead of an
// error. The generation counter lets the orchestrator discard responses
// that arrive after a newer request was issued.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::draft::DraftState;

/// Shown in the advice panel when the endpoint cannot be reached or answers
/// with anything unusable.
pub const UNAVAILABLE: &str = "Recommendations unavailable right now.";

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// One entry of the drafted-player history sent to the endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DraftedEntry {
    pub overall_pick: u32,
    pub round: u32,
    pub team_id: String,
    pub player_name: String,
    pub position: String,
}

/// The full request body for an advice call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdvicePayload {
    pub league_name: String,
    pub format: String,
    pub num_teams: usize,
    pub custom_rules: String,
    pub user_team: String,
    pub current_pick: u32,
    pub drafted: Vec<DraftedEntry>,
}

impl AdvicePayload {
    /// Assemble the payload from the live draft state.
    pub fn from_state(config: &Config, state: &DraftState) -> Self {
        let drafted = state
            .pick_log()
            .filter_map(|(slot, pid)| {
                let player = state.player(pid)?;
                let team_id = player.drafted_info.as_ref()?.team_id.clone();
                Some(DraftedEntry {
                    overall_pick: slot.overall,
                    round: slot.round,
                    team_id,
                    player_name: player.name.clone(),
                    position: player.position.display_str().to_string(),
                })
            })
            .collect();

        AdvicePayload {
            league_name: config.league.name.clone(),
            format: config.league.format.clone(),
            num_teams: config.league.num_teams,
            custom_rules: config.league.custom_rules.clone(),
            user_team: state
                .user_team()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            current_pick: state.current_pick,
            drafted,
        }
    }
}

// ---------------------------------------------------------------------------
// Advice response
// ---------------------------------------------------------------------------

/// Advice delivered back to the orchestrator over the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub text: String,
    pub reasoning: String,
    /// Request generation, used to drop stale responses.
    pub generation: u64,
}

impl Advice {
    fn unavailable(generation: u64) -> Self {
        Advice {
            text: UNAVAILABLE.to_string(),
            reasoning: String::new(),
            generation,
        }
    }
}

/// Extract advice + reasoning from a response body. The endpoint answers
/// `{ "advice": "...", "reasoning": "..." }`; reasoning is optional.
pub(crate) fn parse_advice(body: &str, generation: u64) -> Option<Advice> {
    let v: Value = serde_json::from_str(body).ok()?;
    let text = v.get("advice")?.as_str()?.to_string();
    if text.is_empty() {
        return None;
    }
    let reasoning = v
        .get("reasoning")
        .and_then(|r| r.as_str())
        .unwrap_or("")
        .to_string();
    Some(Advice {
        text,
        reasoning,
        generation,
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Low-level HTTP client for the recommendation endpoint.
pub struct AdvisorHttp {
    http: reqwest::Client,
    base_url: String,
}

impl AdvisorHttp {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// POST the payload and return advice, degrading to the placeholder on
    /// any failure.
    pub async fn fetch(&self, payload: &AdvicePayload, generation: u64) -> Advice {
        let url = format!("{}/recommend", self.base_url.trim_end_matches('/'));

        let response = match self.http.post(&url).json(payload).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("advice request failed: {e}");
                return Advice::unavailable(generation);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "advice endpoint returned non-success");
            return Advice::unavailable(generation);
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("failed to read advice response: {e}");
                return Advice::unavailable(generation);
            }
        };

        match parse_advice(&body, generation) {
            Some(advice) => {
                debug!(generation, "advice received");
                advice
            }
            None => {
                warn!("advice response body was unusable");
                Advice::unavailable(generation)
            }
        }
    }
}

/// High-level wrapper that is either an active client or disabled.
pub enum RecommendationClient {
    Active(AdvisorHttp),
    Disabled,
}

impl RecommendationClient {
    /// Build from the application config. Disabled when the advisor section
    /// is switched off or has no base URL.
    pub fn from_config(config: &Config) -> Self {
        if config.advisor.enabled && !config.advisor.base_url.is_empty() {
            RecommendationClient::Active(AdvisorHttp::new(config.advisor.base_url.clone()))
        } else {
            RecommendationClient::Disabled
        }
    }

    /// Fetch advice, or the placeholder immediately when disabled.
    pub async fn fetch(&self, payload: &AdvicePayload, generation: u64) -> Advice {
        match self {
            RecommendationClient::Active(client) => client.fetch(payload, generation).await,
            RecommendationClient::Disabled => Advice::unavailable(generation),
        }
    }
}
