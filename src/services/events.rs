// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain event publishing for monitoring consumers.
//!
//! Events are always logged. When `MONITORING_URL` is set they are also
//! POSTed there as JSON on a spawned task; delivery failures are logged and
//! never reach the request that produced the event.

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Action tag attached to `user_created` events.
pub const USER_REGISTERED_ACTION: &str = "USER_REGISTERED";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    UserCreated {
        user_id: Uuid,
        username: String,
        action: &'static str,
    },
    RunLogged {
        user_id: Uuid,
        club_id: Uuid,
        activity_id: Uuid,
        distance_km: f64,
        tokens_minted: u64,
    },
}

impl Event {
    pub fn user_created(user_id: Uuid, username: &str) -> Self {
        Event::UserCreated {
            user_id,
            username: username.to_string(),
            action: USER_REGISTERED_ACTION,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::UserCreated { .. } => "user_created",
            Event::RunLogged { .. } => "run_logged",
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(flatten)]
    event: &'a Event,
    occurred_at: DateTime<Utc>,
}

/// Fire-and-forget event sink.
#[derive(Debug, Clone, Default)]
pub struct EventPublisher {
    http: reqwest::Client,
    url: Option<String>,
}

impl EventPublisher {
    pub fn new(url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.monitoring_url.is_none() {
            tracing::info!("MONITORING_URL not set, domain events will only be logged");
        }
        Self::new(config.monitoring_url.clone())
    }

    pub fn publish(&self, event: Event) {
        tracing::info!(event = event.name(), payload = ?event, "Domain event");

        let Some(url) = self.url.clone() else {
            return;
        };
        let body = Envelope {
            event: &event,
            occurred_at: Utc::now(),
        };
        let body = match serde_json::to_value(&body) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(event = event.name(), error = %e, "Failed to encode event");
                return;
            }
        };

        let http = self.http.clone();
        let name = event.name();
        tokio::spawn(async move {
            let result = http
                .post(&url)
                .json(&body)
                .send()
                .await
                .and_then(|r| r.error_for_status());
            if let Err(e) = result {
                tracing::warn!(event = name, error = %e, "Failed to deliver event");
            }
        });
    }
}
