//! Test doubles for catalog transports.

use super::{CatalogError, CatalogTransport, TransportResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A request observed by `ScriptedTransport`.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub started_at: Instant,
}

impl RecordedCall {
    /// Looks up a query parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Start/end markers for each request, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportEvent {
    Started(String),
    Finished(String),
}

/// Scripted response: `Ok((status, body))` or `Err(network error message)`.
pub(crate) type ScriptedResponse = Result<(u16, String), String>;

/// Transport that replays scripted responses and records every request.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    events: Mutex<Vec<TransportEvent>>,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<ScriptedResponse>) -> Arc<Self> {
        Self::with_latency(responses, Duration::ZERO)
    }

    /// Like `new`, but every request blocks for `latency` before answering.
    pub fn with_latency(responses: Vec<ScriptedResponse>, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            latency,
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CatalogTransport for ScriptedTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<TransportResponse, CatalogError> {
        let call = RecordedCall {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
            started_at: Instant::now(),
        };
        let label = format!("{} {}", path, call.param("query").unwrap_or_default());

        self.calls.lock().unwrap().push(call);
        self.events
            .lock()
            .unwrap()
            .push(TransportEvent::Started(label.clone()));

        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let next = self.responses.lock().unwrap().pop_front();

        self.events
            .lock()
            .unwrap()
            .push(TransportEvent::Finished(label));

        match next {
            Some(Ok((status, body))) => Ok(TransportResponse { status, body }),
            Some(Err(message)) => Err(CatalogError::Request(message)),
            None => Err(CatalogError::Request("no scripted response left".to_string())),
        }
    }
}

/// Builds a `search/*` response body from `(id, name, genre_ids)` triples.
pub(crate) fn search_body(results: &[(u64, &str, &[u32])]) -> String {
    let results: Vec<serde_json::Value> = results
        .iter()
        .map(|(id, name, genres)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "first_air_date": "2020-04-01",
                "genre_ids": genres,
            })
        })
        .collect();

    serde_json::json!({ "page": 1, "results": results }).to_string()
}
