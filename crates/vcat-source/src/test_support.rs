//! Scripted [`HttpTransport`] for tests.
//!
//! Responses are queued per URL and handed out in order; a URL with an empty
//! queue answers 404. Every call is counted so tests can assert on the number
//! of network attempts.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use crate::error::SourceError;
use crate::http::HttpTransport;

#[derive(Debug, Clone)]
enum Scripted {
    Respond { status: u16, body: String },
    Fail(String),
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`.
    #[must_use]
    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        self.push(
            url,
            Scripted::Respond {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Queue a transport failure for `url`.
    #[must_use]
    pub fn fail(self, url: &str, message: &str) -> Self {
        self.push(url, Scripted::Fail(message.to_string()));
        self
    }

    /// Number of requests sent to `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .expect("scripted transport lock")
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    /// Number of requests sent to any URL.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("scripted transport lock")
            .values()
            .sum()
    }

    fn push(&self, url: &str, scripted: Scripted) {
        self.routes
            .lock()
            .expect("scripted transport lock")
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
    }

    fn next(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        *self
            .calls
            .lock()
            .expect("scripted transport lock")
            .entry(url.to_string())
            .or_default() += 1;

        let scripted = self
            .routes
            .lock()
            .expect("scripted transport lock")
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted::Respond { status, body }) => Ok(response(status, body)),
            Some(Scripted::Fail(message)) => Err(SourceError::RemoteCall {
                url: url.to_string(),
                message,
            }),
            None => Ok(response(404, String::new())),
        }
    }
}

impl HttpTransport for ScriptedTransport {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<reqwest::Response, SourceError>> + Send {
        std::future::ready(self.next(url))
    }
}

fn response(status: u16, body: String) -> reqwest::Response {
    reqwest::Response::from(
        http::Response::builder()
            .status(status)
            .body(body)
            .expect("scripted response should build"),
    )
}
