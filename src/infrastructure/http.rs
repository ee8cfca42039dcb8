//! HTTP client for the budget service
//!
//! One blocking `reqwest` client with a cookie store backs every collaborator
//! trait, so the session cookie set by `/login` is sent on later calls.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::domain::{Breadcrumb, CategoryNode, Mode, NodeId, Session, Stats};
use crate::infrastructure::traits::{AllocationStore, AuthApi, StatsApi, TreeApi};
use crate::infrastructure::{ApiError, ApiResult, InfraError, InfraResult};

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct HasChildren {
    has_children: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Budget service reached over HTTP.
#[derive(Debug)]
pub struct HttpBudgetApi {
    client: Client,
    base_url: String,
}

impl HttpBudgetApi {
    /// Build a client from the configured server URL and timeouts.
    pub fn new(settings: &Settings) -> InfraResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|source| InfraError::Http {
                context: format!("build client for {}", settings.server_url),
                source,
            })?;

        Ok(Self {
            client,
            base_url: settings.server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        trace!("GET {url}");
        let response = check(self.client.get(&url).send()?)?;
        Ok(response.json::<T>()?)
    }

    fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = self.url(path);
        trace!("POST {url}");
        check(self.client.post(&url).json(body).send()?)?;
        Ok(())
    }
}

/// Turn non-2xx responses into [`ApiError::Rejected`], keeping the server's
/// `error` message when the body carries one.
fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    debug!(status = status.as_u16(), "request rejected");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: rejection_message(&body),
    })
}

fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl TreeApi for HttpBudgetApi {
    #[instrument(level = "debug", skip(self))]
    fn children(&self, parent: NodeId, mode: Mode) -> ApiResult<Vec<CategoryNode>> {
        self.get_json(&format!("/api/tree/{parent}?mode={mode}"))
    }

    #[instrument(level = "debug", skip(self))]
    fn node(&self, id: NodeId) -> ApiResult<Option<CategoryNode>> {
        match self.get_json(&format!("/api/node/{id}")) {
            Err(ApiError::Rejected { status: 404, .. }) => Ok(None),
            other => other,
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn has_children(&self, id: NodeId) -> ApiResult<bool> {
        let reply: HasChildren = self.get_json(&format!("/api/tree/{id}/has_children"))?;
        Ok(reply.has_children)
    }

    #[instrument(level = "debug", skip(self))]
    fn breadcrumbs(&self, id: NodeId) -> ApiResult<Vec<Breadcrumb>> {
        self.get_json(&format!("/api/breadcrumbs/{id}"))
    }
}

impl AuthApi for HttpBudgetApi {
    fn session(&self) -> ApiResult<Session> {
        self.get_json("/api/me")
    }

    #[instrument(level = "debug", skip(self, password))]
    fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        self.post_json("/login", &Credentials { username, password })
    }

    fn logout(&self) -> ApiResult<()> {
        let url = self.url("/logout");
        check(self.client.post(&url).send()?)?;
        Ok(())
    }
}

impl AllocationStore for HttpBudgetApi {
    #[instrument(level = "debug", skip(self, nodes), fields(count = nodes.len()))]
    fn allocate(&self, nodes: &[CategoryNode]) -> ApiResult<()> {
        self.post_json("/api/allocate", nodes)
    }
}

impl StatsApi for HttpBudgetApi {
    fn stats(&self) -> ApiResult<Stats> {
        self.get_json("/api/stats")
    }
}
