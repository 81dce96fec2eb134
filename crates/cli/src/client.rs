//! Thin HTTP client over the server API.

use api_types::{
    expense::{ExpenseCreated, ExpenseListResponse, ExpenseNew},
    settings::{SettingsUpdate, SettingsView},
    summary::SummaryView,
};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid credentials")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Per-request credentials; Basic auth stands in for a session token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    /// Checks whether the credentials open a session.
    pub async fn probe(&self, creds: &Credentials) -> std::result::Result<bool, ClientError> {
        match self.expenses(creds).await {
            Ok(_) => Ok(true),
            Err(ClientError::Unauthorized) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn signup(&self, creds: &Credentials) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .post(self.endpoint("user/signup")?)
            .json(&api_types::user::Signup {
                username: creds.username.clone(),
                password: creds.password.clone(),
            })
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(fail(res).await)
    }

    pub async fn expenses(
        &self,
        creds: &Credentials,
    ) -> std::result::Result<ExpenseListResponse, ClientError> {
        let res = self
            .http
            .get(self.endpoint("expenses")?)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;
        if res.status().is_success() {
            return res.json().await.map_err(ClientError::from);
        }
        Err(fail(res).await)
    }

    pub async fn expense_create(
        &self,
        creds: &Credentials,
        payload: &ExpenseNew,
    ) -> std::result::Result<ExpenseCreated, ClientError> {
        let res = self
            .http
            .post(self.endpoint("expenses")?)
            .basic_auth(&creds.username, Some(&creds.password))
            .json(payload)
            .send()
            .await?;
        if res.status().is_success() {
            return res.json().await.map_err(ClientError::from);
        }
        Err(fail(res).await)
    }

    pub async fn expense_delete(
        &self,
        creds: &Credentials,
        id: Uuid,
    ) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .delete(self.endpoint(&format!("expenses/{id}"))?)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(fail(res).await)
    }

    pub async fn settings(
        &self,
        creds: &Credentials,
    ) -> std::result::Result<SettingsView, ClientError> {
        let res = self
            .http
            .get(self.endpoint("settings")?)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;
        if res.status().is_success() {
            return res.json().await.map_err(ClientError::from);
        }
        Err(fail(res).await)
    }

    pub async fn settings_update(
        &self,
        creds: &Credentials,
        payload: &SettingsUpdate,
    ) -> std::result::Result<SettingsView, ClientError> {
        let res = self
            .http
            .patch(self.endpoint("settings")?)
            .basic_auth(&creds.username, Some(&creds.password))
            .json(payload)
            .send()
            .await?;
        if res.status().is_success() {
            return res.json().await.map_err(ClientError::from);
        }
        Err(fail(res).await)
    }

    pub async fn summary(
        &self,
        creds: &Credentials,
        timezone: &str,
    ) -> std::result::Result<SummaryView, ClientError> {
        let res = self
            .http
            .get(self.endpoint("summary")?)
            .query(&[("tz", timezone)])
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;
        if res.status().is_success() {
            return res.json().await.map_err(ClientError::from);
        }
        Err(fail(res).await)
    }

    /// Opens the live SSE feed; the caller reads the byte stream.
    pub async fn watch(
        &self,
        creds: &Credentials,
    ) -> std::result::Result<reqwest::Response, ClientError> {
        let res = self
            .http
            .get(self.endpoint("expenses/watch")?)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(res);
        }
        Err(fail(res).await)
    }
}

async fn fail(res: reqwest::Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    match status.as_u16() {
        401 => ClientError::Unauthorized,
        404 => ClientError::NotFound(body),
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

/// Incremental server-sent-events parser: feed chunks in, get the `data:`
/// payloads of completed events out. Comment lines (keep-alives) are skipped.
pub fn sse_data(buffer: &mut String, chunk: &str) -> Vec<String> {
    buffer.push_str(chunk);

    let mut payloads = Vec::new();
    while let Some(boundary) = buffer.find("\n\n") {
        let event: String = buffer.drain(..boundary + 2).collect();
        let data: Vec<&str> = event
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(str::trim_start)
            .collect();
        if !data.is_empty() {
            payloads.push(data.join("\n"));
        }
    }
    payloads
}
