use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identity as known to the hosted credential provider. Profile data
/// (name, role, image) lives in the `users` table, not here.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub id: String,
    pub email: String,
}

/// A live provider session for the current device.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

/// The hosted authentication provider, consumed as an external
/// collaborator: credentials, tokens and their storage are its problem.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession>;
    async fn sign_out(&self) -> Result<()>;
    /// `Ok(None)` when there is no live session; absence is not an error.
    async fn current_session(&self) -> Result<Option<ProviderSession>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: String,
}

/// GoTrue-style provider bundled with the hosted backend
/// (`{base}/auth/v1/...` endpoints).
pub struct HostedAuthProvider {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl HostedAuthProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.access_token.read().unwrap().clone()
    }
}

/// Extracts the provider's own error message so callers see it unchanged,
/// e.g. "Invalid login credentials".
fn provider_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("msg"))
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("auth provider returned {status}"))
}

#[async_trait]
impl AuthProvider for HostedAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser> {
        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(provider_message(status, &body)));
        }

        // The user object is nested under "user" when confirmation is on,
        // top-level otherwise.
        let body: Value = response.json().await?;
        let user = body.get("user").unwrap_or(&body);
        let id = user
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Gateway("signup response had no user id".into()))?;
        Ok(ProviderUser {
            id: id.to_string(),
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(provider_message(status, &body)));
        }

        let token: TokenResponse = response.json().await?;
        *self.access_token.write().unwrap() = Some(token.access_token.clone());
        Ok(ProviderSession {
            user_id: token.user.id,
            email: token.user.email,
            access_token: token.access_token,
        })
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self.access_token.write().unwrap().take();
        let Some(token) = token else {
            return Ok(());
        };

        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(provider_message(status, &body)));
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<ProviderSession>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Token expired or revoked: no session, not an error.
            *self.access_token.write().unwrap() = None;
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(provider_message(status, &body)));
        }

        let user: TokenUser = response.json().await?;
        Ok(Some(ProviderSession {
            user_id: user.id,
            email: user.email,
            access_token: token,
        }))
    }
}

/// In-process provider for tests and demo deployments: credentials live in
/// a map, sessions in a cell.
#[derive(Default)]
pub struct MockAuthProvider {
    // email -> (password, user id)
    accounts: RwLock<HashMap<String, (String, String)>>,
    session: RwLock<Option<ProviderSession>>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(Error::Gateway("User already registered".into()));
        }
        let id = Uuid::new_v4().to_string();
        accounts.insert(email.to_string(), (password.to_string(), id.clone()));
        Ok(ProviderUser {
            id,
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession> {
        let accounts = self.accounts.read().unwrap();
        match accounts.get(email) {
            Some((stored, id)) if stored == password => {
                let session = ProviderSession {
                    user_id: id.clone(),
                    email: email.to_string(),
                    access_token: Uuid::new_v4().to_string(),
                };
                *self.session.write().unwrap() = Some(session.clone());
                Ok(session)
            }
            _ => Err(Error::Gateway("Invalid login credentials".into())),
        }
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.write().unwrap() = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<ProviderSession>> {
        Ok(self.session.read().unwrap().clone())
    }
}
