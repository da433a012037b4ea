use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::auth::provider::AuthProvider;
use crate::error::{Error, Result};
use crate::gateway::{row, Filter, TableGateway};
use crate::model::{User, UserRole};

/// Built-in demo accounts, only honored when the store runs in demo mode.
static DEMO_ACCOUNTS: Lazy<[(&'static str, &'static str, User); 2]> = Lazy::new(|| {
    [
        (
            "admin@company.com",
            "admin123",
            User {
                id: "demo-admin".to_string(),
                name: "Admin User".to_string(),
                email: "admin@company.com".to_string(),
                role: UserRole::Admin,
                profile_image: Some(
                    "https://randomuser.me/api/portraits/men/1.jpg".to_string(),
                ),
            },
        ),
        (
            "employee@company.com",
            "employee123",
            User {
                id: "demo-employee".to_string(),
                name: "John Employee".to_string(),
                email: "employee@company.com".to_string(),
                role: UserRole::Employee,
                profile_image: Some(
                    "https://randomuser.me/api/portraits/men/2.jpg".to_string(),
                ),
            },
        ),
    ]
});

fn demo_account(email: &str, password: &str) -> Option<User> {
    DEMO_ACCOUNTS
        .iter()
        .find(|(e, p, _)| *e == email && *p == password)
        .map(|(_, _, user)| user.clone())
}

/// The session snapshot visible to callers. Only the user and the
/// authentication flag survive a restart; loading and error are
/// per-process scratch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    email: String,
    name: String,
    role: UserRole,
    #[serde(default)]
    profile_image: Option<String>,
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            profile_image: row.profile_image,
        }
    }
}

/// Session state machine backed by a credential provider and the `users`
/// profile table, persisted to a single JSON file between runs.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    gateway: Arc<dyn TableGateway>,
    state: RwLock<AuthState>,
    session_file: PathBuf,
    demo_mode: bool,
}

impl SessionStore {
    const PROFILE_TABLE: &'static str = "users";

    pub fn new(
        provider: Arc<dyn AuthProvider>,
        gateway: Arc<dyn TableGateway>,
        session_file: PathBuf,
        demo_mode: bool,
    ) -> Self {
        let state = Self::rehydrate(&session_file);
        Self {
            provider,
            gateway,
            state: RwLock::new(state),
            session_file,
            demo_mode,
        }
    }

    fn rehydrate(session_file: &PathBuf) -> AuthState {
        match fs::read_to_string(session_file) {
            Ok(raw) => match serde_json::from_str::<AuthState>(&raw) {
                Ok(state) => {
                    debug!(path = %session_file.display(), "rehydrated session state");
                    state
                }
                Err(err) => {
                    warn!(path = %session_file.display(), error = %err, "ignoring corrupt session file");
                    AuthState::default()
                }
            },
            Err(_) => AuthState::default(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    fn update<F: FnOnce(&mut AuthState)>(&self, apply: F) {
        let mut state = self.state.write().unwrap();
        apply(&mut state);
    }

    fn persist(&self) {
        let state = self.state();
        match serde_json::to_string(&state) {
            Ok(raw) => {
                if let Err(err) = fs::write(&self.session_file, raw) {
                    warn!(path = %self.session_file.display(), error = %err, "could not persist session state");
                }
            }
            Err(err) => warn!(error = %err, "could not serialize session state"),
        }
    }

    async fn ensure_profile_row(&self, user: &User) -> Result<()> {
        let existing = self
            .gateway
            .select_maybe_one(Self::PROFILE_TABLE, &[Filter::eq("id", user.id.as_str())])
            .await?;
        if existing.is_none() {
            self.gateway
                .insert(
                    Self::PROFILE_TABLE,
                    row(json!({
                        "id": user.id,
                        "email": user.email,
                        "name": user.name,
                        "role": user.role,
                        "profile_image": user.profile_image,
                    })),
                )
                .await?;
        }
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<User> {
        let stored = self
            .gateway
            .select_one(Self::PROFILE_TABLE, &[Filter::eq("id", user_id)])
            .await?;
        let profile: ProfileRow = crate::services::decode(stored)?;
        Ok(profile.into())
    }

    /// Signs in and settles the state either way: on success the user is
    /// authenticated, on failure `error` carries the provider's message.
    pub async fn login(&self, email: &str, password: &str) {
        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        if self.demo_mode {
            if let Some(user) = demo_account(email, password) {
                // Demo accounts have no registration step, so their profile
                // row is seeded on first login.
                if let Err(err) = self.ensure_profile_row(&user).await {
                    warn!(error = %err, "could not seed demo profile row");
                }
                self.update(|s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                self.persist();
                return;
            }
        }

        let outcome: Result<User> = async {
            let session = self.provider.sign_in(email, password).await?;
            self.fetch_profile(&session.user_id).await
        }
        .await;

        match outcome {
            Ok(user) => {
                self.update(|s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                self.persist();
            }
            Err(err) => {
                debug!(error = %err, "login failed");
                self.update(|s| {
                    s.user = None;
                    s.is_authenticated = false;
                    s.is_loading = false;
                    s.error = Some(err.to_string());
                });
            }
        }
    }

    /// Creates the credential and its profile row. Does not authenticate;
    /// callers sign in afterwards.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User> {
        let created = self.provider.sign_up(email, password).await?;
        let stored = self
            .gateway
            .insert(
                Self::PROFILE_TABLE,
                row(json!({
                    "id": created.id,
                    "email": created.email,
                    "name": name,
                    "role": role,
                })),
            )
            .await?;
        let profile: ProfileRow = crate::services::decode(stored)?;
        Ok(profile.into())
    }

    /// Clears local state no matter what the provider says; a dead remote
    /// session must never pin the caller to a stale identity.
    pub async fn logout(&self) {
        if let Err(err) = self.provider.sign_out().await {
            warn!(error = %err, "remote sign-out failed, clearing local session anyway");
        }
        self.update(|s| {
            s.user = None;
            s.is_authenticated = false;
            s.is_loading = false;
            s.error = None;
        });
        self.persist();
    }

    /// Revalidates any live provider session. Never records an error:
    /// absence of a session is a normal outcome, and a transport hiccup
    /// keeps whatever state was rehydrated.
    pub async fn check_session(&self) {
        self.update(|s| s.is_loading = true);

        let outcome: Result<Option<User>> = async {
            match self.provider.current_session().await? {
                Some(session) => Ok(Some(self.fetch_profile(&session.user_id).await?)),
                None => Ok(None),
            }
        }
        .await;

        match outcome {
            Ok(Some(user)) => {
                self.update(|s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                self.persist();
            }
            Ok(None) => {
                self.update(|s| s.is_loading = false);
            }
            Err(err) => {
                debug!(error = %err, "session check failed, keeping local state");
                self.update(|s| s.is_loading = false);
            }
        }
    }

    /// Patches the signed-in user's profile row and merges the change into
    /// local state without a re-read.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let current = self.current_user().ok_or(Error::NotAuthenticated)?;

        let mut patch = row(json!({}));
        if let Some(name) = &update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(image) = &update.profile_image {
            patch.insert("profile_image".into(), json!(image));
        }
        if !patch.is_empty() {
            self.gateway
                .update(
                    Self::PROFILE_TABLE,
                    &[Filter::eq("id", current.id.as_str())],
                    patch,
                )
                .await?;
        }

        let merged = User {
            name: update.name.unwrap_or(current.name.clone()),
            profile_image: update.profile_image.or(current.profile_image.clone()),
            ..current
        };
        self.update(|s| s.user = Some(merged.clone()));
        self.persist();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::auth::provider::{MockAuthProvider, ProviderSession, ProviderUser};
    use crate::gateway::MemoryGateway;

    struct BrokenProvider;

    #[async_trait]
    impl AuthProvider for BrokenProvider {
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<ProviderUser> {
            Err(Error::Gateway("provider unreachable".into()))
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<ProviderSession> {
            Err(Error::Gateway("Invalid login credentials".into()))
        }

        async fn sign_out(&self) -> Result<()> {
            Err(Error::Gateway("provider unreachable".into()))
        }

        async fn current_session(&self) -> Result<Option<ProviderSession>> {
            Err(Error::Gateway("provider unreachable".into()))
        }
    }

    fn session_path(dir: &TempDir) -> PathBuf {
        dir.path().join("session.json")
    }

    fn demo_store(dir: &TempDir) -> SessionStore {
        SessionStore::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(MemoryGateway::new()),
            session_path(dir),
            true,
        )
    }

    #[tokio::test]
    async fn demo_credentials_work_only_in_demo_mode() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        store.login("admin@company.com", "admin123").await;

        let state = store.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().role, UserRole::Admin);

        let strict = SessionStore::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(MemoryGateway::new()),
            dir.path().join("strict.json"),
            false,
        );
        strict.login("admin@company.com", "admin123").await;

        let state = strict.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));
    }

    #[tokio::test]
    async fn login_round_trips_through_provider_and_profile_table() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(MemoryGateway::new()),
            session_path(&dir),
            false,
        );

        store
            .register("maria@company.com", "s3cret", "Maria", UserRole::Employee)
            .await
            .unwrap();
        assert!(
            !store.state().is_authenticated,
            "registration must not sign the user in"
        );

        store.login("maria@company.com", "s3cret").await;
        let state = store.state();
        assert!(state.is_authenticated);
        let user = state.user.unwrap();
        assert_eq!(user.name, "Maria");
        assert_eq!(user.role, UserRole::Employee);
    }

    #[tokio::test]
    async fn check_session_stays_silent_when_anonymous() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        store.check_session().await;

        let state = store.state();
        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn check_session_keeps_state_on_provider_failure() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        store.login("employee@company.com", "employee123").await;

        let rehydrated = SessionStore::new(
            Arc::new(BrokenProvider),
            Arc::new(MemoryGateway::new()),
            session_path(&dir),
            true,
        );
        rehydrated.check_session().await;

        let state = rehydrated.state();
        assert!(state.is_authenticated);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn logout_clears_state_despite_provider_error() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        store.login("admin@company.com", "admin123").await;

        let stuck = SessionStore::new(
            Arc::new(BrokenProvider),
            Arc::new(MemoryGateway::new()),
            session_path(&dir),
            true,
        );
        assert!(stuck.state().is_authenticated);
        stuck.logout().await;

        let state = stuck.state();
        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn update_profile_requires_a_session() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        let result = store
            .update_profile(ProfileUpdate {
                name: Some("Nobody".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }

    #[tokio::test]
    async fn update_profile_patches_row_and_merges_state() {
        let dir = TempDir::new().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let provider = Arc::new(MockAuthProvider::new());
        let store = SessionStore::new(
            provider.clone(),
            gateway.clone(),
            session_path(&dir),
            false,
        );

        store
            .register("lee@company.com", "pw", "Lee", UserRole::Employee)
            .await
            .unwrap();
        store.login("lee@company.com", "pw").await;

        let updated = store
            .update_profile(ProfileUpdate {
                name: Some("Lee Chang".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Lee Chang");

        let state = store.state();
        assert_eq!(state.user.unwrap().name, "Lee Chang");

        let stored = gateway
            .select_one("users", &[Filter::eq("email", "lee@company.com")])
            .await
            .unwrap();
        assert_eq!(stored.get("name").unwrap(), "Lee Chang");
    }

    #[tokio::test]
    async fn session_survives_restart_via_session_file() {
        let dir = TempDir::new().unwrap();
        let store = demo_store(&dir);
        store.login("employee@company.com", "employee123").await;
        drop(store);

        let revived = demo_store(&dir);
        let state = revived.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().email, "employee@company.com");
    }
}
