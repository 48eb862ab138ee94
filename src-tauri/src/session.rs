//! Local stand-in for the signed-in user.
//!
//! The booking API is told about logins and registrations, but its answer is
//! not trusted: the user record is derived locally and kept in the store so it
//! survives a restart. Created once at startup and shared through the app state.

use crate::api::BookingApi;
use crate::error::FlowError;
use crate::models::{Role, User};
use crate::store::{SessionStore, SessionStoreExt, StoreKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SignedIn {
    user: User,
    token: Option<String>,
}

pub struct Session {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn BookingApi>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn BookingApi>) -> Self {
        Self { store, api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, FlowError> {
        let email = validate(email, password)?;

        let token = match self.api.login(&email, password).await {
            Ok(response) => response.token,
            Err(err) => {
                tracing::warn!(error = %err, "login request failed, continuing with local session");
                None
            }
        };

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            role: if email.contains("admin") {
                Role::Admin
            } else {
                Role::User
            },
            email,
        };

        self.persist(user, token)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, FlowError> {
        let email = validate(email, password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(FlowError::InvalidCredentials("name is required"));
        }

        let token = match self.api.register(name, &email, password).await {
            Ok(response) => response.token,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "register request failed, continuing with local session"
                );
                None
            }
        };

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name: name.to_string(),
            role: Role::User,
        };

        self.persist(user, token)
    }

    pub fn logout(&self) -> Result<(), FlowError> {
        self.store.clear(StoreKey::User)?;
        tracing::info!("signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<User>, FlowError> {
        Ok(self
            .store
            .load::<SignedIn>(StoreKey::User)?
            .map(|s| s.user))
    }

    pub fn token(&self) -> Result<Option<String>, FlowError> {
        Ok(self
            .store
            .load::<SignedIn>(StoreKey::User)?
            .and_then(|s| s.token))
    }

    pub fn require_user(&self) -> Result<User, FlowError> {
        self.current_user()?.ok_or(FlowError::NotSignedIn)
    }

    pub fn require_admin(&self) -> Result<User, FlowError> {
        let user = self.require_user()?;
        if user.role != Role::Admin {
            return Err(FlowError::Forbidden);
        }
        Ok(user)
    }

    fn persist(&self, user: User, token: Option<String>) -> Result<User, FlowError> {
        let signed_in = SignedIn { user, token };
        self.store.save(StoreKey::User, &signed_in)?;
        tracing::info!(user = %signed_in.user.email, role = ?signed_in.user.role, "signed in");
        Ok(signed_in.user)
    }
}

fn validate(email: &str, password: &str) -> Result<String, FlowError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(FlowError::InvalidCredentials("email must contain '@'"));
    }
    if password.is_empty() {
        return Err(FlowError::InvalidCredentials("password is required"));
    }
    Ok(email.to_string())
}
