//! Session and identity store.
//!
//! Holds the user roster and the process-wide current user. Login and signup
//! resolve after a simulated network delay as cancellable tasks; the roster and
//! current user only change once the delay has elapsed. The sanitized identity
//! is mirrored into the `IdentityStore` so a restart can restore it.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::identity_store::{IdentityStore, IdentityStoreError};
use crate::mock_data::{self, SeedUser};
use crate::models::enums::UserRole;
use crate::models::{is_valid_email, User};
use crate::task::PendingTask;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Where the UI goes after an identity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landing {
    Dashboard,
    PatientPortal,
    Login,
}

impl Landing {
    /// Patients land on their portal; every other role on the general dashboard.
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Patient => Self::PatientPortal,
            UserRole::Doctor | UserRole::Admin | UserRole::Researcher => Self::Dashboard,
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::PatientPortal => "/patient-portal",
            Self::Login => "/login",
        }
    }
}

/// Successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub user: User,
    pub landing: Landing,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User with this email already exists")]
    DuplicateEmail,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to persist identity: {0}")]
    Storage(#[from] IdentityStoreError),
    #[error("Auth state lock poisoned")]
    LockPoisoned,
}

struct RosterEntry {
    user: User,
    credential: Zeroizing<String>,
}

impl RosterEntry {
    fn matches(&self, email: &str, credential: &str) -> bool {
        // Both comparisons always run.
        let email_ok = self.user.email == email;
        let credential_ok: bool = self.credential.as_bytes().ct_eq(credential.as_bytes()).into();
        email_ok & credential_ok
    }
}

impl From<SeedUser> for RosterEntry {
    fn from(seed: SeedUser) -> Self {
        Self {
            user: seed.user,
            credential: Zeroizing::new(seed.credential.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// AuthService
// ═══════════════════════════════════════════════════════════

pub struct AuthService {
    roster: RwLock<Vec<RosterEntry>>,
    current: RwLock<Option<User>>,
    identity: IdentityStore,
    delay: Duration,
}

impl AuthService {
    /// Service seeded with the demo roster.
    pub fn new(identity: IdentityStore, delay: Duration) -> Self {
        Self::with_roster(identity, delay, mock_data::seed_users())
    }

    pub fn with_roster(identity: IdentityStore, delay: Duration, roster: Vec<SeedUser>) -> Self {
        Self {
            roster: RwLock::new(roster.into_iter().map(RosterEntry::from).collect()),
            current: RwLock::new(None),
            identity,
            delay,
        }
    }

    // ── Read path ───────────────────────────────────────────

    pub fn current_user(&self) -> Option<User> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn roster_len(&self) -> usize {
        self.roster.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Landing for the current user, or the login screen when signed out.
    pub fn landing(&self) -> Landing {
        self.current_user()
            .map(|u| Landing::for_role(u.role))
            .unwrap_or(Landing::Login)
    }

    // ── Session lifecycle ───────────────────────────────────

    /// Adopt the persisted identity, if any, without re-validating it.
    pub fn restore_session(&self) -> Option<User> {
        let user = self.identity.load()?;
        match self.current.write() {
            Ok(mut current) => {
                *current = Some(user.clone());
                tracing::info!(user_id = %user.id, role = %user.role, "Session restored");
                Some(user)
            }
            Err(_) => None,
        }
    }

    /// Check credentials against the roster and make the match the current user.
    pub fn authenticate(&self, email: &str, credential: &str) -> Result<AuthOutcome, AuthError> {
        let user = {
            let roster = self.roster.read().map_err(|_| AuthError::LockPoisoned)?;
            roster
                .iter()
                .find(|entry| entry.matches(email, credential))
                .map(|entry| entry.user.clone())
        };

        let Some(user) = user else {
            tracing::warn!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        self.adopt(user)
    }

    /// Add a new roster member and make them the current user.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        credential: &str,
        role: UserRole,
    ) -> Result<AuthOutcome, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name is required".into()));
        }
        if !is_valid_email(email) {
            return Err(AuthError::InvalidInput(format!("Invalid email address: {email}")));
        }
        if credential.is_empty() {
            return Err(AuthError::InvalidInput("Password is required".into()));
        }

        let mut roster = self.roster.write().map_err(|_| AuthError::LockPoisoned)?;
        if roster.iter().any(|entry| entry.user.email == email) {
            tracing::warn!("Signup rejected: duplicate email");
            return Err(AuthError::DuplicateEmail);
        }

        let id = Uuid::new_v4().to_string();
        let user = User {
            patient_id: (role == UserRole::Patient).then(|| id.clone()),
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
        };

        // Roster entry lands only once the identity is persisted.
        let outcome = self.adopt(user.clone()).inspect_err(|e| {
            tracing::warn!(error = %e, "Signup rejected: identity not persisted");
        })?;
        roster.push(RosterEntry {
            user,
            credential: Zeroizing::new(credential.to_string()),
        });
        tracing::info!(user_id = %outcome.user.id, role = %outcome.user.role, "User registered");
        Ok(outcome)
    }

    /// Drop the current identity and its persisted copy.
    pub fn logout(&self) -> Landing {
        if let Ok(mut current) = self.current.write() {
            if let Some(user) = current.take() {
                tracing::info!(user_id = %user.id, "Logged out");
            }
        }
        self.identity.clear();
        Landing::Login
    }

    fn adopt(&self, user: User) -> Result<AuthOutcome, AuthError> {
        self.identity.save(&user)?;
        let mut current = self.current.write().map_err(|_| AuthError::LockPoisoned)?;
        *current = Some(user.clone());
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        let landing = Landing::for_role(user.role);
        Ok(AuthOutcome { user, landing })
    }

    // ── Async (simulated latency) ───────────────────────────

    /// `authenticate` after the simulated network delay.
    pub fn login(
        self: &Arc<Self>,
        email: &str,
        credential: &str,
    ) -> PendingTask<Result<AuthOutcome, AuthError>> {
        let service = Arc::clone(self);
        let email = email.to_string();
        let credential = Zeroizing::new(credential.to_string());
        PendingTask::delayed("login", self.delay, move || {
            service.authenticate(&email, &credential)
        })
    }

    /// `register` after the simulated network delay.
    pub fn signup(
        self: &Arc<Self>,
        name: &str,
        email: &str,
        credential: &str,
        role: UserRole,
    ) -> PendingTask<Result<AuthOutcome, AuthError>> {
        let service = Arc::clone(self);
        let name = name.to_string();
        let email = email.to_string();
        let credential = Zeroizing::new(credential.to_string());
        PendingTask::delayed("signup", self.delay, move || {
            service.register(&name, &email, &credential, role)
        })
    }
}
