use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::enums::UserRole;

/// Sanitized identity. Never carries a credential, so it is safe to persist and log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Linked patient record; only set for the `patient` role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

impl User {
    pub fn is_patient(&self) -> bool {
        self.role == UserRole::Patient
    }
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Shape check matching a browser `type=email` field; not a deliverability check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Registration payload for the persistence layer. The credential is wiped on drop.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub patient_id: Option<String>,
    pub credential: Zeroizing<String>,
}
