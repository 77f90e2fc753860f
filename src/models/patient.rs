use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Gender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_type: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub date_added: NaiveDate,
    pub email: Option<String>,
    pub user_id: Option<String>,
}

/// Raw patient-intake form. Fields arrive as typed text and are validated on add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientIntake {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    #[serde(default)]
    pub blood_type: String,
    /// Comma-separated condition names.
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub email: String,
}

impl Default for PatientIntake {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            gender: Gender::Male,
            blood_type: String::new(),
            medical_history: String::new(),
            email: String::new(),
        }
    }
}

/// Validated patient fields, as handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_type: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub email: Option<String>,
    pub user_id: Option<String>,
}

/// Split a comma-separated history string into trimmed condition names.
/// Empty input (or only separators) means no history.
pub fn parse_medical_history(raw: &str) -> Option<Vec<String>> {
    let conditions: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();
    if conditions.is_empty() {
        None
    } else {
        Some(conditions)
    }
}
