use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog entry for a prediction model.
///
/// `disease_category` keys into the symptom-template and canned-result maps;
/// a category with no entry yields empty templates and predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id: String,
    pub name: String,
    pub version: String,
    pub accuracy: f64,
    pub last_updated: NaiveDate,
    pub disease_category: String,
    pub description: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Fields for registering a model; id and last-updated are assigned on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewModel {
    pub name: String,
    pub version: String,
    pub accuracy: f64,
    pub disease_category: String,
    pub description: String,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub auc: f64,
}
