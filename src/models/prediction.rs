use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;

/// One candidate diagnosis. Risk level is supplied, never derived from probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Set once the result is saved to a patient record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub disease: String,
    pub probability: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tests: Option<Vec<String>>,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl PredictionResult {
    /// Unsaved result as produced by a model run.
    pub fn candidate(
        disease: &str,
        probability: f64,
        confidence: f64,
        risk_level: RiskLevel,
        suggested_tests: &[&str],
    ) -> Self {
        Self {
            id: None,
            disease: disease.to_string(),
            probability,
            confidence,
            suggested_tests: if suggested_tests.is_empty() {
                None
            } else {
                Some(suggested_tests.iter().map(|t| t.to_string()).collect())
            },
            risk_level,
            patient_id: None,
            doctor_id: None,
            notes: None,
            date: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// A prediction to attach to a patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDiagnosis {
    pub patient_id: String,
    pub model_id: String,
    pub doctor_id: Option<String>,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub result: PredictionResult,
}
