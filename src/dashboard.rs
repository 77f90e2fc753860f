//! Dashboard and patient-portal view models.

use serde::Serialize;

use crate::mock_data;
use crate::models::enums::UserRole;
use crate::models::{ModelMetadata, Patient, PredictionResult, User};
use crate::records::PatientRoster;

/// Patients listed under "Recent Patients".
pub const RECENT_PATIENT_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub day: String,
    pub predictions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub total_patients: usize,
    pub model_count: usize,
    /// Mean model accuracy as a percentage, one decimal.
    pub average_accuracy: f64,
    pub recent_patients: Vec<Patient>,
    pub weekly_activity: Vec<ActivityPoint>,
    pub weekly_total: u32,
}

impl DashboardOverview {
    pub fn build(patients: &[Patient], models: &[ModelMetadata]) -> Self {
        let average_accuracy = if models.is_empty() {
            0.0
        } else {
            let mean = models.iter().map(|m| m.accuracy).sum::<f64>() / models.len() as f64;
            (mean * 1000.0).round() / 10.0
        };

        let weekly_activity: Vec<ActivityPoint> = mock_data::WEEKLY_ACTIVITY
            .iter()
            .map(|(day, predictions)| ActivityPoint {
                day: day.to_string(),
                predictions: *predictions,
            })
            .collect();
        let weekly_total = weekly_activity.iter().map(|p| p.predictions).sum();

        Self {
            total_patients: patients.len(),
            model_count: models.len(),
            average_accuracy,
            recent_patients: patients.iter().take(RECENT_PATIENT_COUNT).cloned().collect(),
            weekly_activity,
            weekly_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalView {
    pub patient: Patient,
    pub diagnoses: Vec<PredictionResult>,
}

/// Patient portal content for `user`.
///
/// A linked patient sees their own record; everyone else, including a patient
/// with no linkage, sees the first roster patient. Returns `None` when the
/// linkage resolves to nothing or the roster is empty.
pub fn portal_view(user: &User, roster: &PatientRoster) -> Option<PortalView> {
    let patient = match (user.role, user.patient_id.as_deref()) {
        (UserRole::Patient, Some(id)) => roster.find_patient(id)?,
        _ => roster.list_patients().ok()?.into_iter().next()?,
    };

    let mut diagnoses = roster.diagnoses_for(&patient.id);
    for category in mock_data::DISEASE_CATEGORIES {
        diagnoses.extend(mock_data::canned_predictions(category));
    }

    Some(PortalView { patient, diagnoses })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, patient_id: Option<&str>) -> User {
        User {
            id: "u".into(),
            name: "Someone".into(),
            email: "someone@example.com".into(),
            role,
            patient_id: patient_id.map(String::from),
        }
    }

    #[test]
    fn overview_from_seed_catalog() {
        let overview =
            DashboardOverview::build(&mock_data::seed_patients(), &mock_data::models());
        assert_eq!(overview.total_patients, 5);
        assert_eq!(overview.model_count, 3);
        assert_eq!(overview.average_accuracy, 88.7);
        assert_eq!(overview.recent_patients.len(), 5);
        assert_eq!(overview.weekly_activity.len(), 7);
        assert_eq!(overview.weekly_activity[2].day, "Wed");
        assert_eq!(overview.weekly_total, 47);
    }

    #[test]
    fn overview_handles_empty_inputs() {
        let overview = DashboardOverview::build(&[], &[]);
        assert_eq!(overview.average_accuracy, 0.0);
        assert!(overview.recent_patients.is_empty());
    }

    #[test]
    fn doctor_sees_first_patient() {
        let roster = PatientRoster::new();
        let view = portal_view(&user(UserRole::Doctor, None), &roster).unwrap();
        assert_eq!(view.patient.id, "1");
        // Two saved records followed by nine canned results
        assert_eq!(view.diagnoses.len(), 11);
        assert_eq!(view.diagnoses[0].disease, "Hypertension");
        assert_eq!(view.diagnoses[2].disease, "Coronary Artery Disease");
    }

    #[test]
    fn patient_sees_linked_record() {
        let roster = PatientRoster::new();
        let view = portal_view(&user(UserRole::Patient, Some("3")), &roster).unwrap();
        assert_eq!(view.patient.name, "Robert Johnson");
        assert_eq!(view.diagnoses.len(), 9);
    }

    #[test]
    fn dangling_patient_link_is_none() {
        let roster = PatientRoster::new();
        assert!(portal_view(&user(UserRole::Patient, Some("missing")), &roster).is_none());
        assert!(portal_view(&user(UserRole::Admin, None), &PatientRoster::empty()).is_none());
        assert!(portal_view(&user(UserRole::Patient, None), &PatientRoster::empty()).is_none());
    }

    #[test]
    fn unlinked_patient_sees_first_patient() {
        let roster = PatientRoster::new();
        let view = portal_view(&user(UserRole::Patient, None), &roster).unwrap();
        assert_eq!(view.patient.id, "1");
    }
}
