//! Clinical record store: patient roster and saved diagnosis history.
//!
//! An explicit store object: constructed once (seeded from the demo catalog or
//! empty), shared through `CoreState`, never torn down in-session. Patients are
//! never deleted and identifiers are never reused.

use std::sync::RwLock;

use chrono::Local;
use uuid::Uuid;

use crate::mock_data;
use crate::models::{
    is_valid_email, parse_medical_history, NewDiagnosis, NewPatient, Patient, PatientIntake,
    PredictionResult,
};

/// Upper bound on accepted ages.
pub const MAX_AGE: u32 = 150;

/// Maximum patient name length in characters.
pub const MAX_NAME_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    Validation(String),
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },
    #[error("Record store lock poisoned")]
    LockPoisoned,
}

/// Check the intake form and convert it to typed patient fields.
pub fn validate_intake(intake: &PatientIntake) -> Result<NewPatient, RecordError> {
    let name = intake.name.trim();
    let age_raw = intake.age.trim();
    if name.is_empty() || age_raw.is_empty() {
        return Err(RecordError::Validation("Name and age are required.".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RecordError::Validation("Name too long".into()));
    }

    let age: u32 = age_raw
        .parse()
        .map_err(|_| RecordError::Validation(format!("Age must be a whole number: {age_raw}")))?;
    if age == 0 || age > MAX_AGE {
        return Err(RecordError::Validation(format!(
            "Age must be between 1 and {MAX_AGE}"
        )));
    }

    let email = intake.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        return Err(RecordError::Validation(format!("Invalid email address: {email}")));
    }

    let blood_type = intake.blood_type.trim();
    Ok(NewPatient {
        name: name.to_string(),
        age,
        gender: intake.gender,
        blood_type: (!blood_type.is_empty()).then(|| blood_type.to_string()),
        medical_history: parse_medical_history(&intake.medical_history),
        email: (!email.is_empty()).then(|| email.to_string()),
        user_id: None,
    })
}

/// Case-insensitive name containment. Returns a new list in source order.
pub fn filter_by_name(patients: &[Patient], needle: &str) -> Vec<Patient> {
    let needle = needle.to_lowercase();
    patients
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub struct PatientRoster {
    patients: RwLock<Vec<Patient>>,
    diagnoses: RwLock<Vec<PredictionResult>>,
}

impl PatientRoster {
    /// Roster seeded with the demo patients and their history.
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(mock_data::seed_patients()),
            diagnoses: RwLock::new(mock_data::seed_diagnoses()),
        }
    }

    pub fn empty() -> Self {
        Self {
            patients: RwLock::new(Vec::new()),
            diagnoses: RwLock::new(Vec::new()),
        }
    }

    // ── Patients ────────────────────────────────────────────

    /// Current roster in insertion order.
    pub fn list_patients(&self) -> Result<Vec<Patient>, RecordError> {
        let patients = self.patients.read().map_err(|_| RecordError::LockPoisoned)?;
        Ok(patients.clone())
    }

    pub fn len(&self) -> usize {
        self.patients.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact id lookup. Absence is `None`, not an error.
    pub fn find_patient(&self, id: &str) -> Option<Patient> {
        let patients = self.patients.read().ok()?;
        patients.iter().find(|p| p.id == id).cloned()
    }

    /// Validate the intake form and append a new patient stamped with today's date.
    pub fn add_patient(&self, intake: &PatientIntake) -> Result<Patient, RecordError> {
        let fields = validate_intake(intake)?;
        self.insert_patient(fields)
    }

    /// Append already-validated fields under a fresh identifier.
    pub fn insert_patient(&self, fields: NewPatient) -> Result<Patient, RecordError> {
        let mut patients = self.patients.write().map_err(|_| RecordError::LockPoisoned)?;

        let mut id = Uuid::new_v4().to_string();
        while patients.iter().any(|p| p.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let patient = Patient {
            id,
            name: fields.name,
            age: fields.age,
            gender: fields.gender,
            blood_type: fields.blood_type,
            medical_history: fields.medical_history,
            date_added: Local::now().date_naive(),
            email: fields.email,
            user_id: fields.user_id,
        };
        patients.push(patient.clone());
        tracing::info!(patient_id = %patient.id, "Patient added");
        Ok(patient)
    }

    /// Name search over the live roster.
    pub fn search(&self, needle: &str) -> Result<Vec<Patient>, RecordError> {
        let patients = self.patients.read().map_err(|_| RecordError::LockPoisoned)?;
        Ok(filter_by_name(&patients, needle))
    }

    // ── Diagnosis history ───────────────────────────────────

    /// Attach a prediction to an existing patient's record.
    pub fn save_diagnosis(&self, diagnosis: NewDiagnosis) -> Result<PredictionResult, RecordError> {
        if self.find_patient(&diagnosis.patient_id).is_none() {
            return Err(RecordError::NotFound {
                entity_type: "Patient".into(),
                id: diagnosis.patient_id,
            });
        }

        let mut saved = diagnosis.result;
        saved.id = Some(Uuid::new_v4().to_string());
        saved.patient_id = Some(diagnosis.patient_id);
        saved.doctor_id = diagnosis.doctor_id;
        saved.notes = diagnosis.notes;
        saved.date = Some(diagnosis.date);

        let mut diagnoses = self.diagnoses.write().map_err(|_| RecordError::LockPoisoned)?;
        diagnoses.push(saved.clone());
        tracing::info!(
            patient_id = saved.patient_id.as_deref().unwrap_or_default(),
            model_id = %diagnosis.model_id,
            "Diagnosis saved"
        );
        Ok(saved)
    }

    /// Saved diagnoses for a patient, newest first. Unknown patient → empty.
    pub fn diagnoses_for(&self, patient_id: &str) -> Vec<PredictionResult> {
        let Ok(diagnoses) = self.diagnoses.read() else {
            return Vec::new();
        };
        let mut matching: Vec<PredictionResult> = diagnoses
            .iter()
            .rev()
            .filter(|d| d.patient_id.as_deref() == Some(patient_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching
    }
}

impl Default for PatientRoster {
    fn default() -> Self {
        Self::new()
    }
}
