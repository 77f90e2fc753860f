pub mod credential;
pub mod repository;
pub mod sqlite;

pub use sqlite::*;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

use crate::models::{
    ModelMetadata, NewDiagnosis, NewModel, NewPatient, NewUser, Patient, PredictionResult, User,
};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Persistence contract
// ═══════════════════════════════════════════════════════════

/// Storage-engine-neutral persistence for users, patients, diagnoses and models.
pub trait ClinicalDatabase: Send + Sync {
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    /// Patient-role users without an explicit linkage are linked to their own id.
    fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError>;
    fn verify_user_credential(
        &self,
        email: &str,
        credential: &str,
    ) -> Result<Option<User>, DatabaseError>;

    fn get_patients(&self) -> Result<Vec<Patient>, DatabaseError>;
    fn get_patient_by_id(&self, id: &str) -> Result<Option<Patient>, DatabaseError>;
    fn create_patient(&self, patient: &NewPatient) -> Result<Patient, DatabaseError>;

    fn save_patient_diagnosis(
        &self,
        diagnosis: &NewDiagnosis,
    ) -> Result<PredictionResult, DatabaseError>;
    /// Newest first.
    fn get_patient_diagnoses(&self, patient_id: &str)
        -> Result<Vec<PredictionResult>, DatabaseError>;

    /// Active models only.
    fn get_models(&self) -> Result<Vec<ModelMetadata>, DatabaseError>;
    fn save_model(&self, model: &NewModel) -> Result<ModelMetadata, DatabaseError>;
}

/// `ClinicalDatabase` over a single SQLite connection.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    /// Wrap an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl ClinicalDatabase for SqliteDatabase {
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let conn = self.conn()?;
        repository::get_user_by_email(&conn, email)
    }

    fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let conn = self.conn()?;
        repository::insert_user(&conn, user)
    }

    fn verify_user_credential(
        &self,
        email: &str,
        credential: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let conn = self.conn()?;
        repository::verify_user_credential(&conn, email, credential)
    }

    fn get_patients(&self) -> Result<Vec<Patient>, DatabaseError> {
        let conn = self.conn()?;
        repository::get_patients(&conn)
    }

    fn get_patient_by_id(&self, id: &str) -> Result<Option<Patient>, DatabaseError> {
        let conn = self.conn()?;
        repository::get_patient_by_id(&conn, id)
    }

    fn create_patient(&self, patient: &NewPatient) -> Result<Patient, DatabaseError> {
        let conn = self.conn()?;
        repository::insert_patient(&conn, patient)
    }

    fn save_patient_diagnosis(
        &self,
        diagnosis: &NewDiagnosis,
    ) -> Result<PredictionResult, DatabaseError> {
        let conn = self.conn()?;
        repository::insert_diagnosis(&conn, diagnosis)
    }

    fn get_patient_diagnoses(
        &self,
        patient_id: &str,
    ) -> Result<Vec<PredictionResult>, DatabaseError> {
        let conn = self.conn()?;
        repository::get_patient_diagnoses(&conn, patient_id)
    }

    fn get_models(&self) -> Result<Vec<ModelMetadata>, DatabaseError> {
        let conn = self.conn()?;
        repository::get_active_models(&conn)
    }

    fn save_model(&self, model: &NewModel) -> Result<ModelMetadata, DatabaseError> {
        let conn = self.conn()?;
        repository::insert_model(&conn, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{Gender, UserRole};
    use std::sync::Arc;
    use zeroize::Zeroizing;

    fn database() -> Arc<dyn ClinicalDatabase> {
        Arc::new(SqliteDatabase::open_in_memory().unwrap())
    }

    #[test]
    fn signup_then_credential_check_through_trait() {
        let db = database();
        let user = db
            .create_user(&NewUser {
                name: "John Doe".into(),
                email: "patient@x.com".into(),
                role: UserRole::Patient,
                patient_id: None,
                credential: Zeroizing::new("pw".into()),
            })
            .unwrap();
        assert_eq!(user.patient_id.as_deref(), Some(user.id.as_str()));
        assert_eq!(db.get_user_by_email("patient@x.com").unwrap(), Some(user.clone()));
        assert_eq!(db.verify_user_credential("patient@x.com", "pw").unwrap(), Some(user));
    }

    #[test]
    fn patient_and_history_through_trait() {
        let db = database();
        assert!(db.get_patients().unwrap().is_empty());
        let patient = db
            .create_patient(&NewPatient {
                name: "Emily Wilson".into(),
                age: 27,
                gender: Gender::Female,
                blood_type: Some("AB+".into()),
                medical_history: Some(vec!["Migraine".into()]),
                email: Some("emily@example.com".into()),
                user_id: None,
            })
            .unwrap();
        assert_eq!(db.get_patient_by_id(&patient.id).unwrap(), Some(patient.clone()));

        let saved = db
            .save_patient_diagnosis(&NewDiagnosis {
                patient_id: patient.id.clone(),
                model_id: "3".into(),
                doctor_id: None,
                notes: None,
                date: patient.date_added,
                result: crate::mock_data::canned_predictions("respiratory").remove(1),
            })
            .unwrap();
        assert_eq!(db.get_patient_diagnoses(&patient.id).unwrap(), vec![saved]);
        assert_eq!(db.get_models().unwrap().len(), 3);
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinical.db");
        let created = SqliteDatabase::open(&path)
            .unwrap()
            .create_patient(&NewPatient {
                name: "Michael Brown".into(),
                age: 52,
                gender: Gender::Male,
                blood_type: None,
                medical_history: None,
                email: None,
                user_id: None,
            })
            .unwrap();

        let reopened = SqliteDatabase::open(&path).unwrap();
        assert_eq!(reopened.get_patients().unwrap(), vec![created]);
    }
}
