//! Process-wide application state.
//!
//! `CoreState` is constructed once at startup, wrapped in `Arc` and handed to
//! every caller. It owns the three stores (identity, clinical records,
//! prediction) and never reaches for module-level globals, so tests build
//! isolated instances freely.
//!
//! An attached `ClinicalDatabase` backs the model catalog only. Signup, new
//! patients and saved diagnoses stay in the in-memory stores; callers that
//! need them durable write through `database()` themselves.

use std::sync::Arc;

use crate::auth::{AuthError, AuthService};
use crate::config::ServiceConfig;
use crate::dashboard::{self, DashboardOverview, PortalView};
use crate::db::{ClinicalDatabase, DatabaseError};
use crate::diagnosis_session::{DiagnosisSession, SessionError};
use crate::identity_store::IdentityStore;
use crate::models::{Patient, PatientIntake, PredictionResult};
use crate::prediction::PredictionService;
use crate::records::{PatientRoster, RecordError};
use crate::task::TaskError;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    auth: Arc<AuthService>,
    records: PatientRoster,
    predictions: Arc<PredictionService>,
    config: ServiceConfig,
    /// Source of the model catalog when present. Not written to by this type.
    database: Option<Arc<dyn ClinicalDatabase>>,
}

impl CoreState {
    /// State seeded with the demo roster, patients and model catalog.
    pub fn new(config: ServiceConfig, identity: IdentityStore) -> Self {
        Self {
            auth: Arc::new(AuthService::new(identity, config.auth_delay)),
            records: PatientRoster::new(),
            predictions: Arc::new(PredictionService::new(config.prediction_delay)),
            config,
            database: None,
        }
    }

    /// Like `new`, but the model catalog comes from `database`.
    pub fn with_database(
        config: ServiceConfig,
        identity: IdentityStore,
        database: Arc<dyn ClinicalDatabase>,
    ) -> Result<Self, CoreError> {
        let models = database.get_models()?;
        tracing::info!(models = models.len(), "Model catalog loaded from database");
        let mut state = Self::new(config, identity);
        state.predictions = Arc::new(PredictionService::with_models(
            models,
            config.prediction_delay,
        ));
        state.database = Some(database);
        Ok(state)
    }

    /// Zero-delay, in-memory state.
    pub fn ephemeral() -> Self {
        Self::new(ServiceConfig::instant(), IdentityStore::in_memory())
    }

    // ── Store access ────────────────────────────────────────

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    pub fn records(&self) -> &PatientRoster {
        &self.records
    }

    pub fn predictions(&self) -> &Arc<PredictionService> {
        &self.predictions
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    pub fn database(&self) -> Option<&Arc<dyn ClinicalDatabase>> {
        self.database.as_ref()
    }

    // ── Composite operations ────────────────────────────────

    pub fn add_patient(&self, intake: &PatientIntake) -> Result<Patient, CoreError> {
        Ok(self.records.add_patient(intake)?)
    }

    pub fn dashboard(&self) -> Result<DashboardOverview, CoreError> {
        let patients = self.records.list_patients()?;
        Ok(DashboardOverview::build(
            &patients,
            self.predictions.list_models(),
        ))
    }

    /// Portal for the signed-in user.
    pub fn portal(&self) -> Result<Option<PortalView>, CoreError> {
        let user = self.auth.current_user().ok_or(CoreError::NotAuthenticated)?;
        Ok(dashboard::portal_view(&user, &self.records))
    }

    /// Select `patient_id` and `model_id` on `session`, loading the model's template.
    pub fn prepare_session(
        &self,
        session: &mut DiagnosisSession,
        patient_id: &str,
        model_id: &str,
    ) -> Result<(), CoreError> {
        let patient = self
            .records
            .find_patient(patient_id)
            .ok_or_else(|| RecordError::NotFound {
                entity_type: "Patient".into(),
                id: patient_id.to_string(),
            })?;
        let model = self
            .predictions
            .find_model(model_id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound {
                entity_type: "Model".into(),
                id: model_id.to_string(),
            })?;
        let template = self.predictions.get_symptom_template(&model.disease_category);

        session.select_patient(patient)?;
        session.select_model(model, template)?;
        Ok(())
    }

    /// Save one ready result with the signed-in user as the recording doctor.
    pub fn save_session_result(
        &self,
        session: &DiagnosisSession,
        index: usize,
        notes: Option<String>,
    ) -> Result<PredictionResult, CoreError> {
        let doctor_id = self.auth.current_user().map(|u| u.id);
        Ok(session.save_result(&self.records, index, doctor_id, notes)?)
    }
}

// ═══════════════════════════════════════════════════════════
// CoreError
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No user is signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Task(#[from] TaskError),
}
