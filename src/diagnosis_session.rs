//! Diagnosis session state machine.
//!
//! `Idle → (model selected) → InputsEditable → (submit) → Computing →
//! (results) → ResultsReady`, with `modify_inputs` returning to
//! `InputsEditable` without clearing entered values. A submit without both a
//! patient and a model is rejected before `Computing` and leaves the state alone.

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::enums::InputCategory;
use crate::models::{
    ModelMetadata, NewDiagnosis, Patient, PredictionResult, SymptomInput, SymptomValue, ValueKind,
};
use crate::prediction::PredictionService;
use crate::records::{PatientRoster, RecordError};
use crate::task::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    InputsEditable,
    Computing,
    ResultsReady,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::InputsEditable => "inputs_editable",
            Self::Computing => "computing",
            Self::ResultsReady => "results_ready",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please select both a patient and a diagnostic model.")]
    MissingSelection,
    #[error("Inputs cannot be changed while session is {0}")]
    NotEditable(SessionState),
    #[error("No prediction is running")]
    NotComputing,
    #[error("No results to act on while session is {0}")]
    ResultsNotReady(SessionState),
    #[error("No input with id {0}")]
    InputNotFound(String),
    #[error("Input {id} expects a {expected} value, got {found}")]
    InputKindMismatch {
        id: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Input {id} value {value} is outside the allowed range")]
    OutOfRange { id: String, value: f64 },
    #[error("No prediction result at position {0}")]
    ResultNotFound(usize),
    #[error("Prediction did not complete: {0}")]
    Interrupted(#[from] TaskError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Snapshot handed to the prediction service on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub model_id: String,
    pub patient_id: String,
    pub inputs: Vec<SymptomInput>,
}

#[derive(Debug, Clone)]
pub struct DiagnosisSession {
    state: SessionState,
    patient: Option<Patient>,
    model: Option<ModelMetadata>,
    inputs: Vec<SymptomInput>,
    predictions: Vec<PredictionResult>,
}

impl Default for DiagnosisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            patient: None,
            model: None,
            inputs: Vec::new(),
            predictions: Vec::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn model(&self) -> Option<&ModelMetadata> {
        self.model.as_ref()
    }

    pub fn inputs(&self) -> &[SymptomInput] {
        &self.inputs
    }

    /// Inputs of one group, in template order.
    pub fn inputs_in(&self, category: InputCategory) -> Vec<&SymptomInput> {
        self.inputs.iter().filter(|i| i.category == category).collect()
    }

    pub fn predictions(&self) -> &[PredictionResult] {
        &self.predictions
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::ResultsReady
    }

    // ── Transitions ─────────────────────────────────────────

    fn ensure_not_computing(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Computing {
            return Err(SessionError::NotEditable(self.state));
        }
        Ok(())
    }

    /// Choose the patient. Does not change the state.
    pub fn select_patient(&mut self, patient: Patient) -> Result<(), SessionError> {
        self.ensure_not_computing()?;
        self.patient = Some(patient);
        Ok(())
    }

    /// Choose the model and load its input template. Clears previous results.
    pub fn select_model(
        &mut self,
        model: ModelMetadata,
        template: Vec<SymptomInput>,
    ) -> Result<(), SessionError> {
        self.ensure_not_computing()?;
        tracing::debug!(model_id = %model.id, inputs = template.len(), "Model selected");
        self.model = Some(model);
        self.inputs = template;
        self.predictions.clear();
        self.state = SessionState::InputsEditable;
        Ok(())
    }

    /// Change one input. The new value must use the same variant as the template.
    pub fn update_input(&mut self, id: &str, value: SymptomValue) -> Result<(), SessionError> {
        if self.state != SessionState::InputsEditable {
            return Err(SessionError::NotEditable(self.state));
        }
        let input = self
            .inputs
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| SessionError::InputNotFound(id.to_string()))?;

        let expected = input.value.kind();
        if value.kind() != expected {
            return Err(SessionError::InputKindMismatch {
                id: id.to_string(),
                expected,
                found: value.kind(),
            });
        }
        if let (SymptomValue::Number(n), Some(range)) = (value, input.range) {
            if !n.is_finite() || !range.contains(n) {
                return Err(SessionError::OutOfRange {
                    id: id.to_string(),
                    value: n,
                });
            }
        }

        input.value = value;
        Ok(())
    }

    /// Enter `Computing`. Requires both a patient and a model.
    pub fn submit(&mut self) -> Result<SubmitRequest, SessionError> {
        if !matches!(self.state, SessionState::Idle | SessionState::InputsEditable) {
            return Err(SessionError::NotEditable(self.state));
        }
        let (Some(model), Some(patient)) = (&self.model, &self.patient) else {
            return Err(SessionError::MissingSelection);
        };
        let request = SubmitRequest {
            model_id: model.id.clone(),
            patient_id: patient.id.clone(),
            inputs: self.inputs.clone(),
        };
        self.state = SessionState::Computing;
        Ok(request)
    }

    /// Leave `Computing` with results.
    pub fn complete(&mut self, results: Vec<PredictionResult>) -> Result<(), SessionError> {
        if self.state != SessionState::Computing {
            return Err(SessionError::NotComputing);
        }
        self.predictions = results;
        self.state = SessionState::ResultsReady;
        Ok(())
    }

    /// Leave `Computing` without results (the prediction was cancelled).
    pub fn abandon(&mut self) {
        if self.state == SessionState::Computing {
            self.state = SessionState::InputsEditable;
        }
    }

    /// Return from results to editing, keeping the entered values.
    pub fn modify_inputs(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::ResultsReady {
            return Err(SessionError::ResultsNotReady(self.state));
        }
        self.state = SessionState::InputsEditable;
        Ok(())
    }

    /// Submit, wait for the prediction task, and store its results.
    pub async fn diagnose(
        &mut self,
        service: &Arc<PredictionService>,
    ) -> Result<&[PredictionResult], SessionError> {
        let request = self.submit()?;
        let task = service.run_prediction(&request.model_id, request.inputs);
        let outcome = {
            let mut guard = ComputingGuard {
                state: &mut self.state,
                armed: true,
            };
            let outcome = task.await;
            guard.armed = false;
            outcome
        };
        match outcome {
            Ok(results) => {
                self.complete(results)?;
                Ok(&self.predictions)
            }
            Err(e) => {
                self.abandon();
                Err(SessionError::Interrupted(e))
            }
        }
    }

    /// Persist one of the ready results to the selected patient's record.
    pub fn save_result(
        &self,
        roster: &PatientRoster,
        index: usize,
        doctor_id: Option<String>,
        notes: Option<String>,
    ) -> Result<PredictionResult, SessionError> {
        if self.state != SessionState::ResultsReady {
            return Err(SessionError::ResultsNotReady(self.state));
        }
        let (Some(model), Some(patient)) = (&self.model, &self.patient) else {
            return Err(SessionError::MissingSelection);
        };
        let result = self
            .predictions
            .get(index)
            .cloned()
            .ok_or(SessionError::ResultNotFound(index))?;

        let saved = roster.save_diagnosis(NewDiagnosis {
            patient_id: patient.id.clone(),
            model_id: model.id.clone(),
            doctor_id,
            notes,
            date: Local::now().date_naive(),
            result,
        })?;
        Ok(saved)
    }
}

/// Returns a `Computing` session to editing if `diagnose` is dropped mid-await.
struct ComputingGuard<'a> {
    state: &'a mut SessionState,
    armed: bool,
}

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && *self.state == SessionState::Computing {
            tracing::debug!("Diagnosis dropped while computing");
            *self.state = SessionState::InputsEditable;
        }
    }
}
