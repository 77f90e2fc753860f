//! User-visible notifications for completed or failed actions.

use serde::Serialize;

use crate::core_state::CoreError;
use crate::diagnosis_session::SessionError;
use crate::models::{ModelMetadata, Patient, User};
use crate::records::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// The user action a failure notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Signup,
    AddPatient,
    Diagnose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn logged_in(user: &User) -> Self {
        Self::info("Login successful", format!("Welcome, {}!", user.name))
    }

    pub fn registered() -> Self {
        Self::info("Registration successful", "Your account has been created")
    }

    pub fn logged_out() -> Self {
        Self::info("Logged out", "You have been logged out successfully")
    }

    pub fn patient_added(patient: &Patient) -> Self {
        Self::info(
            "Patient added",
            format!("{} has been added successfully.", patient.name),
        )
    }

    pub fn diagnosis_complete(model: &ModelMetadata) -> Self {
        Self::info(
            "Diagnosis Complete",
            format!("Generated predictions using {}", model.name),
        )
    }

    /// Destructive notice for a failed action. The description is the error's message.
    pub fn from_error(action: Action, error: &CoreError) -> Self {
        match (action, error) {
            (Action::Login, e) => Self::destructive("Login failed", e.to_string()),
            (Action::Signup, e) => Self::destructive("Registration failed", e.to_string()),
            (Action::AddPatient, CoreError::Record(RecordError::Validation(msg))) => {
                Self::destructive("Missing information", msg.clone())
            }
            (Action::Diagnose, CoreError::Session(SessionError::Interrupted(_))) => {
                Self::destructive(
                    "Diagnosis Failed",
                    "There was an error running the diagnostic model.",
                )
            }
            (_, e) => Self::destructive("Error", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::mock_data;
    use crate::task::TaskError;

    #[test]
    fn login_failure_carries_message() {
        let notice = Notice::from_error(Action::Login, &AuthError::InvalidCredentials.into());
        assert_eq!(notice.title, "Login failed");
        assert_eq!(notice.description, "Invalid email or password");
        assert_eq!(notice.variant, NoticeVariant::Destructive);
    }

    #[test]
    fn signup_duplicate() {
        let notice = Notice::from_error(Action::Signup, &AuthError::DuplicateEmail.into());
        assert_eq!(notice.title, "Registration failed");
        assert_eq!(notice.description, "User with this email already exists");
    }

    #[test]
    fn intake_validation_is_missing_information() {
        let err = RecordError::Validation("Name and age are required.".into());
        let notice = Notice::from_error(Action::AddPatient, &err.into());
        assert_eq!(notice.title, "Missing information");
        assert_eq!(notice.description, "Name and age are required.");
    }

    #[test]
    fn missing_selection_is_generic_error() {
        let notice = Notice::from_error(Action::Diagnose, &SessionError::MissingSelection.into());
        assert_eq!(notice.title, "Error");
        assert_eq!(
            notice.description,
            "Please select both a patient and a diagnostic model."
        );
    }

    #[test]
    fn interrupted_prediction() {
        let err = SessionError::Interrupted(TaskError::Cancelled);
        let notice = Notice::from_error(Action::Diagnose, &err.into());
        assert_eq!(notice.title, "Diagnosis Failed");
    }

    #[test]
    fn success_notices() {
        let doctor = mock_data::seed_users().remove(0).user;
        assert_eq!(Notice::logged_in(&doctor).description, "Welcome, Dr. Smith!");
        assert_eq!(Notice::logged_out().variant, NoticeVariant::Default);
        let model = mock_data::models().remove(0);
        assert_eq!(
            Notice::diagnosis_complete(&model).description,
            format!("Generated predictions using {}", model.name)
        );
        let patient = mock_data::seed_patients().remove(0);
        assert_eq!(
            Notice::patient_added(&patient).description,
            format!("{} has been added successfully.", patient.name)
        );
    }
}
