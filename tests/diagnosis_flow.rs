//! End-to-end flows through `CoreState`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use clinical_diagnosis::auth::{AuthError, Landing};
use clinical_diagnosis::config::ServiceConfig;
use clinical_diagnosis::core_state::{CoreError, CoreState};
use clinical_diagnosis::diagnosis_session::{DiagnosisSession, SessionError, SessionState};
use clinical_diagnosis::identity_store::{FileKeyValueStore, IdentityStore};
use clinical_diagnosis::models::enums::UserRole;
use clinical_diagnosis::models::{PatientIntake, SymptomValue};
use clinical_diagnosis::notice::{Action, Notice};
use clinical_diagnosis::records::{filter_by_name, RecordError};
use clinical_diagnosis::task::TaskError;

#[tokio::test]
async fn doctor_logs_in_and_lands_on_dashboard() {
    let state = CoreState::ephemeral();
    let outcome = state
        .auth()
        .login("doctor@example.com", "password123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.user.role, UserRole::Doctor);
    assert_eq!(outcome.landing, Landing::Dashboard);
    assert_eq!(outcome.landing.route(), "/dashboard");

    let err = state
        .auth()
        .login("doctor@example.com", "wrong")
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    // Failed attempt leaves the signed-in user in place
    assert_eq!(state.auth().current_user(), Some(outcome.user));
}

#[tokio::test]
async fn patient_signup_then_login_lands_on_portal() {
    let state = CoreState::ephemeral();
    let before = state.auth().roster_len();
    let signed_up = state
        .auth()
        .signup("John Doe", "patient@x.com", "pw", UserRole::Patient)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(signed_up.user.patient_id.as_deref(), Some(signed_up.user.id.as_str()));
    assert_eq!(state.auth().roster_len(), before + 1);

    assert_eq!(state.auth().logout(), Landing::Login);
    let outcome = state
        .auth()
        .login("patient@x.com", "pw")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.landing, Landing::PatientPortal);

    let dup = state
        .auth()
        .signup("Other", "patient@x.com", "pw2", UserRole::Doctor)
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(dup, AuthError::DuplicateEmail));
    assert_eq!(state.auth().roster_len(), before + 1);
    let notice = Notice::from_error(Action::Signup, &CoreError::from(dup));
    assert_eq!(notice.title, "Registration failed");
}

#[test]
fn intake_validation_and_search() {
    let state = CoreState::ephemeral();
    let err = state
        .add_patient(&PatientIntake {
            name: "Someone".into(),
            age: "forty".into(),
            ..PatientIntake::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::Record(RecordError::Validation(_))));
    assert_eq!(state.records().len(), 5);

    let added = state
        .add_patient(&PatientIntake {
            name: "Ada Lovelace".into(),
            age: "36".into(),
            medical_history: "Migraine, , Anemia".into(),
            ..PatientIntake::default()
        })
        .unwrap();
    assert_eq!(state.records().len(), 6);
    assert_eq!(added.date_added, Local::now().date_naive());
    assert_eq!(
        added.medical_history,
        Some(vec!["Migraine".to_string(), "Anemia".to_string()])
    );

    let all = state.records().list_patients().unwrap();
    assert_eq!(filter_by_name(&all, ""), all);
    let once = filter_by_name(&all, "jo");
    assert_eq!(filter_by_name(&once, "jo"), once);
    assert_eq!(once.len(), 2);
}

#[tokio::test]
async fn full_diagnosis_session() {
    let state = CoreState::ephemeral();
    state
        .auth()
        .authenticate("doctor@example.com", "password123")
        .unwrap();

    let mut session = DiagnosisSession::new();
    assert!(matches!(session.submit(), Err(SessionError::MissingSelection)));

    state.prepare_session(&mut session, "1", "2").unwrap();
    session.update_input("1", SymptomValue::Boolean(true)).unwrap();
    session.update_input("4", SymptomValue::Number(180.0)).unwrap();

    let results = session.diagnose(state.predictions()).await.unwrap().to_vec();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].disease, "Type 2 Diabetes");
    assert_eq!(session.state(), SessionState::ResultsReady);

    let saved = state
        .save_session_result(&session, 0, Some("Start metformin".into()))
        .unwrap();
    assert_eq!(saved.doctor_id.as_deref(), Some("1"));
    let history = state.records().diagnoses_for("1");
    assert_eq!(history[0].id, saved.id);
    assert_eq!(history.len(), 3);

    session.modify_inputs().unwrap();
    assert_eq!(session.inputs()[0].value, SymptomValue::Boolean(true));
}

#[tokio::test]
async fn cancelled_prediction_never_completes() {
    let config = ServiceConfig {
        auth_delay: Duration::ZERO,
        prediction_delay: Duration::from_secs(30),
    };
    let state = CoreState::new(config, IdentityStore::in_memory());
    let mut session = DiagnosisSession::new();
    state.prepare_session(&mut session, "1", "1").unwrap();

    let request = session.submit().unwrap();
    assert_eq!(session.state(), SessionState::Computing);
    let mut handle = state
        .predictions()
        .run_prediction(&request.model_id, request.inputs);
    handle.abort();
    let err = handle.await.unwrap_err();
    assert_eq!(err, TaskError::Cancelled);

    session.abandon();
    assert_eq!(session.state(), SessionState::InputsEditable);
    assert!(session.predictions().is_empty());
    assert!(session.complete(Vec::new()).is_err());

    let err = SessionError::Interrupted(err);
    assert_eq!(
        Notice::from_error(Action::Diagnose, &err.into()).title,
        "Diagnosis Failed"
    );

    let waited =
        tokio::time::timeout(Duration::from_millis(20), session.diagnose(state.predictions()))
            .await;
    assert!(waited.is_err());
    assert_eq!(session.state(), SessionState::InputsEditable);
    assert!(session.predictions().is_empty());
}

#[tokio::test]
async fn session_survives_restart_via_identity_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = || IdentityStore::new(Box::new(FileKeyValueStore::new(dir.path())));

    let first = Arc::new(CoreState::new(ServiceConfig::instant(), store()));
    first
        .auth()
        .login("admin@example.com", "password123")
        .await
        .unwrap()
        .unwrap();
    drop(first);

    let second = CoreState::new(ServiceConfig::instant(), store());
    let restored = second.auth().restore_session().unwrap();
    assert_eq!(restored.role, UserRole::Admin);
    assert_eq!(second.auth().landing(), Landing::Dashboard);

    second.auth().logout();
    let third = CoreState::new(ServiceConfig::instant(), store());
    assert!(third.auth().restore_session().is_none());
}
