//! Canned demo catalog.
//!
//! Everything here is hardcoded and fictional: seed patients, the user roster,
//! per-category symptom templates and prediction lists, model metadata and
//! performance scores. The stores copy from this module at construction time,
//! so mutations in one store instance never leak into another.

use chrono::NaiveDate;

use crate::models::enums::{Gender, InputCategory, RiskLevel, UserRole};
use crate::models::{
    ModelMetadata, ModelPerformance, Patient, PredictionResult, SymptomInput, User,
};

/// Disease categories that have templates and canned predictions.
pub const DISEASE_CATEGORIES: &[&str] = &["cardiac", "diabetes", "respiratory"];

/// Predictions per weekday shown on the dashboard (Mon..Sun).
pub const WEEKLY_ACTIVITY: [(&str, u32); 7] = [
    ("Mon", 5),
    ("Tue", 8),
    ("Wed", 12),
    ("Thu", 7),
    ("Fri", 10),
    ("Sat", 3),
    ("Sun", 2),
];

pub const CONFUSION_LABELS: [&str; 4] = ["Healthy", "Disease A", "Disease B", "Disease C"];

/// Rows are actual class, columns predicted class.
pub const CONFUSION_MATRIX: [[u32; 4]; 4] = [
    [120, 5, 2, 1],
    [8, 98, 4, 2],
    [3, 7, 88, 5],
    [2, 1, 6, 92],
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal calendar dates below are all valid.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Roster member with the plain demo credential.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub user: User,
    pub credential: &'static str,
}

pub fn seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            user: User {
                id: "1".into(),
                name: "Dr. Smith".into(),
                email: "doctor@example.com".into(),
                role: UserRole::Doctor,
                patient_id: None,
            },
            credential: "password123",
        },
        SeedUser {
            user: User {
                id: "2".into(),
                name: "Admin User".into(),
                email: "admin@example.com".into(),
                role: UserRole::Admin,
                patient_id: None,
            },
            credential: "password123",
        },
    ]
}

fn patient(
    id: &str,
    name: &str,
    age: u32,
    gender: Gender,
    blood_type: &str,
    history: [&str; 2],
    date_added: NaiveDate,
) -> Patient {
    Patient {
        id: id.into(),
        name: name.into(),
        age,
        gender,
        blood_type: Some(blood_type.into()),
        medical_history: Some(history.iter().map(|c| c.to_string()).collect()),
        date_added,
        email: None,
        user_id: None,
    }
}

pub fn seed_patients() -> Vec<Patient> {
    vec![
        patient(
            "1",
            "John Doe",
            45,
            Gender::Male,
            "O+",
            ["Hypertension", "Type 2 Diabetes"],
            date(2023, 9, 15),
        ),
        patient(
            "2",
            "Jane Smith",
            32,
            Gender::Female,
            "A-",
            ["Asthma", "Eczema"],
            date(2023, 10, 2),
        ),
        patient(
            "3",
            "Robert Johnson",
            58,
            Gender::Male,
            "B+",
            ["Coronary Artery Disease", "Hyperlipidemia"],
            date(2023, 8, 20),
        ),
        patient(
            "4",
            "Emily Wilson",
            27,
            Gender::Female,
            "AB+",
            ["Migraine", "Anemia"],
            date(2023, 10, 12),
        ),
        patient(
            "5",
            "Michael Brown",
            52,
            Gender::Male,
            "A+",
            ["GERD", "Osteoarthritis"],
            date(2023, 9, 28),
        ),
    ]
}

/// Previously recorded diagnoses for the seed roster.
pub fn seed_diagnoses() -> Vec<PredictionResult> {
    let mut hypertension =
        PredictionResult::candidate("Hypertension", 0.89, 0.89, RiskLevel::Medium, &[]);
    hypertension.id = Some("seed-dx-1".into());
    hypertension.patient_id = Some("1".into());
    hypertension.doctor_id = Some("1".into());
    hypertension.date = Some(date(2023, 10, 15));
    hypertension.notes = Some(
        "Patient presented with elevated blood pressure. \
         Recommended lifestyle changes and monitoring."
            .into(),
    );

    let mut diabetes =
        PredictionResult::candidate("Type 2 Diabetes", 0.92, 0.92, RiskLevel::High, &[]);
    diabetes.id = Some("seed-dx-2".into());
    diabetes.patient_id = Some("1".into());
    diabetes.date = Some(date(2023, 9, 20));
    diabetes.notes = Some(
        "Follow-up confirmed initial diagnosis. Starting on metformin and dietary plan.".into(),
    );

    vec![hypertension, diabetes]
}

/// Canonical ordered input template for a disease category.
pub fn symptom_template(category: &str) -> Vec<SymptomInput> {
    use InputCategory::{Lab, Symptom, Vital};

    match category {
        "cardiac" => vec![
            SymptomInput::flag("1", "Chest Pain", Symptom),
            SymptomInput::flag("2", "Shortness of Breath", Symptom),
            SymptomInput::flag("3", "Fatigue", Symptom),
            SymptomInput::flag("4", "Dizziness", Symptom),
            SymptomInput::measurement("5", "Heart Rate (bpm)", Vital, 75.0),
            SymptomInput::measurement("6", "Blood Pressure Systolic (mmHg)", Vital, 120.0),
            SymptomInput::measurement("7", "Blood Pressure Diastolic (mmHg)", Vital, 80.0),
            SymptomInput::measurement("8", "Cholesterol Level (mg/dL)", Lab, 180.0),
        ],
        "diabetes" => vec![
            SymptomInput::flag("1", "Frequent Urination", Symptom),
            SymptomInput::flag("2", "Excessive Thirst", Symptom),
            SymptomInput::flag("3", "Unexpected Weight Loss", Symptom),
            SymptomInput::measurement("4", "Fasting Blood Glucose (mg/dL)", Lab, 95.0),
            SymptomInput::measurement("5", "HbA1c (%)", Lab, 5.7),
            SymptomInput::measurement("6", "BMI", Vital, 24.0),
        ],
        "respiratory" => vec![
            SymptomInput::flag("1", "Cough", Symptom),
            SymptomInput::flag("2", "Shortness of Breath", Symptom),
            SymptomInput::flag("3", "Wheezing", Symptom),
            SymptomInput::measurement("4", "Oxygen Saturation (%)", Vital, 98.0),
            SymptomInput::measurement("5", "Respiratory Rate (breaths/min)", Vital, 16.0),
            SymptomInput::measurement("6", "Temperature (°F)", Vital, 98.6),
        ],
        _ => Vec::new(),
    }
}

/// Canned prediction list for a disease category.
pub fn canned_predictions(category: &str) -> Vec<PredictionResult> {
    use RiskLevel::{High, Low, Medium};

    match category {
        "cardiac" => vec![
            PredictionResult::candidate(
                "Coronary Artery Disease",
                0.78,
                0.85,
                High,
                &["ECG", "Stress Test", "Coronary Angiography"],
            ),
            PredictionResult::candidate(
                "Hypertensive Heart Disease",
                0.45,
                0.72,
                Medium,
                &["Echocardiogram", "Blood Pressure Monitoring"],
            ),
            PredictionResult::candidate(
                "Arrhythmia",
                0.23,
                0.68,
                Low,
                &["Holter Monitor", "Electrophysiology Study"],
            ),
        ],
        "diabetes" => vec![
            PredictionResult::candidate(
                "Type 2 Diabetes",
                0.82,
                0.89,
                High,
                &["Oral Glucose Tolerance Test", "Fasting Insulin Test"],
            ),
            PredictionResult::candidate(
                "Prediabetes",
                0.56,
                0.75,
                Medium,
                &["HbA1c Test", "Fasting Glucose Test"],
            ),
            PredictionResult::candidate(
                "Gestational Diabetes",
                0.12,
                0.60,
                Low,
                &["Glucose Challenge Test"],
            ),
        ],
        "respiratory" => vec![
            PredictionResult::candidate(
                "Chronic Obstructive Pulmonary Disease (COPD)",
                0.67,
                0.81,
                High,
                &["Pulmonary Function Test", "Chest X-ray"],
            ),
            PredictionResult::candidate(
                "Asthma",
                0.52,
                0.79,
                Medium,
                &["Spirometry", "Methacholine Challenge"],
            ),
            PredictionResult::candidate(
                "Bronchitis",
                0.34,
                0.65,
                Low,
                &["Chest X-ray", "Sputum Culture"],
            ),
        ],
        _ => Vec::new(),
    }
}

fn model(
    id: &str,
    name: &str,
    version: &str,
    accuracy: f64,
    last_updated: NaiveDate,
    category: &str,
    description: &str,
) -> ModelMetadata {
    ModelMetadata {
        id: id.into(),
        name: name.into(),
        version: version.into(),
        accuracy,
        last_updated,
        disease_category: category.into(),
        description: description.into(),
        created_by: None,
        is_active: true,
        file_path: None,
    }
}

pub fn models() -> Vec<ModelMetadata> {
    vec![
        model(
            "1",
            "Cardiac Disease Predictor",
            "v2.1",
            0.89,
            date(2023, 9, 1),
            "cardiac",
            "Machine learning model trained on 50,000 cardiac patient records \
             to predict heart-related conditions.",
        ),
        model(
            "2",
            "Diabetes Risk Assessment",
            "v1.5",
            0.92,
            date(2023, 10, 5),
            "diabetes",
            "Neural network model designed to predict diabetes and related conditions \
             based on clinical data.",
        ),
        model(
            "3",
            "Respiratory Condition Analyzer",
            "v1.2",
            0.85,
            date(2023, 8, 15),
            "respiratory",
            "Ensemble model for diagnosing respiratory diseases using patient symptoms \
             and pulmonary function metrics.",
        ),
    ]
}

pub fn model_performance(model_id: &str) -> Option<ModelPerformance> {
    let (accuracy, precision, recall, f1_score, auc) = match model_id {
        "1" => (0.89, 0.87, 0.85, 0.86, 0.92),
        "2" => (0.92, 0.94, 0.91, 0.92, 0.96),
        "3" => (0.85, 0.83, 0.88, 0.85, 0.90),
        _ => return None,
    };
    Some(ModelPerformance {
        accuracy,
        precision,
        recall,
        f1_score,
        auc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_model_category_has_template_and_predictions() {
        for m in models() {
            assert!(DISEASE_CATEGORIES.contains(&m.disease_category.as_str()));
            assert!(!symptom_template(&m.disease_category).is_empty());
            assert_eq!(canned_predictions(&m.disease_category).len(), 3);
            assert!(model_performance(&m.id).is_some());
        }
    }

    #[test]
    fn unknown_category_is_empty() {
        assert!(symptom_template("oncology").is_empty());
        assert!(canned_predictions("oncology").is_empty());
    }

    #[test]
    fn template_ids_are_unique_per_category() {
        for category in DISEASE_CATEGORIES {
            let template = symptom_template(category);
            let mut ids: Vec<_> = template.iter().map(|i| i.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), template.len(), "duplicate id in {category}");
        }
    }

    #[test]
    fn seed_patient_ids_are_unique() {
        let patients = seed_patients();
        assert_eq!(patients.len(), 5);
        let mut ids: Vec<_> = patients.iter().map(|p| p.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn seed_diagnoses_belong_to_first_patient() {
        assert!(seed_diagnoses()
            .iter()
            .all(|d| d.patient_id.as_deref() == Some("1") && d.is_saved()));
    }
}
