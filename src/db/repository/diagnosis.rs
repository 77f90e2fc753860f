use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{decode_list, encode_list, get_patient_by_id, parse_date};
use crate::db::DatabaseError;
use crate::models::enums::RiskLevel;
use crate::models::{NewDiagnosis, PredictionResult};

/// Save a result against an existing patient; the patient must exist.
pub fn insert_diagnosis(
    conn: &Connection,
    diagnosis: &NewDiagnosis,
) -> Result<PredictionResult, DatabaseError> {
    if get_patient_by_id(conn, &diagnosis.patient_id)?.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: diagnosis.patient_id.clone(),
        });
    }

    let mut saved = diagnosis.result.clone();
    saved.id = Some(Uuid::new_v4().to_string());
    saved.patient_id = Some(diagnosis.patient_id.clone());
    saved.doctor_id = diagnosis.doctor_id.clone();
    saved.notes = diagnosis.notes.clone();
    saved.date = Some(diagnosis.date);

    conn.execute(
        "INSERT INTO diagnoses (id, patient_id, model_id, disease, probability, confidence,
         risk_level, suggested_tests, notes, doctor_id, diagnosis_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            saved.id,
            diagnosis.patient_id,
            diagnosis.model_id,
            saved.disease,
            saved.probability,
            saved.confidence,
            saved.risk_level.as_str(),
            encode_list(&saved.suggested_tests)?,
            saved.notes,
            saved.doctor_id,
            diagnosis.date.to_string(),
        ],
    )?;
    Ok(saved)
}

type DiagnosisRow = (
    String,
    String,
    String,
    f64,
    f64,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

/// Saved results for a patient, newest first.
pub fn get_patient_diagnoses(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<PredictionResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, disease, probability, confidence, risk_level,
         suggested_tests, notes, doctor_id, diagnosis_date
         FROM diagnoses WHERE patient_id = ?1
         ORDER BY diagnosis_date DESC, created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
            row.get::<_, Option<String>>(8)?,
            row.get::<_, String>(9)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let row: DiagnosisRow = row?;
        let (id, patient_id, disease, probability, confidence, risk) =
            (row.0, row.1, row.2, row.3, row.4, row.5);
        let (tests, notes, doctor_id, date) = (row.6, row.7, row.8, row.9);
        results.push(PredictionResult {
            id: Some(id),
            disease,
            probability,
            confidence,
            suggested_tests: decode_list(tests)?,
            risk_level: RiskLevel::from_str(&risk)?,
            patient_id: Some(patient_id),
            doctor_id,
            notes,
            date: Some(parse_date("diagnosis_date", &date)?),
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::insert_patient;
    use crate::mock_data;
    use crate::models::NewPatient;
    use crate::models::enums::Gender;
    use chrono::NaiveDate;

    fn patient(conn: &Connection) -> String {
        insert_patient(
            conn,
            &NewPatient {
                name: "John Doe".into(),
                age: 45,
                gender: Gender::Male,
                blood_type: None,
                medical_history: None,
                email: None,
                user_id: None,
            },
        )
        .unwrap()
        .id
    }

    fn diagnosis(patient_id: &str, day: u32, index: usize) -> NewDiagnosis {
        NewDiagnosis {
            patient_id: patient_id.into(),
            model_id: "1".into(),
            doctor_id: Some("1".into()),
            notes: Some("Follow up in two weeks".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            result: mock_data::canned_predictions("cardiac").remove(index),
        }
    }

    #[test]
    fn save_fills_linkage_fields() {
        let conn = open_memory_database().unwrap();
        let pid = patient(&conn);
        let saved = insert_diagnosis(&conn, &diagnosis(&pid, 1, 0)).unwrap();
        assert!(saved.is_saved());
        assert_eq!(saved.patient_id.as_deref(), Some(pid.as_str()));
        assert_eq!(saved.doctor_id.as_deref(), Some("1"));

        let listed = get_patient_diagnoses(&conn, &pid).unwrap();
        assert_eq!(listed, vec![saved]);
        assert_eq!(listed[0].suggested_tests.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn newest_first() {
        let conn = open_memory_database().unwrap();
        let pid = patient(&conn);
        insert_diagnosis(&conn, &diagnosis(&pid, 1, 0)).unwrap();
        insert_diagnosis(&conn, &diagnosis(&pid, 9, 1)).unwrap();
        insert_diagnosis(&conn, &diagnosis(&pid, 9, 2)).unwrap();

        let diseases: Vec<String> = get_patient_diagnoses(&conn, &pid)
            .unwrap()
            .into_iter()
            .map(|d| d.disease)
            .collect();
        assert_eq!(
            diseases,
            vec!["Arrhythmia", "Hypertensive Heart Disease", "Coronary Artery Disease"]
        );
    }

    #[test]
    fn unknown_patient_not_found() {
        let conn = open_memory_database().unwrap();
        let err = insert_diagnosis(&conn, &diagnosis("ghost", 1, 0)).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        assert!(get_patient_diagnoses(&conn, "ghost").unwrap().is_empty());
    }
}
