use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{decode_list, encode_list, parse_date};
use crate::db::DatabaseError;
use crate::models::enums::Gender;
use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str =
    "id, name, age, gender, blood_type, medical_history, date_added, email, user_id";

struct PatientRow {
    id: String,
    name: String,
    age: u32,
    gender: String,
    blood_type: Option<String>,
    medical_history: Option<String>,
    date_added: String,
    email: Option<String>,
    user_id: Option<String>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        blood_type: row.get(4)?,
        medical_history: row.get(5)?,
        date_added: row.get(6)?,
        email: row.get(7)?,
        user_id: row.get(8)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        name: row.name,
        age: row.age,
        gender: Gender::from_str(&row.gender)?,
        blood_type: row.blood_type,
        medical_history: decode_list(row.medical_history)?,
        date_added: parse_date("date_added", &row.date_added)?,
        email: row.email,
        user_id: row.user_id,
    })
}

/// All patients in insertion order.
pub fn get_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY rowid"
    ))?;
    let rows = stmt.query_map([], read_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn get_patient_by_id(conn: &Connection, id: &str) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"))?;
    match stmt.query_row(params![id], read_row) {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert with a fresh identifier and today's date.
pub fn insert_patient(conn: &Connection, fields: &NewPatient) -> Result<Patient, DatabaseError> {
    insert_patient_dated(conn, fields, Local::now().date_naive())
}

pub fn insert_patient_dated(
    conn: &Connection,
    fields: &NewPatient,
    date_added: NaiveDate,
) -> Result<Patient, DatabaseError> {
    let patient = Patient {
        id: Uuid::new_v4().to_string(),
        name: fields.name.clone(),
        age: fields.age,
        gender: fields.gender,
        blood_type: fields.blood_type.clone(),
        medical_history: fields.medical_history.clone(),
        date_added,
        email: fields.email.clone(),
        user_id: fields.user_id.clone(),
    };

    conn.execute(
        "INSERT INTO patients
             (id, name, age, gender, blood_type, medical_history, date_added, email, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            patient.id,
            patient.name,
            patient.age,
            patient.gender.as_str(),
            patient.blood_type,
            encode_list(&patient.medical_history)?,
            patient.date_added.to_string(),
            patient.email,
            patient.user_id,
        ],
    )?;
    tracing::info!(patient_id = %patient.id, "Patient created");
    Ok(patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn fields(name: &str) -> NewPatient {
        NewPatient {
            name: name.into(),
            age: 40,
            gender: Gender::Female,
            blood_type: Some("A+".into()),
            medical_history: Some(vec!["Asthma".into(), "Eczema".into()]),
            email: None,
            user_id: None,
        }
    }

    #[test]
    fn insert_then_fetch() {
        let conn = open_memory_database().unwrap();
        let created = insert_patient(&conn, &fields("Jane Smith")).unwrap();
        let fetched = get_patient_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.medical_history.unwrap(), vec!["Asthma", "Eczema"]);
    }

    #[test]
    fn missing_patient_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient_by_id(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn list_keeps_insertion_order_and_null_history() {
        let conn = open_memory_database().unwrap();
        let mut second = fields("B");
        second.medical_history = None;
        insert_patient(&conn, &fields("A")).unwrap();
        insert_patient(&conn, &second).unwrap();

        let all = get_patients(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "A");
        assert!(all[1].medical_history.is_none());
    }

    #[test]
    fn unknown_user_link_violates_foreign_key() {
        let conn = open_memory_database().unwrap();
        let mut linked = fields("C");
        linked.user_id = Some("ghost".into());
        assert!(matches!(
            insert_patient(&conn, &linked),
            Err(DatabaseError::Sqlite(_))
        ));
    }
}
