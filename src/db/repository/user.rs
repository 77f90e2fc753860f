use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::credential::{hash_credential, verify_credential};
use crate::db::DatabaseError;
use crate::models::enums::UserRole;
use crate::models::{NewUser, User};

type UserRow = (String, String, String, String, Option<String>);

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    let (id, name, email, role, patient_id) = row;
    Ok(User {
        id,
        name,
        email,
        role: UserRole::from_str(&role)?,
        patient_id,
    })
}

/// Email lookup is case-sensitive, like the in-memory roster.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    Ok(get_user_with_hash(conn, email)?.map(|(user, _)| user))
}

fn get_user_with_hash(
    conn: &Connection,
    email: &str,
) -> Result<Option<(User, String)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, patient_id, password_hash FROM users WHERE email = ?1",
    )?;
    let result = stmt.query_row(params![email], |row| {
        Ok((
            (
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ),
            row.get::<_, String>(5)?,
        ))
    });

    match result {
        Ok((row, hash)) => Ok(Some((user_from_row(row)?, hash))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_user(conn: &Connection, new_user: &NewUser) -> Result<User, DatabaseError> {
    if get_user_by_email(conn, &new_user.email)?.is_some() {
        return Err(DatabaseError::ConstraintViolation(
            "User with this email already exists".into(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let patient_id = match (new_user.role, &new_user.patient_id) {
        (UserRole::Patient, None) => Some(id.clone()),
        (_, linked) => linked.clone(),
    };
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, role, patient_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            new_user.name,
            new_user.email,
            hash_credential(&new_user.credential),
            new_user.role.as_str(),
            patient_id,
        ],
    )?;
    tracing::info!(user_id = %id, role = %new_user.role, "User created");

    Ok(User {
        id,
        name: new_user.name.clone(),
        email: new_user.email.clone(),
        role: new_user.role,
        patient_id,
    })
}

/// The user whose stored hash matches, or `None` for unknown email or wrong credential.
pub fn verify_user_credential(
    conn: &Connection,
    email: &str,
    credential: &str,
) -> Result<Option<User>, DatabaseError> {
    let Some((user, stored)) = get_user_with_hash(conn, email)? else {
        return Ok(None);
    };
    if verify_credential(credential, &stored) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
