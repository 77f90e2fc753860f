use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_date;
use crate::db::DatabaseError;
use crate::models::{ModelMetadata, NewModel};

struct ModelRow {
    id: String,
    name: String,
    version: String,
    disease_category: String,
    accuracy: f64,
    description: Option<String>,
    file_path: Option<String>,
    created_by: Option<String>,
    is_active: i32,
    last_updated: String,
}

fn model_from_row(row: ModelRow) -> Result<ModelMetadata, DatabaseError> {
    Ok(ModelMetadata {
        id: row.id,
        name: row.name,
        version: row.version,
        accuracy: row.accuracy,
        last_updated: parse_date("last_updated", &row.last_updated)?,
        disease_category: row.disease_category,
        description: row.description.unwrap_or_default(),
        created_by: row.created_by,
        is_active: row.is_active != 0,
        file_path: row.file_path,
    })
}

/// Active models only, in insertion order.
pub fn get_active_models(conn: &Connection) -> Result<Vec<ModelMetadata>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, version, disease_category, accuracy, description, file_path,
         created_by, is_active, last_updated
         FROM models WHERE is_active = 1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ModelRow {
            id: row.get(0)?,
            name: row.get(1)?,
            version: row.get(2)?,
            disease_category: row.get(3)?,
            accuracy: row.get(4)?,
            description: row.get(5)?,
            file_path: row.get(6)?,
            created_by: row.get(7)?,
            is_active: row.get(8)?,
            last_updated: row.get(9)?,
        })
    })?;

    let mut models = Vec::new();
    for row in rows {
        models.push(model_from_row(row?)?);
    }
    Ok(models)
}

pub fn insert_model(conn: &Connection, model: &NewModel) -> Result<ModelMetadata, DatabaseError> {
    insert_model_dated(conn, model, Local::now().date_naive())
}

pub fn insert_model_dated(
    conn: &Connection,
    model: &NewModel,
    last_updated: NaiveDate,
) -> Result<ModelMetadata, DatabaseError> {
    if !(0.0..=1.0).contains(&model.accuracy) {
        return Err(DatabaseError::ConstraintViolation(format!(
            "Model accuracy {} outside [0, 1]",
            model.accuracy
        )));
    }

    let saved = ModelMetadata {
        id: Uuid::new_v4().to_string(),
        name: model.name.clone(),
        version: model.version.clone(),
        accuracy: model.accuracy,
        last_updated,
        disease_category: model.disease_category.clone(),
        description: model.description.clone(),
        created_by: model.created_by.clone(),
        is_active: model.is_active,
        file_path: model.file_path.clone(),
    };

    conn.execute(
        "INSERT INTO models (id, name, version, disease_category, accuracy, description,
         file_path, created_by, is_active, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            saved.id,
            saved.name,
            saved.version,
            saved.disease_category,
            saved.accuracy,
            saved.description,
            saved.file_path,
            saved.created_by,
            saved.is_active as i32,
            saved.last_updated.to_string(),
        ],
    )?;
    tracing::info!(model_id = %saved.id, category = %saved.disease_category, "Model saved");
    Ok(saved)
}
