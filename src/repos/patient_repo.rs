/*
 * Responsibility
 * - patients テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - DB エラーは RepoError::from_sqlx で分類して返す (409/404/400 の判断は ErrorNormalizer)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct PatientRow {
    #[sqlx(rename = "patientId")]
    pub id: Uuid,
    #[sqlx(rename = "firstName")]
    pub first_name: String,
    #[sqlx(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub struct NewPatient<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

pub struct PatientChanges<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    // None: keep, Some(None): clear, Some(Some(v)): set
    pub phone: Option<Option<&'a str>>,
}

pub async fn list(db: &PgPool) -> Result<Vec<PatientRow>, RepoError> {
    let rows = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT "patientId", "firstName", "lastName", "email", "phone", "createdAt"
        FROM patients
        ORDER BY "lastName", "firstName"
        "#,
    )
    .fetch_all(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(rows)
}

pub async fn create(db: &PgPool, patient: NewPatient<'_>) -> Result<PatientRow, RepoError> {
    // "email" has a unique index; duplicates surface as RepoError::UniqueViolation
    let row = sqlx::query_as::<_, PatientRow>(
        r#"
        INSERT INTO patients ("firstName", "lastName", "email", "phone")
        VALUES ($1, $2, $3, $4)
        RETURNING "patientId", "firstName", "lastName", "email", "phone", "createdAt"
        "#,
    )
    .bind(patient.first_name)
    .bind(patient.last_name)
    .bind(patient.email)
    .bind(patient.phone)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Fetches one patient; a missing row is `RepoError::RecordNotFound`.
pub async fn get(db: &PgPool, patient_id: Uuid) -> Result<PatientRow, RepoError> {
    let row = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT "patientId", "firstName", "lastName", "email", "phone", "createdAt"
        FROM patients
        WHERE "patientId" = $1
        "#,
    )
    .bind(patient_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    patient_id: Uuid,
    changes: PatientChanges<'_>,
) -> Result<PatientRow, RepoError> {
    let row = sqlx::query_as::<_, PatientRow>(
        r#"
        UPDATE patients
        SET
            "firstName" = COALESCE($2, "firstName"),
            "lastName" = COALESCE($3, "lastName"),
            "email" = COALESCE($4, "email"),
            "phone" = CASE
                WHEN $5 = false THEN "phone"
                ELSE $6
            END
        WHERE "patientId" = $1
        RETURNING "patientId", "firstName", "lastName", "email", "phone", "createdAt"
        "#,
    )
    .bind(patient_id)
    .bind(changes.first_name)
    .bind(changes.last_name)
    .bind(changes.email)
    .bind(changes.phone.is_some()) // $5: flag to set phone
    .bind(changes.phone.flatten()) // $6: new phone value
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Deletes a patient. Appointments still referencing the row make this fail
/// with `RepoError::ForeignKeyViolation`.
pub async fn delete(db: &PgPool, patient_id: Uuid) -> Result<(), RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM patients
        WHERE "patientId" = $1
        "#,
    )
    .bind(patient_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    if result.rows_affected() == 0 {
        return Err(RepoError::RecordNotFound);
    }

    Ok(())
}
