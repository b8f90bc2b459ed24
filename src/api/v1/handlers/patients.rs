/*
 * Responsibility
 * - /patients 系 CRUD handler
 * - ValidatedJson で DTO validation、PathParam で id を parse → repo 呼び出し
 * - RepoError はそのまま `?` で返す (409/404/400/500 への分類は ErrorNormalizer)
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::patients::{CreatePatientRequest, PatientResponse, UpdatePatientRequest},
        extractors::{CurrentIdentity, PathParam, ValidatedJson},
    },
    error::AppError,
    repos::patient_repo::{self, NewPatient, PatientChanges},
    state::AppState,
};

pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let rows = patient_repo::list(&state.db).await?;

    Ok(Json(rows.into_iter().map(PatientResponse::from).collect()))
}

pub async fn create_patient(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    ValidatedJson(req): ValidatedJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    // validate() guarantees the required fields are present
    let (Some(first_name), Some(last_name), Some(email)) =
        (&req.first_name, &req.last_name, &req.email)
    else {
        return Err(AppError::internal("validated patient request missing fields"));
    };

    let row = patient_repo::create(
        &state.db,
        NewPatient {
            first_name: first_name.trim(),
            last_name: last_name.trim(),
            email: email.trim(),
            phone: req.phone.as_deref().map(str::trim),
        },
    )
    .await?;

    tracing::info!(patient_id = %row.id, created_by = %identity.id, "patient created");

    Ok((StatusCode::CREATED, Json(PatientResponse::from(row))))
}

pub async fn get_patient(
    State(state): State<AppState>,
    PathParam(patient_id): PathParam<Uuid>,
) -> Result<Json<PatientResponse>, AppError> {
    let row = patient_repo::get(&state.db, patient_id).await?;

    Ok(Json(PatientResponse::from(row)))
}

pub async fn update_patient(
    State(state): State<AppState>,
    PathParam(patient_id): PathParam<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let changes = PatientChanges {
        first_name: req.first_name.as_deref().map(str::trim),
        last_name: req.last_name.as_deref().map(str::trim),
        email: req.email.as_deref().map(str::trim),
        phone: req.phone.as_ref().map(|inner| inner.as_deref()),
    };

    let row = patient_repo::update(&state.db, patient_id, changes).await?;

    Ok(Json(PatientResponse::from(row)))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    PathParam(patient_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    patient_repo::delete(&state.db, patient_id).await?;

    tracing::info!(%patient_id, deleted_by = %identity.id, "patient deleted");

    Ok(StatusCode::NO_CONTENT)
}
