/*
 * Responsibility
 * - Patients の request/response DTO
 * - Validate 実装: field path + message の組で返す (文字列化は ErrorNormalizer)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::extractors::{Validate, ValidationErrors};
use crate::repos::patient_repo::PatientRow;

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PHONE_MAX: usize = 32;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Validate for CreatePatientRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "firstName", self.first_name.as_deref(), true);
        check_name(&mut errors, "lastName", self.last_name.as_deref(), true);
        check_email(&mut errors, self.email.as_deref(), true);
        check_phone(&mut errors, self.phone.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (clear)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl Validate for UpdatePatientRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "firstName", self.first_name.as_deref(), false);
        check_name(&mut errors, "lastName", self.last_name.as_deref(), false);
        check_email(&mut errors, self.email.as_deref(), false);
        if let Some(phone) = &self.phone {
            check_phone(&mut errors, phone.as_deref());
        }
        errors.into_result()
    }
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn check_name(errors: &mut ValidationErrors, field: &str, value: Option<&str>, required: bool) {
    match value.map(str::trim) {
        None if required => errors.push(&[field], "required"),
        None => {}
        Some("") => errors.push(&[field], "must not be empty"),
        Some(v) if v.chars().count() > NAME_MAX => {
            errors.push(&[field], format!("must be at most {NAME_MAX} characters"))
        }
        Some(_) => {}
    }
}

fn check_email(errors: &mut ValidationErrors, value: Option<&str>, required: bool) {
    match value.map(str::trim) {
        None if required => errors.push(&["email"], "required"),
        None => {}
        Some(v) if v.len() > EMAIL_MAX => {
            errors.push(&["email"], format!("must be at most {EMAIL_MAX} characters"))
        }
        Some(v) => {
            let well_formed = v
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !well_formed {
                errors.push(&["email"], "must be a valid email address");
            }
        }
    }
}

fn check_phone(errors: &mut ValidationErrors, value: Option<&str>) {
    if let Some(v) = value
        && v.len() > PHONE_MAX
    {
        errors.push(&["phone"], format!("must be at most {PHONE_MAX} characters"));
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PatientRow> for PatientResponse {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}
