use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;
use shared_validation::{is_valid_age, is_valid_contact, is_valid_name};

use crate::models::{CreatePatientRequest, Patient, PatientError};

/// Persistence boundary for patient records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert_patient(&self, request: &CreatePatientRequest) -> Result<Patient>;
    async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>>;
}

pub struct PostgrestPatientStore {
    supabase: PostgrestClient,
}

impl PostgrestPatientStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: PostgrestClient::new(config),
        }
    }
}

#[async_trait]
impl PatientStore for PostgrestPatientStore {
    async fn insert_patient(&self, request: &CreatePatientRequest) -> Result<Patient> {
        let patient_data = json!({
            "name": request.name,
            "age": request.age,
            "contact": request.contact,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(patient_data),
            Some(headers),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create patient record"))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}

pub struct PatientService<S: PatientStore = PostgrestPatientStore> {
    store: S,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestPatientStore::new(config),
        }
    }
}

impl<S: PatientStore> PatientService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Register a patient, returning the stored record with its generated id.
    pub async fn register_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Registering patient: {}", request.name);

        if !is_valid_name(&request.name) {
            return Err(PatientError::Validation(
                "Patient name must contain letters and spaces only".to_string(),
            ));
        }
        if !is_valid_age(request.age) {
            return Err(PatientError::Validation(
                "Patient age must be between 1 and 120".to_string(),
            ));
        }
        if !is_valid_contact(&request.contact) {
            return Err(PatientError::Validation(
                "Contact number must be exactly 10 digits".to_string(),
            ));
        }

        let patient = self.store.insert_patient(&request).await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        debug!("Patient registered with id {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.store.get_patient(patient_id).await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::NotFound)
    }
}
