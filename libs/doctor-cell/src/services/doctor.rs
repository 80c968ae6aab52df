use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;
use shared_validation::{is_valid_contact, is_valid_name};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, DoctorOption};

/// Persistence boundary for doctor records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn insert_doctor(&self, request: &CreateDoctorRequest) -> Result<Doctor>;
    async fn list_doctors(&self) -> Result<Vec<Doctor>>;
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>>;
}

pub struct PostgrestDoctorStore {
    supabase: PostgrestClient,
}

impl PostgrestDoctorStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: PostgrestClient::new(config),
        }
    }
}

#[async_trait]
impl DoctorStore for PostgrestDoctorStore {
    async fn insert_doctor(&self, request: &CreateDoctorRequest) -> Result<Doctor> {
        let doctor_data = json!({
            "name": request.name,
            "specialization": request.specialization,
            "contact": request.contact,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(doctor_data),
            Some(headers),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create doctor record"))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/doctors?order=name.asc",
            None,
        ).await?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}

pub struct DoctorService<S: DoctorStore = PostgrestDoctorStore> {
    store: S,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestDoctorStore::new(config),
        }
    }
}

impl<S: DoctorStore> DoctorService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Register a new doctor after checking the input rules.
    pub async fn register_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Registering doctor: {}", request.name);

        if !is_valid_name(&request.name) {
            return Err(DoctorError::Validation(
                "Doctor name must contain letters and spaces only".to_string(),
            ));
        }
        if request.specialization.trim().is_empty() {
            return Err(DoctorError::Validation(
                "Specialization must not be empty".to_string(),
            ));
        }
        if !is_valid_contact(&request.contact) {
            return Err(DoctorError::Validation(
                "Contact number must be exactly 10 digits".to_string(),
            ));
        }

        let doctor = self.store.insert_doctor(&request).await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        debug!("Doctor registered with id {}", doctor.id);
        Ok(doctor)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.store.list_doctors().await
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.store.get_doctor(doctor_id).await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    /// Selectable doctor list for booking clients, label mapped to identifier.
    pub async fn doctor_options(&self) -> Result<Vec<DoctorOption>, DoctorError> {
        let doctors = self.list_doctors().await?;

        Ok(doctors.iter()
            .map(|doctor| DoctorOption {
                id: doctor.id,
                label: doctor.display_label(),
            })
            .collect())
    }
}
