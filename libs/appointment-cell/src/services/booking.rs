use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};

use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;
use shared_validation::{
    is_valid_age, is_valid_contact, is_valid_date, is_valid_name, parse_appointment_date,
};

use patient_cell::models::Patient;

use crate::models::{Appointment, AppointmentError, AppointmentSummary, BookAppointmentRequest};

/// Persistence boundary for the booking flow. Booking writes the patient
/// record and the appointment referencing it; the listing comes back joined
/// with patient and doctor names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn doctor_exists(&self, doctor_id: Uuid) -> Result<bool>;
    async fn insert_patient(&self, name: &str, age: i32, contact: &str) -> Result<Patient>;
    async fn insert_appointment(&self, doctor_id: Uuid, patient_id: Uuid, date: NaiveDate) -> Result<Appointment>;
    async fn list_appointments(&self) -> Result<Vec<AppointmentSummary>>;
    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool>;
}

pub struct PostgrestAppointmentStore {
    supabase: PostgrestClient,
}

impl PostgrestAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: PostgrestClient::new(config),
        }
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
        headers
    }
}

/// Shape of an embedded-resource listing row:
/// `select=id,appointment_date,patients(name),doctors(name)`.
#[derive(Debug, Deserialize)]
struct AppointmentRow {
    id: Uuid,
    appointment_date: NaiveDate,
    patients: NameRef,
    doctors: NameRef,
}

#[derive(Debug, Deserialize)]
struct NameRef {
    name: String,
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn doctor_exists(&self, doctor_id: Uuid) -> Result<bool> {
        let path = format!("/rest/v1/doctors?id=eq.{}&select=id", doctor_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(!result.is_empty())
    }

    async fn insert_patient(&self, name: &str, age: i32, contact: &str) -> Result<Patient> {
        let patient_data = json!({
            "name": name,
            "age": age,
            "contact": contact,
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(patient_data),
            Some(Self::representation_headers()),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create patient record"))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn insert_appointment(&self, doctor_id: Uuid, patient_id: Uuid, date: NaiveDate) -> Result<Appointment> {
        let appointment_data = json!({
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "appointment_date": date.format("%Y-%m-%d").to_string(),
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(appointment_data),
            Some(Self::representation_headers()),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create appointment record"))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn list_appointments(&self) -> Result<Vec<AppointmentSummary>> {
        let path = "/rest/v1/appointments?select=id,appointment_date,patients(name),doctors(name)&order=appointment_date.asc";
        let rows: Vec<AppointmentRow> = self.supabase.request(Method::GET, path, None).await?;

        Ok(rows.into_iter()
            .map(|row| AppointmentSummary {
                id: row.id,
                patient_name: row.patients.name,
                doctor_name: row.doctors.name,
                appointment_date: row.appointment_date,
            })
            .collect())
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);

        let deleted: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(Self::representation_headers()),
        ).await?;

        Ok(!deleted.is_empty())
    }
}

pub struct BookingService<S: AppointmentStore = PostgrestAppointmentStore> {
    store: S,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestAppointmentStore::new(config),
        }
    }
}

impl<S: AppointmentStore> BookingService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Book an appointment: check the patient details and the date, verify
    /// the doctor, then create the patient and the appointment records.
    pub async fn book_appointment(&self, request: BookAppointmentRequest) -> Result<Appointment, AppointmentError> {
        info!("Booking appointment with doctor {}", request.doctor_id);

        // Input rules, in the order the booking form collects them.
        if !is_valid_name(&request.patient_name) {
            return Err(AppointmentError::Validation(
                "Patient name must contain letters and spaces only".to_string(),
            ));
        }
        if !is_valid_age(request.patient_age) {
            return Err(AppointmentError::Validation(
                "Patient age must be between 1 and 120".to_string(),
            ));
        }
        if !is_valid_contact(&request.patient_contact) {
            return Err(AppointmentError::Validation(
                "Contact number must be exactly 10 digits".to_string(),
            ));
        }
        if !is_valid_date(&request.appointment_date) {
            return Err(AppointmentError::Validation(
                "Appointment date must be a YYYY-MM-DD date that is not in the past".to_string(),
            ));
        }
        let date = parse_appointment_date(&request.appointment_date)
            .ok_or_else(|| AppointmentError::Validation(
                "Appointment date must be a YYYY-MM-DD date".to_string(),
            ))?;

        let doctor_found = self.store.doctor_exists(request.doctor_id).await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        if !doctor_found {
            return Err(AppointmentError::DoctorNotFound);
        }

        let patient = self.store
            .insert_patient(&request.patient_name, request.patient_age, &request.patient_contact)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        debug!("Patient record created with id {}", patient.id);

        let appointment = self.store
            .insert_appointment(request.doctor_id, patient.id, date)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        info!("Appointment {} booked for patient {}", appointment.id, patient.id);
        Ok(appointment)
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentSummary>, AppointmentError> {
        self.store.list_appointments().await
            .map_err(|e| AppointmentError::Database(e.to_string()))
    }

    /// Cancel by identifier; unknown identifiers are reported, not ignored.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        let deleted = self.store.delete_appointment(appointment_id).await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        if !deleted {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} cancelled", appointment_id);
        Ok(())
    }
}
