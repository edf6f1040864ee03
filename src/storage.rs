// 💾 Storage - JSON document for the client book
//
// Appointments are stored by reference: seller and buyer are phone numbers,
// not embedded clients. Loading is two-pass. All clients are replayed first,
// then each appointment's phones are resolved against the loaded clients.
// Every record goes back through the book, so a file can never hold a state
// the book itself would reject.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::book::ClientBook;
use crate::entities::{
    Address, Appointment, AppointmentDatetime, Client, ClientError, DatetimeError, Email, Name,
    Phone, PropertyType, Role, Tag,
};
use crate::error::BookError;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{0} field is missing!")]
    MissingField(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Datetime(#[from] DatetimeError),

    #[error("Appointment refers to phone {0}, but no client has that phone number.")]
    UnknownClient(String),

    #[error("Persons list contains duplicate person(s).")]
    DuplicateClient,

    #[error("Appointments list contains duplicate appointment(s).")]
    DuplicateAppointment,

    #[error("Invalid client record: {0}")]
    InvalidClient(BookError),

    #[error("Invalid appointment record: {0}")]
    InvalidAppointment(BookError),
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, StorageError> {
    value.as_deref().ok_or(StorageError::MissingField(field))
}

// ============================================================================
// RECORDS
// ============================================================================

/// Client as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ClientRecord {
    pub fn from_client(client: &Client) -> Self {
        ClientRecord {
            name: Some(client.name.to_string()),
            phone: Some(client.phone.to_string()),
            email: Some(client.email.to_string()),
            role: Some(client.role.to_string()),
            address: Some(client.address.value().to_string()),
            property_type: Some(client.address.property_type().to_string()),
            tags: client.tags.iter().map(Tag::to_string).collect(),
        }
    }

    pub fn to_client(&self) -> Result<Client, StorageError> {
        let name = Name::parse(required(&self.name, "Name")?)?;
        let phone = Phone::parse(required(&self.phone, "Phone")?)?;
        let email = Email::parse(required(&self.email, "Email")?)?;
        let role: Role = required(&self.role, "Role")?.parse()?;
        let address = required(&self.address, "Address")?;
        let property_type: PropertyType = required(&self.property_type, "PropertyType")?.parse()?;
        let address = Address::new(address, property_type)?;
        let tags: BTreeSet<Tag> = self
            .tags
            .iter()
            .map(|tag| Tag::parse(tag))
            .collect::<Result<_, _>>()?;

        Ok(Client::new(name, phone, email, role, address, tags))
    }
}

/// Appointment as written to disk, with clients referenced by phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub datetime: Option<String>,
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
}

impl AppointmentRecord {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        AppointmentRecord {
            datetime: Some(appointment.datetime.to_string()),
            seller: Some(appointment.seller.storage_identifier().to_string()),
            buyer: appointment
                .buyer
                .as_ref()
                .map(|buyer| buyer.storage_identifier().to_string()),
        }
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// The whole file: `{ "persons": [...], "appointments": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(default)]
    pub persons: Vec<ClientRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

impl BookDocument {
    pub fn from_book(book: &ClientBook) -> Self {
        BookDocument {
            persons: book.clients().iter().map(ClientRecord::from_client).collect(),
            appointments: book
                .appointments()
                .iter()
                .map(AppointmentRecord::from_appointment)
                .collect(),
        }
    }

    /// Rebuild a book by replaying every record through it
    pub fn into_book(self) -> Result<ClientBook, StorageError> {
        let mut book = ClientBook::new();

        for record in &self.persons {
            let client = record.to_client()?;
            book.add_client(client).map_err(|err| match err {
                BookError::DuplicateClient => StorageError::DuplicateClient,
                other => StorageError::InvalidClient(other),
            })?;
        }

        let by_phone: HashMap<String, Client> = book
            .clients()
            .iter()
            .map(|client| (client.storage_identifier().to_string(), client.clone()))
            .collect();
        let resolve = |phone: &str| {
            by_phone
                .get(phone)
                .cloned()
                .ok_or_else(|| StorageError::UnknownClient(phone.to_string()))
        };

        for record in &self.appointments {
            let datetime = AppointmentDatetime::parse(required(&record.datetime, "AppointmentDatetime")?)?;
            let seller = resolve(required(&record.seller, "Seller")?)?;
            let buyer = record.buyer.as_deref().map(resolve).transpose()?;

            book.add_appointment(datetime, seller, buyer).map_err(|err| match err {
                BookError::DuplicateAppointment => StorageError::DuplicateAppointment,
                other => StorageError::InvalidAppointment(other),
            })?;
        }

        Ok(book)
    }
}

// ============================================================================
// FILE I/O
// ============================================================================

/// Load a book from `path`. Returns `None` when the file does not exist.
pub fn load_book(path: &Path) -> Result<Option<ClientBook>> {
    if !path.exists() {
        info!(path = %path.display(), "data file not found");
        return Ok(None);
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    let document: BookDocument = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse data file {}", path.display()))?;
    let book = document
        .into_book()
        .with_context(|| format!("Illegal values found in {}", path.display()))?;

    info!(
        path = %path.display(),
        clients = book.clients().len(),
        appointments = book.appointments().len(),
        "client book loaded"
    );
    Ok(Some(book))
}

/// Write `book` to `path` as pretty JSON, creating parent directories
pub fn save_book(path: &Path, book: &ClientBook) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&BookDocument::from_book(book))
        .context("Failed to serialize client book")?;
    fs::write(path, json).with_context(|| format!("Failed to write data file {}", path.display()))?;

    info!(
        path = %path.display(),
        clients = book.clients().len(),
        appointments = book.appointments().len(),
        "client book saved"
    );
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
