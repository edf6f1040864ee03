// Entity Models
//
// Each entity is an immutable value kept next to its registry:
// - Client: buyer/seller contact, identified on disk by phone number
// - Appointment: a seller (and optional buyer) at a date-time
//
// Both registries are unique lists: no two structurally equal entries.

pub mod appointment;
pub mod client;
pub mod unique;

pub use appointment::{
    Appointment, AppointmentDatetime, AppointmentEntry, AppointmentRegistry, DatetimeError,
};
pub use client::{
    Address, Client, ClientError, ClientRegistry, Email, Name, Phone, PropertyType, Role, Tag,
};
pub use unique::UniqueList;
