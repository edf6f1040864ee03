// Client Square - Core Library
// Clients, their appointments, and the rules that keep the two consistent

pub mod book;           // Coordinator over both registries
pub mod config;         // Environment configuration
pub mod entities;       // Client + Appointment entities and registries
pub mod error;          // Registry and business-rule error tiers
pub mod predicate;      // Keyword / role / location / timeframe filters
pub mod storage;        // JSON document load + save
pub mod temporal;       // Clock + TimeFrame

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use book::{AppointmentEdit, ClientBook};
pub use config::{Config, ConfigError};
pub use entities::{
    Address, Appointment, AppointmentDatetime, AppointmentEntry, AppointmentRegistry,
    Client, ClientError, ClientRegistry, DatetimeError, Email, Name, Phone, PropertyType,
    Role, Tag,
};
pub use error::{BookError, EntityKind, RegistryError};
pub use predicate::{AppointmentFilter, ClientFilter};
pub use storage::{load_book, save_book, BookDocument, StorageError};
pub use temporal::{Clock, FixedClock, SystemClock, TimeFrame, TimeFrameError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
