// 📅 Appointment Entity - a meeting between a seller and (optionally) a buyer
//
// Appointments hold full client values, not references. When a client is
// edited, the registry's cascade rewrites every appointment that held the old
// value so no stale copy survives.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

use super::client::Client;
use super::unique::UniqueList;
use crate::error::{EntityKind, RegistryError};

// ============================================================================
// APPOINTMENT DATETIME
// ============================================================================

/// `YYYY-MM-DDTHH:MM`, without seconds
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatetimeError {
    #[error("Appointment Datetime must take a valid ISO 8601 datetime (e.g. 2025-01-01T00:00)")]
    Invalid,
}

/// Local date and time of an appointment, at minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppointmentDatetime(NaiveDateTime);

impl AppointmentDatetime {
    /// Parse the exact `YYYY-MM-DDTHH:MM` form.
    ///
    /// Seconds, offsets and other ISO variants are rejected, as are dates
    /// that do not exist on the calendar.
    pub fn parse(s: &str) -> Result<Self, DatetimeError> {
        if !has_datetime_shape(s) {
            return Err(DatetimeError::Invalid);
        }
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
            .map(AppointmentDatetime)
            .map_err(|_| DatetimeError::Invalid)
    }

    /// Wrap a date-time, dropping anything below the minute
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        let truncated = datetime
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(datetime);
        AppointmentDatetime(truncated)
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

fn has_datetime_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 16
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for AppointmentDatetime {
    type Err = DatetimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppointmentDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATETIME_FORMAT))
    }
}

// ============================================================================
// APPOINTMENT ENTITY
// ============================================================================

/// Appointment - equality covers datetime, seller and buyer.
///
/// Listings order appointments by datetime; see
/// [`AppointmentRegistry::sorted_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Appointment {
    pub datetime: AppointmentDatetime,
    pub seller: Client,
    pub buyer: Option<Client>,
}

impl Appointment {
    pub fn new(datetime: AppointmentDatetime, seller: Client, buyer: Option<Client>) -> Self {
        Appointment {
            datetime,
            seller,
            buyer,
        }
    }

    /// True if `client` is the seller or the buyer
    pub fn involves(&self, client: &Client) -> bool {
        self.seller == *client || self.buyer.as_ref() == Some(client)
    }

    /// Copy of this appointment with `old` swapped for `new` wherever it
    /// appears. `None` when `old` is not a participant.
    pub fn with_client_replaced(&self, old: &Client, new: &Client) -> Option<Appointment> {
        if !self.involves(old) {
            return None;
        }
        let swap = |client: &Client| if client == old { new.clone() } else { client.clone() };
        Some(Appointment {
            datetime: self.datetime,
            seller: swap(&self.seller),
            buyer: self.buyer.as_ref().map(swap),
        })
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; Seller: {}", self.datetime, self.seller.name)?;
        if let Some(buyer) = &self.buyer {
            write!(f, "; Buyer: {}", buyer.name)?;
        }
        Ok(())
    }
}

/// An appointment paired with the client it is listed under (the seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentEntry<'a> {
    pub appointment: &'a Appointment,
    pub client: &'a Client,
}

impl<'a> AppointmentEntry<'a> {
    pub fn of(appointment: &'a Appointment) -> Self {
        AppointmentEntry {
            appointment,
            client: &appointment.seller,
        }
    }
}

// ============================================================================
// APPOINTMENT REGISTRY
// ============================================================================

/// Registry of all appointments, unique by structural equality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRegistry {
    appointments: UniqueList<Appointment>,
}

impl AppointmentRegistry {
    pub fn new() -> Self {
        AppointmentRegistry {
            appointments: UniqueList::new(EntityKind::Appointment),
        }
    }

    pub fn add(&mut self, appointment: Appointment) -> Result<(), RegistryError> {
        self.appointments.add(appointment)
    }

    pub fn set_appointment(
        &mut self,
        target: &Appointment,
        replacement: Appointment,
    ) -> Result<(), RegistryError> {
        self.appointments.set(target, replacement)
    }

    pub fn remove(&mut self, appointment: &Appointment) -> Result<Appointment, RegistryError> {
        self.appointments.remove(appointment)
    }

    pub fn contains(&self, appointment: &Appointment) -> bool {
        self.appointments.contains(appointment)
    }

    /// Number of appointments in which `client` is the seller or buyer
    pub fn referencing(&self, client: &Client) -> usize {
        self.appointments.iter().filter(|a| a.involves(client)).count()
    }

    /// Rewrite every appointment that holds `old` so it holds `new` instead.
    ///
    /// Datetime and the other participant are preserved; appointments that do
    /// not involve `old` are left in place untouched. The whole rewrite is
    /// staged first and rejected with `DuplicateEntity` (registry unchanged)
    /// if it would make two appointments equal. Returns the number rewritten.
    pub fn cascade_client_edit(&mut self, old: &Client, new: &Client) -> Result<usize, RegistryError> {
        if old == new {
            return Ok(0);
        }
        let changes: Vec<(usize, Appointment)> = self
            .appointments
            .iter()
            .enumerate()
            .filter_map(|(slot, a)| a.with_client_replaced(old, new).map(|edited| (slot, edited)))
            .collect();

        if changes.is_empty() {
            return Ok(0);
        }
        self.appointments.replace_slots(changes)
    }

    /// Appointments ordered by datetime (ties keep insertion order), each
    /// paired with its seller. The iterator can be cloned to restart it.
    pub fn sorted_entries(&self) -> impl Iterator<Item = AppointmentEntry<'_>> + Clone {
        let mut sorted: Vec<&Appointment> = self.appointments.iter().collect();
        sorted.sort_by_key(|a| a.datetime);
        sorted.into_iter().map(AppointmentEntry::of)
    }

    /// Read-only view in insertion order
    pub fn as_slice(&self) -> &[Appointment] {
        self.appointments.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Appointment> {
        self.appointments.iter()
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

impl Default for AppointmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
