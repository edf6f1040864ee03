// 📒 Client Book - the coordinator around both registries
//
// Every mutation goes through here. Business rules are checked against the
// current state before either registry is touched, so a rejected change leaves
// both registries exactly as they were. Client edits cascade into every
// appointment that held the old value.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::entities::{
    Appointment, AppointmentDatetime, AppointmentEntry, AppointmentRegistry, Client,
    ClientRegistry,
};
use crate::error::{BookError, EntityKind, RegistryError};
use crate::predicate::{AppointmentFilter, ClientFilter};
use crate::temporal::{Clock, SystemClock};

// ============================================================================
// APPOINTMENT EDIT
// ============================================================================

/// Fields to change on an existing appointment. Absent fields keep the
/// target's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentEdit {
    pub datetime: Option<AppointmentDatetime>,
    pub seller: Option<Client>,
    pub buyer: Option<Client>,
}

impl AppointmentEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datetime(mut self, datetime: AppointmentDatetime) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn with_seller(mut self, seller: Client) -> Self {
        self.seller = Some(seller);
        self
    }

    pub fn with_buyer(mut self, buyer: Client) -> Self {
        self.buyer = Some(buyer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.datetime.is_none() && self.seller.is_none() && self.buyer.is_none()
    }

    /// The appointment that results from applying this edit to `target`
    pub fn apply_to(&self, target: &Appointment) -> Appointment {
        Appointment::new(
            self.datetime.unwrap_or(target.datetime),
            self.seller.clone().unwrap_or_else(|| target.seller.clone()),
            self.buyer.clone().or_else(|| target.buyer.clone()),
        )
    }
}

// ============================================================================
// CLIENT BOOK
// ============================================================================

/// Clients and their appointments, kept consistent with each other
#[derive(Debug, Clone)]
pub struct ClientBook {
    clients: ClientRegistry,
    appointments: AppointmentRegistry,
    clock: Arc<dyn Clock>,
}

impl ClientBook {
    /// Empty book on the system clock
    pub fn new() -> Self {
        ClientBook {
            clients: ClientRegistry::new(),
            appointments: AppointmentRegistry::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` to decide what "today" is when filtering by timeframe
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn appointments(&self) -> &AppointmentRegistry {
        &self.appointments
    }

    /// All appointments in datetime order, each paired with its seller
    pub fn appointment_entries(&self) -> impl Iterator<Item = AppointmentEntry<'_>> + Clone {
        self.appointments.sorted_entries()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn has_client(&self, client: &Client) -> bool {
        self.clients.contains(client)
    }

    pub fn has_appointment(&self, appointment: &Appointment) -> bool {
        self.appointments.contains(appointment)
    }

    pub fn find_client_by_phone(&self, phone: &str) -> Result<&Client, BookError> {
        self.clients
            .find_by_phone(phone.trim())
            .ok_or_else(|| BookError::UnknownClient(phone.trim().to_string()))
    }

    // ------------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------------

    pub fn add_client(&mut self, client: Client) -> Result<(), BookError> {
        if self.clients.contains(&client) {
            return rejected("add_client", BookError::DuplicateClient);
        }
        if self.clients.contains_phone(client.phone.as_str()) {
            return rejected("add_client", BookError::PhoneInUse(client.phone.to_string()));
        }

        let phone = client.phone.clone();
        self.clients.add(client)?;
        debug!(%phone, "client added");
        Ok(())
    }

    /// Replace `target` with `edited` and rewrite every appointment that held
    /// `target`.
    ///
    /// A role change is refused while `target` still appears in appointments,
    /// since those appointments were validated against the old role.
    pub fn edit_client(&mut self, target: &Client, edited: Client) -> Result<(), BookError> {
        if !self.clients.contains(target) {
            return rejected("edit_client", not_found(EntityKind::Client));
        }
        if *target == edited {
            return Ok(());
        }
        if self.clients.contains(&edited) {
            return rejected("edit_client", BookError::DuplicateClient);
        }
        let phone_taken = self
            .clients
            .find_by_phone(edited.phone.as_str())
            .is_some_and(|holder| holder != target);
        if phone_taken {
            return rejected("edit_client", BookError::PhoneInUse(edited.phone.to_string()));
        }
        if edited.role != target.role {
            let count = self.appointments.referencing(target);
            if count > 0 {
                return rejected(
                    "edit_client",
                    BookError::RoleConflict {
                        phone: target.phone.to_string(),
                        role: target.role,
                        count,
                    },
                );
            }
        }

        self.clients.set_client(target, edited.clone())?;
        match self.appointments.cascade_client_edit(target, &edited) {
            Ok(changed) => {
                debug!(phone = %edited.phone, appointments = changed, "client edited");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback) = self.clients.set_client(&edited, target.clone()) {
                    error!(error = %rollback, "client edit could not be rolled back");
                }
                rejected("edit_client", err.into())
            }
        }
    }

    /// Remove a client. Refused while any appointment still references it.
    pub fn delete_client(&mut self, client: &Client) -> Result<Client, BookError> {
        if !self.clients.contains(client) {
            return rejected("delete_client", not_found(EntityKind::Client));
        }
        let count = self.appointments.referencing(client);
        if count > 0 {
            return rejected(
                "delete_client",
                BookError::ClientInUse {
                    phone: client.phone.to_string(),
                    count,
                },
            );
        }

        let removed = self.clients.remove(client)?;
        debug!(phone = %removed.phone, "client deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------------

    pub fn add_appointment(
        &mut self,
        datetime: AppointmentDatetime,
        seller: Client,
        buyer: Option<Client>,
    ) -> Result<Appointment, BookError> {
        let candidate = Appointment::new(datetime, seller, buyer);
        if let Err(err) = self.validate_appointment(&candidate) {
            return rejected("add_appointment", err);
        }
        if self.appointments.contains(&candidate) {
            return rejected("add_appointment", BookError::DuplicateAppointment);
        }

        self.appointments.add(candidate.clone())?;
        debug!(appointment = %candidate, "appointment added");
        Ok(candidate)
    }

    /// Apply `edit` to `target`, re-validating the result as if it were new.
    /// Returns the appointment now stored in place of `target`.
    pub fn edit_appointment(
        &mut self,
        target: &Appointment,
        edit: AppointmentEdit,
    ) -> Result<Appointment, BookError> {
        if edit.is_empty() {
            return rejected("edit_appointment", BookError::NothingToEdit);
        }
        if !self.appointments.contains(target) {
            return rejected("edit_appointment", not_found(EntityKind::Appointment));
        }

        let candidate = edit.apply_to(target);
        if let Err(err) = self.validate_appointment(&candidate) {
            return rejected("edit_appointment", err);
        }
        if candidate != *target && self.appointments.contains(&candidate) {
            return rejected("edit_appointment", BookError::DuplicateAppointment);
        }

        self.appointments.set_appointment(target, candidate.clone())?;
        debug!(appointment = %candidate, "appointment edited");
        Ok(candidate)
    }

    pub fn delete_appointment(&mut self, appointment: &Appointment) -> Result<Appointment, BookError> {
        match self.appointments.remove(appointment) {
            Ok(removed) => {
                debug!(appointment = %removed, "appointment deleted");
                Ok(removed)
            }
            Err(err) => rejected("delete_appointment", err.into()),
        }
    }

    /// Role, same-person and membership checks shared by add and edit
    fn validate_appointment(&self, appointment: &Appointment) -> Result<(), BookError> {
        let seller = &appointment.seller;
        if !seller.is_seller() {
            return Err(BookError::InvalidSellerRole);
        }
        if let Some(buyer) = &appointment.buyer {
            if !buyer.is_buyer() {
                return Err(BookError::InvalidBuyerRole);
            }
            if buyer == seller || buyer.has_same_identifier(seller) {
                return Err(BookError::SamePerson);
            }
        }

        let participants = std::iter::once(seller).chain(appointment.buyer.as_ref());
        for participant in participants {
            if !self.clients.contains(participant) {
                return Err(BookError::UnknownClient(participant.phone.to_string()));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Filtered views
    // ------------------------------------------------------------------------

    /// Matching clients, in registry order
    pub fn filter_clients(&self, filter: &ClientFilter) -> Vec<&Client> {
        self.clients.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Matching appointments, in datetime order, judged against today's date
    pub fn filter_appointments(&self, filter: &AppointmentFilter) -> Vec<AppointmentEntry<'_>> {
        let today = self.today();
        self.appointments
            .sorted_entries()
            .filter(|entry| filter.matches(entry.appointment, today))
            .collect()
    }
}

impl Default for ClientBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Books are equal when they hold the same clients and appointments
impl PartialEq for ClientBook {
    fn eq(&self, other: &Self) -> bool {
        self.clients == other.clients && self.appointments == other.appointments
    }
}

impl Eq for ClientBook {}

fn not_found(kind: EntityKind) -> BookError {
    BookError::Registry(RegistryError::EntityNotFound(kind))
}

fn rejected<T>(operation: &'static str, err: BookError) -> Result<T, BookError> {
    warn!(operation, error = %err, "change rejected");
    Err(err)
}

// ============================================================================
// TESTS
// ============================================================================
