// ⚠️ Error tiers for the client book
//
// RegistryError: a registry precondition was broken by its caller. These are
// programmer errors and are not meant to be retried.
//
// BookError: a business rule rejected a candidate change. The message is shown
// to the user as-is, and both registries are left exactly as they were.

use std::fmt;

use thiserror::Error;

use crate::entities::Role;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Client,
    Appointment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Appointment => "appointment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// REGISTRY ERRORS (invariant violations)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The value (or a staged rewrite) collides with an existing entry.
    #[error("operation would result in duplicate {0}s")]
    DuplicateEntity(EntityKind),

    /// The target value is not held by the registry.
    #[error("the specified {0} does not exist")]
    EntityNotFound(EntityKind),
}

// ============================================================================
// BOOK ERRORS (business-rule rejections)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("This client already exists.")]
    DuplicateClient,

    #[error("Another client already uses the phone number {0}.")]
    PhoneInUse(String),

    #[error("No client has the phone number {0}.")]
    UnknownClient(String),

    #[error("The person assigned as seller must have a seller role.")]
    InvalidSellerRole,

    #[error("The person assigned as buyer must have a buyer role.")]
    InvalidBuyerRole,

    #[error("The same person cannot be both buyer and seller.")]
    SamePerson,

    #[error("That appointment already exists.")]
    DuplicateAppointment,

    #[error("At least one field to edit must be provided.")]
    NothingToEdit,

    #[error("Client {phone} is the {role} in {count} appointment(s), so their role cannot change.")]
    RoleConflict {
        phone: String,
        role: Role,
        count: usize,
    },

    #[error("Client {phone} still has {count} appointment(s). Delete them before deleting the client.")]
    ClientInUse { phone: String, count: usize },
}

impl BookError {
    /// True for rejections caused by a broken registry precondition rather
    /// than by a business rule.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, BookError::Registry(_))
    }
}
