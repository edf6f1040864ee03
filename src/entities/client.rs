// 👤 Client Entity - buyer/seller contact records
//
// "The phone number is the IDENTIFIER (durable), everything else is a VALUE"
//
// A client is an immutable value. Editing a client means swapping the whole
// value in the registry. The phone number survives edits and is what the
// storage file uses to link appointments back to clients.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::unique::UniqueList;
use crate::error::{EntityKind, RegistryError};

// ============================================================================
// FIELD ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Names should only contain alphanumeric characters and spaces, and it should not be blank")]
    InvalidName,

    #[error("Phone numbers should only contain numbers, and it should be at least 3 digits long")]
    InvalidPhone,

    #[error("Emails should be of the format local-part@domain and must not contain spaces")]
    InvalidEmail,

    #[error("Role must be either 'buyer' or 'seller'.")]
    InvalidRole,

    #[error("Addresses can take any values, should not be blank and cannot exceed {max} characters")]
    InvalidAddress { max: usize },

    #[error("Address type should strictly follow one of these types: {}", PropertyType::codes())]
    InvalidPropertyType,

    #[error("Tags names should be alphanumeric")]
    InvalidTag,
}

// ============================================================================
// CONTACT FIELDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn parse(s: &str) -> Result<Self, ClientError> {
        let mut chars = s.chars();
        let first_ok = chars.next().is_some_and(char::is_alphanumeric);
        if !first_ok || !chars.all(|c| c.is_alphanumeric() || c == ' ') {
            return Err(ClientError::InvalidName);
        }
        Ok(Name(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number - the durable identifier of a client
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phone(String);

impl Phone {
    pub const MIN_DIGITS: usize = 3;

    pub fn parse(s: &str) -> Result<Self, ClientError> {
        if s.len() < Self::MIN_DIGITS || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ClientError::InvalidPhone);
        }
        Ok(Phone(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    /// RFC 5321 limit
    pub const MAX_LENGTH: usize = 254;

    pub fn parse(s: &str) -> Result<Self, ClientError> {
        if s.is_empty() || s.len() > Self::MAX_LENGTH || s.chars().any(char::is_whitespace) {
            return Err(ClientError::InvalidEmail);
        }
        match s.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(Email(s.to_string()))
            }
            _ => Err(ClientError::InvalidEmail),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn parse(s: &str) -> Result<Self, ClientError> {
        if s.is_empty() || !s.chars().all(char::is_alphanumeric) {
            return Err(ClientError::InvalidTag);
        }
        Ok(Tag(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Name, Phone, Email, Tag, Role, PropertyType);

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buyer") {
            Ok(Role::Buyer)
        } else if s.eq_ignore_ascii_case("seller") {
            Ok(Role::Seller)
        } else {
            Err(ClientError::InvalidRole)
        }
    }
}

// ============================================================================
// PROPERTY TYPE
// ============================================================================

/// Residential and commercial property codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    /// HDB flats (2-room to 5-room, jumbo)
    Hdb2,
    Hdb3,
    Hdb4,
    Hdb5,
    HdbJ,

    /// Executive condominium / maisonette
    Ec,
    Em,

    /// Private condominiums
    Condo2,
    Condo3,
    Condo4,
    Condo5,
    CondoJ,

    /// Landed, leasehold / freehold
    LandedLh,
    LandedFh,

    /// Commercial, leasehold / freehold
    CommercialLh,
    CommercialFh,
}

impl PropertyType {
    pub const ALL: [PropertyType; 16] = [
        PropertyType::Hdb2,
        PropertyType::Hdb3,
        PropertyType::Hdb4,
        PropertyType::Hdb5,
        PropertyType::HdbJ,
        PropertyType::Ec,
        PropertyType::Em,
        PropertyType::Condo2,
        PropertyType::Condo3,
        PropertyType::Condo4,
        PropertyType::Condo5,
        PropertyType::CondoJ,
        PropertyType::LandedLh,
        PropertyType::LandedFh,
        PropertyType::CommercialLh,
        PropertyType::CommercialFh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Hdb2 => "HDB_2",
            PropertyType::Hdb3 => "HDB_3",
            PropertyType::Hdb4 => "HDB_4",
            PropertyType::Hdb5 => "HDB_5",
            PropertyType::HdbJ => "HDB_J",
            PropertyType::Ec => "EC",
            PropertyType::Em => "EM",
            PropertyType::Condo2 => "CONDO_2",
            PropertyType::Condo3 => "CONDO_3",
            PropertyType::Condo4 => "CONDO_4",
            PropertyType::Condo5 => "CONDO_5",
            PropertyType::CondoJ => "CONDO_J",
            PropertyType::LandedLh => "LANDED_LH",
            PropertyType::LandedFh => "LANDED_FH",
            PropertyType::CommercialLh => "COMMERCIAL_LH",
            PropertyType::CommercialFh => "COMMERCIAL_FH",
        }
    }

    /// All codes, comma separated (for error messages)
    pub fn codes() -> String {
        Self::ALL.iter().map(PropertyType::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for PropertyType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or(ClientError::InvalidPropertyType)
    }
}

// ============================================================================
// ADDRESS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    value: String,
    property_type: PropertyType,
}

impl Address {
    pub const MAX_LENGTH: usize = 200;

    pub fn new(value: &str, property_type: PropertyType) -> Result<Self, ClientError> {
        let starts_blank = value.chars().next().map_or(true, char::is_whitespace);
        if starts_blank || value.chars().count() > Self::MAX_LENGTH {
            return Err(ClientError::InvalidAddress {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Address {
            value: value.to_string(),
            property_type,
        })
    }

    /// Free-text part of the address
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.value, self.property_type)
    }
}

// ============================================================================
// CLIENT ENTITY
// ============================================================================

/// Client - a buyer or seller contact.
///
/// Equality is structural over every field. Two clients that merely share a
/// phone number are "the same client" in the weaker sense of
/// [`Client::has_same_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Client {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub role: Role,
    pub address: Address,
    pub tags: BTreeSet<Tag>,
}

impl Client {
    pub fn new(
        name: Name,
        phone: Phone,
        email: Email,
        role: Role,
        address: Address,
        tags: BTreeSet<Tag>,
    ) -> Self {
        Client {
            name,
            phone,
            email,
            role,
            address,
            tags,
        }
    }

    /// Build a client from raw field text, validating every field first
    pub fn parse<'a, I>(
        name: &str,
        phone: &str,
        email: &str,
        role: &str,
        address: &str,
        property_type: &str,
        tags: I,
    ) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let property_type = property_type.parse()?;
        Ok(Client {
            name: Name::parse(name)?,
            phone: Phone::parse(phone)?,
            email: Email::parse(email)?,
            role: role.parse()?,
            address: Address::new(address, property_type)?,
            tags: tags.into_iter().map(Tag::parse).collect::<Result<_, _>>()?,
        })
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    pub fn is_buyer(&self) -> bool {
        self.role == Role::Buyer
    }

    /// Identifier used by storage to cross-reference this client
    pub fn storage_identifier(&self) -> &str {
        self.phone.as_str()
    }

    /// Weaker notion of equality: both clients hold the same phone number
    pub fn has_same_identifier(&self, other: &Client) -> bool {
        self.phone == other.phone
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags.iter().map(Tag::as_str).collect();
        write!(
            f,
            "{}; Phone: {}; Email: {}; Role: {}; Address: {}; Tags: [{}]",
            self.name,
            self.phone,
            self.email,
            self.role,
            self.address,
            tags.join(", ")
        )
    }
}

// ============================================================================
// CLIENT REGISTRY
// ============================================================================

/// Registry of all clients, unique by structural equality, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistry {
    clients: UniqueList<Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        ClientRegistry {
            clients: UniqueList::new(EntityKind::Client),
        }
    }

    pub fn add(&mut self, client: Client) -> Result<(), RegistryError> {
        self.clients.add(client)
    }

    /// Replace `target` with `replacement`, keeping its position
    pub fn set_client(&mut self, target: &Client, replacement: Client) -> Result<(), RegistryError> {
        self.clients.set(target, replacement)
    }

    pub fn remove(&mut self, client: &Client) -> Result<Client, RegistryError> {
        self.clients.remove(client)
    }

    pub fn contains(&self, client: &Client) -> bool {
        self.clients.contains(client)
    }

    pub fn contains_phone(&self, phone: &str) -> bool {
        self.find_by_phone(phone).is_some()
    }

    /// Find the client holding a phone number
    pub fn find_by_phone(&self, phone: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.phone.as_str() == phone)
    }

    /// Read-only, order-preserving view
    pub fn as_slice(&self) -> &[Client] {
        self.clients.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Client> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{alice, benson, elle, fiona};

    #[test]
    fn test_parse_client() {
        let client = Client::parse(
            "Amy Bee",
            "85355255",
            "amy@gmail.com",
            "Seller",
            "123, Jurong West Ave 6, #08-111",
            "hdb_4",
            ["friends", "owesMoney"],
        )
        .unwrap();

        assert_eq!(client.name.as_str(), "Amy Bee");
        assert_eq!(client.role, Role::Seller);
        assert_eq!(client.address.property_type(), PropertyType::Hdb4);
        assert_eq!(client.tags.len(), 2);
        assert_eq!(client.storage_identifier(), "85355255");
    }

    #[test]
    fn test_parse_client_rejects_bad_fields() {
        let parse = |name, phone, email, role, address, kind| {
            Client::parse(name, phone, email, role, address, kind, [])
        };

        assert_eq!(parse(" ", "123", "a@b", "buyer", "x", "EC"), Err(ClientError::InvalidName));
        assert_eq!(parse("Amy", "12", "a@b", "buyer", "x", "EC"), Err(ClientError::InvalidPhone));
        assert_eq!(parse("Amy", "12a4", "a@b", "buyer", "x", "EC"), Err(ClientError::InvalidPhone));
        assert_eq!(parse("Amy", "123", "ab", "buyer", "x", "EC"), Err(ClientError::InvalidEmail));
        assert_eq!(parse("Amy", "123", "a@b", "tenant", "x", "EC"), Err(ClientError::InvalidRole));
        assert_eq!(
            parse("Amy", "123", "a@b", "buyer", " x", "EC"),
            Err(ClientError::InvalidAddress { max: 200 })
        );
        assert_eq!(
            parse("Amy", "123", "a@b", "buyer", "x", "HDB_9"),
            Err(ClientError::InvalidPropertyType)
        );
        assert_eq!(
            Client::parse("Amy", "123", "a@b", "buyer", "x", "EC", ["has space"]),
            Err(ClientError::InvalidTag)
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
        assert!(Email::parse("").is_err());
        assert!(Email::parse("@domain.com").is_err());
        assert!(Email::parse("user@").is_err());
        assert!(Email::parse("a@b@c").is_err());
        assert!(Email::parse("us er@example.com").is_err());
    }

    #[test]
    fn test_address_length_limit() {
        let long = "a".repeat(Address::MAX_LENGTH);
        assert!(Address::new(&long, PropertyType::Ec).is_ok());

        let too_long = "a".repeat(Address::MAX_LENGTH + 1);
        assert!(Address::new(&too_long, PropertyType::Ec).is_err());
        assert!(Address::new("", PropertyType::Ec).is_err());
    }

    #[test]
    fn test_role_and_property_type_parse_case_insensitively() {
        assert_eq!("BUYER".parse::<Role>(), Ok(Role::Buyer));
        assert_eq!("seller".parse::<Role>(), Ok(Role::Seller));
        assert_eq!(Role::Seller.to_string(), "seller");

        assert_eq!("condo_j".parse::<PropertyType>(), Ok(PropertyType::CondoJ));
        assert_eq!(PropertyType::CommercialFh.to_string(), "COMMERCIAL_FH");
        assert!(PropertyType::codes().starts_with("HDB_2, HDB_3"));
    }

    #[test]
    fn test_client_equality_is_structural() {
        let fiona = fiona();
        let mut renamed = fiona.clone();
        renamed.name = Name::parse("Fiona Edited").unwrap();

        assert_ne!(fiona, renamed);
        assert!(fiona.has_same_identifier(&renamed));
        assert!(!fiona.has_same_identifier(&elle()));
    }

    #[test]
    fn test_tag_order_does_not_affect_equality() {
        let a = Client::parse("Amy", "123", "a@b", "buyer", "x", "EC", ["one", "two"]).unwrap();
        let b = Client::parse("Amy", "123", "a@b", "buyer", "x", "EC", ["two", "one"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_client_display() {
        assert_eq!(
            alice().to_string(),
            "Alice Pauline; Phone: 94351253; Email: alice@example.com; Role: buyer; \
             Address: 123, Jurong West Ave 6, #08-111, HDB_4; Tags: [friends]"
        );
    }

    #[test]
    fn test_registry_add_and_contains() {
        let mut registry = ClientRegistry::new();
        registry.add(alice()).unwrap();
        registry.add(fiona()).unwrap();

        assert!(registry.contains(&alice()));
        assert!(registry.contains_phone("9482427"));
        assert!(!registry.contains(&elle()));
        assert_eq!(registry.find_by_phone("94351253"), Some(&alice()));
        assert_eq!(registry.find_by_phone("000"), None);
    }

    #[test]
    fn test_registry_add_duplicate_fails() {
        let mut registry = ClientRegistry::new();
        registry.add(alice()).unwrap();

        let result = registry.add(alice());

        assert_eq!(result, Err(RegistryError::DuplicateEntity(EntityKind::Client)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_set_client_preserves_order() {
        let mut registry = ClientRegistry::new();
        registry.add(alice()).unwrap();
        registry.add(benson()).unwrap();
        registry.add(elle()).unwrap();

        let mut edited = benson();
        edited.tags.clear();
        registry.set_client(&benson(), edited.clone()).unwrap();

        assert_eq!(registry.as_slice(), [alice(), edited, elle()]);
    }

    #[test]
    fn test_registry_set_client_errors() {
        let mut registry = ClientRegistry::new();
        registry.add(alice()).unwrap();
        registry.add(benson()).unwrap();

        assert_eq!(
            registry.set_client(&elle(), fiona()),
            Err(RegistryError::EntityNotFound(EntityKind::Client))
        );
        assert_eq!(
            registry.set_client(&alice(), benson()),
            Err(RegistryError::DuplicateEntity(EntityKind::Client))
        );
        assert!(registry.set_client(&alice(), alice()).is_ok());
    }

    #[test]
    fn test_registry_remove() {
        let mut registry = ClientRegistry::new();
        registry.add(alice()).unwrap();

        assert_eq!(registry.remove(&alice()), Ok(alice()));
        assert!(registry.is_empty());
        assert_eq!(
            registry.remove(&alice()),
            Err(RegistryError::EntityNotFound(EntityKind::Client))
        );
    }
}
