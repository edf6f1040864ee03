// Shared test clients and helpers

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::entities::{AppointmentDatetime, Client};

fn client(
    name: &str,
    phone: &str,
    email: &str,
    role: &str,
    address: &str,
    property_type: &str,
    tags: &[&str],
) -> Client {
    Client::parse(name, phone, email, role, address, property_type, tags.iter().copied()).unwrap()
}

pub fn alice() -> Client {
    client(
        "Alice Pauline",
        "94351253",
        "alice@example.com",
        "buyer",
        "123, Jurong West Ave 6, #08-111",
        "HDB_4",
        &["friends"],
    )
}

pub fn benson() -> Client {
    client(
        "Benson Meier",
        "98765432",
        "johnd@example.com",
        "buyer",
        "311, Clementi Ave 2, #02-25",
        "CONDO_3",
        &["owesMoney", "friends"],
    )
}

pub fn carl() -> Client {
    client("Carl Kurz", "95352563", "heinz@example.com", "seller", "wall street", "LANDED_FH", &[])
}

pub fn daniel() -> Client {
    client(
        "Daniel Meier",
        "87652533",
        "cornelia@example.com",
        "buyer",
        "10th street",
        "HDB_5",
        &["friends"],
    )
}

pub fn elle() -> Client {
    client("Elle Meyer", "9482224", "werner@example.com", "buyer", "michegan ave", "EC", &[])
}

pub fn fiona() -> Client {
    client("Fiona Kunz", "9482427", "lydia@example.com", "seller", "little tokyo", "CONDO_J", &[])
}

pub fn george() -> Client {
    client("George Best", "9482442", "anna@example.com", "seller", "4th street", "COMMERCIAL_FH", &[])
}

pub fn at(s: &str) -> AppointmentDatetime {
    AppointmentDatetime::parse(s).unwrap()
}

/// Fixed "now" used by timeframe tests: 2025-06-15 10:30
pub fn now() -> NaiveDateTime {
    today().and_hms_opt(10, 30, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

/// Appointment time `days` away from [`today`], at `hh:mm`
pub fn days_from_today(days: i64, hour: u32, minute: u32) -> AppointmentDatetime {
    let date = today() + Duration::days(days);
    AppointmentDatetime::from_naive(date.and_hms_opt(hour, minute, 0).unwrap())
}
