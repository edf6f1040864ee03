// 🔍 Predicate Engine - keyword, role, location and timeframe filters
//
// Keywords are OR-ed together: any keyword matching any searchable field is
// enough. Structured filters (role, location, timeframe) are AND-ed on top.
// All matching is case-insensitive. Keywords match whole words only, so
// "Ali" does not match "Alice".

use std::fmt;

use chrono::NaiveDate;

use crate::entities::{Appointment, Client, Role};
use crate::temporal::TimeFrame;

// ============================================================================
// WORD MATCHING
// ============================================================================

/// True if `word` equals one of the whitespace-separated tokens of `sentence`,
/// ignoring case. A blank or multi-word `word` never matches.
pub fn contains_word_ignore_case(sentence: &str, word: &str) -> bool {
    let word = word.trim();
    if word.is_empty() || word.contains(char::is_whitespace) {
        return false;
    }
    let word = word.to_lowercase();
    sentence
        .split_whitespace()
        .any(|token| token.to_lowercase() == word)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keywords.into_iter().map(Into::into).collect()
}

// ============================================================================
// CLIENT FILTER
// ============================================================================

/// Filter over clients.
///
/// An empty keyword list matches every client that passes the role and
/// location filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub keywords: Vec<String>,
    pub role: Option<Role>,
    /// Case-insensitive substring of the address text
    pub location: Option<String>,
}

impl ClientFilter {
    /// Match-all filter
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClientFilter {
            keywords: normalize_keywords(keywords),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn matches(&self, client: &Client) -> bool {
        if self.role.is_some_and(|role| role != client.role) {
            return false;
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(client.address.value(), location) {
                return false;
            }
        }
        self.keywords.is_empty()
            || self
                .keywords
                .iter()
                .any(|keyword| client_has_keyword(client, keyword))
    }
}

/// Searchable fields: name, role, phone, email, address, property type, tags
fn client_has_keyword(client: &Client, keyword: &str) -> bool {
    [
        client.name.as_str(),
        client.role.as_str(),
        client.phone.as_str(),
        client.email.as_str(),
        client.address.value(),
        client.address.property_type().as_str(),
    ]
    .into_iter()
    .chain(client.tags.iter().map(|tag| tag.as_str()))
    .any(|field| contains_word_ignore_case(field, keyword))
}

impl fmt::Display for ClientFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keywords={:?}", self.keywords)?;
        if let Some(role) = self.role {
            write!(f, ", role={role}")?;
        }
        if let Some(location) = &self.location {
            write!(f, ", location={location}")?;
        }
        Ok(())
    }
}

// ============================================================================
// APPOINTMENT FILTER
// ============================================================================

/// Filter over appointments.
///
/// Unlike [`ClientFilter`], a filter with no keywords and no timeframe has
/// nothing to test and rejects every appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub keywords: Vec<String>,
    pub time_frame: Option<TimeFrame>,
}

impl AppointmentFilter {
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppointmentFilter {
            keywords: normalize_keywords(keywords),
            time_frame: None,
        }
    }

    pub fn time_frame(time_frame: TimeFrame) -> Self {
        AppointmentFilter {
            keywords: Vec::new(),
            time_frame: Some(time_frame),
        }
    }

    pub fn with_time_frame(mut self, time_frame: TimeFrame) -> Self {
        self.time_frame = Some(time_frame);
        self
    }

    /// Evaluate against `appointment`, with `today` as the current date
    pub fn matches(&self, appointment: &Appointment, today: NaiveDate) -> bool {
        if self.keywords.is_empty() && self.time_frame.is_none() {
            return false;
        }

        let keywords_ok = self.keywords.is_empty()
            || self
                .keywords
                .iter()
                .any(|keyword| appointment_has_keyword(appointment, keyword));
        let time_frame_ok = self
            .time_frame
            .map_or(true, |tf| tf.matches(appointment.datetime.naive(), today));

        keywords_ok && time_frame_ok
    }
}

/// Searchable fields: seller/buyer name, seller/buyer phone, seller address,
/// and the exact datetime text
fn appointment_has_keyword(appointment: &Appointment, keyword: &str) -> bool {
    let seller = &appointment.seller;
    let buyer_fields = appointment
        .buyer
        .iter()
        .flat_map(|buyer| [buyer.name.as_str(), buyer.phone.as_str()]);

    let in_fields = [
        seller.name.as_str(),
        seller.phone.as_str(),
        seller.address.value(),
    ]
    .into_iter()
    .chain(buyer_fields)
    .any(|field| contains_word_ignore_case(field, keyword));

    in_fields || appointment.datetime.to_string().eq_ignore_ascii_case(keyword.trim())
}

impl fmt::Display for AppointmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keywords={:?}", self.keywords)?;
        if let Some(tf) = self.time_frame {
            write!(f, ", timeFrame={tf}")?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{alice, at, benson, carl, days_from_today, elle, fiona, george, today};

    #[test]
    fn test_contains_word_ignore_case() {
        assert!(contains_word_ignore_case("Alice Pauline", "alice"));
        assert!(contains_word_ignore_case("Alice Pauline", "PAULINE"));
        assert!(!contains_word_ignore_case("Alice Pauline", "Ali"));
        assert!(!contains_word_ignore_case("Alice Pauline", "Alice Pauline"));
        assert!(!contains_word_ignore_case("Alice Pauline", ""));
        assert!(!contains_word_ignore_case("Alice Pauline", "   "));
        assert!(contains_word_ignore_case("  spaced   words ", " words "));
    }

    #[test]
    fn test_client_filter_empty_matches_all() {
        let filter = ClientFilter::all();
        assert!(filter.matches(&alice()));
        assert!(filter.matches(&fiona()));
    }

    #[test]
    fn test_client_filter_keyword_fields() {
        // name
        assert!(ClientFilter::keywords(["alice"]).matches(&alice()));
        // role
        assert!(ClientFilter::keywords(["SELLER"]).matches(&fiona()));
        assert!(!ClientFilter::keywords(["seller"]).matches(&alice()));
        // phone
        assert!(ClientFilter::keywords(["94351253"]).matches(&alice()));
        // email
        assert!(ClientFilter::keywords(["alice@example.com"]).matches(&alice()));
        // address word
        assert!(ClientFilter::keywords(["jurong"]).matches(&alice()));
        // property type
        assert!(ClientFilter::keywords(["hdb_4"]).matches(&alice()));
        // tag
        assert!(ClientFilter::keywords(["owesmoney"]).matches(&benson()));
    }

    #[test]
    fn test_client_filter_keywords_are_or_and_whole_word() {
        assert!(ClientFilter::keywords(["Nobody", "Benson"]).matches(&benson()));
        assert!(!ClientFilter::keywords(["Ali"]).matches(&alice()));
        assert!(!ClientFilter::keywords(["Nobody", "Else"]).matches(&benson()));
    }

    #[test]
    fn test_client_filter_role_and_location_are_and() {
        let buyers = ClientFilter::all().with_role(Role::Buyer);
        assert!(buyers.matches(&alice()));
        assert!(!buyers.matches(&fiona()));

        // Location is a substring match
        let jurong = ClientFilter::all().with_location("JURONG WE");
        assert!(jurong.matches(&alice()));
        assert!(!jurong.matches(&benson()));

        // Keyword matches but role does not
        let filter = ClientFilter::keywords(["fiona"]).with_role(Role::Buyer);
        assert!(!filter.matches(&fiona()));

        // Keyword matches but location does not
        let filter = ClientFilter::keywords(["alice"]).with_location("clementi");
        assert!(!filter.matches(&alice()));
    }

    #[test]
    fn test_appointment_filter_without_criteria_rejects() {
        let a = Appointment::new(at("2025-01-01T12:00"), fiona(), Some(elle()));
        assert!(!AppointmentFilter::default().matches(&a, today()));
        assert!(!AppointmentFilter::keywords(Vec::<String>::new()).matches(&a, today()));
    }

    #[test]
    fn test_appointment_filter_keyword_fields() {
        let a = Appointment::new(at("2025-01-01T12:00"), fiona(), Some(elle()));
        let matches = |kw: &str| AppointmentFilter::keywords([kw]).matches(&a, today());

        assert!(matches("Fiona")); // seller name
        assert!(matches("elle")); // buyer name
        assert!(matches("9482427")); // seller phone
        assert!(matches("9482224")); // buyer phone
        assert!(matches("tokyo")); // seller address
        assert!(matches("2025-01-01T12:00")); // exact datetime
        assert!(!matches("2025-01-01"));
        assert!(!matches("michegan")); // buyer address is not searched
        assert!(!matches("NonExistent"));
    }

    #[test]
    fn test_appointment_filter_without_buyer() {
        let a = Appointment::new(at("2025-01-01T12:00"), george(), None);
        assert!(AppointmentFilter::keywords(["george"]).matches(&a, today()));
        assert!(!AppointmentFilter::keywords(["elle"]).matches(&a, today()));
    }

    #[test]
    fn test_appointment_filter_time_frame_only() {
        let start_of_today = Appointment::new(days_from_today(0, 0, 0), carl(), Some(elle()));
        let yesterday_late = Appointment::new(days_from_today(-1, 23, 59), carl(), Some(alice()));
        let upcoming = AppointmentFilter::time_frame(TimeFrame::Upcoming);

        assert!(upcoming.matches(&start_of_today, today()));
        assert!(!upcoming.matches(&yesterday_late, today()));
        assert!(AppointmentFilter::time_frame(TimeFrame::Past).matches(&yesterday_late, today()));
    }

    #[test]
    fn test_appointment_filter_keywords_and_time_frame() {
        let future = Appointment::new(days_from_today(47, 11, 0), george(), Some(alice()));
        let past = Appointment::new(days_from_today(-14, 10, 0), carl(), Some(alice()));

        let alice_upcoming = AppointmentFilter::keywords(["Alice"]).with_time_frame(TimeFrame::Upcoming);
        assert!(alice_upcoming.matches(&future, today()));
        assert!(!alice_upcoming.matches(&past, today()));

        let nobody_upcoming =
            AppointmentFilter::keywords(["NonExistent"]).with_time_frame(TimeFrame::Upcoming);
        assert!(!nobody_upcoming.matches(&future, today()));
    }

    #[test]
    fn test_filter_display() {
        let filter = AppointmentFilter::keywords(["keyword1", "keyword2"]).with_time_frame(TimeFrame::Today);
        assert_eq!(filter.to_string(), r#"keywords=["keyword1", "keyword2"], timeFrame=today"#);

        let filter = ClientFilter::keywords(["amy"]).with_role(Role::Seller);
        assert_eq!(filter.to_string(), r#"keywords=["amy"], role=seller"#);
    }
}
