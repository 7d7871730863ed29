use chrono::{NaiveDate, Utc};

/// Outcome of a field validator. A message may accompany a *valid* result
/// (advisory only), e.g. an airline we track but don't recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct Validity {
    pub valid: bool,
    pub message: Option<String>,
}

impl Validity {
    pub fn ok() -> Self {
        Self { valid: true, message: None }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self { valid: true, message: Some(message.into()) }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { valid: false, message: Some(message.into()) }
    }
}

// Known IATA airport codes (subset - add more as needed)
const VALID_AIRPORTS: &[&str] = &[
    "SFO", "LAX", "JFK", "ORD", "ATL", "DFW", "DEN", "SEA", "LAS", "PHX",
    "IAH", "MIA", "BOS", "MSP", "DTW", "PHL", "LGA", "EWR", "MCO", "CLT",
    "SAN", "PDX", "TPA", "STL", "BWI", "AUS", "BNA", "OAK", "SJC", "SAT",
    // International
    "LHR", "CDG", "FRA", "AMS", "MAD", "BCN", "FCO", "MXP", "DUB", "ZRH",
    "VIE", "CPH", "ARN", "HEL", "IST", "ATH", "LIS", "BRU", "PRG", "BUD",
    "YYZ", "YVR", "YUL", "MEX", "GDL", "CUN", "GRU", "EZE", "SCL", "BOG",
    "LIM", "NRT", "HND", "ICN", "PVG", "PEK", "HKG", "SIN", "BKK", "KUL",
    "DEL", "BOM", "SYD", "MEL", "AKL", "DXB", "DOH", "AUH", "JNB", "CPT",
];

const KNOWN_AIRLINES: &[&str] = &[
    "United", "United Airlines", "Delta", "Delta Air Lines", "American",
    "American Airlines", "Southwest", "Southwest Airlines", "JetBlue",
    "Alaska", "Alaska Airlines", "Spirit", "Frontier", "Hawaiian",
    "Allegiant", "Sun Country", "British Airways", "Air France", "Lufthansa",
    "KLM", "Emirates", "Qatar Airways", "Singapore Airlines",
    "Cathay Pacific", "Qantas", "Air Canada", "Aeromexico", "LATAM",
    "Avianca", "Copa Airlines", "ANA", "JAL", "Korean Air", "China Eastern",
    "Air China", "Turkish Airlines", "Etihad", "Virgin Atlantic", "Norwegian",
];

pub fn validate_airport_code(code: &str) -> Validity {
    let upper = code.trim().to_uppercase();

    if upper.is_empty() {
        return Validity::fail("Airport code is required");
    }

    if upper.len() != 3 {
        return Validity::fail("Airport code must be 3 letters");
    }

    if !upper.chars().all(|c| c.is_ascii_alphabetic()) {
        return Validity::fail("Airport code must contain only letters");
    }

    if !VALID_AIRPORTS.contains(&upper.as_str()) {
        return Validity::fail(format!(
            "Airport code \"{upper}\" not recognized. Please verify it's a valid IATA code."
        ));
    }

    Validity::ok()
}

pub fn validate_airline(airline: &str) -> Validity {
    let trimmed = airline.trim();

    if trimmed.is_empty() {
        return Validity::fail("Airline name is required");
    }

    if trimmed.len() < 2 {
        return Validity::fail("Airline name is too short");
    }

    let is_known = KNOWN_AIRLINES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(trimmed));

    if !is_known {
        // A warning, not a hard failure
        return Validity::ok_with(format!(
            "Airline \"{trimmed}\" will be tracked, but it's not in our common airlines list."
        ));
    }

    Validity::ok()
}

pub fn validate_travel_date(date_str: &str) -> Validity {
    let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") else {
        return Validity::fail("Invalid date format");
    };

    // Date-only comparison, time-of-day ignored
    if date < Utc::now().date_naive() {
        return Validity::fail("Travel date must be in the future");
    }

    Validity::ok()
}

pub fn validate_return_date(departure_str: &str, return_str: Option<&str>) -> Validity {
    let Some(ret_str) = return_str else {
        // One-way is valid
        return Validity::ok();
    };

    let Ok(ret) = NaiveDate::parse_from_str(ret_str.trim(), "%Y-%m-%d") else {
        return Validity::fail("Invalid return date format");
    };

    let Ok(departure) = NaiveDate::parse_from_str(departure_str.trim(), "%Y-%m-%d") else {
        return Validity::fail("Invalid date format");
    };

    if ret <= departure {
        return Validity::fail("Return date must be after departure date");
    }

    Validity::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn days_from_now(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    #[test]
    fn airport_code_accepts_known_codes_any_case() {
        assert!(validate_airport_code("SFO").valid);
        assert!(validate_airport_code("sfo").valid);
        assert!(validate_airport_code(" jfk ").valid);
    }

    #[test]
    fn airport_code_rejects_wrong_length() {
        assert!(!validate_airport_code("").valid);
        assert!(!validate_airport_code("SF").valid);
        assert!(!validate_airport_code("SFOX").valid);
    }

    #[test]
    fn airport_code_rejects_digits() {
        let v = validate_airport_code("SF1");
        assert!(!v.valid);
        assert_eq!(v.message.as_deref(), Some("Airport code must contain only letters"));
    }

    #[test]
    fn airport_code_rejects_unknown_codes() {
        let v = validate_airport_code("ZZZ");
        assert!(!v.valid);
        assert!(v.message.unwrap().contains("ZZZ"));
    }

    #[test]
    fn airline_known_names_pass_silently() {
        let v = validate_airline("United Airlines");
        assert!(v.valid);
        assert!(v.message.is_none());

        // case-insensitive match
        assert!(validate_airline("lufthansa").message.is_none());
    }

    #[test]
    fn airline_unknown_name_is_valid_with_warning() {
        let v = validate_airline("Totally New Air");
        assert!(v.valid);
        assert!(v.message.unwrap().contains("Totally New Air"));
    }

    #[test]
    fn airline_rejects_empty_and_too_short() {
        assert!(!validate_airline("").valid);
        assert!(!validate_airline("  ").valid);
        assert!(!validate_airline("X").valid);
    }

    #[test]
    fn travel_date_accepts_today_and_future() {
        assert!(validate_travel_date(&days_from_now(0)).valid);
        assert!(validate_travel_date(&days_from_now(30)).valid);
    }

    #[test]
    fn travel_date_rejects_past_and_garbage() {
        assert!(!validate_travel_date(&days_from_now(-1)).valid);
        assert!(!validate_travel_date("not-a-date").valid);
        assert!(!validate_travel_date("2026-13-40").valid);
    }

    #[test]
    fn return_date_none_is_always_valid() {
        assert!(validate_return_date("2026-09-01", None).valid);
        // even with a nonsense departure
        assert!(validate_return_date("garbage", None).valid);
    }

    #[test]
    fn return_date_must_be_strictly_after_departure() {
        assert!(!validate_return_date("2026-09-01", Some("2026-09-01")).valid);
        assert!(!validate_return_date("2026-09-01", Some("2026-08-31")).valid);
        assert!(validate_return_date("2026-09-01", Some("2026-09-02")).valid);
    }

    #[test]
    fn return_date_rejects_bad_format() {
        let v = validate_return_date("2026-09-01", Some("next tuesday"));
        assert!(!v.valid);
        assert_eq!(v.message.as_deref(), Some("Invalid return date format"));
    }
}
