use std::sync::{Arc, Mutex};

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Amadeus flight-offers client with a process-wide cached bearer token.
///
/// `search_offers` never treats an empty search result as an error: a normal
/// "nothing priced for this route/date" comes back as `Ok(None)`. Transport
/// and parse failures are `Err` and the poll job catches them per flight.
#[derive(Clone)]
pub struct AmadeusClient {
    http: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
    // Shared across clones. Refreshes may race; both winners store an
    // equally valid token, so no lock is held across the network call.
    token: Arc<Mutex<Option<CachedToken>>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    // unix seconds; already includes the safety margin
    valid_until: i64,
}

#[derive(Debug, Clone)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    // ISO dates
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: i32,
    pub cabin_class: String,
}

/// A single priced itinerary quote, already mapped for persistence.
#[derive(Debug, Clone, Serialize)]
pub struct PricedOffer {
    pub price: f64,
    pub currency: String,
    pub offer_id: String,
    pub base_fare: Option<f64>,
    pub taxes: Option<f64>,
    pub fees: Option<f64>,
    pub booking_link: String,
}

// Refresh this long before the declared expiry.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

impl AmadeusClient {
    pub fn new(api_key: String, api_secret: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            api_secret,
            base_url,
            token: Arc::new(Mutex::new(None)),
        }
    }

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    async fn bearer_token(&self) -> Result<String, String> {
        let now = Utc::now().timestamp();

        {
            let cached = self.token.lock().map_err(|e| e.to_string())?;
            if let Some(t) = cached.as_ref() {
                if now < t.valid_until {
                    return Ok(t.value.clone());
                }
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let res = self
            .http
            .post(url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(format!("Amadeus token request failed: {status}"));
        }

        let data = res
            .json::<TokenResponse>()
            .await
            .map_err(|e| e.to_string())?;

        let token = CachedToken {
            value: data.access_token,
            valid_until: Utc::now().timestamp() + data.expires_in - TOKEN_EXPIRY_MARGIN_SECS,
        };

        let value = token.value.clone();
        let mut cached = self.token.lock().map_err(|e| e.to_string())?;
        *cached = Some(token);

        Ok(value)
    }

    /// Fetch at most one offer for the query, in USD, non-stop.
    pub async fn search_offers(&self, query: &FlightQuery) -> Result<Option<PricedOffer>, String> {
        if !self.has_credentials() {
            return Err("AMADEUS_API_KEY / AMADEUS_API_SECRET are missing in .env".to_string());
        }

        let token = self.bearer_token().await?;

        let mut params: Vec<(&str, String)> = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.clone()),
            ("adults", query.adults.to_string()),
            ("travelClass", map_cabin_class(&query.cabin_class).to_string()),
            ("currencyCode", "USD".to_string()),
            ("nonStop", "true".to_string()),
            ("max", "1".to_string()),
        ];

        if let Some(ret) = &query.return_date {
            params.push(("returnDate", ret.clone()));
        }

        let url = format!("{}/v2/shopping/flight-offers", self.base_url);
        let res = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!("Amadeus flight-offers error: {status} {body}");
            return Ok(None);
        }

        let data = res
            .json::<OffersResponse>()
            .await
            .map_err(|e| e.to_string())?;

        let Some(offer) = data.data.into_iter().next() else {
            return Ok(None);
        };

        map_offer(&offer, query).map(Some)
    }
}

/// Cabin classes are a fixed enumeration upstream; anything unrecognized
/// falls back to economy.
fn map_cabin_class(cabin: &str) -> &'static str {
    match cabin {
        "economy" => "ECONOMY",
        "premium_economy" => "PREMIUM_ECONOMY",
        "business" => "BUSINESS",
        "first" => "FIRST",
        _ => "ECONOMY",
    }
}

fn parse_amount(raw: &str, field: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("Amadeus offer has unparsable {field}: {raw:?}"))
}

/// Map the raw offer into a `PricedOffer`.
///
/// Total prefers `grandTotal` and falls back to `total`. Fees are summed from
/// the itemized list; taxes are whatever remains of (total - base) after fees.
/// Both breakdown lines are reported only when strictly positive, so the
/// stored record never carries a spurious zero or negative line.
fn map_offer(offer: &FlightOffer, query: &FlightQuery) -> Result<PricedOffer, String> {
    let total_raw = offer
        .price
        .grand_total
        .as_deref()
        .unwrap_or(&offer.price.total);

    let total = parse_amount(total_raw, "total")?;
    let base = parse_amount(&offer.price.base, "base")?;

    let fees: f64 = offer
        .price
        .fees
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|fee| fee.amount.parse::<f64>().unwrap_or(0.0))
        .sum();

    let taxes = (total - base) - fees;

    Ok(PricedOffer {
        price: total,
        currency: offer.price.currency.clone(),
        offer_id: offer.id.clone(),
        base_fare: Some(base),
        taxes: (taxes > 0.0).then_some(taxes),
        fees: (fees > 0.0).then_some(fees),
        booking_link: booking_link(query),
    })
}

/// The test environment returns no deep links, so the link is synthesized
/// as a flight-search URL the user can open directly.
fn booking_link(query: &FlightQuery) -> String {
    let mut link = format!(
        "https://www.google.com/travel/flights?q=flights+from+{}+to+{}+on+{}",
        query.origin, query.destination, query.departure_date
    );

    if let Some(ret) = &query.return_date {
        link.push_str("+through+");
        link.push_str(ret);
    }

    link
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    // seconds
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
struct FlightOffer {
    id: String,
    price: OfferPrice,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    total: String,
    base: String,
    currency: String,

    #[serde(default)]
    fees: Option<Vec<OfferFee>>,

    #[serde(rename = "grandTotal", default)]
    grand_total: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferFee {
    amount: String,

    #[serde(rename = "type")]
    #[allow(dead_code)]
    kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(return_date: Option<&str>) -> FlightQuery {
        FlightQuery {
            origin: "SFO".to_string(),
            destination: "JFK".to_string(),
            departure_date: "2026-09-15".to_string(),
            return_date: return_date.map(str::to_string),
            adults: 1,
            cabin_class: "economy".to_string(),
        }
    }

    fn offer_from_json(value: serde_json::Value) -> FlightOffer {
        serde_json::from_value(value).expect("offer fixture")
    }

    #[test]
    fn cabin_class_mapping_defaults_to_economy() {
        assert_eq!(map_cabin_class("economy"), "ECONOMY");
        assert_eq!(map_cabin_class("premium_economy"), "PREMIUM_ECONOMY");
        assert_eq!(map_cabin_class("business"), "BUSINESS");
        assert_eq!(map_cabin_class("first"), "FIRST");
        assert_eq!(map_cabin_class("steerage"), "ECONOMY");
    }

    #[test]
    fn offer_prefers_grand_total_and_splits_breakdown() {
        let offer = offer_from_json(json!({
            "id": "offer-1",
            "price": {
                "total": "310.00",
                "base": "250.00",
                "currency": "USD",
                "grandTotal": "320.00",
                "fees": [
                    { "amount": "10.00", "type": "SUPPLIER" },
                    { "amount": "5.00", "type": "TICKETING" }
                ]
            }
        }));

        let priced = map_offer(&offer, &query(None)).unwrap();
        assert_eq!(priced.price, 320.0);
        assert_eq!(priced.base_fare, Some(250.0));
        assert_eq!(priced.fees, Some(15.0));
        // taxes = (320 - 250) - 15
        assert_eq!(priced.taxes, Some(55.0));
        assert_eq!(priced.currency, "USD");
        assert_eq!(priced.offer_id, "offer-1");
    }

    #[test]
    fn offer_falls_back_to_total_without_grand_total() {
        let offer = offer_from_json(json!({
            "id": "offer-2",
            "price": { "total": "199.99", "base": "150.00", "currency": "USD" }
        }));

        let priced = map_offer(&offer, &query(None)).unwrap();
        assert_eq!(priced.price, 199.99);
        assert_eq!(priced.fees, None);
        assert!(priced.taxes.unwrap() > 49.98);
    }

    #[test]
    fn taxes_are_absent_not_zero_when_breakdown_is_nonpositive() {
        // base == total, so taxes come out at 0 -> must be None
        let offer = offer_from_json(json!({
            "id": "offer-3",
            "price": { "total": "100.00", "base": "100.00", "currency": "USD" }
        }));

        let priced = map_offer(&offer, &query(None)).unwrap();
        assert_eq!(priced.taxes, None);

        // fees exceed the total-base spread -> negative taxes, also None
        let offer = offer_from_json(json!({
            "id": "offer-4",
            "price": {
                "total": "110.00",
                "base": "100.00",
                "currency": "USD",
                "fees": [{ "amount": "25.00", "type": "SUPPLIER" }]
            }
        }));

        let priced = map_offer(&offer, &query(None)).unwrap();
        assert_eq!(priced.taxes, None);
        assert_eq!(priced.fees, Some(25.0));
    }

    #[test]
    fn unparsable_total_is_an_error() {
        let offer = offer_from_json(json!({
            "id": "offer-5",
            "price": { "total": "free??", "base": "0", "currency": "USD" }
        }));

        assert!(map_offer(&offer, &query(None)).is_err());
    }

    #[test]
    fn booking_link_one_way_and_round_trip() {
        assert_eq!(
            booking_link(&query(None)),
            "https://www.google.com/travel/flights?q=flights+from+SFO+to+JFK+on+2026-09-15"
        );

        assert_eq!(
            booking_link(&query(Some("2026-09-22"))),
            "https://www.google.com/travel/flights?q=flights+from+SFO+to+JFK+on+2026-09-15+through+2026-09-22"
        );
    }

    #[test]
    fn empty_offers_payload_deserializes_to_no_offers() {
        let parsed: OffersResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.data.is_empty());

        let parsed: OffersResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(parsed.data.is_empty());
    }
}
