//! Address and contact projections in the shape the courier API expects.
//!
//! Callers are not consistent about field names (`street` vs `street1`,
//! `zip` vs `zip_code`), so the input side accepts either and the output
//! side always emits the courier's names.

use serde::{Deserialize, Serialize};

use crate::utils::error::{CourierError, Result};

pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub street1: Option<String>,
    #[serde(default, alias = "unit")]
    pub street2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierAddress {
    pub street1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierContact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierLocation {
    pub address: CourierAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<CourierContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: Option<String>, role: &str, field: &str) -> Result<String> {
    value.ok_or_else(|| CourierError::validation(format!("{} address is missing {}", role, field)))
}

/// Keeps only the digits; accepts 10-digit numbers and 11-digit numbers with a
/// leading country code `1`. Anything else yields `None` so no malformed
/// number is ever sent.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(digits[1..].to_string()),
        _ => None,
    }
}

impl CourierAddress {
    /// `role` names the location ("pickup", "delivery") in validation messages.
    pub fn from_input(input: &AddressInput, role: &str) -> Result<Self> {
        let street1 = non_blank(&input.street).or_else(|| non_blank(&input.street1));
        let zip = non_blank(&input.zip).or_else(|| non_blank(&input.zip_code));

        Ok(Self {
            street1: required(street1, role, "street")?,
            street2: non_blank(&input.street2),
            city: required(non_blank(&input.city), role, "city")?,
            state: required(non_blank(&input.state), role, "state")?,
            zip: required(zip, role, "zip")?,
            country: non_blank(&input.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        })
    }
}

impl CourierContact {
    /// The courier requires a contact name, so a contact without one is dropped.
    pub fn from_input(input: &ContactInput) -> Option<Self> {
        let name = non_blank(&input.name)?;

        Some(Self {
            name,
            phone: input.phone.as_deref().and_then(normalize_phone),
            email: non_blank(&input.email),
        })
    }
}

impl CourierLocation {
    pub fn from_input(input: &AddressInput, role: &str) -> Result<Self> {
        Ok(Self {
            address: CourierAddress::from_input(input, role)?,
            contact: input.contact.as_ref().and_then(CourierContact::from_input),
            notes: non_blank(&input.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(json: serde_json::Value) -> AddressInput {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("15551234567").as_deref(), Some("5551234567"));
        assert_eq!(normalize_phone("555-123-4567").as_deref(), Some("5551234567"));
        assert_eq!(normalize_phone("+1 (555) 123-4567").as_deref(), Some("5551234567"));
        assert_eq!(normalize_phone("123"), None);
        assert_eq!(normalize_phone("25551234567"), None);
        assert_eq!(normalize_phone(""), None);
    }

    #[test]
    fn test_address_accepts_street_or_street1() {
        let a = address(serde_json::json!({
            "street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701"
        }));
        let b = address(serde_json::json!({
            "street1": "1 Main St", "city": "Austin", "state": "TX", "zip_code": "78701"
        }));

        let a = CourierAddress::from_input(&a, "pickup").unwrap();
        let b = CourierAddress::from_input(&b, "pickup").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.street1, "1 Main St");
        assert_eq!(a.zip, "78701");
        assert_eq!(a.country, "US");
    }

    #[test]
    fn test_address_keeps_explicit_country_and_unit() {
        let input = address(serde_json::json!({
            "street": "1 Main St", "unit": "Apt 4", "city": "Toronto",
            "state": "ON", "zip": "M5V 2T6", "country": "CA"
        }));
        let addr = CourierAddress::from_input(&input, "delivery").unwrap();
        assert_eq!(addr.country, "CA");
        assert_eq!(addr.street2.as_deref(), Some("Apt 4"));

        let json = serde_json::to_value(&addr).unwrap();
        assert_eq!(json["street1"], "1 Main St");
        assert!(json.get("street").is_none());
        assert!(json.get("zip_code").is_none());
    }

    #[test]
    fn test_address_missing_street_is_validation_error() {
        let input = address(serde_json::json!({"city": "Austin", "state": "TX", "zip": "78701"}));
        let err = CourierAddress::from_input(&input, "pickup").unwrap_err();
        assert!(matches!(err, CourierError::Validation { .. }));
        assert!(err.to_string().contains("pickup address is missing street"));
    }

    #[test]
    fn test_contact_omits_malformed_phone() {
        let contact = CourierContact::from_input(&ContactInput {
            name: Some("Dana Donor".to_string()),
            phone: Some("123".to_string()),
            email: Some("dana@example.com".to_string()),
        })
        .unwrap();

        assert_eq!(contact.phone, None);
        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["email"], "dana@example.com");
    }

    #[test]
    fn test_contact_without_name_is_omitted() {
        let input = address(serde_json::json!({
            "street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701",
            "contact": {"name": "  ", "phone": "512-555-0100", "email": "dock@example.com"}
        }));
        let location = CourierLocation::from_input(&input, "delivery").unwrap();
        assert_eq!(location.contact, None);

        let json = serde_json::to_value(&location).unwrap();
        assert!(json.get("contact").is_none());
    }

    #[test]
    fn test_location_carries_contact_and_notes() {
        let input = address(serde_json::json!({
            "street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701",
            "notes": "Bags are on the porch",
            "contact": {"name": "Dana", "phone": "1-555-123-4567"}
        }));
        let location = CourierLocation::from_input(&input, "pickup").unwrap();
        let contact = location.contact.unwrap();
        assert_eq!(contact.phone.as_deref(), Some("5551234567"));
        assert_eq!(location.notes.as_deref(), Some("Bags are on the porch"));
    }
}
