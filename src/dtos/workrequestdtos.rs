use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::workrequestmodel::{ArrivalDecision, NewWorkRequest};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkRequestDto {
    /// Must match the session when present.
    pub user_id: Option<i64>,
    pub skill_type_id: i64,
    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,
    pub request_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 10, message = "Pincode must be at most 10 characters"))]
    pub pincode: String,
    #[validate(length(max = 20, message = "Door number must be at most 20 characters"))]
    pub door_no: Option<String>,
    #[validate(length(max = 100, message = "Street name must be at most 100 characters"))]
    pub street_name: Option<String>,
    #[validate(length(max = 100, message = "Area must be at most 100 characters"))]
    pub area: Option<String>,
}

impl CreateWorkRequestDto {
    pub fn into_new_request(self, user_id: i64) -> NewWorkRequest {
        NewWorkRequest {
            user_id,
            skill_type_id: self.skill_type_id,
            description: self.description,
            request_date: self.request_date,
            location: self.location,
            city: self.city,
            pincode: self.pincode,
            door_no: self.door_no,
            street_name: self.street_name,
            area: self.area,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptWorkRequestDto {
    pub worker_id: Option<i64>,
    #[validate(length(max = 50, message = "Time slot must be at most 50 characters"))]
    pub time_slot: Option<String>,
    /// Proposed together with the acceptance.
    #[validate(length(max = 20, message = "Arrival time must be at most 20 characters"))]
    pub arrival_time: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineWorkRequestDto {
    pub worker_id: Option<i64>,
}

/// Clients send the amount either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkRequestDto {
    pub worker_id: Option<i64>,
    pub amount: AmountInput,
}

impl CompleteWorkRequestDto {
    /// Numbers go through their shortest decimal form so `750.1` stays `750.1`.
    pub fn amount(&self) -> Result<BigDecimal, String> {
        let text = match &self.amount {
            AmountInput::Number(value) if value.is_finite() => value.to_string(),
            AmountInput::Number(_) => return Err(INVALID_AMOUNT.to_string()),
            AmountInput::Text(value) => value.trim().to_string(),
        };

        BigDecimal::from_str(&text).map_err(|_| INVALID_AMOUNT.to_string())
    }
}

const INVALID_AMOUNT: &str = "Amount must be a positive number";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelWorkRequestDto {
    pub user_id: Option<i64>,
    pub worker_id: Option<i64>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetArrivalTimeDto {
    pub worker_id: Option<i64>,
    #[validate(length(max = 20, message = "Arrival time must be at most 20 characters"))]
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmArrivalDto {
    pub user_id: Option<i64>,
    pub confirmation_status: ArrivalDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_bodies_use_camel_case() {
        let accept: AcceptWorkRequestDto =
            serde_json::from_str(r#"{"workerId": 4, "timeSlot": "Morning"}"#).unwrap();
        assert_eq!(accept.worker_id, Some(4));
        assert_eq!(accept.time_slot.as_deref(), Some("Morning"));
        assert_eq!(accept.arrival_time, None);

        let confirm: ConfirmArrivalDto =
            serde_json::from_str(r#"{"userId": 2, "confirmationStatus": "Rejected"}"#).unwrap();
        assert_eq!(confirm.confirmation_status, ArrivalDecision::Rejected);
    }

    #[test]
    fn unknown_confirmation_is_rejected() {
        let parsed = serde_json::from_str::<ConfirmArrivalDto>(
            r#"{"userId": 2, "confirmationStatus": "Maybe"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn amount_keeps_its_decimal_form() {
        let dto = CompleteWorkRequestDto {
            worker_id: None,
            amount: AmountInput::Number(750.1),
        };
        assert_eq!(dto.amount().unwrap(), BigDecimal::from_str("750.1").unwrap());
    }

    #[test]
    fn amount_accepts_numeric_strings() {
        let dto: CompleteWorkRequestDto =
            serde_json::from_str(r#"{"workerId": 4, "amount": "500"}"#).unwrap();
        assert_eq!(dto.amount, AmountInput::Text("500".to_string()));
        assert_eq!(dto.amount().unwrap(), BigDecimal::from(500));

        let dto: CompleteWorkRequestDto =
            serde_json::from_str(r#"{"amount": " 120.50 "}"#).unwrap();
        assert_eq!(dto.amount().unwrap(), BigDecimal::from_str("120.50").unwrap());

        let dto: CompleteWorkRequestDto = serde_json::from_str(r#"{"amount": 500}"#).unwrap();
        assert_eq!(dto.amount().unwrap(), BigDecimal::from(500));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let dto: CompleteWorkRequestDto =
            serde_json::from_str(r#"{"workerId": 4, "amount": "abc"}"#).unwrap();
        assert_eq!(dto.amount().unwrap_err(), "Amount must be a positive number");

        let dto: CompleteWorkRequestDto = serde_json::from_str(r#"{"amount": ""}"#).unwrap();
        assert!(dto.amount().is_err());

        assert!(serde_json::from_str::<CompleteWorkRequestDto>(r#"{"amount": true}"#).is_err());
    }

    #[test]
    fn accept_body_carries_arrival_time() {
        let accept: AcceptWorkRequestDto = serde_json::from_str(
            r#"{"workerId": 4, "timeSlot": "Morning", "arrivalTime": "10:30 AM"}"#,
        )
        .unwrap();
        assert_eq!(accept.arrival_time.as_deref(), Some("10:30 AM"));
        assert!(accept.validate().is_ok());
    }

    #[test]
    fn over_long_lifecycle_fields_fail_validation() {
        let accept = AcceptWorkRequestDto {
            time_slot: Some("x".repeat(51)),
            ..Default::default()
        };
        assert!(accept.validate().is_err());

        let accept = AcceptWorkRequestDto {
            arrival_time: Some("x".repeat(21)),
            ..Default::default()
        };
        assert!(accept.validate().is_err());

        let arrival = SetArrivalTimeDto {
            worker_id: None,
            arrival_time: "x".repeat(21),
        };
        assert!(arrival.validate().is_err());

        let arrival = SetArrivalTimeDto {
            worker_id: None,
            arrival_time: "x".repeat(20),
        };
        assert!(arrival.validate().is_ok());
    }

    #[test]
    fn over_long_address_fails_validation() {
        let body = r#"{
            "skill_type_id": 3,
            "description": "Leaking tap",
            "request_date": "2025-06-01",
            "location": "Near the market",
            "city": "Chennai",
            "pincode": "600001"
        }"#;
        let dto: CreateWorkRequestDto = serde_json::from_str(body).unwrap();
        assert!(dto.validate().is_ok());

        let too_long = CreateWorkRequestDto {
            location: "x".repeat(256),
            ..dto.clone()
        };
        assert!(too_long.validate().is_err());

        let too_long = CreateWorkRequestDto {
            pincode: "12345678901".to_string(),
            ..dto.clone()
        };
        assert!(too_long.validate().is_err());

        let too_long = CreateWorkRequestDto {
            street_name: Some("x".repeat(101)),
            ..dto
        };
        assert!(too_long.validate().is_err());
    }
}
