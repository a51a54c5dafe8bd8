use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Draft,
    Active,
    Inactive, // Host paused the listing
    Rented,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "property_purpose", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Rent,
    Booking,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Studio,
    Room,
    Townhouse,
    Penthouse,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Studio => "studio",
            PropertyType::Room => "room",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Penthouse => "penthouse",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "villa" => Ok(PropertyType::Villa),
            "studio" => Ok(PropertyType::Studio),
            "room" => Ok(PropertyType::Room),
            "townhouse" => Ok(PropertyType::Townhouse),
            "penthouse" => Ok(PropertyType::Penthouse),
            other => Err(format!("Unknown property type: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "rent_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentFrequency {
    Monthly,
    Weekly,
    Daily,
}

/// A listing as the matcher sees it. Address, policy and availability
/// columns are stored flat on the `properties` table.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,

    pub status: PropertyStatus,
    pub purpose: Purpose,
    pub property_type: PropertyType,

    // Pricing
    pub price: i64,
    pub currency: String,
    pub rent_frequency: Option<RentFrequency>,

    // Location
    pub city: String,
    pub district: String,

    // Specifications
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: Option<BigDecimal>,
    pub amenities: Vec<String>,

    // Policies
    pub pets_allowed: bool,

    // Availability
    pub available_immediately: bool,
    pub available_from: Option<NaiveDate>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
