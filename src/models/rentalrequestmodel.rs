use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::propertymodel::{PropertyType, Purpose, RentFrequency};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Active,
    Matched,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    /// Lifecycle: active -> matched -> fulfilled, and anything but fulfilled
    /// may be cancelled. Matched never goes back to active.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Active, Matched)
                | (Matched, Fulfilled)
                | (Active, Cancelled)
                | (Matched, Cancelled)
                | (Cancelled, Cancelled)
        )
    }

    /// Open requests can still be edited and are shown to hosts.
    pub fn is_open(self) -> bool {
        matches!(self, RequestStatus::Active | RequestStatus::Matched)
    }

    pub fn to_str(&self) -> &str {
        match self {
            RequestStatus::Active => "active",
            RequestStatus::Matched => "matched",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

/// Inclusive bounds; a missing side is unconstrained.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn admits(&self, value: T) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }

    pub fn is_ordered(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Requirements {
    #[serde(default)]
    pub bedrooms: Range<i32>,
    #[serde(default)]
    pub bathrooms: Range<i32>,
    #[serde(default)]
    pub area_sqft: Range<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LocationPreference {
    #[serde(default)]
    pub flexible: bool,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub districts: Vec<String>,
}

impl LocationPreference {
    /// Flexible, or nothing named: every location satisfies it.
    pub fn is_unconstrained(&self) -> bool {
        self.flexible || (self.cities.is_empty() && self.districts.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Budget {
    pub min: i64,
    pub max: i64,
    pub currency: String,
    pub frequency: RentFrequency,
}

impl Budget {
    pub fn contains(&self, price: i64) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RentalRequest {
    pub id: Uuid,
    pub user_id: Uuid,

    // Search criteria
    pub purpose: Purpose,
    pub property_types: Vec<PropertyType>,
    pub location: LocationPreference,
    pub budget: Budget,
    pub requirements: Requirements,
    pub amenities: Vec<String>,
    pub has_pets: bool,
    pub move_in_date: Option<NaiveDate>,

    pub status: RequestStatus,
    pub matched_properties: Vec<Uuid>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
