use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{
    propertymodel::{Property, PropertyType, Purpose},
    rentalrequestmodel::{Budget, LocationPreference, Requirements},
};

fn criteria_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_criteria(criteria: &RentalRequestCriteriaDto) -> Result<(), ValidationError> {
    let budget = &criteria.budget;
    if budget.min < 0 {
        return Err(criteria_error("budget_min", "Budget minimum cannot be negative"));
    }
    if budget.min > budget.max {
        return Err(criteria_error("budget_range", "Budget minimum must not exceed maximum"));
    }
    if budget.currency.len() != 3 || !budget.currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(criteria_error("budget_currency", "Currency must be a 3-letter code"));
    }

    let req = &criteria.requirements;
    if !req.bedrooms.is_ordered() || !req.bathrooms.is_ordered() || !req.area_sqft.is_ordered() {
        return Err(criteria_error(
            "requirements_range",
            "Requirement minimum must not exceed maximum",
        ));
    }

    Ok(())
}

/// Everything a tenant can search on. Used as-is for edits (full replace).
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = "validate_criteria"))]
pub struct RentalRequestCriteriaDto {
    pub purpose: Purpose,

    #[serde(default)]
    pub property_types: Vec<PropertyType>,

    #[serde(default)]
    pub location: LocationPreference,

    pub budget: Budget,

    #[serde(default)]
    pub requirements: Requirements,

    #[validate(length(max = 30, message = "At most 30 amenities can be requested"))]
    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub has_pets: bool,

    pub move_in_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateRentalRequestDto {
    pub user_id: Uuid,

    #[serde(flatten)]
    #[validate]
    pub criteria: RentalRequestCriteriaDto,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

/// Listing summary returned in the host-facing views.
#[derive(Debug, Serialize, Deserialize)]
pub struct PropertySummaryDto {
    pub id: Uuid,
    pub title: String,
    pub property_type: PropertyType,
    pub purpose: Purpose,
    pub city: String,
    pub district: String,
    pub price: i64,
    pub currency: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
}

impl PropertySummaryDto {
    pub fn from_property(property: &Property) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            property_type: property.property_type,
            purpose: property.purpose,
            city: property.city.clone(),
            district: property.district.clone(),
            price: property.price,
            currency: property.currency.clone(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
        }
    }
}
