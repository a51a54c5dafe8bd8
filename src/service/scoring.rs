// service/scoring.rs
//! Weighted multi-criteria score of one property against one rental request.
//!
//! Component weights (points):
//!
//! | component    | points | rule                                               |
//! |--------------|--------|----------------------------------------------------|
//! | budget       | 30 (+5)| price in `[min, max]` or the candidate is dropped  |
//! | type         | 15     | always                                             |
//! | location     | 15     | flexible, unnamed, or city/district listed         |
//! | bedrooms     | 10     | within requested bounds                            |
//! | bathrooms    | 10     | within requested bounds                            |
//! | area         | 5      | within requested bounds                            |
//! | amenities    | 15     | proportional to overlap with the desired set       |
//! | pets         | 5      | not needed, or allowed                             |
//! | availability | 5      | no date, immediate, or free on/before move-in      |
//!
//! The total is rounded once at the end and is not capped at 100.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::models::{
    propertymodel::Property,
    rentalrequestmodel::{Budget, LocationPreference, RentalRequest},
};

pub const MATCH_THRESHOLD: i32 = 50;

const BUDGET_WEIGHT: f64 = 30.0;
const SWEET_SPOT_BONUS: f64 = 5.0;
const SWEET_SPOT_LOW: f64 = 0.3;
const SWEET_SPOT_HIGH: f64 = 0.7;
const TYPE_WEIGHT: f64 = 15.0;
const LOCATION_WEIGHT: f64 = 15.0;
const BEDROOMS_WEIGHT: f64 = 10.0;
const BATHROOMS_WEIGHT: f64 = 10.0;
const AREA_WEIGHT: f64 = 5.0;
const AMENITIES_WEIGHT: f64 = 15.0;
const PETS_WEIGHT: f64 = 5.0;
const AVAILABILITY_WEIGHT: f64 = 5.0;

/// Per-component outcome. `partial` marks a breakdown where only budget
/// and type were evaluated; the remaining flags are then `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub budget: bool,
    pub price_in_sweet_spot: bool,
    pub property_type: bool,
    pub location: bool,
    pub bedrooms: bool,
    pub bathrooms: bool,
    pub area: bool,
    pub amenities_overlap_pct: u32,
    pub pets: bool,
    pub availability: bool,
    pub partial: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub score: i32,
    pub details: MatchDetails,
}

impl Scorecard {
    fn new(total: f64, details: MatchDetails) -> Self {
        Self {
            score: total.round() as i32,
            details,
        }
    }

    pub fn is_match(&self) -> bool {
        self.score >= MATCH_THRESHOLD
    }
}

/// `(price - min) / (max - min)` in the 0.3..=0.7 band. A single-point
/// budget never earns the bonus.
pub fn in_sweet_spot(price: i64, budget: &Budget) -> bool {
    if budget.max == budget.min {
        return false;
    }
    let position = (price - budget.min) as f64 / (budget.max - budget.min) as f64;
    (SWEET_SPOT_LOW..=SWEET_SPOT_HIGH).contains(&position)
}

pub fn location_matches(property: &Property, location: &LocationPreference) -> bool {
    if location.is_unconstrained() {
        return true;
    }
    location.cities.iter().any(|c| c == &property.city)
        || location.districts.iter().any(|d| d == &property.district)
}

/// Fraction of the desired amenities the property offers; 1.0 when
/// nothing is desired.
pub fn amenity_overlap(desired: &[String], offered: &[String]) -> f64 {
    if desired.is_empty() {
        return 1.0;
    }
    let hits = desired.iter().filter(|a| offered.contains(a)).count();
    hits as f64 / desired.len() as f64
}

fn area_matches(property: &Property, request: &RentalRequest) -> bool {
    // No recorded area never violates a bound
    match property.area_sqft.as_ref().and_then(|a| a.to_f64()) {
        Some(area) => request.requirements.area_sqft.admits(area),
        None => true,
    }
}

fn availability_matches(property: &Property, request: &RentalRequest) -> bool {
    let Some(move_in) = request.move_in_date else {
        return true;
    };
    if property.available_immediately {
        return true;
    }
    matches!(property.available_from, Some(from) if from <= move_in)
}

fn pets_match(property: &Property, request: &RentalRequest) -> bool {
    !request.has_pets || property.pets_allowed
}

/// Budget gate, sweet-spot bonus and the unconditional type award.
fn score_budget_and_type(
    property: &Property,
    request: &RentalRequest,
) -> Option<(f64, MatchDetails)> {
    if !request.budget.contains(property.price) {
        return None;
    }

    let mut total = BUDGET_WEIGHT;
    let mut details = MatchDetails {
        budget: true,
        ..Default::default()
    };

    if in_sweet_spot(property.price, &request.budget) {
        total += SWEET_SPOT_BONUS;
        details.price_in_sweet_spot = true;
    }

    total += TYPE_WEIGHT;
    details.property_type = true;

    Some((total, details))
}

/// Full score. `None` means the candidate is disqualified on budget.
pub fn score_property(property: &Property, request: &RentalRequest) -> Option<Scorecard> {
    let (mut total, mut details) = score_budget_and_type(property, request)?;

    if location_matches(property, &request.location) {
        total += LOCATION_WEIGHT;
        details.location = true;
    }

    if request.requirements.bedrooms.admits(property.bedrooms) {
        total += BEDROOMS_WEIGHT;
        details.bedrooms = true;
    }

    if request.requirements.bathrooms.admits(property.bathrooms) {
        total += BATHROOMS_WEIGHT;
        details.bathrooms = true;
    }

    if area_matches(property, request) {
        total += AREA_WEIGHT;
        details.area = true;
    }

    let overlap = amenity_overlap(&request.amenities, &property.amenities);
    total += AMENITIES_WEIGHT * overlap;
    details.amenities_overlap_pct = (overlap * 100.0).round() as u32;

    if pets_match(property, request) {
        total += PETS_WEIGHT;
        details.pets = true;
    }

    if availability_matches(property, request) {
        total += AVAILABILITY_WEIGHT;
        details.availability = true;
    }

    Some(Scorecard::new(total, details))
}

/// Host-side pair score as it has always been computed: stops after the
/// budget and type components.
pub fn score_pair_budget_and_type(
    property: &Property,
    request: &RentalRequest,
) -> Option<Scorecard> {
    let (total, mut details) = score_budget_and_type(property, request)?;
    details.partial = true;
    Some(Scorecard::new(total, details))
}
