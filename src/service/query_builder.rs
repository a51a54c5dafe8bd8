// service/query_builder.rs
use crate::{
    db::propertydb::{LocationFilter, PropertyCatalogFilter},
    models::{propertymodel::PropertyStatus, rentalrequestmodel::RentalRequest},
};

/// Coarse catalog filter for a request. Location here is only a prefilter;
/// the scorer makes the authoritative call.
pub fn build_catalog_filter(request: &RentalRequest) -> PropertyCatalogFilter {
    let location = if request.location.is_unconstrained() {
        None
    } else {
        Some(LocationFilter {
            cities: request.location.cities.clone(),
            districts: request.location.districts.clone(),
        })
    };

    PropertyCatalogFilter {
        status: PropertyStatus::Active,
        purpose: request.purpose,
        property_types: request.property_types.clone(),
        location,
        // Both rent and booking requests price per period
        rent_frequency: Some(request.budget.frequency),
    }
}
