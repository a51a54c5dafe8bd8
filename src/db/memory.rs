// In-memory catalog and request store used by the service tests.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{
        propertydb::{PropertyCatalogFilter, PropertyExt},
        rentalrequestdb::RentalRequestExt,
    },
    dtos::rentalrequestdtos::RentalRequestCriteriaDto,
    models::{
        propertymodel::{Property, PropertyStatus, PropertyType, Purpose, RentFrequency},
        rentalrequestmodel::{
            Budget, LocationPreference, RentalRequest, RequestStatus, Requirements,
        },
    },
};

/// Rows are kept in insertion order, which stands in for catalog order.
#[derive(Default)]
pub struct InMemoryStore {
    properties: Mutex<Vec<Property>>,
    requests: Mutex<Vec<RentalRequest>>,
    pub catalog_queries: Mutex<usize>,
    pub open_request_queries: Mutex<usize>,
    pub match_writes: Mutex<Vec<(Uuid, Vec<Uuid>, RequestStatus)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        let store = Self::new();
        *store.properties.lock().unwrap() = properties;
        store
    }

    pub fn add_request(&self, request: RentalRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn update_request<F>(&self, request_id: Uuid, f: F) -> Result<RentalRequest, sqlx::Error>
    where
        F: FnOnce(&mut RentalRequest),
    {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        f(&mut *request);
        request.updated_at = Some(Utc::now());
        Ok(request.clone())
    }
}

/// In-memory evaluation of the WHERE clause built by `catalog_query`.
pub fn catalog_accepts(filter: &PropertyCatalogFilter, property: &Property) -> bool {
    if property.status != filter.status || property.purpose != filter.purpose {
        return false;
    }

    if !filter.property_types.is_empty() && !filter.property_types.contains(&property.property_type)
    {
        return false;
    }

    if let Some(location) = &filter.location {
        let in_city = location.cities.iter().any(|c| c == &property.city);
        let in_district = location.districts.iter().any(|d| d == &property.district);
        if !in_city && !in_district {
            return false;
        }
    }

    match filter.rent_frequency {
        Some(freq) => property.rent_frequency == Some(freq),
        None => true,
    }
}

fn apply_criteria(request: &mut RentalRequest, criteria: RentalRequestCriteriaDto) {
    request.purpose = criteria.purpose;
    request.property_types = criteria.property_types;
    request.location = criteria.location;
    request.budget = criteria.budget;
    request.requirements = criteria.requirements;
    request.amenities = criteria.amenities;
    request.has_pets = criteria.has_pets;
    request.move_in_date = criteria.move_in_date;
}

#[async_trait]
impl PropertyExt for InMemoryStore {
    async fn query_catalog(
        &self,
        filter: &PropertyCatalogFilter,
        limit: i64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        *self.catalog_queries.lock().unwrap() += 1;
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| catalog_accepts(filter, p))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == property_id)
            .cloned())
    }

    async fn get_active_properties_by_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.host_id == host_id && p.status == PropertyStatus::Active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RentalRequestExt for InMemoryStore {
    async fn create_rental_request(
        &self,
        user_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error> {
        let mut request = sample_request();
        request.id = Uuid::new_v4();
        request.user_id = user_id;
        apply_criteria(&mut request, criteria);
        self.add_request(request.clone());
        Ok(request)
    }

    async fn get_rental_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<RentalRequest>, sqlx::Error> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == request_id)
            .cloned())
    }

    async fn get_rental_requests_by_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RentalRequest>, sqlx::Error> {
        let offset = (page.saturating_sub(1) as usize) * limit;
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_open_rental_requests(
        &self,
        purpose: Purpose,
        frequency: RentFrequency,
    ) -> Result<Vec<RentalRequest>, sqlx::Error> {
        *self.open_request_queries.lock().unwrap() += 1;
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.purpose == purpose && r.budget.frequency == frequency && r.status.is_open()
            })
            .cloned()
            .collect())
    }

    async fn update_rental_request_criteria(
        &self,
        request_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error> {
        self.update_request(request_id, |r| apply_criteria(r, criteria))
    }

    async fn save_match_result(
        &self,
        request_id: Uuid,
        matched_properties: &[Uuid],
        expected: RequestStatus,
        status: RequestStatus,
    ) -> Result<Option<RentalRequest>, sqlx::Error> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == request_id && r.status == expected)
        else {
            return Ok(None);
        };

        self.match_writes
            .lock()
            .unwrap()
            .push((request_id, matched_properties.to_vec(), status));
        request.matched_properties = matched_properties.to_vec();
        request.status = status;
        request.updated_at = Some(Utc::now());
        Ok(Some(request.clone()))
    }

    async fn update_rental_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<RentalRequest, sqlx::Error> {
        self.update_request(request_id, |r| r.status = status)
    }
}

/// Active monthly rental apartment in Lagos/Lekki, 3 bed / 2 bath,
/// parking + wifi, immediately available.
pub fn sample_property(price: i64) -> Property {
    Property {
        id: Uuid::new_v4(),
        host_id: Uuid::new_v4(),
        title: "Three bedroom flat".to_string(),
        status: PropertyStatus::Active,
        purpose: Purpose::Rent,
        property_type: PropertyType::Apartment,
        price,
        currency: "NGN".to_string(),
        rent_frequency: Some(RentFrequency::Monthly),
        city: "Lagos".to_string(),
        district: "Lekki".to_string(),
        bedrooms: 3,
        bathrooms: 2,
        area_sqft: None,
        amenities: vec!["parking".to_string(), "wifi".to_string()],
        pets_allowed: false,
        available_immediately: true,
        available_from: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

/// Rent request, budget 50k..80k monthly, no other constraints.
pub fn sample_request() -> RentalRequest {
    RentalRequest {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        purpose: Purpose::Rent,
        property_types: vec![],
        location: LocationPreference::default(),
        budget: Budget {
            min: 50_000,
            max: 80_000,
            currency: "NGN".to_string(),
            frequency: RentFrequency::Monthly,
        },
        requirements: Requirements::default(),
        amenities: vec![],
        has_pets: false,
        move_in_date: None,
        status: RequestStatus::Active,
        matched_properties: vec![],
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

pub fn sample_criteria() -> RentalRequestCriteriaDto {
    let request = sample_request();
    RentalRequestCriteriaDto {
        purpose: request.purpose,
        property_types: request.property_types,
        location: request.location,
        budget: request.budget,
        requirements: request.requirements,
        amenities: request.amenities,
        has_pets: request.has_pets,
        move_in_date: request.move_in_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::propertydb::LocationFilter;

    fn base_filter() -> PropertyCatalogFilter {
        PropertyCatalogFilter {
            status: PropertyStatus::Active,
            purpose: Purpose::Rent,
            property_types: vec![],
            location: None,
            rent_frequency: Some(RentFrequency::Monthly),
        }
    }

    #[test]
    fn accepts_active_property_with_matching_purpose_and_frequency() {
        assert!(catalog_accepts(&base_filter(), &sample_property(65_000)));
    }

    #[test]
    fn rejects_inactive_or_wrong_purpose() {
        let mut property = sample_property(65_000);
        property.status = PropertyStatus::Rented;
        assert!(!catalog_accepts(&base_filter(), &property));

        let mut property = sample_property(65_000);
        property.purpose = Purpose::Booking;
        assert!(!catalog_accepts(&base_filter(), &property));
    }

    #[test]
    fn rejects_mismatched_or_missing_frequency() {
        let mut property = sample_property(65_000);
        property.rent_frequency = Some(RentFrequency::Weekly);
        assert!(!catalog_accepts(&base_filter(), &property));

        property.rent_frequency = None;
        assert!(!catalog_accepts(&base_filter(), &property));
    }

    #[test]
    fn type_restriction_only_when_non_empty() {
        let property = sample_property(65_000);
        let mut filter = base_filter();
        filter.property_types = vec![PropertyType::Villa];
        assert!(!catalog_accepts(&filter, &property));

        filter.property_types = vec![PropertyType::Villa, property.property_type];
        assert!(catalog_accepts(&filter, &property));
    }

    #[test]
    fn location_is_an_or_across_city_and_district() {
        let property = sample_property(65_000);
        let mut filter = base_filter();

        filter.location = Some(LocationFilter {
            cities: vec!["Elsewhere".to_string()],
            districts: vec![property.district.clone()],
        });
        assert!(catalog_accepts(&filter, &property));

        filter.location = Some(LocationFilter {
            cities: vec!["Elsewhere".to_string()],
            districts: vec!["Nowhere".to_string()],
        });
        assert!(!catalog_accepts(&filter, &property));
    }

    #[tokio::test]
    async fn match_write_is_skipped_when_status_moved() {
        let store = InMemoryStore::new();
        let request = sample_request();
        store.add_request(request.clone());

        let stale = store
            .save_match_result(request.id, &[], RequestStatus::Matched, RequestStatus::Matched)
            .await
            .unwrap();
        assert!(stale.is_none());
        assert!(store.match_writes.lock().unwrap().is_empty());

        let saved = store
            .save_match_result(request.id, &[], RequestStatus::Active, RequestStatus::Active)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.status, RequestStatus::Active);
    }
}
