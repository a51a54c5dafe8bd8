use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::rentalrequestdtos::RentalRequestCriteriaDto,
    models::{
        propertymodel::{PropertyType, Purpose, RentFrequency},
        rentalrequestmodel::{
            Budget, LocationPreference, Range, RentalRequest, RequestStatus, Requirements,
        },
    },
};

const RENTAL_REQUEST_COLUMNS: &str = r#"
    id, user_id, purpose, property_types,
    location_flexible, cities, districts,
    budget_min, budget_max, currency, frequency,
    bedrooms_min, bedrooms_max, bathrooms_min, bathrooms_max, area_min, area_max,
    amenities, has_pets, move_in_date,
    status, matched_properties,
    created_at, updated_at
"#;

/// Flat shape of a `rental_requests` row; criteria are regrouped on the way out.
#[derive(Debug, FromRow)]
struct RentalRequestRow {
    id: Uuid,
    user_id: Uuid,
    purpose: Purpose,
    property_types: Vec<String>,
    location_flexible: bool,
    cities: Vec<String>,
    districts: Vec<String>,
    budget_min: i64,
    budget_max: i64,
    currency: String,
    frequency: RentFrequency,
    bedrooms_min: Option<i32>,
    bedrooms_max: Option<i32>,
    bathrooms_min: Option<i32>,
    bathrooms_max: Option<i32>,
    area_min: Option<f64>,
    area_max: Option<f64>,
    amenities: Vec<String>,
    has_pets: bool,
    move_in_date: Option<NaiveDate>,
    status: RequestStatus,
    matched_properties: Vec<Uuid>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<RentalRequestRow> for RentalRequest {
    type Error = sqlx::Error;

    fn try_from(row: RentalRequestRow) -> Result<Self, Self::Error> {
        let property_types = row
            .property_types
            .iter()
            .map(|t| t.parse::<PropertyType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(RentalRequest {
            id: row.id,
            user_id: row.user_id,
            purpose: row.purpose,
            property_types,
            location: LocationPreference {
                flexible: row.location_flexible,
                cities: row.cities,
                districts: row.districts,
            },
            budget: Budget {
                min: row.budget_min,
                max: row.budget_max,
                currency: row.currency,
                frequency: row.frequency,
            },
            requirements: Requirements {
                bedrooms: Range { min: row.bedrooms_min, max: row.bedrooms_max },
                bathrooms: Range { min: row.bathrooms_min, max: row.bathrooms_max },
                area_sqft: Range { min: row.area_min, max: row.area_max },
            },
            amenities: row.amenities,
            has_pets: row.has_pets,
            move_in_date: row.move_in_date,
            status: row.status,
            matched_properties: row.matched_properties,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn property_type_tags(types: &[PropertyType]) -> Vec<String> {
    types.iter().map(|t| t.as_str().to_string()).collect()
}

#[async_trait]
pub trait RentalRequestExt: Send + Sync {
    async fn create_rental_request(
        &self,
        user_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error>;

    async fn get_rental_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<RentalRequest>, sqlx::Error>;

    async fn get_rental_requests_by_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RentalRequest>, sqlx::Error>;

    /// Active and matched requests for one purpose whose budget is quoted
    /// at `frequency`, oldest first.
    async fn get_open_rental_requests(
        &self,
        purpose: Purpose,
        frequency: RentFrequency,
    ) -> Result<Vec<RentalRequest>, sqlx::Error>;

    async fn update_rental_request_criteria(
        &self,
        request_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error>;

    /// Replaces the matched set wholesale together with the status, but only
    /// while the stored status is still `expected`. `None` means the row
    /// moved on (or is gone) and nothing was written.
    async fn save_match_result(
        &self,
        request_id: Uuid,
        matched_properties: &[Uuid],
        expected: RequestStatus,
        status: RequestStatus,
    ) -> Result<Option<RentalRequest>, sqlx::Error>;

    async fn update_rental_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<RentalRequest, sqlx::Error>;
}

#[async_trait]
impl RentalRequestExt for DBClient {
    async fn create_rental_request(
        &self,
        user_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error> {
        let req = &criteria.requirements;
        let row = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            INSERT INTO rental_requests (
                id, user_id, purpose, property_types,
                location_flexible, cities, districts,
                budget_min, budget_max, currency, frequency,
                bedrooms_min, bedrooms_max, bathrooms_min, bathrooms_max, area_min, area_max,
                amenities, has_pets, move_in_date,
                status, matched_properties
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, '{{}}')
            RETURNING {}
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(criteria.purpose)
        .bind(property_type_tags(&criteria.property_types))
        .bind(criteria.location.flexible)
        .bind(&criteria.location.cities)
        .bind(&criteria.location.districts)
        .bind(criteria.budget.min)
        .bind(criteria.budget.max)
        .bind(&criteria.budget.currency)
        .bind(criteria.budget.frequency)
        .bind(req.bedrooms.min)
        .bind(req.bedrooms.max)
        .bind(req.bathrooms.min)
        .bind(req.bathrooms.max)
        .bind(req.area_sqft.min)
        .bind(req.area_sqft.max)
        .bind(&criteria.amenities)
        .bind(criteria.has_pets)
        .bind(criteria.move_in_date)
        .bind(RequestStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        RentalRequest::try_from(row)
    }

    async fn get_rental_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<RentalRequest>, sqlx::Error> {
        let row = sqlx::query_as::<_, RentalRequestRow>(&format!(
            "SELECT {} FROM rental_requests WHERE id = $1",
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RentalRequest::try_from).transpose()
    }

    async fn get_rental_requests_by_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RentalRequest>, sqlx::Error> {
        let offset = (page.saturating_sub(1)) * limit as u32;

        let rows = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            SELECT {} FROM rental_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RentalRequest::try_from).collect()
    }

    async fn get_open_rental_requests(
        &self,
        purpose: Purpose,
        frequency: RentFrequency,
    ) -> Result<Vec<RentalRequest>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            SELECT {} FROM rental_requests
            WHERE purpose = $1 AND frequency = $2 AND (status = $3 OR status = $4)
            ORDER BY created_at ASC, id ASC
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(purpose)
        .bind(frequency)
        .bind(RequestStatus::Active)
        .bind(RequestStatus::Matched)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RentalRequest::try_from).collect()
    }

    async fn update_rental_request_criteria(
        &self,
        request_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<RentalRequest, sqlx::Error> {
        let req = &criteria.requirements;
        let row = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            UPDATE rental_requests
            SET purpose = $1, property_types = $2,
                location_flexible = $3, cities = $4, districts = $5,
                budget_min = $6, budget_max = $7, currency = $8, frequency = $9,
                bedrooms_min = $10, bedrooms_max = $11,
                bathrooms_min = $12, bathrooms_max = $13,
                area_min = $14, area_max = $15,
                amenities = $16, has_pets = $17, move_in_date = $18,
                updated_at = NOW()
            WHERE id = $19
            RETURNING {}
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(criteria.purpose)
        .bind(property_type_tags(&criteria.property_types))
        .bind(criteria.location.flexible)
        .bind(&criteria.location.cities)
        .bind(&criteria.location.districts)
        .bind(criteria.budget.min)
        .bind(criteria.budget.max)
        .bind(&criteria.budget.currency)
        .bind(criteria.budget.frequency)
        .bind(req.bedrooms.min)
        .bind(req.bedrooms.max)
        .bind(req.bathrooms.min)
        .bind(req.bathrooms.max)
        .bind(req.area_sqft.min)
        .bind(req.area_sqft.max)
        .bind(&criteria.amenities)
        .bind(criteria.has_pets)
        .bind(criteria.move_in_date)
        .bind(request_id)
        .fetch_one(&self.pool)
        .await?;

        RentalRequest::try_from(row)
    }

    async fn save_match_result(
        &self,
        request_id: Uuid,
        matched_properties: &[Uuid],
        expected: RequestStatus,
        status: RequestStatus,
    ) -> Result<Option<RentalRequest>, sqlx::Error> {
        let row = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            UPDATE rental_requests
            SET matched_properties = $1, status = $2, updated_at = NOW()
            WHERE id = $3 AND status = $4
            RETURNING {}
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(matched_properties)
        .bind(status)
        .bind(request_id)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RentalRequest::try_from).transpose()
    }

    async fn update_rental_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<RentalRequest, sqlx::Error> {
        let row = sqlx::query_as::<_, RentalRequestRow>(&format!(
            r#"
            UPDATE rental_requests
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            RENTAL_REQUEST_COLUMNS
        ))
        .bind(status)
        .bind(request_id)
        .fetch_one(&self.pool)
        .await?;

        RentalRequest::try_from(row)
    }
}
