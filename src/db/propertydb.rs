use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::propertymodel::{Property, PropertyStatus, PropertyType, Purpose, RentFrequency},
};

const PROPERTY_COLUMNS: &str = r#"
    id, host_id, title,
    status, purpose, property_type,
    price, currency, rent_frequency,
    city, district,
    bedrooms, bathrooms, area_sqft, amenities,
    pets_allowed, available_immediately, available_from,
    created_at, updated_at
"#;

/// Coarse OR-prefilter on city/district. Only present when at least one
/// list is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFilter {
    pub cities: Vec<String>,
    pub districts: Vec<String>,
}

/// Catalog-side narrowing for one rental request. The scorer re-checks
/// location, so this only needs to never drop a property the scorer
/// would keep.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCatalogFilter {
    pub status: PropertyStatus,
    pub purpose: Purpose,
    pub property_types: Vec<PropertyType>,
    pub location: Option<LocationFilter>,
    pub rent_frequency: Option<RentFrequency>,
}

/// Full candidate SELECT for `filter`, oldest listing first, capped at `limit`.
pub fn catalog_query<'args>(
    filter: &PropertyCatalogFilter,
    limit: i64,
) -> QueryBuilder<'args, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM properties WHERE status = ", PROPERTY_COLUMNS));
    query.push_bind(filter.status);

    query.push(" AND purpose = ");
    query.push_bind(filter.purpose);

    if !filter.property_types.is_empty() {
        let types: Vec<String> = filter
            .property_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        query.push(" AND property_type::text = ANY(");
        query.push_bind(types);
        query.push(")");
    }

    if let Some(location) = &filter.location {
        query.push(" AND (");
        let mut first = true;
        if !location.cities.is_empty() {
            query.push("city = ANY(");
            query.push_bind(location.cities.clone());
            query.push(")");
            first = false;
        }
        if !location.districts.is_empty() {
            if !first {
                query.push(" OR ");
            }
            query.push("district = ANY(");
            query.push_bind(location.districts.clone());
            query.push(")");
        }
        query.push(")");
    }

    if let Some(freq) = filter.rent_frequency {
        query.push(" AND rent_frequency = ");
        query.push_bind(freq);
    }

    query.push(" ORDER BY created_at ASC, id ASC LIMIT ");
    query.push_bind(limit);

    query
}

#[async_trait]
pub trait PropertyExt: Send + Sync {
    /// Candidates for a request, in catalog order (oldest listing first).
    async fn query_catalog(
        &self,
        filter: &PropertyCatalogFilter,
        limit: i64,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn get_active_properties_by_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn query_catalog(
        &self,
        filter: &PropertyCatalogFilter,
        limit: i64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let mut query = catalog_query(filter, limit);

        let properties = query
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {} FROM properties WHERE id = $1",
            PROPERTY_COLUMNS
        ))
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn get_active_properties_by_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {} FROM properties WHERE host_id = $1 AND status = $2 ORDER BY created_at ASC, id ASC",
            PROPERTY_COLUMNS
        ))
        .bind(host_id)
        .bind(PropertyStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }
}
