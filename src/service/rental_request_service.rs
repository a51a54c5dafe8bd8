// service/rental_request_service.rs
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::rentalrequestdb::RentalRequestExt,
    dtos::rentalrequestdtos::{CreateRentalRequestDto, RentalRequestCriteriaDto},
    models::rentalrequestmodel::{RentalRequest, RequestStatus},
    service::{
        error::ServiceError,
        matching_service::{MatchingService, PropertyMatch},
    },
};

/// Request lifecycle: submission, edits and status changes. Every
/// submission and edit ends in a full rematch.
#[derive(Clone)]
pub struct RentalRequestService {
    requests: Arc<dyn RentalRequestExt>,
    matching: Arc<MatchingService>,
}

impl std::fmt::Debug for RentalRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RentalRequestService")
            .field("matching", &self.matching)
            .finish()
    }
}

impl RentalRequestService {
    pub fn new(requests: Arc<dyn RentalRequestExt>, matching: Arc<MatchingService>) -> Self {
        Self { requests, matching }
    }

    pub async fn create_request(
        &self,
        body: CreateRentalRequestDto,
    ) -> Result<(RentalRequest, Vec<PropertyMatch>), ServiceError> {
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let request = self
            .requests
            .create_rental_request(body.user_id, body.criteria)
            .await?;

        tracing::info!(
            "Rental request {} created for user {}",
            request.id,
            request.user_id
        );

        let request_id = request.id;
        self.matching.rematch_request(request).await.map_err(|e| {
            tracing::error!(
                "Rental request {} was stored but its first match failed: {}",
                request_id,
                e
            );
            e
        })
    }

    pub async fn get_request(&self, request_id: Uuid) -> Result<RentalRequest, ServiceError> {
        self.requests
            .get_rental_request(request_id)
            .await?
            .ok_or(ServiceError::RentalRequestNotFound(request_id))
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RentalRequest>, ServiceError> {
        Ok(self
            .requests
            .get_rental_requests_by_user(user_id, page, limit)
            .await?)
    }

    /// Replaces the criteria of an open request and rescans the catalog.
    pub async fn update_request(
        &self,
        request_id: Uuid,
        criteria: RentalRequestCriteriaDto,
    ) -> Result<(RentalRequest, Vec<PropertyMatch>), ServiceError> {
        criteria
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let current = self.get_request(request_id).await?;
        if !current.status.is_open() {
            return Err(ServiceError::RequestClosed(request_id));
        }

        let updated = self
            .requests
            .update_rental_request_criteria(request_id, criteria)
            .await?;

        self.matching.rematch_request(updated).await
    }

    /// Soft delete. Cancelling twice is a no-op.
    pub async fn cancel_request(&self, request_id: Uuid) -> Result<RentalRequest, ServiceError> {
        self.transition(request_id, RequestStatus::Cancelled).await
    }

    pub async fn mark_fulfilled(&self, request_id: Uuid) -> Result<RentalRequest, ServiceError> {
        self.transition(request_id, RequestStatus::Fulfilled).await
    }

    async fn transition(
        &self,
        request_id: Uuid,
        next: RequestStatus,
    ) -> Result<RentalRequest, ServiceError> {
        let current = self.get_request(request_id).await?;

        if !current.status.can_transition_to(next) {
            return Err(ServiceError::InvalidStatusTransition {
                id: request_id,
                from: current.status,
                to: next,
            });
        }

        if current.status == next {
            return Ok(current);
        }

        let updated = self
            .requests
            .update_rental_request_status(request_id, next)
            .await?;

        tracing::info!(
            "Rental request {} status {} -> {}",
            request_id,
            current.status.to_str(),
            next.to_str()
        );

        Ok(updated)
    }
}
