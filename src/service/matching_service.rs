// services/matching_service.rs
use std::{collections::HashMap, str::FromStr, sync::Arc};

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{propertydb::PropertyExt, rentalrequestdb::RentalRequestExt},
    dtos::rentalrequestdtos::PropertySummaryDto,
    models::{
        propertymodel::{Property, Purpose, RentFrequency},
        rentalrequestmodel::{RentalRequest, RequestStatus},
    },
    service::{
        error::ServiceError,
        query_builder::build_catalog_filter,
        scoring::{score_pair_budget_and_type, score_property, MatchDetails, MATCH_THRESHOLD},
    },
};

/// How deep the host-side pair check scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairCheckMode {
    /// Budget and type only, as the host view has always scored.
    #[default]
    Legacy,
    /// Same component set as the bulk matcher.
    Full,
}

impl FromStr for PairCheckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(PairCheckMode::Legacy),
            "full" => Ok(PairCheckMode::Full),
            other => Err(format!("Unknown pair check mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Upper bound on candidates pulled from the catalog per request.
    pub candidate_limit: i64,
    pub pair_check_mode: PairCheckMode,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 500,
            pair_check_mode: PairCheckMode::Legacy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyMatch {
    pub property: Property,
    pub score: i32,
    pub match_details: MatchDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairCheck {
    pub matches: bool,
    pub score: i32,
    pub details: MatchDetails,
}

#[derive(Debug, Serialize)]
pub struct RequestMatch {
    pub request: RentalRequest,
    pub score: i32,
    pub details: MatchDetails,
}

#[derive(Debug, Serialize)]
pub struct HostPropertyMatches {
    pub property: PropertySummaryDto,
    pub matching_requests: Vec<RequestMatch>,
}

/// Overwrites the request's matched set with `matches` and promotes an
/// active request to matched when anything cleared the threshold.
/// Returns whether the status changed. Matched is never demoted.
pub fn apply_match_result(request: &mut RentalRequest, matches: &[PropertyMatch]) -> bool {
    request.matched_properties = matches.iter().map(|m| m.property.id).collect();

    if !request.matched_properties.is_empty() && request.status == RequestStatus::Active {
        request.status = RequestStatus::Matched;
        return true;
    }
    false
}

#[derive(Clone)]
pub struct MatchingService {
    properties: Arc<dyn PropertyExt>,
    requests: Arc<dyn RentalRequestExt>,
    config: MatchingConfig,
}

impl std::fmt::Debug for MatchingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingService")
            .field("config", &self.config)
            .finish()
    }
}

impl MatchingService {
    pub fn new(
        properties: Arc<dyn PropertyExt>,
        requests: Arc<dyn RentalRequestExt>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            properties,
            requests,
            config,
        }
    }

    /// Ranked properties for one request. Budget failures are dropped,
    /// survivors below the threshold are dropped, ties keep catalog order.
    pub async fn find_matches(
        &self,
        request: &RentalRequest,
    ) -> Result<Vec<PropertyMatch>, ServiceError> {
        let filter = build_catalog_filter(request);
        let candidates = self
            .properties
            .query_catalog(&filter, self.config.candidate_limit)
            .await?;

        if candidates.len() as i64 >= self.config.candidate_limit {
            tracing::warn!(
                "Candidate limit {} reached for rental request {}; catalog truncated",
                self.config.candidate_limit,
                request.id
            );
        }

        let candidate_count = candidates.len();

        let mut matches: Vec<PropertyMatch> = candidates
            .into_iter()
            .filter_map(|property| {
                let card = score_property(&property, request)?;
                card.is_match().then(|| PropertyMatch {
                    property,
                    score: card.score,
                    match_details: card.details,
                })
            })
            .collect();

        // Stable: equal scores stay in catalog order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Rental request {}: {} candidates, {} matches",
            request.id,
            candidate_count,
            matches.len()
        );

        Ok(matches)
    }

    /// Scores one property against one request without touching the catalog.
    pub fn check_match(&self, property: &Property, request: &RentalRequest) -> PairCheck {
        let card = match self.config.pair_check_mode {
            PairCheckMode::Legacy => score_pair_budget_and_type(property, request),
            PairCheckMode::Full => score_property(property, request),
        };

        match card {
            Some(card) => PairCheck {
                matches: card.score >= MATCH_THRESHOLD,
                score: card.score,
                details: card.details,
            },
            None => PairCheck {
                matches: false,
                score: 0,
                details: MatchDetails {
                    partial: self.config.pair_check_mode == PairCheckMode::Legacy,
                    ..Default::default()
                },
            },
        }
    }

    /// Full rescan for a request, then persists the new matched set and
    /// any status promotion. The write only lands if the stored status is
    /// still the one the promotion was decided from; otherwise the request
    /// is re-read and the result applied again. Status only moves forward,
    /// so this settles within a few rounds.
    pub async fn rematch_request(
        &self,
        mut request: RentalRequest,
    ) -> Result<(RentalRequest, Vec<PropertyMatch>), ServiceError> {
        let request_id = request.id;
        let matches = self.find_matches(&request).await?;

        loop {
            let expected = request.status;
            let promoted = apply_match_result(&mut request, &matches);

            let saved = self
                .requests
                .save_match_result(
                    request_id,
                    &request.matched_properties,
                    expected,
                    request.status,
                )
                .await?;

            if let Some(saved) = saved {
                tracing::info!(
                    "Rematched rental request {}: {} properties{}",
                    saved.id,
                    saved.matched_properties.len(),
                    if promoted { ", status -> matched" } else { "" }
                );
                return Ok((saved, matches));
            }

            tracing::debug!(
                "Rental request {} left {:?} during rematch; reapplying",
                request_id,
                expected
            );

            request = self
                .requests
                .get_rental_request(request_id)
                .await?
                .ok_or(ServiceError::RentalRequestNotFound(request_id))?;
        }
    }

    /// Current ranked matches for a stored request. Nothing is written back.
    pub async fn matches_for_request(
        &self,
        request_id: Uuid,
    ) -> Result<(RentalRequest, Vec<PropertyMatch>), ServiceError> {
        let request = self
            .requests
            .get_rental_request(request_id)
            .await?
            .ok_or(ServiceError::RentalRequestNotFound(request_id))?;

        let matches = self.find_matches(&request).await?;
        Ok((request, matches))
    }

    pub async fn check_pair_by_ids(
        &self,
        property_id: Uuid,
        request_id: Uuid,
    ) -> Result<PairCheck, ServiceError> {
        let property = self
            .properties
            .get_property_by_id(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;

        let request = self
            .requests
            .get_rental_request(request_id)
            .await?
            .ok_or(ServiceError::RentalRequestNotFound(request_id))?;

        Ok(self.check_match(&property, &request))
    }

    /// Inverse direction: open requests that fit each of a host's active
    /// properties. Properties with no fitting request are left out.
    pub async fn find_requests_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<HostPropertyMatches>, ServiceError> {
        let properties = self.properties.get_active_properties_by_host(host_id).await?;

        let mut open_requests: HashMap<(Purpose, RentFrequency), Vec<RentalRequest>> =
            HashMap::new();
        let mut results = Vec::new();
        for property in properties {
            // A budget is always quoted per period; unpriced listings fit nobody
            let Some(frequency) = property.rent_frequency else {
                continue;
            };

            let key = (property.purpose, frequency);
            if !open_requests.contains_key(&key) {
                let fetched = self
                    .requests
                    .get_open_rental_requests(property.purpose, frequency)
                    .await?;
                open_requests.insert(key, fetched);
            }
            let candidates = open_requests.get(&key).map(Vec::as_slice).unwrap_or_default();

            let mut matching_requests: Vec<RequestMatch> = candidates
                .iter()
                .filter_map(|request| {
                    let check = self.check_match(&property, request);
                    check.matches.then(|| RequestMatch {
                        request: request.clone(),
                        score: check.score,
                        details: check.details,
                    })
                })
                .collect();

            if matching_requests.is_empty() {
                continue;
            }

            matching_requests.sort_by(|a, b| b.score.cmp(&a.score));

            results.push(HostPropertyMatches {
                property: PropertySummaryDto::from_property(&property),
                matching_requests,
            });
        }

        tracing::debug!(
            "Host {}: {} properties with matching requests",
            host_id,
            results.len()
        );

        Ok(results)
    }
}
