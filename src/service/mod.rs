pub mod error;
pub mod matching_service;
pub mod query_builder;
pub mod rental_request_service;
pub mod scoring;
