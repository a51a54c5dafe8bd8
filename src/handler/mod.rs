pub mod hosts;
pub mod rental_requests;
