pub mod propertymodel;
pub mod rentalrequestmodel;
