pub mod db;
pub mod propertydb;
pub mod rentalrequestdb;

#[cfg(test)]
pub mod memory;
