pub mod rentalrequestdtos;
