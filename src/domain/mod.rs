pub mod batch;
pub mod country_profile;
pub mod error;
pub mod paystub;

// CSV row types
pub mod csv;
