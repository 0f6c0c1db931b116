pub mod areas;
pub mod auth;
pub mod customers;
pub mod documents;
pub mod milk_types;
pub mod payments;
pub mod reports;
pub mod sales;
pub mod settings;
