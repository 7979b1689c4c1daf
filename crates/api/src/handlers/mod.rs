pub mod auth;
pub mod images;
pub mod patients;
pub mod reports;
pub mod treatments;
pub mod users;
pub mod wounds;
