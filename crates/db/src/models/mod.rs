//! Row models and DTOs, one module per table.

pub mod patient;
pub mod report;
pub mod treatment;
pub mod user;
pub mod wound;
pub mod wound_image;
