//! Payslip verification service
//!
//! Extracts payroll fields from an uploaded payslip through a document
//! extraction vendor, checks the image for AI generation, and runs local
//! consistency rules over the extracted data.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
