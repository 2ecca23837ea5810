pub mod api;
pub mod document;
pub mod payroll;
pub mod verification;
