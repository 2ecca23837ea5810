pub mod collaborator;
pub mod detection;
pub mod extraction;
pub mod fixtures;
pub mod identifiers;
pub mod period;
pub mod pipeline;
pub mod rendering;
pub mod validation;
