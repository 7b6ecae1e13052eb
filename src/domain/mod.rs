// Contextual attributes
pub mod attributes;

// Source document facts
pub mod profile;

// Signal payload shapes
pub mod signals;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
