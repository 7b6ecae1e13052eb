// Signal constructors
pub mod builders;

// Run timestamps
pub mod clock;

// Ad-hoc event assembly
pub mod custom_event;

// Run orchestrator
pub mod dispatcher;

// Wiring from configuration
pub mod system;
