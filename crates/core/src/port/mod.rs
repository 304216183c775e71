// Port Layer - Interfaces for external dependencies

pub mod credentials;
pub mod id_provider; // For deterministic testing
pub mod notifier;
pub mod time_provider;

// Re-exports
pub use credentials::{CredentialCheck, StaticCredentials};
pub use id_provider::{IdProvider, SequentialIdProvider, UuidProvider};
pub use notifier::{Notice, Notifier, TracingNotifier};
pub use time_provider::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
