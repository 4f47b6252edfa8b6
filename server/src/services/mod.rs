//! Service layer

pub mod notifier;

pub use notifier::Notifier;
