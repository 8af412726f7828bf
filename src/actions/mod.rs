pub mod catalog;

pub use catalog::{ActionCategory, ActionDescriptor, ActionId, Capability};
