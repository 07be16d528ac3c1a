//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the domain layer and infrastructure.
//! Agents, observers and value-table storage are all plugged in through these
//! traits so the training loop never depends on a concrete front end or format.

pub mod agent;
pub mod observer;
pub mod repository;

pub use agent::Agent;
pub use observer::{MoveEvent, Observer};
pub use repository::ValueTableRepository;
