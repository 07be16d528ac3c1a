//! Command implementations for the qttt CLI

pub mod evaluate;
pub mod play;
pub mod train;
