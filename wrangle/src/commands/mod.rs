//! Command implementations

pub mod explore;
pub mod export;
pub mod help;
