//! BDD step definitions for roomwatch

pub mod cycle_steps;
pub mod notification_steps;
