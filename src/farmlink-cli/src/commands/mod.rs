//! Command handlers for the farmlink CLI

pub mod agent;
pub mod configure;
pub mod inspect;
