//! Cobalt Core
//!
//! Core library for a declarative infrastructure tool: resources and their
//! attribute values, provider abstraction, schemas, diffing and plan execution.

pub mod config;
pub mod differ;
pub mod effect;
pub mod executor;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;
