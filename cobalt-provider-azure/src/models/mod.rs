//! ARM wire models
//!
//! Request and response bodies, one module per resource provider namespace.
//! JSON field names and optional-ness are bit-exact with the ARM REST
//! contract; optional struct fields signal presence or absence in JSON and
//! are never serialized when unset.

pub mod authorization;
pub mod containerservice;
pub mod keyvault;
pub mod netapp;
pub mod resources;
