//! One module per resource kind; each function is a direct handler.

pub mod configmaps;
pub mod deployments;
pub mod discovery;
pub mod endpoints;
pub mod leases;
pub mod namespaces;
pub mod pods;
pub mod secrets;
pub mod services;
