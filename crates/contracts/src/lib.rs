//! Shared domain contracts for the bakehouse back office.
//!
//! Everything the backend persists or serves over HTTP is declared here:
//! aggregate types, dashboard DTOs and the system auth/user types.

pub mod dashboards;
pub mod domain;
pub mod system;
