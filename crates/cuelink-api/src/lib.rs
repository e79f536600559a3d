//! Async client for the Arista CV-CUE wireless manager REST API.
//!
//! Authenticates with API-key credentials, caches the session cookies on
//! disk so re-runs skip the login round-trip, and exposes the managed
//! device (access point) listing with structured filters and automatic
//! pagination.

pub mod client;
pub mod devices;
pub mod error;
pub mod filter;
pub mod session;
pub mod transport;

pub use client::{CueClient, Credentials, SESSION_COOKIE};
pub use devices::{Ap, ApPage, GetAllApsParams, ListApsParams, ManagedDevices};
pub use error::Error;
pub use filter::{Filter, FilterBuilder, FilterOperator, LogicalOperator};
pub use session::{DEFAULT_SESSION_FILE, SessionState, SessionStore};
pub use transport::TransportConfig;
