//! Topolens backend — reconstructs a live topology of a federated
//! enterprise deployment and annotates each edge with connection health.
//!
//! The request pipeline:
//!
//! 1. The session extractor runs the token lifecycle manager
//!    ([`auth::ensure_valid`]) so every handler starts with a valid
//!    credential.
//! 2. The metadata aggregator ([`aggregator`]) fans out to the portal and
//!    server admin APIs to build per-node metadata, tolerating partial
//!    failures.
//! 3. The connection-health validator ([`validator`]) probes the
//!    portal↔server federation and the server↔dataStore relationship.
//! 4. The topology assembler ([`topology`]) composes nodes, edges and a
//!    timestamp into one snapshot.
//!
//! Degradation is the central contract: a missing node or an `Error` edge is
//! a successful response with diagnostic content, never an HTTP failure.

pub mod aggregator;
pub mod auth;
pub mod config;
pub mod enterprise;
pub mod error;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;
pub mod topology;
pub mod validator;

pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;
