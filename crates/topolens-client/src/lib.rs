//! # Topolens Client
//!
//! Narrow HTTP clients for the external admin REST surface consumed by the
//! topolens backend: the portal's OAuth2 token endpoint, the portal admin
//! API, and the server admin API.
//!
//! Each client covers exactly one subsystem endpoint family and returns a
//! typed result or a typed [`ClientError`]; clients share no mutable state
//! with each other. Every call carries the `f=json` response-format
//! selector, the session's `token` where required, and a bounded timeout.

pub mod error;
pub mod http;
pub mod portal;
pub mod server;
pub mod token;

pub use error::ClientError;
pub use http::build_http_client;
pub use portal::{
    ComponentVersion, FederatedServer, FederationValidation, PortalAdminClient, WebAdaptorEntry,
};
pub use server::{DataItemValidation, ServerAdminClient};
pub use token::{TokenClient, TokenGrant};
