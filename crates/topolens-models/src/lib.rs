#![deny(missing_docs)]

//! # Topolens Models
//!
//! Core data types for the topolens enterprise-topology backend.
//!
//! ## Snapshot structure
//!
//! ```text
//! TopologyGraph
//! ├── nodes: Vec<SubsystemNode>        (client, adaptors, portal, server, dataStore)
//! │   └── info: NodeInfo               (typed per-subsystem projection)
//! │       └── DataStores(Vec<DataStoreItem>)
//! ├── edges: Vec<Connection>           (declared relationships + health status)
//! └── timestamp
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`credential`] | Session-bound OAuth2 credential and expiry checks |
//! | [`node`] | `SubsystemNode`, node kinds and typed info projections |
//! | [`datastore`] | Registered data-store items and their store types |
//! | [`edge`] | Edge status, `Connection`, structural edge builder |
//! | [`graph`] | The per-request `TopologyGraph` snapshot |
//! | [`logs`] | Upstream log records and paginated log pages |

pub mod credential;
pub mod datastore;
pub mod edge;
pub mod error;
pub mod graph;
pub mod logs;
pub mod node;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `topolens_models::Credential` directly.
pub use credential::*;
pub use datastore::*;
pub use edge::*;
pub use error::*;
pub use graph::*;
pub use logs::*;
pub use node::*;
