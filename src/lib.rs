pub mod config;
pub mod errors;
pub mod events;
pub mod graph;
pub mod resolution;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod uri;
pub mod workspace;

pub use errors::{GraphError, Result};
pub use uri::Uri;
pub use workspace::Workspace;
