//! Descriptor resolution: download URLs and destination paths.
//!
//! Both resolvers return [`Resolution`](crate::types::Resolution) instead of
//! failing, so one bad descriptor never aborts a run.

mod path;
mod url;

pub use path::{PathResolver, collision_safe_target};
pub use url::{EndpointRoute, UrlResolver};
