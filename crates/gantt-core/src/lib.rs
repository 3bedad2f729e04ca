pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod projector;
pub mod record;
pub mod reference;
pub mod store;
pub mod timeline;
pub mod view;

pub use config::ResolvedFields;
pub use dashboard::{aggregate, resolve_fields, Dashboard};
pub use error::{GanttError, Result};
