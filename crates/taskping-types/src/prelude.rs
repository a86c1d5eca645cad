pub use crate::error::{Error, TpResult};
pub use crate::types::unix_now;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
