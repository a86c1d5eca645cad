pub use crate::{App, Notifier};
pub use taskping_types::prelude::*;

// vim: ts=4
