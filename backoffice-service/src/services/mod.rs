//! Services layer: user administration and access control orchestration
//! over the store traits.

mod access;
pub mod error;
mod users;

pub use access::AccessControlService;
pub use error::{EntryFailure, ServiceError};
pub use users::{UserAdminService, LOCKOUT_DAYS};
