//! Session-based authentication.

mod password;
mod session;
mod traits;
mod types;

pub use password::*;
pub use session::*;
pub use traits::*;
pub use types::*;
