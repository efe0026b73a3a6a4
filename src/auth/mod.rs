//! Authentication: claims decoding and the session state holder.

pub mod claims;
pub mod session;

pub use claims::{Claims, ClaimsError};
pub use session::{SessionError, SessionHolder, SessionInvalidator};
