//! View sessions: a cache plus its relay wiring.

mod session;

pub use session::{SessionError, SessionResult, ViewSession};
