//! Lifecycle orchestration: validation → optimization → persistence, draft → final.

pub mod session;

pub use session::{Session, SessionError, SessionState};
