//! The endless verse loop and its cooperative shutdown

pub mod runner;
pub mod selector;
pub mod shutdown;

pub use runner::{Session, SessionReport};
pub use selector::{pick_ayah, pick_verse, VerseChoice};
pub use shutdown::{SessionState, ShutdownToken};
