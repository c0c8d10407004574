//! Core of the spelling gauntlet: the per-letter session, the four timed
//! mini-challenges, and the final confirmation hold.
//!
//! Nothing in here reads the wall clock or draws anything. Callers pass `now`
//! into every timing-sensitive call and render from the read-only accessors.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use engine::{ChallengeInput, ChallengeKind, ChallengeState, Status};
pub use error::{FailureReason, SessionError};
pub use session::{Phase, Session, SessionEvent};
