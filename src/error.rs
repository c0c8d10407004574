use thiserror::Error;

/// Rejected session commands. Nothing changes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("target word is empty")]
    InvalidTarget,
}

/// Why a letter attempt (or the final hold) ended in a full reset.
///
/// The `Display` text is what the player sees in the failure alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("memory sequence error")]
    SequenceMismatch,
    #[error("synchronization error")]
    SynchronizationError,
    #[error("timeout")]
    RhythmTimeout,
    #[error("process aborted prematurely")]
    ConfirmationAborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_player_facing_text() {
        assert_eq!(FailureReason::SequenceMismatch.to_string(), "memory sequence error");
        assert_eq!(FailureReason::SynchronizationError.to_string(), "synchronization error");
        assert_eq!(FailureReason::RhythmTimeout.to_string(), "timeout");
        assert_eq!(
            FailureReason::ConfirmationAborted.to_string(),
            "process aborted prematurely"
        );
    }
}
