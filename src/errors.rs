//! Error taxonomy for the session engine.
//!
//! All failures are returned as explicit result values to the caller layer.
//! Store failures propagate; a missing session is never silently defaulted
//! to a zero-balance session. "Already initialized" is deliberately absent
//! here: it is the informational arm of [`crate::engine::SessionInit`],
//! not an error.

use crate::store::StoreError;

/// Rejections and faults surfaced by session engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request referenced a user with no active session.
    #[error("no active game session for user {user_id}")]
    SessionNotFound { user_id: u64 },

    /// Total staked exceeds the session's current balance; the spin is
    /// rejected with no state change.
    #[error("not enough balance: {staked} staked against a balance of {balance}")]
    InsufficientBalance { staked: u64, balance: u64 },

    /// A spin request must carry at least one bet.
    #[error("spin request contains no bets")]
    EmptyBetList,

    #[error("spin request contains {count} bets, limit is {max}")]
    TooManyBets { count: usize, max: usize },

    #[error("invalid bet: {0}")]
    InvalidBet(String),

    /// A testing-mode override pointed outside the wheel domain.
    #[error("winning number {0} is outside the wheel domain (0-36)")]
    InvalidWinningNumber(u8),

    /// Infrastructure failure in the session store, propagated as-is.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_human_readable() {
        let not_found = EngineError::SessionNotFound { user_id: 42 };
        assert!(not_found.to_string().contains("user 42"));

        let broke = EngineError::InsufficientBalance {
            staked: 50,
            balance: 10,
        };
        assert!(broke.to_string().contains("50 staked"));
        assert!(broke.to_string().contains("balance of 10"));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Unavailable("connection refused".to_string());
        let engine_err: EngineError = store_err.into();
        assert!(matches!(engine_err, EngineError::Store(_)));
        assert!(engine_err.to_string().contains("connection refused"));
    }
}
