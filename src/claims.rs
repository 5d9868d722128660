//! Balance authority: resolves the authoritative starting balance for a
//! session from an already-verified token payload or an explicit test value.
//!
//! Token verification itself is out of scope; this module only consumes a
//! verified claims accessor.

use crate::roulette::types::GameMode;
use serde_json::Value;

/// Accessor over a verified credential payload.
pub trait ClaimSource: Send + Sync {
    /// The signed balance claim, if present and well-formed.
    fn verified_balance(&self) -> Option<u64>;
}

/// Claims extracted from a verified JWT-style payload. Tolerates the balance
/// claim arriving as a JSON number or a numeric string; anything else reads
/// as absent.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    payload: Value,
}

impl TokenClaims {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

impl ClaimSource for TokenClaims {
    fn verified_balance(&self) -> Option<u64> {
        match self.payload.get("balance")? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Empty claim source for callers without a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClaims;

impl ClaimSource for NoClaims {
    fn verified_balance(&self) -> Option<u64> {
        None
    }
}

/// Resolve the starting balance for a new session. Pure function of its
/// inputs: testing mode takes the explicit value (default 0), normal mode
/// takes the verified claim (default 0 if absent or malformed).
pub fn resolve_starting_balance(
    game_mode: GameMode,
    claims: &dyn ClaimSource,
    explicit: Option<u64>,
) -> u64 {
    match game_mode {
        GameMode::Testing => explicit.unwrap_or(0),
        GameMode::Normal => claims.verified_balance().unwrap_or(0),
    }
}
