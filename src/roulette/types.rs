use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session mode. Testing unlocks deterministic overrides (explicit starting
/// balance, explicit winning number) for reproducible verification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Normal,
    Testing,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Normal => write!(f, "normal"),
            GameMode::Testing => write!(f, "testing"),
        }
    }
}

/// Parity categories for even-money bets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Whether a non-zero pocket matches this parity. Zero is handled by the
    /// evaluator: it counts as neither even nor odd, as on a real table.
    pub fn matches(&self, pocket: u8) -> bool {
        match self {
            Parity::Even => pocket % 2 == 0,
            Parity::Odd => pocket % 2 == 1,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

/// What a bet is placed on (discriminated union)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "bet", content = "on", rename_all = "lowercase")]
pub enum BetKind {
    /// Single pocket, 36x net payout.
    Straight(u8),
    /// Even/odd, 2x net payout.
    Parity(Parity),
}

/// One wager within a spin request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bet {
    pub kind: BetKind,
    /// Amount staked. Must be positive; the engine rejects zero-amount bets.
    pub amount: u64,
}

impl Bet {
    pub fn straight(pocket: u8, amount: u64) -> Self {
        Self {
            kind: BetKind::Straight(pocket),
            amount,
        }
    }

    pub fn parity(parity: Parity, amount: u64) -> Self {
        Self {
            kind: BetKind::Parity(parity),
            amount,
        }
    }
}

/// Input to a settlement: one or more bets evaluated against one winning number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinRequest {
    pub user_id: u64,
    pub bets: Vec<Bet>,
    pub game_mode: GameMode,
    /// Deterministic override, honored only in testing mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_number: Option<u8>,
}

/// One user's active betting session. Owned by the session store; the engine
/// re-fetches the current version on every operation and holds no long-lived
/// in-memory copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    pub user_id: u64,
    /// Non-negative currency amount, floored at zero on every update.
    pub balance: u64,
    pub game_mode: GameMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(user_id: u64, balance: u64, game_mode: GameMode) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance,
            game_mode,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Whether a settled bet pays the player or takes the stake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutDirection {
    Credit,
    Debit,
}

/// Outcome of one bet against one winning number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetOutcome {
    pub bet: Bet,
    pub direction: PayoutDirection,
    pub amount: u64,
}

impl BetOutcome {
    pub fn credit(bet: Bet, amount: u64) -> Self {
        Self {
            bet,
            direction: PayoutDirection::Credit,
            amount,
        }
    }

    pub fn debit(bet: Bet, amount: u64) -> Self {
        Self {
            bet,
            direction: PayoutDirection::Debit,
            amount,
        }
    }
}

/// Result of a settled (or previewed) spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinSettlement {
    pub spin_id: Uuid,
    pub winning_number: u8,
    /// Signed sum of all per-bet credits minus debits.
    pub net_payout: i64,
    pub outcomes: Vec<BetOutcome>,
    pub session: GameSession,
}
