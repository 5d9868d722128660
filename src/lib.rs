//! Croupier - Stateful Roulette Betting Session Engine
//!
//! Maintains one betting session per user (balance and mode), validates spin
//! requests against the session balance, evaluates bets against a winning
//! number, and settles payouts through a two-phase preview/commit contract.
//! Persistence lives behind the [`store::SessionStore`] trait; the HTTP layer
//! and token verification are external collaborators.

pub mod claims;
pub mod config;
pub mod engine;
pub mod errors;
pub mod roulette;
pub mod store;

pub use claims::{resolve_starting_balance, ClaimSource, NoClaims, TokenClaims};
pub use config::{ConfigError, ConfigLoader, EngineConfig};
pub use engine::{SessionEngine, SessionInit};
pub use errors::{EngineError, EngineResult};
pub use roulette::types::{
    Bet, BetKind, BetOutcome, GameMode, GameSession, Parity, PayoutDirection, SpinRequest,
    SpinSettlement,
};
pub use roulette::wheel::{RandomWheel, WinningNumberSource};
pub use store::{MemorySessionStore, SessionStore, StoreError};
