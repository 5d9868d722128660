//! Session engine: lifecycle orchestration over the session store.
//!
//! Settlement is a two-phase contract. [`SessionEngine::settle_spin`] is a
//! read-only preview that computes the net payout without persisting anything;
//! [`SessionEngine::apply_balance_update`] is the commit that re-fetches the
//! session, re-validates sufficiency against the current balance, and persists
//! the delta. [`SessionEngine::spin`] runs both phases under one lock for
//! callers that do not need the preview split.
//!
//! All mutations for a given user are mutually exclusive: the engine keeps a
//! per-user async lock held for the duration of each read-modify-write.
//! Operations for different users never contend.

use crate::claims::{resolve_starting_balance, ClaimSource};
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::roulette::evaluator::{evaluate, net_payout, total_staked};
use crate::roulette::types::{
    BetKind, GameMode, GameSession, SpinRequest, SpinSettlement,
};
use crate::roulette::wheel::{RandomWheel, WinningNumberSource, MAX_POCKET};
use crate::store::SessionStore;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of session initialization. Initializing an already-active session
/// is benign: the existing session is reported untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionInit {
    Created { session: GameSession },
    AlreadyInitialized { session: GameSession },
}

impl SessionInit {
    pub fn session(&self) -> &GameSession {
        match self {
            SessionInit::Created { session } => session,
            SessionInit::AlreadyInitialized { session } => session,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, SessionInit::Created { .. })
    }
}

/// Orchestrates per-user betting sessions against a pluggable store.
pub struct SessionEngine<S> {
    store: S,
    wheel: Arc<dyn WinningNumberSource>,
    config: EngineConfig,
    // Lock entries are retained for the engine's lifetime; one Mutex per user
    // ever seen keeps lock identity stable for concurrent waiters.
    user_locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<S: SessionStore> SessionEngine<S> {
    pub fn new(store: S, wheel: Arc<dyn WinningNumberSource>, config: EngineConfig) -> Self {
        Self {
            store,
            wheel,
            config,
            user_locks: DashMap::new(),
        }
    }

    /// Engine with a real wheel and default tunables.
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, Arc::new(RandomWheel::new()), EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn user_lock(&self, user_id: u64) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Create a session for a user unless one already exists. The existing
    /// session's balance is never touched by a repeated initialization.
    pub async fn initialize_session(
        &self,
        balance: u64,
        user_id: u64,
        game_mode: GameMode,
    ) -> EngineResult<SessionInit> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.store.get(user_id).await? {
            debug!(user_id, balance = existing.balance, "session already initialized");
            return Ok(SessionInit::AlreadyInitialized { session: existing });
        }

        let session = GameSession::new(user_id, balance, game_mode);
        self.store.put(&session).await?;
        info!(user_id, balance, mode = %game_mode, "initialized game session");

        Ok(SessionInit::Created { session })
    }

    /// Initialize a session with the balance resolved by the balance
    /// authority: explicit value in testing mode, verified token claim in
    /// normal mode.
    pub async fn initialize_session_from_claims(
        &self,
        user_id: u64,
        game_mode: GameMode,
        claims: &dyn ClaimSource,
        explicit_balance: Option<u64>,
    ) -> EngineResult<SessionInit> {
        let balance = resolve_starting_balance(game_mode, claims, explicit_balance);
        self.initialize_session(balance, user_id, game_mode).await
    }

    /// Current session for a user.
    pub async fn session(&self, user_id: u64) -> EngineResult<GameSession> {
        self.store
            .get(user_id)
            .await?
            .ok_or(EngineError::SessionNotFound { user_id })
    }

    /// Read-only settlement preview. Validates the bet list and balance
    /// sufficiency, draws (or takes the testing override for) the winning
    /// number, and computes the net payout. Persists nothing; the preview
    /// goes stale if another operation mutates the balance before commit.
    ///
    /// The sufficiency check runs before the winning number is determined,
    /// so a rejected spin consumes no randomness.
    pub async fn settle_spin(&self, request: &SpinRequest) -> EngineResult<SpinSettlement> {
        let session = self.session(request.user_id).await?;
        self.validate_bets(request)?;

        let staked = total_staked(&request.bets);
        if staked > session.balance {
            debug!(
                user_id = request.user_id,
                staked,
                balance = session.balance,
                "spin rejected before draw"
            );
            return Err(EngineError::InsufficientBalance {
                staked,
                balance: session.balance,
            });
        }

        let winning_number = self.winning_number_for(request)?;
        let outcomes = evaluate(&request.bets, winning_number);
        let amount = net_payout(&outcomes);

        let settlement = SpinSettlement {
            spin_id: Uuid::new_v4(),
            winning_number,
            net_payout: amount,
            outcomes,
            session,
        };
        debug!(
            user_id = request.user_id,
            spin_id = %settlement.spin_id,
            winning_number,
            net_payout = amount,
            "spin settled (preview)"
        );

        Ok(settlement)
    }

    /// Commit phase: apply a signed balance delta to a user's session.
    ///
    /// Re-fetches the session under the user lock and re-validates that the
    /// request's total stake still fits the current balance, so a preview made
    /// against a stale balance is rejected instead of committed. The stored
    /// balance is floored at zero and is never observably negative.
    pub async fn apply_balance_update(
        &self,
        request: &SpinRequest,
        delta: i64,
    ) -> EngineResult<GameSession> {
        let lock = self.user_lock(request.user_id);
        let _guard = lock.lock().await;
        self.commit_locked(request, delta).await
    }

    /// Preview and commit in one operation under the user lock, leaving no
    /// window for a concurrent mutation between the two phases.
    pub async fn spin(&self, request: &SpinRequest) -> EngineResult<SpinSettlement> {
        let lock = self.user_lock(request.user_id);
        let _guard = lock.lock().await;

        let mut settlement = self.settle_spin(request).await?;
        let updated = self.commit_locked(request, settlement.net_payout).await?;
        settlement.session = updated;

        Ok(settlement)
    }

    /// Delete a user's session. A missing session makes this a no-op.
    pub async fn end_session(&self, user_id: u64) -> EngineResult<()> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        if self.store.get(user_id).await?.is_none() {
            debug!(user_id, "end_session with no active session");
            return Ok(());
        }

        self.store.delete(user_id).await?;
        info!(user_id, "ended game session");
        Ok(())
    }

    // Caller must hold the user lock.
    async fn commit_locked(&self, request: &SpinRequest, delta: i64) -> EngineResult<GameSession> {
        let mut session = self.session(request.user_id).await?;

        let staked = total_staked(&request.bets);
        if staked > session.balance {
            warn!(
                user_id = request.user_id,
                staked,
                balance = session.balance,
                "stale settlement rejected at commit"
            );
            return Err(EngineError::InsufficientBalance {
                staked,
                balance: session.balance,
            });
        }

        // max(0, balance + delta): a session balance is never observably negative.
        session.balance = if delta.is_negative() {
            session.balance.saturating_sub(delta.unsigned_abs())
        } else {
            session.balance.saturating_add(delta as u64)
        };
        session.updated_at = chrono::Utc::now();

        self.store.put(&session).await?;
        info!(
            user_id = request.user_id,
            delta,
            balance = session.balance,
            "balance committed"
        );

        Ok(session)
    }

    fn validate_bets(&self, request: &SpinRequest) -> EngineResult<()> {
        if request.bets.is_empty() {
            return Err(EngineError::EmptyBetList);
        }
        if request.bets.len() > self.config.max_bets_per_spin {
            return Err(EngineError::TooManyBets {
                count: request.bets.len(),
                max: self.config.max_bets_per_spin,
            });
        }

        for bet in &request.bets {
            if bet.amount == 0 {
                return Err(EngineError::InvalidBet(
                    "bet amount must be positive".to_string(),
                ));
            }
            if let BetKind::Straight(pocket) = bet.kind {
                if pocket > MAX_POCKET {
                    return Err(EngineError::InvalidBet(format!(
                        "pocket {} does not exist on the wheel",
                        pocket
                    )));
                }
            }
        }

        Ok(())
    }

    fn winning_number_for(&self, request: &SpinRequest) -> EngineResult<u8> {
        if request.game_mode == GameMode::Testing {
            if let Some(number) = request.winning_number {
                if number > MAX_POCKET {
                    return Err(EngineError::InvalidWinningNumber(number));
                }
                if self.config.allow_testing_overrides {
                    return Ok(number);
                }
                warn!(
                    user_id = request.user_id,
                    number, "testing override ignored by configuration"
                );
            }
        }

        Ok(self.wheel.next_winning_number())
    }
}
