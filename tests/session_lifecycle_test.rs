//! End-to-end session lifecycle and the per-user serialization contract.

use croupier::roulette::wheel::FixedWheel;
use croupier::{
    Bet, EngineConfig, EngineError, GameMode, MemorySessionStore, Parity, SessionEngine,
    SpinRequest, TokenClaims,
};
use std::sync::Arc;

fn engine_landing_on(pocket: u8) -> SessionEngine<MemorySessionStore> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();

    SessionEngine::new(
        MemorySessionStore::new(),
        Arc::new(FixedWheel(pocket)),
        EngineConfig::default(),
    )
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let engine = engine_landing_on(17);

    // Balance comes from a verified token claim in normal mode.
    let claims = TokenClaims::new(serde_json::json!({ "sub": "user-1", "balance": 100 }));
    let init = engine
        .initialize_session_from_claims(1, GameMode::Normal, &claims, None)
        .await
        .unwrap();
    assert!(init.is_new());
    assert_eq!(init.session().balance, 100);

    // Preview, then commit.
    let request = SpinRequest {
        user_id: 1,
        bets: vec![Bet::straight(17, 10), Bet::parity(Parity::Odd, 20)],
        game_mode: GameMode::Normal,
        winning_number: None,
    };
    let settlement = engine.settle_spin(&request).await.unwrap();
    assert_eq!(settlement.winning_number, 17);
    assert_eq!(settlement.net_payout, 360 + 40);
    assert_eq!(engine.session(1).await.unwrap().balance, 100);

    let updated = engine
        .apply_balance_update(&request, settlement.net_payout)
        .await
        .unwrap();
    assert_eq!(updated.balance, 500);

    // End the session; it is gone, and ending again stays a no-op.
    engine.end_session(1).await.unwrap();
    assert!(matches!(
        engine.session(1).await.unwrap_err(),
        EngineError::SessionNotFound { user_id: 1 }
    ));
    engine.end_session(1).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_spins_for_one_user_are_serialized() {
    // Wheel lands on 6; every straight bet on 5 loses its 10-unit stake.
    // Starting from 100, exactly ten spins can succeed; the rest must be
    // rejected, and the balance can never go negative or tear.
    let engine = Arc::new(engine_landing_on(6));
    engine
        .initialize_session(100, 1, GameMode::Normal)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..12 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let request = SpinRequest {
                user_id: 1,
                bets: vec![Bet::straight(5, 10)],
                game_mode: GameMode::Normal,
                winning_number: None,
            };
            engine.spin(&request).await
        }));
    }

    let mut settled = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(settlement) => {
                assert_eq!(settlement.net_payout, -10);
                settled += 1;
            }
            Err(EngineError::InsufficientBalance { staked: 10, .. }) => rejections += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(settled, 10);
    assert_eq!(rejections, 2);
    assert_eq!(engine.session(1).await.unwrap().balance, 0);
}

#[tokio::test]
async fn test_concurrent_users_do_not_contend() {
    let engine = Arc::new(engine_landing_on(4));
    for user_id in 1..=8 {
        engine
            .initialize_session(100, user_id, GameMode::Normal)
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for user_id in 1..=8u64 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let request = SpinRequest {
                user_id,
                bets: vec![Bet::parity(Parity::Even, 20)],
                game_mode: GameMode::Normal,
                winning_number: None,
            };
            engine.spin(&request).await
        }));
    }

    for handle in handles {
        let settlement = handle.await.unwrap().unwrap();
        assert_eq!(settlement.net_payout, 40);
        assert_eq!(settlement.session.balance, 140);
    }
}

#[tokio::test]
async fn test_rejected_spin_leaves_no_trace() {
    let engine = engine_landing_on(6);
    engine
        .initialize_session(10, 1, GameMode::Normal)
        .await
        .unwrap();

    let request = SpinRequest {
        user_id: 1,
        bets: vec![Bet::straight(5, 50)],
        game_mode: GameMode::Normal,
        winning_number: None,
    };
    let err = engine.spin(&request).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientBalance { staked: 50, balance: 10 }
    ));
    assert_eq!(engine.session(1).await.unwrap().balance, 10);
}
