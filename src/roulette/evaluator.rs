//! Bet evaluation against a winning number.
//!
//! Pure functions: identical bets and winning number always produce identical
//! output. Payout multipliers use the net-credit convention — the multiplier
//! already includes the returned stake, so a winning straight bet credits
//! 36x the stake and a winning parity bet credits 2x, while a losing bet
//! debits exactly the stake.
//!
//! Zero policy: pocket 0 counts as neither even nor odd. Parity bets lose
//! when the ball lands on zero; only a straight bet on 0 pays.

use crate::roulette::types::{Bet, BetKind, BetOutcome, PayoutDirection};

/// Net credit for an exact pocket match, stake included.
pub const STRAIGHT_MULTIPLIER: u64 = 36;

/// Net credit for a parity match on a non-zero pocket, stake included.
pub const PARITY_MULTIPLIER: u64 = 2;

/// Evaluate each bet independently against the winning number. First matching
/// rule wins: exact pocket, then parity on non-zero, otherwise the stake is lost.
pub fn evaluate(bets: &[Bet], winning_number: u8) -> Vec<BetOutcome> {
    bets.iter()
        .map(|bet| outcome_for(bet, winning_number))
        .collect()
}

fn outcome_for(bet: &Bet, winning_number: u8) -> BetOutcome {
    match bet.kind {
        BetKind::Straight(pocket) if pocket == winning_number => {
            BetOutcome::credit(*bet, bet.amount.saturating_mul(STRAIGHT_MULTIPLIER))
        }
        BetKind::Parity(parity) if winning_number != 0 && parity.matches(winning_number) => {
            BetOutcome::credit(*bet, bet.amount.saturating_mul(PARITY_MULTIPLIER))
        }
        _ => BetOutcome::debit(*bet, bet.amount),
    }
}

/// Signed sum of credits minus debits for a settled spin.
pub fn net_payout(outcomes: &[BetOutcome]) -> i64 {
    outcomes.iter().fold(0i64, |acc, outcome| {
        let amount = outcome.amount.min(i64::MAX as u64) as i64;
        match outcome.direction {
            PayoutDirection::Credit => acc.saturating_add(amount),
            PayoutDirection::Debit => acc.saturating_sub(amount),
        }
    })
}

/// Total amount staked across a spin's bets.
pub fn total_staked(bets: &[Bet]) -> u64 {
    bets.iter().fold(0u64, |acc, bet| acc.saturating_add(bet.amount))
}
