/// Upgrade economy: prices, the upgrade gate and the shop transitions.
///
/// Every public function follows the same contract as `compute`: it takes
/// the current state by reference and hands back a new one.  Rejected
/// purchases leave the caller's state exactly as it was.

use crate::entities::{GameState, GameStatus};
use crate::error::PurchaseRejected;
use crate::rules::{CostCurve, GatePolicy, UPGRADE_THRESHOLD};
use crate::upgrades::UpgradeKind;

/// Price of the next level of `kind`.
pub fn cost(state: &GameState, kind: UpgradeKind) -> f64 {
    match state.rules.cost {
        CostCurve::Flat { cost } => cost,
        CostCurve::Linear { base_cost } => f64::from(state.upgrades.level(kind).max(1)) * base_cost,
    }
}

/// Whether the "open upgrades" affordance should be shown (manual gate) or
/// the screen is about to open (auto gate).
pub fn upgrade_available(state: &GameState) -> bool {
    state.status == GameStatus::Playing && state.score >= UPGRADE_THRESHOLD
}

/// End-of-frame gate check.  Only the auto gate changes state here.
pub fn check_gate(state: &mut GameState) {
    if state.rules.gate == GatePolicy::Auto && upgrade_available(state) {
        tracing::debug!(score = state.score, "upgrade screen opened");
        state.status = GameStatus::UpgradeOpen;
    }
}

/// Player-triggered open.  A no-op unless the affordance is visible.
pub fn open_upgrades(state: &GameState) -> GameState {
    if !upgrade_available(state) {
        return state.clone();
    }
    GameState {
        status: GameStatus::UpgradeOpen,
        ..state.clone()
    }
}

/// Player-triggered close.  The auto gate stays open while the player can
/// still afford the threshold; the manual gate closes at any time.
pub fn close_upgrades(state: &GameState) -> GameState {
    if state.status != GameStatus::UpgradeOpen {
        return state.clone();
    }
    let may_close = match state.rules.gate {
        GatePolicy::Manual => true,
        GatePolicy::Auto => state.score < UPGRADE_THRESHOLD,
    };
    if !may_close {
        return state.clone();
    }
    GameState {
        status: GameStatus::Playing,
        ..state.clone()
    }
}

/// Buy one level of `kind`.
pub fn purchase_upgrade(state: &GameState, kind: UpgradeKind) -> Result<GameState, PurchaseRejected> {
    if state.status != GameStatus::UpgradeOpen {
        return Err(PurchaseRejected::ShopClosed);
    }
    if !state.rules.offers(kind) {
        return Err(PurchaseRejected::NotOffered(kind));
    }
    if state.upgrades.is_maxed(kind) {
        return Err(PurchaseRejected::MaxLevel(kind));
    }
    let price = cost(state, kind);
    if state.score < price {
        return Err(PurchaseRejected::InsufficientScore {
            cost: price.ceil() as u64,
            score: state.display_score(),
        });
    }

    let mut next = state.clone();
    next.score -= price;
    next.upgrades.increment(kind);
    tracing::info!(
        upgrade = %kind,
        level = next.upgrades.level(kind),
        score = next.score,
        "upgrade purchased"
    );

    if next.rules.gate == GatePolicy::Auto && next.score < UPGRADE_THRESHOLD {
        next.status = GameStatus::Playing;
    }
    Ok(next)
}
