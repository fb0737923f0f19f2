//! Status transition rules for plans and subscriptions.
//!
//! **PRs that only change which transitions are legal should edit this file only.**
//!
//! Both machines share the same shape: `Active` ↔ `Paused` may toggle, either
//! may move to `Cancelled`, and `Cancelled` is terminal. Transitions are
//! strictly one-directional otherwise — in particular a repeated cancel is
//! rejected rather than treated as a no-op, so callers always learn whether
//! their call changed anything.

use crate::types::{Error, PlanStatus, SubscriptionStatus};

/// Validates a plan status transition.
///
/// | From      | To        | Allowed |
/// |-----------|-----------|---------|
/// | Active    | Paused    | Yes     |
/// | Active    | Cancelled | Yes     |
/// | Paused    | Active    | Yes     |
/// | Paused    | Cancelled | Yes     |
/// | Cancelled | *any*     | No      |
/// | *any*     | itself    | No      |
pub fn validate_plan_transition(from: &PlanStatus, to: &PlanStatus) -> Result<(), Error> {
    let valid = match from {
        PlanStatus::Active => matches!(to, PlanStatus::Paused | PlanStatus::Cancelled),
        PlanStatus::Paused => matches!(to, PlanStatus::Active | PlanStatus::Cancelled),
        PlanStatus::Cancelled => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidStatus)
    }
}

/// Validates a subscription status transition.
///
/// Same table as [`validate_plan_transition`], with two terminal states:
/// `Cancelled` and the reserved `Expired` admit no outgoing transitions, and
/// nothing transitions *into* `Expired` until its trigger rule exists.
pub fn validate_subscription_transition(
    from: &SubscriptionStatus,
    to: &SubscriptionStatus,
) -> Result<(), Error> {
    let valid = match from {
        SubscriptionStatus::Active => matches!(
            to,
            SubscriptionStatus::Paused | SubscriptionStatus::Cancelled
        ),
        SubscriptionStatus::Paused => matches!(
            to,
            SubscriptionStatus::Active | SubscriptionStatus::Cancelled
        ),
        SubscriptionStatus::Cancelled | SubscriptionStatus::Expired => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidStatus)
    }
}

/// Whether a subscription still counts against the one-live-subscription rule.
pub fn is_live(status: &SubscriptionStatus) -> bool {
    matches!(
        status,
        SubscriptionStatus::Active | SubscriptionStatus::Paused
    )
}
