/// Activity types
///
/// Each constant represents one of the ledger event categories the engine folds.

/// Purchase of a security. Increases quantity and cost basis.
pub const ACTIVITY_TYPE_BUY: &str = "BUY";

/// Disposal of a security. Decreases quantity and removes average cost.
pub const ACTIVITY_TYPE_SELL: &str = "SELL";

/// Cash dividend paid for a holding. Quantity is the share count, unit price the amount per share.
pub const ACTIVITY_TYPE_DIVIDEND: &str = "DIVIDEND";

/// Interest earned on a holding.
pub const ACTIVITY_TYPE_INTEREST: &str = "INTEREST";

/// Stand-alone fee not tied to a trade.
pub const ACTIVITY_TYPE_FEE: &str = "FEE";

/// Valuable held outside the market (property, collectible). Increases quantity.
pub const ACTIVITY_TYPE_ITEM: &str = "ITEM";

/// Debt owed against the portfolio. Decreases quantity.
pub const ACTIVITY_TYPE_LIABILITY: &str = "LIABILITY";

/// Staking reward received in kind.
pub const ACTIVITY_TYPE_STAKE: &str = "STAKE";

/// Activity types counted in `activities_count` of a snapshot
pub const COUNTED_ACTIVITY_TYPES: [&str; 3] =
    [ACTIVITY_TYPE_BUY, ACTIVITY_TYPE_SELL, ACTIVITY_TYPE_STAKE];

/// Checks if an activity type contributes to the snapshot's activity count.
pub fn is_counted_activity(activity_type: &str) -> bool {
    COUNTED_ACTIVITY_TYPES.contains(&activity_type)
}
