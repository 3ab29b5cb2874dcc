/// Base currency used when settings do not provide one
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Upper bound of reporting-grid dates per snapshot
pub const DEFAULT_MAX_CHART_ITEMS: u32 = 365;

/// Window used for the trailing dividend yield
pub const DEFAULT_DIVIDEND_TRAILING_DAYS: u32 = 365;

/// Date format used in cache keys and log output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day fraction assigned to activities that share a date with the previous order.
/// The elapsed time between them is unknown, so they get the smallest positive weight.
pub const SAME_DAY_INVESTMENT_WEIGHT: &str = "0.0000000000000001";
