// Primitive types and shared constants

/// Token balance in base units
pub type Balance = u64;

/// Base units per whole BNKR token
pub const UNITS_PER_BNKR: Balance = 1_000_000_000;

/// Normal shortwave operating frequency
pub const NORMAL_FREQUENCY_MHZ: f64 = 14.230;

/// Dedicated emergency broadcast frequency
pub const EMERGENCY_FREQUENCY_MHZ: f64 = 14.235;

/// Format a balance as a whole-token amount with 4 decimal places
pub fn format_bnkr(amount: Balance) -> String {
    let whole = amount / UNITS_PER_BNKR;
    let frac = (amount % UNITS_PER_BNKR) / 100_000; // 4 decimal places
    format!("{}.{:04} BNKR", whole, frac)
}
