/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Label under which assets without a category are aggregated
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
