use rust_decimal::Decimal;

/// Relative change of `current` over `base`, in percent.
///
/// Returns zero when `base` is zero and `None` when the result does not fit
/// in a `Decimal`.
pub fn percent_change(current: Decimal, base: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return Some(Decimal::ZERO);
    }
    current
        .checked_div(base)?
        .checked_sub(Decimal::ONE)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
