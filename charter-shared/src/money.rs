//! Display-time handling of monetary amounts.
//!
//! Pricing values are stored with full `f64` precision. Rounding to the
//! currency's minor unit happens here and nowhere else.

/// Number of decimal places in the currency's minor unit (ISO 4217).
pub fn minor_units(currency: &str) -> u32 {
    match currency.trim().to_ascii_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "LYD" | "IQD" => 3,
        _ => 2,
    }
}

/// Round an amount to the currency's minor unit, half away from zero.
pub fn round_for_display(amount: f64, currency: &str) -> f64 {
    if !amount.is_finite() {
        return amount;
    }
    let factor = 10f64.powi(minor_units(currency) as i32);
    (amount * factor).round() / factor
}

/// Render an amount as `"<CUR> <amount>"` with the minor-unit precision.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let places = minor_units(currency) as usize;
    let rounded = round_for_display(amount, currency);
    format!("{} {:.*}", currency.trim().to_ascii_uppercase(), places, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(minor_units("usd"), 2);
        assert_eq!(minor_units("JPY"), 0);
        assert_eq!(minor_units("KWD"), 3);
        assert_eq!(minor_units("INR"), 2);
    }

    #[test]
    fn test_round_for_display() {
        assert_eq!(round_for_display(39589.004, "USD"), 39589.0);
        assert_eq!(round_for_display(10.125, "USD"), 10.13);
        assert_eq!(round_for_display(1234.5, "JPY"), 1235.0);
        assert_eq!(round_for_display(-2.5, "JPY"), -3.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(39589.0, "usd"), "USD 39589.00");
        assert_eq!(format_amount(1500.4, "JPY"), "JPY 1500");
        assert_eq!(format_amount(1.23456, "KWD"), "KWD 1.235");
    }
}
