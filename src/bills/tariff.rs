//! The PDAM two-tier tariff: a flat fee covers the first 20 m³, every cubic
//! meter above that is billed per unit.

use thiserror::Error;

/// Flat fee in Rupiah covering up to [`BASE_LIMIT_M3`].
pub const BASE_RATE_RP: i64 = 20_000;
/// Per-m³ rate in Rupiah above the base block.
pub const EXCESS_RATE_RP: i64 = 3_000;
/// Size of the base block in m³.
pub const BASE_LIMIT_M3: f64 = 20.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    /// Current reading below the previous one. Rejected explicitly rather
    /// than clamped; usage is reported as 0.
    #[error("current reading is lower than the previous reading (usage 0)")]
    MeterRollback,
    #[error("readings must be finite and non-negative")]
    InvalidReading,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillAmount {
    pub usage_m3: f64,
    pub cost_rp: i64,
}

/// Compute usage and cost from a pair of meter readings.
pub fn compute(current: f64, previous: f64) -> Result<BillAmount, TariffError> {
    if !current.is_finite() || !previous.is_finite() || current < 0.0 || previous < 0.0 {
        return Err(TariffError::InvalidReading);
    }
    let usage = current - previous;
    if usage < 0.0 {
        return Err(TariffError::MeterRollback);
    }
    let cost_rp = if usage <= BASE_LIMIT_M3 {
        BASE_RATE_RP
    } else {
        BASE_RATE_RP + ((usage - BASE_LIMIT_M3) * EXCESS_RATE_RP as f64).round() as i64
    };
    Ok(BillAmount {
        usage_m3: usage,
        cost_rp,
    })
}

/// "Rp 65.000" — Indonesian thousands grouping, whole Rupiah only.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_block_is_flat() {
        for usage in [0.0, 1.0, 10.0, 19.5, 20.0] {
            let bill = compute(100.0 + usage, 100.0).unwrap();
            assert_eq!(bill.cost_rp, 20_000, "usage {usage}");
        }
    }

    #[test]
    fn at_block_boundary() {
        let bill = compute(120.0, 100.0).unwrap();
        assert_eq!(bill.usage_m3, 20.0);
        assert_eq!(bill.cost_rp, 20_000);
    }

    #[test]
    fn above_block_charges_excess() {
        let bill = compute(135.0, 100.0).unwrap();
        assert_eq!(bill.usage_m3, 35.0);
        assert_eq!(bill.cost_rp, 20_000 + 15 * 3_000);
    }

    #[test]
    fn fractional_excess_rounds_to_whole_rupiah() {
        // 20.5 m³ -> 20000 + 0.5 * 3000 = 21500
        let bill = compute(120.5, 100.0).unwrap();
        assert_eq!(bill.cost_rp, 21_500);
        // 20.0001 m³ -> rounds to 20000 + 0 (0.3 Rp rounds down)
        let bill = compute(120.0001, 100.0).unwrap();
        assert_eq!(bill.cost_rp, 20_000);
    }

    #[test]
    fn rollback_is_an_explicit_error() {
        assert_eq!(compute(90.0, 100.0), Err(TariffError::MeterRollback));
    }

    #[test]
    fn negative_and_non_finite_readings_rejected() {
        assert_eq!(compute(-1.0, 0.0), Err(TariffError::InvalidReading));
        assert_eq!(compute(10.0, -1.0), Err(TariffError::InvalidReading));
        assert_eq!(compute(f64::NAN, 0.0), Err(TariffError::InvalidReading));
        assert_eq!(compute(f64::INFINITY, 0.0), Err(TariffError::InvalidReading));
    }

    #[test]
    fn rupiah_formatting() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(20_000), "Rp 20.000");
        assert_eq!(format_rupiah(65_000), "Rp 65.000");
        assert_eq!(format_rupiah(1_234_567), "Rp 1.234.567");
        assert_eq!(format_rupiah(-5_000), "Rp -5.000");
        // extreme magnitudes must not overflow
        assert_eq!(format_rupiah(i64::MIN), "Rp -9.223.372.036.854.775.808");
    }
}
