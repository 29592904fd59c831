use bigdecimal::{BigDecimal, Signed, Zero};

use crate::models::PriceRecord;

/// Decimal places kept in every reported average.
pub const AVERAGE_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverages {
    pub open_price: BigDecimal,
    pub close_price: BigDecimal,
    pub volume: BigDecimal,
}

/// Arithmetic mean of open price, close price and volume over `records`.
///
/// Sums and the division are exact; each mean is then rounded to
/// [`AVERAGE_SCALE`] places, half away from zero. An empty slice averages to 0.
pub fn aggregate(records: &[PriceRecord]) -> DailyAverages {
    if records.is_empty() {
        return DailyAverages {
            open_price: BigDecimal::zero(),
            close_price: BigDecimal::zero(),
            volume: BigDecimal::zero(),
        };
    }

    let count = BigDecimal::from(records.len() as u64);
    let mean = |sum: BigDecimal| round_half_away_from_zero(&(sum / &count), AVERAGE_SCALE);

    let open = records
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + &r.open_price);
    let close = records
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + &r.close_price);
    let volume = records
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + BigDecimal::from(r.volume));

    DailyAverages {
        open_price: mean(open),
        close_price: mean(close),
        volume: mean(volume),
    }
}

pub fn round_half_away_from_zero(value: &BigDecimal, scale: i64) -> BigDecimal {
    // 5 * 10^-(scale + 1), i.e. half of the last kept digit
    let half = BigDecimal::new(5i64.into(), scale + 1);
    // with_scale truncates toward zero
    let rounded = (value.abs() + half).with_scale(scale);
    if value.is_negative() {
        -rounded
    } else {
        rounded
    }
}
