use serde::{Deserialize, Serialize};

use crate::{Ticker, TradingDate, ValidationError};

/// One daily OHLCV row for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub ticker: Ticker,
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceRecord {
    /// Build a validated record.
    ///
    /// Prices must be finite and non-negative. High/low bounds are not
    /// checked: adjusted vendor closes routinely sit outside the raw range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticker: Ticker,
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_price("open", open)?;
        validate_price("high", high)?;
        validate_price("low", low)?;
        validate_price("close", close)?;

        Ok(Self {
            ticker,
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Parse a volume cell, accepting float text with no fractional part (`"1200.0"`).
pub fn parse_volume(input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    if let Ok(volume) = trimmed.parse::<u64>() {
        return Ok(volume);
    }

    let invalid = || ValidationError::InvalidVolume {
        value: input.to_owned(),
    };
    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(value as u64)
}

fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> Ticker {
        Ticker::parse("KO").expect("ticker")
    }

    fn date() -> TradingDate {
        TradingDate::parse("2023-01-03").expect("date")
    }

    #[test]
    fn accepts_close_outside_high_low() {
        let record = PriceRecord::new(ticker(), date(), 60.0, 61.0, 59.5, 61.2, 1_000)
            .expect("adjusted close is tolerated");
        assert_eq!(record.close, 61.2);
    }

    #[test]
    fn rejects_negative_price() {
        let err = PriceRecord::new(ticker(), date(), 60.0, 61.0, -1.0, 60.5, 10)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "low" }));
    }

    #[test]
    fn rejects_non_finite_price() {
        let err = PriceRecord::new(ticker(), date(), 60.0, f64::INFINITY, 59.0, 60.5, 10)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "high" }));
    }

    #[test]
    fn parses_integer_and_whole_float_volume() {
        assert_eq!(parse_volume("1200").expect("int"), 1200);
        assert_eq!(parse_volume(" 1200.0 ").expect("float"), 1200);
    }

    #[test]
    fn rejects_fractional_or_negative_volume() {
        for input in ["12.5", "-3", "abc", "NaN"] {
            let err = parse_volume(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidVolume { .. }), "{input}");
        }
    }
}
