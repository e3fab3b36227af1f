//! Technical indicators over daily closing prices.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Simple moving average.
    Sma,
    /// Relative strength index.
    Rsi,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Sma => "SMA",
            Indicator::Rsi => "RSI",
        }
    }

    /// Latest indicator value, or `None` without enough closes.
    pub fn compute(&self, closes: &[f64], window: usize) -> Option<f64> {
        match self {
            Indicator::Sma => sma(closes, window),
            Indicator::Rsi => rsi(closes, window),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(Indicator::Sma),
            "RSI" => Ok(Indicator::Rsi),
            _ => Err(format!(
                "indicator '{s}' is not supported; only 'SMA' and 'RSI' are supported"
            )),
        }
    }
}

/// Mean of the last `window` closes.
pub fn sma(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let tail = &closes[closes.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// RSI from simple averages of the last `window` price changes.
///
/// `100 - 100 / (1 + avg_gain / avg_loss)`; 100 when there were no losses,
/// 50 when the price did not move at all.
pub fn rsi(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() <= window {
        return None;
    }
    let tail = &closes[closes.len() - window - 1..];
    let (gain, loss) = tail
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(g, l), delta| {
            if delta > 0.0 {
                (g + delta, l)
            } else {
                (g, l - delta)
            }
        });
    let (avg_gain, avg_loss) = (gain / window as f64, loss / window as f64);

    if avg_loss == 0.0 {
        return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("sma".parse::<Indicator>().unwrap(), Indicator::Sma);
        assert_eq!(" Rsi ".parse::<Indicator>().unwrap(), Indicator::Rsi);
        let err = "MACD".parse::<Indicator>().unwrap_err();
        assert!(err.contains("MACD"));
    }

    #[test]
    fn sma_uses_last_window() {
        let closes = [10.0, 20.0, 30.0, 40.0];
        assert!(close_to(sma(&closes, 2).unwrap(), 35.0));
        assert!(close_to(sma(&closes, 4).unwrap(), 25.0));
        assert!(sma(&closes, 5).is_none());
        assert!(sma(&closes, 0).is_none());
    }

    #[test]
    fn rsi_needs_window_plus_one_closes() {
        let closes = [1.0, 2.0, 3.0];
        assert!(rsi(&closes, 3).is_none());
        assert!(rsi(&closes, 2).is_some());
    }

    #[test]
    fn rsi_mixed_moves() {
        // deltas: +2, -1, +1, -2 → gain 3/4, loss 3/4 → RS 1 → RSI 50
        let closes = [10.0, 12.0, 11.0, 12.0, 10.0];
        assert!(close_to(rsi(&closes, 4).unwrap(), 50.0));

        // last 2 deltas: +1, -2 → gain 0.5, loss 1.0 → RSI 33.33
        let value = rsi(&closes, 2).unwrap();
        assert!((value - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_edge_cases() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0, 4.0], 3), Some(100.0));
        assert_eq!(rsi(&[5.0, 5.0, 5.0], 2), Some(50.0));
        assert!(rsi(&[4.0, 3.0, 2.0], 2).unwrap().abs() < 1e-9);
    }

    #[test]
    fn compute_dispatches() {
        let closes = [10.0, 11.0, 12.0];
        assert_eq!(Indicator::Sma.compute(&closes, 3), sma(&closes, 3));
        assert_eq!(Indicator::Rsi.compute(&closes, 2), Some(100.0));
    }
}
