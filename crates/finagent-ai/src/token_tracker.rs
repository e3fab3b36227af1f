//! Token usage tracking for one session.

use crate::TokenUsage;

/// Tracks cumulative token usage and the number of model calls.
#[derive(Debug, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from an API call.
    pub fn record(&mut self, usage: &TokenUsage) {
        self.total.input_tokens = self.total.input_tokens.saturating_add(usage.input_tokens);
        self.total.output_tokens = self.total.output_tokens.saturating_add(usage.output_tokens);
        self.call_count += 1;
    }

    pub fn total(&self) -> TokenUsage {
        self.total
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    /// Number of API calls recorded.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate() {
        let mut tracker = TokenTracker::new();
        tracker.record(&TokenUsage {
            input_tokens: 120,
            output_tokens: 30,
        });
        tracker.record(&TokenUsage {
            input_tokens: 200,
            output_tokens: 5,
        });
        assert_eq!(tracker.call_count(), 2);
        assert_eq!(tracker.total().input_tokens, 320);
        assert_eq!(tracker.total_tokens(), 355);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let mut tracker = TokenTracker::new();
        tracker.record(&TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 0,
        });
        tracker.record(&TokenUsage {
            input_tokens: 10,
            output_tokens: 0,
        });
        assert_eq!(tracker.total().input_tokens, u64::MAX);
    }
}
