//! Default system instruction.

use chrono::NaiveDate;

/// Months of history assumed when a question names no dates.
pub const DEFAULT_HISTORY_MONTHS: u32 = 3;

/// Build the instruction given to every session.
///
/// The loop does no date arithmetic; the instruction hands the model
/// today's date and the default window so it can fill in `start_date` and
/// `end_date` itself.
pub fn default_system_instruction(today: NaiveDate, history_months: u32) -> String {
    format!(
        "You are a professional financial assistant for companies listed on the \
Vietnamese stock market.\n\
\n\
Your job:\n\
- Answer questions about listed companies, their share prices and technical indicators.\n\
- Use only information returned by the provided tools.\n\
- Never invent or guess figures that are not in the tool results.\n\
\n\
Rules:\n\
- Today is {today}. All dates you pass to tools use the YYYY-MM-DD format.\n\
- If the user asks about prices without giving a time range, use the most recent \
{history_months} months ending today.\n\
- If the user asks about a technical indicator without giving a time range, use the most \
recent {history_months} months ending today.\n\
- Answer in the language of the question, clearly and professionally.\n\
- When reporting prices, summarize the trend and key figures instead of listing every row.\n\
- If a tool returns an error, explain the problem to the user instead of retrying blindly.",
        today = today.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_states_date_and_window() {
        let today = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let text = default_system_instruction(today, 3);
        assert!(text.contains("Today is 2024-11-01"));
        assert!(text.contains("most recent 3 months"));
        assert!(text.contains("YYYY-MM-DD"));
    }

    #[test]
    fn window_is_configurable() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(default_system_instruction(today, 6).contains("most recent 6 months"));
    }
}
