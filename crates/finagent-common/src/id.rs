use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one orchestrated query.
///
/// Eight hex characters: short enough to grep for, and every log line of
/// the query carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    pub fn new() -> Self {
        let mut simple = uuid::Uuid::new_v4().simple().to_string();
        simple.truncate(8);
        Self(simple)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
