use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of downstream call being recorded or replayed.
///
/// Serialized as its [`as_str`](Self::as_str) name, the same spelling ignore
/// rules use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MockCategory {
    /// Inbound request that opened the session
    Servlet,
    Database,
    HttpClient,
    RpcConsumer,
    RpcProvider,
    Redis,
    /// Arbitrary in-process method whose result is recorded
    DynamicClass,
    Custom(String),
}

impl MockCategory {
    pub fn as_str(&self) -> &str {
        match self {
            MockCategory::Servlet => "Servlet",
            MockCategory::Database => "Database",
            MockCategory::HttpClient => "HttpClient",
            MockCategory::RpcConsumer => "RpcConsumer",
            MockCategory::RpcProvider => "RpcProvider",
            MockCategory::Redis => "Redis",
            MockCategory::DynamicClass => "DynamicClass",
            MockCategory::Custom(name) => name,
        }
    }

    /// Entry categories open sessions rather than being mediated
    pub fn is_entry_point(&self) -> bool {
        matches!(self, MockCategory::Servlet | MockCategory::RpcProvider)
    }
}

impl fmt::Display for MockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MockCategory {
    fn from(name: &str) -> Self {
        match name {
            "Servlet" => MockCategory::Servlet,
            "Database" => MockCategory::Database,
            "HttpClient" => MockCategory::HttpClient,
            "RpcConsumer" => MockCategory::RpcConsumer,
            "RpcProvider" => MockCategory::RpcProvider,
            "Redis" => MockCategory::Redis,
            "DynamicClass" => MockCategory::DynamicClass,
            other => MockCategory::Custom(other.to_string()),
        }
    }
}

impl From<String> for MockCategory {
    fn from(name: String) -> Self {
        MockCategory::from(name.as_str())
    }
}

impl From<MockCategory> for String {
    fn from(category: MockCategory) -> Self {
        match category {
            MockCategory::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips_through_from() {
        for category in [
            MockCategory::Database,
            MockCategory::HttpClient,
            MockCategory::Custom("Kafka".into()),
        ] {
            assert_eq!(MockCategory::from(category.as_str()), category);
        }
    }

    #[test]
    fn test_serialized_name_matches_display() {
        for category in [MockCategory::HttpClient, MockCategory::Custom("Kafka".into())] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
            assert_eq!(serde_json::from_str::<MockCategory>(&json).unwrap(), category);
        }
    }

    #[test]
    fn test_entry_points() {
        assert!(MockCategory::Servlet.is_entry_point());
        assert!(!MockCategory::Database.is_entry_point());
    }
}
