use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Snapshot of the exporter's last Docker Hub pull-limit check, as served on `/limit`.
///
/// Every field is optional: the exporter omits the address for authenticated
/// checks, and a partial payload should still render what it has.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LimitStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_remaining: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_family: Option<String>,
}

impl LimitStatus {
    /// Identity the limit applies to: `auth:<user>`, `unauth:<ip>` or `unknown`.
    pub fn identity(&self) -> String {
        if let Some(user) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("auth:{}", user);
        }
        match self.ip_address.as_deref().filter(|ip| !ip.is_empty()) {
            Some(ip) => format!("unauth:{}", ip),
            None => "unknown".to_string(),
        }
    }

    pub fn pulls_used(&self) -> Option<i64> {
        match (self.pull_limit, self.pull_remaining) {
            (Some(limit), Some(remaining)) => Some(limit.saturating_sub(remaining).max(0)),
            _ => None,
        }
    }

    pub fn checked_at_time(&self) -> Option<DateTime<FixedOffset>> {
        self.checked_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    /// True when remaining exceeds the limit. Reported, never enforced.
    pub fn remaining_exceeds_limit(&self) -> bool {
        matches!(
            (self.pull_limit, self.pull_remaining),
            (Some(limit), Some(remaining)) if remaining > limit
        )
    }
}
