//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in the single-lane fulfillment queue.
///
/// Status transitions:
/// ```text
/// InQueue ──► InProgress ──► Completed
/// ```
///
/// The first order admitted into an empty queue starts directly at
/// `InProgress`. At most one order holds `InProgress` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting behind the order currently being prepared.
    #[serde(rename = "In Queue")]
    InQueue,

    /// Being prepared by the dispenser.
    #[serde(rename = "In Progress")]
    InProgress,

    /// Served (terminal state).
    #[serde(rename = "Completed")]
    Completed,
}

impl OrderStatus {
    /// Status assigned to a freshly admitted order.
    pub fn initial(in_progress_exists: bool) -> Self {
        if in_progress_exists {
            OrderStatus::InQueue
        } else {
            OrderStatus::InProgress
        }
    }

    /// Returns true if the order can move to the front of the queue.
    pub fn can_promote(&self) -> bool {
        matches!(self, OrderStatus::InQueue)
    }

    /// Returns true if the order can be completed.
    pub fn can_complete(&self) -> bool {
        matches!(self, OrderStatus::InProgress)
    }

    /// Returns the status label used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InQueue => "In Queue",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid order status")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Queue" => Ok(OrderStatus::InQueue),
            "In Progress" => Ok(OrderStatus::InProgress),
            "Completed" => Ok(OrderStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_depends_on_queue() {
        assert_eq!(OrderStatus::initial(false), OrderStatus::InProgress);
        assert_eq!(OrderStatus::initial(true), OrderStatus::InQueue);
    }

    #[test]
    fn test_only_queued_orders_can_be_promoted() {
        assert!(OrderStatus::InQueue.can_promote());
        assert!(!OrderStatus::InProgress.can_promote());
        assert!(!OrderStatus::Completed.can_promote());
    }

    #[test]
    fn test_only_in_progress_orders_can_complete() {
        assert!(!OrderStatus::InQueue.can_complete());
        assert!(OrderStatus::InProgress.can_complete());
        assert!(!OrderStatus::Completed.can_complete());
    }

    #[test]
    fn test_display_and_parse_agree() {
        for status in [
            OrderStatus::InQueue,
            OrderStatus::InProgress,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Complete".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serializes_with_spaced_labels() {
        let json = serde_json::to_string(&OrderStatus::InQueue).unwrap();
        assert_eq!(json, "\"In Queue\"");
    }
}
