//! Check-in domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record of one user's attendance at one activity.
///
/// At most one check-in exists per `(user_id, activity_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckIn {
    pub id: Uuid,
    pub user_id: String,
    pub activity_id: Uuid,
    pub checked_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn new(user_id: impl Into<String>, activity_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            activity_id,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_check_in_gets_fresh_id() {
        let activity_id = Uuid::new_v4();
        let before = Utc::now();
        let a = CheckIn::new("u1", activity_id);
        let b = CheckIn::new("u1", activity_id);

        assert_ne!(a.id, b.id);
        assert_eq!(a.user_id, "u1");
        assert_eq!(a.activity_id, activity_id);
        assert!(a.checked_at >= before);
    }
}
