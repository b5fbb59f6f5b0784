use std::sync::Arc;

use crate::errors::{DomainError, ResultExt};
use crate::models::CheckIn;
use crate::ports::CheckInRepository;

/// Lists the caller's check-ins, newest first.
pub struct ListUserCheckIns {
    check_ins: Arc<dyn CheckInRepository>,
}

impl ListUserCheckIns {
    pub fn new(check_ins: Arc<dyn CheckInRepository>) -> Self {
        Self { check_ins }
    }

    pub async fn execute(&self, user_id: &str) -> Result<Vec<CheckIn>, DomainError> {
        self.check_ins
            .find_by_user_id(user_id)
            .await
            .context("failed to list user check-ins")
    }
}
