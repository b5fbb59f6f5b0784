//! Read access to user accounts owned by the identity service.

use async_trait::async_trait;

use super::repository::RepositoryError;
use crate::models::UserInfo;

#[async_trait]
pub trait UserAuthorizationService: Send + Sync {
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserInfo>, RepositoryError>;

    async fn is_user_admin(&self, user_id: &str) -> Result<bool, RepositoryError>;

    async fn get_user_email(&self, user_id: &str) -> Result<Option<String>, RepositoryError>;

    /// Batch lookup. Unknown IDs are skipped, so the result may be shorter
    /// than the input and is not guaranteed to follow its order.
    async fn get_user_info_batch(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserInfo>, RepositoryError>;
}
