//! User entity (database row mapping).

use domain::models::UserInfo;
use sqlx::FromRow;

const ADMIN_ROLE: &str = "admin";

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<UserEntity> for UserInfo {
    fn from(entity: UserEntity) -> Self {
        Self {
            is_admin: entity.role.eq_ignore_ascii_case(ADMIN_ROLE),
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
        }
    }
}
