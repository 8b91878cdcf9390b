use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AnanasError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AnanasError::database_operation(format!("Failed to create user: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AnanasError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AnanasError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to update last login: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新密码哈希并记录改密时间
    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(Column::PasswordChangedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to update password: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::utils::testing::{create_user, memory_storage};

    #[tokio::test]
    async fn test_user_lookup() {
        let storage = memory_storage().await;
        let created = create_user(storage.as_ref(), "lecturer", "Secret123", UserRole::Admin).await;

        let by_name = storage.get_user_by_username("lecturer").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.role, UserRole::Admin);
        assert!(by_name.last_login.is_none());
        assert!(by_name.password_changed_at.is_none());

        let by_id = storage.get_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "lecturer");

        assert!(storage.get_user_by_username("nobody").await.unwrap().is_none());
        assert!(storage.get_user_by_id(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        use crate::models::users::requests::CreateUserRequest;

        let storage = memory_storage().await;
        create_user(storage.as_ref(), "admin", "Secret123", UserRole::Admin).await;

        let dup = storage
            .create_user(CreateUserRequest {
                username: "admin".to_string(),
                password: "x".to_string(),
                role: UserRole::User,
            })
            .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_last_login_and_password() {
        let storage = memory_storage().await;
        let user = create_user(storage.as_ref(), "ada", "Secret123", UserRole::User).await;

        assert!(storage.update_last_login(user.id).await.unwrap());
        assert!(!storage.update_last_login(user.id + 1).await.unwrap());

        assert!(storage.update_password(user.id, "new-hash").await.unwrap());
        let reloaded = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");
        assert!(reloaded.last_login.is_some());
        assert!(reloaded.password_changed_at.is_some());
    }
}
