use crate::database::entities::{UserAccount, users};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr,
};

/// Users DAO for database operations
#[derive(Clone)]
pub struct UsersDao {
    db: DatabaseConnection,
}

impl UsersDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new account and return its assigned ID
    pub async fn create(&self, user: &UserAccount) -> DatabaseResult<i32> {
        let active_model = users::ActiveModel {
            id: ActiveValue::NotSet, // Let database auto-assign ID
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            last_login: Set(user.last_login),
        };

        // Concurrent duplicate registrations race past the route pre-check;
        // the unique indexes catch them here
        let result = users::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => DatabaseError::Constraint(msg),
                _ => DatabaseError::Database(e.to_string()),
            })?;

        Ok(result.last_insert_id)
    }

    /// Find account by ID
    pub async fn find_by_id(&self, user_id: i32) -> DatabaseResult<Option<UserAccount>> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Find account by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<UserAccount>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Find account by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<UserAccount>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Update last login timestamp
    pub async fn update_last_login(&self, user_id: i32) -> DatabaseResult<UserAccount> {
        let active_model = users::ActiveModel {
            id: Set(user_id),
            last_login: Set(Some(Utc::now())),
            ..Default::default()
        };

        let updated_user = active_model
            .update(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(updated_user)
    }

    /// Delete an account. Owned subscriptions go with it via the cascading
    /// foreign key.
    pub async fn delete(&self, user_id: i32) -> DatabaseResult<()> {
        let result = users::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }
}
