use crate::database::entities::{SubscriptionRecord, subscriptions};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

/// Subscriptions DAO for database operations
#[derive(Clone)]
pub struct SubscriptionsDao {
    db: DatabaseConnection,
}

impl SubscriptionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new subscription and return the stored record
    pub async fn create(&self, record: &SubscriptionRecord) -> DatabaseResult<SubscriptionRecord> {
        let active_model = subscriptions::ActiveModel {
            id: ActiveValue::NotSet, // Let database auto-assign ID
            user_id: Set(record.user_id),
            name: Set(record.name.clone()),
            cost: Set(record.cost),
            billing_frequency: Set(record.billing_frequency),
            next_due_date: Set(record.next_due_date),
            usage_frequency: Set(record.usage_frequency),
            category: Set(record.category.clone()),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };

        let stored = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(stored)
    }

    /// Find subscription by ID
    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<SubscriptionRecord>> {
        let record = subscriptions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(record)
    }

    /// All subscriptions owned by a user, ordered by ascending due date.
    /// Ties on the due date keep insertion order via the ID tiebreaker.
    pub async fn find_by_user(&self, user_id: i32) -> DatabaseResult<Vec<SubscriptionRecord>> {
        let records = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .order_by_asc(subscriptions::Column::NextDueDate)
            .order_by_asc(subscriptions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Update a subscription's mutable fields
    pub async fn update(&self, record: &SubscriptionRecord) -> DatabaseResult<SubscriptionRecord> {
        let active_model = subscriptions::ActiveModel {
            id: Set(record.id),
            name: Set(record.name.clone()),
            cost: Set(record.cost),
            billing_frequency: Set(record.billing_frequency),
            next_due_date: Set(record.next_due_date),
            usage_frequency: Set(record.usage_frequency),
            category: Set(record.category.clone()),
            updated_at: Set(record.updated_at),
            ..Default::default()
        };

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Delete a subscription by ID
    pub async fn delete(&self, id: i32) -> DatabaseResult<()> {
        let result = subscriptions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    /// Count subscriptions owned by a user
    pub async fn count_by_user(&self, user_id: i32) -> DatabaseResult<u64> {
        let count = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(count)
    }
}
