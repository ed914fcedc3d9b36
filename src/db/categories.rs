use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::info;

use crate::db::models::{Category, CategoryGroup};
use crate::db::ownership::{Entity, ensure_owned, found};
use crate::db::sqlite::BudgetStorage;
use crate::error::BudgetError;
use crate::types::category::{
    CategoryFilter, CategoryGroupPatch, CategoryPatch, CreateCategory, CreateCategoryGroup,
};

const GROUP_COLUMNS: &str = "id, user_id, name, sort_order";
const CATEGORY_COLUMNS: &str = "id, user_id, category_group_id, name, sort_order";

async fn fetch_group(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<CategoryGroup, BudgetError> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM category_groups WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, CategoryGroup>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    found(row, Entity::CategoryGroup)
}

async fn fetch_category(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Category, BudgetError> {
    let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    found(row, Entity::Category)
}

impl BudgetStorage {
    pub async fn list_category_groups(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryGroup>, BudgetError> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM category_groups WHERE user_id = ? ORDER BY sort_order, id"
        );
        let rows = sqlx::query_as::<_, CategoryGroup>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_category_group(
        &self,
        user_id: i64,
        id: i64,
    ) -> Result<CategoryGroup, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        fetch_group(&mut conn, user_id, id).await
    }

    pub async fn create_category_group(
        &self,
        user_id: i64,
        input: CreateCategoryGroup,
    ) -> Result<CategoryGroup, BudgetError> {
        let sql = format!(
            "INSERT INTO category_groups (user_id, name, sort_order) VALUES (?, ?, ?) RETURNING {GROUP_COLUMNS}"
        );
        let group = sqlx::query_as::<_, CategoryGroup>(&sql)
            .bind(user_id)
            .bind(input.name)
            .bind(input.sort_order)
            .fetch_one(&self.pool)
            .await?;
        info!(user_id, group_id = group.id, "category group created");
        Ok(group)
    }

    pub async fn update_category_group(
        &self,
        user_id: i64,
        id: i64,
        patch: CategoryGroupPatch,
    ) -> Result<CategoryGroup, BudgetError> {
        let mut tx = self.begin_write().await?;
        let mut group = fetch_group(&mut tx, user_id, id).await?;

        if let Some(name) = patch.name {
            group.name = name;
        }
        if let Some(sort_order) = patch.sort_order {
            group.sort_order = sort_order;
        }

        sqlx::query("UPDATE category_groups SET name = ?, sort_order = ? WHERE id = ? AND user_id = ?")
            .bind(&group.name)
            .bind(group.sort_order)
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(user_id, group_id = id, "category group updated");
        Ok(group)
    }

    /// Cascades to the group's categories, and from them to their allocations.
    pub async fn delete_category_group(&self, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let result = sqlx::query("DELETE FROM category_groups WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BudgetError::NotFound(Entity::CategoryGroup));
        }
        info!(user_id, group_id = id, "category group deleted");
        Ok(())
    }

    pub async fn list_categories(
        &self,
        user_id: i64,
        filter: CategoryFilter,
    ) -> Result<Vec<Category>, BudgetError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE user_id = "
        ));
        qb.push_bind(user_id);
        if let Some(group_id) = filter.group_id {
            qb.push(" AND category_group_id = ").push_bind(group_id);
        }
        qb.push(" ORDER BY sort_order, id");

        let rows = qb
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_category(&self, user_id: i64, id: i64) -> Result<Category, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        fetch_category(&mut conn, user_id, id).await
    }

    pub async fn create_category(
        &self,
        user_id: i64,
        input: CreateCategory,
    ) -> Result<Category, BudgetError> {
        let mut tx = self.begin_write().await?;
        ensure_owned(&mut tx, Entity::CategoryGroup, input.category_group_id, user_id).await?;

        let sql = format!(
            "INSERT INTO categories (user_id, category_group_id, name, sort_order) VALUES (?, ?, ?, ?) RETURNING {CATEGORY_COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(user_id)
            .bind(input.category_group_id)
            .bind(input.name)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(user_id, category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        user_id: i64,
        id: i64,
        patch: CategoryPatch,
    ) -> Result<Category, BudgetError> {
        let mut tx = self.begin_write().await?;
        let mut category = fetch_category(&mut tx, user_id, id).await?;

        if let Some(group_id) = patch.category_group_id {
            ensure_owned(&mut tx, Entity::CategoryGroup, group_id, user_id).await?;
            category.category_group_id = group_id;
        }
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(sort_order) = patch.sort_order {
            category.sort_order = sort_order;
        }

        sqlx::query(
            "UPDATE categories SET category_group_id = ?, name = ?, sort_order = ? WHERE id = ? AND user_id = ?",
        )
        .bind(category.category_group_id)
        .bind(&category.name)
        .bind(category.sort_order)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(user_id, category_id = id, "category updated");
        Ok(category)
    }

    /// Deletes the category's allocations and clears it from transactions.
    pub async fn delete_category(&self, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BudgetError::NotFound(Entity::Category));
        }
        info!(user_id, category_id = id, "category deleted");
        Ok(())
    }
}
