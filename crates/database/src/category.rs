//! Agent categories. Read-only from the dashboard.

use sqlx::SqlitePool;

use crate::error::{map_unique, DatabaseError, Result};
use crate::models::Category;

/// Create a category (seeding and tests).
pub async fn create_category(pool: &SqlitePool, category: &Category) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO categories (id, title, description, emoji)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&category.id)
    .bind(&category.title)
    .bind(&category.description)
    .bind(&category.emoji)
    .execute(pool)
    .await
    .map_err(map_unique("Category", &category.id))?;

    Ok(())
}

/// Get a category by ID.
pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Category> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, title, description, emoji
        FROM categories
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Category",
        id: id.to_string(),
    })
}

/// List all categories.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, title, description, emoji
        FROM categories
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}
