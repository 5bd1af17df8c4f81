use sqlx::PgPool;

use crate::models::User;

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.password)
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password, created_at
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}
