use crate::rows::UserRow;
use crate::{PostgresStore, db_error, storage};
use async_trait::async_trait;
use cowork_core::{Result, User, UserId, UserStore};

const COLUMNS: &str = "id, name, email, tel, role, password_hash, created_at";

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage("get user"))?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage("get user by email"))?;
        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: User) -> Result<User> {
        sqlx::query(&format!(
            "INSERT INTO users ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.tel)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create user", || {
            format!("Email {} is already registered", user.email)
        }))?;
        Ok(user)
    }
}
