use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_by_id_impl(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, superteam_level, created_at
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    pub(super) async fn count_users_impl(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))
    }
}
