use super::*;

impl PostgresUserRepository {
    pub(super) async fn apply_superteam_level_impl(
        &self,
        user_id: UserId,
        normalized_email: &str,
        level: &SuperteamLevel,
    ) -> AppResult<u64> {
        // Both id and email must still match; the email may have changed
        // since the refresh was requested.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET superteam_level = $3
            WHERE id = $1 AND email = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(normalized_email)
        .bind(level.to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update superteam level: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}
