use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_ownerships_impl(
        &self,
        tenant_id: TenantId,
        include_revoked: bool,
    ) -> AppResult<Vec<Ownership>> {
        let rows = sqlx::query_as::<_, OwnershipRow>(&format!(
            r#"
            SELECT {OWNERSHIP_COLUMNS}
            FROM ownerships
            WHERE ownerships.tenant_id = $1
                AND ($2 OR ownerships.deleted_at IS NULL)
            ORDER BY ownerships.created_at, ownerships.id
            "#
        ))
        .bind(tenant_id.as_uuid())
        .bind(include_revoked)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list ownerships: {error}")))?;

        rows.into_iter().map(OwnershipRow::into_ownership).collect()
    }

    pub(super) async fn find_ownership_impl(
        &self,
        ownership_id: OwnershipId,
    ) -> AppResult<Option<Ownership>> {
        sqlx::query_as::<_, OwnershipRow>(&format!(
            r#"
            SELECT {OWNERSHIP_COLUMNS}
            FROM ownerships
            WHERE ownerships.id = $1
            "#
        ))
        .bind(ownership_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find ownership: {error}")))?
        .map(OwnershipRow::into_ownership)
        .transpose()
    }

    pub(super) async fn create_ownership_impl(&self, ownership: &Ownership) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_exists = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM roles
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(ownership.role_id().as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role: {error}")))?;
        if role_exists.is_none() {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                ownership.role_id()
            )));
        }

        let (sb_environment_id, edfi_tenant_id, ods_id, edorg_id) =
            resource_columns(ownership.resource());
        sqlx::query(
            r#"
            INSERT INTO ownerships (
                id,
                tenant_id,
                role_id,
                sb_environment_id,
                edfi_tenant_id,
                ods_id,
                edorg_id,
                created_at,
                deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(ownership.id().as_uuid())
        .bind(ownership.tenant_id().as_uuid())
        .bind(ownership.role_id().as_uuid())
        .bind(sb_environment_id)
        .bind(edfi_tenant_id)
        .bind(ods_id)
        .bind(edorg_id)
        .bind(ownership.created_at())
        .bind(ownership.deleted_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            map_unique_conflict(
                error,
                || {
                    format!(
                        "team '{}' already owns '{}'",
                        ownership.tenant_id(),
                        ownership.resource()
                    )
                },
                "create ownership",
            )
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }

    pub(super) async fn revoke_ownership_impl(
        &self,
        ownership_id: OwnershipId,
        revoked_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE ownerships
            SET deleted_at = $2
            WHERE id = $1
                AND deleted_at IS NULL
            "#,
        )
        .bind(ownership_id.as_uuid())
        .bind(revoked_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke ownership: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "ownership '{ownership_id}' is missing or already revoked"
            )));
        }

        Ok(())
    }
}
