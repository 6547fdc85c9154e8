use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<Role>> {
        let mut connection = self.acquire().await?;
        fetch_roles(&mut connection, RoleSelection::All).await
    }

    pub(super) async fn find_role_impl(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let mut connection = self.acquire().await?;
        Ok(
            fetch_roles(&mut connection, RoleSelection::Ids(&[role_id.as_uuid()]))
                .await?
                .into_iter()
                .next(),
        )
    }

    pub(super) async fn find_role_by_name_impl(&self, name: &str) -> AppResult<Option<Role>> {
        let mut connection = self.acquire().await?;
        Ok(fetch_roles(&mut connection, RoleSelection::Name(name))
            .await?
            .into_iter()
            .next())
    }

    pub(super) async fn create_role_impl(&self, role: &Role) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, role_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.role_type().as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            map_unique_conflict(
                error,
                || format!("role '{}' already exists", role.name()),
                "create role",
            )
        })?;

        for privilege in role.privileges() {
            sqlx::query(
                r#"
                INSERT INTO role_privileges (role_id, privilege)
                VALUES ($1, $2)
                "#,
            )
            .bind(role.id().as_uuid())
            .bind(privilege.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role privileges: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // Row lock serializes with ownership grants referencing the role.
        let locked = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM roles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role: {error}")))?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM users WHERE global_role_id = $1)
                OR EXISTS (SELECT 1 FROM user_team_memberships WHERE role_id = $1)
                OR EXISTS (
                    SELECT 1
                    FROM ownerships
                    WHERE role_id = $1
                        AND deleted_at IS NULL
                )
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check role references: {error}")))?;
        if referenced {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still attached to a user, a membership or an ownership"
            )));
        }

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}
