use super::*;

#[derive(Debug, FromRow)]
struct MembershipRow {
    tenant_id: Uuid,
    subject: String,
    role_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    subject: String,
    display_name: String,
    email: Option<String>,
    global_role_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct SbEnvironmentRow {
    id: i64,
    name: String,
}

impl From<TeamRow> for TeamDefinition {
    fn from(row: TeamRow) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(row.id),
            name: row.name,
        }
    }
}

impl From<SbEnvironmentRow> for SbEnvironmentSummary {
    fn from(row: SbEnvironmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_memberships_impl(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Vec<TenantMembership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT tenant_id, subject, role_id
            FROM user_team_memberships
            WHERE tenant_id = $1
            ORDER BY subject
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list memberships: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| TenantMembership {
                tenant_id: TenantId::from_uuid(row.tenant_id),
                subject: row.subject,
                role_id: row.role_id.map(RoleId::from_uuid),
            })
            .collect())
    }

    pub(super) async fn upsert_membership_impl(
        &self,
        membership: &TenantMembership,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_team_memberships (tenant_id, subject, role_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (tenant_id, subject) DO UPDATE
            SET role_id = EXCLUDED.role_id
            "#,
        )
        .bind(membership.tenant_id.as_uuid())
        .bind(membership.subject.as_str())
        .bind(membership.role_id.map(|role_id| role_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save membership: {error}")))?;

        Ok(())
    }

    pub(super) async fn remove_membership_impl(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_team_memberships
            WHERE tenant_id = $1
                AND subject = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(subject)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove membership: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "user '{subject}' is not a member of team '{tenant_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn find_user_impl(&self, subject: &str) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT subject, display_name, email, global_role_id
            FROM users
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        Ok(row.map(|row| UserAccount {
            subject: row.subject,
            display_name: row.display_name,
            email: row.email,
            global_role_id: row.global_role_id.map(RoleId::from_uuid),
        }))
    }

    pub(super) async fn ensure_user_impl(&self, identity: &UserIdentity) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (subject, display_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                updated_at = now()
            "#,
        )
        .bind(identity.subject())
        .bind(identity.display_name())
        .bind(identity.email())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save user: {error}")))?;

        Ok(())
    }

    pub(super) async fn set_global_role_impl(
        &self,
        subject: &str,
        role_id: Option<RoleId>,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET global_role_id = $2,
                updated_at = now()
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .bind(role_id.map(|role_id| role_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to set global role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{subject}' does not exist")));
        }

        Ok(())
    }

    pub(super) async fn create_team_impl(&self, team: &TeamDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(team.tenant_id.as_uuid())
        .bind(team.name.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_conflict(
                error,
                || format!("team '{}' already exists", team.tenant_id),
                "create team",
            )
        })?;

        Ok(())
    }

    pub(super) async fn find_team_impl(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Option<TeamDefinition>> {
        let row = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM tenants WHERE id = $1")
            .bind(tenant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find team: {error}")))?;

        Ok(row.map(TeamDefinition::from))
    }

    pub(super) async fn list_teams_impl(&self) -> AppResult<Vec<TeamDefinition>> {
        let rows = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM tenants ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list teams: {error}")))?;

        Ok(rows.into_iter().map(TeamDefinition::from).collect())
    }

    pub(super) async fn list_sb_environments_impl(&self) -> AppResult<Vec<SbEnvironmentSummary>> {
        let rows = sqlx::query_as::<_, SbEnvironmentRow>(
            "SELECT id, name FROM sb_environments ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list environments: {error}")))?;

        Ok(rows.into_iter().map(SbEnvironmentSummary::from).collect())
    }

    pub(super) async fn find_sb_environment_impl(
        &self,
        sb_environment_id: i64,
    ) -> AppResult<Option<SbEnvironmentSummary>> {
        let row = sqlx::query_as::<_, SbEnvironmentRow>(
            "SELECT id, name FROM sb_environments WHERE id = $1",
        )
        .bind(sb_environment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find environment: {error}")))?;

        Ok(row.map(SbEnvironmentSummary::from))
    }
}
