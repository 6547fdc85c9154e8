use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use sbaa_application::AuthorizationRepository;
use sbaa_core::{AppError, AppResult, TenantId};
use sbaa_domain::{OwnershipGrant, PrivilegeSources, Role};

use crate::postgres_security_rows::{
    OWNERSHIP_COLUMNS, OwnershipRow, RoleSelection, fetch_roles,
};

/// PostgreSQL-backed repository for privilege source lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn load_privilege_sources(
        &self,
        subject: &str,
        tenant_id: Option<TenantId>,
    ) -> AppResult<PrivilegeSources> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // One snapshot for every query below.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to set snapshot isolation: {error}"))
            })?;

        let sources = load_sources(&mut *transaction, subject, tenant_id).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(sources)
    }
}

async fn load_sources(
    connection: &mut PgConnection,
    subject: &str,
    tenant_id: Option<TenantId>,
) -> AppResult<PrivilegeSources> {
    let global_role_id = sqlx::query_scalar::<_, Option<Uuid>>(
        r#"
        SELECT global_role_id
        FROM users
        WHERE subject = $1
        "#,
    )
    .bind(subject)
    .fetch_optional(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load global role: {error}")))?
    .flatten();
    let global_role = find_role(connection, global_role_id).await?;

    let Some(tenant_id) = tenant_id else {
        return Ok(PrivilegeSources {
            global_role,
            ..PrivilegeSources::default()
        });
    };

    let membership = sqlx::query_scalar::<_, Option<Uuid>>(
        r#"
        SELECT role_id
        FROM user_team_memberships
        WHERE tenant_id = $1
            AND subject = $2
        "#,
    )
    .bind(tenant_id.as_uuid())
    .bind(subject)
    .fetch_optional(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load team membership: {error}")))?;

    let Some(membership_role_id) = membership else {
        return Ok(PrivilegeSources {
            global_role,
            ..PrivilegeSources::default()
        });
    };
    let membership_role = find_role(connection, membership_role_id).await?;

    let rows = sqlx::query_as::<_, OwnershipRow>(&format!(
        r#"
        SELECT {OWNERSHIP_COLUMNS}
        FROM ownerships
        WHERE ownerships.tenant_id = $1
            AND ownerships.deleted_at IS NULL
        ORDER BY ownerships.created_at
        "#
    ))
    .bind(tenant_id.as_uuid())
    .fetch_all(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load team ownerships: {error}")))?;

    let ownerships = rows
        .into_iter()
        .map(OwnershipRow::into_ownership)
        .collect::<AppResult<Vec<_>>>()?;

    let mut role_ids: Vec<Uuid> = ownerships
        .iter()
        .map(|ownership| ownership.role_id().as_uuid())
        .collect();
    role_ids.sort_unstable();
    role_ids.dedup();
    let roles = fetch_roles(connection, RoleSelection::Ids(&role_ids)).await?;

    let ownerships = ownerships
        .into_iter()
        .filter_map(|ownership| {
            roles
                .iter()
                .find(|role| role.id() == ownership.role_id())
                .map(|role| OwnershipGrant {
                    ownership,
                    role: role.clone(),
                })
        })
        .collect();

    Ok(PrivilegeSources {
        global_role,
        membership_role,
        ownerships,
    })
}

async fn find_role(connection: &mut PgConnection, role_id: Option<Uuid>) -> AppResult<Option<Role>> {
    let Some(role_id) = role_id else {
        return Ok(None);
    };

    Ok(fetch_roles(connection, RoleSelection::Ids(&[role_id]))
        .await?
        .into_iter()
        .next())
}
