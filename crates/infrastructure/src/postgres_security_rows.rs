use std::str::FromStr;

use chrono::{DateTime, Utc};
use sbaa_core::{AppError, AppResult, TenantId};
use sbaa_domain::{Ownership, OwnershipId, PrivilegeCode, ResourcePath, Role, RoleId, RoleType};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

/// Which roles to load.
pub(crate) enum RoleSelection<'a> {
    All,
    Ids(&'a [Uuid]),
    Name(&'a str),
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_name: String,
    description: Option<String>,
    role_type: String,
    privilege: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct OwnershipRow {
    id: Uuid,
    tenant_id: Uuid,
    role_id: Uuid,
    sb_environment_id: i64,
    edfi_tenant_id: Option<i64>,
    ods_id: Option<i64>,
    edorg_id: Option<i64>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl OwnershipRow {
    pub(crate) fn into_ownership(self) -> AppResult<Ownership> {
        let resource = ResourcePath::from_columns(
            self.sb_environment_id,
            self.edfi_tenant_id,
            self.ods_id,
            self.edorg_id,
        )
        .map_err(|error| {
            AppError::Internal(format!(
                "invalid stored resource for ownership '{}': {error}",
                self.id
            ))
        })?;

        Ownership::restore(
            OwnershipId::from_uuid(self.id),
            TenantId::from_uuid(self.tenant_id),
            RoleId::from_uuid(self.role_id),
            resource,
            self.created_at,
            self.deleted_at,
        )
        .map_err(|error| {
            AppError::Internal(format!("invalid stored ownership '{}': {error}", self.id))
        })
    }
}

pub(crate) const OWNERSHIP_COLUMNS: &str = r#"
    ownerships.id,
    ownerships.tenant_id,
    ownerships.role_id,
    ownerships.sb_environment_id,
    ownerships.edfi_tenant_id,
    ownerships.ods_id,
    ownerships.edorg_id,
    ownerships.created_at,
    ownerships.deleted_at
"#;

/// Splits a resource path into its nullable storage columns.
pub(crate) fn resource_columns(
    resource: &ResourcePath,
) -> (i64, Option<i64>, Option<i64>, Option<i64>) {
    (
        resource.sb_environment_id(),
        resource.id_at(1),
        resource.id_at(2),
        resource.id_at(3),
    )
}

/// Loads roles with their privileges, ordered by name.
pub(crate) async fn fetch_roles(
    connection: &mut PgConnection,
    selection: RoleSelection<'_>,
) -> AppResult<Vec<Role>> {
    let select = r#"
        SELECT
            roles.id AS role_id,
            roles.name AS role_name,
            roles.description,
            roles.role_type,
            role_privileges.privilege
        FROM roles
        LEFT JOIN role_privileges
            ON role_privileges.role_id = roles.id
    "#;
    let order = "ORDER BY roles.name, role_privileges.privilege";

    let rows = match selection {
        RoleSelection::All => {
            sqlx::query_as::<_, RoleRow>(&format!("{select} {order}"))
                .fetch_all(&mut *connection)
                .await
        }
        RoleSelection::Ids(role_ids) => {
            sqlx::query_as::<_, RoleRow>(&format!("{select} WHERE roles.id = ANY($1) {order}"))
                .bind(role_ids)
                .fetch_all(&mut *connection)
                .await
        }
        RoleSelection::Name(name) => {
            sqlx::query_as::<_, RoleRow>(&format!("{select} WHERE roles.name = $1 {order}"))
                .bind(name)
                .fetch_all(&mut *connection)
                .await
        }
    }
    .map_err(|error| AppError::Internal(format!("failed to load roles: {error}")))?;

    assemble_roles(rows)
}

fn assemble_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    let mut grouped: Vec<(RoleRow, Vec<PrivilegeCode>)> = Vec::new();

    for mut row in rows {
        let privilege = row
            .privilege
            .take()
            .map(|value| {
                PrivilegeCode::from_str(value.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid stored privilege '{value}' for role '{}': {error}",
                        row.role_id
                    ))
                })
            })
            .transpose()?;

        let same_role = grouped
            .last()
            .is_some_and(|(current, _)| current.role_id == row.role_id);
        if !same_role {
            grouped.push((row, privilege.into_iter().collect()));
        } else if let Some((_, privileges)) = grouped.last_mut() {
            privileges.extend(privilege);
        }
    }

    grouped
        .into_iter()
        .map(|(row, privileges)| {
            let role_type = RoleType::from_str(row.role_type.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "invalid stored role type for role '{}': {error}",
                    row.role_id
                ))
            })?;

            Role::new(
                RoleId::from_uuid(row.role_id),
                row.role_name,
                row.description,
                role_type,
                privileges,
            )
            .map_err(|error| {
                AppError::Internal(format!("invalid stored role '{}': {error}", row.role_id))
            })
        })
        .collect()
}

/// Maps a unique violation to a conflict, anything else to an internal error.
pub(crate) fn map_unique_conflict(
    error: sqlx::Error,
    conflict: impl FnOnce() -> String,
    context: &str,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict());
    }

    AppError::Internal(format!("failed to {context}: {error}"))
}
