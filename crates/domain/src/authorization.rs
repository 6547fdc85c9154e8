use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use sbaa_core::{AppError, AppResult, TenantId};

use crate::inheritance::satisfying_privileges;
use crate::ownership::Ownership;
use crate::privilege::{PrivilegeCode, PrivilegeScope};
use crate::resource::ResourcePath;
use crate::role::Role;

/// Ownership paired with the role it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipGrant {
    /// Ownership record, possibly revoked.
    pub ownership: Ownership,
    /// Role referenced by the ownership.
    pub role: Role,
}

/// Everything loaded for one user and one team before evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSources {
    /// The user's global role.
    pub global_role: Option<Role>,
    /// Role of the user's membership in the team.
    pub membership_role: Option<Role>,
    /// Ownerships held by the team.
    pub ownerships: Vec<OwnershipGrant>,
}

/// Union of every privilege a user holds in one team context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePrivileges {
    tenant_id: Option<TenantId>,
    global: BTreeSet<PrivilegeCode>,
    team: BTreeSet<PrivilegeCode>,
    resources: BTreeMap<PrivilegeCode, BTreeSet<ResourcePath>>,
}

impl EffectivePrivileges {
    /// Aggregates privilege sources into a deduplicated effective set.
    ///
    /// Resource privileges from the membership role cover every resource the
    /// team actively owns. Resource privileges from an ownership role cover
    /// only that ownership's resource. Revoked ownerships, ownerships of
    /// other teams and mismatched role pairs contribute nothing.
    #[must_use]
    pub fn aggregate(tenant_id: Option<TenantId>, sources: &PrivilegeSources) -> Self {
        let mut privileges = Self {
            tenant_id,
            ..Self::default()
        };

        if let Some(role) = &sources.global_role {
            privileges.global.extend(
                role.privileges()
                    .iter()
                    .copied()
                    .filter(|code| code.scope() == PrivilegeScope::Global),
            );
        }

        let Some(tenant_id) = tenant_id else {
            return privileges;
        };

        let active_grants: Vec<&OwnershipGrant> = sources
            .ownerships
            .iter()
            .filter(|grant| {
                grant.ownership.is_active()
                    && grant.ownership.tenant_id() == tenant_id
                    && grant.ownership.role_id() == grant.role.id()
            })
            .collect();

        if let Some(role) = &sources.membership_role {
            for code in role.privileges().iter().copied() {
                match code.scope() {
                    PrivilegeScope::Global => {}
                    PrivilegeScope::Team => {
                        privileges.team.insert(code);
                    }
                    _ => {
                        for grant in &active_grants {
                            privileges.cover(code, grant.ownership.resource());
                        }
                    }
                }
            }
        }

        for grant in &active_grants {
            for code in grant.role.privileges().iter().copied() {
                if code.scope().is_resource() {
                    privileges.cover(code, grant.ownership.resource());
                }
            }
        }

        privileges
    }

    fn cover(&mut self, code: PrivilegeCode, path: &ResourcePath) {
        self.resources
            .entry(code)
            .or_default()
            .insert(path.clone());
    }

    /// Returns the team context, if any.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Returns global privileges.
    #[must_use]
    pub fn global(&self) -> &BTreeSet<PrivilegeCode> {
        &self.global
    }

    /// Returns team-wide privileges.
    #[must_use]
    pub fn team(&self) -> &BTreeSet<PrivilegeCode> {
        &self.team
    }

    /// Returns resource privileges with the resources each one covers.
    #[must_use]
    pub fn resources(&self) -> &BTreeMap<PrivilegeCode, BTreeSet<ResourcePath>> {
        &self.resources
    }

    /// Returns every distinct privilege code held, ignoring coverage.
    #[must_use]
    pub fn codes(&self) -> BTreeSet<PrivilegeCode> {
        self.global
            .iter()
            .chain(self.team.iter())
            .chain(self.resources.keys())
            .copied()
            .collect()
    }

    fn in_context(&self, tenant_id: TenantId) -> bool {
        self.tenant_id == Some(tenant_id)
    }

    fn access_filter(&self, tenant_id: TenantId, required: PrivilegeCode) -> AccessFilter {
        let mut paths = BTreeSet::new();
        let mut inherited_paths = BTreeSet::new();

        for held in satisfying_privileges(required) {
            let Some(covered) = self.resources.get(&held) else {
                continue;
            };
            // Only a deeper code reaches ancestors of the resources it covers.
            let target = if held == required {
                &mut paths
            } else {
                &mut inherited_paths
            };
            target.extend(covered.iter().cloned());
        }

        AccessFilter {
            tenant_id,
            privilege: required,
            paths,
            inherited_paths,
        }
    }
}

/// Resource instance an authorization check is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationSubject {
    /// A global action not tied to any team.
    Global,
    /// An action on the team itself.
    Team(TenantId),
    /// An action on one concrete resource.
    Resource {
        /// Team acting on the resource.
        tenant_id: TenantId,
        /// Resource addressed by the action.
        path: ResourcePath,
    },
    /// Any resource instance; the caller filters the result collection.
    AnyInstance(TenantId),
}

impl AuthorizationSubject {
    /// Returns the team the subject is scoped to, if any.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            Self::Global => None,
            Self::Team(tenant_id) | Self::AnyInstance(tenant_id) => Some(*tenant_id),
            Self::Resource { tenant_id, .. } => Some(*tenant_id),
        }
    }
}

impl Display for AuthorizationSubject {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => formatter.write_str("global"),
            Self::Team(tenant_id) => write!(formatter, "team/{tenant_id}"),
            Self::Resource { tenant_id, path } => write!(formatter, "team/{tenant_id}/{path}"),
            Self::AnyInstance(tenant_id) => write!(formatter, "team/{tenant_id}/*"),
        }
    }
}

/// Resources a collection request may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessFilter {
    tenant_id: TenantId,
    privilege: PrivilegeCode,
    paths: BTreeSet<ResourcePath>,
    inherited_paths: BTreeSet<ResourcePath>,
}

impl AccessFilter {
    /// Returns the team the filter applies to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the privilege the filter was computed for.
    #[must_use]
    pub fn privilege(&self) -> PrivilegeCode {
        self.privilege
    }

    /// Returns resource roots covered by the privilege itself.
    #[must_use]
    pub fn paths(&self) -> &BTreeSet<ResourcePath> {
        &self.paths
    }

    /// Returns resource roots covered by deeper reads that imply the
    /// privilege. Their ancestors are permitted as well.
    #[must_use]
    pub fn inherited_paths(&self) -> &BTreeSet<ResourcePath> {
        &self.inherited_paths
    }

    /// Returns whether nothing is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.inherited_paths.is_empty()
    }

    /// Returns whether a resource at the privilege's level may be returned.
    #[must_use]
    pub fn permits(&self, resource: &ResourcePath) -> bool {
        if resource.level() != self.privilege.scope() {
            return false;
        }

        self.paths.iter().any(|path| resource.is_within(path))
            || self
                .inherited_paths
                .iter()
                .any(|path| resource.is_within(path) || path.is_within(resource))
    }

    /// Returns environments containing at least one permitted resource.
    #[must_use]
    pub fn sb_environment_ids(&self) -> BTreeSet<i64> {
        let scope = self.privilege.scope();
        self.paths
            .iter()
            .filter(|path| path.level() <= scope)
            .chain(self.inherited_paths.iter())
            .map(ResourcePath::sb_environment_id)
            .collect()
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// The point check passed.
    Allow,
    /// The privilege is not held for the subject.
    Deny,
    /// Collection request: results must be restricted to the filter.
    Filter(AccessFilter),
}

/// Decides whether the effective privileges satisfy `required` for `subject`.
///
/// Only malformed input is an error: a subject whose kind or level does not
/// match the privilege's scope. A subject in another team than the
/// privilege context is denied.
pub fn authorize(
    privileges: &EffectivePrivileges,
    required: PrivilegeCode,
    subject: &AuthorizationSubject,
) -> AppResult<AuthorizationDecision> {
    let scope = required.scope();

    let decision = match subject {
        AuthorizationSubject::Global => {
            expect_scope(required, subject, scope == PrivilegeScope::Global)?;
            allow_if(privileges.global.contains(&required))
        }
        AuthorizationSubject::Team(tenant_id) => {
            expect_scope(required, subject, scope == PrivilegeScope::Team)?;
            allow_if(privileges.in_context(*tenant_id) && privileges.team.contains(&required))
        }
        AuthorizationSubject::Resource { tenant_id, path } => {
            expect_scope(required, subject, path.level() == scope)?;
            allow_if(
                privileges.in_context(*tenant_id)
                    && privileges.access_filter(*tenant_id, required).permits(path),
            )
        }
        AuthorizationSubject::AnyInstance(tenant_id) => {
            expect_scope(required, subject, scope.is_resource())?;
            if !privileges.in_context(*tenant_id) {
                return Ok(AuthorizationDecision::Deny);
            }

            let filter = privileges.access_filter(*tenant_id, required);
            if filter.is_empty() {
                AuthorizationDecision::Deny
            } else {
                AuthorizationDecision::Filter(filter)
            }
        }
    };

    Ok(decision)
}

fn allow_if(allowed: bool) -> AuthorizationDecision {
    if allowed {
        AuthorizationDecision::Allow
    } else {
        AuthorizationDecision::Deny
    }
}

fn expect_scope(
    required: PrivilegeCode,
    subject: &AuthorizationSubject,
    matches: bool,
) -> AppResult<()> {
    if matches {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "privilege '{}' is evaluated at '{}' scope and cannot be checked against subject '{subject}'",
        required.as_str(),
        required.scope().as_str()
    )))
}
