//! Declarative per-route authorization requirements.
//!
//! Every privileged route declares the privilege it needs and how its
//! subject is derived from path parameters. The table is validated against
//! the privilege catalog once at startup; a route naming an unknown code or
//! a subject that does not fit the code's scope aborts startup.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use sbaa_core::{AppError, AppResult, TenantId};
use sbaa_domain::{AuthorizationSubject, PrivilegeCode, PrivilegeScope, ResourcePath};

/// How a route's authorization subject is derived from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRule {
    /// The route acts globally.
    Global,
    /// The route acts on the team named by a path parameter.
    Team {
        /// Path parameter holding the team id.
        team_param: &'static str,
    },
    /// The route acts on one resource named by path parameters.
    Resource {
        /// Path parameter holding the team id.
        team_param: &'static str,
        /// Path parameters holding resource ids, outermost first.
        id_params: Vec<&'static str>,
    },
    /// The route lists resources and filters them by coverage.
    AnyInstance {
        /// Path parameter holding the team id.
        team_param: &'static str,
    },
}

impl SubjectRule {
    fn params(&self) -> Vec<&'static str> {
        match self {
            Self::Global => Vec::new(),
            Self::Team { team_param } | Self::AnyInstance { team_param } => vec![*team_param],
            Self::Resource {
                team_param,
                id_params,
            } => std::iter::once(*team_param)
                .chain(id_params.iter().copied())
                .collect(),
        }
    }

    fn fits(&self, scope: PrivilegeScope) -> bool {
        match self {
            Self::Global => scope == PrivilegeScope::Global,
            Self::Team { .. } => scope == PrivilegeScope::Team,
            Self::Resource { id_params, .. } => {
                scope.is_resource() && id_params.len() == scope.path_depth()
            }
            Self::AnyInstance { .. } => scope.is_resource(),
        }
    }
}

/// Authorization requirement declared for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Upper-case HTTP method.
    pub method: &'static str,
    /// Route template, with `{param}` placeholders.
    pub path: &'static str,
    /// Required privilege, as its catalog key.
    pub privilege: &'static str,
    /// Subject resolution rule.
    pub subject: SubjectRule,
}

impl RoutePolicy {
    /// Declares a route requirement.
    #[must_use]
    pub fn new(
        method: &'static str,
        path: &'static str,
        privilege: &'static str,
        subject: SubjectRule,
    ) -> Self {
        Self {
            method,
            path,
            privilege,
            subject,
        }
    }
}

/// Route requirement checked against the privilege catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRoutePolicy {
    method: &'static str,
    path: &'static str,
    privilege: PrivilegeCode,
    subject: SubjectRule,
}

impl ValidatedRoutePolicy {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Returns the route template.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the required privilege.
    #[must_use]
    pub fn privilege(&self) -> PrivilegeCode {
        self.privilege
    }

    /// Returns the subject rule.
    #[must_use]
    pub fn subject_rule(&self) -> &SubjectRule {
        &self.subject
    }

    /// Resolves the subject from the request's path parameters.
    ///
    /// A missing or unparsable parameter fails the request.
    pub fn resolve_subject<'a>(
        &self,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> AppResult<AuthorizationSubject> {
        let params: HashMap<&str, &str> = params.into_iter().collect();

        match &self.subject {
            SubjectRule::Global => Ok(AuthorizationSubject::Global),
            SubjectRule::Team { team_param } => {
                Ok(AuthorizationSubject::Team(self.team_id(&params, team_param)?))
            }
            SubjectRule::AnyInstance { team_param } => Ok(AuthorizationSubject::AnyInstance(
                self.team_id(&params, team_param)?,
            )),
            SubjectRule::Resource {
                team_param,
                id_params,
            } => {
                let tenant_id = self.team_id(&params, team_param)?;
                let ids = id_params
                    .iter()
                    .map(|name| {
                        let value = self.param(&params, name)?;
                        value.parse::<i64>().map_err(|error| {
                            AppError::Validation(format!(
                                "path parameter '{name}' of route {} {} is not a resource id: {error}",
                                self.method, self.path
                            ))
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;

                Ok(AuthorizationSubject::Resource {
                    tenant_id,
                    path: ResourcePath::from_ids(ids)?,
                })
            }
        }
    }

    fn param<'a>(&self, params: &HashMap<&str, &'a str>, name: &str) -> AppResult<&'a str> {
        params.get(name).copied().ok_or_else(|| {
            AppError::Validation(format!(
                "route {} {} is missing path parameter '{name}'",
                self.method, self.path
            ))
        })
    }

    fn team_id(&self, params: &HashMap<&str, &str>, name: &str) -> AppResult<TenantId> {
        TenantId::from_str(self.param(params, name)?)
    }
}

/// Validated lookup table of route requirements.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicyTable {
    // method -> route template -> policy
    policies: BTreeMap<&'static str, BTreeMap<&'static str, ValidatedRoutePolicy>>,
}

impl RoutePolicyTable {
    /// Validates every declared requirement.
    ///
    /// All defects are collected into one error so a bad table reports
    /// every broken route at once.
    pub fn validate(policies: Vec<RoutePolicy>) -> AppResult<Self> {
        let mut table = Self::default();
        let mut defects = Vec::new();

        for policy in policies {
            let route = format!("{} {}", policy.method, policy.path);

            let privilege = match PrivilegeCode::from_str(policy.privilege) {
                Ok(privilege) => privilege,
                Err(_) => {
                    defects.push(format!(
                        "{route} declares unknown privilege '{}'",
                        policy.privilege
                    ));
                    continue;
                }
            };

            if !policy.subject.fits(privilege.scope()) {
                defects.push(format!(
                    "{route} resolves a {:?} subject for '{}' which is evaluated at '{}' scope",
                    policy.subject,
                    privilege.as_str(),
                    privilege.scope().as_str()
                ));
                continue;
            }

            let missing: Vec<_> = policy
                .subject
                .params()
                .into_iter()
                .filter(|name| !policy.path.contains(&format!("{{{name}}}")))
                .collect();
            if !missing.is_empty() {
                defects.push(format!(
                    "{route} resolves its subject from parameters absent from the path: {}",
                    missing.join(", ")
                ));
                continue;
            }

            let routes = table.policies.entry(policy.method).or_default();
            if routes.contains_key(policy.path) {
                defects.push(format!("{route} is declared more than once"));
                continue;
            }

            routes.insert(
                policy.path,
                ValidatedRoutePolicy {
                    method: policy.method,
                    path: policy.path,
                    privilege,
                    subject: policy.subject,
                },
            );
        }

        if !defects.is_empty() {
            return Err(AppError::Validation(format!(
                "invalid route authorization table: {}",
                defects.join("; ")
            )));
        }

        Ok(table)
    }

    /// Finds the requirement of a route template.
    #[must_use]
    pub fn lookup(&self, method: &str, path: &str) -> Option<&ValidatedRoutePolicy> {
        self.policies.get(method)?.get(path)
    }

    /// Returns the number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.values().map(BTreeMap::len).sum()
    }

    /// Returns whether no route is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
