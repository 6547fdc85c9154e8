use crate::privilege::{PrivilegeAction, PrivilegeCode};

/// Read privileges that satisfy read checks at every ancestor level.
///
/// Enumerated rather than derived from the hierarchy so every inheritance
/// edge is reviewable in one place. Only reads used by app navigation are
/// listed; holding a child read never grants a parent write.
pub const UPWARD_INHERITANCE: &[PrivilegeCode] = &[
    PrivilegeCode::TeamSbEnvironmentRead,
    PrivilegeCode::TeamSbEnvironmentEdfiTenantRead,
    PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead,
    PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsEdorgRead,
    PrivilegeCode::TeamSbEnvironmentEdfiTenantVendorRead,
    PrivilegeCode::TeamSbEnvironmentEdfiTenantClaimsetRead,
];

/// Returns whether the privilege participates in upward inheritance.
#[must_use]
pub fn is_inherited(code: PrivilegeCode) -> bool {
    UPWARD_INHERITANCE.contains(&code)
}

/// Returns whether holding `held` satisfies a check for `required`.
///
/// A code always satisfies itself. Otherwise both codes must be inherited
/// reads and `required` must sit on an ancestor level of `held`'s chain.
#[must_use]
pub fn implies(held: PrivilegeCode, required: PrivilegeCode) -> bool {
    if held == required {
        return true;
    }

    if !is_inherited(held) || !is_inherited(required) {
        return false;
    }

    // Only reads inherit.
    if held.action() != PrivilegeAction::Read || required.action() != PrivilegeAction::Read {
        return false;
    }

    let held_segments: Vec<_> = held.resource_segments().collect();
    let required_segments: Vec<_> = required.resource_segments().collect();

    required_segments.len() < held_segments.len() && held_segments.starts_with(&required_segments)
}

/// Returns every privilege whose possession satisfies a check for `required`.
pub fn satisfying_privileges(required: PrivilegeCode) -> impl Iterator<Item = PrivilegeCode> {
    PrivilegeCode::all().filter(move |held| implies(*held, required))
}
