use std::fmt::{Display, Formatter};

use sbaa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::privilege::PrivilegeScope;

const SEGMENT_LABELS: [&str; 4] = ["sbe", "tenant", "ods", "edorg"];

/// A concrete resource addressed by its ancestry.
///
/// Ids are ordered environment, Ed-Fi tenant, ODS, ed-org. A path always
/// starts at an environment and never skips a level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct ResourcePath {
    ids: Vec<i64>,
}

impl ResourcePath {
    /// Path of a Starting Blocks environment.
    #[must_use]
    pub fn sb_environment(sb_environment_id: i64) -> Self {
        Self {
            ids: vec![sb_environment_id],
        }
    }

    /// Path of an Ed-Fi tenant.
    #[must_use]
    pub fn edfi_tenant(sb_environment_id: i64, edfi_tenant_id: i64) -> Self {
        Self {
            ids: vec![sb_environment_id, edfi_tenant_id],
        }
    }

    /// Path of an ODS instance.
    #[must_use]
    pub fn ods(sb_environment_id: i64, edfi_tenant_id: i64, ods_id: i64) -> Self {
        Self {
            ids: vec![sb_environment_id, edfi_tenant_id, ods_id],
        }
    }

    /// Path of an education organization.
    #[must_use]
    pub fn edorg(sb_environment_id: i64, edfi_tenant_id: i64, ods_id: i64, edorg_id: i64) -> Self {
        Self {
            ids: vec![sb_environment_id, edfi_tenant_id, ods_id, edorg_id],
        }
    }

    /// Builds a path from ancestry ids, outermost first.
    pub fn from_ids(ids: Vec<i64>) -> AppResult<Self> {
        if ids.is_empty() || ids.len() > SEGMENT_LABELS.len() {
            return Err(AppError::Validation(format!(
                "resource path must contain between 1 and {} ids, got {}",
                SEGMENT_LABELS.len(),
                ids.len()
            )));
        }

        Ok(Self { ids })
    }

    /// Builds a path from nullable storage columns.
    ///
    /// Columns after the first `None` must also be `None`.
    pub fn from_columns(
        sb_environment_id: i64,
        edfi_tenant_id: Option<i64>,
        ods_id: Option<i64>,
        edorg_id: Option<i64>,
    ) -> AppResult<Self> {
        let mut ids = vec![sb_environment_id];
        let mut ended = false;
        for value in [edfi_tenant_id, ods_id, edorg_id] {
            match (value, ended) {
                (Some(id), false) => ids.push(id),
                (Some(_), true) => {
                    return Err(AppError::Validation(
                        "resource path columns must not skip a level".to_owned(),
                    ));
                }
                (None, _) => ended = true,
            }
        }

        Ok(Self { ids })
    }

    /// Returns the ancestry ids, outermost first.
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        self.ids.as_slice()
    }

    /// Returns the id at a given depth, if the path is that deep.
    #[must_use]
    pub fn id_at(&self, depth: usize) -> Option<i64> {
        self.ids.get(depth).copied()
    }

    /// Returns the environment the resource belongs to.
    #[must_use]
    pub fn sb_environment_id(&self) -> i64 {
        self.ids[0]
    }

    /// Returns the level of the addressed resource.
    #[must_use]
    pub fn level(&self) -> PrivilegeScope {
        match self.ids.len() {
            1 => PrivilegeScope::SbEnvironment,
            2 => PrivilegeScope::EdfiTenant,
            3 => PrivilegeScope::Ods,
            _ => PrivilegeScope::Edorg,
        }
    }

    /// Returns whether this resource is `ancestor` or one of its descendants.
    #[must_use]
    pub fn is_within(&self, ancestor: &ResourcePath) -> bool {
        self.ids.starts_with(ancestor.ids.as_slice())
    }

    /// Truncates the path to the given level, if it is at least that deep.
    #[must_use]
    pub fn truncate_to(&self, level: PrivilegeScope) -> Option<ResourcePath> {
        let depth = level.path_depth();
        if depth == 0 || depth > self.ids.len() {
            return None;
        }

        Some(Self {
            ids: self.ids[..depth].to_vec(),
        })
    }
}

impl TryFrom<Vec<i64>> for ResourcePath {
    type Error = AppError;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_ids(value)
    }
}

impl From<ResourcePath> for Vec<i64> {
    fn from(value: ResourcePath) -> Self {
        value.ids
    }
}

impl Display for ResourcePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, (label, id)) in SEGMENT_LABELS.iter().zip(&self.ids).enumerate() {
            if index > 0 {
                formatter.write_str("/")?;
            }
            write!(formatter, "{label}/{id}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::privilege::PrivilegeScope;

    use super::ResourcePath;

    #[test]
    fn descendant_is_within_ancestor() {
        let environment = ResourcePath::sb_environment(1);
        let ods = ResourcePath::ods(1, 2, 3);

        assert!(ods.is_within(&environment));
        assert!(ods.is_within(&ods));
        assert!(!environment.is_within(&ods));
        assert!(!ods.is_within(&ResourcePath::sb_environment(9)));
    }

    #[test]
    fn level_follows_depth() {
        assert_eq!(ResourcePath::edfi_tenant(1, 2).level(), PrivilegeScope::EdfiTenant);
        assert_eq!(ResourcePath::edorg(1, 2, 3, 4).level(), PrivilegeScope::Edorg);
    }

    #[test]
    fn from_columns_rejects_gaps() {
        assert!(ResourcePath::from_columns(1, None, Some(3), None).is_err());
        assert!(matches!(
            ResourcePath::from_columns(1, Some(2), Some(3), None),
            Ok(path) if path == ResourcePath::ods(1, 2, 3)
        ));
    }

    #[test]
    fn from_ids_rejects_empty_and_overlong_paths() {
        assert!(ResourcePath::from_ids(Vec::new()).is_err());
        assert!(ResourcePath::from_ids(vec![1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn truncate_to_returns_ancestor() {
        let edorg = ResourcePath::edorg(1, 2, 3, 4);
        assert_eq!(
            edorg.truncate_to(PrivilegeScope::EdfiTenant),
            Some(ResourcePath::edfi_tenant(1, 2))
        );
        assert_eq!(ResourcePath::sb_environment(1).truncate_to(PrivilegeScope::Ods), None);
    }

    #[test]
    fn display_labels_each_segment() {
        assert_eq!(ResourcePath::ods(1, 2, 3).to_string(), "sbe/1/tenant/2/ods/3");
    }

    #[test]
    fn serializes_as_id_array() {
        let encoded = serde_json::to_string(&ResourcePath::edfi_tenant(4, 5));
        assert!(matches!(encoded.as_deref(), Ok("[4,5]")));

        let decoded = serde_json::from_str::<ResourcePath>("[]");
        assert!(decoded.is_err());
    }
}
