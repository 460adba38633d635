#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::embedded::G_GROUPS_CSV;
use crate::error::RegistryError;
use crate::loader::parse_g_groups_csv;
use crate::types::{GGroup, normalize_code};

/// Read-only index over the G-group definitions.
///
/// Built once and passed by reference to the components that resolve codes
/// and group columns. It is `Send + Sync`, so a single instance can serve
/// conversions running on several threads.
#[derive(Debug, Clone)]
pub struct GGroupRegistry {
    groups: Vec<GGroup>,
    by_short_name: BTreeMap<String, usize>,
    by_code: BTreeMap<String, usize>,
}

impl GGroupRegistry {
    /// Builds the registry from the table bundled with this crate.
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_csv_str(G_GROUPS_CSV)
    }

    /// Builds a registry from a CSV table in the bundled format.
    pub fn from_csv_str(contents: &str) -> Result<Self, RegistryError> {
        Self::from_groups(parse_g_groups_csv(contents)?)
    }

    /// Builds a registry from already parsed groups.
    ///
    /// Short names and entry codes must be unique across all groups.
    pub fn from_groups(mut groups: Vec<GGroup>) -> Result<Self, RegistryError> {
        groups.sort_by_key(|g| g.nr);
        let mut by_short_name = BTreeMap::new();
        let mut by_code = BTreeMap::new();
        for (idx, group) in groups.iter().enumerate() {
            if let Some(prev) = by_short_name.insert(group.short_name.clone(), idx) {
                return Err(RegistryError::DuplicateShortName {
                    short_name: group.short_name.clone(),
                    first: groups[prev].nr,
                    second: group.nr,
                });
            }
            for entry in &group.entries {
                if let Some(prev) = by_code.insert(normalize_code(&entry.id), idx) {
                    return Err(RegistryError::DuplicateEntry {
                        entry_id: entry.id.clone(),
                        first: groups[prev].nr,
                        second: group.nr,
                    });
                }
            }
        }
        debug!(
            groups = groups.len(),
            codes = by_code.len(),
            "loaded G-group registry"
        );
        Ok(Self {
            groups,
            by_short_name,
            by_code,
        })
    }

    /// Returns true if `short_name` names a known group.
    pub fn is_group(&self, short_name: &str) -> bool {
        self.by_short_name.contains_key(short_name)
    }

    /// Returns whether the group is modal.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownGroup`] if `short_name` is not a
    /// known group.
    pub fn is_modal(&self, short_name: &str) -> Result<bool, RegistryError> {
        self.group(short_name)
            .map(GGroup::is_modal)
            .ok_or_else(|| RegistryError::UnknownGroup {
                short_name: short_name.to_string(),
            })
    }

    pub fn group(&self, short_name: &str) -> Option<&GGroup> {
        self.by_short_name
            .get(short_name)
            .map(|&idx| &self.groups[idx])
    }

    /// Resolves a code token (`G01`, `g1`, `CFC`) to the group it belongs to.
    pub fn group_for_code(&self, code: &str) -> Option<&GGroup> {
        self.by_code
            .get(&normalize_code(code))
            .map(|&idx| &self.groups[idx])
    }

    /// Position of the group in number order; used to order table columns.
    pub fn position(&self, short_name: &str) -> Option<usize> {
        self.by_short_name.get(short_name).copied()
    }

    /// Groups in ascending group-number order.
    pub fn groups(&self) -> &[GGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

static SHARED_REGISTRY: OnceLock<GGroupRegistry> = OnceLock::new();

/// Returns the process-wide registry built from the bundled table.
///
/// The first successful call stores the registry; later calls return the
/// same instance. Concurrent first calls may parse the table more than once,
/// but only one result is ever stored.
pub fn shared_registry() -> Result<&'static GGroupRegistry, RegistryError> {
    if let Some(registry) = SHARED_REGISTRY.get() {
        return Ok(registry);
    }
    let registry = GGroupRegistry::embedded()?;
    Ok(SHARED_REGISTRY.get_or_init(|| registry))
}
