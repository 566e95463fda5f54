//! Permission registry - a static forest of named capabilities.
//!
//! Permissions are held in an arena indexed by [`PermissionId`]; parent/child
//! links are indices into the arena, never owning references. The registry is
//! assembled once at startup through [`PermissionRegistryBuilder`] and treated
//! as read-only afterwards.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::localization::Localizer;

/// Index of a permission node in the registry arena.
pub type PermissionId = usize;

/// Which side of a multi-tenant deployment a permission is visible on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    /// Visible to the host side only.
    Host,
    /// Visible inside tenant contexts.
    Tenant,
}

/// A single node in the permission forest.
#[derive(Debug, Clone)]
pub struct PermissionNode {
    pub name: String,
    /// Localization key for the display name.
    pub display_name_key: String,
    pub scope: PermissionScope,
    pub parent: Option<PermissionId>,
    pub children: Vec<PermissionId>,
}

/// Permission names granted to one subject. Membership is by name equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantedPermissionSet(BTreeSet<String>);

impl GrantedPermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GrantedPermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One entry of a flattened permission forest: the node annotated with its
/// grant status for a subject, plus its recursively flattened children.
/// Built fresh per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedPermission {
    pub name: String,
    pub display_name: String,
    pub granted: bool,
    pub parent: Option<String>,
    pub children: Vec<FlattenedPermission>,
}

impl FlattenedPermission {
    /// Nodes in this subtree, the entry itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(FlattenedPermission::subtree_len).sum::<usize>()
    }
}

/// Raised when a walk revisits a node on its current path. The builder cannot
/// produce cycles; this guards against a registry assembled from bad
/// configuration elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub permission: String,
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "permission tree cycle at '{}'", self.permission)
    }
}

impl std::error::Error for CycleError {}

/// The full permission forest.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    nodes: Vec<PermissionNode>,
    by_name: HashMap<String, PermissionId>,
}

impl PermissionRegistry {
    pub fn builder() -> PermissionRegistryBuilder {
        PermissionRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<PermissionId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: PermissionId) -> &PermissionNode {
        &self.nodes[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionNode> {
        self.nodes.iter()
    }

    /// Top-level entries visible to a caller. Host callers see only roots;
    /// tenant callers see every tenant-visible node plus host-scoped roots.
    pub fn visible_top_level(&self, tenant_scoped: bool) -> Vec<PermissionId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                if tenant_scoped {
                    node.scope == PermissionScope::Tenant
                        || (node.scope == PermissionScope::Host && node.parent.is_none())
                } else {
                    node.parent.is_none()
                }
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Flatten the visible forest for one subject, depth-first pre-order:
    /// each entry carries its grant status and its flattened children.
    pub fn flatten(
        &self,
        granted: &GrantedPermissionSet,
        tenant_scoped: bool,
        localizer: &dyn Localizer,
    ) -> Result<Vec<FlattenedPermission>, CycleError> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for id in self.visible_top_level(tenant_scoped) {
            out.push(self.flatten_node(id, granted, localizer, &mut path)?);
        }
        Ok(out)
    }

    fn flatten_node(
        &self,
        id: PermissionId,
        granted: &GrantedPermissionSet,
        localizer: &dyn Localizer,
        path: &mut Vec<PermissionId>,
    ) -> Result<FlattenedPermission, CycleError> {
        let node = &self.nodes[id];
        if path.contains(&id) {
            return Err(CycleError {
                permission: node.name.clone(),
            });
        }
        path.push(id);

        let mut children = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            children.push(self.flatten_node(child, granted, localizer, path)?);
        }
        path.pop();

        Ok(FlattenedPermission {
            name: node.name.clone(),
            display_name: localizer.localize(&node.display_name_key),
            granted: granted.contains(&node.name),
            parent: node.parent.map(|p| self.nodes[p].name.clone()),
            children,
        })
    }
}

/// Builder for [`PermissionRegistry`]. Parents must be registered before their
/// children, which keeps the arena acyclic by construction.
#[derive(Debug, Default)]
pub struct PermissionRegistryBuilder {
    registry: PermissionRegistry,
}

impl PermissionRegistryBuilder {
    pub fn register(
        &mut self,
        name: &str,
        display_name_key: &str,
        scope: PermissionScope,
        parent: Option<&str>,
    ) -> anyhow::Result<PermissionId> {
        if self.registry.contains(name) {
            anyhow::bail!("permission '{}' is already registered", name);
        }
        let parent_id = match parent {
            Some(parent_name) => Some(
                self.registry
                    .id_of(parent_name)
                    .ok_or_else(|| anyhow::anyhow!("unknown parent permission '{}'", parent_name))?,
            ),
            None => None,
        };

        let id = self.registry.nodes.len();
        self.registry.nodes.push(PermissionNode {
            name: name.to_string(),
            display_name_key: display_name_key.to_string(),
            scope,
            parent: parent_id,
            children: Vec::new(),
        });
        self.registry.by_name.insert(name.to_string(), id);
        if let Some(parent_id) = parent_id {
            self.registry.nodes[parent_id].children.push(id);
        }
        Ok(id)
    }

    pub fn build(self) -> PermissionRegistry {
        self.registry
    }
}

/// The permissions this service ships with. Tree shape mirrors the admin UI:
/// page-level roots with per-action children.
pub fn default_permissions() -> PermissionRegistry {
    let mut builder = PermissionRegistry::builder();
    // Registration order is declaration order; parents always precede children,
    // so these cannot fail.
    let entries: &[(&str, &str, PermissionScope, Option<&str>)] = &[
        ("Pages.Users", "Permission.Users", PermissionScope::Tenant, None),
        ("Pages.Users.Create", "Permission.Users.Create", PermissionScope::Tenant, Some("Pages.Users")),
        ("Pages.Users.Edit", "Permission.Users.Edit", PermissionScope::Tenant, Some("Pages.Users")),
        ("Pages.Users.Delete", "Permission.Users.Delete", PermissionScope::Tenant, Some("Pages.Users")),
        ("Pages.Roles", "Permission.Roles", PermissionScope::Tenant, None),
        ("Pages.Tenants", "Permission.Tenants", PermissionScope::Host, None),
        ("Pages.Settings", "Permission.Settings", PermissionScope::Tenant, None),
    ];
    for (name, key, scope, parent) in entries {
        builder
            .register(name, key, *scope, *parent)
            .expect("default permission table is well-formed");
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::StaticCatalog;

    fn sample_registry() -> PermissionRegistry {
        let mut builder = PermissionRegistry::builder();
        builder
            .register("Pages.Users", "Permission.Users", PermissionScope::Tenant, None)
            .unwrap();
        builder
            .register(
                "Pages.Users.Create",
                "Permission.Users.Create",
                PermissionScope::Tenant,
                Some("Pages.Users"),
            )
            .unwrap();
        builder
            .register(
                "Pages.Users.Delete",
                "Permission.Users.Delete",
                PermissionScope::Tenant,
                Some("Pages.Users"),
            )
            .unwrap();
        builder
            .register("Pages.Tenants", "Permission.Tenants", PermissionScope::Host, None)
            .unwrap();
        builder.build()
    }

    fn collect_granted(entries: &[FlattenedPermission], out: &mut Vec<String>) {
        for entry in entries {
            if entry.granted {
                out.push(entry.name.clone());
            }
            collect_granted(&entry.children, out);
        }
    }

    #[test]
    fn flatten_marks_exactly_the_granted_names() {
        let registry = sample_registry();
        let granted: GrantedPermissionSet =
            ["Pages.Users.Create", "Pages.Tenants", "Not.In.Registry"]
                .into_iter()
                .collect();

        let flat = registry.flatten(&granted, false, &StaticCatalog).unwrap();
        let mut found = Vec::new();
        collect_granted(&flat, &mut found);
        found.sort();

        // Intersection of the granted set with the registry names, nothing else.
        assert_eq!(found, vec!["Pages.Tenants", "Pages.Users.Create"]);
    }

    #[test]
    fn flatten_preserves_node_count_for_host_caller() {
        let registry = sample_registry();
        let flat = registry
            .flatten(&GrantedPermissionSet::new(), false, &StaticCatalog)
            .unwrap();
        let total: usize = flat.iter().map(FlattenedPermission::subtree_len).sum();
        assert_eq!(total, registry.len());
    }

    #[test]
    fn flatten_is_preorder_with_declared_sibling_order() {
        let registry = sample_registry();
        let flat = registry
            .flatten(&GrantedPermissionSet::new(), false, &StaticCatalog)
            .unwrap();

        assert_eq!(flat[0].name, "Pages.Users");
        assert_eq!(flat[0].children[0].name, "Pages.Users.Create");
        assert_eq!(flat[0].children[1].name, "Pages.Users.Delete");
        assert_eq!(flat[1].name, "Pages.Tenants");
        assert_eq!(flat[0].children[0].parent.as_deref(), Some("Pages.Users"));
    }

    #[test]
    fn host_caller_sees_roots_only() {
        let registry = sample_registry();
        let flat = registry
            .flatten(&GrantedPermissionSet::new(), false, &StaticCatalog)
            .unwrap();
        let top: Vec<_> = flat.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(top, vec!["Pages.Users", "Pages.Tenants"]);
    }

    #[test]
    fn tenant_caller_sees_tenant_nodes_and_host_roots() {
        let registry = sample_registry();
        let flat = registry
            .flatten(&GrantedPermissionSet::new(), true, &StaticCatalog)
            .unwrap();
        let top: Vec<_> = flat.iter().map(|p| p.name.as_str()).collect();
        // Tenant-visible children surface at the top level too, alongside the
        // host-scoped root.
        assert_eq!(
            top,
            vec![
                "Pages.Users",
                "Pages.Users.Create",
                "Pages.Users.Delete",
                "Pages.Tenants",
            ]
        );
    }

    #[test]
    fn corrupted_registry_fails_with_cycle_error() {
        let mut registry = sample_registry();
        // Splice a back-edge from a leaf to its root, bypassing the builder.
        let root = registry.id_of("Pages.Users").unwrap();
        let leaf = registry.id_of("Pages.Users.Delete").unwrap();
        registry.nodes[leaf].children.push(root);

        let err = registry
            .flatten(&GrantedPermissionSet::new(), false, &StaticCatalog)
            .unwrap_err();
        assert_eq!(err.permission, "Pages.Users");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut builder = PermissionRegistry::builder();
        builder
            .register("Pages.Users", "Permission.Users", PermissionScope::Tenant, None)
            .unwrap();
        assert!(builder
            .register("Pages.Users", "Permission.Users", PermissionScope::Tenant, None)
            .is_err());
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut builder = PermissionRegistry::builder();
        assert!(builder
            .register(
                "Pages.Users.Create",
                "Permission.Users.Create",
                PermissionScope::Tenant,
                Some("Pages.Users"),
            )
            .is_err());
    }
}
