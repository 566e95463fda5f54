//! Localization provider for display names and user-facing error messages.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Resolves a localization key to a display string.
pub trait Localizer: Send + Sync {
    /// Unknown keys fall back to the key itself so missing resources surface
    /// in the UI instead of vanishing.
    fn localize(&self, key: &str) -> String;
}

static EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Error messages
        ("UserNotFound", "User not found"),
        ("RoleNotFound", "Role not found"),
        ("PermissionNotFound", "Permission not found"),
        ("InvalidPassword", "Invalid password"),
        ("PasswordsNotMatch", "Passwords do not match"),
        ("InvalidPageSize", "Rows per page must be greater than zero"),
        ("CycleDetected", "The permission tree is misconfigured"),
        ("PermissionUpdatesRejected", "Some permission updates were rejected"),
        ("StoreFailure", "An internal error occurred"),
        // Permission display names
        ("Permission.Users", "Users"),
        ("Permission.Users.Create", "Create users"),
        ("Permission.Users.Edit", "Edit users"),
        ("Permission.Users.Delete", "Delete users"),
        ("Permission.Roles", "Roles"),
        ("Permission.Tenants", "Tenants"),
        ("Permission.Settings", "Settings"),
    ])
});

/// English catalog compiled into the binary. A deployment that needs more
/// languages swaps in its own [`Localizer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl Localizer for StaticCatalog {
    fn localize(&self, key: &str) -> String {
        EN.get(key).copied().unwrap_or(key).to_string()
    }
}
