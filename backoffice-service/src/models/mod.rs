pub mod permission;
pub mod role;
pub mod user;

pub use permission::{
    default_permissions, CycleError, FlattenedPermission, GrantedPermissionSet, PermissionId,
    PermissionNode, PermissionRegistry, PermissionRegistryBuilder, PermissionScope,
};
pub use role::Role;
pub use user::User;
