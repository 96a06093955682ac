//! IAM permission catalog wiring.
//!
//! This module holds the typed mirror of the `roles.list` wire document and
//! the transformed role → permissions view built from it. Types here mirror
//! the response fields; callers use `PermissionCatalog` for the ordered
//! mapping and the `model` records when the raw listing surface is
//! required.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{PermissionId, RoleId};
pub use index::PermissionCatalog;
pub use model::{RoleListing, RoleRecord, parse_role_listing};
