//! Authorization policy.
//!
//! Every privileged operation resolves the caller to a [`Principal`] and
//! asks [`Policy::authorize`]. Handlers and services never compare roles
//! themselves.

use serde::Serialize;
use wilaiety_common::{AppError, AppResult};

pub use wilaiety_db::entities::user_role::AppRole as Role;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Whether the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Something a caller may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read facilities, licenses, divisions and the dashboard.
    ViewRegistry,
    /// Create and edit facilities and licenses.
    ManageFacilities,
    /// Download spreadsheet exports.
    ExportReports,
    /// List accounts.
    ManageUsers,
    /// Change another account's role.
    ManageRoles,
    /// Set another account's password.
    ResetPassword,
    /// Read every user's activity instead of only one's own.
    ViewAllActivity,
    /// Create and edit administrative divisions.
    ManageDivisions,
    /// Remove a license.
    DeleteLicense,
}

impl Permission {
    /// Message returned to a caller lacking this permission.
    #[must_use]
    pub const fn denial_message(self) -> &'static str {
        match self {
            Self::ResetPassword => "Only admins can reset passwords",
            Self::ManageUsers | Self::ManageRoles => "Only admins can manage users",
            _ => "Admin access required",
        }
    }
}

/// Role to permission mapping.
#[derive(Debug, Clone, Copy)]
pub struct Policy;

impl Policy {
    /// Whether `principal` holds `permission`.
    #[must_use]
    pub const fn allows(principal: &Principal, permission: Permission) -> bool {
        match principal.role {
            Role::Admin => true,
            Role::User => matches!(
                permission,
                Permission::ViewRegistry | Permission::ManageFacilities | Permission::ExportReports
            ),
        }
    }

    /// Fail with [`AppError::Forbidden`] unless `principal` holds `permission`.
    pub fn authorize(principal: &Principal, permission: Permission) -> AppResult<()> {
        if Self::allows(principal, permission) {
            return Ok(());
        }

        tracing::debug!(
            user_id = %principal.user_id,
            ?permission,
            "Permission denied"
        );
        Err(AppError::Forbidden(permission.denial_message().to_string()))
    }
}
