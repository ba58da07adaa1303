//! Authentication service implementation
//!
//! A single root admin is configured by id. Other users may carry the stored
//! `is_admin` flag, which grants moderation but not admin management.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::database::DatabaseService;
use crate::utils::errors::{Result, UiBotError};

/// Permission levels for different operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Basic user permissions
    User,
    /// Ban, unban, grant plans, reset users
    Moderate,
    /// Manage admins and self-grant plans
    RootAdmin,
}

/// Authentication context for a user
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub permissions: HashSet<Permission>,
    pub is_root_admin: bool,
    pub is_admin: bool,
    pub is_banned: bool,
}

impl AuthContext {
    /// Banned users are blocked everywhere, except the root admin
    pub fn is_blocked(&self) -> bool {
        self.is_banned && !self.is_root_admin
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    database: DatabaseService,
    root_admin_id: Option<i64>,
}

impl AuthService {
    pub fn new(database: DatabaseService, root_admin_id: Option<i64>) -> Self {
        Self { database, root_admin_id }
    }

    /// Exact match against the configured root admin id
    pub fn is_root_admin(&self, user_id: i64) -> bool {
        self.root_admin_id == Some(user_id)
    }

    pub fn root_admin_id(&self) -> Option<i64> {
        self.root_admin_id
    }

    pub async fn get_auth_context(&self, user_id: i64) -> Result<AuthContext> {
        let profile = self.database.get_profile(user_id).await?;
        let is_root_admin = self.is_root_admin(user_id);

        let mut permissions = HashSet::new();
        permissions.insert(Permission::User);
        if is_root_admin || profile.is_admin {
            permissions.insert(Permission::Moderate);
        }
        if is_root_admin {
            permissions.insert(Permission::RootAdmin);
        }

        let context = AuthContext {
            user_id,
            permissions,
            is_root_admin,
            is_admin: profile.is_admin,
            is_banned: profile.is_banned,
        };

        debug!(user_id, permissions = ?context.permissions, "Authentication context created");
        Ok(context)
    }

    pub async fn has_permission(&self, user_id: i64, required_permission: Permission) -> Result<bool> {
        let context = self.get_auth_context(user_id).await?;
        Ok(context.permissions.contains(&required_permission))
    }

    /// Require specific permission or return error
    pub async fn require_permission(&self, user_id: i64, required_permission: Permission) -> Result<AuthContext> {
        let context = self.get_auth_context(user_id).await?;

        if !context.permissions.contains(&required_permission) {
            warn!(user_id, required = ?required_permission, "Permission denied");
            return Err(UiBotError::PermissionDenied(format!(
                "User {} lacks required permission: {:?}",
                user_id, required_permission
            )));
        }

        Ok(context)
    }

    pub async fn is_blocked(&self, user_id: i64) -> Result<bool> {
        Ok(self.get_auth_context(user_id).await?.is_blocked())
    }
}
