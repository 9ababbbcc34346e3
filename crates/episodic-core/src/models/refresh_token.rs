//! Refresh token (session) model

use serde::{Deserialize, Serialize};

use super::UserId;

/// A long-lived session credential; never transferred between accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: UserId,
    /// Opaque token value
    #[serde(skip_serializing)]
    pub token: String,
    /// Client description
    pub device_info: Option<String>,
    /// Expiry timestamp (Unix ms)
    pub expires_at: i64,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}
