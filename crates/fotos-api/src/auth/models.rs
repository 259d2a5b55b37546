use fotos_core::AppError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Caller role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Visitor,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Visitor => write!(f, "visitor"),
        }
    }
}

/// Resolved identity of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub role: UserRole,
}

impl CallerContext {
    pub fn admin() -> Self {
        Self {
            role: UserRole::Admin,
        }
    }

    pub fn visitor() -> Self {
        Self {
            role: UserRole::Visitor,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "Administrator access required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(CallerContext::admin().require_admin().is_ok());
        assert!(matches!(
            CallerContext::visitor().require_admin(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Visitor.to_string(), "visitor");
    }
}
