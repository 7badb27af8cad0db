use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Category name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_request_rejects_blank_name() {
        let req = CategoryRequest {
            name: "   ".to_string(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_category_request_accepts_name() {
        let req = CategoryRequest {
            name: "Baseball".to_string(),
            description: Some("Watching games together".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
