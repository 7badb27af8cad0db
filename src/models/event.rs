use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::category::EventCategory;
use crate::models::user::User;
use crate::utils::error::AppError;

const TITLE_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 1000;
const LOCATION_MAX: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub category_id: Uuid,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub category_id: Uuid,
}

impl EventRequest {
    /// Checks the payload against the rules that hold for both creation and
    /// update: non-blank bounded title, bounded description and location,
    /// strictly future date, non-negative capacity.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        let title_len = self.title.trim().chars().count();
        if title_len == 0 {
            return Err(AppError::ValidationError(
                "Event title must not be empty".to_string(),
            ));
        }
        if title_len > TITLE_MAX {
            return Err(AppError::ValidationError(format!(
                "Event title must be at most {} characters",
                TITLE_MAX
            )));
        }

        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX {
                return Err(AppError::ValidationError(format!(
                    "Event description must be at most {} characters",
                    DESCRIPTION_MAX
                )));
            }
        }

        if let Some(location) = &self.location {
            if location.chars().count() > LOCATION_MAX {
                return Err(AppError::ValidationError(format!(
                    "Event location must be at most {} characters",
                    LOCATION_MAX
                )));
            }
        }

        if self.event_date <= now {
            return Err(AppError::ValidationError(
                "Event date must be in the future".to_string(),
            ));
        }

        if let Some(capacity) = self.capacity {
            if capacity < 0 {
                return Err(AppError::ValidationError(
                    "Event capacity must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatorInfo {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub category: CategoryInfo,
    pub creator: CreatorInfo,
    pub participant_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn new(event: Event, category: EventCategory, creator: User, participant_count: i64) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            capacity: event.capacity,
            category: CategoryInfo {
                id: category.id,
                name: category.name,
                description: category.description,
            },
            creator: CreatorInfo {
                id: creator.id,
                username: creator.username,
                profile_picture: creator.profile_picture,
            },
            participant_count,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(event_date: DateTime<Utc>, capacity: Option<i32>) -> EventRequest {
        EventRequest {
            title: "Hanami picnic".to_string(),
            description: None,
            event_date,
            location: Some("Yoyogi Park".to_string()),
            capacity,
            category_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_event_request_accepts_future_date() {
        let now = Utc::now();
        assert!(request(now + Duration::days(7), Some(20)).validate(now).is_ok());
    }

    #[test]
    fn test_event_request_rejects_past_date() {
        let now = Utc::now();
        assert!(request(now - Duration::hours(1), None).validate(now).is_err());
    }

    #[test]
    fn test_event_request_rejects_date_equal_to_now() {
        let now = Utc::now();
        assert!(request(now, None).validate(now).is_err());
    }

    #[test]
    fn test_event_request_rejects_negative_capacity() {
        let now = Utc::now();
        assert!(request(now + Duration::days(1), Some(-1)).validate(now).is_err());
    }

    #[test]
    fn test_event_request_allows_zero_capacity() {
        let now = Utc::now();
        assert!(request(now + Duration::days(1), Some(0)).validate(now).is_ok());
    }

    #[test]
    fn test_event_request_rejects_blank_title() {
        let now = Utc::now();
        let mut req = request(now + Duration::days(1), None);
        req.title = "  ".to_string();
        assert!(req.validate(now).is_err());
    }

    #[test]
    fn test_event_request_rejects_oversized_title() {
        let now = Utc::now();
        let mut req = request(now + Duration::days(1), None);
        req.title = "x".repeat(51);
        assert!(req.validate(now).is_err());
    }
}
