use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// RSVP state for one (event, user) pair. Stored as TEXT; cancellation is a
/// soft delete, the row stays behind with `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationStatus {
    Confirmed,
    Waiting,
    Cancelled,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Confirmed => "CONFIRMED",
            ParticipationStatus::Waiting => "WAITING",
            ParticipationStatus::Cancelled => "CANCELLED",
        }
    }

    /// Decides the status for a new RSVP: waitlisted once the confirmed
    /// count has reached the capacity, confirmed otherwise. Events without
    /// a capacity never waitlist.
    pub fn on_join(capacity: Option<i32>, confirmed_count: i64) -> Self {
        match capacity {
            Some(capacity) if confirmed_count >= i64::from(capacity) => {
                ParticipationStatus::Waiting
            }
            _ => ParticipationStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EventParticipation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Participation joined with event title and username for API responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParticipationResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user_id: Uuid,
    pub username: String,
    pub status: String,
    pub participated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ParticipationStatusResponse {
    pub participating: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_without_capacity_is_confirmed() {
        assert_eq!(
            ParticipationStatus::on_join(None, 1_000),
            ParticipationStatus::Confirmed
        );
    }

    #[test]
    fn test_join_below_capacity_is_confirmed() {
        assert_eq!(
            ParticipationStatus::on_join(Some(10), 9),
            ParticipationStatus::Confirmed
        );
    }

    #[test]
    fn test_join_at_capacity_is_waitlisted() {
        assert_eq!(
            ParticipationStatus::on_join(Some(10), 10),
            ParticipationStatus::Waiting
        );
    }

    #[test]
    fn test_join_over_capacity_is_waitlisted() {
        assert_eq!(
            ParticipationStatus::on_join(Some(10), 11),
            ParticipationStatus::Waiting
        );
    }

    #[test]
    fn test_join_with_zero_capacity_is_waitlisted() {
        assert_eq!(
            ParticipationStatus::on_join(Some(0), 0),
            ParticipationStatus::Waiting
        );
    }

    #[test]
    fn test_status_round_trips_as_text() {
        assert_eq!(ParticipationStatus::Confirmed.as_str(), "CONFIRMED");
        assert_eq!(ParticipationStatus::Waiting.as_str(), "WAITING");
        assert_eq!(ParticipationStatus::Cancelled.as_str(), "CANCELLED");
    }
}
