use sqlx::PgPool;
use uuid::Uuid;

use crate::models::participation::{
    EventParticipation, ParticipationResponse, ParticipationStatus,
};
use crate::utils::error::AppError;

const RESPONSE_QUERY: &str = "SELECT p.id, p.event_id, e.title AS event_title, p.user_id,
            u.username, p.status, p.created_at AS participated_at
     FROM event_participations p
     JOIN events e ON e.id = p.event_id
     JOIN users u ON u.id = p.user_id";

/// Registers an RSVP. Runs in one transaction with a row lock on the
/// event, so two concurrent joins cannot both pass the capacity check:
/// the second blocks until the first commits and then sees its count.
pub async fn participate(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<EventParticipation, AppError> {
    let mut tx = pool.begin().await?;

    let capacity = sqlx::query_scalar::<_, Option<i32>>(
        "SELECT capacity FROM events WHERE id = $1 FOR UPDATE",
    )
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event not found: {}", event_id)))?;

    let already_participating = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
             SELECT 1 FROM event_participations
             WHERE event_id = $1 AND user_id = $2 AND status <> 'CANCELLED'
         )",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    if already_participating {
        return Err(AppError::ValidationError(
            "Already participating in this event".to_string(),
        ));
    }

    let confirmed_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM event_participations WHERE event_id = $1 AND status = 'CONFIRMED'",
    )
    .bind(event_id)
    .fetch_one(&mut *tx)
    .await?;

    let status = ParticipationStatus::on_join(capacity, confirmed_count);

    let participation = sqlx::query_as::<_, EventParticipation>(
        "INSERT INTO event_participations (event_id, user_id, status)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(event_id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(participation)
}

/// Soft-cancels the active participation for the pair. Returns false when
/// there was none. Waitlisted entries are not promoted when a confirmed
/// spot frees up.
pub async fn cancel_active(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE event_participations
         SET status = 'CANCELLED'
         WHERE event_id = $1 AND user_id = $2 AND status <> 'CANCELLED'",
    )
    .bind(event_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_participating(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<bool, AppError> {
    let participating = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
             SELECT 1 FROM event_participations
             WHERE event_id = $1 AND user_id = $2 AND status <> 'CANCELLED'
         )",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(participating)
}

pub async fn confirmed_count(pool: &PgPool, event_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM event_participations WHERE event_id = $1 AND status = 'CONFIRMED'",
    )
    .bind(event_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn list_by_event(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Vec<ParticipationResponse>, AppError> {
    let query = format!("{} WHERE p.event_id = $1 ORDER BY p.created_at", RESPONSE_QUERY);
    let participations = sqlx::query_as::<_, ParticipationResponse>(&query)
        .bind(event_id)
        .fetch_all(pool)
        .await?;
    Ok(participations)
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ParticipationResponse>, AppError> {
    let query = format!("{} WHERE p.user_id = $1 ORDER BY p.created_at", RESPONSE_QUERY);
    let participations = sqlx::query_as::<_, ParticipationResponse>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(participations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::models::event::EventRequest;
    use crate::store::{categories, events, users};

    async fn seed_event(pool: &PgPool, capacity: Option<i32>) -> (Uuid, Uuid) {
        let creator = users::insert(pool, "creator", "hash", None).await.unwrap();
        let category = categories::insert(pool, "Baseball", None).await.unwrap();
        let event = events::insert(
            pool,
            &EventRequest {
                title: "Game night".to_string(),
                description: None,
                event_date: Utc::now() + Duration::days(7),
                location: None,
                capacity,
                category_id: category.id,
            },
            creator.id,
        )
        .await
        .unwrap();
        (event.id, creator.id)
    }

    #[sqlx::test]
    async fn test_second_rsvp_by_same_user_fails(pool: PgPool) {
        let (event_id, user_id) = seed_event(&pool, None).await;

        participate(&pool, event_id, user_id).await.unwrap();
        assert!(participate(&pool, event_id, user_id).await.is_err());
    }

    #[sqlx::test]
    async fn test_rsvp_at_capacity_is_waitlisted(pool: PgPool) {
        let (event_id, first_id) = seed_event(&pool, Some(1)).await;
        let second = users::insert(&pool, "latecomer", "hash", None)
            .await
            .unwrap();

        let first = participate(&pool, event_id, first_id).await.unwrap();
        let waitlisted = participate(&pool, event_id, second.id).await.unwrap();

        assert_eq!(first.status, "CONFIRMED");
        assert_eq!(waitlisted.status, "WAITING");
    }

    #[sqlx::test]
    async fn test_rejoin_after_cancel_succeeds(pool: PgPool) {
        let (event_id, user_id) = seed_event(&pool, None).await;

        participate(&pool, event_id, user_id).await.unwrap();
        assert!(cancel_active(&pool, event_id, user_id).await.unwrap());
        assert!(!is_participating(&pool, event_id, user_id).await.unwrap());

        // The cancelled row does not count as an active participation.
        participate(&pool, event_id, user_id).await.unwrap();
    }

    #[sqlx::test]
    async fn test_rsvp_on_unknown_event_fails(pool: PgPool) {
        let user = users::insert(&pool, "alice", "hash", None).await.unwrap();
        assert!(participate(&pool, Uuid::new_v4(), user.id).await.is_err());
    }
}
