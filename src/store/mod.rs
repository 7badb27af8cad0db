//! Query layer over Postgres. Handlers call these functions; business
//! checks that need row state (uniqueness, capacity, references) live
//! here next to the queries they depend on.

pub mod categories;
pub mod events;
pub mod participations;
pub mod photos;
pub mod users;
