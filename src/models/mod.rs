pub mod category;
pub mod event;
pub mod participation;
pub mod photo;
pub mod user;
