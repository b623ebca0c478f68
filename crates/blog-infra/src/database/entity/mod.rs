//! SeaORM entities, one module per table.

pub mod author_profile;
pub mod comment;
pub mod post;
pub mod post_like;
pub mod profile_follower;
pub mod user;
