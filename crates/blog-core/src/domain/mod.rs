//! Domain entities - the core business objects.

mod comment;
mod post;
mod profile;
mod user;
mod validate;

pub use comment::Comment;
pub use post::Post;
pub use profile::AuthorProfile;
pub use user::User;
pub use validate::{is_valid_email, is_valid_slug, slugify};
