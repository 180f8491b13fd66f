pub mod comment_handlers;
pub mod profile_handlers;
