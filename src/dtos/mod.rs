pub mod comment_dtos;
pub mod profile_dtos;
