pub mod comment_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod test_support;
