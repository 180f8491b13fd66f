use serde::Serialize;

use crate::models::post::PostSummary;
use crate::models::user::UserProfile;

#[derive(Debug, Serialize)]
pub struct UserPageOut {
    pub user: UserProfile,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdateOut {
    pub success: bool,
    pub message: String,
}

/// An image part pulled off the profile update form.
#[derive(Debug)]
pub struct AvatarUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Parsed `PUT /api/profile/update` form. Absent parts are `None`.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub avatar: Option<AvatarUpload>,
    pub full_name: Option<String>,
}
