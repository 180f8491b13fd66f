// src/handlers/profile_handlers.rs
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{get, put, web, HttpResponse};
use chrono::Utc;
use deadpool_postgres::Pool;
use futures::TryStreamExt;
use log::{debug, info, warn};

use crate::dtos::profile_dtos::{AvatarUpload, ProfileForm, ProfileUpdateOut, UserPageOut};
use crate::error::{AppError, AppResult};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::user_repository::UserRepository;
use crate::services::avatar_storage::{allowed_file, avatar_filename, avatar_url};
use crate::AppState;

const MAX_FULL_NAME_BYTES: usize = 4 * 1024;

/// GET /api/user/{username}
/// Profile page: the user, their counts and their posts
#[get("/user/{username}")]
pub async fn get_user_by_username(
    state: web::Data<AppState>,
    viewer: AuthenticatedUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let client = state.pg_pool.get().await?;

    let user = UserRepository::find_profile(&**client, viewer.user_id, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let posts = UserRepository::list_posts(&**client, viewer.user_id, user.user_id).await?;

    debug!("profile {} viewed by {} ({} posts)", username, viewer.user_id, posts.len());
    Ok(HttpResponse::Ok().json(UserPageOut { user, posts }))
}

/// PUT /api/profile/update
/// Multipart form with optional `avatar` and `full_name` parts
#[put("/profile/update")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_profile_form(payload, state.max_avatar_bytes).await?;

    let avatar = form.avatar.filter(|a| {
        let ok = allowed_file(&a.filename);
        if !ok {
            info!("ignoring avatar {:?} from user {}: extension not allowed", a.filename, user.user_id);
        }
        ok
    });

    if avatar.is_none() && form.full_name.is_none() {
        return Ok(updated());
    }

    let stored = match avatar {
        Some(upload) => {
            let filename = avatar_filename(user.user_id, Utc::now().timestamp(), &upload.filename);
            let path = state.avatars.save(&filename, &upload.bytes).await?;
            Some((path, avatar_url(&filename)))
        }
        None => None,
    };

    let result = apply_profile_update(
        &state.pg_pool,
        user.user_id,
        stored.as_ref().map(|(_, url)| url.as_str()),
        form.full_name.as_deref(),
    )
    .await;

    if let Err(e) = result {
        if let Some((path, _)) = &stored {
            state.avatars.discard(path).await;
        }
        return Err(e);
    }

    info!("profile of user {} updated", user.user_id);
    Ok(updated())
}

fn updated() -> HttpResponse {
    HttpResponse::Ok().json(ProfileUpdateOut {
        success: true,
        message: "Profile updated".to_string(),
    })
}

/// Writes both columns in one transaction; nothing lands unless both do.
async fn apply_profile_update(
    pool: &Pool,
    user_id: i32,
    avatar_url: Option<&str>,
    full_name: Option<&str>,
) -> AppResult<()> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let result = async {
        if let Some(url) = avatar_url {
            UserRepository::update_avatar(&*tx, user_id, url).await?;
        }
        if let Some(name) = full_name {
            UserRepository::update_full_name(&*tx, user_id, name).await?;
        }
        Ok::<_, tokio_postgres::Error>(())
    }
    .await;

    match result {
        Ok(()) => {
            tx.commit().await?;
            Ok(())
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                warn!("rollback after failed profile update also failed: {}", rb);
            }
            Err(e.into())
        }
    }
}

/// Drains the multipart stream into a `ProfileForm`. The first `avatar` and
/// `full_name` parts win; anything else is skipped. A form with no parts at
/// all, or no body, is an empty `ProfileForm`.
pub(crate) async fn read_profile_form(
    mut payload: Multipart,
    max_avatar_bytes: usize,
) -> AppResult<ProfileForm> {
    let mut form = ProfileForm::default();
    let mut seen_part = false;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(MultipartError::Incomplete | MultipartError::ContentTypeMissing) if !seen_part => {
                debug!("profile update without form parts");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        seen_part = true;

        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => continue,
        };

        match name.as_str() {
            "avatar" if form.avatar.is_none() => {
                let bytes = read_field(&mut field, max_avatar_bytes, "Avatar is too large").await?;
                match filename.filter(|f| !f.is_empty()) {
                    Some(filename) => form.avatar = Some(AvatarUpload { filename, bytes }),
                    None => debug!("avatar part without a filename skipped"),
                }
            }
            "full_name" if form.full_name.is_none() => {
                let bytes = read_field(&mut field, MAX_FULL_NAME_BYTES, "Full name is too long").await?;
                let text = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest("Full name must be valid UTF-8".into()))?;
                form.full_name = Some(text);
            }
            _ => continue,
        }
    }

    Ok(form)
}

async fn read_field(field: &mut Field, limit: usize, too_large: &str) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(too_large.to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
