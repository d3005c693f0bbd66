//! Page-level submission-management authorization.

use canvass_core::error::CoreError;
use canvass_core::types::DbId;
use canvass_db::repositories::PageRepo;
use canvass_db::DbPool;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Require that the caller may manage a page's submissions.
///
/// Admins manage every page; editors only the pages granting them rights in
/// `page_editors`. Anything else is `Forbidden` -- never an empty result set.
pub async fn require_page_manager(
    pool: &DbPool,
    user: &AuthUser,
    page_id: DbId,
) -> Result<(), AppError> {
    if user.is_admin() {
        return Ok(());
    }
    if PageRepo::is_editor(pool, page_id, user.user_id).await? {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not manage this page's submissions".into(),
    )))
}
