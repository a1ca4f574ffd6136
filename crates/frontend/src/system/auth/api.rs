use contracts::system::auth::CurrentUser;

use crate::shared::error::DashboardResult;
use crate::shared::transport::get_json;

/// Get current user info
pub async fn fetch_current_user() -> DashboardResult<CurrentUser> {
    get_json("/users/me").await
}
