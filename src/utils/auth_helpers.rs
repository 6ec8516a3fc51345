use edutrack_core::AppError;
use edutrack_models::Account;
use uuid::Uuid;

/// College the caller acts in. Superadmins have none and are rejected.
pub fn require_college(account: &Account) -> Result<Uuid, AppError> {
    account.college_id().ok_or_else(|| {
        AppError::forbidden("This operation requires an account that belongs to a college")
    })
}

/// College filter for list endpoints.
///
/// Superadmins may narrow by `requested` or see everything. Everybody else
/// is pinned to their own college and `requested` is ignored.
pub fn college_scope_for_listing(
    account: &Account,
    requested: Option<Uuid>,
) -> Option<Uuid> {
    match account.college_id() {
        Some(own) => Some(own),
        None => requested,
    }
}

/// Fails with 404 when the resource lives in another college, so foreign ids
/// are indistinguishable from missing ones. Superadmins pass.
pub fn verify_college_access(
    account: &Account,
    resource_college_id: Uuid,
    what: &str,
) -> Result<(), AppError> {
    match account.college_id() {
        None => Ok(()),
        Some(own) if own == resource_college_id => Ok(()),
        Some(_) => Err(AppError::not_found(anyhow::anyhow!("{} not found", what))),
    }
}
