use edutrack_auth::{
    create_access_token, create_password_reset_token, create_refresh_token,
    verify_password_reset_token, verify_refresh_token,
};
use edutrack_config::JwtConfig;
use edutrack_core::{AppError, verify_password};
use edutrack_models::Account;
use edutrack_models::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    TokenResponse,
};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::accounts::service::AccountService;
use crate::utils::email::EmailService;

pub struct AuthService;

impl AuthService {
    fn issue_tokens(account: &Account, jwt_config: &JwtConfig) -> Result<TokenResponse, AppError> {
        let access_token =
            create_access_token(account.id(), account.email(), account.role(), jwt_config)?;
        let refresh_token = create_refresh_token(account.id(), jwt_config)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            role: account.role(),
        })
    }

    #[instrument(skip(db, dto, jwt_config), fields(account.email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let Some(row) = AccountService::find_by_email_with_password(db, &dto.email).await? else {
            metrics::track_login_failure("unknown_email");
            return Err(invalid());
        };

        if !verify_password(&dto.password, &row.password)? {
            metrics::track_login_failure("bad_password");
            return Err(invalid());
        }

        let account = row.into_account()?;
        let tokens = Self::issue_tokens(&account, jwt_config)?;

        metrics::track_login_success(account.role());
        info!(account.id = %account.id(), account.role = %account.role(), "Login successful");

        Ok(tokens)
    }

    /// Exchanges a refresh token for a new token pair.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let account_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))?;

        let account = AccountService::find(db, account_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        debug!(account.id = %account_id, "Refreshing tokens");
        Self::issue_tokens(&account, jwt_config)
    }

    #[instrument(skip(db, account, dto, email_service), fields(account.id = %account.id()))]
    pub async fn change_password(
        db: &PgPool,
        account: &Account,
        dto: ChangePasswordRequest,
        email_service: &EmailService,
    ) -> Result<(), AppError> {
        let row = AccountService::find_by_email_with_password(db, account.email())
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        if !verify_password(&dto.current_password, &row.password)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        if dto.current_password == dto.new_password {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "New password must differ from the current password"
            )));
        }

        AccountService::set_password(db, account.id(), &dto.new_password).await?;

        if let Err(e) = email_service
            .send_password_reset_confirmation(account.email(), &account.display_name())
            .await
        {
            warn!(error = %e, "Failed to send password change confirmation");
        }

        info!("Password changed");
        Ok(())
    }

    /// Emails a reset link when the account exists. Unknown emails succeed
    /// silently so the endpoint cannot be used to probe for accounts.
    #[instrument(skip(db, dto, jwt_config, email_service))]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ForgotPasswordRequest,
        jwt_config: &JwtConfig,
        email_service: &EmailService,
    ) -> Result<(), AppError> {
        let Some(row) = AccountService::find_by_email_with_password(db, &dto.email).await? else {
            debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let account = row.into_account()?;
        let token = create_password_reset_token(account.id(), account.email(), jwt_config)?;

        if let Err(e) = email_service
            .send_password_reset_email(account.email(), &account.display_name(), &token)
            .await
        {
            warn!(error = %e, account.id = %account.id(), "Failed to send password reset email");
        }

        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordRequest,
        jwt_config: &JwtConfig,
        email_service: &EmailService,
    ) -> Result<(), AppError> {
        let claims = verify_password_reset_token(&dto.token, jwt_config)?;
        let account_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid reset token"))?;

        let account = AccountService::find(db, account_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid reset token"))?;

        // A token issued before an email change is no longer valid.
        if account.email() != claims.email {
            return Err(AppError::unauthorized("Invalid reset token"));
        }

        AccountService::set_password(db, account_id, &dto.new_password).await?;

        if let Err(e) = email_service
            .send_password_reset_confirmation(account.email(), &account.display_name())
            .await
        {
            warn!(error = %e, "Failed to send password reset confirmation");
        }

        info!(account.id = %account_id, "Password reset");
        Ok(())
    }
}
