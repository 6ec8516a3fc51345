//! Outgoing email over SMTP.
//!
//! Every message is sent as `multipart/alternative` with a plain-text and an
//! HTML part. When `SMTP_ENABLED` is off the message is logged and dropped.

use edutrack_config::EmailConfig;
use edutrack_core::AppError;
use edutrack_models::Role;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends the initial credentials of a freshly created admin or teacher.
    #[instrument(skip(self, password))]
    pub async fn send_welcome_email(
        &self,
        to_email: &str,
        to_name: &str,
        role: Role,
        college_name: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let login_link = format!("{}/login", self.config.frontend_url);
        let text_body = format!(
            "Hi {name},\n\n\
             An EduTrack {role} account has been created for you at {college}.\n\n\
             Email: {email}\n\
             Temporary password: {password}\n\n\
             Sign in at {link} and change your password right away.\n\n\
             The EduTrack Team",
            name = to_name,
            role = role,
            college = college_name,
            email = to_email,
            password = password,
            link = login_link,
        );
        let html_body = layout(
            "Welcome to EduTrack",
            &format!(
                "<p>Hi {name},</p>\
                 <p>An EduTrack <strong>{role}</strong> account has been created for you at \
                 <strong>{college}</strong>.</p>\
                 <table style=\"margin: 16px 0;\">\
                 <tr><td style=\"padding-right: 12px;\">Email</td><td><code>{email}</code></td></tr>\
                 <tr><td style=\"padding-right: 12px;\">Temporary password</td><td><code>{password}</code></td></tr>\
                 </table>\
                 {button}\
                 <p>Please change your password after your first sign in.</p>",
                name = to_name,
                role = role,
                college = college_name,
                email = to_email,
                password = password,
                button = button(&login_link, "Sign in"),
            ),
        );

        self.send_email(to_email, "Your EduTrack account", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, reset_token
        );

        let text_body = format!(
            "Hi {},\n\n\
             We received a request to reset your EduTrack password.\n\n\
             Open this link to choose a new one:\n\
             {}\n\n\
             The link expires in 1 hour. If you did not ask for a reset you can ignore this email.\n\n\
             The EduTrack Team",
            to_name, reset_link
        );
        let html_body = layout(
            "Password Reset Request",
            &format!(
                "<p>Hi {},</p>\
                 <p>We received a request to reset your EduTrack password.</p>\
                 {}\
                 <p style=\"color: #6b7280; font-size: 13px;\">The link expires in 1 hour. \
                 If you did not ask for a reset you can ignore this email.</p>",
                to_name,
                button(&reset_link, "Reset password"),
            ),
        );

        self.send_email(to_email, "Password Reset Request", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Your EduTrack password has been changed.\n\n\
             If this was not you, contact your college administrator immediately.\n\n\
             The EduTrack Team",
            to_name
        );
        let html_body = layout(
            "Password Changed",
            &format!(
                "<p>Hi {},</p>\
                 <p>Your EduTrack password has been changed.</p>\
                 <p>If this was not you, contact your college administrator immediately.</p>",
                to_name
            ),
        );

        self.send_email(to_email, "Password Changed", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(to = %to_email, subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Sends a welcome email and logs instead of failing when delivery breaks.
pub async fn notify_new_account(
    email_service: &EmailService,
    to_email: &str,
    to_name: &str,
    role: Role,
    college_name: &str,
    password: &str,
) {
    if let Err(e) = email_service
        .send_welcome_email(to_email, to_name, role, college_name, password)
        .await
    {
        warn!(error = %e, to = %to_email, "Failed to send welcome email");
    }
}

fn button(href: &str, label: &str) -> String {
    format!(
        "<p style=\"margin: 24px 0;\"><a href=\"{}\" style=\"background-color: #0F766E; \
         color: #ffffff; padding: 12px 24px; border-radius: 6px; text-decoration: none;\">{}</a></p>",
        href, label
    )
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f3f4f6;">
    <table width="100%" cellpadding="0" cellspacing="0" style="padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #0F766E; padding: 24px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 24px;">EduTrack</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px; color: #111827; font-size: 15px; line-height: 1.6;">
                            <h2 style="margin-top: 0;">{title}</h2>
                            {content}
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
        title = title,
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_skips_sending() {
        let service = EmailService::new(EmailConfig::disabled());
        service
            .send_welcome_email(
                "new.teacher@college.edu",
                "New Teacher",
                Role::Teacher,
                "North Ridge",
                "Temp-Pass-123",
            )
            .await
            .unwrap();
        service
            .send_password_reset_email("a@b.io", "A", "token")
            .await
            .unwrap();
    }

    #[test]
    fn test_layout_embeds_title_and_content() {
        let html = layout("Hello", "<p>Body</p>");
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_button_links_target() {
        assert!(button("http://x/reset", "Go").contains("href=\"http://x/reset\""));
    }
}
