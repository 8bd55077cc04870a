//! Runs one CLI command against the session.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;

use crate::application::{LoginRequest, NavigationDecision, SessionContext};
use crate::infrastructure::{ApiClient, Command};

/// Command runner over a restored session.
pub struct App {
    context: SessionContext,
    api: Arc<ApiClient>,
}

impl App {
    /// Creates app.
    #[must_use]
    pub const fn new(context: SessionContext, api: Arc<ApiClient>) -> Self {
        Self { context, api }
    }

    /// Executes `command`, writing human-readable output to `out`.
    ///
    /// # Errors
    /// Returns error when output cannot be written, a login is attempted without
    /// a password, or an API request fails.
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<ExitCode> {
        match command {
            Command::Login { email, password } => {
                let password = password.ok_or_else(|| eyre!("no password supplied"))?;
                self.login(LoginRequest::from_secret(email, password.into_secret()), out)
                    .await
            }
            Command::Logout => {
                self.context.store().logout().await;
                writeln!(out, "Logged out.")?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Status => {
                self.status(out)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Navigate { path, from } => self.navigate(&path, from.as_deref(), out),
            Command::Routes => {
                self.routes(out)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Get { path } => {
                let body = self
                    .api
                    .get_json(&path)
                    .await
                    .wrap_err_with(|| format!("GET {path} failed"))?;
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    async fn login<W: Write>(&self, request: LoginRequest, out: &mut W) -> Result<ExitCode> {
        let store = self.context.store();

        if store.login(&request).await {
            let state = store.snapshot();
            if let Some(claims) = state.claims() {
                info!(user_id = %claims.subject_id(), "Login complete");
                writeln!(out, "Logged in as {} ({}).", claims.email(), claims.role())?;
            }
            return Ok(ExitCode::SUCCESS);
        }

        let message = store
            .error()
            .unwrap_or_else(|| "Another login is in progress".to_string());
        writeln!(out, "Login failed: {message}")?;
        Ok(ExitCode::FAILURE)
    }

    fn status<W: Write>(&self, out: &mut W) -> Result<()> {
        let state = self.context.store().snapshot();

        match (state.token(), state.claims()) {
            (Some(token), Some(claims)) => {
                writeln!(out, "Authenticated: yes")?;
                writeln!(out, "User id:       {}", claims.subject_id())?;
                writeln!(out, "Email:         {}", claims.email())?;
                writeln!(out, "Role:          {}", claims.role())?;
                writeln!(out, "Admin:         {}", if state.is_admin() { "yes" } else { "no" })?;
                writeln!(out, "Token:         {token}")?;
            }
            _ => writeln!(out, "Authenticated: no")?,
        }
        Ok(())
    }

    fn navigate<W: Write>(&self, path: &str, from: Option<&str>, out: &mut W) -> Result<ExitCode> {
        match self.context.guard().check(path, from) {
            NavigationDecision::Allow => {
                writeln!(out, "allow {path}")?;
                Ok(ExitCode::SUCCESS)
            }
            NavigationDecision::Redirect { to, reason } => {
                writeln!(out, "redirect {path} -> {to} ({reason})")?;
                Ok(ExitCode::from(2))
            }
        }
    }

    fn routes<W: Write>(&self, out: &mut W) -> Result<()> {
        let table = self.context.guard().routes();
        for (name, path, meta) in table.flatten() {
            let access = match (meta.requires_auth, meta.requires_admin) {
                (_, true) => "admin",
                (true, false) => "auth",
                (false, false) => "public",
            };
            writeln!(out, "{path:<24} {name:<18} {access}")?;
        }
        writeln!(out, "login: {}  home: {}", table.login_path, table.home_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AuthorizationHeader;
    use crate::domain::entities::{AuthToken, RouteTable, fixtures};
    use crate::domain::ports::TokenStoragePort;
    use crate::domain::ports::mocks::{MockAuthPort, MockTokenStorage};

    async fn app_with(auth: MockAuthPort, storage: MockTokenStorage) -> App {
        let authorization = AuthorizationHeader::new();
        let context = SessionContext::start(
            Arc::new(auth),
            Arc::new(storage) as Arc<dyn TokenStoragePort>,
            authorization.clone(),
            RouteTable::default(),
        )
        .await;
        let api = ApiClient::with_base_url("http://127.0.0.1:9", authorization).unwrap();
        App::new(context, Arc::new(api))
    }

    async fn run(app: &App, command: Command) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = app.run(command, &mut out).await.unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_navigate_redirect_output() {
        let app = app_with(MockAuthPort::new(), MockTokenStorage::new()).await;

        let (code, output) = run(
            &app,
            Command::Navigate {
                path: "/admin/dashboard".to_string(),
                from: None,
            },
        )
        .await;

        assert_eq!(code, ExitCode::from(2));
        assert_eq!(
            output,
            "redirect /admin/dashboard -> /admin/login (authentication required)\n"
        );
    }

    #[tokio::test]
    async fn test_login_then_status() {
        let mut auth = MockAuthPort::new();
        let raw = fixtures::token_for(12, "ada@example.com", "admin");
        auth.expect_login()
            .returning(move |_, _| Ok(AuthToken::new_unchecked(raw.clone())));
        let app = app_with(auth, MockTokenStorage::new()).await;

        let (code, output) = run(
            &app,
            Command::Login {
                email: "ada@example.com".to_string(),
                password: Some("pw".parse().unwrap()),
            },
        )
        .await;
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output, "Logged in as ada@example.com (admin).\n");

        let (_, output) = run(&app, Command::Status).await;
        assert!(output.contains("Authenticated: yes"));
        assert!(output.contains("User id:       12"));
        assert!(!output.contains(&fixtures::token_for(12, "ada@example.com", "admin")));
    }

    #[tokio::test]
    async fn test_login_failure_reports_message() {
        let mut auth = MockAuthPort::new();
        auth.expect_login().returning(|_, _| {
            Err(crate::domain::errors::AuthError::rejected(
                401,
                Some("bad creds".to_string()),
            ))
        });
        let app = app_with(auth, MockTokenStorage::new()).await;

        let (code, output) = run(
            &app,
            Command::Login {
                email: "ada@example.com".to_string(),
                password: Some("nope".parse().unwrap()),
            },
        )
        .await;

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(output, "Login failed: bad creds\n");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let storage = MockTokenStorage::with_token(AuthToken::new_unchecked(fixtures::token_for(
            1,
            "ops@example.com",
            "user",
        )));
        let app = app_with(MockAuthPort::new(), storage).await;

        let (_, output) = run(&app, Command::Logout).await;
        assert_eq!(output, "Logged out.\n");

        let (_, output) = run(&app, Command::Status).await;
        assert_eq!(output, "Authenticated: no\n");
    }

    #[tokio::test]
    async fn test_routes_listing() {
        let app = app_with(MockAuthPort::new(), MockTokenStorage::new()).await;

        let (_, output) = run(&app, Command::Routes).await;

        assert!(output.lines().any(|l| l.starts_with("/admin/products") && l.ends_with("admin")));
        assert!(output.lines().any(|l| l.starts_with("/contact") && l.ends_with("public")));
        assert!(output.ends_with("login: /admin/login  home: /\n"));
    }
}
