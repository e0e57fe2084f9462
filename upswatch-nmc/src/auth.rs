//! Login handshake.
//!
//! The console has no API authentication. A session is opened by fetching
//! the root page, submitting its login form, and reading the session id out
//! of the redirect that follows. Any failure along the way yields the
//! profile's fallback session instead of an error.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};
use upswatch_core::SessionToken;
use upswatch_fetch::Transport;
use upswatch_fetch::markup::{self, Document};

use crate::descriptor::{DeviceProfile, LoginPlan};
use crate::error::NmcError;

/// Session id segment of a post-login redirect target.
static SESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:/?NMC/)([^/]+)").expect("Invalid regex"));

// ============================================================================
// Credentials
// ============================================================================

/// Console login credentials.
///
/// Empty values are replaced by the profile defaults at login time.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Authenticator
// ============================================================================

/// Runs one login handshake against a console.
pub struct SessionAuthenticator<'a> {
    transport: &'a dyn Transport,
    profile: &'a DeviceProfile,
    credentials: &'a Credentials,
}

impl<'a> SessionAuthenticator<'a> {
    /// Creates an authenticator.
    pub fn new(
        transport: &'a dyn Transport,
        profile: &'a DeviceProfile,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            transport,
            profile,
            credentials,
        }
    }

    /// Logs in, falling back to the profile's session id on any failure.
    #[instrument(skip(self))]
    pub async fn login(&self) -> SessionToken {
        match self.handshake().await {
            Ok(token) => {
                info!("Login succeeded");
                token
            }
            Err(e) => {
                warn!(error = %e, "Login failed, using fallback session");
                SessionToken::fallback(&self.profile.fallback_session, e.to_string())
            }
        }
    }

    /// Runs the handshake, reporting the first failure.
    pub async fn handshake(&self) -> Result<SessionToken, NmcError> {
        let plan = &self.profile.login;

        let page = self.transport.get(&plan.page).await?;
        let action = find_form_action(&page.body, plan)?;
        let target = normalize_action(action.as_deref());
        debug!(target = %target, "Submitting login form");

        let response = self
            .transport
            .post_form(&target, &form_fields(plan, self.credentials))
            .await?;
        if !response.is_redirect() {
            return Err(NmcError::NotRedirected(response.status));
        }

        let location = response.location.unwrap_or_default();
        extract_session_id(&location)
            .map(SessionToken::from_redirect)
            .ok_or(NmcError::NoSessionInRedirect(location))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Finds the login form and returns its `action` attribute, if any.
pub fn find_form_action(html: &str, plan: &LoginPlan) -> Result<Option<String>, NmcError> {
    let doc = Document::parse(html);
    for selector in &plan.form_selectors {
        let selector = markup::compile(selector)?;
        if let Some(form) = doc.select_first(&selector) {
            return Ok(form.value().attr("action").map(str::to_string));
        }
    }
    Err(NmcError::LoginFormNotFound)
}

/// Turns a form action into a request path.
///
/// A missing or empty action posts to the root. A relative action gains a
/// leading slash. Absolute URLs and rooted paths pass through.
pub fn normalize_action(action: Option<&str>) -> String {
    match action {
        None | Some("") => "/".to_string(),
        Some(a) if a.starts_with("http") || a.starts_with('/') => a.to_string(),
        Some(a) => format!("/{a}"),
    }
}

/// Builds the urlencoded login form body.
pub fn form_fields(plan: &LoginPlan, credentials: &Credentials) -> Vec<(String, String)> {
    let or_default = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };
    let mut fields = vec![
        (
            plan.username_field.clone(),
            or_default(&credentials.username, &plan.default_username),
        ),
        (
            plan.password_field.clone(),
            or_default(&credentials.password, &plan.default_password),
        ),
    ];
    fields.extend(plan.extra_fields.iter().cloned());
    fields
}

/// Extracts the session id from a redirect target.
pub fn extract_session_id(location: &str) -> Option<&str> {
    SESSION_RE
        .captures(location)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_session_id() {
        assert_eq!(extract_session_id("/NMC/abc123/home.htm"), Some("abc123"));
        assert_eq!(extract_session_id("NMC/xyz/"), Some("xyz"));
        assert_eq!(
            extract_session_id("http://10.0.0.5/NMC/Tk9pQ/home.htm"),
            Some("Tk9pQ")
        );
        assert_eq!(extract_session_id("/home.htm"), None);
        assert_eq!(extract_session_id(""), None);
    }

    #[test]
    fn test_normalize_action() {
        assert_eq!(normalize_action(Some("Forms/login1")), "/Forms/login1");
        assert_eq!(normalize_action(Some("/Forms/login1")), "/Forms/login1");
        assert_eq!(
            normalize_action(Some("http://ups/Forms/login1")),
            "http://ups/Forms/login1"
        );
        assert_eq!(normalize_action(None), "/");
        assert_eq!(normalize_action(Some("")), "/");
    }

    #[test]
    fn test_find_form_action_order() {
        let plan = LoginPlan::default();
        let html = concat!(
            r#"<form action="search"></form>"#,
            r#"<form name="frmLogin" action="Forms/login1"></form>"#
        );
        assert_eq!(
            find_form_action(html, &plan).unwrap().as_deref(),
            Some("Forms/login1")
        );

        let html = r#"<form action="search"></form><form action="/do_login"></form>"#;
        assert_eq!(
            find_form_action(html, &plan).unwrap().as_deref(),
            Some("/do_login")
        );

        let html = r"<form></form>";
        assert_eq!(find_form_action(html, &plan).unwrap(), None);
    }

    #[test]
    fn test_find_form_action_missing() {
        let err = find_form_action("<p>maintenance</p>", &LoginPlan::default()).unwrap_err();
        assert!(matches!(err, NmcError::LoginFormNotFound));
    }

    #[test]
    fn test_form_fields_defaults() {
        let fields = form_fields(&LoginPlan::default(), &Credentials::default());
        assert_eq!(
            fields,
            vec![
                ("login_username".to_string(), "apc".to_string()),
                ("login_password".to_string(), "apc".to_string()),
                ("prefLanguage".to_string(), "00000000".to_string()),
                ("submit".to_string(), "Log On".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_fields_credentials() {
        let creds = Credentials::new("admin", "s3cret");
        let fields = form_fields(&LoginPlan::default(), &creds);
        assert_eq!(fields[0].1, "admin");
        assert_eq!(fields[1].1, "s3cret");
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials::new("admin", "s3cret");
        assert!(!format!("{creds:?}").contains("s3cret"));
    }
}
