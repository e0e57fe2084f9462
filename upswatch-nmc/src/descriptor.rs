//! Device profile system.
//!
//! A profile holds all the static knowledge about one family of console
//! firmware:
//! - Login form location and field names
//! - Page paths for status and event data
//! - Anchor element ids used by the selector strategies
//! - Fallback session and request timeout

use std::time::Duration;
use upswatch_core::TelemetryField;
use upswatch_fetch::{DEFAULT_TIMEOUT_SECS, ExtractionPipeline};

use crate::error::NmcError;
use crate::strategies::{
    AnchorStrategy, ElementScanStrategy, FullTextStrategy, RuntimeLabelStrategy,
    TableScanStrategy,
};

/// Session id used when the login handshake cannot produce one.
pub const FALLBACK_SESSION: &str = "default";

/// Credential used for both username and password when none is configured.
pub const DEFAULT_CREDENTIAL: &str = "apc";

// ============================================================================
// Device Profile
// ============================================================================

/// Complete profile for a console firmware family.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    /// Display name.
    pub name: String,
    /// How to find and fill in the login form.
    pub login: LoginPlan,
    /// Where telemetry and events live.
    pub pages: PagePlan,
    /// Element ids the anchored strategies start from.
    pub anchors: AnchorIds,
    /// Session id used when login fails.
    pub fallback_session: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DeviceProfile {
    /// Creates a new profile builder.
    pub fn builder(name: impl Into<String>) -> DeviceProfileBuilder {
        DeviceProfileBuilder::new(name)
    }

    /// Profile for the legacy APC Network Management Card console.
    pub fn nmc() -> Self {
        Self::builder("APC Network Management Card").build()
    }

    /// Builds the extraction pipeline for this profile's status page.
    ///
    /// Fails only if a configured anchor is not a valid selector.
    pub fn build_pipeline(&self) -> Result<ExtractionPipeline, NmcError> {
        Ok(ExtractionPipeline::with_strategies(vec![
            Box::new(AnchorStrategy::new(&self.anchors)?),
            Box::new(TableScanStrategy::new()?),
            Box::new(RuntimeLabelStrategy::new(&self.anchors)?),
            Box::new(ElementScanStrategy::new()?),
            Box::new(FullTextStrategy::new()),
        ]))
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::nmc()
    }
}

// ============================================================================
// Login Plan
// ============================================================================

/// How to locate and submit the login form.
#[derive(Debug, Clone)]
pub struct LoginPlan {
    /// Page holding the login form.
    pub page: String,
    /// Form selectors, tried in order.
    pub form_selectors: Vec<String>,
    /// Username field name.
    pub username_field: String,
    /// Password field name.
    pub password_field: String,
    /// Username sent when none is configured.
    pub default_username: String,
    /// Password sent when none is configured.
    pub default_password: String,
    /// Fixed fields submitted with every login.
    pub extra_fields: Vec<(String, String)>,
}

impl Default for LoginPlan {
    fn default() -> Self {
        Self {
            page: "/".to_string(),
            form_selectors: vec![
                r#"form[name="frmLogin"]"#.to_string(),
                r#"form[action*="login"]"#.to_string(),
                "form".to_string(),
            ],
            username_field: "login_username".to_string(),
            password_field: "login_password".to_string(),
            default_username: DEFAULT_CREDENTIAL.to_string(),
            default_password: DEFAULT_CREDENTIAL.to_string(),
            extra_fields: vec![
                ("prefLanguage".to_string(), "00000000".to_string()),
                ("submit".to_string(), "Log On".to_string()),
            ],
        }
    }
}

// ============================================================================
// Page Plan
// ============================================================================

/// Session-scoped page names.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Status pages, tried in order.
    pub status: Vec<String>,
    /// Status page requested once after a re-login.
    pub status_retry: String,
    /// Pages carrying the event table, tried in order.
    pub events: Vec<String>,
    /// Event page requested once after a re-login.
    pub events_retry: String,
    /// Selector for the sub-headers that may title the event table.
    pub event_header: String,
    /// Text that marks a sub-header as the event table's title.
    pub event_header_text: String,
    /// How many levels above the header to search for the table.
    pub event_search_depth: usize,
}

impl Default for PagePlan {
    fn default() -> Self {
        Self {
            status: vec![
                "ulstat.htm".to_string(),
                "upsstat.htm".to_string(),
                "status.htm".to_string(),
            ],
            status_retry: "ulstat.htm".to_string(),
            events: vec!["home.htm".to_string(), "eventweb.htm".to_string()],
            events_retry: "home.htm".to_string(),
            event_header: ".dataSubHeader".to_string(),
            event_header_text: "event".to_string(),
            event_search_depth: 5,
        }
    }
}

// ============================================================================
// Anchor Ids
// ============================================================================

/// Element selectors the anchored strategies start from.
#[derive(Debug, Clone)]
pub struct AnchorIds {
    /// Label next to the load current reading.
    pub load_current: String,
    /// Label next to the output voltage reading.
    pub output_voltage: String,
    /// Label next to the internal temperature reading.
    pub internal_temperature: String,
    /// Label next to the runtime reading.
    pub runtime: String,
    /// Label inside the runtime-remaining container.
    pub runtime_remaining: String,
    /// Container around a label/value pair.
    pub data_field: String,
    /// Value element inside a container.
    pub data_value: String,
}

impl AnchorIds {
    /// Returns the anchor selector for a field.
    pub fn for_field(&self, field: TelemetryField) -> &str {
        match field {
            TelemetryField::LoadCurrent => &self.load_current,
            TelemetryField::OutputVoltage => &self.output_voltage,
            TelemetryField::InternalTemperature => &self.internal_temperature,
            TelemetryField::RuntimeRemaining => &self.runtime,
        }
    }
}

impl Default for AnchorIds {
    fn default() -> Self {
        Self {
            load_current: "#langLoadCurrent".to_string(),
            output_voltage: "#langOutputVoltage".to_string(),
            internal_temperature: "#langInternalTemp".to_string(),
            runtime: "#langRuntime".to_string(),
            runtime_remaining: "#langRuntimeRemaining".to_string(),
            data_field: ".dataField".to_string(),
            data_value: ".dataValue".to_string(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`DeviceProfile`].
pub struct DeviceProfileBuilder {
    name: String,
    login: LoginPlan,
    pages: PagePlan,
    anchors: AnchorIds,
    fallback_session: String,
    timeout: Duration,
}

impl DeviceProfileBuilder {
    /// Creates a new builder with NMC defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            login: LoginPlan::default(),
            pages: PagePlan::default(),
            anchors: AnchorIds::default(),
            fallback_session: FALLBACK_SESSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the login plan.
    pub fn login(mut self, login: LoginPlan) -> Self {
        self.login = login;
        self
    }

    /// Sets the page plan.
    pub fn pages(mut self, pages: PagePlan) -> Self {
        self.pages = pages;
        self
    }

    /// Sets the anchor ids.
    pub fn anchors(mut self, anchors: AnchorIds) -> Self {
        self.anchors = anchors;
        self
    }

    /// Sets the fallback session id.
    pub fn fallback_session(mut self, session: impl Into<String>) -> Self {
        self.fallback_session = session.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the profile.
    pub fn build(self) -> DeviceProfile {
        DeviceProfile {
            name: self.name,
            login: self.login,
            pages: self.pages,
            anchors: self.anchors,
            fallback_session: self.fallback_session,
            timeout: self.timeout,
        }
    }
}
