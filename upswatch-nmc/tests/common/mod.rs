//! Shared test fixtures: a scripted transport and console pages.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use upswatch_fetch::{HttpError, PageResponse, Transport};

/// What the scripted transport answers for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Page(PageResponse),
    Status(u16),
    Timeout,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::Page(PageResponse::new(200, body))
    }

    pub fn see_other(location: &str) -> Self {
        Self::Page(PageResponse::redirect(303, location))
    }
}

/// Transport that answers from a script keyed by "METHOD path".
///
/// Each key holds a queue of replies. The last reply repeats once the
/// queue is down to one. Unscripted requests get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<String>>,
    forms: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, key: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Scripts a successful login that hands out `sessions` in order.
    pub fn with_login(mut self, sessions: &[&str]) -> Self {
        self = self.on("GET /", Reply::ok(LOGIN_PAGE));
        for session in sessions {
            self = self.on(
                "POST /Forms/login1",
                Reply::see_other(&format!("/NMC/{session}/home.htm")),
            );
        }
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.requests().iter().filter(|r| *r == key).count()
    }

    pub fn forms(&self) -> Vec<Vec<(String, String)>> {
        self.forms.lock().unwrap().clone()
    }

    fn answer(&self, key: String) -> Result<PageResponse, HttpError> {
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        self.requests.lock().unwrap().push(key);
        match reply {
            Some(Reply::Page(page)) => Ok(page),
            Some(Reply::Status(code)) => Err(HttpError::Status(code)),
            Some(Reply::Timeout) => Err(HttpError::Timeout),
            None => Err(HttpError::Status(404)),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str) -> Result<PageResponse, HttpError> {
        self.answer(format!("GET {path}"))
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<PageResponse, HttpError> {
        self.forms.lock().unwrap().push(form.to_vec());
        self.answer(format!("POST {path}"))
    }
}

// ============================================================================
// Pages
// ============================================================================

pub const LOGIN_PAGE: &str = r#"<html><body>
<form name="frmLogin" action="Forms/login1" method="post">
<input name="login_username"><input name="login_password" type="password">
</form></body></html>"#;

pub const STATUS_PAGE: &str = concat!(
    "<html><body>\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langLoadCurrent">Load Current</span></div>"#,
    r#"<div class="dataValue">2.5&nbsp;A</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langOutputVoltage">Output Voltage</span></div>"#,
    r#"<div class="dataValue">230.0&nbsp;VAC</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langInternalTemp">Internal Temperature</span></div>"#,
    r#"<div class="dataValue">27.0°C</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langRuntime">Runtime Remaining</span></div>"#,
    r#"<div class="dataValue">2hr 9min</div></div>"#,
    "\n",
    "</body></html>"
);

pub const HOME_PAGE: &str = concat!(
    "<html><body>\n",
    "<div class=\"dataSubHeader\">Recent Device Events</div>\n",
    "<table>\n",
    "<tr><th>Date</th><th>Time</th><th>Event</th></tr>\n",
    "<tr class=\"text-warning\"><td>01/15/2024</td><td>10:30:00</td>",
    "<td>UPS: On battery power in response to an input power problem.</td></tr>\n",
    "<tr class=\"text-success\"><td>01/15/2024</td><td>10:31:12</td>",
    "<td>UPS: No longer on battery power.</td></tr>\n",
    "<tr><td>01/14/2024</td><td>08:00:00</td><td>System: Network service started.</td></tr>\n",
    "</table></body></html>"
);
