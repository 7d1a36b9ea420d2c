#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use url::form_urlencoded::Serializer;
use uuid::Uuid;

use erp_settings::application::admin::settings::SettingsRegistry;
use erp_settings::application::admin::smtp::{MailSendError, MailTransport, OutgoingMail};
use erp_settings::application::admin::{
    AdminEmailTemplateService, AdminSettingsService, AdminSmtpService,
};
use erp_settings::application::nonce::{NonceService, SETTINGS_NONCE_ACTION};
use erp_settings::application::options::OptionStore;
use erp_settings::application::sessions::SessionService;
use erp_settings::domain::entities::AdminSessionRecord;
use erp_settings::domain::templates::EmailTemplate;
use erp_settings::infra::http::{AjaxState, build_router};
use erp_settings::infra::memory::{InMemoryOptionsRepo, InMemorySessionsRepo};
use erp_settings::infra::templates::StaticTemplateRepository;

pub const ADMIN_TOKEN: &str = "admin-session-token";
pub const HR_TOKEN: &str = "hr-session-token";
pub const NONCE_SECRET: &str = "integration-nonce-secret";

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub failure: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().expect("failure lock") = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailSendError> {
        if let Some(message) = self.failure.lock().expect("failure lock").clone() {
            return Err(MailSendError(message));
        }
        self.sent.lock().expect("sent lock").push(mail);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub options: Arc<InMemoryOptionsRepo>,
    pub sessions: Arc<InMemorySessionsRepo>,
    pub transport: Arc<RecordingTransport>,
    pub nonces: NonceService,
    pub admin_id: Uuid,
    pub hr_id: Uuid,
}

fn session(user_id: Uuid, name: &str, capabilities: &[&str]) -> AdminSessionRecord {
    AdminSessionRecord {
        session_id: Uuid::new_v4(),
        user_id,
        display_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
    }
}

pub fn sample_templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate::new(
            "employee-welcome",
            "HRM::NewEmployeeWelcome",
            "New <Employee> Welcome",
            "Welcome email to new employees.",
            ["{full_name}", "{company_name}"],
        ),
        EmailTemplate::new(
            "new-leave-request",
            "HRM::NewLeaveRequest",
            "New Leave Request",
            "Leave request notification to HR Manager.",
            ["{employee_name}"],
        ),
        EmailTemplate::new(
            "transactional-email",
            "Accounting::TransactionalEmail",
            "Transactional Email",
            "Invoice & payment notification.",
            ["{customer_name}"],
        ),
        EmailTemplate::new(
            "payslip",
            "Payroll::Slip",
            "Payslip",
            "Not listed anywhere.",
            Vec::<String>::new(),
        ),
    ]
}

pub fn test_app() -> TestApp {
    let options = Arc::new(InMemoryOptionsRepo::default());
    let sessions = Arc::new(InMemorySessionsRepo::default());
    let transport = Arc::new(RecordingTransport::default());
    let nonces = NonceService::new(NONCE_SECRET, std::time::Duration::from_secs(86_400));

    let admin_id = Uuid::new_v4();
    let hr_id = Uuid::new_v4();
    sessions.insert(ADMIN_TOKEN, session(admin_id, "Ada", &["manage_options"]));
    sessions.insert(HR_TOKEN, session(hr_id, "Hank", &["erp_hr_manager"]));

    let store = OptionStore::new(options.clone());
    let state = AjaxState {
        sessions: Arc::new(SessionService::new(sessions.clone())),
        nonces: Arc::new(nonces.clone()),
        settings: Arc::new(AdminSettingsService::new(Arc::new(
            SettingsRegistry::with_builtin(store.clone()),
        ))),
        email_templates: Arc::new(AdminEmailTemplateService::new(
            Arc::new(StaticTemplateRepository::new(sample_templates())),
            store.clone(),
            ["erp_email_settings_new-leave-request".to_string()],
        )),
        smtp: Arc::new(AdminSmtpService::new(
            store,
            transport.clone(),
            "site@example.com",
        )),
        options: options.clone(),
    };

    TestApp {
        router: build_router(state),
        options,
        sessions,
        transport,
        nonces,
        admin_id,
        hr_id,
    }
}

impl TestApp {
    /// Open a session for a new user holding `capabilities`.
    pub fn sign_in(&self, token: &str, name: &str, capabilities: &[&str]) -> Uuid {
        let user_id = Uuid::new_v4();
        self.sessions.insert(token, session(user_id, name, capabilities));
        user_id
    }

    pub fn nonce_for(&self, user_id: Uuid) -> String {
        self.nonces.create(SETTINGS_NONCE_ACTION, user_id)
    }

    /// POST a form as `token`, signing it with that user's nonce.
    pub async fn post_as(&self, token: &str, user_id: Uuid, fields: &[(&str, &str)]) -> (u16, Value) {
        let nonce = self.nonce_for(user_id);
        let mut signed: Vec<(&str, &str)> = fields.to_vec();
        signed.push(("_wpnonce", nonce.as_str()));
        self.post_raw(Some(token), "/admin-ajax", &signed).await
    }

    pub async fn post_raw(
        &self,
        token: Option<&str>,
        uri: &str,
        fields: &[(&str, &str)],
    ) -> (u16, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = request
            .body(Body::from(encode_form(fields)))
            .expect("request");
        let response = self.router.clone().oneshot(request).await.expect("response");
        read_json(response).await
    }

    pub async fn get(&self, token: Option<&str>, uri: &str) -> (u16, Value) {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            request = request.header("x-erp-session", token);
        }
        let request = request.body(Body::empty()).expect("request");
        let response = self.router.clone().oneshot(request).await.expect("response");
        read_json(response).await
    }
}

async fn read_json(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    Serializer::new(String::new()).extend_pairs(fields).finish()
}
