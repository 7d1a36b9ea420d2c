use std::sync::Arc;

use crate::application::admin::{
    AdminEmailTemplateService, AdminSettingsService, AdminSmtpService,
};
use crate::application::nonce::NonceService;
use crate::application::repos::OptionsRepo;
use crate::application::sessions::SessionService;

#[derive(Clone)]
pub struct AjaxState {
    pub sessions: Arc<SessionService>,
    pub nonces: Arc<NonceService>,
    pub settings: Arc<AdminSettingsService>,
    pub email_templates: Arc<AdminEmailTemplateService>,
    pub smtp: Arc<AdminSmtpService>,
    pub options: Arc<dyn OptionsRepo>,
}
