use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::builtin::{SchemaSettingsHandler, builtin_schemas};
use super::handler::SettingsHandler;
use crate::application::options::OptionStore;
use crate::application::sessions::AdminPrincipal;
use crate::domain::capabilities::Capability;
use crate::domain::settings::builtin_manager_capability;

#[derive(Clone)]
pub struct RegisteredModule {
    pub handler: Arc<dyn SettingsHandler>,
    /// Capability accepted in place of `manage_options`.
    pub manager: Option<Capability>,
}

/// Settings handlers keyed by module id, filled once at startup.
#[derive(Clone, Default)]
pub struct SettingsRegistry {
    modules: HashMap<String, RegisteredModule>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the handlers of every built-in module.
    pub fn with_builtin(store: OptionStore) -> Self {
        let mut registry = Self::new();
        for schema in builtin_schemas() {
            let module = schema.module;
            let manager = builtin_manager_capability(module);
            let handler = SchemaSettingsHandler::new(schema, store.clone());
            registry.insert(module, Arc::new(handler), manager);
        }
        registry
    }

    /// Register a handler that only `manage_options` may use.
    pub fn register(&mut self, module: impl Into<String>, handler: Arc<dyn SettingsHandler>) {
        self.insert(module, handler, None);
    }

    pub fn register_with_manager(
        &mut self,
        module: impl Into<String>,
        handler: Arc<dyn SettingsHandler>,
        manager: Capability,
    ) {
        self.insert(module, handler, Some(manager));
    }

    fn insert(
        &mut self,
        module: impl Into<String>,
        handler: Arc<dyn SettingsHandler>,
        manager: Option<Capability>,
    ) {
        let module = module.into();
        debug!(target = "erp_settings::settings", module = %module, "registered settings handler");
        self.modules
            .insert(module, RegisteredModule { handler, manager });
    }

    pub fn resolve(&self, module: &str) -> Option<&RegisteredModule> {
        self.modules.get(module)
    }

    /// Whether `principal` may save `module`; unregistered modules need `manage_options`.
    pub fn can_save(&self, principal: &AdminPrincipal, module: &str) -> bool {
        if principal.can(Capability::ManageOptions) {
            return true;
        }
        self.resolve(module)
            .and_then(|entry| entry.manager)
            .is_some_and(|manager| principal.can(manager))
    }}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::application::admin::settings::SettingsSaveError;
    use crate::application::input::FormInput;
    use crate::domain::options::OptionRecord;
    use crate::infra::memory::InMemoryOptionsRepo;

    struct NoopHandler;

    #[async_trait]
    impl SettingsHandler for NoopHandler {
        async fn save(&self, _: &str, _: &str, _: &FormInput) -> Result<(), SettingsSaveError> {
            Ok(())
        }

        async fn load(&self, _: &str, _: &str) -> Result<OptionRecord, SettingsSaveError> {
            Ok(OptionRecord::new())
        }
    }

    fn principal(capabilities: Vec<Capability>) -> AdminPrincipal {
        AdminPrincipal {
            user_id: Uuid::nil(),
            session_id: Uuid::nil(),
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            capabilities,
        }
    }

    #[test]
    fn manager_capabilities_only_cover_their_own_module() {
        let registry =
            SettingsRegistry::with_builtin(OptionStore::new(Arc::new(InMemoryOptionsRepo::default())));
        let crm = principal(vec![Capability::CrmManager]);
        let accounting = principal(vec![Capability::AccountingManager]);

        assert!(registry.can_save(&crm, "erp-crm"));
        assert!(!registry.can_save(&crm, "erp-hr"));
        assert!(!registry.can_save(&crm, "erp-ac"));
        assert!(registry.can_save(&accounting, "erp-ac"));
        assert!(!registry.can_save(&accounting, "erp-email"));
        assert!(registry.can_save(&principal(vec![Capability::ManageOptions]), "anything"));
    }

    #[test]
    fn registered_plugins_keep_their_manager() {
        let mut registry = SettingsRegistry::new();
        registry.register("erp-sms", Arc::new(NoopHandler));
        registry.register_with_manager("erp-payroll", Arc::new(NoopHandler), Capability::HrManager);
        let hr = principal(vec![Capability::HrManager]);

        assert_eq!(
            registry.resolve("erp-payroll").and_then(|entry| entry.manager),
            Some(Capability::HrManager)
        );
        assert!(registry.can_save(&hr, "erp-payroll"));
        assert!(!registry.can_save(&hr, "erp-sms"));
        assert!(registry.resolve("erp-missing").is_none());
    }
}
