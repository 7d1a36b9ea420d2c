//! Built-in transactional email templates.

use crate::application::repos::TemplateRepository;
use crate::domain::templates::EmailTemplate;

/// Fixed template catalog, listed in registration order.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateRepository {
    templates: Vec<EmailTemplate>,
}

impl StaticTemplateRepository {
    pub fn new(templates: Vec<EmailTemplate>) -> Self {
        Self { templates }
    }

    pub fn builtin() -> Self {
        const EMPLOYEE_TAGS: &[&str] = &["{full_name}", "{first_name}", "{last_name}"];
        const LEAVE_TAGS: &[&str] = &[
            "{employee_name}",
            "{leave_type}",
            "{date_from}",
            "{date_to}",
            "{no_days}",
            "{reason}",
        ];

        let leave_tags = || LEAVE_TAGS.iter().copied();

        Self::new(vec![
            EmailTemplate::new(
                "employee-welcome",
                "HRM::NewEmployeeWelcome",
                "New Employee Welcome",
                "Welcome email to new employees.",
                EMPLOYEE_TAGS
                    .iter()
                    .copied()
                    .chain(["{company_name}", "{login_info}"]),
            ),
            EmailTemplate::new(
                "new-leave-request",
                "HRM::NewLeaveRequest",
                "New Leave Request",
                "New leave request notification to HR Manager.",
                leave_tags().chain(["{requests_url}"]),
            ),
            EmailTemplate::new(
                "approved-leave-request",
                "HRM::ApprovedLeaveRequest",
                "Approved Leave Request",
                "Approved leave request notification to employee.",
                leave_tags().chain(["{approved_by}"]),
            ),
            EmailTemplate::new(
                "rejected-leave-request",
                "HRM::RejectedLeaveRequest",
                "Rejected Leave Request",
                "Rejected leave request notification to employee.",
                leave_tags().chain(["{reject_reason}"]),
            ),
            EmailTemplate::new(
                "birthday-wish",
                "HRM::BirthdayWish",
                "Happy Birthday",
                "Birthday greeting to employees.",
                EMPLOYEE_TAGS.iter().copied(),
            ),
            EmailTemplate::new(
                "new-task-assigned",
                "CRM::NewTaskAssigned",
                "New Task Assigned",
                "Notification to a user when a task is assigned.",
                ["{employee_name}", "{task_description}", "{due_date}", "{created_by}"],
            ),
            EmailTemplate::new(
                "new-contact-assigned",
                "CRM::NewContactAssigned",
                "New Contact Assigned",
                "Notification to a user when a contact is assigned.",
                ["{employee_name}", "{contact_name}", "{created_by}"],
            ),
            EmailTemplate::new(
                "transactional-email",
                "Accounting::TransactionalEmail",
                "Transactional Email",
                "Invoice and payment notification to customers.",
                ["{customer_name}", "{trans_id}", "{trans_date}", "{amount}"],
            ),
            EmailTemplate::new(
                "purchase-order",
                "Accounting::PurchaseOrder",
                "Purchase Order",
                "Purchase order sent to vendors.",
                ["{vendor_name}", "{trans_id}", "{trans_date}", "{amount}"],
            ),
        ])
    }
}

impl TemplateRepository for StaticTemplateRepository {
    fn list(&self) -> Vec<EmailTemplate> {
        self.templates.clone()
    }

    fn get(&self, id: &str) -> Option<EmailTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
    }
}
