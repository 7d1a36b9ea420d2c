mod support;

use serde_json::json;

use erp_settings::application::admin::smtp::SmtpSecurity;
use support::{ADMIN_TOKEN, HR_TOKEN, test_app};

#[tokio::test]
async fn unknown_action_is_rejected_before_authentication() {
    let app = test_app();

    let (status, body) = app
        .post_raw(None, "/admin-ajax", &[("action", "erp_settings_save")])
        .await;

    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({ "success": false, "data": { "message": "Unknown request action" } })
    );
}

#[tokio::test]
async fn missing_session_is_unauthorized() {
    let app = test_app();

    let (status, body) = app
        .post_raw(None, "/admin-ajax", &[("action", "erp_get_email_templates")])
        .await;

    assert_eq!(status, 401);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn bad_nonce_stops_the_handler() {
    let app = test_app();

    let (status, body) = app
        .post_raw(
            Some(ADMIN_TOKEN),
            "/admin-ajax",
            &[
                ("action", "erp-settings-save"),
                ("module", "general"),
                ("section", "general"),
                ("erp_currency", "EUR"),
                ("_wpnonce", "0000000000"),
            ],
        )
        .await;

    assert_eq!(status, 403);
    assert_eq!(body["data"]["message"], json!("Nonce verification failed"));
    assert!(app.options.is_empty());
}

#[tokio::test]
async fn nonce_issued_for_one_user_fails_for_another() {
    let app = test_app();
    let admin_nonce = app.nonce_for(app.admin_id);

    let (status, _) = app
        .post_raw(
            Some(HR_TOKEN),
            "/admin-ajax",
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-hr"),
                ("section", "leave"),
                ("_ajax_nonce", admin_nonce.as_str()),
            ],
        )
        .await;

    assert_eq!(status, 403);
}

#[tokio::test]
async fn nonce_endpoint_issues_a_usable_token() {
    let app = test_app();

    let (status, body) = app.get(Some(ADMIN_TOKEN), "/admin-ajax/nonce").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["action"], json!("erp-settings-nonce"));
    let nonce = body["data"]["nonce"].as_str().expect("nonce").to_string();

    let (status, _) = app
        .post_raw(
            Some(ADMIN_TOKEN),
            "/admin-ajax",
            &[("action", "erp_get_email_templates"), ("_ajax_nonce", nonce.as_str())],
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn hr_manager_saves_hr_settings() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            HR_TOKEN,
            app.hr_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-hr"),
                ("section", "leave"),
                ("enable_extra_leave", "on"),
                ("leave_year_start", "7"),
                ("default_leave_days", "21"),
                ("unexpected", "dropped"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": { "message": "Settings has been saved successfully." }
        })
    );
    assert_eq!(
        app.options.value("erp_settings_erp-hr_leave"),
        Some(json!({
            "enable_extra_leave": "yes",
            "leave_year_start": "7",
            "default_leave_days": "21"
        }))
    );
}

#[tokio::test]
async fn hr_manager_cannot_save_general_settings() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            HR_TOKEN,
            app.hr_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "general"),
                ("section", "general"),
            ],
        )
        .await;

    assert_eq!(status, 403);
    assert_eq!(
        body["data"]["message"],
        json!("You do not have sufficient permissions to do this action.")
    );
    assert!(app.options.is_empty());
}

#[tokio::test]
async fn crm_manager_cannot_save_hr_settings() {
    let app = test_app();
    let crm_id = app.sign_in("crm-session-token", "Cleo", &["erp_crm_manager"]);

    let (status, body) = app
        .post_as(
            "crm-session-token",
            crm_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-hr"),
                ("section", "leave"),
                ("default_leave_days", "30"),
            ],
        )
        .await;

    assert_eq!(status, 403);
    assert_eq!(
        body["data"]["message"],
        json!("You do not have sufficient permissions to do this action.")
    );
    assert_eq!(app.options.value("erp_settings_erp-hr_leave"), None);
}

#[tokio::test]
async fn accounting_manager_saves_accounting_settings() {
    let app = test_app();
    let ac_id = app.sign_in("ac-session-token", "Abe", &["erp_ac_manager"]);

    let (status, body) = app
        .post_as(
            "ac-session-token",
            ac_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-ac"),
                ("section", "currency"),
                ("currency", "EUR"),
                ("thousand_separator", "."),
                ("decimal_separator", ","),
                ("decimal_places", "2"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["message"],
        json!("Settings has been saved successfully.")
    );
    assert_eq!(
        app.options.value("erp_settings_erp-ac_currency"),
        Some(json!({
            "currency": "EUR",
            "thousand_separator": ".",
            "decimal_separator": ",",
            "decimal_places": "2"
        }))
    );
}

#[tokio::test]
async fn crm_manager_saves_crm_settings_but_not_accounting() {
    let app = test_app();
    let crm_id = app.sign_in("crm-session-token", "Cleo", &["erp_crm_manager"]);

    let (status, _) = app
        .post_as(
            "crm-session-token",
            crm_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-crm"),
                ("section", "contacts"),
                ("contact_life_stage", "lead"),
            ],
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        app.options.value("erp_settings_erp-crm_contacts"),
        Some(json!({ "contact_life_stage": "lead" }))
    );

    let (status, _) = app
        .post_as(
            "crm-session-token",
            crm_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-ac"),
                ("section", "currency"),
            ],
        )
        .await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn unregistered_module_is_not_found() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[("action", "erp-settings-save"), ("module", "erp-payroll")],
        )
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["data"]["message"], json!("Unregistered settings module"));
}

#[tokio::test]
async fn handler_rejection_is_forwarded_verbatim() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp-settings-save"),
                ("module", "erp-hr"),
                ("section", "payslips"),
            ],
        )
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["data"]["message"], json!("Unknown settings section"));
}

#[tokio::test]
async fn get_data_merges_stored_values_over_defaults() {
    let app = test_app();
    app.options.seed(
        "erp_settings_erp-hr_leave",
        json!({ "leave_year_start": "4" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp-settings-get-data"),
                ("module", "erp-hr"),
                ("section", "leave"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"],
        json!({
            "enable_extra_leave": "no",
            "leave_year_start": "4",
            "default_leave_days": "0"
        })
    );
}

#[tokio::test]
async fn get_data_failures_use_the_canned_message() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[("action", "erp-settings-get-data"), ("module", "erp-payroll")],
        )
        .await;

    assert_eq!(status, 500);
    assert_eq!(
        body["data"]["message"],
        json!("Something went wrong! Please try again.")
    );
}

#[tokio::test]
async fn template_listing_buckets_by_category() {
    let app = test_app();
    app.options.seed(
        "erp_email_settings_employee-welcome",
        json!({ "is_enable": "yes", "subject": "Hi" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[("action", "erp_get_email_templates")],
        )
        .await;

    assert_eq!(status, 200);
    insta::with_settings!({ sort_maps => true }, {
        insta::assert_json_snapshot!("email_template_listing", body);
    });
}

#[tokio::test]
async fn single_template_fills_editor_defaults() {
    let app = test_app();
    app.options.seed(
        "erp_email_settings_employee-welcome",
        json!({ "subject": "Welcome", "body": "Hello\nthere" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_get_single_email_template"),
                ("template", "employee-welcome"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["id"], json!("erp_email_settings_employee-welcome"));
    assert_eq!(data["subject"], json!("Welcome"));
    assert_eq!(data["body"], json!("Hello<br>there"));
    assert_eq!(data["is_enable"], json!("no"));
    assert_eq!(data["tags"], json!(["{full_name}", "{company_name}"]));
    assert_eq!(data["disable_allowed"], json!(true));
}

#[tokio::test]
async fn unknown_single_template_is_not_found() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_get_single_email_template"),
                ("template", "missing"),
            ],
        )
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["data"]["message"], json!("Email template not found"));
}

#[tokio::test]
async fn disabling_a_template_deletes_the_enable_flag() {
    let app = test_app();
    app.options.seed(
        "erp_email_settings_employee-welcome",
        json!({ "is_enable": "yes", "subject": "Hi" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_update_email_status"),
                ("option_id", "erp_email_settings_employee-welcome"),
                ("option_value", "no"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(
        app.options.value("erp_email_settings_employee-welcome"),
        Some(json!({ "subject": "Hi" }))
    );
}

#[tokio::test]
async fn fixed_templates_cannot_be_disabled() {
    let app = test_app();
    app.options.seed(
        "erp_email_settings_new-leave-request",
        json!({ "is_enable": "yes" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_update_email_status"),
                ("option_id", "erp_email_settings_new-leave-request"),
                ("option_value", "no"),
            ],
        )
        .await;

    assert_eq!(status, 400);
    assert_eq!(
        body["data"]["message"],
        json!("This email template can not be disabled")
    );
    assert_eq!(
        app.options.value("erp_email_settings_new-leave-request"),
        Some(json!({ "is_enable": "yes" }))
    );
}

#[tokio::test]
async fn updating_a_template_replaces_the_whole_record() {
    let app = test_app();
    app.options.seed(
        "erp_email_settings_employee-welcome",
        json!({ "is_enable": "yes", "legacy": "gone" }),
    );

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_update_email_template"),
                ("id", "erp_email_settings_employee-welcome"),
                ("subject", "Welcome aboard"),
                ("heading", "Hello"),
                ("body", "<p>Glad you are here</p>"),
                ("is_enable", "on"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["data"], json!("Template updated successfully"));
    assert_eq!(
        app.options.value("erp_email_settings_employee-welcome"),
        Some(json!({
            "subject": "Welcome aboard",
            "heading": "Hello",
            "body": "<p>Glad you are here</p>"
        }))
    );
}

#[tokio::test]
async fn template_enable_flag_follows_each_save() {
    let app = test_app();
    let save = |is_enable: Option<&'static str>| {
        let mut fields = vec![
            ("action", "erp_update_email_template"),
            ("id", "erp_email_settings_employee-welcome"),
            ("subject", "Tom & Jerry"),
            ("heading", "Hello"),
            ("body", "Hi"),
        ];
        if let Some(value) = is_enable {
            fields.push(("is_enable", value));
        }
        fields
    };

    let (status, _) = app
        .post_as(ADMIN_TOKEN, app.admin_id, &save(Some("yes")))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        app.options.value("erp_email_settings_employee-welcome"),
        Some(json!({
            "subject": "Tom & Jerry",
            "heading": "Hello",
            "body": "Hi",
            "is_enable": "yes"
        }))
    );

    let (status, _) = app.post_as(ADMIN_TOKEN, app.admin_id, &save(None)).await;
    assert_eq!(status, 200);
    let stored = app
        .options
        .value("erp_email_settings_employee-welcome")
        .expect("stored template");
    assert!(stored.get("is_enable").is_none());
    assert_eq!(stored["subject"], json!("Tom & Jerry"));
}

#[tokio::test]
async fn hr_manager_cannot_touch_email_templates() {
    let app = test_app();

    let (status, _) = app
        .post_as(HR_TOKEN, app.hr_id, &[("action", "erp_get_email_templates")])
        .await;

    assert_eq!(status, 403);
}

#[tokio::test]
async fn smtp_test_reports_the_first_missing_field() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_smtp_test_connection"),
                ("mail_server", "smtp.example.com"),
                ("port", "465"),
                ("authentication", "ssl"),
                ("username", "mailer@example.com"),
            ],
        )
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["data"]["message"], json!("No email password provided"));
    assert!(app.transport.sent().is_empty());
}

#[tokio::test]
async fn smtp_test_sends_to_the_site_admin_by_default() {
    let app = test_app();

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_smtp_test_connection"),
                ("mail_server", "smtp.example.com"),
                ("port", "587"),
                ("authentication", "tls"),
                ("username", "mailer@example.com"),
                ("password", "s3cret &more"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["message"],
        json!("Test email has been sent successfully to site@example.com")
    );

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.port, 587);
    assert_eq!(mail.security, SmtpSecurity::StartTls);
    assert_eq!(mail.from_email, "site@example.com");
    assert_eq!(mail.from_name, "Ada");
    assert_eq!(
        mail.credentials.as_ref().map(|c| c.password.as_str()),
        Some("s3cret &more")
    );
}

#[tokio::test]
async fn smtp_transport_errors_are_forwarded() {
    let app = test_app();
    app.transport
        .fail_with("Connection refused (os error 111)");

    let (status, body) = app
        .post_as(
            ADMIN_TOKEN,
            app.admin_id,
            &[
                ("action", "erp_smtp_test_connection"),
                ("mail_server", "smtp.example.com"),
                ("port", "25"),
                ("test_email", "ops@example.com"),
            ],
        )
        .await;

    assert_eq!(status, 502);
    assert_eq!(
        body["data"]["message"],
        json!("Connection refused (os error 111)")
    );
}

#[tokio::test]
async fn action_may_arrive_in_the_query_string() {
    let app = test_app();
    let nonce = app.nonce_for(app.admin_id);

    let (status, _) = app
        .post_raw(
            Some(ADMIN_TOKEN),
            "/admin-ajax?action=erp_get_email_templates",
            &[("_wpnonce", nonce.as_str())],
        )
        .await;

    assert_eq!(status, 200);
}

#[tokio::test]
async fn liveness_has_no_body() {
    let app = test_app();

    let (status, body) = app.get(None, "/health").await;

    assert_eq!(status, 204);
    assert!(body.is_null());
}
