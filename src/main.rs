use std::{process, sync::Arc};

use erp_settings::{
    application::{
        admin::{
            AdminEmailTemplateService, AdminSettingsService, AdminSmtpService,
            settings::SettingsRegistry,
        },
        error::AppError,
        nonce::NonceService,
        options::OptionStore,
        repos::{OptionsRepo, SessionsRepo},
        sessions::SessionService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AjaxState},
        mail::LettreMailTransport,
        telemetry,
        templates::StaticTemplateRepository,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    match command {
        config::Command::Serve(_) => {
            telemetry::init(&settings.logging).map_err(AppError::from)?;
            run_serve(settings).await
        }
        config::Command::Nonce(args) => run_nonce(&settings, &args),
    }
}

fn run_nonce(settings: &config::Settings, args: &config::NonceArgs) -> Result<(), AppError> {
    let nonces = nonce_service(settings);
    println!("{}", nonces.create(&args.action, args.user));
    Ok(())
}

fn nonce_service(settings: &config::Settings) -> NonceService {
    NonceService::new(
        settings.security.nonce_secret.as_bytes(),
        settings.security.nonce_lifetime,
    )
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_state(repositories, &settings);
    serve_http(&settings, state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| AppError::validation("database url is not configured"))?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_state(repositories: Arc<PostgresRepositories>, settings: &config::Settings) -> AjaxState {
    let options_repo: Arc<dyn OptionsRepo> = repositories.clone();
    let sessions_repo: Arc<dyn SessionsRepo> = repositories;
    let store = OptionStore::new(options_repo.clone());

    let registry = SettingsRegistry::with_builtin(store.clone());
    let templates = Arc::new(StaticTemplateRepository::builtin());
    let transport = Arc::new(LettreMailTransport::new(settings.smtp.timeout));

    AjaxState {
        sessions: Arc::new(SessionService::new(sessions_repo)),
        nonces: Arc::new(nonce_service(settings)),
        settings: Arc::new(AdminSettingsService::new(Arc::new(registry))),
        email_templates: Arc::new(AdminEmailTemplateService::new(
            templates,
            store.clone(),
            settings.email_templates.fixed_enabled.clone(),
        )),
        smtp: Arc::new(AdminSmtpService::new(
            store,
            transport,
            settings.site.admin_email.clone(),
        )),
        options: options_repo,
    }
}

async fn serve_http(settings: &config::Settings, state: AjaxState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let addr = settings.server.addr;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|source| {
        AppError::from(InfraError::Bind {
            addr: addr.to_string(),
            source,
        })
    })?;
    info!(addr = %addr, site = %settings.site.name, "settings service listening");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move { shutdown.notified().await }
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => return flatten_server_result(result),
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!(error = %err, "failed to listen for shutdown signal");
            }
        }
    }

    info!(
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "shutting down"
    );
    shutdown.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(result) => flatten_server_result(result),
        Err(_) => {
            warn!("graceful shutdown timed out; dropping open connections");
            Ok(())
        }
    }
}

fn flatten_server_result(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}
