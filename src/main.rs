use mimalloc::MiMalloc;
use shiftdesk::auth::{AuthLimiter, hash_password};
use shiftdesk::clock::Clock;
use shiftdesk::config::Config;
use shiftdesk::dispatch::{self, DispatchArgs, Dispatcher};
use shiftdesk::server::{DeskState, desk_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    cfg.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let timezone = cfg.timezone()?;
    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        timezone = %timezone.map_or("<host local>".to_string(), |tz| tz.name().to_string()),
        public_url = %cfg.basic.public_url,
        smtp_host = %cfg.smtp.host.as_deref().unwrap_or("<disabled>"),
        default_recipients = cfg.smtp.default_recipients.len(),
        dispatch_enabled = cfg.dispatch.enabled,
    );

    let db = shiftdesk::db::spawn(&cfg.basic.database_url).await?;

    if let Some(password) = cfg.basic.admin_password.clone() {
        let hash = hash_password(password).await?;
        if db
            .ensure_admin(cfg.basic.admin_username.clone(), hash)
            .await?
        {
            info!(username = %cfg.basic.admin_username, "bootstrap manager account created");
        }
    }

    let clock = Clock::system(timezone);
    let mailer = shiftdesk::mailer::from_config(&cfg.smtp)?;
    let dispatcher = dispatch::spawn(DispatchArgs {
        dispatcher: Dispatcher::new(
            db.clone(),
            mailer.clone(),
            cfg.smtp.default_recipients.clone(),
            clock,
        ),
        schedule: cfg.dispatch.enabled,
    })
    .await?;

    if cfg.basic.insecure_cookie {
        warn!("insecure_cookie is set; the session cookie is sent over plain HTTP");
    }
    let state = DeskState {
        db,
        mailer,
        dispatcher,
        clock,
        limiter: AuthLimiter::default(),
        cookie_key: DeskState::cookie_key(cfg.basic.session_secret.as_deref()),
        secure_cookie: !cfg.basic.insecure_cookie,
        public_url: Arc::new(cfg.basic.public_url.clone()),
    };
    let app = desk_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
