use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use super::*;

#[derive(Parser)]
#[command(name = "particle-devstore")]
#[command(about = "In-memory particle backend (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:54321")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Public API key every request must carry as `apikey`
    #[arg(long, default_value = "dev-anon-key")]
    anon_key: String,

    /// Seeded account email
    #[arg(long, default_value = "dev@particle.local")]
    email: String,

    /// Seeded account password
    #[arg(long, default_value = "dev-password")]
    password: String,

    /// One-time code accepted for every pending email sign-in
    #[arg(long, default_value = "123456")]
    otp_code: String,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PARTICLE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let state = Arc::new(seed_state(&args)?);

    let api = Router::new()
        .route("/auth/v1/token", post(auth::token))
        .route("/auth/v1/otp", post(auth::otp))
        .route("/auth/v1/verify", post(auth::verify))
        .route("/auth/v1/logout", post(auth::logout))
        .route("/auth/v1/user", get(auth::user))
        .route(
            "/rest/v1/:relation",
            get(rest::get_rows)
                .post(rest::post_rows)
                .patch(rest::patch_rows)
                .delete(rest::delete_rows_handler),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_apikey));

    // Reached by a browser, so no API key; uploads check it themselves.
    let public = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/v1/authorize", get(auth::authorize))
        .route(
            "/storage/v1/object/*path",
            get(objects::fetch_public).post(objects::upload),
        );

    let app = Router::new()
        .merge(public)
        .merge(api)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("particle-devstore listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn seed_state(args: &Args) -> Result<AppState> {
    let user = DevUser {
        id: new_uuid()?,
        email: args.email.trim().to_lowercase(),
        password_hash: Some(hash_secret(&args.password)),
    };
    let mut db = Db::seeded();
    db.add_profile(&user);

    let mut identity = Identity::default();
    let dev_user_id = user.id.clone();
    identity.users.insert(user.id.clone(), user);

    Ok(AppState {
        anon_key: args.anon_key.clone(),
        otp_code: args.otp_code.clone(),
        dev_user_id,
        db: RwLock::new(db),
        identity: RwLock::new(identity),
        objects: RwLock::new(HashMap::new()),
    })
}

async fn healthz() -> Response {
    Json(json!({ "ok": true })).into_response()
}

async fn require_apikey(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    if !has_apikey(&state, req.headers()) {
        return invalid_apikey();
    }
    next.run(req).await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
