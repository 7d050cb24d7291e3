use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymtrack::auth::{JwksVerifier, TokenVerifier};
use gymtrack::config::Config;
use gymtrack::handlers::{exercises, login, users, workouts};
use gymtrack::store::Datastore;
use gymtrack::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymtrack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url)?;

    // Run migrations
    migrations::run_migrations(&pool)?;

    // Create the store and the identity gate
    let store = Datastore::new(pool);
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwksVerifier::new(&config.auth));

    // Create handler states
    let exercises_state = exercises::ExercisesState {
        store: store.clone(),
        base_url: config.base_url.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        store: store.clone(),
        base_url: config.base_url.clone(),
    };
    let users_state = users::UsersState {
        store: store.clone(),
    };
    let login_state = login::LoginState {
        http: reqwest::Client::new(),
        auth: config.auth.clone(),
    };

    // Build router
    let app = routes::create_router(
        exercises_state,
        workouts_state,
        users_state,
        login_state,
        verifier,
    );

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
