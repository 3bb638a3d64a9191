use lectern_auth::JwtAuthenticator;
use lectern_config::{CorsConfig, JwtConfig, PermissionsConfig, ServerConfig};
use lectern_db::{Store, init_db_pool, run_migrations};
use lectern_rbac::{AccessGate, PermissionTable, TableSource};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Store,
    pub gate: AccessGate,
    pub authenticator: JwtAuthenticator,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        store: Store,
        table: PermissionTable,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            store,
            gate: AccessGate::new(table),
            authenticator: JwtAuthenticator::new(jwt_config.clone()),
            jwt_config,
            cors_config,
        }
    }
}

/// Loads the permission table once for the lifetime of the process.
///
/// A malformed table file is fatal; a missing one falls back to the built-in
/// table.
pub fn load_permission_table(config: &PermissionsConfig) -> anyhow::Result<PermissionTable> {
    let (table, source) = PermissionTable::load_or_builtin(&config.path)?;
    match source {
        TableSource::File(path) => {
            info!(path = %path.display(), "Permission table loaded")
        }
        TableSource::Builtin => warn!(
            path = %config.path.display(),
            "Permission table file not found, using built-in table"
        ),
    }
    Ok(table)
}

pub async fn init_app_state(
    server_config: &ServerConfig,
    permissions_config: &PermissionsConfig,
) -> anyhow::Result<AppState> {
    let table = load_permission_table(permissions_config)?;

    let store = match &server_config.database_url {
        Some(url) => {
            let pool = init_db_pool(url).await?;
            run_migrations(&pool).await?;
            Store::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Store::memory()
        }
    };
    info!(backend = store.backend(), "Store initialized");

    Ok(AppState::new(
        store,
        table,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
