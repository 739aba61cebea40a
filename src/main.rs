//! famstory - 家庭故事分享服务

use std::sync::Arc;

use famstory::application::MailerPort;
use famstory::config::{load_config, print_config, AppConfig, MailerKind};
use famstory::infrastructure::adapters::{HttpMailer, HttpMailerConfig, LogMailer};
use famstory::infrastructure::http::{AppState, HttpServer, ServerConfig};
use famstory::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteFamilyRepository,
    SqliteInvitationRepository, SqliteStoryRepository, SqliteUserRepository,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},famstory={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn MailerPort>> {
    let mailer: Arc<dyn MailerPort> = match config.mailer.kind {
        MailerKind::Log => Arc::new(LogMailer::new(&config.mailer.from)),
        MailerKind::Http => {
            let api_url = config
                .mailer
                .api_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("mailer.api_url is not set"))?;
            let mut mailer_config = HttpMailerConfig::new(api_url)
                .with_from(&config.mailer.from)
                .with_timeout(config.mailer.timeout_secs);
            if let Some(api_key) = &config.mailer.api_key {
                mailer_config = mailer_config.with_api_key(api_key);
            }
            Arc::new(HttpMailer::new(mailer_config)?)
        }
    };
    Ok(mailer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("famstory - 家庭故事分享服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // Repository 适配器
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let story_repo = Arc::new(SqliteStoryRepository::new(pool.clone()));
    let family_repo = Arc::new(SqliteFamilyRepository::new(pool.clone()));
    let invitation_repo = Arc::new(SqliteInvitationRepository::new(pool));

    let mailer = build_mailer(&config)?;

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(user_repo, story_repo, family_repo, invitation_repo, mailer);
    let server = HttpServer::new(server_config, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
