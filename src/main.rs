use std::{process, sync::Arc};

use blogstats::{
    application::{
        blog_articles::BlogArticleListService,
        error::AppError,
        messages::{ContentLanguageMessages, Localizer, MessageKey},
        opinions::OpinionCountService,
        profile::ProfileArticlesService,
        repos::{UsersRepo, bounded},
        save_events::{SaveEventAdapter, SaveHook},
        stats::StatsStore,
    },
    cache::{CacheConfig, KeyValueCache, MemoryCache},
    config,
    domain::{
        category::CategoryTemplate,
        entities::{Actor, ContentSaved},
        types::{Namespace, PageId, UserId},
    },
    infra::{db::PostgresRepositories, error::InfraError, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
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

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        config::Command::Migrate(_) => run_migrate(&settings).await,
        config::Command::Recompute(args) => run_recompute(&settings, args).await,
        config::Command::Recent(args) => run_recent(&settings, args).await,
        config::Command::Profile(args) => run_profile(&settings, args.user).await,
    }
}

async fn run_migrate(settings: &config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(settings).await?;
    PostgresRepositories::run_migrations(repositories.pool())
        .await
        .map_err(|err| AppError::from(InfraError::database("migrate", err)))?;
    info!("Migrations applied");
    Ok(())
}

async fn run_recompute(
    settings: &config::Settings,
    args: config::RecomputeArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(settings).await?;
    let app = build_application_context(repositories.clone(), settings)?;

    let author = match args.actor.as_deref() {
        None => Actor::Anonymous,
        Some(name) => {
            let user = bounded(
                "find_user_by_name",
                settings.database.query_timeout,
                repositories.find_by_name(name),
            )
            .await?
            .ok_or_else(|| AppError::validation(format!("unknown actor `{name}`")))?;
            Actor::Registered(user)
        }
    };

    let event = ContentSaved {
        page_id: PageId::assigned(args.page_id),
        author,
        title: args.title,
        namespace: Namespace(args.namespace),
    };

    let outcome = app.adapter.dispatch(SaveHook::AfterSave(event)).await?;
    print_json(&outcome)
}

async fn run_recent(settings: &config::Settings, args: config::UserArgs) -> Result<(), AppError> {
    let repositories = init_repositories(settings).await?;
    let app = build_application_context(repositories, settings)?;

    let articles = app
        .articles
        .recent_articles(UserId(args.user_id), &args.user_name)
        .await?;
    print_json(&articles)
}

async fn run_profile(settings: &config::Settings, args: config::UserArgs) -> Result<(), AppError> {
    let repositories = init_repositories(settings).await?;
    let app = build_application_context(repositories, settings)?;

    let profile = app
        .profile
        .load(UserId(args.user_id), &args.user_name)
        .await?;
    print_json(&profile)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{rendered}");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database("connect", err)))?;

    let repositories = PostgresRepositories::new(pool);
    repositories
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database("health_check", err)))?;

    Ok(Arc::new(repositories))
}

struct ApplicationContext {
    articles: Arc<BlogArticleListService>,
    profile: ProfileArticlesService,
    adapter: SaveEventAdapter,
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<ApplicationContext, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let cache: Arc<dyn KeyValueCache> = Arc::new(MemoryCache::new(&cache_config));
    let messages: Arc<dyn Localizer> =
        Arc::new(ContentLanguageMessages::from(&settings.messages));
    let template = CategoryTemplate::parse(&messages.text(MessageKey::BlogByUserCategory))?;
    let query_timeout = settings.database.query_timeout;

    let articles = Arc::new(BlogArticleListService::new(
        repositories.clone(),
        cache.clone(),
        template.clone(),
        cache_config.clone(),
        query_timeout,
    ));
    let stats = Arc::new(StatsStore::new(
        repositories.clone(),
        cache,
        cache_config,
        query_timeout,
    ));
    let opinions = Arc::new(OpinionCountService::new(
        repositories.clone(),
        repositories,
        stats.clone(),
        template.clone(),
        query_timeout,
    ));
    let profile = ProfileArticlesService::new(
        articles.clone(),
        stats,
        messages,
        template,
        settings.profile.show_articles,
    );
    let adapter = SaveEventAdapter::new(opinions);

    Ok(ApplicationContext {
        articles,
        profile,
        adapter,
    })
}
