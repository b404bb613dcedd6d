use anyhow::Context;
use bookshelf_app::{modules, Store};
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        db = %settings.database.name,
        "bookshelf bootstrap starting"
    );

    let store = Store::open(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store.repository.clone(), &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookshelf bootstrap complete");

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    store.close().await;

    served
}
