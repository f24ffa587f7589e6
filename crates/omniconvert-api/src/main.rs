use omniconvert_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    omniconvert_api::telemetry::init_telemetry();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (spool, converters, routes)
    let (state, router) = omniconvert_api::setup::initialize_app(config.clone()).await?;

    // Retention cleanup for spooled outputs
    let _cleanup = omniconvert_api::cleanup::spawn_cleanup_task(state);

    // Start the server
    omniconvert_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
