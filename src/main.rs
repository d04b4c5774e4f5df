mod channels;
mod coach;
mod config;
mod core;
mod dispatch;
mod engine;
mod mood;
mod providers;
mod session;
mod store;
mod traits;
mod types;


use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Flags that must work without a config file.
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("Telegram life-coach bot.");
        println!();
        println!("USAGE: {} [config.toml]", env!("CARGO_PKG_NAME"));
        println!();
        println!("OPTIONS:");
        println!("  -V, --version    Print version");
        println!("  -h, --help       Print this help");
        return Ok(());
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = args.get(1).map(String::as_str).unwrap_or("config.toml");
    let config = config::AppConfig::load(config_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(core::run(config))
}
