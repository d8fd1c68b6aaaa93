use std::sync::{Arc, Mutex};

use clap::Parser;

use mucbot::application::errors::BotError;
use mucbot::application::messaging::Dispatcher;
use mucbot::application::services::{direct_registry, group_registry, HandlerContext};
use mucbot::application::voting::VoteSession;
use mucbot::infrastructure::adapters::console::ConsoleAdapter;
use mucbot::infrastructure::config::Config;
use mucbot::infrastructure::fetchers::Fetchers;
use mucbot::infrastructure::session::BotSession;
use mucbot::infrastructure::templates::TemplateStore;

#[derive(Parser)]
#[command(name = "mucbot")]
#[command(about = "A multi-user chat command bot", long_about = None)]
struct Cli {
    /// The JID of the bot
    jid: String,

    /// The password for the given JID
    password: String,

    /// The API URL of the URL shortener
    surl_api: String,

    /// The signature for the URL shortener
    surl_sig: String,

    /// The room to join
    room: String,

    /// The nick name that should be used
    nick: String,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new(
        cli.jid,
        cli.password,
        cli.surl_api,
        cli.surl_sig,
        cli.room,
        cli.nick,
    );

    if let Err(e) = run(config) {
        tracing::error!("fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting mucbot as {}", config.jid);

    // Collaborators are built before the runtime comes up; the blocking
    // HTTP client must not be created inside an async context.
    let fetchers = Arc::new(
        Fetchers::new(&config.surl_api, &config.surl_sig)
            .map_err(|e| BotError::Network(e.to_string()))?,
    );
    let templates = Arc::new(
        TemplateStore::load(&config.slaps_file, &config.taunts_file)
            .map_err(|e| BotError::Config(format!("failed to load templates: {}", e)))?,
    );
    let votes = Arc::new(Mutex::new(VoteSession::new()));

    let ctx = HandlerContext {
        fetchers,
        templates,
        votes,
    };
    let dispatcher = Arc::new(Dispatcher::new(direct_registry(&ctx), group_registry(&ctx)));

    let transport = Arc::new(ConsoleAdapter::new(&config.room));
    let session = BotSession::new(transport, dispatcher, config);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Config(format!("failed to start runtime: {}", e)))?;
    runtime.block_on(session.run())
}
