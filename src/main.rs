//! Goalwatch
//!
//! Telegram alert bot for likely under-2.5-goal football fixtures.

use chrono::{Timelike, Utc};
use clap::{Parser, Subcommand};
use goalwatch::{
    client::ApiFootballClient,
    config::Config,
    ledger::AlertLedger,
    notify::Notifier,
    server,
    sim::MonteCarlo,
    strategy::StrategyRunner,
    telegram::{BotCommand, TelegramBot},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "goalwatch")]
#[command(about = "Telegram alert bot for low-scoring football fixtures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: scheduler, Telegram commands, health endpoint
    Run,
    /// Run a single prediction cycle and exit
    Predict,
    /// Test Telegram notification
    TestNotify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run => run_bot(config).await,
        Commands::Predict => predict_once(config).await,
        Commands::TestNotify => test_notify(config).await,
    }
}

fn build_notifier(config: &Config) -> Notifier {
    if let Some(tg) = &config.telegram {
        Notifier::new(tg.bot_token.clone(), tg.chat_id.clone())
    } else {
        tracing::warn!("Telegram not configured, notifications disabled");
        Notifier::disabled()
    }
}

fn build_runner(config: &Config) -> anyhow::Result<StrategyRunner> {
    let client = Arc::new(ApiFootballClient::new(&config.api_football)?);
    let ledger = AlertLedger::load(&config.ledger.path);
    let sim = MonteCarlo::new(config.strategy.trials, config.strategy.goal_line);
    Ok(StrategyRunner::new(
        &config.strategy,
        &config.schedule,
        client,
        ledger,
        sim,
    ))
}

async fn run_bot(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting goalwatch");

    let notifier = build_notifier(&config);
    let runner = Arc::new(build_runner(&config)?);

    if let Err(e) = notifier
        .startup(config.schedule.hour_start, config.schedule.hour_end)
        .await
    {
        tracing::warn!("Failed to send startup notification: {}", e);
    }

    // Health endpoint for the hosting platform
    let port = config.server.port;
    tokio::spawn(async move {
        if let Err(e) = server::start_health_server(port).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Telegram command listener
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<BotCommand>(100);
    if let Some(tg) = &config.telegram {
        let bot = Arc::new(TelegramBot::new(
            tg.bot_token.clone(),
            tg.chat_id.clone(),
            cmd_tx,
            (config.schedule.hour_start, config.schedule.hour_end),
        ));
        tokio::spawn(async move {
            bot.start_polling().await;
        });
    }

    let offset = config.schedule.offset();
    let mut ticker = tokio::time::interval(Duration::from_secs(
        u64::from(config.schedule.interval_minutes) * 60,
    ));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let local = Utc::now().with_timezone(&offset);
                if config.schedule.contains_hour(local.hour()) {
                    run_and_deliver(&runner, &notifier).await;
                } else {
                    tracing::debug!(
                        "Outside active hours at {}, skipping scheduled cycle",
                        local.format("%H:%M")
                    );
                }
            }
            Some(cmd) = cmd_rx.recv() => match cmd {
                BotCommand::Predict => run_and_deliver(&runner, &notifier).await,
                BotCommand::Status => {
                    let text = format!(
                        "📒 <b>Status</b>\n\n\
                        Fixtures alerted so far: {}\n\
                        Active hours: {}:00-{}:00",
                        runner.ledger_len().await,
                        config.schedule.hour_start,
                        config.schedule.hour_end,
                    );
                    if let Err(e) = notifier.send(&text).await {
                        tracing::warn!("Failed to send status: {}", e);
                    }
                }
            },
        }
    }
}

async fn run_and_deliver(runner: &StrategyRunner, notifier: &Notifier) {
    let alerts = runner.run_cycle().await;
    tracing::info!("Cycle complete: {} alert(s)", alerts.len());

    for alert in &alerts {
        // Delivery failure does not unmark the fixture: a lost message is
        // preferred over re-alerting on every future cycle.
        if let Err(e) = notifier.alert(alert).await {
            tracing::error!(
                "Failed to deliver alert for fixture {}: {}",
                alert.fixture_id,
                e
            );
        }
    }
}

async fn predict_once(config: Config) -> anyhow::Result<()> {
    let notifier = build_notifier(&config);
    let runner = build_runner(&config)?;

    let alerts = runner.run_cycle().await;
    println!("{} alert(s) produced", alerts.len());

    for alert in &alerts {
        println!("---\n{}", alert.text);
        if let Err(e) = notifier.alert(alert).await {
            tracing::error!(
                "Failed to deliver alert for fixture {}: {}",
                alert.fixture_id,
                e
            );
        }
    }

    Ok(())
}

async fn test_notify(config: Config) -> anyhow::Result<()> {
    let tg = config
        .telegram
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Telegram not configured in config.toml"))?;

    let notifier = Notifier::new(tg.bot_token.clone(), tg.chat_id.clone());

    notifier
        .send("🧪 <b>Test Notification</b>\n\nIf you see this, Telegram integration is working!")
        .await?;

    println!("✅ Test notification sent!");
    Ok(())
}
