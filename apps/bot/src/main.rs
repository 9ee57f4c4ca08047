use std::sync::Arc;

use anyhow::Result;
use bot::{
    Data,
    command::{coffeeprice, help, start, unsubscribe},
    config::Config,
    daily,
    notify::DirectMessage,
};
use chrono_tz::Europe::Rome;
use coffee::{PriceClient, SubscriberStore};
use log::info;
use poise::{Framework, FrameworkOptions};
use serenity::all::{ClientBuilder, GatewayIntents};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    // a present-but-unreadable subscriber file must stop the process here,
    // not degrade into an empty subscriber list
    let subscribers = Arc::new(
        SubscriberStore::from_env()
            .await
            .expect("load subscriber store failed"),
    );
    let price_client = Arc::new(PriceClient::from_env().expect("init price client failed"));

    let intents = GatewayIntents::non_privileged();
    let commands = vec![start(), coffeeprice(), unsubscribe(), help()];

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands,
            ..Default::default()
        })
        .setup({
            let subscribers = Arc::clone(&subscribers);
            let price_client = Arc::clone(&price_client);

            move |ctx, ready, framework| {
                let subscribers = Arc::clone(&subscribers);
                let price_client = Arc::clone(&price_client);

                Box::pin(async move {
                    info!(
                        "{} [{}] connected successfully!",
                        ready.user.name, ready.user.id
                    );

                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                    Ok(Data {
                        subscribers,
                        price_client,
                    })
                })
            }
        })
        .build();

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("Err creating client");

    let notifier = Arc::new(DirectMessage::new(client.http.clone()));

    let sched = JobScheduler::new()
        .await
        .expect("failed to create job scheduler");

    let price_client_job = Arc::clone(&price_client);
    let subscribers_job = Arc::clone(&subscribers);

    sched
        .add(Job::new_async_tz(
            "0 0 20 * * Mon-Fri",
            Rome,
            move |_uuid, _l| {
                let notifier = Arc::clone(&notifier);
                let price_client = Arc::clone(&price_client_job);
                let subscribers = Arc::clone(&subscribers_job);

                Box::pin(async move {
                    if let Err(e) = daily::run_daily(&*notifier, &price_client, &subscribers).await
                    {
                        log::error!("run_daily failed: {:?}", e);
                    }
                })
            },
        )?)
        .await?;

    sched.shutdown_on_ctrl_c();
    sched.start().await?;

    tokio::spawn(async move {
        if let Err(why) = client.start().await {
            log::error!("Client error: {why:?}");
        }
    });

    shutdown_signal().await;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
