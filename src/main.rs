//! numara_bot - hands out sequential ticket number ranges in a group chat.

mod config;
mod consts;
mod handlers;
mod state;
mod utils;
mod web;

use std::sync::Arc;

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;

use crate::config::{Config, Delivery};
use crate::handlers::Command;
use crate::state::Allocator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("numara bot starting…");

    let cfg = Config::from_env();
    let bot = Bot::from_env();
    let alloc = Arc::new(Allocator::open(&cfg.state_file));

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handlers::on_command),
        )
        .branch(Update::filter_callback_query().endpoint(handlers::on_callback));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![alloc])
        .enable_ctrlc_handler()
        .build();

    let addr = cfg.listen_addr();
    match cfg.delivery {
        Delivery::Polling => {
            // A leftover webhook registration blocks getUpdates.
            bot.delete_webhook().await.ok();
            web::spawn(addr);
            log::info!("delivery: long polling, health probes on port {}", cfg.port);
            dispatcher.dispatch().await;
        }
        Delivery::Webhook { url } => {
            let (listener, stop_flag, webhook_router) =
                webhooks::axum_to_router(bot, webhooks::Options::new(addr, url.clone()))
                    .await
                    .expect("failed to register the Telegram webhook");

            let app = webhook_router.merge(web::routes());
            tokio::spawn(async move {
                axum::Server::bind(&addr)
                    .serve(app.into_make_service())
                    .with_graceful_shutdown(stop_flag)
                    .await
                    .expect("webhook server failed");
            });

            log::info!("delivery: webhook at {url}, serving port {}", cfg.port);
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("error from the webhook listener"),
                )
                .await;
        }
    }
}
