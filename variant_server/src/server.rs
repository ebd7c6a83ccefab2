use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use shopify_tools::ShopifyApi;
use variant_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    traits::VariantStore,
    PriceUpdateApi,
    ProductLocks,
    SqliteDatabase,
    VariantSyncApi,
};

use crate::{
    config::{ServerConfig, SHOPIFY_HMAC_HEADER},
    errors::ServerError,
    integrations::shopify::ShopifyPlatform,
    middleware::WebhookSignature,
    routes::{
        health,
        ClearVariantsRoute,
        FetchVariantsRoute,
        ProductsUpdateRoute,
        SaveVariantsRoute,
        UpdateStatusesRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if let Some(credentials) = &config.shop_access {
        db.save_access_credential(credentials).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let handlers = create_logging_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await?;
    Ok(())
}

/// Event hooks that write every sync stage and metafield change to the log.
pub fn create_logging_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_sync_stage(|ev| {
        Box::pin(async move {
            info!("📬️ [{}] product {} is now {}", ev.shop, ev.product_id, ev.stage);
        })
    });
    hooks.on_metafield(|ev| {
        Box::pin(async move {
            debug!("📬️ Metafield {} ({}) on product {} was {}", ev.metafield_id, ev.key, ev.product_id, ev.action);
        })
    });
    EventHandlers::new(EVENT_BUFFER_SIZE, hooks)
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let api = ShopifyApi::new(config.shopify_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let platform = ShopifyPlatform::new(api);
    // Shared by every worker, so that no two workers touch the same product at once
    let locks = ProductLocks::new();
    let hmac_secret = config.hmac_secret();
    let hmac_checks = config.hmac_checks;
    let srv = HttpServer::new(move || {
        let sync_api = VariantSyncApi::new(db.clone(), platform.clone(), locks.clone(), producers.clone());
        let price_api = PriceUpdateApi::new(db.clone(), platform.clone(), locks.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vsync::access_log"))
            .app_data(web::Data::new(sync_api))
            .app_data(web::Data::new(price_api));
        let api_scope = web::scope("/api")
            .service(SaveVariantsRoute::<SqliteDatabase, ShopifyPlatform>::new())
            .service(FetchVariantsRoute::<SqliteDatabase, ShopifyPlatform>::new())
            .service(ClearVariantsRoute::<SqliteDatabase, ShopifyPlatform>::new())
            .service(UpdateStatusesRoute::<SqliteDatabase, ShopifyPlatform>::new());
        let shopify_scope = web::scope("/shopify")
            .wrap(WebhookSignature::new(SHOPIFY_HMAC_HEADER, hmac_secret.clone(), hmac_checks))
            .service(ProductsUpdateRoute::<SqliteDatabase, ShopifyPlatform>::new());
        app.service(health).service(api_scope).service(shopify_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
