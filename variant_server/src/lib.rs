//! # Variant sync server
//! This crate hosts the HTTP front end of the variant engine. It is responsible for:
//! * Receiving variant configurations from the merchant's editor, storing them and publishing the variants.
//! * Listening for Shopify `products/update` webhooks and repricing the synthesized variants when the price of the
//!   product they were derived from changes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/variants/{product_id}`: Read (`GET`), save (`POST`) or clear (`DELETE`) a product's variant configuration.
//! * `/api/status`: The most recent price update records.
//! * `/shopify/webhook/products_update`: The HMAC-verified product update webhook.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
