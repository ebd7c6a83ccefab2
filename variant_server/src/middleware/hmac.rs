//! Webhook signature verification.
//!
//! Shopify signs every webhook body with the app's shared secret and sends the base64-encoded HMAC-SHA256 in the
//! `X-Shopify-Hmac-SHA256` header. Wrap the webhook scope with [`WebhookSignature`] to reject requests whose
//! signature is missing or does not match the body. The body is handed on to the route unchanged.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use vsync_common::Secret;

use crate::helpers::verify_hmac;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignatureCheck {
    Valid,
    Missing,
    Mismatch,
}

fn check_signature(secret: &str, body: &[u8], signature: Option<&[u8]>) -> SignatureCheck {
    match signature {
        None => SignatureCheck::Missing,
        Some(sig) if verify_hmac(secret, body, sig) => SignatureCheck::Valid,
        Some(_) => SignatureCheck::Mismatch,
    }
}

#[derive(Clone)]
struct SignatureSettings {
    header: String,
    secret: Secret<String>,
    enabled: bool,
}

/// Middleware factory for the Shopify webhook scope. With `enabled` set to false every request passes unchecked.
pub struct WebhookSignature {
    settings: SignatureSettings,
}

impl WebhookSignature {
    pub fn new(header: &str, secret: Secret<String>, enabled: bool) -> Self {
        Self { settings: SignatureSettings { header: header.into(), secret, enabled } }
    }
}

impl<S, B> Transform<S, ServiceRequest> for WebhookSignature
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = WebhookSignatureService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WebhookSignatureService { settings: Rc::new(self.settings.clone()), service: Rc::new(service) }))
    }
}

pub struct WebhookSignatureService<S> {
    settings: Rc<SignatureSettings>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for WebhookSignatureService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let settings = Rc::clone(&self.settings);
        Box::pin(async move {
            if !settings.enabled {
                trace!("🔐️ Webhook signature checks are disabled. Letting {} through.", req.path());
                return service.call(req).await;
            }
            let body = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Could not read the webhook body. {e}");
                ErrorBadRequest("Could not read request body.")
            })?;
            let signature = req.headers().get(&settings.header).map(|v| v.as_bytes());
            match check_signature(settings.secret.reveal(), body.as_ref(), signature) {
                SignatureCheck::Valid => {
                    trace!("🔐️ Webhook signature for {} ✅️", req.path());
                    req.set_payload(bytes_to_payload(body));
                    service.call(req).await
                },
                SignatureCheck::Missing => {
                    warn!("🔐️ Webhook call to {} has no {} header. Denying access.", req.path(), settings.header);
                    Err(ErrorForbidden("No HMAC signature found."))
                },
                SignatureCheck::Mismatch => {
                    warn!("🔐️ Invalid webhook signature on {}. Denying access.", req.path());
                    Err(ErrorForbidden("Invalid HMAC signature."))
                },
            }
        })
    }
}

// The body extractor consumes the payload, so the route gets a fresh one built from the same bytes
fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
