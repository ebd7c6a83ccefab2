mod hmac;

pub use hmac::{WebhookSignature, WebhookSignatureService};
