use framework::Error;
use hmac::{Hmac, Mac};
use kanau::processor::Processor;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sha2::Sha256;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub currency: String,
}

/// Client for the hosted payment gateway. Order capture happens on the
/// gateway's own checkout page; this service only opens gateway orders and
/// checks callback signatures.
#[derive(Clone)]
pub struct PaymentGatewayService {
    pub client: reqwest::Client,
    pub config: Arc<GatewayConfig>,
}

#[derive(Debug, Clone)]
pub struct CreateGatewayOrder {
    pub amount: Decimal,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, serde::Serialize)]
struct GatewayOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
}

impl Processor<CreateGatewayOrder> for PaymentGatewayService {
    type Output = GatewayOrder;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(&self, input: CreateGatewayOrder) -> Result<GatewayOrder, Error> {
        if input.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be positive"));
        }
        // The gateway counts in minor units.
        let amount = (input.amount * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .ok_or_else(|| Error::validation("Amount out of range"))?;

        let order = self
            .client
            .post(format!("{}/orders", self.config.base_url))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&GatewayOrderRequest {
                amount,
                currency: &self.config.currency,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<GatewayOrder>()
            .await?;
        Ok(order)
    }
}

#[derive(Debug, Clone)]
pub struct VerifyPaymentSignature {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

impl Processor<VerifyPaymentSignature> for PaymentGatewayService {
    type Output = bool;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(&self, input: VerifyPaymentSignature) -> Result<bool, Error> {
        Ok(signature_matches(
            self.config.key_secret.as_bytes(),
            &input.gateway_order_id,
            &input.gateway_payment_id,
            &input.signature,
        ))
    }
}

/// The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 and sends
/// the hex digest back through the client. `verify_slice` compares in
/// constant time.
pub fn signature_matches(
    secret: &[u8],
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature_hex: &str,
) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret) else {
        return false;
    };
    mac.update(format!("{gateway_order_id}|{gateway_payment_id}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], payload: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_a_correctly_signed_callback() {
        let signature = sign(b"secret", "order_123|pay_456");
        assert!(signature_matches(b"secret", "order_123", "pay_456", &signature));
    }

    #[test]
    fn rejects_a_tampered_payment_id() {
        let signature = sign(b"secret", "order_123|pay_456");
        assert!(!signature_matches(
            b"secret",
            "order_123",
            "pay_999",
            &signature
        ));
    }

    #[test]
    fn rejects_a_signature_from_another_secret() {
        let signature = sign(b"other", "order_123|pay_456");
        assert!(!signature_matches(
            b"secret",
            "order_123",
            "pay_456",
            &signature
        ));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(!signature_matches(
            b"secret",
            "order_123",
            "pay_456",
            "not-hex-at-all"
        ));
    }
}
