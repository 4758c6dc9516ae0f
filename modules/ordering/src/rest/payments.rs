use crate::rest::OrderingRest;
use crate::services::gateway::{CreateGatewayOrder, GatewayOrder, VerifyPaymentSignature};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use rust_decimal::Decimal;

#[derive(Debug, serde::Deserialize)]
struct CreatePaymentOrderRequest {
    amount: Decimal,
}

async fn create_order(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreatePaymentOrderRequest>,
) -> Result<Json<GatewayOrder>, Error> {
    user.require(Role::Customer)?;
    let order = state
        .gateway
        .process(CreateGatewayOrder {
            amount: body.amount,
        })
        .await?;
    Ok(Json(order))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPaymentRequest {
    gateway_order_id: String,
    gateway_payment_id: String,
    signature: String,
}

#[derive(Debug, serde::Serialize)]
struct VerifyPaymentResponse {
    valid: bool,
    message: &'static str,
}

async fn verify(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, Error> {
    user.require(Role::Customer)?;
    let valid = state
        .gateway
        .process(VerifyPaymentSignature {
            gateway_order_id: body.gateway_order_id,
            gateway_payment_id: body.gateway_payment_id,
            signature: body.signature,
        })
        .await?;
    if valid {
        Ok(Json(VerifyPaymentResponse {
            valid: true,
            message: "Payment verified",
        }))
    } else {
        Err(Error::validation("Invalid payment signature"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify", post(verify))
        .with_state(state)
}
