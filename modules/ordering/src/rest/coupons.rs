use crate::entities::coupon::{
    Coupon, CreateCoupon, DeleteCoupon, DiscountType, FindCouponByCode, ListCoupons, UpdateCoupon,
};
use crate::rest::{MessageResponse, OrderingRest};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use rust_decimal::Decimal;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyCouponRequest {
    code: String,
    subtotal: Decimal,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyCouponResponse {
    valid: bool,
    code: String,
    discount: Decimal,
}

/// Pre-checkout preview. Uses the same rules as checkout, but reports the
/// rejection reason instead of silently pricing without the coupon.
async fn verify(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<VerifyCouponRequest>,
) -> Result<Json<VerifyCouponResponse>, Error> {
    user.require(Role::Customer)?;
    let coupon = state
        .db
        .process(FindCouponByCode {
            code: body.code.clone(),
        })
        .await?
        .filter(|coupon| coupon.is_live_at(framework::now_time()))
        .ok_or_else(|| Error::validation("Invalid coupon code"))?;
    if !coupon.usage_remaining() {
        return Err(Error::validation("Coupon usage limit reached"));
    }
    if body.subtotal < coupon.min_order_amount {
        return Err(Error::Validation(format!(
            "Minimum order amount for this coupon is {}",
            coupon.min_order_amount
        )));
    }
    let discount = coupon.discount_for(body.subtotal);
    Ok(Json(VerifyCouponResponse {
        valid: true,
        code: coupon.code,
        discount,
    }))
}

async fn list(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<Coupon>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListCoupons).await?))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCouponRequest {
    code: String,
    #[serde(default)]
    description: String,
    discount_type: DiscountType,
    discount_value: Decimal,
    #[serde(default)]
    max_discount: Option<Decimal>,
    #[serde(default)]
    min_order_amount: Decimal,
    valid_from: time::Date,
    valid_until: time::Date,
    #[serde(default)]
    usage_limit: Option<i32>,
}

async fn create(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreateCouponRequest>,
) -> Result<Json<Coupon>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.code.trim().is_empty() {
        return Err(Error::validation("Coupon code is required"));
    }
    if body.discount_value <= Decimal::ZERO {
        return Err(Error::validation("Discount value must be positive"));
    }
    if body.valid_until < body.valid_from {
        return Err(Error::validation("Validity window is inverted"));
    }
    let coupon = state
        .db
        .process(CreateCoupon {
            code: body.code.trim().to_owned(),
            description: body.description,
            discount_type: body.discount_type,
            discount_value: body.discount_value,
            max_discount: body.max_discount,
            min_order_amount: body.min_order_amount,
            // inclusive window: whole first day through end of last day
            valid_from: body.valid_from.midnight(),
            valid_until: body.valid_until.with_time(time::macros::time!(23:59:59)),
            usage_limit: body.usage_limit,
        })
        .await?;
    Ok(Json(coupon))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCouponRequest {
    description: Option<String>,
    discount_value: Option<Decimal>,
    max_discount: Option<Decimal>,
    min_order_amount: Option<Decimal>,
    valid_from: Option<time::Date>,
    valid_until: Option<time::Date>,
    usage_limit: Option<i32>,
    is_active: Option<bool>,
}

async fn update(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCouponRequest>,
) -> Result<Json<Coupon>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateCoupon {
            id,
            description: body.description,
            discount_value: body.discount_value,
            max_discount: body.max_discount,
            min_order_amount: body.min_order_amount,
            valid_from: body.valid_from.map(|date| date.midnight()),
            valid_until: body
                .valid_until
                .map(|date| date.with_time(time::macros::time!(23:59:59))),
            usage_limit: body.usage_limit,
            is_active: body.is_active,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Coupon"))
}

async fn remove(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    if state.db.process(DeleteCoupon { id }).await? {
        Ok(Json(MessageResponse {
            message: "Coupon deleted",
        }))
    } else {
        Err(Error::NotFound("Coupon"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/verify", post(verify))
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .with_state(state)
}
