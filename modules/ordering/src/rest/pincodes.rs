use crate::entities::delivery_pincode::{
    CreatePincode, DeletePincode, DeliveryPincode, FindActivePincode, ListPincodes, UpdatePincode,
};
use crate::rest::{MessageResponse, OrderingRest};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;

#[derive(Debug, serde::Deserialize)]
struct CheckPincodeRequest {
    pincode: String,
}

#[derive(Debug, serde::Serialize)]
struct CheckPincodeResponse {
    available: bool,
    area: Option<String>,
}

/// Public storefront gate, checked before the cart page offers checkout.
async fn check(
    State(state): State<OrderingRest>,
    Json(body): Json<CheckPincodeRequest>,
) -> Result<Json<CheckPincodeResponse>, Error> {
    if body.pincode.trim().is_empty() {
        return Err(Error::validation("Pincode is required"));
    }
    let found = state
        .db
        .process(FindActivePincode {
            pincode: body.pincode,
        })
        .await?;
    Ok(Json(CheckPincodeResponse {
        available: found.is_some(),
        area: found.map(|p| p.area),
    }))
}

async fn list(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<DeliveryPincode>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListPincodes).await?))
}

#[derive(Debug, serde::Deserialize)]
struct CreatePincodeRequest {
    pincode: String,
    #[serde(default)]
    area: String,
}

async fn create(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreatePincodeRequest>,
) -> Result<Json<DeliveryPincode>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.pincode.trim().is_empty() {
        return Err(Error::validation("Pincode is required"));
    }
    let pincode = state
        .db
        .process(CreatePincode {
            pincode: body.pincode,
            area: body.area,
        })
        .await?;
    Ok(Json(pincode))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePincodeRequest {
    area: Option<String>,
    is_active: Option<bool>,
}

async fn update(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdatePincodeRequest>,
) -> Result<Json<DeliveryPincode>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdatePincode {
            id,
            area: body.area,
            is_active: body.is_active,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Delivery pincode"))
}

async fn remove(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    if state.db.process(DeletePincode { id }).await? {
        Ok(Json(MessageResponse {
            message: "Delivery pincode deleted",
        }))
    } else {
        Err(Error::NotFound("Delivery pincode"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/check", post(check))
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .with_state(state)
}
