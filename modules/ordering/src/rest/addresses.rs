use crate::entities::address::{
    Address, AddressType, CreateAddress, DeleteAddress, ListAddressesByUser, UpdateAddress,
};
use crate::rest::{MessageResponse, OrderingRest};
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use uuid::Uuid;

async fn list(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<Address>>, Error> {
    let addresses = state
        .db
        .process(ListAddressesByUser { user_id: user.id() })
        .await?;
    Ok(Json(addresses))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAddressRequest {
    full_name: String,
    mobile_number: String,
    house_no: String,
    street: String,
    city: String,
    state: String,
    pincode: String,
    address_type: AddressType,
}

async fn create(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreateAddressRequest>,
) -> Result<Json<Address>, Error> {
    if body.full_name.trim().is_empty() || body.pincode.trim().is_empty() {
        return Err(Error::validation("Name and pincode are required"));
    }
    let address = state
        .db
        .process(CreateAddress {
            user_id: user.id(),
            full_name: body.full_name,
            mobile_number: body.mobile_number,
            house_no: body.house_no,
            street: body.street,
            city: body.city,
            state: body.state,
            pincode: body.pincode,
            address_type: body.address_type,
        })
        .await?;
    Ok(Json(address))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAddressRequest {
    full_name: Option<String>,
    mobile_number: Option<String>,
    house_no: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    address_type: Option<AddressType>,
}

async fn update(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAddressRequest>,
) -> Result<Json<Address>, Error> {
    state
        .db
        .process(UpdateAddress {
            id,
            user_id: user.id(),
            full_name: body.full_name,
            mobile_number: body.mobile_number,
            house_no: body.house_no,
            street: body.street,
            city: body.city,
            state: body.state,
            pincode: body.pincode,
            address_type: body.address_type,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Address"))
}

async fn remove(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, Error> {
    if state
        .db
        .process(DeleteAddress {
            id,
            user_id: user.id(),
        })
        .await?
    {
        Ok(Json(MessageResponse {
            message: "Address deleted",
        }))
    } else {
        Err(Error::NotFound("Address"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .with_state(state)
}
