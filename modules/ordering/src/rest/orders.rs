use crate::entities::address::{Address, FindAddressesByIds};
use crate::entities::order::{
    CountOrdersForAdmin, CustomerOrder, FindOrderById, ListActiveOrdersByDeliveryBoy,
    ListOrdersByUser, ListOrdersForAdmin, OrderStatus, PaymentMethod, UpdateOrderStatus,
};
use crate::rest::OrderingRest;
use crate::services::assignment::{
    AdvanceDeliveryStatus, AdvanceDeliveryStatusResult, AssignDeliveryStaff,
    AssignDeliveryStaffResult,
};
use crate::services::checkout::PlaceOrder;
use crate::services::pricing::CartLine;
use auth::entities::user_account::{FindUserAccountsByIds, Role, UserAccount};
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use framework::Error;
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use std::collections::HashMap;
use uuid::Uuid;

/// Delivery staff fields exposed alongside an order.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StaffSummary {
    id: Uuid,
    name: Option<String>,
    mobile_number: Option<String>,
    vehicle_type: Option<String>,
    vehicle_number: Option<String>,
}

impl From<UserAccount> for StaffSummary {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            mobile_number: user.mobile_number,
            vehicle_type: user.vehicle_type,
            vehicle_number: user.vehicle_number,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerSummary {
    id: Uuid,
    name: Option<String>,
    email: String,
    mobile_number: Option<String>,
}

impl From<UserAccount> for CustomerSummary {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile_number: user.mobile_number,
        }
    }
}

/// An order with its referenced records attached. Related rows are fetched
/// by id, mirroring how the storefront reads the document store.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderView {
    #[serde(flatten)]
    order: CustomerOrder,
    address: Option<Address>,
    delivery_boy: Option<StaffSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<CustomerSummary>,
}

async fn attach_related(
    db: &DatabaseProcessor,
    orders: Vec<CustomerOrder>,
    include_customer: bool,
) -> Result<Vec<OrderView>, Error> {
    let address_ids: Vec<Uuid> = orders.iter().map(|order| order.address_id).collect();
    let mut user_ids: Vec<Uuid> = orders
        .iter()
        .filter_map(|order| order.delivery_boy_id)
        .collect();
    if include_customer {
        user_ids.extend(orders.iter().map(|order| order.user_id));
    }

    let addresses: HashMap<Uuid, Address> = db
        .process(FindAddressesByIds { ids: address_ids })
        .await?
        .into_iter()
        .map(|address| (address.id, address))
        .collect();
    let users: HashMap<Uuid, UserAccount> = db
        .process(FindUserAccountsByIds { ids: user_ids })
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let address = addresses.get(&order.address_id).cloned();
            let delivery_boy = order
                .delivery_boy_id
                .and_then(|id| users.get(&id).cloned())
                .map(StaffSummary::from);
            let user = include_customer
                .then(|| users.get(&order.user_id).cloned().map(CustomerSummary::from))
                .flatten();
            OrderView {
                order,
                address,
                delivery_boy,
                user,
            }
        })
        .collect())
}

async fn attach_one(
    db: &DatabaseProcessor,
    order: CustomerOrder,
    include_customer: bool,
) -> Result<OrderView, Error> {
    let mut views = attach_related(db, vec![order], include_customer).await?;
    views.pop().ok_or(Error::NotFound("Order"))
}

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    items: Vec<CartLine>,
    address_id: Uuid,
    #[serde(default)]
    coupon_code: Option<String>,
    payment_method: PaymentMethod,
    delivery_date: Option<String>,
    #[serde(default)]
    delivery_time: Option<String>,
    #[serde(default)]
    gateway_order_id: Option<String>,
    #[serde(default)]
    gateway_payment_id: Option<String>,
}

async fn create_order(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CustomerOrder>), Error> {
    user.require(Role::Customer)?;
    let delivery_date = body
        .delivery_date
        .as_deref()
        .and_then(|raw| time::Date::parse(raw, DATE_FORMAT).ok())
        .ok_or_else(|| Error::validation("Invalid or missing deliveryDate"))?;
    let order = state
        .checkout
        .process(PlaceOrder {
            user: user.0,
            address_id: body.address_id,
            items: body.items,
            coupon_code: body.coupon_code,
            payment_method: body.payment_method,
            delivery_date,
            delivery_time: body.delivery_time,
            gateway_order_id: body.gateway_order_id,
            gateway_payment_id: body.gateway_payment_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn my_orders(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<OrderView>>, Error> {
    user.require(Role::Customer)?;
    let orders = state
        .db
        .process(ListOrdersByUser { user_id: user.id() })
        .await?;
    Ok(Json(attach_related(&state.db, orders, false).await?))
}

async fn get_order(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderView>, Error> {
    let order = state
        .db
        .process(FindOrderById { id })
        .await?
        .ok_or(Error::NotFound("Order"))?;

    match user.role() {
        Role::Customer if order.user_id != user.id() => {
            return Err(Error::Forbidden("Access denied"));
        }
        Role::DeliveryBoy if order.delivery_boy_id != Some(user.id()) => {
            return Err(Error::Forbidden("Access denied"));
        }
        _ => {}
    }

    Ok(Json(attach_one(&state.db, order, false).await?))
}

#[derive(Debug, serde::Deserialize)]
struct AdminOrdersQuery {
    status: Option<OrderStatus>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminOrdersResponse {
    orders: Vec<OrderView>,
    total_pages: i64,
    current_page: i64,
    total: i64,
}

async fn admin_all(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Query(query): Query<AdminOrdersQuery>,
) -> Result<Json<AdminOrdersResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let orders = state
        .db
        .process(ListOrdersForAdmin {
            status: query.status,
            limit,
            offset: (page - 1) * limit,
        })
        .await?;
    let total = state
        .db
        .process(CountOrdersForAdmin {
            status: query.status,
        })
        .await?;

    Ok(Json(AdminOrdersResponse {
        orders: attach_related(&state.db, orders, true).await?,
        total_pages: (total as u64).div_ceil(limit as u64) as i64,
        current_page: page,
        total,
    }))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusRequest {
    order_status: OrderStatus,
}

async fn update_status(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<CustomerOrder>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateOrderStatus {
            id,
            status: body.order_status,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Order"))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignDeliveryRequest {
    /// Empty or missing clears the assignment.
    #[serde(default)]
    delivery_boy_id: Option<String>,
}

async fn assign_delivery(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignDeliveryRequest>,
) -> Result<Json<OrderView>, Error> {
    user.require(Role::SuperAdmin)?;
    let delivery_boy_id = match body.delivery_boy_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| Error::validation("Invalid or inactive delivery boy"))?,
        ),
    };
    match state
        .assignment
        .process(AssignDeliveryStaff {
            order_id: id,
            delivery_boy_id,
        })
        .await?
    {
        AssignDeliveryStaffResult::Updated(order) => {
            Ok(Json(attach_one(&state.db, *order, false).await?))
        }
        AssignDeliveryStaffResult::OrderNotFound => Err(Error::NotFound("Order")),
        AssignDeliveryStaffResult::InvalidDeliveryBoy => {
            Err(Error::validation("Invalid or inactive delivery boy"))
        }
    }
}

async fn delivery_my_orders(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<OrderView>>, Error> {
    user.require(Role::DeliveryBoy)?;
    let orders = state
        .db
        .process(ListActiveOrdersByDeliveryBoy {
            delivery_boy_id: user.id(),
        })
        .await?;
    Ok(Json(attach_related(&state.db, orders, true).await?))
}

async fn delivery_status(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<CustomerOrder>, Error> {
    user.require(Role::DeliveryBoy)?;
    match state
        .assignment
        .process(AdvanceDeliveryStatus {
            order_id: id,
            delivery_boy_id: user.id(),
            status: body.order_status,
        })
        .await?
    {
        AdvanceDeliveryStatusResult::Updated(order) => Ok(Json(*order)),
        AdvanceDeliveryStatusResult::OrderNotFound => Err(Error::NotFound("Order")),
        AdvanceDeliveryStatusResult::NotAssigned => Err(Error::Forbidden("Access denied")),
        AdvanceDeliveryStatusResult::StatusNotAllowed => {
            Err(Error::validation("Invalid status update"))
        }
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/my-orders", get(my_orders))
        .route("/admin/all", get(admin_all))
        .route("/delivery/my-orders", get(delivery_my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_status))
        .route("/{id}/assign-delivery", put(assign_delivery))
        .route("/{id}/delivery-status", put(delivery_status))
        .with_state(state)
}
