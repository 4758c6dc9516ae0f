use crate::entities::dashboard::{CountCustomers, CountOrdersByStatus, PaidRevenue};
use crate::entities::staff::{CreateDeliveryStaff, ListDeliveryStaff, UpdateDeliveryStaff};
use crate::rest::AdminRest;
use auth::entities::user_account::{Role, UserAccount};
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use ordering::entities::order::OrderStatus;
use ordering::entities::product::{ListBestsellers, Product};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderCounts {
    total: i64,
    pending: i64,
    preparing: i64,
    assigned: i64,
    picked_up: i64,
    out_for_delivery: i64,
    delivered: i64,
    cancelled: i64,
}

impl OrderCounts {
    fn tally(rows: Vec<(OrderStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, count) in rows {
            counts.total += count;
            match status {
                OrderStatus::Pending => counts.pending = count,
                OrderStatus::Preparing => counts.preparing = count,
                OrderStatus::Assigned => counts.assigned = count,
                OrderStatus::PickedUp => counts.picked_up = count,
                OrderStatus::OutForDelivery => counts.out_for_delivery = count,
                OrderStatus::Delivered => counts.delivered = count,
                OrderStatus::Cancelled => counts.cancelled = count,
            }
        }
        counts
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    orders: OrderCounts,
    revenue: Decimal,
    customers: i64,
    bestsellers: Vec<Product>,
}

async fn dashboard(
    State(state): State<AdminRest>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    let orders = OrderCounts::tally(state.db.process(CountOrdersByStatus).await?);
    let revenue = state.db.process(PaidRevenue).await?;
    let customers = state.db.process(CountCustomers).await?;
    let bestsellers = state.db.process(ListBestsellers { limit: 5 }).await?;
    Ok(Json(DashboardResponse {
        orders,
        revenue,
        customers,
        bestsellers,
    }))
}

async fn list_delivery_boys(
    State(state): State<AdminRest>,
    user: CurrentUser,
) -> Result<Json<Vec<UserAccount>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListDeliveryStaff).await?))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeliveryBoyRequest {
    email: String,
    name: String,
    #[serde(default)]
    mobile_number: Option<String>,
    #[serde(default)]
    vehicle_type: Option<String>,
    #[serde(default)]
    vehicle_number: Option<String>,
}

async fn create_delivery_boy(
    State(state): State<AdminRest>,
    user: CurrentUser,
    Json(body): Json<CreateDeliveryBoyRequest>,
) -> Result<Json<UserAccount>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.email.parse::<lettre::Address>().is_err() {
        return Err(Error::validation("Valid email is required"));
    }
    if body.name.trim().is_empty() {
        return Err(Error::validation("Name is required"));
    }
    let staff = state
        .db
        .process(CreateDeliveryStaff {
            email: body.email.to_lowercase(),
            name: body.name,
            mobile_number: body.mobile_number,
            vehicle_type: body.vehicle_type,
            vehicle_number: body.vehicle_number,
        })
        .await?;
    Ok(Json(staff))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDeliveryBoyRequest {
    name: Option<String>,
    mobile_number: Option<String>,
    vehicle_type: Option<String>,
    vehicle_number: Option<String>,
    is_active: Option<bool>,
}

async fn update_delivery_boy(
    State(state): State<AdminRest>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDeliveryBoyRequest>,
) -> Result<Json<UserAccount>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateDeliveryStaff {
            id,
            name: body.name,
            mobile_number: body.mobile_number,
            vehicle_type: body.vehicle_type,
            vehicle_number: body.vehicle_number,
            is_active: body.is_active,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Delivery boy"))
}

pub fn router(state: AdminRest) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/delivery-boys", get(list_delivery_boys).post(create_delivery_boy))
        .route("/delivery-boys/{id}", put(update_delivery_boy))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_sums_all_statuses() {
        let counts = OrderCounts::tally(vec![
            (OrderStatus::Pending, 3),
            (OrderStatus::Delivered, 10),
            (OrderStatus::Cancelled, 1),
        ]);
        assert_eq!(counts.total, 14);
        assert_eq!(counts.pending, 3);
        assert_eq!(counts.delivered, 10);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.preparing, 0);
    }
}
