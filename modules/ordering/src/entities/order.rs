use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use sqlx::types::Json;
use time::PrimitiveDateTime;
use tracing::instrument;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "shop.order_status", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Assigned,
    PickedUp,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses a delivery boy may set on his own assignments. Everything
    /// else stays an admin action.
    pub fn settable_by_delivery_boy(self) -> bool {
        matches!(self, Self::PickedUp | Self::OutForDelivery | Self::Delivered)
    }

    /// An order in one of these states shows up in the delivery boy's work
    /// queue.
    pub fn is_active_delivery(self) -> bool {
        matches!(self, Self::Assigned | Self::PickedUp | Self::OutForDelivery)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "shop.payment_status", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "shop.payment_method", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Online,
    CashOnDelivery,
}

/// Line item copied from the product at order time, so later catalog edits
/// never alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i32,
    pub name: String,
    pub weight: String,
    pub is_eggless: bool,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub delivery_boy_id: Option<Uuid>,
    pub delivery_assigned_at: Option<PrimitiveDateTime>,
    pub items: Json<Vec<OrderItem>>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub coupon_code: String,
    pub delivery_charge: Decimal,
    pub total: Decimal,
    pub commission: Decimal,
    pub commission_percentage: Decimal,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub delivery_date: time::Date,
    pub delivery_time: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

const ORDER_COLUMNS: &str = "id, user_id, address_id, delivery_boy_id, delivery_assigned_at, \
     items, subtotal, discount, coupon_code, delivery_charge, total, commission, \
     commission_percentage, order_status, payment_status, payment_method, \
     gateway_order_id, gateway_payment_id, delivery_date, delivery_time, \
     created_at, updated_at";

#[derive(Debug, Clone)]
pub struct InsertOrder {
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub coupon_code: String,
    pub delivery_charge: Decimal,
    pub total: Decimal,
    pub commission: Decimal,
    pub commission_percentage: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub delivery_date: time::Date,
    pub delivery_time: Option<String>,
}

impl Processor<InsertOrder> for DatabaseProcessor {
    type Output = CustomerOrder;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:InsertOrder", err)]
    async fn process(&self, input: InsertOrder) -> Result<CustomerOrder, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"INSERT INTO "shop"."customer_order"
                   (user_id, address_id, items, subtotal, discount, coupon_code,
                    delivery_charge, total, commission, commission_percentage,
                    payment_status, payment_method, gateway_order_id,
                    gateway_payment_id, delivery_date, delivery_time)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(input.user_id)
        .bind(input.address_id)
        .bind(Json(input.items))
        .bind(input.subtotal)
        .bind(input.discount)
        .bind(input.coupon_code)
        .bind(input.delivery_charge)
        .bind(input.total)
        .bind(input.commission)
        .bind(input.commission_percentage)
        .bind(input.payment_status)
        .bind(input.payment_method)
        .bind(input.gateway_order_id)
        .bind(input.gateway_payment_id)
        .bind(input.delivery_date)
        .bind(input.delivery_time)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FindOrderById {
    pub id: Uuid,
}

impl Processor<FindOrderById> for DatabaseProcessor {
    type Output = Option<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindOrderById", err)]
    async fn process(&self, input: FindOrderById) -> Result<Option<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "shop"."customer_order" WHERE id = $1"#
        ))
        .bind(input.id)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListOrdersByUser {
    pub user_id: Uuid,
}

impl Processor<ListOrdersByUser> for DatabaseProcessor {
    type Output = Vec<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListOrdersByUser", err)]
    async fn process(&self, input: ListOrdersByUser) -> Result<Vec<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "shop"."customer_order"
               WHERE user_id = $1 ORDER BY created_at DESC"#
        ))
        .bind(input.user_id)
        .fetch_all(self.db())
        .await
    }
}

/// Paginated back-office listing.
#[derive(Debug, Clone, Copy)]
pub struct ListOrdersForAdmin {
    pub status: Option<OrderStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListOrdersForAdmin> for DatabaseProcessor {
    type Output = Vec<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListOrdersForAdmin", err)]
    async fn process(&self, input: ListOrdersForAdmin) -> Result<Vec<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "shop"."customer_order"
               WHERE $1::shop.order_status IS NULL OR order_status = $1
               ORDER BY created_at DESC
               LIMIT $2 OFFSET $3"#
        ))
        .bind(input.status)
        .bind(input.limit)
        .bind(input.offset)
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountOrdersForAdmin {
    pub status: Option<OrderStatus>,
}

impl Processor<CountOrdersForAdmin> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CountOrdersForAdmin", err)]
    async fn process(&self, input: CountOrdersForAdmin) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM "shop"."customer_order"
               WHERE $1::shop.order_status IS NULL OR order_status = $1"#,
        )
        .bind(input.status)
        .fetch_one(self.db())
        .await?;
        Ok(count)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListActiveOrdersByDeliveryBoy {
    pub delivery_boy_id: Uuid,
}

impl Processor<ListActiveOrdersByDeliveryBoy> for DatabaseProcessor {
    type Output = Vec<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListActiveOrdersByDeliveryBoy", err)]
    async fn process(
        &self,
        input: ListActiveOrdersByDeliveryBoy,
    ) -> Result<Vec<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "shop"."customer_order"
               WHERE delivery_boy_id = $1
                 AND order_status IN ('assigned', 'picked_up', 'out_for_delivery')
               ORDER BY delivery_assigned_at DESC"#
        ))
        .bind(input.delivery_boy_id)
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateOrderStatus {
    pub id: Uuid,
    pub status: OrderStatus,
}

impl Processor<UpdateOrderStatus> for DatabaseProcessor {
    type Output = Option<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateOrderStatus", err)]
    async fn process(&self, input: UpdateOrderStatus) -> Result<Option<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"UPDATE "shop"."customer_order"
               SET order_status = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.status)
        .fetch_optional(self.db())
        .await
    }
}

/// Single write covering both assignment and clearing; the surrounding
/// service decides the status transition.
#[derive(Debug, Clone, Copy)]
pub struct SetDeliveryAssignment {
    pub order_id: Uuid,
    pub delivery_boy_id: Option<Uuid>,
    pub assigned_at: Option<PrimitiveDateTime>,
    pub order_status: OrderStatus,
}

impl Processor<SetDeliveryAssignment> for DatabaseProcessor {
    type Output = Option<CustomerOrder>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:SetDeliveryAssignment", err)]
    async fn process(
        &self,
        input: SetDeliveryAssignment,
    ) -> Result<Option<CustomerOrder>, sqlx::Error> {
        sqlx::query_as::<_, CustomerOrder>(&format!(
            r#"UPDATE "shop"."customer_order"
               SET delivery_boy_id = $2,
                   delivery_assigned_at = $3,
                   order_status = $4,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(input.order_id)
        .bind(input.delivery_boy_id)
        .bind(input.assigned_at)
        .bind(input.order_status)
        .fetch_optional(self.db())
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_boy_settable_statuses() {
        assert!(OrderStatus::PickedUp.settable_by_delivery_boy());
        assert!(OrderStatus::OutForDelivery.settable_by_delivery_boy());
        assert!(OrderStatus::Delivered.settable_by_delivery_boy());
        assert!(!OrderStatus::Pending.settable_by_delivery_boy());
        assert!(!OrderStatus::Assigned.settable_by_delivery_boy());
        assert!(!OrderStatus::Cancelled.settable_by_delivery_boy());
    }

    #[test]
    fn active_delivery_window() {
        assert!(OrderStatus::Assigned.is_active_delivery());
        assert!(OrderStatus::PickedUp.is_active_delivery());
        assert!(OrderStatus::OutForDelivery.is_active_delivery());
        assert!(!OrderStatus::Delivered.is_active_delivery());
        assert!(!OrderStatus::Preparing.is_active_delivery());
    }

    #[test]
    fn item_snapshot_serializes_camel_case() {
        let item = OrderItem {
            product_id: 7,
            name: "Chocolate Truffle".into(),
            weight: "1 kg".into(),
            is_eggless: true,
            quantity: 2,
            price: "549".parse().unwrap(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 7);
        assert_eq!(json["isEggless"], true);
    }
}
