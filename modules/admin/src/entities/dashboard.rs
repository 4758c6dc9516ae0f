use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use ordering::entities::order::OrderStatus;
use rust_decimal::Decimal;
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct CountOrdersByStatus;

impl Processor<CountOrdersByStatus> for DatabaseProcessor {
    type Output = Vec<(OrderStatus, i64)>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CountOrdersByStatus", err)]
    async fn process(
        &self,
        _input: CountOrdersByStatus,
    ) -> Result<Vec<(OrderStatus, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (OrderStatus, i64)>(
            r#"SELECT order_status, COUNT(*) FROM "shop"."customer_order" GROUP BY order_status"#,
        )
        .fetch_all(self.db())
        .await
    }
}

/// Paid revenue only; pending cash orders are not money yet.
#[derive(Debug, Clone, Copy)]
pub struct PaidRevenue;

impl Processor<PaidRevenue> for DatabaseProcessor {
    type Output = Decimal;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:PaidRevenue", err)]
    async fn process(&self, _input: PaidRevenue) -> Result<Decimal, sqlx::Error> {
        let (revenue,): (Decimal,) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(total), 0) FROM "shop"."customer_order"
               WHERE payment_status = 'paid'"#,
        )
        .fetch_one(self.db())
        .await?;
        Ok(revenue)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountCustomers;

impl Processor<CountCustomers> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CountCustomers", err)]
    async fn process(&self, _input: CountCustomers) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM "auth"."user_account" WHERE role = 'customer'"#,
        )
        .fetch_one(self.db())
        .await?;
        Ok(count)
    }
}
