use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use time::PrimitiveDateTime;
use tracing::instrument;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "shop.discount_type", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum DiscountType {
    Percentage,
    Flat,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// Caps a percentage discount; ignored for flat discounts.
    pub max_discount: Option<Decimal>,
    pub min_order_amount: Decimal,
    pub valid_from: PrimitiveDateTime,
    pub valid_until: PrimitiveDateTime,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

impl Coupon {
    /// Active and inside the validity window.
    pub fn is_live_at(&self, now: PrimitiveDateTime) -> bool {
        self.is_active && self.valid_from <= now && now <= self.valid_until
    }

    pub fn usage_remaining(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.used_count < limit,
            None => true,
        }
    }

    /// Discount granted against `subtotal`, zero when the minimum order
    /// amount is not met. Percentage discounts are capped by `max_discount`.
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal < self.min_order_amount {
            return Decimal::ZERO;
        }
        match self.discount_type {
            DiscountType::Percentage => {
                let discount = (subtotal * self.discount_value / Decimal::ONE_HUNDRED).round_dp(2);
                match self.max_discount {
                    Some(cap) => discount.min(cap),
                    None => discount,
                }
            }
            DiscountType::Flat => self.discount_value,
        }
    }
}

const COUPON_COLUMNS: &str = "id, code, description, discount_type, discount_value, \
     max_discount, min_order_amount, valid_from, valid_until, usage_limit, used_count, \
     is_active, created_at, updated_at";

/// Plain code lookup. Redemption checks (`is_live_at`, usage, minimum)
/// stay with the caller because they produce different rejection messages.
#[derive(Debug, Clone)]
pub struct FindCouponByCode {
    pub code: String,
}

impl Processor<FindCouponByCode> for DatabaseProcessor {
    type Output = Option<Coupon>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindCouponByCode", err)]
    async fn process(&self, input: FindCouponByCode) -> Result<Option<Coupon>, sqlx::Error> {
        sqlx::query_as::<_, Coupon>(&format!(
            r#"SELECT {COUPON_COLUMNS} FROM "shop"."coupon" WHERE code = $1"#
        ))
        .bind(input.code.to_uppercase())
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListCoupons;

impl Processor<ListCoupons> for DatabaseProcessor {
    type Output = Vec<Coupon>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListCoupons", err)]
    async fn process(&self, _input: ListCoupons) -> Result<Vec<Coupon>, sqlx::Error> {
        sqlx::query_as::<_, Coupon>(&format!(
            r#"SELECT {COUPON_COLUMNS} FROM "shop"."coupon" ORDER BY created_at DESC"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateCoupon {
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_discount: Option<Decimal>,
    pub min_order_amount: Decimal,
    pub valid_from: PrimitiveDateTime,
    pub valid_until: PrimitiveDateTime,
    pub usage_limit: Option<i32>,
}

impl Processor<CreateCoupon> for DatabaseProcessor {
    type Output = Coupon;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateCoupon", err)]
    async fn process(&self, input: CreateCoupon) -> Result<Coupon, sqlx::Error> {
        sqlx::query_as::<_, Coupon>(&format!(
            r#"INSERT INTO "shop"."coupon"
                   (code, description, discount_type, discount_value, max_discount,
                    min_order_amount, valid_from, valid_until, usage_limit)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {COUPON_COLUMNS}"#
        ))
        .bind(input.code.to_uppercase())
        .bind(input.description)
        .bind(input.discount_type)
        .bind(input.discount_value)
        .bind(input.max_discount)
        .bind(input.min_order_amount)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.usage_limit)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCoupon {
    pub id: i32,
    pub description: Option<String>,
    pub discount_value: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub min_order_amount: Option<Decimal>,
    pub valid_from: Option<PrimitiveDateTime>,
    pub valid_until: Option<PrimitiveDateTime>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
}

impl Processor<UpdateCoupon> for DatabaseProcessor {
    type Output = Option<Coupon>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateCoupon", err)]
    async fn process(&self, input: UpdateCoupon) -> Result<Option<Coupon>, sqlx::Error> {
        sqlx::query_as::<_, Coupon>(&format!(
            r#"UPDATE "shop"."coupon"
               SET description = COALESCE($2, description),
                   discount_value = COALESCE($3, discount_value),
                   max_discount = COALESCE($4, max_discount),
                   min_order_amount = COALESCE($5, min_order_amount),
                   valid_from = COALESCE($6, valid_from),
                   valid_until = COALESCE($7, valid_until),
                   usage_limit = COALESCE($8, usage_limit),
                   is_active = COALESCE($9, is_active),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {COUPON_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.description)
        .bind(input.discount_value)
        .bind(input.max_discount)
        .bind(input.min_order_amount)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.usage_limit)
        .bind(input.is_active)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCoupon {
    pub id: i32,
}

impl Processor<DeleteCoupon> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeleteCoupon", err)]
    async fn process(&self, input: DeleteCoupon) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."coupon" WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IncrementCouponUsage {
    pub id: i32,
}

impl Processor<IncrementCouponUsage> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:IncrementCouponUsage", err)]
    async fn process(&self, input: IncrementCouponUsage) -> Result<(), sqlx::Error> {
        sqlx::query(r#"UPDATE "shop"."coupon" SET used_count = used_count + 1 WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(discount_type: DiscountType, value: &str) -> Coupon {
        let start = time::macros::datetime!(2026-01-01 00:00);
        Coupon {
            id: 1,
            code: "TREAT10".into(),
            description: String::new(),
            discount_type,
            discount_value: value.parse().unwrap(),
            max_discount: None,
            min_order_amount: Decimal::ZERO,
            valid_from: start,
            valid_until: start + time::Duration::days(30),
            usage_limit: None,
            used_count: 0,
            is_active: true,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn percentage_discount_is_proportional() {
        let c = coupon(DiscountType::Percentage, "10");
        assert_eq!(c.discount_for("500".parse().unwrap()), "50".parse().unwrap());
    }

    #[test]
    fn percentage_discount_respects_cap() {
        let mut c = coupon(DiscountType::Percentage, "10");
        c.max_discount = Some("30".parse().unwrap());
        assert_eq!(c.discount_for("500".parse().unwrap()), "30".parse().unwrap());
    }

    #[test]
    fn flat_discount_ignores_subtotal_scale() {
        let c = coupon(DiscountType::Flat, "75");
        assert_eq!(
            c.discount_for("1000".parse().unwrap()),
            "75".parse().unwrap()
        );
    }

    #[test]
    fn below_minimum_order_amount_grants_nothing() {
        let mut c = coupon(DiscountType::Percentage, "10");
        c.min_order_amount = "300".parse().unwrap();
        assert_eq!(c.discount_for("299".parse().unwrap()), Decimal::ZERO);
        assert_eq!(
            c.discount_for("300".parse().unwrap()),
            "30".parse().unwrap()
        );
    }

    #[test]
    fn validity_window_is_inclusive() {
        let c = coupon(DiscountType::Percentage, "10");
        assert!(c.is_live_at(c.valid_from));
        assert!(c.is_live_at(c.valid_until));
        assert!(!c.is_live_at(c.valid_from - time::Duration::minutes(1)));
        assert!(!c.is_live_at(c.valid_until + time::Duration::minutes(1)));
    }

    #[test]
    fn inactive_coupon_is_never_live() {
        let mut c = coupon(DiscountType::Flat, "75");
        c.is_active = false;
        assert!(!c.is_live_at(c.valid_from + time::Duration::days(1)));
    }

    #[test]
    fn usage_limit_exhausts() {
        let mut c = coupon(DiscountType::Flat, "75");
        assert!(c.usage_remaining());
        c.usage_limit = Some(5);
        c.used_count = 4;
        assert!(c.usage_remaining());
        c.used_count = 5;
        assert!(!c.usage_remaining());
    }
}
