use crate::config::OrderingConfig;
use crate::entities::address::FindAddressById;
use crate::entities::coupon::{Coupon, FindCouponByCode, IncrementCouponUsage};
use crate::entities::delivery_pincode::FindActivePincode;
use crate::entities::order::{
    CustomerOrder, InsertOrder, OrderItem, PaymentMethod, PaymentStatus,
};
use crate::entities::product::{FindProductById, IncrementOrderCount};
use crate::services::pricing::{self, CartLine};
use auth::entities::user_account::{ListActiveAdmins, UserAccount};
use framework::Error;
use framework::mailer::{Mailer, OrderMail};
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct CheckoutService {
    pub db: DatabaseProcessor,
    pub mailer: Mailer,
    pub config: Arc<OrderingConfig>,
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user: UserAccount,
    pub address_id: Uuid,
    pub items: Vec<CartLine>,
    pub coupon_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub delivery_date: time::Date,
    pub delivery_time: Option<String>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
}

impl Processor<PlaceOrder> for CheckoutService {
    type Output = CustomerOrder;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(&self, input: PlaceOrder) -> Result<CustomerOrder, Error> {
        if input.items.is_empty() {
            return Err(Error::validation("Order must contain at least one item"));
        }

        let address = self
            .db
            .process(FindAddressById {
                id: input.address_id,
            })
            .await?
            .filter(|address| address.user_id == input.user.id)
            .ok_or(Error::NotFound("Address"))?;

        if self
            .db
            .process(FindActivePincode {
                pincode: address.pincode.clone(),
            })
            .await?
            .is_none()
        {
            return Err(Error::validation("Delivery not available for this pincode"));
        }

        // Snapshot and price each line against the live catalog.
        let mut items: Vec<OrderItem> = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let product = self
                .db
                .process(FindProductById {
                    id: line.product_id,
                })
                .await?
                .ok_or_else(|| {
                    Error::validation(format!("Product {} not available", line.display_name()))
                })?;
            if product.is_pre_order {
                if let Some(earliest) = product.pre_order_delivery_date {
                    if input.delivery_date < earliest {
                        return Err(Error::validation(format!(
                            "{} is a pre-order item, earliest delivery is {earliest}",
                            product.name
                        )));
                    }
                }
            }
            let item = pricing::resolve_line(&product, line)
                .map_err(|rejection| Error::Validation(rejection.message()))?;
            items.push(item);
        }

        let coupon = self.find_applicable_coupon(input.coupon_code.as_deref()).await?;
        let quote = pricing::compute_quote(&items, coupon.as_ref(), &self.config);

        // Gateway-paid orders arrive already captured, cash settles later.
        let payment_status = match input.payment_method {
            PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
            PaymentMethod::Online => PaymentStatus::Paid,
        };

        let order = self
            .db
            .process(InsertOrder {
                user_id: input.user.id,
                address_id: address.id,
                items: items.clone(),
                subtotal: quote.subtotal,
                discount: quote.discount,
                coupon_code: input.coupon_code.unwrap_or_default().to_uppercase(),
                delivery_charge: quote.delivery_charge,
                total: quote.total,
                commission: quote.commission,
                commission_percentage: quote.commission_percentage,
                payment_status,
                payment_method: input.payment_method,
                gateway_order_id: input.gateway_order_id.unwrap_or_default(),
                gateway_payment_id: input.gateway_payment_id.unwrap_or_default(),
                delivery_date: input.delivery_date,
                delivery_time: input.delivery_time,
            })
            .await?;

        for item in &items {
            self.db
                .process(IncrementOrderCount {
                    id: item.product_id,
                    by: item.quantity,
                })
                .await?;
        }
        if let Some(coupon) = &coupon {
            self.db.process(IncrementCouponUsage { id: coupon.id }).await?;
        }

        self.send_confirmations(&input.user, &order).await;

        Ok(order)
    }
}

impl CheckoutService {
    /// An unknown or out-of-window code is ignored, matching the storefront
    /// preview; only an exhausted usage limit rejects the order outright.
    async fn find_applicable_coupon(&self, code: Option<&str>) -> Result<Option<Coupon>, Error> {
        let Some(code) = code.filter(|code| !code.is_empty()) else {
            return Ok(None);
        };
        let Some(coupon) = self
            .db
            .process(FindCouponByCode {
                code: code.to_owned(),
            })
            .await?
        else {
            return Ok(None);
        };
        if !coupon.is_live_at(framework::now_time()) {
            return Ok(None);
        }
        if !coupon.usage_remaining() {
            return Err(Error::validation("Coupon usage limit reached"));
        }
        Ok(Some(coupon))
    }

    /// Best-effort: a mail failure never fails the order.
    async fn send_confirmations(&self, user: &UserAccount, order: &CustomerOrder) {
        let mail = OrderMail {
            order_id: order.id,
            total: order.total,
            delivery_date: order.delivery_date,
            delivery_time: order.delivery_time.clone(),
        };
        if let Err(e) = self.mailer.send_order_confirmation(&user.email, &mail).await {
            tracing::warn!("Order confirmation email to customer failed: {e}");
        }
        match self.db.process(ListActiveAdmins).await {
            Ok(admins) => {
                for admin in admins {
                    if let Err(e) = self
                        .mailer
                        .send_order_confirmation(&admin.email, &mail)
                        .await
                    {
                        tracing::warn!("Order confirmation email to admin failed: {e}");
                    }
                }
            }
            Err(e) => tracing::warn!("Could not list admin recipients: {e}"),
        }
    }
}
