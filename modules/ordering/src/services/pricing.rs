use crate::config::OrderingConfig;
use crate::entities::coupon::Coupon;
use crate::entities::order::OrderItem;
use crate::entities::product::Product;
use rust_decimal::Decimal;

/// A cart line as the storefront sends it.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i32,
    /// Display name, only used in rejection messages.
    #[serde(default)]
    pub name: Option<String>,
    pub weight: String,
    pub quantity: i32,
    /// Egg preference for products with an egg option; defaults to the
    /// product's own flag.
    #[serde(default)]
    pub is_eggless: Option<bool>,
}

impl CartLine {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("item")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    ProductUnavailable { name: String },
    InvalidWeight { name: String },
    InvalidQuantity { name: String },
}

impl LineRejection {
    pub fn message(&self) -> String {
        match self {
            Self::ProductUnavailable { name } => format!("Product {name} not available"),
            Self::InvalidWeight { name } => format!("Invalid weight option for {name}"),
            Self::InvalidQuantity { name } => format!("Invalid quantity for {name}"),
        }
    }
}

/// Turn one cart line into a priced snapshot against the current product row.
pub fn resolve_line(product: &Product, line: &CartLine) -> Result<OrderItem, LineRejection> {
    if !product.is_active {
        return Err(LineRejection::ProductUnavailable {
            name: product.name.clone(),
        });
    }
    if line.quantity < 1 {
        return Err(LineRejection::InvalidQuantity {
            name: product.name.clone(),
        });
    }
    let price = if product.weight_options.is_empty() {
        product.price
    } else {
        product
            .weight_options
            .iter()
            .find(|option| option.weight == line.weight)
            .map(|option| option.price)
            .ok_or_else(|| LineRejection::InvalidWeight {
                name: product.name.clone(),
            })?
    };
    Ok(OrderItem {
        product_id: product.id,
        name: product.name.clone(),
        weight: line.weight.clone(),
        is_eggless: line.is_eggless.unwrap_or(product.is_eggless),
        quantity: line.quantity,
        price,
    })
}

/// Priced cart. Every amount is fixed here once and stored on the order
/// verbatim; nothing downstream re-derives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub delivery_charge: Decimal,
    pub total: Decimal,
    pub commission: Decimal,
    pub commission_percentage: Decimal,
}

/// Single linear pass over resolved items. The coupon, when given, has
/// already passed the redemption checks; only the amount math happens here.
pub fn compute_quote(items: &[OrderItem], coupon: Option<&Coupon>, config: &OrderingConfig) -> Quote {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    let discount = coupon
        .map(|coupon| coupon.discount_for(subtotal))
        .unwrap_or(Decimal::ZERO);
    let total = subtotal - discount + config.delivery_charge;
    let commission = (total * config.commission_percentage / Decimal::ONE_HUNDRED).round_dp(2);
    Quote {
        subtotal,
        discount,
        delivery_charge: config.delivery_charge,
        total,
        commission,
        commission_percentage: config.commission_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::coupon::DiscountType;
    use crate::entities::product::WeightOption;
    use sqlx::types::Json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(weight_options: Vec<WeightOption>) -> Product {
        let now = time::macros::datetime!(2026-02-01 10:00);
        Product {
            id: 3,
            name: "Black Forest".into(),
            description: String::new(),
            category_id: 1,
            images: vec![],
            price: dec("450"),
            weight_options: Json(weight_options),
            is_eggless: false,
            has_egg_option: true,
            stock: 10,
            order_count: 0,
            is_active: true,
            is_pre_order: false,
            pre_order_available_date: None,
            pre_order_delivery_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(weight: &str, quantity: i32) -> CartLine {
        CartLine {
            product_id: 3,
            name: None,
            weight: weight.into(),
            quantity,
            is_eggless: None,
        }
    }

    fn item(price: &str, quantity: i32) -> OrderItem {
        OrderItem {
            product_id: 3,
            name: "Black Forest".into(),
            weight: "1 kg".into(),
            is_eggless: false,
            quantity,
            price: dec(price),
        }
    }

    fn coupon(discount_type: DiscountType, value: &str) -> Coupon {
        let start = time::macros::datetime!(2026-01-01 00:00);
        Coupon {
            id: 1,
            code: "TREAT10".into(),
            description: String::new(),
            discount_type,
            discount_value: dec(value),
            max_discount: None,
            min_order_amount: Decimal::ZERO,
            valid_from: start,
            valid_until: start + time::Duration::days(60),
            usage_limit: None,
            used_count: 0,
            is_active: true,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn resolves_price_from_weight_option() {
        let product = product(vec![
            WeightOption {
                weight: "½ kg".into(),
                price: dec("250"),
            },
            WeightOption {
                weight: "1 kg".into(),
                price: dec("450"),
            },
        ]);
        let item = resolve_line(&product, &line("½ kg", 2)).unwrap();
        assert_eq!(item.price, dec("250"));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.name, "Black Forest");
    }

    #[test]
    fn unknown_weight_option_is_rejected() {
        let product = product(vec![WeightOption {
            weight: "1 kg".into(),
            price: dec("450"),
        }]);
        assert_eq!(
            resolve_line(&product, &line("5 kg", 1)),
            Err(LineRejection::InvalidWeight {
                name: "Black Forest".into()
            })
        );
    }

    #[test]
    fn base_price_backs_products_without_weight_options() {
        let product = product(vec![]);
        let item = resolve_line(&product, &line("1 kg", 1)).unwrap();
        assert_eq!(item.price, dec("450"));
    }

    #[test]
    fn inactive_product_is_rejected() {
        let mut product = product(vec![]);
        product.is_active = false;
        assert_eq!(
            resolve_line(&product, &line("1 kg", 1)),
            Err(LineRejection::ProductUnavailable {
                name: "Black Forest".into()
            })
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let product = product(vec![]);
        assert!(matches!(
            resolve_line(&product, &line("1 kg", 0)),
            Err(LineRejection::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn eggless_preference_overrides_product_default() {
        let product = product(vec![]);
        let mut with_pref = line("1 kg", 1);
        with_pref.is_eggless = Some(true);
        assert!(resolve_line(&product, &with_pref).unwrap().is_eggless);
        assert!(!resolve_line(&product, &line("1 kg", 1)).unwrap().is_eggless);
    }

    #[test]
    fn total_invariant_holds() {
        let config = OrderingConfig {
            delivery_charge: dec("40"),
            commission_percentage: dec("10"),
        };
        let items = [item("450", 2), item("250", 1)];
        let coupon = coupon(DiscountType::Percentage, "10");
        let quote = compute_quote(&items, Some(&coupon), &config);
        assert_eq!(quote.subtotal, dec("1150"));
        assert_eq!(quote.discount, dec("115"));
        assert_eq!(quote.total, quote.subtotal - quote.discount + quote.delivery_charge);
        assert_eq!(quote.total, dec("1075"));
    }

    #[test]
    fn commission_is_a_percentage_of_total() {
        let config = OrderingConfig::default();
        let quote = compute_quote(&[item("500", 1)], None, &config);
        assert_eq!(quote.total, dec("500"));
        assert_eq!(quote.commission, dec("50"));
        assert_eq!(quote.commission_percentage, dec("10"));
    }

    #[test]
    fn no_coupon_means_no_discount() {
        let quote = compute_quote(&[item("500", 1)], None, &OrderingConfig::default());
        assert_eq!(quote.discount, Decimal::ZERO);
        assert_eq!(quote.total, dec("500"));
    }

    #[test]
    fn flat_coupon_subtracts_exactly() {
        let coupon = coupon(DiscountType::Flat, "60");
        let quote = compute_quote(
            &[item("500", 1)],
            Some(&coupon),
            &OrderingConfig::default(),
        );
        assert_eq!(quote.discount, dec("60"));
        assert_eq!(quote.total, dec("440"));
    }
}
