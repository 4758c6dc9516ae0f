use rust_decimal::Decimal;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OrderingConfig {
    /// Flat charge added to every order total.
    pub delivery_charge: Decimal,
    /// Percentage of the order total set aside as commission.
    pub commission_percentage: Decimal,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            delivery_charge: Decimal::ZERO,
            commission_percentage: Decimal::TEN,
        }
    }
}
