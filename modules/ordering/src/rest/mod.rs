pub mod addresses;
pub mod categories;
pub mod coupons;
pub mod orders;
pub mod payments;
pub mod pincodes;
pub mod products;

use crate::services::assignment::AssignmentService;
use crate::services::checkout::CheckoutService;
use crate::services::gateway::PaymentGatewayService;
use framework::sqlx::DatabaseProcessor;

/// Shared state for every ordering router.
#[derive(Clone)]
pub struct OrderingRest {
    pub db: DatabaseProcessor,
    pub checkout: CheckoutService,
    pub assignment: AssignmentService,
    pub gateway: PaymentGatewayService,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}
