use crate::entities::order::{
    CustomerOrder, FindOrderById, OrderStatus, SetDeliveryAssignment, UpdateOrderStatus,
};
use auth::entities::user_account::{FindUserAccountById, Role};
use framework::Error;
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct AssignmentService {
    pub db: DatabaseProcessor,
}

/// Only active delivery staff can take orders.
fn valid_assignee(staff: &auth::entities::user_account::UserAccount) -> bool {
    staff.role == Role::DeliveryBoy && staff.is_active
}

/// Status after clearing an assignment: an assignment-held order falls back
/// to Preparing, anything else keeps its status.
fn cleared_status(current: OrderStatus) -> OrderStatus {
    if current == OrderStatus::Assigned {
        OrderStatus::Preparing
    } else {
        current
    }
}

/// Admin action: `delivery_boy_id = None` clears an existing assignment.
#[derive(Debug, Clone, Copy)]
pub struct AssignDeliveryStaff {
    pub order_id: Uuid,
    pub delivery_boy_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub enum AssignDeliveryStaffResult {
    Updated(Box<CustomerOrder>),
    OrderNotFound,
    InvalidDeliveryBoy,
}

impl Processor<AssignDeliveryStaff> for AssignmentService {
    type Output = AssignDeliveryStaffResult;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(
        &self,
        input: AssignDeliveryStaff,
    ) -> Result<AssignDeliveryStaffResult, Error> {
        let Some(order) = self.db.process(FindOrderById { id: input.order_id }).await? else {
            return Ok(AssignDeliveryStaffResult::OrderNotFound);
        };

        let written = match input.delivery_boy_id {
            Some(delivery_boy_id) => {
                let staff = self
                    .db
                    .process(FindUserAccountById {
                        id: delivery_boy_id,
                    })
                    .await?;
                let valid = staff.as_ref().map(valid_assignee).unwrap_or(false);
                if !valid {
                    return Ok(AssignDeliveryStaffResult::InvalidDeliveryBoy);
                }
                self.db
                    .process(SetDeliveryAssignment {
                        order_id: order.id,
                        delivery_boy_id: Some(delivery_boy_id),
                        assigned_at: Some(framework::now_time()),
                        order_status: OrderStatus::Assigned,
                    })
                    .await?
            }
            None => {
                self.db
                    .process(SetDeliveryAssignment {
                        order_id: order.id,
                        delivery_boy_id: None,
                        assigned_at: None,
                        order_status: cleared_status(order.order_status),
                    })
                    .await?
            }
        };

        match written {
            Some(order) => Ok(AssignDeliveryStaffResult::Updated(Box::new(order))),
            None => Ok(AssignDeliveryStaffResult::OrderNotFound),
        }
    }
}

/// Delivery boy advancing one of his own orders.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceDeliveryStatus {
    pub order_id: Uuid,
    pub delivery_boy_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Clone)]
pub enum AdvanceDeliveryStatusResult {
    Updated(Box<CustomerOrder>),
    OrderNotFound,
    NotAssigned,
    StatusNotAllowed,
}

impl Processor<AdvanceDeliveryStatus> for AssignmentService {
    type Output = AdvanceDeliveryStatusResult;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(
        &self,
        input: AdvanceDeliveryStatus,
    ) -> Result<AdvanceDeliveryStatusResult, Error> {
        if !input.status.settable_by_delivery_boy() {
            return Ok(AdvanceDeliveryStatusResult::StatusNotAllowed);
        }
        let Some(order) = self.db.process(FindOrderById { id: input.order_id }).await? else {
            return Ok(AdvanceDeliveryStatusResult::OrderNotFound);
        };
        if order.delivery_boy_id != Some(input.delivery_boy_id) {
            return Ok(AdvanceDeliveryStatusResult::NotAssigned);
        }
        match self
            .db
            .process(UpdateOrderStatus {
                id: order.id,
                status: input.status,
            })
            .await?
        {
            Some(order) => Ok(AdvanceDeliveryStatusResult::Updated(Box::new(order))),
            None => Ok(AdvanceDeliveryStatusResult::OrderNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::entities::user_account::UserAccount;
    use uuid::Uuid;

    fn staff(role: Role, is_active: bool) -> UserAccount {
        let now = time::macros::datetime!(2026-03-01 09:00);
        UserAccount {
            id: Uuid::new_v4(),
            email: "rider@example.com".into(),
            name: Some("Rider".into()),
            mobile_number: None,
            role,
            is_active,
            vehicle_type: Some("bike".into()),
            vehicle_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_active_delivery_staff_are_assignable() {
        assert!(valid_assignee(&staff(Role::DeliveryBoy, true)));
        assert!(!valid_assignee(&staff(Role::DeliveryBoy, false)));
        assert!(!valid_assignee(&staff(Role::Customer, true)));
        assert!(!valid_assignee(&staff(Role::SuperAdmin, true)));
    }

    #[test]
    fn clearing_reverts_assigned_orders_only() {
        assert_eq!(cleared_status(OrderStatus::Assigned), OrderStatus::Preparing);
        assert_eq!(cleared_status(OrderStatus::PickedUp), OrderStatus::PickedUp);
        assert_eq!(cleared_status(OrderStatus::Pending), OrderStatus::Pending);
        assert_eq!(cleared_status(OrderStatus::Delivered), OrderStatus::Delivered);
    }
}
