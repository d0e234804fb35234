//! Service order domain service.
//!
//! Implements the order driving ports. Every operation asks the access
//! policy first and the order lifecycle second; the record store is only
//! touched once both agree.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::access_policy::{Action, PermissionDenied};
use crate::domain::order::non_blank;
use crate::domain::order_lifecycle::{ensure_editable, validate_transition};
use crate::domain::ports::{
    ChangeStatusRequest, OrdersCommand, OrdersQuery, ServiceOrderRepository,
};
use crate::domain::{
    Error, OrderFields, OrderFilter, OrderId, OrderStatus, OrderSummary, ServiceOrder,
    SessionPrincipal,
};

/// Order service implementing [`OrdersQuery`] and [`OrdersCommand`].
#[derive(Clone)]
pub struct ServiceOrderService<R> {
    orders: Arc<R>,
}

impl<R> ServiceOrderService<R> {
    /// Create a new service over the given order repository.
    pub fn new(orders: Arc<R>) -> Self {
        Self { orders }
    }
}

fn authorise(principal: &SessionPrincipal, action: Action) -> Result<(), Error> {
    principal.require(action).map_err(|denied: PermissionDenied| {
        debug!(user_id = %principal.id, %action, "order action denied");
        Error::from(denied)
    })
}

impl<R> ServiceOrderService<R>
where
    R: ServiceOrderRepository,
{
    async fn load(&self, id: &OrderId) -> Result<ServiceOrder, Error> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))
    }
}

#[async_trait]
impl<R> OrdersQuery for ServiceOrderService<R>
where
    R: ServiceOrderRepository,
{
    async fn list_orders(
        &self,
        principal: &SessionPrincipal,
        filter: &OrderFilter,
    ) -> Result<Vec<ServiceOrder>, Error> {
        authorise(principal, Action::ViewOrders)?;
        let orders = self.orders.list().await?;
        Ok(filter.apply(orders))
    }

    async fn get_order(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
    ) -> Result<ServiceOrder, Error> {
        authorise(principal, Action::ViewOrders)?;
        self.load(id).await
    }

    async fn summary(&self, principal: &SessionPrincipal) -> Result<OrderSummary, Error> {
        authorise(principal, Action::ViewOrders)?;
        let orders = self.orders.list().await?;
        Ok(OrderSummary::from_orders(&orders))
    }
}

#[async_trait]
impl<R> OrdersCommand for ServiceOrderService<R>
where
    R: ServiceOrderRepository,
{
    async fn create_order(
        &self,
        principal: &SessionPrincipal,
        fields: OrderFields,
    ) -> Result<ServiceOrder, Error> {
        authorise(principal, Action::CreateOrder)?;
        let order = ServiceOrder::new(OrderId::random(), fields)?;
        validate_transition(OrderStatus::default(), order.status, &order)?;

        let created = self.orders.create(order).await?;
        info!(
            order_id = %created.id,
            order_number = %created.order_number,
            user_id = %principal.id,
            "service order created"
        );
        Ok(created)
    }

    async fn update_order(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
        fields: OrderFields,
    ) -> Result<ServiceOrder, Error> {
        authorise(principal, Action::EditOrder)?;
        let current = self.load(id).await?;
        ensure_editable(&current)?;

        let next = current.with_fields(fields)?;
        if next.status != current.status {
            authorise(principal, Action::ChangeOrderStatus)?;
            validate_transition(current.status, next.status, &next)?;
        }

        let updated = self.orders.update(next).await?;
        info!(order_id = %id, user_id = %principal.id, "service order updated");
        Ok(updated)
    }

    async fn change_status(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
        request: ChangeStatusRequest,
    ) -> Result<ServiceOrder, Error> {
        authorise(principal, Action::ChangeOrderStatus)?;
        let current = self.load(id).await?;
        ensure_editable(&current)?;

        // A blank name counts as not supplied and keeps the stored one.
        let mut next = current.clone();
        if let Some(technician_name) = non_blank(request.technician_name) {
            next.technician_name = Some(technician_name);
        }
        validate_transition(current.status, request.status, &next)?;
        next.status = request.status;

        let updated = self.orders.update(next).await?;
        info!(
            order_id = %id,
            from = %current.status,
            to = %updated.status,
            user_id = %principal.id,
            "service order status changed"
        );
        Ok(updated)
    }

    async fn delete_order(&self, principal: &SessionPrincipal, id: &OrderId) -> Result<(), Error> {
        authorise(principal, Action::DeleteOrder)?;
        self.orders.delete(id).await?;
        info!(order_id = %id, user_id = %principal.id, "service order deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
