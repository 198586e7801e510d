use std::boxed::Box;

use chrono::Local as LocalTime;

use crate::api::web::dto::{OrderDto, OrderStatus, OrderStatusUpdateErrorDto};
use crate::error::{AppError, AppErrorCode};
use crate::model::OrderModel;
use crate::repository::AbsOrderRepo;
use crate::{AppAuthedClaim, AppUserType};

pub struct ListOwnOrdersUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct UpdateOrderStatusUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct DeleteOrderUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub enum UpdateOrderStatusUsKsResult {
    Success,
    NotFound,
    PermissionDeny,
    InvalidTransition(OrderStatusUpdateErrorDto),
    ServerError(AppError),
}

pub enum DeleteOrderUsKsResult {
    Success,
    NotFound,
    PermissionDeny,
    ServerError(AppError),
}

impl ListOwnOrdersUseCase {
    pub async fn execute(self) -> Result<Vec<OrderDto>, AppError> {
        let owner = self.authed_usr.profile;
        let ms = self.repo.fetch_by_owner(owner).await?;
        Ok(ms.into_iter().map(OrderModel::into).collect::<Vec<_>>())
    }
}

impl UpdateOrderStatusUseCase {
    pub async fn execute(self, oid: String, next: OrderStatus) -> UpdateOrderStatusUsKsResult {
        if !self.authed_usr.can_manage_order_status() {
            return UpdateOrderStatusUsKsResult::PermissionDeny;
        }
        let mut saved = match self.repo.fetch_by_id(oid.as_str()).await {
            Ok(m) => m,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return UpdateOrderStatusUsKsResult::NotFound
            }
            Err(e) => return UpdateOrderStatusUsKsResult::ServerError(e),
        };
        if matches!(self.authed_usr.usertype, AppUserType::Supplier) {
            // a supplier transitions only its own orders, supplier identity
            // in the catalog is the decimal form of the auth profile id
            let expect = self.authed_usr.profile.to_string();
            if saved.supplier_id.as_str() != expect.as_str() {
                return UpdateOrderStatusUsKsResult::PermissionDeny;
            }
        }
        let time_now = LocalTime::now().fixed_offset();
        let current = saved.status.clone();
        if saved.transit_status(next.clone(), time_now).is_err() {
            let e = OrderStatusUpdateErrorDto {
                current: Some(current),
                given: next,
            };
            return UpdateOrderStatusUsKsResult::InvalidTransition(e);
        }
        match self.repo.save_status(&saved).await {
            Ok(()) => UpdateOrderStatusUsKsResult::Success,
            Err(e) => UpdateOrderStatusUsKsResult::ServerError(e),
        }
    } // end of fn execute
}

impl DeleteOrderUseCase {
    pub async fn execute(self, oid: String) -> DeleteOrderUsKsResult {
        let saved = match self.repo.fetch_by_id(oid.as_str()).await {
            Ok(m) => m,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return DeleteOrderUsKsResult::NotFound
            }
            Err(e) => return DeleteOrderUsKsResult::ServerError(e),
        };
        if saved.owner != self.authed_usr.profile {
            return DeleteOrderUsKsResult::PermissionDeny;
        }
        match self.repo.delete(oid.as_str()).await {
            Ok(()) => DeleteOrderUsKsResult::Success,
            Err(e) if e.code == AppErrorCode::OrderNotExist => DeleteOrderUsKsResult::NotFound,
            Err(e) => DeleteOrderUsKsResult::ServerError(e),
        }
    }
}
