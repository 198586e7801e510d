use std::boxed::Box;

use chrono::Local as LocalTime;

use crate::api::web::dto::{CartDto, CartItemAddReqDto, CartItemDto, CartItemQtyReqDto, QuotaResourceErrorDto};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::CartModel;
use crate::repository::AbsCartRepo;
use crate::AppAuthedClaim;

pub struct AddCartItemUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}
pub struct ModifyCartItemUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}
pub struct RemoveCartItemUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}
pub struct DiscardCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}
pub struct RetrieveCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub enum AddCartUsKsResult {
    Success(CartItemDto),
    InvalidQuantity,
    QuotaExceed(QuotaResourceErrorDto),
    ServerError(AppError),
}
pub enum ModifyCartUsKsResult {
    Success,
    NotFound,
    InvalidQuantity,
    ServerError(AppError),
}
pub enum RemoveCartUsKsResult {
    Success,
    NotFound,
    ServerError(AppError),
}
pub enum DiscardCartUsKsResult {
    Success,
    ServerError(AppError),
}
pub enum RetrieveCartUsKsResult {
    Success(CartDto),
    ServerError(AppError),
}

impl AddCartItemUseCase {
    pub async fn execute(self, data: CartItemAddReqDto) -> AddCartUsKsResult {
        if data.quantity == 0 {
            return AddCartUsKsResult::InvalidQuantity;
        }
        let owner = self.authed_usr.profile;
        let mut cart = match self.repo.fetch_cart(owner).await {
            Ok(v) => v,
            Err(e) => return AddCartUsKsResult::ServerError(e),
        };
        let time_now = LocalTime::now().fixed_offset();
        // adding a product already in the cart raises the quantity on the
        // existing row, exactly one row exists per (user, product)
        let merged = cart.merge_add(
            data.product_id.as_str(),
            data.quantity,
            data.product.into(),
            time_now,
        );
        if !merged && cart.items.len() > hard_limit::MAX_CART_ITEMS_PER_USER {
            return AddCartUsKsResult::QuotaExceed(QuotaResourceErrorDto {
                max_: hard_limit::MAX_CART_ITEMS_PER_USER as u32,
                given: cart.items.len(),
            });
        }
        if let Err(e) = self.repo.save(&cart).await {
            return AddCartUsKsResult::ServerError(e);
        }
        let saved = cart
            .items
            .into_iter()
            .find(|m| m.product_id.as_str() == data.product_id.as_str());
        match saved {
            Some(m) => AddCartUsKsResult::Success(m.into()),
            None => AddCartUsKsResult::ServerError(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some("cart-row-missing-after-merge".to_string()),
            }),
        }
    } // end of fn execute
}

impl ModifyCartItemUseCase {
    pub async fn execute(self, item_id: String, data: CartItemQtyReqDto) -> ModifyCartUsKsResult {
        if data.quantity == 0 {
            // removal has its own endpoint, a zero quantity is never stored
            return ModifyCartUsKsResult::InvalidQuantity;
        }
        let owner = self.authed_usr.profile;
        let cart = match self.repo.fetch_cart(owner).await {
            Ok(v) => v,
            Err(e) => return ModifyCartUsKsResult::ServerError(e),
        };
        let time_now = LocalTime::now().fixed_offset();
        let (items, compensate) =
            CartModel::apply_quantity_change(cart.items, item_id.as_str(), data.quantity, time_now);
        if compensate.is_none() {
            return ModifyCartUsKsResult::NotFound;
        }
        let updated = CartModel { owner, items };
        match self.repo.save(&updated).await {
            Ok(_num) => ModifyCartUsKsResult::Success,
            Err(e) => ModifyCartUsKsResult::ServerError(e),
        }
    }
}

impl RemoveCartItemUseCase {
    pub async fn execute(self, item_id: String) -> RemoveCartUsKsResult {
        let owner = self.authed_usr.profile;
        match self.repo.remove_item(owner, item_id.as_str()).await {
            Ok(true) => RemoveCartUsKsResult::Success,
            Ok(false) => RemoveCartUsKsResult::NotFound,
            Err(e) => RemoveCartUsKsResult::ServerError(e),
        }
    }
}

impl DiscardCartUseCase {
    pub async fn execute(self) -> DiscardCartUsKsResult {
        let owner = self.authed_usr.profile;
        match self.repo.discard(owner).await {
            Ok(_num) => DiscardCartUsKsResult::Success,
            Err(e) => DiscardCartUsKsResult::ServerError(e),
        }
    }
}

impl RetrieveCartUseCase {
    pub async fn execute(self) -> RetrieveCartUsKsResult {
        let owner = self.authed_usr.profile;
        match self.repo.fetch_cart(owner).await {
            Ok(m) => RetrieveCartUsKsResult::Success(m.into()),
            Err(e) => RetrieveCartUsKsResult::ServerError(e),
        }
    }
}
