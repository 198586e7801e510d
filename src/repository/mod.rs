use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::{CartModel, OrderModel};
use crate::AppDataStoreContext;

mod in_mem;
// make in-memory repo visible only for testing purpose
pub use in_mem::cart::CartInMemRepo;
pub use in_mem::order::OrderInMemRepo;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different threads
// , it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsCartRepo: Sync + Send {
    /// joined read of every cart row the given user owns, including the
    /// denormalized catalog columns
    async fn fetch_cart(&self, owner: u32) -> DefaultResult<CartModel, AppError>;

    async fn save(&self, obj: &CartModel) -> DefaultResult<usize, AppError>;

    /// returns false when no row with the given identifier belongs to the user
    async fn remove_item(&self, owner: u32, item_id: &str) -> DefaultResult<bool, AppError>;

    /// bulk delete of all rows the user owns, issued on explicit whole-cart
    /// discard and strictly after a fully successful order submission
    async fn discard(&self, owner: u32) -> DefaultResult<usize, AppError>;
}

#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    /// insert of one per-supplier order record along with its line snapshot
    async fn create(&self, order: &OrderModel) -> DefaultResult<(), AppError>;

    async fn fetch_by_owner(&self, owner: u32) -> DefaultResult<Vec<OrderModel>, AppError>;

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<OrderModel, AppError>;

    async fn save_status(&self, order: &OrderModel) -> DefaultResult<(), AppError>;

    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError>;
}

pub async fn app_repo_cart(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsCartRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = CartInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}
