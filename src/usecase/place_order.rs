use std::boxed::Box;
use std::sync::Arc;

use chrono::Local as LocalTime;
use futures_util::future::join_all;

use crate::api::web::dto::{
    OrderCreateErrorDto, OrderSubmitReqDto, OrderSubmitRespOkDto, OrderSummaryDto,
};
use crate::constant::app_meta;
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{CheckoutMetaModel, OrderModel, SupplierGroupModel};
use crate::repository::{AbsCartRepo, AbsOrderRepo};
use crate::{AppAuthedClaim, AppUserType};

pub enum PlaceOrderUsKsErr {
    // missing or non-buyer user context, refused before any repository call
    Auth,
    // all violated validation rules at once, still before any repository call
    ReqContent(Vec<String>),
    EmptyCart,
    // at least one per-supplier create failed, buckets that already succeeded
    // are NOT compensated and the cart is left untouched
    Create {
        failures: Vec<OrderCreateErrorDto>,
        created: Vec<OrderSummaryDto>,
    },
    // every create succeeded but the bulk cart delete did not, the listed
    // orders exist in storage while the cart still shows the old rows
    CartClear {
        detail: String,
        created: Vec<OrderSummaryDto>,
    },
    Server(AppError),
}

pub struct PlaceOrderUseCase {
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl PlaceOrderUseCase {
    pub async fn execute(
        self,
        data: OrderSubmitReqDto,
    ) -> Result<OrderSubmitRespOkDto, PlaceOrderUsKsErr> {
        let meta = CheckoutMetaModel::from(data);
        let msgs = meta.validate();
        if !msgs.is_empty() {
            return Err(PlaceOrderUsKsErr::ReqContent(msgs));
        }
        if self.authed_usr.profile == 0
            || !matches!(self.authed_usr.usertype, AppUserType::Buyer)
        {
            return Err(PlaceOrderUsKsErr::Auth);
        }
        let owner = self.authed_usr.profile;
        let cart = self
            .repo_cart
            .fetch_cart(owner)
            .await
            .map_err(PlaceOrderUsKsErr::Server)?;
        if cart.items.is_empty() {
            return Err(PlaceOrderUsKsErr::EmptyCart);
        }
        let groups = SupplierGroupModel::from_items(cart.items);
        let time_now = LocalTime::now().fixed_offset();
        let orders = groups
            .into_iter()
            .map(|g| OrderModel::from_group(owner, g, &meta, app_meta::MACHINE_CODE, time_now))
            .collect::<Vec<_>>();
        // one create request per supplier bucket, all in flight at once with
        // no ordering dependency between them, then a settle-all barrier
        let futs = orders
            .iter()
            .map(|m| self.repo_order.create(m))
            .collect::<Vec<_>>();
        let results = join_all(futs).await;
        let (mut failures, mut created) = (Vec::new(), Vec::new());
        orders
            .iter()
            .zip(results.into_iter())
            .for_each(|(m, r)| match r {
                Ok(()) => created.push(OrderSummaryDto::from(m)),
                Err(e) => failures.push(OrderCreateErrorDto {
                    supplier_id: m.supplier_id.clone(),
                    reason: e.to_string(),
                }),
            });
        let logctx = &self.logctx;
        if !failures.is_empty() {
            // the succeeded buckets stay in storage, re-submitting the same
            // cart can duplicate them, a known gap kept from the original
            let oids = created
                .iter()
                .map(|d| d.order_id.as_str())
                .collect::<Vec<_>>()
                .join(",");
            app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "partial order creation, user:{}, num-failed:{}, created:[{}]",
                owner,
                failures.len(),
                oids.as_str()
            );
            return Err(PlaceOrderUsKsErr::Create { failures, created });
        }
        // the bulk delete is ordered strictly after every create settled
        match self.repo_cart.discard(owner).await {
            Ok(_num) => Ok(OrderSubmitRespOkDto {
                usr_id: owner,
                time: time_now.timestamp() as u64,
                orders: created,
            }),
            Err(e) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::WARNING,
                    "cart clear failed after orders created, user:{}, reason:{}",
                    owner,
                    e
                );
                Err(PlaceOrderUsKsErr::CartClear {
                    detail: e.to_string(),
                    created,
                })
            }
        }
    } // end of fn execute
} // end of impl PlaceOrderUseCase
