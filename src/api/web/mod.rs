use std::collections::HashMap;

use axum::routing::{delete, get, patch, post, MethodRouter};
use http_body::Body as HttpBody;

use crate::constant::api::web as WebConst;
use crate::{AppSharedState, WebApiHdlrLabel};

mod cart;
pub mod dto;
mod order;

// type parameter `B` for http body of the method router has to match the same
// type parameter in `axum::Router`
pub type ApiRouteType<HB> = MethodRouter<AppSharedState, HB>;
pub type ApiRouteTableType<HB> = HashMap<WebApiHdlrLabel, ApiRouteType<HB>>;

pub fn route_table<HB>() -> ApiRouteTableType<HB>
where
    HB: HttpBody + Send + 'static,
    <HB as HttpBody>::Data: Send,
    <HB as HttpBody>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut out: ApiRouteTableType<HB> = HashMap::new();
    out.insert(WebConst::RETRIEVE_CART, get(cart::retrieve));
    out.insert(WebConst::ADD_CART_ITEM, post(cart::add_item));
    out.insert(WebConst::MODIFY_CART_ITEM, patch(cart::modify_item));
    out.insert(WebConst::REMOVE_CART_ITEM, delete(cart::remove_item));
    out.insert(WebConst::DISCARD_CART, delete(cart::discard));
    out.insert(WebConst::SUBMIT_ORDER, post(order::submit_handler));
    out.insert(WebConst::LIST_OWN_ORDERS, get(order::list_own_handler));
    out.insert(
        WebConst::UPDATE_ORDER_STATUS,
        patch(order::update_status_handler),
    );
    out.insert(WebConst::DELETE_ORDER, delete(order::delete_handler));
    out
}
