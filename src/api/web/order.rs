use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_json;

use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_cart, app_repo_order};
use crate::usecase::{
    DeleteOrderUsKsResult, DeleteOrderUseCase, ListOwnOrdersUseCase, PlaceOrderUsKsErr,
    PlaceOrderUseCase, UpdateOrderStatusUsKsResult, UpdateOrderStatusUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::dto::{
    OrderStatusUpdateReqDto, OrderSubmitNonFieldReason, OrderSubmitReqDto, OrderSubmitRespErrorDto,
};

fn resp_json_header_map() -> HeaderMap {
    let resp_ctype_val = HeaderValue::from_str(HTTP_CONTENT_TYPE_JSON).unwrap();
    let mut hdr_map = HeaderMap::new();
    hdr_map.insert(header::CONTENT_TYPE, resp_ctype_val);
    hdr_map
}

// always to specify state type explicitly to the debug macro
#[debug_handler(state = AppSharedState)]
pub(super) async fn submit_handler(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderSubmitReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let usr_id = authed_usr.profile;
    let logctx = appstate.log_context().clone();
    let ds = appstate.datastore();
    let results = (app_repo_cart(ds.clone()).await, app_repo_order(ds).await);
    let (repo_cart, repo_order) = match results {
        (Ok(c), Ok(o)) => (c, o),
        (c_result, o_result) => {
            let mut errmsgs = Vec::new();
            if let Err(e) = c_result {
                errmsgs.push(e.to_string());
            }
            if let Err(e) = o_result {
                errmsgs.push(e.to_string());
            }
            app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}, reason: {:?}",
                usr_id,
                errmsgs
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                hdr_map,
                r#"{"reason":"internal-error"}"#.to_string(),
            );
        }
    };
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr,
        logctx: logctx.clone(),
    };
    let (status, resp_body) = match uc.execute(req_body).await {
        Ok(value) => (StatusCode::CREATED, serde_json::to_string(&value).unwrap()),
        Err(errwrap) => match errwrap {
            PlaceOrderUsKsErr::Auth => {
                let e = OrderSubmitRespErrorDto {
                    nonfield: Some(OrderSubmitNonFieldReason::AuthRequire),
                    ..Default::default()
                };
                (StatusCode::FORBIDDEN, serde_json::to_string(&e).unwrap())
            }
            PlaceOrderUsKsErr::ReqContent(msgs) => {
                let e = OrderSubmitRespErrorDto {
                    validation: Some(msgs),
                    ..Default::default()
                };
                (StatusCode::BAD_REQUEST, serde_json::to_string(&e).unwrap())
            }
            PlaceOrderUsKsErr::EmptyCart => {
                let e = OrderSubmitRespErrorDto {
                    nonfield: Some(OrderSubmitNonFieldReason::EmptyCart),
                    ..Default::default()
                };
                (StatusCode::BAD_REQUEST, serde_json::to_string(&e).unwrap())
            }
            PlaceOrderUsKsErr::Create { failures, created } => {
                let e = OrderSubmitRespErrorDto {
                    create_failures: Some(failures),
                    orders_created: Some(created),
                    ..Default::default()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::to_string(&e).unwrap(),
                )
            }
            PlaceOrderUsKsErr::CartClear { detail, created } => {
                let e = OrderSubmitRespErrorDto {
                    cart_clear: Some(detail),
                    orders_created: Some(created),
                    ..Default::default()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::to_string(&e).unwrap(),
                )
            }
            PlaceOrderUsKsErr::Server(e) => {
                app_log_event!(logctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"reason":"internal-error"}"#.to_string(),
                )
            }
        },
    };
    (status, hdr_map, resp_body)
} // end of fn submit_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_own_handler(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let default_body = "[]".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = ListOwnOrdersUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute().await {
        Ok(v) => (StatusCode::OK, serde_json::to_string(&v).unwrap()),
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, default_body)
        }
    };
    (status, hdr_map, resp_body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn update_status_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderStatusUpdateReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = UpdateOrderStatusUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute(oid.clone(), req_body.status).await {
        UpdateOrderStatusUsKsResult::Success => (StatusCode::OK, default_body),
        UpdateOrderStatusUsKsResult::NotFound => (StatusCode::NOT_FOUND, default_body),
        UpdateOrderStatusUsKsResult::PermissionDeny => (StatusCode::FORBIDDEN, default_body),
        UpdateOrderStatusUsKsResult::InvalidTransition(e) => {
            (StatusCode::BAD_REQUEST, serde_json::to_string(&e).unwrap())
        }
        UpdateOrderStatusUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "oid:{}, {:?}", oid.as_str(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn update_status_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn delete_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new());
        }
    };
    let uc = DeleteOrderUseCase { repo, authed_usr };
    let status = match uc.execute(oid.clone()).await {
        DeleteOrderUsKsResult::Success => StatusCode::NO_CONTENT,
        DeleteOrderUsKsResult::NotFound => StatusCode::NOT_FOUND,
        DeleteOrderUsKsResult::PermissionDeny => StatusCode::FORBIDDEN,
        DeleteOrderUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "oid:{}, {:?}", oid.as_str(), e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, HeaderMap::new())
}
