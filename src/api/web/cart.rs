use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_cart;
use crate::usecase::{
    AddCartUsKsResult, AddCartItemUseCase, DiscardCartUsKsResult, DiscardCartUseCase,
    ModifyCartUsKsResult, ModifyCartItemUseCase, RemoveCartUsKsResult, RemoveCartItemUseCase,
    RetrieveCartUsKsResult, RetrieveCartUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::dto::{CartItemAddReqDto, CartItemQtyReqDto};

fn resp_json_header_map() -> HeaderMap {
    let resp_ctype_val = HeaderValue::from_str(HTTP_CONTENT_TYPE_JSON).unwrap();
    let mut hdr_map = HeaderMap::new();
    hdr_map.insert(header::CONTENT_TYPE, resp_ctype_val);
    hdr_map
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn retrieve(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = RetrieveCartUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute().await {
        RetrieveCartUsKsResult::Success(v) => (StatusCode::OK, serde_json::to_string(&v).unwrap()),
        RetrieveCartUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, default_body)
        }
    };
    (status, hdr_map, resp_body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn add_item(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CartItemAddReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = AddCartItemUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute(req_body).await {
        AddCartUsKsResult::Success(v) => (StatusCode::CREATED, serde_json::to_string(&v).unwrap()),
        AddCartUsKsResult::InvalidQuantity => (StatusCode::BAD_REQUEST, default_body),
        AddCartUsKsResult::QuotaExceed(e) => {
            (StatusCode::BAD_REQUEST, serde_json::to_string(&e).unwrap())
        }
        AddCartUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn add_item

#[debug_handler(state = AppSharedState)]
pub(super) async fn modify_item(
    ExtractPath(item_id): ExtractPath<String>,
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CartItemQtyReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header_map();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = ModifyCartItemUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute(item_id, req_body).await {
        ModifyCartUsKsResult::Success => (StatusCode::OK, default_body),
        ModifyCartUsKsResult::NotFound => (StatusCode::NOT_FOUND, default_body),
        ModifyCartUsKsResult::InvalidQuantity => (StatusCode::BAD_REQUEST, default_body),
        ModifyCartUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn modify_item

#[debug_handler(state = AppSharedState)]
pub(super) async fn remove_item(
    ExtractPath(item_id): ExtractPath<String>,
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new());
        }
    };
    let uc = RemoveCartItemUseCase { repo, authed_usr };
    let status = match uc.execute(item_id).await {
        RemoveCartUsKsResult::Success => StatusCode::NO_CONTENT,
        RemoveCartUsKsResult::NotFound => StatusCode::NOT_FOUND,
        RemoveCartUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, HeaderMap::new())
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new());
        }
    };
    let uc = DiscardCartUseCase { repo, authed_usr };
    let status = match uc.execute().await {
        DiscardCartUsKsResult::Success => StatusCode::NO_CONTENT,
        DiscardCartUsKsResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, HeaderMap::new())
}
