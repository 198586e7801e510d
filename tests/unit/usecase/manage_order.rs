use std::collections::HashMap;

use procurement::api::web::dto::OrderStatus;
use procurement::error::{AppError, AppErrorCode};
use procurement::usecase::{
    DeleteOrderUsKsResult, DeleteOrderUseCase, ListOwnOrdersUseCase, UpdateOrderStatusUsKsResult,
    UpdateOrderStatusUseCase,
};
use procurement::AppUserType;

use super::MockOrderRepo;
use crate::{ut_default_auth_claim, ut_setup_saved_order};

#[tokio::test]
async fn list_own_orders_ok() {
    let saved = vec![
        ut_setup_saved_order(124, "S1", OrderStatus::Pending),
        ut_setup_saved_order(124, "S2", OrderStatus::Shipped),
    ];
    let (repo, _created) = MockOrderRepo::build(HashMap::new(), None, Some(Ok(saved)), None, None);
    let uc = ListOwnOrdersUseCase {
        repo,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
    };
    let result = uc.execute().await;
    assert!(result.is_ok());
    if let Ok(v) = result {
        assert_eq!(v.len(), 2);
        assert!(matches!(v[0].status, OrderStatus::Pending));
        assert!(matches!(v[1].status, OrderStatus::Shipped));
        assert_eq!(v[0].lines.len(), 1);
    }
}

#[tokio::test]
async fn update_status_supplier_own_order_ok() {
    let saved = ut_setup_saved_order(124, "126", OrderStatus::Pending);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, Some(Ok(())), None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(126, AppUserType::Supplier),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Confirmed)
        .await;
    assert!(matches!(result, UpdateOrderStatusUsKsResult::Success));
}

#[tokio::test]
async fn update_status_supplier_other_order_denied() {
    let saved = ut_setup_saved_order(124, "888", OrderStatus::Pending);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, Some(Ok(())), None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(126, AppUserType::Supplier),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Confirmed)
        .await;
    assert!(matches!(
        result,
        UpdateOrderStatusUsKsResult::PermissionDeny
    ));
}

#[tokio::test]
async fn update_status_buyer_denied() {
    let (repo, _created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Confirmed)
        .await;
    assert!(matches!(
        result,
        UpdateOrderStatusUsKsResult::PermissionDeny
    ));
}

#[tokio::test]
async fn update_status_admin_any_order_ok() {
    let saved = ut_setup_saved_order(124, "888", OrderStatus::Processing);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, Some(Ok(())), None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(1, AppUserType::Admin),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Shipped)
        .await;
    assert!(matches!(result, UpdateOrderStatusUsKsResult::Success));
}

#[tokio::test]
async fn update_status_invalid_transition() {
    let saved = ut_setup_saved_order(124, "126", OrderStatus::Pending);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, Some(Ok(())), None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(126, AppUserType::Supplier),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Delivered)
        .await;
    if let UpdateOrderStatusUsKsResult::InvalidTransition(e) = result {
        assert!(matches!(e.current, Some(OrderStatus::Pending)));
        assert!(matches!(e.given, OrderStatus::Delivered));
    } else {
        panic!("expect invalid-transition error");
    }
}

#[tokio::test]
async fn update_status_order_not_found() {
    let fetch_result = Err(AppError {
        code: AppErrorCode::OrderNotExist,
        detail: Some("dontcare-oid".to_string()),
    });
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(fetch_result), None, None, None);
    let uc = UpdateOrderStatusUseCase {
        repo,
        authed_usr: ut_default_auth_claim(1, AppUserType::Admin),
    };
    let result = uc
        .execute("dontcare-oid".to_string(), OrderStatus::Confirmed)
        .await;
    assert!(matches!(result, UpdateOrderStatusUsKsResult::NotFound));
}

#[tokio::test]
async fn delete_order_by_owner_ok() {
    let saved = ut_setup_saved_order(124, "S1", OrderStatus::Pending);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, None, Some(Ok(())));
    let uc = DeleteOrderUseCase {
        repo,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
    };
    let result = uc.execute("dontcare-oid".to_string()).await;
    assert!(matches!(result, DeleteOrderUsKsResult::Success));
}

#[tokio::test]
async fn delete_order_not_owner_denied() {
    let saved = ut_setup_saved_order(124, "S1", OrderStatus::Pending);
    let (repo, _created) =
        MockOrderRepo::build(HashMap::new(), Some(Ok(saved)), None, None, Some(Ok(())));
    let uc = DeleteOrderUseCase {
        repo,
        authed_usr: ut_default_auth_claim(777, AppUserType::Buyer),
    };
    let result = uc.execute("dontcare-oid".to_string()).await;
    assert!(matches!(result, DeleteOrderUsKsResult::PermissionDeny));
}
