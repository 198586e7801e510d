use std::collections::HashMap;
use std::sync::atomic::Ordering;

use procurement::api::web::dto::{OrderStatus, OrderSubmitReqDto, OrderUrgency, PaymentTerms};
use procurement::error::{AppError, AppErrorCode};
use procurement::model::CartModel;
use procurement::usecase::{PlaceOrderUsKsErr, PlaceOrderUseCase};
use procurement::AppUserType;

use super::{MockCartRepo, MockOrderRepo};
use crate::{ut_default_auth_claim, ut_setup_cart_items, ut_setup_share_state};

fn ut_valid_submit_req() -> OrderSubmitReqDto {
    OrderSubmitReqDto {
        urgency: OrderUrgency::Standard,
        delivery_address: "No.5, XinYi Rd, Da-an District, Taipei".to_string(),
        contact_person: "Shu Lin".to_string(),
        phone: "+886 2 1234 5678".to_string(),
        notes: Some("leave at loading dock B".to_string()),
        payment_terms: PaymentTerms::Net30,
    }
}

#[tokio::test]
async fn place_order_multi_supplier_ok() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(60000), Some("S1"), Some("Steelworks Ltd")),
            ("bolt-m8", 2, Some(20000), Some("S2"), Some("Fastener Co")),
        ],
    );
    let cart = CartModel { owner: 124, items };
    let (repo_cart, _num_fetch, num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, Some(Ok(2)));
    let (repo_order, created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(result.is_ok());
    if let Ok(v) = result {
        assert_eq!(v.usr_id, 124);
        assert_eq!(v.orders.len(), 2);
        // each bucket pays its own delivery fee, not a shared one
        let s1 = v.orders.iter().find(|o| o.supplier_id == "S1").unwrap();
        assert_eq!(s1.total_amount, 65000);
        assert_eq!(s1.shipping_cost, 5000);
        assert_eq!(s1.supplier_name.as_str(), "Steelworks Ltd");
        assert!(matches!(s1.status, OrderStatus::Pending));
        let s2 = v.orders.iter().find(|o| o.supplier_id == "S2").unwrap();
        assert_eq!(s2.total_amount, 45000);
        assert_eq!(s2.shipping_cost, 5000);
    }
    // the cart clear ran exactly once, strictly after the creates
    assert_eq!(num_discard.load(Ordering::Relaxed), 1);
    let g = created.lock().await;
    assert_eq!(g.len(), 2);
} // end of fn place_order_multi_supplier_ok

#[tokio::test]
async fn place_order_free_delivery_above_threshold() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let items = ut_setup_cart_items(124, vec![("beam-2m", 2, Some(60000), Some("S1"), None)]);
    let cart = CartModel { owner: 124, items };
    let (repo_cart, _num_fetch, _num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, Some(Ok(1)));
    let (repo_order, _created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(result.is_ok());
    if let Ok(v) = result {
        assert_eq!(v.orders.len(), 1);
        assert_eq!(v.orders[0].total_amount, 120000);
        assert_eq!(v.orders[0].shipping_cost, 0);
    }
}

#[tokio::test]
async fn place_order_validation_rejected() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let (repo_cart, num_fetch, num_discard) = MockCartRepo::build(None, None, None, None);
    let (repo_order, created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let data = OrderSubmitReqDto {
        urgency: OrderUrgency::Urgent,
        delivery_address: "short".to_string(),
        contact_person: "".to_string(),
        phone: "123".to_string(),
        notes: None,
        payment_terms: PaymentTerms::Immediate,
    };
    let result = uc.execute(data).await;
    assert!(result.is_err());
    if let Err(PlaceOrderUsKsErr::ReqContent(msgs)) = result {
        assert_eq!(msgs.len(), 3);
        assert!(msgs[0].contains("contact person"));
        assert!(msgs[1].contains("phone"));
        assert!(msgs[2].contains("delivery address"));
    } else {
        panic!("expect request-content error");
    }
    // rejected before any repository call
    assert_eq!(num_fetch.load(Ordering::Relaxed), 0);
    assert_eq!(num_discard.load(Ordering::Relaxed), 0);
    assert!(created.lock().await.is_empty());
} // end of fn place_order_validation_rejected

#[tokio::test]
async fn place_order_require_buyer_claim() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let (repo_cart, num_fetch, _num_discard) = MockCartRepo::build(None, None, None, None);
    let (repo_order, _created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(126, AppUserType::Supplier),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(matches!(result, Err(PlaceOrderUsKsErr::Auth)));
    assert_eq!(num_fetch.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn place_order_empty_cart() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let cart = CartModel {
        owner: 124,
        items: Vec::new(),
    };
    let (repo_cart, _num_fetch, num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, None);
    let (repo_order, created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(matches!(result, Err(PlaceOrderUsKsErr::EmptyCart)));
    assert_eq!(num_discard.load(Ordering::Relaxed), 0);
    assert!(created.lock().await.is_empty());
}

#[tokio::test]
async fn place_order_partial_create_failure() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(60000), Some("S1"), None),
            ("bolt-m8", 2, Some(20000), Some("S2"), None),
        ],
    );
    let cart = CartModel { owner: 124, items };
    let (repo_cart, _num_fetch, num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, Some(Ok(2)));
    let create_script = HashMap::from([(
        "S2".to_string(),
        Err(AppError {
            code: AppErrorCode::ExceedingMaxLimit,
            detail: Some("constraint-violation".to_string()),
        }),
    )]);
    let (repo_order, created) = MockOrderRepo::build(create_script, None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(result.is_err());
    if let Err(PlaceOrderUsKsErr::Create { failures, created }) = result {
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].supplier_id.as_str(), "S2");
        assert!(failures[0].reason.contains("constraint-violation"));
        // the succeeded bucket is reported, it is NOT rolled back
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].supplier_id.as_str(), "S1");
    } else {
        panic!("expect create error");
    }
    // the cart clear must never run after a partial failure
    assert_eq!(num_discard.load(Ordering::Relaxed), 0);
    // the S1 record really reached the store before failure was surfaced
    let g = created.lock().await;
    assert_eq!(g.len(), 1);
    assert_eq!(g[0].supplier_id.as_str(), "S1");
} // end of fn place_order_partial_create_failure

#[tokio::test]
async fn place_order_cart_clear_failure() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(60000), Some("S1"), None),
            ("bolt-m8", 2, Some(20000), Some("S2"), None),
        ],
    );
    let cart = CartModel { owner: 124, items };
    let discard_result = Err(AppError {
        code: AppErrorCode::AcquireLockFailure,
        detail: Some("row-lock-timeout".to_string()),
    });
    let (repo_cart, _num_fetch, num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, Some(discard_result));
    let (repo_order, created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(result.is_err());
    if let Err(PlaceOrderUsKsErr::CartClear { detail, created }) = result {
        // the error is distinct so the caller knows orders WERE placed
        assert!(detail.contains("row-lock-timeout"));
        assert_eq!(created.len(), 2);
    } else {
        panic!("expect cart-clear error");
    }
    assert_eq!(num_discard.load(Ordering::Relaxed), 1);
    assert_eq!(created.lock().await.len(), 2);
} // end of fn place_order_cart_clear_failure

#[tokio::test]
async fn place_order_sentinel_supplier_bucket() {
    let shr_state = ut_setup_share_state();
    let logctx = shr_state.log_context().clone();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(60000), Some("S1"), None),
            ("mystery-item", 1, Some(700), None, None),
        ],
    );
    let cart = CartModel { owner: 124, items };
    let (repo_cart, _num_fetch, _num_discard) =
        MockCartRepo::build(Some(Ok(cart)), None, None, Some(Ok(2)));
    let (repo_order, _created) = MockOrderRepo::build(HashMap::new(), None, None, None, None);
    let uc = PlaceOrderUseCase {
        repo_cart,
        repo_order,
        authed_usr: ut_default_auth_claim(124, AppUserType::Buyer),
        logctx,
    };
    let result = uc.execute(ut_valid_submit_req()).await;
    assert!(result.is_ok());
    if let Ok(v) = result {
        // the row missing its supplier reference is still ordered
        assert_eq!(v.orders.len(), 2);
        let sentinel = v.orders.iter().find(|o| o.supplier_id == "unknown").unwrap();
        assert_eq!(sentinel.supplier_name.as_str(), "Unknown Supplier");
        assert_eq!(sentinel.total_amount, 700 + 5000);
    }
}
