use procurement::model::CartModel;
use procurement::repository::app_repo_cart;

use crate::{ut_setup_cart_items, ut_setup_share_state};

#[tokio::test]
async fn save_fetch_cart_ok() {
    let shr_state = ut_setup_share_state();
    let repo = app_repo_cart(shr_state.datastore()).await.unwrap();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("valve-dn50", 2, Some(500), Some("S1"), Some("Steelworks Ltd")),
            ("ghost-product", 3, None, None, None),
        ],
    );
    let obj = CartModel { owner: 124, items };
    let num_saved = repo.save(&obj).await.unwrap();
    assert_eq!(num_saved, 2);

    let fetched = repo.fetch_cart(124).await.unwrap();
    assert_eq!(fetched.owner, 124);
    assert_eq!(fetched.items.len(), 2);
    // rows come back in creation order
    assert_eq!(fetched.items[0].product_id.as_str(), "valve-dn50");
    let row = &fetched.items[0];
    assert_eq!(row.quantity, 2);
    assert_eq!(row.product.unit_price, Some(500));
    assert_eq!(row.product.supplier_id.as_deref(), Some("S1"));
    assert_eq!(row.product.supplier_name.as_deref(), Some("Steelworks Ltd"));
    // absent joined columns survive the round trip as absent
    let row = &fetched.items[1];
    assert!(row.product.unit_price.is_none());
    assert!(row.product.supplier_id.is_none());
}

#[tokio::test]
async fn fetch_cart_isolates_owners() {
    let shr_state = ut_setup_share_state();
    let repo = app_repo_cart(shr_state.datastore()).await.unwrap();
    let obj = CartModel {
        owner: 124,
        items: ut_setup_cart_items(124, vec![("valve-dn50", 2, Some(500), Some("S1"), None)]),
    };
    repo.save(&obj).await.unwrap();
    let obj = CartModel {
        owner: 125,
        items: ut_setup_cart_items(125, vec![("bolt-m8", 6, Some(20), Some("S2"), None)]),
    };
    repo.save(&obj).await.unwrap();

    let fetched = repo.fetch_cart(124).await.unwrap();
    assert_eq!(fetched.items.len(), 1);
    assert_eq!(fetched.items[0].product_id.as_str(), "valve-dn50");
    let fetched = repo.fetch_cart(999).await.unwrap();
    assert!(fetched.items.is_empty());
}

#[tokio::test]
async fn remove_item_then_discard() {
    let shr_state = ut_setup_share_state();
    let repo = app_repo_cart(shr_state.datastore()).await.unwrap();
    let items = ut_setup_cart_items(
        124,
        vec![
            ("valve-dn50", 2, Some(500), Some("S1"), None),
            ("bolt-m8", 6, Some(20), Some("S2"), None),
        ],
    );
    let victim_id = items[0].id_.clone();
    let obj = CartModel { owner: 124, items };
    repo.save(&obj).await.unwrap();

    // wrong owner must not touch the row
    let removed = repo.remove_item(999, victim_id.as_str()).await.unwrap();
    assert!(!removed);
    let removed = repo.remove_item(124, victim_id.as_str()).await.unwrap();
    assert!(removed);
    let removed = repo.remove_item(124, victim_id.as_str()).await.unwrap();
    assert!(!removed);

    let num_removed = repo.discard(124).await.unwrap();
    assert_eq!(num_removed, 1);
    let fetched = repo.fetch_cart(124).await.unwrap();
    assert!(fetched.items.is_empty());
}
