use chrono::{DateTime, Duration};

use procurement::api::web::dto::OrderStatus;
use procurement::model::{OrderModel, OrderTotalModel, SupplierGroupModel};

use crate::{ut_default_checkout_meta, ut_setup_cart_items};
use procurement::api::web::dto::OrderUrgency;

#[test]
fn calculate_totals_ok() {
    let items = ut_setup_cart_items(
        124,
        vec![
            ("valve-dn50", 2, Some(500), Some("S1"), None),
            ("flange-pn16", 5, Some(120), Some("S1"), None),
        ],
    );
    let actual = OrderTotalModel::calculate(&items);
    assert_eq!(actual.subtotal, 1600);
    assert_eq!(actual.delivery_fee, 5000);
    assert_eq!(actual.total, actual.subtotal + actual.delivery_fee);
}

#[test]
fn calculate_totals_threshold_boundary() {
    // the flat fee still applies at exactly the threshold amount
    let items = ut_setup_cart_items(124, vec![("beam-2m", 2, Some(50000), Some("S1"), None)]);
    let actual = OrderTotalModel::calculate(&items);
    assert_eq!(actual.subtotal, 100000);
    assert_eq!(actual.delivery_fee, 5000);
    assert_eq!(actual.total, 105000);

    let items = ut_setup_cart_items(124, vec![("beam-2m", 1, Some(100001), Some("S1"), None)]);
    let actual = OrderTotalModel::calculate(&items);
    assert_eq!(actual.delivery_fee, 0);
    assert_eq!(actual.total, 100001);
}

#[test]
fn calculate_totals_missing_unit_price() {
    // a cart row whose joined catalog price is absent counts as zero
    let items = ut_setup_cart_items(
        124,
        vec![
            ("ghost-product", 3, None, Some("S1"), None),
            ("valve-dn50", 1, Some(900), Some("S1"), None),
        ],
    );
    let actual = OrderTotalModel::calculate(&items);
    assert_eq!(actual.subtotal, 900);
    assert_eq!(actual.total, 5900);
}

#[test]
fn calculate_totals_idempotent() {
    let items = ut_setup_cart_items(
        124,
        vec![
            ("valve-dn50", 2, Some(500), Some("S1"), None),
            ("ghost-product", 3, None, None, None),
        ],
    );
    let first = OrderTotalModel::calculate(&items);
    let second = OrderTotalModel::calculate(&items);
    assert_eq!(first, second);
}

#[test]
fn grouping_is_a_partition() {
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(300), Some("S1"), Some("Steelworks Ltd")),
            ("ghost-product", 2, Some(50), None, None),
            ("bolt-m8", 4, Some(20), Some("S2"), Some("Fastener Co")),
            ("flange-pn16", 5, Some(120), Some("S1"), Some("Steelworks Ltd")),
            ("mystery-item", 1, None, None, None),
        ],
    );
    let num_input = items.len();
    let groups = SupplierGroupModel::from_items(items);
    // buckets appear in first-encounter order
    let keys = groups
        .iter()
        .map(|g| g.supplier_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["S1", "unknown", "S2"]);
    let num_grouped = groups.iter().map(|g| g.items.len()).sum::<usize>();
    assert_eq!(num_grouped, num_input);
    // item order preserved within each bucket, nothing dropped
    let s1 = groups.iter().find(|g| g.supplier_id == "S1").unwrap();
    let pids = s1
        .items
        .iter()
        .map(|m| m.product_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(pids, vec!["beam-2m", "flange-pn16"]);
    let sentinel = groups.iter().find(|g| g.supplier_id == "unknown").unwrap();
    assert_eq!(sentinel.items.len(), 2);
    assert_eq!(sentinel.supplier_name.as_str(), "Unknown Supplier");
}

#[test]
fn grouping_display_name_fallback() {
    // name from the first item encountered for the supplier
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(300), Some("S1"), Some("Steelworks Ltd")),
            ("flange-pn16", 2, Some(120), Some("S1"), None),
        ],
    );
    let groups = SupplierGroupModel::from_items(items);
    assert_eq!(groups[0].supplier_name.as_str(), "Steelworks Ltd");
    // no display name on any item, fall back to the supplier id itself
    let items = ut_setup_cart_items(124, vec![("bolt-m8", 4, Some(20), Some("S2"), None)]);
    let groups = SupplierGroupModel::from_items(items);
    assert_eq!(groups[0].supplier_name.as_str(), "S2");
}

#[test]
fn order_from_group_snapshot() {
    let items = ut_setup_cart_items(
        124,
        vec![
            ("beam-2m", 1, Some(60000), Some("S1"), Some("Steelworks Ltd")),
            ("flange-pn16", 2, Some(120), Some("S1"), Some("Steelworks Ltd")),
        ],
    );
    let mut groups = SupplierGroupModel::from_items(items);
    let meta = ut_default_checkout_meta(OrderUrgency::Emergency);
    let time_now = DateTime::parse_from_rfc3339("2024-03-12T18:40:00+08:00").unwrap();
    let actual = OrderModel::from_group(124, groups.remove(0), &meta, 1u8, time_now);
    assert_eq!(actual.owner, 124);
    assert_eq!(actual.supplier_id.as_str(), "S1");
    assert_eq!(actual.supplier_name.as_str(), "Steelworks Ltd");
    assert!(matches!(actual.status, OrderStatus::Pending));
    assert_eq!(actual.total_amount, 60240 + 5000);
    assert_eq!(actual.shipping_cost, 5000);
    assert_eq!(actual.expected_delivery, time_now + Duration::hours(24));
    assert!(actual.order_number.starts_with("PO-"));
    assert_eq!(actual.lines.len(), 2);
    let line = actual
        .lines
        .iter()
        .find(|l| l.product_id.as_str() == "flange-pn16")
        .unwrap();
    assert_eq!(line.product_name.as_str(), "item-flange-pn16");
    assert_eq!(line.price.unit, 120);
    assert_eq!(line.price.total, 240);
    assert_eq!(line.quantity, 2);
    assert!(line.image_url.is_some());
}

#[test]
fn order_status_transitions() {
    let time_now = DateTime::parse_from_rfc3339("2024-03-13T10:00:00+08:00").unwrap();
    let mut obj = crate::ut_setup_saved_order(124, "S1", OrderStatus::Pending);
    assert!(obj.transit_status(OrderStatus::Confirmed, time_now).is_ok());
    assert!(matches!(obj.status, OrderStatus::Confirmed));
    assert!(obj.transit_status(OrderStatus::Processing, time_now).is_ok());
    assert!(obj.transit_status(OrderStatus::Shipped, time_now).is_ok());
    // cancellation is no longer allowed once shipped
    let result = obj.transit_status(OrderStatus::Cancelled, time_now);
    assert!(result.is_err());
    assert!(matches!(obj.status, OrderStatus::Shipped));
    assert!(obj.transit_status(OrderStatus::Delivered, time_now).is_ok());
    // delivered is terminal
    let result = obj.transit_status(OrderStatus::Pending, time_now);
    assert!(result.is_err());
}

#[test]
fn order_status_cancel_from_pending() {
    let time_now = DateTime::parse_from_rfc3339("2024-03-13T10:00:00+08:00").unwrap();
    let mut obj = crate::ut_setup_saved_order(124, "S1", OrderStatus::Pending);
    assert!(obj.transit_status(OrderStatus::Cancelled, time_now).is_ok());
    let result = obj.transit_status(OrderStatus::Confirmed, time_now);
    assert!(result.is_err());
}
