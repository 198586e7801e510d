use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::api::web::dto::{OrderDto, OrderLineDto, OrderStatus, OrderSummaryDto, OrderTotalDto};
use crate::constant::{checkout as CheckoutConst, UNKNOWN_SUPPLIER_KEY, UNKNOWN_SUPPLIER_LABEL};
use crate::error::{AppError, AppErrorCode};
use crate::generate_custom_uid;

use super::{CartItemModel, CheckoutMetaModel};

impl OrderStatus {
    pub fn can_transition_to(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Processing)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Processing, Self::Shipped)
                | (Self::Processing, Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("order-status:{value}")),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotalModel {
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total: u64,
}

impl OrderTotalModel {
    // pure arithmetic, the same function serves the whole-cart summary and
    // each per-supplier bucket during submission, a cart row whose joined
    // catalog price is absent counts as zero instead of failing the read
    pub fn calculate(items: &[CartItemModel]) -> Self {
        let subtotal = items
            .iter()
            .map(|m| m.product.unit_price.unwrap_or(0) * (m.quantity as u64))
            .sum::<u64>();
        // free delivery strictly above the threshold, the flat fee still
        // applies at exactly the threshold amount
        let delivery_fee = if subtotal > CheckoutConst::FREE_DELIVERY_THRESHOLD {
            0
        } else {
            CheckoutConst::FLAT_DELIVERY_FEE
        };
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

impl From<OrderTotalModel> for OrderTotalDto {
    fn from(value: OrderTotalModel) -> OrderTotalDto {
        OrderTotalDto {
            subtotal: value.subtotal,
            delivery_fee: value.delivery_fee,
            total: value.total,
        }
    }
}

pub struct SupplierGroupModel {
    pub supplier_id: String,
    pub supplier_name: String,
    pub items: Vec<CartItemModel>,
}

impl SupplierGroupModel {
    // partition of the flat cart-item list, item order is preserved within
    // each bucket and buckets appear in first-encounter order, a row whose
    // joined supplier reference is absent goes to the sentinel bucket so no
    // item is ever dropped
    pub fn from_items(items: Vec<CartItemModel>) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for item in items {
            let supplier_id = item
                .product
                .supplier_id
                .clone()
                .unwrap_or_else(|| UNKNOWN_SUPPLIER_KEY.to_string());
            let found = out
                .iter_mut()
                .find(|g| g.supplier_id.as_str() == supplier_id.as_str());
            if let Some(grp) = found {
                grp.items.push(item);
            } else {
                // display name comes from the first item encountered for the
                // supplier, then the supplier id, then the sentinel label
                let supplier_name = item.product.supplier_name.clone().unwrap_or_else(|| {
                    if supplier_id.as_str() == UNKNOWN_SUPPLIER_KEY {
                        UNKNOWN_SUPPLIER_LABEL.to_string()
                    } else {
                        supplier_id.clone()
                    }
                });
                out.push(Self {
                    supplier_id,
                    supplier_name,
                    items: vec![item],
                });
            }
        } // end of loop
        out
    } // end of fn from_items
}

#[derive(Clone)]
pub struct OrderLinePriceModel {
    pub unit: u64,
    pub total: u64,
}

#[derive(Clone)]
pub struct OrderLineModel {
    pub product_id: String,
    pub product_name: String,
    pub price: OrderLinePriceModel,
    pub quantity: u32,
    pub image_url: Option<String>,
}

impl From<&CartItemModel> for OrderLineModel {
    // snapshot of the joined catalog columns taken at submission time, the
    // order keeps this copy even after the catalog row changes or disappears
    fn from(value: &CartItemModel) -> Self {
        let unit = value.product.unit_price.unwrap_or(0);
        Self {
            product_id: value.product_id.clone(),
            product_name: value
                .product
                .name
                .clone()
                .unwrap_or_else(|| value.product_id.clone()),
            price: OrderLinePriceModel {
                unit,
                total: unit * (value.quantity as u64),
            },
            quantity: value.quantity,
            image_url: value.product.image_url.clone(),
        }
    }
}

impl From<OrderLineModel> for OrderLineDto {
    fn from(value: OrderLineModel) -> OrderLineDto {
        OrderLineDto {
            product_id: value.product_id,
            product_name: value.product_name,
            unit_price: value.price.unit,
            total_price: value.price.total,
            quantity: value.quantity,
            image_url: value.image_url,
        }
    }
}

// one persisted record per supplier bucket per successful submission
#[derive(Clone)]
pub struct OrderModel {
    pub id_: String,
    pub order_number: String,
    pub owner: u32,
    pub supplier_id: String,
    pub supplier_name: String,
    pub lines: Vec<OrderLineModel>,
    // total amount = line totals + shipping cost of this bucket alone,
    // computed once at creation, never recomputed from live catalog prices
    pub total_amount: u64,
    pub shipping_cost: u64,
    pub status: OrderStatus,
    pub meta: CheckoutMetaModel,
    pub expected_delivery: DateTime<FixedOffset>,
    pub time_created: DateTime<FixedOffset>,
    pub time_updated: DateTime<FixedOffset>,
}

impl OrderModel {
    pub fn from_group(
        owner: u32,
        group: SupplierGroupModel,
        meta: &CheckoutMetaModel,
        machine_code: u8,
        time_now: DateTime<FixedOffset>,
    ) -> Self {
        let totals = OrderTotalModel::calculate(&group.items);
        let lines = group.items.iter().map(OrderLineModel::from).collect();
        let id_ = Self::generate_order_id(machine_code);
        let order_number = Self::order_number_from_id(id_.as_str());
        Self {
            id_,
            order_number,
            owner,
            supplier_id: group.supplier_id,
            supplier_name: group.supplier_name,
            lines,
            total_amount: totals.total,
            shipping_cost: totals.delivery_fee,
            status: OrderStatus::Pending,
            meta: meta.clone(),
            expected_delivery: time_now + meta.urgency.lead_time(),
            time_created: time_now,
            time_updated: time_now,
        }
    } // end of fn from_group

    pub fn generate_order_id(machine_code: u8) -> String {
        // utility for generating top-level identifier to each order
        let oid = generate_custom_uid(machine_code);
        Self::hex_str_order_id(oid)
    }
    fn hex_str_order_id(oid: Uuid) -> String {
        let bs = oid.into_bytes();
        bs.into_iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join("")
    }
    // short human-readable tag shown on dashboards, derived from the tail
    // of the order id which carries the random byte sequence
    fn order_number_from_id(id_: &str) -> String {
        let start = id_.len().saturating_sub(8);
        format!("PO-{}", id_[start..].to_uppercase())
    }

    pub fn transit_status(
        &mut self,
        next: OrderStatus,
        time_now: DateTime<FixedOffset>,
    ) -> Result<(), AppError> {
        if self.status.can_transition_to(&next) {
            self.status = next;
            self.time_updated = time_now;
            Ok(())
        } else {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!(
                    "status-transition, from:{}, to:{}",
                    self.status.as_str(),
                    next.as_str()
                )),
            })
        }
    }
} // end of impl OrderModel

impl From<&OrderModel> for OrderSummaryDto {
    fn from(value: &OrderModel) -> OrderSummaryDto {
        OrderSummaryDto {
            order_id: value.id_.clone(),
            order_number: value.order_number.clone(),
            supplier_id: value.supplier_id.clone(),
            supplier_name: value.supplier_name.clone(),
            total_amount: value.total_amount,
            shipping_cost: value.shipping_cost,
            status: value.status.clone(),
            expected_delivery: value.expected_delivery.to_rfc3339(),
        }
    }
}

impl From<OrderModel> for OrderDto {
    fn from(value: OrderModel) -> OrderDto {
        OrderDto {
            order_id: value.id_,
            order_number: value.order_number,
            supplier_id: value.supplier_id,
            supplier_name: value.supplier_name,
            lines: value
                .lines
                .into_iter()
                .map(OrderLineModel::into)
                .collect::<Vec<_>>(),
            total_amount: value.total_amount,
            shipping_cost: value.shipping_cost,
            status: value.status,
            urgency: value.meta.urgency,
            delivery_address: value.meta.delivery_address,
            contact_person: value.meta.contact_person,
            phone: value.meta.phone,
            notes: value.meta.notes,
            payment_terms: value.meta.payment_terms,
            expected_delivery: value.expected_delivery.to_rfc3339(),
            create_time: value.time_created.to_rfc3339(),
        }
    }
}
