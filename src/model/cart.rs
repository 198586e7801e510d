use chrono::{DateTime, FixedOffset};

use crate::api::web::dto::{CartDto, CartItemDto, ProductSnapshotDto};
use crate::constant::app_meta;
use crate::generate_custom_uid;

use super::OrderTotalModel;

// columns joined from the product catalog when reading cart rows, every
// field is optional since the catalog row may lag behind or be removed
#[derive(Clone)]
pub struct ProductJoinModel {
    pub name: Option<String>,
    pub unit_price: Option<u64>,
    pub image_url: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Clone)]
pub struct CartItemModel {
    pub id_: String,
    pub owner: u32,
    pub product_id: String,
    // exactly one row exists per (owner, product), adding the same product
    // again raises the quantity instead of inserting a new row
    pub quantity: u32,
    pub product: ProductJoinModel,
    pub time_created: DateTime<FixedOffset>,
    pub time_updated: DateTime<FixedOffset>,
}

pub struct CartModel {
    pub owner: u32,
    pub items: Vec<CartItemModel>,
}

// one change event from the store's realtime feed, reduced over the local
// item list by a pure function instead of callback-style in-place mutation
pub enum CartStreamEvent {
    Inserted(CartItemModel),
    Updated(CartItemModel),
    Deleted { id_: String },
}

impl CartItemModel {
    pub fn new(
        owner: u32,
        product_id: String,
        quantity: u32,
        product: ProductJoinModel,
        time_now: DateTime<FixedOffset>,
    ) -> Self {
        let uid = generate_custom_uid(app_meta::MACHINE_CODE);
        let id_ = uid
            .into_bytes()
            .into_iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join("");
        Self {
            id_,
            owner,
            product_id,
            quantity,
            product,
            time_created: time_now,
            time_updated: time_now,
        }
    }
} // end of impl CartItemModel

impl From<ProductSnapshotDto> for ProductJoinModel {
    fn from(value: ProductSnapshotDto) -> Self {
        Self {
            name: value.name,
            unit_price: value.unit_price,
            image_url: value.image_url,
            supplier_id: value.supplier_id,
            supplier_name: value.supplier_name,
            category_id: value.category_id,
        }
    }
}

impl From<CartItemModel> for CartItemDto {
    fn from(value: CartItemModel) -> CartItemDto {
        CartItemDto {
            id: value.id_,
            product_id: value.product_id,
            quantity: value.quantity,
            product_name: value.product.name,
            unit_price: value.product.unit_price,
            image_url: value.product.image_url,
            supplier_id: value.product.supplier_id,
            supplier_name: value.product.supplier_name,
            category_id: value.product.category_id,
        }
    }
}

impl From<CartModel> for CartDto {
    // the retrieval endpoint reports the whole-cart totals summary along
    // with the rows, computed by the same function the submission uses
    fn from(value: CartModel) -> CartDto {
        let totals = OrderTotalModel::calculate(&value.items);
        CartDto {
            items: value
                .items
                .into_iter()
                .map(CartItemModel::into)
                .collect::<Vec<_>>(),
            totals: totals.into(),
        }
    }
}

impl CartModel {
    // returns whether an existing row absorbed the quantity, the caller only
    // persists a new row when this is false
    pub fn merge_add(
        &mut self,
        product_id: &str,
        quantity: u32,
        product: ProductJoinModel,
        time_now: DateTime<FixedOffset>,
    ) -> bool {
        let found = self
            .items
            .iter_mut()
            .find(|m| m.product_id.as_str() == product_id);
        if let Some(m) = found {
            m.quantity += quantity;
            m.time_updated = time_now;
            true
        } else {
            let item = CartItemModel::new(self.owner, product_id.to_string(), quantity, product, time_now);
            self.items.push(item);
            false
        }
    }

    pub fn get_item(&self, item_id: &str) -> Option<&CartItemModel> {
        self.items.iter().find(|m| m.id_.as_str() == item_id)
    }

    // pure reducer over the realtime change feed, the subscription transport
    // feeds events in and renders whatever list comes out
    pub fn reduce(current: Vec<CartItemModel>, evt: CartStreamEvent) -> Vec<CartItemModel> {
        match evt {
            CartStreamEvent::Inserted(item) => {
                let mut out = current;
                let existed = out.iter_mut().find(|m| m.id_ == item.id_);
                if let Some(m) = existed {
                    *m = item; // replayed insert, keep the position
                } else {
                    out.push(item);
                }
                out
            }
            CartStreamEvent::Updated(item) => current
                .into_iter()
                .map(|m| if m.id_ == item.id_ { item.clone() } else { m })
                .collect(),
            CartStreamEvent::Deleted { id_ } => {
                current.into_iter().filter(|m| m.id_ != id_).collect()
            }
        }
    } // end of fn reduce

    // optimistic quantity change, the returned event compensates the local
    // list when the remote write fails, replayed through the same reducer
    pub fn apply_quantity_change(
        current: Vec<CartItemModel>,
        item_id: &str,
        quantity: u32,
        time_now: DateTime<FixedOffset>,
    ) -> (Vec<CartItemModel>, Option<CartStreamEvent>) {
        let prev = current.iter().find(|m| m.id_.as_str() == item_id).cloned();
        if let Some(old_item) = prev {
            let mut changed = old_item.clone();
            changed.quantity = quantity;
            changed.time_updated = time_now;
            let out = Self::reduce(current, CartStreamEvent::Updated(changed));
            (out, Some(CartStreamEvent::Updated(old_item)))
        } else {
            (current, None)
        }
    }
} // end of impl CartModel
