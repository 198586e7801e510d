use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleTable,
};
use crate::error::AppError;
use crate::model::{CartItemModel, CartModel, ProductJoinModel};
use crate::repository::AbsCartRepo;

use super::{col_opt, opt_col, parse_col, parse_time_col};

#[allow(non_snake_case)]
mod CartItemTable {
    use super::{opt_col, AppInMemFetchedSingleTable, CartModel, HashMap};

    pub(super) const LABEL: &str = "cart_item";
    pub(super) struct UpdateArg<'a>(pub(super) &'a CartModel);

    // one row per cart item, primary key is the opaque item id, the fixed
    // column layout is owner, product id, quantity, the joined catalog
    // columns, then the two timestamps
    impl Into<AppInMemFetchedSingleTable> for UpdateArg<'_> {
        fn into(self) -> AppInMemFetchedSingleTable {
            let iter0 = self.0.items.iter().map(|m| {
                let row = vec![
                    m.owner.to_string(),
                    m.product_id.clone(),
                    m.quantity.to_string(),
                    opt_col(&m.product.name),
                    m.product
                        .unit_price
                        .map_or(String::new(), |v| v.to_string()),
                    opt_col(&m.product.image_url),
                    opt_col(&m.product.supplier_id),
                    opt_col(&m.product.supplier_name),
                    opt_col(&m.product.category_id),
                    m.time_created.to_rfc3339(),
                    m.time_updated.to_rfc3339(),
                ];
                (m.id_.clone(), row)
            });
            HashMap::from_iter(iter0)
        }
    }
} // end of inner-mod CartItemTable

impl TryFrom<(String, Vec<String>)> for CartItemModel {
    type Error = AppError;
    fn try_from(value: (String, Vec<String>)) -> DefaultResult<Self, Self::Error> {
        let (id_, mut row) = (value.0, value.1);
        let owner = parse_col::<u32>(row.remove(0).as_str(), "owner")?;
        let product_id = row.remove(0);
        let quantity = parse_col::<u32>(row.remove(0).as_str(), "quantity")?;
        let name = col_opt(row.remove(0));
        let unit_price = {
            let raw = row.remove(0);
            if raw.is_empty() {
                None
            } else {
                Some(parse_col::<u64>(raw.as_str(), "unit-price")?)
            }
        };
        let image_url = col_opt(row.remove(0));
        let supplier_id = col_opt(row.remove(0));
        let supplier_name = col_opt(row.remove(0));
        let category_id = col_opt(row.remove(0));
        let time_created = parse_time_col(row.remove(0).as_str(), "time-created")?;
        let time_updated = parse_time_col(row.remove(0).as_str(), "time-updated")?;
        Ok(Self {
            id_,
            owner,
            product_id,
            quantity,
            product: ProductJoinModel {
                name,
                unit_price,
                image_url,
                supplier_id,
                supplier_name,
                category_id,
            },
            time_created,
            time_updated,
        })
    } // end of fn try_from
}

struct InnerFilterKeyOp {
    owner_dec: String,
    item_id: Option<String>,
}
impl AbsDStoreFilterKeyOp for InnerFilterKeyOp {
    fn filter(&self, k: &String, v: &Vec<String>) -> bool {
        let mut cond = v
            .first()
            .map(|c| c.as_str() == self.owner_dec.as_str())
            .unwrap_or(false);
        if let Some(id_) = self.item_id.as_ref() {
            cond = cond && (k.as_str() == id_.as_str());
        }
        cond
    }
}

pub struct CartInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

#[async_trait]
impl AbsCartRepo for CartInMemRepo {
    async fn fetch_cart(&self, owner: u32) -> DefaultResult<CartModel, AppError> {
        let info = self.filter_keys(owner, None).await?;
        let mut result = self.datastore.fetch(info).await?;
        let rows = result.remove(CartItemTable::LABEL).unwrap_or_default();
        let mut items = rows
            .into_iter()
            .map(CartItemModel::try_from)
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        // the backing table does not keep insertion order, restore a stable
        // order so grouping and rendering stay deterministic
        items.sort_by(|a, b| {
            a.time_created
                .cmp(&b.time_created)
                .then_with(|| a.id_.cmp(&b.id_))
        });
        Ok(CartModel { owner, items })
    }

    async fn save(&self, obj: &CartModel) -> DefaultResult<usize, AppError> {
        let rows: AppInMemFetchedSingleTable = CartItemTable::UpdateArg(obj).into();
        let data = HashMap::from([(CartItemTable::LABEL.to_string(), rows)]);
        let num_saved = self.datastore.save(data).await?;
        Ok(num_saved)
    }

    async fn remove_item(&self, owner: u32, item_id: &str) -> DefaultResult<bool, AppError> {
        let op = InnerFilterKeyOp {
            owner_dec: owner.to_string(),
            item_id: Some(item_id.to_string()),
        };
        let keys = self
            .datastore
            .filter_keys(CartItemTable::LABEL.to_string(), &op)
            .await?;
        if keys.is_empty() {
            return Ok(false);
        }
        let info = HashMap::from([(CartItemTable::LABEL.to_string(), keys)]);
        let num_removed = self.datastore.delete(info).await?;
        Ok(num_removed > 0)
    }

    async fn discard(&self, owner: u32) -> DefaultResult<usize, AppError> {
        let info = self.filter_keys(owner, None).await?;
        let num_removed = self.datastore.delete(info).await?;
        Ok(num_removed)
    }
} // end of impl AbsCartRepo for CartInMemRepo

impl CartInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(CartItemTable::LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn filter_keys(
        &self,
        owner: u32,
        item_id: Option<String>,
    ) -> DefaultResult<AppInMemFetchKeys, AppError> {
        let op = InnerFilterKeyOp {
            owner_dec: owner.to_string(),
            item_id,
        };
        let tbl_name = CartItemTable::LABEL.to_string();
        let keys = self.datastore.filter_keys(tbl_name.clone(), &op).await?;
        Ok(HashMap::from([(tbl_name, keys)]))
    }
} // end of impl CartInMemRepo
