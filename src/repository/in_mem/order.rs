use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::web::dto::{OrderStatus, OrderUrgency, PaymentTerms};
use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleTable,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{CheckoutMetaModel, OrderLineModel, OrderLinePriceModel, OrderModel};
use crate::repository::AbsOrderRepo;

use super::{col_opt, opt_col, parse_col, parse_time_col};

#[allow(non_snake_case)]
mod OrderTopTable {
    use super::{opt_col, AppInMemFetchedSingleTable, HashMap, OrderModel};

    pub(super) const LABEL: &str = "order_toplvl";
    pub(super) struct UpdateArg<'a>(pub(super) &'a OrderModel);

    // primary key is the order id, the checkout metadata columns are
    // duplicated on every per-supplier record of one submission
    impl Into<AppInMemFetchedSingleTable> for UpdateArg<'_> {
        fn into(self) -> AppInMemFetchedSingleTable {
            let m = self.0;
            let row = vec![
                m.order_number.clone(),
                m.owner.to_string(),
                m.supplier_id.clone(),
                m.supplier_name.clone(),
                m.total_amount.to_string(),
                m.shipping_cost.to_string(),
                m.status.as_str().to_string(),
                m.meta.urgency.as_str().to_string(),
                m.meta.delivery_address.clone(),
                m.meta.contact_person.clone(),
                m.meta.phone.clone(),
                opt_col(&m.meta.notes),
                m.meta.payment_terms.as_str().to_string(),
                m.expected_delivery.to_rfc3339(),
                m.time_created.to_rfc3339(),
                m.time_updated.to_rfc3339(),
            ];
            HashMap::from([(m.id_.clone(), row)])
        }
    }
} // end of inner-mod OrderTopTable

#[allow(non_snake_case)]
mod OrderLineTable {
    use super::{opt_col, AppInMemFetchedSingleTable, HashMap, OrderModel};

    pub(super) const LABEL: &str = "order_line";
    pub(super) struct UpdateArg<'a>(pub(super) &'a OrderModel);

    // product identifiers are opaque strings from the hosted catalog, the
    // line position goes to the key so the snapshot keeps its order
    pub(super) fn pkey(oid: &str, seq: usize) -> String {
        format!("{oid}/{seq}")
    }

    impl Into<AppInMemFetchedSingleTable> for UpdateArg<'_> {
        fn into(self) -> AppInMemFetchedSingleTable {
            let m = self.0;
            let iter0 = m.lines.iter().enumerate().map(|(seq, line)| {
                let row = vec![
                    line.product_id.clone(),
                    line.product_name.clone(),
                    line.price.unit.to_string(),
                    line.price.total.to_string(),
                    line.quantity.to_string(),
                    opt_col(&line.image_url),
                ];
                (pkey(m.id_.as_str(), seq), row)
            });
            HashMap::from_iter(iter0)
        }
    }
} // end of inner-mod OrderLineTable

impl TryFrom<(String, Vec<String>)> for OrderLineModel {
    type Error = AppError;
    fn try_from(value: (String, Vec<String>)) -> DefaultResult<Self, Self::Error> {
        let (_key, mut row) = (value.0, value.1);
        let product_id = row.remove(0);
        let product_name = row.remove(0);
        let unit = parse_col::<u64>(row.remove(0).as_str(), "line-unit-price")?;
        let total = parse_col::<u64>(row.remove(0).as_str(), "line-total-price")?;
        let quantity = parse_col::<u32>(row.remove(0).as_str(), "line-quantity")?;
        let image_url = col_opt(row.remove(0));
        Ok(Self {
            product_id,
            product_name,
            price: OrderLinePriceModel { unit, total },
            quantity,
            image_url,
        })
    }
}

fn order_from_row(
    oid: String,
    mut row: Vec<String>,
    lines: Vec<OrderLineModel>,
) -> DefaultResult<OrderModel, AppError> {
    let order_number = row.remove(0);
    let owner = parse_col::<u32>(row.remove(0).as_str(), "owner")?;
    let supplier_id = row.remove(0);
    let supplier_name = row.remove(0);
    let total_amount = parse_col::<u64>(row.remove(0).as_str(), "total-amount")?;
    let shipping_cost = parse_col::<u64>(row.remove(0).as_str(), "shipping-cost")?;
    let status = OrderStatus::try_from(row.remove(0).as_str())?;
    let urgency = OrderUrgency::try_from(row.remove(0).as_str())?;
    let delivery_address = row.remove(0);
    let contact_person = row.remove(0);
    let phone = row.remove(0);
    let notes = col_opt(row.remove(0));
    let payment_terms = PaymentTerms::try_from(row.remove(0).as_str())?;
    let expected_delivery = parse_time_col(row.remove(0).as_str(), "expected-delivery")?;
    let time_created = parse_time_col(row.remove(0).as_str(), "time-created")?;
    let time_updated = parse_time_col(row.remove(0).as_str(), "time-updated")?;
    Ok(OrderModel {
        id_: oid,
        order_number,
        owner,
        supplier_id,
        supplier_name,
        lines,
        total_amount,
        shipping_cost,
        status,
        meta: CheckoutMetaModel {
            urgency,
            delivery_address,
            contact_person,
            phone,
            notes,
            payment_terms,
        },
        expected_delivery,
        time_created,
        time_updated,
    })
} // end of fn order_from_row

struct OwnerFilterKeyOp {
    owner_dec: String,
}
impl AbsDStoreFilterKeyOp for OwnerFilterKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v.get(1)
            .map(|c| c.as_str() == self.owner_dec.as_str())
            .unwrap_or(false)
    }
}

struct LinePrefixFilterKeyOp {
    prefix: String,
}
impl AbsDStoreFilterKeyOp for LinePrefixFilterKeyOp {
    fn filter(&self, k: &String, _v: &Vec<String>) -> bool {
        k.starts_with(self.prefix.as_str())
    }
}

pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: &OrderModel) -> DefaultResult<(), AppError> {
        let rows_toplvl: AppInMemFetchedSingleTable = OrderTopTable::UpdateArg(order).into();
        let rows_lines: AppInMemFetchedSingleTable = OrderLineTable::UpdateArg(order).into();
        let data = HashMap::from([
            (OrderTopTable::LABEL.to_string(), rows_toplvl),
            (OrderLineTable::LABEL.to_string(), rows_lines),
        ]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch_by_owner(&self, owner: u32) -> DefaultResult<Vec<OrderModel>, AppError> {
        let op = OwnerFilterKeyOp {
            owner_dec: owner.to_string(),
        };
        let oids = self
            .datastore
            .filter_keys(OrderTopTable::LABEL.to_string(), &op)
            .await?;
        let mut out = Vec::new();
        for oid in oids {
            let m = self.fetch_by_id(oid.as_str()).await?;
            out.push(m);
        }
        out.sort_by(|a, b| {
            a.time_created
                .cmp(&b.time_created)
                .then_with(|| a.id_.cmp(&b.id_))
        });
        Ok(out)
    }

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<OrderModel, AppError> {
        let keys = HashMap::from([(OrderTopTable::LABEL.to_string(), vec![oid.to_string()])]);
        let mut result = self.datastore.fetch(keys).await?;
        let mut rows = result.remove(OrderTopTable::LABEL).unwrap_or_default();
        let row = rows.remove(oid).ok_or(AppError {
            code: AppErrorCode::OrderNotExist,
            detail: Some(oid.to_string()),
        })?;
        let lines = self.fetch_lines(oid).await?;
        order_from_row(oid.to_string(), row, lines)
    }

    async fn save_status(&self, order: &OrderModel) -> DefaultResult<(), AppError> {
        let rows_toplvl: AppInMemFetchedSingleTable = OrderTopTable::UpdateArg(order).into();
        let data = HashMap::from([(OrderTopTable::LABEL.to_string(), rows_toplvl)]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError> {
        let line_keys = self.filter_line_keys(oid).await?;
        let info = HashMap::from([
            (OrderTopTable::LABEL.to_string(), vec![oid.to_string()]),
            (OrderLineTable::LABEL.to_string(), line_keys),
        ]);
        let num_removed = self.datastore.delete(info).await?;
        if num_removed == 0 {
            Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(oid.to_string()),
            })
        } else {
            Ok(())
        }
    }
} // end of impl AbsOrderRepo for OrderInMemRepo

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(OrderTopTable::LABEL).await?;
        m.create_table(OrderLineTable::LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn filter_line_keys(&self, oid: &str) -> DefaultResult<Vec<String>, AppError> {
        let op = LinePrefixFilterKeyOp {
            prefix: format!("{oid}/"),
        };
        self.datastore
            .filter_keys(OrderLineTable::LABEL.to_string(), &op)
            .await
    }

    async fn fetch_lines(&self, oid: &str) -> DefaultResult<Vec<OrderLineModel>, AppError> {
        let mut keys = self.filter_line_keys(oid).await?;
        // keys carry the line position after the slash
        keys.sort_by_key(|k| {
            k.rsplit('/')
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        });
        let info = HashMap::from([(OrderLineTable::LABEL.to_string(), keys.clone())]);
        let mut result = self.datastore.fetch(info).await?;
        let mut rows = result.remove(OrderLineTable::LABEL).unwrap_or_default();
        keys.into_iter()
            .filter_map(|k| rows.remove(k.as_str()).map(|row| (k, row)))
            .map(OrderLineModel::try_from)
            .collect::<DefaultResult<Vec<_>, AppError>>()
    }
} // end of impl OrderInMemRepo
