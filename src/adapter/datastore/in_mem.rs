use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// a single row is rendered as sequence of column values in fixed order,
// each repository module owns the layout of its tables
pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;
// map of table label to primary keys of the rows involved
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, k: &String, v: &Vec<String>) -> bool;
}

// the datastore instance is shared by all request-handling tasks,
// `Send` and `Sync` are required as super-traits
#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
}

type InnerTable = HashMap<String, AppInMemFetchedSingleRow>;

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    tables: RwLock<HashMap<String, InnerTable>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn table_not_exist_err(label: &str) -> AppError {
        AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        }
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.tables.write().await;
        if !guard.contains_key(label) {
            let _ = guard.insert(label.to_string(), HashMap::new());
        } // repositories may share one table, creating twice is not an error
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.write().await;
        // verify all involved tables were declared, and the row limit will
        // not be exceeded, before mutating anything
        for (t_label, rows) in data.iter() {
            let table = guard
                .get(t_label)
                .ok_or(Self::table_not_exist_err(t_label))?;
            let num_new = rows.keys().filter(|k| !table.contains_key(*k)).count();
            let total = table.len() + num_new;
            if total > (self.max_items_per_table as usize) {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!("table:{}, rows:{}", t_label, total)),
                });
            }
        }
        let mut num_saved = 0;
        for (t_label, rows) in data {
            let table = guard.get_mut(t_label.as_str()).unwrap();
            num_saved += rows.len();
            for (pkey, row) in rows {
                let _ = table.insert(pkey, row);
            }
        }
        Ok(num_saved)
    } // end of fn save

    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let guard = self.tables.read().await;
        let mut out = HashMap::new();
        for (t_label, pkeys) in keys {
            let table = guard
                .get(t_label.as_str())
                .ok_or(Self::table_not_exist_err(t_label.as_str()))?;
            let iter = pkeys
                .into_iter()
                .filter_map(|pk| table.get(pk.as_str()).map(|row| (pk, row.clone())));
            let rows: AppInMemFetchedSingleTable = HashMap::from_iter(iter);
            let _ = out.insert(t_label, rows);
        }
        Ok(out)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.write().await;
        let mut num_removed = 0;
        for (t_label, pkeys) in info {
            let table = guard
                .get_mut(t_label.as_str())
                .ok_or(Self::table_not_exist_err(t_label.as_str()))?;
            for pk in pkeys {
                if table.remove(pk.as_str()).is_some() {
                    num_removed += 1;
                }
            }
        }
        Ok(num_removed)
    }

    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let guard = self.tables.read().await;
        let t = guard
            .get(table.as_str())
            .ok_or(Self::table_not_exist_err(table.as_str()))?;
        let out = t
            .iter()
            .filter(|(k, v)| op.filter(k, v))
            .map(|(k, _v)| k.clone())
            .collect::<Vec<_>>();
        Ok(out)
    }
} // end of impl AbstInMemoryDStore for AppInMemoryDStore
