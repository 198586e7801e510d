use std::collections::HashMap;

use procurement::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemoryDStore,
};
use procurement::error::AppErrorCode;
use procurement::AppInMemoryDbCfg;

const UT_TABLE: &str = "ut_sample_table";

fn ut_setup_dstore(max_items: u32) -> AppInMemoryDStore {
    let cfg = AppInMemoryDbCfg {
        alias: "unit-test".to_string(),
        max_items,
    };
    AppInMemoryDStore::new(&cfg)
}

fn ut_row(cols: Vec<&str>) -> Vec<String> {
    cols.into_iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn save_fetch_delete_ok() {
    let dstore = ut_setup_dstore(16);
    dstore.create_table(UT_TABLE).await.unwrap();
    let rows = HashMap::from([
        ("pk-1".to_string(), ut_row(vec!["124", "valve", "2"])),
        ("pk-2".to_string(), ut_row(vec!["124", "bolt", "6"])),
    ]);
    let data = HashMap::from([(UT_TABLE.to_string(), rows)]);
    let num_saved = dstore.save(data).await.unwrap();
    assert_eq!(num_saved, 2);

    let keys = HashMap::from([(
        UT_TABLE.to_string(),
        vec!["pk-1".to_string(), "pk-miss".to_string()],
    )]);
    let mut fetched = dstore.fetch(keys).await.unwrap();
    let rows = fetched.remove(UT_TABLE).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get("pk-1").unwrap()[1].as_str(), "valve");

    let info = HashMap::from([(UT_TABLE.to_string(), vec!["pk-1".to_string()])]);
    let num_removed = dstore.delete(info).await.unwrap();
    assert_eq!(num_removed, 1);
    let keys = HashMap::from([(UT_TABLE.to_string(), vec!["pk-1".to_string()])]);
    let mut fetched = dstore.fetch(keys).await.unwrap();
    let rows = fetched.remove(UT_TABLE).unwrap();
    assert!(rows.is_empty());
} // end of fn save_fetch_delete_ok

#[tokio::test]
async fn save_upsert_existing_row() {
    let dstore = ut_setup_dstore(16);
    dstore.create_table(UT_TABLE).await.unwrap();
    let rows = HashMap::from([("pk-1".to_string(), ut_row(vec!["124", "valve", "2"]))]);
    dstore
        .save(HashMap::from([(UT_TABLE.to_string(), rows)]))
        .await
        .unwrap();
    let rows = HashMap::from([("pk-1".to_string(), ut_row(vec!["124", "valve", "9"]))]);
    dstore
        .save(HashMap::from([(UT_TABLE.to_string(), rows)]))
        .await
        .unwrap();
    let keys = HashMap::from([(UT_TABLE.to_string(), vec!["pk-1".to_string()])]);
    let mut fetched = dstore.fetch(keys).await.unwrap();
    let rows = fetched.remove(UT_TABLE).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get("pk-1").unwrap()[2].as_str(), "9");
}

#[tokio::test]
async fn save_exceeding_row_limit() {
    let dstore = ut_setup_dstore(2);
    dstore.create_table(UT_TABLE).await.unwrap();
    let rows = HashMap::from([
        ("pk-1".to_string(), ut_row(vec!["a"])),
        ("pk-2".to_string(), ut_row(vec!["b"])),
        ("pk-3".to_string(), ut_row(vec!["c"])),
    ]);
    let data = HashMap::from([(UT_TABLE.to_string(), rows)]);
    let result = dstore.save(data).await;
    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.code, AppErrorCode::ExceedingMaxLimit);
    }
    // nothing was written, the limit check runs before any mutation
    let keys = HashMap::from([(
        UT_TABLE.to_string(),
        vec!["pk-1".to_string(), "pk-2".to_string(), "pk-3".to_string()],
    )]);
    let mut fetched = dstore.fetch(keys).await.unwrap();
    let rows = fetched.remove(UT_TABLE).unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn access_unknown_table() {
    let dstore = ut_setup_dstore(16);
    let keys = HashMap::from([("never-created".to_string(), vec!["pk-1".to_string()])]);
    let result = dstore.fetch(keys).await;
    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.code, AppErrorCode::DataTableNotExist);
    }
}

struct UTestFilterFirstColOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for UTestFilterFirstColOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v.first()
            .map(|c| c.as_str() == self.expect.as_str())
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn filter_keys_by_column() {
    let dstore = ut_setup_dstore(16);
    dstore.create_table(UT_TABLE).await.unwrap();
    let rows = HashMap::from([
        ("pk-1".to_string(), ut_row(vec!["124", "valve"])),
        ("pk-2".to_string(), ut_row(vec!["125", "bolt"])),
        ("pk-3".to_string(), ut_row(vec!["124", "flange"])),
    ]);
    dstore
        .save(HashMap::from([(UT_TABLE.to_string(), rows)]))
        .await
        .unwrap();
    let op = UTestFilterFirstColOp {
        expect: "124".to_string(),
    };
    let mut keys = dstore.filter_keys(UT_TABLE.to_string(), &op).await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["pk-1".to_string(), "pk-3".to_string()]);
}
