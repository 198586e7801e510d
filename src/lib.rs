use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod api;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

mod config;
pub use config::{
    ApiServerCfg, AppAuthCfg, AppBasepathCfg, AppConfig, AppDataStoreCfg, AppInMemoryDbCfg,
    AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg, WebApiListenCfg, WebApiRouteCfg,
};

mod auth;
pub use auth::{
    AbstractAuthKeystore, AppAuthKeystore, AppAuthedClaim, AppKeystoreRefreshResult, AppUserType,
};

mod adapter;
pub use adapter::datastore;

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
}

// global state shared by all threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _auth_keys: Arc<Box<dyn AbstractAuthKeystore>>,
}

impl AppSharedState {
    pub fn new(cfg: AppConfig, log: logging::AppLogContext) -> Self {
        let log = Arc::new(log);
        let in_mem = datastore::build_context(log.clone(), &cfg.api_server.data_store);
        let in_mem = in_mem.map(Arc::new);
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem });
        let auth_keys = AppAuthKeystore::new(&cfg.api_server.auth);
        Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _auth_keys: Arc::new(Box::new(auth_keys)),
        }
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn auth_keystore(&self) -> Arc<Box<dyn AbstractAuthKeystore>> {
        self._auth_keys.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _auth_keys: self._auth_keys.clone(),
        }
    }
}

fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv7 is for single-node application. This app needs to consider
    // scalability of multi-node environment, UUIDv8 can be utilized cuz it
    // allows custom ID layout, so few bits of the ID can be assigned to
    // represent each machine/node ID,  rest of that should be timestamp with
    // random byte sequence
    let ts_ctx = NoContext;
    let (secs, nano) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}
