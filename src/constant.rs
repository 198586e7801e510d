use crate::WebApiHdlrLabel;

pub mod app_meta {
    pub const LABEL: &'static str = "procurement";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &'static str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &'static str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &'static str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&'static str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_CART_ITEMS_PER_USER: usize = 200;
    pub const MAX_ORDER_LINES_PER_REQUEST: usize = 65535;
}

pub mod checkout {
    // money is in currency minor units end to end, the two constants
    // below intentionally carry no currency label
    pub const FREE_DELIVERY_THRESHOLD: u64 = 100_000;
    pub const FLAT_DELIVERY_FEE: u64 = 5_000;

    pub const LEADTIME_HOURS_EMERGENCY: i64 = 24;
    pub const LEADTIME_DAYS_URGENT: i64 = 3;
    pub const LEADTIME_DAYS_STANDARD: i64 = 7;
}

// cart items missing the supplier reference on their joined product data are
// still grouped and ordered, never dropped
pub const UNKNOWN_SUPPLIER_KEY: &'static str = "unknown";
pub const UNKNOWN_SUPPLIER_LABEL: &'static str = "Unknown Supplier";

pub(crate) mod api {
    use super::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const RETRIEVE_CART: WebApiHdlrLabel = "retrieve_cart";
        pub(crate) const ADD_CART_ITEM: WebApiHdlrLabel = "add_cart_item";
        pub(crate) const MODIFY_CART_ITEM: WebApiHdlrLabel = "modify_cart_item";
        pub(crate) const REMOVE_CART_ITEM: WebApiHdlrLabel = "remove_cart_item";
        pub(crate) const DISCARD_CART: WebApiHdlrLabel = "discard_cart";
        pub(crate) const SUBMIT_ORDER: WebApiHdlrLabel = "submit_order";
        pub(crate) const LIST_OWN_ORDERS: WebApiHdlrLabel = "list_own_orders";
        pub(crate) const UPDATE_ORDER_STATUS: WebApiHdlrLabel = "update_order_status";
        pub(crate) const DELETE_ORDER: WebApiHdlrLabel = "delete_order";
    }
} // end of inner-mod api

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

// permissive phone pattern, optional leading plus then digits, spaces,
// hyphens and parentheses, at least 10 characters of that set in total
pub(crate) const REGEX_PHONE_PERMISSIVE: &'static str = r"^\+?[0-9\s\-()]{10,}$";

pub mod logging {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    } // TODO, Fluentd
}
