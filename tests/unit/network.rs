use hyper::Body as HyperBody;

use procurement::api::web::route_table;
use procurement::error::AppErrorCode;
use procurement::network::{app_web_service, middleware, net_server_listener};

use crate::ut_setup_share_state;

#[tokio::test]
async fn web_service_routes_applied() {
    let shr_state = ut_setup_share_state();
    let cfg = shr_state.config().clone();
    let rtable = route_table::<HyperBody>();
    let (_service, num_applied) =
        app_web_service::<HyperBody>(&cfg.api_server.listen, rtable, shr_state);
    // the config carries 10 routes, one of them references a handler label
    // this server does not provide, it is skipped instead of failing startup
    assert_eq!(num_applied, 9);
}

#[tokio::test]
async fn listener_bind_ok() {
    // port zero lets the OS pick an ephemeral port
    let result = net_server_listener("localhost".to_string(), 0);
    assert!(result.is_ok());
}

#[tokio::test]
async fn listener_bad_host() {
    let result = net_server_listener("no-such-host.invalid.example".to_string(), 8012);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(matches!(e.code, AppErrorCode::IOerror(_)));
    }
}

#[test]
fn cors_layer_from_file_ok() {
    let result = middleware::cors("./common/data/cors.json".to_string());
    assert!(result.is_ok());
}

#[test]
fn cors_layer_missing_file() {
    let result = middleware::cors("./no/such/cors.json".to_string());
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(matches!(e.code, AppErrorCode::IOerror(_)));
    }
}
