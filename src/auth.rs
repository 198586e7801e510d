use std::borrow::BorrowMut;
use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::result::Result as DefaultResult;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use chrono::{DateTime, Duration, FixedOffset, Local as LocalTime};
use hyper::client::conn as ClientConn;
use hyper::{Body as HyperBody, Request, Response, Uri};
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tokio::task;

use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::error::{AppError, AppErrorCode};
use crate::{AppAuthCfg, AppSharedState};

const MAX_NBYTES_LOADED_RESPONSE_KEYSTORE: usize = 102400;

// roles of the marketplace, the variant tells which dashboards and
// operations the authenticated user may reach
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppUserType {
    Buyer,
    Supplier,
    Admin,
}

#[derive(Deserialize, Clone)]
pub struct AppAuthedClaim {
    pub profile: u32,
    pub email: Option<String>,
    pub usertype: AppUserType,
    pub exp: i64,
}

impl AppAuthedClaim {
    pub fn can_manage_order_status(&self) -> bool {
        matches!(self.usertype, AppUserType::Supplier | AppUserType::Admin)
    }
}

pub struct AppKeystoreRefreshResult {
    // number of minutes to next refresh operation
    pub period_next_op: Duration,
    pub num_discarded: usize,
    pub num_added: usize,
}

#[async_trait]
pub trait AbstractAuthKeystore: Sync + Send {
    fn update_period(&self) -> Duration;
    async fn refresh(&self) -> DefaultResult<AppKeystoreRefreshResult, AppError>;
    async fn find(&self, kid: &str) -> DefaultResult<Jwk, AppError>;
}

pub struct AppAuthKeystore {
    update_period: Duration,
    inner: RwLock<InnerKeystoreContext>,
}
struct InnerKeystoreContext {
    keyset: JwkSet,
    keystore_url: Uri,
    last_update: DateTime<FixedOffset>,
}

#[async_trait]
impl AbstractAuthKeystore for AppAuthKeystore {
    fn update_period(&self) -> Duration {
        self.update_period
    }

    async fn refresh(&self) -> DefaultResult<AppKeystoreRefreshResult, AppError> {
        let mut guard = self.inner.write().await;
        let ctx = guard.borrow_mut();
        let expect_time = ctx.last_update + self.update_period;
        let t0 = LocalTime::now().fixed_offset();
        // this ensures there's only one task refreshing the key store
        // in multithreaded application
        if t0 > expect_time {
            let keys = self.request_new_keys(&ctx.keystore_url).await?;
            let (num_discarded, num_added) = Self::merge(&mut ctx.keyset, keys);
            ctx.last_update = t0;
            Ok(AppKeystoreRefreshResult {
                num_discarded,
                num_added,
                period_next_op: self.update_period,
            })
        } else {
            let period_next_op = expect_time - t0;
            Ok(AppKeystoreRefreshResult {
                period_next_op,
                num_discarded: 0,
                num_added: 0,
            })
        }
    }

    async fn find(&self, kid: &str) -> DefaultResult<Jwk, AppError> {
        let guard = self.inner.read().await;
        match guard.keyset.find(kid) {
            Some(k) => Ok(k.clone()),
            None => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("auth-key-not-found, kid:{kid}")),
            }),
        }
    }
} // end of impl AbstractAuthKeystore

impl AppAuthKeystore {
    pub fn new(cfg: &AppAuthCfg) -> Self {
        let update_period = Duration::minutes(cfg.update_interval_minutes as i64);
        // caller can start refresh operation immediately after initialization
        let last_update = LocalTime::now().fixed_offset() - update_period - Duration::seconds(5);
        let keystore_url = cfg.keystore_url.parse::<Uri>().unwrap();
        let inner = InnerKeystoreContext {
            keyset: JwkSet { keys: vec![] },
            keystore_url,
            last_update,
        };
        Self {
            inner: RwLock::new(inner),
            update_period,
        }
    }

    pub fn merge(target: &mut JwkSet, new: JwkSet) -> (usize, usize) {
        let get_kid = |item: &Jwk| -> Option<String> {
            item.common.key_id.as_ref().map(|id| id.to_string())
        }; // in this application, key ID must be present
        let kids_iter_1 = target.keys.iter().filter_map(get_kid);
        let kids_iter_2 = new.keys.iter().filter_map(get_kid);
        let kidset1: HashSet<String, RandomState> = HashSet::from_iter(kids_iter_1);
        let kidset2 = HashSet::from_iter(kids_iter_2);
        let added = kidset2.difference(&kidset1).collect::<Vec<_>>();
        let discarded = kidset1.difference(&kidset2).collect::<Vec<_>>();
        discarded
            .iter()
            .map(|d_kid| {
                let result = target.keys.iter().position(|item| {
                    let t_kid = item.common.key_id.as_ref().unwrap().as_str();
                    d_kid.as_str() == t_kid
                });
                if let Some(idx) = result {
                    let _item = target.keys.remove(idx);
                }
            })
            .count();
        let new_iter = new.keys.into_iter().filter(|item| {
            if let Some(id) = item.common.key_id.as_ref() {
                added.contains(&id)
            } else {
                false
            }
        });
        target.keys.extend(new_iter);
        (discarded.len(), added.len())
    } // end of fn merge

    async fn request_new_keys(&self, url: &Uri) -> DefaultResult<JwkSet, AppError> {
        // TODO, config parameter for http version
        let (sender, connector) = self.setup_tcp_keyserver(url).await?;
        // make the low-level connection process inbound / outbound messages
        // in a spawned task, optionally return error
        let _handle = task::spawn(async move { connector.await });
        let resp = self._request_to_key_server(url, sender).await?;
        let keys = self.resp_body_to_keys(resp).await?;
        Ok(keys)
    } // end of request_new_keys

    async fn setup_tcp_keyserver(
        &self,
        url: &Uri,
    ) -> DefaultResult<
        (
            ClientConn::SendRequest<HyperBody>,
            ClientConn::Connection<TcpStream, HyperBody>,
        ),
        AppError,
    > {
        let host = url.host().unwrap();
        let port = url.port().unwrap().as_u16();
        let addr = format!("{host}:{port}");
        match TcpStream::connect(addr).await {
            Ok(stream) => match ClientConn::handshake(stream).await {
                Ok(m) => Ok(m),
                Err(net_e) => Err(AppError {
                    detail: Some(net_e.to_string()),
                    code: AppErrorCode::from(&net_e),
                }),
            },
            Err(net_e) => Err(AppError {
                detail: Some(net_e.to_string()),
                code: AppErrorCode::IOerror(net_e.kind()),
            }),
        }
    }

    async fn _request_to_key_server(
        &self,
        url: &Uri,
        mut sender: ClientConn::SendRequest<HyperBody>,
    ) -> DefaultResult<Response<HyperBody>, AppError> {
        let result = Request::builder()
            .uri(url.path())
            .method(hyper::Method::GET)
            .header(header::ACCEPT, HTTP_CONTENT_TYPE_JSON)
            .body(HyperBody::empty());
        match result {
            Ok(req) => match sender.send_request(req).await {
                Ok(resp) => {
                    if resp.status() == StatusCode::OK {
                        Ok(resp) // TODO, improve status check
                    } else {
                        Err(AppError {
                            detail: Some(format!(
                                "remote-key-server-response-status:{}",
                                resp.status()
                            )),
                            code: AppErrorCode::IOerror(ErrorKind::ConnectionRefused),
                        })
                    }
                }
                Err(net_e) => Err(AppError {
                    detail: Some(net_e.to_string()),
                    code: AppErrorCode::from(&net_e),
                }),
            },
            Err(net_e) => Err(AppError {
                detail: Some(net_e.to_string()),
                code: AppErrorCode::InvalidInput,
            }),
        }
    }

    async fn resp_body_to_keys(
        &self,
        resp: Response<HyperBody>,
    ) -> DefaultResult<JwkSet, AppError> {
        let body = resp.into_body();
        match hyper::body::to_bytes(body).await {
            Ok(raw) => {
                if raw.len() > MAX_NBYTES_LOADED_RESPONSE_KEYSTORE {
                    Err(AppError {
                        detail: Some("auth-keys-resp-body".to_string()),
                        code: AppErrorCode::ExceedingMaxLimit,
                    })
                } else {
                    serde_json::from_slice::<JwkSet>(&raw).map_err(|e| AppError {
                        detail: Some(e.to_string()),
                        code: AppErrorCode::InvalidJsonFormat,
                    })
                }
            }
            Err(net_e) => Err(AppError {
                detail: Some(net_e.to_string()),
                code: AppErrorCode::from(&net_e),
            }),
        }
    } // end of resp_body_to_keys
} // end of impl AppAuthKeystore

#[async_trait]
impl FromRequestParts<AppSharedState> for AppAuthedClaim {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppSharedState,
    ) -> DefaultResult<Self, Self::Rejection> {
        let hdr_val = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let raw = hdr_val.to_str().map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let encoded = raw
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .trim();
        let unverified = decode_header(encoded).map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let kid = unverified.kid.ok_or(StatusCode::UNAUTHORIZED)?;
        let keystore = state.auth_keystore();
        let jwk = keystore
            .find(kid.as_str())
            .await
            .map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let decode_key = DecodingKey::from_jwk(&jwk).map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let validation = Validation::new(unverified.alg);
        let verified = decode::<AppAuthedClaim>(encoded, &decode_key, &validation)
            .map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let claim = verified.claims;
        // the hosted auth provider guarantees a non-zero profile ID for every
        // signed-in user, anything else is refused outright
        if claim.profile == 0 {
            Err(StatusCode::UNAUTHORIZED)
        } else {
            Ok(claim)
        }
    }
} // end of impl FromRequestParts for AppAuthedClaim
