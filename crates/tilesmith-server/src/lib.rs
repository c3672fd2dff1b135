//! Reference HTTP server for the tilesmith orchestration API.
//!
//! Implements the staging and configuration routes the `HttpOpsManager`
//! client talks to, over in-memory state. Configuring a product that has not
//! been staged answers `409 Conflict`. Submitted documents can be read back
//! with `GET /api/v0/staged/products/{name}/{section}`.
//!
//! The [`TestServer`] helper starts a server on a random port for integration testing.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tilesmith_remote::http::DOCUMENT_SECTIONS;
use tilesmith_remote::ProductRef;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{debug, info, warn};

const PRODUCTS_PREFIX: &str = "/api/v0/staged/products";

#[derive(Debug, Clone, Serialize)]
pub struct StagedProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    pub staged_at: String,
    #[serde(skip)]
    pub sections: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutError {
    NotStaged,
}

/// In-memory staged products, keyed by product name.
#[derive(Default)]
pub struct Store {
    products: RwLock<BTreeMap<String, StagedProduct>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a product. Restaging discards previously submitted documents.
    pub fn stage(&self, product: &ProductRef) -> StagedProduct {
        let staged = StagedProduct {
            name: product.name.clone(),
            product_version: product.version.clone(),
            staged_at: chrono::Utc::now().to_rfc3339(),
            sections: BTreeMap::new(),
        };
        let mut products = self.products.write().expect("store lock poisoned");
        products.insert(product.name.clone(), staged.clone());
        staged
    }

    pub fn list(&self) -> Vec<StagedProduct> {
        let products = self.products.read().expect("store lock poisoned");
        products.values().cloned().collect()
    }

    pub fn is_staged(&self, name: &str) -> bool {
        let products = self.products.read().expect("store lock poisoned");
        products.contains_key(name)
    }

    pub fn put_section(
        &self,
        name: &str,
        section: &str,
        doc: serde_json::Value,
    ) -> Result<(), PutError> {
        let mut products = self.products.write().expect("store lock poisoned");
        let product = products.get_mut(name).ok_or(PutError::NotStaged)?;
        product.sections.insert(section.to_owned(), doc);
        Ok(())
    }

    pub fn get_section(&self, name: &str, section: &str) -> Option<serde_json::Value> {
        let products = self.products.read().expect("store lock poisoned");
        products.get(name)?.sections.get(section).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Products,
    Section { product: &'a str, section: &'a str },
    Health,
}

/// Parse a URL path into a route.
///
/// Accepts `/api/v0/staged/products`, `/api/v0/staged/products/{name}/{section}`
/// for the three document sections, and `/health`.
pub fn parse_route(path: &str) -> Option<Route<'_>> {
    if path == "/health" {
        return Some(Route::Health);
    }
    let rest = path.strip_prefix(PRODUCTS_PREFIX)?;
    if rest.is_empty() || rest == "/" {
        return Some(Route::Products);
    }
    let (product, section) = rest.strip_prefix('/')?.split_once('/')?;
    if product.is_empty() || !DOCUMENT_SECTIONS.contains(&section) {
        return None;
    }
    Some(Route::Section { product, section })
}

fn respond_err(req: tiny_http::Request, code: u16, msg: &str) {
    let _ = req.respond(Response::from_string(msg).with_status_code(StatusCode(code)));
}

fn respond_json(req: tiny_http::Request, value: &impl Serialize) {
    let header = Header::from_bytes("Content-Type", "application/json").expect("valid header");
    match serde_json::to_vec(value) {
        Ok(body) => {
            let _ = req.respond(Response::from_data(body).with_header(header));
        }
        Err(e) => respond_err(req, 500, &format!("serialization error: {e}")),
    }
}

fn read_body(req: &mut tiny_http::Request) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    if req.as_reader().read_to_end(&mut body).is_ok() {
        Some(body)
    } else {
        None
    }
}

fn handle_products(store: &Store, mut req: tiny_http::Request, method: &Method) {
    match *method {
        Method::Post => {
            let Some(body) = read_body(&mut req) else {
                respond_err(req, 500, "read error");
                return;
            };
            let product: ProductRef = match serde_json::from_slice(&body) {
                Ok(p) => p,
                Err(e) => {
                    respond_err(req, 422, &format!("invalid product: {e}"));
                    return;
                }
            };
            if product.name.is_empty() {
                respond_err(req, 422, "product name must not be empty");
                return;
            }
            let staged = store.stage(&product);
            info!("staged {product}");
            respond_json(req, &staged);
        }
        Method::Get => respond_json(req, &store.list()),
        _ => respond_err(req, 405, "method not allowed"),
    }
}

fn handle_section(
    store: &Store,
    mut req: tiny_http::Request,
    method: &Method,
    product: &str,
    section: &str,
) {
    match *method {
        Method::Put => {
            let Some(body) = read_body(&mut req) else {
                respond_err(req, 500, "read error");
                return;
            };
            let doc = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|mut v| v.get_mut(section).map(serde_json::Value::take));
            let Some(doc) = doc else {
                respond_err(req, 422, &format!("body must be a JSON object with '{section}'"));
                return;
            };
            match store.put_section(product, section, doc) {
                Ok(()) => {
                    info!("PUT {product}/{section}: {} bytes", body.len());
                    respond_json(req, &serde_json::json!({}));
                }
                Err(PutError::NotStaged) => {
                    warn!("PUT {product}/{section}: product not staged");
                    respond_err(req, 409, &format!("product '{product}' is not staged"));
                }
            }
        }
        Method::Get => match store.get_section(product, section) {
            Some(doc) => respond_json(req, &doc),
            None => respond_err(req, 404, "not found"),
        },
        _ => respond_err(req, 405, "method not allowed"),
    }
}

/// Handle a single HTTP request, dispatching to the appropriate route handler.
pub fn handle_request(store: &Store, req: tiny_http::Request) {
    let method = req.method().clone();
    let url = req.url().to_owned();
    debug!("{method} {url}");

    match parse_route(&url) {
        Some(Route::Products) => handle_products(store, req, &method),
        Some(Route::Section { product, section }) => {
            handle_section(store, req, &method, product, section);
        }
        Some(Route::Health) if method == Method::Get => {
            respond_json(req, &serde_json::json!({"status": "ok"}));
        }
        Some(Route::Health) => respond_err(req, 405, "method not allowed"),
        None => respond_err(req, 404, "not found"),
    }
}

/// Start the server loop, blocking the current thread.
pub fn run_server(
    store: &Arc<Store>,
    addr: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let server = Server::http(addr)?;
    for request in server.incoming_requests() {
        handle_request(store, request);
    }
    Ok(())
}

/// A test helper that starts a server on a random port in a background thread.
///
/// The server listens on `127.0.0.1:{port}`. The store is shared so tests can
/// inspect what was submitted.
pub struct TestServer {
    pub url: String,
    pub port: u16,
    pub store: Arc<Store>,
    server: Arc<Server>,
    _handle: std::thread::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server bound to `127.0.0.1:0` (random port).
    pub fn start() -> Self {
        let server =
            Arc::new(Server::http("127.0.0.1:0").expect("failed to bind test HTTP server"));
        let port = server.server_addr().to_ip().expect("not an IP addr").port();
        let url = format!("http://127.0.0.1:{port}");

        let store = Arc::new(Store::new());
        let srv = Arc::clone(&server);
        let handler_store = Arc::clone(&store);
        let handle = std::thread::spawn(move || {
            for request in srv.incoming_requests() {
                handle_request(&handler_store, request);
            }
        });

        Self {
            url,
            port,
            store,
            server,
            _handle: handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}
