//! HTTP client ↔ server end-to-end tests.
//!
//! These tests start a real `tilesmith-server` in-process on a random port and
//! drive the real `HttpOpsManager` client and configure workflow against it.

use tilesmith_core::{configure_product, ConfigureState, Configurator, CoreError};
use tilesmith_remote::{HttpOpsManager, OpsManagerApi, ProductRef, RemoteConfig, RemoteError};
use tilesmith_schema::{
    decode_properties, decode_resources, parse_config_str, DeploymentConfig, NetworkDescriptor,
    TypedValue,
};
use tilesmith_server::TestServer;

fn make_client(url: &str) -> HttpOpsManager {
    HttpOpsManager::new(RemoteConfig::new(url))
}

fn config() -> DeploymentConfig {
    parse_config_str(
        r#"
apps_domain = "apps.example.com"
sys_domain = "sys.example.com"
ssl_certificate = "CERT"
ssl_private_key = "KEY"
tcp_port_range = "1024-1123"
external_sql_host = "10.0.0.5"
external_sql_port = 3306
sql_username = "admin"
sql_password = "secret123"
tcp_target_pool = "tcp-pool"
wss_target_pool = "wss-pool"
ssh_target_pool = "ssh-pool"
http_backend_service = "http-backend"
subnet_name = "ert"
zones = ["z1", "z2"]
"#,
    )
    .unwrap()
}

fn fetch(server: &TestServer, path: &str) -> String {
    ureq::get(&format!("{}{path}", server.url))
        .call()
        .unwrap()
        .body_mut()
        .read_to_string()
        .unwrap()
}

#[test]
fn e2e_configure_roundtrip() {
    let server = TestServer::start();
    let client = make_client(&server.url);
    let cfg = config();
    let network = NetworkDescriptor::for_subnet(&cfg.subnet_name, &cfg.zones).unwrap();

    let docs = configure_product(
        &client,
        &ProductRef::new("cf", Some("1.12.0")),
        &cfg,
        &network,
    )
    .unwrap();
    assert_eq!(docs.summary.resource_jobs.len(), 3);

    let props = fetch(&server, "/api/v0/staged/products/cf/properties");
    let props = decode_properties(&props).unwrap();
    assert_eq!(
        props[".cloud_controller.apps_domain"],
        TypedValue::plain("apps.example.com")
    );
    assert_eq!(
        props[".properties.system_database.external.routing_password"],
        TypedValue::secret("secret123")
    );

    let resources = fetch(&server, "/api/v0/staged/products/cf/resources");
    let resources = decode_resources(&resources).unwrap();
    assert_eq!(resources["diego_brain"].bindings[0].to_string(), "tcp:ssh-pool");

    let net: serde_json::Value =
        serde_json::from_str(&fetch(&server, "/api/v0/staged/products/cf/networks_and_azs"))
            .unwrap();
    assert_eq!(net, serde_json::to_value(&network).unwrap());

    let staged = server.store.list();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].product_version.as_deref(), Some("1.12.0"));
}

#[test]
fn e2e_configure_without_stage_is_rejected() {
    let server = TestServer::start();
    let client = make_client(&server.url);
    let err = client
        .configure_product("cf", "{}", "{}", "{}")
        .unwrap_err();
    assert!(matches!(err, RemoteError::ConfigureRejected { .. }));
    assert!(!server.store.is_staged("cf"));
}

#[test]
fn e2e_stage_failure_leaves_server_untouched() {
    let server = TestServer::start();
    let client = make_client(&server.url);
    let cfg = config();
    let network = NetworkDescriptor::for_subnet(&cfg.subnet_name, &cfg.zones).unwrap();

    let mut run = Configurator::new(&client);
    let err = run
        .run(&ProductRef::new("", None), &cfg, &network)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Remote(RemoteError::StageRejected { .. })
    ));
    assert_eq!(run.state(), ConfigureState::Failed);
    assert!(server.store.list().is_empty());
}

#[test]
fn e2e_health() {
    let server = TestServer::start();
    let body = fetch(&server, "/health");
    assert!(body.contains("ok"));
}

#[test]
fn e2e_unknown_route_is_not_found() {
    let server = TestServer::start();
    let result = ureq::get(&format!("{}/api/v0/staged/products/cf/jobs", server.url)).call();
    assert!(matches!(result, Err(ureq::Error::StatusCode(404))));
}
