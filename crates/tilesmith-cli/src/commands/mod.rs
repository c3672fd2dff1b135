pub mod check;
pub mod completions;
pub mod configure;
pub mod render;

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tilesmith_remote::{HttpOpsManager, ProductRef, RemoteConfig};
use tilesmith_schema::{parse_config_file, DeploymentConfig, NetworkDescriptor, ValueKind};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_REMOTE_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Re-indent a compact JSON document for display or files.
pub fn pretty_document(doc: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(doc).map_err(|e| format!("invalid document: {e}"))?;
    json_pretty(&value)
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

/// Style a value kind, padded to `width` visible columns.
pub fn colorize_kind(kind: ValueKind, width: usize) -> String {
    use console::Style;
    let label = format!("{:<width$}", kind.to_string());
    match kind {
        ValueKind::Secret | ValueKind::Certificate => {
            Style::new().yellow().bold().apply_to(label).to_string()
        }
        ValueKind::Integer | ValueKind::Boolean => Style::new().cyan().apply_to(label).to_string(),
        ValueKind::Plain => label,
    }
}

/// Read and validate a deployment config.
pub fn load_config(path: &Path) -> Result<DeploymentConfig, String> {
    let cfg = parse_config_file(path).map_err(|e| format!("config error: {e}"))?;
    cfg.validate().map_err(|e| format!("config error: {e}"))?;
    Ok(cfg)
}

pub fn resolve_network(cfg: &DeploymentConfig) -> Result<NetworkDescriptor, String> {
    NetworkDescriptor::for_subnet(&cfg.subnet_name, &cfg.zones)
        .ok_or_else(|| "config error: at least one availability zone is required".to_owned())
}

pub fn product_ref(cfg: &DeploymentConfig) -> ProductRef {
    ProductRef::new(&cfg.product.name, cfg.product.version.as_deref())
}

pub fn make_client(remote_url: Option<&str>, token: Option<&str>) -> Result<HttpOpsManager, String> {
    let mut config = if let Some(url) = remote_url {
        RemoteConfig::new(url)
    } else {
        RemoteConfig::load_default().map_err(|e| format!("no --remote and no config: {e}"))?
    };
    if let Some(t) = token {
        config = config.with_token(t);
    }
    Ok(HttpOpsManager::new(config))
}
