use crate::{OpsManagerApi, ProductRef, RemoteError};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Stage(ProductRef),
    Configure {
        product_name: String,
        network: String,
        properties: String,
        resources: String,
    },
}

/// In-memory `OpsManagerApi` that records calls and can be told to fail.
#[derive(Default)]
pub struct MockOpsManager {
    calls: Mutex<Vec<RecordedCall>>,
    fail_stage: Option<String>,
    fail_configure: Option<String>,
}

impl MockOpsManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_stage(mut self, reason: &str) -> Self {
        self.fail_stage = Some(reason.to_owned());
        self
    }

    #[must_use]
    pub fn failing_configure(mut self, reason: &str) -> Self {
        self.fail_configure = Some(reason.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn configure_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Configure { .. }))
            .count()
    }

    fn record(&self, call: RecordedCall) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .map_err(|e| RemoteError::Http(format!("mutex poisoned: {e}")))?
            .push(call);
        Ok(())
    }
}

impl OpsManagerApi for MockOpsManager {
    fn stage_product(&self, product: &ProductRef) -> Result<(), RemoteError> {
        self.record(RecordedCall::Stage(product.clone()))?;
        match &self.fail_stage {
            Some(reason) => Err(RemoteError::StageRejected {
                product: product.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn configure_product(
        &self,
        product_name: &str,
        network: &str,
        properties: &str,
        resources: &str,
    ) -> Result<(), RemoteError> {
        self.record(RecordedCall::Configure {
            product_name: product_name.to_owned(),
            network: network.to_owned(),
            properties: properties.to_owned(),
            resources: resources.to_owned(),
        })?;
        match &self.fail_configure {
            Some(reason) => Err(RemoteError::ConfigureRejected {
                product: product_name.to_owned(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
