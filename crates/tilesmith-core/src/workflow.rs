use crate::assemble::{assemble, AssembledDocuments};
use crate::lifecycle::{validate_transition, ConfigureState};
use crate::CoreError;
use serde::Serialize;
use tilesmith_remote::{OpsManagerApi, ProductRef};
use tilesmith_schema::DeploymentConfig;
use tracing::{info, warn};

/// Drives one product through `NotStaged -> Staged -> Configured`.
///
/// The first failing step moves the run to `Failed` and its error is returned
/// to the caller as-is. Nothing is retried.
pub struct Configurator<'a> {
    api: &'a dyn OpsManagerApi,
    state: ConfigureState,
}

impl<'a> Configurator<'a> {
    pub fn new(api: &'a dyn OpsManagerApi) -> Self {
        Self {
            api,
            state: ConfigureState::NotStaged,
        }
    }

    pub fn state(&self) -> ConfigureState {
        self.state
    }

    fn advance(&mut self, to: ConfigureState) -> Result<(), CoreError> {
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    fn fail<E: Into<CoreError>>(&mut self, err: E) -> CoreError {
        let err = err.into();
        warn!("configure run failed while {}: {err}", self.state);
        if !self.state.is_terminal() {
            self.state = ConfigureState::Failed;
        }
        err
    }

    pub fn stage(&mut self, product: &ProductRef) -> Result<(), CoreError> {
        validate_transition(self.state, ConfigureState::Staged)?;
        info!("staging product {product}");
        match self.api.stage_product(product) {
            Ok(()) => self.advance(ConfigureState::Staged),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn submit(&mut self, product_name: &str, docs: &AssembledDocuments) -> Result<(), CoreError> {
        validate_transition(self.state, ConfigureState::Configured)?;
        info!(
            "configuring product {product_name}: {} properties, {} resource jobs",
            docs.summary.properties,
            docs.summary.resource_jobs.len()
        );
        match self
            .api
            .configure_product(product_name, &docs.network, &docs.properties, &docs.resources)
        {
            Ok(()) => self.advance(ConfigureState::Configured),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Stage, assemble, then submit.
    pub fn run<N>(
        &mut self,
        product: &ProductRef,
        cfg: &DeploymentConfig,
        network: &N,
    ) -> Result<AssembledDocuments, CoreError>
    where
        N: Serialize + ?Sized,
    {
        self.stage(product)?;
        let docs = match assemble(cfg, network) {
            Ok(docs) => docs,
            Err(e) => return Err(self.fail(e)),
        };
        self.submit(&product.name, &docs)?;
        info!("product {product} configured");
        Ok(docs)
    }
}

/// Run the full workflow once against `api`.
pub fn configure_product<N>(
    api: &dyn OpsManagerApi,
    product: &ProductRef,
    cfg: &DeploymentConfig,
    network: &N,
) -> Result<AssembledDocuments, CoreError>
where
    N: Serialize + ?Sized,
{
    Configurator::new(api).run(product, cfg, network)
}
