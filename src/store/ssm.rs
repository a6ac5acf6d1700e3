use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use tokio::runtime::Runtime;

use super::{ParameterStore, RawParameter};
use crate::{Result, SsmExecError};

/// SSM Parameter Store client.
///
/// Owns a private current-thread runtime and blocks on every SDK call, so
/// the rest of the tool stays synchronous. Credentials and the default
/// region resolve through the SDK's standard provider chain.
pub struct SsmStore {
    runtime: Runtime,
    client: Client,
}

impl SsmStore {
    pub fn new(region: Option<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SsmExecError::Store(format!("failed to start client runtime: {e}")))?;

        let config = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(Region::new(region));
            }
            loader.load().await
        });

        Ok(Self {
            client: Client::new(&config),
            runtime,
        })
    }
}

impl ParameterStore for SsmStore {
    fn fetch_by_path(&self, path: &str, recursive: bool) -> Result<Vec<RawParameter>> {
        self.runtime.block_on(async {
            let mut pages = self
                .client
                .get_parameters_by_path()
                .path(path)
                .recursive(recursive)
                .with_decryption(true)
                .into_paginator()
                .send();

            let mut params = Vec::new();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|e| SsmExecError::Store(DisplayErrorContext(e).to_string()))?;
                for parameter in page.parameters() {
                    if let (Some(name), Some(value)) = (parameter.name(), parameter.value()) {
                        params.push(RawParameter {
                            name: name.to_string(),
                            value: value.to_string(),
                        });
                    }
                }
            }

            tracing::debug!(count = params.len(), path, "fetched parameters by path");
            Ok(params)
        })
    }

    fn fetch_by_names(&self, names: &[String]) -> Result<Vec<RawParameter>> {
        self.runtime.block_on(async {
            let mut params = Vec::with_capacity(names.len());
            // GetParameters accepts at most 10 names per request
            for chunk in names.chunks(10) {
                let output = self
                    .client
                    .get_parameters()
                    .set_names(Some(chunk.to_vec()))
                    .with_decryption(true)
                    .send()
                    .await
                    .map_err(|e| SsmExecError::Store(DisplayErrorContext(e).to_string()))?;

                params.extend(output.parameters().iter().filter_map(|p| {
                    match (p.name(), p.value()) {
                        (Some(name), Some(value)) => Some(RawParameter {
                            name: name.to_string(),
                            value: value.to_string(),
                        }),
                        _ => None,
                    }
                }));
            }

            tracing::debug!(
                requested = names.len(),
                returned = params.len(),
                "fetched parameters by name"
            );
            Ok(params)
        })
    }
}
