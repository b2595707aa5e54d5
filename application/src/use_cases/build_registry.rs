//! Build Registry use case
//!
//! Runs the whole build phase: route table → descriptors → registered tools.
//!
//! Every descriptor is validated into the [`ToolRegistry`] before the first
//! registration, so a duplicate tool name fails the build with nothing
//! registered.

use crate::ports::api_invoker::ApiInvokerPort;
use crate::ports::tool_host::ToolHostPort;
use crate::use_cases::dispatch::GeneratedTool;
use restbridge_domain::{
    BuildError, FieldClassifier, FieldError, QueryFieldPolicy, RouteIntrospector, RouteTable,
    SkippedRoute, ToolDescriptorBuilder, ToolRegistry,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the BuildRegistry use case
#[derive(Debug, Clone)]
pub struct BuildRegistryInput {
    pub table: RouteTable,
    pub policy: QueryFieldPolicy,
}

impl BuildRegistryInput {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            policy: QueryFieldPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: QueryFieldPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Output of a successful build
#[derive(Debug, Clone)]
pub struct BuildRegistryOutput {
    pub registry: ToolRegistry,
    /// Mapping entries whose action the handler does not implement
    pub skipped: Vec<SkippedRoute>,
    /// Fields dropped for not being valid identifiers
    pub dropped: Vec<FieldError>,
}

/// Use case for building and registering every tool
pub struct BuildRegistryUseCase<I: ApiInvokerPort + 'static> {
    invoker: Arc<I>,
}

impl<I: ApiInvokerPort + 'static> BuildRegistryUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self { invoker }
    }

    /// Build descriptors without registering anything
    pub fn describe(&self, input: &BuildRegistryInput) -> Result<BuildRegistryOutput, BuildError> {
        let introspection = RouteIntrospector::new().introspect(&input.table)?;
        for skipped in &introspection.skipped {
            debug!(
                "Skipping {} {} on '{}': action not implemented",
                skipped.verb, skipped.action, skipped.basename
            );
        }

        let classifier = FieldClassifier::new(input.policy.clone());
        let builder = ToolDescriptorBuilder::new();
        let mut registry = ToolRegistry::new();
        let mut dropped = Vec::new();

        for route in &introspection.routes {
            let classified = classifier.classify(route)?;
            for error in &classified.dropped {
                warn!("{}", error);
            }
            dropped.extend(classified.dropped.iter().cloned());
            registry.insert(builder.build(route, &classified))?;
        }

        info!(
            "Discovered {} tools from {} resources",
            registry.len(),
            input.table.resources.len()
        );

        Ok(BuildRegistryOutput {
            registry,
            skipped: introspection.skipped,
            dropped,
        })
    }

    /// Build every descriptor, then register one handler per tool
    pub fn execute(
        &self,
        input: &BuildRegistryInput,
        host: &mut dyn ToolHostPort,
    ) -> Result<BuildRegistryOutput, BuildError> {
        let output = self.describe(input)?;

        for descriptor in output.registry.all() {
            let handler = Arc::new(GeneratedTool::new(
                descriptor.clone(),
                Arc::clone(&self.invoker),
            ));
            host.register(
                &descriptor.name,
                &descriptor.description,
                &descriptor.fields,
                handler,
            )
            .map_err(|e| BuildError::Registration {
                name: descriptor.name.clone(),
                reason: e.to_string(),
            })?;

            info!(
                tool = %descriptor.name,
                "Registered {} {} {}",
                descriptor.verb,
                descriptor.path_template,
                descriptor.signature()
            );
        }

        Ok(output)
    }
}
