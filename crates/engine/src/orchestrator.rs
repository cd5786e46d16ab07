// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Orchestrator (C10): the end-to-end state machine wiring C1..C9 and
//! the external provisioner (C11).
//!
//! ```text
//! Start -> ConnectSource -> Profile -> Recommend
//!       -> [resume?] -> ConnectDestination
//!                    -> [else] -> Provision -> ConnectDestination
//!       -> BuildExclusions -> Migrate -> (alarm -> Migrate)
//!       -> Cleanup -> Remediate -> Done
//!  any step -> on unrecoverable -> Failed
//! ```

use crate::error::EngineError;
use crate::{cleanup_runner, migrate, remediate};
use cloudflock_catalog::{v2, FlavorCatalog, ImageCatalog};
use cloudflock_core::{
    Clock, ExclusionList, FlavorRecommendation, HostEndpoint, MigrationRequest, Profile,
    ProvisionRequest, SystemClock,
};
use cloudflock_policy::Policy;
use cloudflock_provision::Provisioner;
use cloudflock_shell::{Session, Transport};
use std::sync::Arc;

const DEFAULT_REGION: &str = "default";

/// One node of the state machine. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Start,
    ConnectSource,
    Profile,
    Recommend,
    Provision,
    ConnectDestination,
    BuildExclusions,
    Migrate,
    Cleanup,
    Remediate,
    Done,
    Failed,
}

impl OrchestratorState {
    fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ConnectSource => "connect_source",
            Self::Profile => "profile",
            Self::Recommend => "recommend",
            Self::Provision => "provision",
            Self::ConnectDestination => "connect_destination",
            Self::BuildExclusions => "build_exclusions",
            Self::Migrate => "migrate",
            Self::Cleanup => "cleanup",
            Self::Remediate => "remediate",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// What a completed run produced, for the CLI to report to the operator.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub source_profile: Profile,
    pub destination_profile: Profile,
    pub destination_endpoint: HostEndpoint,
    pub flavor_recommendation: Option<FlavorRecommendation>,
}

/// Drives one migration from a [`MigrationRequest`] to completion.
///
/// Holds the catalog and policy collaborators; the caller supplies the
/// Sessions' [`Transport`] instances (and a factory for the one C11 might
/// need after provisioning), since this crate has no opinion on how a
/// Transport is actually wired up.
pub struct Orchestrator<C: Clock = SystemClock> {
    policy: Policy,
    flavors: FlavorCatalog,
    images: ImageCatalog,
    clock: C,
}

impl Orchestrator<SystemClock> {
    /// The V2 (current) catalog and compiled-in policy defaults, real time.
    pub fn new() -> Self {
        Self {
            policy: Policy::new(),
            flavors: v2::flavors(),
            images: v2::images(),
            clock: SystemClock,
        }
    }
}

impl Default for Orchestrator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Orchestrator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            policy: Policy::new(),
            flavors: v2::flavors(),
            images: v2::images(),
            clock,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_catalog(mut self, flavors: FlavorCatalog, images: ImageCatalog) -> Self {
        self.flavors = flavors;
        self.images = images;
        self
    }

    fn enter(&self, from: OrchestratorState, to: OrchestratorState, since: std::time::Instant) {
        let elapsed = self.clock.now().saturating_duration_since(since);
        tracing::info!(
            from = from.label(),
            to = to.label(),
            elapsed_ms = elapsed.as_millis() as u64,
            "orchestrator state transition"
        );
    }

    /// Run a full migration: connect to the source, profile it, recommend
    /// (and optionally provision) a destination, sync, clean up, and
    /// remediate IPs. `source_transport` backs the source Session;
    /// `destination_transport` backs a pre-existing destination (resume
    /// mode); `provision_transport` builds a Transport for a freshly
    /// provisioned destination's [`HostEndpoint`].
    pub async fn run<T, F>(
        &self,
        request: MigrationRequest,
        provisioner: &dyn Provisioner,
        source_transport: T,
        destination_transport: Option<T>,
        provision_transport: F,
    ) -> Result<Outcome, EngineError>
    where
        T: Transport,
        F: FnOnce(HostEndpoint) -> T,
    {
        let mut state = OrchestratorState::Start;
        let mut since = self.clock.now();

        macro_rules! advance {
            ($next:expr) => {{
                let next = $next;
                self.enter(state, next, since);
                state = next;
                since = self.clock.now();
            }};
        }

        macro_rules! track {
            ($e:expr) => {
                match $e {
                    Ok(value) => value,
                    Err(err) => {
                        self.enter(state, OrchestratorState::Failed, since);
                        return Err(EngineError::from(err));
                    }
                }
            };
        }

        advance!(OrchestratorState::ConnectSource);
        let source = track!(Session::open(request.source.clone(), source_transport).await);
        let source = Arc::new(source);

        advance!(OrchestratorState::Profile);
        let source_profile = cloudflock_profiler::profile_host(&*source).await;

        advance!(OrchestratorState::Recommend);
        let cleanup_plan = self.policy.cleanup_plan_for(&source_profile.cpe);
        let (provision_request, flavor_recommendation) = match &request.provision {
            Some(existing) => (existing.clone(), None),
            None if request.resume => (ProvisionRequest::new("", "", "", DEFAULT_REGION), None),
            None => {
                let (built, rec) = track!(self.recommend(&source_profile));
                (built, Some(rec))
            }
        };

        let (destination, destination_endpoint) = if request.resume {
            advance!(OrchestratorState::ConnectDestination);
            let endpoint = track!(request.destination.clone().ok_or(EngineError::ResumeWithoutDestination));
            let transport = track!(destination_transport.ok_or(EngineError::ResumeWithoutDestination));
            let session = track!(Session::open(endpoint.clone(), transport).await);
            (session, endpoint)
        } else {
            advance!(OrchestratorState::Provision);
            let (instance_id, endpoint) = track!(provisioner.create_instance(&provision_request).await);
            track!(provisioner.wait_until_ready(&instance_id).await);
            track!(provisioner.wait_until_managed_automation_done(&instance_id).await);

            advance!(OrchestratorState::ConnectDestination);
            let transport = provision_transport(endpoint.clone());
            let session = track!(Session::open(endpoint.clone(), transport).await);
            (session, endpoint)
        };
        let destination = Arc::new(destination);

        advance!(OrchestratorState::BuildExclusions);
        let exclusions = self.build_exclusions(&source_profile);

        advance!(OrchestratorState::Migrate);
        track!(migrate::run(Arc::clone(&source), Arc::clone(&destination), &exclusions).await);

        advance!(OrchestratorState::Cleanup);
        track!(cleanup_runner::run(&destination, &cleanup_plan).await);

        advance!(OrchestratorState::Remediate);
        let destination_profile = cloudflock_profiler::profile_host(&*destination).await;
        let pairs = remediate::build_replacement_pairs(&source_profile, &destination_profile);
        remediate::run(&destination, &pairs, &request.remediation_targets).await;

        advance!(OrchestratorState::Done);

        if let Some(mut session) = Arc::into_inner(source) {
            session.close().await;
        }
        if let Some(mut session) = Arc::into_inner(destination) {
            session.close().await;
        }

        Ok(Outcome {
            source_profile,
            destination_profile,
            destination_endpoint,
            flavor_recommendation,
        })
    }

    /// §4.4/§4.5: exclusions are built fresh right before the sync starts,
    /// from the source's own CPE (the diagram's `BuildExclusions` state).
    fn build_exclusions(&self, source_profile: &Profile) -> ExclusionList {
        self.policy.exclusions_for(&source_profile.cpe)
    }

    /// C2: size and image a destination from the source's observed demand.
    fn recommend(&self, profile: &Profile) -> Result<(ProvisionRequest, FlavorRecommendation), EngineError> {
        let mem_mib = profile.select_entry_f64("Memory", "^total_mib$").unwrap_or(0.0) as u64;
        let disk_gb = profile.select_entry_f64("Storage", "^used_gb$").unwrap_or(0.0) as u64;
        let swapping = profile.select_entry_f64("Memory", "^swap_used_mib$").unwrap_or(0.0) > 0.0;

        let recommendation = self.flavors.flavor_for(mem_mib, disk_gb, swapping)?;
        let image_id = self
            .images
            .image_for(&profile.cpe, true)
            .or_else(|| self.images.image_for(&profile.cpe, false))
            .ok_or_else(|| EngineError::NoImage {
                vendor: profile.cpe.vendor.clone(),
                product: profile.cpe.product.clone(),
                version: profile.cpe.version.clone(),
            })?
            .to_string();

        let display_name = profile
            .get_section("System")
            .and_then(|s| s.get("hostname"))
            .filter(|h| !h.is_empty())
            .unwrap_or("cloudflock-migration")
            .to_string();

        let request = ProvisionRequest::new(image_id, recommendation.flavor.id.clone(), display_name, DEFAULT_REGION);
        Ok((request, recommendation))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
