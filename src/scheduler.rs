use std::sync::Arc;

use crate::state::AppState;
use crate::surface::DisplaySurface;
use crate::system::collector::ProcessSource;
use crate::system::platform::Capabilities;
use crate::system::services::{ServiceBackend, ServiceRecord};
use crate::system::snapshot::{Snapshot, SnapshotCache, SystemSummary};
use crate::view::service::ServiceListing;
use crate::view::{self, ViewId, ViewInput, selection};

pub const DEFAULT_SERVICE_REFRESH_EVERY: u32 = 5;

/// What one tick actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub snapshot_refreshed: bool,
    pub services_refreshed: bool,
}

/// Drives collection and pushes every view to the display surface.
///
/// Runs on the UI thread: a tick finishes before the next event is handled.
pub struct Scheduler<P, S> {
    source: P,
    services: S,
    capabilities: Capabilities,
    cache: SnapshotCache,
    service_list: Vec<ServiceRecord>,
    services_counter: u32,
    service_refresh_every: u32,
    cpu_count: usize,
    summary: SystemSummary,
}

impl<P: ProcessSource, S: ServiceBackend> Scheduler<P, S> {
    /// Loads the service list once so the Services view is not empty until
    /// the first throttled refresh.
    pub fn new(source: P, services: S, capabilities: Capabilities, service_refresh_every: u32) -> Self {
        let cpu_count = source.cpu_count().max(1);
        let mut scheduler = Scheduler {
            source,
            services,
            capabilities,
            cache: SnapshotCache::new(),
            service_list: Vec::new(),
            services_counter: 0,
            service_refresh_every: service_refresh_every.max(1),
            cpu_count,
            summary: SystemSummary::default(),
        };
        scheduler.refresh_services();
        scheduler
    }

    pub fn tick(&mut self, state: &mut AppState, surface: &mut dyn DisplaySurface) -> TickReport {
        let _span = tracing::debug_span!("scheduler.tick").entered();
        let mut report = TickReport::default();

        // 1. Snapshot, only while not paused.
        if state.auto_update() {
            self.refresh_snapshot();
            report.snapshot_refreshed = true;
        }

        // 2. Process-backed views, from possibly stale data.
        for view in [ViewId::Processes, ViewId::Users, ViewId::Details] {
            self.render_view(view, state, surface);
        }

        // 3. Summary, even while paused.
        self.refresh_summary(surface);

        // 4. Services, throttled and only while not paused.
        if state.auto_update() {
            self.services_counter = self.services_counter.wrapping_add(1);
            if self.services_counter % self.service_refresh_every == 0 {
                report.services_refreshed = self.refresh_services();
            }
        }
        self.render_view(ViewId::Services, state, surface);

        tracing::debug!(
            snapshot = report.snapshot_refreshed,
            services = report.services_refreshed,
            processes = self.cache.current().len(),
            "tick complete"
        );
        report
    }

    /// Re-renders every view from the cached data without collecting.
    pub fn render_views(&mut self, state: &mut AppState, surface: &mut dyn DisplaySurface) {
        for view in ViewId::ALL {
            self.render_view(view, state, surface);
        }
    }

    /// Explicit user refresh: collects even while paused.
    pub fn refresh_now(&mut self, state: &mut AppState, surface: &mut dyn DisplaySurface) {
        self.refresh_snapshot();
        self.refresh_services();
        self.render_views(state, surface);
        self.refresh_summary(surface);
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.cache.current()
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    pub fn services_counter(&self) -> u32 {
        self.services_counter
    }

    /// Both backends at once, for the action executor.
    pub fn parts_mut(&mut self) -> (&mut P, &mut S) {
        (&mut self.source, &mut self.services)
    }

    fn render_view(&self, view: ViewId, state: &mut AppState, surface: &mut dyn DisplaySurface) {
        let snapshot = self.cache.current();
        let listing = if self.capabilities.services {
            ServiceListing::Listed(&self.service_list)
        } else {
            ServiceListing::Unsupported
        };
        let input = ViewInput {
            snapshot: &snapshot,
            cpu_count: self.cpu_count,
            services: listing,
        };

        let rows = view::build_rows(view, &input, state.view(view));
        let view_state = state.view_mut(view);
        selection::preserve(&mut view_state.selected, &rows, view.layout());
        surface.render_rows(view, rows, view_state.selected.as_ref());
    }

    fn refresh_snapshot(&mut self) {
        match self.source.collect() {
            Ok(snapshot) => self.cache.replace(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "process enumeration failed, showing empty snapshot");
                self.cache.replace(Snapshot::empty());
            }
        }
    }

    fn refresh_summary(&mut self, surface: &mut dyn DisplaySurface) {
        match self.source.summary() {
            Ok(mut summary) => {
                summary.process_count = self.cache.current().len();
                self.summary = summary;
            }
            Err(err) => tracing::warn!(error = %err, "system summary unavailable, keeping last"),
        }
        surface.render_summary(&self.summary);
    }

    /// Returns whether a new list was loaded.
    fn refresh_services(&mut self) -> bool {
        if !self.capabilities.services {
            return false;
        }
        match self.services.list() {
            Ok(list) => {
                tracing::debug!(services = list.len(), "refreshed services");
                self.service_list = list;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "service enumeration failed, keeping last list");
                false
            }
        }
    }
}
