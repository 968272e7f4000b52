//! FormOrchestrator - one booking wizard session wired to its collaborators.
//!
//! Owns the session, the catalog and slot calendar, the availability
//! reconciler, and the filter state. Edits that change the availability
//! query issue a fetch right away (period, region) or after the debounce
//! delay (free text). Every fetch runs as its own task tagged with the
//! signature it was issued for; completions are applied by
//! [`FormOrchestrator::next_event`] only when that signature is still the
//! live one.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use tokio::sync::{mpsc, watch};

use super::{Debouncer, OrchestratorError};
use crate::config::WizardConfig;
use crate::domain::availability::{
    AvailabilityQuery, AvailabilityReconciler, QuerySignature, Reconciliation, SourceOrigin,
};
use crate::domain::catalog::{Catalog, Resource, ResourceFilter};
use crate::domain::foundation::{RegionId, ResourceId, SessionId};
use crate::domain::period::{Period, SlotCalendar, SlotId};
use crate::domain::selection::SelectionSet;
use crate::domain::wizard::{
    BookingDraft, BookingPayload, ClientFields, InitialBooking, ValueFields, WizardSession,
    WizardStep,
};
use crate::ports::{
    AvailabilitySource, BiWeekCalendarProvider, BookingReceipt, BookingSubmitter, CatalogSource,
    FetchError, Notice, Notifier,
};

/// Collaborators injected into the orchestrator.
#[derive(Clone)]
pub struct OrchestratorPorts {
    pub availability: Arc<dyn AvailabilitySource>,
    pub catalog: Arc<dyn CatalogSource>,
    pub calendar: Arc<dyn BiWeekCalendarProvider>,
    pub submitter: Arc<dyn BookingSubmitter>,
    pub notifier: Arc<dyn Notifier>,
}

/// Tuning for one orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub debounce: Duration,
    pub calendar_year: i32,
}

impl OrchestratorSettings {
    pub fn from_config(config: &WizardConfig) -> Self {
        Self {
            debounce: config.debounce(),
            calendar_year: config
                .calendar_year
                .unwrap_or_else(|| chrono::Utc::now().year()),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&WizardConfig::default())
    }
}

/// Outcome of processing one background completion.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    /// A fetch for the live query completed and the partition was updated.
    FetchApplied {
        signature: QuerySignature,
        origin: SourceOrigin,
    },
    /// A fetch for a superseded query completed and was ignored.
    FetchDiscarded { signature: QuerySignature },
    /// A fetch for the live query failed; the previous partition is kept.
    FetchFailed {
        signature: QuerySignature,
        error: FetchError,
    },
    /// The text-filter debounce expired and a fetch was issued.
    DebounceElapsed { signature: QuerySignature },
}

struct FetchOutcome {
    signature: QuerySignature,
    query: AvailabilityQuery,
    result: Result<Vec<Resource>, FetchError>,
}

/// Coordinates period, filters, selection, and wizard steps for one session.
pub struct FormOrchestrator {
    ports: OrchestratorPorts,
    settings: OrchestratorSettings,

    session: Option<WizardSession>,
    catalog: Catalog,
    calendar: SlotCalendar,
    reconciler: AvailabilityReconciler,

    filter: ResourceFilter,
    live_query: AvailabilityQuery,
    live_signature: QuerySignature,

    /// Query and resources behind `visible`.
    applied_query: AvailabilityQuery,
    applied_source: Vec<Resource>,
    applied_origin: SourceOrigin,
    visible: Reconciliation,

    in_flight: HashSet<QuerySignature>,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    debouncer: Debouncer<QuerySignature>,
    debounce_rx: mpsc::UnboundedReceiver<QuerySignature>,
    awaiting_debounce: Option<QuerySignature>,

    period_tx: watch::Sender<Period>,
}

/// Open draft of `session`, borrowed independently of the other fields.
fn open_draft(session: &mut Option<WizardSession>) -> Result<&mut BookingDraft, OrchestratorError> {
    let session = session.as_mut().ok_or(OrchestratorError::NoActiveSession)?;
    Ok(session.draft_mut()?)
}

impl FormOrchestrator {
    /// Creates an orchestrator with no open session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(ports: OrchestratorPorts, settings: OrchestratorSettings) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (debounce_tx, debounce_rx) = mpsc::unbounded_channel();
        let (period_tx, _) = watch::channel(Period::default());
        let live_query = AvailabilityQuery::default();
        let live_signature = live_query.signature();

        Self {
            ports,
            settings,
            session: None,
            catalog: Catalog::default(),
            calendar: SlotCalendar::new(),
            reconciler: AvailabilityReconciler::new(),
            filter: ResourceFilter::default(),
            applied_query: live_query.clone(),
            live_query,
            live_signature,
            applied_source: Vec::new(),
            applied_origin: SourceOrigin::NoWindow,
            visible: Reconciliation::empty(),
            in_flight: HashSet::new(),
            fetch_tx,
            fetch_rx,
            debouncer: Debouncer::new(settings.debounce, debounce_tx),
            debounce_rx,
            awaiting_debounce: None,
            period_tx,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Session lifecycle
    // ════════════════════════════════════════════════════════════════════════

    /// Opens a fresh session, or an edit session seeded from `initial`.
    ///
    /// Any previous session is discarded. Loads the catalog and the slot
    /// calendar; load failures are notified and leave those tables empty.
    pub async fn open(&mut self, initial: Option<InitialBooking>) -> SessionId {
        self.debouncer.cancel();
        self.awaiting_debounce = None;
        self.filter = ResourceFilter::default();
        self.applied_source.clear();
        self.applied_origin = SourceOrigin::NoWindow;
        self.visible = Reconciliation::empty();

        let mut session = match &initial {
            Some(initial) => WizardSession::from_initial(initial),
            None => WizardSession::new(),
        };
        let id = session.id();

        let mut years = vec![self.settings.calendar_year];
        for slot in session.draft().period.slot_ids() {
            if !years.contains(&slot.year()) {
                years.push(slot.year());
            }
        }

        let everything = ResourceFilter::default();
        let (catalog, calendars) = futures::join!(
            self.ports.catalog.fetch_catalog(&everything),
            futures::future::join_all(years.iter().map(|y| self.ports.calendar.slots_for_year(*y)))
        );

        match catalog {
            Ok(resources) => self.catalog = Catalog::new(resources),
            Err(err) => {
                tracing::warn!(error = %err, "catalog load failed");
                self.notify_fetch_error("catalog", &err);
                self.catalog = Catalog::default();
            }
        }

        self.calendar = SlotCalendar::new();
        for (year, result) in years.iter().zip(calendars) {
            match result {
                Ok(slots) => self.calendar.merge(slots),
                Err(err) => {
                    tracing::warn!(year, error = %err, "calendar load failed");
                    self.notify_fetch_error("bi-week calendar", &err);
                }
            }
        }

        self.rederive_restored_period(&mut session);

        tracing::info!(
            session_id = %id,
            editing = ?session.editing(),
            catalog = self.catalog.len(),
            slots = self.calendar.len(),
            "wizard session opened"
        );
        self.session = Some(session);
        self.publish_period();
        self.refresh_now();
        id
    }

    /// Replaces stored slot dates with the ones the calendar derives.
    ///
    /// Slots missing from the table keep the stored dates and are notified.
    fn rederive_restored_period(&self, session: &mut WizardSession) {
        let Ok(draft) = session.draft_mut() else {
            return;
        };
        if draft.period.slot_ids().is_empty() {
            return;
        }
        if let Err(err) = draft.period.rederive(&self.calendar) {
            tracing::warn!(error = %err, "stored bi-weeks not in calendar, keeping stored dates");
            self.ports.notifier.notify(Notice::warning(format!(
                "Stored bi-weeks could not be checked against the calendar: {}",
                err
            )));
        }
    }

    /// Loads another calendar year into the slot table.
    pub async fn load_calendar_year(&mut self, year: i32) -> Result<usize, OrchestratorError> {
        if self.calendar.contains_year(year) {
            return Ok(0);
        }
        match self.ports.calendar.slots_for_year(year).await {
            Ok(slots) => {
                let count = slots.len();
                self.calendar.merge(slots);
                Ok(count)
            }
            Err(err) => {
                self.notify_fetch_error("bi-week calendar", &err);
                Ok(0)
            }
        }
    }

    /// Validates every step, stores the booking, and closes the session.
    ///
    /// On a storage failure the session stays open so the user can retry.
    pub async fn submit(&mut self) -> Result<BookingReceipt, OrchestratorError> {
        let session = self.session.as_ref().ok_or(OrchestratorError::NoActiveSession)?;
        let payload = session.prepare_submission()?;
        let editing = session.editing().cloned();
        let session_id = session.id();

        let submitter = Arc::clone(&self.ports.submitter);
        let receipt = match submitter.submit(editing.as_ref(), &payload).await {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "booking submission failed");
                self.ports
                    .notifier
                    .notify(Notice::error(format!("Booking could not be saved: {}", err)));
                return Err(err.into());
            }
        };

        if let Some(session) = self.session.as_mut() {
            session.mark_submitted()?;
        }
        tracing::info!(
            session_id = %session_id,
            booking_id = %receipt.booking_id,
            "booking submitted"
        );
        self.ports
            .notifier
            .notify(Notice::info(format!("Booking {} saved", receipt.booking_id)));
        self.close();
        Ok(receipt)
    }

    /// Discards the session without emitting a payload.
    pub fn cancel(&mut self) -> Result<(), OrchestratorError> {
        let session = self.session.as_mut().ok_or(OrchestratorError::NoActiveSession)?;
        session.cancel()?;
        tracing::info!(session_id = %session.id(), "wizard session cancelled");
        self.close();
        Ok(())
    }

    fn close(&mut self) {
        self.session = None;
        self.debouncer.cancel();
        self.awaiting_debounce = None;
        self.visible = Reconciliation::empty();
        self.applied_source.clear();
        self.rebuild_query();
    }

    // ════════════════════════════════════════════════════════════════════════
    // Field edits
    // ════════════════════════════════════════════════════════════════════════

    pub fn set_client_fields(&mut self, client: ClientFields) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.client = client;
        Ok(())
    }

    pub fn set_value_fields(&mut self, values: ValueFields) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.values = values;
        Ok(())
    }

    /// Sets a free date range; the period becomes range-based.
    pub fn set_range(
        &mut self,
        start_date: Option<chrono::NaiveDate>,
        end_date: Option<chrono::NaiveDate>,
    ) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?
            .period
            .set_range(start_date, end_date);
        self.after_period_change();
        Ok(())
    }

    pub fn switch_to_slots(&mut self) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.period.switch_to_slots();
        self.after_period_change();
        Ok(())
    }

    pub fn switch_to_range(&mut self) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.period.switch_to_range();
        self.after_period_change();
        Ok(())
    }

    /// Adds a bi-week slot; dates are re-derived before this returns.
    pub fn add_slot(&mut self, id: SlotId) -> Result<bool, OrchestratorError> {
        let added = open_draft(&mut self.session)?
            .period
            .add_slot(id, &self.calendar)?;
        if added {
            self.after_period_change();
        }
        Ok(added)
    }

    pub fn remove_slot(&mut self, id: SlotId) -> Result<bool, OrchestratorError> {
        let removed = open_draft(&mut self.session)?
            .period
            .remove_slot(id, &self.calendar)?;
        if removed {
            self.after_period_change();
        }
        Ok(removed)
    }

    pub fn set_slots(&mut self, ids: &[SlotId]) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?
            .period
            .set_slots(ids, &self.calendar)?;
        self.after_period_change();
        Ok(())
    }

    pub fn clear_period(&mut self) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.period.clear();
        self.after_period_change();
        Ok(())
    }

    /// Region changes refetch immediately.
    pub fn set_region_filter(&mut self, region: Option<RegionId>) -> Result<(), OrchestratorError> {
        self.require_open()?;
        self.filter.region = region;
        self.debouncer.cancel();
        self.awaiting_debounce = None;
        self.refresh_now();
        Ok(())
    }

    /// Text changes refetch after the debounce delay.
    ///
    /// The live signature changes at once, so any fetch still in flight for
    /// the previous text is discarded when it lands.
    pub fn set_text_filter(&mut self, text: Option<String>) -> Result<(), OrchestratorError> {
        self.require_open()?;
        self.filter = ResourceFilter::new(self.filter.region.clone(), text);
        let previous = self.live_signature.clone();
        self.rebuild_query();
        if self.live_signature == previous {
            return Ok(());
        }
        tracing::debug!(signature = %self.live_signature, "text filter changed, debouncing");
        self.awaiting_debounce = Some(self.live_signature.clone());
        self.debouncer.schedule(self.live_signature.clone());
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Selection
    // ════════════════════════════════════════════════════════════════════════

    /// Adds a resource to the selection and re-partitions locally.
    pub fn add_resource(&mut self, id: ResourceId) -> Result<bool, OrchestratorError> {
        let added = open_draft(&mut self.session)?.selection.add(id);
        if added {
            self.repartition();
        }
        Ok(added)
    }

    pub fn remove_resource(&mut self, id: &ResourceId) -> Result<bool, OrchestratorError> {
        let removed = open_draft(&mut self.session)?.selection.remove(id);
        if removed {
            self.repartition();
        }
        Ok(removed)
    }

    /// Selects every resource currently shown as available.
    pub fn select_all_available(&mut self) -> Result<usize, OrchestratorError> {
        let ids: Vec<ResourceId> = self.visible.available.iter().map(|r| r.id.clone()).collect();
        let added = open_draft(&mut self.session)?.selection.add_all(ids);
        if added > 0 {
            self.repartition();
        }
        Ok(added)
    }

    pub fn clear_selection(&mut self) -> Result<(), OrchestratorError> {
        open_draft(&mut self.session)?.selection.clear();
        self.repartition();
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Navigation
    // ════════════════════════════════════════════════════════════════════════

    pub fn next_step(&mut self) -> Result<WizardStep, OrchestratorError> {
        let session = self.session.as_mut().ok_or(OrchestratorError::NoActiveSession)?;
        Ok(session.next()?)
    }

    pub fn prev_step(&mut self) -> Result<WizardStep, OrchestratorError> {
        let session = self.session.as_mut().ok_or(OrchestratorError::NoActiveSession)?;
        Ok(session.prev())
    }

    /// Builds the payload from the current draft without submitting.
    pub fn payload_preview(&self) -> Result<BookingPayload, OrchestratorError> {
        let draft = self.session()?.draft();
        Ok(BookingPayload::assemble(
            &draft.period,
            &draft.selection,
            &draft.client,
            &draft.values,
        )?)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Background work
    // ════════════════════════════════════════════════════════════════════════

    /// Issues a fetch for the live query now, skipping any debounce.
    ///
    /// A query without a window is not sent; the partition is recomputed with
    /// an empty available set instead.
    pub fn refresh_now(&mut self) {
        self.rebuild_query();
        let query = self.live_query.clone();
        let signature = self.live_signature.clone();

        if !query.has_window() {
            self.applied_query = query;
            self.applied_source.clear();
            self.applied_origin = SourceOrigin::NoWindow;
            self.repartition();
            return;
        }
        if !self.in_flight.insert(signature.clone()) {
            tracing::debug!(signature = %signature, "fetch already in flight");
            return;
        }

        tracing::debug!(signature = %signature, "fetching availability");
        let source = Arc::clone(&self.ports.availability);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_available(&query).await;
            // Receiver is gone only if the orchestrator was dropped
            let _ = tx.send(FetchOutcome {
                signature,
                query,
                result,
            });
        });
    }

    /// Returns true while a fetch or a debounce timer is outstanding.
    pub fn has_pending_work(&self) -> bool {
        !self.in_flight.is_empty() || self.awaiting_debounce.is_some()
    }

    /// Waits for the next background completion and applies it.
    ///
    /// Returns `None` immediately when nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<OrchestratorEvent> {
        loop {
            if !self.has_pending_work() {
                return None;
            }
            tokio::select! {
                Some(outcome) = self.fetch_rx.recv() => return Some(self.apply_outcome(outcome)),
                Some(signature) = self.debounce_rx.recv() => {
                    if let Some(event) = self.on_debounce(signature) {
                        return Some(event);
                    }
                }
                else => return None,
            }
        }
    }

    /// Processes events until nothing is outstanding.
    pub async fn settle(&mut self) -> Vec<OrchestratorEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    /// Starts the fetch for an elapsed timer. Timers that were superseded
    /// after firing are dropped without an event.
    fn on_debounce(&mut self, signature: QuerySignature) -> Option<OrchestratorEvent> {
        if self.awaiting_debounce.as_ref() != Some(&signature) {
            tracing::trace!(signature = %signature, "ignoring superseded debounce timer");
            return None;
        }
        self.awaiting_debounce = None;
        if signature == self.live_signature {
            self.refresh_now();
        }
        Some(OrchestratorEvent::DebounceElapsed { signature })
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) -> OrchestratorEvent {
        let FetchOutcome {
            signature,
            query,
            result,
        } = outcome;
        self.in_flight.remove(&signature);

        if signature != self.live_signature || self.session.is_none() {
            tracing::debug!(signature = %signature, "discarding superseded availability answer");
            return OrchestratorEvent::FetchDiscarded { signature };
        }

        match result {
            Ok(resources) => {
                let (source, origin) = self.reconciler.resolve_source(&signature, resources);
                self.applied_query = query;
                self.applied_source = source;
                self.applied_origin = origin;
                self.repartition();
                tracing::debug!(
                    signature = %signature,
                    ?origin,
                    available = self.visible.available.len(),
                    unavailable = self.visible.unavailable.len(),
                    "availability applied"
                );
                OrchestratorEvent::FetchApplied { signature, origin }
            }
            Err(error) => {
                tracing::warn!(signature = %signature, error = %error, "availability fetch failed");
                self.notify_fetch_error("availability", &error);
                OrchestratorEvent::FetchFailed { signature, error }
            }
        }
    }

    fn after_period_change(&mut self) {
        self.publish_period();
        self.debouncer.cancel();
        self.awaiting_debounce = None;
        self.refresh_now();
    }

    fn publish_period(&self) {
        let period = self
            .session
            .as_ref()
            .map(|s| s.draft().period.clone())
            .unwrap_or_default();
        self.period_tx.send_replace(period);
    }

    fn rebuild_query(&mut self) {
        let empty = Period::default();
        let (period, editing) = match &self.session {
            Some(session) => (&session.draft().period, session.editing().cloned()),
            None => (&empty, None),
        };
        self.live_query = AvailabilityQuery::new(period, &self.filter, editing);
        self.live_signature = self.live_query.signature();
    }

    fn repartition(&mut self) {
        let empty = SelectionSet::new();
        let selection = self
            .session
            .as_ref()
            .map(|s| &s.draft().selection)
            .unwrap_or(&empty);
        self.visible = AvailabilityReconciler::partition(
            &self.applied_source,
            self.applied_origin,
            &self.applied_query,
            &self.catalog,
            selection,
        );
    }

    fn notify_fetch_error(&self, what: &str, error: &FetchError) {
        self.ports
            .notifier
            .notify(Notice::error(format!("Could not load {}: {}", what, error)));
    }

    fn require_open(&self) -> Result<(), OrchestratorError> {
        let session = self.session()?;
        if session.status().is_mutable() {
            Ok(())
        } else {
            Err(crate::domain::wizard::WizardError::SessionClosed {
                status: session.status(),
            }
            .into())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════

    pub fn session(&self) -> Result<&WizardSession, OrchestratorError> {
        self.session.as_ref().ok_or(OrchestratorError::NoActiveSession)
    }

    pub fn current_step(&self) -> Option<WizardStep> {
        self.session.as_ref().map(|s| s.current_step())
    }

    pub fn period(&self) -> Option<&Period> {
        self.session.as_ref().map(|s| &s.draft().period)
    }

    pub fn selection(&self) -> Option<&SelectionSet> {
        self.session.as_ref().map(|s| &s.draft().selection)
    }

    /// Current available / unavailable / selected partition.
    pub fn reconciliation(&self) -> &Reconciliation {
        &self.visible
    }

    /// True while a fetch for the live query is outstanding.
    pub fn busy(&self) -> bool {
        self.in_flight.contains(&self.live_signature)
    }

    pub fn is_debouncing(&self) -> bool {
        self.awaiting_debounce.is_some()
    }

    pub fn filter(&self) -> &ResourceFilter {
        &self.filter
    }

    pub fn live_query(&self) -> &AvailabilityQuery {
        &self.live_query
    }

    pub fn live_signature(&self) -> &QuerySignature {
        &self.live_signature
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    pub fn reconciler(&self) -> &AvailabilityReconciler {
        &self.reconciler
    }

    /// Receives the current period after every period edit.
    pub fn subscribe_period(&self) -> watch::Receiver<Period> {
        self.period_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{GeneratedBiWeekCalendar, InMemoryBookingStore, RecordingNotifier};
    use crate::domain::foundation::{BookingId, ClientId, ValidationError};
    use crate::domain::wizard::WizardError;
    use crate::ports::{NoticeLevel, SubmitError};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ────────────────────────────────────────────────────────────────────────
    // Mocks
    // ────────────────────────────────────────────────────────────────────────

    fn rid(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn resource(id: &str, region: &str) -> Resource {
        Resource::new(
            rid(id),
            RegionId::new(region).unwrap(),
            format!("Panel {}", id),
            format!("{} Main St", id),
        )
    }

    fn catalog_r1_to_r5() -> Vec<Resource> {
        vec![
            resource("R1", "north"),
            resource("R2", "north"),
            resource("R3", "north"),
            resource("R4", "south"),
            resource("R5", "south"),
        ]
    }

    /// Availability answers keyed by region filter, each with a delay.
    /// Unscripted regions return the queued default answers in order.
    #[derive(Default)]
    struct ScriptedAvailability {
        by_region: Mutex<HashMap<Option<String>, (Duration, Vec<Resource>)>>,
        queue: Mutex<Vec<Result<Vec<Resource>, FetchError>>>,
        calls: Mutex<Vec<AvailabilityQuery>>,
    }

    impl ScriptedAvailability {
        fn answer_region(&self, region: Option<&str>, delay: Duration, resources: Vec<Resource>) {
            self.by_region
                .lock()
                .unwrap()
                .insert(region.map(str::to_string), (delay, resources));
        }

        fn enqueue(&self, result: Result<Vec<Resource>, FetchError>) {
            self.queue.lock().unwrap().push(result);
        }

        fn calls(&self) -> Vec<AvailabilityQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AvailabilitySource for ScriptedAvailability {
        async fn fetch_available(
            &self,
            query: &AvailabilityQuery,
        ) -> Result<Vec<Resource>, FetchError> {
            self.calls.lock().unwrap().push(query.clone());
            let region = query.region_filter.as_ref().map(|r| r.to_string());
            let scripted = self.by_region.lock().unwrap().get(&region).cloned();
            if let Some((delay, resources)) = scripted {
                tokio::time::sleep(delay).await;
                return Ok(resources);
            }
            let mut queue = self.queue.lock().unwrap();
            if queue.is_empty() {
                Ok(Vec::new())
            } else {
                queue.remove(0)
            }
        }
    }

    struct StaticCatalog(Vec<Resource>);

    #[async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch_catalog(
            &self,
            filter: &ResourceFilter,
        ) -> Result<Vec<Resource>, FetchError> {
            Ok(self.0.iter().filter(|r| filter.matches(r)).cloned().collect())
        }
    }

    struct FailingSubmitter;

    #[async_trait]
    impl BookingSubmitter for FailingSubmitter {
        async fn submit(
            &self,
            _editing: Option<&BookingId>,
            _payload: &BookingPayload,
        ) -> Result<BookingReceipt, SubmitError> {
            Err(SubmitError::Rejected {
                status: 422,
                body: "resource R1 already booked".to_string(),
            })
        }
    }

    struct Harness {
        orchestrator: FormOrchestrator,
        availability: Arc<ScriptedAvailability>,
        notifier: RecordingNotifier,
        store: InMemoryBookingStore,
    }

    fn harness_with(submitter: Option<Arc<dyn BookingSubmitter>>) -> Harness {
        let availability = Arc::new(ScriptedAvailability::default());
        let notifier = RecordingNotifier::new();
        let store = InMemoryBookingStore::new();
        let ports = OrchestratorPorts {
            availability: availability.clone(),
            catalog: Arc::new(StaticCatalog(catalog_r1_to_r5())),
            calendar: Arc::new(GeneratedBiWeekCalendar::new()),
            submitter: submitter.unwrap_or_else(|| Arc::new(store.clone())),
            notifier: Arc::new(notifier.clone()),
        };
        let settings = OrchestratorSettings {
            debounce: Duration::from_millis(300),
            calendar_year: 2026,
        };
        Harness {
            orchestrator: FormOrchestrator::new(ports, settings),
            availability,
            notifier,
            store,
        }
    }

    fn harness() -> Harness {
        harness_with(None)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sid(s: &str) -> SlotId {
        s.parse().unwrap()
    }

    fn ids(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(|r| r.id.as_str()).collect()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Tests
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn open_loads_catalog_and_calendar_without_fetching() {
        let mut h = harness();
        h.orchestrator.open(None).await;

        assert_eq!(h.orchestrator.catalog().len(), 5);
        assert_eq!(h.orchestrator.calendar().len(), 26);
        assert!(!h.orchestrator.has_pending_work());
        assert!(h.availability.calls().is_empty());
        assert_eq!(h.orchestrator.reconciliation().origin, SourceOrigin::NoWindow);
        assert_eq!(h.orchestrator.reconciliation().unavailable.len(), 5);
    }

    #[tokio::test]
    async fn slot_edits_derive_dates_and_fetch() {
        let mut h = harness();
        h.orchestrator.open(None).await;
        let mut period_rx = h.orchestrator.subscribe_period();

        h.orchestrator.add_slot(sid("2026-02")).unwrap();
        h.orchestrator.add_slot(sid("2026-04")).unwrap();

        let period = h.orchestrator.period().unwrap();
        assert_eq!(period.window(), Some((date(2026, 1, 1), date(2026, 1, 28))));
        assert!(period_rx.has_changed().unwrap());
        assert_eq!(period_rx.borrow_and_update().end_date(), Some(date(2026, 1, 28)));

        h.orchestrator.settle().await;
        let calls = h.availability.calls();
        assert!(calls.iter().any(|q| q.end_date == Some(date(2026, 1, 28))));
        assert_eq!(h.orchestrator.live_query().end_date, Some(date(2026, 1, 28)));
    }

    #[tokio::test]
    async fn partition_matches_catalog_scenario() {
        let mut h = harness();
        h.availability.enqueue(Ok(vec![resource("R1", "north"), resource("R2", "north")]));
        h.orchestrator.open(None).await;
        h.orchestrator.add_resource(rid("R1")).unwrap();
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();

        let events = h.orchestrator.settle().await;
        assert!(matches!(
            events.as_slice(),
            [OrchestratorEvent::FetchApplied { origin: SourceOrigin::Fresh, .. }]
        ));

        let visible = h.orchestrator.reconciliation();
        assert_eq!(ids(&visible.available), vec!["R2"]);
        assert_eq!(ids(&visible.unavailable), vec!["R3", "R4", "R5"]);
        assert_eq!(ids(&visible.selected), vec!["R1"]);
    }

    #[tokio::test]
    async fn empty_answer_falls_back_to_cached_list() {
        let mut h = harness();
        h.availability.enqueue(Ok(vec![resource("R1", "north"), resource("R2", "north")]));
        h.availability.enqueue(Ok(Vec::new()));
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.settle().await;

        h.orchestrator.add_resource(rid("R1")).unwrap();
        h.orchestrator.refresh_now();
        let events = h.orchestrator.settle().await;

        assert!(matches!(
            events.as_slice(),
            [OrchestratorEvent::FetchApplied { origin: SourceOrigin::StaleCache, .. }]
        ));
        assert_eq!(ids(&h.orchestrator.reconciliation().available), vec!["R2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_is_discarded_even_if_it_lands_last() {
        let mut h = harness();
        h.availability.answer_region(
            Some("north"),
            Duration::from_millis(500),
            vec![resource("R1", "north")],
        );
        h.availability.answer_region(
            Some("south"),
            Duration::from_millis(10),
            vec![resource("R4", "south")],
        );
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.settle().await;

        h.orchestrator
            .set_region_filter(Some(RegionId::new("north").unwrap()))
            .unwrap();
        h.orchestrator
            .set_region_filter(Some(RegionId::new("south").unwrap()))
            .unwrap();
        assert!(h.orchestrator.busy());

        let events = h.orchestrator.settle().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], OrchestratorEvent::FetchApplied { .. }));
        assert!(matches!(events[1], OrchestratorEvent::FetchDiscarded { .. }));
        assert_eq!(ids(&h.orchestrator.reconciliation().available), vec!["R4"]);
        assert!(!h.orchestrator.busy());
    }

    #[tokio::test(start_paused = true)]
    async fn text_filter_is_debounced() {
        let mut h = harness();
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.settle().await;
        let before = h.availability.calls().len();

        h.orchestrator.set_text_filter(Some("p".into())).unwrap();
        h.orchestrator.set_text_filter(Some("pa".into())).unwrap();
        h.orchestrator.set_text_filter(Some("pan".into())).unwrap();
        assert!(h.orchestrator.is_debouncing());
        assert_eq!(h.availability.calls().len(), before);

        h.orchestrator.settle().await;
        let calls = h.availability.calls();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(calls.last().unwrap().text_filter.as_deref(), Some("pan"));
    }

    #[tokio::test]
    async fn fetch_error_is_notified_once_and_keeps_state() {
        let mut h = harness();
        h.availability.enqueue(Ok(vec![resource("R2", "north")]));
        h.availability.enqueue(Err(FetchError::Network("connection reset".into())));
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.settle().await;

        h.orchestrator
            .set_range(Some(date(2026, 4, 1)), Some(date(2026, 4, 30)))
            .unwrap();
        let events = h.orchestrator.settle().await;

        assert!(matches!(events.as_slice(), [OrchestratorEvent::FetchFailed { .. }]));
        assert_eq!(h.notifier.count(), 1);
        assert_eq!(h.notifier.notices()[0].level, NoticeLevel::Error);
        assert_eq!(ids(&h.orchestrator.reconciliation().available), vec!["R2"]);
    }

    #[tokio::test]
    async fn full_flow_submits_and_closes_session() {
        let mut h = harness();
        h.availability.enqueue(Ok(vec![resource("R2", "north"), resource("R3", "north")]));
        h.orchestrator.open(None).await;

        assert!(h.orchestrator.next_step().is_err());
        h.orchestrator
            .set_client_fields(ClientFields {
                client_id: Some(ClientId::new("C-1").unwrap()),
                ..Default::default()
            })
            .unwrap();
        h.orchestrator.set_slots(&[sid("2026-02"), sid("2026-04")]).unwrap();
        h.orchestrator.settle().await;
        assert_eq!(h.orchestrator.next_step().unwrap(), WizardStep::Resources);

        let err = h.orchestrator.next_step().unwrap_err();
        assert_eq!(err.validation_errors(), vec![ValidationError::EmptySelection]);
        assert_eq!(h.orchestrator.select_all_available().unwrap(), 2);
        assert_eq!(h.orchestrator.next_step().unwrap(), WizardStep::Values);

        h.orchestrator
            .set_value_fields(ValueFields {
                unit_price_cents: Some(90_000),
                ..Default::default()
            })
            .unwrap();
        let preview = h.orchestrator.payload_preview().unwrap();
        assert_eq!(preview.start_date, date(2026, 1, 1));

        let receipt = h.orchestrator.submit().await.unwrap();
        let stored = h.store.get(&receipt.booking_id).await.unwrap();
        assert_eq!(stored, preview);
        assert!(matches!(
            h.orchestrator.session(),
            Err(OrchestratorError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn rejected_submission_keeps_session_open() {
        let mut h = harness_with(Some(Arc::new(FailingSubmitter)));
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_client_fields(ClientFields {
                client_id: Some(ClientId::new("C-1").unwrap()),
                ..Default::default()
            })
            .unwrap();
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.next_step().unwrap();
        h.orchestrator.add_resource(rid("R1")).unwrap();
        h.orchestrator.next_step().unwrap();
        h.orchestrator
            .set_value_fields(ValueFields {
                unit_price_cents: Some(1),
                ..Default::default()
            })
            .unwrap();

        let err = h.orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Submit(SubmitError::Rejected { .. })));
        assert!(h.orchestrator.session().is_ok());
        assert_eq!(h.notifier.count(), 1);
    }

    #[tokio::test]
    async fn submit_before_last_step_is_refused() {
        let mut h = harness();
        h.orchestrator.open(None).await;
        let err = h.orchestrator.submit().await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Wizard(WizardError::NotAtFinalStep { .. })
        ));
    }

    #[tokio::test]
    async fn cancel_discards_session() {
        let mut h = harness();
        h.orchestrator.open(None).await;
        h.orchestrator.cancel().unwrap();

        assert!(h.orchestrator.session().is_err());
        assert!(matches!(
            h.orchestrator.add_resource(rid("R1")),
            Err(OrchestratorError::NoActiveSession)
        ));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn edit_mode_excludes_own_booking_and_preselects() {
        let mut h = harness();
        let initial: InitialBooking = serde_json::from_value(serde_json::json!({
            "bookingId": "B-7",
            "clientId": "C-1",
            "periodType": "customizado",
            "dataInicio": "2026-05-01",
            "dataFim": "2026-05-31",
            "resourceIds": ["R3", "R9"]
        }))
        .unwrap();

        h.orchestrator.open(Some(initial)).await;
        h.orchestrator.settle().await;

        let calls = h.availability.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].exclude_booking_id.as_ref().map(|b| b.as_str()),
            Some("B-7")
        );

        let selected = &h.orchestrator.reconciliation().selected;
        assert_eq!(ids(selected), vec!["R3", "R9"]);
        assert_eq!(selected[1].label, "R9");
    }

    #[tokio::test]
    async fn edit_mode_derives_slot_dates_from_calendar() {
        let mut h = harness();
        let initial: InitialBooking = serde_json::from_value(serde_json::json!({
            "bookingId": "B-8",
            "clientId": "C-1",
            "periodType": "quinzenal",
            "dataInicio": "2026-03-01",
            "bi_week_ids": ["2026-04", "2026-02"],
            "resourceIds": ["R1"]
        }))
        .unwrap();

        h.orchestrator.open(Some(initial)).await;
        h.orchestrator.settle().await;

        let period = h.orchestrator.period().unwrap();
        assert_eq!(period.window(), Some((date(2026, 1, 1), date(2026, 1, 28))));
        assert_eq!(
            h.orchestrator.live_query().start_date,
            Some(date(2026, 1, 1))
        );
        assert_eq!(h.orchestrator.next_step().unwrap(), WizardStep::Resources);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_superseded_after_firing_yields_no_event() {
        let mut h = harness();
        h.orchestrator.open(None).await;
        h.orchestrator
            .set_range(Some(date(2026, 3, 1)), Some(date(2026, 3, 31)))
            .unwrap();
        h.orchestrator.settle().await;
        let before = h.availability.calls().len();

        h.orchestrator.set_text_filter(Some("p".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        h.orchestrator.set_text_filter(Some("pa".into())).unwrap();
        let live = h.orchestrator.live_signature().clone();

        let events = h.orchestrator.settle().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            OrchestratorEvent::DebounceElapsed { signature } if *signature == live
        ));
        assert!(matches!(events[1], OrchestratorEvent::FetchApplied { .. }));

        let calls = h.availability.calls();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(calls.last().unwrap().text_filter.as_deref(), Some("pa"));
    }
}
