//! Integration tests for the booking wizard.
//!
//! These tests drive a `FormOrchestrator` end to end:
//! 1. A first booking is made over two bi-weeks and stored
//! 2. A second session sees the booked resources as unavailable
//! 3. Editing the first booking does not block its own resources
//!
//! Uses the in-memory adapters so no backend is required.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use placement_booking::adapters::{
    GeneratedBiWeekCalendar, InMemoryBookingStore, InMemoryInventory, RecordingNotifier,
};
use placement_booking::application::{
    FormOrchestrator, OrchestratorEvent, OrchestratorPorts, OrchestratorSettings,
};
use placement_booking::domain::availability::SourceOrigin;
use placement_booking::domain::catalog::Resource;
use placement_booking::domain::foundation::{ClientId, Percentage, RegionId, ResourceId};
use placement_booking::domain::period::{LegacyPeriodKind, PeriodKind, SlotId};
use placement_booking::domain::wizard::{ClientFields, InitialBooking, ValueFields, WizardStep};
use placement_booking::ports::FetchError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn rid(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

fn sid(s: &str) -> SlotId {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn inventory() -> InMemoryInventory {
    InMemoryInventory::new(vec![
        Resource::new(
            rid("R1"),
            RegionId::new("centro").unwrap(),
            "Av. Paulista 1000",
            "Av. Paulista, 1000",
        ),
        Resource::new(
            rid("R2"),
            RegionId::new("centro").unwrap(),
            "Praca da Se",
            "Praca da Se, s/n",
        ),
        Resource::new(rid("R3"), RegionId::new("zona-sul").unwrap(), "Marginal Pinheiros", "Km 12"),
        Resource::new(
            rid("R4"),
            RegionId::new("zona-sul").unwrap(),
            "Av. Santo Amaro",
            "Av. Santo Amaro, 500",
        ),
    ])
}

struct World {
    inventory: InMemoryInventory,
    store: InMemoryBookingStore,
    notifier: RecordingNotifier,
}

impl World {
    fn new() -> Self {
        let inventory = inventory();
        let store = InMemoryBookingStore::new().linked_to(inventory.clone());
        Self {
            inventory,
            store,
            notifier: RecordingNotifier::new(),
        }
    }

    fn orchestrator(&self) -> FormOrchestrator {
        let ports = OrchestratorPorts {
            availability: Arc::new(self.inventory.clone()),
            catalog: Arc::new(self.inventory.clone()),
            calendar: Arc::new(GeneratedBiWeekCalendar::new()),
            submitter: Arc::new(self.store.clone()),
            notifier: Arc::new(self.notifier.clone()),
        };
        FormOrchestrator::new(
            ports,
            OrchestratorSettings {
                debounce: Duration::from_millis(300),
                calendar_year: 2026,
            },
        )
    }
}

fn available_ids(orchestrator: &FormOrchestrator) -> Vec<String> {
    orchestrator
        .reconciliation()
        .available
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

fn unavailable_ids(orchestrator: &FormOrchestrator) -> Vec<String> {
    orchestrator
        .reconciliation()
        .unavailable
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

async fn fill_first_step(orchestrator: &mut FormOrchestrator, client: &str) {
    orchestrator
        .set_client_fields(ClientFields {
            client_id: Some(ClientId::new(client).unwrap()),
            campaign_name: Some("Summer".to_string()),
            contract_id: None,
        })
        .unwrap();
    orchestrator.set_slots(&[sid("2026-02"), sid("2026-04")]).unwrap();
    orchestrator.settle().await;
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn bi_week_booking_is_stored_with_both_period_shapes() {
    let world = World::new();
    let mut wizard = world.orchestrator();
    wizard.open(None).await;

    fill_first_step(&mut wizard, "C-100").await;
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Resources);
    assert_eq!(available_ids(&wizard), vec!["R1", "R2", "R3", "R4"]);

    wizard.add_resource(rid("R1")).unwrap();
    wizard.add_resource(rid("R3")).unwrap();
    wizard.add_resource(rid("R1")).unwrap();
    assert_eq!(available_ids(&wizard), vec!["R2", "R4"]);
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Values);

    wizard
        .set_value_fields(ValueFields {
            unit_price_cents: Some(250_000),
            discount: Percentage::new(10),
            notes: None,
        })
        .unwrap();
    let receipt = wizard.submit().await.unwrap();

    let stored = world.store.get(&receipt.booking_id).await.unwrap();
    assert_eq!(stored.period_type, PeriodKind::SlotBased);
    assert_eq!(stored.legacy_period_type, LegacyPeriodKind::BiWeekly);
    assert_eq!(stored.start_date, date(2026, 1, 1));
    assert_eq!(stored.end_date, date(2026, 1, 28));
    assert_eq!(stored.legacy_start_date, stored.start_date);
    assert_eq!(stored.legacy_end_date, stored.end_date);
    assert_eq!(stored.bi_week_ids, vec![sid("2026-02"), sid("2026-04")]);
    assert_eq!(stored.resource_ids, vec![rid("R1"), rid("R3")]);
}

#[tokio::test]
async fn booked_resources_show_as_unavailable_to_the_next_session() {
    let world = World::new();
    world
        .inventory
        .book(
            &"B-1".parse().unwrap(),
            &[rid("R2")],
            date(2026, 1, 10),
            date(2026, 1, 20),
        )
        .await;

    let mut wizard = world.orchestrator();
    wizard.open(None).await;
    fill_first_step(&mut wizard, "C-200").await;

    assert_eq!(available_ids(&wizard), vec!["R1", "R3", "R4"]);
    assert_eq!(unavailable_ids(&wizard), vec!["R2"]);
}

#[tokio::test]
async fn editing_a_booking_keeps_its_own_resources_available() {
    let world = World::new();
    let mut first = world.orchestrator();
    first.open(None).await;
    fill_first_step(&mut first, "C-300").await;
    first.next_step().unwrap();
    first.add_resource(rid("R4")).unwrap();
    first.next_step().unwrap();
    first
        .set_value_fields(ValueFields {
            unit_price_cents: Some(1_000),
            ..Default::default()
        })
        .unwrap();
    let receipt = first.submit().await.unwrap();
    let stored = world.store.get(&receipt.booking_id).await.unwrap();

    let legacy_json = serde_json::json!({
        "bookingId": receipt.booking_id.to_string(),
        "clientId": "C-300",
        "unitPriceCents": 1000,
        "periodType": "quinzenal",
        "dataInicio": stored.legacy_start_date,
        "dataFim": stored.legacy_end_date,
        "bi_week_ids": stored.bi_week_ids,
        "resourceIds": stored.resource_ids,
    });
    let initial: InitialBooking = serde_json::from_value(legacy_json).unwrap();

    let mut edit = world.orchestrator();
    edit.open(Some(initial)).await;
    edit.settle().await;

    let selected: Vec<String> = edit
        .reconciliation()
        .selected
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(selected, vec!["R4"]);
    edit.remove_resource(&rid("R4")).unwrap();
    assert!(available_ids(&edit).contains(&"R4".to_string()));

    // A fresh session over the same window sees R4 as taken.
    let mut other = world.orchestrator();
    other.open(None).await;
    fill_first_step(&mut other, "C-301").await;
    assert_eq!(unavailable_ids(&other), vec!["R4"]);
}

#[tokio::test]
async fn outage_is_notified_and_previous_partition_is_kept() {
    let world = World::new();
    let mut wizard = world.orchestrator();
    wizard.open(None).await;
    fill_first_step(&mut wizard, "C-400").await;
    let before = available_ids(&wizard);

    world
        .inventory
        .fail_with(Some(FetchError::Server {
            status: 503,
            body: "maintenance".to_string(),
        }))
        .await;
    wizard
        .set_region_filter(Some(RegionId::new("zona-sul").unwrap()))
        .unwrap();
    let events = wizard.settle().await;

    assert!(matches!(events.as_slice(), [OrchestratorEvent::FetchFailed { .. }]));
    assert_eq!(available_ids(&wizard), before);
    assert_eq!(world.notifier.count(), 1);

    world.inventory.fail_with(None).await;
    wizard.refresh_now();
    let events = wizard.settle().await;
    assert!(matches!(
        events.as_slice(),
        [OrchestratorEvent::FetchApplied {
            origin: SourceOrigin::Fresh,
            ..
        }]
    ));
    assert_eq!(available_ids(&wizard), vec!["R3", "R4"]);
}

#[tokio::test(start_paused = true)]
async fn typing_fast_issues_a_single_fetch() {
    let world = World::new();
    let mut wizard = world.orchestrator();
    wizard.open(None).await;
    fill_first_step(&mut wizard, "C-500").await;
    let calls_before = world.inventory.availability_calls();

    for text in ["a", "av", "av.", "av. p"] {
        wizard.set_text_filter(Some(text.to_string())).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    wizard.settle().await;

    assert_eq!(world.inventory.availability_calls(), calls_before + 1);
    assert_eq!(available_ids(&wizard), vec!["R1"]);
}
