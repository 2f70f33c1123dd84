/*!
 * Tests for per-container scheduling and write-back
 */

use serde_json::{json, Value};
use std::time::Duration;

use rpgtl::providers::mock::MockTranslator;
use rpgtl::translation::{AnomalyLog, ContainerMode};

use crate::common::{self, answer, choices, end, line_of, show_text, text};

const WIDE: ContainerMode = ContainerMode::Reflow { max_width: 40 };

/// A run is written back line by line, surplus slots are emptied
#[tokio::test]
async fn test_translate_container_withThreeLineRun_shouldPadWithEmptyStrings() {
    let mock = MockTranslator::dictionary([("uno due tre", "one two three four five")]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("uno"), text("due"), text("tre")];

    let count = scheduler
        .translate_container(&mut nodes, ContainerMode::Reflow { max_width: 14 })
        .await;

    assert_eq!(count, 1);
    assert_eq!(line_of(&nodes[0]), "one two three");
    assert_eq!(line_of(&nodes[1]), "four five");
    assert_eq!(line_of(&nodes[2]), "");
    assert_eq!(mock.requests(), vec!["uno due tre"]);
}

/// Lines beyond the available slots are kept on the last node
#[tokio::test]
async fn test_translate_container_withMoreLinesThanSlots_shouldKeepOverflow() {
    let mock = MockTranslator::dictionary([("uno due", "one two three four")]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("uno"), text("due")];

    scheduler
        .translate_container(&mut nodes, ContainerMode::Reflow { max_width: 5 })
        .await;

    assert_eq!(line_of(&nodes[0]), "one");
    assert_eq!(line_of(&nodes[1]), "two three four");
}

/// Choices and answers are independent units
#[tokio::test]
async fn test_translate_container_withChoicesAndAnswers_shouldTranslateEach() {
    let mock = MockTranslator::dictionary([("si", "yes"), ("no", "no"), ("Vuoi?", "Do you want to?")]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("Vuoi?"), choices(&["si", "no"]), answer(0, "si"), end(), answer(1, "no"), end()];

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 5);
    assert_eq!(line_of(&nodes[0]), "Do you want to?");
    assert_eq!(nodes[1]["parameters"], json!([["yes", "no"], 1, 0, 2, 0]));
    assert_eq!(nodes[2]["parameters"], json!([0, "yes"]));
    assert_eq!(nodes[4]["parameters"], json!([1, "no"]));
    assert_eq!(scheduler.tally().get(), 5);
}

/// A failing unit leaves its nodes untouched and is not counted
#[tokio::test]
async fn test_translate_container_withFailingProvider_shouldKeepOriginalText() {
    let mock = MockTranslator::failing();
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![show_text(), text("Ciao"), text("mondo"), choices(&["si", "no"])];
    let original = nodes.clone();

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 0);
    assert_eq!(nodes, original);
    assert_eq!(scheduler.tally().get(), 0);
    assert_eq!(scheduler.anomalies().len(), 3);
    // one run and two choices, three attempts each
    assert_eq!(mock.request_count(), 9);
}

/// Only the units that failed keep their source text
#[tokio::test]
async fn test_translate_container_withPartialDictionary_shouldTranslateKnownUnits() {
    let mock = MockTranslator::dictionary([("Ciao mondo", "Hello world"), ("si", "yes")]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("Ciao"), text("mondo"), choices(&["si", "no"])];

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 2);
    assert_eq!(nodes[2]["parameters"][0], json!(["yes", "no"]));
    assert_eq!(scheduler.anomalies().len(), 1);
    assert!(scheduler.anomalies().entries()[0].message.contains("left untranslated"));
}

/// A failed unit is reported with its scope and its source text
#[tokio::test]
async fn test_translate_container_withScopedLog_shouldReportFileAndText() {
    let mock = MockTranslator::failing();
    let log = AnomalyLog::new();
    let scheduler = common::scheduler_for(&mock).with_anomalies(log.scoped("Map007.json").scoped("/events/2/pages/0/list"));
    let mut nodes = vec![text("Il drago dorme"), end()];

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 0);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    let message = &entries[0].message;
    assert!(message.starts_with("Anomaly in Map007.json /events/2/pages/0/list at node 0:"));
    assert!(message.contains("left untranslated"));
    assert!(message.contains("\"Il drago dorme\""));
}

/// Per-line mode translates each line on its own
#[tokio::test]
async fn test_translate_container_withPerLineMode_shouldNotMerge() {
    let mock = MockTranslator::tagged();
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("Ciao"), text("mondo"), text("")];

    let count = scheduler.translate_container(&mut nodes, ContainerMode::PerLine).await;

    assert_eq!(count, 2);
    assert_eq!(line_of(&nodes[0]), "[en] Ciao");
    assert_eq!(line_of(&nodes[1]), "[en] mondo");
    assert_eq!(line_of(&nodes[2]), "");
}

/// Malformed nodes are reported and skipped
#[tokio::test]
async fn test_translate_container_withMalformedNodes_shouldLogAnomalies() {
    let mock = MockTranslator::tagged();
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![
        json!({"code": 402, "indent": 0, "parameters": [0]}),
        json!({"code": 402, "indent": 0, "parameters": [0, ""]}),
        json!({"code": 102, "indent": 0, "parameters": [["", "no"], 1, 0, 2, 0]}),
        json!({"code": 401, "indent": 0, "parameters": [12]}),
    ];

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 1);
    assert_eq!(nodes[2]["parameters"][0], json!(["", "[en] no"]));
    assert_eq!(scheduler.anomalies().len(), 4);
}

/// Write-backs follow discovery order even when answers arrive out of order
#[tokio::test]
async fn test_translate_container_withSlowProvider_shouldWriteEveryUnit() {
    let mock = MockTranslator::tagged().with_delay(Duration::from_millis(5));
    let scheduler = common::scheduler_for(&mock).with_max_concurrent_units(16);
    let mut nodes: Vec<Value> = (0..20)
        .flat_map(|i| vec![text(&format!("riga {}", i)), choices(&["a", "b"])])
        .collect();

    let count = scheduler.translate_container(&mut nodes, WIDE).await;

    assert_eq!(count, 60);
    for i in 0..20 {
        assert_eq!(line_of(&nodes[i * 2]), format!("[en] riga {}", i));
        assert_eq!(nodes[i * 2 + 1]["parameters"][0], json!(["[en] a", "[en] b"]));
    }
}

/// An empty container has nothing to do
#[tokio::test]
async fn test_translate_container_withEmptyList_shouldReturnZero() {
    let mock = MockTranslator::tagged();
    let scheduler = common::scheduler_for(&mock);
    let mut nodes: Vec<Value> = Vec::new();

    assert_eq!(scheduler.translate_container(&mut nodes, WIDE).await, 0);
    assert_eq!(mock.request_count(), 0);
}
