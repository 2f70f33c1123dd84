/*!
 * End-to-end tests of command-list translation: merging, reflow,
 * write-back and structure preservation
 */

use serde_json::{json, Value};

use rpgtl::file_utils::DocumentFamily;
use rpgtl::providers::mock::MockTranslator;
use rpgtl::translation::ContainerMode;

use crate::common::{self, answer, choices, end, line_of, map_document, show_text, text};

/// Copy of a value with every string replaced by null
fn strip_text(value: &Value) -> Value {
    match value {
        Value::String(_) => Value::Null,
        Value::Array(items) => Value::Array(items.iter().map(strip_text).collect()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), strip_text(v))).collect()),
        other => other.clone(),
    }
}

/// Two lines and a choice list become one run plus two choices
#[tokio::test]
async fn test_translate_container_withDialogueAndChoices_shouldMergeAndReflow() {
    let mock = MockTranslator::dictionary([("Ciao mondo", "Hello world"), ("si", "yes"), ("no", "no")]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![text("Ciao"), text("mondo"), choices(&["si", "no"])];

    let count = scheduler
        .translate_container(&mut nodes, ContainerMode::Reflow { max_width: 40 })
        .await;

    assert_eq!(count, 3);
    assert_eq!(line_of(&nodes[0]), "Hello world");
    assert_eq!(line_of(&nodes[1]), "");
    assert_eq!(nodes[2]["parameters"][0], json!(["yes", "no"]));
    assert_eq!(mock.requests().iter().filter(|r| *r == "Ciao mondo").count(), 1);
    assert_eq!(mock.request_count(), 3);
}

/// A three-line run reflowed to two lines empties the third node
#[tokio::test]
async fn test_translate_container_withShorterTranslation_shouldEmptyTrailingNodes() {
    let mock = MockTranslator::dictionary([(
        "Il vecchio saggio del villaggio ti aspetta alla fontana vicino alla chiesa",
        "The old sage of the village waits for you at the fountain by the church",
    )]);
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![
        show_text(),
        text("Il vecchio saggio del villaggio"),
        text("ti aspetta alla fontana"),
        text("vicino alla chiesa"),
        end(),
    ];

    scheduler
        .translate_container(&mut nodes, ContainerMode::Reflow { max_width: 44 })
        .await;

    assert_eq!(line_of(&nodes[1]), "The old sage of the village waits for you at");
    assert_eq!(line_of(&nodes[2]), "the fountain by the church");
    assert_eq!(line_of(&nodes[3]), "");
    assert_eq!(nodes[3]["code"], 401);
}

/// Only text parameters change; codes, indents and other parameters stay
#[tokio::test]
async fn test_walk_withMixedCommands_shouldPreserveStructure() {
    let mock = MockTranslator::tagged();
    let walker = common::walker_for(&common::test_config(), &mock);
    let page = vec![
        show_text(),
        text("Vuoi entrare?"),
        choices(&["Entra", "Resta fuori"]),
        answer(0, "Entra"),
        json!({"code": 201, "indent": 1, "parameters": [0, 2, 8, 6, 2, 0]}),
        end(),
        answer(1, "Resta fuori"),
        json!({"code": 355, "indent": 1, "parameters": ["$gameVariables.setValue(1, 2)"]}),
        end(),
        json!({"code": 404, "indent": 0, "parameters": []}),
        end(),
    ];
    let original = map_document(vec![None, Some(vec![page])]);

    let (translated, count) = walker.walk(original.clone(), DocumentFamily::Map).await.unwrap();

    assert_eq!(count, 5);
    let before = original["events"][1]["pages"][0]["list"].as_array().unwrap();
    let after = translated["events"][1]["pages"][0]["list"].as_array().unwrap();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(after) {
        assert_eq!(old["code"], new["code"]);
        assert_eq!(old["indent"], new["indent"]);
        if old["code"] == 355 {
            assert_eq!(old, new);
        } else {
            assert_eq!(strip_text(old), strip_text(new));
        }
    }
    assert_eq!(after[3]["parameters"], json!([0, "[en] Entra"]));
    assert_eq!(translated["events"][1]["x"], original["events"][1]["x"]);
}

/// Identical containers give identical counts and results
#[tokio::test]
async fn test_translate_container_withIdenticalContainers_shouldCountTheSame() {
    let mock = MockTranslator::tagged();
    let scheduler = common::scheduler_for(&mock);
    let build = || vec![text("Ciao"), text("mondo"), text(""), text("Di nuovo"), choices(&["a", "b"])];
    let mut first = build();
    let mut second = build();

    let first_count = scheduler
        .translate_container(&mut first, ContainerMode::Reflow { max_width: 40 })
        .await;
    let second_count = scheduler
        .translate_container(&mut second, ContainerMode::Reflow { max_width: 40 })
        .await;

    assert_eq!(first_count, 4);
    assert_eq!(first_count, second_count);
    assert_eq!(first, second);
    assert_eq!(scheduler.tally().get(), 8);
}

/// Every non-empty line belongs to exactly one translated run
#[tokio::test]
async fn test_translate_container_withSeveralRuns_shouldCoverEveryLineOnce() {
    let mock = MockTranslator::tagged();
    let scheduler = common::scheduler_for(&mock);
    let mut nodes = vec![
        text("uno"),
        text("due"),
        end(),
        text("tre"),
        text(""),
        text("quattro"),
        end(),
        text("   "),
        show_text(),
    ];

    let count = scheduler
        .translate_container(&mut nodes, ContainerMode::Reflow { max_width: 60 })
        .await;

    assert_eq!(count, 3);
    let mut requests = mock.requests();
    requests.sort();
    assert_eq!(requests, vec!["quattro", "tre", "uno due"]);
    assert_eq!(line_of(&nodes[0]), "[en] uno due");
    assert_eq!(line_of(&nodes[1]), "");
    assert_eq!(line_of(&nodes[3]), "[en] tre");
    assert_eq!(line_of(&nodes[5]), "[en] quattro");
    assert_eq!(line_of(&nodes[7]), "   ");
}
