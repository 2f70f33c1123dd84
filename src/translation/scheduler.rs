/*!
 * Per-container translation scheduling.
 *
 * A container is scanned once, in node order, to discover its units. The
 * units are then translated concurrently, but every state change (the scan
 * itself and each write-back) happens while holding the container's mutex.
 * Write-backs are applied in discovery order; only the provider calls
 * overlap.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::translation::client::{TranslationClient, TranslationOutcome};
use crate::translation::merger::{Run, RunMergerState};
use crate::translation::nodes::{self, NodeShape};
use crate::translation::reflow::{self, Wrapped};
use crate::translation::report::{AnomalyLog, TranslationTally};

/// How plain text nodes of a container are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMode {
    /// Merge consecutive lines into runs and reflow the result
    Reflow { max_width: usize },
    /// Translate every line on its own
    PerLine,
}

/// Smallest independently translated piece of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Merged plain text lines
    Run(Run),
    /// A single plain text line (per-line mode)
    Line { index: usize, text: String },
    /// One entry of a choice list
    Choice { index: usize, choice: usize, text: String },
    /// The label of a choice answer
    Answer { index: usize, text: String },
}

impl Unit {
    pub fn source_text(&self) -> &str {
        match self {
            Unit::Run(run) => &run.text,
            Unit::Line { text, .. } | Unit::Choice { text, .. } | Unit::Answer { text, .. } => text,
        }
    }

    /// Index of the first node the unit writes to
    pub fn first_index(&self) -> usize {
        match self {
            Unit::Run(run) => run.range.start,
            Unit::Line { index, .. } | Unit::Choice { index, .. } | Unit::Answer { index, .. } => *index,
        }
    }
}

/// Distribute reflowed lines over `slots` nodes. Missing lines become empty
/// strings; extra lines are appended to the last slot.
pub fn distribute_lines(mut lines: Vec<String>, slots: usize) -> Vec<String> {
    if slots == 0 {
        return Vec::new();
    }
    if lines.len() > slots {
        let overflow = lines.split_off(slots - 1).join(" ");
        lines.push(overflow);
    }
    lines.resize(slots, String::new());
    lines
}

/// Discover the units of a container, in node order
pub fn scan_units(nodes: &[Value], mode: ContainerMode, anomalies: &AnomalyLog) -> Vec<Unit> {
    let mut merger = RunMergerState::new();
    let mut units = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let shape = nodes::classify(node);

        if let ContainerMode::Reflow { .. } = mode {
            if let Some(run) = merger.observe(index, &shape) {
                units.push(Unit::Run(run));
            }
        }

        match shape {
            NodeShape::Text(text) => {
                if mode == ContainerMode::PerLine && !text.trim().is_empty() {
                    units.push(Unit::Line { index, text });
                }
            }
            NodeShape::Choices { entries, anomalies: found } => {
                for anomaly in found {
                    anomalies.anomaly(&format!("at node {}", index), anomaly.to_string());
                }
                units.extend(
                    entries
                        .into_iter()
                        .map(|(choice, text)| Unit::Choice { index, choice, text }),
                );
            }
            NodeShape::Answer(text) => units.push(Unit::Answer { index, text }),
            NodeShape::Anomaly(anomaly) => {
                anomalies.anomaly(&format!("at node {}", index), anomaly.to_string());
            }
            NodeShape::EmptyText | NodeShape::NoChoices | NodeShape::Passthrough => {}
        }
    }

    units.extend(merger.finish().map(Unit::Run));
    units
}

/// Mutable state of one container, guarded by its mutex
struct ContainerState<'a> {
    nodes: &'a mut Vec<Value>,
    translated: usize,
}

impl ContainerState<'_> {
    /// Write a unit result back. Returns whether the unit counts as translated.
    fn write_back(&mut self, unit: &Unit, text: String, mode: ContainerMode) -> bool {
        match unit {
            Unit::Run(run) => {
                let lines = match mode {
                    ContainerMode::Reflow { max_width } => match reflow::reflow_or_single_line(&text, max_width) {
                        Wrapped::Lines(lines) => lines,
                        Wrapped::SingleLine { line, reason } => {
                            debug!("Run at node {} kept on one line: {}", run.range.start, reason);
                            vec![line]
                        }
                    },
                    ContainerMode::PerLine => vec![text],
                };

                if lines.len() > run.slots() {
                    debug!(
                        "Run at node {} reflowed to {} lines for {} nodes, last node exceeds the line width",
                        run.range.start,
                        lines.len(),
                        run.slots()
                    );
                }
                let slots = distribute_lines(lines, run.slots());
                let mut written = true;
                for (index, line) in run.range.clone().zip(slots) {
                    written &= self.nodes.get_mut(index).is_some_and(|node| nodes::set_text(node, line));
                }
                written
            }
            Unit::Line { index, .. } => self
                .nodes
                .get_mut(*index)
                .is_some_and(|node| nodes::set_text(node, text)),
            Unit::Choice { index, choice, .. } => self
                .nodes
                .get_mut(*index)
                .is_some_and(|node| nodes::set_choice(node, *choice, text)),
            Unit::Answer { index, .. } => self
                .nodes
                .get_mut(*index)
                .is_some_and(|node| nodes::set_answer(node, text)),
        }
    }
}

/// Schedules the units of a container over a shared translation client
#[derive(Debug, Clone)]
pub struct TranslationScheduler {
    client: TranslationClient,
    max_concurrent_units: usize,
    anomalies: AnomalyLog,
    tally: TranslationTally,
    verbose: bool,
}

impl TranslationScheduler {
    pub fn new(client: TranslationClient, anomalies: AnomalyLog, tally: TranslationTally) -> Self {
        Self {
            client,
            max_concurrent_units: 8,
            anomalies,
            tally,
            verbose: false,
        }
    }

    /// Units of one container in flight at once
    pub fn with_max_concurrent_units(mut self, limit: usize) -> Self {
        self.max_concurrent_units = limit.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Same scheduler reporting into `anomalies`
    pub fn with_anomalies(&self, anomalies: AnomalyLog) -> Self {
        Self {
            anomalies,
            ..self.clone()
        }
    }

    pub fn client(&self) -> &TranslationClient {
        &self.client
    }

    pub fn anomalies(&self) -> &AnomalyLog {
        &self.anomalies
    }

    pub fn tally(&self) -> &TranslationTally {
        &self.tally
    }

    /// Translate a container in place. Returns the number of translated units.
    pub async fn translate_container(&self, nodes: &mut Vec<Value>, mode: ContainerMode) -> usize {
        let state = Mutex::new(ContainerState { nodes, translated: 0 });

        let units = {
            let guard = state.lock().await;
            scan_units(&guard.nodes[..], mode, &self.anomalies)
        };

        if units.is_empty() {
            return 0;
        }

        let state = &state;
        let client = &self.client;
        stream::iter(units)
            .map(|unit| async move {
                let outcome = client.translate_with_retry(unit.source_text()).await;
                (unit, outcome)
            })
            .buffered(self.max_concurrent_units)
            .for_each(|(unit, outcome)| async move {
                let mut guard = state.lock().await;
                match outcome {
                    TranslationOutcome::Translated(text) => {
                        if self.verbose {
                            info!("{} -> {}", unit.source_text(), text);
                        } else {
                            debug!("{} -> {}", unit.source_text(), text);
                        }

                        if guard.write_back(&unit, text, mode) {
                            guard.translated += 1;
                            self.tally.increment();
                        } else {
                            self.anomalies.anomaly(
                                &format!("at node {}", unit.first_index()),
                                format!("translated text could not be written back: {:?}", unit.source_text()),
                            );
                        }
                    }
                    TranslationOutcome::Degraded { reason, attempts, .. } => {
                        self.anomalies.anomaly(
                            &format!("at node {}", unit.first_index()),
                            format!(
                                "left untranslated after {} attempts: {}: {:?}",
                                attempts,
                                reason,
                                unit.source_text()
                            ),
                        );
                    }
                }
            })
            .await;

        state.lock().await.translated
    }
}
