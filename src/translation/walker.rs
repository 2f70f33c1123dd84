/*!
 * Document traversal.
 *
 * Finds the containers of a parsed document according to its family and
 * hands them to the scheduler, several containers at a time. Containers
 * share nothing but the tally and the anomaly log, so they run fully in
 * parallel. Keyed-field families go through the record translator instead.
 */

use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::app_config::{Config, LayoutConfig, RecordsConfig};
use crate::errors::DocumentError;
use crate::file_utils::DocumentFamily;
use crate::translation::client::TranslationClient;
use crate::translation::records::{KeyedFieldPolicy, RecordTranslator};
use crate::translation::report::{AnomalyLog, TranslationTally};
use crate::translation::scheduler::{ContainerMode, TranslationScheduler};

/// A command list and its JSON pointer inside the document
#[derive(Debug)]
pub struct Container<'a> {
    pub location: String,
    pub nodes: &'a mut Vec<Value>,
}

/// Command lists of a map: `events[*].pages[*].list`. Null events are skipped.
pub fn map_containers<'a>(
    document: &'a mut Value,
    anomalies: &AnomalyLog,
) -> Result<Vec<Container<'a>>, DocumentError> {
    let events = document
        .get_mut("events")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| DocumentError::UnexpectedShape {
            expected: "array",
            location: "/events".to_string(),
        })?;

    let mut containers = Vec::new();
    for (event_index, event) in events.iter_mut().enumerate() {
        if event.is_null() {
            continue;
        }
        let Some(pages) = event.get_mut("pages").and_then(Value::as_array_mut) else {
            anomalies.anomaly(&format!("at /events/{}", event_index), "event has no pages");
            continue;
        };
        for (page_index, page) in pages.iter_mut().enumerate() {
            if page.is_null() {
                continue;
            }
            match page.get_mut("list").and_then(Value::as_array_mut) {
                Some(list) => containers.push(Container {
                    location: format!("/events/{}/pages/{}/list", event_index, page_index),
                    nodes: list,
                }),
                None => anomalies.anomaly(
                    &format!("at /events/{}/pages/{}", event_index, page_index),
                    "page has no command list",
                ),
            }
        }
    }
    Ok(containers)
}

/// Command lists of the common events table: `[*].list`. Null entries are skipped.
pub fn common_event_containers<'a>(
    document: &'a mut Value,
    anomalies: &AnomalyLog,
) -> Result<Vec<Container<'a>>, DocumentError> {
    let entries = document
        .as_array_mut()
        .ok_or_else(|| DocumentError::UnexpectedShape {
            expected: "array",
            location: "/".to_string(),
        })?;

    let mut containers = Vec::new();
    for (index, entry) in entries.iter_mut().enumerate() {
        if entry.is_null() {
            continue;
        }
        match entry.get_mut("list").and_then(Value::as_array_mut) {
            Some(list) => containers.push(Container {
                location: format!("/{}/list", index),
                nodes: list,
            }),
            None => anomalies.anomaly(&format!("at /{}", index), "common event has no command list"),
        }
    }
    Ok(containers)
}

/// Drives translation over a whole document
#[derive(Debug, Clone)]
pub struct DocumentWalker {
    scheduler: TranslationScheduler,
    records: RecordTranslator,
    layout: LayoutConfig,
    records_config: RecordsConfig,
}

impl DocumentWalker {
    pub fn new(
        scheduler: TranslationScheduler,
        records: RecordTranslator,
        layout: LayoutConfig,
        records_config: RecordsConfig,
    ) -> Self {
        Self {
            scheduler,
            records,
            layout,
            records_config,
        }
    }

    /// Build a walker whose units all go through `client`
    pub fn from_config(
        config: &Config,
        client: TranslationClient,
        anomalies: AnomalyLog,
        tally: TranslationTally,
    ) -> Self {
        let units = config.translation.get_concurrent_requests();
        let scheduler = TranslationScheduler::new(client.clone(), anomalies.clone(), tally.clone())
            .with_max_concurrent_units(units)
            .with_verbose(config.verbose);
        let records = RecordTranslator::new(client, anomalies, tally)
            .with_max_concurrent_units(units)
            .with_verbose(config.verbose);

        Self::new(scheduler, records, config.layout.clone(), config.records.clone())
    }

    /// Same walker with every anomaly prefixed by `file_name`
    pub fn for_file(&self, file_name: &str) -> Self {
        let anomalies = self.anomalies().scoped(file_name);
        Self {
            scheduler: self.scheduler.with_anomalies(anomalies.clone()),
            records: self.records.with_anomalies(anomalies),
            layout: self.layout.clone(),
            records_config: self.records_config.clone(),
        }
    }

    pub fn anomalies(&self) -> &AnomalyLog {
        self.scheduler.anomalies()
    }

    pub fn tally(&self) -> &TranslationTally {
        self.scheduler.tally()
    }

    /// Container mode used for a command-list family
    pub fn container_mode(&self, family: DocumentFamily) -> ContainerMode {
        match family {
            DocumentFamily::Map if self.layout.reflow_dialogue => ContainerMode::Reflow {
                max_width: self.layout.dialogue_max_line_width,
            },
            DocumentFamily::Map => ContainerMode::PerLine,
            _ => ContainerMode::Reflow {
                max_width: self.layout.common_events_max_line_width,
            },
        }
    }

    /// Keyed-field policy of a record family
    pub fn field_policy(&self, family: DocumentFamily) -> Option<KeyedFieldPolicy> {
        let width = self.layout.record_max_line_width;
        match family {
            DocumentFamily::Gallery => Some(KeyedFieldPolicy::gallery(&self.records_config, width)),
            DocumentFamily::Rubi => Some(KeyedFieldPolicy::rubi(width)),
            DocumentFamily::Records => Some(KeyedFieldPolicy::records(&self.records_config, width)),
            DocumentFamily::Map | DocumentFamily::CommonEvents => None,
        }
    }

    /// Translate `document` and return it with the number of translated units
    pub async fn walk(&self, document: Value, family: DocumentFamily) -> Result<(Value, usize), DocumentError> {
        self.walk_with_progress(document, family, |_, _| {}).await
    }

    /// Like [`walk`](Self::walk), reporting `(done, total)` after each container
    pub async fn walk_with_progress<F>(
        &self,
        mut document: Value,
        family: DocumentFamily,
        progress: F,
    ) -> Result<(Value, usize), DocumentError>
    where
        F: Fn(usize, usize),
    {
        let translated = match family {
            DocumentFamily::Map | DocumentFamily::CommonEvents => {
                let containers = if family == DocumentFamily::Map {
                    map_containers(&mut document, self.anomalies())?
                } else {
                    common_event_containers(&mut document, self.anomalies())?
                };
                self.translate_containers(containers, self.container_mode(family), &progress)
                    .await
            }
            DocumentFamily::Gallery | DocumentFamily::Rubi | DocumentFamily::Records => {
                if family == DocumentFamily::Records && !document.is_array() {
                    return Err(DocumentError::UnexpectedShape {
                        expected: "array",
                        location: "/".to_string(),
                    });
                }
                let policy = self
                    .field_policy(family)
                    .ok_or_else(|| DocumentError::Unsupported(family.name().to_string()))?;
                let translated = self.records.translate_document(&mut document, &policy).await;
                progress(1, 1);
                translated
            }
        };

        Ok((document, translated))
    }

    async fn translate_containers<F>(&self, containers: Vec<Container<'_>>, mode: ContainerMode, progress: &F) -> usize
    where
        F: Fn(usize, usize),
    {
        let total = containers.len();
        let mut done = 0;
        let mut translated = 0;

        let mut results = stream::iter(containers)
            .map(|container| async move {
                self.scheduler
                    .with_anomalies(self.anomalies().scoped(container.location))
                    .translate_container(container.nodes, mode)
                    .await
            })
            .buffer_unordered(self.layout.concurrent_containers.max(1));

        while let Some(count) = results.next().await {
            done += 1;
            translated += count;
            progress(done, total);
        }

        translated
    }
}
