/*!
 * Keyed-field translation.
 *
 * Database tables, the gallery list and the rubi list are not command
 * lists: their text lives in named fields of plain objects. A policy
 * decides which fields are translated and how they are post-processed,
 * then every selected field is translated as an independent unit and
 * written back by JSON pointer.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;

use crate::app_config::RecordsConfig;
use crate::translation::client::{preserve_leading_space, TranslationClient, TranslationOutcome};
use crate::translation::reflow;
use crate::translation::report::{AnomalyLog, TranslationTally};

/// How fields are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    /// Allow-listed keys of each entry of the root array, no recursion
    Flat,
    /// Allow-listed keys at any depth
    Recursive,
    /// Every string inside any array, at any depth
    ArrayStrings,
}

/// Which keyed fields of a document are translated, and how
#[derive(Debug, Clone)]
pub struct KeyedFieldPolicy {
    pub scope: FieldScope,
    pub keys: HashSet<String>,
    /// Reflowed to at most two lines
    pub two_line_keys: HashSet<String>,
    /// Embedded line breaks are kept
    pub raw_keys: HashSet<String>,
    pub max_width: usize,
}

impl KeyedFieldPolicy {
    /// Database tables (items, skills, actors ...)
    pub fn records(config: &RecordsConfig, max_width: usize) -> Self {
        Self {
            scope: FieldScope::Flat,
            keys: config.record_keys.iter().cloned().collect(),
            two_line_keys: config.two_line_keys.iter().cloned().collect(),
            raw_keys: config.raw_keys.iter().cloned().collect(),
            max_width,
        }
    }

    /// GalleryList.json
    pub fn gallery(config: &RecordsConfig, max_width: usize) -> Self {
        Self {
            scope: FieldScope::Recursive,
            keys: config.gallery_keys.iter().cloned().collect(),
            two_line_keys: HashSet::new(),
            raw_keys: HashSet::new(),
            max_width,
        }
    }

    /// RubiList.json
    pub fn rubi(max_width: usize) -> Self {
        Self {
            scope: FieldScope::ArrayStrings,
            keys: HashSet::new(),
            two_line_keys: HashSet::new(),
            raw_keys: HashSet::new(),
            max_width,
        }
    }
}

/// A field selected for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUnit {
    /// JSON pointer to the string
    pub pointer: String,
    /// Key name, or empty for array items
    pub key: String,
    pub text: String,
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Collect the translatable fields of `document` in document order
pub fn collect_fields(document: &Value, policy: &KeyedFieldPolicy) -> Vec<FieldUnit> {
    let mut fields = Vec::new();

    match policy.scope {
        FieldScope::Flat => {
            if let Value::Array(entries) = document {
                for (index, entry) in entries.iter().enumerate() {
                    let Value::Object(map) = entry else { continue };
                    for (key, value) in map {
                        if let Value::String(text) = value {
                            if policy.keys.contains(key) && !text.trim().is_empty() {
                                fields.push(FieldUnit {
                                    pointer: format!("/{}/{}", index, escape_token(key)),
                                    key: key.clone(),
                                    text: text.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }
        FieldScope::Recursive | FieldScope::ArrayStrings => {
            collect_recursive(document, policy, &mut String::new(), None, &mut fields)
        }
    }

    fields
}

fn collect_recursive(
    value: &Value,
    policy: &KeyedFieldPolicy,
    pointer: &mut String,
    key: Option<&str>,
    fields: &mut Vec<FieldUnit>,
) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                let len = pointer.len();
                pointer.push('/');
                pointer.push_str(&escape_token(child_key));
                collect_recursive(child, policy, pointer, Some(child_key), fields);
                pointer.truncate(len);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let len = pointer.len();
                pointer.push_str(&format!("/{}", index));
                if let (FieldScope::ArrayStrings, Value::String(text)) = (policy.scope, item) {
                    if !text.trim().is_empty() {
                        fields.push(FieldUnit {
                            pointer: pointer.clone(),
                            key: String::new(),
                            text: text.clone(),
                        });
                    }
                } else {
                    collect_recursive(item, policy, pointer, None, fields);
                }
                pointer.truncate(len);
            }
        }
        Value::String(text) => {
            if let Some(key) = key {
                if policy.scope == FieldScope::Recursive && policy.keys.contains(key) && !text.trim().is_empty() {
                    fields.push(FieldUnit {
                        pointer: pointer.clone(),
                        key: key.to_string(),
                        text: text.clone(),
                    });
                }
            }
        }
        _ => {}
    }
}

/// Translates keyed fields of a document in place
#[derive(Debug, Clone)]
pub struct RecordTranslator {
    client: TranslationClient,
    max_concurrent_units: usize,
    anomalies: AnomalyLog,
    tally: TranslationTally,
    verbose: bool,
}

impl RecordTranslator {
    pub fn new(client: TranslationClient, anomalies: AnomalyLog, tally: TranslationTally) -> Self {
        Self {
            client,
            max_concurrent_units: 8,
            anomalies,
            tally,
            verbose: false,
        }
    }

    pub fn with_max_concurrent_units(mut self, limit: usize) -> Self {
        self.max_concurrent_units = limit.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Same translator reporting into `anomalies`
    pub fn with_anomalies(&self, anomalies: AnomalyLog) -> Self {
        Self {
            anomalies,
            ..self.clone()
        }
    }

    /// Translate one field: line breaks, provider call, two-line reflow,
    /// then the leading space.
    async fn translate_field(&self, field: &FieldUnit, policy: &KeyedFieldPolicy) -> TranslationOutcome {
        let prepared = if policy.raw_keys.contains(&field.key) {
            field.text.clone()
        } else {
            field.text.replace('\n', " ")
        };

        match self.client.translate_with_retry(&prepared).await {
            TranslationOutcome::Translated(text) => {
                let text = if policy.two_line_keys.contains(&field.key) {
                    reflow::reflow_two_lines(&text, policy.max_width)
                } else {
                    text
                };
                TranslationOutcome::Translated(preserve_leading_space(&prepared, &text))
            }
            degraded => degraded,
        }
    }

    /// Translate the fields selected by `policy`. Returns the number of
    /// translated fields. Failed fields keep their original value.
    pub async fn translate_document(&self, document: &mut Value, policy: &KeyedFieldPolicy) -> usize {
        let fields = collect_fields(document, policy);
        if fields.is_empty() {
            return 0;
        }

        let results: Vec<(FieldUnit, TranslationOutcome)> = stream::iter(fields)
            .map(|field| async move {
                let outcome = self.translate_field(&field, policy).await;
                (field, outcome)
            })
            .buffered(self.max_concurrent_units)
            .collect()
            .await;

        let mut translated = 0;
        for (field, outcome) in results {
            match outcome {
                TranslationOutcome::Translated(text) => {
                    if self.verbose {
                        info!("{} -> {}", field.text, text);
                    } else {
                        debug!("{} -> {}", field.text, text);
                    }

                    match document.pointer_mut(&field.pointer) {
                        Some(slot) => {
                            *slot = Value::String(text);
                            translated += 1;
                            self.tally.increment();
                        }
                        None => self
                            .anomalies
                            .anomaly(
                                &format!("at {}", field.pointer),
                                format!("field disappeared before write-back: {:?}", field.text),
                            ),
                    }
                }
                TranslationOutcome::Degraded { reason, attempts, .. } => {
                    self.anomalies.anomaly(
                        &format!("at {}", field.pointer),
                        format!("left untranslated after {} attempts: {}: {:?}", attempts, reason, field.text),
                    );
                }
            }
        }

        translated
    }
}
