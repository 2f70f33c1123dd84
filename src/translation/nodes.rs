/*!
 * Command node classification.
 *
 * Event pages and common events store their content as a list of command
 * nodes, `{ "code": 401, "indent": 0, "parameters": [...] }`. Only three
 * codes carry player-facing text; everything else passes through untouched.
 */

use serde_json::Value;

use crate::errors::SchemaAnomaly;

/// "Show Text" continuation line: `["line of text"]`
pub const PLAIN_TEXT_CODE: i64 = 401;
/// "Show Choices": `[["yes", "no"], cancel, default, position, background]`
pub const CHOICE_LIST_CODE: i64 = 102;
/// "When [choice]" branch: `[choice_index, "yes"]`
pub const CHOICE_ANSWER_CODE: i64 = 402;

/// Semantic kind of a command node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    PlainText,
    ChoiceList,
    ChoiceAnswer,
    Other,
}

impl NodeKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            PLAIN_TEXT_CODE => Self::PlainText,
            CHOICE_LIST_CODE => Self::ChoiceList,
            CHOICE_ANSWER_CODE => Self::ChoiceAnswer,
            _ => Self::Other,
        }
    }

    /// Kind of a raw node; a missing or non-numeric code is `Other`
    pub fn of(node: &Value) -> Self {
        node.get("code")
            .and_then(Value::as_i64)
            .map(Self::from_code)
            .unwrap_or(Self::Other)
    }
}

/// What a node offers for translation, after validating its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum NodeShape {
    /// Plain text with a non-empty line
    Text(String),
    /// Plain text with nothing to translate
    EmptyText,
    /// Choice list: non-empty entries by index, plus anomalies for bad entries
    Choices {
        entries: Vec<(usize, String)>,
        anomalies: Vec<SchemaAnomaly>,
    },
    /// Choice list without entries
    NoChoices,
    /// Choice answer label
    Answer(String),
    /// Malformed node, skipped
    Anomaly(SchemaAnomaly),
    /// Any other command
    Passthrough,
}

impl NodeShape {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeShape::Text(_) | NodeShape::EmptyText => NodeKind::PlainText,
            NodeShape::Choices { .. } | NodeShape::NoChoices => NodeKind::ChoiceList,
            NodeShape::Answer(_) => NodeKind::ChoiceAnswer,
            NodeShape::Anomaly(SchemaAnomaly::NonStringText) => NodeKind::PlainText,
            NodeShape::Anomaly(_) => NodeKind::ChoiceAnswer,
            NodeShape::Passthrough => NodeKind::Other,
        }
    }
}

fn parameters(node: &Value) -> &[Value] {
    node.get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Classify a node and validate its parameter shape. Pure.
pub fn classify(node: &Value) -> NodeShape {
    let params = parameters(node);

    match NodeKind::of(node) {
        NodeKind::PlainText => match params.first() {
            None | Some(Value::Null) => NodeShape::EmptyText,
            Some(Value::String(text)) if text.is_empty() => NodeShape::EmptyText,
            Some(Value::String(text)) => NodeShape::Text(text.clone()),
            Some(_) => NodeShape::Anomaly(SchemaAnomaly::NonStringText),
        },

        NodeKind::ChoiceList => {
            let choices = match params.first().and_then(Value::as_array) {
                Some(choices) if !choices.is_empty() => choices,
                _ => return NodeShape::NoChoices,
            };

            let mut entries = Vec::new();
            let mut anomalies = Vec::new();
            for (index, choice) in choices.iter().enumerate() {
                match choice {
                    Value::String(text) if !text.is_empty() => entries.push((index, text.clone())),
                    Value::String(_) | Value::Null => {
                        anomalies.push(SchemaAnomaly::EmptyChoice { index })
                    }
                    _ => anomalies.push(SchemaAnomaly::NonStringChoice { index }),
                }
            }
            NodeShape::Choices { entries, anomalies }
        }

        NodeKind::ChoiceAnswer => {
            if params.len() != 2 {
                return NodeShape::Anomaly(SchemaAnomaly::AnswerArity { found: params.len() });
            }
            match &params[1] {
                Value::String(label) if !label.is_empty() => NodeShape::Answer(label.clone()),
                _ => NodeShape::Anomaly(SchemaAnomaly::EmptyAnswer),
            }
        }

        NodeKind::Other => NodeShape::Passthrough,
    }
}

fn write_string(node: &mut Value, pointer: &str, text: String) -> bool {
    match node.pointer_mut(pointer) {
        Some(slot) => {
            *slot = Value::String(text);
            true
        }
        None => false,
    }
}

/// Replace the line of a plain text node
pub fn set_text(node: &mut Value, text: String) -> bool {
    write_string(node, "/parameters/0", text)
}

/// Replace one entry of a choice list
pub fn set_choice(node: &mut Value, index: usize, text: String) -> bool {
    write_string(node, &format!("/parameters/0/{}", index), text)
}

/// Replace the label of a choice answer
pub fn set_answer(node: &mut Value, text: String) -> bool {
    write_string(node, "/parameters/1", text)
}
