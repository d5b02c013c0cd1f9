//! Node kinds and their kind-specific payloads

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Variable,
    Literal,
    FunctionCall,
    Logic,
    If,
    Switch,
    While,
    For,
    TryCatch,
    Import,
    Export,
    Group,
    NativeApi,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Variable => "variable",
            NodeKind::Literal => "literal",
            NodeKind::FunctionCall => "function-call",
            NodeKind::Logic => "logic",
            NodeKind::If => "if",
            NodeKind::Switch => "switch",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::TryCatch => "try-catch",
            NodeKind::Import => "import",
            NodeKind::Export => "export",
            NodeKind::Group => "group",
            NodeKind::NativeApi => "native-api",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    /// Accepts the canonical names and the `<camelCase>Node` spellings used by
    /// React Flow documents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "variable" | "variableNode" => NodeKind::Variable,
            "literal" | "literalNode" => NodeKind::Literal,
            "function-call" | "functionCallNode" | "function" | "call" => NodeKind::FunctionCall,
            "logic" | "logicNode" => NodeKind::Logic,
            "if" | "ifNode" => NodeKind::If,
            "switch" | "switchNode" => NodeKind::Switch,
            "while" | "whileNode" => NodeKind::While,
            "for" | "forNode" => NodeKind::For,
            "try-catch" | "tryCatchNode" => NodeKind::TryCatch,
            "import" | "importNode" => NodeKind::Import,
            "export" | "exportNode" => NodeKind::Export,
            "group" | "groupNode" => NodeKind::Group,
            "native-api" | "nativeApiNode" => NodeKind::NativeApi,
            other => return Err(UnknownKind(other.to_string())),
        };
        Ok(kind)
    }
}

/// Accepts strings, numbers and booleans for a textual field.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

/// Index-keyed argument values, accepting any scalar for a value.
fn lenient_arguments<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<usize, String>, D::Error> {
    let values = BTreeMap::<usize, Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|(i, value)| match value {
            Value::String(s) => Some((i, s)),
            Value::Bool(b) => Some((i, b.to_string())),
            Value::Number(n) => Some((i, n.to_string())),
            _ => None,
        })
        .collect())
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallSummary {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariableData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_kind: Option<String>,
    /// Source rendering of a literal initializer, quotes included.
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_call_summary: Option<CallSummary>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_parameter: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_exported: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_default_export: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    Number,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiteralData {
    pub label: String,
    /// Unquoted value.
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub literal_type: Option<LiteralType>,
}

impl LiteralData {
    pub fn new(value: impl Into<String>, literal_type: LiteralType) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            literal_type: Some(literal_type),
        }
    }

    /// The declared type, or one inferred from the value the way a text box
    /// entry would be read.
    pub fn resolved_type(&self) -> LiteralType {
        if let Some(t) = self.literal_type {
            return t;
        }
        match self.value.as_str() {
            "true" | "false" => LiteralType::Boolean,
            "null" => LiteralType::Null,
            v if !v.trim().is_empty() && v.trim().parse::<f64>().is_ok() => LiteralType::Number,
            _ => LiteralType::String,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallData {
    pub label: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_declaration: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_standalone: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_return: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_await: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_async: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_exported: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_default_export: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Values typed onto argument slots; a wire into the same slot wins.
    #[serde(
        deserialize_with = "lenient_arguments",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub connected_values: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogicData {
    pub label: String,
    pub op: String,
    /// For `++`/`--` nodes: whether the operator precedes its operand.
    #[serde(skip_serializing_if = "is_false")]
    pub prefix: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminant: Option<String>,
    pub cases: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKind {
    #[default]
    Named,
    Default,
    Namespace,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportSpecifierData {
    pub local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported: Option<String>,
    pub kind: SpecifierKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportData {
    pub label: String,
    pub source: String,
    pub specifiers: Vec<ImportSpecifierData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportData {
    pub label: String,
    pub export_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub specifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelData {
    pub label: String,
}

/// Kind-specific payload. The variant fixes the node's kind for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Variable(VariableData),
    Literal(LiteralData),
    Call(CallData),
    Logic(LogicData),
    If(ControlData),
    Switch(SwitchData),
    While(ControlData),
    For(ControlData),
    TryCatch(ControlData),
    Import(ImportData),
    Export(ExportData),
    Group(LabelData),
    NativeApi(LabelData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Variable(_) => NodeKind::Variable,
            NodeData::Literal(_) => NodeKind::Literal,
            NodeData::Call(_) => NodeKind::FunctionCall,
            NodeData::Logic(_) => NodeKind::Logic,
            NodeData::If(_) => NodeKind::If,
            NodeData::Switch(_) => NodeKind::Switch,
            NodeData::While(_) => NodeKind::While,
            NodeData::For(_) => NodeKind::For,
            NodeData::TryCatch(_) => NodeKind::TryCatch,
            NodeData::Import(_) => NodeKind::Import,
            NodeData::Export(_) => NodeKind::Export,
            NodeData::Group(_) => NodeKind::Group,
            NodeData::NativeApi(_) => NodeKind::NativeApi,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::Variable(d) => &d.label,
            NodeData::Literal(d) => &d.label,
            NodeData::Call(d) => &d.label,
            NodeData::Logic(d) => &d.label,
            NodeData::If(d) | NodeData::While(d) | NodeData::For(d) | NodeData::TryCatch(d) => {
                &d.label
            }
            NodeData::Switch(d) => &d.label,
            NodeData::Import(d) => &d.label,
            NodeData::Export(d) => &d.label,
            NodeData::Group(d) | NodeData::NativeApi(d) => &d.label,
        }
    }

    pub fn to_value(&self) -> Value {
        let value = match self {
            NodeData::Variable(d) => serde_json::to_value(d),
            NodeData::Literal(d) => serde_json::to_value(d),
            NodeData::Call(d) => serde_json::to_value(d),
            NodeData::Logic(d) => serde_json::to_value(d),
            NodeData::If(d) | NodeData::While(d) | NodeData::For(d) | NodeData::TryCatch(d) => {
                serde_json::to_value(d)
            }
            NodeData::Switch(d) => serde_json::to_value(d),
            NodeData::Import(d) => serde_json::to_value(d),
            NodeData::Export(d) => serde_json::to_value(d),
            NodeData::Group(d) | NodeData::NativeApi(d) => serde_json::to_value(d),
        };
        value.unwrap_or(Value::Null)
    }

    /// Decodes a wire payload for `kind`. Fields that do not fit the kind's
    /// shape fall back to their defaults instead of rejecting the node.
    pub fn from_value(kind: NodeKind, value: &Value) -> Self {
        fn decode<T: serde::de::DeserializeOwned + Default>(value: &Value) -> T {
            match T::deserialize(value) {
                Ok(data) => data,
                Err(error) => {
                    tracing::debug!(%error, "node payload did not match its kind");
                    T::default()
                }
            }
        }

        match kind {
            NodeKind::Variable => NodeData::Variable(decode(value)),
            NodeKind::Literal => NodeData::Literal(decode(value)),
            NodeKind::FunctionCall => NodeData::Call(decode(value)),
            NodeKind::Logic => NodeData::Logic(decode(value)),
            NodeKind::If => NodeData::If(decode(value)),
            NodeKind::Switch => NodeData::Switch(decode(value)),
            NodeKind::While => NodeData::While(decode(value)),
            NodeKind::For => NodeData::For(decode(value)),
            NodeKind::TryCatch => NodeData::TryCatch(decode(value)),
            NodeKind::Import => NodeData::Import(decode(value)),
            NodeKind::Export => NodeData::Export(decode(value)),
            NodeKind::Group => NodeData::Group(decode(value)),
            NodeKind::NativeApi => NodeData::NativeApi(decode(value)),
        }
    }
}
