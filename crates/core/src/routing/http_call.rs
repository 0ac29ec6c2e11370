//! Operation-to-HTTP mapping
//!
//! | Operation | Method | Path | Body / query |
//! |---|---|---|---|
//! | list | GET | `/entities/{e}` | scalar payload fields as query |
//! | get | GET | `/entities/{e}/{id}` | |
//! | create | POST | `/entities/{e}` | payload |
//! | update | PUT | `/entities/{e}/{id}` | payload |
//! | delete | DELETE | `/entities/{e}/{id}` | |
//! | invoke | POST | `/services/{s}` | payload (+ `async: true`) |
//! | job-status | GET | `/services/{s}/jobs/{id}` | |
//! | screen-catalog | GET | `/screens` | |
//! | screen-definition | GET | `/screens/{path}` | |
//!
//! Paths are kept as logical segments. The transport joins and
//! percent-encodes them, so names with `#` or spaces survive intact.

use erpbridge_domain::{BridgeError, Operation, OperationDescriptor, Result};
use serde_json::{Map, Value};

/// HTTP verbs the remote API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete HTTP call derived from a descriptor and a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpCall {
    pub method: HttpMethod,
    /// Unencoded path segments, joined with `/` under the base URL.
    pub segments: Vec<String>,
    /// Query pairs in a stable (sorted) order.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpCall {
    fn new(method: HttpMethod, segments: Vec<String>) -> Self {
        Self { method, segments, query: Vec::new(), body: None }
    }

    fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Display form of the path, e.g. `/entities/OrderHeader/7`.
    ///
    /// Not encoded; meant for logs and tests.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Translate a descriptor plus payload into an [`HttpCall`].
///
/// # Errors
///
/// - [`BridgeError::InvalidInput`] when an id-addressed operation has no
///   usable `id` in the payload
/// - [`BridgeError::InvalidReference`] when the descriptor lacks the target
///   name its operation needs
pub fn to_http_call(descriptor: &OperationDescriptor, payload: &Value) -> Result<HttpCall> {
    match descriptor.operation {
        Operation::List => {
            let entity = target(&descriptor.entity, "entity")?;
            Ok(HttpCall::new(HttpMethod::Get, vec!["entities".into(), entity.into()])
                .with_query(scalar_query(payload)))
        }
        Operation::Get => {
            let entity = target(&descriptor.entity, "entity")?;
            let id = required_id(payload, &["id"])?;
            Ok(HttpCall::new(HttpMethod::Get, vec!["entities".into(), entity.into(), id]))
        }
        Operation::Create => {
            let entity = target(&descriptor.entity, "entity")?;
            Ok(HttpCall::new(HttpMethod::Post, vec!["entities".into(), entity.into()])
                .with_body(non_null(payload)))
        }
        Operation::Update => {
            let entity = target(&descriptor.entity, "entity")?;
            let id = required_id(payload, &["id"])?;
            Ok(HttpCall::new(HttpMethod::Put, vec!["entities".into(), entity.into(), id])
                .with_body(Some(payload.clone())))
        }
        Operation::Delete => {
            let entity = target(&descriptor.entity, "entity")?;
            let id = required_id(payload, &["id"])?;
            Ok(HttpCall::new(HttpMethod::Delete, vec!["entities".into(), entity.into(), id]))
        }
        Operation::Invoke => {
            let service = target(&descriptor.service, "service")?;
            let body =
                if descriptor.is_async() { Some(async_body(payload)) } else { non_null(payload) };
            Ok(HttpCall::new(HttpMethod::Post, vec!["services".into(), service.into()])
                .with_body(body))
        }
        Operation::JobStatus => {
            let service = target(&descriptor.service, "service")?;
            let id = required_id(payload, &["id", "jobId"])?;
            Ok(HttpCall::new(
                HttpMethod::Get,
                vec!["services".into(), service.into(), "jobs".into(), id],
            ))
        }
        Operation::ScreenCatalog => Ok(HttpCall::new(HttpMethod::Get, vec!["screens".into()])),
        Operation::ScreenDefinition => {
            let screen = target(&descriptor.screen, "screen")?;
            let mut segments = vec!["screens".to_string()];
            segments.extend(screen.split('/').map(str::to_string));
            Ok(HttpCall::new(HttpMethod::Get, segments))
        }
    }
}

fn target<'a>(name: &'a Option<String>, kind: &str) -> Result<&'a str> {
    name.as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BridgeError::InvalidReference(format!("descriptor has no {kind} name")))
}

/// First of `keys` holding a non-empty string or a number.
///
/// `.` and `..` are refused: URL normalization would drop them and turn an
/// item call into a collection call.
fn required_id(payload: &Value, keys: &[&str]) -> Result<String> {
    keys.iter()
        .filter_map(|key| payload.get(key))
        .find_map(|value| match value {
            Value::String(s) if !matches!(s.as_str(), "" | "." | "..") => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            let fields = keys.join("` or `");
            BridgeError::InvalidInput(format!("payload field `{fields}` is required"))
        })
}

/// Strings go raw, numbers and booleans as their JSON text. Nulls, arrays and
/// objects are skipped.
fn scalar_query(payload: &Value) -> Vec<(String, String)> {
    let Some(fields) = payload.as_object() else {
        return Vec::new();
    };

    let mut query: Vec<(String, String)> = fields
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), rendered))
        })
        .collect();
    query.sort();
    query
}

fn non_null(payload: &Value) -> Option<Value> {
    (!payload.is_null()).then(|| payload.clone())
}

fn async_body(payload: &Value) -> Value {
    let mut body = match payload {
        Value::Object(fields) => fields.clone(),
        Value::Null => Map::new(),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("payload".into(), other.clone());
            wrapped
        }
    };
    body.insert("async".into(), Value::Bool(true));
    Value::Object(body)
}
