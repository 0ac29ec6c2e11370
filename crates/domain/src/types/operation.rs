//! Operation descriptors
//!
//! An [`OperationDescriptor`] is the structured form of a capability
//! reference such as `moqui.OrderHeader.list`. Exactly one of `entity`,
//! `service` or `screen` names the target, except for the screen catalog which
//! has no target name at all.

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Operation verbs understood by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Invoke,
    JobStatus,
    ScreenCatalog,
    ScreenDefinition,
}

impl_wire_name_conversions!(Operation {
    List => "list",
    Get => "get",
    Create => "create",
    Update => "update",
    Delete => "delete",
    Invoke => "invoke",
    JobStatus => "job-status",
    ScreenCatalog => "screen-catalog",
    ScreenDefinition => "screen-definition",
});

impl Operation {
    /// Entity CRUD verbs accepted after `moqui.{Entity}.`
    pub const ENTITY_VERBS: [Self; 5] =
        [Self::List, Self::Get, Self::Create, Self::Update, Self::Delete];
}

/// Service invocation mode. A synchronous invoke carries no mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvokeMode {
    Async,
}

impl_wire_name_conversions!(InvokeMode {
    Async => "async",
});

/// Which family of remote paths a descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Entity,
    Service,
    Screen,
}

/// Parsed capability reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    pub operation: Operation,
    /// Set only for asynchronous service invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<InvokeMode>,
}

impl OperationDescriptor {
    pub fn entity(name: impl Into<String>, operation: Operation) -> Self {
        Self { entity: Some(name.into()), service: None, screen: None, operation, mode: None }
    }

    pub fn service(
        name: impl Into<String>,
        operation: Operation,
        mode: Option<InvokeMode>,
    ) -> Self {
        Self { entity: None, service: Some(name.into()), screen: None, operation, mode }
    }

    pub fn screen_catalog() -> Self {
        Self {
            entity: None,
            service: None,
            screen: None,
            operation: Operation::ScreenCatalog,
            mode: None,
        }
    }

    pub fn screen_definition(path: impl Into<String>) -> Self {
        Self {
            entity: None,
            service: None,
            screen: Some(path.into()),
            operation: Operation::ScreenDefinition,
            mode: None,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        match self.operation {
            Operation::List
            | Operation::Get
            | Operation::Create
            | Operation::Update
            | Operation::Delete => ReferenceKind::Entity,
            Operation::Invoke | Operation::JobStatus => ReferenceKind::Service,
            Operation::ScreenCatalog | Operation::ScreenDefinition => ReferenceKind::Screen,
        }
    }

    pub fn is_async(&self) -> bool {
        self.mode == Some(InvokeMode::Async)
    }
}
