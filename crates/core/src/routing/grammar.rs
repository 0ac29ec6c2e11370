//! Capability reference grammar
//!
//! | # | Pattern | Result |
//! |---|---|---|
//! | 1 | `spec.erp.{name}` | service invoke |
//! | 2 | `moqui.screen.catalog` | screen catalog |
//! | 3 | `moqui.screen.{Path}` | screen definition |
//! | 4 | `moqui.service.{Name}.invoke\|async\|job-status` | service call |
//! | 5 | `moqui.{Entity}.list\|get\|create\|update\|delete` | entity CRUD |
//!
//! Matchers run in table order and the first hit wins. Names are captured
//! verbatim and may contain dots (`mantle.order.OrderHeader`). The
//! `moqui.service.` and `moqui.screen.` namespaces are reserved: a reference
//! under them that fails rules 2-4 is invalid rather than an entity named
//! `service` or `screen`.

use erpbridge_domain::constants::{MOQUI_PREFIX, SPEC_ERP_PREFIX};
use erpbridge_domain::{InvokeMode, Operation, OperationDescriptor};

const SERVICE_NAMESPACE: &str = "moqui.service.";
const SCREEN_NAMESPACE: &str = "moqui.screen.";
const SCREEN_CATALOG: &str = "moqui.screen.catalog";

type Matcher = fn(&str) -> Option<OperationDescriptor>;

const MATCHERS: [Matcher; 5] =
    [match_spec_erp, match_screen_catalog, match_screen_definition, match_service, match_entity];

/// Parse a capability reference into its descriptor.
///
/// Returns `None` for any string outside the grammar. Pure and total.
pub fn parse_reference(reference: &str) -> Option<OperationDescriptor> {
    MATCHERS.iter().find_map(|matcher| matcher(reference))
}

/// Whether a reference belongs to this adapter family at all.
///
/// Prefix check only; a matching reference may still fail to parse.
pub fn matches(reference: &str) -> bool {
    reference.starts_with(SPEC_ERP_PREFIX) || reference.starts_with(MOQUI_PREFIX)
}

fn match_spec_erp(reference: &str) -> Option<OperationDescriptor> {
    let name = reference.strip_prefix(SPEC_ERP_PREFIX)?;
    is_valid_name(name).then(|| OperationDescriptor::service(name, Operation::Invoke, None))
}

fn match_screen_catalog(reference: &str) -> Option<OperationDescriptor> {
    (reference == SCREEN_CATALOG).then(OperationDescriptor::screen_catalog)
}

fn match_screen_definition(reference: &str) -> Option<OperationDescriptor> {
    let path = reference.strip_prefix(SCREEN_NAMESPACE)?;
    is_valid_screen_path(path).then(|| OperationDescriptor::screen_definition(path))
}

fn match_service(reference: &str) -> Option<OperationDescriptor> {
    let rest = reference.strip_prefix(SERVICE_NAMESPACE)?;
    let (name, verb) = rest.rsplit_once('.')?;
    if !is_valid_name(name) {
        return None;
    }

    let (operation, mode) = match verb {
        "invoke" => (Operation::Invoke, None),
        "async" => (Operation::Invoke, Some(InvokeMode::Async)),
        "job-status" => (Operation::JobStatus, None),
        _ => return None,
    };

    Some(OperationDescriptor::service(name, operation, mode))
}

fn match_entity(reference: &str) -> Option<OperationDescriptor> {
    if reference.starts_with(SERVICE_NAMESPACE) || reference.starts_with(SCREEN_NAMESPACE) {
        return None;
    }

    let rest = reference.strip_prefix(MOQUI_PREFIX)?;
    let (entity, verb) = rest.rsplit_once('.')?;
    if !is_valid_name(entity) || matches!(entity, "service" | "screen") {
        return None;
    }

    let operation = match verb {
        "list" => Operation::List,
        "get" => Operation::Get,
        "create" => Operation::Create,
        "update" => Operation::Update,
        "delete" => Operation::Delete,
        _ => return None,
    };

    Some(OperationDescriptor::entity(entity, operation))
}

/// Dotted name with non-empty segments, no whitespace and no `/`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| !segment.is_empty())
        && !name.chars().any(|c| c.is_whitespace() || c.is_control() || c == '/')
}

/// Screen paths may nest with `/` but every segment must be non-empty.
fn is_valid_screen_path(path: &str) -> bool {
    !path.is_empty()
        && path.split(['.', '/']).all(|segment| !segment.is_empty())
        && !path.chars().any(|c| c.is_whitespace() || c.is_control())
}
