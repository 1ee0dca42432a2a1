use k8s_openapi::api::core::v1::{Event, EventSource, ObjectReference};
use kube::api::ObjectMeta;
use kube::Resource;

use crate::models::workload::KeptnWorkload;

pub const REPORTING_COMPONENT: &str = "keptn-workload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Normal,
    Warning,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

/// Builds a Kubernetes Event about `workload` for the given lifecycle `phase`.
///
/// The event is annotated with the workload's event annotations and points at the
/// workload as its involved object. Timestamps are left for the publisher to fill in.
pub fn lifecycle_event(
    workload: &KeptnWorkload,
    phase: &str,
    event_type: EventType,
    reason: &str,
    message: &str,
) -> Event {
    let name = workload.workload_name();

    Event {
        metadata: ObjectMeta {
            generate_name: Some(format!("{}-{}-", name, phase.to_lowercase())),
            namespace: workload.metadata.namespace.clone(),
            annotations: Some(workload.event_annotations()),
            ..ObjectMeta::default()
        },
        involved_object: ObjectReference {
            api_version: Some(KeptnWorkload::api_version(&()).to_string()),
            kind: Some(KeptnWorkload::kind(&()).to_string()),
            name: workload.metadata.name.clone(),
            namespace: workload.metadata.namespace.clone(),
            uid: workload.metadata.uid.clone(),
            ..ObjectReference::default()
        },
        type_: Some(event_type.as_str().to_string()),
        reason: Some(format!("{}{}", phase, reason)),
        message: Some(format!(
            "{} / Namespace: {}, Name: {}, Version: {}",
            message,
            workload.metadata.namespace.as_deref().unwrap_or_default(),
            name,
            workload.spec.version
        )),
        reporting_component: Some(REPORTING_COMPONENT.to_string()),
        source: Some(EventSource {
            component: Some(REPORTING_COMPONENT.to_string()),
            host: None,
        }),
        ..Event::default()
    }
}
