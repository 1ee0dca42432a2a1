use kube::CustomResource;
use opentelemetry::KeyValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::common;
use super::definition::{self, DefinitionCatalog, DefinitionKind, Phase, ResolvedDefinition};
use crate::utils::error::Error;
use crate::utils::telemetry::SpanAttributeSink;

/// Desired state of a KeptnWorkload. Mirrors the workload resource it was
/// observed on and is replaced wholesale on every observation.
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "lifecycle.keptn.sh",
    version = "v1beta1",
    kind = "KeptnWorkload",
    shortname = "kw",
    status = "KeptnWorkloadStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"AppName", "type":"string", "jsonPath":".spec.app"}"#,
    printcolumn = r#"{"name":"Version", "type":"string", "jsonPath":".spec.version"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KeptnWorkloadSpec {
    /// Name of the KeptnApp containing this workload.
    #[serde(rename = "app")]
    pub app_name: String,

    /// Free-form version, e.g. an image tag. No ordering is implied.
    pub version: String,

    // The following lists hold names of KeptnTaskDefinitions / KeptnEvaluationDefinitions,
    // in execution order. They resolve in the workload namespace or the Keptn namespace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_deployment_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_deployment_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_deployment_evaluations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_deployment_evaluations: Vec<String>,

    /// The Deployment, DaemonSet, StatefulSet or ReplicaSet this workload represents.
    pub resource_reference: ResourceReference,
}

/// Observed state of a KeptnWorkload. Only the orchestrator writes it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeptnWorkloadStatus {
    /// Version currently deployed or being reconciled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
}

/// Link to the parent resource of a workload. `uid` is authoritative, `name` is advisory.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, JsonSchema)]
pub struct ResourceReference {
    pub uid: String,
    pub kind: ResourceKind,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, JsonSchema)]
pub enum ResourceKind {
    Deployment,
    DaemonSet,
    StatefulSet,
    ReplicaSet,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::ReplicaSet => "ReplicaSet",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl KeptnWorkload {
    /// `metadata.name`, or an empty string if the object has none yet.
    pub fn workload_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Version the orchestrator last recorded in the status, if any.
    pub fn current_version(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.current_version.as_deref())
    }

    /// App name, workload name and version, always in that order.
    pub fn span_attributes(&self) -> Vec<KeyValue> {
        vec![
            KeyValue::new(common::APP_NAME, self.spec.app_name.clone()),
            KeyValue::new(common::WORKLOAD_NAME, self.workload_name().to_string()),
            KeyValue::new(common::WORKLOAD_VERSION, self.spec.version.clone()),
        ]
    }

    /// Writes `span_attributes` onto `span`. Nothing is written if the span is invalid or ended.
    pub fn set_span_attributes<S: SpanAttributeSink + ?Sized>(&self, span: &mut S) -> Result<(), Error> {
        if !span.is_valid() {
            return Err(Error::InvalidSpan);
        }

        for attribute in self.span_attributes() {
            span.set_attribute(attribute);
        }

        Ok(())
    }

    /// `appName`, `workloadName` and `workloadVersion` for lifecycle events.
    pub fn event_annotations(&self) -> BTreeMap<String, String> {
        let mut annotations = BTreeMap::new();
        annotations.insert(common::APP_NAME_ANNOTATION.to_string(), self.spec.app_name.clone());
        annotations.insert(common::WORKLOAD_NAME_ANNOTATION.to_string(), self.workload_name().to_string());
        annotations.insert(common::WORKLOAD_VERSION_ANNOTATION.to_string(), self.spec.version.clone());
        annotations
    }

    /// Workload name with a single leading `"<app>-"` removed. Names that do not follow
    /// the convention come back unchanged.
    pub fn name_without_app_prefix(&self) -> String {
        let name = self.workload_name();
        let prefix = format!("{}-", self.spec.app_name);

        name.strip_prefix(prefix.as_str()).unwrap_or(name).to_string()
    }

    /// Definition names for `phase`/`kind`, in execution order.
    pub fn definitions(&self, phase: Phase, kind: DefinitionKind) -> &[String] {
        match (phase, kind) {
            (Phase::PreDeployment, DefinitionKind::Task) => &self.spec.pre_deployment_tasks,
            (Phase::PostDeployment, DefinitionKind::Task) => &self.spec.post_deployment_tasks,
            (Phase::PreDeployment, DefinitionKind::Evaluation) => &self.spec.pre_deployment_evaluations,
            (Phase::PostDeployment, DefinitionKind::Evaluation) => &self.spec.post_deployment_evaluations,
        }
    }

    /// Looks every definition name of `phase`/`kind` up in `catalog`, in execution order.
    pub fn resolve_definitions<C: DefinitionCatalog + ?Sized>(
        &self,
        phase: Phase,
        kind: DefinitionKind,
        catalog: &C,
        system_namespace: &str,
    ) -> Vec<ResolvedDefinition> {
        let namespace = self.metadata.namespace.as_deref().unwrap_or_default();

        definition::resolve(catalog, kind, self.definitions(phase, kind), namespace, system_namespace)
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::{Key, KeyValue};
    use std::collections::BTreeMap;

    use super::{KeptnWorkload, KeptnWorkloadSpec, KeptnWorkloadStatus, ResourceKind, ResourceReference};
    use crate::models::definition::{DefinitionKind, InMemoryCatalog, Location, Phase};
    use crate::utils::error::Error;
    use crate::utils::telemetry::SpanAttributeSink;

    struct RecordingSpan {
        valid: bool,
        attributes: Vec<KeyValue>,
    }

    impl SpanAttributeSink for RecordingSpan {
        fn is_valid(&self) -> bool {
            self.valid
        }

        fn set_attribute(&mut self, attribute: KeyValue) {
            self.attributes.push(attribute);
        }
    }

    fn make_workload(app_name: &str, name: &str, version: &str) -> KeptnWorkload {
        let spec = KeptnWorkloadSpec {
            app_name: app_name.to_string(),
            version: version.to_string(),
            pre_deployment_tasks: vec![],
            post_deployment_tasks: vec![],
            pre_deployment_evaluations: vec![],
            post_deployment_evaluations: vec![],
            resource_reference: ResourceReference {
                uid: "8f2c7a64-1d9e-4b8e-9a0e-3c1f0a6f2b11".to_string(),
                kind: ResourceKind::Deployment,
                name: name.to_string(),
            },
        };

        let mut workload = KeptnWorkload::new(name, spec);
        workload.metadata.namespace = Some("shop".to_string());
        workload
    }

    #[test]
    fn strips_app_prefix() {
        let workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        assert_eq!(workload.name_without_app_prefix(), "frontend");
    }

    #[test]
    fn keeps_name_without_app_prefix() {
        let workload = make_workload("checkout", "frontend", "1.2.3");
        assert_eq!(workload.name_without_app_prefix(), "frontend");

        // the app name alone is not followed by the dash
        let workload = make_workload("checkout", "checkout", "1.2.3");
        assert_eq!(workload.name_without_app_prefix(), "checkout");
    }

    #[test]
    fn strips_app_prefix_only_once() {
        let workload = make_workload("a", "a-a-b", "1");
        assert_eq!(workload.name_without_app_prefix(), "a-b");
    }

    #[test]
    fn empty_app_name_degrades_gracefully() {
        let workload = make_workload("", "frontend", "");
        assert_eq!(workload.name_without_app_prefix(), "frontend");
        assert_eq!(workload.event_annotations()["appName"], "");
    }

    #[test]
    fn missing_name_is_treated_as_empty() {
        let mut workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        workload.metadata.name = None;

        assert_eq!(workload.name_without_app_prefix(), "");
        assert_eq!(workload.event_annotations()["workloadName"], "");
    }

    #[test]
    fn event_annotations_hold_app_workload_and_version() {
        let workload = make_workload("checkout", "checkout-frontend", "1.2.3");

        let expected: BTreeMap<String, String> = [
            ("appName".to_string(), "checkout".to_string()),
            ("workloadName".to_string(), "checkout-frontend".to_string()),
            ("workloadVersion".to_string(), "1.2.3".to_string()),
        ]
        .iter()
        .cloned()
        .collect();

        assert_eq!(workload.event_annotations(), expected);
    }

    #[test]
    fn span_attributes_are_ordered() {
        let workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        let attributes = workload.span_attributes();

        assert_eq!(
            attributes,
            vec![
                KeyValue::new(Key::from_static_str("keptn.deployment.app.name"), "checkout"),
                KeyValue::new(Key::from_static_str("keptn.deployment.workload.name"), "checkout-frontend"),
                KeyValue::new(Key::from_static_str("keptn.deployment.workload.version"), "1.2.3"),
            ]
        );
    }

    #[test]
    fn span_attributes_are_snapshotted() {
        let mut workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        let attributes = workload.span_attributes();

        workload.spec.version = "2.0.0".to_string();

        assert_eq!(attributes[2].value.as_str(), "1.2.3");
        assert_eq!(workload.span_attributes()[2].value.as_str(), "2.0.0");
    }

    #[test]
    fn sets_span_attributes_on_valid_span() {
        let workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        let mut span = RecordingSpan { valid: true, attributes: vec![] };

        workload.set_span_attributes(&mut span).unwrap();

        assert_eq!(span.attributes, workload.span_attributes());
    }

    #[test]
    fn rejects_invalid_span() {
        let workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        let mut span = RecordingSpan { valid: false, attributes: vec![] };

        match workload.set_span_attributes(&mut span) {
            Err(Error::InvalidSpan) => {}
            other => panic!("expected InvalidSpan, got {:?}", other),
        }
        assert!(span.attributes.is_empty());
    }

    #[test]
    fn serializes_with_wire_names() {
        let mut workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        workload.spec.pre_deployment_tasks = vec!["check-db".to_string()];
        workload.status = Some(KeptnWorkloadStatus {
            current_version: Some("1.2.2".to_string()),
        });

        let value = serde_json::to_value(&workload).unwrap();

        assert_eq!(value["apiVersion"], "lifecycle.keptn.sh/v1beta1");
        assert_eq!(value["kind"], "KeptnWorkload");
        assert_eq!(value["spec"]["app"], "checkout");
        assert_eq!(value["spec"]["version"], "1.2.3");
        assert_eq!(value["spec"]["preDeploymentTasks"][0], "check-db");
        assert!(value["spec"].get("postDeploymentTasks").is_none());
        assert_eq!(value["spec"]["resourceReference"]["kind"], "Deployment");
        assert_eq!(value["status"]["currentVersion"], "1.2.2");
    }

    #[test]
    fn round_trips_through_json() {
        let mut workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        workload.spec.pre_deployment_tasks = vec!["migrate".to_string(), "warm-cache".to_string()];
        workload.spec.post_deployment_evaluations = vec!["error-rate".to_string()];
        workload.spec.resource_reference.kind = ResourceKind::StatefulSet;
        workload.status = Some(KeptnWorkloadStatus {
            current_version: Some("1.2.3".to_string()),
        });

        let json = serde_json::to_string(&workload).unwrap();
        let decoded: KeptnWorkload = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, workload);
        assert_eq!(decoded.current_version(), Some("1.2.3"));
    }

    #[test]
    fn omitted_lists_decode_empty() {
        let json = r#"{
            "apiVersion": "lifecycle.keptn.sh/v1beta1",
            "kind": "KeptnWorkload",
            "metadata": { "name": "checkout-frontend" },
            "spec": {
                "app": "checkout",
                "version": "1.2.3",
                "resourceReference": { "uid": "abc", "kind": "DaemonSet", "name": "frontend" }
            }
        }"#;

        let workload: KeptnWorkload = serde_json::from_str(json).unwrap();

        assert!(workload.spec.pre_deployment_tasks.is_empty());
        assert!(workload.spec.post_deployment_tasks.is_empty());
        assert!(workload.spec.pre_deployment_evaluations.is_empty());
        assert!(workload.spec.post_deployment_evaluations.is_empty());
        assert_eq!(workload.spec.resource_reference.kind, ResourceKind::DaemonSet);
        assert_eq!(workload.current_version(), None);
    }

    #[test]
    fn unknown_resource_kind_is_rejected() {
        let json = r#"{ "uid": "abc", "kind": "CronJob", "name": "nightly" }"#;
        assert!(serde_json::from_str::<ResourceReference>(json).is_err());
    }

    #[test]
    fn resolves_definitions_in_order() {
        let mut workload = make_workload("checkout", "checkout-frontend", "1.2.3");
        workload.spec.pre_deployment_evaluations = vec!["slo".to_string(), "capacity".to_string()];

        let mut catalog = InMemoryCatalog::new();
        catalog
            .insert(DefinitionKind::Evaluation, "keptn-system", "slo")
            .insert(DefinitionKind::Evaluation, "shop", "capacity");

        let resolved = workload.resolve_definitions(
            Phase::PreDeployment,
            DefinitionKind::Evaluation,
            &catalog,
            "keptn-system",
        );

        assert_eq!(resolved[0].name, "slo");
        assert_eq!(resolved[0].location, Location::Namespace("keptn-system".to_string()));
        assert_eq!(resolved[1].name, "capacity");
        assert_eq!(resolved[1].location, Location::Namespace("shop".to_string()));

        let post = workload.resolve_definitions(
            Phase::PostDeployment,
            DefinitionKind::Evaluation,
            &catalog,
            "keptn-system",
        );
        assert!(post.is_empty());
    }
}
