use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::ApiResource;
use kube::CustomResourceExt;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::workload::KeptnWorkload;
use crate::utils::error::Error;

/// A resource kind the registry knows how to decode.
pub trait Registrable: CustomResourceExt {
    /// Dotted paths of the fields a document of this kind cannot omit.
    fn required_fields() -> &'static [&'static str];
}

impl Registrable for KeptnWorkload {
    fn required_fields() -> &'static [&'static str] {
        &[
            "spec",
            "spec.app",
            "spec.version",
            "spec.resourceReference",
            "spec.resourceReference.uid",
            "spec.resourceReference.kind",
            "spec.resourceReference.name",
        ]
    }
}

pub struct RegisteredKind {
    pub resource: ApiResource,
    pub crd: CustomResourceDefinition,
    pub required_fields: &'static [&'static str],
}

/// The set of kinds this process serves. Built once at startup and handed to
/// whatever needs to decode resources.
#[derive(Default)]
pub struct Registry {
    kinds: Vec<RegisteredKind>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `K`. Registering the same kind twice keeps a single entry.
    pub fn register<K: Registrable>(mut self) -> Self {
        let resource = K::api_resource();
        debug!("registering {} {}", resource.api_version, resource.kind);

        if self.lookup(&resource.api_version, &resource.kind).is_none() {
            self.kinds.push(RegisteredKind {
                resource,
                crd: K::crd(),
                required_fields: K::required_fields(),
            });
        }

        self
    }

    pub fn lookup(&self, api_version: &str, kind: &str) -> Option<&RegisteredKind> {
        self.kinds
            .iter()
            .find(|registered| registered.resource.api_version == api_version && registered.resource.kind == kind)
    }

    pub fn crds(&self) -> impl Iterator<Item = &CustomResourceDefinition> {
        self.kinds.iter().map(|registered| &registered.crd)
    }

    /// Decodes a JSON document into `K`, checking the document's kind is registered and
    /// that every required field is present before deserializing.
    pub fn decode<K: Registrable + DeserializeOwned>(&self, json: &str) -> Result<K, Error> {
        let value: Value = serde_json::from_str(json)?;

        let api_version = value.get("apiVersion").and_then(Value::as_str).unwrap_or_default();
        let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();

        let expected = K::api_resource();
        let registered = match self.lookup(api_version, kind) {
            Some(registered) if registered.resource.kind == expected.kind => registered,
            _ => {
                return Err(Error::UnregisteredKind {
                    api_version: api_version.to_string(),
                    kind: kind.to_string(),
                })
            }
        };

        for field in registered.required_fields {
            let pointer = format!("/{}", field.replace('.', "/"));
            match value.pointer(&pointer) {
                Some(Value::Null) | None => return Err(Error::MissingField(field.to_string())),
                Some(_) => {}
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Encodes `resource` as JSON. Only registered kinds are encoded.
    pub fn encode<K: Registrable + Serialize>(&self, resource: &K) -> Result<String, Error> {
        let resource_type = K::api_resource();
        if self.lookup(&resource_type.api_version, &resource_type.kind).is_none() {
            return Err(Error::UnregisteredKind {
                api_version: resource_type.api_version,
                kind: resource_type.kind,
            });
        }

        Ok(serde_json::to_string(resource)?)
    }
}
