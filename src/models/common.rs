use opentelemetry::Key;

/// Span attribute carrying the name of the owning KeptnApp.
pub const APP_NAME: Key = Key::from_static_str("keptn.deployment.app.name");
/// Span attribute carrying the workload name.
pub const WORKLOAD_NAME: Key = Key::from_static_str("keptn.deployment.workload.name");
/// Span attribute carrying the workload version.
pub const WORKLOAD_VERSION: Key = Key::from_static_str("keptn.deployment.workload.version");

// event annotation keys
pub const APP_NAME_ANNOTATION: &str = "appName";
pub const WORKLOAD_NAME_ANNOTATION: &str = "workloadName";
pub const WORKLOAD_VERSION_ANNOTATION: &str = "workloadVersion";
