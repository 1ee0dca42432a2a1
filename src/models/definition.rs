use std::collections::BTreeSet;

/// Which phase of the rollout a definition runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreDeployment,
    PostDeployment,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreDeployment => "pre-deployment",
            Phase::PostDeployment => "post-deployment",
        }
    }
}

/// The catalog a task or evaluation name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DefinitionKind {
    Task,
    Evaluation,
}

/// Where a definition name resolved to at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Namespace(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefinition {
    pub name: String,
    pub kind: DefinitionKind,
    pub location: Location,
}

/// Lookup capability supplied by the orchestrator. A workload only holds
/// definition names; this answers whether a name exists in a namespace.
pub trait DefinitionCatalog {
    fn contains(&self, kind: DefinitionKind, namespace: &str, name: &str) -> bool;
}

/// Resolves `names` in order, preferring `namespace` over `system_namespace`.
pub fn resolve<C: DefinitionCatalog + ?Sized>(
    catalog: &C,
    kind: DefinitionKind,
    names: &[String],
    namespace: &str,
    system_namespace: &str,
) -> Vec<ResolvedDefinition> {
    names
        .iter()
        .map(|name| {
            let location = if catalog.contains(kind, namespace, name) {
                Location::Namespace(namespace.to_string())
            } else if catalog.contains(kind, system_namespace, name) {
                Location::Namespace(system_namespace.to_string())
            } else {
                Location::Missing
            };

            ResolvedDefinition {
                name: name.clone(),
                kind,
                location,
            }
        })
        .collect()
}

/// Set-backed catalog, handy for tests and for callers that snapshot the
/// definitions they know about.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: BTreeSet<(DefinitionKind, String, String)>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DefinitionKind, namespace: &str, name: &str) -> &mut Self {
        self.entries
            .insert((kind, namespace.to_string(), name.to_string()));
        self
    }
}

impl DefinitionCatalog for InMemoryCatalog {
    fn contains(&self, kind: DefinitionKind, namespace: &str, name: &str) -> bool {
        self.entries
            .contains(&(kind, namespace.to_string(), name.to_string()))
    }
}
