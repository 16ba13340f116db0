use serde::{Deserialize, Serialize};

/// Options for one import run.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Prefix prepended (with `_`) to every tool name.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Which declared security scheme describes the tools' auth.
    #[serde(default)]
    pub security: SecuritySelection,
}

impl ImportOptions {
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_security(mut self, security: SecuritySelection) -> Self {
        self.security = security;
        self
    }

    /// The namespace, with an empty string treated as none.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }
}

/// Security scheme selection policy.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySelection {
    /// The first scheme in declaration order.
    #[default]
    First,
    /// The scheme declared under this key in `components.securitySchemes`.
    Named(String),
}
