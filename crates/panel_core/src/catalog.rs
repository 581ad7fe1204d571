/// Shown when the remote system info carries no environment field.
pub const DEFAULT_ENVIRONMENT: &str = "Production";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub name: String,
    pub size: Option<String>,
}

/// Read-only mirror of the generated files listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactCatalog {
    artifacts: Vec<ArtifactDescriptor>,
    refreshed: bool,
}

impl ArtifactCatalog {
    pub fn replace(&mut self, artifacts: Vec<ArtifactDescriptor>) {
        self.artifacts = artifacts;
        self.refreshed = true;
    }

    pub fn artifacts(&self) -> &[ArtifactDescriptor] {
        &self.artifacts
    }

    pub fn is_refreshed(&self) -> bool {
        self.refreshed
    }
}

/// Service metadata. Only `environment` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemInfo {
    pub environment: Option<String>,
    pub details: Vec<(String, String)>,
}

impl SystemInfo {
    pub fn display_environment(&self) -> &str {
        self.environment
            .as_deref()
            .filter(|env| !env.is_empty())
            .unwrap_or(DEFAULT_ENVIRONMENT)
    }
}
