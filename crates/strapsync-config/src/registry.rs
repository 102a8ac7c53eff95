// ── Instance registry ──
//
// Saved instances live in the `[[instances]]` array of a config file. The
// registry is bound to an explicit path; every call re-reads the file so
// concurrent edits from another shell are picked up.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{ConfigError, Instance, read_file, save_config_to};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("an instance named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("no instance named '{name}'")]
    NotFound { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// List/add/remove/get over the instances saved in one config file.
#[derive(Debug, Clone)]
pub struct InstanceRegistry {
    path: PathBuf,
}

impl InstanceRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every saved instance, in insertion order.
    pub fn list(&self) -> Result<Vec<Instance>, RegistryError> {
        Ok(read_file(&self.path)?.instances)
    }

    pub fn get(&self, name: &str) -> Result<Instance, RegistryError> {
        self.list()?
            .into_iter()
            .find(|instance| instance.name == name)
            .ok_or_else(|| RegistryError::NotFound { name: name.into() })
    }

    /// Save a new instance. Names are unique.
    pub fn add(&self, instance: Instance) -> Result<(), RegistryError> {
        let mut config = read_file(&self.path)?;
        if config.instances.iter().any(|i| i.name == instance.name) {
            return Err(RegistryError::DuplicateName {
                name: instance.name,
            });
        }
        config.instances.push(instance);
        save_config_to(&self.path, &config)?;
        Ok(())
    }

    /// Remove an instance and return it.
    pub fn remove(&self, name: &str) -> Result<Instance, RegistryError> {
        let mut config = read_file(&self.path)?;
        let index = config
            .instances
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| RegistryError::NotFound { name: name.into() })?;
        let removed = config.instances.remove(index);
        save_config_to(&self.path, &config)?;
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> (tempfile::TempDir, InstanceRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = InstanceRegistry::new(dir.path().join("config.toml"));
        (dir, registry)
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let (_dir, registry) = registry();
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn add_get_remove() {
        let (_dir, registry) = registry();
        registry
            .add(Instance::new("staging", "https://staging.example.com", "ops@example.com"))
            .unwrap();
        registry
            .add(Instance::new("prod", "https://cms.example.com", "ops@example.com"))
            .unwrap();

        let names: Vec<String> = registry.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["staging", "prod"]);
        assert_eq!(registry.get("prod").unwrap().url, "https://cms.example.com");

        let removed = registry.remove("staging").unwrap();
        assert_eq!(removed.name, "staging");
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let (_dir, registry) = registry();
        let instance = Instance::new("staging", "https://a.example.com", "a@example.com");
        registry.add(instance.clone()).unwrap();

        let err = registry.add(instance).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { ref name } if name == "staging"));
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let (_dir, registry) = registry();
        assert!(matches!(
            registry.get("ghost"),
            Err(RegistryError::NotFound { .. })
        ));
        assert!(matches!(
            registry.remove("ghost"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn defaults_survive_registry_writes() {
        let (dir, registry) = registry();
        std::fs::write(
            dir.path().join("config.toml"),
            "[defaults]\ntimeout = 5\ntrust_count_hints = true\n",
        )
        .unwrap();

        registry
            .add(Instance::new("staging", "https://a.example.com", "a@example.com"))
            .unwrap();

        let cfg = read_file(registry.path()).unwrap();
        assert_eq!(cfg.defaults.timeout, 5);
        assert!(cfg.defaults.trust_count_hints);
    }
}
