//! Service catalog
//!
//! Fragments declare overlays as services named `base:option`. The catalog
//! folds them into their base service so that only real services remain at
//! the top level:
//!
//! ```yaml
//! services:
//!   web:              # -> catalog["web"]
//!     image: app
//!   web:debug:        # -> catalog["web"].options["debug"]
//!     environment: [DEBUG=1]
//! ```
//!
//! An overlay whose base is never declared produces an empty base service,
//! so `svc:-option` still works for it.

use indexmap::IndexMap;

use serde_yaml::{Mapping, Value as YamlValue};

use crate::include::Aggregate;

/// A base service and its named overlays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogService {
    /// Origin directory, `None` when the service is only known from overlays
    pub path: Option<String>,
    pub config: Mapping,
    pub options: IndexMap<String, Mapping>,
}

/// The aggregate with overlays folded into their services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub services: IndexMap<String, CatalogService>,
    pub volumes: Mapping,
    pub networks: Mapping,
    pub stack_name: Option<String>,
    pub stack_version: Option<String>,
}

impl Catalog {
    /// Partition the aggregate's services into base services and overlays.
    pub fn from_aggregate(aggregate: Aggregate) -> Self {
        let (overlays, bases): (Vec<_>, Vec<_>) = aggregate
            .services
            .into_iter()
            .partition(|(name, _)| name.contains(':'));

        let mut services: IndexMap<String, CatalogService> = bases
            .into_iter()
            .map(|(name, service)| {
                (
                    name,
                    CatalogService {
                        path: Some(service.path),
                        config: service.config,
                        options: IndexMap::new(),
                    },
                )
            })
            .collect();

        for (name, overlay) in overlays {
            if let Some((base, option)) = name.split_once(':') {
                services
                    .entry(base.to_string())
                    .or_default()
                    .options
                    .insert(option.to_string(), overlay.config);
            }
        }

        Self {
            services,
            volumes: aggregate.volumes,
            networks: aggregate.networks,
            stack_name: aggregate.stack_name,
            stack_version: aggregate.stack_version,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogService> {
        self.services.get(name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Render the catalog, bookkeeping included, as a YAML value.
    pub fn to_yaml(&self) -> YamlValue {
        let mut services = Mapping::new();
        for (name, service) in &self.services {
            let mut entry = service.config.clone();
            if let Some(path) = &service.path {
                entry.insert("path".into(), path.as_str().into());
            }
            let options: Mapping = service
                .options
                .iter()
                .map(|(option, overlay)| {
                    (
                        YamlValue::from(option.as_str()),
                        YamlValue::Mapping(overlay.clone()),
                    )
                })
                .collect();
            entry.insert("options".into(), YamlValue::Mapping(options));
            services.insert(name.as_str().into(), YamlValue::Mapping(entry));
        }

        let mut root = Mapping::new();
        if let Some(stack_name) = &self.stack_name {
            root.insert("stackName".into(), stack_name.as_str().into());
        }
        if let Some(stack_version) = &self.stack_version {
            root.insert("stackVersion".into(), stack_version.as_str().into());
        }
        root.insert("services".into(), YamlValue::Mapping(services));
        root.insert("volumes".into(), YamlValue::Mapping(self.volumes.clone()));
        root.insert("networks".into(), YamlValue::Mapping(self.networks.clone()));
        YamlValue::Mapping(root)
    }
}
