//! Compose document construction
//!
//! A request is a list of service specs such as `web`, `web:debug` or
//! `web:debug:-prod`. For each spec the base service configuration is cloned
//! and the named overlays are merged on top of it, in order:
//!
//! - sequences are concatenated (base items first), everything else is
//!   replaced by the overlay;
//! - an overlay name starting with `-` first discards everything merged so
//!   far, base configuration included.
//!
//! The resulting document only carries compose keys: the origin path and the
//! overlay table stay in the [`Catalog`].

use log::debug;
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::catalog::Catalog;
use crate::defaults::COMPOSE_FILE_VERSION;
use crate::error::{Error, Result};
use crate::merge::{merge_mappings, ArrayMergeMode};

/// The document handed to the orchestration binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeDocument {
    pub version: String,
    pub services: Mapping,
    pub volumes: Mapping,
    pub networks: Mapping,
}

impl ComposeDocument {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A compose document and the services it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposePlan {
    pub document: ComposeDocument,
    /// Requested service names in request order, without duplicates. Empty
    /// when the whole catalog was emitted.
    pub service_names: Vec<String>,
}

/// Merge the overlays named by `tokens` into a copy of `base`.
///
/// `lookup` maps an overlay name to its configuration. `service` is only
/// used to report unknown overlays.
pub fn apply_overlays<'a, S, F>(
    service: &str,
    base: &Mapping,
    tokens: &[S],
    lookup: F,
) -> Result<Mapping>
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<&'a Mapping>,
{
    let mut config = base.clone();
    for token in tokens {
        let token = token.as_ref();
        let option = match token.strip_prefix('-') {
            Some(stripped) => {
                debug!("{}: '{}' resets previously merged configuration", service, token);
                config = Mapping::new();
                stripped
            }
            None => token,
        };

        let overlay = lookup(option).ok_or_else(|| Error::OptionNotFound {
            service: service.to_string(),
            option: option.to_string(),
        })?;
        merge_mappings(&mut config, overlay, ArrayMergeMode::Append, service);
    }
    Ok(config)
}

/// Build the compose document for the requested specs.
///
/// With no specs every catalog service is emitted with its base
/// configuration.
pub fn build<S: AsRef<str>>(catalog: &Catalog, specs: &[S]) -> Result<ComposePlan> {
    if specs.is_empty() {
        return Ok(build_full(catalog));
    }

    let mut services = Mapping::new();
    let mut service_names: Vec<String> = Vec::new();

    for spec in specs {
        let mut components = spec.as_ref().split(':');
        let name = components.next().unwrap_or_default();
        let tokens: Vec<&str> = components.collect();

        let service = catalog.get(name).ok_or_else(|| Error::ServiceNotFound {
            service: name.to_string(),
        })?;
        let config = apply_overlays(name, &service.config, tokens.as_slice(), |option| {
            service.options.get(option)
        })?;

        if !service_names.iter().any(|existing| existing == name) {
            service_names.push(name.to_string());
        }
        services.insert(YamlValue::from(name), YamlValue::Mapping(config));
    }

    Ok(ComposePlan {
        document: document(catalog, services),
        service_names,
    })
}

fn build_full(catalog: &Catalog) -> ComposePlan {
    let services = catalog
        .services
        .iter()
        .map(|(name, service)| {
            (
                YamlValue::from(name.as_str()),
                YamlValue::Mapping(service.config.clone()),
            )
        })
        .collect();

    ComposePlan {
        document: document(catalog, services),
        service_names: Vec::new(),
    }
}

fn document(catalog: &Catalog, services: Mapping) -> ComposeDocument {
    ComposeDocument {
        version: COMPOSE_FILE_VERSION.to_string(),
        services,
        volumes: catalog.volumes.clone(),
        networks: catalog.networks.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use indexmap::IndexMap;

    fn yaml(input: &str) -> Mapping {
        serde_yaml::from_str(input).unwrap()
    }

    fn catalog() -> Catalog {
        let mut options = IndexMap::new();
        options.insert("debug".to_string(), yaml("environment: [DEBUG=1]\nports: [\"9229:9229\"]"));
        options.insert("verbose".to_string(), yaml("environment: [VERBOSE=1]"));
        options.insert("prod".to_string(), yaml("image: app:prod\nrestart: always"));

        let mut services = IndexMap::new();
        services.insert(
            "web".to_string(),
            CatalogService {
                path: Some(".".to_string()),
                config: yaml("image: app\nenvironment: [BASE=1]"),
                options,
            },
        );
        services.insert(
            "db".to_string(),
            CatalogService {
                path: Some("db".to_string()),
                config: yaml("image: postgres"),
                options: IndexMap::new(),
            },
        );

        Catalog {
            services,
            volumes: yaml("data: {}"),
            ..Catalog::default()
        }
    }

    #[test]
    fn test_apply_overlays_concatenates_in_order() {
        let catalog = catalog();
        let web = catalog.get("web").unwrap();
        let merged =
            apply_overlays("web", &web.config, &["debug", "verbose"], |o| web.options.get(o))
                .unwrap();

        assert_eq!(
            merged,
            yaml(
                r#"
image: app
environment: [BASE=1, DEBUG=1, VERBOSE=1]
ports: ["9229:9229"]
"#
            )
        );
    }

    #[test]
    fn test_apply_overlays_reset_marker() {
        let catalog = catalog();
        let web = catalog.get("web").unwrap();
        let lookup = |o: &str| web.options.get(o);

        let reset = apply_overlays("web", &web.config, &["debug", "-prod"], lookup).unwrap();
        let alone = apply_overlays("web", &Mapping::new(), &["prod"], lookup).unwrap();
        assert_eq!(reset, alone);
        assert_eq!(reset, yaml("image: app:prod\nrestart: always"));
    }

    #[test]
    fn test_apply_overlays_unknown_option() {
        let catalog = catalog();
        let web = catalog.get("web").unwrap();
        let err = apply_overlays("web", &web.config, &["missing"], |o| web.options.get(o))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::OptionNotFound { ref service, ref option } if service == "web" && option == "missing"
        ));
    }

    #[test]
    fn test_apply_overlays_unknown_reset_option_reports_stripped_name() {
        let catalog = catalog();
        let web = catalog.get("web").unwrap();
        let err =
            apply_overlays("web", &web.config, &["-nope"], |o| web.options.get(o)).unwrap_err();
        assert!(err.to_string().contains("options not found: nope"));
    }

    #[test]
    fn test_apply_overlays_does_not_mutate_base() {
        let catalog = catalog();
        let web = catalog.get("web").unwrap();
        apply_overlays("web", &web.config, &["debug"], |o| web.options.get(o)).unwrap();
        assert_eq!(web.config, yaml("image: app\nenvironment: [BASE=1]"));
    }

    #[test]
    fn test_build_requested_services() {
        let plan = build(&catalog(), &["web:debug", "db"]).unwrap();

        assert_eq!(plan.service_names, vec!["web", "db"]);
        assert_eq!(plan.document.version, "2.4");
        assert_eq!(plan.document.services.len(), 2);
        assert_eq!(plan.document.volumes, yaml("data: {}"));
        let web = plan.document.services["web"].as_mapping().unwrap();
        assert!(web.get("path").is_none());
        assert!(web.get("options").is_none());
    }

    #[test]
    fn test_build_unknown_service() {
        let err = build(&catalog(), &["api"]).unwrap_err();
        assert!(matches!(err, Error::ServiceNotFound { ref service } if service == "api"));
    }

    #[test]
    fn test_build_repeated_service_last_spec_wins() {
        let plan = build(&catalog(), &["web:debug", "web:prod"]).unwrap();

        assert_eq!(plan.service_names, vec!["web"]);
        let web = plan.document.services["web"].as_mapping().unwrap();
        assert_eq!(web.get("restart"), Some(&YamlValue::from("always")));
        assert!(web.get("ports").is_none());
    }

    #[test]
    fn test_build_without_specs_emits_every_base_service() {
        let plan = build::<&str>(&catalog(), &[]).unwrap();

        assert!(plan.service_names.is_empty());
        let names: Vec<&str> = plan
            .document
            .services
            .keys()
            .filter_map(|k| k.as_str())
            .collect();
        assert_eq!(names, vec!["web", "db"]);
        assert_eq!(
            plan.document.services["web"],
            YamlValue::Mapping(yaml("image: app\nenvironment: [BASE=1]"))
        );
    }

    #[test]
    fn test_document_serialization() {
        let plan = build(&catalog(), &["db"]).unwrap();

        let yaml_out = plan.document.to_yaml().unwrap();
        assert!(yaml_out.starts_with("version:"));
        assert!(yaml_out.contains("2.4"));
        assert!(yaml_out.contains("image: postgres"));

        let json: serde_json::Value = serde_json::from_str(&plan.document.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], "2.4");
        assert_eq!(json["services"]["db"]["image"], "postgres");
    }
}
