//! Class configuration shared by `prepare` and `layout`.
//!
//! ```yaml
//! class_names: [button, text, image]
//! label_list: [10, 20, 30]
//! reduce_zero_label: false
//! include_val: false
//! min_width: 5
//! min_height: 5
//! ```
//!
//! `class_names` may also be a mapping from class index to name. Keys are
//! label values, so they start at 1 (0 is background); missing indices are
//! named `class_<index>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SeguiError;
use crate::extract::ExtractOptions;
use crate::label::{ClassMapping, LabelTransform};
use crate::model::IGNORE_INDEX;

/// Validated class configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassConfig {
    /// Name of class `k` is `class_names[k - 1]`.
    pub class_names: Vec<String>,
    pub label_mapping: Option<ClassMapping>,
    pub reduce_zero_label: bool,
    pub include_val: bool,
    pub extract: ExtractOptions,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassConfig {
    #[serde(default)]
    class_names: Option<ClassNames>,
    #[serde(default)]
    label_list: Option<Vec<i64>>,
    #[serde(default)]
    reduce_zero_label: bool,
    #[serde(default)]
    include_val: bool,
    #[serde(default)]
    min_width: Option<u32>,
    #[serde(default)]
    min_height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

impl ClassConfig {
    /// Label transform for training samples.
    pub fn label_transform(&self) -> LabelTransform {
        LabelTransform::new(self.label_mapping.clone(), self.reduce_zero_label)
    }
}

/// Reads and validates a YAML class configuration.
///
/// # Errors
/// [`SeguiError::ConfigParse`] for malformed YAML and
/// [`SeguiError::Configuration`] for well-formed but invalid content.
pub fn read_config(path: &Path) -> Result<ClassConfig, SeguiError> {
    let data = fs::read_to_string(path).map_err(SeguiError::Io)?;
    let raw: RawClassConfig =
        serde_yaml::from_str(&data).map_err(|source| SeguiError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(raw)
}

/// Parses a configuration from a YAML string.
pub fn from_yaml_str(yaml: &str) -> Result<ClassConfig, SeguiError> {
    let raw: RawClassConfig = serde_yaml::from_str(yaml).map_err(|source| {
        SeguiError::ConfigParse {
            path: "<string>".into(),
            source,
        }
    })?;
    validate(raw)
}

fn validate(raw: RawClassConfig) -> Result<ClassConfig, SeguiError> {
    let class_names = match raw.class_names {
        None => return Err(SeguiError::configuration("class_names is required")),
        Some(ClassNames::Sequence(names)) => names,
        Some(ClassNames::Mapping(mapping)) => names_from_mapping(mapping)?,
    };

    if class_names.is_empty() {
        return Err(SeguiError::configuration("class_names must not be empty"));
    }
    if class_names.len() >= IGNORE_INDEX as usize {
        return Err(SeguiError::configuration(format!(
            "at most {} classes are supported, found {}",
            IGNORE_INDEX - 1,
            class_names.len()
        )));
    }
    if let Some(position) = class_names.iter().position(|n| n.trim().is_empty()) {
        return Err(SeguiError::configuration(format!(
            "class_names entry for class {} is blank",
            position + 1
        )));
    }

    let label_mapping = raw.label_list.map(ClassMapping::from_values).transpose()?;

    let defaults = ExtractOptions::default();
    let extract = ExtractOptions {
        min_width: raw.min_width.unwrap_or(defaults.min_width),
        min_height: raw.min_height.unwrap_or(defaults.min_height),
    };

    Ok(ClassConfig {
        class_names,
        label_mapping,
        reduce_zero_label: raw.reduce_zero_label,
        include_val: raw.include_val,
        extract,
    })
}

fn names_from_mapping(mapping: BTreeMap<u32, String>) -> Result<Vec<String>, SeguiError> {
    if mapping.contains_key(&0) {
        return Err(SeguiError::configuration(
            "class_names mapping starts at 1; index 0 is background",
        ));
    }
    let Some(&max_index) = mapping.keys().next_back() else {
        return Ok(Vec::new());
    };
    if max_index >= IGNORE_INDEX as u32 {
        return Err(SeguiError::configuration(format!(
            "class index {} is out of range 1..={}",
            max_index,
            IGNORE_INDEX - 1
        )));
    }

    Ok((1..=max_index)
        .map(|index| {
            mapping
                .get(&index)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", index))
        })
        .collect())
}
