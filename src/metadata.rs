//! Field descriptor table, the data type and interpretation vocabularies, and
//! the by-name [`MetadataIndex`] the record decoder consults.
//!
//! Descriptors arrive already parsed from the server's `METADATA-TABLE`
//! response. Only `SystemName`, `DataType` and `Interpretation` matter here;
//! every other column of the table is ignored on load.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::BufReader,
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::UnknownDataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Character,
    Point,
    Tiny,
    Small,
    Int,
    Long,
    Number,
    Decimal,
    Date,
    Time,
    DateTime,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Character => "Character",
            DataType::Point => "Point",
            DataType::Tiny => "Tiny",
            DataType::Small => "Small",
            DataType::Int => "Int",
            DataType::Long => "Long",
            DataType::Number => "Number",
            DataType::Decimal => "Decimal",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::DateTime => "DateTime",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "Boolean",
            "Character",
            "Point",
            "Tiny",
            "Small",
            "Int",
            "Long",
            "Number",
            "Decimal",
            "Date",
            "Time",
            "DateTime",
        ]
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UnknownDataType;

    // Protocol type names are matched exactly.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Boolean" => Ok(DataType::Boolean),
            "Character" => Ok(DataType::Character),
            // "Edm.GeographyPoint" in RESO payloads; carried as text.
            "Point" => Ok(DataType::Point),
            "Tiny" => Ok(DataType::Tiny),
            "Small" => Ok(DataType::Small),
            "Int" => Ok(DataType::Int),
            "Long" => Ok(DataType::Long),
            "Number" => Ok(DataType::Number),
            "Decimal" => Ok(DataType::Decimal),
            "Date" => Ok(DataType::Date),
            "Time" => Ok(DataType::Time),
            "DateTime" => Ok(DataType::DateTime),
            other => Err(UnknownDataType(other.to_string())),
        }
    }
}

/// Interpretation tags that change how a value is decoded. Any other tag
/// (`Currency`, `Number`, ...) leaves dispatch to the data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpretation {
    Lookup,
    LookupMulti,
    LookupBitstring,
    LookupBitmask,
}

impl Interpretation {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Lookup" => Some(Interpretation::Lookup),
            "LookupMulti" => Some(Interpretation::LookupMulti),
            "LookupBitstring" => Some(Interpretation::LookupBitstring),
            "LookupBitmask" => Some(Interpretation::LookupBitmask),
            _ => None,
        }
    }

    pub fn is_multi(&self) -> bool {
        !matches!(self, Interpretation::Lookup)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    #[serde(rename = "SystemName")]
    pub name: String,
    #[serde(rename = "DataType")]
    pub data_type: String,
    #[serde(
        rename = "Interpretation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub interpretation: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            interpretation: None,
        }
    }

    pub fn with_interpretation(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }

    /// Descriptor assumed for fields the table does not describe.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Character.as_str())
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.interpretation
            .as_deref()
            .filter(|value| !value.is_empty())
    }
}

/// Immutable lookup of descriptors by `SystemName`.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    descriptors: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
}

impl MetadataIndex {
    pub fn new<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        let descriptors = descriptors.into_iter().collect::<Vec<_>>();
        let by_name = descriptors
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| (descriptor.name.clone(), idx))
            .collect();
        Self {
            descriptors,
            by_name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name
            .get(name)
            .and_then(|idx| self.descriptors.get(*idx))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Descriptors in table order. Shadowed duplicates are skipped.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(idx, descriptor)| self.by_name.get(&descriptor.name) == Some(idx))
            .map(|(_, descriptor)| descriptor)
    }

    /// Loads a descriptor table from JSON, or YAML when the extension says so.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening metadata file {path:?}"))?;
        let reader = BufReader::new(file);
        let descriptors: Vec<FieldDescriptor> = if is_yaml_path(path) {
            serde_yaml::from_reader(reader).context("Parsing metadata YAML")?
        } else {
            serde_json::from_reader(reader).context("Parsing metadata JSON")?
        };
        Ok(Self::new(descriptors))
    }
}

impl FromIterator<FieldDescriptor> for MetadataIndex {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn data_type_parses_every_listed_variant() {
        for name in DataType::variants() {
            let parsed = DataType::from_str(name).expect("known type");
            assert_eq!(parsed.as_str(), *name);
        }
    }

    #[test]
    fn data_type_rejects_unknown_and_differently_cased_names() {
        assert_eq!(
            DataType::from_str("Blob"),
            Err(UnknownDataType("Blob".to_string()))
        );
        assert!(DataType::from_str("int").is_err());
    }

    #[test]
    fn interpretation_ignores_non_lookup_tags() {
        assert_eq!(Interpretation::from_tag("Lookup"), Some(Interpretation::Lookup));
        assert!(Interpretation::from_tag("LookupBitmask").unwrap().is_multi());
        assert_eq!(Interpretation::from_tag("Currency"), None);
        assert_eq!(Interpretation::from_tag(""), None);
    }

    #[test]
    fn index_lookup_returns_descriptor_or_none() {
        let index = MetadataIndex::new(vec![
            FieldDescriptor::new("ListPrice", "Decimal"),
            FieldDescriptor::new("Status", "Character").with_interpretation("Lookup"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("ListPrice").unwrap().data_type, "Decimal");
        assert_eq!(index.get("Status").unwrap().interpretation(), Some("Lookup"));
        assert!(index.get("Missing").is_none());
    }

    #[test]
    fn index_keeps_last_duplicate_and_iterates_in_table_order() {
        let index = MetadataIndex::new(vec![
            FieldDescriptor::new("A", "Int"),
            FieldDescriptor::new("B", "Int"),
            FieldDescriptor::new("A", "Decimal"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("A").unwrap().data_type, "Decimal");
        let names = index.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn empty_interpretation_counts_as_absent() {
        let descriptor = FieldDescriptor::new("X", "Int").with_interpretation("");
        assert_eq!(descriptor.interpretation(), None);
    }

    #[test]
    fn load_reads_json_and_ignores_extra_columns() {
        let mut file = NamedTempFile::with_suffix(".json").expect("temp file");
        write!(
            file,
            r#"[{{"SystemName":"L_ListPrice","DataType":"Decimal","LongName":"List Price"}},
               {{"SystemName":"L_Status","DataType":"Character","Interpretation":"Lookup"}}]"#
        )
        .unwrap();
        let index = MetadataIndex::load(file.path()).expect("load json");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("L_Status").unwrap().interpretation(), Some("Lookup"));
    }

    #[test]
    fn load_reads_yaml_by_extension() {
        let mut file = NamedTempFile::with_suffix(".yaml").expect("temp file");
        writeln!(file, "- SystemName: L_Beds").unwrap();
        writeln!(file, "  DataType: Int").unwrap();
        let index = MetadataIndex::load(file.path()).expect("load yaml");
        assert_eq!(index.get("L_Beds").unwrap().data_type, "Int");
    }
}
