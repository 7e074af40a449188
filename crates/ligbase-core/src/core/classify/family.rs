use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Keyword table mapping a family tag to the substrings that identify it.
///
/// Built once at start-up and shared read-only by every classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyTaxonomy {
    families: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    families: BTreeMap<String, Vec<String>>,
}

impl Default for FamilyTaxonomy {
    fn default() -> Self {
        let table: [(&str, &[&str]); 5] = [
            ("kinase", &["kinase", "phosphorylase", "phosphotransferase"]),
            ("protease", &["protease", "peptidase", "hydrolase"]),
            ("gpcr", &["receptor", "gpcr", "g-protein", "transmembrane"]),
            ("nuclear_receptor", &["nuclear", "hormone", "receptor"]),
            ("oxidoreductase", &["dehydrogenase", "reductase", "oxidase"]),
        ];
        Self::new(
            table
                .iter()
                .map(|(tag, kws)| (tag.to_string(), kws.iter().map(|k| k.to_string()).collect())),
        )
    }
}

impl FamilyTaxonomy {
    /// Builds a taxonomy from `(tag, keywords)` pairs; keywords are lower-cased.
    pub fn new<I>(families: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let families = families
            .into_iter()
            .map(|(tag, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (tag, keywords)
            })
            .collect();
        Self { families }
    }

    /// Loads a taxonomy from a TOML file with a `[families]` table.
    pub fn load(path: &Path) -> Result<Self, TaxonomyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TaxonomyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: TaxonomyFile =
            toml::from_str(&content).map_err(|e| TaxonomyLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self::new(file.families))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Returns every family tag whose keywords occur in the title or in any
    /// keyword entry, matched case-insensitively as substrings.
    pub fn classify<S: AsRef<str>>(&self, title: &str, keywords: &[S]) -> BTreeSet<String> {
        let title = title.to_lowercase();
        let entries: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();

        self.families
            .iter()
            .filter(|(_, needles)| {
                needles.iter().any(|needle| {
                    title.contains(needle.as_str())
                        || entries.iter().any(|entry| entry.contains(needle.as_str()))
                })
            })
            .map(|(tag, _)| tag.clone())
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum TaxonomyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tags(set: BTreeSet<String>) -> Vec<String> {
        set.into_iter().collect()
    }

    #[test]
    fn title_substring_selects_family() {
        let taxonomy = FamilyTaxonomy::default();
        let result = taxonomy.classify::<&str>("tyrosine kinase domain", &[]);
        assert_eq!(tags(result), vec!["kinase"]);
    }

    #[test]
    fn unrelated_title_without_keywords_yields_empty_set() {
        let taxonomy = FamilyTaxonomy::default();
        assert!(taxonomy.classify::<&str>("unrelated structure", &[]).is_empty());
    }

    #[test]
    fn keyword_entries_are_matched_case_insensitively() {
        let taxonomy = FamilyTaxonomy::default();
        let result = taxonomy.classify("Crystal structure", &["SERINE PROTEASE", "Hydrolase"]);
        assert_eq!(tags(result), vec!["protease"]);
    }

    #[test]
    fn shared_keyword_emits_every_matching_family_once() {
        let taxonomy = FamilyTaxonomy::default();
        let result = taxonomy.classify("Estrogen receptor", &["receptor", "nuclear receptor"]);
        assert_eq!(tags(result), vec!["gpcr", "nuclear_receptor"]);
    }

    #[test]
    fn new_lowercases_keywords_and_drops_blanks() {
        let taxonomy = FamilyTaxonomy::new([(
            "lectin".to_string(),
            vec!["Lectin".to_string(), "  ".to_string()],
        )]);
        assert!(taxonomy.classify::<&str>("Unrelated protein", &[]).is_empty());
        assert_eq!(tags(taxonomy.classify::<&str>("C-TYPE LECTIN", &[])), vec!["lectin"]);
    }

    #[test]
    fn load_reads_families_table_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[families]\nchaperone = [\"heat shock\", \"chaperone\"]\nkinase = [\"kinase\"]"
        )
        .unwrap();

        let taxonomy = FamilyTaxonomy::load(file.path()).unwrap();
        assert_eq!(taxonomy.tags().collect::<Vec<_>>(), vec!["chaperone", "kinase"]);
        assert_eq!(
            tags(taxonomy.classify::<&str>("Heat Shock Protein 90", &[])),
            vec!["chaperone"]
        );
    }

    #[test]
    fn load_reports_io_and_toml_errors() {
        let missing = FamilyTaxonomy::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(TaxonomyLoadError::Io { .. })));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "families = 3").unwrap();
        let bad = FamilyTaxonomy::load(file.path());
        assert!(matches!(bad, Err(TaxonomyLoadError::Toml { .. })));
    }
}
