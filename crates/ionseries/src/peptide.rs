use serde::Deserialize;

/// A peptide definition from the identification document.
///
/// `sequence` is the plain amino-acid string; `id` is the document-level
/// identifier (typically the sequence with a charge/variant suffix).
#[derive(Deserialize, Debug, Clone)]
pub struct Peptide {
    pub id: String,
    pub sequence: String,
    #[serde(default)]
    pub modifications: Vec<Modification>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

impl Peptide {
    /// A peptide with no modifications of either kind contributes nothing
    /// to evidence annotation.
    pub fn is_unmodified(&self) -> bool {
        self.modifications.is_empty() && self.substitutions.is_empty()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Modification {
    pub mass_delta: f64,
    /// 1-based position within the peptide; 0 denotes the N-terminus
    pub location: usize,
    #[serde(default)]
    pub residues: Vec<String>,
    /// CV names for this modification, e.g. "Oxidation"
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Substitution {
    pub mass_delta: f64,
    pub location: usize,
    pub original_residue: String,
    pub replacement_residue: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unmodified() {
        let peptide: Peptide = serde_json::from_str(
            r#"{"id": "PEPTIDE_2", "sequence": "PEPTIDE"}"#,
        )
        .unwrap();
        assert!(peptide.is_unmodified());

        let peptide: Peptide = serde_json::from_str(
            r#"{
                "id": "PEPTIDEM_2",
                "sequence": "PEPTIDEM",
                "modifications": [{"mass_delta": 15.9949, "location": 8, "names": ["Oxidation"]}]
            }"#,
        )
        .unwrap();
        assert!(!peptide.is_unmodified());
        assert_eq!(peptide.modifications[0].names, vec!["Oxidation"]);
    }
}
