pub mod evidence;
pub mod grouping;
pub mod ion_series;
pub mod peptide;
pub mod spectrum;

use serde::Deserialize;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// No non-decoy evidence in the document - there is nothing to group
    EmptyEvidence,
    /// Composite evidence id without a parseable integer token
    MalformedEvidenceId(String),
    /// PSM score parameter missing or not a number
    ScoreParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEvidence => f.write_str("document contains no non-decoy peptide evidence"),
            Self::MalformedEvidenceId(id) => {
                write!(f, "malformed evidence id `{}`: expected `<tag>_<number>`", id)
            }
            Self::ScoreParse(s) => write!(f, "could not parse PSM score from `{}`", s),
        }
    }
}

impl std::error::Error for Error {}

/// One identification document, as delivered by the upstream converter.
///
/// Parsing the on-disk mzIdentML format is not this crate's job: the
/// converter hands over peptide definitions, peptide evidence, and PSMs
/// already structured.
#[derive(Deserialize, Debug, Default)]
pub struct Identification {
    #[serde(default)]
    pub peptides: Vec<peptide::Peptide>,
    #[serde(default)]
    pub evidence: Vec<evidence::PeptideEvidence>,
    #[serde(default)]
    pub psms: Vec<spectrum::Psm>,
}
