use serde::Deserialize;

use crate::Error;

/// Name/value parameter attached to a PSM, e.g. the search engine score.
#[derive(Deserialize, Debug, Clone)]
pub struct CvParam {
    pub name: String,
    pub value: String,
}

/// One fragment-ion observation: an ion type with the sequence positions it
/// was matched at, and parallel arrays of measured m/z and raw intensity.
#[derive(Deserialize, Debug, Clone)]
pub struct IonFragment {
    /// CV name of the ion type, e.g. "frag: b ion" or "y ion -H2O"
    pub name: String,
    pub indices: Vec<usize>,
    #[serde(default)]
    pub mz: Vec<f64>,
    pub intensities: Vec<f64>,
}

/// One peptide-spectrum match.
#[derive(Deserialize, Debug, Clone)]
pub struct Psm {
    /// Peptide reference, possibly carrying a `_`-separated suffix such as
    /// a charge state ("PEPTIDE_2")
    pub peptide_ref: String,
    pub pass_threshold: bool,
    #[serde(default)]
    pub params: Vec<CvParam>,
    #[serde(default)]
    pub fragments: Vec<IonFragment>,
}

impl Psm {
    /// The search engine score, taken from the first parameter whose name
    /// contains "PSM score".
    pub fn score(&self) -> Result<f64, Error> {
        let param = self
            .params
            .iter()
            .find(|param| param.name.contains("PSM score"))
            .ok_or_else(|| Error::ScoreParse("missing PSM score parameter".into()))?;
        param
            .value
            .parse()
            .map_err(|_| Error::ScoreParse(param.value.clone()))
    }

    /// Length of the amino-acid sequence proper: any `_`-separated suffix
    /// on the peptide reference is not part of the sequence.
    pub fn sequence_len(&self) -> usize {
        match self.peptide_ref.split_once('_') {
            Some((sequence, _)) => sequence.len(),
            None => self.peptide_ref.len(),
        }
    }
}
