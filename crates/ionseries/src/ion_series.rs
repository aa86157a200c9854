use fnv::FnvHashSet;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::grouping::PeptideIndex;
use crate::spectrum::Psm;
use crate::Error;

/// Floor for the intensity threshold fraction. Configuration can raise the
/// fraction above this, never lower it below.
pub const MIN_INTENSITY_FRACTION: f64 = 0.05;

/// Coverage class of a PSM's fragmentation evidence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeriesClass {
    Incomplete,
    BSeries,
    YSeries,
    /// Neutral-loss and immonium evidence alone spans the backbone
    Combined,
    /// Only the union of all fragment types spans the backbone
    CombinedAll,
}

impl SeriesClass {
    pub fn flag(&self) -> u8 {
        match self {
            SeriesClass::Incomplete => 0,
            SeriesClass::BSeries => 1,
            SeriesClass::YSeries => 2,
            SeriesClass::Combined => 3,
            SeriesClass::CombinedAll => 4,
        }
    }
}

impl Serialize for SeriesClass {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.flag())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum FragmentKind {
    B,
    Y,
    /// Neutral-loss satellite of a b-ion, e.g. "b ion -H2O"
    BSatellite,
    /// Neutral-loss satellite of a y-ion
    YSatellite,
    Immonium,
}

/// Classify an ion-type name. Names may carry the mzIdentML CV prefix
/// "frag: "; satellites are recognized by their "-" decoration suffix.
fn fragment_kind(name: &str) -> Option<FragmentKind> {
    let name = name.strip_prefix("frag: ").unwrap_or(name);
    if name == "y ion" {
        Some(FragmentKind::Y)
    } else if name.starts_with("y ion -") {
        Some(FragmentKind::YSatellite)
    } else if name == "b ion" {
        Some(FragmentKind::B)
    } else if name.starts_with("b ion -") {
        Some(FragmentKind::BSatellite)
    } else if name.contains("immonium") {
        Some(FragmentKind::Immonium)
    } else {
        None
    }
}

/// Classification result for one PSM: which sequence positions are covered,
/// by which class of fragment evidence, and the protein annotation.
#[derive(Debug, Clone, Serialize)]
pub struct IonSeriesMatch {
    pub sequence: String,
    pub score: f64,
    /// Sorted accession set joined with `:`; empty if the peptide has no
    /// evidence mapping
    pub accessions: String,
    pub b_ions: Vec<usize>,
    pub y_ions: Vec<usize>,
    /// Neutral-loss and immonium positions
    pub satellite_ions: Vec<usize>,
    /// Union of all covered positions
    pub all_ions: Vec<usize>,
    /// The set that determined `class`, sorted ascending
    pub final_indices: Vec<usize>,
    pub class: SeriesClass,
}

/// Classifies PSMs against a read-only peptide index. Cheap to share across
/// threads - all state is borrowed and immutable.
pub struct Classifier<'db> {
    index: &'db PeptideIndex,
    min_intensity_fraction: f64,
    fallback_to_all: bool,
}

impl<'db> Classifier<'db> {
    pub fn new(index: &'db PeptideIndex, min_intensity_fraction: f64, fallback_to_all: bool) -> Self {
        Classifier {
            index,
            min_intensity_fraction,
            fallback_to_all,
        }
    }

    /// The configured fraction, clamped from below by
    /// [`MIN_INTENSITY_FRACTION`].
    pub fn effective_fraction(&self) -> f64 {
        self.min_intensity_fraction.max(MIN_INTENSITY_FRACTION)
    }

    pub fn classify(&self, psm: &Psm) -> Result<IonSeriesMatch, Error> {
        let score = psm.score()?;
        let accessions = self.index.annotate(&psm.peptide_ref);
        let sequence_len = psm.sequence_len();
        let fraction = self.effective_fraction();

        let mut b_ions = FnvHashSet::default();
        let mut y_ions = FnvHashSet::default();
        let mut satellite_ions = FnvHashSet::default();
        let mut all_ions = FnvHashSet::default();

        for fragment in &psm.fragments {
            if fragment.indices.len() != fragment.intensities.len() {
                log::warn!(
                    "skipping fragment `{}` of {}: {} indices vs {} intensities",
                    fragment.name,
                    psm.peptide_ref,
                    fragment.indices.len(),
                    fragment.intensities.len()
                );
                continue;
            }
            let kind = match fragment_kind(&fragment.name) {
                Some(kind) => kind,
                None => continue,
            };
            // Each ion type gets its own cutoff from its own strongest peak
            let cutoff = fraction * fragment.intensities.iter().fold(0.0f64, |a, &b| a.max(b));
            for (&index, &intensity) in fragment.indices.iter().zip(&fragment.intensities) {
                if intensity < cutoff {
                    continue;
                }
                match kind {
                    FragmentKind::Y => {
                        y_ions.insert(index);
                        all_ions.insert(index);
                    }
                    FragmentKind::B => {
                        // b-ions are numbered from the N-terminus; mirror
                        // them into the y-numbering space
                        let mirrored = sequence_len.saturating_sub(index);
                        b_ions.insert(mirrored);
                        all_ions.insert(mirrored);
                    }
                    FragmentKind::BSatellite => {
                        let mirrored = sequence_len.saturating_sub(index);
                        satellite_ions.insert(mirrored);
                        all_ions.insert(mirrored);
                    }
                    FragmentKind::YSatellite | FragmentKind::Immonium => {
                        satellite_ions.insert(index);
                        all_ions.insert(index);
                    }
                }
            }
        }

        // A sequence of length L has L-1 internal cleavage positions; a
        // series is complete when it covers all of them. Ties break in this
        // fixed order.
        let target = sequence_len.saturating_sub(1);
        let candidates = [
            (&b_ions, SeriesClass::BSeries),
            (&y_ions, SeriesClass::YSeries),
            (&satellite_ions, SeriesClass::Combined),
            (&all_ions, SeriesClass::CombinedAll),
        ];
        let (class, final_indices) = match candidates
            .iter()
            .find(|(set, _)| set.len() == target)
        {
            Some((set, class)) => (*class, sorted(set)),
            None if self.fallback_to_all => (SeriesClass::Incomplete, sorted(&all_ions)),
            None => (SeriesClass::Incomplete, Vec::new()),
        };

        Ok(IonSeriesMatch {
            sequence: psm.peptide_ref.clone(),
            score,
            accessions,
            b_ions: sorted(&b_ions),
            y_ions: sorted(&y_ions),
            satellite_ions: sorted(&satellite_ions),
            all_ions: sorted(&all_ions),
            final_indices,
            class,
        })
    }

    /// Classify every PSM that passed its identification threshold, in
    /// parallel across the current rayon pool. Results come back in
    /// submission order; the first fatal error aborts the whole batch.
    pub fn classify_all(&self, psms: &[Psm]) -> Result<Vec<IonSeriesMatch>, Error> {
        let progress = AtomicUsize::new(0);
        psms.par_iter()
            .filter(|psm| psm.pass_threshold)
            .map(|psm| {
                let processed = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if processed % 2000 == 0 {
                    log::info!("classified {} PSMs", processed);
                }
                self.classify(psm)
            })
            .collect()
    }
}

fn sorted(set: &FnvHashSet<usize>) -> Vec<usize> {
    let mut indices: Vec<usize> = set.iter().copied().collect();
    indices.sort_unstable();
    indices
}
