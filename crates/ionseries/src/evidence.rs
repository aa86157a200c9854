use fnv::FnvHashMap;
use serde::Deserialize;

use crate::peptide::Peptide;
use crate::Error;

/// Raw peptide evidence from the identification document: one occurrence of
/// a peptide within a protein sequence.
#[derive(Deserialize, Debug, Clone)]
pub struct PeptideEvidence {
    /// Composite id, e.g. "PepEv_17_P02768"
    pub id: String,
    /// Protein accession this evidence points into
    pub accession: String,
    /// Peptide reference - matches `Peptide::sequence`
    pub peptide_ref: String,
    /// 1-based inclusive position range within the protein
    pub start: u32,
    pub end: u32,
    /// Flanking residues
    pub pre: String,
    pub post: String,
    pub is_decoy: bool,
}

/// Non-decoy evidence annotated with the modification names of its peptide.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceRecord {
    pub accession: String,
    pub evidence_id: u32,
    pub sequence: String,
    pub start: u32,
    pub end: u32,
    pub pre: String,
    pub post: String,
    pub modifications: Vec<String>,
}

/// Second `_`-separated token of the composite evidence id.
fn parse_evidence_id(id: &str) -> Result<u32, Error> {
    id.split('_')
        .nth(1)
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| Error::MalformedEvidenceId(id.to_string()))
}

/// Build the non-decoy evidence list for one document.
///
/// Two passes: first the peptide definitions are reduced to a map from
/// sequence to the deduplicated union of modification names (unmodified
/// peptides contribute nothing and are never stored), then the evidence
/// list is walked once, dropping decoys and annotating the survivors.
/// The returned records are sorted ascending by peptide sequence, ready
/// for [`crate::grouping::PeptideIndex::build`].
pub fn collect_evidence(
    peptides: &[Peptide],
    evidence: &[PeptideEvidence],
) -> Result<Vec<EvidenceRecord>, Error> {
    let mut names_by_sequence: FnvHashMap<&str, Vec<String>> = FnvHashMap::default();
    for peptide in peptides {
        if peptide.is_unmodified() {
            continue;
        }
        let names = names_by_sequence
            .entry(peptide.sequence.as_str())
            .or_default();
        for modification in &peptide.modifications {
            for name in &modification.names {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
    }

    let mut records = Vec::with_capacity(evidence.len());
    for ev in evidence {
        if ev.is_decoy {
            continue;
        }
        let evidence_id = parse_evidence_id(&ev.id)?;
        let modifications = names_by_sequence
            .get(ev.peptide_ref.as_str())
            .cloned()
            .unwrap_or_default();
        records.push(EvidenceRecord {
            accession: ev.accession.clone(),
            evidence_id,
            sequence: ev.peptide_ref.clone(),
            start: ev.start,
            end: ev.end,
            pre: ev.pre.clone(),
            post: ev.post.clone(),
            modifications,
        });
    }
    records.sort_by(|a, b| a.sequence.cmp(&b.sequence));
    Ok(records)
}
