use fnv::FnvHashMap;
use itertools::Itertools;
use serde::Serialize;

use crate::evidence::EvidenceRecord;
use crate::Error;

/// One distinct peptide sequence and every protein accession with evidence
/// for it, plus a representative position sample from the first evidence
/// record of the group.
#[derive(Debug, Clone, Serialize)]
pub struct PeptideGroup {
    pub sequence: String,
    /// Sorted, deduplicated; never empty
    pub accessions: Vec<String>,
    pub start: u32,
    pub end: u32,
    pub pre: String,
    pub post: String,
}

impl PeptideGroup {
    fn from_run(sequence: String, mut accessions: Vec<String>, first: &EvidenceRecord) -> Self {
        accessions.sort_unstable();
        PeptideGroup {
            sequence,
            accessions,
            start: first.start,
            end: first.end,
            pre: first.pre.clone(),
            post: first.post.clone(),
        }
    }
}

/// Read-only index over [`PeptideGroup`]s, shared across classification
/// tasks. Built once per document from the sorted evidence stream.
pub struct PeptideIndex {
    groups: Vec<PeptideGroup>,
    by_sequence: FnvHashMap<String, usize>,
}

impl PeptideIndex {
    /// Streaming group-by over evidence sorted ascending by sequence.
    ///
    /// The trailing run has no sequence change to trigger its emission, so
    /// it is flushed explicitly after the loop.
    pub fn build(records: &[EvidenceRecord]) -> Result<Self, Error> {
        let first = records.first().ok_or(Error::EmptyEvidence)?;

        let mut groups = Vec::new();
        let mut target = first;
        let mut accessions: Vec<String> = Vec::new();
        for record in records {
            if record.sequence == target.sequence {
                if !accessions.contains(&record.accession) {
                    accessions.push(record.accession.clone());
                }
            } else {
                groups.push(PeptideGroup::from_run(
                    target.sequence.clone(),
                    std::mem::take(&mut accessions),
                    target,
                ));
                accessions.push(record.accession.clone());
                target = record;
            }
        }
        groups.push(PeptideGroup::from_run(
            target.sequence.clone(),
            accessions,
            target,
        ));

        let by_sequence = groups
            .iter()
            .enumerate()
            .map(|(idx, group)| (group.sequence.clone(), idx))
            .collect();
        Ok(PeptideIndex { groups, by_sequence })
    }

    pub fn get(&self, sequence: &str) -> Option<&PeptideGroup> {
        self.by_sequence
            .get(sequence)
            .map(|&idx| &self.groups[idx])
    }

    pub fn groups(&self) -> &[PeptideGroup] {
        &self.groups
    }

    /// Accession annotation for a peptide: the sorted accession set joined
    /// with `:`, or the empty string for sequences without evidence.
    pub fn annotate(&self, sequence: &str) -> String {
        match self.get(sequence) {
            Some(group) => group.accessions.iter().join(":"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(sequence: &str, accession: &str) -> EvidenceRecord {
        EvidenceRecord {
            accession: accession.into(),
            evidence_id: 1,
            sequence: sequence.into(),
            start: 10,
            end: 16,
            pre: "K".into(),
            post: "R".into(),
            modifications: vec![],
        }
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            PeptideIndex::build(&[]),
            Err(Error::EmptyEvidence)
        ));
    }

    #[test]
    fn single_record_yields_one_group() {
        // The trailing run must be flushed even when it is the only run
        let index = PeptideIndex::build(&[record("PEPTIDE", "P001")]).unwrap();
        assert_eq!(index.groups().len(), 1);
        assert_eq!(index.groups()[0].accessions, vec!["P001"]);
    }

    #[test]
    fn groups_partition_the_input() {
        let records = vec![
            record("AAAA", "P003"),
            record("AAAA", "P001"),
            record("AAAA", "P001"),
            record("CCCC", "P002"),
            record("DDDD", "P004"),
            record("DDDD", "P005"),
        ];
        let index = PeptideIndex::build(&records).unwrap();
        assert_eq!(index.groups().len(), 3);

        // Every input sequence lands in exactly one group, and each group's
        // accession set is the distinct accessions of its run
        assert_eq!(index.get("AAAA").unwrap().accessions, vec!["P001", "P003"]);
        assert_eq!(index.get("CCCC").unwrap().accessions, vec!["P002"]);
        assert_eq!(index.get("DDDD").unwrap().accessions, vec!["P004", "P005"]);

        let total: usize = index
            .groups()
            .iter()
            .map(|group| group.accessions.len())
            .sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn accessions_are_sorted() {
        let records = vec![record("AAAA", "P002"), record("AAAA", "P001")];
        let index = PeptideIndex::build(&records).unwrap();
        assert_eq!(index.annotate("AAAA"), "P001:P002");
    }

    #[test]
    fn missing_sequence_annotates_empty() {
        let index = PeptideIndex::build(&[record("AAAA", "P001")]).unwrap();
        assert_eq!(index.annotate("MISSING"), "");
    }

    #[test]
    fn representative_position_comes_from_first_record() {
        let mut second = record("AAAA", "P002");
        second.start = 99;
        let index = PeptideIndex::build(&[record("AAAA", "P001"), second]).unwrap();
        assert_eq!(index.get("AAAA").unwrap().start, 10);
    }
}
