use ionseries_cli::input::Search;
use ionseries_cli::runner::Runner;
use serde_json::json;

#[test]
fn integration() -> anyhow::Result<()> {
    let base = std::env::temp_dir().join(format!("ionseries-integration-{}", std::process::id()));
    std::fs::create_dir_all(&base)?;

    let document = json!({
        "peptides": [
            {
                "id": "PEPTIDE_1",
                "sequence": "PEPTIDE",
                "modifications": [
                    {"mass_delta": 15.9949, "location": 1, "residues": ["P"], "names": ["Oxidation"]}
                ]
            }
        ],
        "evidence": [
            {"id": "PepEv_1_a", "accession": "P002", "peptide_ref": "PEPTIDE",
             "start": 10, "end": 16, "pre": "K", "post": "R", "is_decoy": false},
            {"id": "PepEv_2_b", "accession": "P001", "peptide_ref": "PEPTIDE",
             "start": 4, "end": 10, "pre": "R", "post": "G", "is_decoy": false},
            {"id": "PepEv_3_c", "accession": "rev_P001", "peptide_ref": "EDITPEP",
             "start": 4, "end": 10, "pre": "R", "post": "G", "is_decoy": true}
        ],
        "psms": [
            {
                "peptide_ref": "PEPTIDE",
                "pass_threshold": true,
                "params": [{"name": "PEAKS:peptideScore (PSM score)", "value": "55.5"}],
                "fragments": [
                    {
                        "name": "frag: b ion",
                        "indices": [1, 2, 3, 4, 5, 6],
                        "mz": [98.06, 227.1, 324.16, 425.2, 538.29, 653.31],
                        "intensities": [100.0, 90.0, 80.0, 70.0, 60.0, 50.0]
                    }
                ]
            },
            {
                "peptide_ref": "PEPTIDE",
                "pass_threshold": false,
                "params": [{"name": "PSM score", "value": "1.0"}],
                "fragments": []
            },
            {
                "peptide_ref": "UNKNOWN",
                "pass_threshold": true,
                "params": [{"name": "PSM score", "value": "1.5"}],
                "fragments": []
            }
        ]
    });
    let document_path = base.join("sample.json");
    std::fs::write(&document_path, serde_json::to_vec(&document)?)?;

    let output_directory = base.join("out");
    let runner = Runner::new(Search {
        version: env!("CARGO_PKG_VERSION").into(),
        mzid_paths: vec![document_path.display().to_string()],
        output_directory: output_directory.clone(),
        intensity_fraction: 0.05,
        fallback_to_all: false,
        threads: 1,
    })?;
    runner.run()?;

    let csv = std::fs::read_to_string(output_directory.join("sample").join("ion_series.csv"))?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("peptide,score,ion_series,flag,proteins"));
    // Complete b series: evidence accessions sorted and joined, decoy dropped
    assert_eq!(lines.next(), Some("PEPTIDE,55.5,1:2:3:4:5:6,1,P001:P002"));
    // Unmapped peptide: unannotated, incomplete, empty index set
    assert_eq!(lines.next(), Some("UNKNOWN,1.5,,0,"));
    assert_eq!(lines.next(), None);

    let parameters = std::fs::read_to_string(output_directory.join("results.json"))?;
    assert!(parameters.contains("\"intensity_fraction\": 0.05"));

    std::fs::remove_dir_all(&base)?;
    Ok(())
}
