use super::input::Search;
use anyhow::Context;
use ionseries_core::evidence::collect_evidence;
use ionseries_core::grouping::PeptideIndex;
use ionseries_core::ion_series::Classifier;
use ionseries_core::Identification;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct Runner {
    pub parameters: Search,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Search) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&parameters.output_directory).with_context(|| {
            format!(
                "Failed to create output directory `{}`",
                parameters.output_directory.display()
            )
        })?;
        Ok(Runner {
            parameters,
            start: Instant::now(),
        })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        for path in &self.parameters.mzid_paths {
            self.process_document(path)
                .with_context(|| format!("Failed to process `{}`", path))?;
        }
        let path = self.write_parameters()?;
        info!("wrote parameters to {}", path);
        info!("finished in {:#?}", self.start.elapsed());
        Ok(())
    }

    /// Each document gets its own output subdirectory, named after the
    /// document's file stem.
    pub fn document_directory(&self, document_path: &str) -> PathBuf {
        let stem = Path::new(document_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "results".to_string());
        self.parameters.output_directory.join(stem)
    }

    fn process_document(&self, path: &str) -> anyhow::Result<()> {
        let start = Instant::now();
        info!("reading {}", path);
        let file = File::open(path).with_context(|| format!("Failed to open `{}`", path))?;
        let document: Identification = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("`{}` is not a valid identification document", path))?;
        info!(
            "read {} peptides, {} evidence entries, {} PSMs",
            document.peptides.len(),
            document.evidence.len(),
            document.psms.len()
        );

        let records = collect_evidence(&document.peptides, &document.evidence)?;
        let index = PeptideIndex::build(&records)?;
        info!(
            "grouped {} evidence records into {} peptide groups",
            records.len(),
            index.groups().len()
        );

        let classifier = Classifier::new(
            &index,
            self.parameters.intensity_fraction,
            self.parameters.fallback_to_all,
        );
        let matches = classifier.classify_all(&document.psms)?;
        info!(
            "classified {} of {} PSMs in {:#?}",
            matches.len(),
            document.psms.len(),
            start.elapsed()
        );

        let output = self.write_matches(&matches, path)?;
        info!("wrote {}", output);
        Ok(())
    }
}
