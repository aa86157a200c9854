use crate::runner::Runner;
use ionseries_core::ion_series::IonSeriesMatch;

impl Runner {
    fn serialize_match(&self, m: &IonSeriesMatch) -> csv::ByteRecord {
        let mut record = csv::ByteRecord::new();
        record.push_field(m.sequence.as_bytes());
        record.push_field(ryu::Buffer::new().format(m.score).as_bytes());

        // Covered positions joined with `:`
        let mut indices = Vec::new();
        for (i, index) in m.final_indices.iter().enumerate() {
            if i > 0 {
                indices.push(b':');
            }
            indices.extend_from_slice(itoa::Buffer::new().format(*index).as_bytes());
        }
        record.push_field(&indices);

        record.push_field(itoa::Buffer::new().format(m.class.flag()).as_bytes());
        record.push_field(m.accessions.as_bytes());
        record
    }

    pub fn write_matches(
        &self,
        matches: &[IonSeriesMatch],
        document_path: &str,
    ) -> anyhow::Result<String> {
        let directory = self.document_directory(document_path);
        std::fs::create_dir_all(&directory)?;
        let path = directory.join("ion_series.csv");

        let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
        let headers =
            csv::ByteRecord::from(vec!["peptide", "score", "ion_series", "flag", "proteins"]);
        wtr.write_byte_record(&headers)?;
        for m in matches {
            wtr.write_byte_record(&self.serialize_match(m))?;
        }
        wtr.flush()?;

        let bytes = wtr.into_inner()?;
        std::fs::write(&path, bytes)?;
        Ok(path.display().to_string())
    }

    pub fn write_parameters(&self) -> anyhow::Result<String> {
        let path = self.parameters.output_directory.join("results.json");
        let json = serde_json::to_string_pretty(&self.parameters)?;
        std::fs::write(&path, json)?;
        Ok(path.display().to_string())
    }
}
