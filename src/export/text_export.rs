use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::BatchResult;
use crate::export::{per_image_file, Exporter};

/// Plain-text sink: the deduplicated number list plus one raw transcript per
/// image under `raw_text/<image file name>.txt`.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, batch: &BatchResult) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;

        let mut numbers = String::new();
        for number in batch.unique_numbers() {
            numbers.push_str(number.as_str());
            numbers.push('\n');
        }
        fs::write(self.out_dir.join("phone_numbers.txt"), numbers)?;

        let raw_dir = self.out_dir.join("raw_text");
        fs::create_dir_all(&raw_dir)?;
        for record in &batch.records {
            let path = raw_dir.join(per_image_file(&record.image, "txt"));
            fs::write(path, format!("{}\n", record.raw_text))?;
        }

        Ok(())
    }
}
