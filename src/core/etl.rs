use crate::core::document::load_document;
use crate::core::schema::merge_and_convert;
use crate::core::serialize::{serialize, Provenance};
use crate::domain::ports::{ConvertConfig, DocumentStore};
use crate::utils::error::Result;

/// One `json5schema` run: load → merge → build → serialize → write.
pub struct ConvertEngine<S: DocumentStore, C: ConvertConfig> {
    storage: S,
    config: C,
}

impl<S: DocumentStore, C: ConvertConfig> ConvertEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// Produces the serialized document without writing it anywhere.
    pub fn convert(&self) -> Result<String> {
        // defaults 檔先讀，輸入檔的值優先
        let defaults = match self.config.merge_path() {
            Some(path) => {
                tracing::info!("📎 Merging defaults from {}", path.display());
                Some(load_document(&self.storage, path)?)
            }
            None => None,
        };

        let input = self.config.input();
        tracing::info!("📄 Converting {}", input.display());
        let source = load_document(&self.storage, input)?;

        let resume = merge_and_convert(defaults.as_ref(), &source);

        let provenance = Provenance::now(self.config.schema_url(), self.storage.resolve(input));
        serialize(&resume, self.config.output_mode(), &provenance)
    }

    /// Writes to the configured output and returns the text. When no output
    /// path is configured the caller prints the text to stdout.
    pub fn run(&self) -> Result<String> {
        let output = self.convert()?;

        if let Some(path) = self.config.output() {
            self.storage.write_text(path, &output)?;
            tracing::info!("📁 Output saved to: {}", path.display());
        }

        Ok(output)
    }
}
