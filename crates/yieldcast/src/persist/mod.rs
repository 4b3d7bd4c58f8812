//! Artifact persistence.
//!
//! A trained model is the only object stored outside the process. It is
//! written as versioned JSON through the schema types in [`schema`], and every
//! load re-validates the stored values before a runtime model is built.
//!
//! ```no_run
//! use yieldcast::persist::Artifact;
//!
//! let artifact = Artifact::load_json("model.json")?;
//! println!("{} model over {:?}", artifact.kind().as_str(), artifact.meta().feature_names);
//! # Ok::<(), yieldcast::persist::ReadError>(())
//! ```

mod convert;
mod error;
pub mod schema;
mod store;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use error::{ReadError, WriteError};
pub use schema::{ArtifactSchema, ModelSchema, FORMAT_VERSION};
pub use store::{ArtifactStore, JsonFileStore, MemoryStore};

use crate::data::Dataset;
use crate::error::ModelError;
use crate::model::{BoostedForecaster, ModelKind, ModelMeta, RidgeForecaster};
use crate::training::EvalReport;

/// A trained model of either family.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Ridge regression with a scaler and residual spread.
    Ridge(RidgeForecaster),
    /// Boosted trees with guardrail coefficients.
    Boosted(BoostedForecaster),
}

impl From<RidgeForecaster> for Artifact {
    fn from(model: RidgeForecaster) -> Self {
        Artifact::Ridge(model)
    }
}

impl From<BoostedForecaster> for Artifact {
    fn from(model: BoostedForecaster) -> Self {
        Artifact::Boosted(model)
    }
}

impl Artifact {
    /// Model family.
    pub fn kind(&self) -> ModelKind {
        match self {
            Artifact::Ridge(_) => ModelKind::Ridge,
            Artifact::Boosted(_) => ModelKind::Boosted,
        }
    }

    /// Feature metadata.
    pub fn meta(&self) -> &ModelMeta {
        match self {
            Artifact::Ridge(m) => m.meta(),
            Artifact::Boosted(m) => m.meta(),
        }
    }

    /// Accuracy on a resolved dataset.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the dataset width differs from the model.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvalReport, ModelError> {
        match self {
            Artifact::Ridge(m) => m.evaluate(dataset),
            Artifact::Boosted(m) => m.evaluate(dataset),
        }
    }

    // =========================================================================
    // Schema conversion
    // =========================================================================

    /// Stored representation at the current format version.
    pub fn to_schema(&self) -> ArtifactSchema {
        let model = match self {
            Artifact::Ridge(m) => ModelSchema::Ridge(m.into()),
            Artifact::Boosted(m) => ModelSchema::Boosted(m.into()),
        };
        ArtifactSchema { format_version: FORMAT_VERSION, model }
    }

    /// Validate a stored representation and build the runtime model.
    ///
    /// # Errors
    ///
    /// [`ReadError::Validation`] for an unsupported version or invalid values.
    pub fn from_schema(schema: ArtifactSchema) -> Result<Self, ReadError> {
        if schema.format_version != FORMAT_VERSION {
            return Err(ReadError::Validation(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                schema.format_version
            )));
        }
        Ok(match schema.model {
            ModelSchema::Ridge(m) => Artifact::Ridge(m.try_into()?),
            ModelSchema::Boosted(m) => Artifact::Boosted(m.try_into()?),
        })
    }

    // =========================================================================
    // JSON I/O
    // =========================================================================

    /// Read and validate an artifact from JSON.
    ///
    /// # Errors
    ///
    /// See [`ReadError`].
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let schema: ArtifactSchema = serde_json::from_reader(reader)?;
        Self::from_schema(schema)
    }

    /// Write the artifact as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// See [`WriteError`].
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        serde_json::to_writer_pretty(writer, &self.to_schema())?;
        Ok(())
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// See [`WriteError`].
    pub fn to_json_string(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string_pretty(&self.to_schema())?)
    }

    /// Parse and validate a JSON string.
    ///
    /// # Errors
    ///
    /// See [`ReadError`].
    pub fn from_json_str(json: &str) -> Result<Self, ReadError> {
        Self::from_schema(serde_json::from_str(json)?)
    }

    /// Load from a file.
    ///
    /// # Errors
    ///
    /// See [`ReadError`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Self::read_json(BufReader::new(file))
    }

    /// Write to a file, replacing it atomically.
    ///
    /// # Errors
    ///
    /// See [`WriteError`].
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        JsonFileStore::new(path.as_ref()).save(self)
    }

    pub(crate) fn write_buffered(&self, file: File) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}
