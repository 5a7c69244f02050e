//! A properties file on disk, reconciled against its reference file

use propline_core::{locale_tag, Document, OrderedStore};
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::errors::Result;
use crate::persist;
use crate::queue::WriteRegistry;

/// Handle on a target file and the reference file it is laid out after
///
/// Holds the loaded [`Document`]; edits stay in memory until [`save`] or
/// [`save_with_versioning`] writes them back.
///
/// [`save`]: PropertiesFile::save
/// [`save_with_versioning`]: PropertiesFile::save_with_versioning
#[derive(Debug, Clone)]
pub struct PropertiesFile {
    path: PathBuf,
    reference_path: PathBuf,
    document: Document,
    registry: WriteRegistry,
    config: StoreConfig,
}

impl PropertiesFile {
    /// Load `path` and `reference_path` with the default configuration
    ///
    /// # Errors
    ///
    /// Propagates read failures of either file.
    pub fn open(
        registry: &WriteRegistry,
        path: impl Into<PathBuf>,
        reference_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        Self::open_with_config(registry, path, reference_path, StoreConfig::default())
    }

    /// Load `path` and `reference_path`
    ///
    /// # Errors
    ///
    /// Propagates read failures of either file.
    pub fn open_with_config(
        registry: &WriteRegistry,
        path: impl Into<PathBuf>,
        reference_path: impl Into<PathBuf>,
        config: StoreConfig,
    ) -> Result<Self> {
        let path = path.into();
        let reference_path = reference_path.into();
        let document = load(registry, &path, &reference_path, &config)?;
        Ok(Self {
            path,
            reference_path,
            document,
            registry: registry.clone(),
            config,
        })
    }

    /// Reload both files, discarding unsaved edits
    ///
    /// # Errors
    ///
    /// Propagates read failures; the loaded document is kept on error.
    pub fn refresh(&mut self) -> Result<()> {
        self.document = load(&self.registry, &self.path, &self.reference_path, &self.config)?;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    /// Write the reconciled content back to the target file
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn save(&self) -> Result<()> {
        persist::save(&self.registry, &self.path, &self.document.to_text(), &self.config)
    }

    /// Back up the file as it was loaded, then write the current content
    ///
    /// Returns the backup path.
    ///
    /// # Errors
    ///
    /// Propagates write failures of either file.
    pub fn save_with_versioning(&self) -> Result<PathBuf> {
        persist::save_with_versioning(
            &self.registry,
            &self.path,
            &self.document.old_text(),
            &self.document.to_text(),
            &self.config,
        )
    }

    /// Locale tag from the target's file name, `""` for the default locale
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_INPUT` if the path has no usable file name.
    pub fn locale(&self) -> Result<String> {
        Ok(locale_tag(&self.path)?)
    }

    /// File name of the target
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn load(
    registry: &WriteRegistry,
    path: &Path,
    reference_path: &Path,
    config: &StoreConfig,
) -> Result<Document> {
    let target = OrderedStore::parse(persist::read_lines(registry, path, config)?);
    let reference = OrderedStore::parse(persist::read_lines(registry, reference_path, config)?);
    tracing::debug!(
        path = %path.display(),
        key_count = target.len(),
        reference_keys = reference.len(),
        "loaded properties file"
    );
    Ok(Document::new(target, reference))
}

/// Write a pseudo-locale of `reference` to `output`.
///
/// Every value is replaced by its own key, so strings that miss translation
/// stand out when the application runs with this locale. Returns the number
/// of keys written.
///
/// # Errors
///
/// Propagates read failures of `reference` and write failures of `output`.
pub fn generate_pseudo_locale(
    registry: &WriteRegistry,
    output: &Path,
    reference: &Path,
    config: &StoreConfig,
) -> Result<usize> {
    let lines = persist::read_lines(registry, reference, config)?;
    let mut document = Document::new(
        OrderedStore::parse(lines.iter().map(String::as_str)),
        OrderedStore::parse(lines),
    );
    let edited = document.fill_values_with_keys();
    persist::save(registry, output, &document.to_text(), config)?;
    Ok(edited)
}

/// Path of a generated file named `file_name` next to `reference`
pub fn sibling_path(reference: &Path, file_name: &str) -> PathBuf {
    reference
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(file_name)
}
