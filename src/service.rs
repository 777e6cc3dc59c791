// src/service.rs
//! `BackupService`: one store, one set of export options, file I/O on top

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::crypto::KdfParams;
use crate::db::RecordStore;
use crate::error::{ExportError, ImportError};
use crate::export::{export_data, ExportOptions, ExportedFile};
use crate::import::{import_data, import_data_with_progress, ImportReport, ImportStage};

/// Import takes `&mut self`, so a service cannot run two operations at once.
pub struct BackupService<S> {
    store: S,
    options: ExportOptions,
}

impl<S: RecordStore> BackupService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: ExportOptions::default(),
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            options: ExportOptions {
                kdf: config.kdf,
                pretty_json: config.features.pretty_json,
            },
        }
    }

    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.options.kdf = kdf;
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.options.pretty_json = pretty;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn export_data(&self, password: Option<&str>) -> Result<ExportedFile, ExportError> {
        export_data(&self.store, password, &self.options)
    }

    /// Export and save under the suggested file name inside `dir`.
    pub fn export_to_dir(
        &self,
        dir: impl AsRef<Path>,
        password: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        let file = self.export_data(password)?;
        Ok(file.write_to_dir(dir)?)
    }

    pub fn import_data(
        &mut self,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<ImportReport, ImportError> {
        import_data(&mut self.store, bytes, password)
    }

    pub fn import_data_with_progress(
        &mut self,
        bytes: &[u8],
        password: Option<&str>,
        observer: impl FnMut(ImportStage),
    ) -> Result<ImportReport, ImportError> {
        import_data_with_progress(&mut self.store, bytes, password, observer)
    }

    /// Read `path` and import it. A read failure is reported at `Detecting`.
    pub fn import_from_path(
        &mut self,
        path: impl AsRef<Path>,
        password: Option<&str>,
    ) -> Result<ImportReport, ImportError> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| ImportError::new(ImportStage::Detecting, e))?;
        self.import_data(&bytes, password)
    }
}
