use crate::core::import_parser::{parse_rows, ImportFormat};
use crate::core::row_validator::validate_rows;
use crate::domain::model::{ImportBatch, ImportSummary};
use crate::domain::ports::CatalogApi;
use crate::utils::error::{PbnError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Clears its busy flag when dropped, including on early return.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, operation: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| PbnError::Busy {
                operation: operation.to_string(),
            })?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct SessionState {
    file_name: Option<String>,
    batch: ImportBatch,
}

/// One admin's bulk import: upload -> validate -> submit.
///
/// `parsing` and `importing` are explicit flags, so a second upload during a
/// parse, or a second submit during an import, is refused instead of racing.
pub struct ImportSession<A: CatalogApi> {
    api: Arc<A>,
    parsing: AtomicBool,
    importing: AtomicBool,
    state: Mutex<SessionState>,
}

impl<A: CatalogApi> ImportSession<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            parsing: AtomicBool::new(false),
            importing: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // 狀態只有純資料，poisoned 也可以直接沿用
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_parsing(&self) -> bool {
        self.parsing.load(Ordering::SeqCst)
    }

    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::SeqCst)
    }

    pub fn file_name(&self) -> Option<String> {
        self.state().file_name.clone()
    }

    pub fn batch(&self) -> ImportBatch {
        self.state().batch.clone()
    }

    /// Submission is allowed only with a clean, non-empty batch and no phase running.
    pub fn can_submit(&self) -> bool {
        !self.is_parsing() && !self.is_importing() && self.state().batch.is_submittable()
    }

    /// Parses and validates an uploaded file, replacing any previous result.
    ///
    /// Unsupported extensions are rejected before anything is touched. A parse
    /// failure leaves the session empty.
    pub async fn load_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<ImportBatch> {
        let format = ImportFormat::from_file_name(file_name)?;

        let _parsing = BusyGuard::acquire(&self.parsing, "parsing")?;
        if self.is_importing() {
            return Err(PbnError::Busy {
                operation: "importing".to_string(),
            });
        }

        {
            let mut state = self.state();
            state.file_name = Some(file_name.to_string());
            state.batch = ImportBatch::default();
        }

        tracing::info!("📄 Parsing {} ({} bytes)", file_name, bytes.len());
        let parsed = tokio::task::spawn_blocking(move || {
            parse_rows(format, &bytes).map(validate_rows)
        })
        .await
        .map_err(|e| PbnError::ParseError {
            message: format!("parser task failed: {}", e),
        })?;

        let batch = match parsed {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("❌ Failed to parse {}: {}", file_name, e);
                self.state().file_name = None;
                return Err(e);
            }
        };

        self.state().batch = batch.clone();
        Ok(batch)
    }

    /// Sends the whole batch as one bulk create.
    ///
    /// Any outstanding validation error blocks the submission. On failure the
    /// batch stays as it was, so the identical submission can be retried.
    pub async fn submit(&self) -> Result<ImportSummary> {
        let _importing = BusyGuard::acquire(&self.importing, "importing")?;
        if self.is_parsing() {
            return Err(PbnError::Busy {
                operation: "parsing".to_string(),
            });
        }

        let records = {
            let state = self.state();
            if !state.batch.errors.is_empty() {
                return Err(PbnError::ImportBlocked {
                    error_count: state.batch.errors.len(),
                });
            }
            if state.batch.records.is_empty() {
                return Err(PbnError::EmptyBatch);
            }
            state.batch.records.clone()
        };

        tracing::info!("🚀 Importing {} domains", records.len());
        match self.api.import_domains(&records).await {
            Ok(summary) => {
                tracing::info!("✅ {}", summary.message);
                *self.state() = SessionState::default();
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("❌ Error importing domains: {}", e);
                Err(PbnError::SubmissionError {
                    message: e.to_string(),
                })
            }
        }
    }
}
