//! SeekService - async front for `Seeker`
//!
//! Async Cancellation Architecture:
//! Matching is CPU-bound and runs on `tokio::spawn_blocking`. Each call owns a
//! CancellationToken behind a DropGuard; when the caller drops the future the
//! guard cancels the token and the matcher bails out at its next recursion
//! step. Collections fan out on the global Rayon pool.

use crate::config::FindOptions;
use crate::interface::{DocumentIndex, SearchHit, SeekError, SeekResult};
use crate::search::Seeker;
use once_cell::sync::Lazy;
use std::sync::{Arc, Once};
use tokio_util::sync::CancellationToken;

/// Runtime used when the service is awaited outside any Tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

static RAYON_INIT: Once = Once::new();

/// Initialize the global Rayon pool once, keeping two cores free for Tokio.
fn init_rayon() {
    RAYON_INIT.call_once(|| {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let rayon_threads = num_threads.saturating_sub(2).max(1);

        let built = rayon::ThreadPoolBuilder::new()
            .num_threads(rayon_threads)
            .thread_name(|i| format!("fuzzmark-rayon-{}", i))
            .start_handler(|_| {
                use thread_priority::*;
                let _ = set_current_thread_priority(ThreadPriority::Min);
            })
            .build_global();
        if let Err(e) = built {
            tracing::debug!(error = %e, "global rayon pool already configured");
        }
    });
}

/// RAII guard that cancels a token when dropped.
struct DropGuard {
    token: CancellationToken,
}

impl DropGuard {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Cloneable async handle around a shared `Seeker`.
#[derive(Clone)]
pub struct SeekService {
    seeker: Arc<Seeker>,
}

impl SeekService {
    pub fn new(seeker: Seeker) -> Self {
        init_rayon();
        Self {
            seeker: Arc::new(seeker),
        }
    }

    pub fn seeker(&self) -> &Seeker {
        &self.seeker
    }

    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current().unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    async fn run_blocking<T, F>(&self, work: F) -> SeekResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Seeker, &CancellationToken) -> SeekResult<T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let _guard = DropGuard::new(token.clone());
        let seeker = Arc::clone(&self.seeker);

        self.runtime_handle()
            .spawn_blocking(move || {
                if token.is_cancelled() {
                    return Err(SeekError::Cancelled);
                }
                work(&seeker, &token)
            })
            .await
            .map_err(|e| SeekError::Join(e.to_string()))?
    }

    pub async fn index(&self, text: String, document_id: Option<String>, locale: Option<String>) -> SeekResult<DocumentIndex> {
        self.run_blocking(move |seeker, _| seeker.index(&text, document_id.as_deref(), locale.as_deref()))
            .await
    }

    pub async fn find_text(&self, text: String, query: String, options: FindOptions) -> SeekResult<Vec<SearchHit>> {
        self.run_blocking(move |seeker, token| seeker.find_text_cancellable(&text, &query, &options, token))
            .await
    }

    pub async fn find(&self, documents: Vec<String>, query: String, options: FindOptions) -> SeekResult<Vec<SearchHit>> {
        self.run_blocking(move |seeker, token| seeker.find_cancellable(documents.as_slice(), &query, &options, token))
            .await
    }
}
