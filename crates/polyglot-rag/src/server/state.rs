//! Application state for the Q&A server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::{AnswerGenerator, CompletionProvider, GroqClient};
use crate::ingestion::{IngestPipeline, PdfExtractor, TextExtractor};
use crate::language::{GoogleTranslateClient, LanguageResolver, LanguageService};
use crate::pipeline::QuestionPipeline;
use crate::retrieval::ContextAssembler;
use crate::storage::{BlobStore, DocumentStore, LocalBlobStore};
use crate::types::LanguageTag;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Document registry
    store: Arc<DocumentStore>,
    /// Upload handling
    ingest: IngestPipeline,
    /// Question answering
    questions: QuestionPipeline,
    /// Completion backend, kept for health reporting
    completion: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Create application state with the production collaborators
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let blobs = Arc::new(LocalBlobStore::new(config.ingestion.upload_dir.clone())?);
        tracing::info!("Upload storage at {}", blobs.storage_dir().display());

        let languages = Arc::new(GoogleTranslateClient::new(&config.translation)?);
        let completion = Arc::new(GroqClient::new(&config.llm)?);
        tracing::info!(
            "Completion provider: {} (model: {}, configured: {})",
            completion.name(),
            completion.model(),
            completion.is_configured()
        );

        Self::with_providers(config, blobs, Arc::new(PdfExtractor::new()), languages, completion)
    }

    /// Create application state around the given collaborators
    pub fn with_providers(
        config: RagConfig,
        blobs: Arc<dyn BlobStore>,
        extractor: Arc<dyn TextExtractor>,
        languages: Arc<dyn LanguageService>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Result<Self> {
        let store = Arc::new(DocumentStore::new(blobs));

        let ingest = IngestPipeline::new(
            store.clone(),
            extractor,
            config.ingestion.clone(),
            config.server.max_upload_size,
        );

        let resolver = LanguageResolver::new(
            languages.clone(),
            LanguageTag::parse(&config.language.fallback)?,
            config.translation.timeout(),
        );
        let assembler = ContextAssembler::new(store.clone(), config.context.budget_chars);
        let generator = AnswerGenerator::from_config(completion.clone(), languages, &config)?;
        tracing::debug!("Answer strategies: {:?}", generator.strategies());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                ingest,
                questions: QuestionPipeline::new(resolver, assembler, generator),
                completion,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the document store
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    pub fn ingest(&self) -> &IngestPipeline {
        &self.inner.ingest
    }

    pub fn questions(&self) -> &QuestionPipeline {
        &self.inner.questions
    }

    /// Get the completion provider
    pub fn completion(&self) -> &dyn CompletionProvider {
        self.inner.completion.as_ref()
    }
}
