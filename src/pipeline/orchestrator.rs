//! End-to-end run: reformulate, search, collect, synthesize

use super::collect::SourceCollector;
use super::condense::TextCondenser;
use super::models::{Research, StageTimings};
use super::reformulate::QueryReformulator;
use super::synthesize::AnswerSynthesizer;
use crate::config::Settings;
use crate::engines::EngineLoader;
use crate::error::{GenerationError, PipelineError};
use crate::extract::{ContentExtractor, PageExtractor};
use crate::llm::{Generator, OpenAiClient};
use crate::network::HttpClient;
use crate::search::{LinkRetriever, SearchRetriever};
use anyhow::{bail, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// The question-answering pipeline
///
/// Holds no per-run state; concurrent calls to [`Pipeline::research`] are
/// independent of each other.
pub struct Pipeline {
    reformulator: QueryReformulator,
    retriever: Arc<dyn LinkRetriever>,
    collector: SourceCollector,
    synthesizer: AnswerSynthesizer,
    source_count: usize,
}

impl Pipeline {
    /// Wire the stages around the given capabilities
    pub fn new(
        generator: Arc<dyn Generator>,
        retriever: Arc<dyn LinkRetriever>,
        extractor: Arc<dyn ContentExtractor>,
        settings: &Settings,
    ) -> Self {
        let llm = &settings.llm;
        Self {
            reformulator: QueryReformulator::new(generator.clone(), &llm.query_model),
            retriever,
            collector: SourceCollector::new(
                extractor,
                TextCondenser::new(generator.clone(), &llm.summary_model),
                settings.collect.max_concurrency,
            ),
            synthesizer: AnswerSynthesizer::new(
                generator,
                &llm.answer_model,
                settings.answer.citation_style,
            ),
            source_count: settings.search.source_count,
        }
    }

    /// Build the production pipeline: OpenAI-compatible generation, the
    /// configured search engine and HTTP page extraction
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let engine = EngineLoader::create(&settings.search)?;
        let generator = OpenAiClient::new(&settings.llm)?;
        if !generator.has_credentials() {
            bail!(GenerationError::MissingApiKey);
        }
        let generator = Arc::new(generator);
        let retriever = Arc::new(SearchRetriever::new(
            client.clone(),
            engine,
            &settings.search,
        ));
        let extractor = Arc::new(PageExtractor::new(client, &settings.extract));

        Ok(Self::new(generator, retriever, extractor, settings))
    }

    /// Answer `question` with cited sources
    pub async fn run(&self, question: &str) -> Result<String, PipelineError> {
        Ok(self.research(question).await?.answer)
    }

    /// Answer `question` and keep every intermediate result
    pub async fn research(&self, question: &str) -> Result<Research, PipelineError> {
        let span = info_span!("run", id = %Uuid::new_v4());
        self.research_inner(question).instrument(span).await
    }

    async fn research_inner(&self, question: &str) -> Result<Research, PipelineError> {
        if question.trim().is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }

        let timestamp = Utc::now();
        let started = Instant::now();
        let mut timings = StageTimings::default();

        let stage = Instant::now();
        let search_query = self
            .reformulator
            .reformulate(question)
            .await
            .map_err(PipelineError::Reformulation)?;
        timings.reformulate_ms = elapsed_ms(stage);

        info!("Searching \"{}\"", search_query);
        let stage = Instant::now();
        let links = self
            .retriever
            .retrieve(&search_query, self.source_count)
            .await?;
        timings.search_ms = elapsed_ms(stage);
        info!("Found {} links", links.len());

        let stage = Instant::now();
        let collected = self.collector.collect(&links).await;
        timings.collect_ms = elapsed_ms(stage);
        info!(
            "Kept {} of {} sources",
            collected.sources.len(),
            links.len()
        );

        let stage = Instant::now();
        let answer = self
            .synthesizer
            .synthesize(question, &collected.sources, &links, timestamp)
            .await
            .map_err(PipelineError::Synthesis)?;
        timings.synthesize_ms = elapsed_ms(stage);
        timings.total_ms = elapsed_ms(started);

        Ok(Research {
            question: question.to_string(),
            search_query,
            links,
            sources: collected.sources,
            dropped: collected.dropped,
            answer,
            timestamp,
            timings,
        })
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
