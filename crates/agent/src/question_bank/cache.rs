//! Template cache
//!
//! Bounded, TTL-limited cache of fetched question sets keyed by template
//! id. It is owned by whoever builds the question source and shared through
//! `Arc`; there is no process-wide instance.

use async_trait::async_trait;
use interview_core::{QuestionSet, QuestionSource, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedTemplate {
    questions: QuestionSet,
    stored_at: Instant,
}

/// TTL and capacity bounded template cache
pub struct TemplateCache {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CachedTemplate>>,
}

impl TemplateCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A zero TTL or capacity disables caching
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.capacity > 0
    }

    pub fn get(&self, template_id: &str) -> Option<QuestionSet> {
        self.get_at(template_id, Instant::now())
    }

    pub fn insert(&self, template_id: &str, questions: QuestionSet) {
        self.insert_at(template_id, questions, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn get_at(&self, template_id: &str, now: Instant) -> Option<QuestionSet> {
        let mut entries = self.entries.lock();

        let expired = match entries.get(template_id) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                return Some(entry.questions.clone());
            },
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(template_id);
            tracing::debug!(template_id, "Cached template expired");
        }
        None
    }

    fn insert_at(&self, template_id: &str, questions: QuestionSet, now: Instant) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.lock();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);

        if entries.len() >= self.capacity && !entries.contains_key(template_id) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            template_id.to_string(),
            CachedTemplate {
                questions,
                stored_at: now,
            },
        );
    }
}

/// Question source that consults a [`TemplateCache`] first
pub struct CachedQuestionSource<S> {
    inner: S,
    cache: Arc<TemplateCache>,
}

impl<S: QuestionSource> CachedQuestionSource<S> {
    pub fn new(inner: S, cache: Arc<TemplateCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }
}

#[async_trait]
impl<S: QuestionSource> QuestionSource for CachedQuestionSource<S> {
    async fn fetch_questions(&self, template_id: &str) -> Result<QuestionSet> {
        if let Some(questions) = self.cache.get(template_id) {
            tracing::info!(template_id, "Using cached template");
            return Ok(questions);
        }

        let questions = self.inner.fetch_questions(template_id).await?;
        if !questions.is_empty() {
            self.cache.insert(template_id, questions.clone());
        }
        Ok(questions)
    }
}
