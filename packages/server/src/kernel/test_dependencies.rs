// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{BaseGestureRecognizer, BaseSearchIndex, Recognition, SearchDocument, ServerDeps};
use crate::common::{DictionaryEntryId, ServiceError, ServiceResult};

// =============================================================================
// Mock Search Index
// =============================================================================

/// In-memory search index with switchable failure modes.
///
/// Search is a case-insensitive substring match over word and definition.
pub struct MockSearchIndex {
    documents: Mutex<BTreeMap<DictionaryEntryId, SearchDocument>>,
    fail_writes: AtomicBool,
    fail_searches: AtomicBool,
    latency: Mutex<Option<Duration>>,
    upsert_calls: Mutex<Vec<DictionaryEntryId>>,
    delete_calls: Mutex<Vec<DictionaryEntryId>>,
    search_calls: Mutex<Vec<String>>,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_searches: AtomicBool::new(false),
            latency: Mutex::new(None),
            upsert_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    /// Index that errors on every call
    pub fn failing() -> Self {
        let index = Self::new();
        index.set_fail_writes(true);
        index.set_fail_searches(true);
        index
    }

    /// Seed a document without recording an upsert call
    pub fn with_document(self, document: SearchDocument) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document);
        self
    }

    /// Delay every call, to exercise timeouts
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    pub fn document(&self, id: DictionaryEntryId) -> Option<SearchDocument> {
        self.documents.lock().unwrap().get(&id).cloned()
    }

    pub fn contains(&self, id: DictionaryEntryId) -> bool {
        self.documents.lock().unwrap().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn upsert_calls(&self) -> Vec<DictionaryEntryId> {
        self.upsert_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<DictionaryEntryId> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn before_write(&self) -> Result<()> {
        self.simulate_latency().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("mock search index unavailable");
        }
        Ok(())
    }
}

impl Default for MockSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSearchIndex for MockSearchIndex {
    async fn ensure_index(&self) -> Result<()> {
        self.before_write().await
    }

    async fn upsert(&self, document: &SearchDocument) -> Result<()> {
        self.upsert_calls.lock().unwrap().push(document.id);
        self.before_write().await?;
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn delete(&self, id: DictionaryEntryId) -> Result<()> {
        self.delete_calls.lock().unwrap().push(id);
        self.before_write().await?;
        self.documents.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.before_write().await?;
        self.documents.lock().unwrap().clear();
        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchDocument>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        self.simulate_latency().await;
        if self.fail_searches.load(Ordering::SeqCst) {
            bail!("mock search index unavailable");
        }

        let needle = query.to_lowercase();
        let hits = self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|doc| {
                doc.word.to_lowercase().contains(&needle)
                    || doc
                        .definition
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .take(limit)
            .cloned()
            .collect();
        Ok(hits)
    }
}

// =============================================================================
// Mock Gesture Recognizer
// =============================================================================

/// Arguments captured from a recognize call
#[derive(Debug, Clone)]
pub struct RecognizeCallArgs {
    pub frame_count: usize,
    pub current_text: String,
}

pub struct MockGestureRecognizer {
    recognitions: Mutex<VecDeque<Recognition>>,
    offline: AtomicBool,
    recognize_calls: Mutex<Vec<RecognizeCallArgs>>,
}

impl MockGestureRecognizer {
    pub fn new() -> Self {
        Self {
            recognitions: Mutex::new(VecDeque::new()),
            offline: AtomicBool::new(false),
            recognize_calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a recognition to be returned
    pub fn with_recognition(self, predicted_word: &str, confidence: f32) -> Self {
        self.recognitions.lock().unwrap().push_back(Recognition {
            predicted_word: predicted_word.to_string(),
            confidence: Some(confidence),
            raw_char: predicted_word.chars().last().map(String::from),
        });
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn recognize_calls(&self) -> Vec<RecognizeCallArgs> {
        self.recognize_calls.lock().unwrap().clone()
    }

    fn check_online(&self) -> ServiceResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::ExternalServiceUnavailable(
                "AI service is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MockGestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGestureRecognizer for MockGestureRecognizer {
    async fn recognize(
        &self,
        frames: &[serde_json::Value],
        current_text: &str,
    ) -> ServiceResult<Recognition> {
        if frames.is_empty() {
            return Err(ServiceError::Validation("Frames cannot be empty".to_string()));
        }
        self.recognize_calls.lock().unwrap().push(RecognizeCallArgs {
            frame_count: frames.len(),
            current_text: current_text.to_string(),
        });
        self.check_online()?;

        let queued = self.recognitions.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| Recognition {
            predicted_word: format!("{}a", current_text),
            confidence: Some(0.5),
            raw_char: Some("a".to_string()),
        }))
    }

    async fn fix_diacritics(&self, text: &str) -> ServiceResult<String> {
        self.check_online()?;
        Ok(text.to_string())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub search_index: Arc<MockSearchIndex>,
    pub gesture: Arc<MockGestureRecognizer>,
    pub search_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            search_index: Arc::new(MockSearchIndex::new()),
            gesture: Arc::new(MockGestureRecognizer::new()),
            search_timeout: Duration::from_millis(500),
        }
    }

    /// Set a mock search index
    pub fn mock_search_index(mut self, index: MockSearchIndex) -> Self {
        self.search_index = Arc::new(index);
        self
    }

    /// Set a mock gesture recognizer
    pub fn mock_gesture(mut self, gesture: MockGestureRecognizer) -> Self {
        self.gesture = Arc::new(gesture);
        self
    }

    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Convert into ServerDeps for testing (starts a propagator worker)
    pub fn into_server_deps(self, db_pool: PgPool) -> (ServerDeps, JoinHandle<()>) {
        ServerDeps::new(db_pool, self.search_index, self.search_timeout, 2, self.gesture)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(word: &str, definition: Option<&str>) -> SearchDocument {
        SearchDocument {
            id: DictionaryEntryId::new(),
            word: word.to_string(),
            definition: definition.map(String::from),
            video_url: "http://x/v.mp4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_search_matches_word_and_definition() {
        let index = MockSearchIndex::new()
            .with_document(doc("Xin chào", Some("hello")))
            .with_document(doc("cảm ơn", Some("thank you")));

        assert_eq!(index.search("XIN", 10).await.unwrap().len(), 1);
        assert_eq!(index.search("thank", 10).await.unwrap().len(), 1);
        assert!(index.search("goodbye", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_index_records_calls() {
        let index = MockSearchIndex::failing();
        let document = doc("xin chào", None);

        assert!(index.upsert(&document).await.is_err());
        assert!(index.search("xin", 10).await.is_err());
        assert_eq!(index.upsert_calls(), vec![document.id]);
        assert!(index.is_empty());
    }
}
