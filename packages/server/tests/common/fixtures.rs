//! Test fixtures for creating test data.
//!
//! These fixtures go through the model methods and actions directly.

use std::future::Future;
use std::time::Duration;

use uuid::Uuid;
use vsl_core::domains::dictionary::{actions, DictionaryEntry, NewDictionaryEntry};
use vsl_core::domains::member::Member;
use vsl_core::domains::moderation::StagingPayload;
use vsl_core::kernel::ServerDeps;
use sqlx::PgPool;

pub fn video_url_for(word: &str) -> String {
    format!("https://cdn.example.com/signs/{}.mp4", word.replace(' ', "-"))
}

pub fn new_entry(word: &str, definition: Option<&str>) -> NewDictionaryEntry {
    NewDictionaryEntry {
        word: word.to_string(),
        definition: definition.map(String::from),
        video_url: video_url_for(word),
    }
}

pub fn payload(word: &str, definition: Option<&str>) -> StagingPayload {
    StagingPayload {
        word: word.to_string(),
        definition: definition.map(String::from),
        video_url: video_url_for(word),
    }
}

/// Create a dictionary entry through the regular write path
pub async fn create_entry(deps: &ServerDeps, word: &str, definition: Option<&str>) -> DictionaryEntry {
    actions::create_word(new_entry(word, definition), deps)
        .await
        .expect("Failed to create dictionary entry")
}

pub async fn create_member(pool: &PgPool) -> Member {
    let username = format!("member_{}", Uuid::new_v4().simple());
    Member::create(&username, false, pool)
        .await
        .expect("Failed to create member")
}

pub async fn create_admin(pool: &PgPool) -> Member {
    let username = format!("admin_{}", Uuid::new_v4().simple());
    Member::create(&username, true, pool)
        .await
        .expect("Failed to create admin")
}

/// Re-read an entry, failing the test if it is gone
pub async fn reload_entry(pool: &PgPool, entry: &DictionaryEntry) -> DictionaryEntry {
    DictionaryEntry::find_by_id(entry.id, pool)
        .await
        .expect("Failed to load dictionary entry")
        .expect("Dictionary entry missing")
}

/// Poll `check` every 20ms until it holds, for at most five seconds.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
