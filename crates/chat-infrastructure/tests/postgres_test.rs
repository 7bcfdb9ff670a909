//! PostgreSQL adapter tests.
//!
//! Run against a scratch database by setting `CHAT_TEST_DATABASE_URL`;
//! without it every test returns early.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use sqlx::postgres::PgListener;
use sqlx::PgPool;

use chat_core::domain::{CanonicalPair, Conversation, ConversationId, NewMessage};
use chat_core::error::DomainError;
use chat_core::realtime::MessageBus;
use chat_core::repositories::{ConversationRepository, MessageRepository};
use chat_core::services::{ConversationResolver, DirectMessageService};
use chat_infrastructure::{
    create_pool, forward_notification, run_migrations, BroadcastMessageBus, MessageNotification,
    PgConversationRepository, PgMessageRepository,
};
use chat_shared::constants::DEFAULT_NOTIFY_CHANNEL;

const DATABASE_URL_VAR: &str = "CHAT_TEST_DATABASE_URL";

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("{} not set, skipping postgres test", DATABASE_URL_VAR);
        return None;
    };
    let pool = create_pool(&url, 5, 5).await.expect("connect to test database");
    run_migrations(&pool).await.expect("migrate test database");
    Some(pool)
}

/// Participant id unique to this run, so reruns against the same database never collide
fn unique_id(prefix: &str) -> String {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_micros(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

#[tokio::test]
async fn test_mixed_case_pair_is_created_and_found() {
    let Some(pool) = test_pool().await else { return };
    let repo = Arc::new(PgConversationRepository::new(pool));
    let (lower, upper) = (unique_id("alice"), unique_id("Bob"));

    let created = ConversationResolver::new(repo.clone())
        .resolve(&lower, &upper)
        .await
        .unwrap();
    assert_eq!(created.participants()[0].as_str(), upper);

    // a fresh resolver has an empty directory and must find the stored row
    let found = ConversationResolver::new(repo.clone())
        .resolve(&upper, &lower)
        .await
        .unwrap();
    assert_eq!(found.id, created.id);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.pair, created.pair);
}

#[tokio::test]
async fn test_mixed_case_hex_ids() {
    let Some(pool) = test_pool().await else { return };
    let repo = Arc::new(PgConversationRepository::new(pool));
    let run = unique_id("x");

    let resolver = ConversationResolver::new(repo);
    let conversation = resolver
        .resolve(&format!("a0f3c2d1-{}", run), &format!("A0F3C2D1-{}", run))
        .await
        .unwrap();
    assert!(conversation.participants()[0].as_str().starts_with("A0F3"));
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgConversationRepository::new(pool);
    let pair = CanonicalPair::parse(&unique_id("u"), &unique_id("v")).unwrap();

    repo.create(&pair).await.unwrap();
    let err = repo.create(&pair).await.unwrap_err();
    assert!(err.is_conflict());
}

/// Misses on the first pair lookup, as a session that lost the creation race would
struct StaleFirstLookup {
    inner: PgConversationRepository,
    missed: AtomicBool,
}

#[async_trait]
impl ConversationRepository for StaleFirstLookup {
    async fn find_by_pair(&self, pair: &CanonicalPair) -> Result<Option<Conversation>, DomainError> {
        if !self.missed.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_pair(pair).await
    }

    async fn create(&self, pair: &CanonicalPair) -> Result<Conversation, DomainError> {
        self.inner.create(pair).await
    }

    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError> {
        self.inner.find_by_id(id).await
    }
}

#[tokio::test]
async fn test_unique_violation_falls_back_to_requery() {
    let Some(pool) = test_pool().await else { return };
    let (a, b) = (unique_id("u"), unique_id("v"));
    let pair = CanonicalPair::parse(&a, &b).unwrap();
    let existing = PgConversationRepository::new(pool.clone()).create(&pair).await.unwrap();

    let stale = Arc::new(StaleFirstLookup {
        inner: PgConversationRepository::new(pool),
        missed: AtomicBool::new(false),
    });
    let resolved = ConversationResolver::new(stale).resolve(&b, &a).await.unwrap();
    assert_eq!(resolved.id, existing.id);
}

async fn new_conversation(pool: &PgPool) -> Conversation {
    let pair = CanonicalPair::parse(&unique_id("u"), &unique_id("v")).unwrap();
    PgConversationRepository::new(pool.clone()).create(&pair).await.unwrap()
}

#[tokio::test]
async fn test_list_recent_returns_latest_oldest_first() {
    let Some(pool) = test_pool().await else { return };
    let conversation = new_conversation(&pool).await;
    let repo = PgMessageRepository::new(pool);
    let sender = conversation.participants()[0].clone();

    for i in 1..=5 {
        let message = NewMessage::new(conversation.id, sender.clone(), format!("m{}", i)).unwrap();
        repo.insert(&message).await.unwrap();
    }

    let recent = repo.list_recent(conversation.id, 3).await.unwrap();
    let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m3", "m4", "m5"]);
    assert!(recent.windows(2).all(|w| (w[0].created_at, w[0].id) < (w[1].created_at, w[1].id)));
}

#[tokio::test]
async fn test_multibyte_message_at_char_limit_is_sent() {
    let Some(pool) = test_pool().await else { return };
    let service = DirectMessageService::new(
        ConversationResolver::new(Arc::new(PgConversationRepository::new(pool.clone()))),
        Arc::new(PgMessageRepository::new(pool)),
        Arc::new(BroadcastMessageBus::new(8)),
    );
    let (a, b) = (unique_id("u"), unique_id("v"));
    let content = "漢".repeat(3000);

    let sent = service.send_message(&a, &b, &content).await.unwrap();
    assert_eq!(sent.content, content);

    let fetched = service.fetch_recent_messages(&b, &a).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].content.chars().count(), 3000);
}

#[tokio::test]
async fn test_trigger_notification_is_forwarded_with_full_row() {
    let Some(pool) = test_pool().await else { return };
    let conversation = new_conversation(&pool).await;
    let repo = PgMessageRepository::new(pool.clone());

    let mut listener = PgListener::connect_with(&pool).await.unwrap();
    listener.listen(DEFAULT_NOTIFY_CHANNEL).await.unwrap();

    let bus = BroadcastMessageBus::new(8);
    let mut stream = bus.subscribe(conversation.id).await.unwrap();

    let sender = conversation.participants()[1].clone();
    let content = "ß".repeat(4000);
    let inserted = repo
        .insert(&NewMessage::new(conversation.id, sender, content.clone()).unwrap())
        .await
        .unwrap();

    // other tests may insert concurrently; wait for this row's notification
    let notification = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let received = listener.recv().await.unwrap();
            if let Some(notification) = MessageNotification::parse(received.payload()) {
                if notification.id == inserted.id {
                    return notification;
                }
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(notification.conversation_id, conversation.id);

    assert_eq!(forward_notification(&repo, &bus, notification).await.unwrap(), 1);
    let delivered = stream.next().await.unwrap();
    assert_eq!(delivered.id, inserted.id);
    assert_eq!(delivered.content, content);
}
