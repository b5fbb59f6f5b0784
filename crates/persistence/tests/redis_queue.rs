//! Integration tests for the Redis certificate queue.
//!
//! These tests require a running Redis instance and are ignored by default.
//!
//! Run with: TEST_REDIS_URL=redis://localhost:6379 cargo test --test redis_queue -- --ignored

use std::time::{Duration, Instant};

use chrono::Utc;
use domain::models::{Activity, CertificateJob, CheckIn, Event, NewActivity, NewEvent, UserInfo};
use domain::ports::{CertificateQueue, QueueError};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::RedisCertificateQueue;
use uuid::Uuid;

fn redis_url() -> String {
    std::env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Each test gets its own key so runs never share state.
async fn isolated_queue() -> RedisCertificateQueue {
    let key = format!("test:certificate:jobs:{}", Uuid::new_v4());
    RedisCertificateQueue::connect(&redis_url(), key)
        .await
        .expect("Failed to connect to test Redis")
}

fn job() -> CertificateJob {
    let start = Utc::now() - chrono::Duration::days(1);
    let event = Event::new(NewEvent {
        name: "Conf2024".to_string(),
        allowed_domains: vec![],
        description: None,
        start_date: start,
        end_date: start + chrono::Duration::hours(8),
    })
    .unwrap();
    let activity = Activity::new(
        event.id,
        NewActivity {
            name: "Keynote".to_string(),
            description: None,
            start_date: start,
            end_date: start + chrono::Duration::minutes(90),
        },
    )
    .unwrap();
    let user = UserInfo {
        id: Uuid::new_v4().to_string(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: SafeEmail().fake(),
        is_admin: false,
    };
    let check_in = CheckIn::new(user.id.clone(), activity.id);
    CertificateJob::new(&event, &user, &activity, &check_in)
}

#[tokio::test]
#[ignore]
async fn test_enqueue_then_dequeue_round_trip() {
    let queue = isolated_queue().await;
    let original = job();

    queue.enqueue(&original).await.unwrap();
    assert_eq!(queue.len().await.unwrap(), 1);

    let received = queue.dequeue().await.unwrap();
    assert_eq!(received, original);
    assert_eq!(queue.len().await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn test_batch_preserves_fifo_order() {
    let queue = isolated_queue().await;
    let jobs: Vec<CertificateJob> = (0..5).map(|_| job()).collect();

    queue.enqueue_batch(&jobs).await.unwrap();
    assert_eq!(queue.len().await.unwrap(), 5);

    for expected in &jobs {
        let received = queue
            .dequeue_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(received.as_ref(), Some(expected));
    }
}

#[tokio::test]
#[ignore]
async fn test_dequeue_with_timeout_on_empty_queue() {
    let queue = isolated_queue().await;
    let started = Instant::now();

    let received = queue
        .dequeue_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();

    assert!(received.is_none());
    assert!(started.elapsed() >= Duration::from_millis(900));
}

#[tokio::test]
#[ignore]
async fn test_malformed_payload_fails_single_dequeue() {
    let queue = isolated_queue().await;

    let client = redis::Client::open(redis_url()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: u64 = redis::cmd("LPUSH")
        .arg(queue.key())
        .arg("{not json")
        .query_async(&mut conn)
        .await
        .unwrap();
    let good = job();
    queue.enqueue(&good).await.unwrap();

    let first = queue.dequeue_with_timeout(Duration::from_secs(1)).await;
    assert!(matches!(first, Err(QueueError::Malformed(_))));

    let second = queue
        .dequeue_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(second, Some(good));
}
