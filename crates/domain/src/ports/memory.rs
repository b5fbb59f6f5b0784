//! In-memory port implementations for tests and local development.
//!
//! They honour the same contracts as the PostgreSQL and Redis adapters,
//! including the check-in uniqueness constraint and the blocking dequeue.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::certificate::{CertificateData, CertificateGenerator, RenderError};
use super::mail::{EmailError, EmailSender, OutgoingEmail};
use super::queue::{decode_job, encode_job, CertificateQueue, QueueError};
use super::repository::{
    ActivityRepository, CheckInRepository, EventRepository, RepositoryError,
};
use super::user_directory::UserAuthorizationService;
use crate::models::{Activity, CertificateJob, CheckIn, Event, UserInfo};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unavailable(flag: &AtomicBool) -> Result<(), RepositoryError> {
    if flag.load(Ordering::SeqCst) {
        Err(RepositoryError::Backend("store unavailable".into()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<Uuid, Event>>,
    unavailable: AtomicBool,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let repo = Self::new();
        lock(&repo.events).extend(events.into_iter().map(|e| (e.id, e)));
        repo
    }

    /// Makes every call fail with a backend error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, event: &Event) -> Result<(), RepositoryError> {
        unavailable(&self.unavailable)?;
        lock(&self.events).insert(event.id, event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, RepositoryError> {
        unavailable(&self.unavailable)?;
        Ok(lock(&self.events).get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryActivityRepository {
    activities: Mutex<Vec<Activity>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activities(activities: impl IntoIterator<Item = Activity>) -> Self {
        let repo = Self::new();
        lock(&repo.activities).extend(activities);
        repo
    }

    pub fn count(&self) -> usize {
        lock(&self.activities).len()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn save_all(&self, activities: &[Activity]) -> Result<(), RepositoryError> {
        let mut stored = lock(&self.activities);
        for activity in activities {
            let taken = stored
                .iter()
                .any(|a| a.event_id == activity.event_id && a.name == activity.name);
            if taken {
                return Err(RepositoryError::Conflict(format!(
                    "activity name '{}' already exists",
                    activity.name
                )));
            }
        }
        stored.extend(activities.iter().cloned());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError> {
        Ok(lock(&self.activities).iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_event_id(&self, event_id: Uuid) -> Result<Vec<Activity>, RepositoryError> {
        let mut found: Vec<Activity> = lock(&self.activities)
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.start_date);
        Ok(found)
    }

    async fn find_by_event_id_and_names(
        &self,
        event_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Activity>, RepositoryError> {
        Ok(lock(&self.activities)
            .iter()
            .filter(|a| a.event_id == event_id && names.contains(&a.name))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCheckInRepository {
    check_ins: Mutex<Vec<CheckIn>>,
    unavailable: AtomicBool,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_ins(check_ins: impl IntoIterator<Item = CheckIn>) -> Self {
        let repo = Self::new();
        lock(&repo.check_ins).extend(check_ins);
        repo
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        lock(&self.check_ins).len()
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckInRepository {
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError> {
        unavailable(&self.unavailable)?;
        let mut stored = lock(&self.check_ins);
        let duplicate = stored
            .iter()
            .any(|c| c.user_id == check_in.user_id && c.activity_id == check_in.activity_id);
        if duplicate {
            return Err(RepositoryError::Conflict(
                "check_ins (user_id, activity_id)".into(),
            ));
        }
        stored.push(check_in.clone());
        Ok(())
    }

    async fn find_by_user_and_activity(
        &self,
        user_id: &str,
        activity_id: Uuid,
    ) -> Result<Option<CheckIn>, RepositoryError> {
        unavailable(&self.unavailable)?;
        Ok(lock(&self.check_ins)
            .iter()
            .find(|c| c.user_id == user_id && c.activity_id == activity_id)
            .cloned())
    }

    async fn find_by_activity_ids(
        &self,
        activity_ids: &[Uuid],
    ) -> Result<Vec<CheckIn>, RepositoryError> {
        unavailable(&self.unavailable)?;
        Ok(lock(&self.check_ins)
            .iter()
            .filter(|c| activity_ids.contains(&c.activity_id))
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<CheckIn>, RepositoryError> {
        unavailable(&self.unavailable)?;
        let mut found: Vec<CheckIn> = lock(&self.check_ins)
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        Ok(found)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, UserInfo>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserInfo>) -> Self {
        let directory = Self::new();
        lock(&directory.users).extend(users.into_iter().map(|u| (u.id.clone(), u)));
        directory
    }

    pub fn insert(&self, user: UserInfo) {
        lock(&self.users).insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserAuthorizationService for InMemoryUserDirectory {
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserInfo>, RepositoryError> {
        Ok(lock(&self.users).get(user_id).cloned())
    }

    async fn is_user_admin(&self, user_id: &str) -> Result<bool, RepositoryError> {
        Ok(lock(&self.users)
            .get(user_id)
            .map(|u| u.is_admin)
            .unwrap_or(false))
    }

    async fn get_user_email(&self, user_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(lock(&self.users).get(user_id).map(|u| u.email.clone()))
    }

    async fn get_user_info_batch(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserInfo>, RepositoryError> {
        let users = lock(&self.users);
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }
}

/// FIFO queue holding encoded payloads, so malformed entries can be
/// injected the same way they would appear on the wire.
#[derive(Debug, Default)]
pub struct InMemoryCertificateQueue {
    payloads: Mutex<VecDeque<String>>,
    available: Notify,
    unavailable: AtomicBool,
}

impl InMemoryCertificateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw payload without encoding it.
    pub fn push_raw(&self, payload: impl Into<String>) {
        lock(&self.payloads).push_back(payload.into());
        self.available.notify_waiters();
    }

    /// Decodes the queued jobs without removing them.
    pub fn snapshot(&self) -> Vec<CertificateJob> {
        lock(&self.payloads)
            .iter()
            .filter_map(|p| decode_job(p).ok())
            .collect()
    }

    pub fn depth(&self) -> usize {
        lock(&self.payloads).len()
    }

    /// Makes every call fail with a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), QueueError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(QueueError::Transport("queue unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn pop(&self) -> Option<String> {
        lock(&self.payloads).pop_front()
    }
}

#[async_trait]
impl CertificateQueue for InMemoryCertificateQueue {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), QueueError> {
        self.check_available()?;
        let payload = encode_job(job)?;
        self.push_raw(payload);
        Ok(())
    }

    async fn enqueue_batch(&self, jobs: &[CertificateJob]) -> Result<(), QueueError> {
        self.check_available()?;
        let payloads = jobs.iter().map(encode_job).collect::<Result<Vec<_>, _>>()?;
        lock(&self.payloads).extend(payloads);
        self.available.notify_waiters();
        Ok(())
    }

    async fn dequeue(&self) -> Result<CertificateJob, QueueError> {
        loop {
            self.check_available()?;
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(payload) = self.pop() {
                return decode_job(&payload);
            }
            notified.await;
        }
    }

    async fn dequeue_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<CertificateJob>, QueueError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            self.check_available()?;
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(payload) = self.pop() {
                return decode_job(&payload).map(Some);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn len(&self) -> Result<u64, QueueError> {
        self.check_available()?;
        Ok(self.depth() as u64)
    }
}

/// Certificate generator that records its input and returns a stub PDF.
#[derive(Debug, Default)]
pub struct MockCertificateGenerator {
    /// Whether to simulate rendering failures.
    pub simulate_failure: bool,
    rendered: Mutex<Vec<CertificateData>>,
}

impl MockCertificateGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn rendered(&self) -> Vec<CertificateData> {
        lock(&self.rendered).clone()
    }
}

impl CertificateGenerator for MockCertificateGenerator {
    fn generate(&self, data: &CertificateData) -> Result<Vec<u8>, RenderError> {
        lock(&self.rendered).push(data.clone());
        if self.simulate_failure {
            return Err(RenderError::Render("simulated failure".into()));
        }
        Ok(format!("%PDF-1.3 certificate for {}", data.recipient_name).into_bytes())
    }
}

/// Email sender that records messages instead of delivering them.
#[derive(Debug, Default)]
pub struct MockEmailSender {
    /// Whether to simulate delivery failures.
    pub simulate_failure: bool,
    attempts: Mutex<Vec<OutgoingEmail>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Every message passed to `send`, including failed attempts.
    pub fn attempts(&self) -> Vec<OutgoingEmail> {
        lock(&self.attempts).clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        lock(&self.attempts).push(email.clone());
        if self.simulate_failure {
            tracing::warn!(to = %email.to, "Mock email sender simulating failure");
            return Err(EmailError::SendFailed("simulated failure".into()));
        }
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "Mock: would send email"
        );
        Ok(())
    }
}
