//! Closing an event and issuing its certificate jobs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{DomainError, ResultExt};
use crate::models::{Activity, CertificateJob, UserInfo};
use crate::ports::{
    ActivityRepository, CertificateQueue, CheckInRepository, EventRepository,
    UserAuthorizationService,
};

/// Result of a successful finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FinishEventOutcome {
    pub event_id: Uuid,
    pub jobs_enqueued: usize,
}

pub struct FinishEvent {
    events: Arc<dyn EventRepository>,
    activities: Arc<dyn ActivityRepository>,
    check_ins: Arc<dyn CheckInRepository>,
    users: Arc<dyn UserAuthorizationService>,
    queue: Arc<dyn CertificateQueue>,
}

impl FinishEvent {
    pub fn new(
        events: Arc<dyn EventRepository>,
        activities: Arc<dyn ActivityRepository>,
        check_ins: Arc<dyn CheckInRepository>,
        users: Arc<dyn UserAuthorizationService>,
        queue: Arc<dyn CertificateQueue>,
    ) -> Self {
        Self {
            events,
            activities,
            check_ins,
            users,
            queue,
        }
    }

    /// Enqueues one certificate job per check-in of the event. Nothing is
    /// enqueued unless every precondition holds.
    pub async fn execute(
        &self,
        user_id: &str,
        event_id: Uuid,
    ) -> Result<FinishEventOutcome, DomainError> {
        let caller = self
            .users
            .get_user_by_id(user_id)
            .await
            .context("failed to find user")?
            .ok_or_else(|| DomainError::NotFound("user".into()))?;
        if !caller.is_admin {
            return Err(DomainError::Forbidden(
                "only admins can finish events".into(),
            ));
        }

        let (event, activities) = tokio::try_join!(
            async {
                self.events
                    .find_by_id(event_id)
                    .await
                    .context("failed to find event")
            },
            async {
                self.activities
                    .find_by_event_id(event_id)
                    .await
                    .context("failed to find activities")
            },
        )?;

        let event = event.ok_or_else(|| DomainError::NotFound("event".into()))?;
        if activities.is_empty() {
            return Err(DomainError::NoActivities);
        }

        let now = Utc::now();
        if let Some(open) = activities.iter().find(|a| !a.has_ended_at(now)) {
            tracing::info!(
                %event_id,
                activity_id = %open.id,
                "Refused to finish event with an activity still running"
            );
            return Err(DomainError::ActivityNotEnded {
                activity_id: open.id,
            });
        }

        let activity_ids: Vec<Uuid> = activities.iter().map(|a| a.id).collect();
        let check_ins = self
            .check_ins
            .find_by_activity_ids(&activity_ids)
            .await
            .context("failed to find check-ins")?;
        if check_ins.is_empty() {
            return Err(DomainError::NoCheckIns);
        }

        let mut seen = HashSet::new();
        let user_ids: Vec<String> = check_ins
            .iter()
            .filter(|c| seen.insert(c.user_id.as_str()))
            .map(|c| c.user_id.clone())
            .collect();

        let users = self
            .users
            .get_user_info_batch(&user_ids)
            .await
            .context("failed to resolve users")?;
        if users.is_empty() {
            return Err(DomainError::NoUsers);
        }

        let users_by_id: HashMap<&str, &UserInfo> =
            users.iter().map(|u| (u.id.as_str(), u)).collect();
        let activities_by_id: HashMap<Uuid, &Activity> =
            activities.iter().map(|a| (a.id, a)).collect();

        let jobs = check_ins
            .iter()
            .map(|check_in| {
                let user = users_by_id.get(check_in.user_id.as_str()).ok_or_else(|| {
                    DomainError::Inconsistent(format!(
                        "user {} of check-in {} could not be resolved",
                        check_in.user_id, check_in.id
                    ))
                })?;
                let activity = activities_by_id.get(&check_in.activity_id).ok_or_else(|| {
                    DomainError::Inconsistent(format!(
                        "activity {} of check-in {} does not belong to event {}",
                        check_in.activity_id, check_in.id, event_id
                    ))
                })?;
                Ok(CertificateJob::new(&event, user, activity, check_in))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        self.queue
            .enqueue_batch(&jobs)
            .await
            .context("failed to enqueue certificate jobs")?;

        tracing::info!(
            %event_id,
            activities = activities.len(),
            users = user_ids.len(),
            jobs = jobs.len(),
            "Event finished, certificate jobs enqueued"
        );

        Ok(FinishEventOutcome {
            event_id,
            jobs_enqueued: jobs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckIn, Event, NewActivity, NewEvent};
    use crate::ports::memory::{
        InMemoryActivityRepository, InMemoryCertificateQueue, InMemoryCheckInRepository,
        InMemoryEventRepository, InMemoryUserDirectory,
    };
    use chrono::{DateTime, Duration};

    fn user(id: &str, email: &str, is_admin: bool) -> UserInfo {
        UserInfo {
            id: id.into(),
            first_name: "Test".into(),
            last_name: id.to_uppercase(),
            email: email.into(),
            is_admin,
        }
    }

    fn activity(event: &Event, name: &str, end: DateTime<Utc>) -> Activity {
        Activity::new(
            event.id,
            NewActivity {
                name: name.into(),
                description: None,
                start_date: end - Duration::hours(2),
                end_date: end,
            },
        )
        .unwrap()
    }

    fn conf2024() -> Event {
        let now = Utc::now();
        Event::new(NewEvent {
            name: "Conf2024".into(),
            allowed_domains: vec!["acme.com".into()],
            description: None,
            start_date: now - Duration::days(3),
            end_date: now + Duration::days(1),
        })
        .unwrap()
    }

    struct Fixture {
        event: Event,
        queue: Arc<InMemoryCertificateQueue>,
        use_case: FinishEvent,
    }

    fn fixture(
        activities: Vec<Activity>,
        check_ins: Vec<CheckIn>,
        users: Vec<UserInfo>,
        event: Event,
    ) -> Fixture {
        let queue = Arc::new(InMemoryCertificateQueue::new());
        let use_case = FinishEvent::new(
            Arc::new(InMemoryEventRepository::with_events(vec![event.clone()])),
            Arc::new(InMemoryActivityRepository::with_activities(activities)),
            Arc::new(InMemoryCheckInRepository::with_check_ins(check_ins)),
            Arc::new(InMemoryUserDirectory::with_users(users)),
            queue.clone(),
        );
        Fixture {
            event,
            queue,
            use_case,
        }
    }

    fn admin() -> UserInfo {
        user("admin", "admin@acme.com", true)
    }

    #[tokio::test]
    async fn test_single_check_in_produces_one_job() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let check_in = CheckIn::new("u1", keynote.id);
        let f = fixture(
            vec![keynote],
            vec![check_in.clone()],
            vec![admin(), user("u1", "u1@acme.com", false)],
            event,
        );

        let outcome = f.use_case.execute("admin", f.event.id).await.unwrap();
        assert_eq!(outcome.jobs_enqueued, 1);

        let jobs = f.queue.snapshot();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].activity_info().activity_name, "Keynote");
        assert_eq!(jobs[0].user_info().user_email, "u1@acme.com");
        assert_eq!(jobs[0].event_info().event_name, "Conf2024");
        assert_eq!(jobs[0].checked_at(), check_in.checked_at);
    }

    #[tokio::test]
    async fn test_one_job_per_check_in_across_activities() {
        let event = conf2024();
        let ended = Utc::now() - Duration::hours(1);
        let a1 = activity(&event, "Keynote", ended);
        let a2 = activity(&event, "Panel", ended - Duration::hours(3));
        let check_ins = vec![
            CheckIn::new("u1", a1.id),
            CheckIn::new("u2", a1.id),
            CheckIn::new("u1", a2.id),
        ];
        let f = fixture(
            vec![a1, a2],
            check_ins.clone(),
            vec![
                admin(),
                user("u1", "u1@acme.com", false),
                user("u2", "u2@acme.com", false),
            ],
            event,
        );

        let outcome = f.use_case.execute("admin", f.event.id).await.unwrap();
        assert_eq!(outcome.jobs_enqueued, 3);

        let jobs = f.queue.snapshot();
        let unique: HashSet<Uuid> = jobs.iter().map(|j| j.job_id()).collect();
        assert_eq!(unique.len(), 3);
        for (job, check_in) in jobs.iter().zip(&check_ins) {
            assert_eq!(job.user_info().user_id, check_in.user_id);
            assert_eq!(job.activity_info().activity_id, check_in.activity_id);
            assert!(job.enqueued_at() >= job.checked_at());
        }
    }

    #[tokio::test]
    async fn test_running_activity_blocks_finish() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let workshop = activity(&event, "Workshop", Utc::now() + Duration::hours(1));
        let workshop_id = workshop.id;
        let f = fixture(
            vec![keynote.clone(), workshop],
            vec![CheckIn::new("u1", keynote.id)],
            vec![admin(), user("u1", "u1@acme.com", false)],
            event,
        );

        let result = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(
            result,
            Err(DomainError::ActivityNotEnded { activity_id }) if activity_id == workshop_id
        ));
        assert_eq!(f.queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_caller_must_be_admin() {
        let event = conf2024();
        let f = fixture(vec![], vec![], vec![user("u1", "u1@acme.com", false)], event);

        let forbidden = f.use_case.execute("u1", f.event.id).await;
        assert!(matches!(forbidden, Err(DomainError::Forbidden(_))));

        let missing = f.use_case.execute("ghost", f.event.id).await;
        assert!(matches!(missing, Err(DomainError::NotFound(ref what)) if what == "user"));
    }

    #[tokio::test]
    async fn test_unknown_event_and_empty_event() {
        let event = conf2024();
        let f = fixture(vec![], vec![], vec![admin()], event);

        let unknown = f.use_case.execute("admin", Uuid::new_v4()).await;
        assert!(matches!(unknown, Err(DomainError::NotFound(ref what)) if what == "event"));

        let empty = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(empty, Err(DomainError::NoActivities)));
    }

    #[tokio::test]
    async fn test_no_check_ins() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let f = fixture(vec![keynote], vec![], vec![admin()], event);

        let result = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(result, Err(DomainError::NoCheckIns)));
        assert_eq!(f.queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_no_resolvable_users() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let f = fixture(
            vec![keynote.clone()],
            vec![CheckIn::new("deleted-user", keynote.id)],
            vec![admin()],
            event,
        );

        let result = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(result, Err(DomainError::NoUsers)));
    }

    #[tokio::test]
    async fn test_partially_resolved_users_fail_the_batch() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let f = fixture(
            vec![keynote.clone()],
            vec![
                CheckIn::new("u1", keynote.id),
                CheckIn::new("deleted-user", keynote.id),
            ],
            vec![admin(), user("u1", "u1@acme.com", false)],
            event,
        );

        let result = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(result, Err(DomainError::Inconsistent(_))));
        assert_eq!(f.queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_queue_failure_is_surfaced() {
        let event = conf2024();
        let keynote = activity(&event, "Keynote", Utc::now() - Duration::hours(1));
        let f = fixture(
            vec![keynote.clone()],
            vec![CheckIn::new("u1", keynote.id)],
            vec![admin(), user("u1", "u1@acme.com", false)],
            event,
        );
        f.queue.set_unavailable(true);

        let result = f.use_case.execute("admin", f.event.id).await;
        assert!(matches!(result, Err(DomainError::Queue { .. })));
    }
}
