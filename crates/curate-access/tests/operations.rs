//! Batch deactivation, sweeps, listing, notifications and queued tasks.

use assert_matches::assert_matches;
use curate_access::notifications::{DELETED_ALL, DELETED_ONE, NOT_FOUND};
use curate_access::sweep::SWEEP_SUBJECT;
use curate_access::{
    deactivate_batch, BatchOutcome, BatchRequest, ExpirationScan, Notifier, Sweeper, TaskOutcome,
    TaskRunner, UserMailbox, VisibilityLifecycle,
};
use curate_core::effects::{AccessTask, JobQueueEffects, MailboxEffects};
use curate_core::{
    AccessLevel, CurateConfig, CurateError, ObjectId, TimedKind, UserId, Visibility,
};
use curate_testkit::*;

#[tokio::test]
async fn batch_collects_every_outcome() {
    let (fx, faults) = Fixture::with_faults();
    fx.insert_all([
        WorkBuilder::new("expired").embargoed_until(fx.days(-1)).build(),
        WorkBuilder::new("plain").build(),
        WorkBuilder::new("active").leased_until(fx.days(4)).build(),
        WorkBuilder::new("broken").embargoed_until(fx.days(-2)).build(),
    ])
    .await;
    faults.fail_saves_for("broken");

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let request = BatchRequest::new(["expired", "plain", "active", "missing", "broken"]);
    let report = deactivate_batch(&lifecycle, &admin(), &request).await;

    let outcomes: Vec<_> = report.entries.iter().map(|e| e.outcome.clone()).collect();
    assert_eq!(
        outcomes[0],
        BatchOutcome::Deactivated {
            visibility: Visibility::Open,
            child_failures: 0
        }
    );
    assert_eq!(outcomes[1], BatchOutcome::NothingToDo);
    assert_matches!(outcomes[2], BatchOutcome::StillActive { .. });
    assert_eq!(outcomes[3], BatchOutcome::NotFound);
    assert_matches!(outcomes[4], BatchOutcome::StorageFailure { .. });

    let summary = report.summary();
    assert_eq!(summary.deactivated, 1);
    assert_eq!(summary.storage_failures, 1);
    assert!(!summary.is_clean());
    assert!(report.message().contains("storage failure for 1"));
}

#[tokio::test]
async fn batch_denial_is_per_object() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("mine")
            .person("depositor", AccessLevel::Edit)
            .embargoed_until(fx.days(-1))
            .build(),
        WorkBuilder::new("theirs").embargoed_until(fx.days(-1)).build(),
    ])
    .await;

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let report = deactivate_batch(
        &lifecycle,
        &depositor(),
        &BatchRequest::new(["theirs", "mine"]),
    )
    .await;

    assert_eq!(report.entries[0].outcome, BatchOutcome::Denied);
    assert_matches!(report.entries[1].outcome, BatchOutcome::Deactivated { .. });
    assert_eq!(report.message(), "1 deactivated; authorization denied for 1.");
    assert!(fx.get("theirs").await.embargo().is_some());
}

#[tokio::test]
async fn batch_copies_visibility_only_where_requested() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1").member("w1-f").embargoed_until(fx.days(-1)).build(),
        WorkBuilder::new("w2").member("w2-f").embargoed_until(fx.days(-1)).build(),
        WorkBuilder::file_set("w1-f").build(),
        WorkBuilder::file_set("w2-f").build(),
    ])
    .await;

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let request = BatchRequest::new(["w1", "w2"]).copy_for("w2");
    deactivate_batch(&lifecycle, &admin(), &request).await;

    assert_eq!(fx.get("w1-f").await.visibility, Visibility::Restricted);
    assert_eq!(fx.get("w2-f").await.visibility, Visibility::Open);
}

#[tokio::test]
async fn scan_lists_by_kind_and_phase() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("e-active").embargoed_until(fx.days(3)).build(),
        WorkBuilder::new("e-expired").embargoed_until(fx.days(-3)).build(),
        WorkBuilder::new("l-active").leased_until(fx.days(3)).build(),
        WorkBuilder::new("plain").build(),
    ])
    .await;

    let listing = ExpirationScan::new(&fx.system).scan(&admin()).await.unwrap();
    assert_eq!(listing.all().len(), 3);
    assert_eq!(listing.active(TimedKind::Embargo)[0].id, ObjectId::new("e-active"));
    assert_eq!(listing.active(TimedKind::Lease)[0].id, ObjectId::new("l-active"));
    assert_eq!(listing.expired_ids(), vec![ObjectId::new("e-expired")]);

    VisibilityLifecycle::new(&fx.system)
        .deactivate(&admin(), &ObjectId::new("e-expired"), false)
        .await
        .unwrap();
    let listing = ExpirationScan::new(&fx.system).scan(&admin()).await.unwrap();
    assert!(listing.expired(None).is_empty());
    assert_eq!(listing.deactivated(TimedKind::Embargo).len(), 1);
}

#[tokio::test]
async fn scan_requires_repository_manager() {
    let fx = Fixture::new();
    assert_matches!(
        ExpirationScan::new(&fx.system).scan(&depositor()).await,
        Err(CurateError::Unauthorized { .. })
    );
}

#[tokio::test]
async fn sweep_deactivates_expired_and_mails_summary() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1").member("f1").embargoed_until(fx.days(-1)).build(),
        WorkBuilder::new("w2").leased_until(fx.days(-1)).build(),
        WorkBuilder::new("w3").embargoed_until(fx.days(9)).build(),
        WorkBuilder::file_set("f1").build(),
    ])
    .await;

    let mut config = CurateConfig::default();
    config.lifecycle.copy_visibility_to_files = true;
    config.notifications.recipient = UserId::new("archivist");

    let report = Sweeper::from_config(&fx.system, &config)
        .sweep(&admin())
        .await
        .unwrap();
    assert_eq!(report.timed, 3);
    assert_eq!(report.batch.summary().deactivated, 2);
    assert!(report.notification_error.is_none());

    assert_eq!(fx.get("w1").await.visibility, Visibility::Open);
    assert_eq!(fx.get("f1").await.visibility, Visibility::Open);
    assert_eq!(fx.get("w2").await.visibility, Visibility::Restricted);
    assert!(fx.get("w3").await.embargo().is_some());

    let inbox = fx.system.inbox(&UserId::new("archivist")).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].subject, SWEEP_SUBJECT);
    assert!(inbox[0].body.starts_with("2 deactivated."));
}

#[tokio::test]
async fn empty_sweep_sends_nothing() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(9)).build())
        .await;

    let report = Sweeper::from_config(&fx.system, &CurateConfig::default())
        .sweep(&admin())
        .await
        .unwrap();
    assert!(report.batch.entries.is_empty());
    assert!(report.notification.is_none());
    assert!(fx
        .system
        .inbox(&UserId::new("admin"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unreadable_object_does_not_stop_the_sweep() {
    let (fx, faults) = Fixture::with_faults();
    fx.insert_all([
        WorkBuilder::new("a-good").embargoed_until(fx.days(-1)).build(),
        WorkBuilder::new("b-broken").embargoed_until(fx.days(-1)).build(),
    ])
    .await;
    faults.fail_loads_for("b-broken");

    let mut config = CurateConfig::default();
    config.notifications.recipient = UserId::new("archivist");
    let report = Sweeper::from_config(&fx.system, &config)
        .sweep(&admin())
        .await
        .unwrap();

    let summary = report.batch.summary();
    assert_eq!(summary.deactivated, 1);
    assert_eq!(summary.storage_failures, 1);
    assert_eq!(
        report.batch.ids_where(|o| matches!(o, BatchOutcome::StorageFailure { .. })),
        vec![&ObjectId::new("b-broken")]
    );

    let good = fx.get("a-good").await;
    assert_eq!(good.visibility, Visibility::Open);
    assert!(good.embargo().is_none());
    assert!(fx.get("b-broken").await.embargo().is_some());

    let inbox = fx.system.inbox(&UserId::new("archivist")).await.unwrap();
    assert!(inbox[0].body.contains("- b-broken: storage failure"));
}

#[tokio::test]
async fn sweep_keeps_deactivations_when_mail_fails() {
    let fx = Fixture::with_unreachable_mailbox();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;

    let report = Sweeper::from_config(&fx.system, &CurateConfig::default())
        .sweep(&admin())
        .await
        .unwrap();

    assert_eq!(report.batch.summary().deactivated, 1);
    assert!(report.notification.is_none());
    assert_matches!(report.notification_error, Some(CurateError::Persist { .. }));
    assert_eq!(fx.get("w1").await.visibility, Visibility::Open);
}

#[tokio::test]
async fn sweep_is_reserved_to_managers() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;
    let result = Sweeper::from_config(&fx.system, &CurateConfig::default())
        .sweep(&stranger())
        .await;
    assert_matches!(result, Err(CurateError::Unauthorized { .. }));
    assert!(fx.get("w1").await.embargo().is_some());
}

#[tokio::test]
async fn mailbox_facade_returns_alert_text() {
    let fx = Fixture::new();
    let user = UserId::new("archivist");
    let notifier = Notifier::new(&fx.system);
    let first = notifier.notify(&user, "one", "body").await.unwrap();
    fx.clock.advance(chrono::Duration::minutes(1));
    let second = notifier.notify(&user, "two", "body").await.unwrap();

    let mailbox = UserMailbox::new(&fx.system, user.clone());
    let inbox = mailbox.inbox().await.unwrap();
    assert_eq!(inbox, vec![second.clone(), first.clone()]);

    assert_eq!(mailbox.destroy(&first.id.to_string()).await.unwrap(), DELETED_ONE);
    assert_eq!(mailbox.destroy(&first.id.to_string()).await.unwrap(), NOT_FOUND);
    assert_eq!(mailbox.destroy("not-a-uuid").await.unwrap(), NOT_FOUND);

    let other = UserMailbox::new(&fx.system, UserId::new("someone-else"));
    assert_eq!(other.destroy(&second.id.to_string()).await.unwrap(), NOT_FOUND);

    assert_eq!(mailbox.delete_all().await.unwrap(), DELETED_ALL);
    assert!(mailbox.inbox().await.unwrap().is_empty());
}

#[tokio::test]
async fn queued_tasks_coalesce_and_drain() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1")
            .member("f1")
            .group("staff", AccessLevel::Edit)
            .build(),
        WorkBuilder::file_set("f1").build(),
    ])
    .await;

    let task = AccessTask::CopyPermissions {
        parent: ObjectId::new("w1"),
    };
    assert!(fx.system.enqueue(task.clone()).await.unwrap());
    assert!(!fx.system.enqueue(task.clone()).await.unwrap());
    assert!(fx
        .system
        .enqueue(AccessTask::CopyVisibility {
            parent: ObjectId::new("missing"),
        })
        .await
        .unwrap());

    let queue = fx.system.queue().clone();
    let results = TaskRunner::new(&fx.system)
        .run_until_empty(|| queue.pop())
        .await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, task);
    assert_matches!(results[0].1, Ok(TaskOutcome::Permissions(ref report)) if report.writes() == 1);
    assert_matches!(results[1].1, Ok(TaskOutcome::NotApplicable { .. }));
    assert!(queue.is_empty());
    assert_eq!(fx.get("f1").await.permissions.len(), 1);
}
