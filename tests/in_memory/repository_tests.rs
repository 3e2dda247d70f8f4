//! Contract tests for the in-memory task repository.

use super::helpers::{alice, at_minute, bob, repo, task_at};
use mockable::DefaultClock;
use rstest::rstest;
use tasktracker::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{OwnerId, ProblemDescriptionUpdate, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use uuid::Uuid;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifier(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
) -> eyre::Result<()> {
    let task = task_at(&alice, "Buy milk", TaskId::new(), at_minute(0));
    repo.store(&task).await?;

    let result = repo.store(&task).await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "expected duplicate error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_reports_not_found(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
) -> eyre::Result<()> {
    let task = task_at(&alice, "Ghost", TaskId::new(), at_minute(0));
    let expected = task.revision();
    let moved = task
        .begin_transition(TaskStatus::Done, ProblemDescriptionUpdate::Unchanged)
        .complete(None, &DefaultClock);

    let result = repo.update(&moved, expected).await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == moved.id()),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_writer_with_same_revision_loses(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
) -> eyre::Result<()> {
    let task = task_at(&alice, "Fix leak", TaskId::new(), at_minute(0));
    let task_id = task.id();
    repo.store(&task).await?;

    let first = task
        .clone()
        .begin_transition(TaskStatus::InProgress, ProblemDescriptionUpdate::Unchanged);
    let second = task.begin_transition(TaskStatus::Done, ProblemDescriptionUpdate::Unchanged);
    let first_expected = first.expected_revision();
    let second_expected = second.expected_revision();

    repo.update(&first.complete(None, &DefaultClock), first_expected)
        .await?;
    let result = repo
        .update(&second.complete(None, &DefaultClock), second_expected)
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::RevisionConflict { .. })),
        "expected revision conflict, got {result:?}"
    );
    let stored = repo
        .find_by_id_for_owner(task_id, &alice)
        .await?
        .ok_or_else(|| eyre::eyre!("task disappeared"))?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress,
        "first writer's change must survive"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_is_scoped_to_owner(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
    bob: OwnerId,
) -> eyre::Result<()> {
    let task = task_at(&alice, "Private", TaskId::new(), at_minute(0));
    repo.store(&task).await?;

    eyre::ensure!(
        repo.find_by_id_for_owner(task.id(), &alice).await? == Some(task.clone()),
        "owner should see the task"
    );
    eyre::ensure!(
        repo.find_by_id_for_owner(task.id(), &bob).await?.is_none(),
        "other callers must not see the task"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_newest_first_with_identifier_tiebreak(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
    bob: OwnerId,
) -> eyre::Result<()> {
    let low = TaskId::from_uuid(Uuid::from_u128(1));
    let high = TaskId::from_uuid(Uuid::from_u128(2));
    repo.store(&task_at(&alice, "Oldest", TaskId::new(), at_minute(0)))
        .await?;
    repo.store(&task_at(&alice, "Tie low", low, at_minute(10)))
        .await?;
    repo.store(&task_at(&alice, "Tie high", high, at_minute(10)))
        .await?;
    repo.store(&task_at(&bob, "Not mine", TaskId::new(), at_minute(20)))
        .await?;

    let listed = repo.list_for_owner(&alice, None).await?;
    let titles: Vec<&str> = listed.iter().map(|task| task.title().as_str()).collect();

    eyre::ensure!(
        titles == ["Tie high", "Tie low", "Oldest"],
        "unexpected order: {titles:?}"
    );
    Ok(())
}

#[rstest]
#[case("pipe", &["Fix pipe"])]
#[case("Pipe", &[])]
#[case("100%", &["Reach 100%"])]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_literal_substring(
    repo: InMemoryTaskRepository,
    alice: OwnerId,
    #[case] needle: &str,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    repo.store(&task_at(&alice, "Fix pipe", TaskId::new(), at_minute(1)))
        .await?;
    repo.store(&task_at(&alice, "Reach 100%", TaskId::new(), at_minute(2)))
        .await?;

    let listed = repo.list_for_owner(&alice, Some(needle)).await?;
    let titles: Vec<&str> = listed.iter().map(|task| task.title().as_str()).collect();

    eyre::ensure!(titles == expected, "unexpected titles: {titles:?}");
    Ok(())
}
