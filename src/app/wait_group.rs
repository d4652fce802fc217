use crate::app::journal::{EventKind, Journal};
use crate::error::JoinErrorContext;
use anyhow::Result;
use futures::future::join_all;
use std::time::Duration;

/// A task that sleeps for `delay` and then reports itself finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedTask {
    pub label: String,
    pub delay: Duration,
}

/// Run every task concurrently and wait for all of them. Labels come back
/// in the order the tasks were given, not the order they finished.
pub async fn run_wait_group(tasks: Vec<TimedTask>, journal: &Journal) -> Result<Vec<String>> {
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let journal = journal.clone();
            let label = task.label.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(task.delay).await;
                journal.record(EventKind::TaskFinished {
                    label: task.label.clone(),
                });
                task.label
            });
            (label, handle)
        })
        .collect();

    let (labels, joins): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
    let results = join_all(joins).await;

    let finished = results
        .into_iter()
        .zip(labels.iter())
        .map(|(res, label)| res.context_task(label))
        .collect::<Result<Vec<_>>>()?;

    journal.record(EventKind::AllFinished {
        count: finished.len(),
    });
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(label: &str, ms: u64) -> TimedTask {
        TimedTask {
            label: label.to_string(),
            delay: Duration::from_millis(ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_all_in_spawn_order() {
        let journal = Journal::silent();
        let finished = run_wait_group(vec![task("books", 200), task("orders", 100)], &journal)
            .await
            .unwrap();

        assert_eq!(finished, vec!["books", "orders"]);
        assert_eq!(
            journal.events(),
            vec![
                EventKind::TaskFinished {
                    label: "orders".to_string()
                },
                EventKind::TaskFinished {
                    label: "books".to_string()
                },
                EventKind::AllFinished { count: 2 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_takes_longest_delay() {
        let journal = Journal::silent();
        let start = tokio::time::Instant::now();
        run_wait_group(vec![task("a", 300), task("b", 100), task("c", 200)], &journal)
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_empty_group() {
        let journal = Journal::silent();
        let finished = run_wait_group(Vec::new(), &journal).await.unwrap();
        assert!(finished.is_empty());
        assert_eq!(journal.events(), vec![EventKind::AllFinished { count: 0 }]);
    }
}
