//! End-to-end behaviour of filter, reduce and parallel
//!
//! Units of work here complete from spawned tokio tasks after a delay, so
//! completions really do arrive out of order.

use anyhow::Result;
use collection_flow::{
    filter, parallel, reduce, Aggregate, Collection, Completion, Flow, FlowConfig, Task,
};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Complete `done` with `result` after `delay_ms`
fn complete_later<T, E>(done: Completion<T, E>, delay_ms: u64, result: std::result::Result<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        done.complete(result);
    });
}

fn task<V, E>(unit: impl FnOnce(Completion<Vec<V>, E>) + Send + 'static) -> Task<V, E> {
    Box::new(unit)
}

#[tokio::test]
async fn test_filter_keeps_input_order() -> Result<()> {
    init_tracing();
    let started = Arc::new(Mutex::new(Vec::new()));
    let order = started.clone();

    // 4 finishes first, 1 finishes last.
    let kept = filter(vec![1u64, 2, 3, 4], move |n: u64, done: Completion<bool, String>| {
        order.lock().unwrap().push(n);
        complete_later(done, (5 - n) * 15, Ok(n % 2 == 0));
    })
    .await;

    assert_eq!(kept, Ok(vec![2, 4]));
    assert_eq!(*started.lock().unwrap(), vec![1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn test_filter_keyed_input() -> Result<()> {
    init_tracing();
    let input =
        Collection::keyed([("first", 3u64), ("second", 8), ("third", 6), ("fourth", 1)])?;
    let kept = filter(input, |n: u64, done: Completion<bool, String>| {
        complete_later(done, 40 - n * 4, Ok(n > 2));
    })
    .await;
    assert_eq!(kept, Ok(vec![3, 8, 6]));
    Ok(())
}

#[tokio::test]
async fn test_reduce_is_strictly_sequential() -> Result<()> {
    init_tracing();
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let mut memos = Vec::new();

    let step = |memo: i32, item: i32, done: Completion<i32, String>| {
        memos.push(memo);
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        let in_flight = in_flight.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            done.ok(memo + item);
        });
    };
    let result = reduce(vec![1, 2, 3], 0, step).await;

    assert_eq!(result, Ok(6));
    assert_eq!(memos, vec![0, 1, 3]);
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_reduce_leaves_caller_collection_alone() -> Result<()> {
    let input: Collection<String> =
        Collection::keyed([("a", "x".to_string()), ("b", String::new())])?;
    let join = |mut acc: String, item: String, done: Completion<String, ()>| {
        acc.push_str(&item);
        acc.push('|');
        done.ok(acc);
    };
    let joined = reduce(input.clone(), String::new(), join).await;
    assert_eq!(joined, Ok("x||".to_string()));
    assert_eq!(input.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_parallel_keyed_either_order() -> Result<()> {
    init_tracing();
    for (delay_a, delay_b) in [(5, 30), (30, 5)] {
        let tasks: Collection<Task<&'static str, String>> = Collection::keyed([
            ("a", task(move |done| complete_later(done, delay_a, Ok(vec!["x"])))),
            ("b", task(move |done| complete_later(done, delay_b, Ok(vec!["y"])))),
        ])?;
        let result = parallel(tasks).await;
        let result = result.map_err(anyhow::Error::msg)?;
        assert_eq!(serde_json::to_value(&result)?, json!({"a": "x", "b": "y"}));
    }
    Ok(())
}

#[tokio::test]
async fn test_parallel_failure_after_success_short_circuits() -> Result<()> {
    init_tracing();
    let tasks: Vec<Task<String, &'static str>> = vec![
        task(|done| complete_later(done, 40, Err("boom"))),
        task(|done| complete_later(done, 5, Ok(vec!["done".to_string()]))),
    ];
    assert_eq!(parallel(tasks).await, Err("boom"));
    Ok(())
}

#[tokio::test]
async fn test_first_error_wins_and_late_failures_are_ignored() -> Result<()> {
    init_tracing();
    let tasks: Vec<Task<u8, String>> = vec![
        task(|done| complete_later(done, 50, Err("late".to_string()))),
        task(|done| complete_later(done, 5, Err("early".to_string()))),
        task(|done| complete_later(done, 25, Ok(vec![1]))),
    ];
    assert_eq!(parallel(tasks).await, Err("early".to_string()));

    // Let the remaining units finish against a batch that is already over.
    tokio::time::sleep(Duration::from_millis(80)).await;
    Ok(())
}

#[tokio::test]
async fn test_duplicate_completion_does_not_finish_batch_early() -> Result<()> {
    init_tracing();
    let parked: Arc<Mutex<Option<Completion<Vec<u8>, ()>>>> = Arc::new(Mutex::new(None));
    let slot = parked.clone();

    let tasks: Vec<Task<u8, ()>> = vec![
        task(|done| {
            done.single(1);
            done.single(2);
        }),
        task(move |done| {
            *slot.lock().unwrap() = Some(done);
        }),
    ];
    let mut run = Box::pin(parallel(tasks));
    assert!(run.as_mut().now_or_never().is_none());

    let done = parked.lock().unwrap().take().expect("second unit was started");
    done.single(7);
    assert_eq!(
        run.await,
        Ok(Collection::Sequence(vec![Aggregate::One(1), Aggregate::One(7)]))
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_random_completion_order_preserves_slots() -> Result<()> {
    init_tracing();
    for _ in 0..10 {
        let items: Vec<u64> = (0..16).collect();

        let kept = filter(items.clone(), |n: u64, done: Completion<bool, String>| {
            complete_later(done, fastrand::u64(0..20), Ok(n % 3 == 0));
        })
        .await;
        assert_eq!(kept, Ok(vec![0, 3, 6, 9, 12, 15]));

        let tasks: Vec<Task<u64, String>> = items
            .iter()
            .map(|&n| {
                task(move |done| complete_later(done, fastrand::u64(0..20), Ok(vec![n * 10])))
            })
            .collect();
        let gathered = parallel(tasks).await.map_err(anyhow::Error::msg)?;
        let expected: Vec<Aggregate<u64>> = items.iter().map(|n| Aggregate::One(n * 10)).collect();
        assert_eq!(gathered, Collection::Sequence(expected));
    }
    Ok(())
}

#[tokio::test]
async fn test_configured_flow_over_json_collection() -> Result<()> {
    init_tracing();
    let config =
        FlowConfig::from_yaml_str("name: json-scan\nwarn_on_duplicate_completion: false\n")?;
    let flow = Flow::new(config)?;
    assert_eq!(flow.config().name, "json-scan");

    let input = Collection::<serde_json::Value>::try_from(json!({"a": 0, "b": "", "c": 2}))?;
    let tasks = input.map(|value| {
        move |done: Completion<Vec<serde_json::Value>, String>| {
            done.ok(vec![value.clone(), value]);
        }
    });
    let gathered = flow.parallel(tasks).await.map_err(anyhow::Error::msg)?;
    assert_eq!(
        serde_json::to_value(&gathered)?,
        json!({"a": [0, 0], "b": ["", ""], "c": [2, 2]})
    );
    Ok(())
}
