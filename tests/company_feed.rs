mod register_signals;

use std::time::Duration;

use proptest::prelude::*;
use register_signals::{logging_subscriber, new_log, recording_subscriber, signals_of, values};
use rxplay::{
    feed::MOCK_COMPANIES, CompanyApi, CompanyFeed, Delay, Disposable, FeedError, Signal,
    Subscribeable,
};

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn feed_emits_every_name_in_order(
        names in prop::collection::vec("[A-Za-z]{1,12}", 0..8),
        min_ms in 0u64..2000,
        spread_ms in 0u64..2000,
    ) {
        let delay = Delay::Range {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(min_ms + spread_ms),
        };
        let stream = CompanyFeed::new(names.clone(), delay).into_stream();
        let (subscriber, signals) = recording_subscriber();

        paused_runtime().block_on(async {
            stream.subscribe(subscriber).join().await.unwrap();
        });

        let mut expected: Vec<Signal<String, FeedError>> =
            names.iter().cloned().map(Signal::Value).collect();
        if names.is_empty() {
            expected.push(Signal::Failure(FeedError::NoItems));
        } else {
            expected.push(Signal::Completed);
        }
        prop_assert_eq!(signals.lock().unwrap().clone(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn each_item_waits_its_own_delay() {
    let stream = CompanyFeed::new(["A", "B"], Delay::default()).into_stream();
    let (subscriber, signals) = recording_subscriber();
    let subscription = stream.subscribe(subscriber);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(signals.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*signals.lock().unwrap(), values(&["A"]));

    subscription.join().await.unwrap();
    assert_eq!(signals.lock().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn labelled_items_carry_their_delay() {
    let feed = CompanyFeed::new(["Googz"], Delay::fixed_secs(1.5).unwrap()).label_with_delay(true);
    let (subscriber, signals) = recording_subscriber();

    feed.into_stream().subscribe(subscriber).join().await.unwrap();

    assert_eq!(
        *signals.lock().unwrap(),
        vec![
            Signal::Value("Googz delay: 1.50".to_string()),
            Signal::Completed
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn passthrough_api_drives_a_single_run() {
    let mut api = CompanyApi::new(CompanyFeed::with_mock_companies(Delay::default()));
    let receiver = api.receiver();
    let log = new_log();

    receiver.subscribe(logging_subscriber(&log, "early"));
    let run = api.start().unwrap();

    // Attaching after two items were emitted misses them.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    receiver.subscribe(logging_subscriber(&log, "late"));

    run.join().await.unwrap();

    let mut early = values(&MOCK_COMPANIES);
    early.push(Signal::Completed);
    assert_eq!(signals_of(&log, "early"), early);

    let mut late = values(&MOCK_COMPANIES[2..]);
    late.push(Signal::Completed);
    assert_eq!(signals_of(&log, "late"), late);
}

#[tokio::test(start_paused = true)]
async fn stopping_the_api_leaves_listeners_without_terminal_signal() {
    let mut api = CompanyApi::new(CompanyFeed::new(["A", "B", "C"], Delay::default()));
    let (subscriber, signals) = recording_subscriber();
    api.receiver().subscribe(subscriber);

    let run = api.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    run.dispose();
    run.join().await.unwrap();

    assert_eq!(*signals.lock().unwrap(), values(&["A"]));
    assert!(!api.receiver().is_terminated());
}

#[tokio::test(start_paused = true)]
async fn swapped_delay_range_still_completes() {
    let delay = Delay::Range {
        min: Duration::from_secs(3),
        max: Duration::from_secs(1),
    };
    let stream = CompanyFeed::new(["A"], delay).into_stream();
    let (subscriber, signals) = recording_subscriber();

    stream.subscribe(subscriber).join().await.unwrap();

    assert_eq!(
        *signals.lock().unwrap(),
        vec![Signal::Value("A".to_string()), Signal::Completed]
    );
}
