use std::time::Duration;

use rxplay::{
    playground::{Demo, MemorySink, Playground, SignalEvent},
    CompanyFeed, Delay,
};

fn value(v: &str) -> SignalEvent {
    SignalEvent::Value(v.to_string())
}

async fn run_demo(feed: CompanyFeed, demo: Demo) -> MemorySink {
    let sink = MemorySink::new();
    let mut playground = Playground::new(feed, sink.clone());

    playground.run(demo).unwrap();
    playground.finish().await.unwrap();
    sink
}

fn two_companies() -> CompanyFeed {
    CompanyFeed::new(["Googz", "Macrashaft"], Delay::default())
}

#[tokio::test(start_paused = true)]
async fn future_demo_emits_the_whole_list_once() {
    let sink = run_demo(two_companies(), Demo::Future).await;

    assert_eq!(
        sink.events_for("future"),
        vec![value("Googz, Macrashaft"), SignalEvent::Completed]
    );
}

#[tokio::test(start_paused = true)]
async fn future_demo_fails_on_an_empty_feed() {
    let feed = CompanyFeed::new(Vec::<String>::new(), Delay::default());
    let sink = run_demo(feed, Demo::Future).await;

    assert_eq!(
        sink.events_for("future"),
        vec![SignalEvent::Failure(
            "no companies available in the feed".to_string()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn passthrough_and_publisher_demos_deliver_every_company() {
    for (demo, label) in [(Demo::Passthrough, "passthrough"), (Demo::Publisher, "publisher")] {
        let sink = run_demo(two_companies(), demo).await;

        assert_eq!(
            sink.events_for(label),
            vec![value("Googz"), value("Macrashaft"), SignalEvent::Completed],
            "{demo}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn multiple_subscribers_each_get_the_full_list() {
    let sink = run_demo(two_companies(), Demo::MultipleSubscribers).await;
    let expected = vec![value("Googz"), value("Macrashaft"), SignalEvent::Completed];

    assert_eq!(sink.events_for("pub1"), expected);
    assert_eq!(sink.events_for("pub2"), expected);
}

#[tokio::test(start_paused = true)]
async fn shared_subscribers_observe_the_same_step() {
    let sink = run_demo(two_companies(), Demo::SharedSubscribers).await;

    let labels: Vec<_> = sink.events().into_iter().map(|(l, _)| l).collect();
    assert_eq!(
        labels,
        vec!["multi1", "multi2", "multi1", "multi2", "multi1", "multi2"]
    );
    assert_eq!(
        sink.events_for("multi2"),
        vec![value("Googz"), value("Macrashaft"), SignalEvent::Completed]
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_every_demo_subscription() {
    let sink = MemorySink::new();
    let mut playground = Playground::new(two_companies(), sink.clone());

    playground.run(Demo::MultipleSubscribers).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    playground.cancel();
    playground.finish().await.unwrap();

    assert_eq!(sink.events_for("pub1"), vec![value("Googz")]);
    assert_eq!(sink.events_for("pub2"), vec![value("Googz")]);
}

#[test]
fn demo_names_are_kebab_case() {
    assert_eq!(Demo::MultipleSubscribers.to_string(), "multiple-subscribers");
    assert_eq!(Demo::SharedSubscribers.to_string(), "shared-subscribers");
    assert_eq!(Demo::Future.to_string(), "future");
}
