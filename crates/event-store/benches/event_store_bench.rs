use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use event_store::{
    EventBus, EventEnvelope, EventStore, InMemoryEventBus, InMemoryEventStore, Version,
};

fn stock_event(item_id: AggregateId, version: i64) -> EventEnvelope {
    EventEnvelope::builder()
        .category("stock")
        .event_type("increased")
        .aggregate_id(item_id)
        .version(Version::new(version))
        .payload_raw(serde_json::json!({
            "type": "increased",
            "data": { "item_id": item_id.to_string(), "n": 1 }
        }))
        .build()
}

fn bench_append_first_event(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("event_store/append_first_event", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryEventStore::new();
                let item_id = AggregateId::new();
                store
                    .append("stock", item_id, vec![stock_event(item_id, 1)], Version::initial())
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_append_batch_10(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("event_store/append_batch_10", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryEventStore::new();
                let item_id = AggregateId::new();
                let events: Vec<EventEnvelope> =
                    (1..=10).map(|v| stock_event(item_id, v)).collect();
                store
                    .append("stock", item_id, events, Version::initial())
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_load_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    let item_id = AggregateId::new();

    rt.block_on(async {
        let events: Vec<EventEnvelope> = (1..=100).map(|v| stock_event(item_id, v)).collect();
        store
            .append("stock", item_id, events, Version::initial())
            .await
            .unwrap();
    });

    c.bench_function("event_store/load_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.load("stock", item_id).await.unwrap();
            });
        });
    });
}

fn bench_read_all_10_records(c: &mut Criterion) {
    use futures_util::StreamExt;

    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();

    rt.block_on(async {
        for _ in 0..10 {
            let item_id = AggregateId::new();
            let events: Vec<EventEnvelope> =
                (1..=100).map(|v| stock_event(item_id, v)).collect();
            store
                .append("stock", item_id, events, Version::initial())
                .await
                .unwrap();
        }
    });

    c.bench_function("event_store/read_all_10_records", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut records = store.read_all("stock").await.unwrap();
                let mut count = 0;
                while let Some(record) = records.next().await {
                    count += record.unwrap().events.len();
                }
                assert_eq!(count, 1000);
            });
        });
    });
}

fn bench_publish_to_subscriber(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let bus = InMemoryEventBus::new();
    let mut subscription = rt.block_on(async { bus.subscribe("stock.increased").await.unwrap() });
    let event = stock_event(AggregateId::new(), 1);

    c.bench_function("event_store/publish_and_receive", |b| {
        b.iter(|| {
            rt.block_on(async {
                bus.publish(&event).await.unwrap();
                subscription.recv().await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_append_first_event,
    bench_append_batch_10,
    bench_load_100,
    bench_read_all_10_records,
    bench_publish_to_subscriber,
);
criterion_main!(benches);
