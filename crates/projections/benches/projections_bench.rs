use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{DomainEvent, StockEvent};
use event_store::{EventEnvelope, EventStore, InMemoryEventBus, InMemoryEventStore, Version};
use projections::{Projection, ProjectionProcessor, StockView};

fn stock_envelope(item_id: AggregateId, version: i64, event: &StockEvent) -> EventEnvelope {
    EventEnvelope::builder()
        .category("stock")
        .aggregate_id(item_id)
        .event_type(event.event_type())
        .version(Version::new(version))
        .payload(event)
        .unwrap()
        .build()
}

/// Populates `n` stock items with 3 events each.
async fn populate_store(store: &InMemoryEventStore, n: usize) {
    for _ in 0..n {
        let item_id = AggregateId::new();
        let events = vec![
            stock_envelope(item_id, 1, &StockEvent::increased(item_id, 10)),
            stock_envelope(item_id, 2, &StockEvent::decreased(item_id, 1)),
            stock_envelope(item_id, 3, &StockEvent::decreased(item_id, 1)),
        ];
        store
            .append("stock", item_id, events, Version::initial())
            .await
            .unwrap();
    }
}

fn bench_bootstrap(c: &mut Criterion, n: usize) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    rt.block_on(populate_store(&store, n));

    c.bench_function(&format!("projections/bootstrap_{}_events", n * 3), |b| {
        b.iter(|| {
            rt.block_on(async {
                let view = StockView::new();
                let mut processor =
                    ProjectionProcessor::new(store.clone(), InMemoryEventBus::new());
                processor.register(view.projection());
                processor.bootstrap().await.unwrap();
            });
        });
    });
}

fn bench_bootstrap_300(c: &mut Criterion) {
    bench_bootstrap(c, 100);
}

fn bench_bootstrap_3000(c: &mut Criterion) {
    bench_bootstrap(c, 1000);
}

fn bench_live_apply(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("projections/live_apply_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let view = StockView::new();
                let projection = view.projection();
                let item_id = AggregateId::new();
                for v in 1..=100 {
                    let event = stock_envelope(item_id, v, &StockEvent::increased(item_id, 1));
                    projection.handle(&event).await.unwrap();
                }
            });
        });
    });
}

fn bench_duplicate_delivery(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let view = StockView::new();
    let projection = view.projection();
    let item_id = AggregateId::new();
    let event = stock_envelope(item_id, 1, &StockEvent::increased(item_id, 1));
    rt.block_on(projection.handle(&event)).unwrap();

    c.bench_function("projections/duplicate_delivery", |b| {
        b.iter(|| {
            rt.block_on(projection.handle(&event)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_bootstrap_300,
    bench_bootstrap_3000,
    bench_live_apply,
    bench_duplicate_delivery,
);
criterion_main!(benches);
