//! Order placement saga: reserve stock, look up the menu, create the order.

use std::future::Future;
use std::time::Duration;

use common::AggregateId;
use domain::{
    CreateOrder, MenuItem, Order, OrderService, Restaurant, RestaurantQuery, RestaurantSnapshot,
};
use event_store::{EventBus, EventStore};
use tokio::time::Instant;

use crate::error::{Result, SagaError};
use crate::order_placement;
use crate::services::StockLedger;
use crate::state::SagaState;

/// Request to place an order for one unit of each listed item.
///
/// Listing an item twice orders (and reserves) it twice.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub restaurant_id: AggregateId,
    pub item_ids: Vec<AggregateId>,
}

impl PlaceOrder {
    pub fn new(restaurant_id: AggregateId, item_ids: Vec<AggregateId>) -> Self {
        Self {
            restaurant_id,
            item_ids,
        }
    }
}

/// Progress of one saga execution.
#[derive(Debug, Default)]
struct SagaRun {
    state: SagaState,
    reserved: Vec<AggregateId>,
}

impl SagaRun {
    fn transition(&mut self, next: SagaState) {
        debug_assert!(self.state.can_transition_to(next), "{} -> {}", self.state, next);
        tracing::debug!(from = %self.state, to = %next, "saga state changed");
        self.state = next;
    }
}

/// Places orders across the stock, restaurant and order aggregates.
///
/// Stock is reserved one unit at a time and the first refusal stops the
/// saga. Any failure after a reservation releases everything reserved so far
/// with compensating increases, which land in the stock log as new events.
/// The saga keeps no durable state of its own; a crash mid-run leaves the
/// reserved units reserved.
pub struct OrderSaga<L, Q, S, B>
where
    L: StockLedger,
    Q: RestaurantQuery,
    S: EventStore,
    B: EventBus,
{
    ledger: L,
    restaurants: Q,
    orders: OrderService<S, B>,
    deadline: Option<Duration>,
}

impl<L, Q, S, B> OrderSaga<L, Q, S, B>
where
    L: StockLedger,
    Q: RestaurantQuery,
    S: EventStore,
    B: EventBus,
{
    pub fn new(ledger: L, restaurants: Q, orders: OrderService<S, B>) -> Self {
        Self {
            ledger,
            restaurants,
            orders,
            deadline: None,
        }
    }

    /// Bounds every forward step by `timeout`, measured from the start of
    /// [`place_order`](Self::place_order). Compensation is not bounded.
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some(timeout);
        self
    }

    pub fn orders(&self) -> &OrderService<S, B> {
        &self.orders
    }

    #[tracing::instrument(skip(self), fields(saga_type = order_placement::SAGA_TYPE))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order> {
        metrics::counter!("saga_executions_total").increment(1);
        let started = Instant::now();
        let deadline = self.deadline.map(|timeout| started + timeout);

        let mut run = SagaRun::default();
        let outcome = self.run_forward(&cmd, deadline, &mut run).await;

        let result = match outcome {
            Ok(order) => {
                run.transition(SagaState::Done);
                tracing::info!(
                    order_id = ?domain::Aggregate::id(&order),
                    items = cmd.item_ids.len(),
                    "order placed"
                );
                Ok(order)
            }
            Err(err) => {
                tracing::warn!(error = %err, state = %run.state, "order placement failed");
                if !run.reserved.is_empty() {
                    run.transition(SagaState::Compensating);
                }
                match self.compensate(&run.reserved).await {
                    Ok(()) => {
                        run.transition(SagaState::Failed);
                        Err(err)
                    }
                    Err(compensation) => Err(compensation),
                }
            }
        };

        metrics::histogram!("saga_duration_seconds").record(started.elapsed().as_secs_f64());
        result
    }

    async fn run_forward(
        &self,
        cmd: &PlaceOrder,
        deadline: Option<Instant>,
        run: &mut SagaRun,
    ) -> Result<Order> {
        if cmd.item_ids.is_empty() {
            return Err(SagaError::NoItems);
        }

        for &item_id in &cmd.item_ids {
            bounded(deadline, order_placement::STEP_RESERVE_STOCK, async {
                self.ledger
                    .decrease(item_id, 1)
                    .await
                    .map_err(|source| SagaError::StepFailed {
                        step: order_placement::STEP_RESERVE_STOCK,
                        source,
                    })
            })
            .await?;
            run.reserved.push(item_id);
        }

        run.transition(SagaState::Fetching);
        let restaurant = bounded(deadline, order_placement::STEP_FETCH_RESTAURANT, async {
            self.restaurants
                .find_restaurant(cmd.restaurant_id)
                .await
                .map_err(|source| SagaError::StepFailed {
                    step: order_placement::STEP_FETCH_RESTAURANT,
                    source,
                })
        })
        .await?
        .ok_or(SagaError::RestaurantNotFound(cmd.restaurant_id))?;
        let items = resolve_items(&restaurant, cmd)?;

        run.transition(SagaState::Creating);
        let snapshot = RestaurantSnapshot {
            id: cmd.restaurant_id,
            name: restaurant.name().to_string(),
        };
        let created = bounded(deadline, order_placement::STEP_CREATE_ORDER, async {
            self.orders
                .create_order(CreateOrder::new(snapshot, items))
                .await
                .map_err(|source| SagaError::StepFailed {
                    step: order_placement::STEP_CREATE_ORDER,
                    source,
                })
        })
        .await?;

        if let Some(err) = &created.publish_error {
            // The order is in the log; projections pick it up on replay.
            tracing::warn!(error = %err, "order created but not published");
        }
        Ok(created.aggregate)
    }

    /// Puts back one unit for every reserved item, newest first.
    ///
    /// Every release is attempted even after one fails; the ones that failed
    /// are reported together.
    #[tracing::instrument(skip(self))]
    async fn compensate(&self, reserved: &[AggregateId]) -> Result<()> {
        if reserved.is_empty() {
            return Ok(());
        }
        metrics::counter!("saga_compensations_total").increment(1);

        let mut unreleased = Vec::new();
        let mut reason = None;
        for &item_id in reserved.iter().rev() {
            if let Err(err) = self.ledger.increase(item_id, 1).await {
                reason.get_or_insert_with(|| err.to_string());
                unreleased.push(item_id);
            }
        }

        let Some(reason) = reason else {
            tracing::info!(released = reserved.len(), "reserved stock released");
            return Ok(());
        };

        metrics::counter!("saga_compensation_failures_total").increment(1);
        tracing::error!(
            step = order_placement::STEP_RELEASE_STOCK,
            unreleased = ?unreleased,
            %reason,
            "COMPENSATION FAILED: stock left reserved, operator action required"
        );
        Err(SagaError::CompensationFailed { unreleased, reason })
    }
}

/// Runs a forward step, failing with `DeadlineExceeded` once `deadline` passes.
async fn bounded<T, F>(deadline: Option<Instant>, step: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(at) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| SagaError::DeadlineExceeded { step })?,
        None => fut.await,
    }
}

/// Copies every requested item off the current menu, in request order.
fn resolve_items(restaurant: &Restaurant, cmd: &PlaceOrder) -> Result<Vec<MenuItem>> {
    cmd.item_ids
        .iter()
        .map(|&item_id| {
            restaurant
                .find_item(item_id)
                .cloned()
                .ok_or(SagaError::ItemNotOnMenu {
                    restaurant_id: cmd.restaurant_id,
                    item_id,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ErrorKind;
    use domain::{
        Aggregate, CreateMenuCategory, CreateMenuItem, CreateRestaurant, IncreaseStock,
        OrderStatus, RestaurantService, StockService,
    };
    use event_store::{InMemoryEventBus, InMemoryEventStore};
    use std::sync::Arc;

    type Store = InMemoryEventStore;
    type Bus = InMemoryEventBus;

    struct Fixture {
        saga: OrderSaga<
            Arc<StockService<Store, Bus>>,
            Arc<RestaurantService<Store, Bus>>,
            Store,
            Bus,
        >,
        stock: Arc<StockService<Store, Bus>>,
        restaurant_id: AggregateId,
        item_ids: Vec<AggregateId>,
    }

    async fn fixture(menu: &[&str]) -> Fixture {
        let store = InMemoryEventStore::new();
        let bus = InMemoryEventBus::new();
        let restaurants = Arc::new(RestaurantService::new(store.clone(), bus.clone()));
        let stock = Arc::new(StockService::new(store.clone(), bus.clone()));

        let restaurant_id = restaurants
            .create_restaurant(CreateRestaurant::new("Pizza Place"))
            .await
            .unwrap()
            .aggregate
            .id()
            .unwrap();
        let category_id = restaurants
            .create_menu_category(CreateMenuCategory::new(restaurant_id, "Pizza"))
            .await
            .unwrap()
            .aggregate
            .categories()[0]
            .id;
        let mut item_ids = Vec::new();
        for name in menu {
            let restaurant = restaurants
                .create_menu_item(CreateMenuItem::new(restaurant_id, category_id, *name, ""))
                .await
                .unwrap()
                .aggregate;
            item_ids.push(restaurant.categories()[0].items.last().unwrap().id);
        }

        let saga = OrderSaga::new(
            Arc::clone(&stock),
            Arc::clone(&restaurants),
            OrderService::new(store, bus),
        );
        Fixture {
            saga,
            stock,
            restaurant_id,
            item_ids,
        }
    }

    async fn quantity(stock: &StockService<Store, Bus>, item_id: AggregateId) -> i64 {
        stock.get_stock(item_id).await.unwrap().quantity()
    }

    #[tokio::test]
    async fn test_happy_path() {
        let f = fixture(&["Margherita", "Marinara"]).await;
        for &item_id in &f.item_ids {
            f.stock
                .increase_stock(IncreaseStock::new(item_id, 2))
                .await
                .unwrap();
        }

        let order = f
            .saga
            .place_order(PlaceOrder::new(f.restaurant_id, f.item_ids.clone()))
            .await
            .unwrap();

        assert_eq!(order.status(), OrderStatus::Received);
        assert_eq!(order.restaurant().unwrap().name, "Pizza Place");
        let names: Vec<_> = order.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Margherita", "Marinara"]);
        for &item_id in &f.item_ids {
            assert_eq!(quantity(&f.stock, item_id).await, 1);
        }
        let stored = f.saga.orders().get_order(order.id().unwrap()).await.unwrap();
        assert_eq!(stored.as_ref(), Some(&order));
    }

    #[tokio::test]
    async fn test_out_of_stock_item_stops_reserving() {
        let f = fixture(&["A", "B", "C"]).await;
        let (a, b, c) = (f.item_ids[0], f.item_ids[1], f.item_ids[2]);
        f.stock.increase_stock(IncreaseStock::new(a, 1)).await.unwrap();
        f.stock.increase_stock(IncreaseStock::new(c, 1)).await.unwrap();

        let err = f
            .saga
            .place_order(PlaceOrder::new(f.restaurant_id, vec![a, b, c]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SagaError::StepFailed {
                step: order_placement::STEP_RESERVE_STOCK,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(quantity(&f.stock, a).await, 1);
        assert_eq!(quantity(&f.stock, c).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_releases_stock() {
        let f = fixture(&["A"]).await;
        let a = f.item_ids[0];
        f.stock.increase_stock(IncreaseStock::new(a, 1)).await.unwrap();

        let missing = AggregateId::new();
        let err = f
            .saga
            .place_order(PlaceOrder::new(missing, vec![a]))
            .await
            .unwrap_err();

        assert!(matches!(err, SagaError::RestaurantNotFound(id) if id == missing));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(quantity(&f.stock, a).await, 1);
    }

    #[tokio::test]
    async fn test_item_off_the_menu_releases_stock() {
        let f = fixture(&["A"]).await;
        let a = f.item_ids[0];
        let stranger = AggregateId::new();
        f.stock.increase_stock(IncreaseStock::new(a, 1)).await.unwrap();
        f.stock
            .increase_stock(IncreaseStock::new(stranger, 1))
            .await
            .unwrap();

        let err = f
            .saga
            .place_order(PlaceOrder::new(f.restaurant_id, vec![a, stranger]))
            .await
            .unwrap_err();

        assert!(matches!(err, SagaError::ItemNotOnMenu { item_id, .. } if item_id == stranger));
        assert_eq!(quantity(&f.stock, a).await, 1);
        assert_eq!(quantity(&f.stock, stranger).await, 1);
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let f = fixture(&[]).await;
        let err = f
            .saga
            .place_order(PlaceOrder::new(f.restaurant_id, vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, SagaError::NoItems));
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_run_transitions() {
        let mut run = SagaRun::default();
        run.transition(SagaState::Fetching);
        run.transition(SagaState::Compensating);
        run.transition(SagaState::Failed);
        assert!(run.state.is_terminal());
    }
}
