//! Order placement saga constants.

/// The saga type identifier for order placement.
pub const SAGA_TYPE: &str = "order_placement";

/// Step name: take one unit of each requested item out of stock.
pub const STEP_RESERVE_STOCK: &str = "reserve_stock";

/// Step name: read the restaurant and its menu.
pub const STEP_FETCH_RESTAURANT: &str = "fetch_restaurant";

/// Step name: create the order aggregate.
pub const STEP_CREATE_ORDER: &str = "create_order";

/// Step name: put reserved units back.
pub const STEP_RELEASE_STOCK: &str = "release_stock";
