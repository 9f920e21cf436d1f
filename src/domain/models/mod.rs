pub mod decimal;
pub mod done;
pub mod order;

pub use decimal::{Decimal, DecimalError};
pub use done::{Done, DoneWire, Role, TradeLeg, TradeLegWire};
pub use order::{Order, OrderStatus, OrderType, Side, TimeInForce};
