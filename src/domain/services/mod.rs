//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Domain services: the parts of the engine that act on the data model, as opposed to the plain
// data types in `domain::models`.
//--------------------------------------------------------------------------------------------------

pub mod backend;
pub mod matching_engine;
pub mod order_side;
pub mod price_level;
pub mod registry;
pub mod sink;
pub mod stop_book;

pub use backend::{Backend, BackendError, SideDepth};
pub use matching_engine::{MatchingError, OrderBook};
pub use order_side::OrderSide;
pub use price_level::PriceLevel;
pub use registry::{BookHandle, Registry, RegistryError};
pub use sink::{ChannelSink, DoneSink, LoggingSink, LoggingSinkFactory, SinkFactory};
pub use stop_book::StopBook;
