pub mod api;
pub mod config;
pub mod domain;

pub use config::{Config, ConfigError, RemoteDefaults};
pub use domain::models::{
    Decimal, DecimalError, Done, DoneWire, Order, OrderStatus, OrderType, Role, Side,
    TimeInForce, TradeLeg, TradeLegWire,
};
pub use domain::services::{
    Backend, BackendError, BookHandle, ChannelSink, DoneSink, LoggingSink, LoggingSinkFactory,
    MatchingError, OrderBook, OrderSide, PriceLevel, Registry, RegistryError, SideDepth,
    SinkFactory, StopBook,
};
pub use domain::services::backend::remote::RemoteBackendOptions;
