//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// `OrderBook`: the core matching state machine (SPEC_FULL.md §4.4-§4.5). One `OrderBook` owns one
// instrument's book: a `Backend` for storage and a `DoneSink` for event emission. Grounded on the
// source's `domain/services/matching_engine/matching_engine.rs` (dispatch by order type/TIF) and
// `domain/services/orderbook/orderbook.rs` (id-indexed lookup, superseded here by the `Backend`
// trait).
//
// Callers are expected to hold the single writer lock this book requires (SPEC_FULL.md §5) before
// calling `process`; `OrderBook` itself does not lock, since the lock lives one layer up, around
// the book as a whole, in the registry.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::{Decimal, Done, Order, OrderStatus, OrderType, Role, Side, TimeInForce, TradeLeg};
use crate::domain::services::backend::{Backend, BackendError, SideDepth};
use crate::domain::services::sink::DoneSink;

use super::MatchingError;

pub struct OrderBook {
    name: String,
    backend: Arc<dyn Backend>,
    sink: Box<dyn DoneSink>,
    last_trade_price: Option<Decimal>,
}

impl OrderBook {
    pub fn new(name: impl Into<String>, backend: Arc<dyn Backend>, sink: Box<dyn DoneSink>) -> Self {
        Self {
            name: name.into(),
            backend,
            sink,
            last_trade_price: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_trade_price(&self) -> Option<Decimal> {
        self.last_trade_price
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<Order>, MatchingError> {
        Ok(self.backend.get_order(id).await?)
    }

    pub async fn get_bids(&self) -> Result<SideDepth, MatchingError> {
        Ok(self.backend.get_bids().await?)
    }

    pub async fn get_asks(&self) -> Result<SideDepth, MatchingError> {
        Ok(self.backend.get_asks().await?)
    }

    /// Validates, dispatches and fully processes one incoming order, returning the done record
    /// that describes everything the call caused: fills, rests, cancellations, and any stop
    /// activations it triggered (SPEC_FULL.md §4.4.2).
    pub async fn process(&mut self, order: Order) -> Result<Done, MatchingError> {
        validate(&order)?;

        if let Err(e) = self.backend.store_order(order.clone()).await {
            return match e {
                BackendError::DuplicateOrder(id) => Err(MatchingError::DuplicateOrderId(id)),
                other => Err(MatchingError::BackendFailure(other)),
            };
        }

        let done = match order.order_type {
            OrderType::Stop | OrderType::StopLimit => self.handle_stop_entry(order).await?,
            OrderType::Limit => self.handle_limit(order).await?,
            OrderType::Market => self.handle_market(order).await?,
        };

        self.sink.send(&self.name, &done).await;
        Ok(done)
    }

    /// Removes a resting or pending order (SPEC_FULL.md §4.4.6). Clears the order's OCO link if
    /// one exists, but does not cascade-cancel the partner: only a fill or a process-triggered
    /// cancellation does that (§4.4.7). Does not touch `last_trade_price`.
    pub async fn cancel(&self, id: Uuid) -> Result<Option<Order>, MatchingError> {
        let removed = self.cancel_internal(id).await?;
        Ok(removed)
    }

    async fn cancel_internal(&self, id: Uuid) -> Result<Option<Order>, MatchingError> {
        let Some(order) = self.backend.get_order(id).await? else {
            return Ok(None);
        };
        let removed = match order.status {
            OrderStatus::Open => {
                self.backend
                    .remove_from_side(order.side, order.price, id)
                    .await?
            }
            OrderStatus::Pending => {
                let stop_price = order.stop_price.unwrap_or(Decimal::ZERO);
                self.backend
                    .remove_from_stop_book(order.side, stop_price, id)
                    .await?
            }
            OrderStatus::Filled | OrderStatus::Canceled => None,
        };
        if removed.is_some() {
            let _ = self.backend.check_oco(id).await?;
        }
        Ok(removed.map(|mut o| {
            o.status = OrderStatus::Canceled;
            o
        }))
    }

    async fn handle_stop_entry(&mut self, mut order: Order) -> Result<Done, MatchingError> {
        order.status = OrderStatus::Pending;
        let leg_price = order.price;
        let original_quantity = order.original_quantity;
        let order_id = order.id;
        let oco_id = order.oco_id;

        self.backend.append_to_stop_book(order).await?;
        if let Some(partner) = oco_id {
            self.backend.link_oco(order_id, partner).await?;
        }

        Ok(Done::pending(order_id, original_quantity, leg_price))
    }

    async fn handle_limit(&mut self, order: Order) -> Result<Done, MatchingError> {
        let mut taker = order;
        let mut done = starting_done(&taker);

        if taker.tif == TimeInForce::FOK {
            let available = self
                .backend
                .cumulative_acceptable(taker.side.opposite(), taker.side, taker.price)
                .await?;
            if available < taker.quantity {
                done.canceled.push(taker.id);
                return Ok(done);
            }
        }

        let mut last_price = None;
        self.match_loop(&mut taker, Some(taker.price), &mut done, &mut last_price)
            .await?;

        done.executed = subtract_floor(done.quantity, taker.quantity);
        done.remaining = taker.quantity;

        if taker.quantity.is_zero() {
            done.stored = false;
            if let Some(partner) = self.backend.check_oco(taker.id).await? {
                self.settle_oco_cancellation(partner, &mut done).await?;
            }
        } else {
            match taker.tif {
                TimeInForce::GTC => {
                    taker.status = OrderStatus::Open;
                    let oco_id = taker.oco_id;
                    let taker_id = taker.id;
                    self.backend.append_to_side(taker).await?;
                    if let Some(partner) = oco_id {
                        self.backend.link_oco(taker_id, partner).await?;
                    }
                    done.stored = true;
                }
                TimeInForce::IOC => {
                    done.stored = false;
                    done.canceled.push(taker.id);
                }
                TimeInForce::FOK => {
                    // Unreachable: the pre-check above guarantees a full fill for FOK.
                    done.stored = false;
                    done.canceled.push(taker.id);
                }
            }
        }

        if let Some(price) = last_price {
            self.last_trade_price = Some(price);
            self.activate_stops(price, &mut done).await?;
        }

        Ok(done)
    }

    async fn handle_market(&mut self, order: Order) -> Result<Done, MatchingError> {
        let mut taker = order;
        let mut done = starting_done(&taker);

        let mut last_price = None;
        self.match_loop(&mut taker, None, &mut done, &mut last_price)
            .await?;

        done.executed = subtract_floor(done.quantity, taker.quantity);
        done.remaining = taker.quantity;
        done.stored = false;

        if taker.quantity.is_zero() {
            if let Some(partner) = self.backend.check_oco(taker.id).await? {
                self.settle_oco_cancellation(partner, &mut done).await?;
            }
        } else {
            // A market order never rests; any unfilled remainder is discarded.
            done.canceled.push(taker.id);
        }

        if let Some(price) = last_price {
            self.last_trade_price = Some(price);
            self.activate_stops(price, &mut done).await?;
        }

        Ok(done)
    }

    /// Matches `taker` against the opposite side, one resting order at a time, until either the
    /// taker is exhausted, the opposite side is empty, or (for a bounded taker) the best opposite
    /// price is no longer acceptable at `limit_price` (SPEC_FULL.md §4.4.4).
    async fn match_loop(
        &self,
        taker: &mut Order,
        limit_price: Option<Decimal>,
        done: &mut Done,
        last_price: &mut Option<Decimal>,
    ) -> Result<(), MatchingError> {
        let opposite = taker.side.opposite();

        loop {
            if taker.quantity.is_zero() {
                break;
            }
            let Some(best) = self.backend.best_price(opposite).await? else {
                break;
            };
            if let Some(limit) = limit_price {
                let acceptable = match taker.side {
                    Side::Buy => best <= limit,
                    Side::Sell => best >= limit,
                };
                if !acceptable {
                    break;
                }
            }
            let Some(maker) = self.backend.head_of_level(opposite, best).await? else {
                break;
            };

            let fill_qty = taker.quantity.min(maker.quantity);
            let fill_price = maker.price;

            done.trades.push(TradeLeg {
                order_id: maker.id,
                role: Role::Maker,
                quantity: fill_qty,
                price: fill_price,
            });

            taker.quantity = taker
                .quantity
                .checked_sub(fill_qty)
                .map_err(|e| MatchingError::Invariant(e.to_string()))?;
            let maker_remaining = maker
                .quantity
                .checked_sub(fill_qty)
                .map_err(|e| MatchingError::Invariant(e.to_string()))?;

            if maker_remaining.is_zero() {
                self.backend
                    .remove_from_side(opposite, best, maker.id)
                    .await?;
            } else {
                self.backend
                    .decrement_head(opposite, best, maker.id, fill_qty)
                    .await?;
            }

            *last_price = Some(fill_price);

            if let Some(partner) = self.backend.check_oco(maker.id).await? {
                self.settle_oco_cancellation(partner, done).await?;
            }
        }
        Ok(())
    }

    /// Cascades a fill- or cancellation-triggered OCO resolution onto `partner_id` (SPEC_FULL.md
    /// §4.4.7): the partner is removed via the same cancel procedure `cancel()` exposes, and its
    /// id is appended to the in-flight done record.
    async fn settle_oco_cancellation(
        &self,
        partner_id: Uuid,
        done: &mut Done,
    ) -> Result<(), MatchingError> {
        if self.cancel_internal(partner_id).await?.is_some() {
            done.canceled.push(partner_id);
        }
        Ok(())
    }

    /// Recursively activates any stop/stop-limit orders triggered by a new last-trade-price
    /// (SPEC_FULL.md §4.5). Activated orders are fed back through the same matching path; any
    /// trades, cancellations, or further activations they cause are appended to the same done
    /// record the top-level `process` call returns.
    async fn activate_stops(
        &mut self,
        last_trade_price: Decimal,
        done: &mut Done,
    ) -> Result<(), MatchingError> {
        let sell_triggered = self.backend.pop_triggered_sell_stops(last_trade_price).await?;
        let buy_triggered = self.backend.pop_triggered_buy_stops(last_trade_price).await?;

        for stop in sell_triggered.into_iter().chain(buy_triggered.into_iter()) {
            done.activated.push(stop.id);
            let activated = stop.into_activated();
            let nested = match activated.order_type {
                OrderType::Limit => self.handle_limit(activated).await?,
                OrderType::Market => self.handle_market(activated).await?,
                OrderType::Stop | OrderType::StopLimit => {
                    return Err(MatchingError::Invariant(
                        "stop activation must resolve to Limit or Market".to_string(),
                    ));
                }
            };
            // nested.trades[0] is the activated order's own synthetic taker leg, already
            // represented by the `activated` entry above; only its maker legs fold into the
            // outer trade sequence.
            done.trades.extend(nested.trades.into_iter().skip(1));
            done.canceled.extend(nested.canceled);
            done.activated.extend(nested.activated);
        }
        Ok(())
    }
}

fn validate(order: &Order) -> Result<(), MatchingError> {
    if !order.quantity.is_positive() {
        return Err(MatchingError::InvalidQuantity);
    }
    if matches!(order.order_type, OrderType::Limit | OrderType::StopLimit) && !order.price.is_positive() {
        return Err(MatchingError::InvalidPrice);
    }
    if order.order_type.is_stop_family() {
        match order.stop_price {
            Some(p) if p.is_positive() => {}
            _ => return Err(MatchingError::InvalidStopPrice),
        }
    }
    Ok(())
}

fn starting_done(taker: &Order) -> Done {
    Done {
        order_id: taker.id,
        quantity: taker.original_quantity,
        executed: Decimal::ZERO,
        remaining: taker.original_quantity,
        stored: false,
        canceled: Vec::new(),
        activated: Vec::new(),
        trades: vec![TradeLeg {
            order_id: taker.id,
            role: Role::Taker,
            quantity: taker.original_quantity,
            price: taker.price,
        }],
    }
}

fn subtract_floor(total: Decimal, remaining: Decimal) -> Decimal {
    total.checked_sub(remaining).unwrap_or(Decimal::ZERO)
}
