//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A price-indexed collection of PriceLevels for one side of a book. Exposes best-price lookup,
// level iteration in priority order, and level-aware insert/remove (SPEC_FULL.md §4.2).
//
// Bid sides iterate from highest price to lowest; Ask sides from lowest to highest. A cached
// best-price pointer avoids recomputing from the BTreeMap on every read, refreshed only when the
// removed price was the cached best -- mirrors the source's `update_best_bid`/`update_best_ask`
// split.
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::models::{Decimal, Order, Side};

use super::price_level::PriceLevel;

#[derive(Debug, Clone)]
pub struct OrderSide {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
    best: Option<Decimal>,
}

impl OrderSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            best: None,
        }
    }

    #[inline]
    fn is_better(&self, candidate: Decimal, current_best: Decimal) -> bool {
        match self.side {
            Side::Buy => candidate > current_best,
            Side::Sell => candidate < current_best,
        }
    }

    pub fn append(&mut self, order: Order) {
        let price = order.price;
        self.levels.entry(price).or_insert_with(PriceLevel::new).append(order);
        self.best = Some(match self.best {
            Some(current) if !self.is_better(price, current) => current,
            _ => price,
        });
    }

    /// Removes a specific order by id at the given price. Drops the level if it becomes empty,
    /// and refreshes the cached best price if the removed level was it.
    pub fn remove(&mut self, price: Decimal, order_id: Uuid) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
            if self.best == Some(price) {
                self.recompute_best();
            }
        }
        removed
    }

    fn recompute_best(&mut self) {
        self.best = match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        };
    }

    pub fn best_price(&self) -> Option<Decimal> {
        self.best
    }

    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.best.and_then(|p| self.levels.get(&p))
    }

    pub fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        let best = self.best?;
        self.levels.get_mut(&best)
    }

    /// Drops the best level entirely if it is empty, and refreshes the cached best.
    pub fn drop_best_if_empty(&mut self) {
        if let Some(best) = self.best {
            if self.levels.get(&best).is_none_or(PriceLevel::is_empty) {
                self.levels.remove(&best);
                self.recompute_best();
            }
        }
    }

    /// Levels from best to worst.
    pub fn levels_in_priority(&self) -> Box<dyn Iterator<Item = (&Decimal, &PriceLevel)> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.iter().rev()),
            Side::Sell => Box::new(self.levels.iter()),
        }
    }

    pub fn depth(&self) -> Vec<(Decimal, Decimal, usize)> {
        self.levels_in_priority()
            .map(|(price, level)| (*price, level.total_quantity(), level.len()))
            .collect()
    }

    pub fn total_at(&self, price: Decimal) -> Decimal {
        self.levels
            .get(&price)
            .map(PriceLevel::total_quantity)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Cumulative quantity available at prices acceptable to a buy at limit `price`
    /// (this side is the ask side: price <= limit) or a sell at limit `price`
    /// (this side is the bid side: price >= limit). Used for the FOK pre-check.
    pub fn cumulative_acceptable(&self, taker_side: Side, limit_price: Decimal) -> Decimal {
        self.levels
            .iter()
            .filter(|(&price, _)| match taker_side {
                Side::Buy => price <= limit_price,
                Side::Sell => price >= limit_price,
            })
            .fold(Decimal::ZERO, |acc, (_, level)| {
                acc.checked_add(level.total_quantity()).unwrap_or(acc)
            })
    }

    /// Cumulative quantity available across the entire side, with no price acceptance check
    /// (used by the market order path's FOK-equivalent sizing, if ever needed by an adapter).
    pub fn cumulative_total(&self) -> Decimal {
        self.levels
            .values()
            .fold(Decimal::ZERO, |acc, level| {
                acc.checked_add(level.total_quantity()).unwrap_or(acc)
            })
    }
}
