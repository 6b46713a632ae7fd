//! Cart bin packing
//!
//! Splits a shopping cart into bins (grocery bags, payment batches) whose
//! total price stays under a caller-supplied limit. The packing is a greedy
//! descending-price heuristic: each bin is filled by repeatedly scanning the
//! remaining lines for the most expensive one that still fits, splitting
//! divisible lines across bins where needed. Lines too expensive to ever fit
//! are collected into a trailing overflow bin instead of failing.

use std::mem;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{cart::CartProduct, ean::Ean};

/// Errors related to bin packing preconditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BinPackError {
    /// Every line must have a resolved price before packing.
    #[error("cart line {ean} has no resolved price")]
    UnresolvedPrice {
        /// The EAN of the unresolved line.
        ean: Ean,
    },
}

/// A cart line together with its resolved unit price.
struct PooledLine {
    product: CartProduct,
    price: Decimal,
}

/// The default per-bin price ceiling.
pub fn default_bin_limit() -> Decimal {
    Decimal::TEN
}

/// Partition `cart` into bins whose total price stays at or under `limit`.
///
/// Lines whose unit price alone exceeds `limit` can never be placed; they
/// are returned as a final overflow bin rather than rejected. Every other
/// bin respects the limit. Quantities are conserved exactly: a divisible
/// line may be split into several lines with smaller quantities, while
/// variable price lines move as a whole.
///
/// Bins are filled greedily in descending price order; equal-priced lines
/// keep their input order, so the output is deterministic for a given cart.
/// A negative `limit` behaves like zero.
///
/// # Errors
///
/// Returns [`BinPackError::UnresolvedPrice`] if any line lacks a price.
pub fn bin_pack(
    cart: &[CartProduct],
    limit: Decimal,
) -> Result<Vec<Vec<CartProduct>>, BinPackError> {
    let limit = limit.max(Decimal::ZERO);

    let mut pool: SmallVec<[PooledLine; 8]> = cart
        .iter()
        .map(|product| match product.price {
            Some(price) => Ok(PooledLine {
                product: product.clone(),
                price,
            }),
            None => Err(BinPackError::UnresolvedPrice { ean: product.ean }),
        })
        .collect::<Result<_, _>>()?;

    // Stable sort: ties between equal prices keep their cart order.
    pool.sort_by(|a, b| b.price.cmp(&a.price));

    // A single unit of these lines already exceeds the limit, so no bin can
    // ever hold them; they form the trailing overflow bin.
    let oversized = pool.partition_point(|line| line.price > limit);
    let overflow_bin: Vec<CartProduct> = pool
        .drain(..oversized)
        .map(|line| line.product)
        .collect();

    let mut bins = Vec::new();
    let mut current_bin = Vec::new();
    let mut budget = limit;

    while !pool.is_empty() {
        if let Some(placed) = fit_next(&mut pool, &mut budget) {
            current_bin.push(placed);
        } else {
            // Every pooled price is within the limit, so a fresh bin always
            // accepts at least one line.
            debug_assert!(!current_bin.is_empty(), "closing an empty bin");
            if !current_bin.is_empty() {
                bins.push(mem::take(&mut current_bin));
            }
            budget = limit;
        }
    }

    if !current_bin.is_empty() {
        bins.push(current_bin);
    }
    if !overflow_bin.is_empty() {
        bins.push(overflow_bin);
    }

    Ok(bins)
}

/// Place the most expensive line (or line fragment) fitting the remaining
/// budget, reducing the budget by what was placed.
///
/// Returns `None` when nothing in the pool fits, which closes the bin.
fn fit_next(pool: &mut SmallVec<[PooledLine; 8]>, budget: &mut Decimal) -> Option<CartProduct> {
    let index = pool.iter().position(|line| line.price <= *budget)?;
    let price = pool.get(index)?.price;

    match pool.get(index)?.product.quantity {
        // Indivisible lines are placed whole or not at all.
        None => {
            let line = pool.remove(index);
            *budget -= price;
            Some(line.product)
        }
        Some(quantity) => {
            let fitting = units_fitting(price, quantity, *budget);
            *budget -= price * Decimal::from(fitting);

            if fitting == quantity {
                let line = pool.remove(index);
                Some(line.product)
            } else {
                // Split: the fitted units go in the bin, the rest stays in
                // the pool at the same sorted position.
                let line = pool.get_mut(index)?;
                line.product.quantity = Some(quantity - fitting);
                let mut placed = line.product.clone();
                placed.quantity = Some(fitting);
                Some(placed)
            }
        }
    }
}

/// Whole units of a divisible line fitting in the remaining budget.
///
/// Free items always fit. The caller guarantees `price <= budget`, so the
/// result is at least one.
fn units_fitting(price: Decimal, quantity: u32, budget: Decimal) -> u32 {
    if price.is_zero() {
        return quantity;
    }

    (budget / price)
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX)
        .min(quantity)
}
