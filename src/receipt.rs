//! Bagging summaries
//!
//! Console rendering for the output of [`crate::binning::bin_pack`]: one
//! table section per bag with its lines and subtotal, followed by the grand
//! total for the whole cart.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{cart::CartProduct, ean::Ean};

/// Errors that can occur when building or writing a bagging summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Every line must have a resolved price before summarising.
    #[error("cart line {ean} has no resolved price")]
    UnresolvedPrice {
        /// The EAN of the unresolved line.
        ean: Ean,
    },

    /// IO error writing the summary.
    #[error("failed to write summary")]
    Io(#[from] io::Error),
}

/// Summary of a packed cart: per-bag totals and a renderable table.
#[derive(Debug)]
pub struct BaggingSummary<'a> {
    bins: &'a [Vec<CartProduct>],
    bag_totals: Vec<Decimal>,
    total: Decimal,
}

impl<'a> BaggingSummary<'a> {
    /// Summarize packed bags, computing the total price of each.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::UnresolvedPrice`] if any line has no price;
    /// carts are resolved before packing, so this indicates a caller bug.
    pub fn new(bins: &'a [Vec<CartProduct>]) -> Result<Self, SummaryError> {
        let mut bag_totals = Vec::with_capacity(bins.len());

        for bin in bins {
            let mut bag_total = Decimal::ZERO;
            for line in bin {
                bag_total += line
                    .total_price()
                    .ok_or(SummaryError::UnresolvedPrice { ean: line.ean })?;
            }
            bag_totals.push(bag_total);
        }

        let total = bag_totals.iter().copied().sum();

        Ok(BaggingSummary {
            bins,
            bag_totals,
            total,
        })
    }

    /// Total price of each bag, in bag order.
    pub fn bag_totals(&self) -> &[Decimal] {
        &self.bag_totals
    }

    /// Total price of the whole cart.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Render the summary table.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Bag", "Item", "EAN", "Qty", "Unit price", "Line total"]);

        for (index, (bin, bag_total)) in self.bins.iter().zip(&self.bag_totals).enumerate() {
            for (row, line) in bin.iter().enumerate() {
                builder.push_record(line_record(index, row, line));
            }

            builder.push_record([
                String::new(),
                format!("Bag {} subtotal", index + 1),
                String::new(),
                String::new(),
                String::new(),
                eur(*bag_total).to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, "Total: {}", eur(self.total))?;

        Ok(())
    }
}

/// Build one table row for a cart line.
fn line_record(bag_index: usize, row: usize, line: &CartProduct) -> [String; 6] {
    let bag_label = if row == 0 {
        format!("#{}", bag_index + 1)
    } else {
        String::new()
    };

    let name = line
        .name
        .clone()
        .unwrap_or_else(|| line.ean.to_string());

    // Variable price lines have no quantity column; they are one weighed unit.
    let quantity = line.quantity.map_or_else(String::new, |q| q.to_string());

    let unit_price = line
        .price
        .map_or_else(String::new, |price| eur(price).to_string());
    let line_total = line
        .total_price()
        .map_or_else(String::new, |total| eur(total).to_string());

    [
        bag_label,
        name,
        line.ean.to_string(),
        quantity,
        unit_price,
        line_total,
    ]
}

/// Prices are displayed as euros; the service this engine grew out of is a
/// Finnish grocery aid and the cart model carries no currency of its own.
fn eur(amount: Decimal) -> Money<'static, iso::Currency> {
    Money::from_decimal(amount, iso::EUR)
}
