//! Shopping carts
//!
//! A cart is an ordered list of line items, each pairing a product EAN with
//! a resolved price and a quantity. Variable price lines carry no quantity:
//! they stand for exactly one weighed unit and are never split.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ean::Ean;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Each product may appear in a cart only once; use `quantity` instead.
    #[error("duplicate product {0} in cart")]
    DuplicateProduct(Ean),

    /// Variable price lines are indivisible and may not carry a quantity.
    #[error("variable price product {0} may not have a quantity")]
    QuantityForVariablePrice(Ean),

    /// Fixed price lines need an explicit quantity.
    #[error("fixed price product {0} is missing a quantity")]
    MissingQuantity(Ean),

    /// Quantities are positive.
    #[error("product {0} has zero quantity")]
    ZeroQuantity(Ean),
}

/// One line of a shopping cart.
///
/// For variable price products the `ean` is the specific priced code scanned
/// off the package, not the catalog form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// The product EAN code.
    pub ean: Ean,

    /// Display name, when known.
    pub name: Option<String>,

    /// Resolved unit price, or `None` until looked up from a catalog.
    pub price: Option<Decimal>,

    /// Unit count for fixed price lines; `None` marks an indivisible
    /// variable price line.
    pub quantity: Option<u32>,
}

impl CartProduct {
    /// Create a new cart line.
    pub fn new(
        ean: Ean,
        name: Option<String>,
        price: Option<Decimal>,
        quantity: Option<u32>,
    ) -> Self {
        Self {
            ean,
            name,
            price,
            quantity,
        }
    }

    /// Whether this line is an indivisible variable price unit.
    pub fn is_variable_price(&self) -> bool {
        self.quantity.is_none()
    }

    /// Units on this line; indivisible lines count as one.
    pub fn unit_count(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Price of the whole line, or `None` while the unit price is unresolved.
    pub fn total_price(&self) -> Option<Decimal> {
        let price = self.price?;

        Some(price * Decimal::from(self.unit_count()))
    }
}

/// A validated shopping cart.
///
/// Construction enforces that every product appears at most once and that a
/// quantity is present exactly when the product is fixed price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    products: Vec<CartProduct>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a product appears twice, a variable price
    /// line carries a quantity, or a fixed price line lacks a positive one.
    pub fn with_products(products: impl Into<Vec<CartProduct>>) -> Result<Self, CartError> {
        let products = products.into();

        let mut seen = FxHashSet::default();
        for product in &products {
            if !seen.insert(product.ean) {
                return Err(CartError::DuplicateProduct(product.ean));
            }
            match (product.ean.is_variable_price(), product.quantity) {
                (true, Some(_)) => {
                    return Err(CartError::QuantityForVariablePrice(product.ean));
                }
                (false, None) => return Err(CartError::MissingQuantity(product.ean)),
                (false, Some(0)) => return Err(CartError::ZeroQuantity(product.ean)),
                _ => {}
            }
        }

        Ok(Cart { products })
    }

    /// The cart lines in insertion order.
    pub fn products(&self) -> &[CartProduct] {
        &self.products
    }

    /// The number of lines in the cart.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total price of the cart, or `None` while any line is unresolved.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.products
            .iter()
            .try_fold(Decimal::ZERO, |acc, product| Some(acc + product.total_price()?))
    }
}

impl TryFrom<Vec<CartProduct>> for Cart {
    type Error = CartError;

    fn try_from(products: Vec<CartProduct>) -> Result<Self, Self::Error> {
        Cart::with_products(products)
    }
}

impl<'de> serde::Deserialize<'de> for Cart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let products = Vec::<CartProduct>::deserialize(deserializer)?;
        Cart::with_products(products).map_err(serde::de::Error::custom)
    }
}
