//! Bagger prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    binning::{BinPackError, bin_pack, default_bin_limit},
    cart::{Cart, CartError, CartProduct},
    catalog::{Catalog, CartProductDraft, Product, ResolveError, RetailChain, Store, resolve_cart},
    ean::{Ean, EanError, check_digit},
    fixtures::{CatalogFixture, FixtureError},
    receipt::{BaggingSummary, SummaryError},
};
