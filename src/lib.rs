//! Bagger
//!
//! Bagger is the computational core of a grocery shopping aid: an EAN-13
//! codec that understands store-internal variable price barcodes, and a
//! bin-packing algorithm that splits a shopping cart into bags whose total
//! price stays under a configurable limit.
//!
//! Everything here is synchronous and side-effect free; persistence and any
//! service surface belong to the caller.

pub mod binning;
pub mod cart;
pub mod catalog;
pub mod ean;
pub mod fixtures;
pub mod prelude;
pub mod receipt;
