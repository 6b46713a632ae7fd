//! Stores and product catalogs
//!
//! Stores belong to retail chains and carry their own products: the same
//! EAN may be sold in several stores under different names or prices, so
//! there is no store-independent product model. All ids are deterministic
//! uuid5 values derived from an application root namespace, the chain, the
//! store's external id and the product EAN.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError, CartProduct},
    ean::Ean,
};

/// Errors related to resolving cart drafts against a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A draft referenced a product the store does not carry.
    #[error("unknown product {0}")]
    UnknownProduct(Ean),

    /// Wrapped cart validation error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Identifies a grocery store chain.
///
/// Each chain is assumed to have its own way of listing stores and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetailChain {
    /// Generated fixture data for testing and development.
    Faker,

    /// The S-Group grocery chain.
    Sok,
}

impl RetailChain {
    /// Stable name used in the uuid namespace hierarchy.
    pub fn as_str(self) -> &'static str {
        match self {
            RetailChain::Faker => "faker",
            RetailChain::Sok => "sok",
        }
    }

    /// The chain's uuid namespace under the application root namespace.
    pub fn namespace(self, root: &Uuid) -> Uuid {
        Uuid::new_v5(root, self.as_str().as_bytes())
    }
}

/// A grocery store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Deterministic store id.
    pub id: Uuid,

    /// The chain this store belongs to.
    pub chain: RetailChain,

    /// The chain's own identifier for the store.
    pub external_id: String,

    /// Display name.
    pub name: String,
}

impl Store {
    /// Create a store, deriving its id from the root namespace, the chain
    /// and the chain's external id.
    pub fn new(
        root: &Uuid,
        chain: RetailChain,
        external_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let external_id = external_id.into();
        let id = Uuid::new_v5(&chain.namespace(root), external_id.as_bytes());

        Store {
            id,
            chain,
            external_id,
            name: name.into(),
        }
    }
}

/// A single product within a given store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Deterministic product id.
    pub id: Uuid,

    /// The store this product is sold in.
    pub store_id: Uuid,

    /// The catalog form EAN code.
    pub ean: Ean,

    /// Display name.
    pub name: String,

    /// Price per unit.
    pub price: Decimal,
}

impl Product {
    /// Create a product, deriving its id from the store id and the EAN.
    pub fn new(store_id: Uuid, ean: Ean, name: impl Into<String>, price: Decimal) -> Self {
        Product {
            id: product_id(store_id, ean),
            store_id,
            ean,
            name: name.into(),
            price,
        }
    }
}

/// Derive the deterministic id of a product within a store.
pub fn product_id(store_id: Uuid, ean: Ean) -> Uuid {
    Uuid::new_v5(&store_id, ean.to_string().as_bytes())
}

/// In-memory product lookup keyed by store and catalog EAN.
///
/// Stands in for whatever product storage the surrounding service uses; the
/// cart resolution below only needs lookup by `(store, ean)`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<(Uuid, Ean), Product>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Insert a product, replacing any previous entry for the same
    /// store and EAN.
    pub fn insert(&mut self, product: Product) {
        self.products
            .insert((product.store_id, product.ean), product);
    }

    /// Look up a product by store and catalog EAN.
    ///
    /// The EAN must be in catalog form; use [`Ean::for_query`] on scanned
    /// variable price codes first.
    pub fn get(&self, store_id: Uuid, ean: Ean) -> Option<&Product> {
        self.products.get(&(store_id, ean))
    }

    /// The number of products across all stores.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// One requested cart line: a product named by EAN, plus a quantity for
/// fixed price products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProductDraft {
    /// The scanned or entered EAN code.
    pub ean: Ean,

    /// Requested unit count; must be absent for variable price codes.
    pub quantity: Option<u32>,
}

/// Resolve requested cart lines against a store's catalog.
///
/// Fixed price lines take their name and unit price from the catalog.
/// Variable price lines are looked up by the query form of their code and
/// take the price embedded in the scanned code itself, with the catalog
/// contributing only the name.
///
/// # Errors
///
/// - [`ResolveError::UnknownProduct`] if the store does not carry a product.
/// - [`ResolveError::Cart`] if the resolved lines do not form a valid cart
///   (duplicates, quantity on a variable price line, missing quantity).
pub fn resolve_cart(
    catalog: &Catalog,
    store_id: Uuid,
    drafts: &[CartProductDraft],
) -> Result<Cart, ResolveError> {
    let mut products = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let query_ean = draft.ean.for_query();
        let known = catalog
            .get(store_id, query_ean)
            .ok_or(ResolveError::UnknownProduct(query_ean))?;

        let price = draft.ean.price().unwrap_or(known.price);
        products.push(CartProduct::new(
            draft.ean,
            Some(known.name.clone()),
            Some(price),
            draft.quantity,
        ));
    }

    Ok(Cart::with_products(products)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn root() -> Uuid {
        Uuid::from_u128(0x6ba7_b810_9dad_11d1_80b4_00c0_4fd4_30c8)
    }

    fn test_store() -> Store {
        Store::new(&root(), RetailChain::Faker, "1", "Corner Shop")
    }

    fn test_catalog(store: &Store) -> Result<Catalog, crate::ean::EanError> {
        let mut catalog = Catalog::new();
        catalog.insert(Product::new(
            store.id,
            Ean::from_prefix("640509040147")?,
            "Rye bread",
            Decimal::new(289, 2),
        ));
        catalog.insert(Product::new(
            store.id,
            Ean::from_prefix("200000000000")?,
            "Minced meat",
            Decimal::new(1095, 2),
        ));

        Ok(catalog)
    }

    #[test]
    fn store_ids_are_deterministic() {
        let first = Store::new(&root(), RetailChain::Faker, "1", "Corner Shop");
        let second = Store::new(&root(), RetailChain::Faker, "1", "Renamed Shop");

        assert_eq!(first.id, second.id);
    }

    #[test]
    fn store_ids_differ_between_chains() {
        let faker = Store::new(&root(), RetailChain::Faker, "1", "Shop");
        let sok = Store::new(&root(), RetailChain::Sok, "1", "Shop");

        assert_ne!(faker.id, sok.id);
    }

    #[test]
    fn product_ids_are_scoped_to_the_store() -> TestResult {
        let ean = Ean::from_prefix("640509040147")?;
        let store = test_store();
        let other = Store::new(&root(), RetailChain::Faker, "2", "Other Shop");

        assert_eq!(
            Product::new(store.id, ean, "Bread", Decimal::ONE).id,
            product_id(store.id, ean)
        );
        assert_ne!(product_id(store.id, ean), product_id(other.id, ean));

        Ok(())
    }

    #[test]
    fn insert_and_get_round_trip() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let ean = Ean::from_prefix("640509040147")?;

        let product = catalog.get(store.id, ean);

        assert_eq!(product.map(|p| p.name.as_str()), Some("Rye bread"));
        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[test]
    fn resolves_fixed_price_lines_from_the_catalog() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let draft = CartProductDraft {
            ean: Ean::from_prefix("640509040147")?,
            quantity: Some(2),
        };

        let cart = resolve_cart(&catalog, store.id, &[draft])?;

        let line = &cart.products()[0];
        assert_eq!(line.name.as_deref(), Some("Rye bread"));
        assert_eq!(line.price, Some(Decimal::new(289, 2)));
        assert_eq!(line.quantity, Some(2));

        Ok(())
    }

    #[test]
    fn resolves_variable_price_lines_from_the_scanned_code() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let scanned = Ean::from_prefix("200000000000")?.with_price(Decimal::new(1234, 2))?;
        let draft = CartProductDraft {
            ean: scanned,
            quantity: None,
        };

        let cart = resolve_cart(&catalog, store.id, &[draft])?;

        let line = &cart.products()[0];
        assert_eq!(line.ean, scanned);
        assert_eq!(line.name.as_deref(), Some("Minced meat"));
        assert_eq!(line.price, Some(Decimal::new(1234, 2)));
        assert_eq!(line.quantity, None);

        Ok(())
    }

    #[test]
    fn unknown_product_is_rejected() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let unknown = Ean::from_prefix("712345678901")?;
        let draft = CartProductDraft {
            ean: unknown,
            quantity: Some(1),
        };

        assert_eq!(
            resolve_cart(&catalog, store.id, &[draft]),
            Err(ResolveError::UnknownProduct(unknown))
        );

        Ok(())
    }

    #[test]
    fn quantity_on_variable_price_draft_is_rejected() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let scanned = Ean::from_prefix("200000000000")?.with_price(Decimal::ONE)?;
        let draft = CartProductDraft {
            ean: scanned,
            quantity: Some(1),
        };

        assert_eq!(
            resolve_cart(&catalog, store.id, &[draft]),
            Err(ResolveError::Cart(CartError::QuantityForVariablePrice(
                scanned
            )))
        );

        Ok(())
    }

    #[test]
    fn missing_quantity_on_fixed_price_draft_is_rejected() -> TestResult {
        let store = test_store();
        let catalog = test_catalog(&store)?;
        let ean = Ean::from_prefix("640509040147")?;
        let draft = CartProductDraft {
            ean,
            quantity: None,
        };

        assert_eq!(
            resolve_cart(&catalog, store.id, &[draft]),
            Err(ResolveError::Cart(CartError::MissingQuantity(ean)))
        );

        Ok(())
    }
}
