//! Fixtures
//!
//! YAML-described stores and catalogs for tests, demos and development, in
//! place of a real chain's product feed.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::{Catalog, Product, RetailChain, Store},
    ean::Ean,
};

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files.
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (includes invalid EAN codes and chains).
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// A whole catalog fixture: a uuid root namespace and the stores under it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFixture {
    /// Root namespace all store and product ids are derived from.
    pub root_namespace: Uuid,

    /// The stores in the fixture.
    pub stores: Vec<StoreFixture>,
}

/// One store and its products.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFixture {
    /// The chain the store belongs to.
    pub chain: RetailChain,

    /// The chain's identifier for the store.
    pub external_id: String,

    /// Display name.
    pub name: String,

    /// The store's products.
    pub products: Vec<ProductFixture>,
}

/// One product row.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFixture {
    /// Catalog form EAN code.
    pub ean: Ean,

    /// Display name.
    pub name: String,

    /// Price per unit.
    pub price: Decimal,
}

impl CatalogFixture {
    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the YAML is malformed or contains
    /// invalid EAN codes.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Materialize the stores and catalog described by this fixture.
    pub fn build(&self) -> (Vec<Store>, Catalog) {
        let mut stores = Vec::with_capacity(self.stores.len());
        let mut catalog = Catalog::new();

        for store_fixture in &self.stores {
            let store = Store::new(
                &self.root_namespace,
                store_fixture.chain,
                store_fixture.external_id.clone(),
                store_fixture.name.clone(),
            );

            for product in &store_fixture.products {
                catalog.insert(Product::new(
                    store.id,
                    product.ean,
                    product.name.clone(),
                    product.price,
                ));
            }

            stores.push(store);
        }

        (stores, catalog)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const FIXTURE: &str = "
root_namespace: 6ba7b810-9dad-11d1-80b4-00c04fd430c8
stores:
  - chain: faker
    external_id: \"1\"
    name: Corner Shop
    products:
      - ean: \"6405090401470\"
        name: Rye bread
        price: 2.89
      - ean: \"2000000000008\"
        name: Minced meat
        price: 10.95
";

    #[test]
    fn parses_and_builds_a_catalog() -> TestResult {
        let fixture = CatalogFixture::from_yaml(FIXTURE)?;
        let (stores, catalog) = fixture.build();

        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "Corner Shop");
        assert_eq!(catalog.len(), 2);

        let bread = catalog.get(stores[0].id, Ean::validate("6405090401470")?);
        assert_eq!(bread.map(|p| p.price), Some(Decimal::new(289, 2)));

        Ok(())
    }

    #[test]
    fn rejects_invalid_ean_codes() {
        let broken = FIXTURE.replace("6405090401470", "6405090401471");

        assert!(matches!(
            CatalogFixture::from_yaml(&broken),
            Err(FixtureError::Yaml(_))
        ));
    }

    #[test]
    fn rejects_unknown_chains() {
        let broken = FIXTURE.replace("faker", "tesco");

        assert!(matches!(
            CatalogFixture::from_yaml(&broken),
            Err(FixtureError::Yaml(_))
        ));
    }
}
