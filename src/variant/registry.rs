//! Registry of product variants with their built current tables.

use heapless::FnvIndexMap;

use super::{descriptors, Product, VariantDescriptor};
use crate::current::CurrentLimitTable;
use crate::error::{Error, Result};

/// Maximum number of variants in the registry.
pub const MAX_VARIANTS: usize = 8;

/// A product descriptor together with its built current-limit table.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    descriptor: &'static VariantDescriptor,
    current_table: CurrentLimitTable,
}

impl Variant {
    /// Build the current table for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Table` if the table cannot be built, or
    /// `Error::DefaultNotInTable` if the descriptor's default current limit is not an
    /// entry of it.
    pub fn new(descriptor: &'static VariantDescriptor) -> Result<Self> {
        let current_table = descriptor.current_table.build()?;
        if !current_table.contains(descriptor.default_current_limit) {
            return Err(Error::DefaultNotInTable {
                product: descriptor.product,
                current_limit: descriptor.default_current_limit,
            });
        }
        Ok(Self {
            descriptor,
            current_table,
        })
    }

    /// Static rules of this variant.
    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.descriptor
    }

    /// Product this variant describes.
    pub fn product(&self) -> Product {
        self.descriptor.product
    }

    /// Achievable current limits.
    pub fn current_table(&self) -> &CurrentLimitTable {
        &self.current_table
    }
}

/// Read-only lookup of variants by product.
///
/// Build it once at startup and share it; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    variants: FnvIndexMap<Product, Variant, MAX_VARIANTS>,
}

impl Registry {
    /// Registry of every built-in product.
    ///
    /// # Errors
    ///
    /// Returns an error if any built-in current table fails to build.
    pub fn new() -> Result<Self> {
        Self::with_descriptors(&descriptors::ALL)
    }

    /// Registry of the given descriptors. A later descriptor replaces an earlier one
    /// for the same product.
    ///
    /// # Errors
    ///
    /// Returns an error if a current table fails to build or there are more than
    /// [`MAX_VARIANTS`] distinct products.
    pub fn with_descriptors(descriptors: &[&'static VariantDescriptor]) -> Result<Self> {
        let mut variants = FnvIndexMap::new();
        for &descriptor in descriptors {
            let variant = Variant::new(descriptor)?;
            variants
                .insert(descriptor.product, variant)
                .map_err(|_| Error::RegistryFull(MAX_VARIANTS))?;
        }
        Ok(Self { variants })
    }

    /// Variant for `product`.
    pub fn get(&self, product: Product) -> Option<&Variant> {
        self.variants.get(&product)
    }

    /// Variant whose product is named `name`.
    pub fn by_name(&self, name: &str) -> Option<&Variant> {
        Product::from_name(name).and_then(|p| self.get(p))
    }

    /// Get the number of variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Iterate over the variants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }
}
