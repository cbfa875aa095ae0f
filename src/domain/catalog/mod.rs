//! Catalog module - The MEAI question catalog.
//!
//! The catalog maps every answerable question (1-indexed ordinal) to the
//! category it belongs to. It is constructed once from an external source
//! and passed explicitly to the components that need it.

mod catalog;

pub use catalog::{
    short_category_name, Catalog, CatalogQuestion, CatalogSection, CategoryId,
    FALLBACK_CATEGORIES,
};
