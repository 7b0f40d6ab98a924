#![forbid(unsafe_code)]

//! In-memory reactive recipe collection store.
//!
//! One component, [`RecipeStore`]: the single source of truth for a recipe
//! collection and the views derived from it — a case-insensitive
//! text-filtered list, a favorites set, and a bounded random recommendation
//! sample. Every action recomputes the derived views synchronously before it
//! returns and publishes one [`StoreChange`] through the
//! [`ladle_reactive`] notification machinery.
//!
//! The store is purely transient process-lifetime state: no persistence, no
//! wire protocol, no I/O. The presentation layer consumes it through the
//! read accessors plus [`RecipeStore::subscribe`].
//!
//! ```
//! use ladle_store::{Recipe, RecipeStore};
//!
//! let mut store = RecipeStore::with_seed(1);
//! store.add_recipe(Recipe::new(1, "Pasta", "Tomato sauce"));
//! store.add_recipe(Recipe::new(2, "Salad", "Fresh greens"));
//!
//! store.set_search_term("sauce");
//! assert_eq!(store.filtered().len(), 1);
//!
//! store.add_favorite(1);
//! assert!(store.recommendations().iter().all(|r| r.id.0 != 1));
//! ```

pub mod recipe;
mod sample;
pub mod store;

pub use ladle_reactive::Subscription;
pub use recipe::{Recipe, RecipeId};
pub use store::{ChangedFields, MAX_RECOMMENDATIONS, RecipeStore, StoreChange};
