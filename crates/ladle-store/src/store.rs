#![forbid(unsafe_code)]

//! The recipe collection store and its derived views.
//!
//! [`RecipeStore`] is the single source of truth for a recipe collection
//! plus three views derived from it: a case-insensitive text filter, a
//! favorites set, and a bounded random recommendation sample. Every action
//! re-establishes the derived views synchronously before it returns, then
//! publishes one [`StoreChange`] to subscribers.
//!
//! # Invariants
//!
//! After every action completes:
//!
//! 1. `filtered()` equals the substring filter of `recipes()` by
//!    `search_term()` (empty term ⇒ the whole collection).
//! 2. `favorites() ⊆ ids(recipes())`; deleting a recipe drops its id from
//!    the favorites.
//! 3. `recommendations()` is disjoint from `favorites()` (by id), a subset
//!    of `recipes()`, and at most [`MAX_RECOMMENDATIONS`] long.
//! 4. No two recipes share an id, provided callers keep add-ids unique
//!    (a duplicate id on [`add_recipe`](RecipeStore::add_recipe) is
//!    absorbed, not rejected — the known edge case of the fire-and-forget
//!    contract).
//!
//! Subscribers observe only post-invariant states: the [`StoreChange`]
//! callback fires once per action that changed anything, after all derived
//! views are recomputed.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | `delete_recipe` with unknown id | Silent no-op, no notification |
//! | `update_recipe` with unknown id | Silent no-op, no notification |
//! | `add_favorite` of already-favorited id | Silent no-op (idempotent) |
//! | `add_favorite` of id not in the collection | Silent no-op (keeps invariant 2) |
//! | `remove_favorite` of absent id | Silent no-op (idempotent) |
//! | `add_recipe` with duplicate id | Record appended anyway (caller's bug) |
//!
//! All no-ops emit a `tracing` debug event; none raise an error.
//!
//! # Re-entrancy
//!
//! Change callbacks run while the acting borrow of the store is still held.
//! They must not call back into the store synchronously; treat the
//! notification as a dirty mark and re-read the views after the action
//! returns.
//!
//! # Threading
//!
//! Single-threaded by construction (`Rc`-based notification, not `Send`).
//! A multi-threaded host must wrap the whole store in its own mutual
//! exclusion so each action stays one atomic read-modify-write.

use bitflags::bitflags;
use ladle_reactive::{Observable, Subscription};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::recipe::{Recipe, RecipeId};
use crate::sample;

/// Upper bound on the recommendation sample size.
pub const MAX_RECOMMENDATIONS: usize = 3;

bitflags! {
    /// Which store fields an action changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChangedFields: u8 {
        /// The canonical collection changed.
        const RECIPES = 1;
        /// The stored search term changed.
        const SEARCH_TERM = 1 << 1;
        /// The filtered view changed.
        const FILTERED = 1 << 2;
        /// The favorites set changed.
        const FAVORITES = 1 << 3;
        /// The recommendation sample changed.
        const RECOMMENDATIONS = 1 << 4;
    }
}

/// Notification payload published after every state-changing action.
///
/// `revision` strictly increases with each published change, so two
/// consecutive actions touching the same fields still notify (the
/// [`Observable`] equal-value no-op rule never suppresses them).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreChange {
    /// Strictly increasing change counter, starting at 1.
    pub revision: u64,
    /// The fields the action changed.
    pub fields: ChangedFields,
}

/// Single source of truth for a recipe collection and its derived views.
///
/// Create one per application session at the composition root and hand out
/// read access plus [`subscribe`](Self::subscribe) handles to the
/// presentation layer. See the [module docs](self) for the invariant and
/// notification contract.
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    search_term: String,
    filtered: Vec<Recipe>,
    favorites: Vec<RecipeId>,
    recommendations: Vec<Recipe>,
    rng: Box<dyn RngCore>,
    changes: Observable<StoreChange>,
}

impl std::fmt::Debug for RecipeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeStore")
            .field("recipes", &self.recipes.len())
            .field("search_term", &self.search_term)
            .field("filtered", &self.filtered.len())
            .field("favorites", &self.favorites)
            .field("recommendations", &self.recommendations.len())
            .field("revision", &self.revision())
            .finish()
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStore {
    /// Create an empty store with an OS-seeded recommendation sampler.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create an empty store with a fixed-seed sampler (deterministic
    /// recommendations for a given action sequence).
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create an empty store drawing recommendation samples from `rng`.
    #[must_use]
    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Self {
            recipes: Vec::new(),
            search_term: String::new(),
            filtered: Vec::new(),
            favorites: Vec::new(),
            recommendations: Vec::new(),
            rng: Box::new(rng),
            changes: Observable::new(StoreChange {
                revision: 0,
                fields: ChangedFields::empty(),
            }),
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Append a recipe to the collection.
    ///
    /// Fire-and-forget: a duplicate id is not rejected (keeping ids unique
    /// is the caller's job). Recomputes the filtered view against the
    /// current search term and resamples recommendations.
    pub fn add_recipe(&mut self, recipe: Recipe) {
        debug!(id = recipe.id.0, title = %recipe.title, "add recipe");
        self.recipes.push(recipe);
        let fields = ChangedFields::RECIPES | self.refilter() | self.resample();
        self.publish(fields);
    }

    /// Replace the entire collection (bulk load).
    ///
    /// The existing search term and favorites are kept; the filtered view
    /// and recommendations are recomputed against the new collection.
    /// Favorited ids that no longer resolve are dropped (invariant 2).
    pub fn set_recipes(&mut self, recipes: Vec<Recipe>) {
        debug!(count = recipes.len(), "set recipes");
        let mut fields = if self.recipes == recipes {
            ChangedFields::empty()
        } else {
            self.recipes = recipes;
            ChangedFields::RECIPES
        };
        let before = self.favorites.len();
        self.favorites
            .retain(|id| self.recipes.iter().any(|r| r.id == *id));
        if self.favorites.len() != before {
            fields |= ChangedFields::FAVORITES;
        }
        fields |= self.refilter();
        fields |= self.resample();
        self.publish(fields);
    }

    /// Remove the recipe with `id`, if present.
    ///
    /// Drops `id` from the favorites and recomputes both derived views.
    /// Unknown ids are a silent no-op: nothing recomputes, nothing notifies.
    pub fn delete_recipe(&mut self, id: impl Into<RecipeId>) {
        let id = id.into();
        let Some(pos) = self.recipes.iter().position(|r| r.id == id) else {
            debug!(%id, "delete: unknown id, ignoring");
            return;
        };
        debug!(%id, "delete recipe");
        self.recipes.remove(pos);
        let mut fields = ChangedFields::RECIPES;
        if let Some(fav) = self.favorites.iter().position(|f| *f == id) {
            self.favorites.remove(fav);
            fields |= ChangedFields::FAVORITES;
        }
        fields |= self.refilter();
        fields |= self.resample();
        self.publish(fields);
    }

    /// Whole-record replace keyed by `recipe.id`.
    ///
    /// Unknown ids are a silent no-op. Recomputes the filtered view and
    /// resamples recommendations when the record is found.
    pub fn update_recipe(&mut self, recipe: Recipe) {
        let Some(slot) = self.recipes.iter_mut().find(|r| r.id == recipe.id) else {
            debug!(id = recipe.id.0, "update: unknown id, ignoring");
            return;
        };
        debug!(id = recipe.id.0, title = %recipe.title, "update recipe");
        let mut fields = if *slot == recipe {
            ChangedFields::empty()
        } else {
            *slot = recipe;
            ChangedFields::RECIPES
        };
        fields |= self.refilter();
        fields |= self.resample();
        self.publish(fields);
    }

    /// Store `term` verbatim (for display) and recompute the filtered view.
    ///
    /// Matching is a case-insensitive substring test against title OR
    /// description; the empty term matches everything.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        debug!(%term, "set search term");
        let mut fields = if self.search_term == term {
            ChangedFields::empty()
        } else {
            self.search_term = term;
            ChangedFields::SEARCH_TERM
        };
        fields |= self.refilter();
        self.publish(fields);
    }

    /// Defensive re-sync: recompute the filtered view from the current
    /// collection and search term without touching anything else.
    pub fn filter_recipes(&mut self) {
        let fields = self.refilter();
        self.publish(fields);
    }

    /// Mark `id` as a favorite.
    ///
    /// Idempotent: already-favorited ids are a silent no-op. Ids that do
    /// not resolve to a recipe are also ignored, keeping the favorites a
    /// subset of the collection. Resamples recommendations on change.
    pub fn add_favorite(&mut self, id: impl Into<RecipeId>) {
        let id = id.into();
        if self.favorites.contains(&id) {
            debug!(%id, "favorite: already present, ignoring");
            return;
        }
        if !self.recipes.iter().any(|r| r.id == id) {
            debug!(%id, "favorite: unknown id, ignoring");
            return;
        }
        debug!(%id, "add favorite");
        self.favorites.push(id);
        let fields = ChangedFields::FAVORITES | self.resample();
        self.publish(fields);
    }

    /// Unmark `id` as a favorite.
    ///
    /// Idempotent: absent ids are a silent no-op. Resamples
    /// recommendations on change.
    pub fn remove_favorite(&mut self, id: impl Into<RecipeId>) {
        let id = id.into();
        let Some(pos) = self.favorites.iter().position(|f| *f == id) else {
            debug!(%id, "unfavorite: not a favorite, ignoring");
            return;
        };
        debug!(%id, "remove favorite");
        self.favorites.remove(pos);
        let fields = ChangedFields::FAVORITES | self.resample();
        self.publish(fields);
    }

    /// Explicitly redraw the recommendation sample from the current
    /// collection and favorites.
    ///
    /// The sample is deliberately not stable across calls: each draw is a
    /// fresh uniform sample of the non-favorited recipes.
    pub fn refresh_recommendations(&mut self) {
        let fields = self.resample();
        self.publish(fields);
    }

    // ── Read accessors ──────────────────────────────────────────────

    /// The canonical collection, insertion-order preserved.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// The current search term, verbatim as last set.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Recipes whose title or description contains the search term
    /// (case-insensitive). Equals [`recipes`](Self::recipes) when the term
    /// is empty.
    #[must_use]
    pub fn filtered(&self) -> &[Recipe] {
        &self.filtered
    }

    /// Favorited ids in the order they were favorited.
    #[must_use]
    pub fn favorites(&self) -> &[RecipeId] {
        &self.favorites
    }

    /// The current recommendation sample: at most [`MAX_RECOMMENDATIONS`]
    /// non-favorited recipes.
    #[must_use]
    pub fn recommendations(&self) -> &[Recipe] {
        &self.recommendations
    }

    /// Look up a recipe by id.
    #[must_use]
    pub fn recipe(&self, id: impl Into<RecipeId>) -> Option<&Recipe> {
        let id = id.into();
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Whether `id` is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, id: impl Into<RecipeId>) -> bool {
        let id = id.into();
        self.favorites.contains(&id)
    }

    /// Favorited ids resolved to records, in favorites insertion order.
    #[must_use]
    pub fn favorite_recipes(&self) -> Vec<Recipe> {
        self.favorites
            .iter()
            .filter_map(|id| self.recipes.iter().find(|r| r.id == *id))
            .cloned()
            .collect()
    }

    /// Revision of the last published change (0 before any change).
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.changes.with(|c| c.revision)
    }

    // ── Change notification ─────────────────────────────────────────

    /// Register `callback` to run after every state-changing action.
    ///
    /// Fires once per action, after all invariants are re-established, with
    /// the fields that action changed. Actions that change nothing
    /// observable do not fire. Callbacks must not re-enter the store
    /// synchronously (see the [module docs](self)); drop the returned
    /// [`Subscription`] to unsubscribe.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn subscribe(&self, callback: impl Fn(&StoreChange) + 'static) -> Subscription {
        self.changes.subscribe(callback)
    }

    /// Handle to the underlying change observable, for composition with
    /// other reactive machinery.
    #[must_use]
    pub fn changes(&self) -> Observable<StoreChange> {
        self.changes.clone()
    }

    // ── Derived-view recomputation ──────────────────────────────────

    fn refilter(&mut self) -> ChangedFields {
        let needle = self.search_term.to_lowercase();
        let next: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|r| r.matches_term(&needle))
            .cloned()
            .collect();
        trace!(matched = next.len(), total = self.recipes.len(), "refilter");
        if next == self.filtered {
            ChangedFields::empty()
        } else {
            self.filtered = next;
            ChangedFields::FILTERED
        }
    }

    fn resample(&mut self) -> ChangedFields {
        let pool: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|r| !self.favorites.contains(&r.id))
            .cloned()
            .collect();
        let next = sample::draw(&pool, MAX_RECOMMENDATIONS, self.rng.as_mut());
        trace!(pool = pool.len(), drawn = next.len(), "resample");
        if next == self.recommendations {
            ChangedFields::empty()
        } else {
            self.recommendations = next;
            ChangedFields::RECOMMENDATIONS
        }
    }

    fn publish(&mut self, fields: ChangedFields) {
        if fields.is_empty() {
            return;
        }
        let revision = self.revision() + 1;
        trace!(revision, ?fields, "publish change");
        self.changes.set(StoreChange { revision, fields });
    }
}
