//! The controller owning all shop state.

use std::time::Duration;

use crate::Config;
use crate::backend::{BackendResult, ShopBackend};
use crate::model::{Cart, Catalog, Lesson, LessonKey};
use crate::order::{OrderForm, checkout_enabled};
use crate::view::{LessonView, SortDirection, SortField, SortOptions, display_lessons};

#[derive(Debug)]
pub struct Shop<B> {
    pub(crate) backend: B,
    pub(crate) catalog: Catalog,
    pub(crate) cart: Cart,
    pub(crate) form: OrderForm,
    sort: SortOptions,
    pub(crate) cart_visible: bool,
    pub(crate) confirmation_delay: Duration,
}

impl<B: ShopBackend> Shop<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            catalog: Catalog::default(),
            cart: Cart::new(),
            form: OrderForm::default(),
            sort: SortOptions::default(),
            cart_visible: false,
            confirmation_delay: Duration::from_millis(2500),
        }
    }

    pub fn from_config(backend: B, config: &Config) -> Self {
        let mut shop = Self::new(backend);
        shop.sort.field = config.shop().default_sort();
        shop.confirmation_delay = config.shop().confirmation_delay();
        shop
    }

    pub fn with_catalog(mut self, lessons: Vec<Lesson>) -> Self {
        self.replace_catalog(lessons);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn sort(&self) -> SortOptions {
        self.sort
    }

    pub fn cart_visible(&self) -> bool {
        self.cart_visible
    }

    pub fn confirmation_delay(&self) -> Duration {
        self.confirmation_delay
    }

    // Catalog

    /// Loads the full catalog. On failure the previous snapshot stays.
    #[tracing::instrument(skip(self))]
    pub async fn load_lessons(&mut self) -> BackendResult<()> {
        let lessons = self.backend.fetch_lessons().await?;
        tracing::debug!("loaded {} lessons", lessons.len());
        self.replace_catalog(lessons);
        Ok(())
    }

    /// Replaces the catalog with the backend's matches for `query`.
    /// On failure the previous snapshot stays.
    #[tracing::instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> BackendResult<()> {
        let lessons = self.backend.search_lessons(query).await?;
        tracing::debug!("search matched {} lessons", lessons.len());
        self.replace_catalog(lessons);
        Ok(())
    }

    fn replace_catalog(&mut self, lessons: Vec<Lesson>) {
        self.catalog.replace(lessons);
        self.cart.hold_in(&mut self.catalog);
    }

    pub fn display_lessons(&self) -> LessonView<'_> {
        display_lessons(&self.catalog, self.sort)
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort.field = field;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort.direction = direction;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort.direction = self.sort.direction.toggled();
    }

    // Cart

    pub fn add_to_cart(&mut self, key: &LessonKey) -> bool {
        let added = self.cart.add(&mut self.catalog, key);
        if added {
            self.form.clear_confirmation();
        }
        added
    }

    pub fn increase_quantity(&mut self, key: &LessonKey) -> bool {
        self.cart.increase(&mut self.catalog, key)
    }

    pub fn decrease_quantity(&mut self, key: &LessonKey) -> bool {
        let changed = self.cart.decrease(&mut self.catalog, key);
        self.hide_empty_cart();
        changed
    }

    pub fn remove_from_cart(&mut self, key: &LessonKey) -> bool {
        let changed = self.cart.remove(&mut self.catalog, key);
        self.hide_empty_cart();
        changed
    }

    /// Shows or hides the cart. An empty cart cannot be shown.
    pub fn toggle_cart(&mut self) -> bool {
        self.cart_visible = !self.cart_visible && !self.cart.is_empty();
        self.cart_visible
    }

    pub(crate) fn hide_empty_cart(&mut self) {
        if self.cart.is_empty() {
            self.cart_visible = false;
        }
    }

    // Form

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.form.set_name(name);
    }

    pub fn set_phone<S: Into<String>>(&mut self, phone: S) {
        self.form.set_phone(phone);
    }

    pub fn checkout_enabled(&self) -> bool {
        checkout_enabled(self.form.name(), self.form.phone(), &self.cart)
    }
}
