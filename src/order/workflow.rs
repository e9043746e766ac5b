//! Two-phase checkout: place the order, then push seat counts per lesson.

use thiserror::Error;
use tokio::time::Instant;

use super::{OrderRequest, is_name_valid, is_phone_valid};
use crate::backend::{BackendError, ShopBackend};
use crate::error::log_error;
use crate::model::{CartLine, LessonKey};
use crate::shop::Shop;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("name must contain letters and spaces only")]
    InvalidName,
    #[error("phone must contain digits only")]
    InvalidPhone,
    #[error("cart is empty")]
    EmptyCart,
}

#[derive(Debug)]
pub enum SeatSyncStatus {
    Updated { spaces: u32 },
    Failed { spaces: u32, error: BackendError },
    /// The lesson was no longer in the catalog snapshot.
    Skipped,
}

/// Result of pushing one lesson's seat count after an order.
#[derive(Debug)]
pub struct SeatSync {
    pub key: LessonKey,
    pub status: SeatSyncStatus,
}

impl SeatSync {
    pub fn is_updated(&self) -> bool {
        matches!(self.status, SeatSyncStatus::Updated { .. })
    }
}

#[derive(Debug)]
pub enum OrderOutcome {
    Placed {
        order_id: Option<String>,
        seat_sync: Vec<SeatSync>,
    },
    Failed(BackendError),
}

impl<B: ShopBackend> Shop<B> {
    fn checkout_guard(&self) -> Result<(), CheckoutError> {
        if !is_name_valid(self.form.name()) {
            return Err(CheckoutError::InvalidName);
        }
        if !is_phone_valid(self.form.phone()) {
            return Err(CheckoutError::InvalidPhone);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(())
    }

    /// Places the order for the current cart.
    ///
    /// A rejected or unreachable order leaves the cart as it is. A placed
    /// order empties the cart without giving seats back, after every line's
    /// seat count has been pushed. Either way the confirmation modal opens.
    #[tracing::instrument(skip(self), fields(lines = self.cart.len()))]
    pub async fn submit_order(&mut self) -> Result<OrderOutcome, CheckoutError> {
        self.checkout_guard()?;

        let request = OrderRequest::from_lines(self.form.name(), self.form.phone(), self.cart.lines());
        self.form.begin_submit();

        let receipt = match self.backend.create_order(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                log_error(&e);
                self.form.fail(Instant::now());
                return Ok(OrderOutcome::Failed(e));
            }
        };

        let order_id = receipt.order_id();
        tracing::info!(order_id = ?order_id, spaces = request.spaces, "order placed");

        let seat_sync = self.sync_seats(self.cart.lines().to_vec()).await;

        self.form.confirm(order_id.clone(), Instant::now());
        self.cart.clear_consumed();
        self.hide_empty_cart();

        Ok(OrderOutcome::Placed {
            order_id,
            seat_sync,
        })
    }

    /// Pushes the current seat count of each ordered lesson, one request at a
    /// time in line order. Failures are logged and the remaining lines are
    /// still attempted, nothing is retried.
    async fn sync_seats(&self, lines: Vec<CartLine>) -> Vec<SeatSync> {
        let mut results = Vec::with_capacity(lines.len());

        for line in lines {
            let key = line.key().clone();
            let Some(spaces) = self.catalog.get(&key).map(|l| l.spaces()) else {
                tracing::warn!(lesson = %key, "lesson left the catalog, seat sync skipped");
                results.push(SeatSync {
                    key,
                    status: SeatSyncStatus::Skipped,
                });
                continue;
            };

            let status = match self.backend.update_spaces(&key, spaces).await {
                Ok(()) => SeatSyncStatus::Updated { spaces },
                Err(error) => {
                    tracing::warn!(lesson = %key, "seat sync failed: {error}");
                    SeatSyncStatus::Failed { spaces, error }
                }
            };
            results.push(SeatSync { key, status });
        }

        results
    }

    /// Closes the confirmation modal and blanks the form. The cart is left
    /// alone.
    pub fn dismiss_confirmation(&mut self) {
        self.form.reset();
    }

    pub fn confirmation_deadline(&self) -> Option<Instant> {
        if !self.form.show_modal() {
            return None;
        }
        self.form.shown_at().map(|at| at + self.confirmation_delay)
    }

    /// Dismisses the modal if it has been open for the confirmation delay.
    pub fn poll_confirmation(&mut self, now: Instant) -> bool {
        match self.confirmation_deadline() {
            Some(deadline) if now >= deadline => {
                self.dismiss_confirmation();
                true
            }
            _ => false,
        }
    }

    /// Waits out the confirmation delay, then dismisses the modal.
    pub async fn auto_dismiss(&mut self) {
        if let Some(deadline) = self.confirmation_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.poll_confirmation(Instant::now());
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::model::{Lesson, LessonKey};
    use crate::order::CheckoutState;
    use crate::test_support::FakeBackend;

    fn shop(backend: FakeBackend) -> Shop<FakeBackend> {
        Shop::new(backend).with_catalog(vec![
            Lesson::new("Piano", "Hendon", 20.0, 3),
            Lesson::new("Guitar", "Barnet", 15.0, 2),
        ])
    }

    fn fill_form(shop: &mut Shop<FakeBackend>) {
        shop.set_name("John Smith");
        shop.set_phone("07123456789");
    }

    #[tokio::test]
    async fn successful_checkout_consumes_seats() {
        let mut shop = shop(FakeBackend::default().with_order_id("ORD-7"));
        let piano = LessonKey::from("Piano");

        shop.add_to_cart(&piano);
        shop.add_to_cart(&piano);
        fill_form(&mut shop);
        assert!(shop.checkout_enabled());

        let outcome = shop.submit_order().await.unwrap();

        let OrderOutcome::Placed { order_id, seat_sync } = outcome else {
            panic!("order should be placed");
        };
        assert_eq!(order_id.as_deref(), Some("ORD-7"));
        assert_eq!(seat_sync.len(), 1);
        assert!(seat_sync[0].is_updated());

        assert!(shop.cart().is_empty());
        assert!(shop.form().show_modal());
        assert!(shop.form().submitted());
        assert!(shop.form().confirmation().contains("ORD-7"));
        assert_eq!(shop.catalog().get(&piano).map(Lesson::spaces), Some(1));

        let orders = shop.backend().orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].spaces, 2);
        assert_eq!(shop.backend().space_updates(), vec![(piano, 1)]);
    }

    #[tokio::test]
    async fn failed_order_keeps_cart() {
        let mut shop = shop(FakeBackend::default().failing_orders());
        let piano = LessonKey::from("Piano");

        shop.add_to_cart(&piano);
        shop.add_to_cart(&piano);
        fill_form(&mut shop);

        let outcome = shop.submit_order().await.unwrap();

        assert!(matches!(outcome, OrderOutcome::Failed(_)));
        assert_eq!(shop.cart().line(&piano).map(CartLine::quantity), Some(2));
        assert_eq!(shop.form().state(), &CheckoutState::Failed);
        assert!(shop.form().show_modal());
        assert_eq!(shop.form().confirmation(), "Order failed. Please try again.");
        assert!(shop.backend().space_updates().is_empty());
    }

    #[tokio::test]
    async fn seat_sync_failure_does_not_abort_fan_out() {
        let mut shop = shop(FakeBackend::default().failing_updates_for("Piano"));
        let piano = LessonKey::from("Piano");
        let guitar = LessonKey::from("Guitar");

        shop.add_to_cart(&piano);
        shop.add_to_cart(&guitar);
        fill_form(&mut shop);

        let OrderOutcome::Placed { seat_sync, .. } = shop.submit_order().await.unwrap() else {
            panic!("order should be placed");
        };

        assert!(matches!(seat_sync[0].status, SeatSyncStatus::Failed { spaces: 2, .. }));
        assert!(matches!(seat_sync[1].status, SeatSyncStatus::Updated { spaces: 1 }));
        assert!(shop.cart().is_empty());
        assert_eq!(shop.form().state(), &CheckoutState::Confirmed { order_id: None });
    }

    #[tokio::test]
    async fn lines_missing_from_catalog_are_skipped() {
        let backend = FakeBackend::default()
            .with_search_result(vec![Lesson::new("Guitar", "Barnet", 15.0, 2)]);
        let mut shop = shop(backend);
        let piano = LessonKey::from("Piano");
        let guitar = LessonKey::from("Guitar");

        shop.add_to_cart(&piano);
        shop.add_to_cart(&guitar);
        shop.search("guitar").await.unwrap();
        fill_form(&mut shop);

        let OrderOutcome::Placed { seat_sync, .. } = shop.submit_order().await.unwrap() else {
            panic!("order should be placed");
        };

        assert!(matches!(seat_sync[0].status, SeatSyncStatus::Skipped));
        assert!(seat_sync[1].is_updated());
        assert_eq!(shop.backend().space_updates(), vec![(guitar, 1)]);
    }

    #[tokio::test]
    async fn checkout_guard_rejects_invalid_form() {
        let mut shop = shop(FakeBackend::default());

        fill_form(&mut shop);
        assert_eq!(shop.submit_order().await.err(), Some(CheckoutError::EmptyCart));

        shop.add_to_cart(&"Piano".into());
        shop.set_name("John3");
        assert_eq!(shop.submit_order().await.err(), Some(CheckoutError::InvalidName));

        shop.set_name("John");
        shop.set_phone("071-234");
        assert_eq!(shop.submit_order().await.err(), Some(CheckoutError::InvalidPhone));
        assert!(shop.backend().orders().is_empty());
        assert_eq!(shop.form().state(), &CheckoutState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_closes_after_delay() {
        let mut shop = shop(FakeBackend::default());
        shop.add_to_cart(&"Piano".into());
        fill_form(&mut shop);
        shop.submit_order().await.unwrap();

        let opened = Instant::now();
        assert!(!shop.poll_confirmation(opened + Duration::from_millis(2499)));
        assert!(shop.form().show_modal());

        shop.auto_dismiss().await;

        assert!(Instant::now() >= opened + Duration::from_millis(2500));
        assert!(!shop.form().show_modal());
        assert_eq!(shop.form().name(), "");
        assert_eq!(shop.form().confirmation(), "");
        assert_eq!(shop.form().state(), &CheckoutState::Idle);
    }

    #[tokio::test]
    async fn early_dismiss_supersedes_timer() {
        let mut shop = shop(FakeBackend::default().failing_orders());
        let piano = LessonKey::from("Piano");
        shop.add_to_cart(&piano);
        fill_form(&mut shop);
        shop.submit_order().await.unwrap();

        shop.dismiss_confirmation();

        assert_eq!(shop.confirmation_deadline(), None);
        assert!(!shop.poll_confirmation(Instant::now() + Duration::from_secs(10)));
        // cart untouched by the reset
        assert_eq!(shop.cart().total_quantity(), 1);
    }

    #[tokio::test]
    async fn adding_after_confirmation_clears_it() {
        let mut shop = shop(FakeBackend::default());
        shop.add_to_cart(&"Piano".into());
        fill_form(&mut shop);
        shop.submit_order().await.unwrap();
        assert!(shop.form().submitted());

        assert!(shop.add_to_cart(&"Guitar".into()));
        assert!(!shop.form().submitted());
        assert!(!shop.form().show_modal());
        assert_eq!(shop.form().name(), "John Smith");
    }
}
