use tokio::time::Instant;

/// Where the checkout currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Confirmed { order_id: Option<String> },
    Failed,
}

/// Transient checkout form plus the confirmation modal it drives.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    name: String,
    phone: String,
    submitted: bool,
    confirmation: String,
    show_modal: bool,
    state: CheckoutState,
    shown_at: Option<Instant>,
}

impl OrderForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn confirmation(&self) -> &str {
        &self.confirmation
    }

    pub fn show_modal(&self) -> bool {
        self.show_modal
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn shown_at(&self) -> Option<Instant> {
        self.shown_at
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    pub fn set_phone<S: Into<String>>(&mut self, phone: S) {
        self.phone = phone.into();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.state = CheckoutState::Submitting;
    }

    pub(crate) fn confirm(&mut self, order_id: Option<String>, now: Instant) {
        self.confirmation = match &order_id {
            Some(id) => format!("Order placed successfully! Order ID: {id}"),
            None => String::from("Order placed successfully!"),
        };
        self.submitted = true;
        self.state = CheckoutState::Confirmed { order_id };
        self.open_modal(now);
    }

    pub(crate) fn fail(&mut self, now: Instant) {
        self.confirmation = String::from("Order failed. Please try again.");
        self.submitted = false;
        self.state = CheckoutState::Failed;
        self.open_modal(now);
    }

    fn open_modal(&mut self, now: Instant) {
        self.show_modal = true;
        self.shown_at = Some(now);
    }

    /// Drops a leftover confirmation, keeps what the shopper typed.
    pub(crate) fn clear_confirmation(&mut self) {
        self.submitted = false;
        self.confirmation.clear();
        self.show_modal = false;
        self.state = CheckoutState::Idle;
        self.shown_at = None;
    }

    /// Back to a blank form.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
