mod form;
pub use form::{CheckoutState, OrderForm};

mod payload;
pub use payload::{OrderItem, OrderReceipt, OrderRequest};

mod validate;
pub use validate::{checkout_enabled, is_name_valid, is_phone_valid};

mod workflow;
pub use workflow::{CheckoutError, OrderOutcome, SeatSync, SeatSyncStatus};
