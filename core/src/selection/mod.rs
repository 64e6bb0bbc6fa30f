//! Body-part selection state machine
//!
//! Tracks which toggle buttons are active for one dashboard session and
//! decodes the structured events that drive it.

mod event;
mod session;
mod state;

pub use event::DashboardEvent;
pub use session::DashboardSession;
pub use state::{ButtonState, SelectionState};
