pub mod controller;
pub mod layout;
pub mod runtime;
pub mod session;

pub use controller::{AddOutcome, Controller, SearchOutcome};
pub use layout::{LayoutEngine, LayoutPass, Placement, Rect, Viewport};
pub use runtime::{sum_runtimes, to_breakdown, total_breakdown, total_label};
pub use session::{AddRejected, PendingAdd, SearchTicket, Session};
