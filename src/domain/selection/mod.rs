//! Selection - the set of resources chosen for a booking.

mod set;

pub use set::SelectionSet;
