/// The custom periodic actor.
pub mod periodic;
pub use periodic::{Periodic, PeriodicProp};

/// Generic printer actor.
pub mod printer;
pub use printer::{Printable, Printer, PrinterProp};
