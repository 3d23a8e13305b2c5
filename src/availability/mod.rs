//! Golf bay availability backed by a Google Apps Script web app

mod gas;

pub use gas::{render_for_model, AvailabilityBackend, AvailabilityQuery, GasClient};
