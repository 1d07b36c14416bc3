//! Client side of the expense tracker: HTTP client, view state, controller
//! and view models.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod view;

pub use client::{Client, ClientError};
pub use controller::Controller;
pub use state::{ClientState, ExpenseFilters, ExpenseForm, PAGE_SIZE, SummaryRange, Tab};
