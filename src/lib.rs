pub mod agenda;
pub mod calendar;
pub mod config;
pub mod filter;
pub mod model;
pub mod output;
pub mod paths;
pub mod reminder;
pub mod sort;
pub mod state;
pub mod store;
pub mod watch;
pub mod workspace;

pub use filter::{apply_filters, FilterState};
pub use model::{Reminder, ReminderType, Task};
pub use reminder::{deadline_reminder, start_date_reminder, start_time_reminder};
