//! ClassBook Core Library
//!
//! Data access, synchronization, and delivery for the ClassBook class
//! booking portal.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigError, EmailSettings};
pub use db::{Database, StudentAnalytics, SystemAnalytics, TrainerAnalytics};
pub use error::{Error, Result};
pub use models::{
    Appointment, AppointmentStatus, CalendarEvent, Course, CourseStatus, DeliveryStatus, EventKind,
    LeaveRequest, Material, Message, Notification, NotificationCategory, NotificationKind,
    ReviewStatus, Role, StatusUpdate, TimeLog, User, UserStatus, WriteState,
};
pub use notify::{Channel, NotificationService};
pub use store::{ApiClient, LocalStore, StoreError};
pub use sync::{
    run_sweep, spawn_completion_sweep, spawn_storage_watcher, subscribe, ChangeSignal, TaskHandle,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
