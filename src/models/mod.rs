//! Domain entities shared by the facade, the stores and the sync layer.
//!
//! Every entity carries an explicit schema with tagged status enums; records
//! that fail to deserialize are rejected at the store boundary rather than
//! propagated as loosely-typed data.

mod appointment;
mod calendar;
mod course;
mod message;
mod notification;
mod timesheet;
mod user;

pub use appointment::{Appointment, AppointmentStatus, StatusUpdate};
pub use calendar::{CalendarEvent, EventKind, Material};
pub use course::{Course, CourseStatus};
pub use message::{DeliveryStatus, Message};
pub use notification::{Notification, NotificationCategory, NotificationKind};
pub use timesheet::{LeaveRequest, ReviewStatus, TimeLog, WriteState};
pub use user::{Role, User, UserStatus};
