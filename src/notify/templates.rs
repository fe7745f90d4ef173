//! Message templates for the delivery channels.
//!
//! Each template renders a plain-text subject and body from the entity
//! fields. Rendering is infallible; missing optional fields simply drop
//! their line.

use chrono::{NaiveDate, NaiveTime};

/// A rendered message, ready for any channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub body: String,
}

pub fn appointment_approved(
    name: &str,
    topic: &str,
    date: NaiveDate,
    time: NaiveTime,
    meeting_link: Option<&str>,
) -> Rendered {
    let link_line = match meeting_link {
        Some(link) => format!("\nMeeting link: {}\n", link),
        None => String::new(),
    };
    Rendered {
        subject: "Class Appointment Approved".to_string(),
        body: format!(
            "Hi {name},\n\n\
             Your class appointment has been approved!\n\n\
             Topic: {topic}\n\
             Date: {date}\n\
             Time: {time}\n\
             {link_line}\n\
             See you in class!\n\n\
             Best regards,\nClassBook Team"
        ),
    }
}

pub fn appointment_rejected(name: &str, topic: &str, reason: Option<&str>) -> Rendered {
    let reason_line = match reason {
        Some(reason) => format!("\nReason: {}\n", reason),
        None => String::new(),
    };
    Rendered {
        subject: "Class Appointment Update".to_string(),
        body: format!(
            "Hi {name},\n\n\
             Unfortunately, your class appointment for \"{topic}\" could not be \
             approved at this time.\n\
             {reason_line}\n\
             Please try booking another slot or contact your trainer for more \
             information.\n\n\
             Best regards,\nClassBook Team"
        ),
    }
}

pub fn meeting_link_ready(name: &str, topic: &str, link: &str, description: &str) -> Rendered {
    Rendered {
        subject: "Meeting Link for Your Class".to_string(),
        body: format!(
            "Hi {name},\n\n\
             Your meeting link is ready!\n\n\
             Class: {topic}\n\
             Description: {description}\n\n\
             Join here: {link}\n\n\
             Best regards,\nClassBook Team"
        ),
    }
}

pub fn leave_approved(name: &str, start: NaiveDate, end: NaiveDate) -> Rendered {
    Rendered {
        subject: "Leave Request Approved".to_string(),
        body: format!(
            "Hi {name},\n\n\
             Your leave request has been approved.\n\n\
             From: {start}\n\
             To: {end}\n\n\
             Enjoy your time off!\n\n\
             Best regards,\nClassBook Team"
        ),
    }
}

pub fn timesheet_approved(name: &str, hours: f64, date: NaiveDate) -> Rendered {
    Rendered {
        subject: "Timesheet Approved".to_string(),
        body: format!(
            "Hi {name},\n\n\
             Your timesheet has been approved.\n\n\
             Hours: {hours}\n\
             Date: {date}\n\n\
             Best regards,\nClassBook Team"
        ),
    }
}

pub fn new_student_signup(admin_name: &str, student_name: &str, student_email: &str) -> Rendered {
    Rendered {
        subject: "New Student Registration".to_string(),
        body: format!(
            "Hi {admin_name},\n\n\
             A new student has registered!\n\n\
             Name: {student_name}\n\
             Email: {student_email}\n\n\
             Please review their account in the admin dashboard.\n\n\
             Best regards,\nClassBook System"
        ),
    }
}
