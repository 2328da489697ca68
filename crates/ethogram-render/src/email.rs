//! Notification email renderer
//!
//! Produces the subject line and HTML body sent to the submitting
//! observer. Delivery is the caller's concern; the rendered workbook is
//! attached once and shared by every recipient.

use ethogram_core::ObservationRecord;

/// A file attached to the notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// A rendered, transport-agnostic notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

impl EmailMessage {
    /// Attach an already-rendered workbook
    pub fn attach(mut self, filename: impl Into<String>, content: Vec<u8>) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            content,
        });
        self
    }
}

/// Notification email renderer
#[derive(Clone, Debug)]
pub struct EmailRenderer {
    /// Prefix of the subject line
    pub subject_prefix: String,
    /// Heading of the message body
    pub heading: String,
    /// Signature line
    pub signature: String,
}

impl Default for EmailRenderer {
    fn default() -> Self {
        Self {
            subject_prefix: "Your WBS Ethogram Observation".into(),
            heading: "Your WBS Ethogram Observation".into(),
            signature: "World Bird Sanctuary Ethogram Team".into(),
        }
    }
}

impl EmailRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signature line
    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Subject line: prefix, date and start time
    pub fn subject(&self, record: &ObservationRecord) -> String {
        format!(
            "{} - {} {}",
            self.subject_prefix,
            record.observation_date.format("%Y-%m-%d"),
            record.start_time
        )
    }

    /// Render the notification for every address on the record
    pub fn render(&self, record: &ObservationRecord) -> EmailMessage {
        EmailMessage {
            recipients: record.emails.clone(),
            subject: self.subject(record),
            html_body: self.html_body(record),
            attachment: None,
        }
    }

    fn html_body(&self, record: &ObservationRecord) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<style>\n\
             body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }\n\
             .container { max-width: 600px; margin: 0 auto; padding: 20px; }\n\
             .header { background-color: #4A90E2; color: white; padding: 20px; border-radius: 5px 5px 0 0; }\n\
             .content { background-color: #f9f9f9; padding: 20px; border-radius: 0 0 5px 5px; }\n\
             .detail-label { font-weight: bold; display: inline-block; width: 150px; }\n\
             .footer { margin-top: 20px; border-top: 1px solid #ddd; font-size: 0.9em; color: #666; }\n\
             </style>\n",
        );
        html.push_str("</head>\n<body>\n<div class=\"container\">\n");

        html.push_str(&format!(
            "<div class=\"header\"><h2>{}</h2></div>\n",
            html_escape(&self.heading)
        ));

        html.push_str("<div class=\"content\">\n");
        html.push_str(&format!("<p>Hi {},</p>\n", html_escape(&record.observer_name)));
        html.push_str(&format!(
            "<p>Thank you for submitting your behavioral observation of <strong>{}</strong> at <strong>{}</strong>!</p>\n",
            html_escape(&record.patient),
            html_escape(&record.aviary)
        ));

        html.push_str("<h3>Observation Details:</h3>\n");
        let details = [
            ("Date:", record.observation_date.format("%Y-%m-%d").to_string()),
            ("Time:", format!("{} - {}", record.start_time, record.end_time)),
            ("Mode:", record.mode.display_name().to_string()),
        ];
        for (label, value) in details {
            html.push_str(&format!(
                "<div class=\"detail-row\"><span class=\"detail-label\">{}</span> {}</div>\n",
                label,
                html_escape(&value)
            ));
        }

        html.push_str(
            "<p>Your Excel file is attached. It contains your observation data in the standard \
             ethogram format with metadata header rows and a behavioral matrix layout.</p>\n",
        );

        html.push_str("<div class=\"footer\">\n");
        html.push_str("<p>If you have any questions or notice any issues, please reply to this email.</p>\n");
        html.push_str("<p>Thank you for contributing to our research!</p>\n");
        html.push_str(&format!("<p><strong>{}</strong></p>\n", html_escape(&self.signature)));
        html.push_str("</div>\n</div>\n</div>\n</body>\n</html>\n");

        html
    }
}

/// HTML-escape a string
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
