use crate::data_models::ContactSubmission;

pub const NOTIFICATION_SUBJECT: &str = "New contact form submission";
pub const ACKNOWLEDGMENT_SUBJECT: &str = "Thanks for getting in touch";

/// Replaces `& < > " '` with their HTML entities and leaves everything else alone.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escapes first, then turns line breaks into `<br>`.
pub fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// User-supplied fields, already escaped for interpolation.
struct EscapedSubmission {
    name: String,
    email: String,
    message: String,
}

impl From<&ContactSubmission> for EscapedSubmission {
    fn from(submission: &ContactSubmission) -> Self {
        Self {
            name: escape_html(&submission.name),
            email: escape_html(&submission.email),
            message: escape_multiline(&submission.message),
        }
    }
}

/// Body of the email sent to the site operator.
pub fn notification_html(submission: &ContactSubmission) -> String {
    let EscapedSubmission {
        name,
        email,
        message,
    } = submission.into();
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2933;">
    <h2>New contact form submission</h2>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
    <p><strong>Message:</strong></p>
    <div style="padding: 12px; background: #f5f7fa; border-radius: 4px;">{message}</div>
  </body>
</html>"#
    )
}

/// Body of the auto-reply sent back to the person who filled in the form.
pub fn acknowledgment_html(submission: &ContactSubmission) -> String {
    let EscapedSubmission { name, message, .. } = submission.into();
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2933;">
    <h2>Thanks for reaching out, {name}!</h2>
    <p>Your message arrived and I will get back to you as soon as possible.</p>
    <p>For reference, this is what you sent:</p>
    <div style="padding: 12px; background: #f5f7fa; border-radius: 4px;">{message}</div>
  </body>
</html>"#
    )
}
