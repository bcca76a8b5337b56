use common::domain::NotificationKind;

/// Rendered email content for one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

/// Render the email for a notification, selecting the template that
/// matches its kind. Every kind maps onto the shared layout with its own
/// heading and accent; the plain layout doubles as the generic fallback
/// for content that fits no specific template.
pub fn render(kind: NotificationKind, title: &str, body: &str) -> EmailContent {
    match kind {
        NotificationKind::Payment => layout("Payment update", "#1f7a4d", title, body),
        NotificationKind::Maintenance => layout("Maintenance notice", "#b3541e", title, body),
        NotificationKind::Announcement => layout("Announcement", "#2456a6", title, body),
        NotificationKind::Meeting => layout("Meeting", "#5b3aa6", title, body),
        NotificationKind::Document => layout("New document", "#44616e", title, body),
    }
}

/// Generic rendering used when no kind-specific template applies
pub fn render_generic(title: &str, body: &str) -> EmailContent {
    layout("Notification", "#444444", title, body)
}

fn layout(heading: &str, accent: &str, title: &str, body: &str) -> EmailContent {
    let subject = format!("{}: {}", heading, title);
    let html_body = format!(
        r#"<div style="font-family:sans-serif;max-width:600px;margin:0 auto">
  <div style="background:{accent};color:#ffffff;padding:12px 16px;border-radius:4px 4px 0 0">
    <strong>{heading}</strong>
  </div>
  <div style="border:1px solid #e0e0e0;border-top:none;padding:16px;border-radius:0 0 4px 4px">
    <h2 style="margin-top:0">{title}</h2>
    <p>{body}</p>
    <p style="color:#888888;font-size:12px">You are receiving this because you are a resident of this building.</p>
  </div>
</div>"#,
        accent = accent,
        heading = escape_html(heading),
        title = escape_html(title),
        body = escape_html(body),
    );
    EmailContent { subject, html_body }
}

/// Minimal HTML escaping for user-provided text interpolated into the body
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
