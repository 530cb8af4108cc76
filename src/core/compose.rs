use crate::core::{ConfigProvider, ContactSubmission, OutboundEmail, Result};
use askama::Template;

#[derive(Template)]
#[template(path = "emails/contact.html")]
struct ContactHtmlEmail<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "emails/contact.txt")]
struct ContactTextEmail<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// 主旨只允許單行
fn subject_line(prefix: &str, name: &str) -> String {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{} {}", prefix.trim(), name)
}

/// Build the owner-facing email for one submission. User text in the HTML
/// part goes through the template's HTML escaper; the text part is raw.
pub fn compose_email<C: ConfigProvider + ?Sized>(
    config: &C,
    submission: &ContactSubmission,
) -> Result<OutboundEmail> {
    let html = ContactHtmlEmail {
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
    }
    .render()?;

    let text = ContactTextEmail {
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
    }
    .render()?;

    Ok(OutboundEmail {
        from: config.sender().to_string(),
        to: vec![config.recipient().to_string()],
        reply_to: submission.email.clone(),
        subject: subject_line(config.subject_prefix(), &submission.name),
        text,
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestConfig;

    impl ConfigProvider for TestConfig {
        fn sender(&self) -> &str {
            "Portfolio Contact <onboarding@resend.dev>"
        }

        fn recipient(&self) -> &str {
            "owner@example.com"
        }

        fn subject_prefix(&self) -> &str {
            "Portfolio contact from"
        }
    }

    fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_compose_addresses_and_subject() {
        let email = compose_email(&TestConfig, &submission("Jane", "jane@x.com", "Hi")).unwrap();

        assert_eq!(email.from, "Portfolio Contact <onboarding@resend.dev>");
        assert_eq!(email.to, vec!["owner@example.com".to_string()]);
        assert_eq!(email.reply_to, "jane@x.com");
        assert_eq!(email.subject, "Portfolio contact from Jane");
    }

    #[test]
    fn test_text_body_restates_sender() {
        let email = compose_email(
            &TestConfig,
            &submission("Jane", "jane@x.com", "Hello\nsecond line"),
        )
        .unwrap();

        assert!(email.text.starts_with("Hello\nsecond line"));
        assert!(email.text.contains("From: Jane"));
        assert!(email.text.contains("Reply to: jane@x.com"));
    }

    /// `&` 後面必須是實體，否則就是未轉義的使用者輸入
    fn bare_ampersands(html: &str) -> usize {
        let entity = regex::Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap();
        html.matches('&').count() - entity.find_iter(html).count()
    }

    #[test]
    fn test_html_body_escapes_user_text() {
        let email = compose_email(
            &TestConfig,
            &submission(
                "<b>Mallory</b>",
                "m@x.com",
                r#"<script>alert("pwned")</script> & 'single' "quoted""#,
            ),
        )
        .unwrap();

        // 使用者輸入不可出現任何開啟標籤或未轉義的 & 與引號
        assert!(!email.html.contains("<script"));
        assert!(!email.html.contains("</script"));
        assert!(!email.html.contains("<b>"));
        assert!(!email.html.contains(r#""quoted""#));
        assert!(!email.html.contains("'single'"));
        assert_eq!(bare_ampersands(&email.html), 0);

        // 內容本身仍保留
        assert!(email.html.contains("Mallory"));
        assert!(email.html.contains("pwned"));
        assert!(email.html.contains("&#60;script&#62;"));
        assert!(email.html.contains("&#38;"));
    }

    #[test]
    fn test_html_body_template_markup_is_untouched() {
        let email = compose_email(&TestConfig, &submission("Jane", "jane@x.com", "Hi")).unwrap();

        assert!(email.html.contains("<strong>From:</strong> Jane"));
        assert!(email.html.contains("<strong>Reply to:</strong> jane@x.com"));
        assert_eq!(bare_ampersands(&email.html), 0);
    }

    #[test]
    fn test_subject_collapses_line_breaks() {
        let email = compose_email(
            &TestConfig,
            &submission("Jane\r\nBcc: someone@else.com", "jane@x.com", "Hi"),
        )
        .unwrap();

        assert!(!email.subject.contains('\n'));
        assert!(!email.subject.contains('\r'));
        assert_eq!(
            email.subject,
            "Portfolio contact from Jane Bcc: someone@else.com"
        );
    }
}
