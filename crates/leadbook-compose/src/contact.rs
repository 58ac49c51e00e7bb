//! Greeting and WhatsApp deep links

/// WhatsApp click-to-chat base
pub const WHATSAPP_BASE: &str = "https://wa.me/";

/// `"Hi {first name},"`
#[must_use]
pub fn greeting(name: &str) -> String {
    let first = name.split_whitespace().next().unwrap_or("there");
    format!("Hi {first},")
}

/// Greeting followed by `body`
#[must_use]
pub fn compose_with_greeting(name: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        greeting(name)
    } else {
        format!("{} {body}", greeting(name))
    }
}

/// Click-to-chat URL carrying `message` as prefilled text.
///
/// Everything in `phone` except digits is dropped.
#[must_use]
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let number: String = phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{WHATSAPP_BASE}{number}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn greets_by_first_name() {
        assert_eq!(greeting("Ada Lovelace"), "Hi Ada,");
        assert_eq!(greeting("  Grace  "), "Hi Grace,");
        assert_eq!(greeting(""), "Hi there,");
    }

    #[test]
    fn body_follows_greeting() {
        assert_eq!(
            compose_with_greeting("Ada Lovelace", "Free for a call?"),
            "Hi Ada, Free for a call?"
        );
        assert_eq!(compose_with_greeting("Ada", "  "), "Hi Ada,");
    }

    #[test]
    fn link_strips_phone_formatting() {
        assert_eq!(
            whatsapp_link("+1 (555) 010-0200", "Hi Ada, free?"),
            "https://wa.me/15550100200?text=Hi%20Ada%2C%20free%3F"
        );
        assert_eq!(
            whatsapp_link("+44 20 7946 0001", ""),
            "https://wa.me/442079460001?text="
        );
    }
}
