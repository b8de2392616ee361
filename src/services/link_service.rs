use uuid::Uuid;

use crate::error::{AppError, Result};

const WHATSAPP_BASE: &str = "https://wa.me";

/// Builds a WhatsApp deep link that opens a chat with `phone` pre-filled with
/// the product's name, code, color and page link, one per line.
///
/// Fails with a validation error when `phone` contains no digits; callers are
/// expected to hide the contact action in that case.
pub fn whatsapp_link(
    phone: &str,
    name: &str,
    code: Option<&str>,
    color: Option<&str>,
    product_url: &str,
) -> Result<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(AppError::ValidationError(
            "WhatsApp number must contain at least one digit".to_string(),
        ));
    }

    let mut lines = vec![name.to_string()];
    if let Some(code) = code.filter(|c| !c.trim().is_empty()) {
        lines.push(format!("Code: {}", code));
    }
    if let Some(color) = color.filter(|c| !c.trim().is_empty()) {
        lines.push(format!("Color: {}", color));
    }
    lines.push(format!("Link: {}", product_url));

    let message = lines.join("\n");

    Ok(format!(
        "{}/{}?text={}",
        WHATSAPP_BASE,
        digits,
        urlencoding::encode(&message)
    ))
}

/// Public page of a product on the shop front.
pub fn product_page_url(storefront_url: &str, product_id: Uuid) -> String {
    format!(
        "{}/products/{}",
        storefront_url.trim_end_matches('/'),
        product_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_message(link: &str) -> String {
        let (_, encoded) = link.split_once("?text=").expect("link has a text parameter");
        urlencoding::decode(encoded)
            .expect("message is valid percent-encoding")
            .into_owned()
    }

    #[test]
    fn builds_link_with_all_lines_in_order() {
        let link = whatsapp_link(
            "+1 (555) 010-2030",
            "Satin Enamel",
            Some("SE-200"),
            Some("Ivory"),
            "https://shop.example.com/products/42",
        )
        .unwrap();

        assert!(link.starts_with("https://wa.me/15550102030?text="));
        assert_eq!(
            decoded_message(&link),
            "Satin Enamel\nCode: SE-200\nColor: Ivory\nLink: https://shop.example.com/products/42"
        );
    }

    #[test]
    fn omits_absent_optional_lines() {
        let link = whatsapp_link("5550100", "Primer", None, Some(""), "https://x/p/1").unwrap();

        let message = decoded_message(&link);
        assert_eq!(message, "Primer\nLink: https://x/p/1");
        assert!(message.lines().any(|line| line == "Primer"));
    }

    #[test]
    fn message_is_percent_encoded() {
        let link = whatsapp_link("123", "A & B", None, None, "https://x/?a=1").unwrap();
        let query = link.split_once("?text=").unwrap().1;

        assert!(!query.contains(' '));
        assert!(!query.contains('&'));
        assert!(!query.contains('\n'));
    }

    #[test]
    fn rejects_numbers_without_digits() {
        let err = whatsapp_link("+ ( ) -", "Primer", None, None, "https://x").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert!(whatsapp_link("", "Primer", None, None, "https://x").is_err());
    }

    #[test]
    fn product_page_url_tolerates_trailing_slash() {
        let id = Uuid::nil();
        assert_eq!(
            product_page_url("https://shop.example.com/", id),
            format!("https://shop.example.com/products/{}", id)
        );
    }
}
