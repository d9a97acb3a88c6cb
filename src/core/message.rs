//! Client-facing message text. Pure functions, nothing is sent from here.

use crate::entities::QuoteType;

/// Follow-up text staff send to a client about a quote request.
///
/// The product name is only mentioned for existing-product requests that still
/// have their product attached.
#[must_use]
pub fn follow_up_message(
    client_name: &str,
    quote_type: QuoteType,
    product_name: Option<&str>,
    business_name: &str,
) -> String {
    let subject = match (quote_type, product_name) {
        (QuoteType::Existing, Some(product)) => format!(" for {product}"),
        _ => String::new(),
    };
    format!(
        "Hello {client_name}, thank you for your quote request{subject}. \
         We will review your requirements and get back to you soon. - {business_name}"
    )
}

/// Text shown to the visitor right after a successful submission.
#[must_use]
pub fn confirmation_message(product_name: Option<&str>, phone_number: &str) -> String {
    product_name.map_or_else(
        || {
            format!(
                "Your custom project quote request has been submitted successfully! \
                 We will contact you at {phone_number} soon."
            )
        },
        |product| {
            format!(
                "Your quote request for {product} has been submitted successfully! \
                 We will contact you at {phone_number} soon."
            )
        },
    )
}
