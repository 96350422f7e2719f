//! WhatsApp order-intent composer.
//!
//! Builds the pre-filled chat message a shopper sends when ordering a product
//! and embeds it in the store's `wa.me` deep link.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::entities::ProductRecord;

pub const ORDER_GREETING: &str = "Halo Maher Bites, saya ingin pesan:";

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent<'a> {
    product_name: &'a str,
    quantity: u32,
    variant_label: Option<&'a str>,
    note: Option<&'a str>,
}

impl<'a> OrderIntent<'a> {
    pub fn new(product: &'a ProductRecord) -> Self {
        Self::for_name(&product.name)
    }

    pub fn for_name(product_name: &'a str) -> Self {
        Self {
            product_name,
            quantity: 1,
            variant_label: None,
            note: None,
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn variant(mut self, label: Option<&'a str>) -> Self {
        self.variant_label = present(label);
        self
    }

    pub fn note(mut self, note: Option<&'a str>) -> Self {
        self.note = present(note);
        self
    }

    /// Line-structured message; absent variant or note produce no line at all.
    pub fn message(&self) -> String {
        let mut lines = Vec::with_capacity(5);
        lines.push(ORDER_GREETING.to_string());
        lines.push(format!("• Produk: {}", self.product_name));
        if let Some(variant) = self.variant_label {
            lines.push(format!("• Varian: {variant}"));
        }
        lines.push(format!("• Qty: {}", self.quantity));
        if let Some(note) = self.note {
            lines.push(format!("• Catatan: {note}"));
        }
        lines.join("\n")
    }

    /// Deep link of the form `{whatsapp_url}?text={percent-encoded message}`.
    pub fn link(&self, whatsapp_url: &str) -> String {
        format!(
            "{whatsapp_url}?text={}",
            encode_uri_component(&self.message())
        )
    }
}

/// Percent-encode `value` for use inside a query string.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
