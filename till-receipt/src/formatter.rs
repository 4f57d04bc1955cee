//! Receipt formatter
//!
//! Turns an [`Order`] into the print directives of a customer receipt.
//! Pure: no I/O, never fails. Missing optional fields drop their line or
//! section instead of printing blanks.

use chrono_tz::Tz;
use rust_decimal::{Decimal, RoundingStrategy};
use till_printer::{Alignment, Emphasis, PrintDirective, TextSize};

use crate::order::Order;

/// Character width of the separator line
pub const RECEIPT_WIDTH: usize = 32;

/// Currency symbol prefixed to every amount
pub const CURRENCY_SYMBOL: &str = "€";

/// Receipt formatter
///
/// Layout is fixed; only the restaurant name and the time zone used to
/// render timestamps are configurable.
#[derive(Debug, Clone)]
pub struct ReceiptFormatter {
    restaurant_name: String,
    timezone: Tz,
}

impl ReceiptFormatter {
    pub fn new(restaurant_name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            restaurant_name: restaurant_name.into(),
            timezone,
        }
    }

    /// Format an order into print directives
    pub fn format(&self, order: &Order) -> Vec<PrintDirective> {
        let mut out = Vec::with_capacity(64 + order.items.len() * 3);

        self.render_header(&mut out);
        self.render_order_info(&mut out, order);
        self.render_customer(&mut out, order);
        self.render_items(&mut out, order);
        self.render_totals(&mut out, order);
        self.render_extras(&mut out, order);
        self.render_footer(&mut out);

        out
    }

    fn render_header(&self, out: &mut Vec<PrintDirective>) {
        out.push(PrintDirective::SetAlignment(Alignment::Center));
        out.push(PrintDirective::SetSize(TextSize::DoubleWidthHeight));
        out.push(PrintDirective::line(&self.restaurant_name));
        out.push(PrintDirective::SetSize(TextSize::Normal));
        out.push(PrintDirective::SetAlignment(Alignment::Left));
        out.push(separator());
    }

    fn render_order_info(&self, out: &mut Vec<PrintDirective>, order: &Order) {
        out.push(PrintDirective::line(format!("Order #: {}", order.order_id)));
        out.push(PrintDirective::line(format!(
            "Date: {}",
            format_timestamp(order.created_at, self.timezone, "%d/%m/%Y")
        )));
        out.push(PrintDirective::line(format!(
            "Time: {}",
            format_timestamp(order.created_at, self.timezone, "%H:%M")
        )));
        out.push(separator());
    }

    fn render_customer(&self, out: &mut Vec<PrintDirective>, order: &Order) {
        let fields = [
            ("Customer", &order.customer.name),
            ("Phone", &order.customer.phone),
            ("Pickup", &order.pickup_location),
        ];

        for (label, value) in fields {
            let value = value.trim();
            if !value.is_empty() {
                out.push(PrintDirective::line(format!("{}: {}", label, value)));
            }
        }
        out.push(separator());
    }

    fn render_items(&self, out: &mut Vec<PrintDirective>, order: &Order) {
        out.push(PrintDirective::line("ITEMS ORDERED:"));

        for item in &order.items {
            out.push(PrintDirective::line(format!(
                "{}x {}",
                item.quantity, item.name
            )));

            let extras: Vec<&str> = item
                .customizations
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .collect();
            if !extras.is_empty() {
                out.push(PrintDirective::line(format!("   + {}", extras.join(", "))));
            }

            out.push(PrintDirective::line(format!(
                "   {}",
                format_money(item.line_total())
            )));
        }
    }

    fn render_totals(&self, out: &mut Vec<PrintDirective>, order: &Order) {
        out.push(separator());
        out.push(PrintDirective::line(format!(
            "Subtotal: {}",
            format_money(order.subtotal)
        )));
        out.push(PrintDirective::line(format!("Tax: {}", format_money(order.tax))));
        out.push(PrintDirective::SetEmphasis(Emphasis::On));
        out.push(PrintDirective::line(format!(
            "TOTAL: {}",
            format_money(order.total)
        )));
        out.push(PrintDirective::SetEmphasis(Emphasis::Off));
        out.push(separator());
    }

    fn render_extras(&self, out: &mut Vec<PrintDirective>, order: &Order) {
        if let Some(ref note) = order.special_instructions
            && !note.trim().is_empty()
        {
            out.push(PrintDirective::line("SPECIAL INSTRUCTIONS:"));
            out.push(PrintDirective::line(note.trim()));
            out.push(separator());
        }

        if let Some(ready_at) = order.estimated_ready_at {
            out.push(PrintDirective::line(format!(
                "Estimated Ready Time: {}",
                format_timestamp(ready_at, self.timezone, "%H:%M")
            )));
        }
    }

    fn render_footer(&self, out: &mut Vec<PrintDirective>) {
        out.push(PrintDirective::line("Thank you for your order!"));
        out.push(PrintDirective::line("Please come again!"));
        out.push(PrintDirective::FeedLines(2));

        // Trailing feed clears the cutter
        out.push(PrintDirective::CutPaper);
        out.push(PrintDirective::FeedLines(3));
    }
}

impl Default for ReceiptFormatter {
    fn default() -> Self {
        Self::new("KEBAB HOUSE", chrono_tz::Europe::Berlin)
    }
}

fn separator() -> PrintDirective {
    PrintDirective::line("=".repeat(RECEIPT_WIDTH))
}

/// `€12.50` - two decimals, symbol first, independent of locale
///
/// Amounts are rounded half away from zero; anything that rounds to zero
/// prints as `€0.00`, never `€-0.00`.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{}{:.2}", CURRENCY_SYMBOL, rounded)
}

/// Format unix timestamp (millis) in the given timezone
fn format_timestamp(ts: i64, tz: Tz, pattern: &str) -> String {
    match chrono::DateTime::from_timestamp_millis(ts) {
        Some(dt) => dt.with_timezone(&tz).format(pattern).to_string(),
        None => "Unknown".to_string(),
    }
}
