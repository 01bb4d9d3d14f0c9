//! # Quote Rendering
//!
//! Plain-text summary of a priced quote, for terminals and e-mail bodies.
//!
//! ```text
//! Quote 2026-00001
//! Customer: Maria Souza <maria@example.com>
//! Installation: Campinas (Ceramic tile roof)
//! System: 6.30 kWp DC / 5.00 kW AC
//! ...
//!  Qty  Component                               Part code       Unit price         Total
//!   10  Solar Panel: JA Solar 630Wp ...         18096678     R$ 1.362,85   R$ 13.628,50
//! ...
//! Final price:                                                                R$ 10.733,00
//! ```

use std::fmt::Write;

use crate::types::{PaymentType, PricedQuote, QuoteConfiguration};

const NAME_WIDTH: usize = 48;
const RULE_WIDTH: usize = 100;

/// Renders a quote for display.
pub fn render_summary(quote: &PricedQuote, config: &QuoteConfiguration) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, quote, config);
    out
}

fn write_summary(
    out: &mut String,
    quote: &PricedQuote,
    config: &QuoteConfiguration,
) -> std::fmt::Result {
    let rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "Quote {}", quote.quote_number)?;
    match config.phone.as_deref() {
        Some(phone) => writeln!(
            out,
            "Customer: {} <{}> {}",
            config.customer_name, config.email, phone
        )?,
        None => writeln!(out, "Customer: {} <{}>", config.customer_name, config.email)?,
    }
    writeln!(
        out,
        "Installation: {} ({} roof)",
        quote.installation_city, config.roof_type
    )?;
    writeln!(
        out,
        "System: {:.2} kWp DC / {:.2} kW AC",
        quote.system_size_kwp, quote.ac_capacity_kw
    )?;
    writeln!(out, "{}", quote.inverter_note)?;

    if !quote.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for warning in &quote.warnings {
            writeln!(out, "  ! {warning}")?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:>4}  {:<NAME_WIDTH$}  {:<12}  {:>14}  {:>14}",
        "Qty", "Component", "Part code", "Unit price", "Total"
    )?;
    writeln!(out, "{rule}")?;
    for item in &quote.line_items {
        writeln!(
            out,
            "{:>4}  {:<NAME_WIDTH$}  {:<12}  {:>14}  {:>14}",
            item.quantity,
            truncate(&item.name, NAME_WIDTH),
            item.part_code.as_deref().unwrap_or("-"),
            item.unit_price.to_string(),
            item.total_price.to_string()
        )?;
        if let Some(note) = &item.note {
            writeln!(out, "      ({note})")?;
        }
    }
    writeln!(out, "{rule}")?;

    writeln!(
        out,
        "{:<70}{:>30}",
        "Components total:",
        quote.total_component_cost.to_string()
    )?;
    writeln!(out, "{}", quote.applied_discount_description)?;
    writeln!(
        out,
        "{:<70}{:>30}",
        "Final price:",
        quote.final_discounted_price.to_string()
    )?;

    writeln!(out)?;
    match (quote.payment_type, &quote.payment) {
        (PaymentType::Card, Some(p)) => {
            writeln!(
                out,
                "Payment: credit card, {} ({:.2}%)",
                p.term_description,
                p.financing_rate.percentage()
            )?;
            writeln!(out, "  Financing cost:       {}", p.financing_cost)?;
            writeln!(out, "  Total with financing: {}", p.total_with_financing)?;
            writeln!(
                out,
                "  Installments:         {}x {}",
                p.installment_count, p.installment_value
            )?;
        }
        (PaymentType::Card, None) => writeln!(out, "Payment: credit card")?,
        (PaymentType::Cash, _) => writeln!(out, "Payment: cash")?,
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('~');
        cut
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
