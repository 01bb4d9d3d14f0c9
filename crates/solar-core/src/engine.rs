//! # Quote Engine
//!
//! Turns a configuration into a priced bill of materials.
//!
//! ## Derivation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     price_configuration()                               │
//! │                                                                         │
//! │  validate ──► panels ──► compatibility ──► microinverters               │
//! │   (fatal)        │                              │                       │
//! │                  │          units ──────────────┤                       │
//! │                  ▼                              ▼                       │
//! │            surge protectors ──► AC connectors ──► AC trunk cable        │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │            inverter supports ──► structures ──► breakers (per string)   │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                       Σ totals ──► × multiplier ──► card financing      │
//! │                                                                         │
//! │  Missing SUPPORTING rows never fail the quote: they become zero-cost   │
//! │  placeholder lines so the operator sees what to register.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## String Partition
//! Microinverters are chained on AC trunk strings of at most
//! [`MAX_SERIAL_ASSOCIATION`] units. Every string is full except the last,
//! which holds the remainder (or a full string when the division is exact).
//! Each string gets one breaker chosen by `(model, micros in string)`.

use crate::catalog::{Catalog, Inverter, IntegratorProfile, Panel, ProtectionType};
use crate::discount::DiscountProfile;
use crate::error::{CoreError, CoreResult};
use crate::financing::financing_breakdown;
use crate::money::Money;
use crate::numbering::QuoteNumber;
use crate::types::{
    round2, ComponentLineItem, PaymentType, PricedQuote, QuoteConfiguration, RoofType,
};

// =============================================================================
// Constants
// =============================================================================

/// Maximum microinverters chained on one AC trunk string.
pub const MAX_SERIAL_ASSOCIATION: u32 = 5;

/// Trunk cable meters budgeted per AC connector.
pub const CABLE_METERS_PER_AC_CONNECTOR: u32 = 10;

/// Surge protectors per system (single-phase install).
pub const SURGE_PROTECTORS_PER_SYSTEM: u32 = 2;

/// Panels per micro when the catalog leaves it unset.
pub const DEFAULT_PANELS_PER_MICRO: u32 = 2;

/// Microinverter with a reduced rated input.
pub const LOW_POWER_MICRO_MODEL: &str = "SIW100G M010 W00";

/// Rated panel input of [`LOW_POWER_MICRO_MODEL`], in Wp.
pub const LOW_POWER_MICRO_MAX_INPUT_WP: u32 = 630;

/// Part code of the preferred (HR/HSR) microinverter support.
pub const HR_HSR_SUPPORT_PART_CODE: &str = "17702839";

/// Note attached to every placeholder line.
pub const PENDING_REGISTRATION: &str = "pending catalog registration";

// =============================================================================
// Bill of Materials
// =============================================================================

/// Line items and warnings accumulated while deriving components.
#[derive(Debug, Default)]
struct BillOfMaterials {
    items: Vec<ComponentLineItem>,
    warnings: Vec<String>,
}

impl BillOfMaterials {
    fn push(&mut self, item: ComponentLineItem) {
        self.items.push(item);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn total(&self) -> Money {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Adds one breaker, merging into an identical existing line.
    fn push_breaker(&mut self, item: ComponentLineItem) {
        let existing = self
            .items
            .iter_mut()
            .find(|i| i.part_code == item.part_code && i.name == item.name);
        match existing {
            Some(line) => line.increment(),
            None => self.items.push(item),
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Prices one configuration against a catalog snapshot.
///
/// Pure: the same inputs always yield the same quote (apart from the
/// quote number, which is passed in).
///
/// ## Errors
/// - [`CoreError::InvalidInput`] when `panel_count` is zero
/// - [`CoreError::NotFound`] when the panel or microinverter does not resolve
/// - [`CoreError::MissingPrice`] when either has no southeast price
pub fn price_configuration(
    config: &QuoteConfiguration,
    catalog: &Catalog,
    integrator: Option<&IntegratorProfile>,
    quote_number: QuoteNumber,
) -> CoreResult<PricedQuote> {
    // -------------------------------------------------------------------------
    // Fatal validation
    // -------------------------------------------------------------------------
    let panel_count = config.panel_count;
    if panel_count == 0 {
        return Err(CoreError::InvalidInput(
            "panel count must be greater than zero".to_string(),
        ));
    }

    let panel = catalog
        .panel(&config.panel_id)
        .ok_or_else(|| CoreError::NotFound("panel details not found".to_string()))?;
    let panel_price = panel.price.southeast.ok_or_else(|| {
        CoreError::MissingPrice(format!(
            "southeast price not set for panel {}",
            panel.display_name()
        ))
    })?;

    let micro = catalog.microinverter(&config.microinverter_id).ok_or_else(|| {
        CoreError::NotFound("selected microinverter not found or invalid".to_string())
    })?;
    let micro_price = micro.price.southeast.ok_or_else(|| {
        CoreError::MissingPrice(format!(
            "southeast price not set for microinverter {}",
            micro.display_name()
        ))
    })?;

    let mut bom = BillOfMaterials::default();

    // 1. Panels
    bom.push(ComponentLineItem::priced(
        format!("Solar Panel: {}", panel.display_name()),
        panel_count,
        panel_price,
        panel.part_code.clone(),
    ));
    let system_size_kwp = round2(panel.power_wp as f64 * panel_count as f64 / 1000.0);

    // 2. Compatibility
    check_compatibility(panel, micro, &mut bom);

    // 3. Microinverters
    let panels_per_micro = if micro.max_panels_per_unit > 0 {
        micro.max_panels_per_unit
    } else {
        DEFAULT_PANELS_PER_MICRO
    };
    let micro_units = panel_count.div_ceil(panels_per_micro);
    let ac_capacity_kw = micro_units as f64 * micro.power_kw;
    bom.push(ComponentLineItem::priced(
        format!("Microinverter: {}", micro.display_name()),
        micro_units,
        micro_price,
        micro.part_code.clone(),
    ));
    let inverter_note = format!(
        "{} microinverter(s) {} ({} panels/micro). Total AC power: {:.2} kW.",
        micro_units,
        micro.display_name(),
        panels_per_micro,
        ac_capacity_kw
    );

    // 4-6. AC side
    add_surge_protectors(catalog, &mut bom);
    let connectors = micro_units.div_ceil(MAX_SERIAL_ASSOCIATION);
    add_ac_connectors(catalog, micro, connectors, &mut bom);
    add_trunk_cable(catalog, connectors, &mut bom);

    // 7-8. Mounting
    if config.roof_type != RoofType::Metal {
        add_inverter_supports(catalog, config.roof_type, micro_units, &mut bom);
    }
    add_structures(catalog, config.roof_type, panel_count, &mut bom);

    // 9. Breakers
    add_breakers(catalog, micro, micro_units, &mut bom);

    // 10. Discount
    let total_component_cost = bom.total();
    let discount = DiscountProfile::from_integrator(integrator);
    let multiplier = discount.multiplier();
    let final_discounted_price = total_component_cost.apply_multiplier(multiplier);

    // 11. Financing
    let payment = match (config.payment_type, config.credit_card_term_id.as_deref()) {
        (PaymentType::Card, Some(term_id)) => catalog
            .card_term(term_id)
            .map(|term| financing_breakdown(final_discounted_price, term)),
        _ => None,
    };

    Ok(PricedQuote {
        quote_number,
        installation_city: config.installation_city.clone(),
        system_size_kwp,
        ac_capacity_kw: round2(ac_capacity_kw),
        inverter_note,
        line_items: bom.items,
        total_component_cost,
        discount_multiplier: multiplier,
        final_discounted_price,
        warnings: bom.warnings,
        payment_type: config.payment_type,
        payment,
        applied_discount_description: discount.description(),
    })
}

// =============================================================================
// Derivation Steps
// =============================================================================

fn check_compatibility(panel: &Panel, micro: &Inverter, bom: &mut BillOfMaterials) {
    if micro.model_name == LOW_POWER_MICRO_MODEL && panel.power_wp > LOW_POWER_MICRO_MAX_INPUT_WP {
        bom.warn(format!(
            "Warning: panel {} ({}Wp) exceeds the {}Wp maximum input of microinverter {}. \
             Consider a lower-power panel or a different microinverter.",
            panel.display_name(),
            panel.power_wp,
            LOW_POWER_MICRO_MAX_INPUT_WP,
            micro.model_name
        ));
    }
}

fn add_surge_protectors(catalog: &Catalog, bom: &mut BillOfMaterials) {
    let protector = catalog
        .surge_protectors
        .iter()
        .find(|p| p.protection == ProtectionType::Ac)
        .or_else(|| catalog.surge_protectors.first());

    match protector {
        Some(p) => bom.push(ComponentLineItem::priced(
            format!("Surge Protector (AC): {}", p.name),
            SURGE_PROTECTORS_PER_SYSTEM,
            p.price,
            p.part_code.clone(),
        )),
        None => bom.push(ComponentLineItem::placeholder(
            "Surge Protector (AC)",
            SURGE_PROTECTORS_PER_SYSTEM,
            PENDING_REGISTRATION,
        )),
    }
}

fn add_ac_connectors(
    catalog: &Catalog,
    micro: &Inverter,
    connectors: u32,
    bom: &mut BillOfMaterials,
) {
    let connector = catalog
        .ac_connectors
        .iter()
        .find(|c| {
            !micro.model_name.is_empty()
                && c.compatibility_note
                    .as_deref()
                    .is_some_and(|note| note.contains(&micro.model_name))
        })
        .or_else(|| catalog.ac_connectors.first());

    match connector {
        Some(c) => bom.push(ComponentLineItem::priced(
            format!("AC Trunk Connector: {}", c.name),
            connectors,
            c.price,
            c.part_code.clone(),
        )),
        None => bom.push(ComponentLineItem::placeholder(
            "AC Trunk Connector",
            connectors,
            PENDING_REGISTRATION,
        )),
    }
}

fn add_trunk_cable(catalog: &Catalog, connectors: u32, bom: &mut BillOfMaterials) {
    let meters = connectors * CABLE_METERS_PER_AC_CONNECTOR;
    let cable = catalog
        .cables
        .iter()
        .find(|c| c.is_ac && c.mentions_microinverter())
        .or_else(|| catalog.cables.iter().find(|c| c.is_ac))
        .or_else(|| catalog.cables.first());

    match cable {
        Some(c) if c.length_per_unit_m > 0 => {
            let units = meters.div_ceil(c.length_per_unit_m);
            bom.push(
                ComponentLineItem::priced(
                    format!("AC Trunk Cable: {}", c.name),
                    units,
                    c.price,
                    c.part_code.clone(),
                )
                .with_note(format!(
                    "{}m total estimated ({}x {}m per unit).",
                    meters, units, c.length_per_unit_m
                )),
            );
        }
        _ => bom.push(ComponentLineItem::placeholder(
            "AC Trunk Cable",
            0,
            format!("{meters}m estimated; {PENDING_REGISTRATION}"),
        )),
    }
}

fn add_inverter_supports(
    catalog: &Catalog,
    roof: RoofType,
    micro_units: u32,
    bom: &mut BillOfMaterials,
) {
    let preferred = catalog
        .inverter_supports
        .iter()
        .find(|s| s.part_code.as_deref() == Some(HR_HSR_SUPPORT_PART_CODE));

    match preferred.or_else(|| catalog.inverter_supports.first()) {
        Some(support) => {
            bom.push(ComponentLineItem::priced(
                format!("Microinverter Support: {}", support.name),
                micro_units,
                support.price,
                support.part_code.clone(),
            ));
            if preferred.is_none() {
                bom.warn(format!(
                    "Warning: HR/HSR microinverter support (part {}) not found for {} roof. \
                     Using {} (part {}) as fallback.",
                    HR_HSR_SUPPORT_PART_CODE,
                    roof,
                    support.name,
                    support.part_code.as_deref().unwrap_or("N/A")
                ));
            }
        }
        None => {
            let mut line = ComponentLineItem::placeholder(
                "Microinverter Support",
                micro_units,
                format!(
                    "support for {roof} roof (HR/HSR part {HR_HSR_SUPPORT_PART_CODE} where applicable): {PENDING_REGISTRATION}"
                ),
            );
            line.part_code = Some(HR_HSR_SUPPORT_PART_CODE.to_string());
            bom.push(line);
        }
    }
}

fn add_structures(catalog: &Catalog, roof: RoofType, panel_count: u32, bom: &mut BillOfMaterials) {
    if roof == RoofType::Metal {
        let metal_ready = |size: u32| {
            catalog.structures.iter().find(|s| {
                s.fits(RoofType::Metal) && s.panels_per_unit == size && s.microinverter_ready
            })
        };

        let (Some(ten), Some(two)) = (metal_ready(10), metal_ready(2)) else {
            bom.push(ComponentLineItem::placeholder(
                "Metal Structure",
                0,
                format!("10- and/or 2-panel microinverter structures for metal roofs: {PENDING_REGISTRATION}"),
            ));
            return;
        };

        let tens = panel_count / 10;
        let twos = (panel_count % 10).div_ceil(2);
        if tens > 0 {
            bom.push(ComponentLineItem::priced(
                format!("Metal Structure: {}", ten.name),
                tens,
                ten.price,
                ten.part_code.clone(),
            ));
        }
        if twos > 0 {
            bom.push(ComponentLineItem::priced(
                format!("Metal Structure: {}", two.name),
                twos,
                two.price,
                two.part_code.clone(),
            ));
        }
        return;
    }

    let structure = catalog
        .structures
        .iter()
        .find(|s| s.fits(roof) && s.panels_per_unit == 4)
        .or_else(|| catalog.structures.iter().find(|s| s.panels_per_unit == 4));

    match structure {
        Some(s) => bom.push(ComponentLineItem::priced(
            format!("Structure ({}): {}", roof, s.name),
            panel_count.div_ceil(4),
            s.price,
            s.part_code.clone(),
        )),
        None => bom.push(ComponentLineItem::placeholder(
            format!("Structure ({roof})"),
            0,
            PENDING_REGISTRATION,
        )),
    }
}

/// Micros on each AC string: full strings, then the remainder.
pub fn string_partition(micro_units: u32) -> Vec<u32> {
    let strings = micro_units.div_ceil(MAX_SERIAL_ASSOCIATION);
    (0..strings)
        .map(|i| {
            let remainder = micro_units % MAX_SERIAL_ASSOCIATION;
            if i == strings - 1 && remainder > 0 {
                remainder
            } else {
                MAX_SERIAL_ASSOCIATION
            }
        })
        .collect()
}

fn add_breakers(catalog: &Catalog, micro: &Inverter, micro_units: u32, bom: &mut BillOfMaterials) {
    for micros in string_partition(micro_units) {
        let Some(rule) = catalog.breaker_rule(&micro.model_name, micros) else {
            bom.push(ComponentLineItem::placeholder(
                "Circuit Breaker",
                1,
                format!(
                    "no breaker rule for {} micros {}: {}",
                    micros, micro.model_name, PENDING_REGISTRATION
                ),
            ));
            continue;
        };

        match catalog.breaker_by_model(&rule.breaker_model_code) {
            Some(breaker) => bom.push_breaker(
                ComponentLineItem::priced(
                    format!("Circuit Breaker: {}", breaker.name),
                    1,
                    breaker.price,
                    breaker.part_code.clone(),
                )
                .with_note(format!("Model: {}", breaker.model_code)),
            ),
            None => bom.push(ComponentLineItem::placeholder(
                format!("Circuit Breaker ({})", rule.breaker_model_code),
                1,
                format!("model {}: {}", rule.breaker_model_code, PENDING_REGISTRATION),
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cable, CatalogItem};
    use crate::defaults::default_catalog;
    use crate::discount::integrator_multiplier;
    use crate::types::{Factor, Multiplier, RegionalPrice};

    fn config(panel_id: &str, count: u32, micro_id: &str, roof: RoofType) -> QuoteConfiguration {
        QuoteConfiguration {
            customer_name: "Maria Souza".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            installation_city: "Campinas".to_string(),
            roof_type: roof,
            panel_id: panel_id.to_string(),
            panel_count: count,
            microinverter_id: micro_id.to_string(),
            payment_type: PaymentType::Cash,
            credit_card_term_id: None,
        }
    }

    fn ja_m010(count: u32, roof: RoofType) -> QuoteConfiguration {
        config("panel-ja-630", count, "inv-weg-siw100g-m010", roof)
    }

    fn number() -> QuoteNumber {
        QuoteNumber::new(2026, 1)
    }

    fn line<'a>(quote: &'a PricedQuote, prefix: &str) -> Vec<&'a ComponentLineItem> {
        quote
            .line_items
            .iter()
            .filter(|i| i.name.starts_with(prefix))
            .collect()
    }

    #[test]
    fn test_reference_quote_ceramic_cash() {
        let quote =
            price_configuration(&ja_m010(10, RoofType::Ceramic), &default_catalog(), None, number())
                .unwrap();

        assert_eq!(quote.line_items.len(), 8);
        assert_eq!(quote.total_component_cost.cents(), 2_535_430);
        // 25354.30 × 0.42333984 = 10733.485 → 10733
        assert_eq!(quote.final_discounted_price.cents(), 1_073_300);
        assert_eq!(quote.system_size_kwp, 6.3);
        assert_eq!(quote.ac_capacity_kw, 5.0);
        assert!(quote.warnings.is_empty());
        assert!(quote.payment.is_none());
        assert_eq!(
            quote.inverter_note,
            "5 microinverter(s) Microinverter WEG SIW100G M010 W00 (2 panels/micro). Total AC power: 5.00 kW."
        );

        // Non-metal roof, 10 panels → 3 four-panel structures
        let structures = line(&quote, "Structure (");
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].quantity, 3);

        let cable = line(&quote, "AC Trunk Cable: ")[0];
        assert_eq!(cable.quantity, 10);
        assert_eq!(cable.note.as_deref(), Some("10m total estimated (10x 1m per unit)."));
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let catalog = default_catalog();
        for (count, roof) in [(1, RoofType::Slab), (23, RoofType::Metal), (57, RoofType::Other)] {
            let quote = price_configuration(&ja_m010(count, roof), &catalog, None, number()).unwrap();
            let sum: Money = quote.line_items.iter().map(|i| i.total_price).sum();
            assert_eq!(quote.total_component_cost, sum);
            for item in &quote.line_items {
                assert_eq!(item.total_price, item.unit_price * item.quantity);
            }
        }
    }

    #[test]
    fn test_metal_roof_split_and_no_supports() {
        let quote =
            price_configuration(&ja_m010(23, RoofType::Metal), &default_catalog(), None, number())
                .unwrap();

        let structures = line(&quote, "Metal Structure: ");
        assert_eq!(structures.len(), 2);
        assert!(structures[0].name.contains("10"));
        assert_eq!(structures[0].quantity, 2);
        assert_eq!(structures[1].quantity, 2);
        assert!(line(&quote, "Microinverter Support").is_empty());
    }

    #[test]
    fn test_metal_roof_exact_tens_has_no_two_panel_line() {
        let quote =
            price_configuration(&ja_m010(20, RoofType::Metal), &default_catalog(), None, number())
                .unwrap();
        let structures = line(&quote, "Metal Structure: ");
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].quantity, 2);
    }

    #[test]
    fn test_metal_roof_without_micro_ready_structures() {
        let mut catalog = default_catalog();
        for s in &mut catalog.structures {
            s.microinverter_ready = false;
        }
        let quote = price_configuration(&ja_m010(23, RoofType::Metal), &catalog, None, number())
            .unwrap();

        let structures = line(&quote, "Metal Structure");
        assert_eq!(structures.len(), 1);
        assert!(structures[0].is_placeholder());
        assert_eq!(structures[0].quantity, 0);
    }

    #[test]
    fn test_string_partition() {
        assert_eq!(string_partition(11), vec![5, 5, 1]);
        assert_eq!(string_partition(10), vec![5, 5]);
        assert_eq!(string_partition(4), vec![4]);
        assert_eq!(string_partition(1), vec![1]);
    }

    #[test]
    fn test_breakers_merge_identical_lines() {
        // 22 panels / 2 per micro = 11 micros → 3 connectors, strings 5/5/1
        let quote =
            price_configuration(&ja_m010(22, RoofType::Ceramic), &default_catalog(), None, number())
                .unwrap();

        assert_eq!(line(&quote, "AC Trunk Connector: ")[0].quantity, 3);

        let breakers = line(&quote, "Circuit Breaker");
        assert_eq!(breakers.len(), 2);
        assert!(breakers[0].name.contains("MDWP-C40-2"));
        assert_eq!(breakers[0].quantity, 2);
        assert_eq!(breakers[0].total_price.cents(), 2 * 7_305);
        assert!(breakers[1].name.contains("MDWP-C10-2"));
        assert_eq!(breakers[1].quantity, 1);
    }

    #[test]
    fn test_missing_breaker_rule_yields_one_placeholder_per_string() {
        // 40 panels / 4 per micro = 10 micros → two full strings, no rule for 5 x M024
        let cfg = config("panel-ja-630", 40, "inv-weg-siw100g-m024", RoofType::Ceramic);
        let quote = price_configuration(&cfg, &default_catalog(), None, number()).unwrap();

        let breakers = line(&quote, "Circuit Breaker");
        assert_eq!(breakers.len(), 2);
        assert!(breakers.iter().all(|b| b.is_placeholder()));

        let connector = line(&quote, "AC Trunk Connector: ")[0];
        assert!(connector.name.contains("W10"));
    }

    #[test]
    fn test_unregistered_breaker_model_yields_placeholder() {
        let mut catalog = default_catalog();
        catalog.breakers.retain(|b| b.model_code != "MDWP-C40-2");
        let quote = price_configuration(&ja_m010(10, RoofType::Ceramic), &catalog, None, number())
            .unwrap();

        let breaker = line(&quote, "Circuit Breaker (MDWP-C40-2)")[0];
        assert!(breaker.is_placeholder());
        assert_eq!(breaker.quantity, 1);
    }

    #[test]
    fn test_low_power_micro_warning() {
        let cfg = config("panel-huasun-700", 10, "inv-weg-siw100g-m010", RoofType::Ceramic);
        let quote = price_configuration(&cfg, &default_catalog(), None, number()).unwrap();
        assert_eq!(quote.warnings.len(), 1);
        assert!(quote.warnings[0].contains("700Wp"));
        assert!(quote.warnings[0].contains("630Wp"));
    }

    #[test]
    fn test_support_fallback_warns() {
        let mut catalog = default_catalog();
        catalog
            .inverter_supports
            .retain(|s| s.part_code.as_deref() != Some(HR_HSR_SUPPORT_PART_CODE));
        let quote = price_configuration(&ja_m010(10, RoofType::Ceramic), &catalog, None, number())
            .unwrap();

        let support = line(&quote, "Microinverter Support: ")[0];
        assert!(support.name.contains("PLPA"));
        assert_eq!(support.quantity, 5);
        assert_eq!(quote.warnings.len(), 1);
        assert!(quote.warnings[0].contains("17673518"));
    }

    #[test]
    fn test_missing_supporting_rows_become_placeholders() {
        let mut catalog = default_catalog();
        catalog.surge_protectors.clear();
        catalog.ac_connectors.clear();
        catalog.inverter_supports.clear();
        catalog.structures.clear();
        let quote = price_configuration(&ja_m010(10, RoofType::Slab), &catalog, None, number())
            .unwrap();

        let surge = line(&quote, "Surge Protector (AC)")[0];
        assert!(surge.is_placeholder());
        assert_eq!(surge.quantity, SURGE_PROTECTORS_PER_SYSTEM);

        let support = line(&quote, "Microinverter Support")[0];
        assert_eq!(support.part_code.as_deref(), Some(HR_HSR_SUPPORT_PART_CODE));
        assert!(support.total_price.is_zero());

        assert!(line(&quote, "AC Trunk Connector")[0].is_placeholder());
        assert!(line(&quote, "Structure (")[0].is_placeholder());
    }

    #[test]
    fn test_zero_length_cable_yields_note_line() {
        let mut catalog = default_catalog();
        catalog.cables = vec![Cable {
            id: "cable-x".to_string(),
            name: "Unmeasured".to_string(),
            part_code: None,
            length_per_unit_m: 0,
            price: Money::from_cents(1000),
            is_ac: true,
            cross_section_mm2: None,
            notes: None,
        }];
        let quote = price_configuration(&ja_m010(10, RoofType::Ceramic), &catalog, None, number())
            .unwrap();

        let cable = line(&quote, "AC Trunk Cable")[0];
        assert_eq!(cable.quantity, 0);
        assert!(cable.total_price.is_zero());
        assert!(cable.note.as_deref().is_some_and(|n| n.starts_with("10m estimated")));
    }

    #[test]
    fn test_fatal_errors() {
        let catalog = default_catalog();

        let err = price_configuration(&ja_m010(0, RoofType::Ceramic), &catalog, None, number())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let cfg = config("panel-unknown", 10, "inv-weg-siw100g-m010", RoofType::Ceramic);
        let err = price_configuration(&cfg, &catalog, None, number()).unwrap_err();
        assert_eq!(err, CoreError::NotFound("panel details not found".to_string()));

        // A string inverter is not a valid microinverter selection
        let cfg = config("panel-ja-630", 10, "inv-weg-siw300h-m030", RoofType::Ceramic);
        let err = price_configuration(&cfg, &catalog, None, number()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_missing_southeast_price_is_fatal() {
        let mut catalog = default_catalog();
        if let Some(panel) = catalog.panels.iter_mut().find(|p| p.id == "panel-ja-630") {
            panel.price = RegionalPrice::default();
        }
        let err = price_configuration(&ja_m010(10, RoofType::Ceramic), &catalog, None, number())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingPrice(ref m) if m.contains("panel")));

        let mut catalog = default_catalog();
        if let Some(micro) = catalog.inverters.iter_mut().find(|i| i.id == "inv-weg-siw100g-m010") {
            micro.price = RegionalPrice::default();
        }
        let err = price_configuration(&ja_m010(10, RoofType::Ceramic), &catalog, None, number())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingPrice(ref m) if m.contains("microinverter")));
    }

    #[test]
    fn test_integrator_multiplier_applied() {
        let integrator = IntegratorProfile {
            id: "int-1".to_string(),
            username: "acme".to_string(),
            credential_hash: String::new(),
            display_name: None,
            final_discount_multiplier: integrator_multiplier(Factor::from_ppm(800_000)),
        };
        let quote = price_configuration(
            &ja_m010(10, RoofType::Ceramic),
            &default_catalog(),
            Some(&integrator),
            number(),
        )
        .unwrap();

        // 25354.30 × 0.4080384 = 10345.528 → 10346
        assert_eq!(quote.final_discounted_price.cents(), 1_034_600);
        assert!(quote.applied_discount_description.contains("acme"));
        assert_eq!(quote.discount_multiplier, Multiplier::from_ppt(408_038_400_000));
    }

    #[test]
    fn test_card_financing() {
        let mut cfg = ja_m010(10, RoofType::Ceramic);
        cfg.payment_type = PaymentType::Card;
        cfg.credit_card_term_id = Some("cc-01".to_string());
        let quote = price_configuration(&cfg, &default_catalog(), None, number()).unwrap();

        let payment = quote.payment.unwrap();
        // 10733 × 2.91% = 312.33 → 312
        assert_eq!(payment.financing_cost.cents(), 31_200);
        assert_eq!(payment.total_with_financing.cents(), 1_104_500);
        assert_eq!(payment.installment_count, 1);
        assert_eq!(payment.installment_value.cents(), 1_104_533);
        assert_eq!(payment.term_description, "30 days");
    }

    #[test]
    fn test_unknown_card_term_is_ignored() {
        let mut cfg = ja_m010(10, RoofType::Ceramic);
        cfg.payment_type = PaymentType::Card;
        cfg.credit_card_term_id = Some("cc-99".to_string());
        let quote = price_configuration(&cfg, &default_catalog(), None, number()).unwrap();
        assert!(quote.payment.is_none());
        assert_eq!(quote.payment_type, PaymentType::Card);
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let catalog = default_catalog();
        let before = catalog.clone();
        let cfg = ja_m010(22, RoofType::Ceramic);

        let a = price_configuration(&cfg, &catalog, None, QuoteNumber::new(2026, 1)).unwrap();
        let b = price_configuration(&cfg, &catalog, None, QuoteNumber::new(2026, 2)).unwrap();

        assert_eq!(a.line_items, b.line_items);
        assert_eq!(a.final_discounted_price, b.final_discounted_price);
        assert_ne!(a.quote_number, b.quote_number);
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_catalog_from_items_prices_like_defaults() {
        let defaults = default_catalog();
        let items: Vec<CatalogItem> = defaults.items();
        let rebuilt = Catalog::from_parts(items, defaults.breaker_rules.clone()).unwrap();

        let cfg = ja_m010(10, RoofType::Ceramic);
        let a = price_configuration(&cfg, &defaults, None, number()).unwrap();
        let b = price_configuration(&cfg, &rebuilt, None, number()).unwrap();
        assert_eq!(a, b);
    }
}
