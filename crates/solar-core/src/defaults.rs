//! # Default Catalog
//!
//! The stock catalog a fresh database is seeded with. Prices are southeast
//! list prices in centavos.

use crate::catalog::{
    AcConnector, BreakerRule, Cable, Catalog, CircuitBreaker, CreditCardTerm, Inverter,
    InverterKind, InverterSupport, MountingStructure, Panel, Phase, ProtectionType,
    SurgeProtector,
};
use crate::money::Money;
use crate::types::{Rate, RegionalPrice, RoofType};

fn se(cents: i64) -> RegionalPrice {
    RegionalPrice::southeast(Money::from_cents(cents))
}

fn code(part: &str) -> Option<String> {
    Some(part.to_string())
}

#[allow(clippy::too_many_arguments)]
fn panel(
    id: &str,
    part: &str,
    name: &str,
    brand: &str,
    model: &str,
    power_wp: u32,
    cents: i64,
    cell_type: &str,
    area_m2: f64,
    cells: u32,
    notes: &str,
) -> Panel {
    Panel {
        id: id.to_string(),
        name: name.to_string(),
        part_code: code(part),
        power_wp,
        price: se(cents),
        brand: Some(brand.to_string()),
        model_name: Some(model.to_string()),
        cell_type: Some(cell_type.to_string()),
        area_m2: Some(area_m2),
        cell_count: Some(cells),
        notes: Some(notes.to_string()),
    }
}

pub fn default_panels() -> Vec<Panel> {
    vec![
        panel("panel-byd-535", "18581410", "BYD 535Wp p-TYPE Panel", "BYD", "MLK-36", 535, 158_228, "p-TYPE", 2.58, 144, "[FINAME]"),
        panel("panel-tongwei-610", "18253725", "TONGWEI 610Wp n-TYPE Bifacial Panel", "TONGWEI", "TWMNH-66HD", 610, 131_958, "n-TYPE", 2.70, 132, "BIFACIAL"),
        panel("panel-ja-630", "18096678", "JA Solar 630Wp n-TYPE Bifacial Panel", "JA Solar", "JAM72D42/LB", 630, 136_285, "n-TYPE", 2.80, 144, "BIFACIAL"),
        panel("panel-huasun-700", "18376899", "HUASUN 700Wp HJT Bifacial Panel", "HUASUN", "HS-210-B132DS", 700, 144_217, "HJT", 3.11, 132, "BIFACIAL"),
        panel("panel-trina-710", "18120567", "TRINA 710Wp n-TYPE Bifacial Panel", "TRINA", "TSM-NEG21C.20", 710, 160_905, "n-TYPE", 3.11, 132, "BIFACIAL"),
    ]
}

pub fn default_inverters() -> Vec<Inverter> {
    let weg = |id: &str, part: &str, name: &str, model: &str| Inverter {
        id: id.to_string(),
        name: name.to_string(),
        part_code: code(part),
        model_name: model.to_string(),
        power_kw: 0.0,
        price: RegionalPrice::default(),
        phase: Phase::SinglePhase,
        kind: InverterKind::Micro,
        max_panels_per_unit: 0,
        max_panel_power_wp: None,
        brand: Some("WEG".to_string()),
        voltage: Some("220 V".to_string()),
        mppt_inputs: None,
        notes: None,
    };

    vec![
        Inverter {
            power_kw: 1.0,
            price: se(155_440),
            max_panels_per_unit: 2,
            max_panel_power_wp: Some(670),
            mppt_inputs: Some(2),
            ..weg("inv-weg-siw100g-m010", "17490887", "Microinverter WEG SIW100G M010 W00", "SIW100G M010 W00")
        },
        Inverter {
            power_kw: 2.4,
            price: se(419_300),
            max_panels_per_unit: 4,
            max_panel_power_wp: Some(710),
            mppt_inputs: Some(4),
            ..weg("inv-weg-siw100g-m024", "18308022", "Microinverter WEG SIW100G M024 W10", "SIW100G M024 W10")
        },
        Inverter {
            power_kw: 3.0,
            price: se(449_837),
            kind: InverterKind::String,
            mppt_inputs: Some(2),
            notes: Some("String box SB-2E/4E-2S-600DC".to_string()),
            ..weg("inv-weg-siw300h-m030", "18127283", "Inverter WEG SIW300H M030 W00", "SIW300H M030 W00")
        },
        Inverter {
            power_kw: 12.0,
            price: se(1_425_653),
            phase: Phase::ThreePhase,
            kind: InverterKind::String,
            voltage: Some("380 V".to_string()),
            mppt_inputs: Some(4),
            notes: Some("String box SB-2E/4E-2S-2X20A-1010V".to_string()),
            ..weg("inv-weg-siw500h-st012", "15680075", "Inverter WEG SIW500H ST012 M2", "SIW500H ST012 M2")
        },
    ]
}

pub fn default_structures() -> Vec<MountingStructure> {
    let structure = |id: &str, part: &str, name: &str, panels: u32, roof: RoofType, cents: i64, brand: &str| {
        MountingStructure {
            id: id.to_string(),
            name: name.to_string(),
            part_code: code(part),
            panels_per_unit: panels,
            compatible_roof_types: vec![roof],
            price: Money::from_cents(cents),
            microinverter_ready: false,
            brand: Some(brand.to_string()),
            notes: None,
        }
    };

    vec![
        structure("struct-weg-ceramic-4m-30", "17930198", "WEG Ceramic Structure 4 Modules (30-C-HR-HI-A-3-2080-M)", 4, RoofType::Ceramic, 98_336, "WEG"),
        structure("struct-weg-metal-3m-55cm", "14594568", "WEG Metal Structure 3 Modules Portrait (55cm profile)", 3, RoofType::Metal, 34_643, "WEG"),
        MountingStructure {
            microinverter_ready: true,
            notes: Some("For microinverter installs".to_string()),
            ..structure("struct-weg-metal-micro-2m", "17721638", "WEG Metal Structure for 2 Modules (Microinverter)", 2, RoofType::Metal, 62_131, "WEG")
        },
        MountingStructure {
            microinverter_ready: true,
            notes: Some("For microinverter installs".to_string()),
            ..structure("struct-weg-metal-micro-10m", "17722474", "WEG Metal Structure for 10 Modules (Microinverter)", 10, RoofType::Metal, 237_133, "WEG")
        },
        structure("struct-solargroup-slab-4m", "14594638", "SOLARGROUP Slab Structure 4 Modules Portrait", 4, RoofType::Slab, 146_488, "SOLARGROUP"),
    ]
}

pub fn default_cables() -> Vec<Cable> {
    vec![
        Cable {
            id: "cable-dc-6mm-black".to_string(),
            name: "DC Flexible Single-Core Cable NH 6mm² Black".to_string(),
            part_code: code("13677909"),
            length_per_unit_m: 1,
            price: Money::from_cents(1_145),
            is_ac: false,
            cross_section_mm2: Some(6.0),
            notes: Some("String and pumping systems. Price per meter.".to_string()),
        },
        Cable {
            id: "cable-dc-6mm-red".to_string(),
            name: "DC Flexible Single-Core Cable NH 6mm² Red".to_string(),
            part_code: code("13677908"),
            length_per_unit_m: 1,
            price: Money::from_cents(1_145),
            is_ac: false,
            cross_section_mm2: Some(6.0),
            notes: Some("String and pumping systems. Price per meter.".to_string()),
        },
        Cable {
            id: "cable-ac-3x6mm-weg".to_string(),
            name: "AC Cable MP Flex HEPR/NH 3x6mm² 90°C 1kV".to_string(),
            part_code: code("18512552"),
            length_per_unit_m: 1,
            price: Money::from_cents(3_454),
            is_ac: true,
            cross_section_mm2: Some(6.0),
            notes: Some("Microinverter SIW100G M024 W10. Price per meter.".to_string()),
        },
    ]
}

pub fn default_surge_protectors() -> Vec<SurgeProtector> {
    vec![SurgeProtector {
        id: "dps-weg-spw02-275-20".to_string(),
        name: "Surge Protector WEG SPW02-275-20".to_string(),
        part_code: code("14827873"),
        protection: ProtectionType::Ac,
        price: Money::from_cents(9_527),
        voltage_rating: Some("275V".to_string()),
        current_rating_ka: Some("20kA".to_string()),
    }]
}

pub fn default_breakers() -> Vec<CircuitBreaker> {
    [
        ("cb-mdwp-c10-2", "15265721", "MDWP-C10-2", 10, 4_143),
        ("cb-mdwp-c16-2", "15265722", "MDWP-C16-2", 16, 4_452),
        ("cb-mdwp-c20-2", "15265723", "MDWP-C20-2", 20, 4_853),
        ("cb-mdwp-c32-2", "15265726", "MDWP-C32-2", 32, 6_291),
        ("cb-mdwp-c40-2", "15265727", "MDWP-C40-2", 40, 7_305),
    ]
    .into_iter()
    .map(|(id, part, model, amps, cents)| CircuitBreaker {
        id: id.to_string(),
        name: format!("WEG Circuit Breaker {model}"),
        part_code: code(part),
        model_code: model.to_string(),
        amps,
        poles: 2,
        price: Money::from_cents(cents),
    })
    .collect()
}

pub fn default_ac_connectors() -> Vec<AcConnector> {
    vec![
        AcConnector {
            id: "ac-conn-weg-m010".to_string(),
            name: "AC Connector Kit SIW100G W00".to_string(),
            part_code: code("17643632"),
            price: Money::from_cents(8_793),
            compatibility_note: Some("SIW100G M010 W00".to_string()),
        },
        AcConnector {
            id: "ac-conn-weg-m024".to_string(),
            name: "AC Connector Kit SIW100G W10".to_string(),
            part_code: code("18460783"),
            price: Money::from_cents(37_302),
            compatibility_note: Some("SIW100G M024 W10".to_string()),
        },
    ]
}

pub fn default_inverter_supports() -> Vec<InverterSupport> {
    vec![
        InverterSupport {
            id: "inv-support-weg-hr-hsr".to_string(),
            name: "WEG Microinverter Support Kit HR/HSR SIW100G".to_string(),
            part_code: code("17702839"),
            price: Money::from_cents(6_136),
            notes: Some("For roofs with HR/HSR profile".to_string()),
        },
        InverterSupport {
            id: "inv-support-weg-plpa".to_string(),
            name: "WEG Microinverter Support Kit PLPA SIW100G".to_string(),
            part_code: code("17673518"),
            price: Money::from_cents(4_728),
            notes: Some("For raised flat profile (PLPA)".to_string()),
        },
    ]
}

pub fn default_card_terms() -> Vec<CreditCardTerm> {
    let rates = [
        ("cc-01", "CC01", 291),
        ("cc-02", "CC02", 399),
        ("cc-03", "CC03", 451),
        ("cc-04", "CC04", 503),
        ("cc-05", "CC05", 556),
        ("cc-06", "CC06", 609),
        ("cc-18", "CC18", 881),
        ("cc-19", "CC19", 971),
        ("cc-20", "CC20", 1043),
        ("cc-21", "CC21", 1132),
        ("cc-22", "CC22", 1213),
        ("cc-23", "CC23", 1295),
    ];

    rates
        .into_iter()
        .enumerate()
        .map(|(i, (id, code, bps))| {
            let days: Vec<String> = (1..=i + 1).map(|n| (n * 30).to_string()).collect();
            CreditCardTerm {
                id: id.to_string(),
                code: code.to_string(),
                description: format!("{} days", days.join("/")),
                cost_rate: Rate::from_bps(bps),
            }
        })
        .collect()
}

pub fn default_breaker_rules() -> Vec<BreakerRule> {
    vec![
        BreakerRule::new("SIW100G M010 W00", 1, "MDWP-C10-2"),
        BreakerRule::new("SIW100G M010 W00", 2, "MDWP-C16-2"),
        BreakerRule::new("SIW100G M010 W00", 3, "MDWP-C20-2"),
        BreakerRule::new("SIW100G M010 W00", 4, "MDWP-C32-2"),
        BreakerRule::new("SIW100G M010 W00", 5, "MDWP-C40-2"),
        BreakerRule::new("SIW100G M024 W10", 1, "MDWP-C20-2"),
        BreakerRule::new("SIW100G M024 W10", 2, "MDWP-C40-2"),
    ]
}

/// The full stock catalog.
pub fn default_catalog() -> Catalog {
    Catalog {
        panels: default_panels(),
        inverters: default_inverters(),
        structures: default_structures(),
        cables: default_cables(),
        surge_protectors: default_surge_protectors(),
        breakers: default_breakers(),
        ac_connectors: default_ac_connectors(),
        inverter_supports: default_inverter_supports(),
        card_terms: default_card_terms(),
        breaker_rules: default_breaker_rules(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::validation::{validate_breaker_rule, validate_catalog_item};

    #[test]
    fn test_defaults_pass_store_validation() {
        let catalog = default_catalog();
        for item in catalog.items() {
            assert!(validate_catalog_item(&item).is_ok(), "{} failed", item.id());
        }
        for rule in &catalog.breaker_rules {
            assert!(validate_breaker_rule(rule).is_ok());
        }
        assert!(Catalog::from_parts(catalog.items(), catalog.breaker_rules.clone()).is_ok());
    }

    #[test]
    fn test_card_term_descriptions() {
        let terms = default_card_terms();
        assert_eq!(terms.len(), 12);
        assert_eq!(terms[0].description, "30 days");
        assert_eq!(terms[1].description, "30/60 days");
        assert_eq!(terms[11].installment_count(), 12);
        assert_eq!(terms[11].cost_rate.bps(), 1295);
    }

    #[test]
    fn test_every_breaker_rule_resolves() {
        let catalog = default_catalog();
        for rule in &catalog.breaker_rules {
            assert!(catalog.breaker_by_model(&rule.breaker_model_code).is_some());
        }
        let items = catalog.items();
        assert!(items.iter().any(|i| matches!(i, CatalogItem::CircuitBreaker(_))));
    }
}
