//! # Component Catalog
//!
//! Catalog entities and the immutable [`Catalog`] snapshot the engine prices
//! against.
//!
//! ## Snapshot Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  catalog_items table ──► CatalogRepository::snapshot() ──► Catalog     │
//! │  breaker_rules table ──┘                                     │          │
//! │                                                              ▼          │
//! │                                              price_configuration(&Catalog)
//! │                                                                         │
//! │  The engine only ever READS a snapshot. Admin edits go to the store    │
//! │  and are visible on the next snapshot.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Multiplier, Rate, RegionalPrice, RoofType};

// =============================================================================
// Component Kind
// =============================================================================

/// Tag for each catalog item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Panel,
    Inverter,
    MountingStructure,
    Cable,
    SurgeProtector,
    CircuitBreaker,
    AcConnector,
    InverterSupport,
    CreditCardTerm,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Panel,
        ComponentKind::Inverter,
        ComponentKind::MountingStructure,
        ComponentKind::Cable,
        ComponentKind::SurgeProtector,
        ComponentKind::CircuitBreaker,
        ComponentKind::AcConnector,
        ComponentKind::InverterSupport,
        ComponentKind::CreditCardTerm,
    ];

    /// Stable identifier, used as the `kind` column in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Panel => "panel",
            ComponentKind::Inverter => "inverter",
            ComponentKind::MountingStructure => "mounting_structure",
            ComponentKind::Cable => "cable",
            ComponentKind::SurgeProtector => "surge_protector",
            ComponentKind::CircuitBreaker => "circuit_breaker",
            ComponentKind::AcConnector => "ac_connector",
            ComponentKind::InverterSupport => "inverter_support",
            ComponentKind::CreditCardTerm => "credit_card_term",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "component kind".to_string(),
                allowed: ComponentKind::ALL
                    .iter()
                    .map(|k| k.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Panels & Inverters (regional prices)
// =============================================================================

/// A photovoltaic module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    pub power_wp: u32,
    pub price: RegionalPrice,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub cell_type: Option<String>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub cell_count: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Panel {
    /// Name shown on line items (falls back to the model name).
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.model_name.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

/// Electrical phase of an inverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SinglePhase,
    ThreePhase,
    Pumping,
}

/// Inverter topology. Only `Micro` inverters can be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InverterKind {
    String,
    Micro,
    Pumping,
}

/// A string inverter or microinverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Inverter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    /// Manufacturer model; the key for breaker rules and connector matching.
    pub model_name: String,
    pub power_kw: f64,
    pub price: RegionalPrice,
    pub phase: Phase,
    pub kind: InverterKind,
    /// Panels one micro accepts; 0 means unset.
    #[serde(default)]
    pub max_panels_per_unit: u32,
    #[serde(default)]
    pub max_panel_power_wp: Option<u32>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub voltage: Option<String>,
    #[serde(default)]
    pub mppt_inputs: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Inverter {
    pub fn is_micro(&self) -> bool {
        self.kind == InverterKind::Micro
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.model_name
        } else {
            &self.name
        }
    }
}

// =============================================================================
// Single-price components
// =============================================================================

/// Mounting hardware sized for a fixed number of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MountingStructure {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    pub panels_per_unit: u32,
    pub compatible_roof_types: Vec<RoofType>,
    pub price: Money,
    /// Designed for microinverter installs (required for metal roofs).
    #[serde(default)]
    pub microinverter_ready: bool,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MountingStructure {
    pub fn fits(&self, roof: RoofType) -> bool {
        self.compatible_roof_types.contains(&roof)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    /// Meters sold per unit; 0 means the length is unknown.
    pub length_per_unit_m: u32,
    pub price: Money,
    #[serde(default)]
    pub is_ac: bool,
    #[serde(default)]
    pub cross_section_mm2: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Cable {
    /// Whether the notes mention microinverter use.
    pub fn mentions_microinverter(&self) -> bool {
        self.notes
            .as_deref()
            .map(|n| n.to_lowercase().contains("microinverter"))
            .unwrap_or(false)
    }
}

/// Surge protection device side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionType {
    Ac,
    Dc,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SurgeProtector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    pub protection: ProtectionType,
    pub price: Money,
    #[serde(default)]
    pub voltage_rating: Option<String>,
    #[serde(default)]
    pub current_rating_ka: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreaker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    /// Manufacturer model code; breaker rules resolve through it.
    pub model_code: String,
    pub amps: u32,
    pub poles: u32,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AcConnector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    pub price: Money,
    /// Free text naming the inverter models this connector fits.
    #[serde(default)]
    pub compatibility_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InverterSupport {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub part_code: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Credit Card Terms
// =============================================================================

/// A card payment plan.
///
/// The installment count is derived from the description, never stored:
/// `"30/60/90 days"` has two separators and therefore three installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardTerm {
    pub id: String,
    pub code: String,
    pub description: String,
    pub cost_rate: Rate,
}

impl CreditCardTerm {
    /// One more than the number of `/` separators (empty → 1).
    pub fn installment_count(&self) -> u32 {
        installments_from_description(&self.description)
    }
}

/// Counts installments in a term description such as `"30/60 days"`.
pub fn installments_from_description(description: &str) -> u32 {
    description.matches('/').count() as u32 + 1
}

// =============================================================================
// Breaker Rules
// =============================================================================

/// Which breaker protects a string of N micros of a given model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakerRule {
    pub inverter_model: String,
    pub micros_in_series: u32,
    pub breaker_model_code: String,
}

impl BreakerRule {
    pub fn new(
        inverter_model: impl Into<String>,
        micros_in_series: u32,
        breaker_model_code: impl Into<String>,
    ) -> Self {
        BreakerRule {
            inverter_model: inverter_model.into(),
            micros_in_series,
            breaker_model_code: breaker_model_code.into(),
        }
    }

    fn key(&self) -> (&str, u32) {
        (&self.inverter_model, self.micros_in_series)
    }
}

// =============================================================================
// Integrator Profile
// =============================================================================

/// An installer partner with a negotiated discount.
///
/// The credential is an argon2 PHC string and never leaves the process in
/// serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IntegratorProfile {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub credential_hash: String,
    pub display_name: Option<String>,
    /// `primary × secondary`, stored denormalized.
    pub final_discount_multiplier: Multiplier,
}

impl IntegratorProfile {
    /// Display name, or the username when none is set.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

// =============================================================================
// Catalog Item (tagged union for CRUD)
// =============================================================================

/// One catalog row of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum CatalogItem {
    Panel(Panel),
    Inverter(Inverter),
    MountingStructure(MountingStructure),
    Cable(Cable),
    SurgeProtector(SurgeProtector),
    CircuitBreaker(CircuitBreaker),
    AcConnector(AcConnector),
    InverterSupport(InverterSupport),
    CreditCardTerm(CreditCardTerm),
}

impl CatalogItem {
    pub fn kind(&self) -> ComponentKind {
        match self {
            CatalogItem::Panel(_) => ComponentKind::Panel,
            CatalogItem::Inverter(_) => ComponentKind::Inverter,
            CatalogItem::MountingStructure(_) => ComponentKind::MountingStructure,
            CatalogItem::Cable(_) => ComponentKind::Cable,
            CatalogItem::SurgeProtector(_) => ComponentKind::SurgeProtector,
            CatalogItem::CircuitBreaker(_) => ComponentKind::CircuitBreaker,
            CatalogItem::AcConnector(_) => ComponentKind::AcConnector,
            CatalogItem::InverterSupport(_) => ComponentKind::InverterSupport,
            CatalogItem::CreditCardTerm(_) => ComponentKind::CreditCardTerm,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Panel(x) => &x.id,
            CatalogItem::Inverter(x) => &x.id,
            CatalogItem::MountingStructure(x) => &x.id,
            CatalogItem::Cable(x) => &x.id,
            CatalogItem::SurgeProtector(x) => &x.id,
            CatalogItem::CircuitBreaker(x) => &x.id,
            CatalogItem::AcConnector(x) => &x.id,
            CatalogItem::InverterSupport(x) => &x.id,
            CatalogItem::CreditCardTerm(x) => &x.id,
        }
    }

    /// Display name (the description for card terms).
    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Panel(x) => &x.name,
            CatalogItem::Inverter(x) => &x.name,
            CatalogItem::MountingStructure(x) => &x.name,
            CatalogItem::Cable(x) => &x.name,
            CatalogItem::SurgeProtector(x) => &x.name,
            CatalogItem::CircuitBreaker(x) => &x.name,
            CatalogItem::AcConnector(x) => &x.name,
            CatalogItem::InverterSupport(x) => &x.name,
            CatalogItem::CreditCardTerm(x) => &x.description,
        }
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Everything the engine may select from, frozen for one pricing run.
///
/// Vectors keep catalog order: "first entry" fallbacks depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub panels: Vec<Panel>,
    pub inverters: Vec<Inverter>,
    pub structures: Vec<MountingStructure>,
    pub cables: Vec<Cable>,
    pub surge_protectors: Vec<SurgeProtector>,
    pub breakers: Vec<CircuitBreaker>,
    pub ac_connectors: Vec<AcConnector>,
    pub inverter_supports: Vec<InverterSupport>,
    pub card_terms: Vec<CreditCardTerm>,
    pub breaker_rules: Vec<BreakerRule>,
}

impl Catalog {
    /// Builds a snapshot from stored items and rules.
    ///
    /// ## Errors
    /// `ValidationError::Duplicate` when two rules share the same
    /// `(inverter_model, micros_in_series)` key.
    pub fn from_parts(
        items: impl IntoIterator<Item = CatalogItem>,
        rules: Vec<BreakerRule>,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.key()) {
                return Err(ValidationError::Duplicate {
                    field: "breaker rule".to_string(),
                    value: format!("{} x{}", rule.inverter_model, rule.micros_in_series),
                });
            }
        }

        let mut catalog = Catalog {
            breaker_rules: rules,
            ..Default::default()
        };
        for item in items {
            catalog.push(item);
        }
        Ok(catalog)
    }

    fn push(&mut self, item: CatalogItem) {
        match item {
            CatalogItem::Panel(x) => self.panels.push(x),
            CatalogItem::Inverter(x) => self.inverters.push(x),
            CatalogItem::MountingStructure(x) => self.structures.push(x),
            CatalogItem::Cable(x) => self.cables.push(x),
            CatalogItem::SurgeProtector(x) => self.surge_protectors.push(x),
            CatalogItem::CircuitBreaker(x) => self.breakers.push(x),
            CatalogItem::AcConnector(x) => self.ac_connectors.push(x),
            CatalogItem::InverterSupport(x) => self.inverter_supports.push(x),
            CatalogItem::CreditCardTerm(x) => self.card_terms.push(x),
        }
    }

    /// Flattens the snapshot back into tagged items (catalog order).
    pub fn items(&self) -> Vec<CatalogItem> {
        let mut out = Vec::new();
        out.extend(self.panels.iter().cloned().map(CatalogItem::Panel));
        out.extend(self.inverters.iter().cloned().map(CatalogItem::Inverter));
        out.extend(self.structures.iter().cloned().map(CatalogItem::MountingStructure));
        out.extend(self.cables.iter().cloned().map(CatalogItem::Cable));
        out.extend(self.surge_protectors.iter().cloned().map(CatalogItem::SurgeProtector));
        out.extend(self.breakers.iter().cloned().map(CatalogItem::CircuitBreaker));
        out.extend(self.ac_connectors.iter().cloned().map(CatalogItem::AcConnector));
        out.extend(self.inverter_supports.iter().cloned().map(CatalogItem::InverterSupport));
        out.extend(self.card_terms.iter().cloned().map(CatalogItem::CreditCardTerm));
        out
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Resolves an id to a MICROinverter; string inverters do not match.
    pub fn microinverter(&self, id: &str) -> Option<&Inverter> {
        self.inverters.iter().find(|i| i.id == id && i.is_micro())
    }

    pub fn card_term(&self, id: &str) -> Option<&CreditCardTerm> {
        self.card_terms.iter().find(|t| t.id == id)
    }

    pub fn breaker_rule(&self, inverter_model: &str, micros: u32) -> Option<&BreakerRule> {
        self.breaker_rules
            .iter()
            .find(|r| r.inverter_model == inverter_model && r.micros_in_series == micros)
    }

    pub fn breaker_by_model(&self, model_code: &str) -> Option<&CircuitBreaker> {
        self.breakers.iter().find(|b| b.model_code == model_code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn term(description: &str) -> CreditCardTerm {
        CreditCardTerm {
            id: "cc".to_string(),
            code: "CC".to_string(),
            description: description.to_string(),
            cost_rate: Rate::from_bps(291),
        }
    }

    #[test]
    fn test_installments_from_description() {
        assert_eq!(term("30 days").installment_count(), 1);
        assert_eq!(term("30/60 days").installment_count(), 2);
        assert_eq!(term("30/60/90/120/150/180/210/240/270/300/330/360 days").installment_count(), 12);
        assert_eq!(term("").installment_count(), 1);
    }

    #[test]
    fn test_component_kind_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.as_str().parse::<ComponentKind>(), Ok(kind));
        }
        assert!("battery".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_duplicate_breaker_rule_rejected() {
        let rules = vec![
            BreakerRule::new("SIW100G M010 W00", 1, "MDWP-C10-2"),
            BreakerRule::new("SIW100G M010 W00", 1, "MDWP-C16-2"),
        ];
        let err = Catalog::from_parts(Vec::new(), rules).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_microinverter_lookup_skips_string_inverters() {
        let string_inverter = Inverter {
            id: "inv-1".to_string(),
            name: "String".to_string(),
            part_code: None,
            model_name: "SIW300H".to_string(),
            power_kw: 3.0,
            price: RegionalPrice::southeast(Money::from_cents(100)),
            phase: Phase::SinglePhase,
            kind: InverterKind::String,
            max_panels_per_unit: 0,
            max_panel_power_wp: None,
            brand: None,
            voltage: None,
            mppt_inputs: None,
            notes: None,
        };
        let catalog =
            Catalog::from_parts(vec![CatalogItem::Inverter(string_inverter)], Vec::new()).unwrap();

        assert!(catalog.microinverter("inv-1").is_none());
        assert_eq!(catalog.inverters.len(), 1);
    }

    #[test]
    fn test_catalog_item_tagged_json() {
        let item = CatalogItem::CreditCardTerm(term("30/60 days"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "credit_card_term");
        assert_eq!(json["item"]["costRate"], 291);

        let back: CatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ComponentKind::CreditCardTerm);
        assert_eq!(back.name(), "30/60 days");
    }

    #[test]
    fn test_integrator_credential_never_serialized() {
        let profile = IntegratorProfile {
            id: "i-1".to_string(),
            username: "acme".to_string(),
            credential_hash: "$argon2id$v=19$secret".to_string(),
            display_name: None,
            final_discount_multiplier: Multiplier::from_ppt(428_440_320_000),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert_eq!(profile.label(), "acme");
    }
}
