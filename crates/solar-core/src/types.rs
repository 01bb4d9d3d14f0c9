//! # Domain Types
//!
//! Core domain types used throughout Solar Quote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ QuoteConfig     │   │  PricedQuote    │   │ ArchivedQuote   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer       │──►│  quote_number   │──►│  id (UUID)      │       │
//! │  │  panel_id       │   │  line_items     │   │  configuration  │       │
//! │  │  panel_count    │   │  final price    │   │  result         │       │
//! │  │  payment_type   │   │  payment        │   │  role           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Rate         │   │    Factor       │   │  Multiplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  ppm (u32)      │   │  ppt (u64)      │       │
//! │  │  291 = 2.91%    │   │  0.83 = 830_000 │   │  Factor×Factor  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fixed-Point Scales
//! `Factor × Factor` is exact in parts-per-trillion, so a composed discount
//! multiplier never loses a digit before it is applied to a total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::numbering::QuoteNumber;

// =============================================================================
// Rate
// =============================================================================

/// Percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 291 bps = 2.91% (cost of a single-installment card payment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Denominator of the basis-point scale.
    pub const SCALE: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Factor
// =============================================================================

/// A discount factor in parts per million.
///
/// `0.510048` is `Factor::from_ppm(510_048)`. Factors at this precision
/// cover every value the pricing tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Factor(u32);

impl Factor {
    /// Denominator of the ppm scale.
    pub const SCALE: u32 = 1_000_000;

    /// The neutral factor (1.0).
    pub const ONE: Factor = Factor(1_000_000);

    /// Creates a factor from parts per million.
    #[inline]
    pub const fn from_ppm(ppm: u32) -> Self {
        Factor(ppm)
    }

    /// Parses a decimal factor such as `0.83`.
    ///
    /// Returns `None` for negative, non-finite or > 1 values. Used at the
    /// CLI boundary only; the engine never sees a float factor.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return None;
        }
        Some(Factor((value * Self::SCALE as f64).round() as u32))
    }

    /// Returns the factor in parts per million.
    #[inline]
    pub const fn ppm(&self) -> u32 {
        self.0
    }

    /// Returns the factor as a float (for display only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

// =============================================================================
// Multiplier
// =============================================================================

/// The final discount multiplier, in parts per trillion.
///
/// Always the exact product of two [`Factor`]s:
/// `510_048 ppm × 830_000 ppm = 423_339_840_000 ppt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Multiplier(u64);

impl Multiplier {
    /// Denominator of the ppt scale.
    pub const SCALE: u64 = 1_000_000_000_000;

    /// Composes a primary and a secondary factor.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::types::{Factor, Multiplier};
    ///
    /// let m = Multiplier::compose(Factor::from_ppm(510_048), Factor::from_ppm(830_000));
    /// assert_eq!(m.ppt(), 423_339_840_000);
    /// ```
    #[inline]
    pub const fn compose(primary: Factor, secondary: Factor) -> Self {
        Multiplier(primary.0 as u64 * secondary.0 as u64)
    }

    /// Creates a multiplier from parts per trillion (as persisted).
    #[inline]
    pub const fn from_ppt(ppt: u64) -> Self {
        Multiplier(ppt)
    }

    /// Returns the multiplier in parts per trillion.
    #[inline]
    pub const fn ppt(&self) -> u64 {
        self.0
    }

    /// Returns the multiplier as a float (for display only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_f64())
    }
}

// =============================================================================
// Roof Type
// =============================================================================

/// Roof the system is mounted on. Drives structure and support selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoofType {
    Ceramic,
    Metal,
    Slab,
    FiberCement,
    FiberCementWood,
    FiberCementMetal,
    Other,
}

impl RoofType {
    /// Every roof type, in presentation order.
    pub const ALL: [RoofType; 7] = [
        RoofType::Ceramic,
        RoofType::Metal,
        RoofType::Slab,
        RoofType::FiberCement,
        RoofType::FiberCementWood,
        RoofType::FiberCementMetal,
        RoofType::Other,
    ];

    /// Stable identifier (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            RoofType::Ceramic => "ceramic",
            RoofType::Metal => "metal",
            RoofType::Slab => "slab",
            RoofType::FiberCement => "fiber_cement",
            RoofType::FiberCementWood => "fiber_cement_wood",
            RoofType::FiberCementMetal => "fiber_cement_metal",
            RoofType::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RoofType::Ceramic => "Ceramic tile",
            RoofType::Metal => "Metal",
            RoofType::Slab => "Concrete slab",
            RoofType::FiberCement => "Fiber cement",
            RoofType::FiberCementWood => "Fiber cement (wood frame)",
            RoofType::FiberCementMetal => "Fiber cement (metal frame)",
            RoofType::Other => "Other",
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoofType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoofType::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "roof type".to_string(),
                allowed: RoofType::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Single cash payment.
    Cash,
    /// Credit card, optionally split into installments.
    Card,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Card => "card",
        }
    }
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Cash
    }
}

impl FromStr for PaymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cash" => Ok(PaymentType::Cash),
            "card" => Ok(PaymentType::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment type".to_string(),
                allowed: vec!["cash".to_string(), "card".to_string()],
            }),
        }
    }
}

// =============================================================================
// Region
// =============================================================================

/// Brazilian pricing regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Southeast,
    South,
    CenterWest,
    North,
    Northeast,
}

/// Per-region price of a panel or inverter.
///
/// Only `southeast` is used by the engine. It is mandatory when an item is
/// written through the catalog store but stays optional in the type, so a
/// snapshot built by hand can still exercise the missing-price path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPrice {
    pub southeast: Option<Money>,
    #[serde(default)]
    pub south: Option<Money>,
    #[serde(default)]
    pub center_west: Option<Money>,
    #[serde(default)]
    pub north: Option<Money>,
    #[serde(default)]
    pub northeast: Option<Money>,
}

impl RegionalPrice {
    /// A price registered for the southeast only.
    pub fn southeast(price: Money) -> Self {
        RegionalPrice {
            southeast: Some(price),
            ..Default::default()
        }
    }

    /// Price for a given region, if registered.
    pub fn get(&self, region: Region) -> Option<Money> {
        match region {
            Region::Southeast => self.southeast,
            Region::South => self.south,
            Region::CenterWest => self.center_west,
            Region::North => self.north,
            Region::Northeast => self.northeast,
        }
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Who produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Integrator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Integrator => "integrator",
        }
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "integrator" => Ok(UserRole::Integrator),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["customer".to_string(), "integrator".to_string()],
            }),
        }
    }
}

// =============================================================================
// Quote Configuration (input)
// =============================================================================

/// What the customer asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfiguration {
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub installation_city: String,
    pub roof_type: RoofType,
    pub panel_id: String,
    pub panel_count: u32,
    pub microinverter_id: String,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub credit_card_term_id: Option<String>,
}

// =============================================================================
// Component Line Item
// =============================================================================

/// One line of the bill of materials.
///
/// Invariant: `total_price == unit_price × quantity`. Placeholder lines
/// (missing catalog data) carry zero prices and a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub part_code: Option<String>,
    pub note: Option<String>,
}

impl ComponentLineItem {
    /// A priced line; the total is derived from unit price and quantity.
    pub fn priced(
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        part_code: Option<String>,
    ) -> Self {
        ComponentLineItem {
            name: name.into(),
            quantity,
            unit_price,
            total_price: unit_price * quantity,
            part_code,
            note: None,
        }
    }

    /// A zero-cost line recording missing catalog data.
    pub fn placeholder(name: impl Into<String>, quantity: u32, note: impl Into<String>) -> Self {
        ComponentLineItem {
            name: name.into(),
            quantity,
            unit_price: Money::zero(),
            total_price: Money::zero(),
            part_code: None,
            note: Some(note.into()),
        }
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether this line stands in for missing catalog data.
    pub fn is_placeholder(&self) -> bool {
        self.unit_price.is_zero() && self.note.is_some()
    }

    /// Adds one more unit to the line, keeping the total consistent.
    pub(crate) fn increment(&mut self) {
        self.quantity += 1;
        self.total_price = self.unit_price * self.quantity;
    }
}

// =============================================================================
// Payment Breakdown
// =============================================================================

/// Card financing figures. Present only for card payments with a
/// resolvable term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub term_description: String,
    pub financing_rate: Rate,
    pub financing_cost: Money,
    pub total_with_financing: Money,
    pub installment_count: u32,
    pub installment_value: Money,
}

// =============================================================================
// Priced Quote (output)
// =============================================================================

/// The engine's result for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedQuote {
    pub quote_number: QuoteNumber,
    pub installation_city: String,

    /// DC array size in kWp, 2 decimals.
    pub system_size_kwp: f64,

    /// Realized AC capacity in kW, 2 decimals.
    pub ac_capacity_kw: f64,

    pub inverter_note: String,

    /// Bill of materials, in derivation order.
    pub line_items: Vec<ComponentLineItem>,

    /// Σ line totals.
    pub total_component_cost: Money,

    /// Multiplier applied to reach the final price.
    pub discount_multiplier: Multiplier,

    /// `total_component_cost × discount_multiplier`, whole currency units.
    pub final_discounted_price: Money,

    #[serde(default)]
    pub warnings: Vec<String>,

    pub payment_type: PaymentType,

    #[serde(default)]
    pub payment: Option<PaymentBreakdown>,

    pub applied_discount_description: String,
}

// =============================================================================
// Archived Quote
// =============================================================================

/// An immutable archive record of a produced quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedQuote {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub quote_number: QuoteNumber,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub configuration: QuoteConfiguration,

    pub result: PricedQuote,

    pub produced_by_role: UserRole,

    pub integrator_id: Option<String>,

    pub integrator_display_name: Option<String>,
}

/// Rounds a display quantity to 2 decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(291);
        assert_eq!(rate.bps(), 291);
        assert!((rate.percentage() - 2.91).abs() < 0.001);
    }

    #[test]
    fn test_factor_from_decimal() {
        assert_eq!(Factor::from_decimal(0.510048), Some(Factor::from_ppm(510_048)));
        assert_eq!(Factor::from_decimal(0.83), Some(Factor::from_ppm(830_000)));
        assert_eq!(Factor::from_decimal(1.5), None);
        assert_eq!(Factor::from_decimal(-0.1), None);
        assert_eq!(Factor::from_decimal(f64::NAN), None);
    }

    #[test]
    fn test_multiplier_compose_is_exact() {
        let m = Multiplier::compose(Factor::from_ppm(510_048), Factor::from_ppm(840_000));
        assert_eq!(m.ppt(), 428_440_320_000);
        assert_eq!(m.to_string(), "0.428440");
    }

    #[test]
    fn test_roof_type_parse() {
        assert_eq!("metal".parse::<RoofType>(), Ok(RoofType::Metal));
        assert_eq!(
            "fiber_cement_wood".parse::<RoofType>(),
            Ok(RoofType::FiberCementWood)
        );
        assert!("thatch".parse::<RoofType>().is_err());

        for roof in RoofType::ALL {
            assert_eq!(roof.as_str().parse::<RoofType>(), Ok(roof));
        }
    }

    #[test]
    fn test_roof_type_serde_matches_as_str() {
        let json = serde_json::to_string(&RoofType::FiberCementMetal).unwrap();
        assert_eq!(json, "\"fiber_cement_metal\"");
    }

    #[test]
    fn test_line_item_total_matches_quantity() {
        let item = ComponentLineItem::priced("Panel", 10, Money::from_cents(136_285), None);
        assert_eq!(item.total_price.cents(), 1_362_850);

        let mut breaker = ComponentLineItem::priced("Breaker", 1, Money::from_cents(7_305), None);
        breaker.increment();
        assert_eq!(breaker.quantity, 2);
        assert_eq!(breaker.total_price.cents(), 14_610);
    }

    #[test]
    fn test_placeholder_is_zero_cost() {
        let item = ComponentLineItem::placeholder("Surge Protector", 2, "pending catalog registration");
        assert!(item.is_placeholder());
        assert!(item.total_price.is_zero());
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_regional_price_lookup() {
        let price = RegionalPrice::southeast(Money::from_cents(100));
        assert_eq!(price.get(Region::Southeast), Some(Money::from_cents(100)));
        assert_eq!(price.get(Region::North), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(6.3), 6.3);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }
}
