//! # Discount Profiles
//!
//! Who the quote is for decides the multiplier applied to the component
//! total.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Customer    : PRIMARY (0.510048) × CUSTOMER SECONDARY (0.83)          │
//! │  Integrator  : PRIMARY (0.510048) × tier secondary (0.80 .. 0.84)      │
//! │                └── computed once at registration, stored as ppt         │
//! │                                                                         │
//! │  Forward (factor → multiplier) is the source of truth.                 │
//! │  Reverse (multiplier → tier) is for display only.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::IntegratorProfile;
use crate::types::{Factor, Multiplier};

// =============================================================================
// Factors
// =============================================================================

/// Global primary factor applied to every quote.
pub const DEFAULT_PRIMARY_FACTOR: Factor = Factor::from_ppm(510_048);

/// Secondary factor for walk-in customers.
pub const DEFAULT_CUSTOMER_SECONDARY_FACTOR: Factor = Factor::from_ppm(830_000);

/// A named secondary-factor tier offered to integrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryTier {
    pub label: &'static str,
    pub factor: Factor,
}

/// Tiers an integrator can be registered with, from least to most discount.
pub const INTEGRATOR_SECONDARY_TIERS: [SecondaryTier; 5] = [
    SecondaryTier {
        label: "Standard (secondary x0.84)",
        factor: Factor::from_ppm(840_000),
    },
    SecondaryTier {
        label: "Tier 1 (secondary x0.83)",
        factor: Factor::from_ppm(830_000),
    },
    SecondaryTier {
        label: "Tier 2 (secondary x0.82)",
        factor: Factor::from_ppm(820_000),
    },
    SecondaryTier {
        label: "Tier 3 (secondary x0.81)",
        factor: Factor::from_ppm(810_000),
    },
    SecondaryTier {
        label: "Tier 4 (secondary x0.80)",
        factor: Factor::from_ppm(800_000),
    },
];

/// Reverse-lookup tolerance: 1e-6 expressed in ppt.
pub const SECONDARY_MATCH_TOLERANCE_PPT: u64 = 1_000_000;

// =============================================================================
// Discount Profile
// =============================================================================

/// Whose prices a quote is computed with.
#[derive(Debug, Clone, Copy)]
pub enum DiscountProfile<'a> {
    Customer,
    Integrator(&'a IntegratorProfile),
}

impl<'a> DiscountProfile<'a> {
    pub fn from_integrator(integrator: Option<&'a IntegratorProfile>) -> Self {
        match integrator {
            Some(i) => DiscountProfile::Integrator(i),
            None => DiscountProfile::Customer,
        }
    }

    /// The multiplier applied to the component total.
    pub fn multiplier(&self) -> Multiplier {
        match self {
            DiscountProfile::Customer => customer_multiplier(),
            DiscountProfile::Integrator(i) => i.final_discount_multiplier,
        }
    }

    /// Human-readable description recorded on the quote.
    pub fn description(&self) -> String {
        match self {
            DiscountProfile::Customer => format!(
                "Standard customer discount applied. Factors: primary={:.6}, secondary={:.6}. Final: {}",
                DEFAULT_PRIMARY_FACTOR.as_f64(),
                DEFAULT_CUSTOMER_SECONDARY_FACTOR.as_f64(),
                customer_multiplier()
            ),
            DiscountProfile::Integrator(i) => format!(
                "Integrator discount ({}) applied. Final multiplier: {}",
                i.label(),
                i.final_discount_multiplier
            ),
        }
    }
}

/// `PRIMARY × CUSTOMER SECONDARY`.
pub const fn customer_multiplier() -> Multiplier {
    Multiplier::compose(DEFAULT_PRIMARY_FACTOR, DEFAULT_CUSTOMER_SECONDARY_FACTOR)
}

/// `PRIMARY × secondary`, the value stored on an integrator profile.
///
/// ## Example
/// ```rust
/// use solar_core::discount::integrator_multiplier;
/// use solar_core::types::Factor;
///
/// let m = integrator_multiplier(Factor::from_ppm(840_000));
/// assert_eq!(m.ppt(), 428_440_320_000);
/// ```
pub const fn integrator_multiplier(secondary: Factor) -> Multiplier {
    Multiplier::compose(DEFAULT_PRIMARY_FACTOR, secondary)
}

// =============================================================================
// Reverse Lookup (presentation only)
// =============================================================================

/// Result of mapping a stored multiplier back onto a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryFactorMatch {
    pub factor: Factor,
    pub label: String,
    /// Whether the multiplier is within tolerance of the tier.
    pub exact: bool,
}

/// Finds the tier whose multiplier is closest to `multiplier`.
///
/// Never feeds back into pricing; the stored multiplier is authoritative.
pub fn closest_secondary_factor(multiplier: Multiplier) -> SecondaryFactorMatch {
    let distance = |tier: &SecondaryTier| {
        integrator_multiplier(tier.factor)
            .ppt()
            .abs_diff(multiplier.ppt())
    };

    let mut best = INTEGRATOR_SECONDARY_TIERS[0];
    for tier in INTEGRATOR_SECONDARY_TIERS.iter().skip(1) {
        if distance(tier) < distance(&best) {
            best = *tier;
        }
    }

    SecondaryFactorMatch {
        factor: best.factor,
        label: best.label.to_string(),
        exact: distance(&best) <= SECONDARY_MATCH_TOLERANCE_PPT,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
