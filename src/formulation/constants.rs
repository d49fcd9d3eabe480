/// Grams per kilogram; converts per-animal grams into herd kilograms.
pub const MASS_CONVERSION: f64 = 1000.0;

/// Catalog densities are expressed per this many mass-units.
pub const DENSITY_BASIS: f64 = 100.0;

/// Feed per animal (g) when the catalog has no recommendation.
pub const DEFAULT_FEED_PER_ANIMAL: f64 = 150.0;

pub const DEFAULT_ANIMAL_COUNT: u32 = 100;
pub const DEFAULT_DAILY_SCALING: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Goal band
// ─────────────────────────────────────────────────────────────────────────────

/// Lower edge of the goal band as a fraction of the base goal.
pub const GOAL_MIN_FACTOR: f64 = 0.95;

/// Upper edge of the goal band as a fraction of the base goal.
pub const GOAL_MAX_FACTOR: f64 = 1.15;

// ─────────────────────────────────────────────────────────────────────────────
// Commercial-feed ratio heuristic
// ─────────────────────────────────────────────────────────────────────────────

/// Energy target per 100 g when the animal has none listed.
pub const FALLBACK_TARGET_ENERGY: f64 = 280.0;

/// Protein target per 100 g when the animal has none listed.
pub const FALLBACK_TARGET_PROTEIN: f64 = 16.0;

/// Assumed energy density of cheap bulk natural ingredients.
pub const FILLER_ENERGY: f64 = 40.0;

/// Assumed protein density of cheap bulk natural ingredients.
pub const FILLER_PROTEIN: f64 = 1.0;

pub const RATIO_FLOOR: f64 = 0.3;
pub const RATIO_CEILING: f64 = 1.0;

/// Below this ratio the remainder is filled with natural ingredients.
pub const NATURAL_FILL_THRESHOLD: f64 = 0.9;

/// Share of the remainder given to the primary filler.
pub const PRIMARY_FILLER_SHARE: f64 = 0.7;

pub const PRIMARY_FILLER: &str = "Rice Bran";
pub const SECONDARY_FILLER: &str = "Corn Meal";

/// Denominators closer to zero than this count as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition gauge (percent of the goal band midpoint)
// ─────────────────────────────────────────────────────────────────────────────

pub const GAUGE_CAP_PCT: f64 = 200.0;
pub const GAUGE_TOO_LOW_PCT: u32 = 70;
pub const GAUGE_IDEAL_MIN_PCT: u32 = 95;
pub const GAUGE_IDEAL_MAX_PCT: u32 = 105;
pub const GAUGE_TOO_HIGH_PCT: u32 = 120;

// ─────────────────────────────────────────────────────────────────────────────
// Gap severity
// ─────────────────────────────────────────────────────────────────────────────

/// Percentage short above which a gap is high severity.
pub const HIGH_SEVERITY_PCT: f64 = 30.0;

/// Percentage short above which a gap is medium severity.
pub const MEDIUM_SEVERITY_PCT: f64 = 15.0;

/// Clamp caller-supplied masses and prices: negative or non-finite becomes zero.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
