//! # Constants and type definitions for eclipse_solver
//!
//! This module centralizes the **physical constants**, **conversion factors**, the **fixed
//! numerical parameters** of the tangency solver, and the **unit aliases** used throughout the
//! crate.
//!
//! ## Overview
//!
//! - Earth figure (equatorial radius, axis ratio of the reference ellipsoid)
//! - Unit conversions (degrees ↔ radians, hours ↔ seconds, JD ↔ MJD)
//! - Iteration caps and tolerances of the tangency solver
//! - Type aliases expressing the unit of a quantity
//!
//! The solver constants are part of the algorithm, not configuration: changing them changes
//! which "no limit" cases are reported.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.0;

/// Ratio of the polar to the equatorial radius used by the Besselian reduction (b/a)
pub const EARTH_AXIS_RATIO: f64 = 0.99664719;

/// Earth rotation per second of ΔT, in degrees (`1.002738 × 15″`)
pub const EARTH_ROTATION_DEG_PER_SEC: f64 = 0.00417807;

// -------------------------------------------------------------------------------------------------
// Tangency solver parameters
// -------------------------------------------------------------------------------------------------

/// Maximum number of fixed-point steps on the time axis
pub const MAX_TIME_ITERATIONS: usize = 20;

/// Maximum number of fixed-point steps on the latitude axis (per seed)
pub const MAX_LATITUDE_ITERATIONS: usize = 50;

/// Convergence threshold on the time correction, in hours
pub const TIME_TOLERANCE: f64 = 1e-6;

/// Convergence threshold on the latitude correction, in radians
pub const LATITUDE_TOLERANCE: f64 = 1e-6;

/// Largest latitude step allowed in one iteration, in radians (damping of the fixed point)
pub const MAX_LATITUDE_STEP: f64 = 15.0 * RADEG;

/// Seed latitudes tried, in order, when the iteration from the caller's seed does not settle
pub const FALLBACK_SEED_LATITUDES: [f64; 2] = [80.0 * RADEG, -80.0 * RADEG];

/// Apparent altitude of the Sun's centre at the refraction-limited horizon (−34′)
pub const REFRACTION_FLOOR: f64 = -34.0 / 60.0 * RADEG;

/// Largest north/south spread accepted when exactly one side of a limit pair saturates at a pole
pub const MAX_SATURATED_SPREAD_DEG: f64 = 25.0;

/// Chauvenet enlargement applied to the geometric radii of the Earth's shadow
pub const CHAUVENET_ENLARGEMENT: f64 = 50.9 / 50.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Time offset in hours
pub type Hours = f64;
/// Duration in seconds
pub type Seconds = f64;
/// Distance in the fundamental plane, in Earth equatorial radii
pub type EarthRadii = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
