//! Physical constants used by the species and reaction formulas
//!
//! Values are in CGS units unless the name says otherwise, and match the
//! CODATA values commonly tabulated for nuclear astrophysics codes.

/// Avogadro's number (mol^-1)
pub const AVOGADRO: f64 = 6.02214199e23;

/// Boltzmann constant (erg/K)
pub const BOLTZMANN: f64 = 1.3806504e-16;

/// One electron volt in ergs
pub const ELECTRON_VOLT: f64 = 1.602176487e-12;

/// Reduced Planck constant (erg s)
pub const HBAR: f64 = 1.05457162825e-27;

/// Speed of light (cm/s)
pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

/// Unified atomic mass unit (g)
pub const ATOMIC_MASS_UNIT: f64 = 1.660538782e-24;

/// Electron rest mass (g)
pub const MASS_ELECTRON: f64 = 9.10938215e-28;

/// Conversion from MeV to ergs
pub const MEV_TO_ERGS: f64 = 1.0e6 * ELECTRON_VOLT;

/// Conversion from ergs to MeV
pub const ERGS_TO_MEV: f64 = 1.0e-6 / ELECTRON_VOLT;

/// Atomic mass unit as an energy (MeV)
pub const AMU_TO_MEV: f64 = ATOMIC_MASS_UNIT * SPEED_OF_LIGHT * SPEED_OF_LIGHT * ERGS_TO_MEV;

/// Electron rest mass as an energy (MeV)
pub const MASS_ELECTRON_MEV: f64 = MASS_ELECTRON * SPEED_OF_LIGHT * SPEED_OF_LIGHT * ERGS_TO_MEV;

/// Boltzmann constant in MeV per 10^9 K, i.e. kT in MeV is this times T9
pub const BOLTZMANN_MEV_PER_T9: f64 = BOLTZMANN * ERGS_TO_MEV * 1.0e9;

/// Cut off for the exponent of a reverse rate before both rates are zeroed
pub const D_LARGE: f64 = 115.13;

/// Exponent below which a reverse rate is considered zero
pub const D_SMALL: f64 = -300.0;
