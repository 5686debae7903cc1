//! L4 Atomic Layer: Pure easing functions
//!
//! Every easing maps progress in [0, 1] to eased progress in [0, 1]. Names
//! follow the `power3.out` notation used by page authors, so configuration
//! files can spell curves the way designers hand them over.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which end of the curve the acceleration happens at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

/// Easing curve applied to tween and scrub progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// Constant velocity (`none` / `linear`)
    #[default]
    Linear,
    /// Polynomial curve; `Power(1, _)` is quadratic up to `Power(4, _)` quintic
    Power(u8, EaseDirection),
    /// Exponential curve: 2^(10(t-1)) and its mirrors
    Expo(EaseDirection),
    /// Smooth-scroll curve: min(1, 1.001 - 2^(-10t))
    Lenis,
}

impl Easing {
    pub const POWER2_OUT: Easing = Easing::Power(2, EaseDirection::Out);
    pub const POWER3_OUT: Easing = Easing::Power(3, EaseDirection::Out);

    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power(degree, dir) => {
                let exp = i32::from(degree.clamp(1, 4)) + 1;
                match dir {
                    EaseDirection::In => t.powi(exp),
                    EaseDirection::Out => 1.0 - (1.0 - t).powi(exp),
                    EaseDirection::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exp) / 2.0
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(exp) / 2.0
                        }
                    }
                }
            }
            Easing::Expo(dir) => match dir {
                EaseDirection::In => expo_in(t),
                EaseDirection::Out => 1.0 - expo_in(1.0 - t),
                EaseDirection::InOut => {
                    if t < 0.5 {
                        expo_in(2.0 * t) / 2.0
                    } else {
                        1.0 - expo_in(2.0 * (1.0 - t)) / 2.0
                    }
                }
            },
            Easing::Lenis => lenis(t),
        }
    }
}

/// Exponential ease-in with exact endpoints: f(t) = 2^(10(t-1))
#[inline]
fn expo_in(t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f64.powf(10.0 * (t - 1.0))
    }
}

/// f(t) = min(1, 1.001 - 2^(-10t))
///
/// Starts at 0.001 rather than 0, which is how the curve is usually shipped
#[inline]
fn lenis(t: f64) -> f64 {
    (1.001 - 2.0_f64.powf(-10.0 * t)).min(1.0)
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "none" | "linear" => return Ok(Easing::Linear),
            "lenis" => return Ok(Easing::Lenis),
            _ => {}
        }

        let (family, dir) = match name.split_once('.') {
            Some((family, "in")) => (family, EaseDirection::In),
            Some((family, "out")) => (family, EaseDirection::Out),
            Some((family, "inout")) => (family, EaseDirection::InOut),
            Some(_) => return Err(Error::InvalidEasing(s.to_string())),
            // A bare family name means `.out`
            None => (name.as_str(), EaseDirection::Out),
        };

        match family {
            "power1" | "quad" => Ok(Easing::Power(1, dir)),
            "power2" | "cubic" => Ok(Easing::Power(2, dir)),
            "power3" | "quart" => Ok(Easing::Power(3, dir)),
            "power4" | "quint" => Ok(Easing::Power(4, dir)),
            "expo" => Ok(Easing::Expo(dir)),
            _ => Err(Error::InvalidEasing(s.to_string())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = |d: EaseDirection| match d {
            EaseDirection::In => "in",
            EaseDirection::Out => "out",
            EaseDirection::InOut => "inOut",
        };
        match *self {
            Easing::Linear => write!(f, "none"),
            Easing::Power(degree, d) => write!(f, "power{}.{}", degree, dir(d)),
            Easing::Expo(d) => write!(f, "expo.{}", dir(d)),
            Easing::Lenis => write!(f, "lenis"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::Power(1, EaseDirection::Out),
        Easing::Power(2, EaseDirection::In),
        Easing::Power(3, EaseDirection::Out),
        Easing::Power(4, EaseDirection::InOut),
        Easing::Expo(EaseDirection::Out),
        Easing::Expo(EaseDirection::InOut),
        Easing::Lenis,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            // Lenis starts just above zero
            if easing != Easing::Lenis {
                assert!(easing.apply(0.0).abs() < 0.001, "{:?} at t=0", easing);
            }
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev - 1e-12, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_power3_out_is_quartic() {
        let v = Easing::POWER3_OUT.apply(0.5);
        assert!((v - (1.0 - 0.5_f64.powi(4))).abs() < 1e-9);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power3.out".parse::<Easing>().unwrap(), Easing::POWER3_OUT);
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("Power2.InOut".parse::<Easing>().unwrap(), Easing::Power(2, EaseDirection::InOut));
        assert_eq!("expo".parse::<Easing>().unwrap(), Easing::Expo(EaseDirection::Out));
        assert!("bounce.out".parse::<Easing>().is_err());
        assert!("power2.sideways".parse::<Easing>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for easing in ALL {
            let parsed: Easing = easing.to_string().parse().unwrap();
            assert_eq!(parsed, easing);
        }
    }
}
