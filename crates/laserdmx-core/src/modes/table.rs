use serde::Serialize;

use super::error::EncodeError;

/// Closed sub-range `[lo, hi]` of a channel byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeRange {
    pub lo: u8,
    pub hi: u8,
}

impl ModeRange {
    pub const FULL: ModeRange = ModeRange::new(0, 255);

    pub const fn new(lo: u8, hi: u8) -> Self {
        Self { lo, hi }
    }

    pub fn contains(self, value: u16) -> bool {
        u16::from(self.lo) <= value && value <= u16::from(self.hi)
    }
}

/// A feature's fixed mode table.
///
/// Implemented by the closed mode enums generated with `mode_table!`.
pub trait ModeTable: Copy + Sized + 'static {
    /// Feature token used in errors and listings.
    const FEATURE: &'static str;
    /// Every mode, in ascending range order.
    const ALL: &'static [Self];

    fn token(self) -> &'static str;

    fn range(self) -> ModeRange;

    /// Look up a mode by its token.
    ///
    /// # Errors
    /// Returns `EncodeError::UnknownMode` when no mode carries `token`.
    fn parse(token: &str) -> Result<Self, EncodeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.token() == token)
            .ok_or_else(|| EncodeError::UnknownMode {
                feature: Self::FEATURE,
                mode: token.to_string(),
            })
    }

    /// Resolve the byte for this mode.
    ///
    /// Without an explicit value the lower bound of the range is used.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueOutOfRange` when `value` lies outside the
    /// mode's range.
    fn resolve(self, value: Option<u16>) -> Result<u8, EncodeError> {
        let range = self.range();
        match value {
            None => Ok(range.lo),
            Some(value) => checked_byte(value, range, Self::FEATURE, self.token()),
        }
    }
}

/// Narrow `value` to a byte if it lies inside `range`.
pub(crate) fn checked_byte(
    value: u16,
    range: ModeRange,
    feature: &'static str,
    mode: &'static str,
) -> Result<u8, EncodeError> {
    let out_of_range = || EncodeError::ValueOutOfRange {
        feature,
        mode,
        value,
        lo: range.lo,
        hi: range.hi,
    };
    if !range.contains(value) {
        return Err(out_of_range());
    }
    u8::try_from(value).map_err(|_| out_of_range())
}

/// Generate a closed mode enum and its `ModeTable`, `FromStr` and `Display`
/// impls from `Variant => "token", lo..=hi;` rows.
macro_rules! mode_table {
    (
        $(#[$meta:meta])*
        $name:ident, $feature:literal {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal, $lo:literal ..= $hi:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $crate::modes::table::ModeTable for $name {
            const FEATURE: &'static str = $feature;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            fn range(self) -> $crate::modes::table::ModeRange {
                match self {
                    $($name::$variant => $crate::modes::table::ModeRange::new($lo, $hi),)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::modes::error::EncodeError;

            fn from_str(token: &str) -> Result<Self, Self::Err> {
                <Self as $crate::modes::table::ModeTable>::parse(token)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::modes::table::ModeTable::token(*self))
            }
        }
    };
}

pub(crate) use mode_table;

#[cfg(test)]
mod tests {
    use super::{ModeRange, ModeTable};
    use crate::modes::error::EncodeError;

    mode_table! {
        Probe, "probe" {
            Low => "low", 0..=9;
            High => "high", 10..=255;
        }
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = ModeRange::new(128, 159);
        assert!(range.contains(128));
        assert!(range.contains(159));
        assert!(!range.contains(127));
        assert!(!range.contains(160));
        assert!(!range.contains(300));
    }

    #[test]
    fn resolve_defaults_to_lower_bound() {
        assert_eq!(Probe::High.resolve(None).unwrap(), 10);
    }

    #[test]
    fn resolve_rejects_value_outside_mode() {
        let err = Probe::Low.resolve(Some(10)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::ValueOutOfRange {
                feature: "probe",
                mode: "low",
                value: 10,
                lo: 0,
                hi: 9,
            }
        );
    }

    #[test]
    fn parse_uses_tokens() {
        assert_eq!("high".parse::<Probe>().unwrap(), Probe::High);
        assert_eq!(Probe::Low.to_string(), "low");
        let err = "medium".parse::<Probe>().unwrap_err();
        assert!(matches!(err, EncodeError::UnknownMode { feature: "probe", .. }));
    }
}
