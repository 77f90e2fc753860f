use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde name of each variant is the same string as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UserRole {
    Doctor => "doctor",
    Admin => "admin",
    Researcher => "researcher",
    Patient => "patient",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(InputCategory {
    Symptom => "symptom",
    Vital => "vital",
    Lab => "lab",
});

str_enum!(SeverityBand {
    Normal => "normal",
    Moderate => "moderate",
    Severe => "severe",
});

impl SeverityBand {
    /// The option set offered for every categorical input.
    pub const ALL: [SeverityBand; 3] = [Self::Normal, Self::Moderate, Self::Severe];
}

impl InputCategory {
    /// Display order of input groups in the diagnosis form.
    pub const ALL: [InputCategory; 3] = [Self::Symptom, Self::Vital, Self::Lab];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn user_role_round_trip() {
        for (variant, s) in [
            (UserRole::Doctor, "doctor"),
            (UserRole::Admin, "admin"),
            (UserRole::Researcher, "researcher"),
            (UserRole::Patient, "patient"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(UserRole::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn risk_level_serializes_lowercase() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, RiskLevel::High);
    }

    #[test]
    fn severity_band_lists_three_options() {
        assert_eq!(SeverityBand::ALL.len(), 3);
        assert_eq!(SeverityBand::ALL[2].to_string(), "severe");
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(UserRole::from_str("nurse").is_err());
        assert!(Gender::from_str("").is_err());
        assert!(InputCategory::from_str("Symptom").is_err());
    }
}
