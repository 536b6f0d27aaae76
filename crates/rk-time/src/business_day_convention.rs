//! Rolling rules for dates that land on a weekend.

/// Rule for moving a non-business day onto a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusinessDayConvention {
    /// Roll forward.
    #[default]
    Following,
    /// Roll forward, or backward when rolling forward would change the month.
    ModifiedFollowing,
    /// Roll backward.
    Preceding,
    /// Roll backward, or forward when rolling backward would change the month.
    ModifiedPreceding,
    /// Keep the date as it is.
    Unadjusted,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BusinessDayConvention::Following => "F",
            BusinessDayConvention::ModifiedFollowing => "MF",
            BusinessDayConvention::Preceding => "P",
            BusinessDayConvention::ModifiedPreceding => "MP",
            BusinessDayConvention::Unadjusted => "U",
        })
    }
}
