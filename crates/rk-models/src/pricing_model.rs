//! The closed set of supported swaption models.

use crate::black::{Black, ShiftedBlack};
use crate::black_derman_toy::BlackDermanToy;
use crate::black_karasinski::BlackKarasinski;
use crate::formula::SwaptionFormula;
use crate::hull_white::HullWhite;
use crate::sabr::{Sabr, ShiftedSabr};
use crate::short_rate::ShortRateModel;

/// A validated swaption pricing model.
///
/// Each variant wraps a parameter holder that checked its inputs on
/// construction, so a `PricingModel` is always usable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingModel {
    /// Lognormal Black.
    Black(Black),
    /// Black on shifted rates.
    ShiftedBlack(ShiftedBlack),
    /// SABR smile.
    Sabr(Sabr),
    /// SABR on shifted rates.
    ShiftedSabr(ShiftedSabr),
    /// Hull-White trinomial lattice.
    HullWhite(HullWhite),
    /// Black-Karasinski trinomial lattice on the log short rate.
    BlackKarasinski(BlackKarasinski),
    /// Black-Derman-Toy binomial lattice.
    BlackDermanToy(BlackDermanToy),
}

impl PricingModel {
    /// The model as a closed-form formula, if it is one.
    pub fn closed_form(&self) -> Option<&dyn SwaptionFormula> {
        match self {
            PricingModel::Black(m) => Some(m),
            PricingModel::ShiftedBlack(m) => Some(m),
            PricingModel::Sabr(m) => Some(m),
            PricingModel::ShiftedSabr(m) => Some(m),
            _ => None,
        }
    }

    /// The model as a short-rate lattice model, if it is one.
    pub fn short_rate(&self) -> Option<&dyn ShortRateModel> {
        match self {
            PricingModel::HullWhite(m) => Some(m),
            PricingModel::BlackKarasinski(m) => Some(m),
            PricingModel::BlackDermanToy(m) => Some(m),
            _ => None,
        }
    }

    /// Model name for log records and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PricingModel::Black(m) => m.name(),
            PricingModel::ShiftedBlack(m) => m.name(),
            PricingModel::Sabr(m) => m.name(),
            PricingModel::ShiftedSabr(m) => m.name(),
            PricingModel::HullWhite(m) => m.name(),
            PricingModel::BlackKarasinski(m) => m.name(),
            PricingModel::BlackDermanToy(m) => m.name(),
        }
    }
}

macro_rules! impl_from_model {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for PricingModel {
                fn from(model: $ty) -> Self {
                    PricingModel::$ty(model)
                }
            }
        )*
    };
}

impl_from_model!(
    Black,
    ShiftedBlack,
    Sabr,
    ShiftedSabr,
    HullWhite,
    BlackKarasinski,
    BlackDermanToy,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<PricingModel> {
        vec![
            Black::new(0.2).unwrap().into(),
            ShiftedBlack::new(0.2, 0.01).unwrap().into(),
            Sabr::new(0.05, 0.5, 0.0, 0.3).unwrap().into(),
            ShiftedSabr::new(0.05, 0.5, 0.0, 0.3, 0.01).unwrap().into(),
            HullWhite::new(0.05, 0.01).unwrap().into(),
            BlackKarasinski::new(0.05, 0.2).unwrap().into(),
            BlackDermanToy::new(0.2).unwrap().into(),
        ]
    }

    #[test]
    fn every_model_has_exactly_one_pricing_route() {
        for model in all() {
            assert!(model.closed_form().is_some() != model.short_rate().is_some());
        }
    }

    #[test]
    fn names() {
        let names: Vec<&str> = all().iter().map(PricingModel::name).collect();
        assert_eq!(
            names,
            [
                "Black",
                "ShiftedBlack",
                "SABR",
                "ShiftedSABR",
                "HullWhite",
                "BlackKarasinski",
                "BlackDermanToy"
            ]
        );
    }

    #[test]
    fn models_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricingModel>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let model: PricingModel = BlackDermanToy::with_term_structure(vec![1.0, 2.0], vec![0.1, 0.2])
            .unwrap()
            .into();
        let json = serde_json::to_string(&model).unwrap();
        let back: PricingModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
