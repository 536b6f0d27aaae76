//! Direction of a swap or swaption.

/// Which side of the fixed leg the holder is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapType {
    /// Pay fixed, receive floating.
    Payer,
    /// Receive fixed, pay floating.
    Receiver,
}

impl SwapType {
    /// Sign of the payoff in `F − K`: +1 for a payer, −1 for a receiver.
    pub fn sign(&self) -> f64 {
        match self {
            SwapType::Payer => 1.0,
            SwapType::Receiver => -1.0,
        }
    }

    /// The opposite direction.
    pub fn opposite(&self) -> SwapType {
        match self {
            SwapType::Payer => SwapType::Receiver,
            SwapType::Receiver => SwapType::Payer,
        }
    }
}

impl std::fmt::Display for SwapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapType::Payer => write!(f, "Payer"),
            SwapType::Receiver => write!(f, "Receiver"),
        }
    }
}
