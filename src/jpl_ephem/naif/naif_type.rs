use std::{convert::TryFrom, fmt};

use crate::porkchop_errors::PorkchopError;

/// SPK segment data types.
///
/// Planetary DE kernels only use the Chebyshev types 2 and 3; the others are recognised so
/// that a kernel mixing segment types reports which one it could not evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpkDataType {
    ModifiedDifferenceArray,
    ChebyshevPositionOnly,
    ChebyshevPositionVelocity,
    TwoBodyDiscreteStates,
    EquallySpacedLagrange,
    UnequallySpacedLagrange,
    HermiteUniform,
    HermiteNonUniform,
    ChebyshevNonUniform,
    ChebyshevVelocityOnly,
    ExtendedModifiedDifferenceArray,
}

impl SpkDataType {
    /// Number of Chebyshev coefficient sets per record.
    pub fn components(&self) -> Result<usize, PorkchopError> {
        match self {
            SpkDataType::ChebyshevPositionOnly => Ok(3),
            SpkDataType::ChebyshevPositionVelocity => Ok(6),
            other => Err(PorkchopError::InvalidSpkDataType(i32::from(*other))),
        }
    }
}

impl From<SpkDataType> for i32 {
    fn from(data_type: SpkDataType) -> Self {
        use SpkDataType::*;
        match data_type {
            ModifiedDifferenceArray => 1,
            ChebyshevPositionOnly => 2,
            ChebyshevPositionVelocity => 3,
            TwoBodyDiscreteStates => 5,
            EquallySpacedLagrange => 8,
            UnequallySpacedLagrange => 9,
            HermiteUniform => 12,
            HermiteNonUniform => 13,
            ChebyshevNonUniform => 14,
            ChebyshevVelocityOnly => 20,
            ExtendedModifiedDifferenceArray => 21,
        }
    }
}

impl TryFrom<i32> for SpkDataType {
    type Error = PorkchopError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        use SpkDataType::*;
        match value {
            1 => Ok(ModifiedDifferenceArray),
            2 => Ok(ChebyshevPositionOnly),
            3 => Ok(ChebyshevPositionVelocity),
            5 => Ok(TwoBodyDiscreteStates),
            8 => Ok(EquallySpacedLagrange),
            9 => Ok(UnequallySpacedLagrange),
            12 => Ok(HermiteUniform),
            13 => Ok(HermiteNonUniform),
            14 => Ok(ChebyshevNonUniform),
            20 => Ok(ChebyshevVelocityOnly),
            21 => Ok(ExtendedModifiedDifferenceArray),
            _ => Err(PorkchopError::InvalidSpkDataType(value)),
        }
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpkDataType::ModifiedDifferenceArray => "Modified Difference Array",
            SpkDataType::ChebyshevPositionOnly => "Chebyshev Position Only",
            SpkDataType::ChebyshevPositionVelocity => "Chebyshev Position Velocity",
            SpkDataType::TwoBodyDiscreteStates => "Two Body Discrete States",
            SpkDataType::EquallySpacedLagrange => "Equally Spaced Lagrange",
            SpkDataType::UnequallySpacedLagrange => "Unequally Spaced Lagrange",
            SpkDataType::HermiteUniform => "Hermite Uniform",
            SpkDataType::HermiteNonUniform => "Hermite Non-Uniform",
            SpkDataType::ChebyshevNonUniform => "Chebyshev Non-Uniform",
            SpkDataType::ChebyshevVelocityOnly => "Chebyshev Velocity Only",
            SpkDataType::ExtendedModifiedDifferenceArray => "Extended Modified Difference Array",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test_spk_type {
    use super::*;

    #[test]
    fn test_spk_type_conversion() {
        assert_eq!(
            SpkDataType::try_from(2).unwrap(),
            SpkDataType::ChebyshevPositionOnly
        );
        assert_eq!(i32::from(SpkDataType::ChebyshevVelocityOnly), 20);
        assert_eq!(
            SpkDataType::try_from(4),
            Err(PorkchopError::InvalidSpkDataType(4))
        );
        assert_eq!(SpkDataType::ChebyshevPositionVelocity.components().unwrap(), 6);
        assert_eq!(
            SpkDataType::TwoBodyDiscreteStates.components(),
            Err(PorkchopError::InvalidSpkDataType(5))
        );
    }
}
