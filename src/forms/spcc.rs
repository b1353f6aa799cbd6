//! SPCC evaluation form.

use serde::Deserialize;

use crate::domain::spcc::SpccPillars;
use crate::domain::types::PillarScore;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
/// Raw pillar scores, each expected in `0..=10`.
pub struct SpccForm {
    pub situation: i32,
    pub purchasing_power: i32,
    pub commitment: i32,
    pub clarity: i32,
}

impl TryFrom<SpccForm> for SpccPillars {
    type Error = FormError;

    fn try_from(form: SpccForm) -> Result<Self, Self::Error> {
        Ok(SpccPillars::new(
            PillarScore::new(form.situation)?,
            PillarScore::new(form.purchasing_power)?,
            PillarScore::new(form.commitment)?,
            PillarScore::new(form.clarity)?,
        ))
    }
}
