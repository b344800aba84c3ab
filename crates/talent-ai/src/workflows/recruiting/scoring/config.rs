use serde::{Deserialize, Serialize};

use super::super::filters::ValidationError;

/// Weights for the five scoring factors. The total score is out of their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub behavioral: f64,
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            behavioral: 30.0,
            skills: 30.0,
            experience: 20.0,
            location: 10.0,
            salary: 10.0,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.behavioral + self.skills + self.experience + self.location + self.salary
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("behavioral", self.behavioral),
            ("skills", self.skills),
            ("experience", self.experience),
            ("location", self.location),
            ("salary", self.salary),
        ];
        for (factor, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ValidationError::InvalidWeight {
                    factor: factor.to_string(),
                    value: weight,
                });
            }
        }
        Ok(())
    }
}
