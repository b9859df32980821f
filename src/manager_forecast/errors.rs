use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ForecastError {
    Validation(String),
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ForecastError::Validation(e) => write!(f, "ForecastError::Validation: {}", e),
        }
    }
}
