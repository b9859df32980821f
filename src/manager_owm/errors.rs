use std::fmt;

#[derive(Debug)]
pub enum OWMError {
    Transport(String),
    Document(String),
    Provider { code: u16, message: String },
    NoData(String),
    Malformed(String),
}

impl fmt::Display for OWMError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OWMError::Transport(e) => write!(f, "OWMError::Transport: {}", e),
            OWMError::Document(e) => write!(f, "OWMError::Document: {}", e),
            OWMError::Provider { code, message } => write!(f, "OWMError::Provider: {} {}", code, message),
            OWMError::NoData(e) => write!(f, "OWMError::NoData: {}", e),
            OWMError::Malformed(e) => write!(f, "OWMError::Malformed: {}", e),
        }
    }
}
impl From<reqwest::Error> for OWMError {
    fn from(e: reqwest::Error) -> Self {
        OWMError::Transport(e.to_string())
    }
}
impl From<serde_json::Error> for OWMError {
    fn from(e: serde_json::Error) -> Self {
        OWMError::Document(e.to_string())
    }
}
impl From<crate::manager_forecast::errors::ForecastError> for OWMError {
    fn from(e: crate::manager_forecast::errors::ForecastError) -> Self {
        match e {
            crate::manager_forecast::errors::ForecastError::Validation(msg) => OWMError::Malformed(msg),
        }
    }
}
