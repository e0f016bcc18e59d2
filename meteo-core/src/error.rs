use thiserror::Error;

/// Reasons a lookup can fail. The display text is what callers see in the
/// `error` field of an [`ErrorResult`](crate::model::ErrorResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("City not found")]
    CityNotFound,

    #[error("Weather data unavailable")]
    WeatherUnavailable,

    #[error("Forecast data unavailable")]
    ForecastUnavailable,

    #[error("Historical data not available")]
    HistoricalUnavailable,

    #[error("No data for given date")]
    NoDataForDate,

    /// Daily arrays in the provider response differ in length.
    #[error("Inconsistent daily data from provider")]
    InconsistentDaily,

    /// Transport, status or decoding failure while fetching weather data.
    #[error("Weather service request failed: {0}")]
    Upstream(String),
}

impl LookupError {
    pub(crate) fn upstream(err: &anyhow::Error) -> Self {
        LookupError::Upstream(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(LookupError::CityNotFound.to_string(), "City not found");
        assert_eq!(LookupError::WeatherUnavailable.to_string(), "Weather data unavailable");
        assert_eq!(LookupError::ForecastUnavailable.to_string(), "Forecast data unavailable");
        assert_eq!(LookupError::HistoricalUnavailable.to_string(), "Historical data not available");
        assert_eq!(LookupError::NoDataForDate.to_string(), "No data for given date");
    }

    #[test]
    fn upstream_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to send request");
        let mapped = LookupError::upstream(&err);

        assert_eq!(
            mapped.to_string(),
            "Weather service request failed: Failed to send request: connection refused"
        );
    }
}
