use std::ops::RangeInclusive;

use crate::domain::availability::ForecastId;

pub const DEFAULT_FORECAST_SIZE: u32 = 24;

/// Fetch the controller has to start after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    None,
    FetchForecasts,
    FetchSize(ForecastId),
}

/// Forecast selection, time shift and forecast size kept mutually
/// consistent: `shift < forecast_size` holds after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    forecast_id: Option<ForecastId>,
    shift: u32,
    forecast_size: u32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            forecast_id: None,
            shift: 0,
            forecast_size: DEFAULT_FORECAST_SIZE,
        }
    }
}

impl NavigationState {
    #[must_use]
    pub fn forecast_id(&self) -> Option<&ForecastId> {
        self.forecast_id.as_ref()
    }

    #[must_use]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[must_use]
    pub fn forecast_size(&self) -> u32 {
        self.forecast_size
    }

    #[must_use]
    pub fn shift_range(&self) -> RangeInclusive<u32> {
        0..=self.forecast_size - 1
    }

    pub fn select_model(&mut self) -> NavEffect {
        self.forecast_id = None;
        self.shift = 0;
        NavEffect::FetchForecasts
    }

    pub fn select_forecast(&mut self, id: ForecastId) -> NavEffect {
        self.forecast_id = Some(id.clone());
        self.shift = 0;
        NavEffect::FetchSize(id)
    }

    pub fn size_loaded(&mut self, size: i64) {
        self.forecast_size = u32::try_from(size.max(1)).unwrap_or(u32::MAX);
        if self.shift >= self.forecast_size {
            self.shift = 0;
        }
    }

    pub fn size_failed(&mut self) {
        self.forecast_size = DEFAULT_FORECAST_SIZE;
        self.shift = 0;
    }

    /// Accepts `value` only inside `shift_range`; anything else is a no-op.
    pub fn set_shift(&mut self, value: i64) -> bool {
        match u32::try_from(value) {
            Ok(shift) if shift < self.forecast_size => {
                self.shift = shift;
                true
            }
            _ => false,
        }
    }

    pub fn step_shift(&mut self, delta: i64) -> bool {
        self.set_shift(i64::from(self.shift) + delta)
    }

    pub fn first_shift(&mut self) -> bool {
        self.set_shift(0)
    }

    pub fn last_shift(&mut self) -> bool {
        self.set_shift(i64::from(self.forecast_size) - 1)
    }
}
