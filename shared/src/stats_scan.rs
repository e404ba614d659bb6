//! StatsScan - A struct for computing statistics over floating point data
//!
//! Min, max, sum and mean come from a single pass over the data. Variance
//! needs a second pass with the same slice and is offered with both
//! population (n) and sample (n - 1) normalisation; light-curve segment
//! statistics use the sample convention.
//!
//! NaN values stop the scan and are reported as errors.

use num_traits::float::Float;
use std::fmt;
use thiserror::Error;

/// Error types for StatsScan operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("NaN value encountered at index {0}")]
    NaNEncountered(usize),
    #[error("No data provided (empty slice)")]
    NoData,
    #[error("Need at least {needed} values, got {got}")]
    InsufficientData { needed: usize, got: usize },
}

/// A scanner for statistics over floating point data
#[derive(Debug, Clone)]
pub struct StatsScan<T: Float> {
    min_value: Option<T>,
    max_value: Option<T>,
    sum: T,
    count: usize,
    nan_index: Option<usize>,
}

impl<T: Float + fmt::Debug> StatsScan<T> {
    /// Scan `data` once for min, max, sum and count.
    ///
    /// Scanning stops at the first NaN; every accessor then reports
    /// `StatsError::NaNEncountered` with its index.
    pub fn new(data: &[T]) -> Self {
        let mut min_value: Option<T> = None;
        let mut max_value: Option<T> = None;
        let mut sum = T::zero();
        let mut count = 0usize;
        let mut nan_index = None;

        for (index, &value) in data.iter().enumerate() {
            if value.is_nan() {
                nan_index = Some(index);
                break;
            }

            sum = sum + value;
            count += 1;
            min_value = Some(min_value.map_or(value, |m| m.min(value)));
            max_value = Some(max_value.map_or(value, |m| m.max(value)));
        }

        Self {
            min_value,
            max_value,
            sum,
            count,
            nan_index,
        }
    }

    fn check_nan(&self) -> Result<(), StatsError> {
        match self.nan_index {
            Some(index) => Err(StatsError::NaNEncountered(index)),
            None => Ok(()),
        }
    }

    fn count_as_float(&self, count: usize) -> Result<T, StatsError> {
        T::from(count).ok_or(StatsError::NoData)
    }

    /// Get the minimum value
    pub fn min(&self) -> Result<T, StatsError> {
        self.check_nan()?;
        self.min_value.ok_or(StatsError::NoData)
    }

    /// Get the maximum value
    pub fn max(&self) -> Result<T, StatsError> {
        self.check_nan()?;
        self.max_value.ok_or(StatsError::NoData)
    }

    /// Get both min and max values as a tuple
    pub fn min_max(&self) -> Result<(T, T), StatsError> {
        Ok((self.min()?, self.max()?))
    }

    /// Get the arithmetic mean of the data
    pub fn mean(&self) -> Result<T, StatsError> {
        self.check_nan()?;
        if self.count == 0 {
            return Err(StatsError::NoData);
        }
        Ok(self.sum / self.count_as_float(self.count)?)
    }

    /// Get the sum of all values
    pub fn sum(&self) -> Result<T, StatsError> {
        self.check_nan()?;
        if self.count == 0 {
            return Err(StatsError::NoData);
        }
        Ok(self.sum)
    }

    /// Get the count of values processed
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if NaN values were encountered during computation
    pub fn has_nan(&self) -> bool {
        self.nan_index.is_some()
    }

    fn sum_squared_deviation(&self, data: &[T]) -> Result<T, StatsError> {
        let mean = self.mean()?;
        Ok(data
            .iter()
            .take(self.count)
            .map(|&x| {
                let diff = x - mean;
                diff * diff
            })
            .fold(T::zero(), |acc, x| acc + x))
    }

    /// Population variance (divides by n). `data` must be the slice passed to `new()`.
    pub fn variance(&self, data: &[T]) -> Result<T, StatsError> {
        let n = self.count_as_float(self.count)?;
        Ok(self.sum_squared_deviation(data)? / n)
    }

    /// Population standard deviation
    pub fn std_dev(&self, data: &[T]) -> Result<T, StatsError> {
        Ok(self.variance(data)?.sqrt())
    }

    /// Sample variance (divides by n - 1). Requires at least two values.
    pub fn sample_variance(&self, data: &[T]) -> Result<T, StatsError> {
        self.check_nan()?;
        if self.count < 2 {
            return Err(StatsError::InsufficientData {
                needed: 2,
                got: self.count,
            });
        }
        let n_minus_one = self.count_as_float(self.count - 1)?;
        Ok(self.sum_squared_deviation(data)? / n_minus_one)
    }

    /// Sample standard deviation
    pub fn sample_std_dev(&self, data: &[T]) -> Result<T, StatsError> {
        Ok(self.sample_variance(data)?.sqrt())
    }
}
