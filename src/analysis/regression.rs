use crate::analysis::error::AnalysisError;

/// Ordinary least squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r_value: f64,
    /// Number of points the fit was computed from.
    pub n: usize,
}

impl RegressionFit {
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The fitted line as `y = <slope>x + <intercept>`, both rounded to two decimals.
    ///
    /// ```
    /// use cityweather::RegressionFit;
    ///
    /// let fit = RegressionFit { slope: -0.456, intercept: 30.0, r_value: -0.8, n: 10 };
    /// assert_eq!(fit.equation(), "y = -0.46x + 30.0");
    /// ```
    pub fn equation(&self) -> String {
        format!(
            "y = {}x + {}",
            format_rounded(self.slope),
            format_rounded(self.intercept)
        )
    }
}

/// Rounds to two decimals, ties to even, and prints the shortest form that keeps
/// one decimal digit.
fn format_rounded(value: f64) -> String {
    let rounded = (value * 100.0).round_ties_even() / 100.0;
    // No "-0.0"; Debug keeps the ".0" on whole numbers.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:?}")
}

/// Fits a least squares line through `(x[i], y[i])`.
///
/// When every `y` is the same the line is flat and `r_value` is `0`.
///
/// # Errors
///
/// [`AnalysisError::LengthMismatch`] when the inputs differ in length,
/// [`AnalysisError::TooFewPoints`] below two points, [`AnalysisError::ZeroVariance`]
/// when all `x` are equal.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<RegressionFit, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::TooFewPoints(n));
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut ss_xx, mut ss_yy, mut ss_xy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r_value = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    Ok(RegressionFit {
        slope,
        intercept,
        r_value,
        n,
    })
}
