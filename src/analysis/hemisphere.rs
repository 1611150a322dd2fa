use crate::analysis::error::AnalysisError;
use crate::analysis::regression::{linear_regression, RegressionFit};
use crate::types::city_record::CityRecord;
use crate::types::weather_variable::WeatherVariable;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    pub const ALL: [Hemisphere; 2] = [Hemisphere::Northern, Hemisphere::Southern];

    /// Whether a latitude belongs to this hemisphere. The equator belongs to both.
    pub fn contains(&self, lat: f64) -> bool {
        match self {
            Hemisphere::Northern => lat >= 0.0,
            Hemisphere::Southern => lat <= 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Hemisphere::Northern => "Northern",
            Hemisphere::Southern => "Southern",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits records into `(northern, southern)`.
///
/// A city exactly on the equator ends up in both halves.
pub fn split_hemispheres(records: &[CityRecord]) -> (Vec<&CityRecord>, Vec<&CityRecord>) {
    let northern = records
        .iter()
        .filter(|r| Hemisphere::Northern.contains(r.lat))
        .collect();
    let southern = records
        .iter()
        .filter(|r| Hemisphere::Southern.contains(r.lat))
        .collect();
    (northern, southern)
}

/// One weather variable regressed against latitude within one hemisphere.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereRegression {
    pub hemisphere: Hemisphere,
    pub variable: WeatherVariable,
    pub fit: RegressionFit,
    /// Plot coordinates where the equation is written.
    pub annotation: (f64, f64),
}

impl HemisphereRegression {
    /// e.g. `Max Temperature vs. Latitude in the Northern Hemisphere`
    pub fn title(&self) -> String {
        let subject = match self.variable {
            WeatherVariable::MaxTemp => "Max Temperature",
            other => other.title_name(),
        };
        format!(
            "{} vs. Latitude in the {} Hemisphere",
            subject, self.hemisphere
        )
    }

    pub fn equation(&self) -> String {
        self.fit.equation()
    }

    /// e.g. `northern_max_temp_regression`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_regression",
            self.hemisphere.name().to_lowercase(),
            self.variable.column().to_lowercase().replace(' ', "_")
        )
    }
}

/// Fits `variable` against latitude over the cities of `hemisphere`.
pub fn regress_against_latitude(
    records: &[CityRecord],
    hemisphere: Hemisphere,
    variable: WeatherVariable,
) -> Result<HemisphereRegression, AnalysisError> {
    let (x, y): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter(|r| hemisphere.contains(r.lat))
        .map(|r| (r.lat, variable.value(r)))
        .unzip();
    let fit = linear_regression(&x, &y)?;
    Ok(HemisphereRegression {
        hemisphere,
        variable,
        fit,
        annotation: variable.annotation_anchor(hemisphere),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::tests::record;

    #[test]
    fn test_equator_is_in_both_hemispheres() {
        let records = vec![
            record("north", 10.0, 20.0, 0, 1.0),
            record("equator", 0.0, 20.0, 0, 1.0),
            record("south", -10.0, 20.0, 0, 1.0),
        ];
        let (northern, southern) = split_hemispheres(&records);
        let names = |rows: &[&CityRecord]| rows.iter().map(|r| r.city.clone()).collect::<Vec<_>>();
        assert_eq!(names(&northern), vec!["north", "equator"]);
        assert_eq!(names(&southern), vec!["equator", "south"]);
    }

    #[test]
    fn test_regress_temperature_in_north() {
        // Temperature falls 0.5 degrees per degree of latitude.
        let records: Vec<CityRecord> = (0..5)
            .map(|i| {
                let lat = 10.0 * i as f64;
                record(&format!("c{i}"), lat, 30.0 - 0.5 * lat, 0, 1.0)
            })
            .chain([record("southern", -30.0, 99.0, 0, 1.0)])
            .collect();

        let regression =
            regress_against_latitude(&records, Hemisphere::Northern, WeatherVariable::MaxTemp)
                .unwrap();
        assert_eq!(regression.fit.n, 5);
        assert!((regression.fit.slope + 0.5).abs() < 1e-9);
        assert!((regression.fit.r_squared() - 1.0).abs() < 1e-9);
        assert_eq!(regression.equation(), "y = -0.5x + 30.0");
        assert_eq!(regression.annotation, (5.8, 0.1));
        assert_eq!(
            regression.title(),
            "Max Temperature vs. Latitude in the Northern Hemisphere"
        );
    }

    #[test]
    fn test_regress_with_too_few_points() {
        let records = vec![record("only", -5.0, 20.0, 0, 1.0)];
        assert_eq!(
            regress_against_latitude(&records, Hemisphere::Southern, WeatherVariable::WindSpeed),
            Err(AnalysisError::TooFewPoints(1))
        );
    }

    #[test]
    fn test_titles() {
        let fit = RegressionFit {
            slope: 0.0,
            intercept: 0.0,
            r_value: 0.0,
            n: 2,
        };
        let regression = HemisphereRegression {
            hemisphere: Hemisphere::Southern,
            variable: WeatherVariable::WindSpeed,
            fit,
            annotation: WeatherVariable::WindSpeed.annotation_anchor(Hemisphere::Southern),
        };
        assert_eq!(
            regression.title(),
            "Wind Speed vs. Latitude in the Southern Hemisphere"
        );
        assert_eq!(regression.annotation, (-55.0, 9.0));
        assert_eq!(regression.file_stem(), "southern_wind_speed_regression");
    }
}
