//! Offline planning report.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use visit_core::{plan_visit, MissionPlan, PlanSettings, Position, SpeedUnits, Waypoint};

/// Everything computed for one planning pass, in printable form.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// Visiting order as indices into the input point list (0-based)
    pub visit_order: Vec<usize>,
    pub tour_length_m: f64,
    /// Only set when the plan speed is in meters per second
    pub estimated_duration_s: Option<f64>,
    pub distance_matrix: Vec<Vec<f64>>,
    pub plan: MissionPlan,
}

/// Plan a visit of `waypoints` from `origin` and collect the results.
pub fn build_report(
    origin: Position,
    waypoints: &[Waypoint],
    settings: &PlanSettings,
) -> PlanReport {
    let visit = plan_visit(origin, waypoints, settings);

    let estimated_duration_s = match settings.speed_units {
        SpeedUnits::MetersPerSecond if settings.speed > 0.0 => {
            Some(visit.route.cost / f64::from(settings.speed))
        }
        _ => None,
    };

    PlanReport {
        visit_order: visit.route.order.iter().map(|node| node - 1).collect(),
        tour_length_m: visit.route.cost,
        estimated_duration_s,
        distance_matrix: visit.matrix.rows().map(|row| row.to_vec()).collect(),
        plan: visit.plan,
    }
}

/// Parse a `"LAT,LON"` pair in degrees.
pub fn parse_lat_lon(raw: &str) -> Result<(f64, f64)> {
    let mut parts = raw.split(',').map(str::trim);
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected LAT,LON but got {raw:?}");
    };
    let lat: f64 = lat.parse().with_context(|| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon.parse().with_context(|| format!("invalid longitude {lon:?}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("coordinate out of range: {lat},{lon}");
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair() {
        assert_eq!(parse_lat_lon("41.18, -8.70").unwrap(), (41.18, -8.70));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_lat_lon("41.18").is_err());
        assert!(parse_lat_lon("41.18,-8.70,3").is_err());
        assert!(parse_lat_lon("north,-8.70").is_err());
        assert!(parse_lat_lon("91,0").is_err());
    }

    #[test]
    fn report_uses_zero_based_order_and_speed() {
        let origin = Position::from_degrees(41.1840, -8.7080);
        let wps = vec![
            Waypoint::from_degrees(41.1850, -8.7060),
            Waypoint::from_degrees(41.1870, -8.7020),
        ];
        let settings = PlanSettings::default();
        let report = build_report(origin, &wps, &settings);

        let mut order = report.visit_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(report.distance_matrix.len(), 3);
        assert_eq!(report.plan.maneuvers.len(), 3);

        let duration = report.estimated_duration_s.unwrap();
        assert!((duration - report.tour_length_m / f64::from(settings.speed)).abs() < 1e-9);
    }
}
