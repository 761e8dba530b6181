//! The validation rules.

use botkit_assembly::PartTree;
use botkit_ir::{OperatingRequirements, Specs};
use tracing::debug;

use crate::component::Component;
use crate::verdict::{Budget, ErrorCode, Metrics, Verdict};

/// Check an assembly against its operating requirements.
///
/// Every check runs independently; failures are reported in the order
/// overweight, power, climb, missing chassis. Checks that need a chassis or
/// a battery are skipped when there is none, so an empty assembly only
/// reports [`ErrorCode::NoChassis`].
pub fn validate<I>(parts: I, requirements: &OperatingRequirements) -> Verdict
where
    I: IntoIterator,
    I::Item: Component,
{
    let mut budget = Budget::default();
    let mut cost = 0.0;

    for part in parts {
        let specs = part.specs();
        budget.total_weight += specs.weight();
        budget.total_power_draw += specs.power_draw();
        cost += part.unit_price();

        match *specs {
            Specs::Chassis {
                weight,
                max_payload,
                climb_angle,
                ..
            } => {
                budget.has_chassis = true;
                budget.max_payload += max_payload;
                budget.max_climb_angle = budget.max_climb_angle.max(climb_angle);
                budget.chassis_weight += weight;
            }
            Specs::Battery { max_output, .. } => {
                budget.has_battery = true;
                budget.max_power_output += max_output;
            }
            _ => {}
        }
    }
    budget.payload_in_use = budget.total_weight - budget.chassis_weight;

    let mut errors = Vec::new();
    if budget.has_chassis && budget.payload_in_use > budget.max_payload {
        errors.push(ErrorCode::Overweight);
    }
    if budget.has_battery && budget.total_power_draw > budget.max_power_output {
        errors.push(ErrorCode::PowerLow);
    }
    if budget.has_chassis && requirements.slope > budget.max_climb_angle {
        errors.push(ErrorCode::ClimbFail);
    }
    if !budget.has_chassis {
        errors.push(ErrorCode::NoChassis);
    }

    let metrics = Metrics {
        weight: budget.total_weight,
        power: budget.total_power_draw,
        cost,
        payload_utilization: percent(budget.payload_in_use, budget.max_payload),
        power_utilization: percent(budget.total_power_draw, budget.max_power_output),
    };

    debug!(
        valid = errors.is_empty(),
        ?errors,
        weight = metrics.weight,
        power = metrics.power,
        "validated assembly"
    );

    Verdict {
        is_valid: errors.is_empty(),
        errors,
        metrics,
        budget,
    }
}

/// Validate every part in a tree.
pub fn validate_tree(tree: &PartTree, requirements: &OperatingRequirements) -> Verdict {
    validate(tree.parts(), requirements)
}

fn percent(used: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        used / capacity * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use botkit_assembly::{Command, Part};
    use botkit_catalog::{Catalog, FallbackCatalog};
    use botkit_ir::Category;
    use botkit_math::Transform;

    fn chassis(weight: f64, max_payload: f64, climb_angle: f64) -> Specs {
        Specs::Chassis {
            weight,
            dims: [0.6, 0.5, 0.3],
            max_payload,
            max_speed: 1.0,
            climb_angle,
        }
    }

    fn battery(weight: f64, max_output: f64) -> Specs {
        Specs::Battery {
            weight,
            dims: [0.2, 0.1, 0.1],
            capacity: 480.0,
            voltage: 24.0,
            max_output,
        }
    }

    fn sensor(weight: f64, power: f64) -> Specs {
        Specs::Sensor {
            weight,
            dims: [0.1, 0.1, 0.1],
            power,
            range: None,
            fov_h: None,
            fov_v: None,
        }
    }

    fn requirements(slope: f64) -> OperatingRequirements {
        OperatingRequirements {
            slope,
            ..OperatingRequirements::default()
        }
    }

    #[test]
    fn test_reference_assembly_is_valid() {
        let parts = [chassis(30.0, 80.0, 15.0), battery(3.5, 500.0), sensor(0.8, 8.0)];
        let verdict = validate(&parts, &requirements(0.0));

        assert!(verdict.is_valid);
        assert!(verdict.errors.is_empty());
        assert_relative_eq!(verdict.budget.total_weight, 34.3, epsilon = 1e-9);
        assert_relative_eq!(verdict.budget.payload_in_use, 4.3, epsilon = 1e-9);
        assert_relative_eq!(verdict.metrics.payload_utilization, 5.375, epsilon = 1e-9);
        assert_relative_eq!(verdict.metrics.power_utilization, 1.6, epsilon = 1e-9);
    }

    #[test]
    fn test_slope_steeper_than_climb_angle() {
        let parts = [chassis(30.0, 80.0, 15.0), battery(3.5, 500.0), sensor(0.8, 8.0)];
        let verdict = validate(&parts, &requirements(20.0));
        assert!(!verdict.is_valid);
        assert_eq!(verdict.errors, vec![ErrorCode::ClimbFail]);

        // Equal slope is still climbable.
        assert!(validate(&parts, &requirements(15.0)).is_valid);
    }

    #[test]
    fn test_no_chassis() {
        let parts = [battery(3.5, 500.0), sensor(0.8, 8.0)];
        let verdict = validate(&parts, &requirements(45.0));
        // Climb and payload checks need a chassis.
        assert_eq!(verdict.errors, vec![ErrorCode::NoChassis]);
        assert_eq!(verdict.metrics.payload_utilization, 0.0);
    }

    #[test]
    fn test_empty_assembly() {
        let verdict = validate(Vec::<Specs>::new(), &requirements(0.0));
        assert_eq!(verdict.errors, vec![ErrorCode::NoChassis]);
        assert_eq!(verdict.metrics, Metrics::default());
    }

    #[test]
    fn test_overweight() {
        let parts = [
            chassis(10.0, 10.0, 15.0),
            sensor(5.0, 1.0),
            sensor(5.0, 1.0),
            sensor(5.0, 1.0),
        ];
        let verdict = validate(&parts, &requirements(0.0));
        assert_eq!(verdict.budget.payload_in_use, 15.0);
        assert_eq!(verdict.errors, vec![ErrorCode::Overweight]);
        assert_relative_eq!(verdict.metrics.payload_utilization, 150.0);
    }

    #[test]
    fn test_power_low_only_with_battery() {
        let hungry = [chassis(30.0, 80.0, 15.0), battery(3.5, 10.0), sensor(0.8, 25.0)];
        assert_eq!(
            validate(&hungry, &requirements(0.0)).errors,
            vec![ErrorCode::PowerLow]
        );

        let unpowered = [chassis(30.0, 80.0, 15.0), sensor(0.8, 25.0)];
        let verdict = validate(&unpowered, &requirements(0.0));
        assert!(verdict.is_valid);
        assert_eq!(verdict.metrics.power_utilization, 0.0);
    }

    #[test]
    fn test_errors_keep_fixed_order() {
        let parts = [chassis(10.0, 1.0, 5.0), battery(5.0, 1.0), sensor(5.0, 50.0)];
        let verdict = validate(&parts, &requirements(30.0));
        assert_eq!(
            verdict.errors,
            vec![ErrorCode::Overweight, ErrorCode::PowerLow, ErrorCode::ClimbFail]
        );
        assert!(verdict.has(ErrorCode::PowerLow));
        assert!(!verdict.has(ErrorCode::NoChassis));
    }

    #[test]
    fn test_capacities_sum_and_climb_takes_max() {
        let parts = [
            chassis(10.0, 20.0, 10.0),
            chassis(10.0, 30.0, 25.0),
            battery(1.0, 100.0),
            battery(1.0, 50.0),
        ];
        let verdict = validate(&parts, &requirements(20.0));
        assert!(verdict.is_valid);
        assert_eq!(verdict.budget.max_payload, 50.0);
        assert_eq!(verdict.budget.max_power_output, 150.0);
        assert_eq!(verdict.budget.max_climb_angle, 25.0);
        assert_eq!(verdict.budget.chassis_weight, 20.0);
    }

    #[test]
    fn test_accessories_weigh_but_draw_nothing() {
        let parts = [
            chassis(30.0, 80.0, 15.0),
            Specs::Accessory {
                weight: 2.0,
                dims: [0.1; 3],
            },
        ];
        let verdict = validate(&parts, &requirements(0.0));
        assert_eq!(verdict.budget.payload_in_use, 2.0);
        assert_eq!(verdict.budget.total_power_draw, 0.0);
    }

    #[test]
    fn test_tree_validation_includes_cost() {
        let mut tree = PartTree::new();
        for sku in ["CHASSIS-GENERIC-01", "BATTERY-24V-20AH", "LIDAR-VLP16"] {
            tree.apply(Command::Add {
                record: FallbackCatalog.lookup(sku).unwrap().unwrap(),
                parent: None,
                local: Transform::identity(),
            })
            .unwrap();
        }
        let verdict = validate_tree(&tree, &requirements(0.0));
        assert!(verdict.is_valid);
        assert_relative_eq!(verdict.metrics.weight, 34.3, epsilon = 1e-9);
        assert_eq!(verdict.metrics.cost, 4500.0 + 1200.0 + 8000.0);
    }

    #[test]
    fn test_parts_and_specs_validate_alike() {
        let specs = sensor(1.0, 2.0);
        let part = Part::new("S", Category::Sensor, specs.clone()).with_unit_price(10.0);
        let by_part = validate([&part], &requirements(0.0));
        let by_specs = validate([&specs], &requirements(0.0));
        assert_eq!(by_part.budget, by_specs.budget);
        assert_eq!(by_part.metrics.cost, 10.0);
        assert_eq!(by_specs.metrics.cost, 0.0);
    }

    #[test]
    fn test_verdict_wire_shape() {
        let parts = [chassis(10.0, 1.0, 15.0), sensor(5.0, 1.0)];
        let json = serde_json::to_value(validate(&parts, &requirements(0.0))).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0], "ERR_OVERWEIGHT");
        assert!(json["metrics"]["payloadUtilization"].is_number());
        assert!(json["budget"]["payloadInUse"].is_number());
        assert_eq!(ErrorCode::ClimbFail.to_string(), "ERR_CLIMB_FAIL");
    }
}
