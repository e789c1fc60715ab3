//! Unit tests for ms-flow.

use ms_core::{TimeWindow, TravelMode};

use crate::{RouteFlowTemplate, RouteTemplate};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn route(id: &str, share: f64) -> RouteTemplate {
    RouteTemplate::from_path(id, "A4B4 B4C4 C4D4", TimeWindow::full_day(), share).unwrap()
}

/// One private route and one public route, each taking the whole mode.
fn single_route_template() -> RouteFlowTemplate {
    RouteFlowTemplate::new(
        vec![RouteTemplate::from_path(
            "flow_0",
            "A4B4 B4C4 C4D4 D4E4 E4E3 E3E2 E2D2",
            TimeWindow::full_day(),
            1.0,
        )
        .unwrap()],
        vec![RouteTemplate::from_path(
            "flow_1",
            "A2A3 A3B3 B3C3 C3C2 C2C1 C1C0 C0B0",
            TimeWindow::full_day(),
            1.0,
        )
        .unwrap()],
    )
    .unwrap()
}

// ── Templates ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod template_tests {
    use super::*;

    #[test]
    fn route_id_is_prefixed() {
        assert_eq!(route("flow_0", 1.0).route_id(), "r_flow_0");
    }

    #[test]
    fn path_is_split_on_whitespace() {
        let t = route("f", 1.0);
        assert_eq!(t.edges, ["A4B4", "B4C4", "C4D4"]);
    }

    #[test]
    fn share_must_be_in_half_open_unit_interval() {
        let w = TimeWindow::full_day();
        assert!(RouteTemplate::from_path("f", "a", w, 0.0).is_err());
        assert!(RouteTemplate::from_path("f", "a", w, 1.01).is_err());
        assert!(RouteTemplate::from_path("f", "a", w, f64::NAN).is_err());
        assert!(RouteTemplate::from_path("f", "a", w, 1.0).is_ok());
    }

    #[test]
    fn empty_path_and_bad_window_rejected() {
        assert!(RouteTemplate::from_path("f", "  ", TimeWindow::full_day(), 1.0).is_err());
        assert!(RouteTemplate::from_path("f", "a", TimeWindow::new(50.0, 10.0), 1.0).is_err());
        assert!(RouteTemplate::from_path("has space", "a", TimeWindow::full_day(), 1.0).is_err());
    }

    #[test]
    fn duplicate_ids_across_groups_rejected() {
        let result = RouteFlowTemplate::new(vec![route("x", 1.0)], vec![route("x", 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn iter_visits_private_then_public() {
        let t = single_route_template();
        let order: Vec<_> = t.iter().map(|(m, r)| (m, r.id.as_str())).collect();
        assert_eq!(order, [(TravelMode::Private, "flow_0"), (TravelMode::Public, "flow_1")]);
    }

    #[test]
    fn deserializes_from_toml_with_string_or_list_edges() {
        let t: RouteFlowTemplate = toml::from_str(
            r#"
            [[private]]
            id    = "flow_0"
            edges = "A4B4 B4C4"
            share = 0.6

            [[private]]
            id    = "flow_2"
            edges = ["A1B1", "B1C1"]
            begin = 3600
            end   = 7200
            share = 0.4

            [[public]]
            id    = "flow_1"
            edges = "A2A3"
            share = 1.0
            "#,
        )
        .unwrap();
        let private = t.group(TravelMode::Private);
        assert_eq!(private.len(), 2);
        assert_eq!(private[0].window, TimeWindow::full_day());
        assert_eq!(private[1].edges, ["A1B1", "B1C1"]);
        assert_eq!(private[1].window, TimeWindow::new(3600.0, 7200.0));
        assert_eq!(t.group(TravelMode::Public).len(), 1);
    }

    #[test]
    fn invalid_share_fails_deserialization() {
        let result = toml::from_str::<RouteFlowTemplate>(
            "[[public]]\nid = \"f\"\nedges = \"a\"\nshare = 2.0\n",
        );
        assert!(result.is_err());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use super::*;
    use crate::load_templates_reader;

    const CSV: &str = "\
mode,flow_id,edges,begin,end,share
private,flow_0,A4B4 B4C4 C4D4,0,86400,1.0
public,flow_1,A2A3 A3B3,,,1.0
";

    #[test]
    fn loads_both_groups() {
        let t = load_templates_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(t.group(TravelMode::Private)[0].edges.len(), 3);
        let public = &t.group(TravelMode::Public)[0];
        assert_eq!(public.id, "flow_1");
        assert_eq!(public.window, TimeWindow::full_day(), "empty bounds mean the full day");
    }

    #[test]
    fn unknown_mode_is_parse_error() {
        let csv = "mode,flow_id,edges,begin,end,share\ntram,f,a,0,10,1.0\n";
        let err = load_templates_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, crate::FlowError::Parse(_)), "{err}");
    }

    #[test]
    fn missing_column_is_parse_error() {
        let csv = "mode,flow_id,edges\nprivate,f,a\n";
        assert!(load_templates_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.csv");
        std::fs::write(&path, CSV).unwrap();
        let t = crate::load_templates_csv(&path).unwrap();
        assert_eq!(t.len(), 2);
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod plan_tests {
    use super::*;
    use crate::{FlowError, PlanOptions, allocate_vehicles, build_day_plan, split_population};

    #[test]
    fn end_to_end_scenario() {
        let plan = build_day_plan(&single_route_template(), 200, 0.4, &PlanOptions::default()).unwrap();
        assert_eq!(plan.num_public, 80);
        assert_eq!(plan.num_private, 120);
        assert_eq!(plan.flows.len(), 2);

        let car = &plan.flows[0];
        assert_eq!(car.mode, TravelMode::Private);
        assert_eq!(car.vehicle_type, "car");
        assert_eq!(car.vehicles, 120);
        assert_eq!(car.period, 720.0);

        let bus = &plan.flows[1];
        assert_eq!(bus.vehicle_type, "bus");
        assert_eq!(bus.vehicles, 80);
        assert_eq!(bus.period, 1080.0);
    }

    #[test]
    fn negative_population_rejected() {
        let err = build_day_plan(&single_route_template(), -1, 0.5, &PlanOptions::default()).unwrap_err();
        assert!(matches!(err, FlowError::InvalidPopulation(-1)));
    }

    #[test]
    fn nan_rate_rejected() {
        assert!(matches!(split_population(10, f64::NAN), Err(FlowError::InvalidAcceptanceRate(_))));
    }

    #[test]
    fn rate_is_clamped() {
        assert_eq!(split_population(100, 1.7).unwrap(), (100, 0));
        assert_eq!(split_population(100, -0.2).unwrap(), (0, 100));
        let plan = build_day_plan(&single_route_template(), 10, 1.2, &PlanOptions::default()).unwrap();
        assert_eq!(plan.acceptance_rate, 1.0);
    }

    #[test]
    fn zero_vehicle_route_is_skipped_not_an_error() {
        let plan = build_day_plan(&single_route_template(), 200, 0.0, &PlanOptions::default()).unwrap();
        assert_eq!(plan.num_public, 0);
        assert_eq!(plan.flows.len(), 1);
        assert_eq!(plan.skipped, ["flow_1"]);
        assert_eq!(plan.routes.len(), 2, "skipped routes are still declared");
    }

    #[test]
    fn tiny_share_rounds_to_no_flow() {
        let t = RouteFlowTemplate::new(vec![route("tiny", 0.001)], vec![]).unwrap();
        let plan = build_day_plan(&t, 100, 0.0, &PlanOptions::default()).unwrap();
        assert!(plan.flows.is_empty());
        assert_eq!(plan.skipped, ["tiny"]);
    }

    #[test]
    fn empty_population_plans_nothing() {
        let plan = build_day_plan(&single_route_template(), 0, 0.5, &PlanOptions::default()).unwrap();
        assert_eq!((plan.num_public, plan.num_private), (0, 0));
        assert!(plan.flows.is_empty());
    }

    #[test]
    fn period_respects_floor() {
        let t = RouteFlowTemplate::new(
            vec![RouteTemplate::from_path("dense", "a b", TimeWindow::new(0.0, 10.0), 1.0).unwrap()],
            vec![],
        )
        .unwrap();
        let plan = build_day_plan(&t, 100, 0.0, &PlanOptions { min_period_secs: 1.0 }).unwrap();
        assert_eq!(plan.flows[0].vehicles, 100);
        assert_eq!(plan.flows[0].period, 1.0, "10 s / 100 vehicles is floored to 1 s");

        let plan = build_day_plan(&t, 100, 0.0, &PlanOptions { min_period_secs: 0.05 }).unwrap();
        assert!((plan.flows[0].period - 0.1).abs() < 1e-12);
    }

    #[test]
    fn largest_remainder_never_overshoots() {
        assert_eq!(allocate_vehicles(3, &[0.5, 0.5]), [2, 1]);
        assert_eq!(allocate_vehicles(10, &[0.7, 0.7]), [5, 5]);
        assert_eq!(allocate_vehicles(7, &[1.0 / 3.0; 3]), [3, 2, 2]);
    }

    #[test]
    fn partial_shares_leave_population_unassigned() {
        assert_eq!(allocate_vehicles(100, &[0.25, 0.25]), [25, 25]);
        assert_eq!(allocate_vehicles(0, &[1.0]), [0]);
        assert!(allocate_vehicles(10, &[]).is_empty());
    }

    #[test]
    fn largest_remainder_fixes_float_noise() {
        assert_eq!(allocate_vehicles(100, &[0.29, 0.71]), [29, 71]);
    }

    #[test]
    fn per_mode_vehicle_totals() {
        let t = RouteFlowTemplate::new(
            vec![route("p0", 0.5), route("p1", 0.5)],
            vec![route("q0", 1.0)],
        )
        .unwrap();
        let plan = build_day_plan(&t, 201, 0.4, &PlanOptions::default()).unwrap();
        assert_eq!(plan.num_public, 80);
        assert_eq!(plan.num_private, 121);
        assert_eq!(plan.vehicles(TravelMode::Private), 121);
        assert_eq!(plan.vehicles(TravelMode::Public), 80);
    }
}

// ── Routes file ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod routes_xml_tests {
    use super::*;
    use crate::{PlanOptions, VehicleType, build_day_plan, write_routes, write_routes_file};

    fn render(plan: &crate::DayFlowPlan, vtypes: &[VehicleType]) -> String {
        let mut buf = Vec::new();
        write_routes(&mut buf, plan, vtypes).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn document_contains_types_routes_and_flows() {
        let plan = build_day_plan(&single_route_template(), 200, 0.4, &PlanOptions::default()).unwrap();
        let xml = render(&plan, &VehicleType::defaults());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("xsi:noNamespaceSchemaLocation=\"http://sumo.dlr.de/xsd/routes_file.xsd\""));
        assert!(xml.contains(r#"<vType id="car" length="4.50" minGap="2.50" maxSpeed="13.90""#));
        assert!(xml.contains(r#"<vType id="bus" length="7.50" minGap="2.50" maxSpeed="10.00""#));
        assert!(xml.contains(r#"<route id="r_flow_0" edges="A4B4 B4C4 C4D4 D4E4 E4E3 E3E2 E2D2" />"#));
        assert!(xml.contains(
            r#"<flow id="flow_0" type="car" begin="0" end="86400" period="720.00" route="r_flow_0" />"#
        ));
        assert!(xml.contains(
            r#"<flow id="flow_1" type="bus" begin="0" end="86400" period="1080.00" route="r_flow_1" />"#
        ));
        assert!(xml.trim_end().ends_with("</routes>"));
    }

    #[test]
    fn routes_precede_flows() {
        let plan = build_day_plan(&single_route_template(), 200, 0.4, &PlanOptions::default()).unwrap();
        let xml = render(&plan, &VehicleType::defaults());
        let last_route = xml.rfind("<route ").unwrap();
        let first_flow = xml.find("<flow ").unwrap();
        assert!(last_route < first_flow);
    }

    #[test]
    fn skipped_route_declared_without_flow() {
        let plan = build_day_plan(&single_route_template(), 200, 0.0, &PlanOptions::default()).unwrap();
        let xml = render(&plan, &VehicleType::defaults());
        assert!(xml.contains(r#"<route id="r_flow_1""#));
        assert!(!xml.contains(r#"<flow id="flow_1""#));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let plan = build_day_plan(&single_route_template(), 10, 0.5, &PlanOptions::default()).unwrap();
        let mut vt = VehicleType::car();
        vt.color = "r&d \"red\"".into();
        let xml = render(&plan, &[vt]);
        assert!(xml.contains(r#"color="r&amp;d &quot;red&quot;""#));
    }

    #[test]
    fn file_written_with_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows").join("flows_sim1_day1_p.xml");
        let plan = build_day_plan(&single_route_template(), 200, 0.4, &PlanOptions::default()).unwrap();
        write_routes_file(&path, &plan, &VehicleType::defaults()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<flow id=\"flow_0\""));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{PlanOptions, allocate_vehicles, build_day_plan, split_population};

    proptest! {
        #[test]
        fn split_preserves_total(pop in 0i64..1_000_000, rate in 0.0f64..=1.0) {
            let (public, private) = split_population(pop, rate).unwrap();
            prop_assert_eq!(public + private, pop as u64);
        }

        #[test]
        fn allocation_never_exceeds_mode_population(
            pop in 0u64..10_000,
            shares in proptest::collection::vec(0.001f64..=1.0, 1..6),
        ) {
            let counts = allocate_vehicles(pop, &shares);
            prop_assert_eq!(counts.len(), shares.len());
            prop_assert!(counts.iter().sum::<u64>() <= pop);
        }

        #[test]
        fn full_shares_assign_whole_mode(pop in 0i64..10_000, rate in 0.0f64..=1.0) {
            let plan = build_day_plan(&single_route_template(), pop, rate, &PlanOptions::default()).unwrap();
            prop_assert_eq!(plan.num_public + plan.num_private, pop as u64);
            prop_assert_eq!(plan.vehicles(TravelMode::Private), plan.num_private);
            prop_assert_eq!(plan.vehicles(TravelMode::Public), plan.num_public);
            for flow in &plan.flows {
                prop_assert!(flow.period >= 1.0);
            }
        }
    }
}
