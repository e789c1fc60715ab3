//! Routes-file serialization.
//!
//! Writes the document the external simulator reads with `-r`:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <routes xmlns:xsi="…" xsi:noNamespaceSchemaLocation="…/routes_file.xsd">
//!     <vType id="car" length="4.50" … />
//!     <route id="r_flow_0" edges="A4B4 B4C4" />
//!     <flow id="flow_0" type="car" begin="0" end="86400" period="720.00" route="r_flow_0" />
//! </routes>
//! ```
//!
//! Every route is declared, including those whose flow was skipped; flows
//! follow all route declarations so each reference is already defined.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::{DayFlowPlan, FlowResult, VehicleType};

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ROUTES_SCHEMA: &str = "http://sumo.dlr.de/xsd/routes_file.xsd";

/// Serialize `plan` with the given vehicle types into `w`.
pub fn write_routes<W: Write>(w: &mut W, plan: &DayFlowPlan, vehicle_types: &[VehicleType]) -> io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
    writeln!(
        w,
        r#"<routes xmlns:xsi="{XSI_NAMESPACE}" xsi:noNamespaceSchemaLocation="{ROUTES_SCHEMA}">"#
    )?;

    for vt in vehicle_types {
        writeln!(
            w,
            r#"    <vType id="{}" length="{:.2}" minGap="{:.2}" maxSpeed="{:.2}" emissionClass="{}" guiShape="{}" color="{}" accel="{}" decel="{}" sigma="{}" />"#,
            escape(&vt.id),
            vt.length,
            vt.min_gap,
            vt.max_speed,
            escape(&vt.emission_class),
            escape(&vt.gui_shape),
            escape(&vt.color),
            vt.accel,
            vt.decel,
            vt.sigma,
        )?;
    }

    for route in &plan.routes {
        writeln!(
            w,
            r#"    <route id="{}" edges="{}" />"#,
            escape(&route.route_id),
            escape(&route.edges.join(" ")),
        )?;
    }

    for flow in &plan.flows {
        writeln!(
            w,
            r#"    <flow id="{}" type="{}" begin="{}" end="{}" period="{:.2}" route="{}" />"#,
            escape(&flow.flow_id),
            escape(&flow.vehicle_type),
            flow.begin,
            flow.end,
            flow.period,
            escape(&flow.route_id),
        )?;
    }

    writeln!(w, "</routes>")?;
    Ok(())
}

/// Write the routes file for `plan` to `path`, creating parent directories.
pub fn write_routes_file(path: &Path, plan: &DayFlowPlan, vehicle_types: &[VehicleType]) -> FlowResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    write_routes(&mut w, plan, vehicle_types)?;
    w.flush()?;
    Ok(())
}

/// Escape the five XML special characters in an attribute value.
fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c    => out.push(c),
        }
    }
    Cow::Owned(out)
}

