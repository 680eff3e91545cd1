//! # Footing CLI
//!
//! Reads a pad footing input record (or an array of them) as JSON, runs the
//! design check and prints a summary followed by the JSON result. With no
//! input file a built-in demonstration footing is checked.
//!
//! Logging goes to stderr; set `RUST_LOG=footing_core=debug` for per
//! combination detail.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use footing_core::calculations::pad_footing::{calculate, DesignResult, PadFootingInput};
use footing_core::calculations::sizing::size_square_plan;
use footing_core::geometry::{Direction, FoundationGeometry, SoilOverburden};
use footing_core::loads::{ColumnActions, ServiceLoads};
use footing_core::materials::MaterialProperties;
use footing_core::{analyze_batch, BatchSummary, CalcError, CalcResult, DesignCode, ACI_318M_25};

#[derive(Parser, Debug)]
#[command(name = "footing_cli", version, about = "Isolated pad footing design to ACI 318M-25")]
struct Args {
    /// JSON input: one footing object or an array of footings
    input: Option<PathBuf>,

    /// Replacement code tables (.toml or .json)
    #[arg(long)]
    code: Option<PathBuf>,

    /// Size a square plan for bearing before checking
    #[arg(long)]
    size: bool,

    /// Print only the JSON result
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every footing passes
fn run(args: &Args) -> CalcResult<bool> {
    let loaded;
    let code: &DesignCode = match &args.code {
        Some(path) => {
            loaded = load_code(path)?;
            &loaded
        }
        None => &ACI_318M_25,
    };

    let mut inputs = match &args.input {
        Some(path) => load_inputs(path)?,
        None => {
            if !args.json {
                println!("No input file given; checking the demonstration footing.");
                println!();
            }
            vec![demo_input()]
        }
    };

    if args.size {
        for input in &mut inputs {
            let plan = size_square_plan(input, code)?;
            if !args.json {
                println!(
                    "{}: sized to {:.0} x {:.0} mm ({:.1} / {:.1} kN/m2 under {})",
                    input.label,
                    plan.side_mm,
                    plan.side_mm,
                    plan.bearing.max_pressure_kn_m2,
                    plan.bearing.allowable_kn_m2,
                    plan.bearing.combination
                );
            }
            input.geometry = plan.apply_to(&input.geometry);
        }
    }

    if inputs.len() == 1 {
        let result = calculate(&inputs[0], code)?;
        if args.json {
            println!("{}", to_json(&result)?);
        } else {
            print_result(&result);
            println!();
            println!("JSON Output:");
            println!("{}", to_json(&result)?);
        }
        return Ok(result.passes);
    }

    let results = analyze_batch(&inputs, code);
    let summary = BatchSummary::from_results(&inputs, &results);
    if args.json {
        println!("{}", to_json(&summary)?);
    } else {
        for result in results.iter().flatten() {
            print_result(result);
            println!();
        }
        println!(
            "{} footings: {} pass, {} fail, {} error",
            summary.entries.len(),
            summary.passed,
            summary.failed,
            summary.errored
        );
        for entry in summary.entries.iter().filter(|e| e.error.is_some()) {
            if let Some(e) = &entry.error {
                println!("  {}: {}", entry.label, e);
            }
        }
    }
    Ok(summary.all_pass())
}

fn load_code(path: &Path) -> CalcResult<DesignCode> {
    let text = read(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => DesignCode::from_toml_str(&text),
        Some("json") => DesignCode::from_json_str(&text),
        _ => Err(CalcError::configuration(format!(
            "code file {} must end in .toml or .json",
            path.display()
        ))),
    }
}

fn load_inputs(path: &Path) -> CalcResult<Vec<PadFootingInput>> {
    let text = read(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

fn read(path: &Path) -> CalcResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CalcError::invalid_input("path", path.display().to_string(), e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> CalcResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// 800 kN dead + 300 kN live on a 2.5 m square footing
fn demo_input() -> PadFootingInput {
    PadFootingInput {
        label: "Demo".to_string(),
        geometry: FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0),
        materials: MaterialProperties::new(40.0, 420.0),
        loads: ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(300.0)),
        overburden: SoilOverburden::with_soil_depth(700.0),
        allowable_bearing_kn_m2: 200.0,
        settings: Default::default(),
    }
}

fn print_result(result: &DesignResult) {
    println!("═══════════════════════════════════════");
    println!("  PAD FOOTING: {} ({})", result.label, result.design_code);
    println!("═══════════════════════════════════════");
    println!();
    println!("Bearing ({}):", result.bearing.combination);
    println!(
        "  q_max = {:.1} kN/m2 vs {:.1} allowable  {}",
        result.bearing.max_pressure_kn_m2,
        result.bearing.allowable_kn_m2,
        status_icon(result.bearing.check.passes)
    );
    println!(
        "  e_x = {:.0} mm, e_y = {:.0} mm",
        result.bearing.eccentricity_x_mm, result.bearing.eccentricity_y_mm
    );
    println!();

    for direction in Direction::BOTH {
        let design = result.direction(direction);
        println!("{} direction (d = {:.0} mm, {}):", direction, design.effective_depth_mm, design.moment_combination);
        println!(
            "  Mu = {:.1} kNm, As,req = {:.0} mm2 (min {:.0})  {}",
            design.flexure.moment_demand_knm,
            design.flexure.as_required_mm2,
            design.flexure.as_min_mm2,
            status_icon(design.flexure_check.passes)
        );
        match &design.reinforcement.layout {
            Some(layout) => println!("  Bars: {} ({} bars)", layout.description, layout.bar_count),
            None => println!("  Bars: no layout fits the spacing limits"),
        }
        println!(
            "  One-way shear: {:.1} / {:.1} kN  {}",
            design.one_way_shear.check.demand,
            design.one_way_shear.check.capacity,
            status_icon(design.one_way_shear.check.passes)
        );
        println!(
            "  Development: {:.0} mm required, {:.0} mm available",
            design.development.required_mm, design.development.available_mm
        );
        println!();
    }

    println!(
        "Punching shear ({}, {} column):",
        result.punching.combination,
        result.punching.perimeter.location.display_name()
    );
    println!(
        "  Vu = {:.1} kN vs phi Vc = {:.1} kN (bo = {:.0} mm)  {}",
        result.punching.check.demand,
        result.punching.check.capacity,
        result.punching.perimeter.perimeter_mm,
        status_icon(result.punching.check.passes)
    );

    for advisory in &result.advisories {
        println!("Note: {}", advisory);
    }
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (governs: {}, ratio {:.2})",
        if result.passes { "PASS" } else { "FAIL" },
        result.governing_condition(),
        result.governing_ratio()
    );
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
