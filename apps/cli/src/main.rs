#![deny(warnings)]

//! Headless walkthrough of the six planning steps for one portfolio company.

use anyhow::{bail, Context, Result};
use pe_core::{PlannerConfig, ReferenceData};
use pe_plan::{BenchmarkReport, ExitAssessment, PlanTrajectory};
use pe_scoring::ScreeningView;
use pe_session::Session;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    company: Option<String>,
    horizon: Option<u8>,
    use_cases: Vec<String>,
    config: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--company" => args.company = it.next(),
            "--horizon" => {
                let raw = it.next().context("--horizon needs a value")?;
                args.horizon = Some(raw.parse().with_context(|| format!("bad horizon {raw}"))?);
            }
            "--use-case" => args.use_cases.extend(it.next()),
            "--config" => args.config = it.next(),
            "--json" => args.json = true,
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

#[derive(Serialize)]
struct Report<'a> {
    company: &'a str,
    screening: ScreeningView,
    v_org_r: f64,
    org_ai_r: f64,
    target_org_ai_r: f64,
    plan: Option<&'a PlanTrajectory>,
    benchmark: BenchmarkReport,
    exit: ExitAssessment,
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    info!(?args, "starting planner");

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => PlannerConfig::default(),
    };
    let mut session = Session::new(ReferenceData::builtin(), config)?;

    // Step 1
    if let Some(company) = &args.company {
        session.select_company(company)?;
    }
    let screening = session.screening()?;

    // Step 2
    session.advance();
    let readiness = *session.readiness();
    let gaps = session.gap_analysis();

    // Step 3
    session.advance();
    if !args.use_cases.is_empty() {
        session.set_use_cases(args.use_cases.iter().cloned())?;
    }

    // Step 4
    session.advance();
    if let Some(years) = args.horizon {
        session.set_horizon(years)?;
    }

    // Step 5
    session.advance();
    let benchmark = session.commit_plan()?;

    // Step 6
    session.advance();
    let exit = session.exit_assessment()?;

    let company = session.context().company.as_str();
    if args.json {
        let report = Report {
            company,
            screening,
            v_org_r: readiness.v_org_r,
            org_ai_r: readiness.org_ai_r,
            target_org_ai_r: session.target_readiness().org_ai_r,
            plan: session.plan(),
            benchmark,
            exit,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Screening | {} ({}) | Org-AI-R: {:.2} | score: {:.2} | {}",
        company,
        session.context().sector,
        screening.readiness.org_ai_r,
        screening.screening_score,
        screening.recommendation.label()
    );
    let widest = gaps.first().map(|g| g.dimension.name()).unwrap_or("-");
    println!(
        "Readiness | V_org_R: {:.2} | Org-AI-R: {:.2} | target: {:.2} | largest gap: {}",
        readiness.v_org_r,
        readiness.org_ai_r,
        session.target_readiness().org_ai_r,
        widest
    );
    for i in session.initiatives() {
        println!(
            "Initiative | {} | {:.1} mo | ${:.2}M | p={:.2} q={:.2} | EBITDA +{:.2}% (${:.2}M) | +{:.2} pts",
            i.use_case,
            i.timeline_months,
            i.investment_m,
            i.prob_success,
            i.exec_quality,
            i.ebitda_impact_pct,
            i.ebitda_impact_m,
            i.delta_org_ai_r
        );
    }
    match session.plan() {
        Some(plan) => {
            for y in &plan.years {
                println!(
                    "Plan Y{} | Org-AI-R: {:.2} | invest: ${:.2}M | EBITDA impact: ${:.2}M",
                    y.year, y.org_ai_r, y.cumulative_investment_m, y.cumulative_ebitda_impact_m
                );
            }
            if !plan.dropped.is_empty() {
                println!("Plan | beyond horizon: {}", plan.dropped.join(", "));
            }
        }
        None => println!("Plan | {}", session.plan_notice().unwrap_or_default()),
    }
    println!(
        "Benchmark | Org-AI-R: {:.2} | percentile: {:.2} | z: {:.2} | AIE: {:.2} (pct {:.2})",
        benchmark.org_ai_r,
        benchmark.percentile,
        benchmark.z_score,
        benchmark.efficiency,
        benchmark.efficiency_percentile
    );
    println!(
        "Exit | Exit-AI-R: {:.2} | multiple: {:.2}x | EBITDA: ${:.2}M | valuation: ${:.2}M",
        exit.exit_ai_r, exit.predicted_multiple, exit.projected_ebitda_m, exit.implied_valuation_m
    );

    Ok(())
}
