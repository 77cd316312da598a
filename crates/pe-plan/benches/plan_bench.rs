use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pe_core::{Horizon, Initiative, OverrunPolicy, ReferenceData, Sector};
use pe_plan::{build_plan, Portfolio};
use pe_scoring::{estimate_initiative, EstimationContext, InitiativeOverrides};

fn catalog_initiatives(reference: &ReferenceData) -> Vec<Initiative> {
    let ctx = EstimationContext {
        v_org_r: 48.0,
        h_org_k_r: 80.0,
        base_ebitda_m: 15.0,
    };
    let mut out = Vec::new();
    for sector in Sector::ALL {
        if let Ok(catalog) = reference.catalog(sector) {
            for uc in catalog {
                out.push(estimate_initiative(uc, &ctx, &InitiativeOverrides::default()));
            }
        }
    }
    out
}

fn bench_plan(c: &mut Criterion) {
    let reference = ReferenceData::builtin();
    let initiatives = catalog_initiatives(&reference);
    let horizon = Horizon::new(5).unwrap_or_default();

    c.bench_function("plan 16 initiatives x 5y", |b| {
        b.iter(|| {
            let _ = black_box(build_plan(
                black_box(&initiatives),
                54.0,
                horizon,
                OverrunPolicy::Drop,
            ));
        })
    });

    c.bench_function("commit + benchmark 8 companies", |b| {
        let plan = build_plan(&initiatives, 54.0, horizon, OverrunPolicy::Drop);
        let outcome = pe_plan::PlanOutcome::from_plan(54.0, Some(&plan));
        b.iter(|| {
            let mut portfolio = Portfolio::from_seeds(&reference.portfolio);
            let _ = portfolio.commit_plan("Alpha Manufacturing", &outcome);
            let _ = black_box(portfolio.benchmark("Alpha Manufacturing"));
        })
    });
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
