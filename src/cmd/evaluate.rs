use crate::reports;
use clap::Args;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{error, info};
use trp_penalty::config::EvaluatorConfig;
use trp_penalty::error::PtResult;
use trp_penalty::instance::TrpInstance;
use trp_penalty::penalty::{
    EvaluationParameters, PenaltyBreakdown, PenaltyEvaluator, SearchBound, Verdict,
};

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub config: EvaluatorConfig,

    /// Instance JSON files.
    #[arg(required = true, num_args = 1..)]
    pub instances: Vec<String>,

    /// Best-known penalty; evaluation stops once it is reached.
    #[arg(short, long)]
    pub bound: Option<f64>,

    /// Tentative gain of the move (decides ties with the bound).
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub gain: i64,

    /// Print the running penalty at every checkpoint.
    #[arg(long, default_value_t = false)]
    pub trace: bool,
}

pub struct InstanceReport {
    pub path: String,
    pub name: String,
    pub tasks: usize,
    pub params: EvaluationParameters,
    pub verdict: Verdict,
    pub breakdown: PenaltyBreakdown,
}

fn evaluate_one(
    path: &str,
    config: &EvaluatorConfig,
    bound: SearchBound,
) -> PtResult<InstanceReport> {
    let instance = TrpInstance::load_from_file(path)?;
    let built = instance.build(config)?;

    let mut evaluator = PenaltyEvaluator::new();
    let verdict = evaluator.evaluate(&built.tour, &built.costs, &built.params, bound)?;
    let breakdown = evaluator.breakdown(&built.tour, &built.costs, &built.params)?;

    Ok(InstanceReport {
        path: path.to_string(),
        name: instance.name,
        tasks: instance.tasks.len(),
        params: built.params,
        verdict,
        breakdown,
    })
}

/// Returns the number of instances that could not be evaluated.
pub fn run(args: EvaluateArgs, config: EvaluatorConfig) -> usize {
    let bound = match args.bound {
        Some(b) => SearchBound::new(b, args.gain),
        None => SearchBound::unbounded(),
    };

    info!("📂 Evaluating {} instance(s)", args.instances.len());
    let start = Instant::now();

    let results: Vec<(&String, PtResult<InstanceReport>)> = args
        .instances
        .par_iter()
        .map(|path| (path, evaluate_one(path, &config, bound)))
        .collect();

    info!("⏱️  Done in {:.3}s", start.elapsed().as_secs_f64());

    let mut reports_ok = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(r) => reports_ok.push(r),
            Err(e) => {
                failures += 1;
                if e.is_fatal() {
                    error!("❌ FATAL: {}: {}", path, e);
                } else {
                    error!("❌ {}: {}", path, e);
                }
            }
        }
    }

    if !reports_ok.is_empty() {
        reports::print_summary(&reports_ok, &bound);
        for r in &reports_ok {
            reports::print_routes(r);
            if args.trace {
                reports::print_trace(r, &bound);
            }
        }
    }
    failures
}
