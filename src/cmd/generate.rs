use clap::Args;
use tracing::info;
use trp_penalty::error::PtResult;
use trp_penalty::instance::{LocationMix, TaskGenerator};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of tasks to draw.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub tasks: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Output instance file.
    #[arg(short, long)]
    pub out: String,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min: f64,

    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub max: f64,

    /// Simulation time; release times are drawn from [0, horizon].
    #[arg(long, default_value_t = 100.0)]
    pub horizon: f64,

    #[arg(long, default_value_t = 0.0)]
    pub service_time: f64,

    /// Draw locations from two Gaussians instead of uniformly; the value is
    /// the share of tasks taken from the upper mode.
    #[arg(long)]
    pub mix: Option<f64>,

    #[arg(long)]
    pub name: Option<String>,
}

pub fn run(args: GenerateArgs) -> PtResult<()> {
    let (layout, label) = match args.mix {
        Some(mix) => (LocationMix::bimodal(args.min, args.max, mix), "bimodal"),
        None => (LocationMix::Uniform, "uniform"),
    };
    let mut generator = TaskGenerator::with_mix(args.min, args.max, layout, args.seed)?;
    let name = args
        .name
        .unwrap_or_else(|| format!("{}-{}", label, args.tasks));

    let instance = generator.instance(&name, args.tasks, args.horizon, args.service_time);
    instance.save_to_file(&args.out)?;

    info!(
        "💾 Wrote '{}' ({} tasks) to {}",
        instance.name,
        instance.tasks.len(),
        args.out
    );
    Ok(())
}
