use nnga_genetic::coefficients::SizeTrend;

use crate::config::ConfigArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ProjectArg {
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &ProjectArg) -> anyhow::Result<()> {
    let config = arg.config.load()?;
    let (sizes, trend) = config
        .coefficients
        .project_sizes(config.population, config.max_generations);

    eprintln!("Population size per generation:");
    for (generation, size) in sizes.iter().enumerate() {
        eprintln!("  {generation:4}: {size}");
    }
    match trend {
        SizeTrend::Collapses { .. } => eprintln!("  Exhausted: selection keeps nobody"),
        SizeTrend::Stable { .. } => eprintln!("  Size is stable from here on"),
        SizeTrend::Grows { .. } => eprintln!("  Size grows every generation from here on"),
        SizeTrend::Shrinking => {}
    }

    match trend {
        SizeTrend::Collapses { generation } => eprintln!(
            "Evolution fails at generation {generation} (limit {})",
            config.max_generations
        ),
        SizeTrend::Stable { .. } | SizeTrend::Grows { .. } | SizeTrend::Shrinking => eprintln!(
            "Population survives {} generations",
            config.max_generations
        ),
    }
    Ok(())
}
